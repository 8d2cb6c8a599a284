//
// Copyright (c) The augyang Contributors
//
// SPDX-License-Identifier: MIT
//

//! Steps 1-4: removing unknown leaves, comment nodes, redundant leaves
//! and a useless top-level choice.

use crate::ltree::LTree;
use crate::ynode::{YNodeId, YNodeKind, YTree};

/// Step 1: any childless `UNKNOWN` is deleted.
pub fn remove_unknown_leaves(ytree: &mut YTree) {
    loop {
        let victim = ytree.walk_all().into_iter().find(|&id| {
            id != ytree.root()
                && ytree.get(id).kind == YNodeKind::Unknown
                && ytree.child_count(id) == 0
        });
        match victim {
            Some(id) => ytree.delete_at(id),
            None => break,
        }
    }
}

fn label_literal<'a>(ltree: &'a LTree<'_>, label: Option<crate::ltree::LNodeId>) -> Option<&'a str> {
    let label = label?;
    ltree.get(label).lens.literal()
}

/// Step 2: any node whose `LABEL` string equals `"#comment"` is deleted.
pub fn remove_comments(ytree: &mut YTree, ltree: &LTree<'_>) {
    let victims: Vec<YNodeId> = ytree
        .walk_all()
        .into_iter()
        .filter(|&id| id != ytree.root())
        .filter(|&id| label_literal(ltree, ytree.get(id).label) == Some("#comment"))
        .collect();
    for id in victims {
        ytree.delete_at(id);
    }
}

/// Step 3: if a leaf's label lens also labels a `LEAFLIST` sibling, the
/// leaf is redundant and is dropped.
pub fn remove_useless_leaves(ytree: &mut YTree) {
    let parents: Vec<YNodeId> = ytree.walk_all();
    for parent in parents {
        let children: Vec<YNodeId> = ytree.children(parent).collect();
        let leaflist_labels: Vec<_> = children
            .iter()
            .filter(|&&c| ytree.get(c).kind == YNodeKind::LeafList)
            .filter_map(|&c| ytree.get(c).label)
            .collect();

        let victims: Vec<YNodeId> = children
            .into_iter()
            .filter(|&c| ytree.get(c).kind == YNodeKind::Leaf)
            .filter(|&c| {
                ytree
                    .get(c)
                    .label
                    .is_some_and(|l| leaflist_labels.contains(&l))
            })
            .collect();
        for victim in victims {
            ytree.delete_at(victim);
        }
    }
}

/// Step 4: if every top-level subtree is a `LIST` belonging to the same
/// `UNION`, the choice is redundant (there's nothing else to
/// disambiguate against) and is stripped.
pub fn remove_top_level_choice(ytree: &mut YTree) {
    let top: Vec<YNodeId> = ytree.children(ytree.root()).collect();
    if top.is_empty() {
        return;
    }
    let all_lists = top.iter().all(|&id| ytree.get(id).kind == YNodeKind::List);
    if !all_lists {
        return;
    }
    let first_union = top.first().and_then(|&id| ytree.get(id).choice);
    let Some(first_union) = first_union else {
        return;
    };
    let same = top.iter().all(|&id| ytree.get(id).choice == Some(first_union));
    if same {
        for id in top {
            ytree.get_mut(id).choice = None;
        }
    }
}
