//
// Copyright (c) The augyang Contributors
//
// SPDX-License-Identifier: MIT
//

//! Step 8: factor identical repeated Y-subtrees rooted under different
//! parents into top-level `GROUPING` nodes, replacing their original
//! occurrences with `USES` nodes.

use itertools::Itertools;

use crate::ynode::{YNodeId, YNodeKind, YTree};

/// A structural signature of a Y-subtree: two subtrees that print the
/// same signature would emit identical YANG regardless of which lens
/// they originated from, and are therefore candidates for factoring into
/// one `grouping`.
fn signature(ytree: &YTree, id: YNodeId) -> String {
    let node = ytree.get(id);
    let mut sig = format!(
        "{:?}|{:?}|{:?}|",
        node.kind,
        node.label.map(|l| l.0),
        node.value.map(|v| v.0)
    );
    for child in ytree.children(id) {
        sig.push_str(&signature(ytree, child));
        sig.push(';');
    }
    sig
}

/// Only `LIST`/`CONTAINER` subtrees with at least one child are
/// considered: factoring single leaves into groupings produces more
/// `uses` boilerplate than it saves.
fn eligible(ytree: &YTree, id: YNodeId) -> bool {
    matches!(ytree.get(id).kind, YNodeKind::List | YNodeKind::Container) && ytree.child_count(id) > 0
}

pub fn extract_groupings(ytree: &mut YTree) {
    let root = ytree.root();
    let candidates: Vec<(String, u32)> = ytree
        .walk_all()
        .into_iter()
        .filter(|&id| id != root && eligible(ytree, id))
        // Skip subtrees nested inside another eligible subtree: only the
        // outermost repeated shape is worth factoring.
        .filter(|&id| {
            ytree
                .get(id)
                .parent
                .map(|parent| !eligible(ytree, parent))
                .unwrap_or(true)
        })
        .map(|id| (signature(ytree, id), ytree.get(id).id))
        .collect();

    let groups = candidates.into_iter().into_group_map();

    for (_, occurrence_ids) in groups {
        if occurrence_ids.len() < 2 {
            continue;
        }
        extract_one_grouping(ytree, &occurrence_ids);
    }
}

/// Replaces every occurrence named by `occurrence_ids` (stable ids, since
/// array positions shift as this function deletes nodes) with a `USES`
/// node, keeping one copy of the subtree under a fresh top-level
/// `GROUPING`.
fn extract_one_grouping(ytree: &mut YTree, occurrence_ids: &[u32]) {
    let root = ytree.root();
    let Some(first) = ytree.position(occurrence_ids[0]) else {
        return;
    };
    let first_parent = match ytree.get(first).parent {
        Some(p) => p,
        None => return,
    };
    let snode = ytree.get(first).snode;

    let grouping = ytree.insert_at(root, YNodeKind::Grouping);
    ytree.get_mut(grouping).snode = snode;
    let grouping_stable_id = ytree.get(grouping).id;

    ytree.move_under(first, grouping);
    let uses = ytree.insert_at(first_parent, YNodeKind::Uses);
    ytree.get_mut(uses).reference = Some(grouping_stable_id);

    for &stable_id in &occurrence_ids[1..] {
        let Some(occ) = ytree.position(stable_id) else {
            continue;
        };
        let parent = match ytree.get(occ).parent {
            Some(p) => p,
            None => continue,
        };
        ytree.delete_subtree(occ);
        let uses = ytree.insert_at(parent, YNodeKind::Uses);
        ytree.get_mut(uses).reference = Some(grouping_stable_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_entry(ytree: &mut YTree, parent: YNodeId) -> YNodeId {
        let entry = ytree.insert_at(parent, YNodeKind::Container);
        let leaf = ytree.insert_at(entry, YNodeKind::Leaf);
        ytree.get_mut(leaf).label = Some(crate::ltree::LNodeId(1));
        entry
    }

    #[test]
    fn identical_subtrees_become_uses_of_one_grouping() {
        let mut ytree = YTree::new();
        let root = ytree.root();
        make_entry(&mut ytree, root);
        make_entry(&mut ytree, root);

        extract_groupings(&mut ytree);

        let groupings: Vec<_> = ytree
            .children(root)
            .filter(|&id| ytree.get(id).kind == YNodeKind::Grouping)
            .collect();
        assert_eq!(groupings.len(), 1);

        let uses: Vec<_> = ytree
            .children(root)
            .filter(|&id| ytree.get(id).kind == YNodeKind::Uses)
            .collect();
        assert_eq!(uses.len(), 2);
        for u in uses {
            assert_eq!(ytree.get(u).reference, Some(ytree.get(groupings[0]).id));
        }
    }
}
