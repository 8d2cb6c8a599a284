//
// Copyright (c) The augyang Contributors
//
// SPDX-License-Identifier: MIT
//

//! Step 10: wrap same-`choice` siblings under `CASE` nodes.

use std::collections::HashMap;

use crate::lens::LensKind;
use crate::ltree::{LNodeId, LTree};
use crate::ynode::{YNodeFlags, YNodeId, YNodeKind, YTree};
use crate::yforest::choice_union_of;

/// Whether a `MAYBE` lens sits on the path from `branch` up to (and
/// including) its enclosing `UNION`.
fn maybe_on_union_path(ltree: &LTree<'_>, branch: LNodeId) -> bool {
    let Some(union) = choice_union_of(ltree, branch) else {
        return false;
    };
    for ancestor in ltree.ancestors(union) {
        if matches!(ltree.get(ancestor).lens.kind, LensKind::Maybe(_)) {
            return true;
        }
        if ltree.get(ancestor).lens.is_subtree_or_rec() {
            break;
        }
    }
    false
}

pub fn shape_choices(ytree: &mut YTree, ltree: &LTree<'_>) {
    for parent in ytree.walk_all() {
        let children: Vec<YNodeId> = ytree.children(parent).collect();

        let mut by_branch: HashMap<LNodeId, Vec<YNodeId>> = HashMap::new();
        let mut order: Vec<LNodeId> = Vec::new();
        for &child in &children {
            if let Some(branch) = ytree.get(child).choice {
                if !by_branch.contains_key(&branch) {
                    order.push(branch);
                }
                by_branch.entry(branch).or_default().push(child);
            }
        }

        for branch in order {
            let members = &by_branch[&branch];
            // Already a single CASE-kind node standing in for the branch
            // (e.g. produced by an earlier pass): nothing to wrap.
            if members.len() == 1 && ytree.get(members[0]).kind == YNodeKind::Case {
                continue;
            }

            let first = members[0];
            let case = ytree.wrap(first, YNodeKind::Case);
            ytree.get_mut(case).choice = Some(branch);
            if maybe_on_union_path(ltree, branch) {
                ytree.get_mut(case).flags |= YNodeFlags::CHOICE_MAND_FALSE;
            }
            for &extra in &members[1..] {
                ytree.move_under(extra, case);
            }
        }
    }
}
