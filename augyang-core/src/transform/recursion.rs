//
// Copyright (c) The augyang Contributors
//
// SPDX-License-Identifier: MIT
//

//! Step 9: resolve `REC` cycles into a self-referential `LIST` plus a
//! `LEAFREF` pointing back at its own key (spec.md §9 design note).

use crate::error::Error;
use crate::ynode::{YNodeFlags, YNodeId, YNodeKind, YTree};

pub fn resolve_recursion(ytree: &mut YTree) -> Result<(), Error> {
    let rec_nodes: Vec<YNodeId> = ytree
        .walk_all()
        .into_iter()
        .filter(|&id| ytree.get(id).kind == YNodeKind::Rec)
        .collect();

    for rec in rec_nodes {
        let list = nearest_ancestor_list(ytree, rec).ok_or(Error::RecUnsupported)?;
        let key = ensure_rec_key(ytree, list);
        ytree.get_mut(key).flags |= YNodeFlags::WHEN_TARGET;

        let list_stable_id = ytree.get(list).id;
        let node = ytree.get_mut(rec);
        node.kind = YNodeKind::Leafref;
        node.reference = Some(list_stable_id);
    }

    Ok(())
}

fn nearest_ancestor_list(ytree: &YTree, id: YNodeId) -> Option<YNodeId> {
    let mut cur = ytree.get(id).parent;
    while let Some(p) = cur {
        if ytree.get(p).kind == YNodeKind::List {
            return Some(p);
        }
        cur = ytree.get(p).parent;
    }
    None
}

/// Ensures `list` has a `KEY` child named `_r-id` (the ABI name for a
/// recursive list's synthetic key, §6.3), promoting an existing
/// `_id`/`_seq` key in place rather than adding a second one.
fn ensure_rec_key(ytree: &mut YTree, list: YNodeId) -> YNodeId {
    let existing = ytree
        .children(list)
        .find(|&c| ytree.get(c).kind == YNodeKind::Key);
    match existing {
        Some(key) => {
            ytree.get_mut(key).ident = Some("_r-id".to_owned());
            key
        }
        None => {
            let key = ytree.insert_at(list, YNodeKind::Key);
            ytree.get_mut(key).ident = Some("_r-id".to_owned());
            ytree.get_mut(key).flags |= YNodeFlags::MAND_TRUE;
            key
        }
    }
}
