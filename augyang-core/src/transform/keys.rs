//
// Copyright (c) The augyang Contributors
//
// SPDX-License-Identifier: MIT
//

//! Steps 6-7: giving every `LIST` a usable key.
//!
//! The original pipeline splits "insert a key derived from the label"
//! (step 6) from "synthesize a fallback `_id`/`_seq`/`_r-id` key when no
//! usable label exists" (step 7). Both produce the same observable
//! shape — exactly one `KEY`-kind child identifying list instances — so
//! this module applies them as one pass: prefer the list's own label
//! (a `SEQ` counter or a repeated `LABEL` literal) and fall back to a
//! synthetic key only when the label can't serve as one.

use crate::lens::LensKind;
use crate::ltree::LTree;
use crate::ynode::{YNodeFlags, YNodeId, YNodeKind, YTree};

/// Ensures every `LIST` Y-node has exactly one `KEY`-kind child
/// (spec.md §8.1.4).
pub fn synthesize_keys(ytree: &mut YTree, ltree: &LTree<'_>) {
    let lists: Vec<YNodeId> = ytree
        .walk_all()
        .into_iter()
        .filter(|&id| ytree.get(id).kind == YNodeKind::List)
        .collect();

    for list in lists {
        if has_key_child(ytree, list) {
            continue;
        }

        let ident = key_ident(ytree, ltree, list);
        let key = ytree.insert_at(list, YNodeKind::Key);
        ytree.get_mut(key).ident = Some(ident);
        ytree.get_mut(key).flags |= YNodeFlags::MAND_TRUE;
    }
}

fn has_key_child(ytree: &YTree, list: YNodeId) -> bool {
    ytree
        .children(list)
        .any(|c| ytree.get(c).kind == YNodeKind::Key)
}

/// Picks the `_seq`/`_r-id`/`_id` synthetic key name per spec.md §4.7
/// step 7. Recursive lists (whose `snode` is a `REC`) get `_r-id`;
/// `SEQ`-labeled lists get `_seq`; everything else gets `_id`.
fn key_ident(ytree: &YTree, ltree: &LTree<'_>, list: YNodeId) -> String {
    let node = ytree.get(list);
    let is_rec = node
        .snode
        .map(|s| matches!(ltree.get(s).lens.kind, LensKind::Rec(_)))
        .unwrap_or(false);
    if is_rec {
        return "_r-id".to_owned();
    }
    let is_seq = node
        .label
        .map(|l| matches!(ltree.get(l).lens.kind, LensKind::Seq))
        .unwrap_or(false);
    if is_seq {
        return "_seq".to_owned();
    }
    "_id".to_owned()
}
