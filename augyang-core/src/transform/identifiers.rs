//
// Copyright (c) The augyang Contributors
//
// SPDX-License-Identifier: MIT
//

//! Steps 12-13: identifier assignment and sibling deduplication
//! (spec.md §4.10).

use crate::error::Error;
use crate::ident;
use crate::ltree::{LNodeId, LTree};
use crate::ynode::{YNodeId, YNodeKind, YTree};

fn lens_name(ltree: &LTree<'_>, id: LNodeId) -> Option<String> {
    let lens = &ltree.get(id).lens;
    lens.name.clone().or_else(|| lens.literal().map(str::to_owned))
}

/// True when `list` is the *only* thing the module's root container
/// holds — the whole config file is modeled as one repeated list, with
/// no sibling leaf/container standing alongside it. Lists that merely
/// sit at the top level among other siblings (e.g. a leading `config-
/// file` leaf next to the real entry list) don't qualify: they fall
/// through to the label-derived rules below instead of all collapsing
/// onto the module name.
fn is_module_root_parent(ytree: &YTree, list: YNodeId) -> bool {
    let Some(parent) = ytree.get(list).parent else {
        return false;
    };
    ytree.get(parent).parent == Some(ytree.root()) && ytree.child_count(parent) == 1
}

fn is_recursive_list(ytree: &YTree, list: YNodeId) -> bool {
    ytree
        .children(list)
        .any(|c| ytree.get(c).kind == YNodeKind::Key && ytree.get(c).ident.as_deref() == Some("_r-id"))
}

fn is_seq_list(ytree: &YTree, list: YNodeId) -> bool {
    ytree
        .children(list)
        .any(|c| ytree.get(c).kind == YNodeKind::Key && ytree.get(c).ident.as_deref() == Some("_seq"))
}

fn first_child_ident(ytree: &YTree, id: YNodeId) -> Option<String> {
    ytree.children(id).find_map(|c| ytree.get(c).ident.clone())
}

/// Picks the raw (pre-standardization) candidate name source for `id`
/// per the priority tables of spec.md §4.10.
fn candidate_source(ytree: &YTree, ltree: &LTree<'_>, id: YNodeId, module_name: &str) -> String {
    let node = ytree.get(id);
    match node.kind {
        // A CASE is a synthetic wrapper the choice-shaping transform
        // (step 10) introduces around an existing branch; it takes its
        // contained node's identifier rather than a name of its own, the
        // same way GROUPING borrows its first real child's identifier.
        YNodeKind::Case => ytree
            .children(id)
            .find(|&c| ytree.get(c).kind != YNodeKind::Leafref)
            .and_then(|c| ytree.get(c).ident.clone())
            .unwrap_or_else(|| "case".to_owned()),

        YNodeKind::Grouping => ytree
            .children(id)
            .find(|&c| ytree.get(c).kind != YNodeKind::Leafref)
            .and_then(|c| ytree.get(c).ident.clone())
            .or_else(|| node.snode.and_then(|s| lens_name(ltree, s)))
            .unwrap_or_else(|| "gr".to_owned()),

        YNodeKind::Leafref => {
            let referenced_child = node
                .reference
                .and_then(|list_id| ytree.position(list_id))
                .and_then(|list| {
                    ytree
                        .children(list)
                        .find(|&c| ytree.get(c).kind == YNodeKind::Key)
                })
                .and_then(|key| ytree.get(key).ident.clone())
                .unwrap_or_else(|| "id".to_owned());
            format!("_{referenced_child}-ref")
        }

        YNodeKind::Uses => node
            .reference
            .and_then(|g| ytree.position(g))
            .and_then(|g| ytree.get(g).ident.clone())
            .unwrap_or_else(|| "gr".to_owned()),

        YNodeKind::List if is_module_root_parent(ytree, id) => module_name.to_owned(),
        YNodeKind::List if is_recursive_list(ytree, id) => {
            format!("{}-list", first_child_ident(ytree, id).unwrap_or_else(|| "entry".to_owned()))
        }
        YNodeKind::List if is_seq_list(ytree, id) => node
            .label
            .and_then(|l| lens_name(ltree, l))
            .map(|s| format!("{s}-list"))
            .unwrap_or_else(|| "config-entries".to_owned()),
        YNodeKind::List => node
            .label
            .and_then(|l| lens_name(ltree, l))
            .or_else(|| first_child_ident(ytree, id).map(|s| format!("{s}-list")))
            .unwrap_or_else(|| "config-entries".to_owned()),

        YNodeKind::Key => {
            let label_is_plain = node
                .label
                .map(|l| {
                    let lnode = ltree.get(l);
                    matches!(lnode.lens.kind, crate::lens::LensKind::Label)
                        || lnode.flags.contains(crate::ltree::LNodeFlags::KEY_IS_LABEL)
                })
                .unwrap_or(false);
            if label_is_plain {
                node.value
                    .and_then(|v| lens_name(ltree, v))
                    .unwrap_or_else(|| "label".to_owned())
            } else {
                node.ident.clone().unwrap_or_else(|| "label".to_owned())
            }
        }

        YNodeKind::Value => node
            .value
            .and_then(|v| lens_name(ltree, v))
            .unwrap_or_else(|| "value".to_owned()),

        YNodeKind::Leaf | YNodeKind::LeafList | YNodeKind::Container => node
            .label
            .and_then(|l| lens_name(ltree, l))
            .or_else(|| node.snode.and_then(|s| lens_name(ltree, s)))
            .unwrap_or_else(|| "node".to_owned()),

        _ => "node".to_owned(),
    }
}

pub fn assign_identifiers(ytree: &mut YTree, ltree: &LTree<'_>) -> Result<(), Error> {
    let module_name = {
        let root_container = ytree.children(ytree.root()).next();
        root_container
            .and_then(|c| ytree.get(c).ident.clone())
            .unwrap_or_default()
    };

    // Assign in a fixed-point-free single bottom-up pass: children before
    // parents, so GROUPING/LIST sources that look at a child's ident see
    // it already populated.
    let mut ids = ytree.walk_all();
    ids.reverse();
    for id in ids {
        if id == ytree.root() || ytree.get(id).ident.is_some() {
            continue;
        }
        let raw = candidate_source(ytree, ltree, id, &module_name);
        let standardized = ident::standardize(&raw)?;
        ytree.get_mut(id).ident = Some(standardized);
    }
    Ok(())
}

/// Step 13: makes sibling identifiers unique, including `CASE` children
/// (so each branch's contribution to a `choice` doesn't collide with
/// another branch's).
pub fn dedup_all_siblings(ytree: &mut YTree) {
    let parents = ytree.walk_all();
    for parent in parents {
        let children: Vec<YNodeId> = ytree.children(parent).collect();
        if children.len() < 2 {
            continue;
        }
        let mut idents: Vec<String> = children
            .iter()
            .map(|&c| ytree.get(c).ident.clone().unwrap_or_default())
            .collect();
        ident::dedup_siblings(&mut idents);
        for (child, new_ident) in children.into_iter().zip(idents) {
            ytree.get_mut(child).ident = Some(new_ident);
        }
    }
}
