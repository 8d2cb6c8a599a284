//
// Copyright (c) The augyang Contributors
//
// SPDX-License-Identifier: MIT
//

//! Step 11: `when`-target wiring.
//!
//! Populates `when_ref`/`when_val` for `CASE` nodes whose selection is
//! discriminated by a literal tag also held by a preceding sibling leaf
//! — the common "tagged union leaf" shape, where one leaf's stored value
//! names which of several optional sibling structures is present. The
//! fully general trace of every lens combinator that can encode a
//! conditional-existence relationship is not attempted; see DESIGN.md.

use crate::error::Diagnostics;
use crate::ltree::LTree;
use crate::ynode::{YNodeFlags, YNodeId, YNodeKind, YTree};

fn lens_literal(ltree: &LTree<'_>, id: crate::ltree::LNodeId) -> Option<String> {
    for id in ltree.walk(id) {
        if let Some(lit) = ltree.get(id).lens.literal() {
            return Some(lit.to_owned());
        }
    }
    None
}

pub fn wire_when(ytree: &mut YTree, ltree: &LTree<'_>, diagnostics: &mut Diagnostics) {
    for parent in ytree.walk_all() {
        let children: Vec<YNodeId> = ytree.children(parent).collect();
        let discriminators: Vec<(YNodeId, String)> = children
            .iter()
            .filter(|&&c| matches!(ytree.get(c).kind, YNodeKind::Leaf | YNodeKind::Key))
            .filter_map(|&c| {
                ytree
                    .get(c)
                    .label
                    .and_then(|l| lens_literal(ltree, l))
                    .map(|lit| (c, lit))
            })
            .collect();

        for &case in children.iter().filter(|&&c| ytree.get(c).kind == YNodeKind::Case) {
            let Some(branch) = ytree.get(case).choice else {
                continue;
            };
            let Some(literal) = lens_literal(ltree, branch) else {
                continue;
            };
            if let Some(&(target, _)) = discriminators.iter().find(|(_, ident)| *ident == literal) {
                let target_stable_id = ytree.get(target).id;
                ytree.get_mut(case).when_ref = Some(target_stable_id);
                ytree.get_mut(case).when_val = Some(literal.clone());
                ytree.get_mut(target).flags |= YNodeFlags::WHEN_TARGET;
            }
        }
    }

    validate_when_targets(ytree, diagnostics);
}

/// Emits the two non-fatal warnings of spec.md §7: an unresolved `when`
/// target (the referenced id no longer exists) and a `when` value
/// containing an apostrophe, which XPath 1.0 cannot quote. Neither
/// failure aborts compilation; both simply suppress that one `when`.
fn validate_when_targets(ytree: &mut YTree, diagnostics: &mut Diagnostics) {
    let ids = ytree.walk_all();
    for id in ids {
        let (when_ref, when_val) = {
            let node = ytree.get(id);
            (node.when_ref, node.when_val.clone())
        };
        let Some(target_id) = when_ref else { continue };

        if ytree.position(target_id).is_none() {
            diagnostics.warn(format!(
                "when target {target_id} not found, omitting when statement"
            ));
            ytree.get_mut(id).when_ref = None;
            ytree.get_mut(id).when_val = None;
            continue;
        }

        if let Some(val) = when_val {
            if val.contains('\'') {
                // spec.md §7: not fatal, and not omitted either — the
                // emitter prints this one commented out since XPath 1.0
                // has no way to quote an apostrophe inside a literal.
                diagnostics.warn(format!(
                    "when value {val:?} contains an apostrophe, which XPath 1.0 cannot express; commenting out when statement"
                ));
            }
        }
    }
}
