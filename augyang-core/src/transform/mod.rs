//
// Copyright (c) The augyang Contributors
//
// SPDX-License-Identifier: MIT
//

//! The ordered Y-tree transformation pipeline (spec.md §4.7).
//!
//! Each submodule implements one (or a closely related pair of) the
//! thirteen steps. [`run`] applies them in the exact order the
//! specification pins: later steps and the emitter depend on it.

pub mod choice;
pub mod cleanup;
pub mod grouping;
pub mod identifiers;
pub mod keys;
pub mod recursion;
pub mod root;
pub mod when;

use crate::error::{Diagnostics, Error};
use crate::ltree::LTree;
use crate::ynode::YTree;

/// Bundles the inputs every transform step needs: the immutable L-tree
/// it cross-references, the module name (used by step 5 and several
/// identifier sources), and the diagnostics sink for non-fatal warnings.
pub struct Context<'a, 'b> {
    pub ltree: &'a LTree<'a>,
    pub module_name: &'a str,
    pub diagnostics: &'b mut Diagnostics,
}

/// Runs all thirteen transformation steps against `ytree` in order.
pub fn run(ytree: &mut YTree, ctx: &mut Context<'_, '_>) -> Result<(), Error> {
    cleanup::remove_unknown_leaves(ytree);
    cleanup::remove_comments(ytree, ctx.ltree);
    cleanup::remove_useless_leaves(ytree);
    cleanup::remove_top_level_choice(ytree);
    root::insert_root_container(ytree, ctx.module_name);
    keys::synthesize_keys(ytree, ctx.ltree);
    grouping::extract_groupings(ytree);
    recursion::resolve_recursion(ytree)?;
    choice::shape_choices(ytree, ctx.ltree);
    when::wire_when(ytree, ctx.ltree, ctx.diagnostics);
    identifiers::assign_identifiers(ytree, ctx.ltree)?;
    identifiers::dedup_all_siblings(ytree);

    if cfg!(debug_assertions) {
        ytree.check_descendants()?;
    }

    Ok(())
}
