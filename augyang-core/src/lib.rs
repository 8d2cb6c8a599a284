//
// Copyright (c) The augyang Contributors
//
// SPDX-License-Identifier: MIT
//

//! Compiles a compiled Augeas lens definition into a YANG 1.1 schema
//! module, annotated with `augex:data-path`/`augex:value-yang-path`
//! extension statements.
//!
//! The pipeline runs in five stages: build the L-tree ([`ltree`]), build
//! and cross-link the P-tree ([`ptree`]), build the Y-forest ([`yforest`]
//! + [`classify`]), run the ordered transformation pipeline
//! ([`transform`]), then emit YANG text ([`emit`]). [`Pipeline::compile`]
//! is the single entry point that runs all of it.

pub mod classify;
pub mod dict;
pub mod emit;
pub mod error;
pub mod ident;
pub mod lens;
pub mod ltree;
pub mod pattern;
pub mod ptree;
pub mod regex_translate;
pub mod term;
pub mod transform;
pub mod yforest;
pub mod ynode;

use bitflags::bitflags;

pub use error::{error_message, Diagnostics, Error};
pub use lens::{Lens, LensKind, LensPayload, Module, Regexp, Span};
pub use term::{Term, TermFlags, TermKind, TermSource};

bitflags! {
    /// Debug dump checkpoints (spec.md §6.1 `vercode`), set by the `-v`
    /// CLI flag. Each bit snapshots pipeline state to text without
    /// affecting the final compiled output.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct VerboseCode: u32 {
        /// Dump the L-tree (same text as [`print_input_lenses`]).
        const LTREE = 0x01;
        /// Dump the Y-forest immediately after construction, before any
        /// transform runs.
        const YTREE = 0x02;
        /// Dump the Y-tree after all transform steps have run.
        const YTREE_AFTER_TRANS = 0x04;
        /// Dump after the removal transforms (steps 1-4).
        const TRANS_REMOVE = 0x08;
        /// Dump after root-container insertion (step 5).
        const TRANS_INSERT1 = 0x10;
        /// Annotate each emitted YANG node with its `id` as a trailing
        /// comment, to cross-reference a dump against the emitted text.
        const YNODE_ID_IN_YANG = 0x20;
    }
}

/// Identifies which [`VerboseCode`] bit produced a given dump string in
/// [`Pipeline::compile_with_dumps`]'s return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    Ltree,
    Ytree,
    YtreeAfterTrans,
    TransRemove,
    TransInsert1,
}

/// Prints a flat textual dump of an L-tree, one line per node indented
/// by depth, for `print_input_lenses`/the `LTREE` dump checkpoint.
fn dump_ltree(tree: &ltree::LTree<'_>) -> String {
    use std::fmt::Write as _;
    let mut out = String::new();
    let mut depth_of = std::collections::HashMap::new();
    depth_of.insert(tree.root_id(), 0usize);
    for id in tree.walk(tree.root_id()) {
        let depth = *depth_of.get(&id).unwrap_or(&0);
        for child in tree.children(id) {
            depth_of.insert(child, depth + 1);
        }
        let node = tree.get(id);
        writeln!(
            out,
            "{}{:?}{}",
            "  ".repeat(depth),
            node.lens.kind,
            node.lens
                .name
                .as_ref()
                .map(|n| format!(" ({n})"))
                .unwrap_or_default(),
        )
        .ok();
    }
    out
}

/// Prints a flat textual dump of a P-tree, one line per node indented by
/// depth, for `print_input_terms`.
fn dump_ptree(tree: &ptree::PTree<'_>) -> String {
    use std::fmt::Write as _;
    let mut out = String::new();
    let mut depth_of = std::collections::HashMap::new();
    depth_of.insert(tree.root_id(), 0usize);
    for id in tree.walk(tree.root_id()) {
        let depth = *depth_of.get(&id).unwrap_or(&0);
        for child in tree.children(id) {
            depth_of.insert(child, depth + 1);
        }
        writeln!(out, "{}{:?}", "  ".repeat(depth), tree.get(id).term.kind).ok();
    }
    out
}

/// Prints a flat textual dump of the current state of a Y-tree, one line
/// per node indented by depth, for the `YTREE`/`YTREE_AFTER_TRANS`/
/// `TRANS_REMOVE`/`TRANS_INSERT1` dump checkpoints.
fn dump_ytree(tree: &ynode::YTree) -> String {
    use std::fmt::Write as _;
    let mut out = String::new();
    let mut depth_of = std::collections::HashMap::new();
    depth_of.insert(tree.root(), 0usize);
    for id in tree.walk_all() {
        let depth = *depth_of.get(&id).unwrap_or(&0);
        for child in tree.children(id) {
            depth_of.insert(child, depth + 1);
        }
        let node = tree.get(id);
        writeln!(
            out,
            "{}{:?} {}",
            "  ".repeat(depth),
            node.kind,
            node.ident.as_deref().unwrap_or("<unnamed>"),
        )
        .ok();
    }
    out
}

/// Dumps `module`'s compiled lens tree as flat indented text, matching
/// the original `augparse -L`-style lens dump.
pub fn print_input_lenses(module: &Module) -> Result<String, Error> {
    let tree = ltree::build(module, true)?;
    Ok(dump_ltree(&tree))
}

/// Dumps `term_source`'s parsed term tree as flat indented text. Cross-
/// links it against `module`'s compiled lens tree first, matching the
/// original's two-pass structure (spec.md §4.2), but the dumped text only
/// reflects the term tree's own shape.
pub fn print_input_terms(term_source: &TermSource, module: &Module) -> Result<String, Error> {
    let ltree = ltree::build(module, true)?;
    let ptree = ptree::build(term_source, &ltree)?;
    Ok(dump_ptree(&ptree))
}

/// Runs the compiler pipeline end to end and returns only the final YANG
/// text, discarding any intermediate dumps (`vercode` is accepted for
/// parity with the original signature but dumps are only produced by
/// [`Pipeline::compile_with_dumps`]).
pub fn print_yang(module: &Module, vercode: VerboseCode) -> Result<String, Error> {
    let mut diagnostics = Diagnostics::new();
    let (text, _dumps) = Pipeline::new(module).compile_with_dumps(vercode, &mut diagnostics)?;
    Ok(text)
}

/// Bundles a module with the pipeline's entry points. A thin wrapper
/// (the pipeline itself holds no state across calls) kept so the dump-
/// producing variant reads as a method the way the original's `compile`
/// C function did.
pub struct Pipeline<'a> {
    module: &'a Module,
}

impl<'a> Pipeline<'a> {
    pub fn new(module: &'a Module) -> Self {
        Pipeline { module }
    }

    /// Runs L-tree -> Y-forest -> transform -> emit and returns the final
    /// YANG text, collecting non-fatal warnings into `diagnostics`.
    pub fn compile(&self, diagnostics: &mut Diagnostics) -> Result<String, Error> {
        let (text, _dumps) = self.compile_with_dumps(VerboseCode::empty(), diagnostics)?;
        Ok(text)
    }

    /// Like [`Self::compile`], additionally snapshotting pipeline state at
    /// every checkpoint set in `vercode`, in pipeline order.
    pub fn compile_with_dumps(
        &self,
        vercode: VerboseCode,
        diagnostics: &mut Diagnostics,
    ) -> Result<(String, Vec<(Checkpoint, String)>), Error> {
        let module_name = self.module.name.clone();
        tracing::debug!(module = %module_name, "building L-tree");
        let ltree = ltree::build(self.module, true).map_err(|err| {
            tracing::error!(%err, "failed to build L-tree");
            err
        })?;

        let mut dumps = Vec::new();
        if vercode.contains(VerboseCode::LTREE) {
            dumps.push((Checkpoint::Ltree, dump_ltree(&ltree)));
        }

        tracing::debug!("building Y-forest");
        let mut ytree = yforest::build(&ltree)?;
        classify::classify(&ltree, &mut ytree);
        if vercode.contains(VerboseCode::YTREE) {
            dumps.push((Checkpoint::Ytree, dump_ytree(&ytree)));
        }

        tracing::debug!("running transform pipeline");
        transform::cleanup::remove_unknown_leaves(&mut ytree);
        transform::cleanup::remove_comments(&mut ytree, &ltree);
        transform::cleanup::remove_useless_leaves(&mut ytree);
        transform::cleanup::remove_top_level_choice(&mut ytree);
        if vercode.contains(VerboseCode::TRANS_REMOVE) {
            dumps.push((Checkpoint::TransRemove, dump_ytree(&ytree)));
        }

        transform::root::insert_root_container(&mut ytree, &module_name);
        if vercode.contains(VerboseCode::TRANS_INSERT1) {
            dumps.push((Checkpoint::TransInsert1, dump_ytree(&ytree)));
        }

        transform::keys::synthesize_keys(&mut ytree, &ltree);
        transform::grouping::extract_groupings(&mut ytree);
        transform::recursion::resolve_recursion(&mut ytree).map_err(|err| {
            tracing::error!(%err, "failed to resolve recursive lens");
            err
        })?;
        transform::choice::shape_choices(&mut ytree, &ltree);
        transform::when::wire_when(&mut ytree, &ltree, diagnostics);
        transform::identifiers::assign_identifiers(&mut ytree, &ltree).map_err(|err| {
            tracing::error!(%err, "failed to assign identifiers");
            err
        })?;
        transform::identifiers::dedup_all_siblings(&mut ytree);

        if cfg!(debug_assertions) {
            ytree.check_descendants()?;
        }

        if vercode.contains(VerboseCode::YTREE_AFTER_TRANS) {
            dumps.push((Checkpoint::YtreeAfterTrans, dump_ytree(&ytree)));
        }

        tracing::debug!("emitting YANG");
        let annotate_ids = vercode.contains(VerboseCode::YNODE_ID_IN_YANG);
        let text = emit::emit_with_options(&module_name, &ltree, &ytree, annotate_ids)?;

        Ok((text, dumps))
    }
}
