//
// Copyright (c) The augyang Contributors
//
// SPDX-License-Identifier: MIT
//

//! The P-tree: a wrapper tree over a parsed [`TermSource`], cross-linked
//! to the [`LTree`] by source span so identifier references in `.aug`
//! source can be resolved back to the lens expression that defines them
//! (spec.md §4.2).

use std::collections::HashMap;

use crate::error::Error;
use crate::lens::Span;
use crate::ltree::{LNodeId, LTree};
use crate::term::{Term, TermFlags, TermKind, TermSource};

/// Index of a [`PNode`] within its owning [`PTree`]. Stable for the
/// lifetime of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PNodeId(pub u32);

/// A wrapper over one node of the parsed term tree.
#[derive(Debug, Clone)]
pub struct PNode<'a> {
    pub parent: Option<PNodeId>,
    pub first_child: Option<PNodeId>,
    pub next_sibling: Option<PNodeId>,
    pub descendants: u32,

    pub term: &'a Term,
    pub flags: TermFlags,
    /// The lens node this term corresponds to, once cross-linked by span.
    pub lnode: Option<LNodeId>,
    /// For `Ident` terms: the bind this identifier resolves to, once
    /// name resolution has run.
    pub resolves_to: Option<PNodeId>,
}

/// The P-tree: a stable array of [`PNode`]s plus the index of its root.
#[derive(Debug)]
pub struct PTree<'a> {
    nodes: Vec<PNode<'a>>,
    root: PNodeId,
    /// Top-level `let name = ...` binds, by name (spec.md §4.2 "Unqualified
    /// name matching a top-level BIND").
    binds: HashMap<String, PNodeId>,
}

impl<'a> PTree<'a> {
    pub fn get(&self, id: PNodeId) -> &PNode<'a> {
        &self.nodes[id.0 as usize]
    }

    fn get_mut(&mut self, id: PNodeId) -> &mut PNode<'a> {
        &mut self.nodes[id.0 as usize]
    }

    pub fn root_id(&self) -> PNodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn children(&self, id: PNodeId) -> impl Iterator<Item = PNodeId> + '_ {
        let mut cur = self.get(id).first_child;
        std::iter::from_fn(move || {
            let next = cur?;
            cur = self.get(next).next_sibling;
            Some(next)
        })
    }

    pub fn walk(&self, id: PNodeId) -> impl Iterator<Item = PNodeId> + '_ {
        let mut stack = vec![id];
        std::iter::from_fn(move || {
            let cur = stack.pop()?;
            let mut children: Vec<PNodeId> = self.children(cur).collect();
            children.reverse();
            stack.extend(children);
            Some(cur)
        })
    }

    /// Looks up a top-level bind by name (used for module-qualified and
    /// unqualified `IDENT` resolution, spec.md §4.2).
    pub fn bind(&self, name: &str) -> Option<PNodeId> {
        self.binds.get(name).copied()
    }
}

/// Builds the P-tree for `source`, then cross-links it against `ltree` by
/// source span and resolves `IDENT` terms to their defining bind.
///
/// Mirrors the two-pass structure of the original implementation: first
/// build the wrapper tree, then a second pass performs span correlation
/// and name resolution, since a `BIND`'s body may be defined later in the
/// same file than the reference to it.
pub fn build<'a>(source: &'a TermSource, ltree: &LTree<'a>) -> Result<PTree<'a>, Error> {
    let mut nodes = Vec::new();
    let mut binds = HashMap::new();
    let root = build_subtree(&mut nodes, &mut binds, &source.root, None, 0);

    let mut tree = PTree { nodes, root, binds };
    cross_link(&mut tree, ltree);
    resolve_idents(&mut tree);

    Ok(tree)
}

fn build_subtree<'a>(
    nodes: &mut Vec<PNode<'a>>,
    binds: &mut HashMap<String, PNodeId>,
    term: &'a Term,
    parent: Option<PNodeId>,
    depth: u32,
) -> PNodeId {
    let id = PNodeId(nodes.len() as u32);
    nodes.push(PNode {
        parent,
        first_child: None,
        next_sibling: None,
        descendants: 0,
        term,
        flags: TermFlags::default(),
        lnode: None,
        resolves_to: None,
    });

    // Top-level binds are direct children of the module's root term.
    if depth == 1 {
        if let TermKind::Bind { name } = &term.kind {
            binds.insert(name.clone(), id);
        }
    }

    let mut prev: Option<PNodeId> = None;
    let mut descendants = 0u32;
    for child in &term.children {
        let child_id = build_subtree(nodes, binds, child, Some(id), depth + 1);
        descendants += 1 + nodes[child_id.0 as usize].descendants;
        match prev {
            Some(p) => nodes[p.0 as usize].next_sibling = Some(child_id),
            None => nodes[id.0 as usize].first_child = Some(child_id),
        }
        prev = Some(child_id);
    }
    nodes[id.0 as usize].descendants = descendants;

    id
}

/// Builds a `span -> LNodeId` index and attaches matching `PNode`s.
///
/// Only `SUBTREE`/leaf lens spans are indexed: `CONCAT`/`UNION` wrapper
/// lenses don't carry a meaningful source span of their own in the
/// external compiler's output.
fn cross_link(ptree: &mut PTree<'_>, ltree: &LTree<'_>) {
    let mut by_span: HashMap<Span, LNodeId> = HashMap::new();
    for id in ltree.walk(ltree.root_id()) {
        let span = &ltree.get(id).lens.span;
        if span.line != 0 {
            by_span.entry(span.clone()).or_insert(id);
        }
    }

    for id in ptree.walk(ptree.root_id()) {
        let span = &ptree.get(id).term.span;
        if let Some(lnode) = by_span.get(span) {
            ptree.get_mut(id).lnode = Some(*lnode);
        }
    }
}

/// Resolves every `Ident` term to the bind it names, per spec.md §4.2's
/// priority order: an unqualified name first matches a top-level bind in
/// the same file; a `module.name` qualified reference is left unresolved
/// here (it names a bind in another module, outside this tree).
fn resolve_idents(ptree: &mut PTree<'_>) {
    let ids: Vec<PNodeId> = ptree.walk(ptree.root_id()).collect();
    for id in ids {
        let name = match &ptree.get(id).term.kind {
            TermKind::Ident { name } if !name.contains('.') => Some(name.clone()),
            _ => None,
        };
        let Some(name) = name else { continue };
        if let Some(target) = ptree.bind(&name) {
            if target != id {
                ptree.get_mut(id).resolves_to = Some(target);
                ptree.get_mut(id).flags.is_ident_ref = true;
            }
        }
    }

    // Propagate has_regexp/reg_minus bottom-up once idents are resolved.
    for id in ids_post_order(ptree) {
        let term = ptree.get(id);
        let mut has_regexp = matches!(term.term.kind, TermKind::Regexp(_));
        let mut reg_minus = matches!(term.term.kind, TermKind::Minus);
        if let Some(target) = term.resolves_to {
            has_regexp |= ptree.get(target).flags.has_regexp;
            reg_minus |= ptree.get(target).flags.reg_minus;
        }
        for child in ptree.children(id).collect::<Vec<_>>() {
            has_regexp |= ptree.get(child).flags.has_regexp;
            reg_minus |= ptree.get(child).flags.reg_minus;
        }
        let node = ptree.get_mut(id);
        node.flags.has_regexp = has_regexp;
        node.flags.reg_minus = reg_minus;
    }
}

fn ids_post_order(ptree: &PTree<'_>) -> Vec<PNodeId> {
    let mut order: Vec<PNodeId> = ptree.walk(ptree.root_id()).collect();
    order.reverse();
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens::{Lens, LensKind, LensPayload};

    fn span(line: u32) -> Span {
        Span {
            file: "test.aug".into(),
            line,
            column: 1,
        }
    }

    #[test]
    fn cross_links_by_span() {
        let lens = Lens {
            kind: LensKind::Store,
            payload: LensPayload::Regexp(crate::lens::Regexp::new("[a-z]+")),
            span: span(3),
            name: None,
        };
        let module = crate::lens::Module::new("test", lens);
        let ltree = crate::ltree::build(&module, false).unwrap();

        let term = Term::new(TermKind::Regexp(crate::lens::Regexp::new("[a-z]+")), span(3));
        let source = TermSource {
            filename: "test.aug".to_owned(),
            root: term,
        };
        let ptree = build(&source, &ltree).unwrap();
        assert_eq!(ptree.get(ptree.root_id()).lnode, Some(ltree.root_id()));
    }

    #[test]
    fn resolves_unqualified_ident_to_bind() {
        let bind_body = Term::new(TermKind::Regexp(crate::lens::Regexp::new("[a-z]+")), span(1));
        let bind = Term::new(
            TermKind::Bind {
                name: "word".to_owned(),
            },
            span(1),
        )
        .with_children(vec![bind_body]);
        let reference = Term::new(
            TermKind::Ident {
                name: "word".to_owned(),
            },
            span(2),
        );
        let root = Term::new(TermKind::Other { label: "module" }, span(0))
            .with_children(vec![bind, reference]);
        let source = TermSource {
            filename: "test.aug".to_owned(),
            root,
        };

        let lens = Lens {
            kind: LensKind::Store,
            payload: LensPayload::None,
            span: span(0),
            name: None,
        };
        let module = crate::lens::Module::new("test", lens);
        let ltree = crate::ltree::build(&module, false).unwrap();

        let ptree = build(&source, &ltree).unwrap();
        let reference_id = ptree.children(ptree.root_id()).nth(1).unwrap();
        assert!(ptree.get(reference_id).resolves_to.is_some());
        assert!(ptree.get(reference_id).flags.has_regexp);
    }
}
