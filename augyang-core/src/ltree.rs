//
// Copyright (c) The augyang Contributors
//
// SPDX-License-Identifier: MIT
//

//! The L-tree: a navigable wrapper tree over a compiled [`Lens`] DAG
//! (spec.md §4.1).
//!
//! L-nodes live in a stable array (a `Vec<LNode>` indexed by [`LNodeId`])
//! and are never moved or removed once built: positions are permanent for
//! the lifetime of the tree, matching the "L-tree and P-tree are built
//! once, are immutable thereafter" invariant of spec.md §3.9.

use bitflags::bitflags;

use crate::error::Error;
use crate::lens::{Lens, LensKind, Module};
use crate::ptree::PNodeId;

/// Index of an [`LNode`] within its owning [`LTree`]. Stable for the
/// lifetime of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LNodeId(pub u32);

bitflags! {
    /// Label/key shape flags computed while building the L-tree
    /// (spec.md §3.7).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LNodeFlags: u8 {
        /// `KEY`-tagged lens whose pattern has no regex content, so it
        /// behaves like a literal `LABEL`.
        const KEY_IS_LABEL = 0x01;
        /// `KEY` pattern is a union of identifier strings.
        const KEY_HAS_IDENTS = 0x02;
        /// `KEY` pattern is a single simple name.
        const KEY_NOREGEX = 0x04;
    }
}

/// A wrapper over one node of the lens DAG.
#[derive(Debug, Clone)]
pub struct LNode<'a> {
    pub parent: Option<LNodeId>,
    pub first_child: Option<LNodeId>,
    pub next_sibling: Option<LNodeId>,
    /// Number of nodes in the subtree rooted here, excluding this node.
    pub descendants: u32,

    pub lens: &'a Lens,
    pub module: &'a str,
    /// Non-owning link into the parallel P-tree (§4.2 cross-linking).
    pub pnode: Option<PNodeId>,
    pub flags: LNodeFlags,
}

/// The L-tree: a stable array of [`LNode`]s plus the index of its root.
#[derive(Debug)]
pub struct LTree<'a> {
    nodes: Vec<LNode<'a>>,
    root: LNodeId,
}

impl<'a> LTree<'a> {
    pub fn get(&self, id: LNodeId) -> &LNode<'a> {
        &self.nodes[id.0 as usize]
    }

    pub fn root_id(&self) -> LNodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, id: LNodeId) -> impl Iterator<Item = LNodeId> + '_ {
        let mut cur = self.get(id).first_child;
        std::iter::from_fn(move || {
            let next = cur?;
            cur = self.get(next).next_sibling;
            Some(next)
        })
    }

    /// Walks ancestors (not including `id` itself) up to, but excluding,
    /// the node at `stop` (exclusive boundary used when scanning a single
    /// `SUBTREE`'s own descendants per §4.3).
    pub fn ancestors(&self, id: LNodeId) -> impl Iterator<Item = LNodeId> + '_ {
        let mut cur = self.get(id).parent;
        std::iter::from_fn(move || {
            let next = cur?;
            cur = self.get(next).parent;
            Some(next)
        })
    }

    /// Depth-first pre-order walk of the whole subtree rooted at `id`,
    /// including `id` itself.
    pub fn walk(&self, id: LNodeId) -> impl Iterator<Item = LNodeId> + '_ {
        let mut stack = vec![id];
        std::iter::from_fn(move || {
            let cur = stack.pop()?;
            let mut children: Vec<LNodeId> = self.children(cur).collect();
            children.reverse();
            stack.extend(children);
            Some(cur)
        })
    }

    fn set_flags(nodes: &mut [LNode<'_>]) {
        for node in nodes.iter_mut() {
            if matches!(node.lens.kind, LensKind::Key) {
                node.flags = classify_key_pattern(node.lens);
            }
        }
    }
}

/// Classifies a `KEY`-tagged lens' pattern per spec.md §4.1: a pattern
/// made up only of identifier characters (letters, digits, `_`, `-`,
/// `.`, escaped `.`/`-`/`+`, and the caseless-single-character pattern
/// `[Aa]`) triggers `KEY_NOREGEX`; a pattern with no regex metacharacters
/// at all is `KEY_IS_LABEL`; a top-level union of such identifiers is
/// `KEY_HAS_IDENTS`.
fn classify_key_pattern(lens: &Lens) -> LNodeFlags {
    let Some(re) = lens.regexp() else {
        return LNodeFlags::KEY_IS_LABEL;
    };
    let pattern = re.pattern.as_str();

    if pattern.contains('|') && is_identifier_union(pattern) {
        return LNodeFlags::KEY_HAS_IDENTS;
    }
    if is_plain_identifier(pattern) {
        return LNodeFlags::KEY_NOREGEX;
    }
    if !has_regex_metachar(pattern) {
        return LNodeFlags::KEY_IS_LABEL;
    }
    LNodeFlags::empty()
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

fn is_plain_identifier(pattern: &str) -> bool {
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if !matches!(chars.next(), Some('.') | Some('-') | Some('+')) {
                    return false;
                }
            }
            '[' => {
                // caseless-single-character pattern [Aa]
                let a = chars.next();
                let b = chars.next();
                let close = chars.next();
                match (a, b, close) {
                    (Some(a), Some(b), Some(']'))
                        if a.to_ascii_lowercase() == b.to_ascii_lowercase() => {}
                    _ => return false,
                }
            }
            c if is_ident_char(c) => {}
            _ => return false,
        }
    }
    true
}

fn is_identifier_union(pattern: &str) -> bool {
    pattern.split('|').all(is_plain_identifier)
}

fn has_regex_metachar(pattern: &str) -> bool {
    pattern
        .chars()
        .any(|c| matches!(c, '*' | '+' | '?' | '(' | ')' | '[' | ']' | '|' | '^' | '$'))
}

/// Counts the total number of lens nodes reachable from `root` and
/// reports whether a `REC` lens occurs anywhere in the subtree.
fn count_lenses(root: &Lens) -> (usize, bool) {
    let mut count = 0;
    let mut has_rec = false;
    let mut stack = vec![root];
    while let Some(lens) = stack.pop() {
        count += 1;
        if matches!(lens.kind, LensKind::Rec(_)) {
            has_rec = true;
        }
        stack.extend(lens.children());
        if let Some(child) = lens.child() {
            stack.push(child);
        }
    }
    (count, has_rec)
}

/// Builds the L-tree for `module`'s root lens (spec.md §4.1).
///
/// `allow_rec` should be `true` once the rest of the pipeline is able to
/// shape `REC` lenses into `LIST`/`LEAFREF` pairs (§4.7 step 9); when
/// `false`, any `REC` lens aborts the build with
/// [`Error::RecUnsupported`].
pub fn build<'a>(
    module: &'a Module,
    allow_rec: bool,
) -> Result<LTree<'a>, Error> {
    let root_lens = module.root.as_ref().ok_or(Error::LensNotFound)?;
    let (count, has_rec) = count_lenses(root_lens);
    if has_rec && !allow_rec {
        return Err(Error::RecUnsupported);
    }

    let mut nodes: Vec<LNode<'a>> = Vec::with_capacity(count);
    let root = build_subtree(&mut nodes, module, root_lens, None);
    LTree::set_flags(&mut nodes);

    Ok(LTree { nodes, root })
}

fn build_subtree<'a>(
    nodes: &mut Vec<LNode<'a>>,
    module: &'a Module,
    lens: &'a Lens,
    parent: Option<LNodeId>,
) -> LNodeId {
    let id = LNodeId(nodes.len() as u32);
    nodes.push(LNode {
        parent,
        first_child: None,
        next_sibling: None,
        descendants: 0,
        lens,
        module: module.name.as_str(),
        pnode: None,
        flags: LNodeFlags::empty(),
    });

    let child_lenses: Vec<&'a Lens> = match &lens.kind {
        LensKind::Concat(children) | LensKind::Union(children) => {
            children.iter().collect()
        }
        LensKind::Subtree(c)
        | LensKind::Star(c)
        | LensKind::Maybe(c)
        | LensKind::Square(c) => vec![c.as_ref()],
        _ => Vec::new(),
    };

    let mut prev: Option<LNodeId> = None;
    let mut descendants = 0u32;
    for child_lens in child_lenses {
        let child_id = build_subtree(nodes, module, child_lens, Some(id));
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens::{LensPayload, Span};

    fn leaf(kind: LensKind) -> Lens {
        Lens {
            kind,
            payload: LensPayload::None,
            span: Span::default(),
            name: None,
        }
    }

    #[test]
    fn descendants_are_exact() {
        let seq = leaf(LensKind::Seq);
        let del = leaf(LensKind::Del);
        let store = leaf(LensKind::Store).with_regexp(crate::lens::Regexp::new("[a-z]+"));
        let concat = leaf(LensKind::Concat(vec![seq, del, store]));
        let subtree = leaf(LensKind::Subtree(Box::new(concat)));
        let module = Module::new("test", subtree);

        let tree = build(&module, false).unwrap();
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.get(tree.root_id()).descendants, 4);
    }

    #[test]
    fn key_noregex_flag() {
        let key = leaf(LensKind::Key).with_regexp(crate::lens::Regexp::new("name"));
        let module = Module::new("test", key);
        let tree = build(&module, false).unwrap();
        assert!(tree
            .get(tree.root_id())
            .flags
            .contains(LNodeFlags::KEY_NOREGEX));
    }

    #[test]
    fn key_has_idents_flag() {
        let key = leaf(LensKind::Key).with_regexp(crate::lens::Regexp::new("a|b|c"));
        let module = Module::new("test", key);
        let tree = build(&module, false).unwrap();
        assert!(tree
            .get(tree.root_id())
            .flags
            .contains(LNodeFlags::KEY_HAS_IDENTS));
    }

    #[test]
    fn rec_lens_rejected_when_unsupported() {
        let rec = leaf(LensKind::Rec("body".to_owned()));
        let module = Module::new("test", rec);
        assert_eq!(build(&module, false).unwrap_err(), Error::RecUnsupported);
    }
}
