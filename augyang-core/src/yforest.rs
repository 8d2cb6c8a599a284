//
// Copyright (c) The augyang Contributors
//
// SPDX-License-Identifier: MIT
//

//! Y-forest construction (spec.md §4.3): walks the L-tree top-down,
//! creating one Y-node per `SUBTREE` (or `REC`) L-node, then wraps the
//! forest under the synthetic ROOT.

use crate::error::Error;
use crate::ltree::{LNode, LNodeId, LTree};
use crate::ynode::{YNodeId, YNodeKind, YTree};

/// Builds the initial Y-forest from `ltree`, parented under a fresh
/// [`YTree`]'s ROOT node.
pub fn build(ltree: &LTree<'_>) -> Result<YTree, Error> {
    let mut ytree = YTree::new();
    let root = ytree.root();
    build_under(ltree, ltree.root_id(), &mut ytree, root, None)?;
    Ok(ytree)
}

/// Recursively walks `lnode`'s subtree in `ltree`. Every `SUBTREE`/`REC`
/// L-node becomes a Y-node parented under `parent`; other L-node kinds
/// are only scanned for label/value/choice discovery and do not
/// themselves produce Y-nodes.
fn build_under(
    ltree: &LTree<'_>,
    lnode: LNodeId,
    ytree: &mut YTree,
    parent: YNodeId,
    enclosing_union: Option<LNodeId>,
) -> Result<(), Error> {
    use crate::lens::LensKind;

    let node = ltree.get(lnode);
    let is_subtree_like = node.lens.is_subtree_or_rec();

    let (y_parent, choice) = if is_subtree_like {
        let y = ytree.insert_at(parent, YNodeKind::Unknown);
        let kind = match &node.lens.kind {
            LensKind::Rec(_) => YNodeKind::Rec,
            _ => YNodeKind::Unknown,
        };
        ytree.get_mut(y).kind = kind;
        ytree.get_mut(y).snode = Some(lnode);

        let choice = find_enclosing_choice(ltree, lnode);
        ytree.get_mut(y).choice = choice;

        let (label, value) = scan_label_value(ltree, lnode);
        ytree.get_mut(y).label = label;
        ytree.get_mut(y).value = value;

        (y, None)
    } else {
        (parent, enclosing_union)
    };

    for child in ltree.children(lnode) {
        let child_enclosing = if matches!(ltree.get(lnode).lens.kind, LensKind::Union(_)) {
            Some(lnode)
        } else {
            choice
        };
        build_under(ltree, child, ytree, y_parent, child_enclosing)?;
    }

    Ok(())
}

/// Walks ancestors of `lnode` within the L-tree until either the
/// enclosing outer `SUBTREE` is reached or a `UNION` is found first
/// (spec.md §4.3).
///
/// Returns the L-node identifying the *branch* of the union actually
/// taken — the union's direct child on the path to `lnode` — rather than
/// the union itself, so that siblings sharing one branch (and therefore
/// one YANG `case`) are distinguishable from siblings in a different
/// branch of the same `choice` (spec.md §4.7 step 10).
fn find_enclosing_choice(ltree: &LTree<'_>, lnode: LNodeId) -> Option<LNodeId> {
    use crate::lens::LensKind;
    let mut prev = lnode;
    for ancestor in ltree.ancestors(lnode) {
        let anc = ltree.get(ancestor);
        if matches!(anc.lens.kind, LensKind::Union(_)) {
            return Some(prev);
        }
        if anc.lens.is_subtree_or_rec() {
            return None;
        }
        prev = ancestor;
    }
    None
}

/// The `UNION` L-node a branch identifier (as returned by
/// [`find_enclosing_choice`]) belongs to.
pub fn choice_union_of(ltree: &LTree<'_>, branch: LNodeId) -> Option<LNodeId> {
    ltree.get(branch).parent
}

/// Scans `lnode`'s own subtree (not crossing nested `SUBTREE`s) for the
/// first `KEY`/`LABEL`/`SEQ` L-node (the label) and the first
/// `STORE`/`VALUE` L-node (the value).
fn scan_label_value(ltree: &LTree<'_>, lnode: LNodeId) -> (Option<LNodeId>, Option<LNodeId>) {
    use crate::lens::LensKind;

    let mut label = None;
    let mut value = None;
    let mut stack: Vec<LNodeId> = ltree.children(lnode).collect();
    stack.reverse();
    while let Some(id) = stack.pop() {
        let n: &LNode<'_> = ltree.get(id);
        if n.lens.is_subtree_or_rec() {
            continue;
        }
        match &n.lens.kind {
            LensKind::Key | LensKind::Label | LensKind::Seq if label.is_none() => {
                label = Some(id);
            }
            LensKind::Store | LensKind::Value if value.is_none() => {
                value = Some(id);
            }
            _ => {}
        }
        let mut children: Vec<LNodeId> = ltree.children(id).collect();
        children.reverse();
        stack.extend(children);
    }
    (label, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens::{Lens, LensKind, LensPayload, Module, Regexp, Span};

    fn leaf(kind: LensKind) -> Lens {
        Lens {
            kind,
            payload: LensPayload::None,
            span: Span::default(),
            name: None,
        }
    }

    #[test]
    fn one_ynode_per_subtree() {
        let key = leaf(LensKind::Key).with_regexp(Regexp::new("name"));
        let store = leaf(LensKind::Store).with_regexp(Regexp::new("[a-z]+"));
        let concat = leaf(LensKind::Concat(vec![key, store]));
        let subtree = leaf(LensKind::Subtree(Box::new(concat)));
        let module = Module::new("test", subtree);
        let ltree = crate::ltree::build(&module, false).unwrap();

        let ytree = build(&ltree).unwrap();
        // ROOT + one SUBTREE-derived node.
        assert_eq!(ytree.len(), 2);
        let child = ytree.children(ytree.root()).next().unwrap();
        assert!(ytree.get(child).label.is_some());
        assert!(ytree.get(child).value.is_some());
    }

    #[test]
    fn label_prefers_first_candidate_over_last() {
        // CONCAT(KEY, DEL, LABEL): spec.md §4.3 picks the *first*
        // KEY/LABEL/SEQ child as the label, which here is the KEY, not
        // the trailing LABEL.
        let key = leaf(LensKind::Key).with_regexp(Regexp::new("name"));
        let del = leaf(LensKind::Del);
        let label = leaf(LensKind::Label).with_literal("marker");
        let concat = leaf(LensKind::Concat(vec![key, del, label]));
        let subtree = leaf(LensKind::Subtree(Box::new(concat)));
        let module = Module::new("test", subtree);
        let ltree = crate::ltree::build(&module, false).unwrap();

        let ytree = build(&ltree).unwrap();
        let child = ytree.children(ytree.root()).next().unwrap();
        let label_id = ytree.get(child).label.unwrap();
        assert!(matches!(ltree.get(label_id).lens.kind, LensKind::Key));
    }

    #[test]
    fn choice_set_from_enclosing_union() {
        let a = leaf(LensKind::Key).with_regexp(Regexp::new("a"));
        let a_subtree = leaf(LensKind::Subtree(Box::new(a)));
        let b = leaf(LensKind::Key).with_regexp(Regexp::new("b"));
        let b_subtree = leaf(LensKind::Subtree(Box::new(b)));
        let union = leaf(LensKind::Union(vec![a_subtree, b_subtree]));
        let module = Module::new("test", union);
        let ltree = crate::ltree::build(&module, false).unwrap();

        let ytree = build(&ltree).unwrap();
        for child in ytree.children(ytree.root()) {
            assert!(ytree.get(child).choice.is_some());
        }
    }
}
