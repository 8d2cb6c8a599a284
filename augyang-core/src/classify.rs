//
// Copyright (c) The augyang Contributors
//
// SPDX-License-Identifier: MIT
//

//! Type classification (spec.md §4.6): assigns each forest-stage Y-node
//! its initial `kind` from whether it has a label, has children, and
//! sits under a `STAR` on the path up to its enclosing subtree.

use crate::lens::LensKind;
use crate::ltree::{LNodeId, LTree};
use crate::ynode::{YNodeKind, YTree};

/// Walks upward from `snode` through the L-tree until either the
/// enclosing outer `SUBTREE` is reached or a `STAR` is seen.
fn has_repetition(ltree: &LTree<'_>, snode: LNodeId) -> bool {
    for ancestor in ltree.ancestors(snode) {
        let anc = ltree.get(ancestor);
        if matches!(anc.lens.kind, LensKind::Star(_)) {
            return true;
        }
        if anc.lens.is_subtree_or_rec() {
            return false;
        }
    }
    false
}

/// Classifies every non-ROOT Y-node in `ytree` per the table in §4.6.
pub fn classify(ltree: &LTree<'_>, ytree: &mut YTree) {
    let ids = ytree.walk_all();
    for id in ids {
        if id == ytree.root() {
            continue;
        }
        let node = ytree.get(id);
        if matches!(node.kind, YNodeKind::Rec) {
            continue;
        }
        let has_label = node.label.is_some();
        let has_value = node.value.is_some();
        let has_children = ytree.child_count(id) > 0;
        let repeats = node
            .snode
            .map(|s| has_repetition(ltree, s))
            .unwrap_or(false);

        let kind = match (has_label, has_children, repeats) {
            (true, true, true) => YNodeKind::List,
            (true, true, false) => YNodeKind::Container,
            (true, false, true) => YNodeKind::LeafList,
            (true, false, false) => YNodeKind::Leaf,
            (false, _, _) => {
                if has_value {
                    YNodeKind::Leaf
                } else {
                    YNodeKind::Unknown
                }
            }
        };
        ytree.get_mut(id).kind = kind;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens::{Lens, LensKind as LK, LensPayload, Module, Regexp, Span};

    fn leaf(kind: LK) -> Lens {
        Lens {
            kind,
            payload: LensPayload::None,
            span: Span::default(),
            name: None,
        }
    }

    #[test]
    fn leaf_without_star_is_leaf() {
        let key = leaf(LK::Key).with_regexp(Regexp::new("name"));
        let store = leaf(LK::Store).with_regexp(Regexp::new("[a-z]+"));
        let concat = leaf(LK::Concat(vec![key, store]));
        let subtree = leaf(LK::Subtree(Box::new(concat)));
        let module = Module::new("test", subtree);
        let ltree = crate::ltree::build(&module, false).unwrap();
        let mut ytree = crate::yforest::build(&ltree).unwrap();
        classify(&ltree, &mut ytree);

        let child = ytree.children(ytree.root()).next().unwrap();
        assert_eq!(ytree.get(child).kind, YNodeKind::Leaf);
    }

    #[test]
    fn repeated_leaf_is_leaflist() {
        let key = leaf(LK::Key).with_regexp(Regexp::new("name"));
        let store = leaf(LK::Store).with_regexp(Regexp::new("[a-z]+"));
        let concat = leaf(LK::Concat(vec![key, store]));
        let subtree = leaf(LK::Subtree(Box::new(concat)));
        let starred = leaf(LK::Star(Box::new(subtree)));
        let module = Module::new("test", starred);
        let ltree = crate::ltree::build(&module, false).unwrap();
        let mut ytree = crate::yforest::build(&ltree).unwrap();
        classify(&ltree, &mut ytree);

        let child = ytree.children(ytree.root()).next().unwrap();
        assert_eq!(ytree.get(child).kind, YNodeKind::LeafList);
    }
}
