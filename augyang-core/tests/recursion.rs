//
// Copyright (c) The augyang Contributors
//
// SPDX-License-Identifier: MIT
//

//! End-to-end test for `REC` lens resolution (spec.md §4.7 step 9, §9
//! design note): a self-referential list gets a `_r-id` key and its
//! `REC` occurrence becomes a `leafref` pointing back at it.

use augyang_core::{Diagnostics, Lens, LensKind, Module, Pipeline, Regexp};

fn leaf(kind: LensKind) -> Lens {
    Lens::new(kind)
}

fn field_subtree(label_literal: &str, value_regex: &str) -> Lens {
    let key = leaf(LensKind::Key).with_literal(label_literal);
    let store = leaf(LensKind::Store).with_regexp(Regexp::new(value_regex));
    let concat = leaf(LensKind::Concat(vec![key, store]));
    leaf(LensKind::Subtree(Box::new(concat)))
}

fn recursive_module() -> Module {
    let marker = leaf(LensKind::Label).with_literal("group");
    let name = field_subtree("name", "[a-z]+");
    let nested = leaf(LensKind::Maybe(Box::new(leaf(LensKind::Rec("group".to_owned())))));

    let entry_concat = leaf(LensKind::Concat(vec![marker, name, nested]));
    let entry_subtree = leaf(LensKind::Subtree(Box::new(entry_concat)));
    let entries = leaf(LensKind::Star(Box::new(entry_subtree)));

    Module::new("groups", entries)
}

#[test]
fn recursive_lens_becomes_self_referential_leafref() {
    let module = recursive_module();
    let mut diagnostics = Diagnostics::new();
    let yang = Pipeline::new(&module).compile(&mut diagnostics).unwrap();

    assert!(yang.contains("key \"_r-id\";"), "{yang}");
    assert!(yang.contains("type leafref {"), "{yang}");
    assert!(yang.contains("path \"../_r-id\";"), "{yang}");
}
