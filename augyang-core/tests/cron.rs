//
// Copyright (c) The augyang Contributors
//
// SPDX-License-Identifier: MIT
//

//! End-to-end scenario test loosely modeled on `cron.aug` (spec.md §8.2
//! scenario 2): a repeated list of entries keyed by `_id`, each entry
//! choosing between a `shellvar`-style assignment and a `command`-style
//! entry.

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

fn cron_module() -> Module {
    let shellvar = field_subtree("shellvar", "[A-Za-z_]+=.*");
    let command = field_subtree("command", ".*");
    let union = leaf(LensKind::Union(vec![shellvar, command]));

    // A bare LABEL gives the entry itself a label (so it classifies as
    // a LIST) without naming a `_seq`/`_r-id` counter, so the fallback
    // `_id` key is synthesized in step 7.
    let marker = leaf(LensKind::Label);
    let entry_concat = leaf(LensKind::Concat(vec![marker, union]));
    let entry_subtree = leaf(LensKind::Subtree(Box::new(entry_concat)));
    let entries = leaf(LensKind::Star(Box::new(entry_subtree)));

    Module::new("cron", entries)
}

#[test]
fn cron_scenario_shape() {
    let module = cron_module();
    let mut diagnostics = Diagnostics::new();
    let yang = Pipeline::new(&module).compile(&mut diagnostics).unwrap();

    assert!(yang.contains("key \"_id\";"), "{yang}");
    assert!(yang.contains("choice "), "{yang}");
    assert!(yang.contains("case shellvar {"), "{yang}");
    assert!(yang.contains("case command {"), "{yang}");
    assert!(yang.contains("leaf shellvar {"), "{yang}");
    assert!(yang.contains("leaf command {"), "{yang}");
}
