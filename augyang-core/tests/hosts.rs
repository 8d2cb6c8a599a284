//
// Copyright (c) The augyang Contributors
//
// SPDX-License-Identifier: MIT
//

//! End-to-end scenario test for an `/etc/hosts`-shaped lens (spec.md
//! §8.2 scenario 1): a leading `config-file` leaf followed by a starred
//! list of host entries keyed by `_seq`, each with `ipaddr`, `canonical`
//! and a `leaf-list alias`.

use augyang_core::{Diagnostics, Lens, LensKind, Module, Pipeline, Regexp};

fn leaf(kind: LensKind) -> Lens {
    Lens::new(kind)
}

/// A leaf entry: `SUBTREE(KEY(literal) + STORE(regex))`.
fn field_subtree(label_literal: &str, value_regex: &str) -> Lens {
    let key = leaf(LensKind::Key).with_literal(label_literal);
    let store = leaf(LensKind::Store).with_regexp(Regexp::new(value_regex));
    let concat = leaf(LensKind::Concat(vec![key, store]));
    leaf(LensKind::Subtree(Box::new(concat)))
}

fn hosts_module() -> Module {
    let config_file = field_subtree("config-file", "#.*\n");

    let seq = leaf(LensKind::Seq).with_name("host");
    let ipaddr = field_subtree("ipaddr", "[0-9.]+");
    let canonical = field_subtree("canonical", "[A-Za-z0-9.-]+");
    let alias_entry = field_subtree("alias", "[A-Za-z0-9.-]+");
    let aliases = leaf(LensKind::Star(Box::new(alias_entry)));

    let entry_concat = leaf(LensKind::Concat(vec![seq, ipaddr, canonical, aliases]));
    let entry_subtree = leaf(LensKind::Subtree(Box::new(entry_concat)));
    let entries = leaf(LensKind::Star(Box::new(entry_subtree)));

    let root = leaf(LensKind::Concat(vec![config_file, entries]));
    Module::new("hosts", root)
}

#[test]
fn hosts_scenario_shape() {
    let module = hosts_module();
    let mut diagnostics = Diagnostics::new();
    let yang = Pipeline::new(&module).compile(&mut diagnostics).unwrap();

    assert!(yang.contains("container hosts {"), "{yang}");
    assert!(yang.contains("leaf config-file {"), "{yang}");
    assert!(yang.contains("list host-list {"), "{yang}");
    assert!(yang.contains("key \"_seq\";"), "{yang}");
    assert!(yang.contains("leaf _seq {"), "{yang}");
    let seq_leaf = yang.split("leaf _seq {").nth(1).expect("leaf _seq present");
    assert!(seq_leaf.contains("type uint64;"), "{yang}");
    assert!(yang.contains("leaf ipaddr {"), "{yang}");
    assert!(yang.contains("leaf canonical {"), "{yang}");
    assert!(yang.contains("leaf-list alias {"), "{yang}");
    assert!(diagnostics.is_empty());
}
