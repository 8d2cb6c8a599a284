//
// Copyright (c) The augyang Contributors
//
// SPDX-License-Identifier: MIT
//

//! Step 5: wrap the whole forest in a single `CONTAINER` named after the
//! module.

use crate::ident;
use crate::ynode::{YNodeKind, YTree};

pub fn insert_root_container(ytree: &mut YTree, module_name: &str) {
    let root = ytree.root();
    let old_children: Vec<_> = ytree.children(root).collect();

    let container = ytree.insert_at(root, YNodeKind::Container);
    ytree.get_mut(container).ident = ident::standardize(module_name).ok();

    for child in old_children {
        ytree.move_under(child, container);
    }
}
