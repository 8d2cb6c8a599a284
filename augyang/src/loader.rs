//
// Copyright (c) The augyang Contributors
//
// SPDX-License-Identifier: MIT
//

//! Loads a module's compiled lens tree and parsed term tree from an
//! `.aug` source file.
//!
//! Parsing `.aug` source and compiling its lenses is the Augeas parser
//! and lens compiler's job — an external collaborator this workspace
//! treats as opaque and does not reimplement. A real deployment links
//! this seam against `libaugeas` (the same library the upstream `augyang`
//! C tool calls into); without that binding present, loading always
//! fails with [`augyang_core::Error::ParseFailed`].

use std::path::Path;

use augyang_core::{Error, Module, TermSource};

pub fn load(
    path: &Path,
    search_path: &[String],
    explicit: bool,
) -> Result<(Module, TermSource), Error> {
    let mut dirs = search_path.to_vec();
    if !explicit {
        dirs.push("/usr/share/augeas/lenses/dist".to_owned());
    }
    let _ = dirs;
    Err(Error::ParseFailed(format!(
        "{}: no Augeas lens compiler is linked into this build",
        path.display()
    )))
}
