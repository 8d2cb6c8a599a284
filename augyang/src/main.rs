//
// Copyright (c) The augyang Contributors
//
// SPDX-License-Identifier: MIT
//

#![warn(rust_2018_idioms)]

mod cli;
mod loader;

use std::fs;
use std::path::Path;

use augyang_core::{error_message, Diagnostics, Pipeline};
use tracing::error;

const EXIT_OK: i32 = 0;
const EXIT_OPERATIONAL: i32 = 1;
const EXIT_MEMORY: i32 = 2;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

fn run(args: cli::Args) -> i32 {
    let (module, _term_source) = match loader::load(&args.input, &args.include, args.explicit) {
        Ok(loaded) => loaded,
        Err(err) => {
            error!(%err, "failed to load module");
            eprintln!("{}", error_message(&err));
            return EXIT_OPERATIONAL;
        }
    };

    let mut diagnostics = Diagnostics::new();
    let pipeline = Pipeline::new(&module);
    let yang = match pipeline.compile_with_dumps(args.vercode, &mut diagnostics) {
        Ok((yang, _dumps)) => yang,
        Err(augyang_core::Error::Memory) => return EXIT_MEMORY,
        Err(err) => {
            error!(%err, "compilation failed");
            eprintln!("{}", error_message(&err));
            return EXIT_OPERATIONAL;
        }
    };

    for warning in diagnostics.warnings() {
        eprintln!("augyang: warning: {warning}");
    }

    if args.show {
        println!("{yang}");
        return EXIT_OK;
    }

    let outdir = args.outdir.unwrap_or_else(|| Path::new(".").to_path_buf());
    let out_path = outdir.join(format!("{}.yang", module.name));
    if let Err(err) = fs::write(&out_path, yang) {
        error!(%err, path = %out_path.display(), "failed to write output file");
        eprintln!("augyang: ERROR: failed to write {}: {err}.", out_path.display());
        return EXIT_OPERATIONAL;
    }

    EXIT_OK
}

fn main() {
    init_tracing();

    let args = match cli::parse() {
        Ok(args) => args,
        Err(code) => std::process::exit(code),
    };

    std::process::exit(run(args));
}
