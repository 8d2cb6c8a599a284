//
// Copyright (c) The augyang Contributors
//
// SPDX-License-Identifier: MIT
//

//! Command-line surface: argument parsing and the `-O`/`-s` output
//! routing, both genuinely part of this workspace rather than the
//! external-collaborator boundary.

use std::path::PathBuf;

use augyang_core::VerboseCode;
use clap::{App, Arg, ErrorKind};

pub struct Args {
    pub input: PathBuf,
    pub explicit: bool,
    pub include: Vec<String>,
    pub outdir: Option<PathBuf>,
    pub show: bool,
    pub vercode: VerboseCode,
}

/// Exit code to use when [`parse`] returns `Err`.
pub const EXIT_USAGE: i32 = 1;

pub fn parse() -> Result<Args, i32> {
    let app = App::new("augyang")
        .version(clap::crate_version!())
        .about("Compiles a compiled Augeas lens into a YANG 1.1 schema module")
        .arg(
            Arg::with_name("explicit")
                .short("e")
                .long("explicit")
                .help("Do not add the built-in lens directory to the search path"),
        )
        .arg(
            Arg::with_name("include")
                .short("I")
                .long("include")
                .value_name("DIR")
                .multiple(true)
                .number_of_values(1)
                .help("Add DIR to the lens search path"),
        )
        .arg(
            Arg::with_name("outdir")
                .short("O")
                .long("outdir")
                .value_name("DIR")
                .conflicts_with("show")
                .help("Write <MODULE>.yang into DIR (default: current directory)"),
        )
        .arg(
            Arg::with_name("show")
                .short("s")
                .long("show")
                .help("Write the YANG text to stdout instead of a file"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .value_name("HEX")
                .help("Set the debug dump checkpoint bitmask"),
        )
        .arg(
            Arg::with_name("input")
                .value_name("MODULE.aug")
                .required(true)
                .help("The Augeas lens source file to compile"),
        );

    let matches = match app.get_matches_safe() {
        Ok(m) => m,
        Err(err) if err.kind == ErrorKind::HelpDisplayed || err.kind == ErrorKind::VersionDisplayed => {
            print!("{err}");
            return Err(EXIT_USAGE);
        }
        Err(err) => {
            eprint!("{err}");
            return Err(EXIT_USAGE);
        }
    };

    let vercode = match matches.value_of("verbose") {
        Some(hex) => match u32::from_str_radix(hex.trim_start_matches("0x"), 16) {
            Ok(bits) => VerboseCode::from_bits_truncate(bits),
            Err(_) => {
                eprintln!("augyang: invalid -v/--verbose value {hex:?}, expected hex");
                return Err(EXIT_USAGE);
            }
        },
        None => VerboseCode::empty(),
    };

    Ok(Args {
        input: PathBuf::from(matches.value_of("input").expect("required")),
        explicit: matches.is_present("explicit"),
        include: matches
            .values_of("include")
            .map(|vs| vs.map(str::to_owned).collect())
            .unwrap_or_default(),
        outdir: matches.value_of("outdir").map(PathBuf::from),
        show: matches.is_present("show"),
        vercode,
    })
}
