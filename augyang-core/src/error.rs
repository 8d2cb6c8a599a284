//
// Copyright (c) The augyang Contributors
//
// SPDX-License-Identifier: MIT
//

//! Error taxonomy for the compiler pipeline.
//!
//! Every stage of the pipeline returns `Result<T, Error>`. A failing stage
//! aborts the enclosing pipeline call; partial trees are never emitted.

use std::fmt;

/// The maximum length of a standardized YANG identifier.
pub const MAX_IDENT_SIZE: usize = 64;

/// The maximum length of a translated YANG `pattern` string.
pub const MAX_REGEX_SIZE: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Any allocation failure. Realistically unreachable in a managed
    /// language, kept to preserve the exit-code contract of the original
    /// `augyang` CLI (exit code 2).
    Memory,
    /// The module has no root lens to compile.
    LensNotFound,
    /// A `REC` lens could not be shaped into a `LIST`/`LEAFREF` pair.
    RecUnsupported,
    /// An `insert_at`/`delete_at` round-trip invariant was violated.
    DebugSelfCheckFailed,
    /// No identifier source yielded a non-empty name.
    IdentNotFound,
    /// A standardized identifier exceeds [`MAX_IDENT_SIZE`].
    IdentTooLong,
    /// A translated regex exceeds [`MAX_REGEX_SIZE`].
    RegexTooLong,
    /// The external Augeas parser refused the source module.
    ParseFailed(String),
    /// An un-translatable character was found in a derived identifier.
    BadIdentChar(char),
    /// A local invariant was violated; these indicate a bug in the
    /// compiler itself rather than a problem with the input lens.
    Internal(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Memory => write!(f, "memory allocation failed"),
            Error::LensNotFound => write!(f, "lens was not found"),
            Error::RecUnsupported => {
                write!(f, "lens with tag 'REC' is not supported")
            }
            Error::DebugSelfCheckFailed => write!(f, "debug test failed"),
            Error::IdentNotFound => {
                write!(f, "identifier not found, output YANG is not valid")
            }
            Error::IdentTooLong => write!(
                f,
                "identifier is too long, output YANG is not valid"
            ),
            Error::RegexTooLong => {
                write!(f, "regex string is too long, output YANG is not valid")
            }
            Error::ParseFailed(reason) => {
                write!(f, "failed to parse augeas source: {reason}")
            }
            Error::BadIdentChar(ch) => {
                write!(f, "bad character '{ch}' in derived identifier")
            }
            Error::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

/// Maps an error to the English message the CLI prints on stderr.
///
/// Mirrors `augyang_get_error_message` from the original implementation.
pub fn error_message(err: &Error) -> String {
    format!("[augyang] ERROR: {err}.")
}

/// Non-fatal conditions collected during a compile. These are reported to
/// the user but never abort the pipeline.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{message}");
        self.warnings.push(message);
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }
}
