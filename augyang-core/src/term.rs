//
// Copyright (c) The augyang Contributors
//
// SPDX-License-Identifier: MIT
//

//! The parsed-source-term boundary contract.
//!
//! A [`Term`] tree is what the external Augeas parser produces when it
//! parses a module's `.aug` source text (as opposed to the already
//! compiled [`crate::lens::Lens`] tree). `augyang-core` cross-links
//! [`crate::ptree::PNode`]s to [`crate::ltree::LNode`]s by source
//! location so that identifier references (`Rx.word`, `$seq`, ...) can be
//! resolved back to the expression that actually defines them.

use crate::lens::{Regexp, Span};

/// The term-tree counterpart of a lens combinator plus the few term-only
/// shapes that only appear in source (function definitions, binds,
/// bare identifier references).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermKind {
    /// `let name = ...` / `let name (params) = ...` at module scope.
    Bind { name: String },
    /// A function literal: `(params) -> body`.
    Func { params: Vec<String> },
    /// A bare identifier reference, either `name` or `module.name`.
    Ident { name: String },
    /// `A - B`, the Augeas regex-minus operator.
    Minus,
    /// `a*` / `a+` style repetition (augeas `REP`).
    Rep,
    /// A literal regexp appearing directly in source.
    Regexp(Regexp),
    /// Any other term kind not distinguished by name resolution or
    /// cross-linking (literals, concatenation, application, ...).
    Other { label: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermFlags {
    /// Set once identifier resolution determines this term is a pure
    /// `IDENT` reference (as opposed to a regexp-bearing term).
    pub is_ident_ref: bool,
    /// Set once identifier resolution determines this term (transitively)
    /// resolves to a regexp.
    pub has_regexp: bool,
    /// Set when the resolved expression uses the `MINUS` operator, which
    /// YANG can only express via a second `pattern ... { modifier
    /// invert-match; }` statement.
    pub reg_minus: bool,
}

impl Default for TermFlags {
    fn default() -> Self {
        TermFlags {
            is_ident_ref: false,
            has_regexp: false,
            reg_minus: false,
        }
    }
}

/// A single node of the parsed-source term tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub kind: TermKind,
    pub span: Span,
    pub children: Vec<Term>,
}

impl Term {
    pub fn new(kind: TermKind, span: Span) -> Self {
        Term {
            kind,
            span,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Term>) -> Self {
        self.children = children;
        self
    }
}

/// The result of invoking the external Augeas parser on a module's source
/// file: the term tree plus the top-level binds it defines (by name, for
/// §4.2 "Unqualified name matching a top-level BIND").
#[derive(Debug, Clone)]
pub struct TermSource {
    pub filename: String,
    pub root: Term,
}
