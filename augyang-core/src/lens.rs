//
// Copyright (c) The augyang Contributors
//
// SPDX-License-Identifier: MIT
//

//! The lens boundary contract.
//!
//! A [`Lens`] is the shape produced by the external Augeas lens compiler
//! (treated as an opaque collaborator per the scope note in the system
//! overview). `augyang-core` never constructs a [`Lens`] tree from raw
//! configuration text itself; it only walks trees handed to it.

use std::rc::Rc;

/// Source location of a lens, carried through for diagnostics and for
/// cross-linking lenses to parsed source terms (see [`crate::ptree`]).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Span {
    pub file: Rc<str>,
    pub line: u32,
    pub column: u32,
}

/// A compiled regular expression as produced by the lens compiler.
///
/// `pattern` is the Augeas-flavored POSIX ERE source text; `nocase`
/// indicates the pattern was compiled with case-insensitive matching
/// (Augeas' `Rx.word`-style helpers commonly use this).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regexp {
    pub pattern: String,
    pub nocase: bool,
}

impl Regexp {
    pub fn new(pattern: impl Into<String>) -> Self {
        Regexp {
            pattern: pattern.into(),
            nocase: false,
        }
    }

    pub fn nocase(pattern: impl Into<String>) -> Self {
        Regexp {
            pattern: pattern.into(),
            nocase: true,
        }
    }
}

/// Payload a lens carries: a literal string, a compiled regexp, or
/// nothing at all (e.g. `DEL` with only a default string, `CONCAT`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LensPayload {
    None,
    Literal(String),
    Regexp(Regexp),
}

/// The closed set of lens variants (spec.md §3.1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LensKind {
    Del,
    Store,
    Value,
    Key,
    Label,
    Seq,
    Counter,
    Concat(Vec<Lens>),
    Union(Vec<Lens>),
    Subtree(Box<Lens>),
    Star(Box<Lens>),
    Maybe(Box<Lens>),
    /// Back-reference to a recursive lens body, named by the `BIND`
    /// identifier it recurses through.
    Rec(String),
    Square(Box<Lens>),
}

/// A single node of the lens DAG, as produced by the external compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lens {
    pub kind: LensKind,
    pub payload: LensPayload,
    pub span: Span,
    /// The predefined-lens symbol this node was built from, if any (e.g.
    /// `"Rx.integer"`, `"Rx.ipv4"`). Used for identifier synthesis
    /// (§4.10) and built-in type mapping (§4.11); `None` for lenses built
    /// from inline literals/regexps rather than a named library lens.
    pub name: Option<String>,
}

impl Lens {
    pub fn new(kind: LensKind) -> Self {
        Lens {
            kind,
            payload: LensPayload::None,
            span: Span::default(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_payload(mut self, payload: LensPayload) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_regexp(self, re: Regexp) -> Self {
        self.with_payload(LensPayload::Regexp(re))
    }

    pub fn with_literal(self, s: impl Into<String>) -> Self {
        self.with_payload(LensPayload::Literal(s.into()))
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn regexp(&self) -> Option<&Regexp> {
        match &self.payload {
            LensPayload::Regexp(re) => Some(re),
            _ => None,
        }
    }

    pub fn literal(&self) -> Option<&str> {
        match &self.payload {
            LensPayload::Literal(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Unary-internal-kind and leaf lenses have at most one child; n-ary
    /// kinds (`CONCAT`/`UNION`) hold their children inline.
    pub fn children(&self) -> &[Lens] {
        match &self.kind {
            LensKind::Concat(children) | LensKind::Union(children) => children,
            _ => &[],
        }
    }

    pub fn child(&self) -> Option<&Lens> {
        match &self.kind {
            LensKind::Subtree(child)
            | LensKind::Star(child)
            | LensKind::Maybe(child)
            | LensKind::Square(child) => Some(child),
            _ => None,
        }
    }

    pub fn is_subtree_or_rec(&self) -> bool {
        matches!(self.kind, LensKind::Subtree(_) | LensKind::Rec(_))
    }
}

/// A compiled Augeas module, as handed to the compiler entry points.
///
/// Mirrors `struct module` in the external Augeas library: a name and a
/// root lens to compile, plus any other modules it depends on (so
/// `module.name` identifier resolution in [`crate::ptree`] can look other
/// modules up by name).
#[derive(Debug, Clone)]
pub struct Module {
    pub name: String,
    pub root: Option<Lens>,
    pub source_path: Option<String>,
}

impl Module {
    pub fn new(name: impl Into<String>, root: Lens) -> Self {
        Module {
            name: name.into(),
            root: Some(root),
            source_path: None,
        }
    }
}
