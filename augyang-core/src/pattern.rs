//
// Copyright (c) The augyang Contributors
//
// SPDX-License-Identifier: MIT
//

//! The pattern-translation table (spec.md §3.6) and the identifier-list
//! parser it memoizes (spec.md §4.4).
//!
//! [`extract_identifiers`] enumerates every identifier string a `KEY`
//! pattern flagged `KEY_HAS_IDENTS` can produce, so the emitter can print
//! `leaf a; leaf b; leaf c;` instead of a single regex-typed leaf.
//! Failure is non-fatal: callers fall back to treating the pattern as an
//! opaque regex (§4.4, final paragraph).

use std::collections::HashMap;

/// Memoizes `origin regex -> identifier list` so a pattern shared by
/// several `KEY` lenses is only parsed once.
#[derive(Debug, Default)]
pub struct PatternTable {
    entries: HashMap<String, Vec<String>>,
}

impl PatternTable {
    pub fn new() -> Self {
        PatternTable::default()
    }

    /// Looks up a memoized expansion, parsing and caching it on first
    /// use. Returns `None` if the pattern doesn't match any of the
    /// accepted forms from §4.4.
    pub fn get_or_parse(&mut self, pattern: &str) -> Option<&[String]> {
        if !self.entries.contains_key(pattern) {
            let parsed = extract_identifiers(pattern).unwrap_or_default();
            self.entries.insert(pattern.to_owned(), parsed);
        }
        self.entries.get(pattern).map(|v| v.as_slice())
    }
}

/// Strips outer redundant parentheses: if the whole expression is one
/// parenthesized group whose parens only balance at the very end, the
/// parens are removed. Applied iteratively.
fn strip_outer_parens(mut s: &str) -> &str {
    loop {
        if !(s.starts_with('(') && s.ends_with(')')) {
            return s;
        }
        let mut depth = 0i32;
        let mut balances_early = false;
        for (i, c) in s.char_indices() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 && i != s.len() - 1 {
                        balances_early = true;
                        break;
                    }
                }
                _ => {}
            }
        }
        if balances_early {
            return s;
        }
        s = &s[1..s.len() - 1];
    }
}

/// Splits `s` on top-level `|` (not inside any parenthesized group).
fn split_top_level_union(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            '|' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// A caseless-word pattern `[Aa][Bb]...` of length >= 1: every character
/// is a caseless-single-character group over the same letter.
fn as_caseless_word(s: &str) -> Option<String> {
    let mut word = String::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '[' {
            return None;
        }
        let a = chars.next()?;
        let b = chars.next()?;
        if chars.next() != Some(']') {
            return None;
        }
        if a.to_ascii_lowercase() != b.to_ascii_lowercase() {
            return None;
        }
        word.push(a);
    }
    if word.is_empty() {
        None
    } else {
        Some(word)
    }
}

/// Parses one optional group `(a|b|...)`  (parens required), returning
/// its alternatives.
fn parse_optional_group(s: &str) -> Option<Vec<&str>> {
    let s = s.strip_prefix('(')?.strip_suffix(")?")?;
    Some(split_top_level_union(s))
}

/// Enumerates every identifier string expressible by `pattern`, per the
/// accepted forms of spec.md §4.4. Returns `None` if the pattern isn't
/// one of those forms.
pub fn extract_identifiers(pattern: &str) -> Option<Vec<String>> {
    let pattern = strip_outer_parens(pattern.trim());
    let tokens = split_top_level_union(pattern);

    let mut out = Vec::new();
    for token in tokens {
        out.extend(expand_token(token.trim())?);
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

fn expand_token(token: &str) -> Option<Vec<String>> {
    if let Some(word) = as_caseless_word(token) {
        return Some(vec![word.to_ascii_uppercase(), word.to_ascii_lowercase()]);
    }

    if token.chars().all(|c| is_ident_char(c) || c == ' ') && !token.contains('(') {
        // bare identifier, possibly with "[ ]+" collapsed to one space
        // by an earlier normalization pass.
        if !token.is_empty() {
            return Some(vec![token.to_owned()]);
        }
        return None;
    }

    // P (a|b|...)?  or  (a|b|...)? P
    if let Some(rest) = token.strip_suffix('?') {
        if let Some(open) = rest.rfind('(') {
            let prefix = &rest[..open];
            if prefix.chars().all(is_ident_char) {
                let group = format!("{}?", &rest[open..]);
                let alts = parse_optional_group(&group)?;
                let mut out: Vec<String> = vec![prefix.to_owned()];
                for alt in alts {
                    out.push(format!("{prefix}{alt}"));
                }
                return Some(out);
            }
        }
        if let Some(close) = rest.find(')') {
            let suffix = &rest[close + 1..];
            if suffix.chars().all(is_ident_char) && rest.starts_with('(') {
                let group = format!("{}?", &rest[..=close]);
                let alts = parse_optional_group(&group)?;
                let mut out: Vec<String> = vec![suffix.to_owned()];
                for alt in alts {
                    out.push(format!("{alt}{suffix}"));
                }
                return Some(out);
            }
        }
    }

    // P (a|b|...)  or  (a|b|...) P  or  P (a|b|...) Q
    if let (Some(open), Some(close)) = (token.find('('), token.rfind(')')) {
        if open < close {
            let prefix = &token[..open];
            let group = &token[open + 1..close];
            let suffix = &token[close + 1..];
            if prefix.chars().all(is_ident_char) && suffix.chars().all(is_ident_char) {
                let alts = split_top_level_union(group);
                return Some(
                    alts.into_iter()
                        .map(|alt| format!("{prefix}{alt}{suffix}"))
                        .collect(),
                );
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_union() {
        assert_eq!(
            extract_identifiers("a|b|c"),
            Some(vec!["a".to_owned(), "b".to_owned(), "c".to_owned()])
        );
    }

    #[test]
    fn caseless_word() {
        assert_eq!(
            extract_identifiers("[Oo][Nn]"),
            Some(vec!["ON".to_owned(), "on".to_owned()])
        );
    }

    #[test]
    fn prefix_optional_group() {
        let mut out = extract_identifiers("eth(0|1)?").unwrap();
        out.sort();
        let mut want = vec!["eth".to_owned(), "eth0".to_owned(), "eth1".to_owned()];
        want.sort();
        assert_eq!(out, want);
    }

    #[test]
    fn prefix_and_group_no_optional() {
        let mut out = extract_identifiers("on(e|ly)").unwrap();
        out.sort();
        let mut want = vec!["one".to_owned(), "only".to_owned()];
        want.sort();
        assert_eq!(out, want);
    }

    #[test]
    fn strips_redundant_outer_parens() {
        assert_eq!(
            extract_identifiers("(a|b)"),
            Some(vec!["a".to_owned(), "b".to_owned()])
        );
    }

    #[test]
    fn memoizes_via_table() {
        let mut table = PatternTable::new();
        let first = table.get_or_parse("a|b").unwrap().to_vec();
        let second = table.get_or_parse("a|b").unwrap().to_vec();
        assert_eq!(first, second);
    }
}
