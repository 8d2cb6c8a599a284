//
// Copyright (c) The augyang Contributors
//
// SPDX-License-Identifier: MIT
//

//! Augeas-pattern to YANG/XSD-`pattern` regex translation (spec.md §4.9).

use crate::error::{Error, MAX_REGEX_SIZE};

/// The two hard-coded exact-string anomaly workarounds, applied once
/// before general translation. `Rx.hostname`'s multi-line literal and
/// `ntp.aug`'s leading spaces before `minclock` don't survive the
/// general left-to-right rules below and are cheaper to special-case
/// than to special-rule.
const HOSTNAME_MULTILINE_LITERAL: &str =
    "([A-Za-z0-9]([A-Za-z0-9\\-]*[A-Za-z0-9])?)(\\.([A-Za-z0-9]([A-Za-z0-9\\-]*[A-Za-z0-9])?))*\\.?\n";
const NTP_MINCLOCK_LEADING_SPACES: &str = "   minclock";

fn apply_known_anomalies(pattern: &str) -> String {
    pattern
        .replace(HOSTNAME_MULTILINE_LITERAL, "")
        .replace(NTP_MINCLOCK_LEADING_SPACES, "minclock")
}

/// Translates a single Augeas pattern into a YANG `pattern` string.
/// `nocase` prepends `(?i)` per §4.9.
///
/// Returns `Error::RegexTooLong` if the translated pattern exceeds
/// [`MAX_REGEX_SIZE`].
pub fn translate(pattern: &str, nocase: bool) -> Result<String, Error> {
    let pattern = apply_known_anomalies(pattern);
    let body = translate_body(&pattern);
    let out = if nocase {
        format!("(?i){body}")
    } else {
        body
    };
    if out.len() > MAX_REGEX_SIZE {
        return Err(Error::RegexTooLong);
    }
    Ok(out)
}

/// Translates `A - B` (the Augeas minus operator) into the two
/// `pattern`/`pattern ... modifier invert-match` statement bodies YANG
/// needs to approximate it (§4.9, §9 open question: only complete for
/// certain shapes; outside those this degrades to the left operand
/// alone, understating the constraint).
pub fn translate_minus(left: &str, right: &str, nocase: bool) -> Result<(String, String), Error> {
    let left = translate(left, nocase)?;
    let right = translate(right, nocase)?;
    Ok((left, right))
}

fn strip_outer_parens(s: &str) -> &str {
    if s.starts_with('(') && s.ends_with(')') {
        let mut depth = 0i32;
        for (i, c) in s.char_indices() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 && i != s.len() - 1 {
                        return s;
                    }
                }
                _ => {}
            }
        }
        return &s[1..s.len() - 1];
    }
    s
}

fn translate_body(pattern: &str) -> String {
    let pattern = strip_outer_parens(pattern.trim_end_matches('\r'));

    let mut out = String::with_capacity(pattern.len());
    let mut in_class = false;
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '(' if !in_class && matches!(chars.peek(), Some(')')) => {
                // drop a lone empty group "()"
                chars.next();
            }
            '[' if !in_class => {
                in_class = true;
                out.push('[');
            }
            ']' if in_class => {
                in_class = false;
                out.push(']');
            }
            '\\' if in_class => {
                if let Some(&next) = chars.peek() {
                    match next {
                        '[' | ']' | '\\' => {
                            out.push('\\');
                            out.push(next);
                            chars.next();
                        }
                        _ => {
                            out.push(next);
                            chars.next();
                        }
                    }
                } else {
                    out.push('\\');
                }
            }
            '\\' if !in_class => match chars.peek().copied() {
                Some('\\') => {
                    out.push_str("\\\\");
                    chars.next();
                }
                Some('.') => {
                    out.push('.');
                    chars.next();
                }
                Some('-') => {
                    out.push('-');
                    chars.next();
                }
                Some('$') => {
                    out.push('$');
                    chars.next();
                }
                Some('n') => {
                    out.push_str("\\n");
                    chars.next();
                }
                Some('t') => {
                    out.push_str("\\t");
                    chars.next();
                }
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                    chars.next();
                }
                None => out.push('\\'),
            },
            '"' => out.push_str("\\\""),
            '\r' => {}
            other => out.push(other),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_quotes() {
        assert_eq!(translate("a\"b", false).unwrap(), "a\\\"b");
    }

    #[test]
    fn preserves_character_class() {
        assert_eq!(translate("[a-z]+", false).unwrap(), "[a-z]+");
    }

    #[test]
    fn drops_empty_group() {
        assert_eq!(translate("a()b", false).unwrap(), "ab");
    }

    #[test]
    fn nocase_prepends_marker() {
        assert_eq!(translate("abc", true).unwrap(), "(?i)abc");
    }

    #[test]
    fn strips_outer_parens() {
        assert_eq!(translate("(abc)", false).unwrap(), "abc");
    }

    #[test]
    fn rejects_oversized_pattern() {
        let long = "a".repeat(MAX_REGEX_SIZE + 1);
        assert_eq!(translate(&long, false).unwrap_err(), Error::RegexTooLong);
    }

    #[test]
    fn class_internal_backslash_bracket() {
        assert_eq!(translate("[\\]a]", false).unwrap(), "[\\]a]");
    }
}
