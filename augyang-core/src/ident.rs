//
// Copyright (c) The augyang Contributors
//
// SPDX-License-Identifier: MIT
//

//! Identifier synthesis and standardization (spec.md §4.10).

use std::collections::HashMap;

use crate::error::{Error, MAX_IDENT_SIZE};

/// Standardizes a raw candidate string into a YANG identifier: lowercase
/// with `-` separators, leading `_` stripped, `+`/leading `-` spelled
/// out, `#`/`@` dropped, and a trailing `-re` (regex suffix) removed.
///
/// Idempotent: `standardize(standardize(s)) == standardize(s)` for every
/// `s` (§8.1.9) — each rule either leaves already-standardized text
/// unchanged or strictly removes the condition that triggered it.
pub fn standardize(raw: &str) -> Result<String, Error> {
    let mut s = raw.trim().to_ascii_lowercase();

    while let Some(rest) = s.strip_prefix('_') {
        s = rest.to_owned();
    }

    let mut out = String::with_capacity(s.len());
    let mut prev_was_sep = false;
    for c in s.chars() {
        match c {
            '+' => {
                out.push_str("plus-");
                prev_was_sep = true;
            }
            '-' if out.is_empty() => {
                out.push_str("minus-");
                prev_was_sep = true;
            }
            '#' | '@' => {}
            c if c.is_ascii_alphanumeric() => {
                out.push(c);
                prev_was_sep = false;
            }
            _ => {
                if !prev_was_sep && !out.is_empty() {
                    out.push('-');
                    prev_was_sep = true;
                }
            }
        }
    }
    s = out.trim_end_matches('-').to_owned();

    if let Some(stripped) = s.strip_suffix("-re") {
        s = stripped.to_owned();
    }

    if s.is_empty() {
        s = "node".to_owned();
    }

    if s.len() > MAX_IDENT_SIZE {
        return Err(Error::IdentTooLong);
    }
    Ok(s)
}

/// Resolves collisions among sibling identifiers in place, per spec.md
/// §4.7 step 13: the first collision on a name gets suffix `2`; if a
/// name already ends in a numeric suffix, later collisions continue from
/// `N + 1`.
pub fn dedup_siblings(idents: &mut [String]) {
    let mut seen: HashMap<String, u32> = HashMap::new();
    for ident in idents.iter_mut() {
        let base = ident.clone();
        match seen.get(&base) {
            None => {
                seen.insert(base, 1);
            }
            Some(&count) => {
                let next = count + 1;
                seen.insert(base.clone(), next);
                *ident = format!("{base}{next}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(standardize("Foo Bar").unwrap(), "foo-bar");
    }

    #[test]
    fn strips_leading_underscore() {
        assert_eq!(standardize("_seq").unwrap(), "seq");
    }

    #[test]
    fn spells_out_plus() {
        assert_eq!(standardize("a+b").unwrap(), "aplus-b");
    }

    #[test]
    fn strips_regex_suffix() {
        assert_eq!(standardize("word-re").unwrap(), "word");
    }

    #[test]
    fn empty_falls_back_to_node() {
        assert_eq!(standardize("###").unwrap(), "node");
    }

    #[test]
    fn idempotent() {
        for raw in ["Foo Bar", "_seq", "a+b", "word-re", "###", "already-ok"] {
            let once = standardize(raw).unwrap();
            let twice = standardize(&once).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn too_long_is_an_error() {
        let long = "a".repeat(MAX_IDENT_SIZE + 1);
        assert_eq!(standardize(&long).unwrap_err(), Error::IdentTooLong);
    }

    #[test]
    fn dedup_continues_from_existing_suffix() {
        let mut idents = vec![
            "foo".to_owned(),
            "foo".to_owned(),
            "foo2".to_owned(),
            "foo".to_owned(),
        ];
        dedup_siblings(&mut idents);
        assert_eq!(idents, vec!["foo", "foo2", "foo2", "foo3"]);
    }
}
