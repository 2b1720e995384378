//! Fixed phrase dictionaries: abbreviation, expansion and LaTeX escaping
//!
//! Entries are applied one after another over the evolving text, in table
//! order. A replacement produced by one entry may be matched by a later one.
//! The abbreviation and expansion tables are not exact inverses of each
//! other, so `expand(abbreviate(t))` is not guaranteed to return `t`.
//!
//! Copyright (c) 2025 Textforge Team
//! Licensed under the Apache-2.0 license

use super::case::capitalize;
use regex::{Captures, NoExpand, Regex};
use std::sync::OnceLock;

/// Phrase -> abbreviation, matched case-insensitively
pub const ABBREVIATIONS: [(&str, &str); 4] = [
    ("na przykład", "np."),
    ("między innymi", "m.in."),
    ("i tym podobne", "itp."),
    ("i tak dalej", "itd."),
];

/// Abbreviation -> phrase, matched literally and case-insensitively
pub const EXPANSIONS: [(&str, &str); 4] = [
    ("np.", "na przykład"),
    ("m.in.", "między innymi"),
    ("itp.", "i tym podobne"),
    ("itd.", "i tak dalej"),
];

/// Character -> LaTeX escape.
///
/// No replacement may contain a character escaped by a later entry: braces
/// come before `~` and `^` because their escapes introduce braces.
pub const LATEX_ESCAPES: [(&str, &str); 9] = [
    ("#", r"\#"),
    ("$", r"\$"),
    ("%", r"\%"),
    ("&", r"\&"),
    ("{", r"\{"),
    ("}", r"\}"),
    ("~", r"\~{}"),
    ("^", r"\^{}"),
    ("_", r"\_"),
];

static ABBREVIATION_PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
static EXPANSION_PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();

fn compile(table: &'static [(&'static str, &'static str)]) -> Vec<(Regex, &'static str)> {
    table
        .iter()
        .map(|(from, to)| {
            let pattern = format!("(?i){}", regex::escape(from));
            let regex = Regex::new(&pattern).expect("escaped dictionary key is a valid pattern");
            (regex, *to)
        })
        .collect()
}

fn abbreviation_patterns() -> &'static [(Regex, &'static str)] {
    ABBREVIATION_PATTERNS.get_or_init(|| compile(&ABBREVIATIONS))
}

fn expansion_patterns() -> &'static [(Regex, &'static str)] {
    EXPANSION_PATTERNS.get_or_init(|| compile(&EXPANSIONS))
}

/// Replace every known phrase with its abbreviation
pub fn abbreviate(text: &str) -> String {
    abbreviation_patterns()
        .iter()
        .fold(text.to_string(), |acc, (regex, replacement)| {
            regex.replace_all(&acc, NoExpand(*replacement)).into_owned()
        })
}

/// Replace every known abbreviation with its phrase, uppercasing the
/// phrase's first letter when the matched abbreviation starts uppercase
pub fn expand(text: &str) -> String {
    expansion_patterns()
        .iter()
        .fold(text.to_string(), |acc, (regex, replacement)| {
            regex
                .replace_all(&acc, |caps: &Captures<'_>| match_leading_case(&caps[0], replacement))
                .into_owned()
        })
}

fn match_leading_case(matched: &str, replacement: &str) -> String {
    match matched.chars().next() {
        Some(first) if first.is_uppercase() => capitalize(replacement),
        _ => replacement.to_string(),
    }
}

/// Escape LaTeX special characters
pub fn escape_latex(text: &str) -> String {
    LATEX_ESCAPES
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latex_table_never_reescapes() {
        for (index, (_, replacement)) in LATEX_ESCAPES.iter().enumerate() {
            for (later, _) in &LATEX_ESCAPES[index + 1..] {
                assert!(
                    !replacement.contains(later),
                    "escape {replacement:?} would be re-escaped by later entry {later:?}"
                );
            }
        }
    }

    #[test]
    fn test_latex_every_character() {
        assert_eq!(
            escape_latex("& $ % # _ { } ~ ^"),
            r"\& \$ \% \# \_ \{ \} \~{} \^{}"
        );
    }

    #[test]
    fn test_abbreviate_ignores_case() {
        assert_eq!(abbreviate("Na Przykład kot"), "np. kot");
        assert_eq!(abbreviate("MIĘDZY INNYMI"), "m.in.");
    }

    #[test]
    fn test_expand_matches_leading_case() {
        assert_eq!(expand("Np. kot"), "Na przykład kot");
        assert_eq!(expand("ITD."), "I tak dalej");
        assert_eq!(expand("m.In."), "między innymi");
    }

    #[test]
    fn test_expand_dot_is_literal() {
        assert_eq!(expand("npx"), "npx");
        assert_eq!(expand("itpx itp."), "itpx i tym podobne");
    }
}
