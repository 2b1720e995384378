//! Case and structural transforms
//!
//! Copyright (c) 2025 Textforge Team
//! Licensed under the Apache-2.0 license

use regex::Regex;
use std::sync::OnceLock;

static WORD_REGEX: OnceLock<Regex> = OnceLock::new();

fn word_regex() -> &'static Regex {
    WORD_REGEX.get_or_init(|| Regex::new(r"\w+").expect("word pattern is valid"))
}

/// Every character to uppercase (Unicode-aware)
pub fn upper(text: &str) -> String {
    text.to_uppercase()
}

/// Every character to lowercase (Unicode-aware)
pub fn lower(text: &str) -> String {
    text.to_lowercase()
}

/// Uppercase the first character and leave the rest untouched
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Reverse `text`, then re-case each output position using the case of the
/// same position in the input.
///
/// Position `i` of the output holds the character from position `n - 1 - i`
/// of the input, uppercased when input position `i` is uppercase and
/// lowercased otherwise.
pub fn inverse(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (original, reversed) in text.chars().zip(text.chars().rev()) {
        if original.is_uppercase() {
            out.push(single_char_case(reversed, reversed.to_uppercase()));
        } else {
            out.push(single_char_case(reversed, reversed.to_lowercase()));
        }
    }
    out
}

/// The case mapping of `c` when it is a single char, otherwise `c` itself
fn single_char_case(c: char, mut mapped: impl Iterator<Item = char>) -> char {
    match (mapped.next(), mapped.next()) {
        (Some(single), None) => single,
        _ => c,
    }
}

/// Collapse runs of adjacent, whitespace-separated, case-insensitively equal
/// words into their first occurrence.
pub fn remove_duplicates(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied_to = 0;
    // Folded form of the last kept word and the end of the last word seen in its run
    let mut run: Option<(String, usize)> = None;

    for word in word_regex().find_iter(text) {
        let folded = word.as_str().to_lowercase();

        if let Some((kept, run_end)) = run.as_mut() {
            let gap = &text[*run_end..word.start()];
            if *kept == folded && gap.chars().all(char::is_whitespace) {
                *run_end = word.end();
                copied_to = word.end();
                continue;
            }
        }

        out.push_str(&text[copied_to..word.end()]);
        copied_to = word.end();
        run = Some((folded, word.end()));
    }

    out.push_str(&text[copied_to..]);
    out
}
