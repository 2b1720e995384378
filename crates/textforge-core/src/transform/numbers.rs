//! Polish cardinal number-to-words conversion
//!
//! Numbers from 0 to 100 are spelled out through direct table lookups with a
//! single tens/units split. Larger numbers are left as digits. Decimal
//! tokens with one or two fractional digits are spelled part by part and
//! joined with `koma`.
//!
//! Copyright (c) 2025 Textforge Team
//! Licensed under the Apache-2.0 license

use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Largest number that is spelled out
pub const MAX_SPELLED: u64 = 100;

const ZERO: &str = "zero";
const HUNDRED: &str = "sto";
const DECIMAL_SEPARATOR: &str = "koma";

const UNITS: [&str; 10] = [
    "", "jeden", "dwa", "trzy", "cztery", "pięć", "sześć", "siedem", "osiem", "dziewięć",
];

const TEENS: [&str; 10] = [
    "dziesięć",
    "jedenaście",
    "dwanaście",
    "trzynaście",
    "czternaście",
    "piętnaście",
    "szesnaście",
    "siedemnaście",
    "osiemnaście",
    "dziewiętnaście",
];

const TENS: [&str; 10] = [
    "",
    "",
    "dwadzieścia",
    "trzydzieści",
    "czterdzieści",
    "pięćdziesiąt",
    "sześćdziesiąt",
    "siedemdziesiąt",
    "osiemdziesiąt",
    "dziewięćdziesiąt",
];

static NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();

fn number_regex() -> &'static Regex {
    // ASCII digits only; `\d` would also match other Unicode decimal digits
    NUMBER_REGEX.get_or_init(|| {
        Regex::new(r"\b[0-9]+(?:\.[0-9]{1,2})?\b").expect("number pattern is valid")
    })
}

/// Spell `number` in Polish, or `None` when it is above [`MAX_SPELLED`]
pub fn spell_cardinal(number: u64) -> Option<String> {
    let words = match number {
        0 => ZERO.to_string(),
        MAX_SPELLED => HUNDRED.to_string(),
        20..=99 => {
            let tens = TENS[(number / 10) as usize];
            match number % 10 {
                0 => tens.to_string(),
                units => format!("{} {}", tens, UNITS[units as usize]),
            }
        }
        10..=19 => TEENS[(number - 10) as usize].to_string(),
        1..=9 => UNITS[number as usize].to_string(),
        _ => return None,
    };
    Some(words)
}

/// Replace every number token in `text` with its Polish words
pub fn numbers_to_text(text: &str) -> String {
    number_regex()
        .replace_all(text, |caps: &Captures<'_>| spell_token(&caps[0]))
        .into_owned()
}

fn spell_token(token: &str) -> String {
    match token.split_once('.') {
        Some((whole, fraction)) => {
            let (Ok(whole_value), Ok(fraction_value)) = (whole.parse::<u64>(), fraction.parse::<u64>())
            else {
                return token.to_string();
            };
            let whole_words = spell_cardinal(whole_value).unwrap_or_else(|| whole.to_string());
            let fraction_words =
                spell_cardinal(fraction_value).unwrap_or_else(|| fraction.to_string());
            format!("{whole_words} {DECIMAL_SEPARATOR} {fraction_words}")
        }
        None => token
            .parse::<u64>()
            .ok()
            .and_then(spell_cardinal)
            .unwrap_or_else(|| token.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spell_cardinal_table_edges() {
        assert_eq!(spell_cardinal(0).as_deref(), Some("zero"));
        assert_eq!(spell_cardinal(1).as_deref(), Some("jeden"));
        assert_eq!(spell_cardinal(9).as_deref(), Some("dziewięć"));
        assert_eq!(spell_cardinal(10).as_deref(), Some("dziesięć"));
        assert_eq!(spell_cardinal(19).as_deref(), Some("dziewiętnaście"));
        assert_eq!(spell_cardinal(20).as_deref(), Some("dwadzieścia"));
        assert_eq!(spell_cardinal(21).as_deref(), Some("dwadzieścia jeden"));
        assert_eq!(spell_cardinal(99).as_deref(), Some("dziewięćdziesiąt dziewięć"));
        assert_eq!(spell_cardinal(100).as_deref(), Some("sto"));
        assert_eq!(spell_cardinal(101), None);
    }

    #[test]
    fn test_decimal_tokens() {
        assert_eq!(numbers_to_text("3.14"), "trzy koma czternaście");
        assert_eq!(numbers_to_text("0.5"), "zero koma pięć");
        assert_eq!(numbers_to_text("2.05"), "dwa koma pięć");
        assert_eq!(numbers_to_text("150.5"), "150 koma pięć");
    }

    #[test]
    fn test_long_fraction_is_not_a_decimal_token() {
        // `3.141` has no word boundary after two fractional digits
        assert_eq!(numbers_to_text("3.141"), "trzy.141");
    }

    #[test]
    fn test_out_of_range_and_overflow_stay_digits() {
        assert_eq!(numbers_to_text("101 dalmatyńczyków"), "101 dalmatyńczyków");
        assert_eq!(
            numbers_to_text("99999999999999999999999"),
            "99999999999999999999999"
        );
    }

    #[test]
    fn test_minus_sign_is_kept() {
        assert_eq!(numbers_to_text("-5 stopni"), "-pięć stopni");
    }

    #[test]
    fn test_digits_inside_words_are_ignored() {
        assert_eq!(numbers_to_text("mp3 i 5zł"), "mp3 i 5zł");
    }
}
