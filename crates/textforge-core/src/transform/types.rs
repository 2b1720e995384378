//! Core types for the transformation system
//!
//! [`TransformKind`] is the closed vocabulary of named transformations.
//! [`TextTransform`] is the seam shared by single stages and whole pipelines.
//!
//! Copyright (c) 2025 Textforge Team
//! Licensed under the Apache-2.0 license

use super::{case, numbers, phrases};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transformations applied when a caller supplies none
pub const DEFAULT_TRANSFORMS: &[&str] = &["upper"];

/// Anything that maps text to text
pub trait TextTransform {
    /// Apply the transformation. Must be total: every input, including the
    /// empty string, yields a defined output.
    fn apply(&self, text: &str) -> String;
}

/// Named transformation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    /// Every character to uppercase
    Upper,
    /// Every character to lowercase
    Lower,
    /// First character to uppercase, remainder unchanged
    Capitalize,
    /// Fixed phrases to their abbreviations
    Abbreviate,
    /// Fixed abbreviations to their phrases
    Expand,
    /// Reverse the text keeping the original per-position case pattern
    Inverse,
    /// Collapse adjacent repeated words
    RemoveDuplicates,
    /// Escape LaTeX special characters
    Latex,
    /// Spell out numbers 0-100 in Polish
    NumberToText,
}

impl TransformKind {
    /// Every kind, in documentation order
    pub const ALL: [TransformKind; 9] = [
        TransformKind::Upper,
        TransformKind::Lower,
        TransformKind::Capitalize,
        TransformKind::Abbreviate,
        TransformKind::Expand,
        TransformKind::Inverse,
        TransformKind::RemoveDuplicates,
        TransformKind::Latex,
        TransformKind::NumberToText,
    ];

    /// Canonical lowercase name
    pub fn name(self) -> &'static str {
        match self {
            Self::Upper => "upper",
            Self::Lower => "lower",
            Self::Capitalize => "capitalize",
            Self::Abbreviate => "abbreviate",
            Self::Expand => "expand",
            Self::Inverse => "inverse",
            Self::RemoveDuplicates => "removeduplicates",
            Self::Latex => "latex",
            Self::NumberToText => "numbertotext",
        }
    }

    /// One-line human description
    pub fn description(self) -> &'static str {
        match self {
            Self::Upper => "convert every character to uppercase",
            Self::Lower => "convert every character to lowercase",
            Self::Capitalize => "uppercase the first character",
            Self::Abbreviate => "replace fixed Polish phrases with abbreviations (na przykład -> np.)",
            Self::Expand => "replace fixed Polish abbreviations with phrases (np. -> na przykład)",
            Self::Inverse => "reverse the text, keeping the original case pattern per position",
            Self::RemoveDuplicates => "collapse adjacent repeated words",
            Self::Latex => "escape LaTeX special characters",
            Self::NumberToText => "spell out numbers from 0 to 100 in Polish",
        }
    }

    /// Look up a kind by name, ignoring ASCII case and surrounding whitespace
    pub fn from_name(name: &str) -> Result<Self> {
        let normalized = name.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| Error::unknown_transformation(name))
    }

    /// Apply this single stage to `text`
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::Upper => case::upper(text),
            Self::Lower => case::lower(text),
            Self::Capitalize => case::capitalize(text),
            Self::Abbreviate => phrases::abbreviate(text),
            Self::Expand => phrases::expand(text),
            Self::Inverse => case::inverse(text),
            Self::RemoveDuplicates => case::remove_duplicates(text),
            Self::Latex => phrases::escape_latex(text),
            Self::NumberToText => numbers::numbers_to_text(text),
        }
    }
}

impl TextTransform for TransformKind {
    fn apply(&self, text: &str) -> String {
        TransformKind::apply(*self, text)
    }
}

impl FromStr for TransformKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
