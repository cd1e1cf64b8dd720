//! Feature string normalisation.
//!
//! A feature string is a `|`-delimited list such as
//! `STEM|POS:N|LEM:{som|ROOT:smw|M|GEN`. `KEY:VALUE` entries become valued
//! attributes, bare entries become flag attributes with an empty value. Keys
//! and flags are rewritten into legal attribute names by small ordered rule
//! tables.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::transliterate::{is_transliterated_key, transliterate};

/// One attribute of a `<bit>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// Empty for flag-style features.
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn flag(name: impl Into<String>) -> Self {
        Self::new(name, String::new())
    }

    pub fn is_flag(&self) -> bool {
        self.value.is_empty()
    }
}

/// A named `pattern -> rewrite` step. Only the first match is rewritten.
pub struct Rule {
    pub name: &'static str,
    pattern: Regex,
    rewrite: &'static str,
}

impl Rule {
    fn new(name: &'static str, pattern: &str, rewrite: &'static str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).unwrap(),
            rewrite,
        }
    }

    pub fn apply<'a>(&self, input: &'a str) -> Cow<'a, str> {
        self.pattern.replace(input, self.rewrite)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .field("rewrite", &self.rewrite)
            .finish()
    }
}

/// Rules applied to the key of a `KEY:VALUE` feature.
pub static KEY_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        // `+n` -> `n`
        Rule::new("embedded-plus", r"\+([[:word:]]+)", "$1"),
    ]
});

/// Rules applied, in order, to a bare flag feature.
pub static FLAG_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        // `Al+` -> `Al`
        Rule::new("trailing-plus", r"\+$", ""),
        // `3MP` -> `MP3`: names cannot start with a digit.
        Rule::new("leading-digit", r"^([0-9])([[:word:]]+)", "$2$1"),
        // `(XY)` -> `XY`
        Rule::new("parenthesized", r"\(([[:word:]]+)\)", "$1"),
        // `+VOC` -> `VOC`
        Rule::new("embedded-plus", r"\+([[:word:]]+)", "$1"),
    ]
});

fn apply_rules(rules: &[Rule], input: &str) -> String {
    rules
        .iter()
        .fold(input.to_string(), |acc, rule| rule.apply(&acc).into_owned())
}

/// Normalise a feature key.
pub fn normalize_key(key: &str) -> String {
    apply_rules(&KEY_RULES, key)
}

/// Normalise a bare flag feature into an attribute name.
pub fn normalize_flag(flag: &str) -> String {
    apply_rules(&FLAG_RULES, flag)
}

/// Normalise a single `|`-delimited feature.
pub fn parse_feature(feature: &str) -> Attribute {
    match feature.split_once(':') {
        Some((key, value)) => {
            let value = if is_transliterated_key(key) {
                transliterate(value)
            } else {
                value.to_string()
            };
            Attribute::new(normalize_key(key), value)
        }
        None => Attribute::flag(normalize_flag(feature)),
    }
}

/// Parse a whole feature string, preserving order. Empty entries are skipped.
pub fn parse_features(features: &str) -> Vec<Attribute> {
    features
        .split('|')
        .filter(|f| !f.is_empty())
        .map(parse_feature)
        .collect()
}
