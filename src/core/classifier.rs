//! Decides whether a scalar is human-readable text worth translating.
//!
//! The decision is an ordered chain of rules; the first rule with an opinion
//! wins. Anything no rule objects to is translatable.
//!
//! | # | Rule                                   | Outcome    |
//! |---|----------------------------------------|------------|
//! | 1 | contains whitespace                    | accept     |
//! | 2 | Ruby symbol (`:foo`, `":foo"`)         | reject     |
//! | 3 | `true` / `false`                       | reject     |
//! | 4 | only decimal digits                    | reject     |
//! | 5 | only hex digits, at least one numeral  | reject     |
//! | 6 | shorter than 4 characters              | reject     |
//! | 7 | longer than 24 characters              | reject     |
//! | 8 | only upper-case letters                | accept     |
//! | 9 | camelCase                              | reject     |
//! | 10| digit touching a letter                | reject     |
//! | 11| path, URL or identifier punctuation    | reject     |

use std::sync::LazyLock;

use regex::Regex;

use crate::core::document::Scalar;

/// Shortest single word that is accepted.
pub const MIN_WORD_LENGTH: usize = 4;
/// Longest single word that is accepted.
pub const MAX_WORD_LENGTH: usize = 24;

static SYMBOL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^(?:"|')?:[A-Za-z_][A-Za-z0-9_]*[?!]?(?:"|')?$"#).unwrap());

static CAMEL_CASE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{Ll}\p{Lu}").unwrap());

static DIGIT_IN_WORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{L}\p{Nd}|\p{Nd}\p{L}").unwrap());

/// Result of one rule in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject,
    /// The rule has no opinion; continue with the next one.
    Pass,
}

type Rule = fn(&str) -> Verdict;

const RULES: &[Rule] = &[
    has_whitespace,
    is_symbol,
    is_boolean_word,
    is_all_digits,
    is_hex,
    is_too_short,
    is_too_long,
    is_all_caps,
    is_camel_case,
    has_embedded_digit,
    has_identifier_punctuation,
];

/// Classify a scalar. Only non-empty strings can be translatable.
pub fn is_translatable(scalar: &Scalar) -> bool {
    match scalar {
        Scalar::Str(text) => is_translatable_text(text),
        _ => false,
    }
}

/// Classify a string value.
pub fn is_translatable_text(text: &str) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    for rule in RULES {
        match rule(text) {
            Verdict::Accept => return true,
            Verdict::Reject => return false,
            Verdict::Pass => {}
        }
    }
    true
}

fn verdict(condition: bool, outcome: Verdict) -> Verdict {
    if condition { outcome } else { Verdict::Pass }
}

/// Multi-word text is always copy.
pub fn has_whitespace(text: &str) -> Verdict {
    verdict(text.chars().any(char::is_whitespace), Verdict::Accept)
}

pub fn is_symbol(text: &str) -> Verdict {
    verdict(SYMBOL_REGEX.is_match(text), Verdict::Reject)
}

pub fn is_boolean_word(text: &str) -> Verdict {
    verdict(text == "true" || text == "false", Verdict::Reject)
}

pub fn is_all_digits(text: &str) -> Verdict {
    verdict(text.chars().all(|c| c.is_ascii_digit()), Verdict::Reject)
}

/// Hashes and ids such as `cbca81213eb5901b8ae4f8ac`.
///
/// Words spelled only with the letters a-f (`face`, `decade`) are left alone.
pub fn is_hex(text: &str) -> Verdict {
    let hex = text.len() >= 2
        && text.chars().all(|c| c.is_ascii_hexdigit())
        && text.chars().any(|c| c.is_ascii_digit());
    verdict(hex, Verdict::Reject)
}

pub fn is_too_short(text: &str) -> Verdict {
    verdict(text.chars().count() < MIN_WORD_LENGTH, Verdict::Reject)
}

pub fn is_too_long(text: &str) -> Verdict {
    verdict(text.chars().count() > MAX_WORD_LENGTH, Verdict::Reject)
}

/// Acronyms and shouted labels (`LARGE`) are legitimate copy.
pub fn is_all_caps(text: &str) -> Verdict {
    verdict(text.chars().all(char::is_uppercase), Verdict::Accept)
}

pub fn is_camel_case(text: &str) -> Verdict {
    verdict(CAMEL_CASE_REGEX.is_match(text), Verdict::Reject)
}

pub fn has_embedded_digit(text: &str) -> Verdict {
    verdict(DIGIT_IN_WORD_REGEX.is_match(text), Verdict::Reject)
}

/// Paths, URLs, dotted names and snake_case identifiers.
///
/// A dot or colon only counts when something follows it, so `Done.` and
/// `Note:` still pass.
pub fn has_identifier_punctuation(text: &str) -> Verdict {
    let chars: Vec<char> = text.chars().collect();
    let punctuated = chars.iter().enumerate().any(|(i, c)| match c {
        '/' | '\\' | '_' | '@' | '=' | '#' => true,
        '.' | ':' => i + 1 < chars.len(),
        _ => false,
    });
    verdict(punctuated, Verdict::Reject)
}
