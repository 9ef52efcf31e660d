use std::collections::BTreeSet;

use unicode_general_category::{GeneralCategory, get_general_category};
use unicode_normalization::UnicodeNormalization;

/// Canonical comparable form of a piece of text.
///
/// Lower-cases, applies NFKC, turns every punctuation or symbol code point
/// into a space, collapses whitespace runs (including the no-break space) to a
/// single ASCII space and trims. Every comparison in the crate goes through
/// this function first.
pub fn normalize(raw: &str) -> String {
    // Compatibility forms can decompose to upper case ("ℌ" -> "H"), so fold
    // again after NFKC to keep normalize idempotent.
    let folded: String = raw.to_lowercase().nfkc().collect::<String>().to_lowercase();

    let mut out = String::with_capacity(folded.len());
    let mut pending_space = false;

    for c in folded.chars() {
        if is_separator(c) || is_punctuation_or_symbol(c) {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }

    out
}

/// `normalize` for optional input; absent text is the empty string.
pub fn normalize_opt(raw: Option<&str>) -> String {
    raw.map(normalize).unwrap_or_default()
}

/// Set of non-empty space-separated tokens of the normalized text.
pub fn tokenize(raw: &str) -> BTreeSet<String> {
    normalize(raw)
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

fn is_punctuation_or_symbol(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::ConnectorPunctuation
            | GeneralCategory::DashPunctuation
            | GeneralCategory::OpenPunctuation
            | GeneralCategory::ClosePunctuation
            | GeneralCategory::InitialPunctuation
            | GeneralCategory::FinalPunctuation
            | GeneralCategory::OtherPunctuation
            | GeneralCategory::MathSymbol
            | GeneralCategory::CurrencySymbol
            | GeneralCategory::ModifierSymbol
            | GeneralCategory::OtherSymbol
    )
}
