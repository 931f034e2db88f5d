// Token normalization: canonical comparison form plus Danish digraph
// alternates.
//
// Normalization is total (never fails, empty output is a valid outcome)
// and idempotent: `normalize(normalize(x)) == normalize(x)`.

use unicode_normalization::UnicodeNormalization;

/// Apostrophe-like characters unified to the ASCII apostrophe.
const APOSTROPHES: &[char] = &['\u{2019}', '`', '\u{00B4}'];

/// Danish digraph spellings and the national letters they stand for.
/// Both directions are generated as comparison alternates, so "borne"
/// typed on a foreign keyboard can still reach "børne".
const DIGRAPHS: &[(&str, &str)] = &[("ae", "æ"), ("oe", "ø"), ("aa", "å")];

/// Canonicalize a raw surface token into its comparison form.
///
/// NFKC normalization, apostrophe unification, lowercasing, then an
/// edge strip of characters that are not part of the word. Internal
/// apostrophes and hyphens are retained ("ro'r", "tv-avis").
pub fn normalize(token: &str) -> String {
    let folded: String = token
        .trim()
        .nfkc()
        .map(|c| if APOSTROPHES.contains(&c) { '\'' } else { c })
        .flat_map(char::to_lowercase)
        .collect();
    folded
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_string()
}

/// The normalized token and its Danish digraph alternates.
///
/// `alternates` always includes `normalized` itself, is sorted, and is
/// empty only when normalization produced the empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonForms {
    pub normalized: String,
    pub alternates: Vec<String>,
}

/// Compute the comparison forms for a raw token.
pub fn comparison_forms(token: &str) -> ComparisonForms {
    let normalized = normalize(token);
    if normalized.is_empty() {
        return ComparisonForms {
            normalized,
            alternates: Vec::new(),
        };
    }

    let mut alternates = vec![normalized.clone()];
    for &(digraph, letter) in DIGRAPHS {
        if normalized.contains(digraph) {
            alternates.push(normalized.replace(digraph, letter));
        }
        if normalized.contains(letter) {
            alternates.push(normalized.replace(letter, digraph));
        }
    }
    alternates.sort_unstable();
    alternates.dedup();
    ComparisonForms {
        normalized,
        alternates,
    }
}
