// Gate: early rejection of tokens that must never be treated as
// correctable typos.
//
// Rules are evaluated in fixed order, first match wins. A rejection is
// terminal: the engine returns `new` with the single gate reason tag and
// never runs candidate search for the token.

use stave_core::character::{alpha_count, detect_case, digit_count, is_purely_numeric, CaseType};
use stave_core::reason::ReasonTag;

use crate::policy::GatingConfig;

/// Inputs the gate needs beyond the token itself.
#[derive(Debug, Clone, Copy)]
pub struct GateInput<'a> {
    /// Raw surface token, pre-normalization. Case checks use this.
    pub raw: &'a str,
    /// Normalized comparison form.
    pub normalized: &'a str,
    /// Opaque POS tag from the upstream pipeline, if any.
    pub pos_tag: Option<&'a str>,
    /// Whether the token opens its sentence (capitalization is then
    /// uninformative).
    pub sentence_start: bool,
    /// Whether the normalized token is present in the ignore set.
    pub ignored: bool,
}

/// Outcome of gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Terminal: classify as `new` with this reason, no candidate search.
    Reject(ReasonTag),
    /// Run the candidate path. `proper_noun_bias` marks a capitalized
    /// mid-sentence token whose proper-noun risk was not strong enough
    /// to force `new` outright.
    Pass { proper_noun_bias: bool },
}

/// Evaluate the gate rules in order.
pub fn evaluate(input: GateInput<'_>, config: &GatingConfig) -> GateDecision {
    let normalized = input.normalized;

    if normalized.is_empty() {
        return GateDecision::Reject(ReasonTag::GatedEmpty);
    }
    if input.ignored {
        return GateDecision::Reject(ReasonTag::Ignored);
    }
    let tagged_proper_noun = input
        .pos_tag
        .is_some_and(|tag| config.proper_noun_tags.iter().any(|t| t == tag));
    if is_purely_numeric(normalized) || tagged_proper_noun {
        return GateDecision::Reject(ReasonTag::ProperNounOrNumeral);
    }
    if normalized.chars().count() < config.min_token_length {
        return GateDecision::Reject(ReasonTag::TooShortForCorrection);
    }

    // Shape checks run on the raw token: edge stripping may have removed
    // the leading "/" of a path or the quotes around a URL.
    let raw = input.raw.trim();
    if looks_like_email(raw) {
        return GateDecision::Reject(ReasonTag::GatedEmail);
    }
    if looks_like_url(raw) {
        return GateDecision::Reject(ReasonTag::GatedUrl);
    }
    if looks_like_path(raw) {
        return GateDecision::Reject(ReasonTag::GatedPath);
    }
    if detect_case(raw) == CaseType::AllUpper {
        return GateDecision::Reject(ReasonTag::GatedAcronym);
    }

    let total = normalized.chars().count();
    let digits = digit_count(normalized);
    if total > 0 && digits as f64 / total as f64 > config.max_digit_ratio {
        return GateDecision::Reject(ReasonTag::GatedDigitRatio);
    }
    if alpha_count(normalized) == 0 {
        return GateDecision::Reject(ReasonTag::GatedNonAlpha);
    }

    let proper_noun_bias = !input.sentence_start
        && raw
            .chars()
            .next()
            .is_some_and(|c| c.is_uppercase())
        && alpha_count(raw) > 0;
    GateDecision::Pass { proper_noun_bias }
}

/// `X@X.X` shape with no leading `@`.
fn looks_like_email(token: &str) -> bool {
    let Some(at) = token.find('@') else {
        return false;
    };
    at > 0 && token[at + 1..].contains('.') && !token[at + 1..].starts_with('.')
}

/// `http(s)://...` or `www.` prefixed.
fn looks_like_url(token: &str) -> bool {
    let lower = token.to_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("www.")
}

/// Absolute unix path or `X:\` drive path.
fn looks_like_path(token: &str) -> bool {
    if token.len() > 1 && token.starts_with('/') {
        return true;
    }
    let mut chars = token.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(drive), Some(':'), Some('\\')) if drive.is_ascii_alphabetic()
    )
}
