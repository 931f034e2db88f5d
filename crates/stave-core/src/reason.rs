// Reason tags: a tagged-variant event log accumulated through the pipeline.
//
// Every stage that influences a decision appends its tag, so a downstream
// consumer can audit exactly which rules fired. Tags are variants, not
// free-form strings, to keep them testable stage by stage.

use serde::Serialize;

/// One rule that fired during gating, ranking, or decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonTag {
    // -- Gate rejections -----------------------------------------------------
    /// Token normalized to the empty string.
    GatedEmpty,
    /// Token is present in the ignore set.
    Ignored,
    /// Token is purely numeric or carries a proper-noun POS tag.
    ProperNounOrNumeral,
    /// Token is too short for reliable edit-distance search.
    TooShortForCorrection,
    /// Token is shaped like an email address.
    GatedEmail,
    /// Token is shaped like a URL.
    GatedUrl,
    /// Token is shaped like a filesystem path.
    GatedPath,
    /// Token is an all-uppercase acronym.
    GatedAcronym,
    /// Token contains too high a proportion of digits.
    GatedDigitRatio,
    /// Token contains no alphabetic characters.
    GatedNonAlpha,

    // -- Pass-through annotations --------------------------------------------
    /// Capitalized mid-sentence; proper-noun risk without a POS tag.
    ProperNounBias,

    // -- Engine resolutions --------------------------------------------------
    /// The token is present verbatim in the merged dictionary.
    DictionaryTerm,
    /// No dictionary snapshot is available; correction degraded.
    DictionaryUnavailable,
    /// An internal fault was mapped to a safe `new` result.
    InternalError,

    // -- Decision policy -----------------------------------------------------
    /// Single distance-1 candidate with high frequency; promoted directly.
    Distance1Promotion,
    /// Top score cleared the typo-likely cutoff.
    CandidateHighConfidence,
    /// Top-1/top-2 margin cleared the margin cutoff.
    ClearMargin,
    /// Confidence was blended with the top-2 posterior-style ratio.
    PosteriorCalibrated,
    /// Top score cleared only the uncertain cutoff.
    CandidateMediumConfidence,
    /// Top-1/top-2 margin fell below the margin cutoff.
    MarginBelowCutoff,
    /// No candidate evidence strong enough for any correction.
    WeakCandidateEvidence,
}

impl ReasonTag {
    /// Stable wire name for the tag.
    pub fn as_str(self) -> &'static str {
        match self {
            ReasonTag::GatedEmpty => "gated_empty",
            ReasonTag::Ignored => "ignored",
            ReasonTag::ProperNounOrNumeral => "proper_noun_or_numeral",
            ReasonTag::TooShortForCorrection => "too_short_for_correction",
            ReasonTag::GatedEmail => "gated_email",
            ReasonTag::GatedUrl => "gated_url",
            ReasonTag::GatedPath => "gated_path",
            ReasonTag::GatedAcronym => "gated_acronym",
            ReasonTag::GatedDigitRatio => "gated_digit_ratio",
            ReasonTag::GatedNonAlpha => "gated_non_alpha",
            ReasonTag::ProperNounBias => "proper_noun_bias",
            ReasonTag::DictionaryTerm => "dictionary_term",
            ReasonTag::DictionaryUnavailable => "dictionary_unavailable",
            ReasonTag::InternalError => "internal_error",
            ReasonTag::Distance1Promotion => "distance1_promotion",
            ReasonTag::CandidateHighConfidence => "candidate_high_confidence",
            ReasonTag::ClearMargin => "clear_margin",
            ReasonTag::PosteriorCalibrated => "posterior_calibrated",
            ReasonTag::CandidateMediumConfidence => "candidate_medium_confidence",
            ReasonTag::MarginBelowCutoff => "margin_below_cutoff",
            ReasonTag::WeakCandidateEvidence => "weak_candidate_evidence",
        }
    }
}

impl std::fmt::Display for ReasonTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only log of the rules that fired for one classification.
///
/// Tags are cumulative, not exclusive; appending a tag that is already
/// present is a no-op so repeated stages cannot inflate the log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReasonLog {
    tags: Vec<ReasonTag>,
}

impl ReasonLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log seeded with a single tag.
    pub fn with(tag: ReasonTag) -> Self {
        let mut log = Self::new();
        log.push(tag);
        log
    }

    /// Append a tag, preserving first-fired order and deduplicating.
    pub fn push(&mut self, tag: ReasonTag) {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    /// Append every tag from another log.
    pub fn extend(&mut self, other: &ReasonLog) {
        for &tag in &other.tags {
            self.push(tag);
        }
    }

    /// Whether the given tag has fired.
    pub fn contains(&self, tag: ReasonTag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn tags(&self) -> &[ReasonTag] {
        &self.tags
    }

    /// Consume the log, yielding tags in first-fired order.
    pub fn into_tags(self) -> Vec<ReasonTag> {
        self.tags
    }
}
