// Token classification contract: the value returned to the analyzer.

use serde::Serialize;

use crate::reason::{ReasonLog, ReasonTag};
use crate::status::TypoStatus;

/// Which dictionary source a suggestion (or entry) came from.
///
/// The user lexicon always outranks the wordlists so that user-confirmed
/// vocabulary reduces future false `typo_likely` classifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFlag {
    /// Core frequency-annotated wordlist.
    CoreWordlist,
    /// Extended membership wordlist.
    ExtendedWordlist,
    /// User-added lexemes from the wordbank.
    UserLexicon,
}

impl SourceFlag {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceFlag::CoreWordlist => "core_wordlist",
            SourceFlag::ExtendedWordlist => "extended_wordlist",
            SourceFlag::UserLexicon => "user_lexicon",
        }
    }
}

/// A single ranked correction suggestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSuggestion {
    /// The suggested dictionary word (display form).
    pub value: String,
    /// Fused score in `[0, 1]`.
    pub score: f64,
    /// Dictionary sources the suggestion came from.
    pub source_flags: Vec<SourceFlag>,
}

/// Result of classifying one unknown token.
///
/// Produced fresh per call and never persisted by the engine. Equality
/// covers the classification contract only; `latency_ms` is a
/// diagnostic measurement and two otherwise-identical results compare
/// equal regardless of it.
#[derive(Debug, Clone, Serialize)]
pub struct TypoResult {
    /// Final three-way status.
    pub status: TypoStatus,
    /// The normalized comparison form of the input token.
    pub normalized: String,
    /// Ordered suggestions, best first. May be empty.
    pub suggestions: Vec<RankedSuggestion>,
    /// Calibrated confidence in `[0, 1]`.
    pub confidence: f64,
    /// Every rule that fired, in first-fired order.
    #[serde(serialize_with = "serialize_tags")]
    pub reason_tags: Vec<ReasonTag>,
    /// Wall-clock time spent classifying, in milliseconds.
    pub latency_ms: f64,
}

fn serialize_tags<S>(tags: &[ReasonTag], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(tags.iter().map(|t| t.as_str()))
}

impl PartialEq for TypoResult {
    fn eq(&self, other: &Self) -> bool {
        self.status == other.status
            && self.normalized == other.normalized
            && self.suggestions == other.suggestions
            && self.confidence == other.confidence
            && self.reason_tags == other.reason_tags
    }
}

impl TypoResult {
    /// Build a terminal result with no suggestions and zero confidence.
    ///
    /// Used for gate rejections and degraded/fault paths.
    pub fn terminal_new(normalized: impl Into<String>, reasons: ReasonLog) -> Self {
        Self {
            status: TypoStatus::New,
            normalized: normalized.into(),
            suggestions: Vec::new(),
            confidence: 0.0,
            reason_tags: reasons.into_tags(),
            latency_ms: 0.0,
        }
    }
}
