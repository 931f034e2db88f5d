// Ranking: weighted linear fusion of normalized candidate signals.
//
// Four signals per candidate, each normalized to [0, 1] before fusion:
// inverse edit distance, log-scaled frequency, dictionary source weight,
// and (when the caller supplies hints) contextual plausibility. The
// fused score divides by the sum of the weights actually applied, so it
// stays in [0, 1] whether or not context is present.

use hashbrown::HashMap;

use stave_core::result::SourceFlag;

use crate::candidates::Candidate;
use crate::policy::ScoringWeights;

/// Optional neighboring-token signal: an opaque numeric plausibility per
/// candidate word, in [0, 1]. No model is involved here; the surrounding
/// pipeline computes these however it likes.
#[derive(Debug, Clone, Default)]
pub struct ContextHints {
    plausibility: HashMap<String, f64>,
}

impl ContextHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, word: impl Into<String>, plausibility: f64) {
        self.plausibility.insert(word.into(), plausibility);
    }

    pub fn get(&self, word: &str) -> Option<f64> {
        self.plausibility.get(word).copied()
    }
}

/// A scored candidate, ordered within a [`Ranking`].
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    pub value: String,
    pub score: f64,
    pub distance: usize,
    pub frequency: u64,
    pub source_flags: Vec<SourceFlag>,
}

/// The ordered suggestion list plus the ambiguity margin.
#[derive(Debug, Clone, Default)]
pub struct Ranking {
    /// Candidates sorted by score descending; ties broken by lower
    /// distance, higher frequency, then lexical order.
    pub candidates: Vec<RankedCandidate>,
    /// `score[0] - score[1]`, or `score[0]` with a single candidate,
    /// or 0 when empty.
    pub margin: f64,
}

/// Score and order the candidate set.
pub fn rank(
    token: &str,
    candidates: &[Candidate],
    context: Option<&ContextHints>,
    weights: &ScoringWeights,
    max_frequency: u64,
) -> Ranking {
    let token_len = token.chars().count();
    let freq_ceiling = (1.0 + max_frequency.max(1) as f64).ln();

    let mut ranked: Vec<RankedCandidate> = candidates
        .iter()
        .map(|candidate| {
            let word_len = candidate.word.chars().count();
            let span = token_len.max(word_len).max(1) as f64;
            let distance_signal = (1.0 - candidate.distance as f64 / span).max(0.0);
            let frequency_signal = (1.0 + candidate.frequency as f64).ln() / freq_ceiling;
            let source_signal = candidate.source_weight.clamp(0.0, 1.0);
            let context_signal =
                context.and_then(|hints| hints.get(&candidate.word).map(|p| p.clamp(0.0, 1.0)));

            let mut numerator = weights.edit_distance * distance_signal
                + weights.frequency * frequency_signal
                + weights.source_weight * source_signal;
            let mut denominator = weights.edit_distance + weights.frequency + weights.source_weight;
            if let Some(plausibility) = context_signal {
                numerator += weights.context * plausibility;
                denominator += weights.context;
            }
            let score = if denominator > 0.0 {
                (numerator / denominator).clamp(0.0, 1.0)
            } else {
                0.0
            };

            RankedCandidate {
                value: candidate.word.clone(),
                score,
                distance: candidate.distance,
                frequency: candidate.frequency,
                source_flags: vec![candidate.source],
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.distance.cmp(&b.distance))
            .then_with(|| b.frequency.cmp(&a.frequency))
            .then_with(|| a.value.cmp(&b.value))
    });

    let margin = match ranked.len() {
        0 => 0.0,
        1 => ranked[0].score,
        _ => ranked[0].score - ranked[1].score,
    };
    Ranking {
        candidates: ranked,
        margin,
    }
}
