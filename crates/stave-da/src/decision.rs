// Decision policy: maps the ranked candidate set plus gate metadata to a
// final status.
//
// Rules are evaluated in a fixed order; the distance-1 promotion is an
// explicit special case checked ahead of the generic thresholds. Every
// rule that fires appends its reason tag.

use stave_core::reason::{ReasonLog, ReasonTag};
use stave_core::status::TypoStatus;

use crate::policy::DecisionThresholds;
use crate::ranking::Ranking;

/// Error type for malformed candidate data reaching the decision boundary.
#[derive(Debug, thiserror::Error)]
pub enum DecisionError {
    #[error("non-finite score for candidate {0:?}")]
    NonFiniteScore(String),
}

/// The decision for one token.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub status: TypoStatus,
    pub confidence: f64,
    pub reasons: ReasonLog,
}

/// Apply the decision rules to a ranking.
pub fn decide(
    ranking: &Ranking,
    proper_noun_bias: bool,
    thresholds: &DecisionThresholds,
) -> Result<Decision, DecisionError> {
    for candidate in &ranking.candidates {
        if !candidate.score.is_finite() {
            return Err(DecisionError::NonFiniteScore(candidate.value.clone()));
        }
    }

    let Some(top) = ranking.candidates.first() else {
        return Ok(Decision {
            status: TypoStatus::New,
            confidence: 0.0,
            reasons: ReasonLog::with(ReasonTag::WeakCandidateEvidence),
        });
    };
    let top_score = top.score;
    let margin = ranking.margin;

    // Rule 1: distance-1 promotion, checked before the generic thresholds.
    // Requires the candidate set to contain exactly one entry, at distance
    // 1; any rival candidate, whatever its distance, sends the decision to
    // the threshold rules. Suppressed under proper-noun risk.
    if !proper_noun_bias
        && ranking.candidates.len() == 1
        && top.distance == 1
        && top.frequency >= thresholds.distance1_promotion_min_frequency
    {
        let mut reasons = ReasonLog::with(ReasonTag::Distance1Promotion);
        let confidence = blended_confidence(ranking, thresholds, &mut reasons);
        return Ok(Decision {
            status: TypoStatus::TypoLikely,
            confidence,
            reasons,
        });
    }

    // Rule 2: proper-noun risk caps the outcome at `uncertain`.
    if proper_noun_bias {
        let mut reasons = ReasonLog::with(ReasonTag::ProperNounBias);
        if top_score >= thresholds.uncertain_cutoff {
            reasons.push(ReasonTag::CandidateMediumConfidence);
            return Ok(Decision {
                status: TypoStatus::Uncertain,
                confidence: top_score,
                reasons,
            });
        }
        reasons.push(ReasonTag::WeakCandidateEvidence);
        return Ok(Decision {
            status: TypoStatus::New,
            confidence: top_score,
            reasons,
        });
    }

    // Rule 3: confident, unambiguous top candidate.
    if top_score >= thresholds.typo_likely_cutoff && margin >= thresholds.margin_cutoff {
        let mut reasons = ReasonLog::with(ReasonTag::CandidateHighConfidence);
        reasons.push(ReasonTag::ClearMargin);
        let confidence = blended_confidence(ranking, thresholds, &mut reasons);
        return Ok(Decision {
            status: TypoStatus::TypoLikely,
            confidence,
            reasons,
        });
    }

    // Rule 4: evidence worth showing, no auto-action implied.
    if top_score >= thresholds.uncertain_cutoff {
        let mut reasons = ReasonLog::with(ReasonTag::CandidateMediumConfidence);
        if margin < thresholds.margin_cutoff {
            reasons.push(ReasonTag::MarginBelowCutoff);
        }
        return Ok(Decision {
            status: TypoStatus::Uncertain,
            confidence: top_score,
            reasons,
        });
    }

    // Rule 5: fallback.
    Ok(Decision {
        status: TypoStatus::New,
        confidence: top_score,
        reasons: ReasonLog::with(ReasonTag::WeakCandidateEvidence),
    })
}

/// Confidence for a `typo_likely` call: the top score, tempered by the
/// posterior-style ratio `s0 / (s0 + s1)` when a second candidate exists,
/// so near-tied candidates do not report runaway confidence.
fn blended_confidence(
    ranking: &Ranking,
    thresholds: &DecisionThresholds,
    reasons: &mut ReasonLog,
) -> f64 {
    let top_score = ranking.candidates[0].score;
    let Some(second) = ranking.candidates.get(1) else {
        return top_score.clamp(0.0, 1.0);
    };
    let mass = top_score + second.score;
    if mass <= 0.0 {
        return top_score.clamp(0.0, 1.0);
    }
    let posterior = top_score / mass;
    let blend = thresholds.posterior_blend;
    reasons.push(ReasonTag::PosteriorCalibrated);
    (top_score * ((1.0 - blend) + blend * posterior)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::RankedCandidate;
    use stave_core::result::SourceFlag;

    fn thresholds() -> DecisionThresholds {
        DecisionThresholds {
            typo_likely_cutoff: 0.78,
            uncertain_cutoff: 0.5,
            margin_cutoff: 0.08,
            distance1_promotion_min_frequency: 50,
            posterior_blend: 0.5,
        }
    }

    fn ranked(value: &str, score: f64, distance: usize, frequency: u64) -> RankedCandidate {
        RankedCandidate {
            value: value.to_string(),
            score,
            distance,
            frequency,
            source_flags: vec![SourceFlag::CoreWordlist],
        }
    }

    fn ranking_of(candidates: Vec<RankedCandidate>) -> Ranking {
        let margin = match candidates.len() {
            0 => 0.0,
            1 => candidates[0].score,
            _ => candidates[0].score - candidates[1].score,
        };
        Ranking { candidates, margin }
    }

    #[test]
    fn empty_ranking_is_new() {
        let decision = decide(&ranking_of(vec![]), false, &thresholds()).unwrap();
        assert_eq!(decision.status, TypoStatus::New);
        assert_eq!(decision.confidence, 0.0);
        assert!(decision.reasons.contains(ReasonTag::WeakCandidateEvidence));
    }

    #[test]
    fn lone_distance_one_high_frequency_is_promoted() {
        // Score below the generic cutoff: only the promotion explains typo_likely.
        let decision = decide(
            &ranking_of(vec![ranked("spiser", 0.70, 1, 400)]),
            false,
            &thresholds(),
        )
        .unwrap();
        assert_eq!(decision.status, TypoStatus::TypoLikely);
        assert!(decision.reasons.contains(ReasonTag::Distance1Promotion));
    }

    #[test]
    fn promotion_requires_high_frequency() {
        let decision = decide(
            &ranking_of(vec![ranked("sjælden", 0.70, 1, 3)]),
            false,
            &thresholds(),
        )
        .unwrap();
        assert_eq!(decision.status, TypoStatus::Uncertain);
        assert!(!decision.reasons.contains(ReasonTag::Distance1Promotion));
    }

    #[test]
    fn promotion_requires_a_lone_distance_one_candidate() {
        let decision = decide(
            &ranking_of(vec![ranked("kat", 0.69, 1, 120), ranked("hat", 0.68, 1, 110)]),
            false,
            &thresholds(),
        )
        .unwrap();
        assert_eq!(decision.status, TypoStatus::Uncertain);
        assert!(decision.reasons.contains(ReasonTag::MarginBelowCutoff));
    }

    #[test]
    fn a_rival_at_larger_distance_blocks_promotion() {
        // "kay" against kat (distance 1) and hat (distance 2) at similar
        // frequency: the threshold rules decide, not the promotion.
        let decision = decide(
            &ranking_of(vec![ranked("kat", 0.69, 1, 120), ranked("hat", 0.52, 2, 110)]),
            false,
            &thresholds(),
        )
        .unwrap();
        assert_eq!(decision.status, TypoStatus::Uncertain);
        assert!(!decision.reasons.contains(ReasonTag::Distance1Promotion));
    }

    #[test]
    fn proper_noun_bias_suppresses_promotion() {
        let decision = decide(
            &ranking_of(vec![ranked("aarhus", 0.85, 1, 400)]),
            true,
            &thresholds(),
        )
        .unwrap();
        assert_eq!(decision.status, TypoStatus::Uncertain);
        assert!(decision.reasons.contains(ReasonTag::ProperNounBias));
    }

    #[test]
    fn proper_noun_bias_with_weak_evidence_is_new() {
        let decision = decide(
            &ranking_of(vec![ranked("milk", 0.3, 2, 10)]),
            true,
            &thresholds(),
        )
        .unwrap();
        assert_eq!(decision.status, TypoStatus::New);
        assert!(decision.reasons.contains(ReasonTag::ProperNounBias));
    }

    #[test]
    fn high_score_clear_margin_is_typo_likely() {
        let decision = decide(
            &ranking_of(vec![ranked("spiser", 0.85, 2, 400), ranked("spise", 0.6, 2, 350)]),
            false,
            &thresholds(),
        )
        .unwrap();
        assert_eq!(decision.status, TypoStatus::TypoLikely);
        assert!(decision.reasons.contains(ReasonTag::CandidateHighConfidence));
        assert!(decision.reasons.contains(ReasonTag::ClearMargin));
        assert!(decision.reasons.contains(ReasonTag::PosteriorCalibrated));
    }

    #[test]
    fn blended_confidence_tempers_near_ties() {
        // Near-tied pair at distance 2 (no promotion): confidence must sit
        // below the raw top score.
        let decision = decide(
            &ranking_of(vec![ranked("abe", 0.85, 2, 100), ranked("abede", 0.75, 2, 90)]),
            false,
            &thresholds(),
        )
        .unwrap();
        assert_eq!(decision.status, TypoStatus::TypoLikely);
        assert!(decision.confidence < 0.85);
        assert!(decision.confidence > 0.0);
    }

    #[test]
    fn high_score_small_margin_is_uncertain() {
        let decision = decide(
            &ranking_of(vec![ranked("kat", 0.85, 2, 120), ranked("hat", 0.83, 2, 110)]),
            false,
            &thresholds(),
        )
        .unwrap();
        assert_eq!(decision.status, TypoStatus::Uncertain);
        assert!(decision.reasons.contains(ReasonTag::MarginBelowCutoff));
    }

    #[test]
    fn low_score_is_new() {
        let decision = decide(
            &ranking_of(vec![ranked("fjern", 0.2, 2, 5)]),
            false,
            &thresholds(),
        )
        .unwrap();
        assert_eq!(decision.status, TypoStatus::New);
        assert!(decision.reasons.contains(ReasonTag::WeakCandidateEvidence));
    }

    #[test]
    fn confidence_is_always_in_unit_interval() {
        let rankings = [
            ranking_of(vec![ranked("a", 1.0, 1, 1000)]),
            ranking_of(vec![ranked("a", 1.0, 1, 1000), ranked("b", 1.0, 1, 1000)]),
            ranking_of(vec![ranked("a", 0.0, 2, 0)]),
        ];
        for ranking in &rankings {
            let decision = decide(ranking, false, &thresholds()).unwrap();
            assert!((0.0..=1.0).contains(&decision.confidence));
        }
    }

    #[test]
    fn non_finite_score_is_an_error() {
        let ranking = ranking_of(vec![ranked("kat", f64::NAN, 1, 120)]);
        assert!(matches!(
            decide(&ranking, false, &thresholds()),
            Err(DecisionError::NonFiniteScore(_))
        ));
    }
}
