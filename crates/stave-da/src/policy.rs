// Versioned, data-driven policy configuration.
//
// Every tunable cutoff lives here, not in code, so recalibration is a
// config edit. The file is loaded once at startup and treated as an
// immutable value for the lifetime of the process; a reload replaces
// the whole object. Malformed or missing configuration is an error at
// load time -- silent defaults would mask miscalibration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// The fixed interpretation order of the surrounding classifier.
const EXPECTED_PRECEDENCE: [&str; 3] = ["exact", "lemma", "typo"];

/// Error type for policy loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("failed to read policy file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse policy document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid policy: {0}")]
    Invalid(String),
}

/// Gate thresholds.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatingConfig {
    /// Tokens shorter than this never reach candidate search.
    pub min_token_length: usize,
    /// POS tags that mark a token as a proper noun.
    pub proper_noun_tags: Vec<String>,
    /// Maximum tolerated fraction of digit characters.
    pub max_digit_ratio: f64,
}

/// Candidate generation bounds.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CandidateConfig {
    /// Edit-distance search radius.
    pub max_edit_distance: usize,
    /// Hard cap on the candidate set handed to the ranker.
    pub max_candidates: usize,
    /// How many ranked suggestions the result carries.
    pub max_suggestions: usize,
    /// Prefix truncation for deletion-variant keys; 0 disables.
    pub prefix_length: usize,
    /// Upper bound on words examined by the fallback scan.
    pub fallback_scan_limit: usize,
}

/// Weights for the linear score fusion. Each signal is normalized to
/// `[0, 1]` before weighting, so the weights are directly interpretable.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringWeights {
    pub edit_distance: f64,
    pub frequency: f64,
    pub source_weight: f64,
    pub context: f64,
}

/// Decision cutoffs.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecisionThresholds {
    /// Minimum top score for `typo_likely`.
    pub typo_likely_cutoff: f64,
    /// Minimum top score for `uncertain`.
    pub uncertain_cutoff: f64,
    /// Minimum top-1/top-2 margin for an unambiguous call.
    pub margin_cutoff: f64,
    /// Raw frequency a lone distance-1 candidate needs for direct promotion.
    pub distance1_promotion_min_frequency: u64,
    /// Blend factor between raw top score and the posterior-style ratio.
    pub posterior_blend: f64,
}

/// The full policy document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    pub version: u32,
    pub precedence: Vec<String>,
    pub gating: GatingConfig,
    pub candidate_generation: CandidateConfig,
    pub scoring_weights: ScoringWeights,
    pub decision_thresholds: DecisionThresholds,
}

impl PolicyConfig {
    /// Parse and validate a policy document from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, PolicyError> {
        let config: PolicyConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// The reference policy document shipped with the crate, compiled in.
    ///
    /// The shipped thresholds are a starting point; production callers
    /// are expected to load a calibrated document with [`from_path`].
    ///
    /// [`from_path`]: PolicyConfig::from_path
    pub fn builtin() -> Result<Self, PolicyError> {
        Self::from_json_str(include_str!("../data/typo_policy.v1.json"))
    }

    /// Load and validate a policy document from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| PolicyError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&text)
    }

    fn validate(&self) -> Result<(), PolicyError> {
        let invalid = |msg: String| Err(PolicyError::Invalid(msg));

        if self.version == 0 {
            return invalid("version must be >= 1".into());
        }
        if self.precedence != EXPECTED_PRECEDENCE {
            return invalid(format!(
                "precedence must be {EXPECTED_PRECEDENCE:?}, got {:?}",
                self.precedence
            ));
        }

        let g = &self.gating;
        if g.min_token_length == 0 {
            return invalid("gating.min_token_length must be >= 1".into());
        }
        if !(0.0..=1.0).contains(&g.max_digit_ratio) {
            return invalid("gating.max_digit_ratio must be in [0, 1]".into());
        }

        let c = &self.candidate_generation;
        if !(1..=3).contains(&c.max_edit_distance) {
            return invalid("candidate_generation.max_edit_distance must be in 1..=3".into());
        }
        if c.max_candidates == 0 {
            return invalid("candidate_generation.max_candidates must be >= 1".into());
        }
        if c.max_suggestions == 0 || c.max_suggestions > c.max_candidates {
            return invalid(
                "candidate_generation.max_suggestions must be in 1..=max_candidates".into(),
            );
        }
        if c.fallback_scan_limit == 0 {
            return invalid("candidate_generation.fallback_scan_limit must be >= 1".into());
        }

        let w = &self.scoring_weights;
        let weights = [w.edit_distance, w.frequency, w.source_weight, w.context];
        if weights.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return invalid("scoring_weights must be finite and non-negative".into());
        }
        if w.edit_distance + w.frequency + w.source_weight <= 0.0 {
            return invalid("scoring_weights for non-context signals must not all be zero".into());
        }

        let t = &self.decision_thresholds;
        for (name, value) in [
            ("typo_likely_cutoff", t.typo_likely_cutoff),
            ("uncertain_cutoff", t.uncertain_cutoff),
            ("margin_cutoff", t.margin_cutoff),
            ("posterior_blend", t.posterior_blend),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return invalid(format!("decision_thresholds.{name} must be in [0, 1]"));
            }
        }
        if t.uncertain_cutoff > t.typo_likely_cutoff {
            return invalid("uncertain_cutoff must not exceed typo_likely_cutoff".into());
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::reference_policy;
    use super::*;

    #[test]
    fn reference_document_parses() {
        let policy = reference_policy();
        assert_eq!(policy.version, 1);
        assert_eq!(policy.precedence, ["exact", "lemma", "typo"]);
        assert_eq!(policy.candidate_generation.max_edit_distance, 2);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            PolicyConfig::from_json_str("{not json"),
            Err(PolicyError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(matches!(
            PolicyConfig::from_path("/nonexistent/typo_policy.json"),
            Err(PolicyError::Io { .. })
        ));
    }

    #[test]
    fn missing_section_is_an_error() {
        // decision_thresholds omitted entirely.
        let text = r#"{
            "version": 1,
            "precedence": ["exact", "lemma", "typo"],
            "gating": {"min_token_length": 3, "proper_noun_tags": [], "max_digit_ratio": 0.3},
            "candidate_generation": {"max_edit_distance": 2, "max_candidates": 20,
                "max_suggestions": 3, "prefix_length": 7, "fallback_scan_limit": 2000},
            "scoring_weights": {"edit_distance": 0.5, "frequency": 0.3,
                "source_weight": 0.2, "context": 0.2}
        }"#;
        assert!(matches!(
            PolicyConfig::from_json_str(text),
            Err(PolicyError::Parse(_))
        ));
    }

    #[test]
    fn wrong_precedence_is_rejected() {
        let mut policy: serde_json::Value =
            serde_json::from_str(include_str!("../data/typo_policy.v1.json")).unwrap();
        policy["precedence"] = serde_json::json!(["typo", "exact", "lemma"]);
        assert!(matches!(
            PolicyConfig::from_json_str(&policy.to_string()),
            Err(PolicyError::Invalid(_))
        ));
    }

    #[test]
    fn inverted_cutoffs_are_rejected() {
        let mut policy: serde_json::Value =
            serde_json::from_str(include_str!("../data/typo_policy.v1.json")).unwrap();
        policy["decision_thresholds"]["uncertain_cutoff"] = serde_json::json!(0.9);
        assert!(matches!(
            PolicyConfig::from_json_str(&policy.to_string()),
            Err(PolicyError::Invalid(_))
        ));
    }

    #[test]
    fn out_of_range_edit_distance_is_rejected() {
        let mut policy: serde_json::Value =
            serde_json::from_str(include_str!("../data/typo_policy.v1.json")).unwrap();
        policy["candidate_generation"]["max_edit_distance"] = serde_json::json!(5);
        assert!(matches!(
            PolicyConfig::from_json_str(&policy.to_string()),
            Err(PolicyError::Invalid(_))
        ));
    }
}
