// Classification status for tokens that failed exact and lemma matching.

use serde::Serialize;

/// Final status produced by the typo engine.
///
/// `known` and `variation` never appear here; those are upstream
/// precedence outcomes decided before the engine is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypoStatus {
    /// A confident, unambiguous correction exists.
    TypoLikely,
    /// Candidates exist but the evidence is ambiguous; no auto-action implied.
    Uncertain,
    /// No usable correction; the token is treated as genuinely new.
    New,
}

impl TypoStatus {
    /// Stable wire name for the status.
    pub fn as_str(self) -> &'static str {
        match self {
            TypoStatus::TypoLikely => "typo_likely",
            TypoStatus::Uncertain => "uncertain",
            TypoStatus::New => "new",
        }
    }
}

impl std::fmt::Display for TypoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
