//! Danish typo detection and classification engine.
//!
//! Given a token that matched neither an exact vocabulary entry nor a
//! known lemma upstream, decides whether it is a likely typographical
//! error (with ranked corrections), an ambiguous case, or a genuinely
//! new word -- deterministically, from local dictionaries, edit-distance
//! search, and frequency signals only.
//!
//! # Architecture
//!
//! - [`normalize`] -- comparison form and Danish digraph alternates
//! - [`gate`] -- early rejection of never-correctable tokens
//! - [`candidates`] -- bounded approximate dictionary search
//! - [`ranking`] -- weighted linear score fusion and margin
//! - [`decision`] -- threshold policy and the distance-1 promotion
//! - [`policy`] -- versioned, data-driven configuration
//! - [`ignore`] -- scope/expiry-aware ignored-token set
//! - [`cache`] -- bounded LRU result cache
//! - [`engine`] -- the [`TypoEngine`] handle tying it all together

pub mod cache;
pub mod candidates;
pub mod decision;
pub mod engine;
pub mod gate;
pub mod ignore;
pub mod normalize;
pub mod policy;
pub mod ranking;

pub use engine::{ClassifyRequest, DictionarySnapshot, TypoEngine};
pub use policy::{PolicyConfig, PolicyError};
pub use ranking::ContextHints;

// Re-export the shared contract types for downstream convenience.
pub use stave_core::{RankedSuggestion, ReasonTag, SourceFlag, TypoResult, TypoStatus};
pub use stave_index::{DictionarySource, Lexicon};
