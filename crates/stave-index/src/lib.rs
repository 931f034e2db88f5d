//! Dictionary layer for the stave typo engine.
//!
//! Provides wordlist loading with source-weighted merging, bounded
//! Damerau-Levenshtein distance, deletion-variant generation, and the
//! precomputed candidate-retrieval index.
//!
//! # Architecture
//!
//! - [`lexicon`] -- merged dictionary entries (`Lexicon`, `DictionarySource`)
//! - [`distance`] -- bounded Damerau-Levenshtein (optimal string alignment)
//! - [`deletes`] -- deletion-variant key generation
//! - [`index`] -- `CandidateIndex`: deletion key -> originating word ids

pub mod deletes;
pub mod distance;
pub mod index;
pub mod lexicon;

pub use index::{CandidateIndex, IndexParams};
pub use lexicon::{DictionaryEntry, DictionarySource, Lexicon, LexiconError};
