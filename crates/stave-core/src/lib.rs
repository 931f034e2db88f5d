//! Shared types for the stave typo classification engine.
//!
//! - [`status`] -- the three-way classification status
//! - [`reason`] -- tagged reason variants and the per-decision reason log
//! - [`result`] -- the token classification contract (`TypoResult`)
//! - [`character`] -- Danish character helpers and case detection

pub mod character;
pub mod reason;
pub mod result;
pub mod status;

pub use reason::{ReasonLog, ReasonTag};
pub use result::{RankedSuggestion, SourceFlag, TypoResult};
pub use status::TypoStatus;
