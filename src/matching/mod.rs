//! Name-based entity matching between boundary features and ward records.
//!
//! There is no reliable join key between the two sources, so every consumer
//! of the mapping (renderer, hit tester, report generator) goes through the
//! single normalization + similarity + tiering implementation in this module.

mod matcher;
mod normalize;
mod similarity;

pub use matcher::{MatchIndex, MatchMethod, MatchOutcome, MatchRun, Matcher, MatcherConfig};
pub use normalize::normalize;
pub use similarity::{distance, similarity};
