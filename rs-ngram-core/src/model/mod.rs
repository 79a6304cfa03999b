//! Top-level module for the n-gram language model.
//!
//! This module provides:
//! - Padded and unpadded n-gram extraction (`extractor`)
//! - Exact frequency counting with ranked queries (`frequency`)
//! - Per-context conditional distributions (`State`)
//! - The multi-order maximum-likelihood model (`mle_model`)
//! - Perplexity scoring (`perplexity`)
//! - Token generation with backoff (`generator`)

/// N-gram value type and window extraction with boundary padding.
pub mod extractor;

/// Exact occurrence counts kept in first-seen order.
pub mod frequency;

/// Multi-order maximum-likelihood model.
///
/// Owns, for each order, the conditional distribution of every observed context.
pub mod mle_model;

/// Perplexity of tokenized sentences under a trained model.
pub mod perplexity;

/// Bounded, seedable token generation with context backoff.
pub mod generator;

/// Internal representation of one context and its outgoing transitions.
mod state;

pub use state::State;

/// Sentinel inserted before a sentence, (order - 1) times.
pub const START_TOKEN: &str = "<s>";

/// Sentinel appended once after a sentence.
pub const END_TOKEN: &str = "</s>";

/// Returns true for the two padding sentinels.
pub fn is_sentinel(token: &str) -> bool {
	token == START_TOKEN || token == END_TOKEN
}
