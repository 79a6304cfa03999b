//! Word-level n-gram language model library.
//!
//! This crate provides a maximum-likelihood n-gram engine including:
//! - Padded n-gram extraction and frequency counting
//! - A multi-order MLE model with conditional distributions
//! - Perplexity scoring with an explicit undefined result
//! - Token generation with context backoff and an injected random source
//! - A tokenizer adapter and small corpus I/O helpers
//!
//! The engine modules never touch the filesystem; corpus loading lives in `io`.

/// Core n-gram models, scoring and generation logic.
pub mod model;

/// Tokenizer trait, the default word tokenizer and display helpers.
pub mod tokenize;

/// Corpus I/O utilities (line loading, file listing, train/test split).
pub mod io;

/// Error type shared by the whole crate.
pub mod error;

pub use error::{NgramError, Result};
