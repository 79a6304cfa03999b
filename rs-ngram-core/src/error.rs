use thiserror::Error;

/// Errors reported to callers of the n-gram engine.
///
/// Statistical edge cases (zero probability, empty corpus, unknown context)
/// are never errors; they are turned into typed "no result" values instead.
/// Only malformed requests end up here.
#[derive(Error, Debug)]
pub enum NgramError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("n-gram order must be >= 1, got {order}")]
	InvalidOrder { order: usize },

	#[error("order {order} exceeds the model maximum order {max_order}")]
	OrderOutOfRange { order: usize, max_order: usize },

	#[error("context length mismatch: expected {expected} tokens, found {found}")]
	ContextLength { expected: usize, found: usize },

	#[error("train ratio must be in (0.0, 1.0], got {0}")]
	InvalidRatio(f64),
}

pub type Result<T> = std::result::Result<T, NgramError>;
