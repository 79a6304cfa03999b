use std::collections::{HashMap, HashSet};

use log::debug;

use crate::error::{NgramError, Result};
use super::extractor::padded_ngrams;
use super::frequency::FrequencyTable;
use super::state::State;

/// Maximum-likelihood n-gram model over orders `1..=max_order`.
///
/// For every order `k` the model maps each observed context of length `k-1`
/// to its `State`, whose normalized transition counts form the conditional
/// distribution of the next token.
///
/// # Responsibilities
/// - Build the per-order distributions from a tokenized corpus in one pass
/// - Answer conditional probability queries (0 for anything unseen)
/// - Expose the training vocabulary for generation
///
/// # Invariants
/// - `orders.len() == max_order` and `max_order >= 1`
/// - Each state in `orders[k - 1]` has a context of exactly `k - 1` tokens
/// - No state is empty; unseen transitions are absent, never stored as zero
/// - The model is never mutated after `train` returns
#[derive(Clone, Debug)]
pub struct Model {
	/// Highest order the model was trained at.
	max_order: usize,

	/// `orders[k - 1]` maps a context (length k-1) to its state.
	orders: Vec<HashMap<Vec<String>, State>>,

	/// Distinct tokens of every extracted n-gram, in first-seen order.
	vocabulary: Vec<String>,
}

impl Model {
	/// Trains a model on a corpus of tokenized sentences.
	///
	/// Each sentence is padded independently (see `padded_ngrams`). An empty
	/// corpus gives an empty model.
	///
	/// # Errors
	/// Returns an error if `max_order == 0`.
	pub fn train<S, T>(corpus: &[S], max_order: usize) -> Result<Self>
	where
		S: AsRef<[T]>,
		T: AsRef<str>,
	{
		if max_order == 0 {
			return Err(NgramError::InvalidOrder { order: max_order });
		}

		let mut orders = Vec::with_capacity(max_order);
		let mut vocabulary = Vec::new();
		let mut known: HashSet<String> = HashSet::new();

		for order in 1..=max_order {
			// Windows are extracted again for every order, never cached
			let windows = corpus
				.iter()
				.map(|sentence| padded_ngrams(sentence.as_ref(), order))
				.collect::<Result<Vec<_>>>()?;
			let table = FrequencyTable::count_all(windows.into_iter().flatten());

			let mut states: HashMap<Vec<String>, State> = HashMap::new();
			for (ngram, occurrence) in table.iter() {
				for token in ngram.tokens() {
					if known.insert(token.clone()) {
						vocabulary.push(token.clone());
					}
				}
				let Some(next_token) = ngram.last() else { continue };
				let context = ngram.context();
				states
					.entry(context.to_vec())
					.or_insert_with(|| State::new(context))
					.add_transition(next_token, occurrence);
			}

			debug!(
				"order {}: {} n-grams, {} distinct, {} contexts",
				order,
				table.total(),
				table.len(),
				states.len()
			);
			orders.push(states);
		}

		Ok(Self { max_order, orders, vocabulary })
	}

	/// Trains on a single token sequence, treated as one sentence.
	///
	/// # Errors
	/// Returns an error if `max_order == 0`.
	pub fn train_sequence<T: AsRef<str>>(tokens: &[T], max_order: usize) -> Result<Self> {
		Self::train(&[tokens], max_order)
	}

	/// Highest trained order.
	pub fn max_order(&self) -> usize {
		self.max_order
	}

	/// Distinct training tokens in first-seen order, sentinels included
	/// whenever an order >= 2 was trained on a non-empty corpus.
	pub fn vocabulary(&self) -> &[String] {
		&self.vocabulary
	}

	/// True if training saw no n-gram at all.
	pub fn is_empty(&self) -> bool {
		self.orders.iter().all(|states| states.is_empty())
	}

	/// Checks that `order` lies in `1..=max_order`.
	///
	/// # Errors
	/// Returns `InvalidOrder` for 0 and `OrderOutOfRange` above the maximum.
	pub fn check_order(&self, order: usize) -> Result<()> {
		if order == 0 {
			return Err(NgramError::InvalidOrder { order });
		}
		if order > self.max_order {
			return Err(NgramError::OrderOutOfRange { order, max_order: self.max_order });
		}
		Ok(())
	}

	/// Returns P(`token` | `context`) at `order`.
	///
	/// The value is 0.0 when the context, or the token after that context,
	/// was never observed at that order.
	///
	/// # Errors
	/// Returns an error if `order` is outside `1..=max_order` or if
	/// `context` does not hold exactly `order - 1` tokens.
	pub fn probability<S: AsRef<str>>(&self, order: usize, context: &[S], token: &str) -> Result<f64> {
		Ok(self
			.distribution(order, context)?
			.map_or(0.0, |state| state.probability(token)))
	}

	/// Returns the conditional distribution of `context` at `order`, if observed.
	///
	/// # Errors
	/// Same as [`Model::probability`].
	pub fn distribution<S: AsRef<str>>(&self, order: usize, context: &[S]) -> Result<Option<&State>> {
		self.check_order(order)?;
		if context.len() != order - 1 {
			return Err(NgramError::ContextLength { expected: order - 1, found: context.len() });
		}
		let key: Vec<String> = context.iter().map(|t| t.as_ref().to_owned()).collect();
		Ok(self.state(order, &key))
	}

	/// Iterates over every observed state at `order`.
	///
	/// # Errors
	/// Returns an error if `order` is outside `1..=max_order`.
	pub fn contexts(&self, order: usize) -> Result<impl Iterator<Item = &State>> {
		self.check_order(order)?;
		Ok(self.orders[order - 1].values())
	}

	/// Unchecked lookup used by the scorer and the generator.
	pub(crate) fn state(&self, order: usize, context: &[String]) -> Option<&State> {
		self.orders.get(order.checked_sub(1)?)?.get(context)
	}
}
