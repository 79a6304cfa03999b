use rand::Rng;

use super::frequency::FrequencyTable;

/// Represents a context in an n-gram model.
///
/// A `State` corresponds to a fixed (k-1)-token context (`context`) and stores
/// every observed transition from this context to the next token.
///
/// Conceptually, this is a node in a Markov chain whose outgoing edges are
/// weighted by their number of observations; normalizing those weights gives
/// the maximum-likelihood conditional distribution.
///
/// ## Responsibilities:
/// - Accumulate transition occurrences during training
/// - Answer conditional probability queries
/// - Sample the next token proportionally to its probability
///
/// ## Invariants
/// - All transitions belong to the same `context`
/// - Each transition occurrence count is strictly positive
#[derive(Clone, Debug)]
pub struct State {
	/// Identifier of the state (k-1 token context, empty for unigrams).
	context: Vec<String>,
	/// Outgoing transitions indexed by the next token, in first-seen order.
	/// Example: { "cat" => 1, "dog" => 1 }
	transitions: FrequencyTable<String>,
}

impl State {
	/// Creates a new empty state for the given context.
	pub fn new(context: &[String]) -> Self {
		Self {
			context: context.to_vec(),
			transitions: FrequencyTable::new(),
		}
	}

	pub fn context(&self) -> &[String] {
		&self.context
	}

	/// Records `occurrence` observations of a transition toward `next_token`.
	pub(crate) fn add_transition(&mut self, next_token: &str, occurrence: usize) {
		self.transitions.add(next_token.to_owned(), occurrence);
	}

	/// Returns P(`token` | context), 0.0 if the transition was never observed.
	pub fn probability(&self, token: &str) -> f64 {
		let total = self.transitions.total();
		if total == 0 {
			return 0.0;
		}
		self.transitions.count(token) as f64 / total as f64
	}

	/// Iterates over `(next_token, probability)` in first-seen order.
	///
	/// The probabilities of a non-empty state sum to 1.
	pub fn probabilities(&self) -> impl Iterator<Item = (&str, f64)> {
		let total = self.transitions.total() as f64;
		self.transitions
			.iter()
			.map(move |(token, occurrence)| (token.as_str(), occurrence as f64 / total))
	}

	/// Number of distinct next tokens.
	pub fn len(&self) -> usize {
		self.transitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.transitions.is_empty()
	}

	/// Number of observations of this context.
	pub fn total(&self) -> usize {
		self.transitions.total()
	}

	/// Predicts the next token using weighted random sampling.
	///
	/// The probability of selecting a token is proportional to its
	/// occurrence count. Transitions are scanned in first-seen order, so a
	/// seeded `rng` always gives the same answer.
	///
	/// Returns `None` if the state has no transitions.
	pub fn predict<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
		let total = self.transitions.total();
		if total == 0 {
			return None;
		}

		let mut r = rng.random_range(0..total);
		for (next_token, occurrence) in self.transitions.iter() {
			if r < occurrence {
				return Some(next_token.as_str());
			}
			r -= occurrence;
		}

		// Unreachable while `total` matches the counts
		None
	}
}
