use std::fmt;

use crate::error::{NgramError, Result};
use super::{END_TOKEN, START_TOKEN};

/// An ordered, fixed-length tuple of tokens.
///
/// # Invariants
/// - The length never changes after construction (it is the n-gram order)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NGram(Vec<String>);

impl NGram {
	/// Builds an n-gram from any sequence of tokens.
	pub fn new<I, S>(tokens: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self(tokens.into_iter().map(Into::into).collect())
	}

	/// Number of tokens (the order).
	pub fn order(&self) -> usize {
		self.0.len()
	}

	/// All tokens but the last one.
	pub fn context(&self) -> &[String] {
		match self.0.split_last() {
			Some((_, context)) => context,
			None => &[],
		}
	}

	/// The predicted (final) token, `None` for the empty n-gram.
	pub fn last(&self) -> Option<&str> {
		self.0.last().map(String::as_str)
	}

	pub fn tokens(&self) -> &[String] {
		&self.0
	}
}

impl From<Vec<String>> for NGram {
	fn from(tokens: Vec<String>) -> Self {
		Self(tokens)
	}
}

/// Formats as a tuple, e.g. `(the, cat)`.
impl fmt::Display for NGram {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "({})", self.0.join(", "))
	}
}

/// Lazy iterator over the contiguous windows of a (possibly padded) sequence.
///
/// Created by [`padded_ngrams`] and [`ngrams`].
#[derive(Debug, Clone)]
pub struct Windows {
	sequence: Vec<String>,
	order: usize,
	position: usize,
}

impl Iterator for Windows {
	type Item = NGram;

	fn next(&mut self) -> Option<NGram> {
		let end = self.position + self.order;
		if end > self.sequence.len() {
			return None;
		}
		let window = NGram(self.sequence[self.position..end].to_vec());
		self.position += 1;
		Some(window)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let remaining = (self.sequence.len() + 1).saturating_sub(self.position + self.order);
		(remaining, Some(remaining))
	}
}

impl ExactSizeIterator for Windows {}

fn check_order(order: usize) -> Result<()> {
	if order == 0 {
		return Err(NgramError::InvalidOrder { order });
	}
	Ok(())
}

/// Yields every order-`order` window after boundary padding.
///
/// `order - 1` start sentinels are placed before the sequence and one end
/// sentinel after it. Unigrams are taken from the unpadded sequence.
///
/// For `order >= 2` a sequence of `n` tokens yields exactly `n + 1` windows,
/// so even an empty sequence yields one.
///
/// # Errors
/// Returns an error if `order == 0`.
pub fn padded_ngrams<S: AsRef<str>>(tokens: &[S], order: usize) -> Result<Windows> {
	check_order(order)?;

	let mut sequence = Vec::with_capacity(tokens.len() + order);
	if order > 1 {
		sequence.extend((0..order - 1).map(|_| START_TOKEN.to_owned()));
	}
	sequence.extend(tokens.iter().map(|t| t.as_ref().to_owned()));
	if order > 1 {
		sequence.push(END_TOKEN.to_owned());
	}

	Ok(Windows { sequence, order, position: 0 })
}

/// Yields every order-`order` window of the raw sequence, without padding.
///
/// A sequence shorter than `order` yields nothing.
///
/// # Errors
/// Returns an error if `order == 0`.
pub fn ngrams<S: AsRef<str>>(tokens: &[S], order: usize) -> Result<Windows> {
	check_order(order)?;
	let sequence = tokens.iter().map(|t| t.as_ref().to_owned()).collect();
	Ok(Windows { sequence, order, position: 0 })
}

#[cfg(test)]
mod tests {
	use super::*;

	fn collect(windows: Windows) -> Vec<Vec<String>> {
		windows.map(|g| g.tokens().to_vec()).collect()
	}

	#[test]
	fn test_bigrams_are_padded_on_both_sides() {
		let grams = collect(padded_ngrams(&["the", "cat"], 2).unwrap());
		assert_eq!(grams, vec![
			vec!["<s>".to_owned(), "the".to_owned()],
			vec!["the".to_owned(), "cat".to_owned()],
			vec!["cat".to_owned(), "</s>".to_owned()],
		]);
	}

	#[test]
	fn test_trigrams_use_two_start_sentinels() {
		let grams = collect(padded_ngrams(&["a"], 3).unwrap());
		assert_eq!(grams, vec![
			vec!["<s>".to_owned(), "<s>".to_owned(), "a".to_owned()],
			vec!["<s>".to_owned(), "a".to_owned(), "</s>".to_owned()],
		]);
	}

	#[test]
	fn test_unigrams_are_not_padded() {
		let grams = collect(padded_ngrams(&["x", "y"], 1).unwrap());
		assert_eq!(grams, vec![vec!["x".to_owned()], vec!["y".to_owned()]]);
	}

	#[test]
	fn test_short_input_still_yields_a_window() {
		let empty: [&str; 0] = [];
		let windows = padded_ngrams(&empty, 4).unwrap();
		assert_eq!(windows.len(), 1);
		assert_eq!(collect(windows), vec![vec!["<s>", "<s>", "<s>", "</s>"]
			.into_iter()
			.map(str::to_owned)
			.collect::<Vec<_>>()]);
	}

	#[test]
	fn test_every_window_has_the_requested_order() {
		let tokens = ["a", "b", "c", "d", "e"];
		for order in 1..=4 {
			let windows = padded_ngrams(&tokens, order).unwrap();
			let expected = if order == 1 { 5 } else { 6 };
			assert_eq!(windows.len(), expected);
			assert!(windows.into_iter().all(|g| g.order() == order));
		}
	}

	#[test]
	fn test_unpadded_windows_skip_short_input() {
		assert_eq!(ngrams(&["a", "b"], 3).unwrap().count(), 0);
		assert_eq!(ngrams(&["a", "b", "c"], 2).unwrap().count(), 2);
	}

	#[test]
	fn test_order_zero_is_rejected() {
		assert!(matches!(padded_ngrams(&["a"], 0), Err(NgramError::InvalidOrder { order: 0 })));
		assert!(ngrams(&["a"], 0).is_err());
	}

	#[test]
	fn test_context_and_last() {
		let gram = NGram::new(["the", "cat", "sat"]);
		assert_eq!(gram.context(), &["the".to_owned(), "cat".to_owned()]);
		assert_eq!(gram.last(), Some("sat"));
		assert_eq!(gram.to_string(), "(the, cat, sat)");
		assert!(NGram::new(["solo"]).context().is_empty());
	}
}
