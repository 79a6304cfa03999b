use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use log::trace;

use crate::error::Result;
use crate::tokenize::Tokenizer;
use super::extractor::padded_ngrams;
use super::mle_model::Model;

/// Outcome of scoring a sentence.
///
/// `Undefined` is produced when some n-gram of the sentence has zero
/// probability under the model (or when there is nothing to score); it is a
/// regular value that callers filter, not an error.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Perplexity {
	Score(f64),
	Undefined,
}

impl Perplexity {
	/// Returns the numeric score, `None` if undefined.
	pub fn score(self) -> Option<f64> {
		match self {
			Perplexity::Score(value) => Some(value),
			Perplexity::Undefined => None,
		}
	}

	pub fn is_defined(self) -> bool {
		matches!(self, Perplexity::Score(_))
	}
}

impl fmt::Display for Perplexity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Perplexity::Score(value) => write!(f, "{}", value),
			Perplexity::Undefined => write!(f, "undefined"),
		}
	}
}

/// Perplexity of an already tokenized sentence at `order`.
///
/// The sentence is padded like training data, each n-gram's conditional
/// probability is looked up, and the result is `exp(-mean(ln p))`.
///
/// # Errors
/// Returns an error if `order` is outside `1..=model.max_order()`.
pub fn perplexity<S: AsRef<str>>(model: &Model, order: usize, tokens: &[S]) -> Result<Perplexity> {
	model.check_order(order)?;

	let mut log_sum = 0.0;
	let mut count = 0usize;
	for ngram in padded_ngrams(tokens, order)? {
		let probability = match (model.state(order, ngram.context()), ngram.last()) {
			(Some(state), Some(token)) => state.probability(token),
			_ => 0.0,
		};
		if probability == 0.0 {
			trace!("unseen n-gram {} at order {}", ngram, order);
			return Ok(Perplexity::Undefined);
		}
		log_sum += probability.ln();
		count += 1;
	}

	if count == 0 {
		return Ok(Perplexity::Undefined);
	}
	Ok(Perplexity::Score((-log_sum / count as f64).exp()))
}

/// Scores raw sentences against a model.
///
/// Sentences are lowercased and tokenized with the wrapped tokenizer before
/// scoring, mirroring how test sentences are compared to a training corpus.
pub struct PerplexityEvaluator<'a, T: Tokenizer> {
	model: &'a Model,
	tokenizer: T,
}

impl<'a, T: Tokenizer> PerplexityEvaluator<'a, T> {
	pub fn new(model: &'a Model, tokenizer: T) -> Self {
		Self { model, tokenizer }
	}

	/// Lowercases, tokenizes and scores one sentence.
	///
	/// # Errors
	/// Returns an error if `order` is outside the model's range.
	pub fn score(&self, order: usize, sentence: &str) -> Result<Perplexity> {
		let tokens = self.tokenizer.tokenize(&sentence.to_lowercase());
		perplexity(self.model, order, &tokens)
	}

	/// Returns up to `n` `(sentence, score)` pairs with the lowest defined
	/// perplexity at `order`, ascending.
	///
	/// Sentences are trimmed; blank ones are skipped, undefined scores are
	/// skipped and a repeated sentence is reported once.
	///
	/// # Errors
	/// Returns an error if `order` is outside the model's range.
	pub fn lowest<I, S>(&self, order: usize, sentences: I, n: usize) -> Result<Vec<(String, f64)>>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		self.model.check_order(order)?;

		let mut seen = HashSet::new();
		let mut scored = Vec::new();
		for sentence in sentences {
			let sentence = sentence.as_ref().trim();
			if sentence.is_empty() || !seen.insert(sentence.to_owned()) {
				continue;
			}
			if let Perplexity::Score(value) = self.score(order, sentence)? {
				scored.push((sentence.to_owned(), value));
			}
		}

		scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
		scored.truncate(n);
		Ok(scored)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tokenize::WordTokenizer;

	fn corpus() -> Vec<Vec<&'static str>> {
		vec![
			vec!["the", "cat", "sat", "on", "the", "mat"],
			vec!["the", "dog", "sat", "on", "the", "rug"],
			vec!["a", "bird", "flew", "over", "the", "house"],
		]
	}

	#[test]
	fn test_training_sentence_beats_unrelated_words() {
		let model = Model::train(&corpus(), 1).unwrap();
		let seen = perplexity(&model, 1, &["the", "cat", "sat"]).unwrap().score().unwrap();
		let odd = perplexity(&model, 1, &["bird", "flew", "rug"]).unwrap().score().unwrap();
		assert!(seen < odd, "{} should be < {}", seen, odd);
	}

	#[test]
	fn test_bigram_score_matches_manual_computation() {
		let model = Model::train(&corpus(), 2).unwrap();
		// P(the|<s>) = 2/3, P(cat|the) = 1/5, P(sat|cat) = 1, P(</s>|sat) = 0
		assert_eq!(perplexity(&model, 2, &["the", "cat", "sat"]).unwrap(), Perplexity::Undefined);

		let p = [2.0 / 3.0, 1.0 / 5.0, 1.0, 1.0, 1.0 / 5.0, 1.0, 1.0];
		let expected = (-p.iter().map(|v: &f64| v.ln()).sum::<f64>() / p.len() as f64).exp();
		let score = perplexity(&model, 2, &["the", "cat", "sat", "on", "the", "mat"])
			.unwrap()
			.score()
			.unwrap();
		assert!((score - expected).abs() < 1e-9);
	}

	#[test]
	fn test_unseen_ngram_is_undefined() {
		let model = Model::train(&corpus(), 3).unwrap();
		assert_eq!(perplexity(&model, 1, &["zebra"]).unwrap(), Perplexity::Undefined);
		assert_eq!(perplexity(&model, 3, &["the", "bird"]).unwrap(), Perplexity::Undefined);
	}

	#[test]
	fn test_empty_unigram_sentence_is_undefined() {
		let model = Model::train(&corpus(), 2).unwrap();
		let empty: [&str; 0] = [];
		assert_eq!(perplexity(&model, 1, &empty).unwrap(), Perplexity::Undefined);
	}

	#[test]
	fn test_order_out_of_range() {
		let model = Model::train(&corpus(), 2).unwrap();
		assert!(perplexity(&model, 3, &["the"]).is_err());
		assert!(perplexity(&model, 0, &["the"]).is_err());
	}

	#[test]
	fn test_lowest_ranks_defined_scores() {
		let model = Model::train(&corpus(), 2).unwrap();
		let evaluator = PerplexityEvaluator::new(&model, WordTokenizer::new());
		let sentences = [
			"The cat sat on the mat",
			"zebra crossing",
			"",
			"the dog sat on the rug",
			"The cat sat on the mat",
		];
		let ranked = evaluator.lowest(2, sentences, 5).unwrap();
		assert_eq!(ranked.len(), 2);
		assert!(ranked[0].1 <= ranked[1].1);
		assert!(ranked.iter().all(|(s, _)| s != "zebra crossing"));

		let top = evaluator.lowest(2, sentences, 1).unwrap();
		assert_eq!(top.len(), 1);
	}

	#[test]
	fn test_display() {
		assert_eq!(Perplexity::Undefined.to_string(), "undefined");
		assert_eq!(Perplexity::Score(2.5).to_string(), "2.5");
	}
}
