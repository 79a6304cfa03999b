use rand::Rng;
use rs_ngram_core::Result;
use rs_ngram_core::io::{list_files, read_raw_sentences, read_sentences, split_corpus};
use rs_ngram_core::model::extractor::ngrams;
use rs_ngram_core::model::frequency::FrequencyTable;
use rs_ngram_core::model::generator::Generator;
use rs_ngram_core::model::mle_model::Model;
use rs_ngram_core::model::perplexity::PerplexityEvaluator;
use rs_ngram_core::tokenize::{Tokenizer, WordTokenizer, detokenize, wrap};

use crate::config::ReportConfig;

/// Human name of an order, as used in section titles.
fn order_name(order: usize) -> String {
	match order {
		1 => "unigrams".to_owned(),
		2 => "bigrams".to_owned(),
		3 => "trigrams".to_owned(),
		4 => "four-grams".to_owned(),
		n => format!("{}-grams", n),
	}
}

/// Training and test sentences.
pub struct Corpus {
	pub train: Vec<String>,
	pub test: Vec<String>,
}

impl Corpus {
	/// Reads the corpus described by `config`.
	///
	/// With `corpus_dir`, every `.txt` file is read in name order, cleaned
	/// and cut into sentences, and the compiled sentences are split by
	/// position; otherwise the train and test files, already one sentence
	/// per line, are read as they are.
	pub fn load(config: &ReportConfig) -> Result<Self> {
		match &config.corpus_dir {
			Some(dir) => {
				let mut lines = Vec::new();
				for file in list_files(dir, "txt")? {
					lines.extend(read_raw_sentences(dir.join(file))?);
				}
				let (train, test) = split_corpus(&lines, config.train_ratio)?;
				Ok(Self { train, test })
			}
			None => Ok(Self {
				train: read_sentences(&config.train_path)?,
				test: read_sentences(&config.test_path)?,
			}),
		}
	}
}

/// Tokenizes the training sentences, lowercasing them when configured.
pub fn tokenize_training<T: Tokenizer>(tokenizer: &T, sentences: &[String], lowercase: bool) -> Vec<Vec<String>> {
	sentences
		.iter()
		.map(|sentence| {
			if lowercase {
				tokenizer.tokenize(&sentence.to_lowercase())
			} else {
				tokenizer.tokenize(sentence)
			}
		})
		.collect()
}

/// Most frequent raw n-grams of the training text, per configured order.
pub fn ranking_section(config: &ReportConfig, corpus: &[Vec<String>]) -> Result<String> {
	let words = corpus.concat();
	let mut out = String::new();
	for &order in &config.ranking_orders {
		out.push_str(&format!("\nMost frequent {}...\n\n", order_name(order)));
		let table = FrequencyTable::count_all(ngrams(&words, order)?);
		for (ngram, count) in table.top_k(config.top_k) {
			out.push_str(&format!("{} {}\n", ngram, count));
		}
	}
	Ok(out)
}

/// Lowest defined perplexities of the test sentences, per configured order.
pub fn perplexity_section(config: &ReportConfig, model: &Model, test: &[String]) -> Result<String> {
	let evaluator = PerplexityEvaluator::new(model, WordTokenizer::new());
	let mut out = String::new();
	for &order in &config.perplexity_orders {
		let name = order_name(order);
		out.push_str(&format!("\nlowest {} perplexities...\n\n", name.trim_end_matches('s')));
		for (sentence, score) in evaluator.lowest(order, test, config.perplexity_count)? {
			out.push_str(&format!("Perplexity of ('{}'):{}\n", sentence, score));
		}
	}
	Ok(out)
}

/// Generated text per configured order, detokenized and wrapped.
pub fn generation_section<R: Rng + ?Sized>(config: &ReportConfig, model: &Model, rng: &mut R) -> Result<String> {
	let mut out = String::new();
	for &order in &config.generation_orders {
		let generator = Generator::new(model, config.generation(order))?;
		let tokens = generator.generate(rng)?;
		out.push_str(&format!("\ngenerating text ({})...\n\n", order_name(order)));
		for line in wrap(&detokenize(&tokens), config.wrap_width) {
			out.push_str(&line);
			out.push('\n');
		}
	}
	Ok(out)
}
