use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use rs_ngram_core::model::generator::GenerationConfig;
use serde::Deserialize;

/// Settings of the report routine.
///
/// Every field has a default, so the routine runs without any configuration
/// file. When `ngram-report.json` exists in the working directory, its
/// fields override the defaults.
///
/// # Invariants (checked by `validate`)
/// - `max_order >= 1` and every listed order lies in `1..=max_order`
/// - `train_ratio` lies in `(0.0, 1.0]`
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
	/// Training sentences, one per line.
	pub train_path: PathBuf,

	/// Held-out sentences, one per line.
	pub test_path: PathBuf,

	/// When set, every `.txt` file of this directory is compiled into one
	/// corpus and split by `train_ratio` instead of reading the two paths.
	pub corpus_dir: Option<PathBuf>,

	/// Share of `corpus_dir` lines used for training.
	pub train_ratio: f64,

	/// Highest order the model is trained at.
	pub max_order: usize,

	/// Lowercase the training sentences before tokenizing.
	pub lowercase_training: bool,

	/// Orders ranked by frequency and how many n-grams to print per order.
	pub ranking_orders: Vec<usize>,
	pub top_k: usize,

	/// Orders used for perplexity and how many sentences to print per order.
	pub perplexity_orders: Vec<usize>,
	pub perplexity_count: usize,

	/// Orders used for generation.
	pub generation_orders: Vec<usize>,
	pub max_tokens: usize,
	pub wrap_width: usize,

	/// Fixed seed for reproducible generation.
	pub seed: Option<u64>,
}

impl Default for ReportConfig {
	fn default() -> Self {
		Self {
			train_path: PathBuf::from("processed_data/train.txt"),
			test_path: PathBuf::from("processed_data/test.txt"),
			corpus_dir: None,
			train_ratio: 0.8,
			max_order: 4,
			lowercase_training: false,
			ranking_orders: vec![1, 2, 3],
			top_k: 10,
			perplexity_orders: vec![1, 2, 3],
			perplexity_count: 5,
			generation_orders: vec![1, 2, 3, 4],
			max_tokens: 100,
			wrap_width: 70,
			seed: None,
		}
	}
}

impl ReportConfig {
	/// Loads the configuration file if present, defaults otherwise.
	///
	/// # Errors
	/// Returns an error if the file exists but cannot be read, parsed or
	/// validated.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
		let path = path.as_ref();
		let config = if path.is_file() {
			info!("reading configuration from {}", path.display());
			serde_json::from_str(&fs::read_to_string(path)?)?
		} else {
			Self::default()
		};
		config.validate()?;
		Ok(config)
	}

	/// Checks every order and the split ratio.
	///
	/// # Errors
	/// Returns a description of the first invalid field.
	pub fn validate(&self) -> Result<(), String> {
		if self.max_order == 0 {
			return Err("max_order must be >= 1".to_owned());
		}
		if !(self.train_ratio > 0.0 && self.train_ratio <= 1.0) {
			return Err(format!("train_ratio must be in (0.0, 1.0], got {}", self.train_ratio));
		}
		let orders = self.ranking_orders.iter().chain(&self.perplexity_orders).chain(&self.generation_orders);
		for &order in orders {
			if order == 0 || order > self.max_order {
				return Err(format!("order {} must be between 1 and max_order {}", order, self.max_order));
			}
		}
		Ok(())
	}

	/// Generation settings for one order.
	pub fn generation(&self, order: usize) -> GenerationConfig {
		GenerationConfig { order, max_tokens: self.max_tokens }
	}
}
