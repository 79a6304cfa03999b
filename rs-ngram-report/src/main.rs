use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

use rs_ngram_core::model::mle_model::Model;
use rs_ngram_core::tokenize::WordTokenizer;

mod config;
mod report;

use config::ReportConfig;
use report::Corpus;

/// Optional configuration file, read from the working directory.
const CONFIG_FILE: &str = "ngram-report.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::init();

	let config = ReportConfig::load(CONFIG_FILE)?;
	let corpus = Corpus::load(&config)?;
	info!("{} training / {} test sentences", corpus.train.len(), corpus.test.len());

	// The model is rebuilt from the corpus on every run
	let training = report::tokenize_training(&WordTokenizer::new(), &corpus.train, config.lowercase_training);
	let model = Model::train(&training, config.max_order)?;
	info!("trained order-{} model, vocabulary of {} tokens", model.max_order(), model.vocabulary().len());

	print!("{}", report::ranking_section(&config, &training)?);
	println!();
	print!("{}", report::perplexity_section(&config, &model, &corpus.test)?);

	let mut rng = match config.seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_os_rng(),
	};
	print!("{}", report::generation_section(&config, &model, &mut rng)?);

	Ok(())
}
