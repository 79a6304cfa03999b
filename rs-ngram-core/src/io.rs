use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;
use std::{fs, io};

use log::info;
use regex::Regex;

use crate::error::{NgramError, Result};

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
pub fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Reads a newline-delimited corpus, dropping blank lines.
pub fn read_sentences<P: AsRef<Path>>(filename: P) -> Result<Vec<String>> {
	let path = filename.as_ref();
	let sentences: Vec<String> = read_file(path)?
		.into_iter()
		.filter(|line| !line.trim().is_empty())
		.collect();
	info!("loaded {} sentences from {}", sentences.len(), path.display());
	Ok(sentences)
}

/// Sentence terminator with its trailing spaces.
static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.?!] *").unwrap());

/// Anything that is neither a word character nor whitespace.
static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Turns raw article text into cleaned, lowercased sentences.
///
/// - Non-ASCII characters are dropped and line breaks joined
/// - The text is split after every `.`, `?` or `!`
/// - Punctuation is stripped and whitespace collapsed
/// - Blank sentences are skipped
pub fn split_sentences(text: &str) -> Vec<String> {
	let ascii: String = text
		.chars()
		.filter(char::is_ascii)
		.map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
		.collect();

	SENTENCE_END
		.split(&ascii)
		.filter_map(|piece| {
			let stripped = NON_WORD.replace_all(piece, "");
			let sentence = WHITESPACE.replace_all(stripped.trim(), " ").to_lowercase();
			(!sentence.is_empty()).then_some(sentence)
		})
		.collect()
}

/// Reads a raw text file and splits it with [`split_sentences`].
pub fn read_raw_sentences<P: AsRef<Path>>(filename: P) -> Result<Vec<String>> {
	let path = filename.as_ref();
	let sentences = split_sentences(&fs::read_to_string(path)?);
	info!("extracted {} sentences from {}", sentences.len(), path.display());
	Ok(sentences)
}

/// Lists all files with a given extension in a directory, sorted by name.
///
/// Returns file names only (no paths).
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}

/// Splits lines into a training and a test set by position.
///
/// The first `ceil(len * train_ratio)` lines go to training, the rest to
/// testing. The split is deterministic.
///
/// # Errors
/// Returns an error if `train_ratio` is not in `(0.0, 1.0]`.
pub fn split_corpus<T: Clone>(lines: &[T], train_ratio: f64) -> Result<(Vec<T>, Vec<T>)> {
	if !(train_ratio > 0.0 && train_ratio <= 1.0) {
		return Err(NgramError::InvalidRatio(train_ratio));
	}
	let cut = ((lines.len() as f64) * train_ratio).ceil() as usize;
	let cut = cut.min(lines.len());
	Ok((lines[..cut].to_vec(), lines[cut..].to_vec()))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_split_by_proportion() {
		let lines: Vec<u32> = (0..10).collect();
		let (train, test) = split_corpus(&lines, 0.8).unwrap();
		assert_eq!(train, (0..8).collect::<Vec<_>>());
		assert_eq!(test, vec![8, 9]);

		let (train, test) = split_corpus(&lines, 1.0).unwrap();
		assert_eq!(train.len(), 10);
		assert!(test.is_empty());
	}

	#[test]
	fn test_split_rejects_bad_ratio() {
		let lines = ["a", "b"];
		assert!(matches!(split_corpus(&lines, 0.0), Err(NgramError::InvalidRatio(_))));
		assert!(split_corpus(&lines, 1.5).is_err());
		assert!(split_corpus(&lines, f64::NAN).is_err());
	}

	#[test]
	fn test_read_sentences_skips_blank_lines() {
		let path = std::env::temp_dir().join(format!("rs-ngram-io-{}.txt", std::process::id()));
		fs::write(&path, "first line\n\n   \nsecond line\r\n").unwrap();
		let sentences = read_sentences(&path).unwrap();
		fs::remove_file(&path).unwrap();
		assert_eq!(sentences, vec!["first line", "second line"]);
	}

	#[test]
	fn test_split_sentences_cleans_article_text() {
		let text = "The Cat sat on the mat. Did it move?\nNo,  it  didn't!   Café \"au lait\"...";
		assert_eq!(split_sentences(text), vec![
			"the cat sat on the mat",
			"did it move",
			"no it didnt",
			"caf au lait",
		]);
		assert!(split_sentences(" ... !? ").is_empty());
	}

	#[test]
	fn test_read_raw_sentences_joins_broken_lines() {
		let path = std::env::temp_dir().join(format!("rs-ngram-raw-{}.txt", std::process::id()));
		fs::write(&path, "A sentence split\nacross two lines. Another one").unwrap();
		let sentences = read_raw_sentences(&path).unwrap();
		fs::remove_file(&path).unwrap();
		assert_eq!(sentences, vec!["a sentence split across two lines", "another one"]);
	}

	#[test]
	fn test_missing_file_is_an_io_error() {
		let result = read_sentences("/definitely/not/here.txt");
		assert!(matches!(result, Err(NgramError::Io(_))));
	}
}
