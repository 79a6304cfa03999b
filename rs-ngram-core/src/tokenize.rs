use std::sync::LazyLock;

use regex::Regex;

/// Splits text into word-level tokens.
///
/// The engine never tokenizes by itself; every raw string goes through an
/// implementation of this trait first.
pub trait Tokenizer {
	fn tokenize(&self, text: &str) -> Vec<String>;
}

/// A word, optionally with an apostrophe suffix (`don't`, `river's`), or a
/// run of punctuation.
static WORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	// Constant pattern, cannot fail
	Regex::new(r"\w+(?:['’]\w+)*|[^\w\s]+").unwrap()
});

/// Default tokenizer: splits on whitespace and separates punctuation from
/// words. Case is preserved.
#[derive(Clone, Copy, Debug, Default)]
pub struct WordTokenizer;

impl WordTokenizer {
	pub fn new() -> Self {
		Self
	}
}

impl Tokenizer for WordTokenizer {
	fn tokenize(&self, text: &str) -> Vec<String> {
		WORD_PATTERN
			.find_iter(text)
			.map(|m| m.as_str().to_owned())
			.collect()
	}
}

/// Any closure `Fn(&str) -> Vec<String>` is a tokenizer.
impl<F> Tokenizer for F
where
	F: Fn(&str) -> Vec<String>,
{
	fn tokenize(&self, text: &str) -> Vec<String> {
		self(text)
	}
}

fn attaches_left(token: &str) -> bool {
	matches!(token, "." | "," | "!" | "?" | ";" | ":" | ")" | "]" | "}" | "%" | "..." | "'s" | "n't")
}

fn attaches_right(token: &str) -> bool {
	matches!(token, "(" | "[" | "{" | "$")
}

/// Joins tokens back into readable text.
///
/// Closing punctuation sticks to the previous word and opening brackets to
/// the next one; everything else is separated by a single space.
pub fn detokenize<S: AsRef<str>>(tokens: &[S]) -> String {
	let mut text = String::new();
	let mut glue_next = true;
	for token in tokens {
		let token = token.as_ref();
		if !glue_next && !attaches_left(token) {
			text.push(' ');
		}
		text.push_str(token);
		glue_next = attaches_right(token);
	}
	text
}

/// Greedy word wrap on whitespace.
///
/// Words longer than `width` get a line of their own. A `width` of 0 is
/// treated as 1.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
	let width = width.max(1);
	let mut lines = Vec::new();
	let mut line = String::new();
	for word in text.split_whitespace() {
		let needed = if line.is_empty() { word.chars().count() } else { line.chars().count() + 1 + word.chars().count() };
		if needed > width && !line.is_empty() {
			lines.push(std::mem::take(&mut line));
		}
		if !line.is_empty() {
			line.push(' ');
		}
		line.push_str(word);
	}
	if !line.is_empty() {
		lines.push(line);
	}
	lines
}
