//! Bag-of-words extraction from raw document text

use std::collections::HashSet;

use rayon::prelude::*;

use crate::core::{Document, TermVector};

/// Common English stopwords
const STOP_WORDS: &[&str] = &[
	"a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
	"aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
	"but", "by", "can", "can't", "cannot", "could", "couldn't", "did", "didn't", "do", "does",
	"doesn't", "doing", "don't", "down", "during", "each", "few", "for", "from", "further", "had",
	"hadn't", "has", "hasn't", "have", "haven't", "having", "he", "he'd", "he'll", "he's", "her",
	"here", "here's", "hers", "herself", "him", "himself", "his", "how", "how's", "i", "i'd",
	"i'll", "i'm", "i've", "if", "in", "into", "is", "isn't", "it", "it's", "its", "itself",
	"let's", "me", "more", "most", "mustn't", "my", "myself", "no", "nor", "not", "of", "off",
	"on", "once", "only", "or", "other", "ought", "our", "ours", "ourselves", "out", "over",
	"own", "same", "shan't", "she", "she'd", "she'll", "she's", "should", "shouldn't", "so",
	"some", "such", "than", "that", "that's", "the", "their", "theirs", "them", "themselves",
	"then", "there", "there's", "these", "they", "they'd", "they'll", "they're", "they've",
	"this", "those", "through", "to", "too", "under", "until", "up", "very", "was", "wasn't",
	"we", "we'd", "we'll", "we're", "we've", "were", "weren't", "what", "what's", "when",
	"when's", "where", "where's", "which", "while", "who", "who's", "whom", "why", "why's",
	"will", "with", "won't", "would", "wouldn't", "you", "you'd", "you'll", "you're", "you've",
	"your", "yours", "yourself", "yourselves",
];

/// Turns text into normalized term-frequency vectors
#[derive(Debug, Clone)]
pub struct Vectorizer {
	stopwords: HashSet<String>,
}

impl Default for Vectorizer {
	fn default() -> Self {
		Self {
			stopwords: STOP_WORDS.iter().map(|w| w.to_string()).collect(),
		}
	}
}

impl Vectorizer {
	/// Fixed stopword set extended with caller-supplied words
	pub fn with_extra_stopwords<I, S>(extra: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut vectorizer = Self::default();
		vectorizer
			.stopwords
			.extend(extra.into_iter().map(|w| w.as_ref().trim().to_lowercase()));
		vectorizer
	}

	pub fn is_stopword(&self, term: &str) -> bool {
		self.stopwords.contains(term)
	}

	/// Lowercased word tokens with punctuation, numbers and stopwords removed
	pub fn tokenize(&self, text: &str) -> Vec<String> {
		text.split(|c: char| !(c.is_alphanumeric() || is_apostrophe(c)))
			.map(|raw| raw.trim_matches(is_apostrophe))
			.filter(|raw| raw.chars().any(char::is_alphabetic))
			.map(|raw| raw.replace(RIGHT_QUOTE, "'").to_lowercase())
			.filter(|token| !self.is_stopword(token))
			.collect()
	}

	pub fn vectorize(&self, text: &str) -> TermVector {
		TermVector::from_tokens(self.tokenize(text))
	}

	/// One vector per document, in input order
	pub fn vectorize_all(&self, documents: &[Document]) -> Vec<TermVector> {
		documents
			.par_iter()
			.map(|doc| self.vectorize(&doc.text))
			.collect()
	}
}

/// Typographic apostrophe, folded to `'`
const RIGHT_QUOTE: char = '\u{2019}';

fn is_apostrophe(c: char) -> bool {
	c == '\'' || c == RIGHT_QUOTE
}
