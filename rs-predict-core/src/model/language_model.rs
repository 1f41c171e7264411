use std::path::Path;

use serde::{Deserialize, Serialize};

use super::predict_options::PredictOptions;
use crate::dictionary::word_store::{Dictionary, LookupMatch, WID_NONE, WordId};
use crate::error::ModelError;
use crate::sort::stable_argsort_desc;
use crate::text::tokenize_text;

/// Id of `<unk>`, the stand-in for every out-of-vocabulary word.
pub const UNKNOWN_WORD_ID: WordId = 0;
/// Id of `<s>`.
pub const BEGIN_OF_SENTENCE_ID: WordId = 1;
/// Id of `</s>`.
pub const END_OF_SENTENCE_ID: WordId = 2;
/// Id of `<num>`, the class of all numbers.
pub const NUMBER_ID: WordId = 3;
/// Control words occupy ids `0..NUM_CONTROL_WORDS` in every model.
pub const NUM_CONTROL_WORDS: usize = 4;

/// Spelling of the control words, indexed by id.
pub const CONTROL_WORDS: [&str; NUM_CONTROL_WORDS] = ["<unk>", "<s>", "</s>", "<num>"];

/// One entry of a prediction result.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Prediction {
	pub word: String,
	pub probability: f64,
}

/// Match information for one word of a looked-up text.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct WordInfo {
	/// Character span of the word in the text.
	pub start: usize,
	pub end: usize,
	pub word: String,
	/// The word is in the vocabulary.
	pub exact_match: bool,
	/// Vocabulary words start with it.
	pub partial_match: bool,
}

/// A language model: a vocabulary plus a way to score words in context.
///
/// Back-ends implement candidate generation (`get_candidates`) and scoring
/// (`get_probs`); the prediction pipeline itself (`predict`) is shared.
///
/// # Contract for implementors
/// - The dictionary holds the control words at ids `0..NUM_CONTROL_WORDS`
/// - `get_probs` returns exactly one finite, non-negative value per
///   candidate, in candidate order
/// - `clear` drops all learned state but keeps the control words
pub trait LanguageModel {
	/// The model's vocabulary.
	fn dictionary(&self) -> &Dictionary;

	/// Drops all learned words and statistics.
	fn clear(&mut self);

	/// Candidate words for a completion of `prefix` after `history`.
	fn get_candidates(&self, history: &[WordId], prefix: &str, options: &PredictOptions) -> Vec<WordId>;

	/// Probability of each candidate following `history`, aligned with `candidates`.
	fn get_probs(&self, history: &[WordId], candidates: &[WordId]) -> Vec<f64>;

	/// Replaces the model with the one stored at `path`.
	///
	/// # Errors
	/// `NotImplemented` unless the back-end supports persistence.
	fn load(&mut self, _path: &Path) -> Result<(), ModelError> {
		Err(ModelError::NotImplemented)
	}

	/// Writes the model to `path`.
	///
	/// # Errors
	/// `NotImplemented` unless the back-end supports persistence.
	fn save(&self, _path: &Path) -> Result<(), ModelError> {
		Err(ModelError::NotImplemented)
	}

	/// Id of `word`; unknown words map to `UNKNOWN_WORD_ID`. Never fails.
	fn word_to_id(&self, word: &str) -> WordId {
		match self.dictionary().word_to_id(word) {
			WID_NONE => UNKNOWN_WORD_ID,
			wid => wid,
		}
	}

	fn words_to_ids<S: AsRef<str>>(&self, words: &[S]) -> Vec<WordId>
	where
		Self: Sized,
	{
		words.iter().map(|w| self.word_to_id(w.as_ref())).collect()
	}

	/// Word of `wid`, empty for unknown ids. Never fails.
	fn id_to_word(&self, wid: WordId) -> &str {
		self.dictionary().id_to_word(wid).unwrap_or("")
	}

	fn num_word_types(&self) -> usize {
		self.dictionary().num_word_types()
	}

	fn lookup_word(&self, word: &str) -> LookupMatch {
		self.dictionary().lookup_word(word)
	}

	/// Splits `text` into words and reports how each one matches the vocabulary.
	fn lookup_text(&self, text: &str) -> Vec<WordInfo> {
		tokenize_text(text)
			.into_iter()
			.map(|token| {
				let lookup = self.lookup_word(&token.text);
				WordInfo {
					start: token.start,
					end: token.end,
					exact_match: lookup == LookupMatch::ExactMatch,
					partial_match: matches!(lookup, LookupMatch::PartialMatches(_)),
					word: token.text,
				}
			})
			.collect()
	}

	/// Predicts completions of the last word of `context`.
	///
	/// The last element of `context` is the word being typed (possibly
	/// empty), the elements before it are the history. Out-of-vocabulary
	/// history words are scored as `<unk>`.
	///
	/// Results are ranked by descending probability (stable), unless
	/// `skip_sort` is set, and cut to `limit` entries (`None` for all).
	/// An empty context yields an empty result.
	fn predict<S: AsRef<str>>(&self, context: &[S], limit: Option<usize>, options: &PredictOptions) -> Vec<Prediction>
	where
		Self: Sized,
	{
		let Some((prefix, history)) = context.split_last() else {
			return Vec::new();
		};
		let prefix = prefix.as_ref();
		let history = self.words_to_ids(history);

		let candidates = self.get_candidates(&history, prefix, options);

		let mut probabilities = self.get_probs(&history, &candidates);
		if probabilities.len() != candidates.len() {
			log::warn!(
				"model returned {} probabilities for {} candidates",
				probabilities.len(),
				candidates.len()
			);
			probabilities.resize(candidates.len(), 0.0);
		}

		if options.normalize {
			let sum: f64 = probabilities.iter().sum();
			if sum > 0.0 {
				probabilities.iter_mut().for_each(|p| *p /= sum);
			}
		}

		let mut order: Vec<usize> = (0..candidates.len()).collect();
		if !options.skip_sort {
			stable_argsort_desc(&mut order, &probabilities);
		}

		let result_size = limit.map_or(order.len(), |limit| limit.min(order.len()));
		log::debug!(
			"predict: history {:?}, prefix {:?}, {} candidates, {} results",
			history,
			prefix,
			candidates.len(),
			result_size
		);

		order[..result_size]
			.iter()
			.map(|&i| Prediction {
				word: self.id_to_word(candidates[i]).to_owned(),
				probability: probabilities[i],
			})
			.collect()
	}

	/// Probability of the last word of `ngram` given the words before it.
	///
	/// Runs a full, unlimited and normalized prediction and reads the word's
	/// entry; words that are not predicted get the `<unk>` probability.
	/// Slow, meant for evaluation rather than interactive use.
	fn get_probability<S: AsRef<str>>(&self, ngram: &[S]) -> f64
	where
		Self: Sized,
	{
		let Some((word, history)) = ngram.split_last() else {
			return 0.0;
		};
		let word = word.as_ref();

		let mut context: Vec<&str> = history.iter().map(AsRef::as_ref).collect();
		context.push("");

		let options = PredictOptions { normalize: true, ..PredictOptions::none() };
		let results = self.predict(&context, None, &options);

		let unknown = CONTROL_WORDS[UNKNOWN_WORD_ID as usize];
		results
			.iter()
			.find(|r| r.word == word)
			.or_else(|| results.iter().find(|r| r.word == unknown))
			.map_or(0.0, |r| r.probability)
	}
}
