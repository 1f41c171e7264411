use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::language_model::{CONTROL_WORDS, LanguageModel, NUM_CONTROL_WORDS, NUMBER_ID, UNKNOWN_WORD_ID};
use super::ngram_model::NgramModel;
use super::predict_options::PredictOptions;
use crate::dictionary::word_store::{Dictionary, WID_NONE, WordId};
use crate::error::ModelError;
use crate::io::{build_output_path, read_file};
use crate::sort::stable_sort_desc_by_key;
use crate::text::{is_number, tokenize_text};

/// Word-frequency model: the probability of a word is its share of all
/// learned tokens, regardless of history.
///
/// Each control word starts with a count of 1, so `<unk>` always carries
/// some probability for words the model has never seen.
///
/// # Invariants
/// - `counts.len() == dictionary.num_word_types()`
/// - `total` is the sum of `counts`
/// - Ids `0..NUM_CONTROL_WORDS` hold the control words
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UnigramModel {
	dictionary: Dictionary,

	/// Occurrences per word id.
	counts: Vec<u32>,

	/// Sum of all counts.
	total: u64,
}

impl Default for UnigramModel {
	fn default() -> Self {
		Self::new()
	}
}

impl UnigramModel {
	/// Creates a model knowing only the control words.
	pub fn new() -> Self {
		let mut model = Self {
			dictionary: Dictionary::new(),
			counts: Vec::new(),
			total: 0,
		};
		model.seed_control_words();
		model
	}

	fn seed_control_words(&mut self) {
		self.dictionary.reserve_words(NUM_CONTROL_WORDS);
		for word in CONTROL_WORDS {
			// A handful of words in an empty dictionary cannot exhaust ids
			let _ = self.dictionary.add_word(word);
		}
		self.counts = vec![1; NUM_CONTROL_WORDS];
		self.total = NUM_CONTROL_WORDS as u64;
	}

	/// Builds a model from a text corpus (one sentence per line).
	///
	/// A binary cache next to the corpus (`english.dat` → `english.bin`) is
	/// loaded when present; otherwise the corpus is learned and the cache
	/// written for the next start.
	///
	/// # Errors
	/// Fails if the corpus or the cache cannot be read or written.
	pub fn from_corpus<P: AsRef<Path>>(filepath: P) -> Result<Self, ModelError> {
		let binary_data_path = build_output_path(&filepath, "bin")?;
		let mut model = Self::new();

		if binary_data_path.exists() {
			model.load(&binary_data_path)?;
		} else {
			for line in read_file(&filepath)? {
				model.learn_text(&line, true)?;
			}
			model.save(&binary_data_path)?;
			log::info!(
				"learned {} ({} words, {} tokens)",
				filepath.as_ref().display(),
				model.num_word_types(),
				model.total
			);
		}

		Ok(model)
	}

	/// Counts the words of `text`.
	///
	/// Numbers are counted as `<num>`. Unknown words are added to the
	/// vocabulary if `allow_new_words` is set, otherwise counted as `<unk>`.
	/// Returns the number of tokens learned.
	///
	/// # Errors
	/// - `OutOfMemory` / `VocabularyFull` if a new word cannot be added
	/// - `Count` if a count overflows
	pub fn learn_text(&mut self, text: &str, allow_new_words: bool) -> Result<usize, ModelError> {
		let tokens: Vec<String> = tokenize_text(text).into_iter().map(|t| t.text).collect();
		self.learn_tokens(&tokens, allow_new_words)?;
		Ok(tokens.len())
	}

	/// Counts already tokenized words, see `learn_text`.
	pub fn learn_tokens<S: AsRef<str>>(&mut self, tokens: &[S], allow_new_words: bool) -> Result<(), ModelError> {
		for token in tokens {
			let token = token.as_ref();
			let wid = if is_number(token) {
				NUMBER_ID
			} else {
				match self.dictionary.word_to_id(token) {
					WID_NONE if allow_new_words => {
						let wid = self.dictionary.add_word(token)?;
						self.counts.push(0);
						wid
					}
					WID_NONE => UNKNOWN_WORD_ID,
					wid => wid,
				}
			};

			let count = &mut self.counts[wid as usize];
			*count = count.checked_add(1).ok_or(ModelError::Count)?;
			self.total += 1;
		}
		Ok(())
	}

	/// Merges another model into this one.
	///
	/// Words missing here are added, counts are summed. The control word
	/// seeds of `other` are not counted twice.
	///
	/// # Errors
	/// - `OutOfMemory` / `VocabularyFull` if a new word cannot be added
	/// - `Count` if a count overflows
	pub fn merge(&mut self, other: &Self) -> Result<(), ModelError> {
		for (wid, &count) in other.counts.iter().enumerate() {
			let Some(word) = other.dictionary.id_to_word(wid as WordId) else {
				continue;
			};
			let count = if wid < NUM_CONTROL_WORDS { count.saturating_sub(1) } else { count };

			let target = match self.dictionary.word_to_id(word) {
				WID_NONE => {
					let target = self.dictionary.add_word(word)?;
					self.counts.push(0);
					target
				}
				target => target,
			};

			let slot = &mut self.counts[target as usize];
			*slot = slot.checked_add(count).ok_or(ModelError::Count)?;
			self.total += u64::from(count);
		}
		Ok(())
	}

	/// Number of times `word` was learned, 0 if unknown.
	pub fn count(&self, word: &str) -> u32 {
		match self.dictionary.word_to_id(word) {
			WID_NONE => 0,
			wid => self.counts[wid as usize],
		}
	}

	/// Number of tokens learned, control word seeds included.
	pub fn total(&self) -> u64 {
		self.total
	}

	/// Checks the invariants of a freshly decoded model.
	fn validate(&self) -> Result<(), ModelError> {
		if self.counts.len() != self.dictionary.num_word_types() {
			return Err(ModelError::NumTokens);
		}
		let controls_ok = CONTROL_WORDS
			.iter()
			.enumerate()
			.all(|(wid, word)| self.dictionary.id_to_word(wid as WordId) == Some(*word));
		if !controls_ok {
			return Err(ModelError::NumTokens);
		}
		let sum: u64 = self.counts.iter().map(|&c| u64::from(c)).sum();
		if sum != self.total {
			return Err(ModelError::Count);
		}
		Ok(())
	}
}

impl LanguageModel for UnigramModel {
	fn dictionary(&self) -> &Dictionary {
		&self.dictionary
	}

	fn clear(&mut self) {
		self.seed_control_words();
	}

	fn get_candidates(&self, _history: &[WordId], prefix: &str, options: &PredictOptions) -> Vec<WordId> {
		let mut wids = self.dictionary.prefix_search(prefix, None, &options.prefix_search_options());
		if options.sort_by_weight {
			stable_sort_desc_by_key(&mut wids, |&wid| self.counts[wid as usize]);
		}
		wids
	}

	fn get_probs(&self, _history: &[WordId], candidates: &[WordId]) -> Vec<f64> {
		if self.total == 0 {
			return vec![0.0; candidates.len()];
		}
		let total = self.total as f64;
		candidates
			.iter()
			.map(|&wid| self.counts.get(wid as usize).map_or(0.0, |&c| f64::from(c) / total))
			.collect()
	}

	fn load(&mut self, path: &Path) -> Result<(), ModelError> {
		let bytes = fs::read(path)?;
		let model: Self = postcard::from_bytes(&bytes)?;
		model.validate()?;
		*self = model;
		log::info!(
			"loaded {} ({} words, {} tokens, ~{} B dictionary)",
			path.display(),
			self.num_word_types(),
			self.total,
			self.dictionary.memory_size()
		);
		Ok(())
	}

	fn save(&self, path: &Path) -> Result<(), ModelError> {
		let bytes = postcard::to_stdvec(self)?;
		fs::write(path, bytes)?;
		log::info!("saved {} ({} words)", path.display(), self.num_word_types());
		Ok(())
	}
}

impl NgramModel for UnigramModel {
	fn order(&self) -> usize {
		1
	}

	fn set_order(&mut self, order: usize) -> Result<(), ModelError> {
		if order != 1 {
			return Err(ModelError::Order { expected: 1, got: order });
		}
		self.clear();
		Ok(())
	}
}
