use std::mem::size_of;

use serde::{Deserialize, Serialize};

use super::prefix::PrefixCmp;
use crate::error::ModelError;
use crate::model::language_model::NUM_CONTROL_WORDS;
use crate::model::predict_options::PredictOptions;

/// Compact handle of an interned word.
///
/// 32-bit ids allow up to `MAX_WORDS` (4 294 967 295) words per dictionary.
pub type WordId = u32;

/// Sentinel returned by lookups that found no word.
pub const WID_NONE: WordId = WordId::MAX;

/// Largest number of words a dictionary can hold; `WID_NONE` is never assigned.
pub const MAX_WORDS: usize = WID_NONE as usize;

/// Outcome of `Dictionary::lookup_word`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookupMatch {
	/// The word itself is in the vocabulary.
	ExactMatch,
	/// The word is not, but this many words start with it.
	PartialMatches(usize),
	NoMatch,
}

/// The vocabulary of a language model.
///
/// Words are stored in insertion order and addressed directly by their
/// `WordId`. A second array, `sorted`, holds all ids ordered by their word
/// (codepoint order) and makes exact and prefix lookups binary searchable.
///
/// # Invariants
/// - Ids are assigned in insertion order and never reused
/// - `sorted` is a permutation of `0..words.len()` in ascending word order
/// - Words are never modified or removed individually, only by `clear`
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Dictionary {
	/// Interned words indexed by id.
	words: Vec<String>,

	/// Word ids in ascending order of their words.
	sorted: Vec<WordId>,
}

impl From<Vec<String>> for Dictionary {
	/// Rebuilds the sorted index from a list of words in id order.
	fn from(words: Vec<String>) -> Self {
		let mut sorted: Vec<WordId> = (0..words.len() as WordId).collect();
		sorted.sort_by(|&a, &b| words[a as usize].cmp(&words[b as usize]));
		Self { words, sorted }
	}
}

impl From<Dictionary> for Vec<String> {
	fn from(dictionary: Dictionary) -> Self {
		dictionary.words
	}
}

impl Dictionary {
	/// Creates an empty dictionary.
	pub fn new() -> Self {
		Self::default()
	}

	/// Drops all words and releases their memory.
	pub fn clear(&mut self) {
		self.words = Vec::new();
		self.sorted = Vec::new();
	}

	/// Clears the dictionary and reserves room for exactly `count` words.
	///
	/// Used before loading a model whose vocabulary size is known, to
	/// avoid over-allocation.
	pub fn reserve_words(&mut self, count: usize) {
		self.clear();
		self.words.reserve_exact(count);
		self.sorted.reserve_exact(count);
	}

	/// Number of words in the vocabulary.
	pub fn num_word_types(&self) -> usize {
		self.words.len()
	}

	/// Word ids in ascending word order.
	pub fn sorted_ids(&self) -> &[WordId] {
		&self.sorted
	}

	/// Binary search for the insertion point of `word` in `sorted`
	/// (first position whose word is not less than `word`).
	fn search_index(&self, word: &str) -> usize {
		self.sorted.partition_point(|&wid| self.words[wid as usize].as_str() < word)
	}

	/// Returns the id of `word`, or `WID_NONE` if it is not in the vocabulary.
	pub fn word_to_id(&self, word: &str) -> WordId {
		let index = self.search_index(word);
		match self.sorted.get(index) {
			Some(&wid) if self.words[wid as usize] == word => wid,
			_ => WID_NONE,
		}
	}

	/// Maps each word to its id, `WID_NONE` for unknown words.
	pub fn words_to_ids<S: AsRef<str>>(&self, words: &[S]) -> Vec<WordId> {
		words.iter().map(|w| self.word_to_id(w.as_ref())).collect()
	}

	/// Returns the word of `wid`, `None` for ids out of range.
	pub fn id_to_word(&self, wid: WordId) -> Option<&str> {
		self.words.get(wid as usize).map(String::as_str)
	}

	pub fn contains(&self, word: &str) -> bool {
		self.word_to_id(word) != WID_NONE
	}

	/// Interns a copy of `word` and returns its new id.
	///
	/// Does not check for duplicates; callers look the word up first.
	/// On failure the dictionary is left unchanged.
	///
	/// # Errors
	/// - `VocabularyFull` if all ids are taken
	/// - `OutOfMemory` if the word or the index cannot grow
	pub fn add_word(&mut self, word: &str) -> Result<WordId, ModelError> {
		if self.words.len() >= MAX_WORDS {
			return Err(ModelError::VocabularyFull(self.words.len()));
		}

		// Allocate everything up front so a failure leaves no partial state
		let mut interned = String::new();
		interned.try_reserve_exact(word.len()).map_err(|_| ModelError::OutOfMemory)?;
		interned.push_str(word);
		self.words.try_reserve(1).map_err(|_| ModelError::OutOfMemory)?;
		self.sorted.try_reserve(1).map_err(|_| ModelError::OutOfMemory)?;

		let wid = self.words.len() as WordId;
		let index = self.search_index(&interned);
		self.words.push(interned);
		self.sorted.insert(index, wid);

		Ok(wid)
	}

	/// Finds the ids of all words starting with `prefix`.
	///
	/// # Modes
	/// - `candidates` given: filters that list, keeping its order.
	/// - empty prefix or any filter option (case, accent, capitalization):
	///   scans the whole vocabulary in id order. Folded comparison does not
	///   follow the stored sort order, so binary search would miss words.
	/// - otherwise: binary searches the first match and collects the
	///   following words in sorted order until one stops matching.
	///
	/// Control words are skipped unless `include_control_words` is set.
	pub fn prefix_search(&self, prefix: &str, candidates: Option<&[WordId]>, options: &PredictOptions) -> Vec<WordId> {
		let min_wid: WordId = if options.include_control_words { 0 } else { NUM_CONTROL_WORDS as WordId };

		if let Some(candidates) = candidates {
			let cmp = PrefixCmp::new(prefix, options);
			return candidates
				.iter()
				.copied()
				.filter(|&wid| wid >= min_wid)
				.filter(|&wid| self.id_to_word(wid).is_some_and(|w| cmp.matches(w)))
				.collect();
		}

		if prefix.is_empty() || options.has_filter_options() {
			let cmp = PrefixCmp::new(prefix, options);
			return (min_wid as usize..self.words.len())
				.filter(|&i| cmp.matches(&self.words[i]))
				.map(|i| i as WordId)
				.collect();
		}

		self.sorted[self.search_index(prefix)..]
			.iter()
			.copied()
			.take_while(|&wid| self.words[wid as usize].starts_with(prefix))
			.filter(|&wid| wid >= min_wid)
			.collect()
	}

	/// Looks `word` up for exact and partial (prefix) matches.
	pub fn lookup_word(&self, word: &str) -> LookupMatch {
		let index = self.search_index(word);

		if let Some(&wid) = self.sorted.get(index) {
			if self.words[wid as usize] == word {
				return LookupMatch::ExactMatch;
			}
		}

		let count = self.sorted[index..]
			.iter()
			.take_while(|&&wid| self.words[wid as usize].starts_with(word))
			.count();

		if count == 0 {
			LookupMatch::NoMatch
		} else {
			LookupMatch::PartialMatches(count)
		}
	}

	/// Estimates a lower bound of the memory used by the dictionary.
	///
	/// Includes over-allocation of the vectors and strings, excludes
	/// allocator bookkeeping and fragmentation.
	pub fn memory_size(&self) -> u64 {
		let object = size_of::<Self>() as u64;
		let strings: u64 = self.words.iter().map(|w| w.capacity() as u64).sum();
		let words_capacity = (size_of::<String>() * self.words.capacity()) as u64;
		let sorted_capacity = (size_of::<WordId>() * self.sorted.capacity()) as u64;
		let total = object + strings + words_capacity + sorted_capacity;

		log::debug!(
			"dictionary memory: object {} B, strings {} B ({} words), words.capacity {} B, sorted.capacity {} B, total {} B",
			object,
			strings,
			self.words.len(),
			words_capacity,
			sorted_capacity,
			total
		);

		total
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::rngs::StdRng;
	use rand::{Rng, SeedableRng};

	/// Dictionary whose first words stand in for the control words.
	fn dictionary(words: &[&str]) -> Dictionary {
		let mut dictionary = Dictionary::new();
		for control in ["<unk>", "<s>", "</s>", "<num>"] {
			dictionary.add_word(control).unwrap();
		}
		for word in words {
			dictionary.add_word(word).unwrap();
		}
		dictionary
	}

	fn words_of(dictionary: &Dictionary, wids: &[WordId]) -> Vec<String> {
		wids.iter().map(|&wid| dictionary.id_to_word(wid).unwrap().to_owned()).collect()
	}

	#[test]
	fn test_ids_follow_insertion_order() {
		let dictionary = dictionary(&["dog", "cat", "car"]);
		assert_eq!(dictionary.word_to_id("dog"), 4);
		assert_eq!(dictionary.word_to_id("cat"), 5);
		assert_eq!(dictionary.word_to_id("car"), 6);
		assert_eq!(dictionary.id_to_word(6), Some("car"));
		assert_eq!(dictionary.num_word_types(), 7);
	}

	#[test]
	fn test_misses_return_sentinels() {
		let dictionary = dictionary(&["cat"]);
		assert_eq!(dictionary.word_to_id("ca"), WID_NONE);
		assert_eq!(dictionary.word_to_id("zebra"), WID_NONE);
		assert_eq!(dictionary.word_to_id(""), WID_NONE);
		assert_eq!(dictionary.id_to_word(100), None);
		assert_eq!(dictionary.id_to_word(WID_NONE), None);
		assert!(!dictionary.contains("dog"));
	}

	#[test]
	fn test_random_vocabulary_round_trip_and_sorted_index() {
		let mut rng = StdRng::seed_from_u64(7);
		let mut dictionary = Dictionary::new();
		let mut inserted: Vec<(String, WordId)> = Vec::new();

		for _ in 0..500 {
			let len = rng.random_range(1..8);
			let word: String = (0..len)
				.map(|_| ['a', 'b', 'c', 'é', 'Z', 'ß', '語'][rng.random_range(0..7)])
				.collect();
			if dictionary.contains(&word) {
				continue;
			}
			let wid = dictionary.add_word(&word).unwrap();
			inserted.push((word, wid));
		}

		for (word, wid) in &inserted {
			assert_eq!(dictionary.word_to_id(word), *wid);
			assert_eq!(dictionary.id_to_word(*wid), Some(word.as_str()));
		}

		let sorted = dictionary.sorted_ids();
		assert_eq!(sorted.len(), dictionary.num_word_types());
		let mut seen = sorted.to_vec();
		seen.sort_unstable();
		assert_eq!(seen, (0..dictionary.num_word_types() as WordId).collect::<Vec<_>>());
		let ordered = words_of(&dictionary, sorted);
		assert!(ordered.windows(2).all(|w| w[0] <= w[1]));
	}

	#[test]
	fn test_prefix_search_binary_mode_is_lexicographic() {
		let dictionary = dictionary(&["cat", "car", "dog", "ca"]);
		let wids = dictionary.prefix_search("ca", None, &PredictOptions::none());
		assert_eq!(words_of(&dictionary, &wids), ["ca", "car", "cat"]);

		let wids = dictionary.prefix_search("cat", None, &PredictOptions::none());
		assert_eq!(words_of(&dictionary, &wids), ["cat"]);
		assert!(dictionary.prefix_search("x", None, &PredictOptions::none()).is_empty());
	}

	#[test]
	fn test_prefix_search_empty_prefix_scans_in_id_order() {
		let dictionary = dictionary(&["dog", "cat"]);
		let wids = dictionary.prefix_search("", None, &PredictOptions::none());
		assert_eq!(words_of(&dictionary, &wids), ["dog", "cat"]);

		let options = PredictOptions { include_control_words: true, ..PredictOptions::none() };
		let wids = dictionary.prefix_search("", None, &options);
		assert_eq!(wids, (0..6).collect::<Vec<_>>());
	}

	#[test]
	fn test_prefix_search_control_words() {
		let dictionary = dictionary(&["<note>"]);
		let wids = dictionary.prefix_search("<n", None, &PredictOptions::none());
		assert_eq!(words_of(&dictionary, &wids), ["<note>"]);

		let options = PredictOptions { include_control_words: true, ..PredictOptions::none() };
		let wids = dictionary.prefix_search("<n", None, &options);
		assert_eq!(words_of(&dictionary, &wids), ["<note>", "<num>"]);
	}

	#[test]
	fn test_prefix_search_folding_uses_exhaustive_scan() {
		let dictionary = dictionary(&["Café", "cafe", "cafés", "cab"]);

		let options = PredictOptions { case_insensitive: true, accent_insensitive: true, ..PredictOptions::none() };
		let wids = dictionary.prefix_search("CAFE", None, &options);
		assert_eq!(words_of(&dictionary, &wids), ["Café", "cafe", "cafés"]);

		let options = PredictOptions { ignore_capitalized: true, ..PredictOptions::none() };
		let wids = dictionary.prefix_search("ca", None, &options);
		assert_eq!(words_of(&dictionary, &wids), ["cafe", "cafés", "cab"]);
	}

	#[test]
	fn test_prefix_search_filters_candidates_in_given_order() {
		let dictionary = dictionary(&["cat", "car", "dog"]);
		let candidates = [6, 1, 5, 4, 42];
		let wids = dictionary.prefix_search("ca", Some(&candidates), &PredictOptions::none());
		assert_eq!(words_of(&dictionary, &wids), ["car", "cat"]);
	}

	#[test]
	fn test_conflicting_capitalization_yields_nothing() {
		let dictionary = dictionary(&["Paris", "pain"]);
		let options = PredictOptions { ignore_capitalized: true, ignore_non_capitalized: true, ..PredictOptions::none() };
		assert!(dictionary.prefix_search("", None, &options).is_empty());
		assert!(dictionary.prefix_search("pa", None, &options).is_empty());
	}

	#[test]
	fn test_lookup_word() {
		let dictionary = dictionary(&["cat", "car", "cart", "dog"]);
		assert_eq!(dictionary.lookup_word("car"), LookupMatch::ExactMatch);
		assert_eq!(dictionary.lookup_word("ca"), LookupMatch::PartialMatches(3));
		assert_eq!(dictionary.lookup_word("do"), LookupMatch::PartialMatches(1));
		assert_eq!(dictionary.lookup_word("zebra"), LookupMatch::NoMatch);
	}

	#[test]
	fn test_clear_and_reserve() {
		let mut dictionary = dictionary(&["cat"]);
		dictionary.reserve_words(10);
		assert_eq!(dictionary.num_word_types(), 0);
		assert_eq!(dictionary.word_to_id("cat"), WID_NONE);
		assert_eq!(dictionary.add_word("dog").unwrap(), 0);
		dictionary.clear();
		assert!(dictionary.sorted_ids().is_empty());
	}

	#[test]
	fn test_memory_size_grows_with_words() {
		let mut dictionary = Dictionary::new();
		let empty = dictionary.memory_size();
		dictionary.add_word("antidisestablishmentarianism").unwrap();
		assert!(dictionary.memory_size() >= empty + 28);
	}

	#[test]
	fn test_rebuild_from_words() {
		let dictionary = Dictionary::from(vec!["dog".to_owned(), "cat".to_owned(), "ant".to_owned()]);
		assert_eq!(dictionary.sorted_ids(), &[2, 1, 0]);
		assert_eq!(dictionary.word_to_id("cat"), 1);
	}
}
