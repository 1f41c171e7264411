use serde::{Deserialize, Serialize};

use crate::error::OptionsError;

/// Flags controlling a prediction request and the prefix search behind it.
///
/// All flags are independent and may be combined. The only rejected
/// combination is `ignore_capitalized` together with
/// `ignore_non_capitalized`: `validate` reports it, and a prefix search
/// run with both set matches nothing.
///
/// # Defaults
/// `filter_control_words` and `sort_by_weight` are on, everything else off.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct PredictOptions {
	/// Suppress `<unk>`, `<s>`, `</s>`, `<num>` from the candidates.
	pub filter_control_words: bool,

	/// Ask the back-end to pre-order its candidates by weight.
	pub sort_by_weight: bool,

	/// Rescale the candidate probabilities so they sum to 1.
	pub normalize: bool,

	/// Keep the back-end's candidate order instead of ranking.
	///
	/// Meant for meta-models that merge and re-rank several predictions.
	pub skip_sort: bool,

	/// Let prefix search return control words too.
	pub include_control_words: bool,

	/// Compare lower-cased characters.
	pub case_insensitive: bool,

	/// Compare characters with their accents removed.
	pub accent_insensitive: bool,

	/// Reject words starting with an upper-case character.
	pub ignore_capitalized: bool,

	/// Reject words not starting with an upper-case character.
	pub ignore_non_capitalized: bool,
}

impl Default for PredictOptions {
	fn default() -> Self {
		Self {
			filter_control_words: true,
			sort_by_weight: true,
			normalize: false,
			skip_sort: false,
			include_control_words: false,
			case_insensitive: false,
			accent_insensitive: false,
			ignore_capitalized: false,
			ignore_non_capitalized: false,
		}
	}
}

impl PredictOptions {
	/// Options with every flag cleared.
	pub fn none() -> Self {
		Self {
			filter_control_words: false,
			sort_by_weight: false,
			..Self::default()
		}
	}

	/// Checks for flag combinations that have no meaning.
	///
	/// # Errors
	/// Returns `ConflictingCapitalization` if both capitalization filters are set.
	pub fn validate(&self) -> Result<(), OptionsError> {
		if self.ignore_capitalized && self.ignore_non_capitalized {
			return Err(OptionsError::ConflictingCapitalization);
		}
		Ok(())
	}

	/// True if any option changes how characters compare, or filters by
	/// capitalization.
	///
	/// Under these options the stored sort order says nothing about which
	/// words match, so prefix search must scan instead of binary searching.
	pub fn has_filter_options(&self) -> bool {
		self.case_insensitive
			|| self.accent_insensitive
			|| self.ignore_capitalized
			|| self.ignore_non_capitalized
	}

	/// Options for the prefix search behind candidate generation.
	///
	/// Control words are searched whenever the request does not filter
	/// them, so unfiltered predictions report the `<unk>` mass.
	pub fn prefix_search_options(&self) -> Self {
		Self {
			include_control_words: self.include_control_words || !self.filter_control_words,
			..*self
		}
	}
}
