use super::language_model::LanguageModel;
use crate::error::ModelError;

/// A language model conditioned on a fixed number of words.
///
/// # Contract for implementors
/// - Candidates and probabilities only depend on the last `order - 1`
///   history words
/// - `set_order` discards all learned state, since counts and indices
///   sized for the old order are meaningless for the new one
pub trait NgramModel: LanguageModel {
	/// Number of words in the model's n-grams (1 for unigrams).
	fn order(&self) -> usize;

	/// Changes the order and clears the model.
	///
	/// # Errors
	/// Returns `ModelError::Order` if the back-end does not support `order`.
	fn set_order(&mut self, order: usize) -> Result<(), ModelError>;
}
