//! Language models and the prediction pipeline.
//!
//! - `LanguageModel`: back-end contract plus the shared `predict` pipeline
//! - `NgramModel`: models of a fixed order
//! - `PredictOptions`: request flags
//! - `UnigramModel`: word-frequency back-end with binary persistence

/// Back-end contract, control words and the prediction pipeline.
///
/// Splits the context, resolves the history, asks the back-end for
/// candidates and probabilities, ranks and truncates the result.
pub mod language_model;

/// Models conditioned on a fixed number of words.
pub mod ngram_model;

/// Flags of a prediction request.
pub mod predict_options;

/// Word-frequency model.
///
/// Learns counts from text, scores by relative frequency and persists
/// itself with `postcard`.
pub mod unigram_model;
