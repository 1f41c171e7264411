//! Word prediction library.
//!
//! This crate provides the core of an on-screen keyboard's word prediction:
//! - A vocabulary store with binary and prefix search (`dictionary`)
//! - Case- and accent-insensitive prefix matching
//! - A language model contract and the prediction pipeline (`model`)
//! - A stable ranking sort tuned for nearly sorted input (`sort`)
//! - Text tokenization for contexts and learning (`text`)

/// Vocabulary storage, prefix matching and accent folding.
pub mod dictionary;

/// Language models and prediction.
pub mod model;

/// Stable descending sorts over index permutations.
pub mod sort;

/// Word tokenization of texts and prediction contexts.
pub mod text;

/// Error types shared by dictionaries and models.
pub mod error;

/// I/O utilities (file loading, path helpers).
pub mod io;
