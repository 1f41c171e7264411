use std::io;

/// Errors reported by mutating operations of the dictionary and the
/// language models (insertion, learning, loading, saving).
///
/// Lookups and predictions never fail; they degrade to sentinel values
/// (`WID_NONE`, `UNKNOWN_WORD_ID`, empty strings) instead.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
	#[error("Operation not implemented by this model")]
	NotImplemented,

	#[error("File I/O error: {0}")]
	FileIo(#[from] io::Error),

	#[error("Out of memory")]
	OutOfMemory,

	#[error("Vocabulary is full ({0} words)")]
	VocabularyFull(usize),

	#[error("Unexpected number of tokens")]
	NumTokens,

	#[error("Order mismatch: expected {expected}, got {got}")]
	Order { expected: usize, got: usize },

	#[error("Invalid count")]
	Count,

	#[error("Unexpected end of file")]
	UnexpectedEndOfFile,

	#[error("Model format error: {0}")]
	Format(postcard::Error),
}

impl From<postcard::Error> for ModelError {
	fn from(err: postcard::Error) -> Self {
		match err {
			postcard::Error::DeserializeUnexpectedEnd => ModelError::UnexpectedEndOfFile,
			other => ModelError::Format(other),
		}
	}
}

/// Rejected combinations of prediction options.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionsError {
	#[error("ignore_capitalized and ignore_non_capitalized are mutually exclusive")]
	ConflictingCapitalization,
}
