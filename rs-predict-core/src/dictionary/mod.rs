//! Vocabulary storage and word search.
//!
//! - `Dictionary`: word/id mapping with a sorted index for binary search
//! - `PrefixCmp`: prefix predicate with case/accent folding
//! - Accent folding table shared by all comparisons

/// Accent folding through a table of `(accented, base)` pairs.
pub mod accent;

/// Prefix predicate used by prefix search.
pub mod prefix;

/// The word store: interning, id lookups, prefix search.
pub mod word_store;
