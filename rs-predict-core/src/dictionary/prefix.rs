use super::accent::remove_accent;
use crate::model::predict_options::PredictOptions;

/// Prefix predicate with optional case- and accent-insensitive comparison
/// and capitalization filters.
///
/// The prefix is folded once at construction; each candidate character is
/// folded the same way while it is compared.
#[derive(Clone, Debug)]
pub struct PrefixCmp {
	prefix: Vec<char>,
	case_insensitive: bool,
	accent_insensitive: bool,
	ignore_capitalized: bool,
	ignore_non_capitalized: bool,
}

impl PrefixCmp {
	pub fn new(prefix: &str, options: &PredictOptions) -> Self {
		let mut cmp = Self {
			prefix: Vec::new(),
			case_insensitive: options.case_insensitive,
			accent_insensitive: options.accent_insensitive,
			ignore_capitalized: options.ignore_capitalized,
			ignore_non_capitalized: options.ignore_non_capitalized,
		};
		cmp.prefix = prefix.chars().map(|c| cmp.fold(c)).collect();
		cmp
	}

	/// Returns true if `word` starts with the prefix under the active options.
	///
	/// The capitalization filters look at the first character of `word`
	/// only and apply even when the prefix is empty.
	pub fn matches(&self, word: &str) -> bool {
		if self.ignore_capitalized && self.ignore_non_capitalized {
			return false;
		}

		if let Some(first) = word.chars().next() {
			if self.ignore_capitalized && first.is_uppercase() {
				return false;
			}
			if self.ignore_non_capitalized && !first.is_uppercase() {
				return false;
			}
		}

		if self.prefix.is_empty() {
			return true;
		}

		let mut chars = word.chars();
		for &expected in &self.prefix {
			match chars.next() {
				Some(c) if self.fold(c) == expected => (),
				_ => return false,
			}
		}
		true
	}

	fn fold(&self, mut c: char) -> char {
		if self.case_insensitive {
			c = to_lower(c);
		}
		if self.accent_insensitive {
			c = remove_accent(c);
		}
		c
	}
}

/// Single-character lower-casing; characters whose lower case expands to
/// several characters are left unchanged.
fn to_lower(c: char) -> char {
	let mut lower = c.to_lowercase();
	match (lower.next(), lower.next()) {
		(Some(l), None) => l,
		_ => c,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn options() -> PredictOptions {
		PredictOptions::none()
	}

	#[test]
	fn test_exact_prefix() {
		let cmp = PrefixCmp::new("ca", &options());
		assert!(cmp.matches("cat"));
		assert!(cmp.matches("ca"));
		assert!(!cmp.matches("c"));
		assert!(!cmp.matches("Cat"));
		assert!(!cmp.matches("dog"));
		assert!(!cmp.matches(""));
	}

	#[test]
	fn test_empty_prefix_matches_everything() {
		let cmp = PrefixCmp::new("", &options());
		assert!(cmp.matches("anything"));
		assert!(cmp.matches(""));
	}

	#[test]
	fn test_case_insensitive() {
		let cmp = PrefixCmp::new("Ca", &PredictOptions { case_insensitive: true, ..options() });
		assert!(cmp.matches("cat"));
		assert!(cmp.matches("CAR"));
		assert!(!cmp.matches("cop"));
	}

	#[test]
	fn test_accent_insensitive_both_directions() {
		let accent = PredictOptions { accent_insensitive: true, ..options() };
		assert!(PrefixCmp::new("café", &accent).matches("cafe"));
		assert!(PrefixCmp::new("cafe", &accent).matches("café"));
		assert!(PrefixCmp::new("cafe", &accent).matches("cafés"));
		assert!(!PrefixCmp::new("café", &options()).matches("cafe"));
	}

	#[test]
	fn test_case_and_accent_combined() {
		let cmp = PrefixCmp::new("ÉT", &PredictOptions { case_insensitive: true, accent_insensitive: true, ..options() });
		assert!(cmp.matches("étoile"));
		assert!(cmp.matches("Etat"));
	}

	#[test]
	fn test_capitalization_filters() {
		let no_caps = PrefixCmp::new("", &PredictOptions { ignore_capitalized: true, ..options() });
		assert!(no_caps.matches("paris"));
		assert!(!no_caps.matches("Paris"));

		let only_caps = PrefixCmp::new("", &PredictOptions { ignore_non_capitalized: true, ..options() });
		assert!(only_caps.matches("Paris"));
		assert!(!only_caps.matches("paris"));
		assert!(!only_caps.matches("<unk>"));
	}

	#[test]
	fn test_capitalization_filter_with_case_insensitive_prefix() {
		let cmp = PrefixCmp::new("pa", &PredictOptions { case_insensitive: true, ignore_non_capitalized: true, ..options() });
		assert!(cmp.matches("Paris"));
		assert!(!cmp.matches("pain"));
	}

	#[test]
	fn test_conflicting_capitalization_matches_nothing() {
		let cmp = PrefixCmp::new("", &PredictOptions { ignore_capitalized: true, ignore_non_capitalized: true, ..options() });
		assert!(!cmp.matches("Paris"));
		assert!(!cmp.matches("paris"));
	}
}
