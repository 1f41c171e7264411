use std::sync::LazyLock;

use unicode_normalization::char::{decompose_canonical, is_combining_mark};

/// Blocks scanned for accented letters when the fold table is built.
const FOLDED_RANGES: [(u32, u32); 5] = [
	(0x0080, 0x024F), // Latin-1 Supplement, Latin Extended-A/B
	(0x0370, 0x03FF), // Greek
	(0x0400, 0x04FF), // Cyrillic
	(0x1E00, 0x1EFF), // Latin Extended Additional
	(0x1F00, 0x1FFF), // Greek Extended
];

/// Letters with a stroke or bar have no canonical decomposition.
const STROKED: [(char, char); 12] = [
	('Ð', 'D'),
	('Ø', 'O'),
	('ð', 'd'),
	('ø', 'o'),
	('Đ', 'D'),
	('đ', 'd'),
	('Ħ', 'H'),
	('ħ', 'h'),
	('Ł', 'L'),
	('ł', 'l'),
	('Ŧ', 'T'),
	('ŧ', 't'),
];

/// Sorted `(accented, base)` pairs, built once on first use.
static ACCENT_TABLE: LazyLock<Vec<(char, char)>> = LazyLock::new(build_table);

fn build_table() -> Vec<(char, char)> {
	let mut table: Vec<(char, char)> = Vec::new();

	for (first, last) in FOLDED_RANGES {
		for c in (first..=last).filter_map(char::from_u32) {
			if let Some(base) = base_letter(c) {
				table.push((c, base));
			}
		}
	}
	table.extend_from_slice(&STROKED);

	table.sort_unstable_by_key(|&(accented, _)| accented);
	table.dedup_by_key(|&mut (accented, _)| accented);

	log::debug!("accent fold table built with {} entries", table.len());
	table
}

/// Returns the base letter of `c` if its canonical decomposition is a
/// single base character followed only by combining marks.
fn base_letter(c: char) -> Option<char> {
	let mut parts: Vec<char> = Vec::with_capacity(4);
	decompose_canonical(c, |d| parts.push(d));

	let (&base, marks) = parts.split_first()?;
	if marks.is_empty() || is_combining_mark(base) || !marks.iter().all(|&m| is_combining_mark(m)) {
		return None;
	}
	Some(base)
}

/// Maps an accented character to its unaccented base.
///
/// ASCII passes through untouched. Everything else is resolved by a
/// binary search in the fold table and falls back to `c` itself.
pub fn remove_accent(c: char) -> char {
	if (c as u32) <= 0x7F {
		return c;
	}

	match ACCENT_TABLE.binary_search_by_key(&c, |&(accented, _)| accented) {
		Ok(index) => ACCENT_TABLE[index].1,
		Err(_) => c,
	}
}
