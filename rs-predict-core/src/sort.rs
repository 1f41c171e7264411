use std::cmp::Ordering;

/// Sorts `items` in place by descending `key`, keeping items with equal
/// keys in their input order.
///
/// Shell sort with halving gaps: each pass is an insertion sort at that gap
/// and stops early on runs that are already ordered, so re-ranking an
/// almost ranked list is close to linear. Shell sort alone is not stable;
/// ties are broken by input position, which makes the order total and the
/// result stable.
///
/// Keys that do not compare (NaN) are left where the passes find them.
pub fn stable_sort_desc_by_key<T, K, F>(items: &mut [T], key: F)
where
	T: Copy,
	K: PartialOrd,
	F: Fn(&T) -> K,
{
	let n = items.len();
	if n < 2 {
		return;
	}

	let mut entries: Vec<(usize, T)> = items.iter().copied().enumerate().collect();

	// true if `a` belongs after `b`
	let out_of_order = |a: &(usize, T), b: &(usize, T)| match key(&a.1).partial_cmp(&key(&b.1)) {
		Some(Ordering::Less) => true,
		Some(Ordering::Equal) => a.0 > b.0,
		_ => false,
	};

	let mut gap = n / 2;
	while gap > 0 {
		for i in gap..n {
			let mut j = i;
			while j >= gap && out_of_order(&entries[j - gap], &entries[j]) {
				entries.swap(j - gap, j);
				j -= gap;
			}
		}
		gap /= 2;
	}

	for (slot, (_, item)) in items.iter_mut().zip(entries) {
		*slot = item;
	}
}

/// Sorts an index permutation by descending `scores[index]`, stable.
///
/// After the call `scores[indices[i]] >= scores[indices[i + 1]]` for all
/// adjacent pairs, and indices with equal scores keep their relative order.
///
/// # Panics
/// Panics if an index is out of bounds of `scores`.
pub fn stable_argsort_desc<S: PartialOrd>(indices: &mut [usize], scores: &[S]) {
	stable_sort_desc_by_key(indices, |&i| &scores[i]);
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::rngs::StdRng;
	use rand::{Rng, SeedableRng};

	fn argsort(scores: &[f64]) -> Vec<usize> {
		let mut indices: Vec<usize> = (0..scores.len()).collect();
		stable_argsort_desc(&mut indices, scores);
		indices
	}

	#[test]
	fn test_ties_keep_input_order() {
		assert_eq!(argsort(&[0.5, 0.9, 0.5]), [1, 0, 2]);
	}

	#[test]
	fn test_trivial_inputs() {
		assert_eq!(argsort(&[]), Vec::<usize>::new());
		assert_eq!(argsort(&[0.3]), [0]);
		assert_eq!(argsort(&[0.1, 0.2]), [1, 0]);
	}

	#[test]
	fn test_already_sorted_is_unchanged() {
		let scores: Vec<f64> = (0..100).rev().map(f64::from).collect();
		assert_eq!(argsort(&scores), (0..100).collect::<Vec<_>>());
	}

	#[test]
	fn test_matches_std_stable_sort_on_random_scores() {
		let mut rng = StdRng::seed_from_u64(42);
		for len in [5, 17, 64, 333] {
			// few distinct values, lots of ties
			let scores: Vec<f64> = (0..len).map(|_| f64::from(rng.random_range(0..6u8)) / 5.0).collect();

			let mut expected: Vec<usize> = (0..len).collect();
			expected.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

			assert_eq!(argsort(&scores), expected);
		}
	}

	#[test]
	fn test_non_identity_permutation_keeps_its_tie_order() {
		let scores = [0.2, 0.7, 0.2, 0.2];
		let mut indices = vec![3, 2, 1, 0];
		stable_argsort_desc(&mut indices, &scores);
		assert_eq!(indices, [1, 3, 2, 0]);
	}

	#[test]
	fn test_sort_by_key_on_pairs() {
		let mut pairs = [("a", 1u32), ("b", 3), ("c", 1), ("d", 2)];
		stable_sort_desc_by_key(&mut pairs, |&(_, count)| count);
		assert_eq!(pairs, [("b", 3), ("d", 2), ("a", 1), ("c", 1)]);
	}
}
