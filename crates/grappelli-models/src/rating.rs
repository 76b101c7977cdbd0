//! Read-time rating aggregation.
//!
//! The equivalent of annotating a title queryset with `Avg(reviews__score)`:
//! a pure function from the review scores to the mean, `None` when no reviews
//! exist. Recomputed on every list/retrieve so it can never go stale.

/// Mean of the given scores, or `None` for an empty slice.
///
/// Commutative: the order of the underlying reviews is irrelevant.
///
/// # Examples
///
/// ```
/// use grappelli_models::rating::mean_score;
///
/// assert_eq!(mean_score(&[]), None);
/// assert_eq!(mean_score(&[9]), Some(9.0));
/// assert_eq!(mean_score(&[9, 5]), Some(7.0));
/// ```
pub fn mean_score(scores: &[u8]) -> Option<f64> {
	if scores.is_empty() {
		return None;
	}
	let sum: u32 = scores.iter().map(|s| u32::from(*s)).sum();
	Some(f64::from(sum) / scores.len() as f64)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_no_reviews_is_none() {
		assert_eq!(mean_score(&[]), None);
	}

	#[test]
	fn test_single_review() {
		assert_eq!(mean_score(&[9]), Some(9.0));
	}

	#[test]
	fn test_mean_of_many() {
		assert_eq!(mean_score(&[9, 5]), Some(7.0));
		assert_eq!(mean_score(&[1, 10, 10]), Some(7.0));
	}

	#[test]
	fn test_order_irrelevant() {
		let forward = mean_score(&[3, 7, 8, 10]);
		let backward = mean_score(&[10, 8, 7, 3]);
		assert_eq!(forward, backward);
	}

	#[test]
	fn test_non_integer_mean() {
		let rating = mean_score(&[7, 8]).unwrap();
		assert!((rating - 7.5).abs() < f64::EPSILON);
	}
}
