//! Summary statistics over latency and occupancy sequences.
//!
//! Degenerate inputs never panic: the empty sample maps to 0.0 (documented
//! no-data default) and the sample standard deviation of a single element
//! is defined as 0.0.

/// Arithmetic mean. Returns 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation with the corrected `n - 1` estimator.
/// Defined as 0.0 when the sample has fewer than two elements.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Maximum of a slice, 0.0 when empty.
pub fn max(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Minimum of a slice, 0.0 when empty.
pub fn min(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

/// 95th percentile latency.
///
/// Uses the 20-bucket quantile method, taking the 19th cut-point, when the
/// sample has at least 20 elements. Smaller samples fall back to the coarsest
/// quantile division the sample supports (bucket count = sample size, last
/// cut-point). A single-element sample returns that element; the empty
/// sample returns 0.0.
pub fn p95(values: &[f64]) -> f64 {
    match values.len() {
        0 => 0.0,
        1 => values[0],
        n if n >= 20 => quantiles(values, 20)[18],
        n => *quantiles(values, n)
            .last()
            .expect("n >= 2 yields at least one cut-point"),
    }
}

/// Cut-points dividing the sample into `n` equal-probability buckets,
/// using exclusive interpolation over the sorted sample.
///
/// Matches the behavior of the classic exclusive quantile method: with a
/// sorted sample of size `m`, the i-th cut-point sits at rank `i * (m + 1) / n`
/// with linear interpolation, clamped to the observed extremes.
pub fn quantiles(values: &[f64], n: usize) -> Vec<f64> {
    debug_assert!(n >= 2, "quantile bucket count must be at least 2");
    debug_assert!(values.len() >= 2, "quantiles need at least two samples");

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let len = sorted.len();
    let m = len + 1;
    let mut cuts = Vec::with_capacity(n - 1);
    for i in 1..n {
        let delta = (i * m) % n;
        let j = (i * m / n).clamp(1, len - 1);
        let interpolated =
            (sorted[j - 1] * (n - delta) as f64 + sorted[j] * delta as f64) / n as f64;
        cuts.push(interpolated);
    }
    cuts
}

/// Percentage of samples equal to exactly 1, used as a proxy for the buffer
/// sitting in its empty/healthy state. Returns 0.0 for an empty slice.
pub fn share_at_one(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let ones = values.iter().filter(|&&v| v == 1).count();
    ones as f64 / values.len() as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_basic() {
        assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[5.0]), 5.0);
    }

    #[test]
    fn test_std_dev_corrected_estimator() {
        // Sample variance of [2, 4, 4, 4, 5, 5, 7, 9] with n-1 is 32/7
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let expected = (32.0_f64 / 7.0).sqrt();
        assert!((sample_std_dev(&values) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_std_dev_degenerate() {
        assert_eq!(sample_std_dev(&[]), 0.0);
        assert_eq!(sample_std_dev(&[42.0]), 0.0);
    }

    #[test]
    fn test_extrema() {
        let values = [3.0, 1.0, 4.0, 1.0, 5.0];
        assert_eq!(max(&values), 5.0);
        assert_eq!(min(&values), 1.0);
        assert_eq!(max(&[]), 0.0);
        assert_eq!(min(&[]), 0.0);
    }

    #[test]
    fn test_quantiles_known_values() {
        // For 1..=4 with n=4 the exclusive method gives [1.25, 2.5, 3.75]
        let values = [1.0, 2.0, 3.0, 4.0];
        let cuts = quantiles(&values, 4);
        assert_eq!(cuts, vec![1.25, 2.5, 3.75]);
    }

    #[test]
    fn test_p95_large_sample() {
        let values: Vec<f64> = (1..=100).map(|v| v as f64).collect();
        // 19th cut-point of 20 buckets over 1..=100: rank 19 * 101 / 20
        let expected = quantiles(&values, 20)[18];
        assert_eq!(p95(&values), expected);
        assert!(p95(&values) > 94.0 && p95(&values) < 97.0);
    }

    #[test]
    fn test_p95_small_sample_fallback() {
        // Below 20 samples the bucket count falls back to the sample size
        let values = [10.0, 20.0, 30.0, 40.0, 50.0];
        let expected = *quantiles(&values, 5).last().unwrap();
        assert_eq!(p95(&values), expected);
    }

    #[test]
    fn test_p95_degenerate() {
        assert_eq!(p95(&[]), 0.0);
        assert_eq!(p95(&[7.0]), 7.0);
    }

    #[test]
    fn test_p95_at_least_most_of_sample() {
        let values: Vec<f64> = (0..200).map(|v| (v % 50) as f64).collect();
        let p = p95(&values);
        let below = values.iter().filter(|&&v| v <= p).count();
        assert!(below as f64 >= 0.9 * values.len() as f64);
    }

    #[test]
    fn test_share_at_one() {
        assert_eq!(share_at_one(&[1, 2, 1, 3]), 50.0);
        assert_eq!(share_at_one(&[]), 0.0);
        assert_eq!(share_at_one(&[1, 1]), 100.0);
    }
}
