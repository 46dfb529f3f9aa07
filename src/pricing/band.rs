use crate::pricing::types::{Confidence, PriceBand};

/// Number of comparables at which a band is reported with high confidence.
pub const HIGH_CONFIDENCE_MIN_RESULTS: usize = 12;

/// Lowest price ever suggested, whatever the currency.
pub const SUGGESTED_PRICE_FLOOR: f64 = 1.0;

/// Compute a suggested price band from comparable prices.
///
/// Quartiles are positional: q1 is the sorted element at `n / 4` and q3 the
/// one at `3n / 4`. This is not an interpolated quantile and must stay that way
/// so bands keep matching the ones clients have already seen.
///
/// The band is centred on the median and spans half the IQR either side, with
/// the lower bound clamped to [`SUGGESTED_PRICE_FLOOR`].
pub fn compute_band(prices: &[f64]) -> PriceBand {
    if prices.is_empty() {
        return PriceBand::empty();
    }

    let mut sorted = prices.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let median = median_of_sorted(&sorted);
    let q1 = sorted[n / 4];
    let q3 = sorted[3 * n / 4];
    let iqr = q3 - q1;

    let confidence = if n >= HIGH_CONFIDENCE_MIN_RESULTS {
        Confidence::High
    } else {
        Confidence::Medium
    };

    PriceBand {
        results_count: n,
        median,
        iqr,
        suggested_min: SUGGESTED_PRICE_FLOOR.max(median - iqr / 2.0),
        suggested_max: median + iqr / 2.0,
        confidence,
    }
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
