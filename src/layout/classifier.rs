//! Body-text classifier
//!
//! Clusters observed word heights into size bands with one-dimensional
//! natural-breaks (Jenks) clustering and keeps the words falling into the
//! band configured as body text. With the default three bands the mental
//! model is: band 0 is sub-body noise (punctuation artifacts, tiny marks),
//! band 1 is body text, band 2 is headings/titles. That is a policy choice,
//! not a derived property; documents that don't fit it come out empty or
//! wrong, never as an error.

use super::parser::WordRecord;

/// Default number of size bands: small/noise, body, large/heading.
pub const DEFAULT_BANDS: usize = 3;

/// Policy selecting which size band counts as body text.
///
/// `BodyBand::default()` selects band index 1, the second-smallest band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyBand {
    index: usize,
}

impl BodyBand {
    pub const fn new(index: usize) -> Self {
        Self { index }
    }

    pub const fn index(self) -> usize {
        self.index
    }
}

impl Default for BodyBand {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Cluster word heights into size bands, returning the band boundaries as a
/// non-decreasing sequence of `bands + 1` values (minimum, interior cuts,
/// maximum).
///
/// Edge-case policy:
/// - empty input returns an empty sequence ("no text found", not an error);
/// - fewer distinct values than requested bands reduces the band count to
///   `max(1, distinct)` first: natural breaks is unstable when asked for
///   more bands than distinct values exist.
pub fn cluster_sizes(heights: &[f64], desired_bands: usize) -> Vec<f64> {
    if heights.is_empty() {
        return Vec::new();
    }

    let mut sorted = heights.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut distinct = 1;
    for pair in sorted.windows(2) {
        if pair[0] != pair[1] {
            distinct += 1;
        }
    }

    let bands = if distinct < desired_bands {
        distinct.max(1)
    } else {
        desired_bands.max(1)
    };

    jenks_breaks(&sorted, bands)
}

/// Keep the words whose height falls inside the selected body band:
/// `breaks[i] < height <= breaks[i + 1]` with `i = band.index()` (open lower
/// bound, closed upper bound).
///
/// Degenerate case: when `breaks` is too short to contain the selected band
/// (fewer than 3 elements under the default policy), the result is empty.
/// Never an index panic; callers observe the outcome only as empty output.
pub fn filter_body_words(records: &[WordRecord], breaks: &[f64], band: BodyBand) -> Vec<String> {
    let Some(&upper) = breaks.get(band.index() + 1) else {
        return Vec::new();
    };
    let lower = breaks[band.index()];

    records
        .iter()
        .filter(|r| lower < r.height && r.height <= upper)
        .map(|r| r.text.clone())
        .collect()
}

/// Classic Jenks natural-breaks dynamic program (lower class limits /
/// variance combinations matrices) over sorted data.
///
/// Callers guarantee `data` is sorted and non-empty and that `n_classes` is
/// between 1 and the number of distinct values; `cluster_sizes` enforces
/// both before dispatching here.
fn jenks_breaks(data: &[f64], n_classes: usize) -> Vec<f64> {
    let n = data.len();
    let lower_class_limits = jenks_matrices(data, n_classes);

    let mut breaks = vec![0.0; n_classes + 1];
    breaks[0] = data[0];
    breaks[n_classes] = data[n - 1];

    let mut k = n;
    for j in (2..=n_classes).rev() {
        let limit = lower_class_limits[k][j];
        breaks[j - 1] = data[limit - 2];
        k = limit - 1;
    }

    breaks
}

fn jenks_matrices(data: &[f64], n_classes: usize) -> Vec<Vec<usize>> {
    let n = data.len();
    let mut lower_class_limits = vec![vec![0usize; n_classes + 1]; n + 1];
    let mut variance_combinations = vec![vec![0f64; n_classes + 1]; n + 1];

    for i in 1..=n_classes {
        lower_class_limits[1][i] = 1;
        variance_combinations[1][i] = 0.0;
        for j in 2..=n {
            variance_combinations[j][i] = f64::INFINITY;
        }
    }

    for l in 2..=n {
        let mut sum = 0.0;
        let mut sum_squares = 0.0;
        let mut count = 0.0;
        let mut variance = 0.0;

        for m in 1..=l {
            let lower = l - m + 1;
            let value = data[lower - 1];

            count += 1.0;
            sum += value;
            sum_squares += value * value;
            variance = sum_squares - (sum * sum) / count;

            if lower > 1 {
                for j in 2..=n_classes {
                    let candidate = variance + variance_combinations[lower - 1][j - 1];
                    if variance_combinations[l][j] >= candidate {
                        lower_class_limits[l][j] = lower;
                        variance_combinations[l][j] = candidate;
                    }
                }
            }
        }

        lower_class_limits[l][1] = 1;
        variance_combinations[l][1] = variance;
    }

    lower_class_limits
}
