//! C6: per-pixel KNN-DTW classification and disturbance/recovery year
//! extraction. Grounded on `knn_dtw.py::_process_pixel`; the path-extraction
//! table (the `_extract_years`/`_adjust_path_for_nans` helpers `knn_dtw.py`
//! imports but whose bodies are not present in the retrieved reference tree)
//! is reconstructed directly from the label-group table and worked examples
//! pinned down in `test_matlab_consistency.py`.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};

use mining_common::rounding::round_to_isize;

use crate::dtw::{dtw_distance_only, dtw_with_path, PathStep};
use crate::spike_filter::remove_spikes;
use crate::templates::Template;
use crate::wavelet::denoise;

/// A pixel's classification: `label` is 0 for an unclassifiable (all-NaN)
/// series, else in `1..=49`; `yd`/`yr` are 1-based band indices, 0 if the
/// label's group does not define one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelResult {
    pub label: u8,
    pub yd: usize,
    pub yr: usize,
}

/// Counts per-pixel classification failures trapped and degraded to the
/// zero result, so the orchestrator can report them without aborting.
#[derive(Default)]
pub struct FailureCounter(AtomicU64);

impl FailureCounter {
    pub fn new() -> Self {
        FailureCounter(AtomicU64::new(0))
    }

    pub fn count(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    fn record(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }
}

/// Classifies one pixel, trapping any unexpected panic inside the pure
/// [`classify_pixel`] computation and degrading it to the zero result.
pub fn classify_pixel_safe(x: &[f64], templates: &[Template], failures: &FailureCounter) -> PixelResult {
    match catch_unwind(AssertUnwindSafe(|| classify_pixel(x, templates))) {
        Ok(result) => result,
        Err(_) => {
            failures.record();
            PixelResult::default()
        }
    }
}

/// Despikes, extends by one duplicated sample, and wavelet-denoises `x`,
/// matching `knn_dtw.py::_process_pixel` step 2.
fn preprocess_series(x: &[f64]) -> Vec<f64> {
    let despiked = remove_spikes(x);
    let mut extended = despiked.clone();
    if let Some(&last) = despiked.last() {
        extended.push(last);
    }
    let mut denoised = denoise(&extended);
    denoised.truncate(extended.len());
    denoised
}

/// Finds the template index with the lowest distance-only DTW cost against
/// `series`, breaking ties by the lowest template index. This is the raw
/// nearest-neighbour step (`knn_classify`) with no despiking or denoising —
/// used both by [`classify_pixel`] on preprocessed series and directly
/// against raw templates to check self-consistency.
pub fn nearest_template(series: &[f64], templates: &[Template]) -> usize {
    let mut best_idx = 0usize;
    let mut best_dist = f64::INFINITY;
    for (i, t) in templates.iter().enumerate() {
        if t.values.is_empty() {
            continue;
        }
        let dist = dtw_distance_only(&t.values, series);
        if dist < best_dist {
            best_dist = dist;
            best_idx = i;
        }
    }
    best_idx
}

/// Classifies a single pixel series `x` (length `L`, may contain NaN)
/// against the 49 templates, returning its label and disturbance/recovery
/// years. Never panics by construction; safe to call directly for testing.
pub fn classify_pixel(x: &[f64], templates: &[Template]) -> PixelResult {
    let id_nan: Vec<usize> = x.iter().enumerate().filter(|(_, v)| v.is_nan()).map(|(i, _)| i).collect();
    let stripped: Vec<f64> = x.iter().copied().filter(|v| !v.is_nan()).collect();
    if stripped.is_empty() {
        return PixelResult::default();
    }

    let processed = preprocess_series(&stripped);
    if processed.is_empty() || templates.is_empty() {
        return PixelResult::default();
    }

    let best_idx = nearest_template(&processed, templates);
    let winner = &templates[best_idx];
    let (_, path) = dtw_with_path(&winner.values, &processed);

    let no_adjustment = matches!(winner.label, 37 | 38 | 39 | 40);
    let adjusted_path = if no_adjustment {
        path
    } else {
        adjust_path_for_nans(path, &id_nan)
    };

    let l = winner.values.len();
    let (yd, yr) = extract_years(winner.label, l, &adjusted_path);

    PixelResult { label: winner.label, yd, yr }
}

/// For each NaN position `q` (0-based, ascending), finds the first path
/// entry whose test-index equals `q` and increments the test-index of that
/// entry and every subsequent entry by 1. Matches the reference's
/// `_adjust_path_for_nans` mutating-loop semantics (see `test_matlab_consistency.py::test_nan_path_adjustment`).
fn adjust_path_for_nans(mut path: Vec<PathStep>, id_nan: &[usize]) -> Vec<PathStep> {
    for &q in id_nan {
        if let Some(pos) = path.iter().position(|&(_, t)| t == q) {
            for step in path.iter_mut().skip(pos) {
                step.1 += 1;
            }
        }
    }
    path
}

/// Column at which `yd`/`yr` are read out, by winning label, per the
/// label-group table in §4.6.
fn extract_years(label: u8, l: usize, path: &[PathStep]) -> (usize, usize) {
    let l = l as f64;
    let c25 = round_to_isize(0.25 * l).max(0) as usize;
    let c50 = round_to_isize(0.5 * l).max(0) as usize;
    let c75 = round_to_isize(0.75 * l).max(0) as usize;
    let stable25 = round_to_isize(0.375 * l - 0.5).max(0) as usize;
    let stable50 = round_to_isize(0.25 * l - 0.5).max(0) as usize;
    let stable75 = round_to_isize(0.125 * l - 0.5).max(0) as usize;

    match label {
        1 | 4 | 7 => (test_index_at_column(path, c25), 0),
        2 | 5 | 8 => (test_index_at_column(path, c50), 0),
        3 | 6 | 9 => (test_index_at_column(path, c75), 0),
        10 | 13 | 16 | 19 | 22 | 25 | 28 | 31 | 34 => {
            (test_index_at_column(path, c25), test_index_at_column(path, c25 + stable25))
        }
        11 | 14 | 17 | 20 | 23 | 26 | 29 | 32 | 35 => {
            (test_index_at_column(path, c50), test_index_at_column(path, c50 + stable50))
        }
        12 | 15 | 18 | 21 | 24 | 27 | 30 | 33 | 36 => {
            (test_index_at_column(path, c75), test_index_at_column(path, c75 + stable75))
        }
        37 | 38 | 39 | 40 => (0, 0),
        41 | 44 | 47 => (0, test_index_at_column(path, c25)),
        42 | 45 | 48 => (0, test_index_at_column(path, c50)),
        43 | 46 | 49 => (0, test_index_at_column(path, c75)),
        _ => (0, 0),
    }
}

/// Finds the first path entry whose (0-based) reference index equals
/// `column - 1` (column is 1-based) and returns its test-index converted
/// back to 1-based; 0 if not found.
fn test_index_at_column(path: &[PathStep], column: usize) -> usize {
    if column == 0 {
        return 0;
    }
    let target_ref = column - 1;
    path.iter().find(|&&(r, _)| r == target_ref).map(|&(_, t)| t + 1).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::generate_templates;

    #[test]
    fn all_nan_series_yields_zero_result() {
        let templates = generate_templates([0.15, 0.75], 15, 0.8, 0.6);
        let x = vec![f64::NAN; 15];
        let result = classify_pixel(&x, &templates);
        assert_eq!(result, PixelResult::default());
    }

    #[test]
    fn raw_templates_are_self_consistent_nearest_neighbours() {
        let templates = generate_templates([0.15, 0.75], 20, 0.8, 0.6);
        for t in &templates {
            let best = nearest_template(&t.values, &templates);
            assert_eq!(templates[best].label, t.label, "template {} nearest-matched to {}", t.label, templates[best].label);
        }
    }

    #[test]
    fn nan_path_adjustment_matches_worked_example() {
        let path = vec![(0, 0), (0, 1), (1, 2), (2, 3), (3, 4)];
        let adjusted = adjust_path_for_nans(path, &[2]);
        let test_indices: Vec<usize> = adjusted.iter().map(|&(_, t)| t).collect();
        assert_eq!(test_indices, vec![0, 1, 3, 4, 5]);
    }

    #[test]
    fn constant_low_series_classifies_as_no_change_label_37() {
        let templates = generate_templates([0.1, 0.8], 20, 0.8, 0.6);
        let x = vec![0.1; 20];
        let result = classify_pixel(&x, &templates);
        assert_eq!(result.label, 37);
        assert_eq!(result.yd, 0);
        assert_eq!(result.yr, 0);
    }

    #[test]
    fn constant_high_series_classifies_as_no_change_label_38() {
        let templates = generate_templates([0.1, 0.8], 20, 0.8, 0.6);
        let x = vec![0.8; 20];
        let result = classify_pixel(&x, &templates);
        assert_eq!(result.label, 38);
        assert_eq!(result.yd, 0);
        assert_eq!(result.yr, 0);
    }

    #[test]
    fn sharp_drop_with_no_recovery_at_midpoint_classifies_into_disturbance_only_group() {
        let length = 20;
        let templates = generate_templates([0.1, 0.8], length, 0.8, 0.6);
        let mut x = vec![0.8; length];
        for v in x.iter_mut().skip(length / 2) {
            *v = 0.1;
        }
        let result = classify_pixel(&x, &templates);
        assert!(matches!(result.label, 2 | 5 | 8), "expected a disturbance-only label, got {}", result.label);
        assert!(result.yd > 0);
        assert_eq!(result.yr, 0);
    }

    #[test]
    fn isolated_nan_gaps_do_not_change_the_winning_label() {
        let length = 20;
        let templates = generate_templates([0.1, 0.8], length, 0.8, 0.6);
        let mut x = vec![0.1; length];
        let clean = classify_pixel(&x, &templates);
        x[3] = f64::NAN;
        x[9] = f64::NAN;
        let with_gaps = classify_pixel(&x, &templates);
        assert_eq!(clean.label, with_gaps.label);
    }

    #[test]
    fn safe_wrapper_never_panics_on_mismatched_lengths() {
        let templates = generate_templates([0.1, 0.9], 10, 0.8, 0.6);
        let failures = FailureCounter::new();
        let x: Vec<f64> = vec![0.5; 3];
        let result = classify_pixel_safe(&x, &templates, &failures);
        assert!(result.label <= 49);
    }
}
