//! C1: robust [low, high] NDVI bounds from the full stack.

use mining_common::{Error, Result};
use mining_raster::RasterStack;

/// Minimum number of valid (non-zero, non-NaN) samples required to compute
/// percentile bounds; below this the job cannot proceed.
const MIN_VALID_SAMPLES: usize = 200;

/// Computes `[low, high]` as the 0.5th and 99.5th percentile of the stack's
/// non-zero, non-NaN values, using 1-based MATLAB-style index semantics
/// converted to 0-based (`floor(p*N) - 1`).
pub fn estimate_percentiles(stack: &RasterStack) -> Result<[f64; 2]> {
    let mut values: Vec<f64> = stack
        .data
        .iter()
        .copied()
        .filter(|v| !v.is_nan() && *v != 0.0)
        .collect();

    if values.len() < MIN_VALID_SAMPLES {
        return Err(Error::InsufficientData(format!(
            "only {} valid NDVI samples, need at least {}",
            values.len(),
            MIN_VALID_SAMPLES
        )));
    }

    values.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = values.len();
    let low_idx = percentile_index(n, 0.005);
    let high_idx = percentile_index(n, 0.995);
    Ok([values[low_idx], values[high_idx]])
}

fn percentile_index(n: usize, p: f64) -> usize {
    let pos = (p * n as f64).floor() as isize - 1;
    pos.clamp(0, n as isize - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use mining_raster::GeoReference;

    #[test]
    fn drops_nan_and_zero_then_picks_percentiles() {
        let mut values = Vec::new();
        for i in 0..1000 {
            values.push((i as f64) / 1000.0);
        }
        // Interleave zeros and NaNs that must be dropped.
        values.push(0.0);
        values.push(f64::NAN);

        let geo = GeoReference::default();
        let mut stack = RasterStack::new(1, values.len(), 1, geo);
        for (i, v) in values.iter().enumerate() {
            stack.set(0, i, 0, *v);
        }

        let [low, high] = estimate_percentiles(&stack).unwrap();
        assert!(low < high);
        assert!(low >= 0.0 && low < 0.05);
        assert!(high > 0.9 && high <= 1.0);
    }

    #[test]
    fn fails_with_too_few_valid_samples() {
        let geo = GeoReference::default();
        let mut stack = RasterStack::new(1, 10, 1, geo);
        for i in 0..10 {
            stack.set(0, i, 0, 0.1 * i as f64);
        }
        let result = estimate_percentiles(&stack);
        assert!(matches!(result, Err(Error::InsufficientData(_))));
    }
}
