//! C8: the pipeline orchestrator. Owns all file I/O and strings C1-C7 and
//! C9 together into the single `detect` entry point. Grounded on spec §4.8
//! and on the teacher's top-level tool-dispatch functions (read inputs,
//! validate, compute, write outputs, clean up on failure).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use mining_common::{Error, Result};
use mining_raster::{read_multiband, write_singleband, RasterStack, SingleBandRaster};

use crate::classifier::PixelResult;
use crate::parallel::{classify_all, CancellationToken, DEFAULT_CHUNK_SIZE};
use crate::percentile::estimate_percentiles;
use crate::reshape::{flatten_column_major, row_col_from_column_major};
use crate::spatial_filter;
use crate::templates::generate_templates;

/// Job-level configuration recognized by the core, per §6.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub startyear: i32,
    pub worker_count: Option<usize>,
    pub chunk_size: usize,
    pub p1: f64,
    pub p2: f64,
}

impl PipelineConfig {
    pub fn new(startyear: i32) -> PipelineConfig {
        PipelineConfig {
            startyear,
            worker_count: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            p1: 0.8,
            p2: 0.6,
        }
    }
}

/// Cleans NDVI values per §3: `>= 1` becomes NaN (invalid), `< -1` is
/// clamped to 0 rather than NaN (an asymmetry the reference itself has;
/// see Open Question (a) in DESIGN.md).
fn clean_ndvi(stack: &mut RasterStack) {
    for v in stack.data.iter_mut() {
        if *v >= 1.0 {
            *v = f64::NAN;
        } else if *v < -1.0 {
            *v = 0.0;
        }
    }
}

/// Clips the stack into `[0, 1]` after percentile bounds have been
/// estimated from the pre-clip values: anything still above 1 is clamped to
/// 1 (unreachable in practice since `clean_ndvi` already turned `>= 1` into
/// NaN, but kept as the reference's own belt-and-suspenders clamp) and
/// anything below 0 — including the real negative NDVI left untouched by
/// `clean_ndvi`'s `< -1` rule, e.g. water/cloud/shadow pixels in `(-1, 0)`
/// — is clamped to 0 so the classifier never sees raw negative values. NaN
/// is unaffected by both comparisons.
fn clip_to_unit_range(stack: &mut RasterStack) {
    for v in stack.data.iter_mut() {
        if *v > 1.0 {
            *v = 1.0;
        } else if *v < 0.0 {
            *v = 0.0;
        }
    }
}

/// `0` is treated as "missing" per §3's data model but is not NaN, so the
/// classifier (which strips NaN) would otherwise treat it as real data.
/// This substitutes NaN for exact-zero samples in a per-pixel series used
/// only for classification; the cleaned stack itself keeps its zeros.
fn missing_as_nan(series: &[f64]) -> Vec<f64> {
    series.iter().map(|&v| if v == 0.0 { f64::NAN } else { v }).collect()
}

/// Runs the full disturbance/recovery detection pipeline, writing seven
/// single-band GeoTIFFs into `out_dir` and returning their paths keyed by
/// name. On any abort other than cancellation, files already written this
/// run are removed before the error is returned.
pub fn detect(
    ndvi_path: &Path,
    coal_path: &Path,
    out_dir: &Path,
    config: &PipelineConfig,
    cancellation: &CancellationToken,
) -> Result<HashMap<String, PathBuf>> {
    match run(ndvi_path, coal_path, out_dir, config, cancellation) {
        Ok(outputs) => Ok(outputs),
        Err(Error::Cancelled) => Err(Error::Cancelled),
        Err(e) => {
            for name in OUTPUT_NAMES {
                let _ = fs::remove_file(out_dir.join(format!("{name}.tif")));
            }
            Err(e)
        }
    }
}

const OUTPUT_NAMES: [&str; 7] = [
    "mining_disturbance_mask",
    "mining_disturbance_year",
    "mining_recovery_year",
    "potential_disturbance",
    "res_disturbance_type",
    "year_disturbance_raw",
    "year_recovery_raw",
];

fn run(
    ndvi_path: &Path,
    coal_path: &Path,
    out_dir: &Path,
    config: &PipelineConfig,
    cancellation: &CancellationToken,
) -> Result<HashMap<String, PathBuf>> {
    if !ndvi_path.exists() {
        return Err(Error::InputNotFound(ndvi_path.to_path_buf()));
    }
    if !coal_path.exists() {
        return Err(Error::InputNotFound(coal_path.to_path_buf()));
    }

    let mut ndvi = read_multiband(ndvi_path)?;
    if ndvi.bands == 0 {
        return Err(Error::InvalidRaster("ndvi stack has zero bands".into()));
    }
    clean_ndvi(&mut ndvi);

    let bounds = estimate_percentiles(&ndvi)?;
    clip_to_unit_range(&mut ndvi);
    let length = ndvi.bands;
    let templates = generate_templates(bounds, length, config.p1, config.p2);

    let rows = ndvi.rows;
    let cols = ndvi.columns;
    let pixels = flatten_column_major(&ndvi);

    // Drop pixels whose raw series is entirely zero (entirely "missing" per
    // §3) before handing work to the classifier; they always degrade to the
    // zero result, so skipping them avoids wasted DTW work on nodata
    // borders that dominate many real scenes.
    let mut reduced_indices = Vec::with_capacity(pixels.len());
    let mut reduced_series = Vec::with_capacity(pixels.len());
    for (idx, series) in pixels.iter().enumerate() {
        if series.iter().any(|&v| v != 0.0 && !v.is_nan()) {
            reduced_indices.push(idx);
            reduced_series.push(missing_as_nan(series));
        }
    }

    if cancellation.is_cancelled() {
        return Err(Error::Cancelled);
    }

    let (reduced_results, failure_count) = match &config.worker_count {
        Some(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(*n)
                .build()
                .map_err(|e| Error::ComputeError(e.to_string()))?;
            pool.install(|| classify_all(&reduced_series, &templates, config.chunk_size, cancellation))
                .ok_or(Error::Cancelled)?
        }
        None => classify_all(&reduced_series, &templates, config.chunk_size, cancellation).ok_or(Error::Cancelled)?,
    };
    if failure_count > 0 {
        log::warn!("{failure_count} pixel(s) degraded to the zero result after a trapped panic");
    }

    let mut results = vec![PixelResult::default(); pixels.len()];
    for (reduced_idx, original_idx) in reduced_indices.into_iter().enumerate() {
        results[original_idx] = reduced_results[reduced_idx];
    }

    let mut label_grid = vec![0.0f64; rows * cols];
    let mut yd_grid = vec![0.0f64; rows * cols];
    let mut yr_grid = vec![0.0f64; rows * cols];
    for (column_major_idx, result) in results.iter().enumerate() {
        let (r, c) = row_col_from_column_major(column_major_idx, rows);
        let row_major_idx = r * cols + c;
        label_grid[row_major_idx] = result.label as f64;
        yd_grid[row_major_idx] = result.yd as f64;
        yr_grid[row_major_idx] = result.yr as f64;
    }

    let mut coal = read_multiband(coal_path)?;
    if coal.rows != rows || coal.columns != cols {
        coal = mining_raster::resample_nearest(&coal, rows, cols, &ndvi.geo);
    }
    let coal_mask = spatial_filter::binarize_coal_mask(&coal);

    let bw = spatial_filter::binary_mask_from_labels(&label_grid);
    let opened = spatial_filter::morphological_open(rows, cols, &bw);
    let (comp_labels, num_components) = spatial_filter::connected_components(rows, cols, &opened);
    let kept_mask = spatial_filter::gate_regions(&comp_labels, num_components, &coal_mask);

    let disturbance_mask: Vec<f64> = kept_mask.iter().map(|&v| v as f64).collect();
    let potential_disturbance: Vec<f64> = comp_labels.iter().map(|&v| v as f64).collect();
    let disturbance_year = spatial_filter::apply_year_mask(&yd_grid, &kept_mask, config.startyear);
    let recovery_year = spatial_filter::apply_year_mask(&yr_grid, &kept_mask, config.startyear);

    fs::create_dir_all(out_dir)?;

    let mut outputs = HashMap::new();
    let layers: [(&str, Vec<f64>); 7] = [
        ("mining_disturbance_mask", disturbance_mask),
        ("mining_disturbance_year", disturbance_year),
        ("mining_recovery_year", recovery_year),
        ("potential_disturbance", potential_disturbance),
        ("res_disturbance_type", label_grid),
        ("year_disturbance_raw", yd_grid),
        ("year_recovery_raw", yr_grid),
    ];
    for (name, data) in layers {
        let mut raster = SingleBandRaster::new(rows, cols, 0.0, ndvi.geo.clone());
        raster.data = data;
        let path = out_dir.join(format!("{name}.tif"));
        write_singleband(&path, &raster)?;
        outputs.insert(name.to_string(), path);
    }

    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mining_raster::GeoReference;
    use tempfile::tempdir;

    #[test]
    fn clean_ndvi_applies_asymmetric_invalidation() {
        let geo = GeoReference::default();
        let mut stack = RasterStack::new(1, 1, 3, geo);
        stack.set(0, 0, 0, 1.2);
        stack.set(0, 0, 1, -1.5);
        stack.set(0, 0, 2, 0.5);
        clean_ndvi(&mut stack);
        assert!(stack.get(0, 0, 0).is_nan());
        assert_eq!(stack.get(0, 0, 1), 0.0);
        assert_eq!(stack.get(0, 0, 2), 0.5);
    }

    #[test]
    fn clip_to_unit_range_zeroes_negatives_and_caps_above_one() {
        let geo = GeoReference::default();
        let mut stack = RasterStack::new(1, 1, 4, geo);
        stack.set(0, 0, 0, -0.4);
        stack.set(0, 0, 1, 0.0);
        stack.set(0, 0, 2, 0.5);
        stack.set(0, 0, 3, f64::NAN);
        clip_to_unit_range(&mut stack);
        assert_eq!(stack.get(0, 0, 0), 0.0);
        assert_eq!(stack.get(0, 0, 1), 0.0);
        assert_eq!(stack.get(0, 0, 2), 0.5);
        assert!(stack.get(0, 0, 3).is_nan());
    }

    #[test]
    fn missing_as_nan_only_touches_exact_zero() {
        let series = vec![0.0, 0.5, -0.0, f64::NAN];
        let out = missing_as_nan(&series);
        assert!(out[0].is_nan());
        assert_eq!(out[1], 0.5);
        assert!(out[2].is_nan());
        assert!(out[3].is_nan());
    }

    #[test]
    fn missing_ndvi_input_reports_input_not_found() {
        let dir = tempdir().unwrap();
        let config = PipelineConfig::new(2000);
        let cancellation = CancellationToken::new();
        let result = detect(
            &dir.path().join("missing-ndvi.tif"),
            &dir.path().join("missing-coal.tif"),
            &dir.path().join("out"),
            &config,
            &cancellation,
        );
        assert!(matches!(result, Err(Error::InputNotFound(_))));
    }
}
