//! C7: morphological opening, 8-connected component labelling, and
//! region-area/coal-overlap gating. Grounded on
//! `examples/original_source/backend/runners/python_runner.py`'s
//! `_disk_structuring_element` + `binary_opening`/`generate_binary_structure(2,
//! 2)`/`label` + coal binarize/`scipy.ndimage.median_filter(size=(5,5))` +
//! the 1111/222/0.02 area/overlap gate, all in that file's `run_detect`.

use mining_raster::RasterStack;

/// Labels excluded from the disturbance mask: the four "constant" template
/// groups (no disturbance/recovery event) and the unclassified sentinel.
const NON_DISTURBANCE_LABELS: [f64; 5] = [0.0, 37.0, 38.0, 39.0, 40.0];

const AREA_THRESHOLD: usize = 1111;
const OVERLAP_THRESHOLD: usize = 222;
const OVERLAP_RATIO_THRESHOLD: f64 = 0.02;

/// Offsets of a 5x5 disk structuring element of radius 2 (`x^2+y^2 <= 4`).
fn disk_offsets() -> Vec<(i32, i32)> {
    let mut offsets = Vec::new();
    for dy in -2..=2 {
        for dx in -2..=2 {
            if dx * dx + dy * dy <= 4 {
                offsets.push((dx, dy));
            }
        }
    }
    offsets
}

fn at(rows: usize, cols: usize, mask: &[u8], r: i32, c: i32) -> u8 {
    if r < 0 || c < 0 || r as usize >= rows || c as usize >= cols {
        0
    } else {
        mask[r as usize * cols + c as usize]
    }
}

/// Builds the raw disturbance/recovery binary mask: 1 where the per-pixel
/// label is a disturbance or recovery class (not one of the constant
/// groups, not the unclassified sentinel, not NaN).
pub fn binary_mask_from_labels(labels: &[f64]) -> Vec<u8> {
    labels
        .iter()
        .map(|&v| {
            if v.is_nan() || NON_DISTURBANCE_LABELS.iter().any(|n| (*n - v).abs() < 1e-9) {
                0
            } else {
                1
            }
        })
        .collect()
}

fn erode(rows: usize, cols: usize, mask: &[u8], offsets: &[(i32, i32)]) -> Vec<u8> {
    let mut out = vec![0u8; rows * cols];
    for r in 0..rows {
        for c in 0..cols {
            let hit = offsets
                .iter()
                .all(|&(dx, dy)| at(rows, cols, mask, r as i32 + dy, c as i32 + dx) == 1);
            out[r * cols + c] = hit as u8;
        }
    }
    out
}

fn dilate(rows: usize, cols: usize, mask: &[u8], offsets: &[(i32, i32)]) -> Vec<u8> {
    let mut out = vec![0u8; rows * cols];
    for r in 0..rows {
        for c in 0..cols {
            let hit = offsets
                .iter()
                .any(|&(dx, dy)| at(rows, cols, mask, r as i32 + dy, c as i32 + dx) == 1);
            out[r * cols + c] = hit as u8;
        }
    }
    out
}

/// Morphological opening (erosion then dilation) with the disk-2 SE.
pub fn morphological_open(rows: usize, cols: usize, mask: &[u8]) -> Vec<u8> {
    let offsets = disk_offsets();
    let eroded = erode(rows, cols, mask, &offsets);
    dilate(rows, cols, &eroded, &offsets)
}

/// Labels 8-connected components via flood fill. Returns the per-pixel
/// component id (0 = background, ids from 1) and the component count.
pub fn connected_components(rows: usize, cols: usize, mask: &[u8]) -> (Vec<u32>, u32) {
    let mut labels = vec![0u32; rows * cols];
    let mut next_label = 0u32;
    let mut stack = Vec::new();

    for r in 0..rows {
        for c in 0..cols {
            let idx = r * cols + c;
            if mask[idx] == 0 || labels[idx] != 0 {
                continue;
            }
            next_label += 1;
            labels[idx] = next_label;
            stack.push((r, c));
            while let Some((cr, cc)) = stack.pop() {
                for dy in -1i32..=1 {
                    for dx in -1i32..=1 {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let nr = cr as i32 + dy;
                        let nc = cc as i32 + dx;
                        if nr < 0 || nc < 0 || nr as usize >= rows || nc as usize >= cols {
                            continue;
                        }
                        let nidx = nr as usize * cols + nc as usize;
                        if mask[nidx] == 1 && labels[nidx] == 0 {
                            labels[nidx] = next_label;
                            stack.push((nr as usize, nc as usize));
                        }
                    }
                }
            }
        }
    }
    (labels, next_label)
}

/// Binarizes a (possibly multi-band) coal-probability stack already
/// resampled onto the NDVI grid: `coal > 0.5 -> 1`, else (including NaN)
/// `0`; bands are summed then clamped to `{0,1}`; a 5x5 majority-vote
/// median filter is then applied.
pub fn binarize_coal_mask(coal: &RasterStack) -> Vec<u8> {
    let rows = coal.rows;
    let cols = coal.columns;
    let mut summed = vec![0u32; rows * cols];
    for b in 0..coal.bands {
        for r in 0..rows {
            for c in 0..cols {
                let v = coal.get(r, c, b);
                if v.is_finite() && v > 0.5 {
                    summed[r * cols + c] += 1;
                }
            }
        }
    }
    let clamped: Vec<u8> = summed.iter().map(|&v| if v > 0 { 1 } else { 0 }).collect();
    median_filter_5x5(rows, cols, &clamped)
}

/// Maps an out-of-range index back into `0..n` by reflecting about the edge
/// of the last pixel (`d c b a | a b c d | d c b a`), matching
/// `scipy.ndimage`'s default `mode='reflect'` boundary extension.
fn reflect_index(i: i32, n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let n = n as i32;
    let period = 2 * n;
    let mut m = i % period;
    if m < 0 {
        m += period;
    }
    if m >= n {
        m = period - 1 - m;
    }
    m as usize
}

/// Majority-vote median filter over a full 5x5 window at every pixel,
/// reflecting across borders rather than clipping the window so the vote
/// threshold stays fixed at 25 samples everywhere, matching
/// `scipy.ndimage.median_filter(size=(5, 5))`'s default boundary handling.
pub fn median_filter_5x5(rows: usize, cols: usize, mask: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; rows * cols];
    const WINDOW: usize = 25;
    for r in 0..rows {
        for c in 0..cols {
            let mut ones = 0usize;
            for dy in -2i32..=2 {
                for dx in -2i32..=2 {
                    let rr = reflect_index(r as i32 + dy, rows);
                    let cc = reflect_index(c as i32 + dx, cols);
                    ones += mask[rr * cols + cc] as usize;
                }
            }
            out[r * cols + c] = if ones * 2 >= WINDOW { 1 } else { 0 };
        }
    }
    out
}

/// For each connected component intersecting the coal mask, keeps it when
/// `total >= 1111 && overlap >= 222 && overlap/total >= 0.02`; returns a
/// `{0,1}` grid of kept regions.
pub fn gate_regions(comp_labels: &[u32], num_components: u32, coal_mask: &[u8]) -> Vec<u8> {
    let mut total = vec![0usize; num_components as usize + 1];
    let mut overlap = vec![0usize; num_components as usize + 1];
    for (i, &label) in comp_labels.iter().enumerate() {
        if label == 0 {
            continue;
        }
        total[label as usize] += 1;
        if coal_mask[i] == 1 {
            overlap[label as usize] += 1;
        }
    }

    let mut keep = vec![false; num_components as usize + 1];
    for label in 1..=num_components as usize {
        let t = total[label];
        let o = overlap[label];
        if o == 0 {
            continue;
        }
        let ratio = o as f64 / t as f64;
        keep[label] = t >= AREA_THRESHOLD && o >= OVERLAP_THRESHOLD && ratio >= OVERLAP_RATIO_THRESHOLD;
    }

    comp_labels
        .iter()
        .map(|&label| if label != 0 && keep[label as usize] { 1 } else { 0 })
        .collect()
}

/// Multiplies a raw band-index raster by the kept mask, offsets into an
/// absolute year (`startyear - 1 + value`), and zeroes pixels that land
/// exactly on `startyear - 1` (i.e. where the mask was 0).
pub fn apply_year_mask(raw: &[f64], kept_mask: &[u8], startyear: i32) -> Vec<f64> {
    let offset = (startyear - 1) as f64;
    raw.iter()
        .zip(kept_mask.iter())
        .map(|(&v, &m)| {
            let masked = v * m as f64;
            let year = masked + offset;
            if (year - offset).abs() < 1e-9 {
                0.0
            } else {
                year
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mining_raster::GeoReference;

    fn square_mask(rows: usize, cols: usize, side: usize, label: f64) -> Vec<f64> {
        let mut grid = vec![0.0; rows * cols];
        let r0 = (rows - side) / 2;
        let c0 = (cols - side) / 2;
        for r in r0..r0 + side {
            for c in c0..c0 + side {
                grid[r * cols + c] = label;
            }
        }
        grid
    }

    #[test]
    fn forty_by_forty_region_with_full_coal_overlap_survives_gate() {
        let rows = 60;
        let cols = 60;
        let labels = square_mask(rows, cols, 40, 5.0);
        let bw = binary_mask_from_labels(&labels);
        let opened = morphological_open(rows, cols, &bw);
        let (comp, n) = connected_components(rows, cols, &opened);
        let coal_mask = vec![1u8; rows * cols];
        let kept = gate_regions(&comp, n, &coal_mask);
        assert!(kept.iter().any(|&v| v == 1), "expected at least one kept pixel");
    }

    #[test]
    fn twenty_by_twenty_region_does_not_survive_gate() {
        let rows = 60;
        let cols = 60;
        let labels = square_mask(rows, cols, 20, 5.0);
        let bw = binary_mask_from_labels(&labels);
        let opened = morphological_open(rows, cols, &bw);
        let (comp, n) = connected_components(rows, cols, &opened);
        let coal_mask = vec![1u8; rows * cols];
        let kept = gate_regions(&comp, n, &coal_mask);
        assert!(kept.iter().all(|&v| v == 0), "20x20 region must not survive the area gate");
    }

    #[test]
    fn constant_template_labels_are_excluded_from_mask() {
        let labels = vec![0.0, 37.0, 38.0, 39.0, 40.0, 5.0, f64::NAN];
        let mask = binary_mask_from_labels(&labels);
        assert_eq!(mask, vec![0, 0, 0, 0, 0, 1, 0]);
    }

    #[test]
    fn apply_year_mask_zeroes_unmasked_pixels() {
        let raw = vec![3.0, 5.0];
        let mask = vec![0u8, 1u8];
        let out = apply_year_mask(&raw, &mask, 2000);
        assert_eq!(out, vec![0.0, 2004.0]);
    }

    #[test]
    fn reflect_index_mirrors_about_the_last_pixel() {
        assert_eq!(reflect_index(-1, 5), 0);
        assert_eq!(reflect_index(-2, 5), 1);
        assert_eq!(reflect_index(5, 5), 4);
        assert_eq!(reflect_index(6, 5), 3);
        assert_eq!(reflect_index(2, 5), 2);
    }

    #[test]
    fn median_filter_reflects_a_corner_one_into_its_border_neighbours() {
        let rows = 5;
        let cols = 5;
        let mut mask = vec![0u8; rows * cols];
        mask[0] = 1;
        let out = median_filter_5x5(rows, cols, &mask);
        // A single 1 among 25 reflected samples never reaches the 13-vote
        // majority threshold anywhere, corner included.
        assert!(out.iter().all(|&v| v == 0));
    }

    #[test]
    fn binarize_coal_sums_bands_and_thresholds() {
        let geo = GeoReference::default();
        let mut stack = RasterStack::new(3, 3, 2, geo);
        for r in 0..3 {
            for c in 0..3 {
                stack.set(r, c, 0, 0.9);
                stack.set(r, c, 1, 0.1);
            }
        }
        let mask = binarize_coal_mask(&stack);
        assert!(mask.iter().all(|&v| v == 1));
    }
}
