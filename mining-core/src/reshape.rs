//! Column-major (Fortran-order) reshape helpers between the 3-D NDVI stack
//! and the per-pixel series list, matching spec §3/§9's requirement that the
//! per-pixel axis be contiguous over bands after reshape. `mining_raster`'s
//! `RasterStack` already exposes `pixel_series(row, col)` directly, so the
//! pipeline does not need literal flattening to process pixels — but the
//! column-major index mapping is reproduced explicitly here (and round-trip
//! tested) to honour the reproducibility invariant in its own right.

use mining_raster::RasterStack;

/// Column-major linear index of `(row, col)` in an `rows x cols` grid.
pub fn column_major_index(row: usize, col: usize, rows: usize) -> usize {
    col * rows + row
}

/// Inverse of [`column_major_index`].
pub fn row_col_from_column_major(index: usize, rows: usize) -> (usize, usize) {
    (index % rows, index / rows)
}

/// Flattens `(rows, cols, bands)` into a `rows*cols`-length list of
/// per-pixel band series, ordered column-major over `(row, col)`.
pub fn flatten_column_major(stack: &RasterStack) -> Vec<Vec<f64>> {
    let mut out = Vec::with_capacity(stack.rows * stack.columns);
    for c in 0..stack.columns {
        for r in 0..stack.rows {
            out.push(stack.pixel_series(r, c));
        }
    }
    out
}

/// Inverse of [`flatten_column_major`]: scatters a column-major pixel list
/// back into an `(rows, cols, bands)` stack.
pub fn unflatten_column_major(flat: &[Vec<f64>], rows: usize, columns: usize, geo: mining_raster::GeoReference) -> RasterStack {
    let bands = flat.first().map(|v| v.len()).unwrap_or(0);
    let mut stack = RasterStack::new(rows, columns, bands, geo);
    for (idx, series) in flat.iter().enumerate() {
        let (r, c) = row_col_from_column_major(idx, rows);
        for (b, &v) in series.iter().enumerate() {
            stack.set(r, c, b, v);
        }
    }
    stack
}

#[cfg(test)]
mod tests {
    use super::*;
    use mining_raster::GeoReference;

    #[test]
    fn roundtrip_is_identity() {
        let rows = 4;
        let cols = 3;
        let bands = 5;
        let geo = GeoReference::default();
        let mut stack = RasterStack::new(rows, cols, bands, geo.clone());
        let mut counter = 0.0;
        for b in 0..bands {
            for r in 0..rows {
                for c in 0..cols {
                    stack.set(r, c, b, counter);
                    counter += 1.0;
                }
            }
        }

        let flat = flatten_column_major(&stack);
        assert_eq!(flat.len(), rows * cols);
        let restored = unflatten_column_major(&flat, rows, cols, geo);
        assert_eq!(restored.data, stack.data);
    }

    #[test]
    fn column_major_index_matches_inverse() {
        let rows = 7;
        for col in 0..5 {
            for row in 0..rows {
                let idx = column_major_index(row, col, rows);
                assert_eq!(row_col_from_column_major(idx, rows), (row, col));
            }
        }
    }
}
