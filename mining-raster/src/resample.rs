//! Nearest-neighbour resampling of one raster stack onto another's grid.
//!
//! The bare-coal probability raster is not guaranteed to share the NDVI
//! stack's row/column dimensions or pixel size, only its general coverage
//! area, so it is resampled onto the NDVI grid before the spatial filter
//! can overlay the two. Only axis-aligned (non-rotated) geo-referencing is
//! supported, which covers every north-up GeoTIFF GDAL produces; a raster
//! whose geo-reference could not be resolved to an extent is treated as
//! having no known alignment and is resampled by direct index mapping.

use crate::raster::{GeoReference, RasterStack};

/// Resamples `src` onto a grid of `dst_rows` x `dst_cols` described by
/// `dst_geo`, using nearest-neighbour sampling. Destination cells that fall
/// outside `src`'s extent are filled with `src.geo.nodata`.
pub fn resample_nearest(
    src: &RasterStack,
    dst_rows: usize,
    dst_cols: usize,
    dst_geo: &GeoReference,
) -> RasterStack {
    let mut out_geo = dst_geo.clone();
    out_geo.rows = dst_rows;
    out_geo.columns = dst_cols;
    out_geo.nodata = src.geo.nodata;
    let mut out = RasterStack::new(dst_rows, dst_cols, src.bands, out_geo);

    let src_has_extent = src.geo.resolution_x.is_finite()
        && src.geo.resolution_x > 0.0
        && src.geo.resolution_y.is_finite()
        && src.geo.resolution_y > 0.0;
    let dst_has_extent = dst_geo.resolution_x.is_finite()
        && dst_geo.resolution_x > 0.0
        && dst_geo.resolution_y.is_finite()
        && dst_geo.resolution_y > 0.0;

    for row in 0..dst_rows {
        for col in 0..dst_cols {
            let (src_row, src_col) = if src_has_extent && dst_has_extent {
                let x = dst_geo.west + (col as f64 + 0.5) * dst_geo.resolution_x;
                let y = dst_geo.north - (row as f64 + 0.5) * dst_geo.resolution_y;
                let sc = ((x - src.geo.west) / src.geo.resolution_x).floor();
                let sr = ((src.geo.north - y) / src.geo.resolution_y).floor();
                (sr, sc)
            } else {
                // No usable geo-reference on one side: fall back to a
                // direct proportional index mapping between the two grids.
                let sr = (row as f64 / dst_rows.max(1) as f64) * src.rows as f64;
                let sc = (col as f64 / dst_cols.max(1) as f64) * src.columns as f64;
                (sr.floor(), sc.floor())
            };

            if src_row < 0.0
                || src_col < 0.0
                || src_row as usize >= src.rows
                || src_col as usize >= src.columns
            {
                for band in 0..src.bands {
                    out.set(row, col, band, src.geo.nodata);
                }
                continue;
            }
            let sr = src_row as usize;
            let sc = src_col as usize;
            for band in 0..src.bands {
                out.set(row, col, band, src.get(sr, sc, band));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis_aligned_geo(rows: usize, columns: usize, origin: f64, res: f64) -> GeoReference {
        GeoReference {
            rows,
            columns,
            nodata: -9999.0,
            north: origin,
            south: origin - rows as f64 * res,
            east: origin + columns as f64 * res,
            west: origin,
            resolution_x: res,
            resolution_y: res,
            ..Default::default()
        }
    }

    #[test]
    fn identity_resample_preserves_values() {
        let geo = axis_aligned_geo(2, 2, 100.0, 10.0);
        let mut stack = RasterStack::new(2, 2, 1, geo.clone());
        stack.set(0, 0, 0, 1.0);
        stack.set(0, 1, 0, 2.0);
        stack.set(1, 0, 0, 3.0);
        stack.set(1, 1, 0, 4.0);

        let out = resample_nearest(&stack, 2, 2, &geo);
        assert_eq!(out.get(0, 0, 0), 1.0);
        assert_eq!(out.get(1, 1, 0), 4.0);
    }

    #[test]
    fn out_of_extent_cells_get_nodata() {
        let src_geo = axis_aligned_geo(2, 2, 100.0, 10.0);
        let mut stack = RasterStack::new(2, 2, 1, src_geo);
        stack.set(0, 0, 0, 1.0);
        let dst_geo = axis_aligned_geo(2, 2, 1000.0, 10.0);

        let out = resample_nearest(&stack, 2, 2, &dst_geo);
        assert_eq!(out.get(0, 0, 0), -9999.0);
    }
}
