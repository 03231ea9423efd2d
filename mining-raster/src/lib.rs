//! In-memory raster types and GeoTIFF I/O for the mining-disturbance
//! detection pipeline: a multi-band stack for the NDVI time series and the
//! bare-coal probability raster, a single-band raster for each output
//! layer, and a minimal GeoTIFF reader/writer that carries geo-referencing
//! tags through without interpreting them.

pub mod geotiff;
pub mod raster;
pub mod resample;

pub use geotiff::{read_multiband, write_singleband};
pub use raster::{GeoReference, RasterStack, SingleBandRaster};
pub use resample::resample_nearest;
