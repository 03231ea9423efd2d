//! The mining-disturbance detection core: per-pixel temporal classification
//! (spike filtering, wavelet denoising, 49-template DTW nearest-neighbour
//! matching, year extraction) and the spatial post-processing that turns
//! per-pixel labels into gated mining regions.

pub mod classifier;
pub mod dtw;
pub mod parallel;
pub mod percentile;
pub mod pipeline;
pub mod reshape;
pub mod spatial_filter;
pub mod spike_filter;
pub mod templates;
pub mod wavelet;

pub use classifier::{classify_pixel, FailureCounter, PixelResult};
pub use parallel::{CancellationToken, DEFAULT_CHUNK_SIZE};
pub use pipeline::{detect, PipelineConfig};
pub use templates::{generate_templates, Template};
