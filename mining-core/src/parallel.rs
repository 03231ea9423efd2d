//! C9: dispatches per-pixel classification across a worker pool in bounded
//! chunks, with cooperative cancellation checked at chunk boundaries.
//! Grounded on the teacher's rayon-based tool dispatch pattern
//! (`whitebox-tools-app`'s tools use `rayon::scope`/`par_iter` over
//! independent row or tile ranges) and spec §4.9/§5.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::classifier::{classify_pixel_safe, FailureCounter, PixelResult};
use crate::templates::Template;

/// Default number of pixels handed to one chunk of work, per §4.9.
pub const DEFAULT_CHUNK_SIZE: usize = 2000;

/// Cooperative cancellation flag shared between the orchestrator and the
/// worker pool; checked at chunk boundaries, never inside a pixel.
#[derive(Default)]
pub struct CancellationToken(AtomicBool);

impl CancellationToken {
    pub fn new() -> Self {
        CancellationToken(AtomicBool::new(false))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Classifies every series in `pixels` against `templates`, partitioned into
/// chunks of `chunk_size` and dispatched across rayon's global pool (sized
/// to all cores unless the caller has configured a narrower pool). Returns
/// `None` if cancelled before all chunks complete, in which case the caller
/// must discard partial results per §5's cancellation policy.
pub fn classify_all(
    pixels: &[Vec<f64>],
    templates: &[Template],
    chunk_size: usize,
    cancellation: &CancellationToken,
) -> Option<(Vec<PixelResult>, u64)> {
    let chunk_size = chunk_size.max(1);
    let failures = Arc::new(FailureCounter::new());
    let mut results = vec![PixelResult::default(); pixels.len()];

    let chunk_outputs: Vec<Option<Vec<(usize, PixelResult)>>> = pixels
        .chunks(chunk_size)
        .enumerate()
        .collect::<Vec<_>>()
        .par_iter()
        .map(|&(chunk_idx, chunk)| {
            if cancellation.is_cancelled() {
                return None;
            }
            let base = chunk_idx * chunk_size;
            let chunk_results: Vec<(usize, PixelResult)> = chunk
                .iter()
                .enumerate()
                .map(|(i, series)| (base + i, classify_pixel_safe(series, templates, &failures)))
                .collect();
            Some(chunk_results)
        })
        .collect();

    if cancellation.is_cancelled() {
        return None;
    }

    for chunk in chunk_outputs {
        let chunk = chunk?;
        for (idx, result) in chunk {
            results[idx] = result;
        }
    }

    Some((results, failures.count()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::generate_templates;

    #[test]
    fn classifies_every_pixel_and_preserves_order() {
        let templates = generate_templates([0.15, 0.75], 15, 0.8, 0.6);
        let pixels: Vec<Vec<f64>> = templates.iter().map(|t| t.values.clone()).collect();
        let cancellation = CancellationToken::new();
        let (results, failures) = classify_all(&pixels, &templates, 5, &cancellation).unwrap();
        assert_eq!(results.len(), pixels.len());
        assert_eq!(failures, 0);
        for (result, template) in results.iter().zip(templates.iter()) {
            assert_eq!(result.label, template.label);
        }
    }

    #[test]
    fn pre_cancelled_token_yields_none() {
        let templates = generate_templates([0.1, 0.9], 10, 0.8, 0.6);
        let pixels: Vec<Vec<f64>> = vec![vec![0.5; 10]; 4];
        let cancellation = CancellationToken::new();
        cancellation.cancel();
        assert!(classify_all(&pixels, &templates, 2, &cancellation).is_none());
    }
}
