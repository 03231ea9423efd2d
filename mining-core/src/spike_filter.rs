//! C3: removes dip-spikes from a 1-D series via a sliding-triplet rule.
//! Grounded on `bwlvbo.py::_spike_removal_numba`.

/// Sweeps `a` forward in triplets, overwriting `a[i+1]` with the average of
/// its neighbours whenever the triplet looks like an isolated dip spike.
/// The sweep uses values already overwritten by earlier iterations.
pub fn remove_spikes(a: &[f64]) -> Vec<f64> {
    let mut result = a.to_vec();
    if result.len() < 3 {
        return result;
    }
    for i in 0..result.len() - 2 {
        let c0 = result[i];
        let c1 = result[i + 1];
        let c2 = result[i + 2];

        if c0 == 0.0 || c2 == 0.0 {
            continue;
        }

        let p1 = (c0 - c1) / c0;
        let p2 = (c2 - c1) / c2;
        let p3 = c2 - c1;
        let p4 = c0 - c1;

        if p4 == 0.0 {
            continue;
        }

        if p1 > 0.2 && p2 > 0.2 && p3 / p4 > 0.4 {
            result[i + 1] = (c0 + c2) / 2.0;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smooths_a_single_dip_spike() {
        let a = [0.8, 0.3, 0.8, 0.7, 0.75];
        let result = remove_spikes(&a);
        assert_eq!(result[1], 0.8);
    }

    #[test]
    fn leaves_monotonic_series_untouched() {
        let a = [0.1, 0.2, 0.3, 0.4, 0.5];
        let result = remove_spikes(&a);
        assert_eq!(result, a);
    }

    #[test]
    fn short_series_is_returned_unchanged() {
        let a = [0.5, 0.6];
        assert_eq!(remove_spikes(&a), a);
    }
}
