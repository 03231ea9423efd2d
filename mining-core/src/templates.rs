//! C2: synthesizes the 49 canonical NDVI trajectories used as DTW templates.
//!
//! Grounded on `sample_generator.py::creat_sample` from the reference
//! implementation: each row encodes a disturbance/recovery pattern as a
//! sequence of `L` NDVI values followed by its integer label in `1..=49`.

use mining_common::rounding::round_to_isize;

/// A single template row: `values` has exactly `length` entries, `label` is
/// the template's class in `1..=49`.
#[derive(Debug, Clone)]
pub struct Template {
    pub label: u8,
    pub values: Vec<f64>,
}

/// One `(disturbance_amplitude, recovery_target)` combination, applied at
/// drop positions 25/50/75% to produce three consecutive labels.
struct RecoveryGroup {
    dist_amp: f64,
    rec_target: [f64; 2],
    start_label: u8,
}

/// Generates the 49-row template table for percentile bounds `s = [low,
/// high]`, series length `length`, and amplitude factors `p1`, `p2`.
pub fn generate_templates(s: [f64; 2], length: usize, p1: f64, p2: f64) -> Vec<Template> {
    let mut templates = Vec::with_capacity(49);
    let low = s[0];
    let high = s[1];

    // Labels 1-9: step down, no recovery, at 25/50/75% with three pre-drop
    // amplitudes (1.0, p1, p2) times `high`.
    for (amp_idx, amp) in [1.0, p1, p2].iter().enumerate() {
        for (pos_idx, pct) in [0.25, 0.5, 0.75].iter().enumerate() {
            let label = (amp_idx * 3 + pos_idx + 1) as u8;
            let pre_len = (round_to_isize(pct * length as f64) - 1).max(0) as usize;
            let post_len = length.saturating_sub(pre_len);
            let mut row = Vec::with_capacity(length);
            row.extend(std::iter::repeat(amp * high).take(pre_len));
            row.extend(std::iter::repeat(low).take(post_len));
            templates.push(Template {
                label,
                values: fit_to_length(row, length),
            });
        }
    }

    // Labels 10-36: step down + exponential recovery, nine amplitude/target
    // combinations in the fixed order the reference generator uses.
    let groups = [
        RecoveryGroup { dist_amp: 1.0, rec_target: [low, high], start_label: 10 },
        RecoveryGroup { dist_amp: p1, rec_target: [low, high], start_label: 13 },
        RecoveryGroup { dist_amp: 1.0, rec_target: [low, p1 * high], start_label: 16 },
        RecoveryGroup { dist_amp: p1, rec_target: [low, p1 * high], start_label: 19 },
        RecoveryGroup { dist_amp: p2, rec_target: [low, high], start_label: 22 },
        RecoveryGroup { dist_amp: 1.0, rec_target: [low, p2 * high], start_label: 25 },
        RecoveryGroup { dist_amp: p2, rec_target: [low, p2 * high], start_label: 28 },
        RecoveryGroup { dist_amp: p2, rec_target: [low, p1 * high], start_label: 31 },
        RecoveryGroup { dist_amp: p1, rec_target: [low, p2 * high], start_label: 34 },
    ];
    for group in &groups {
        templates.extend(build_recovery_group(group, high, low, length));
    }

    // Label 37: constant low. Labels 38-40: constant high, 0.8*high, 0.6*high.
    templates.push(Template { label: 37, values: vec![low; length] });
    templates.push(Template { label: 38, values: vec![high; length] });
    templates.push(Template { label: 39, values: vec![p1 * high; length] });
    templates.push(Template { label: 40, values: vec![p2 * high; length] });

    // Labels 41-49: recovery only (no prior disturbance) at 25/50/75% across
    // three target combinations.
    let recovery_only_targets: [([f64; 2], u8); 3] = [
        ([low, high], 41),
        ([low, p1 * high], 44),
        ([low, p2 * high], 47),
    ];
    for (rec_target, start_label) in recovery_only_targets {
        templates.extend(build_recovery_only_group(rec_target, start_label, low, length));
    }

    templates
}

fn build_recovery_group(group: &RecoveryGroup, high: f64, low: f64, length: usize) -> Vec<Template> {
    let positions = [0.25, 0.5, 0.75];
    let stable_fracs = [0.375, 0.25, 0.125];
    let mut out = Vec::with_capacity(3);
    for i in 0..3 {
        let dp = round_to_isize(positions[i] * length as f64).max(1);
        let pre_len = (dp - 1).max(0) as usize;
        let stable_len = round_to_isize(stable_fracs[i] * length as f64 - 0.5).max(0) as usize;
        let rec_len = length.saturating_sub(pre_len + stable_len).max(1);

        let rec_vals = vegetation_recovery(group.rec_target, rec_len);

        let mut row = Vec::with_capacity(length);
        row.extend(std::iter::repeat(group.dist_amp * high).take(pre_len));
        row.extend(std::iter::repeat(low).take(stable_len));
        row.extend(rec_vals);

        out.push(Template {
            label: group.start_label + i as u8,
            values: fit_to_length(row, length),
        });
    }
    out
}

fn build_recovery_only_group(
    rec_target: [f64; 2],
    start_label: u8,
    low: f64,
    length: usize,
) -> Vec<Template> {
    let positions = [0.25, 0.5, 0.75];
    let mut out = Vec::with_capacity(3);
    for (i, pct) in positions.iter().enumerate() {
        let pos = round_to_isize(pct * length as f64).max(1) as usize;
        let pre_len = pos.saturating_sub(1);
        let rec_len = length.saturating_sub(pre_len).max(1);
        let rec_vals = vegetation_recovery(rec_target, rec_len);

        let mut row = Vec::with_capacity(length);
        row.extend(std::iter::repeat(low).take(pre_len));
        row.extend(rec_vals);

        out.push(Template {
            label: start_label + i as u8,
            values: fit_to_length(row, length),
        });
    }
    out
}

/// The recovery curve `(a[0] - a[1]) * exp(-0.5*b) + a[1]` evaluated over
/// `b = 1..=rec_len`.
fn vegetation_recovery(a: [f64; 2], rec_len: usize) -> Vec<f64> {
    (1..=rec_len)
        .map(|b| (a[0] - a[1]) * (-0.5 * b as f64).exp() + a[1])
        .collect()
}

/// Zero-pads or trims from the end so the row has exactly `target_len`
/// entries, matching `sample_generator.py`'s `result = np.zeros(total + 1)`
/// construction (any shortfall from the segment-length arithmetic is left
/// at its zero-initialized value, never the segment's last sample). Never
/// alters the label.
fn fit_to_length(mut row: Vec<f64>, target_len: usize) -> Vec<f64> {
    if row.len() > target_len {
        row.truncate(target_len);
    } else if row.len() < target_len {
        row.resize(target_len, 0.0);
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_to_length_zero_pads_shortfall_and_truncates_overflow() {
        assert_eq!(fit_to_length(vec![1.0, 2.0], 4), vec![1.0, 2.0, 0.0, 0.0]);
        assert_eq!(fit_to_length(vec![1.0, 2.0, 3.0, 4.0], 2), vec![1.0, 2.0]);
        assert_eq!(fit_to_length(vec![], 3), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn returns_49_rows_of_length_l_with_expected_constant_rows() {
        let s = [0.1, 0.8];
        let length = 15;
        let templates = generate_templates(s, length, 0.8, 0.6);
        assert_eq!(templates.len(), 49);
        for (i, t) in templates.iter().enumerate() {
            assert_eq!(t.values.len(), length);
            assert_eq!(t.label, (i + 1) as u8);
        }
        let row37 = &templates[36];
        assert!(row37.values.iter().all(|v| (*v - s[0]).abs() < 1e-12));
        let row38 = &templates[37];
        assert!(row38.values.iter().all(|v| (*v - s[1]).abs() < 1e-12));
    }

    #[test]
    fn returns_49_rows_for_a_range_of_bounds_and_lengths() {
        let cases: [([f64; 2], usize); 4] = [
            ([0.0, 1.0], 5),
            ([-0.2, 0.9], 23),
            ([0.1, 0.95], 40),
            ([0.05, 0.3], 8),
        ];
        for (s, length) in cases {
            let templates = generate_templates(s, length, 0.8, 0.6);
            assert_eq!(templates.len(), 49);
            for (i, t) in templates.iter().enumerate() {
                assert_eq!(t.values.len(), length, "length mismatch for s={s:?} length={length}");
                assert_eq!(t.label, (i + 1) as u8);
                assert!(t.values.iter().all(|v| v.is_finite()));
            }
        }
    }

    #[test]
    fn label_1_matches_reference_pre_post_split() {
        let s = [0.2, 0.8];
        let length = 15;
        let templates = generate_templates(s, length, 0.8, 0.6);
        let t1 = &templates[0];
        let pre_len = (round_to_isize(0.25 * length as f64) - 1) as usize;
        for i in 0..pre_len {
            assert!((t1.values[i] - s[1]).abs() < 1e-12);
        }
        for i in pre_len..length {
            assert!((t1.values[i] - s[0]).abs() < 1e-12);
        }
    }
}
