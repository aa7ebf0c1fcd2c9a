//! Phase unwrapping: removes 2π discontinuities from a phase spectrum

use std::f64::consts::PI;

const TWO_PI: f64 = 2.0 * PI;

/// Unwrap a wrapped phase sequence
///
/// Each step between neighbours is folded into [-π, π] and accumulated, so
/// the output never jumps by more than π. The first value is kept as is.
///
/// # Example
///
/// ```rust
/// use spectrum_explorer::spectrum::unwrap_phase;
///
/// let wrapped = [3.0, -3.0];
/// let unwrapped = unwrap_phase(&wrapped);
/// assert!((unwrapped[1] - (2.0 * std::f32::consts::PI - 3.0)).abs() < 1e-5);
/// ```
pub fn unwrap_phase(phase: &[f32]) -> Vec<f32> {
    let mut out = Vec::with_capacity(phase.len());
    let Some(&first) = phase.first() else {
        return out;
    };
    out.push(first);

    for pair in phase.windows(2) {
        let d = wrap_step(pair[1] as f64 - pair[0] as f64);
        let prev = out[out.len() - 1] as f64;
        out.push((prev + d) as f32);
    }

    out
}

/// Fold a phase step into [-π, π]
fn wrap_step(mut d: f64) -> f64 {
    // Non-finite steps would never leave the loops below
    if !d.is_finite() {
        return d;
    }
    while d > PI {
        d -= TWO_PI;
    }
    while d < -PI {
        d += TWO_PI;
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_single() {
        assert!(unwrap_phase(&[]).is_empty());
        assert_eq!(unwrap_phase(&[2.5]), vec![2.5]);
    }

    #[test]
    fn test_unwraps_linear_ramp() {
        // Wrapped linear phase with slope 1 rad per bin
        let true_phase: Vec<f64> = (0..40).map(|i| i as f64 * 1.0 - 5.0).collect();
        let wrapped: Vec<f32> = true_phase
            .iter()
            .map(|&p| ((p + PI).rem_euclid(TWO_PI) - PI) as f32)
            .collect();

        let unwrapped = unwrap_phase(&wrapped);
        let offset = unwrapped[0] as f64 - true_phase[0];
        for (u, t) in unwrapped.iter().zip(true_phase.iter()) {
            assert!((*u as f64 - t - offset).abs() < 1e-4, "{} vs {}", u, t);
        }
    }

    #[test]
    fn test_adjacent_steps_bounded() {
        let inputs: Vec<Vec<f32>> = vec![
            vec![0.0, 3.1, -3.1, 3.1, -3.1],
            vec![10.0, -10.0, 25.0, -40.0, 0.0],
            (0..200).map(|i| ((i * 37 % 101) as f32 / 101.0 - 0.5) * 20.0).collect(),
        ];

        for input in inputs {
            let out = unwrap_phase(&input);
            assert_eq!(out.len(), input.len());
            assert_eq!(out[0], input[0]);
            for pair in out.windows(2) {
                assert!(((pair[1] - pair[0]) as f64).abs() <= PI + 1e-4);
            }
        }
    }

    #[test]
    fn test_step_below_pi_kept() {
        let out = unwrap_phase(&[0.0, 3.0, 0.5]);
        assert_eq!(out, vec![0.0, 3.0, 0.5]);
    }

    #[test]
    fn test_non_finite_terminates() {
        let out = unwrap_phase(&[0.0, f32::INFINITY, f32::NAN, 1.0]);
        assert_eq!(out.len(), 4);
    }
}
