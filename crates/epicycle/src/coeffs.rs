//! Fourier coefficients by numerical integration.
//!
//! For harmonic n the engine integrates the sampled curve against complex
//! exponentials over one full traversal (t from 0 to 1):
//!
//!   a = Σ Δ * (x(t)·cos(2πnt) + y(t)·sin(2πnt))
//!   b = Σ Δ * (y(t)·cos(2πnt) − x(t)·sin(2πnt))
//!
//! which is the real/imaginary split of ∫ f(t)·e^(−2πint) dt for
//! f = x + iy, evaluated as a Riemann sum with fixed step Δ.
//!
//! The loop runs on an integer step counter with `t = i * Δ` rather than
//! accumulating `t += Δ`: float accumulation drifts, which would both skew
//! the upper bound and generate cache keys that never repeat between
//! harmonics. The counter guarantees exactly ⌊1/Δ⌋ + 1 samples with
//! bit-identical t values on every call and every platform.

use crate::sampler::PathSampler;
use crate::svg::CurveSource;
use std::f64::consts::PI;

/// Compute the Fourier coefficient pair (a, b) for harmonic `n`.
///
/// Points come from the memoized sampler, so integrating many harmonics
/// walks the source curve only once. Total work is O(1/Δ) per call. Pure
/// numeric function of the cached samples; no error conditions.
pub fn fourier_coefficients<C: CurveSource>(
    sampler: &mut PathSampler<C>,
    n: i32,
    delta: f64,
) -> (f64, f64) {
    // The epsilon guards the division itself: 1.0/0.001 lands a hair under
    // 1000.0 in f64, and a bare floor would silently drop the t = 1 sample.
    let steps = (1.0 / delta + 1e-9).floor() as u64;

    let mut a = 0.0;
    let mut b = 0.0;

    // Inclusive upper bound: the sum covers t = 0 through t = steps * Δ.
    for i in 0..=steps {
        let t = i as f64 * delta;
        let angle = 2.0 * PI * n as f64 * t;
        let (sin, cos) = angle.sin_cos();

        let p = sampler.sample(t);
        a += delta * (p.x * cos + p.y * sin);
        b += delta * (p.y * cos - p.x * sin);
    }

    (a, b)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    /// Unit circle in raw source coordinates, pre-scaled so the sampler's
    /// normalization maps it onto x = cos(2πt), y = sin(2πt).
    struct UnitCircle;

    impl CurveSource for UnitCircle {
        fn point_at(&self, t: f64) -> Point {
            let angle = 2.0 * PI * t;
            Point::new(-300.0 * angle.cos(), 300.0 * angle.sin())
        }

        fn total_length(&self) -> f64 {
            2.0 * PI * 300.0
        }
    }

    const DELTA: f64 = 0.001;

    #[test]
    fn unit_circle_concentrates_on_first_harmonic() {
        let mut sampler = PathSampler::new(UnitCircle);

        // f(t) = e^(2πit), so ∫ f·e^(−2πint) is 1 at n=1 and 0 elsewhere.
        let (a1, b1) = fourier_coefficients(&mut sampler, 1, DELTA);
        assert!((a1 - 1.0).abs() < 5e-3, "a(1) should be ~1, got {}", a1);
        assert!(b1.abs() < 5e-3, "b(1) should be ~0, got {}", b1);

        for n in [-2, -1, 2, 3] {
            let (a, b) = fourier_coefficients(&mut sampler, n, DELTA);
            let mag = (a * a + b * b).sqrt();
            assert!(mag < 5e-3, "harmonic {} should vanish, got magnitude {}", n, mag);
        }
    }

    #[test]
    fn sample_count_is_exact() {
        let mut sampler = PathSampler::new(UnitCircle);
        fourier_coefficients(&mut sampler, 1, 0.001);
        // ⌊1/Δ⌋ + 1 distinct t values
        assert_eq!(sampler.cached_samples(), 1001);

        // A second harmonic reuses every sample
        fourier_coefficients(&mut sampler, 7, 0.001);
        assert_eq!(sampler.cached_samples(), 1001);
    }

    #[test]
    fn coefficients_are_deterministic() {
        let mut s1 = PathSampler::new(UnitCircle);
        let mut s2 = PathSampler::new(UnitCircle);

        for n in [1, -1, 5, -5] {
            let (a1, b1) = fourier_coefficients(&mut s1, n, DELTA);
            let (a2, b2) = fourier_coefficients(&mut s2, n, DELTA);
            assert_eq!(a1.to_bits(), a2.to_bits());
            assert_eq!(b1.to_bits(), b2.to_bits());
        }
    }

    #[test]
    fn fractional_step_still_terminates() {
        // Δ that doesn't divide 1 evenly: ⌊1/0.3⌋ + 1 = 4 samples.
        let mut sampler = PathSampler::new(UnitCircle);
        fourier_coefficients(&mut sampler, 1, 0.3);
        assert_eq!(sampler.cached_samples(), 4);
    }
}
