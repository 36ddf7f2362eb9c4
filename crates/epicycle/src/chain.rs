//! The epicycle chain - an ordered sequence of rotating vectors whose tip
//! traces the Fourier approximation of the source curve.
//!
//! ## Rust Lesson #4: Setup vs Per-Tick State
//!
//! The original JS kept everything as mutable fields on one drawing class
//! (`speeds`, `lens`, `rotates`, `arr`) touched from several methods. Here
//! the split is type-level: [`ChainConfig`] is immutable once the chain is
//! built, harmonic amplitude/speed are fixed at construction, and only the
//! phases and derived endpoints mutate - exactly once per [`advance`] call.
//! A built chain IS ready; there is no observable half-initialized state.
//!
//! [`advance`]: EpicycleChain::advance

use crate::coeffs::fourier_coefficients;
use crate::geometry::Point;
use crate::sampler::PathSampler;
use crate::svg::CurveSource;

/// Rotation damping: each tick a harmonic's phase advances by its angular
/// speed divided by this constant. Controls perceived rotation rate only,
/// independent of the harmonic's mathematical frequency.
const PHASE_DAMPING: f64 = 3.0;

/// Error type for chain construction.
#[derive(Debug)]
pub enum ChainError {
    InvalidConfig(String),
}

impl std::fmt::Display for ChainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChainError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ChainError {}

/// Configuration for building an epicycle chain.
#[derive(Debug, Clone, Copy)]
pub struct ChainConfig {
    /// Number of harmonic pairs N; the chain carries 2N rotating vectors
    /// (orders ±1..±N). 0 is the legal degenerate chain (origin only).
    pub harmonics: usize,
    /// Integration step Δ for the coefficient sums, in (0, 1]. Smaller is
    /// more accurate; setup work is O(N/Δ).
    pub delta: f64,
    /// Visual magnification applied to every vector length. Purely
    /// cosmetic; must be positive.
    pub amplitude_scale: f64,
    /// Fixed origin of the chain (the base of the first vector).
    pub origin: Point,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            harmonics: 200,
            delta: 0.001,
            amplitude_scale: 100.0,
            origin: Point::new(300.0, 300.0),
        }
    }
}

impl ChainConfig {
    /// Reject bad values before any integration work begins.
    fn validate(&self) -> Result<(), ChainError> {
        if !(self.delta > 0.0 && self.delta <= 1.0) {
            return Err(ChainError::InvalidConfig(format!(
                "integration step must be in (0, 1], got {}",
                self.delta
            )));
        }
        if !(self.amplitude_scale > 0.0) {
            return Err(ChainError::InvalidConfig(format!(
                "amplitude scale must be positive, got {}",
                self.amplitude_scale
            )));
        }
        Ok(())
    }
}

/// One rotating vector of the chain.
///
/// `amplitude` and `angular_speed` are fixed at construction; only `phase`
/// mutates, once per tick.
#[derive(Debug, Clone)]
pub struct Harmonic {
    /// Signed non-zero harmonic order.
    pub index: i32,
    /// Vector length before visual scaling: twice the magnitude of the
    /// complex Fourier coefficient.
    pub amplitude: f64,
    /// Degrees of rotation per undamped tick; equal to `index`, so the
    /// sign encodes rotation direction.
    pub angular_speed: f64,
    /// Current rotation angle in degrees, wrapped into (-inf, 360] on
    /// every update.
    pub phase: f64,
}

/// An ordered chain of harmonics plus the accumulated vector endpoints.
///
/// Invariants, maintained from construction to drop:
/// - `endpoints.len() == harmonics.len() + 1`
/// - `endpoints[0]` is the fixed origin and never changes
/// - harmonics are ordered 1, -1, 2, -2, ..., N, -N and never resized
#[derive(Debug, Clone)]
pub struct EpicycleChain {
    config: ChainConfig,
    harmonics: Vec<Harmonic>,
    endpoints: Vec<Point>,
}

impl EpicycleChain {
    /// Build the chain: integrate coefficients for harmonic orders
    /// 1, -1, 2, -2, ..., N, -N and fix each vector's amplitude, speed and
    /// starting phase.
    ///
    /// This is the one-time O(N/Δ) setup cost. Endpoint values are
    /// placeholders (the origin) until the first [`advance`] call.
    ///
    /// [`advance`]: EpicycleChain::advance
    pub fn build<C: CurveSource>(
        config: ChainConfig,
        sampler: &mut PathSampler<C>,
    ) -> Result<Self, ChainError> {
        config.validate()?;

        let mut harmonics = Vec::with_capacity(config.harmonics * 2);

        for i in 1..=config.harmonics as i32 {
            harmonics.push(Harmonic::from_curve(i, sampler, config.delta));
            harmonics.push(Harmonic::from_curve(-i, sampler, config.delta));
        }

        let endpoints = vec![config.origin; harmonics.len() + 1];

        Ok(Self {
            config,
            harmonics,
            endpoints,
        })
    }

    /// Advance the animation by one tick.
    ///
    /// Each harmonic's phase moves by `angular_speed / 3`, wraps if it
    /// passed 360°, and the cumulative endpoints are recomputed tip-to-base
    /// from the origin. Returns the full endpoint sequence; the last entry
    /// is the traced curve point for this tick. O(N), no error conditions.
    pub fn advance(&mut self) -> &[Point] {
        for k in 0..self.harmonics.len() {
            let h = &mut self.harmonics[k];
            h.phase += h.angular_speed / PHASE_DAMPING;
            // One-sided wrap is enough: speed/3 is only ever added, so the
            // phase can exceed 360 by at most one turn per tick but never
            // drops below the wrapped range from above.
            if h.phase > 360.0 {
                h.phase -= 360.0;
            }
            let length = self.config.amplitude_scale * h.amplitude;
            self.endpoints[k + 1] = self.endpoints[k].polar_offset(h.phase, length);
        }
        &self.endpoints
    }

    /// The chain origin (base of the first vector).
    pub fn origin(&self) -> Point {
        self.config.origin
    }

    /// Ordered vector endpoints; `endpoints()[0]` is the origin.
    pub fn endpoints(&self) -> &[Point] {
        &self.endpoints
    }

    /// The tip of the last vector - the traced curve point.
    pub fn traced_point(&self) -> Point {
        self.endpoints[self.endpoints.len() - 1]
    }

    /// The harmonics in chain order.
    pub fn harmonics(&self) -> &[Harmonic] {
        &self.harmonics
    }

    /// The configuration the chain was built with.
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }
}

impl Harmonic {
    /// Fix one harmonic's parameters from the integrated coefficients.
    fn from_curve<C: CurveSource>(index: i32, sampler: &mut PathSampler<C>, delta: f64) -> Self {
        let (a, b) = fourier_coefficients(sampler, index, delta);

        let amplitude = 2.0 * (a * a + b * b).sqrt();
        let phase = initial_phase(a, b);

        Self {
            index,
            amplitude,
            angular_speed: index as f64,
            phase,
        }
    }
}

/// Starting phase (degrees) from the coefficient pair.
///
/// atan(b/a) can't tell quadrants apart, so the result is reconciled with
/// the sign of a: theta - 90° when a >= 0, theta + 90° when a < 0. The
/// a == 0 boundary is pinned explicitly instead of relying on platform
/// atan(±inf) behavior: it takes the a >= 0 branch with theta at ±90° by
/// the sign of b.
fn initial_phase(a: f64, b: f64) -> f64 {
    let theta = if a == 0.0 {
        if b >= 0.0 { 90.0 } else { -90.0 }
    } else {
        (b / a).atan().to_degrees()
    };
    if a >= 0.0 { theta - 90.0 } else { theta + 90.0 }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    /// Unit circle in raw coordinates, pre-scaled and pre-flipped so the
    /// sampler's normalization maps it onto x = cos(2πt), y = sin(2πt).
    /// Its entire Fourier series is the single harmonic n = 1 with a = 1.
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

    /// Mirror image of [`UnitCircle`]: normalizes to x = -cos, y = -sin,
    /// so harmonic n = 1 has a = -1.
    struct MirroredCircle;

    impl CurveSource for MirroredCircle {
        fn point_at(&self, t: f64) -> Point {
            let angle = 2.0 * PI * t;
            Point::new(300.0 * angle.cos(), -300.0 * angle.sin())
        }

        fn total_length(&self) -> f64 {
            2.0 * PI * 300.0
        }
    }

    fn test_config(harmonics: usize) -> ChainConfig {
        ChainConfig {
            harmonics,
            delta: 0.001,
            amplitude_scale: 1.0,
            origin: Point::new(0.0, 0.0),
        }
    }

    #[test]
    fn chain_length_invariant() {
        let mut sampler = PathSampler::new(UnitCircle);
        let chain = EpicycleChain::build(test_config(3), &mut sampler).unwrap();

        assert_eq!(chain.harmonics().len(), 6);
        assert_eq!(chain.endpoints().len(), 7);

        // Fixed traversal order 1, -1, 2, -2, 3, -3
        let indices: Vec<i32> = chain.harmonics().iter().map(|h| h.index).collect();
        assert_eq!(indices, vec![1, -1, 2, -2, 3, -3]);
    }

    #[test]
    fn zero_harmonics_is_a_legal_degenerate_chain() {
        let mut sampler = PathSampler::new(UnitCircle);
        let mut chain = EpicycleChain::build(test_config(0), &mut sampler).unwrap();

        assert_eq!(chain.endpoints().len(), 1);

        // advance() is a no-op returning the origin, tick after tick
        for _ in 0..5 {
            let endpoints = chain.advance();
            assert_eq!(endpoints, &[Point::new(0.0, 0.0)]);
        }
        assert_eq!(chain.traced_point(), Point::new(0.0, 0.0));
    }

    #[test]
    fn rejects_invalid_configuration() {
        let mut sampler = PathSampler::new(UnitCircle);

        let mut config = test_config(1);
        config.delta = 0.0;
        assert!(EpicycleChain::build(config, &mut sampler).is_err());

        let mut config = test_config(1);
        config.delta = 1.5;
        assert!(EpicycleChain::build(config, &mut sampler).is_err());

        let mut config = test_config(1);
        config.amplitude_scale = 0.0;
        assert!(EpicycleChain::build(config, &mut sampler).is_err());
    }

    #[test]
    fn origin_never_moves() {
        let mut sampler = PathSampler::new(UnitCircle);
        let mut chain = EpicycleChain::build(test_config(2), &mut sampler).unwrap();

        for _ in 0..10 {
            chain.advance();
            assert_eq!(chain.endpoints()[0], Point::new(0.0, 0.0));
        }
    }

    #[test]
    fn quadrant_correction_positive_a() {
        // Harmonic n=1 of the unit circle has a ~= 1, b ~= 0:
        // theta = 0°, phase = -90°.
        let mut sampler = PathSampler::new(UnitCircle);
        let chain = EpicycleChain::build(test_config(1), &mut sampler).unwrap();

        let h = &chain.harmonics()[0];
        assert_eq!(h.index, 1);
        assert!((h.amplitude - 2.0).abs() < 1e-2, "amplitude ~2, got {}", h.amplitude);
        assert!((h.phase - (-90.0)).abs() < 0.5, "phase ~-90°, got {}", h.phase);
    }

    #[test]
    fn quadrant_correction_negative_a() {
        // Mirrored circle: a ~= -1, b ~= 0 at n=1: theta = 0°, phase = +90°.
        let mut sampler = PathSampler::new(MirroredCircle);
        let chain = EpicycleChain::build(test_config(1), &mut sampler).unwrap();

        let h = &chain.harmonics()[0];
        assert!((h.phase - 90.0).abs() < 0.5, "phase ~+90°, got {}", h.phase);
    }

    #[test]
    fn explicit_zero_a_boundary() {
        // a == 0 takes the a >= 0 branch with theta = ±90° by the sign of
        // b, so the result is exact, never a platform NaN/infinity artifact.
        assert_eq!(initial_phase(0.0, 1.0), 0.0);
        assert_eq!(initial_phase(0.0, -1.0), -180.0);
        // Fully degenerate coefficient: amplitude is 0, phase is inert but
        // still well-defined
        assert_eq!(initial_phase(0.0, 0.0), 0.0);
    }

    #[test]
    fn quadrant_correction_symmetry() {
        // Pure-real coefficients: theta = 0 in both cases, the sign of a
        // alone picks the branch.
        assert_eq!(initial_phase(1.0, 0.0), -90.0);
        assert_eq!(initial_phase(-1.0, 0.0), 90.0);
    }

    #[test]
    fn phase_wrap_boundary() {
        let mut sampler = PathSampler::new(UnitCircle);
        let mut chain = EpicycleChain::build(test_config(1), &mut sampler).unwrap();

        // Pin a single harmonic at phase 359° with speed 3 (damped +1°/tick).
        chain.harmonics.truncate(1);
        chain.endpoints.truncate(2);
        chain.harmonics[0].phase = 359.0;
        chain.harmonics[0].angular_speed = 3.0;

        // 359 + 1 = 360: the boundary is inclusive, no wrap
        chain.advance();
        assert_eq!(chain.harmonics()[0].phase, 360.0);

        // 360 + 1 = 361: wraps by exactly one multiple of 360
        chain.advance();
        assert_eq!(chain.harmonics()[0].phase, 1.0);
    }

    #[test]
    fn multi_turn_speed_wraps_once_per_tick() {
        let mut sampler = PathSampler::new(UnitCircle);
        let mut chain = EpicycleChain::build(test_config(1), &mut sampler).unwrap();

        chain.harmonics.truncate(1);
        chain.endpoints.truncate(2);
        chain.harmonics[0].phase = 0.0;
        // 1080/3 = 360° per tick: the one-sided wrap removes exactly one
        // multiple of 360 per call.
        chain.harmonics[0].angular_speed = 1080.0;

        chain.advance();
        assert_eq!(chain.harmonics()[0].phase, 360.0);
        chain.advance();
        assert_eq!(chain.harmonics()[0].phase, 360.0);
    }

    #[test]
    fn unit_circle_round_trip() {
        // With N=1 the traced point must follow the engine's reconstruction
        // of the circle: radius 2 (doubled coefficient magnitude), phase
        // -90° + k/3 per tick, measured from the vertical axis.
        let mut sampler = PathSampler::new(UnitCircle);
        let mut chain = EpicycleChain::build(test_config(1), &mut sampler).unwrap();

        for k in 1..=120u32 {
            chain.advance();
            let phase = -90.0 + k as f64 / 3.0;
            let expected = Point::new(0.0, 0.0).polar_offset(phase, 2.0);
            let err = chain.traced_point().distance(expected);
            assert!(
                err < 1e-2,
                "tick {}: traced point off by {} (integration error bound)",
                k,
                err
            );
        }
    }

    #[test]
    fn advance_is_deterministic_across_runs() {
        let build = || {
            let mut sampler = PathSampler::new(UnitCircle);
            EpicycleChain::build(test_config(4), &mut sampler).unwrap()
        };

        let mut c1 = build();
        let mut c2 = build();

        for _ in 0..25 {
            let e1 = c1.advance().to_vec();
            let e2 = c2.advance().to_vec();
            for (p1, p2) in e1.iter().zip(e2.iter()) {
                // Byte-identical, not just approximately equal
                assert_eq!(p1.x.to_bits(), p2.x.to_bits());
                assert_eq!(p1.y.to_bits(), p2.y.to_bits());
            }
        }
    }
}
