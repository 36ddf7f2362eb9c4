//! Memoized curve sampling in a normalized coordinate frame.
//!
//! The coefficient engine integrates the same curve once per harmonic, so
//! for N harmonics every t value is requested 2N times. The sampler caches
//! each resolved point so the curve source is only walked once per distinct
//! t - this cache is the whole reason the sampler exists as its own layer.
//!
//! ## Rust Lesson #3: Cache Keys & Float Bits
//!
//! The original JS used an object as a dictionary keyed by the float t
//! itself (`this.dict[t]`). A Rust `HashMap<f64, _>` doesn't exist because
//! f64 isn't `Eq` (NaN != NaN). We key by `t.to_bits()` instead: the exact
//! bit pattern of the value. That works because every t the engine asks
//! for is generated as `i * delta` from an integer counter, so identical
//! parameters are identical bit patterns - no drift, no duplicate keys.

use crate::geometry::Point;
use crate::svg::CurveSource;
use std::collections::HashMap;

/// Fixed reference scale dividing raw curve coordinates into the engine's
/// unit-ish frame. Matches a 600x600 canvas with the chain origin at its
/// center.
const NORMALIZE_SCALE: f64 = 300.0;

/// Samples a curve source into normalized coordinates, memoizing by exact
/// parameter value.
///
/// Normalization is a fixed transform: divide both axes by
/// [`NORMALIZE_SCALE`] and negate x to correct the source's winding
/// direction. The cache is append-only and never invalidated - the source
/// curve is static for the lifetime of the sampler.
#[derive(Debug, Clone)]
pub struct PathSampler<C: CurveSource> {
    source: C,
    cache: HashMap<u64, Point>,
}

impl<C: CurveSource> PathSampler<C> {
    pub fn new(source: C) -> Self {
        Self {
            source,
            cache: HashMap::new(),
        }
    }

    /// Normalized point on the curve at fractional arc length t.
    ///
    /// Deterministic and idempotent: calling twice with the same exact t
    /// returns the same point, and only the first call touches the source.
    pub fn sample(&mut self, t: f64) -> Point {
        let key = t.to_bits();
        if let Some(&p) = self.cache.get(&key) {
            return p;
        }
        let raw = self.source.point_at(t);
        let p = Point::new(-raw.x / NORMALIZE_SCALE, raw.y / NORMALIZE_SCALE);
        self.cache.insert(key, p);
        p
    }

    /// Number of distinct parameter values sampled so far.
    pub fn cached_samples(&self) -> usize {
        self.cache.len()
    }

    /// The underlying curve source.
    pub fn source(&self) -> &C {
        &self.source
    }
}

// ============================================================================
// TESTS
// ============================================================================
