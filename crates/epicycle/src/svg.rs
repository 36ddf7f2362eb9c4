//! SVG parsing - extract a closed curve from an SVG file.
//!
//! Uses usvg for complete SVG resolution (CSS, transforms, etc.)
//! then walks the tree and takes the first path as the source curve.
//!
//! ## Curve Flattening
//!
//! SVG paths contain Bézier curves (cubic and quadratic). These must be
//! "flattened" into line segments before we can walk the curve by arc
//! length. We use lyon_geom for accurate curve approximation with a
//! configurable tolerance.
//!
//! The result is an [`SvgCurve`]: a closed polyline plus a cumulative
//! arc-length table, so `point_at(t)` resolves a fractional arc-length
//! parameter t in [0,1] the same way `SVGPathElement.getPointAtLength`
//! does in a browser.

use crate::geometry::Point;
use lyon_geom::{CubicBezierSegment, QuadraticBezierSegment, point};

/// Error type for curve extraction.
///
/// ## Rust Lesson #2: Error Handling
///
/// Rust uses `Result<T, E>` instead of exceptions:
/// - `Ok(value)` = success
/// - `Err(error)` = failure
///
/// A degenerate curve is fatal here: the engine must refuse to start
/// rather than silently integrate against a default point.
#[derive(Debug)]
pub enum CurveError {
    ParseError(String),
    NoPath,
}

impl std::fmt::Display for CurveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CurveError::ParseError(msg) => write!(f, "SVG parse error: {}", msg),
            CurveError::NoPath => write!(f, "No usable closed path found in SVG"),
        }
    }
}

impl std::error::Error for CurveError {}

/// A source of points on a fixed closed curve.
///
/// `point_at` resolves a fractional arc-length parameter t in [0,1] to a
/// point in the source's raw coordinate space. Implementations must be
/// deterministic: same t = same point, for the lifetime of the source.
/// That property is what makes the sampler's memoization valid.
pub trait CurveSource {
    /// Point at fractional arc length t (clamped to [0,1]; t=1 wraps to
    /// the start of the closed curve).
    fn point_at(&self, t: f64) -> Point;

    /// Total arc length of the curve, in raw coordinate units.
    fn total_length(&self) -> f64;
}

/// Tolerance for curve flattening.
/// Lower = more points, smoother curves, slower.
/// 0.1 is sub-pixel accuracy at typical SVG scales.
const CURVE_TOLERANCE: f32 = 0.1;

/// A closed polyline curve extracted from an SVG, walkable by arc length.
#[derive(Debug, Clone)]
pub struct SvgCurve {
    /// Polyline vertices (the closing segment back to `points[0]` is
    /// implicit - the last stored vertex is never a duplicate of the first).
    points: Vec<Point>,
    /// Cumulative arc length at each vertex; `lengths[k]` is the distance
    /// along the curve from `points[0]` to `points[k]`. One extra entry at
    /// the end holds the full loop length including the closing segment.
    lengths: Vec<f64>,
}

impl SvgCurve {
    /// Extract the source curve from SVG content.
    ///
    /// Takes the first path in document order that flattens to at least
    /// three distinct points. Fails with [`CurveError::NoPath`] if the SVG
    /// contains no such path (empty or degenerate curve).
    pub fn from_svg(svg_content: &str) -> Result<SvgCurve, CurveError> {
        // Parse SVG using usvg (resolves CSS, transforms, etc.)
        let options = usvg::Options::default();
        let tree = usvg::Tree::from_str(svg_content, &options)
            .map_err(|e| CurveError::ParseError(e.to_string()))?;

        // Walk the tree and take the first usable path
        // (root is a Group in usvg 0.45)
        let points = first_path_in_group(tree.root()).ok_or(CurveError::NoPath)?;

        Self::from_points(points)
    }

    /// Build a curve directly from polyline vertices.
    ///
    /// Rejects degenerate input: fewer than three distinct points, or a
    /// polyline with zero total length.
    pub fn from_points(mut points: Vec<Point>) -> Result<SvgCurve, CurveError> {
        // Drop an explicit closing vertex; the closing segment is implicit.
        if points.len() >= 2 {
            let first = points[0];
            if let Some(last) = points.last() {
                if last.distance(first) < 1e-9 {
                    points.pop();
                }
            }
        }

        if points.len() < 3 {
            return Err(CurveError::NoPath);
        }

        // Cumulative arc length table, closing segment included.
        let mut lengths = Vec::with_capacity(points.len() + 1);
        lengths.push(0.0);
        let mut total = 0.0;
        for window in points.windows(2) {
            total += window[0].distance(window[1]);
            lengths.push(total);
        }
        total += points[points.len() - 1].distance(points[0]);
        lengths.push(total);

        if total <= 0.0 {
            return Err(CurveError::NoPath);
        }

        Ok(SvgCurve { points, lengths })
    }
}

impl CurveSource for SvgCurve {
    fn point_at(&self, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        let total = self.total_length();
        let target = t * total;

        // Binary search the cumulative table for the containing segment.
        // partition_point returns the first index with length > target,
        // so the segment start is one before it.
        let seg = self
            .lengths
            .partition_point(|&len| len <= target)
            .saturating_sub(1)
            .min(self.points.len() - 1);

        let seg_start = self.lengths[seg];
        let seg_len = self.lengths[seg + 1] - seg_start;

        let a = self.points[seg];
        // The segment after the last vertex closes the loop.
        let b = self.points[(seg + 1) % self.points.len()];

        if seg_len <= 0.0 {
            return a;
        }
        a.lerp(b, (target - seg_start) / seg_len)
    }

    fn total_length(&self) -> f64 {
        self.lengths[self.lengths.len() - 1]
    }
}

/// Recursively find the first usable path in a usvg Group.
fn first_path_in_group(group: &usvg::Group) -> Option<Vec<Point>> {
    for child in group.children() {
        match child {
            usvg::Node::Group(group) => {
                if let Some(points) = first_path_in_group(group) {
                    return Some(points);
                }
            }
            usvg::Node::Path(path) => {
                if let Some(points) = flatten_path(path) {
                    return Some(points);
                }
            }
            // Ignore text, images, etc.
            _ => {}
        }
    }
    None
}

/// Flatten a usvg path into polyline vertices.
///
/// Bézier segments are flattened with lyon_geom. Only the first subpath is
/// used - the source curve is a single closed loop.
fn flatten_path(path: &usvg::Path) -> Option<Vec<Point>> {
    let data = path.data();

    let mut points: Vec<Point> = Vec::new();
    let mut last_point: Option<(f32, f32)> = None;

    for cmd in data.segments() {
        match cmd {
            usvg::tiny_skia_path::PathSegment::MoveTo(p) => {
                // Start of new subpath - the first one is our curve.
                if !points.is_empty() {
                    break;
                }
                points.push(Point::new(p.x as f64, p.y as f64));
                last_point = Some((p.x, p.y));
            }
            usvg::tiny_skia_path::PathSegment::LineTo(p) => {
                points.push(Point::new(p.x as f64, p.y as f64));
                last_point = Some((p.x, p.y));
            }
            usvg::tiny_skia_path::PathSegment::QuadTo(ctrl, p) => {
                if let Some((lx, ly)) = last_point {
                    let curve = QuadraticBezierSegment {
                        from: point(lx, ly),
                        ctrl: point(ctrl.x, ctrl.y),
                        to: point(p.x, p.y),
                    };
                    curve.for_each_flattened(CURVE_TOLERANCE, &mut |segment| {
                        points.push(Point::new(segment.to.x as f64, segment.to.y as f64));
                    });
                } else {
                    points.push(Point::new(p.x as f64, p.y as f64));
                }
                last_point = Some((p.x, p.y));
            }
            usvg::tiny_skia_path::PathSegment::CubicTo(ctrl1, ctrl2, p) => {
                if let Some((lx, ly)) = last_point {
                    let curve = CubicBezierSegment {
                        from: point(lx, ly),
                        ctrl1: point(ctrl1.x, ctrl1.y),
                        ctrl2: point(ctrl2.x, ctrl2.y),
                        to: point(p.x, p.y),
                    };
                    curve.for_each_flattened(CURVE_TOLERANCE, &mut |segment| {
                        points.push(Point::new(segment.to.x as f64, segment.to.y as f64));
                    });
                } else {
                    points.push(Point::new(p.x as f64, p.y as f64));
                }
                last_point = Some((p.x, p.y));
            }
            usvg::tiny_skia_path::PathSegment::Close => {
                // Closing segment is implicit in SvgCurve.
            }
        }
    }

    // Remove duplicate consecutive points that can occur from curve flattening
    if points.len() >= 2 {
        points.dedup_by(|a, b| {
            let dx = (a.x - b.x).abs();
            let dy = (a.y - b.y).abs();
            dx < 1e-6 && dy < 1e-6
        });
    }

    if points.len() >= 3 { Some(points) } else { None }
}

// ============================================================================
// TESTS
// ============================================================================
