//! # epicycle
//!
//! Approximate a closed SVG path with a truncated Fourier series and
//! animate it as a chain of rotating vectors whose tip redraws the curve.
//!
//! The crate is the numerical engine only. Data flows one way:
//!
//! ```text
//! SvgCurve -> PathSampler -> fourier_coefficients -> EpicycleChain -> renderer
//! ```
//!
//! Rendering and the animation clock are external collaborators (see the
//! `epicycle` binary): they pull endpoint geometry from the chain each
//! frame and never feed anything back except by calling
//! [`EpicycleChain::advance`].
//!
//! ## Rust Lesson #5: Modules
//!
//! Rust modules are like ES6 modules but more explicit:
//! - `mod foo;` = load from `foo.rs` or `foo/mod.rs`
//! - `pub mod foo;` = also export it publicly
//! - `pub use foo::Bar;` = re-export Bar at this level
//!
//! Unlike the original single-file p5.js sketch, every module is declared.

pub mod chain;
pub mod coeffs;
pub mod geometry;
pub mod sampler;
pub mod svg;

// Re-export common types at crate root for convenience.
pub use chain::{ChainConfig, ChainError, EpicycleChain, Harmonic};
pub use coeffs::fourier_coefficients;
pub use geometry::Point;
pub use sampler::PathSampler;
pub use svg::{CurveError, CurveSource, SvgCurve};
