//! Continuous collision detection for pairs of 2D shapes.
//!
//! Every query resolves a single pair: a static shape and a moving one, displaced over
//! one step. Answers are reported as a [`Hit`](narrow::Hit) carrying the fraction of
//! the step at which the shapes first touch, where, and the contact normal.
//!
//! Enable the `f64` feature for double precision.

pub mod error;
pub mod narrow;

pub use error::{Result, ShapeError};
pub use narrow::{
    swept::{aabb_aabb_sweep, aabb_circle_sweep, circle_aabb_sweep, circle_circle_sweep, Body},
    Aabb, Circle, Hit, Intersect, Shape,
};

#[cfg(not(feature = "f64"))]
pub type Fp = f32;
#[cfg(not(feature = "f64"))]
pub type Vec2 = glam::Vec2;

#[cfg(feature = "f64")]
pub type Fp = f64;
#[cfg(feature = "f64")]
pub type Vec2 = glam::DVec2;
