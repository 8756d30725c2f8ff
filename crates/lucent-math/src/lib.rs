#![warn(missing_docs)]

//! Math types for the lucent ray tracing kernel.
//!
//! Thin wrappers around nalgebra providing domain-specific types for
//! 3D rendering geometry: points, vectors, and unit directions.
//! All scalar math is `f64`.

use nalgebra::{Unit, Vector3};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// Index of the X axis when addressing components by number.
pub const AXIS_X: usize = 0;

/// Index of the Y axis when addressing components by number.
pub const AXIS_Y: usize = 1;

/// Index of the Z axis when addressing components by number.
pub const AXIS_Z: usize = 2;
