#![warn(missing_docs)]

//! BVH-accelerated ray intersection for the lucent kernel.
//!
//! This crate answers one question: given a ray and a static scene of
//! spheres and triangles, what is the nearest intersection, if any? A
//! bounding volume hierarchy built once over the scene makes each query
//! sublinear in primitive count.
//!
//! # Architecture
//!
//! - [`Ray`] - Ray representation with precomputed slab-test data
//! - [`Interaction`] - Intersection result for the shading side
//! - [`intersect`] - Ray-shape intersection algorithms per shape type
//! - [`bvh`] - BVH construction, flattening, and traversal
//!
//! # Example
//!
//! ```ignore
//! use lucent_scene::Scene;
//! use lucent_trace::{Bvh, Ray};
//!
//! let mut scene = Scene::new();
//! scene.add_sphere(Point3::new(0.0, 0.0, 0.0), 1.5, 0)?;
//! let bvh = Bvh::build(&scene);
//!
//! let ray = Ray::new(
//!     Point3::new(0.0, 0.0, 100.0),
//!     Vec3::new(0.0, 0.0, -1.0),
//! );
//!
//! let hit = bvh.intersect(&ray);
//! ```

mod ray;

pub mod bvh;
pub mod intersect;

pub use bvh::Bvh;
pub use ray::{Interaction, Ray};
