//! Ray-shape intersection algorithms.
//!
//! Each shape type has a dedicated intersector returning the nearest ray
//! parameter inside a caller-supplied `[t_min, t_max)` window. The window
//! is how the BVH traversal prunes: as closer hits are found, `t_max`
//! shrinks and later primitives are rejected early.

mod sphere;
mod triangle;

pub use sphere::{intersect_sphere, sphere_normal};
pub use triangle::{intersect_triangle, triangle_normal};

use lucent_math::Dir3;
use lucent_scene::{Primitive, Scene, Shape};

use crate::Ray;

/// Nearest intersection of `ray` with one primitive, capped at `t_max`.
///
/// Returns the ray parameter and the surface normal at the hit point.
/// Hits closer than [`Ray::T_EPSILON`] are rejected to avoid
/// self-intersection at the ray's own origin.
pub fn intersect_primitive(
    scene: &Scene,
    ray: &Ray,
    prim: &Primitive,
    t_max: f64,
) -> Option<(f64, Dir3)> {
    match prim.shape {
        Shape::Sphere { sphere } => {
            let s = &scene.spheres()[sphere];
            let t = intersect_sphere(ray, s, Ray::T_EPSILON, t_max)?;
            Some((t, sphere_normal(s, &ray.at(t))))
        }
        Shape::Triangle { mesh, triangle } => {
            let corners = scene.meshes()[mesh].triangle_positions(triangle);
            let t = intersect_triangle(ray, &corners, Ray::T_EPSILON, t_max)?;
            Some((t, triangle_normal(ray, &corners)))
        }
    }
}
