//! Ray-triangle intersection (Möller-Trumbore).

use lucent_math::{Dir3, Point3};

use crate::Ray;

/// Determinants smaller than this mean the ray runs parallel to the
/// triangle plane.
const DET_EPSILON: f64 = 1e-12;

/// Intersect a ray with a triangle given by its three corner positions.
///
/// Barycentric Möller-Trumbore test. Both triangle faces are hit surfaces;
/// returns the ray parameter inside `[t_min, t_max)`, or `None`.
pub fn intersect_triangle(
    ray: &Ray,
    corners: &[Point3; 3],
    t_min: f64,
    t_max: f64,
) -> Option<f64> {
    let [a, b, c] = corners;
    let edge1 = b - a;
    let edge2 = c - a;
    let d = ray.direction.as_ref();

    let pvec = d.cross(&edge2);
    let det = edge1.dot(&pvec);
    if det.abs() < DET_EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;

    let tvec = ray.origin - a;
    let u = tvec.dot(&pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(&edge1);
    let v = d.dot(&qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(&qvec) * inv_det;
    if t >= t_min && t < t_max {
        Some(t)
    } else {
        None
    }
}

/// Geometric normal of the triangle, flipped to face the ray origin.
pub fn triangle_normal(ray: &Ray, corners: &[Point3; 3]) -> Dir3 {
    let [a, b, c] = corners;
    let n = (b - a).cross(&(c - a));
    if n.dot(ray.direction.as_ref()) > 0.0 {
        Dir3::new_normalize(-n)
    } else {
        Dir3::new_normalize(n)
    }
}
