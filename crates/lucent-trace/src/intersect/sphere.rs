//! Ray-sphere intersection (quadratic equation).

use lucent_math::{Dir3, Point3};
use lucent_scene::Sphere;

use crate::Ray;

/// Intersect a ray with a sphere.
///
/// Solves `|origin + t*dir - center|^2 = r^2` and returns the smallest
/// root inside `[t_min, t_max)`, or `None` if the ray misses or both
/// roots fall outside the window.
pub fn intersect_sphere(ray: &Ray, sphere: &Sphere, t_min: f64, t_max: f64) -> Option<f64> {
    let oc = ray.origin - sphere.center;
    let d = ray.direction.as_ref();

    let a = d.dot(d); // Always 1 for unit direction, but explicit for clarity
    let b = 2.0 * oc.dot(d);
    let c = oc.dot(&oc) - sphere.radius * sphere.radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_disc = discriminant.sqrt();
    let t1 = (-b - sqrt_disc) / (2.0 * a);
    let t2 = (-b + sqrt_disc) / (2.0 * a);

    // t1 <= t2, so the first root inside the window is the nearest one
    for t in [t1, t2] {
        if t >= t_min && t < t_max {
            return Some(t);
        }
    }

    None
}

/// Outward surface normal at a point on the sphere.
pub fn sphere_normal(sphere: &Sphere, point: &Point3) -> Dir3 {
    Dir3::new_normalize(point - sphere.center)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lucent_math::Vec3;

    fn unit_sphere_at_origin() -> Sphere {
        Sphere {
            center: Point3::origin(),
            radius: 5.0,
        }
    }

    #[test]
    fn test_ray_sphere_through_center() {
        let sphere = unit_sphere_at_origin();
        // Ray from (-10, 0, 0) pointing +x, entering the sphere at x = -5
        let ray = Ray::new(Point3::new(-10.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let t = intersect_sphere(&ray, &sphere, 0.0, f64::INFINITY);
        assert!((t.unwrap() - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_ray_sphere_miss() {
        let sphere = unit_sphere_at_origin();
        let ray = Ray::new(Point3::new(-10.0, 10.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(intersect_sphere(&ray, &sphere, 0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_ray_sphere_from_inside() {
        let sphere = unit_sphere_at_origin();
        // Entry root is behind the origin; only the exit point qualifies
        let ray = Ray::new(Point3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let t = intersect_sphere(&ray, &sphere, 0.0, f64::INFINITY);
        assert!((t.unwrap() - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_ray_sphere_capped_by_t_max() {
        let sphere = unit_sphere_at_origin();
        let ray = Ray::new(Point3::new(-10.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        // Both roots (t=5, t=15) lie beyond the cap
        assert!(intersect_sphere(&ray, &sphere, 0.0, 4.0).is_none());
        // Cap between the roots: the far root is not a substitute
        assert!(intersect_sphere(&ray, &sphere, 6.0, 10.0).is_none());
    }

    #[test]
    fn test_ray_sphere_epsilon_rejects_origin_hit() {
        let sphere = unit_sphere_at_origin();
        // Ray starting exactly on the surface, leaving the sphere
        let ray = Ray::new(Point3::new(5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let t = intersect_sphere(&ray, &sphere, Ray::T_EPSILON, f64::INFINITY);
        assert!(t.is_none());
    }

    #[test]
    fn test_sphere_normal() {
        let sphere = unit_sphere_at_origin();
        let n = sphere_normal(&sphere, &Point3::new(5.0, 0.0, 0.0));
        assert!((n.x - 1.0).abs() < 1e-12);
        assert!(n.y.abs() < 1e-12);
        assert!(n.z.abs() < 1e-12);
    }

    #[test]
    fn test_sphere_normal_offset_center() {
        let sphere = Sphere {
            center: Point3::new(2.0, 0.0, 0.0),
            radius: 1.0,
        };
        let n = sphere_normal(&sphere, &Point3::new(1.0, 0.0, 0.0));
        assert!((n.x + 1.0).abs() < 1e-12);
    }
}
