//! Axis-aligned bounding boxes and per-primitive bounds computation.
//!
//! The BVH builder partitions primitives by the centroids of these boxes,
//! and the traversal engine culls subtrees with a ray-box slab test.

use lucent_math::{Point3, Vec3};

use crate::{Primitive, Scene, Shape};

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb3 {
    /// Create an AABB from min and max corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create an empty (inverted) AABB suitable for expansion.
    ///
    /// The empty box is the identity of [`Aabb3::union`]: union with any
    /// box yields the other operand unchanged.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Expand this AABB to include a point.
    pub fn include_point(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// The componentwise union of two boxes.
    pub fn union(&self, other: &Aabb3) -> Aabb3 {
        Aabb3 {
            min: Point3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Point3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// Center of the box, used as the partition key during BVH construction.
    pub fn centroid(&self) -> Point3 {
        Point3::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            (self.min.z + self.max.z) / 2.0,
        )
    }

    /// Diagonal vector from min to max corner.
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Total surface area of the box faces.
    pub fn surface_area(&self) -> f64 {
        let d = self.extent();
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }

    /// One of the 8 corners, selected by bit pattern:
    /// bit 0 picks x (0 = min, 1 = max), bit 1 picks y, bit 2 picks z.
    pub fn corner(&self, i: usize) -> Point3 {
        debug_assert!(i < 8);
        Point3::new(
            if i & 1 == 0 { self.min.x } else { self.max.x },
            if i & 2 == 0 { self.min.y } else { self.max.y },
            if i & 4 == 0 { self.min.z } else { self.max.z },
        )
    }

    /// Index (0 = x, 1 = y, 2 = z) of the axis with the largest extent.
    pub fn max_extent_axis(&self) -> usize {
        let d = self.extent();
        if d.x >= d.y && d.x >= d.z {
            0
        } else if d.y >= d.z {
            1
        } else {
            2
        }
    }

    /// Whether every coordinate of the box is finite.
    ///
    /// An empty box is not finite. A box with a NaN coordinate would poison
    /// every union it participates in, so the builder filters on this.
    pub fn is_finite(&self) -> bool {
        self.min.coords.iter().all(|c| c.is_finite()) && self.max.coords.iter().all(|c| c.is_finite())
    }

    /// Whether `other` lies entirely inside this box (touching counts).
    pub fn contains(&self, other: &Aabb3) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && self.min.z <= other.min.z
            && self.max.x >= other.max.x
            && self.max.y >= other.max.y
            && self.max.z >= other.max.z
    }
}

/// Compute the AABB for a single primitive.
///
/// Sphere boxes are exact. Triangle boxes are the bounds of the three
/// corner positions, resolved through the owning mesh.
pub fn primitive_aabb(scene: &Scene, prim: &Primitive) -> Aabb3 {
    match prim.shape {
        Shape::Sphere { sphere } => {
            let s = &scene.spheres()[sphere];
            let r = Vec3::new(s.radius, s.radius, s.radius);
            Aabb3::new(s.center - r, s.center + r)
        }
        Shape::Triangle { mesh, triangle } => {
            let [a, b, c] = scene.meshes()[mesh].triangle_positions(triangle);
            let mut aabb = Aabb3::empty();
            aabb.include_point(&a);
            aabb.include_point(&b);
            aabb.include_point(&c);
            aabb
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TriangleMesh;

    #[test]
    fn test_union_idempotent() {
        let a = Aabb3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 3.0, 4.0));
        assert_eq!(a.union(&a), a);
    }

    #[test]
    fn test_union_empty_identity() {
        let a = Aabb3::new(Point3::new(-1.0, 0.0, 1.0), Point3::new(2.0, 3.0, 4.0));
        let e = Aabb3::empty();
        assert_eq!(a.union(&e), a);
        assert_eq!(e.union(&a), a);
    }

    #[test]
    fn test_union_commutative() {
        let a = Aabb3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let b = Aabb3::new(Point3::new(-2.0, 0.5, 0.5), Point3::new(0.5, 4.0, 0.75));
        assert_eq!(a.union(&b), b.union(&a));
        assert_eq!(a.union(&b).min, Point3::new(-2.0, 0.0, 0.0));
        assert_eq!(a.union(&b).max, Point3::new(1.0, 4.0, 1.0));
    }

    #[test]
    fn test_corner_bit_pattern() {
        let a = Aabb3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 2.0, 3.0));
        assert_eq!(a.corner(0), Point3::new(0.0, 0.0, 0.0));
        assert_eq!(a.corner(1), Point3::new(1.0, 0.0, 0.0));
        assert_eq!(a.corner(2), Point3::new(0.0, 2.0, 0.0));
        assert_eq!(a.corner(7), Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_max_extent_axis() {
        let a = Aabb3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 5.0, 3.0));
        assert_eq!(a.max_extent_axis(), 1);
        let b = Aabb3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 9.0));
        assert_eq!(b.max_extent_axis(), 2);
    }

    #[test]
    fn test_surface_area_unit_cube() {
        let a = Aabb3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        assert!((a.surface_area() - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_is_finite() {
        let a = Aabb3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        assert!(a.is_finite());
        assert!(!Aabb3::empty().is_finite());
        let nan = Aabb3::new(Point3::new(f64::NAN, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        assert!(!nan.is_finite());
    }

    #[test]
    fn test_sphere_aabb() {
        let mut scene = Scene::new();
        let id = scene
            .add_sphere(Point3::new(1.0, 2.0, 3.0), 0.5, 0)
            .unwrap();
        let aabb = primitive_aabb(&scene, &scene.primitives()[id]);
        assert_eq!(aabb.min, Point3::new(0.5, 1.5, 2.5));
        assert_eq!(aabb.max, Point3::new(1.5, 2.5, 3.5));
    }

    #[test]
    fn test_triangle_aabb() {
        let mut scene = Scene::new();
        let mesh = TriangleMesh::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, -1.0),
                Point3::new(1.0, 3.0, 0.5),
            ],
            vec![[0, 1, 2]],
        )
        .unwrap();
        scene.add_mesh(mesh, 0);
        let aabb = primitive_aabb(&scene, &scene.primitives()[0]);
        assert_eq!(aabb.min, Point3::new(0.0, 0.0, -1.0));
        assert_eq!(aabb.max, Point3::new(2.0, 3.0, 0.5));
    }
}
