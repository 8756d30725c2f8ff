//! Ray representation and the ray-box slab test.

use lucent_math::{Dir3, Point3, Vec3};
use lucent_scene::Aabb3;

/// A ray in 3D space defined by origin and direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Point3,
    /// Unit direction of the ray.
    pub direction: Dir3,
    /// Precomputed reciprocal of direction components for fast AABB tests.
    inv_direction: Vec3,
    /// Sign of direction components (0 if positive, 1 if negative).
    sign: [usize; 3],
}

impl Ray {
    /// Hits closer than this along the ray are ignored, so a ray spawned
    /// on a surface does not immediately re-hit that surface.
    pub const T_EPSILON: f64 = 1e-3;

    /// Create a new ray from origin and direction.
    ///
    /// The direction will be normalized.
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        let dir = Dir3::new_normalize(direction);
        let inv = Vec3::new(1.0 / dir.x, 1.0 / dir.y, 1.0 / dir.z);
        let sign = [
            if inv.x < 0.0 { 1 } else { 0 },
            if inv.y < 0.0 { 1 } else { 0 },
            if inv.z < 0.0 { 1 } else { 0 },
        ];
        Self {
            origin,
            direction: dir,
            inv_direction: inv,
            sign,
        }
    }

    /// Evaluate the ray at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + t * self.direction.as_ref()
    }

    /// Whether the direction component along `axis` is negative.
    ///
    /// Drives near/far child ordering during BVH traversal.
    #[inline]
    pub fn dir_is_negative(&self, axis: usize) -> bool {
        self.sign[axis] == 1
    }

    /// Test ray-AABB intersection using the slab method.
    ///
    /// Returns `Some((t_min, t_max))` if the ray intersects the box,
    /// where `t_min` and `t_max` are the entry and exit parameters.
    /// Returns `None` if no intersection.
    ///
    /// Handles infinite values correctly for axis-aligned rays.
    #[inline]
    pub fn intersect_aabb(&self, aabb: &Aabb3) -> Option<(f64, f64)> {
        let bounds = [aabb.min, aabb.max];

        let tx1 = (bounds[self.sign[0]].x - self.origin.x) * self.inv_direction.x;
        let tx2 = (bounds[1 - self.sign[0]].x - self.origin.x) * self.inv_direction.x;

        let mut t_min = tx1;
        let mut t_max = tx2;

        let ty1 = (bounds[self.sign[1]].y - self.origin.y) * self.inv_direction.y;
        let ty2 = (bounds[1 - self.sign[1]].y - self.origin.y) * self.inv_direction.y;

        t_min = t_min.max(ty1);
        t_max = t_max.min(ty2);

        let tz1 = (bounds[self.sign[2]].z - self.origin.z) * self.inv_direction.z;
        let tz2 = (bounds[1 - self.sign[2]].z - self.origin.z) * self.inv_direction.z;

        t_min = t_min.max(tz1);
        t_max = t_max.min(tz2);

        if t_max >= t_min && t_max >= 0.0 {
            Some((t_min.max(0.0), t_max))
        } else {
            None
        }
    }
}

/// Result of a successful ray-primitive intersection.
#[derive(Debug, Clone, Copy)]
pub struct Interaction {
    /// Parameter along the ray where the intersection occurs.
    pub t: f64,
    /// 3D intersection point.
    pub point: Point3,
    /// Surface normal at the intersection, facing the ray origin.
    pub normal: Dir3,
    /// Id of the primitive that was hit (index into the scene's primitives).
    pub primitive: usize,
    /// Material index of the hit primitive, for shading lookup.
    pub material: usize,
}
