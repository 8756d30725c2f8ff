#![warn(missing_docs)]

//! Scene model for the lucent ray tracing kernel.
//!
//! A [`Scene`] is a flat, index-addressed collection of shapes: spheres and
//! indexed triangle meshes. Each renderable [`Primitive`] pairs a [`Shape`]
//! reference with a material index. Vertex positions are owned once by
//! their [`TriangleMesh`]; triangles (and everything downstream, including
//! the BVH) refer to them by index, never by ownership.
//!
//! Scenes are assembled up front and treated as immutable by the tracing
//! side, which snapshots them behind an `Arc` for the lifetime of a BVH.

mod error;

pub mod bbox;

pub use bbox::{primitive_aabb, Aabb3};
pub use error::SceneError;

use lucent_math::Point3;

/// A sphere defined by center and radius.
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    /// Center of the sphere.
    pub center: Point3,
    /// Radius of the sphere. Always positive.
    pub radius: f64,
}

/// An indexed triangle mesh.
///
/// Positions are stored once; each triangle is three indices into the
/// position buffer. Indices are validated on construction, so lookups
/// through [`TriangleMesh::triangle_positions`] cannot go out of range.
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    positions: Vec<Point3>,
    triangles: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Create a mesh from a position buffer and triangle index list.
    ///
    /// Every index of every triangle must address the position buffer.
    pub fn new(positions: Vec<Point3>, triangles: Vec<[u32; 3]>) -> Result<Self, SceneError> {
        for (tri, indices) in triangles.iter().enumerate() {
            for &index in indices {
                if index as usize >= positions.len() {
                    return Err(SceneError::VertexIndexOutOfRange {
                        triangle: tri,
                        index,
                        vertex_count: positions.len(),
                    });
                }
            }
        }
        Ok(Self { positions, triangles })
    }

    /// The vertex position buffer.
    pub fn positions(&self) -> &[Point3] {
        &self.positions
    }

    /// The triangle index list.
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Resolve the three corner positions of triangle `tri`.
    pub fn triangle_positions(&self, tri: usize) -> [Point3; 3] {
        let [i0, i1, i2] = self.triangles[tri];
        [
            self.positions[i0 as usize],
            self.positions[i1 as usize],
            self.positions[i2 as usize],
        ]
    }
}

/// Geometry referenced by a primitive.
///
/// A shape never owns geometry: it names a slot in the scene's sphere or
/// mesh arrays, so primitives stay `Copy` and the vertex data stays shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A sphere in the scene's sphere list.
    Sphere {
        /// Index into the scene's sphere array.
        sphere: usize,
    },
    /// One triangle of a mesh in the scene's mesh list.
    Triangle {
        /// Index into the scene's mesh array.
        mesh: usize,
        /// Index into that mesh's triangle list.
        triangle: usize,
    },
}

/// A renderable primitive: a shape plus its material binding.
///
/// The material index is opaque to the kernel; it is carried through to
/// the hit record for the shading side to resolve.
#[derive(Debug, Clone, Copy)]
pub struct Primitive {
    /// The geometry this primitive renders.
    pub shape: Shape,
    /// Material index for shading lookup.
    pub material: usize,
}

/// A static collection of shapes and the primitives built over them.
///
/// Primitive ids are indices into [`Scene::primitives`] and are stable for
/// the lifetime of the scene.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    spheres: Vec<Sphere>,
    meshes: Vec<TriangleMesh>,
    primitives: Vec<Primitive>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sphere and a primitive rendering it.
    ///
    /// Returns the new primitive's id.
    pub fn add_sphere(
        &mut self,
        center: Point3,
        radius: f64,
        material: usize,
    ) -> Result<usize, SceneError> {
        if radius <= 0.0 {
            return Err(SceneError::NonPositiveRadius(radius));
        }
        let sphere = self.spheres.len();
        self.spheres.push(Sphere { center, radius });
        self.primitives.push(Primitive {
            shape: Shape::Sphere { sphere },
            material,
        });
        Ok(self.primitives.len() - 1)
    }

    /// Add a mesh and one primitive per triangle, all bound to `material`.
    ///
    /// Returns the new mesh's index.
    pub fn add_mesh(&mut self, mesh: TriangleMesh, material: usize) -> usize {
        let mesh_index = self.meshes.len();
        for triangle in 0..mesh.triangles.len() {
            self.primitives.push(Primitive {
                shape: Shape::Triangle {
                    mesh: mesh_index,
                    triangle,
                },
                material,
            });
        }
        self.meshes.push(mesh);
        mesh_index
    }

    /// The scene's spheres.
    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    /// The scene's meshes.
    pub fn meshes(&self) -> &[TriangleMesh] {
        &self.meshes
    }

    /// The scene's primitives, indexed by primitive id.
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Number of primitives in the scene.
    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_sphere() {
        let mut scene = Scene::new();
        let id = scene
            .add_sphere(Point3::new(1.0, 2.0, 3.0), 4.0, 7)
            .unwrap();
        assert_eq!(id, 0);
        assert_eq!(scene.primitive_count(), 1);
        assert_eq!(scene.primitives()[0].material, 7);
        match scene.primitives()[0].shape {
            Shape::Sphere { sphere } => assert_eq!(scene.spheres()[sphere].radius, 4.0),
            _ => panic!("expected a sphere shape"),
        }
    }

    #[test]
    fn test_negative_radius_rejected() {
        let mut scene = Scene::new();
        let result = scene.add_sphere(Point3::origin(), -1.0, 0);
        assert!(matches!(result, Err(SceneError::NonPositiveRadius(_))));
        assert_eq!(scene.primitive_count(), 0);
    }

    #[test]
    fn test_mesh_expands_to_triangle_primitives() {
        let mut scene = Scene::new();
        let mesh = TriangleMesh::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [1, 3, 2]],
        )
        .unwrap();
        let mesh_index = scene.add_mesh(mesh, 3);
        assert_eq!(mesh_index, 0);
        assert_eq!(scene.primitive_count(), 2);
        assert_eq!(
            scene.primitives()[1].shape,
            Shape::Triangle { mesh: 0, triangle: 1 }
        );
    }

    #[test]
    fn test_mesh_index_validation() {
        let result = TriangleMesh::new(
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)],
            vec![[0, 1, 2]],
        );
        match result {
            Err(SceneError::VertexIndexOutOfRange {
                triangle,
                index,
                vertex_count,
            }) => {
                assert_eq!(triangle, 0);
                assert_eq!(index, 2);
                assert_eq!(vertex_count, 2);
            }
            _ => panic!("expected VertexIndexOutOfRange"),
        }
    }

    #[test]
    fn test_triangle_positions_lookup() {
        let mesh = TriangleMesh::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[2, 0, 1]],
        )
        .unwrap();
        let [a, b, c] = mesh.triangle_positions(0);
        assert_eq!(a, Point3::new(0.0, 1.0, 0.0));
        assert_eq!(b, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(c, Point3::new(1.0, 0.0, 0.0));
    }
}
