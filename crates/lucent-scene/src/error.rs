//! Error types for scene assembly.

use thiserror::Error;

/// Errors that can occur while assembling a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    /// A triangle references a vertex outside the mesh's position buffer.
    #[error("triangle {triangle} references vertex {index}, but the mesh has only {vertex_count} vertices")]
    VertexIndexOutOfRange {
        /// Index of the offending triangle in the mesh.
        triangle: usize,
        /// The out-of-range vertex index.
        index: u32,
        /// Number of vertices in the position buffer.
        vertex_count: usize,
    },

    /// A sphere was given a non-positive radius.
    #[error("sphere radius must be positive, got {0}")]
    NonPositiveRadius(f64),
}
