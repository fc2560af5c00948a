//! Error types for mesh construction

use thiserror::Error;

/// Mesh and index construction errors
#[derive(Debug, Error)]
pub enum MeshError {
    /// Grid resolution must be a positive, finite number of world units
    #[error("Invalid grid resolution: {0}")]
    InvalidResolution(f32),

    /// A triangle referenced a vertex that does not exist
    #[error("Vertex index {index} out of range ({vertex_count} vertices)")]
    VertexOutOfRange { index: u32, vertex_count: usize },

    /// Triangle ids are 32-bit
    #[error("Mesh exceeds {max} triangles")]
    TooManyTriangles { max: usize },
}

/// Result type for mesh operations
pub type Result<T> = std::result::Result<T, MeshError>;
