//! Strider Mesh - Triangle Geometry Index
//!
//! Zone geometry arrives as an immutable triangle collection. This crate
//! hashes every triangle into a sparse 2D grid once, so "which triangles lie
//! near this point" becomes a handful of hash lookups instead of a scan.
//!
//! # Architecture
//!
//! ```text
//! TriangleMesh ──build──▶ GeometryIndex
//!                          └─ SparseGrid2D<Vec<TriangleId>>
//!                               (x / resolution, y / resolution) → ids
//! ```
//!
//! The index is never patched: a changed mesh means a new index. It holds no
//! interior mutability, so a shared `&GeometryIndex` (or `Arc`) can be queried
//! from any number of threads.
//!
//! # Example
//!
//! ```ignore
//! use strider_mesh::prelude::*;
//!
//! let mut mesh = TriangleMesh::new();
//! mesh.push(
//!     WorldPoint::new(0.0, 0.0, 0.0),
//!     WorldPoint::new(2.0, 0.0, 0.0),
//!     WorldPoint::new(0.0, 2.0, 0.0),
//! );
//!
//! let index = GeometryIndex::build(&mesh);
//! assert!(index.query_radius(1.0, 1.0, 0.1).contains(&0));
//! ```

pub mod error;
pub mod index;
pub mod mesh;
pub mod sparse;

pub mod prelude {
    //! Common imports for geometry queries
    pub use crate::error::{MeshError, Result};
    pub use crate::index::{GeometryIndex, IndexConfig, IndexStats, OverlapMode};
    pub use crate::mesh::{Triangle, TriangleId, TriangleMesh};
    pub use crate::sparse::SparseGrid2D;
    pub use strider_math::{Rect2, WorldPoint};
}

pub use prelude::*;
