//! Triangle collections

use serde::{Deserialize, Serialize};
use strider_math::{Rect2, WorldPoint};

use crate::error::{MeshError, Result};

/// Identifier of a triangle inside its mesh (its insertion index)
pub type TriangleId = u32;

/// A triangle of zone geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub id: TriangleId,
    pub vertices: [WorldPoint; 3],
}

impl Triangle {
    /// Ground-plane bounding rectangle
    pub fn bounds(&self) -> Rect2 {
        Rect2::from_points(&self.vertices)
    }

    pub fn centroid(&self) -> WorldPoint {
        let [a, b, c] = self.vertices;
        (a + b + c) * (1.0 / 3.0)
    }
}

/// Immutable-after-load collection of triangles for one zone
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriangleMesh {
    triangles: Vec<Triangle>,
}

impl TriangleMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a shared vertex buffer and index triples
    pub fn from_indexed(vertices: &[WorldPoint], indices: &[[u32; 3]]) -> Result<Self> {
        let mut mesh = Self {
            triangles: Vec::with_capacity(indices.len()),
        };

        for tri in indices {
            let mut corners = [WorldPoint::ZERO; 3];
            for (corner, &index) in corners.iter_mut().zip(tri) {
                *corner = *vertices
                    .get(index as usize)
                    .ok_or(MeshError::VertexOutOfRange {
                        index,
                        vertex_count: vertices.len(),
                    })?;
            }
            mesh.try_push(corners[0], corners[1], corners[2])?;
        }

        Ok(mesh)
    }

    /// Flat grid of `cols` x `rows` square cells, two triangles per cell
    pub fn grid(origin: WorldPoint, cols: u32, rows: u32, cell_size: f32) -> Self {
        let mut mesh = Self::new();

        for row in 0..rows {
            for col in 0..cols {
                let x0 = origin.x + col as f32 * cell_size;
                let y0 = origin.y + row as f32 * cell_size;
                let x1 = x0 + cell_size;
                let y1 = y0 + cell_size;

                let a = WorldPoint::new(x0, y0, origin.z);
                let b = WorldPoint::new(x1, y0, origin.z);
                let c = WorldPoint::new(x1, y1, origin.z);
                let d = WorldPoint::new(x0, y1, origin.z);

                mesh.push(a, b, c);
                mesh.push(a, c, d);
            }
        }

        mesh
    }

    /// Append a triangle, returning its id.
    ///
    /// Panics past `u32::MAX` triangles; use [`Self::try_push`] for untrusted input.
    pub fn push(&mut self, a: WorldPoint, b: WorldPoint, c: WorldPoint) -> TriangleId {
        match self.try_push(a, b, c) {
            Ok(id) => id,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn try_push(&mut self, a: WorldPoint, b: WorldPoint, c: WorldPoint) -> Result<TriangleId> {
        let id = TriangleId::try_from(self.triangles.len()).map_err(|_| {
            MeshError::TooManyTriangles {
                max: TriangleId::MAX as usize,
            }
        })?;
        self.triangles.push(Triangle {
            id,
            vertices: [a, b, c],
        });
        Ok(id)
    }

    pub fn get(&self, id: TriangleId) -> Option<&Triangle> {
        self.triangles.get(id as usize)
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triangle> {
        self.triangles.iter()
    }

    /// Ground-plane bounds of the whole mesh
    pub fn bounds(&self) -> Rect2 {
        self.triangles
            .iter()
            .fold(Rect2::EMPTY, |acc, tri| {
                let b = tri.bounds();
                acc.expand_to_include(b.min_x, b.min_y)
                    .expand_to_include(b.max_x, b.max_y)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_grid_mesh() {
        let mesh = TriangleMesh::grid(WorldPoint::ZERO, 3, 2, 5.0);

        // Two triangles per cell
        assert_eq!(mesh.len(), 12);
        assert_eq!(mesh.bounds(), Rect2::new(0.0, 0.0, 15.0, 10.0));
        assert_eq!(mesh.get(11).map(|t| t.id), Some(11));
    }

    #[test]
    fn test_from_indexed() {
        let vertices = [
            WorldPoint::new(0.0, 0.0, 0.0),
            WorldPoint::new(3.0, 0.0, 0.0),
            WorldPoint::new(0.0, 3.0, 3.0),
        ];
        let mesh = TriangleMesh::from_indexed(&vertices, &[[0, 1, 2]]).unwrap();
        let tri = mesh.get(0).unwrap();

        assert_relative_eq!(tri.centroid().x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(tri.centroid().z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_from_indexed_out_of_range() {
        let vertices = [WorldPoint::ZERO];
        let err = TriangleMesh::from_indexed(&vertices, &[[0, 0, 4]]).unwrap_err();
        assert!(matches!(err, MeshError::VertexOutOfRange { index: 4, vertex_count: 1 }));
    }
}
