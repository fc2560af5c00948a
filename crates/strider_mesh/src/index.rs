//! Geometry index: triangles hashed into a sparse 2D grid

use std::collections::HashSet;
use std::time::{Duration, Instant};

use log::Level;
use serde::{Deserialize, Serialize};
use strider_math::{triangle_rect_overlap, Rect2};

use crate::error::{MeshError, Result};
use crate::mesh::{TriangleId, TriangleMesh};
use crate::sparse::SparseGrid2D;

/// How a triangle is assigned to the cells under its bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapMode {
    /// Every cell the 2D bounding box touches (conservative)
    #[default]
    BoundingBox,
    /// Only cells whose column actually overlaps the triangle
    Triangle,
}

/// Geometry index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Cell edge length in world units
    pub resolution: f32,
    /// Cell assignment policy
    pub overlap: OverlapMode,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            resolution: 2.0,
            overlap: OverlapMode::BoundingBox,
        }
    }
}

impl IndexConfig {
    /// Set resolution
    pub fn with_resolution(mut self, resolution: f32) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set overlap mode
    pub fn with_overlap(mut self, overlap: OverlapMode) -> Self {
        self.overlap = overlap;
        self
    }
}

/// Numbers gathered while building
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IndexStats {
    pub triangles: usize,
    /// Populated cells
    pub cells: usize,
    /// Most triangle ids stored in one cell
    pub max_per_cell: usize,
    pub build_time: Duration,
}

/// Read-only spatial hash over a triangle mesh
#[derive(Debug, Clone)]
pub struct GeometryIndex {
    grid: SparseGrid2D<Vec<TriangleId>>,
    stats: IndexStats,
}

impl GeometryIndex {
    /// Build with the default configuration
    pub fn build(mesh: &TriangleMesh) -> Self {
        Self::build_unchecked(mesh, &IndexConfig::default())
    }

    /// Build with an explicit configuration
    pub fn build_with(mesh: &TriangleMesh, config: &IndexConfig) -> Result<Self> {
        if !(config.resolution.is_finite() && config.resolution > 0.0) {
            return Err(MeshError::InvalidResolution(config.resolution));
        }
        Ok(Self::build_unchecked(mesh, config))
    }

    fn build_unchecked(mesh: &TriangleMesh, config: &IndexConfig) -> Self {
        let started = Instant::now();

        if log::log_enabled!(Level::Trace) {
            log::trace!("Building geometry index over {} triangles", mesh.len());
        }

        let mut grid: SparseGrid2D<Vec<TriangleId>> =
            SparseGrid2D::with_capacity(config.resolution, mesh.len());
        let mut max_per_cell = 0;

        for tri in mesh.iter() {
            let bounds = tri.bounds();
            let ((x0, y0), (x1, y1)) = grid.cell_span(&bounds);
            let [a, b, c] = tri.vertices;

            for x in x0..=x1 {
                for y in y0..=y1 {
                    if config.overlap == OverlapMode::Triangle
                        && !triangle_rect_overlap(a, b, c, &grid.cell_rect((x, y)))
                    {
                        continue;
                    }

                    let ids = grid.get_or_insert_with((x, y), || Vec::with_capacity(8));
                    ids.push(tri.id);
                    max_per_cell = max_per_cell.max(ids.len());
                }
            }
        }

        let stats = IndexStats {
            triangles: mesh.len(),
            cells: grid.len(),
            max_per_cell,
            build_time: started.elapsed(),
        };

        if log::log_enabled!(Level::Trace) {
            log::trace!(
                "Geometry index done: {} cells, max {} per cell, took {:?}",
                stats.cells,
                stats.max_per_cell,
                stats.build_time
            );
        }

        Self {
            grid,
            stats,
        }
    }

    /// Triangles in every cell within `distance` of `(x, y)` on either axis
    pub fn query_radius(&self, x: f32, y: f32, distance: f32) -> HashSet<TriangleId> {
        self.query_rect(&Rect2::around(x, y, distance))
    }

    /// Triangles in every cell overlapping the box spanned by two corners
    pub fn query_box(&self, x0: f32, y0: f32, x1: f32, y1: f32) -> HashSet<TriangleId> {
        self.query_rect(&Rect2::from_corners(x0, y0, x1, y1))
    }

    pub fn query_rect(&self, rect: &Rect2) -> HashSet<TriangleId> {
        self.grid
            .values_in(rect)
            .into_iter()
            .flat_map(|ids| ids.iter().copied())
            .collect()
    }

    pub fn resolution(&self) -> f32 {
        self.grid.resolution()
    }

    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }
}
