//! Owned polygon geometry
//!
//! A snapshot of a host core taken by the adapter. Nothing here is
//! validated; index ranges and degenerate polygons are the flattener's
//! concern because it decides how to recover.

use serde::{Deserialize, Serialize};

use scenebridge_core::{Vec3, Vec4};

use crate::host::HostGeometry;

/// Polygon mesh with per-corner attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Vertex positions, addressed by the polygons' vertex indices
    pub vertices: Vec<Vec3>,
    /// Polygons in host order
    pub polygons: Vec<Polygon>,
}

impl Geometry {
    /// Copy a host core
    pub fn from_host<G: HostGeometry>(core: &G) -> Self {
        let vertices = (0..core.vertex_count()).map(|v| core.vertex(v)).collect();

        let polygons = (0..core.polygon_count())
            .map(|p| {
                let size = core.polygon_size(p);
                Polygon {
                    vertex_indices: (0..size).map(|c| core.vertex_index(p, c)).collect(),
                    uvs: (0..size).map(|c| core.uv_coord(p, c)).collect(),
                    normal: core.normal(p),
                    triangles: (0..size.saturating_sub(2))
                        .filter_map(|t| core.triangle(p, t))
                        .collect(),
                }
            })
            .collect();

        Self { vertices, polygons }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// Number of triangles the host triangulation provides
    pub fn triangle_count(&self) -> usize {
        self.polygons.iter().map(|p| p.triangles.len()).sum()
    }
}

/// One polygon with its corners and triangulation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    /// Vertex index per corner
    pub vertex_indices: Vec<u32>,
    /// Packed UV per corner (`None` when the host reported none)
    pub uvs: Vec<Option<Vec4>>,
    /// Face normal
    pub normal: Vec3,
    /// Triangles as local corner indices
    pub triangles: Vec<[usize; 3]>,
}

impl Polygon {
    /// Build a polygon with a fan triangulation
    pub fn fan(vertex_indices: Vec<u32>, uvs: Vec<Option<Vec4>>, normal: Vec3) -> Self {
        let triangles = fan_triangles(vertex_indices.len());
        Self {
            vertex_indices,
            uvs,
            normal,
            triangles,
        }
    }

    pub fn corner_count(&self) -> usize {
        self.vertex_indices.len()
    }

    /// UV of a corner, if the host reported one
    pub fn uv(&self, corner: usize) -> Option<Vec4> {
        self.uvs.get(corner).copied().flatten()
    }
}

/// Fan triangulation of an `n`-gon: `n - 2` triangles sharing corner 0
pub fn fan_triangles(corners: usize) -> Vec<[usize; 3]> {
    (0..corners.saturating_sub(2))
        .map(|t| [0, t + 1, t + 2])
        .collect()
}
