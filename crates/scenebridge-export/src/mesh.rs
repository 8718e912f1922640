//! Mesh flattening
//!
//! Babylon meshes are indexed triangle lists with one normal and one UV per
//! vertex, while the authoring tool stores polygons with per-corner UVs and
//! a face normal per polygon. Flattening keeps the vertex list as is:
//!
//! - the vertex normal is the normalized sum of the face normals of every
//!   polygon using the vertex, each polygon counted once
//! - the vertex UV is the UV of the last corner written for it; a corner
//!   without UV clears the slot
//! - V is flipped (`1 - v`) for both UV sets

use serde::Serialize;
use tracing::debug;

use scenebridge_core::{Error, Result, Vec3, Vec4};
use scenebridge_scene::{Geometry, MeshNode, Polygon};

use crate::babylon::{BabylonMesh, SubMesh};
use crate::diagnostics::Diagnostics;
use crate::orientation::babylon_rotation;

/// Vertex and index buffers of one mesh
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlatMesh {
    #[serde(serialize_with = "crate::babylon::flatten_seq")]
    pub positions: Vec<[f32; 3]>,
    #[serde(serialize_with = "crate::babylon::flatten_seq")]
    pub indices: Vec<[u32; 3]>,
    #[serde(serialize_with = "crate::babylon::flatten_seq")]
    pub normals: Vec<[f32; 3]>,
    #[serde(serialize_with = "crate::babylon::flatten_seq")]
    pub uvs: Vec<[f32; 2]>,
    #[serde(serialize_with = "crate::babylon::flatten_seq")]
    pub uvs2: Vec<[f32; 2]>,
}

/// Per-vertex state gathered while walking the polygons
#[derive(Debug, Clone, Copy, Default)]
struct VertexSlot {
    normal_sum: Option<Vec3>,
    uv: Option<Vec4>,
}

impl FlatMesh {
    /// Flatten a polygon core.
    ///
    /// Malformed polygons and triangles are skipped and recorded; a core
    /// without any polygon is rejected.
    pub fn flatten(name: &str, geometry: &Geometry, diagnostics: &mut Diagnostics) -> Result<Self> {
        if geometry.polygons.is_empty() {
            return Err(Error::precondition(format!("mesh '{name}' has no polygons")));
        }

        let vertex_count = geometry.vertex_count();
        let mut slots = vec![VertexSlot::default(); vertex_count];
        let mut indices = Vec::with_capacity(geometry.triangle_count());

        for (p, polygon) in geometry.polygons.iter().enumerate() {
            if polygon.corner_count() < 3 {
                diagnostics.record(Error::malformed_geometry(
                    name,
                    format!("polygon {p} has {} corners", polygon.corner_count()),
                ));
                continue;
            }

            // Vertices that already received this polygon's normal
            let mut touched: Vec<usize> = Vec::with_capacity(polygon.corner_count());

            for (t, triangle) in polygon.triangles.iter().enumerate() {
                let Some(vertices) = resolve_triangle(polygon, triangle, vertex_count) else {
                    diagnostics.record(Error::malformed_geometry(
                        name,
                        format!("triangle {t} of polygon {p} references a missing corner or vertex"),
                    ));
                    continue;
                };

                for (&corner, &vertex) in triangle.iter().zip(vertices.iter()) {
                    let slot = &mut slots[vertex];
                    if !touched.contains(&vertex) {
                        touched.push(vertex);
                        slot.normal_sum = Some(slot.normal_sum.unwrap_or(Vec3::ZERO) + polygon.normal);
                    }
                    slot.uv = polygon.uv(corner);
                }
                indices.push(vertices.map(|v| v as u32));
            }

            let expected = polygon.corner_count() - 2;
            if polygon.triangles.len() != expected {
                diagnostics.record(Error::malformed_geometry(
                    name,
                    format!(
                        "polygon {p} has {} triangles, expected {expected}",
                        polygon.triangles.len()
                    ),
                ));
            }
        }

        let mut unreferenced = 0usize;
        let mut normals = Vec::with_capacity(vertex_count);
        for (v, slot) in slots.iter().enumerate() {
            let normal = match slot.normal_sum {
                None => {
                    unreferenced += 1;
                    Vec3::FORWARD
                }
                Some(sum) => sum.try_normalize().unwrap_or_else(|| {
                    diagnostics.record(Error::malformed_geometry(
                        name,
                        format!("vertex {v} has a zero or non-finite normal sum"),
                    ));
                    Vec3::FORWARD
                }),
            };
            normals.push(normal.to_array());
        }
        if unreferenced > 0 {
            diagnostics.record(Error::malformed_geometry(
                name,
                format!("{unreferenced} vertices are not used by any triangle"),
            ));
        }

        let (uvs, uvs2): (Vec<_>, Vec<_>) = slots
            .iter()
            .map(|slot| {
                let uv = slot.uv.unwrap_or(Vec4::ZERO);
                ([1.0 - uv.x, 1.0 - uv.y], [1.0 - uv.z, 1.0 - uv.w])
            })
            .unzip();

        Ok(Self {
            positions: geometry.vertices.iter().map(|v| v.to_array()).collect(),
            indices,
            normals,
            uvs,
            uvs2,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// The single sub-mesh covering the whole buffer
    pub fn sub_mesh(&self) -> SubMesh {
        SubMesh {
            material_index: 0,
            vertices_start: 0,
            vertices_count: self.vertex_count() as u32,
            index_start: 0,
            index_count: (self.triangle_count() * 3) as u32,
        }
    }
}

/// Vertex indices of a triangle's corners, if all of them exist
fn resolve_triangle(polygon: &Polygon, triangle: &[usize; 3], vertex_count: usize) -> Option<[usize; 3]> {
    let mut vertices = [0usize; 3];
    for (out, &corner) in vertices.iter_mut().zip(triangle) {
        let vertex = *polygon.vertex_indices.get(corner)? as usize;
        if vertex >= vertex_count {
            return None;
        }
        *out = vertex;
    }
    Some(vertices)
}

/// Build a Babylon mesh from an adapted mesh node.
///
/// `material_id` is the id of the mesh's material, empty when it has none.
pub fn build_mesh(
    mesh: &MeshNode,
    material_id: String,
    parent_id: Option<String>,
    diagnostics: &mut Diagnostics,
) -> Result<BabylonMesh> {
    let geometry = FlatMesh::flatten(&mesh.name, &mesh.geometry, diagnostics)?;
    let sub_mesh = geometry.sub_mesh();

    debug!(
        mesh = %mesh.name,
        vertices = geometry.vertex_count(),
        triangles = geometry.triangle_count(),
        "Flattened mesh"
    );

    Ok(BabylonMesh {
        name: mesh.name.clone(),
        id: mesh.name.clone(),
        parent_id,
        material_id,
        position: mesh.transform.position,
        rotation: babylon_rotation(mesh.transform.rotation),
        scaling: mesh.transform.scale,
        is_visible: true,
        is_enabled: true,
        check_collisions: false,
        billboard_mode: 0,
        receive_shadows: true,
        geometry,
        sub_meshes: vec![sub_mesh],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenebridge_core::ErrorKind;
    use scenebridge_scene::Transform;

    fn quad_geometry() -> Geometry {
        Geometry {
            vertices: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            polygons: vec![Polygon::fan(
                vec![0, 1, 2, 3],
                vec![Some(Vec4::new(0.3, 0.7, 0.1, 0.9)); 4],
                Vec3::FORWARD,
            )],
        }
    }

    fn assert_buffers_consistent(flat: &FlatMesh) {
        let n = flat.positions.len();
        assert_eq!(flat.normals.len(), n);
        assert_eq!(flat.uvs.len(), n);
        assert_eq!(flat.uvs2.len(), n);
        assert!(flat.indices.iter().flatten().all(|&i| (i as usize) < n));
    }

    #[test]
    fn test_quad() {
        let mut diagnostics = Diagnostics::new();
        let flat = FlatMesh::flatten("Quad", &quad_geometry(), &mut diagnostics).unwrap();

        assert_buffers_consistent(&flat);
        assert_eq!(flat.indices, vec![[0, 1, 2], [0, 2, 3]]);
        assert!(flat.normals.iter().all(|n| *n == [0.0, 0.0, 1.0]));
        assert!(diagnostics.is_empty());

        let sub_mesh = flat.sub_mesh();
        assert_eq!(sub_mesh.vertices_count, 4);
        assert_eq!(sub_mesh.index_count, 6);
    }

    #[test]
    fn test_uv_flip() {
        let mut diagnostics = Diagnostics::new();
        let flat = FlatMesh::flatten("Quad", &quad_geometry(), &mut diagnostics).unwrap();

        let [u, v] = flat.uvs[0];
        assert!((u - 0.7).abs() < 1e-6 && (v - 0.3).abs() < 1e-6);
        let [u2, v2] = flat.uvs2[0];
        assert!((u2 - 0.9).abs() < 1e-6 && (v2 - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_last_uv_wins() {
        let mut geometry = quad_geometry();
        // Second polygon reuses vertex 0 with a different UV and vertex 2 without one
        geometry.polygons.push(Polygon::fan(
            vec![0, 2, 1],
            vec![Some(Vec4::new(0.5, 0.5, 0.5, 0.5)), None, Some(Vec4::ZERO)],
            Vec3::FORWARD,
        ));

        let mut diagnostics = Diagnostics::new();
        let flat = FlatMesh::flatten("Quad", &geometry, &mut diagnostics).unwrap();
        assert_eq!(flat.uvs[0], [0.5, 0.5]);
        assert_eq!(flat.uvs[2], [1.0, 1.0]);
        assert_eq!(flat.uvs[1], [1.0, 1.0]);
    }

    #[test]
    fn test_normals_average_per_polygon() {
        // Two triangles sharing edge 0-1, one facing +Z and one facing +Y
        let geometry = Geometry {
            vertices: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
            ],
            polygons: vec![
                Polygon::fan(vec![0, 1, 2], vec![], Vec3::FORWARD),
                Polygon::fan(vec![1, 0, 3], vec![], Vec3::UP),
            ],
        };

        let mut diagnostics = Diagnostics::new();
        let flat = FlatMesh::flatten("Wedge", &geometry, &mut diagnostics).unwrap();

        let shared = Vec3::from(flat.normals[0]);
        let expected = Vec3::new(0.0, 1.0, 1.0).normalize();
        assert!((shared - expected).length() < 1e-6);
        assert_eq!(flat.normals[2], [0.0, 0.0, 1.0]);
        assert_eq!(flat.normals[3], [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_quad_counts_its_normal_once() {
        // Vertex 0 and 2 appear in both fan triangles of one polygon
        let geometry = Geometry {
            vertices: quad_geometry().vertices,
            polygons: vec![
                Polygon::fan(vec![0, 1, 2, 3], vec![], Vec3::FORWARD),
                Polygon::fan(vec![0, 2, 3], vec![], Vec3::UP),
            ],
        };

        let mut diagnostics = Diagnostics::new();
        let flat = FlatMesh::flatten("Quad", &geometry, &mut diagnostics).unwrap();
        let expected = Vec3::new(0.0, 1.0, 1.0).normalize();
        assert!((Vec3::from(flat.normals[0]) - expected).length() < 1e-6);
    }

    #[test]
    fn test_malformed_polygons_are_skipped() {
        let mut geometry = quad_geometry();
        geometry.polygons.push(Polygon::fan(vec![0, 1], vec![], Vec3::UP));
        geometry.polygons.push(Polygon::fan(vec![0, 1, 9], vec![], Vec3::UP));
        geometry.polygons.push(Polygon {
            vertex_indices: vec![0, 1, 2],
            uvs: vec![],
            normal: Vec3::UP,
            triangles: vec![[0, 1, 5]],
        });

        let mut diagnostics = Diagnostics::new();
        let flat = FlatMesh::flatten("Quad", &geometry, &mut diagnostics).unwrap();

        assert_buffers_consistent(&flat);
        assert_eq!(flat.triangle_count(), 2);
        assert_eq!(diagnostics.count(ErrorKind::MalformedGeometry), 3);
    }

    #[test]
    fn test_degenerate_and_unused_vertices() {
        let geometry = Geometry {
            vertices: vec![Vec3::ZERO, Vec3::ONE, Vec3::UP, Vec3::new(5.0, 5.0, 5.0)],
            polygons: vec![
                Polygon::fan(vec![0, 1, 2], vec![], Vec3::UP),
                Polygon::fan(vec![0, 2, 1], vec![], -Vec3::UP),
            ],
        };

        let mut diagnostics = Diagnostics::new();
        let flat = FlatMesh::flatten("Flat", &geometry, &mut diagnostics).unwrap();

        assert!(flat.normals.iter().all(|n| *n == [0.0, 0.0, 1.0]));
        // three cancelled vertices plus one unused-vertex summary
        assert_eq!(diagnostics.count(ErrorKind::MalformedGeometry), 4);
    }

    #[test]
    fn test_short_triangulation_is_reported() {
        // Pentagon whose host triangulation lost its middle triangle
        let geometry = Geometry {
            vertices: (0..5).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect(),
            polygons: vec![Polygon {
                vertex_indices: vec![0, 1, 2, 3, 4],
                uvs: vec![],
                normal: Vec3::FORWARD,
                triangles: vec![[0, 1, 2], [0, 3, 4]],
            }],
        };

        let mut diagnostics = Diagnostics::new();
        let flat = FlatMesh::flatten("Pentagon", &geometry, &mut diagnostics).unwrap();

        assert_eq!(flat.triangle_count(), 2);
        assert_eq!(diagnostics.count(ErrorKind::MalformedGeometry), 1);
        let message = diagnostics.iter().next().unwrap().to_string();
        assert!(message.contains("2 triangles, expected 3"), "{message}");
    }

    #[test]
    fn test_non_finite_face_normal() {
        let mut geometry = quad_geometry();
        geometry.polygons[0].normal = Vec3::new(f32::NAN, 0.0, 1.0);

        let mut diagnostics = Diagnostics::new();
        let flat = FlatMesh::flatten("Quad", &geometry, &mut diagnostics).unwrap();

        assert!(flat.normals.iter().all(|n| *n == [0.0, 0.0, 1.0]));
        assert_eq!(diagnostics.count(ErrorKind::MalformedGeometry), 4);
        assert!(diagnostics
            .iter()
            .all(|d| d.to_string().contains("zero or non-finite normal sum")));
    }

    #[test]
    fn test_build_mesh_copies_transform() {
        let mesh = MeshNode {
            name: "Crate".into(),
            transform: Transform {
                position: Vec3::new(1.0, 2.0, 3.0),
                rotation: Vec3::new(10.0, 20.0, 30.0),
                scale: Vec3::new(4.0, 5.0, 6.0),
            },
            geometry: quad_geometry(),
            material_tag: None,
            children: vec![],
        };

        let mut diagnostics = Diagnostics::new();
        let built = build_mesh(&mesh, "Wood".into(), Some("Shelf".into()), &mut diagnostics).unwrap();

        assert_eq!(built.name, "Crate");
        assert_eq!(built.id, "Crate");
        assert_eq!(built.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(built.scaling, Vec3::new(4.0, 5.0, 6.0));
        let expected = Vec3::new(20f32.to_radians(), (-10f32).to_radians(), (-30f32).to_radians());
        assert!((built.rotation - expected).length() < 1e-6);
        assert_eq!(built.material_id, "Wood");
        assert_eq!(built.parent_id.as_deref(), Some("Shelf"));
        assert_eq!(built.sub_meshes.len(), 1);
        assert_eq!(built.sub_meshes[0].index_count, 6);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_empty_core_is_rejected() {
        let geometry = Geometry {
            vertices: vec![Vec3::ZERO],
            polygons: vec![],
        };
        let err = FlatMesh::flatten("Empty", &geometry, &mut Diagnostics::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PreconditionViolated);
    }

    #[test]
    fn test_buffers_serialize_flat() {
        let flat = FlatMesh::flatten("Quad", &quad_geometry(), &mut Diagnostics::new()).unwrap();
        let json = serde_json::to_value(&flat).unwrap();

        assert_eq!(json["positions"].as_array().map(Vec::len), Some(12));
        assert_eq!(json["indices"].as_array().map(Vec::len), Some(6));
        assert_eq!(json["uvs2"].as_array().map(Vec::len), Some(8));
        assert_eq!(json["indices"][5], 3);
    }
}
