//! JSON scene dump
//!
//! The authoring application cannot link against Rust, so a small host-side
//! script serializes the document into this shape and the CLI reads it:
//!
//! ```json
//! {
//!   "materials": [
//!     { "name": "Wood", "color": [1, 1, 1], "specular": [1, 1, 1],
//!       "emission": [0, 0, 0], "shininess": 30,
//!       "root": { "id": 0, "type": "material",
//!                 "inputs": [{ "name": "diffColor", "connectedWith": 1 }] },
//!       "nodes": [{ "id": 1, "type": "image",
//!                   "parameters": { "texture": "/tex/wood.png" } }] }
//!   ],
//!   "root": { "type": "folder", "children": [ ... ] }
//! }
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use scenebridge_core::{Error, Result, Vec3, Vec4};

use crate::host::{
    HostDocument, HostGeometry, HostMaterial, HostMaterialTag, HostNode, HostNodeType,
    HostShaderNode, ShaderInput,
};
use crate::param::{ParamValue, Params};

/// Whole document as written by the host script
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDump {
    #[serde(default)]
    pub materials: Vec<DumpMaterial>,
    pub root: DumpNode,
}

impl SceneDump {
    /// Decode a dump from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Decode a dump from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and decode a dump file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        debug!(path = %path.display(), "Reading scene dump");
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl HostDocument for SceneDump {
    type Node = DumpNode;
    type Material = DumpMaterial;

    fn root(&self) -> &DumpNode {
        &self.root
    }

    fn material_count(&self) -> usize {
        self.materials.len()
    }

    fn material_at(&self, index: usize) -> Option<&DumpMaterial> {
        self.materials.get(index)
    }
}

/// Scene node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpNode {
    #[serde(rename = "type")]
    pub node_type: HostNodeType,
    #[serde(default)]
    pub parameters: Params,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core: Option<DumpCore>,
    #[serde(default, rename = "materialTags", skip_serializing_if = "Vec::is_empty")]
    pub material_tags: Vec<DumpMaterialTag>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DumpNode>,
}

impl DumpNode {
    /// Create a node with no parameters, core or children
    pub fn new(node_type: HostNodeType) -> Self {
        Self {
            node_type,
            parameters: Params::new(),
            core: None,
            material_tags: Vec::new(),
            children: Vec::new(),
        }
    }
}

impl HostNode for DumpNode {
    type Geometry = DumpCore;

    fn node_type(&self) -> HostNodeType {
        self.node_type
    }

    fn parameter(&self, name: &str) -> Option<&ParamValue> {
        self.parameters.get(name)
    }

    fn parameters(&self) -> &Params {
        &self.parameters
    }

    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn child_at(&self, index: usize) -> Option<&DumpNode> {
        self.children.get(index)
    }

    fn core(&self) -> Option<&DumpCore> {
        self.core.as_ref()
    }

    fn material_tags(&self) -> Vec<HostMaterialTag> {
        self.material_tags
            .iter()
            .map(|tag| HostMaterialTag {
                material: tag.material,
                parameters: tag.parameters.clone(),
            })
            .collect()
    }
}

/// Material tag on a node
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DumpMaterialTag {
    /// Index into [`SceneDump::materials`]
    #[serde(default, rename = "linkedToMaterial")]
    pub material: Option<usize>,
    #[serde(default)]
    pub parameters: Params,
}

/// Polygon core
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DumpCore {
    pub vertices: Vec<Vec3>,
    pub polygons: Vec<DumpPolygon>,
}

/// One polygon of a core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpPolygon {
    /// Vertex indices, one per corner
    pub vertices: Vec<u32>,
    /// Packed UV per corner; `null` entries are allowed
    #[serde(default)]
    pub uvs: Vec<Option<Vec4>>,
    pub normal: Vec3,
    /// Host triangulation in local corner indices; a fan is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triangles: Option<Vec<[usize; 3]>>,
}

impl HostGeometry for DumpCore {
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn vertex(&self, index: usize) -> Vec3 {
        self.vertices.get(index).copied().unwrap_or_default()
    }

    fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    fn polygon_size(&self, polygon: usize) -> usize {
        self.polygons.get(polygon).map_or(0, |p| p.vertices.len())
    }

    fn triangle(&self, polygon: usize, triangle: usize) -> Option<[usize; 3]> {
        let poly = self.polygons.get(polygon)?;
        match &poly.triangles {
            Some(triangles) => triangles.get(triangle).copied(),
            None if triangle + 2 < poly.vertices.len() => Some([0, triangle + 1, triangle + 2]),
            None => None,
        }
    }

    fn vertex_index(&self, polygon: usize, corner: usize) -> u32 {
        // u32::MAX never addresses a vertex, so the flattener reports it
        self.polygons
            .get(polygon)
            .and_then(|p| p.vertices.get(corner))
            .copied()
            .unwrap_or(u32::MAX)
    }

    fn uv_coord(&self, polygon: usize, corner: usize) -> Option<Vec4> {
        self.polygons.get(polygon)?.uvs.get(corner).copied().flatten()
    }

    fn normal(&self, polygon: usize) -> Vec3 {
        self.polygons.get(polygon).map_or(Vec3::ZERO, |p| p.normal)
    }
}

/// Node-based material
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpMaterial {
    pub name: String,
    pub color: Vec3,
    pub specular: Vec3,
    pub emission: Vec3,
    pub shininess: f32,
    pub root: DumpShaderNode,
    #[serde(default)]
    pub nodes: Vec<DumpShaderNode>,
}

impl HostMaterial for DumpMaterial {
    type Node = DumpShaderNode;

    fn name(&self) -> &str {
        &self.name
    }

    fn color(&self) -> Vec3 {
        self.color
    }

    fn specular(&self) -> Vec3 {
        self.specular
    }

    fn emission(&self) -> Vec3 {
        self.emission
    }

    fn shininess(&self) -> f32 {
        self.shininess
    }

    fn root_node(&self) -> &DumpShaderNode {
        &self.root
    }

    fn node_with_id(&self, id: u32) -> Option<&DumpShaderNode> {
        if self.root.id == id {
            return Some(&self.root);
        }
        self.nodes.iter().find(|node| node.id == id)
    }
}

/// Shading graph node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpShaderNode {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub inputs: Vec<DumpShaderInput>,
    #[serde(default)]
    pub parameters: Params,
}

/// Input slot of a shading graph node
pub type DumpShaderInput = ShaderInput;

impl HostShaderNode for DumpShaderNode {
    fn id(&self) -> u32 {
        self.id
    }

    fn node_type(&self) -> &str {
        &self.kind
    }

    fn input_count(&self) -> usize {
        self.inputs.len()
    }

    fn input_at(&self, index: usize) -> Option<ShaderInput> {
        self.inputs.get(index).cloned()
    }

    fn parameters(&self) -> &Params {
        &self.parameters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = r#"{
        "materials": [],
        "root": {
            "type": "folder",
            "children": [{
                "type": "polygon",
                "parameters": { "name": "Quad" },
                "core": {
                    "vertices": [[0,0,0],[1,0,0],[1,1,0],[0,1,0]],
                    "polygons": [{
                        "vertices": [0, 1, 2, 3],
                        "uvs": [[0,0,0,0], null, [1,1,0,0], [0,1,0,0]],
                        "normal": [0, 0, 1]
                    }]
                }
            }]
        }
    }"#;

    #[test]
    fn test_decode_dump() {
        let dump = SceneDump::from_json(QUAD).unwrap();
        assert_eq!(dump.root.node_type, HostNodeType::Other);
        assert_eq!(dump.root.child_count(), 1);

        let quad = dump.root.child_at(0).unwrap();
        assert_eq!(quad.node_type(), HostNodeType::Polygon);
        assert_eq!(quad.parameter("name"), Some(&ParamValue::Text("Quad".into())));
        assert!(quad.core().is_some());
    }

    #[test]
    fn test_fan_triangulation_when_absent() {
        let dump = SceneDump::from_json(QUAD).unwrap();
        let core = dump.root.children[0].core().unwrap();

        assert_eq!(core.polygon_size(0), 4);
        assert_eq!(core.triangle_count(), 2);
        assert_eq!(core.triangle(0, 0), Some([0, 1, 2]));
        assert_eq!(core.triangle(0, 1), Some([0, 2, 3]));
        assert_eq!(core.triangle(0, 2), None);
    }

    #[test]
    fn test_null_uv_corner() {
        let dump = SceneDump::from_json(QUAD).unwrap();
        let core = dump.root.children[0].core().unwrap();

        assert_eq!(core.uv_coord(0, 0), Some(Vec4::ZERO));
        assert_eq!(core.uv_coord(0, 1), None);
        assert_eq!(core.uv_coord(0, 9), None);
    }

    #[test]
    fn test_missing_file() {
        let err = SceneDump::from_path("/nonexistent/scene.json").unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }
}
