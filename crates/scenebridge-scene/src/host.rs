//! Capability contracts for the authoring application's scene graph
//!
//! These traits describe exactly what the exporter reads from the host and
//! nothing more. Anything that can answer these questions can be exported;
//! [`crate::dump`] is the implementation used by the command-line tool.

use serde::{Deserialize, Serialize};

use scenebridge_core::{Vec3, Vec4};

use crate::param::{ParamValue, Params};

/// Node type as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostNodeType {
    Light,
    Camera,
    /// Polygon object; usually carries a geometry core
    Polygon,
    /// Folders, null objects, splines and anything else
    #[serde(other)]
    Other,
}

/// A document: ordered materials plus the scene root
pub trait HostDocument {
    type Node: HostNode;
    type Material: HostMaterial;

    fn root(&self) -> &Self::Node;

    fn material_count(&self) -> usize;

    fn material_at(&self, index: usize) -> Option<&Self::Material>;
}

/// A node in the host scene tree
pub trait HostNode {
    type Geometry: HostGeometry;

    fn node_type(&self) -> HostNodeType;

    /// Named parameter lookup (`name`, `position`, `lightType`, ...)
    fn parameter(&self, name: &str) -> Option<&ParamValue>;

    /// All parameters of the node
    fn parameters(&self) -> &Params;

    fn child_count(&self) -> usize;

    fn child_at(&self, index: usize) -> Option<&Self>;

    /// Polygon core, if the node has usable geometry
    fn core(&self) -> Option<&Self::Geometry>;

    /// Material tags in host order
    fn material_tags(&self) -> Vec<HostMaterialTag>;
}

/// A material tag attached to a node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostMaterialTag {
    /// Index of the linked material in the document's material list
    pub material: Option<usize>,
    /// Tag parameters (`UVOffset`, `UVScale`, `shadingRotation`)
    pub parameters: Params,
}

/// Polygon geometry of a node.
///
/// Corners are addressed per polygon by a local index `0..polygon_size(p)`.
pub trait HostGeometry {
    fn vertex_count(&self) -> usize;

    fn vertex(&self, index: usize) -> Vec3;

    fn polygon_count(&self) -> usize;

    fn polygon_size(&self, polygon: usize) -> usize;

    /// Local corner indices of triangle `triangle` of `polygon`, for
    /// `triangle < polygon_size(polygon) - 2`
    fn triangle(&self, polygon: usize, triangle: usize) -> Option<[usize; 3]>;

    /// Vertex index referenced by a polygon corner
    fn vertex_index(&self, polygon: usize, corner: usize) -> u32;

    /// Packed UV of a polygon corner: `(u0, v0)` in xy, `(u1, v1)` in zw.
    /// Hosts occasionally report no UV at all.
    fn uv_coord(&self, polygon: usize, corner: usize) -> Option<Vec4>;

    /// Face normal of a polygon
    fn normal(&self, polygon: usize) -> Vec3;

    /// Total triangle count of the fan triangulation
    fn triangle_count(&self) -> usize {
        (0..self.polygon_count())
            .map(|p| self.polygon_size(p).saturating_sub(2))
            .sum()
    }
}

/// A node-based material
pub trait HostMaterial {
    type Node: HostShaderNode;

    fn name(&self) -> &str;

    fn color(&self) -> Vec3;

    fn specular(&self) -> Vec3;

    fn emission(&self) -> Vec3;

    fn shininess(&self) -> f32;

    /// Output node whose inputs are the shading channels
    fn root_node(&self) -> &Self::Node;

    fn node_with_id(&self, id: u32) -> Option<&Self::Node>;
}

/// A node of a material's shading graph
pub trait HostShaderNode {
    fn id(&self) -> u32;

    /// Node kind, `"image"` for texture nodes
    fn node_type(&self) -> &str;

    fn input_count(&self) -> usize;

    fn input_at(&self, index: usize) -> Option<ShaderInput>;

    fn parameters(&self) -> &Params;
}

/// One input slot of a shader node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderInput {
    /// Channel name (`diffColor`, `bump`, ...)
    pub name: String,
    /// Id of the node feeding this input
    #[serde(default, rename = "connectedWith", skip_serializing_if = "Option::is_none")]
    pub connected_with: Option<u32>,
}

impl ShaderInput {
    pub fn is_connected(&self) -> bool {
        self.connected_with.is_some()
    }
}
