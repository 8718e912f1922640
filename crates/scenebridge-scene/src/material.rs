//! Owned copies of host materials

use std::collections::BTreeMap;

use scenebridge_core::Vec3;

use crate::host::{HostMaterial, HostShaderNode, ShaderInput};
use crate::param::Params;

/// A host material and the part of its shading graph reachable from the
/// root node's inputs
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialSource {
    pub name: String,
    pub color: Vec3,
    pub specular: Vec3,
    pub emission: Vec3,
    pub shininess: f32,
    pub root: ShaderNode,
    /// Nodes connected to the root, keyed by id. Ids the host could not
    /// resolve are absent.
    pub nodes: BTreeMap<u32, ShaderNode>,
}

impl MaterialSource {
    /// Copy a host material
    pub fn adapt<M: HostMaterial>(material: &M) -> Self {
        let root = ShaderNode::adapt(material.root_node());

        let nodes = root
            .inputs
            .iter()
            .filter_map(|input| input.connected_with)
            .filter_map(|id| material.node_with_id(id))
            .map(|node| (node.id(), ShaderNode::adapt(node)))
            .collect();

        Self {
            name: material.name().to_string(),
            color: material.color(),
            specular: material.specular(),
            emission: material.emission(),
            shininess: material.shininess(),
            root,
            nodes,
        }
    }

    pub fn node_with_id(&self, id: u32) -> Option<&ShaderNode> {
        self.nodes.get(&id)
    }
}

/// A shading graph node
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderNode {
    pub id: u32,
    pub kind: String,
    pub inputs: Vec<ShaderInput>,
    pub parameters: Params,
}

impl ShaderNode {
    pub fn adapt<N: HostShaderNode>(node: &N) -> Self {
        Self {
            id: node.id(),
            kind: node.node_type().to_string(),
            inputs: (0..node.input_count())
                .filter_map(|i| node.input_at(i))
                .collect(),
            parameters: node.parameters().clone(),
        }
    }

    pub fn is_image(&self) -> bool {
        self.kind == "image"
    }
}
