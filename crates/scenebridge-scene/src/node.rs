//! Tagged scene tree
//!
//! The adapter reads each host node once and keeps only the fields its kind
//! needs. Host nodes of type light or camera become [`SceneNode::Light`] and
//! [`SceneNode::Camera`]; every other node becomes a [`SceneNode::Mesh`]
//! when it carries a geometry core and a [`SceneNode::Group`] otherwise.

use tracing::{debug, trace};

use scenebridge_core::{Result, ResultExt, Vec2, Vec3};

use crate::geometry::Geometry;
use crate::host::{HostDocument, HostNode, HostNodeType};
use crate::material::MaterialSource;
use crate::param::Params;

/// Node placement as authored: position, Euler rotation in degrees, scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

/// A node of the adapted scene tree
#[derive(Debug, Clone, PartialEq)]
pub enum SceneNode {
    Mesh(MeshNode),
    Light(LightNode),
    Camera(CameraNode),
    Group(GroupNode),
}

impl SceneNode {
    /// Adapt a host node and its whole subtree
    pub fn adapt<N: HostNode>(node: &N) -> Result<Self> {
        let params = node.parameters();
        let children = adapt_children(node)?;

        let adapted = match node.node_type() {
            HostNodeType::Light => {
                let name: String = params.require("light", "name")?;
                let cut_off_angle = params.optional(&name, "cutOffAngle")?;
                let cut_off_attenuation = params.optional(&name, "cutOffAttenuation")?;
                SceneNode::Light(LightNode {
                    transform: Transform {
                        position: params.require(&name, "position")?,
                        rotation: params.require(&name, "rotation")?,
                        scale: Vec3::ONE,
                    },
                    light_type: params.optional(&name, "lightType")?,
                    color: params.require(&name, "color")?,
                    intensity: params.require(&name, "intensity")?,
                    cut_off_angle,
                    cut_off_attenuation,
                    name,
                    children,
                })
            }
            HostNodeType::Camera => {
                let name: String = params.require("camera", "name")?;
                SceneNode::Camera(CameraNode {
                    transform: Transform {
                        position: params.require(&name, "position")?,
                        rotation: params.require(&name, "rotation")?,
                        scale: Vec3::ONE,
                    },
                    field_of_view: params.require(&name, "fieldOfView")?,
                    clip_near: params.require(&name, "clipNear")?,
                    clip_far: params.require(&name, "clipFar")?,
                    name,
                    children,
                })
            }
            HostNodeType::Polygon | HostNodeType::Other => match node.core() {
                Some(core) => {
                    let name: String = params.require("mesh", "name")?;
                    let material_tag = node
                        .material_tags()
                        .into_iter()
                        .next()
                        .map(|tag| MaterialTag::adapt(&name, tag.material, &tag.parameters))
                        .transpose()?;
                    SceneNode::Mesh(MeshNode {
                        transform: Transform {
                            position: params.require(&name, "position")?,
                            rotation: params.require(&name, "rotation")?,
                            scale: params.require(&name, "scale")?,
                        },
                        geometry: Geometry::from_host(core),
                        material_tag,
                        name,
                        children,
                    })
                }
                None => SceneNode::Group(GroupNode {
                    name: params.optional("group", "name")?.unwrap_or_default(),
                    children,
                }),
            },
        };

        trace!(name = adapted.name(), kind = adapted.kind_name(), "Adapted node");
        Ok(adapted)
    }

    pub fn name(&self) -> &str {
        match self {
            SceneNode::Mesh(n) => &n.name,
            SceneNode::Light(n) => &n.name,
            SceneNode::Camera(n) => &n.name,
            SceneNode::Group(n) => &n.name,
        }
    }

    pub fn children(&self) -> &[SceneNode] {
        match self {
            SceneNode::Mesh(n) => &n.children,
            SceneNode::Light(n) => &n.children,
            SceneNode::Camera(n) => &n.children,
            SceneNode::Group(n) => &n.children,
        }
    }

    /// Short lowercase kind name
    pub fn kind_name(&self) -> &'static str {
        match self {
            SceneNode::Mesh(_) => "mesh",
            SceneNode::Light(_) => "light",
            SceneNode::Camera(_) => "camera",
            SceneNode::Group(_) => "group",
        }
    }

    /// Number of nodes in this subtree, including this one
    pub fn subtree_len(&self) -> usize {
        1 + self.children().iter().map(SceneNode::subtree_len).sum::<usize>()
    }
}

fn adapt_children<N: HostNode>(node: &N) -> Result<Vec<SceneNode>> {
    (0..node.child_count())
        .filter_map(|i| node.child_at(i))
        .map(SceneNode::adapt)
        .collect()
}

/// Node with a polygon core
#[derive(Debug, Clone, PartialEq)]
pub struct MeshNode {
    pub name: String,
    pub transform: Transform,
    pub geometry: Geometry,
    /// First material tag; further tags are ignored
    pub material_tag: Option<MaterialTag>,
    pub children: Vec<SceneNode>,
}

/// Material assignment of a mesh
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MaterialTag {
    /// Index into the document's material list
    pub material: Option<usize>,
    pub uv_offset: Option<Vec2>,
    pub uv_scale: Option<Vec2>,
    /// Texture rotation in the tag's own units
    pub shading_rotation: Option<Vec3>,
}

impl MaterialTag {
    fn adapt(owner: &str, material: Option<usize>, params: &Params) -> Result<Self> {
        Ok(Self {
            material,
            uv_offset: params.optional(owner, "UVOffset")?,
            uv_scale: params.optional(owner, "UVScale")?,
            shading_rotation: params.optional(owner, "shadingRotation")?,
        })
    }
}

/// Light source
#[derive(Debug, Clone, PartialEq)]
pub struct LightNode {
    pub name: String,
    pub transform: Transform,
    /// Host light kind: 0 ambient, 1 area, 2 distant, 3 point, 4 spot
    pub light_type: Option<i64>,
    pub color: Vec3,
    pub intensity: f32,
    /// Spot cone angle in degrees
    pub cut_off_angle: Option<f32>,
    pub cut_off_attenuation: Option<f32>,
    pub children: Vec<SceneNode>,
}

/// Camera
#[derive(Debug, Clone, PartialEq)]
pub struct CameraNode {
    pub name: String,
    pub transform: Transform,
    /// Degrees
    pub field_of_view: f32,
    pub clip_near: f32,
    pub clip_far: f32,
    pub children: Vec<SceneNode>,
}

/// Node without usable geometry; only its children are exported
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupNode {
    pub name: String,
    pub children: Vec<SceneNode>,
}

/// A host document after adaptation
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptedDocument {
    /// Materials in document order
    pub materials: Vec<MaterialSource>,
    /// Children of the document root; the root itself is never exported
    pub nodes: Vec<SceneNode>,
}

impl AdaptedDocument {
    pub fn adapt<D: HostDocument>(document: &D) -> Result<Self> {
        let materials = (0..document.material_count())
            .filter_map(|i| document.material_at(i))
            .map(MaterialSource::adapt)
            .collect::<Vec<_>>();

        let nodes = adapt_children(document.root()).context("adapting scene tree")?;

        debug!(
            materials = materials.len(),
            nodes = nodes.iter().map(SceneNode::subtree_len).sum::<usize>(),
            "Adapted document"
        );

        Ok(Self { materials, nodes })
    }
}
