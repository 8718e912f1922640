//! Scene tree traversal
//!
//! Visits the adapted tree depth-first in pre-order and converts every node
//! into its Babylon record. Groups produce nothing themselves but their
//! children are still visited. All output is owned by the returned
//! [`WalkOutput`].

use tracing::{debug, trace};

use scenebridge_core::{Error, Result, ResultExt, Vec2, Vec3};
use scenebridge_scene::{MaterialTag, MeshNode, SceneNode};

use crate::babylon::{BabylonCamera, BabylonLight, BabylonMaterial, BabylonMesh};
use crate::camera::build_camera;
use crate::diagnostics::Diagnostics;
use crate::light::build_light;
use crate::mesh::build_mesh;
use crate::options::ParentMode;

/// Diffuse texture transform a mesh's material tag imposes on its material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureOverride {
    /// Index of the material in the document
    pub material: usize,
    pub uv_offset: Option<Vec2>,
    pub uv_scale: Option<Vec2>,
    pub shading_rotation: Option<Vec3>,
}

impl TextureOverride {
    fn from_tag(material: usize, tag: &MaterialTag) -> Option<Self> {
        if tag.uv_offset.is_none() && tag.uv_scale.is_none() && tag.shading_rotation.is_none() {
            return None;
        }
        Some(Self {
            material,
            uv_offset: tag.uv_offset,
            uv_scale: tag.uv_scale,
            shading_rotation: tag.shading_rotation,
        })
    }

    /// Overwrite the diffuse texture transform with the parts this override
    /// carries. Materials without a diffuse texture are left alone.
    pub fn apply(&self, material: &mut BabylonMaterial) -> bool {
        let Some(texture) = material.diffuse_texture.as_mut() else {
            return false;
        };
        if let Some(offset) = self.uv_offset {
            texture.u_offset = offset.x;
            texture.v_offset = offset.y;
        }
        if let Some(scale) = self.uv_scale {
            texture.u_scale = scale.x;
            texture.v_scale = scale.y;
        }
        if let Some(rotation) = self.shading_rotation {
            texture.u_ang = rotation.x;
            texture.v_ang = rotation.y;
            texture.w_ang = rotation.z;
        }
        true
    }
}

/// Everything produced by one traversal
#[derive(Debug, Default)]
pub struct WalkOutput {
    pub meshes: Vec<BabylonMesh>,
    pub lights: Vec<BabylonLight>,
    pub cameras: Vec<BabylonCamera>,
    /// Material tag overrides in visit order
    pub texture_overrides: Vec<TextureOverride>,
    pub diagnostics: Diagnostics,
}

/// Depth-first converter over resolved materials
pub struct SceneWalker<'a> {
    materials: &'a [BabylonMaterial],
    parent_mode: ParentMode,
}

impl<'a> SceneWalker<'a> {
    pub fn new(materials: &'a [BabylonMaterial]) -> Self {
        Self {
            materials,
            parent_mode: ParentMode::default(),
        }
    }

    pub fn with_parent_mode(mut self, parent_mode: ParentMode) -> Self {
        self.parent_mode = parent_mode;
        self
    }

    /// Convert the given root children and their subtrees
    pub fn walk(&self, nodes: &[SceneNode]) -> Result<WalkOutput> {
        let mut output = WalkOutput::default();
        for node in nodes {
            self.visit(node, None, &mut output)?;
        }

        debug!(
            meshes = output.meshes.len(),
            lights = output.lights.len(),
            cameras = output.cameras.len(),
            "Walked scene tree"
        );
        Ok(output)
    }

    /// `parent` is the index into `output.meshes` of the nearest emitted
    /// mesh ancestor
    fn visit(&self, node: &SceneNode, parent: Option<usize>, output: &mut WalkOutput) -> Result<()> {
        let child_parent = match node {
            SceneNode::Mesh(mesh) => {
                let parent_id = match self.parent_mode {
                    ParentMode::Flat => None,
                    ParentMode::Hierarchy => parent.map(|i| output.meshes[i].id.clone()),
                };
                let material_id = self.assign_material(mesh, output);
                let converted = build_mesh(mesh, material_id, parent_id, &mut output.diagnostics)
                    .with_context(|| format!("converting mesh '{}'", mesh.name))?;
                output.meshes.push(converted);
                Some(output.meshes.len() - 1)
            }
            SceneNode::Light(light) => {
                let converted =
                    build_light(light).with_context(|| format!("converting light '{}'", light.name))?;
                output.lights.push(converted);
                parent
            }
            SceneNode::Camera(camera) => {
                output.cameras.push(build_camera(camera));
                parent
            }
            SceneNode::Group(group) => {
                trace!(group = %group.name, "Descending into group");
                parent
            }
        };

        for child in node.children() {
            self.visit(child, child_parent, output)?;
        }
        Ok(())
    }

    /// Material id for a mesh, recording any texture override its tag carries
    fn assign_material(&self, mesh: &MeshNode, output: &mut WalkOutput) -> String {
        let Some(tag) = &mesh.material_tag else {
            return String::new();
        };
        let Some(index) = tag.material else {
            return String::new();
        };
        let Some(material) = self.materials.get(index) else {
            output.diagnostics.record(Error::unresolvable(format!(
                "material #{index} of mesh '{}'",
                mesh.name
            )));
            return String::new();
        };

        if let Some(texture_override) = TextureOverride::from_tag(index, tag) {
            output.texture_overrides.push(texture_override);
        }
        material.id.clone()
    }
}
