//! Babylon.js scene records
//!
//! Plain serializable structures mirroring the `.babylon` JSON layout.
//! Field order follows the format so the written files diff cleanly.

use serde::{Serialize, Serializer};

use scenebridge_core::Vec3;

use crate::light::LightKind;
use crate::mesh::FlatMesh;

/// Babylon scene root
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BabylonScene {
    pub auto_clear: bool,
    pub clear_color: Vec3,
    pub ambient_color: Vec3,
    pub gravity: Vec3,
    pub cameras: Vec<BabylonCamera>,
    /// Id of the first camera
    pub active_camera: String,
    pub lights: Vec<BabylonLight>,
    pub materials: Vec<BabylonMaterial>,
    pub meshes: Vec<BabylonMesh>,
    pub multi_materials: Vec<serde_json::Value>,
    pub shadow_generators: Vec<serde_json::Value>,
    pub skeletons: Vec<serde_json::Value>,
}

/// Babylon mesh
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BabylonMesh {
    pub name: String,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Id of the assigned material, empty when the mesh has none
    pub material_id: String,
    pub position: Vec3,
    /// Radians, already remapped to Babylon axes
    pub rotation: Vec3,
    pub scaling: Vec3,
    pub is_visible: bool,
    pub is_enabled: bool,
    pub check_collisions: bool,
    pub billboard_mode: u32,
    pub receive_shadows: bool,
    #[serde(flatten)]
    pub geometry: FlatMesh,
    pub sub_meshes: Vec<SubMesh>,
}

/// Index/vertex range drawn with one material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubMesh {
    pub material_index: u32,
    pub vertices_start: u32,
    pub vertices_count: u32,
    pub index_start: u32,
    pub index_count: u32,
}

/// Babylon standard material
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BabylonMaterial {
    pub name: String,
    pub id: String,
    pub tags: String,
    pub disable_depth_write: bool,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub specular_power: f32,
    pub emissive: Vec3,
    pub alpha: f32,
    pub back_face_culling: bool,
    pub wireframe: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diffuse_texture: Option<BabylonTexture>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specular_texture: Option<BabylonTexture>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emissive_texture: Option<BabylonTexture>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bump_texture: Option<BabylonTexture>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reflection_texture: Option<BabylonTexture>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity_texture: Option<BabylonTexture>,
}

impl BabylonMaterial {
    /// Material with the given colors and no textures
    pub fn new(name: impl Into<String>, diffuse: Vec3, specular: Vec3, specular_power: f32, emissive: Vec3) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            tags: String::new(),
            disable_depth_write: false,
            ambient: diffuse,
            diffuse,
            specular,
            specular_power,
            emissive,
            alpha: 1.0,
            back_face_culling: true,
            wireframe: false,
            diffuse_texture: None,
            specular_texture: None,
            emissive_texture: None,
            bump_texture: None,
            reflection_texture: None,
            opacity_texture: None,
        }
    }

    /// Number of bound texture channels
    pub fn texture_count(&self) -> usize {
        [
            &self.diffuse_texture,
            &self.specular_texture,
            &self.emissive_texture,
            &self.bump_texture,
            &self.reflection_texture,
            &self.opacity_texture,
        ]
        .iter()
        .filter(|t| t.is_some())
        .count()
    }
}

/// Babylon texture binding
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BabylonTexture {
    /// File name without directories
    pub name: String,
    pub level: f32,
    pub has_alpha: bool,
    #[serde(rename = "getAlphaFromRGB")]
    pub get_alpha_from_rgb: bool,
    /// 0 explicit, 1 spherical, 2 planar, 3 cubic, 4 projection, 5 skybox
    pub coordinates_mode: u32,
    pub u_offset: f32,
    pub v_offset: f32,
    pub u_scale: f32,
    pub v_scale: f32,
    pub u_ang: f32,
    pub v_ang: f32,
    pub w_ang: f32,
    pub wrap_u: bool,
    pub wrap_v: bool,
    pub coordinates_index: u32,
    pub animations: Vec<serde_json::Value>,
    pub base64_string: String,
}

impl BabylonTexture {
    /// Texture with identity transform and no wrapping
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: 1.0,
            has_alpha: false,
            get_alpha_from_rgb: false,
            coordinates_mode: 0,
            u_offset: 0.0,
            v_offset: 0.0,
            u_scale: 1.0,
            v_scale: 1.0,
            u_ang: 0.0,
            v_ang: 0.0,
            w_ang: 0.0,
            wrap_u: false,
            wrap_v: false,
            coordinates_index: 0,
            animations: Vec::new(),
            base64_string: String::new(),
        }
    }
}

/// Babylon light
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BabylonLight {
    pub name: String,
    pub id: String,
    pub tags: String,
    #[serde(rename = "type")]
    pub kind: LightKind,
    pub position: Vec3,
    pub direction: Vec3,
    /// Spot cone angle in radians, 0 for other kinds
    pub angle: f32,
    pub exponent: f32,
    pub ground_color: Vec3,
    pub intensity: f32,
    pub range: f32,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub excluded_meshes_ids: Vec<String>,
    pub included_only_meshes_ids: Vec<String>,
    pub animations: Vec<serde_json::Value>,
    pub auto_animate: bool,
    pub auto_animate_from: u32,
    pub auto_animate_to: u32,
    pub auto_animate_loop: bool,
    pub auto_animate_speed: f32,
}

/// Babylon free camera
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BabylonCamera {
    pub name: String,
    pub id: String,
    pub position: Vec3,
    pub target: Vec3,
    /// Radians
    pub fov: f32,
    pub min_z: f32,
    pub max_z: f32,
    pub speed: f32,
    pub inertia: f32,
    pub check_collisions: bool,
    pub apply_gravity: bool,
    pub ellipsoid: Vec3,
}

/// Serialize `[[T; N]]` as one flat array, the layout Babylon expects for
/// vertex buffers
#[allow(clippy::ptr_arg)]
pub(crate) fn flatten_seq<S, T, const N: usize>(items: &Vec<[T; N]>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    serializer.collect_seq(items.iter().flatten())
}
