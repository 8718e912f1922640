//! Material graph resolution
//!
//! Babylon's standard material has fixed texture slots while the authoring
//! tool uses a node graph. Only the simple case is recovered: an image node
//! wired directly into one of six channel inputs of the material's root node.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use scenebridge_core::{Error, Result, Vec2};
use scenebridge_scene::{MaterialSource, Params};

use crate::babylon::{BabylonMaterial, BabylonTexture};
use crate::diagnostics::Diagnostics;

/// Babylon texture slot of a standard material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Diffuse,
    Specular,
    Emissive,
    Bump,
    Reflection,
    Opacity,
}

/// Root-node channel names and the slots they feed
pub const CHANNEL_MAPPINGS: [(&str, TextureSlot); 6] = [
    ("diffColor", TextureSlot::Diffuse),
    ("specColor", TextureSlot::Specular),
    ("emisColor", TextureSlot::Emissive),
    ("bump", TextureSlot::Bump),
    ("reflColor", TextureSlot::Reflection),
    ("transColor", TextureSlot::Opacity),
];

impl TextureSlot {
    /// Babylon field name of the slot
    pub fn field_name(self) -> &'static str {
        match self {
            TextureSlot::Diffuse => "diffuseTexture",
            TextureSlot::Specular => "specularTexture",
            TextureSlot::Emissive => "emissiveTexture",
            TextureSlot::Bump => "bumpTexture",
            TextureSlot::Reflection => "reflectionTexture",
            TextureSlot::Opacity => "opacityTexture",
        }
    }

    fn slot_mut(self, material: &mut BabylonMaterial) -> &mut Option<BabylonTexture> {
        match self {
            TextureSlot::Diffuse => &mut material.diffuse_texture,
            TextureSlot::Specular => &mut material.specular_texture,
            TextureSlot::Emissive => &mut material.emissive_texture,
            TextureSlot::Bump => &mut material.bump_texture,
            TextureSlot::Reflection => &mut material.reflection_texture,
            TextureSlot::Opacity => &mut material.opacity_texture,
        }
    }
}

/// Parameters of every image node wired into the root node, keyed by the
/// input's channel name. Inputs are visited in order, so a later input with
/// the same channel name replaces an earlier one.
pub fn channel_textures(material: &MaterialSource, diagnostics: &mut Diagnostics) -> BTreeMap<String, Params> {
    let mut textures = BTreeMap::new();

    for input in &material.root.inputs {
        let Some(id) = input.connected_with else {
            continue;
        };
        let Some(node) = material.node_with_id(id) else {
            diagnostics.record(Error::unresolvable(format!(
                "node #{id} feeding '{}' of material '{}'",
                input.name, material.name
            )));
            continue;
        };
        if !node.is_image() {
            trace!(channel = %input.name, kind = %node.kind, "Skipping non-image node");
            continue;
        }
        textures.insert(input.name.clone(), node.parameters.clone());
    }

    textures
}

/// Texture file name: the last `/`-separated segment of the path
pub fn texture_file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Build a texture binding from an image node's parameters.
///
/// Returns `Ok(None)` when the node names no texture file.
pub fn texture_binding(owner: &str, params: &Params) -> Result<Option<BabylonTexture>> {
    let Some(path) = params.optional::<String>(owner, "texture")? else {
        return Ok(None);
    };

    let offset: Vec2 = params.optional(owner, "position")?.unwrap_or(Vec2::ZERO);
    let scale: Vec2 = params.optional(owner, "scale")?.unwrap_or(Vec2::ONE);

    let mut texture = BabylonTexture::new(texture_file_name(&path));
    texture.u_offset = offset.x;
    texture.v_offset = offset.y;
    texture.u_scale = scale.x;
    texture.v_scale = scale.y;
    texture.wrap_u = params.is_truthy("tileU");
    texture.wrap_v = params.is_truthy("tileV");
    Ok(Some(texture))
}

/// Resolve a host material into a Babylon material
pub fn resolve_material(material: &MaterialSource, diagnostics: &mut Diagnostics) -> Result<BabylonMaterial> {
    let mut resolved = BabylonMaterial::new(
        material.name.clone(),
        material.color,
        material.specular,
        material.shininess,
        material.emission,
    );

    let textures = channel_textures(material, diagnostics);
    for (channel, slot) in CHANNEL_MAPPINGS {
        let Some(params) = textures.get(channel) else {
            continue;
        };
        let owner = format!("{}.{channel}", material.name);
        match texture_binding(&owner, params)? {
            Some(texture) => *slot.slot_mut(&mut resolved) = Some(texture),
            None => diagnostics.record(Error::unresolvable(format!(
                "image node on '{owner}' has no texture file"
            ))),
        }
    }

    debug!(
        material = %resolved.name,
        textures = resolved.texture_count(),
        "Resolved material"
    );
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenebridge_core::{ErrorKind, Vec3};
    use scenebridge_scene::{ShaderInput, ShaderNode};

    fn input(name: &str, connected_with: Option<u32>) -> ShaderInput {
        ShaderInput {
            name: name.to_string(),
            connected_with,
        }
    }

    fn node(id: u32, kind: &str, parameters: Params) -> ShaderNode {
        ShaderNode {
            id,
            kind: kind.to_string(),
            inputs: vec![],
            parameters,
        }
    }

    fn material(inputs: Vec<ShaderInput>, nodes: Vec<ShaderNode>) -> MaterialSource {
        let mut root = node(0, "material", Params::new());
        root.inputs = inputs;
        MaterialSource {
            name: "Brick".into(),
            color: Vec3::new(0.8, 0.3, 0.2),
            specular: Vec3::new(0.1, 0.1, 0.1),
            emission: Vec3::ZERO,
            shininess: 12.0,
            root,
            nodes: nodes.into_iter().map(|n| (n.id, n)).collect(),
        }
    }

    fn image(path: &str) -> Params {
        Params::new()
            .with("texture", path)
            .with("position", Vec3::new(0.25, 0.5, 0.0))
            .with("scale", Vec3::new(2.0, 3.0, 1.0))
            .with("tileU", true)
            .with("tileV", 0i64)
    }

    #[test]
    fn test_file_name() {
        assert_eq!(texture_file_name("/Users/me/textures/brick.png"), "brick.png");
        assert_eq!(texture_file_name("brick.png"), "brick.png");
        assert_eq!(texture_file_name("dir/"), "");
    }

    #[test]
    fn test_colors_and_constants() {
        let mut diagnostics = Diagnostics::new();
        let resolved = resolve_material(&material(vec![], vec![]), &mut diagnostics).unwrap();

        assert_eq!(resolved.id, "Brick");
        assert_eq!(resolved.ambient, resolved.diffuse);
        assert_eq!(resolved.diffuse, Vec3::new(0.8, 0.3, 0.2));
        assert_eq!(resolved.specular_power, 12.0);
        assert_eq!(resolved.texture_count(), 0);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_channels_map_to_slots() {
        let source = material(
            vec![
                input("diffColor", Some(1)),
                input("bump", Some(2)),
                input("transColor", Some(3)),
                input("specColor", None),
            ],
            vec![
                node(1, "image", image("/tex/brick_diffuse.png")),
                node(2, "image", image("/tex/brick_normal.png")),
                node(3, "image", image("mask.png")),
            ],
        );

        let mut diagnostics = Diagnostics::new();
        let resolved = resolve_material(&source, &mut diagnostics).unwrap();

        let diffuse = resolved.diffuse_texture.as_ref().unwrap();
        assert_eq!(diffuse.name, "brick_diffuse.png");
        assert_eq!(diffuse.u_offset, 0.25);
        assert_eq!(diffuse.v_offset, 0.5);
        assert_eq!(diffuse.u_scale, 2.0);
        assert_eq!(diffuse.v_scale, 3.0);
        assert!(diffuse.wrap_u);
        assert!(!diffuse.wrap_v);

        assert_eq!(resolved.bump_texture.as_ref().unwrap().name, "brick_normal.png");
        assert_eq!(resolved.opacity_texture.as_ref().unwrap().name, "mask.png");
        assert!(resolved.specular_texture.is_none());
        assert_eq!(resolved.texture_count(), 3);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_non_image_and_unknown_channels_are_skipped() {
        let source = material(
            vec![input("diffColor", Some(1)), input("glowColor", Some(2))],
            vec![
                node(1, "noise", image("noise.png")),
                node(2, "image", image("glow.png")),
            ],
        );

        let mut diagnostics = Diagnostics::new();
        let resolved = resolve_material(&source, &mut diagnostics).unwrap();
        assert_eq!(resolved.texture_count(), 0);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_dangling_node_is_recorded() {
        let source = material(vec![input("emisColor", Some(42))], vec![]);

        let mut diagnostics = Diagnostics::new();
        let resolved = resolve_material(&source, &mut diagnostics).unwrap();
        assert!(resolved.emissive_texture.is_none());
        assert_eq!(diagnostics.count(ErrorKind::UnresolvableReference), 1);
    }

    #[test]
    fn test_image_without_file() {
        let source = material(
            vec![input("reflColor", Some(5))],
            vec![node(5, "image", Params::new().with("tileU", true))],
        );

        let mut diagnostics = Diagnostics::new();
        let resolved = resolve_material(&source, &mut diagnostics).unwrap();
        assert!(resolved.reflection_texture.is_none());
        assert_eq!(diagnostics.count(ErrorKind::UnresolvableReference), 1);
    }

    #[test]
    fn test_later_input_wins() {
        let source = material(
            vec![input("diffColor", Some(1)), input("diffColor", Some(2))],
            vec![node(1, "image", image("first.png")), node(2, "image", image("second.png"))],
        );

        let mut diagnostics = Diagnostics::new();
        let textures = channel_textures(&source, &mut diagnostics);
        assert_eq!(textures.len(), 1);
        assert_eq!(
            textures["diffColor"].get("texture"),
            Some(&scenebridge_scene::ParamValue::Text("second.png".into()))
        );
    }
}
