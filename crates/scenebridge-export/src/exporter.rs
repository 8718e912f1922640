//! Babylon scene assembly and writing

use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use tracing::info;

use scenebridge_core::{Error, Result, ResultExt};
use scenebridge_scene::{AdaptedDocument, HostDocument};

use crate::babylon::{BabylonMaterial, BabylonScene};
use crate::diagnostics::Diagnostics;
use crate::logging::instrument_stage;
use crate::material::resolve_material;
use crate::options::ExportOptions;
use crate::walker::SceneWalker;

/// Counts reported after an export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportStats {
    pub materials: usize,
    pub textures: usize,
    pub meshes: usize,
    pub lights: usize,
    pub cameras: usize,
    pub vertices: usize,
    pub triangles: usize,
    pub diagnostics: usize,
    pub elapsed_ms: u64,
}

/// A built scene with everything recovered along the way
#[derive(Debug)]
pub struct ExportOutcome {
    pub scene: BabylonScene,
    pub diagnostics: Diagnostics,
    pub stats: ExportStats,
}

/// Babylon scene exporter
pub struct SceneExporter {
    options: ExportOptions,
}

impl SceneExporter {
    /// Create new exporter with default options
    pub fn new() -> Self {
        Self {
            options: ExportOptions::default(),
        }
    }

    /// Create exporter with custom options
    pub fn with_options(options: ExportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Adapt a host document and build its scene
    pub fn export_document<D: HostDocument>(&self, document: &D) -> Result<ExportOutcome> {
        let adapted = instrument_stage("adapt", || AdaptedDocument::adapt(document))?;
        self.build_scene(&adapted)
    }

    /// Build the Babylon scene for an adapted document.
    ///
    /// Fails when the scene has no camera, a mesh has no polygons or a
    /// required node parameter is unusable.
    pub fn build_scene(&self, document: &AdaptedDocument) -> Result<ExportOutcome> {
        let start = Instant::now();
        let mut diagnostics = Diagnostics::new();

        let mut materials = instrument_stage("materials", || {
            document
                .materials
                .iter()
                .map(|material| {
                    resolve_material(material, &mut diagnostics)
                        .with_context(|| format!("resolving material '{}'", material.name))
                })
                .collect::<Result<Vec<_>>>()
        })?;
        record_duplicate_ids(&materials, &mut diagnostics);

        let walker = SceneWalker::new(&materials).with_parent_mode(self.options.parent_mode);
        let output = instrument_stage("walk", || walker.walk(&document.nodes))?;
        diagnostics.merge(output.diagnostics);

        // Last mesh wins: materials are shared between meshes
        for texture_override in &output.texture_overrides {
            if let Some(material) = materials.get_mut(texture_override.material) {
                texture_override.apply(material);
            }
        }

        let Some(active_camera) = output.cameras.first().map(|camera| camera.id.clone()) else {
            return Err(Error::precondition("scene has no camera"));
        };

        let stats = ExportStats {
            materials: materials.len(),
            textures: materials.iter().map(BabylonMaterial::texture_count).sum(),
            meshes: output.meshes.len(),
            lights: output.lights.len(),
            cameras: output.cameras.len(),
            vertices: output.meshes.iter().map(|m| m.geometry.vertex_count()).sum(),
            triangles: output.meshes.iter().map(|m| m.geometry.triangle_count()).sum(),
            diagnostics: diagnostics.len(),
            elapsed_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        };

        let settings = &self.options.scene;
        let scene = BabylonScene {
            auto_clear: settings.auto_clear,
            clear_color: settings.clear_color,
            ambient_color: settings.ambient_color,
            gravity: settings.gravity,
            cameras: output.cameras,
            active_camera,
            lights: output.lights,
            materials,
            meshes: output.meshes,
            multi_materials: Vec::new(),
            shadow_generators: Vec::new(),
            skeletons: Vec::new(),
        };

        info!(
            meshes = stats.meshes,
            lights = stats.lights,
            cameras = stats.cameras,
            materials = stats.materials,
            diagnostics = stats.diagnostics,
            elapsed_ms = %stats.elapsed_ms,
            "Built Babylon scene"
        );

        Ok(ExportOutcome {
            scene,
            diagnostics,
            stats,
        })
    }

    /// Serialize a scene using the configured formatting
    pub fn to_json_string(&self, scene: &BabylonScene) -> Result<String> {
        let json = if self.options.pretty {
            serde_json::to_string_pretty(scene)?
        } else {
            serde_json::to_string(scene)?
        };
        Ok(json)
    }

    /// Write a scene to `output_path`
    pub fn write_scene(&self, scene: &BabylonScene, output_path: impl AsRef<Path>) -> Result<()> {
        let output_path = output_path.as_ref();
        instrument_stage("write", || -> Result<()> {
            let file = File::create(output_path)?;
            let writer = BufWriter::new(file);

            if self.options.pretty {
                serde_json::to_writer_pretty(writer, scene)?;
            } else {
                serde_json::to_writer(writer, scene)?;
            }
            Ok(())
        })
        .with_context(|| format!("writing {}", output_path.display()))?;

        info!(path = %output_path.display(), "Wrote scene");
        Ok(())
    }
}

impl Default for SceneExporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Meshes reference materials by id, so equal names are ambiguous
fn record_duplicate_ids(materials: &[BabylonMaterial], diagnostics: &mut Diagnostics) {
    let mut seen = BTreeSet::new();
    for material in materials {
        if !seen.insert(material.id.as_str()) {
            diagnostics.record(Error::unresolvable(format!(
                "material id '{}' is not unique; meshes bind the first",
                material.id
            )));
        }
    }
}
