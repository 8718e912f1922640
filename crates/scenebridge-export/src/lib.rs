//! SceneBridge Export Pipeline
//!
//! Converts an adapted scene tree into a Babylon.js `.babylon` scene:
//! - materials: shading-graph channels resolved to texture bindings
//! - meshes: polygons flattened into position / index / normal / UV buffers
//! - lights and cameras: Euler rotations turned into direction vectors
//! - JSON writing of the assembled scene

pub mod babylon;
pub mod camera;
pub mod diagnostics;
pub mod exporter;
pub mod light;
pub mod logging;
pub mod material;
pub mod mesh;
pub mod options;
pub mod orientation;
pub mod walker;

pub use babylon::{
    BabylonCamera, BabylonLight, BabylonMaterial, BabylonMesh, BabylonScene, BabylonTexture,
    SubMesh,
};
pub use diagnostics::Diagnostics;
pub use exporter::{ExportOutcome, ExportStats, SceneExporter};
pub use light::LightKind;
pub use mesh::FlatMesh;
pub use options::{ExportOptions, ParentMode, SceneSettings};
pub use walker::{SceneWalker, TextureOverride, WalkOutput};
