//! scenebridge-scene
//!
//! The boundary between the authoring application and the exporter.
//!
//! The host's scene graph is described by capability traits in [`host`]:
//! a document with ordered materials and a root node, nodes with a type,
//! named parameters, children and an optional polygon core, and node-based
//! materials. [`dump`] implements those traits for the JSON scene dump a
//! host-side script writes. The adapter in [`node`], [`geometry`] and
//! [`material`] turns any host implementation into owned, tagged trees
//! the exporter walks without touching the host again.
//!
//! # Example
//!
//! ```rust,ignore
//! use scenebridge_scene::{SceneDump, AdaptedDocument};
//!
//! let dump = SceneDump::from_path("scene.json")?;
//! let document = AdaptedDocument::adapt(&dump)?;
//!
//! println!("{} top-level nodes", document.nodes.len());
//! ```

pub mod describe;
pub mod dump;
pub mod geometry;
pub mod host;
pub mod material;
pub mod node;
pub mod param;

pub use describe::{outline, SceneSummary};
pub use dump::{
    DumpCore, DumpMaterial, DumpMaterialTag, DumpNode, DumpPolygon, DumpShaderInput,
    DumpShaderNode, SceneDump,
};
pub use geometry::{Geometry, Polygon};
pub use host::{
    HostDocument, HostGeometry, HostMaterial, HostMaterialTag, HostNode, HostNodeType,
    HostShaderNode, ShaderInput,
};
pub use material::{MaterialSource, ShaderNode};
pub use node::{
    AdaptedDocument, CameraNode, GroupNode, LightNode, MaterialTag, MeshNode, SceneNode,
    Transform,
};
pub use param::{FromParam, ParamValue, Params};
