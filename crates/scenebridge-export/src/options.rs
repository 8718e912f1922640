//! Export configuration
//!
//! Defaults are the usual Babylon scene constants. Any subset can be
//! overridden from a YAML file:
//!
//! ```yaml
//! pretty: false
//! parent_mode: hierarchy
//! scene:
//!   clear_color: [0.1, 0.1, 0.1]
//!   gravity: [0.0, -9.81, 0.0]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use scenebridge_core::{Error, Result, Vec3};

/// How mesh parent ids are emitted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParentMode {
    /// Flat mesh list without `parentId`
    #[default]
    Flat,
    /// `parentId` names the nearest exported mesh ancestor
    Hierarchy,
}

/// Scene-level Babylon settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    pub auto_clear: bool,
    pub clear_color: Vec3,
    pub ambient_color: Vec3,
    pub gravity: Vec3,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            auto_clear: true,
            clear_color: Vec3::new(0.3, 0.3, 0.3),
            ambient_color: Vec3::ONE,
            gravity: Vec3::new(0.0, -9.8, 0.0),
        }
    }
}

/// Export options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Pretty-print the written JSON
    pub pretty: bool,
    pub parent_mode: ParentMode,
    pub scene: SceneSettings,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            parent_mode: ParentMode::Flat,
            scene: SceneSettings::default(),
        }
    }
}

impl ExportOptions {
    /// Parse options from YAML; absent keys keep their defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read options from a YAML file
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }
}
