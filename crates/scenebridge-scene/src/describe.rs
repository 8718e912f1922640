//! Text outline and counts of a scene tree

use std::fmt::{self, Write};

use serde::Serialize;

use crate::node::{AdaptedDocument, SceneNode};

/// Render the tree below the document root, one `+ name (kind)` line per
/// node, indented two spaces per level.
pub fn outline(nodes: &[SceneNode]) -> String {
    let mut out = String::from("root\n");
    for node in nodes {
        write_node(&mut out, node, 0);
    }
    out
}

fn write_node(out: &mut String, node: &SceneNode, level: usize) {
    let _ = writeln!(
        out,
        "{:indent$}+ {} ({})",
        "",
        node.name(),
        node.kind_name(),
        indent = level * 2
    );
    for child in node.children() {
        write_node(out, child, level + 1);
    }
}

/// Element counts of an adapted document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SceneSummary {
    pub materials: usize,
    pub meshes: usize,
    pub lights: usize,
    pub cameras: usize,
    pub groups: usize,
    pub vertices: usize,
    pub triangles: usize,
}

impl SceneSummary {
    pub fn of(document: &AdaptedDocument) -> Self {
        let mut summary = Self {
            materials: document.materials.len(),
            ..Self::default()
        };
        for node in &document.nodes {
            summary.count(node);
        }
        summary
    }

    fn count(&mut self, node: &SceneNode) {
        match node {
            SceneNode::Mesh(mesh) => {
                self.meshes += 1;
                self.vertices += mesh.geometry.vertex_count();
                self.triangles += mesh.geometry.triangle_count();
            }
            SceneNode::Light(_) => self.lights += 1,
            SceneNode::Camera(_) => self.cameras += 1,
            SceneNode::Group(_) => self.groups += 1,
        }
        for child in node.children() {
            self.count(child);
        }
    }
}

impl fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Materials: {}", self.materials)?;
        writeln!(f, "Meshes:    {}", self.meshes)?;
        writeln!(f, "Lights:    {}", self.lights)?;
        writeln!(f, "Cameras:   {}", self.cameras)?;
        writeln!(f, "Groups:    {}", self.groups)?;
        writeln!(f, "Vertices:  {}", self.vertices)?;
        write!(f, "Triangles: {}", self.triangles)
    }
}
