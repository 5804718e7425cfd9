//! Scene file parsing
//!
//! [`SceneParser`] turns a JSON scene document into a [`ParseResult`]: global
//! shading coefficients, the camera, the light list and a [`SceneGraph`]
//! rooted at the group named `root`.
//!
//! Parsing fails fast. The first violation aborts the whole parse and no
//! partially built graph is ever returned.
//!
//! ```rust,no_run
//! use scenefile::parser::SceneParser;
//!
//! let scene = SceneParser::new().parse_file("scenes/demo/scene.json")?;
//! println!("{} lights", scene.lights().len());
//! # Ok::<(), scenefile::SceneError>(())
//! ```

pub mod builder;
pub mod entities;
pub mod schema;
pub mod values;

#[cfg(test)]
mod tests;

use std::fs;
use std::path::Path;

use serde_json::Value;

use self::builder::GraphBuilder;
use self::entities::AssetPaths;
use self::schema::ROOT;
use self::values::field_at;
use crate::config::ParserConfig;
use crate::error::{Result, SceneError};
use crate::foundation::collections::NodeHandle;
use crate::scene::{CameraData, GlobalData, LightData, SceneGraph, SceneNode};

/// Location used for errors on the document root itself
const DOCUMENT: &str = "document";

/// Sections holding named groups, in processing order
const GROUP_SECTIONS: [&str; 2] = ["templateGroups", "groups"];

/// Fully parsed scene
#[derive(Debug)]
pub struct ParseResult {
    name: Option<String>,
    global_data: GlobalData,
    camera_data: CameraData,
    lights: Vec<LightData>,
    graph: SceneGraph,
    root: NodeHandle,
}

impl ParseResult {
    /// Scene name, if the document gives one
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Global shading coefficients
    pub fn global_data(&self) -> &GlobalData {
        &self.global_data
    }

    /// Camera
    pub fn camera_data(&self) -> &CameraData {
        &self.camera_data
    }

    /// Lights in depth-first document order
    pub fn lights(&self) -> &[LightData] {
        &self.lights
    }

    /// Handle of the root node
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    /// The root node
    pub fn root_node(&self) -> &SceneNode {
        &self.graph[self.root]
    }

    /// Any node of the graph
    pub fn node(&self, handle: NodeHandle) -> Option<&SceneNode> {
        self.graph.get(handle)
    }

    /// The whole graph
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Handle of a named group
    pub fn lookup(&self, name: &str) -> Option<NodeHandle> {
        self.graph.lookup(name)
    }
}

/// Scene document parser
#[derive(Debug, Clone, Default)]
pub struct SceneParser {
    config: ParserConfig,
}

impl SceneParser {
    /// Parser with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser with an explicit configuration
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Read and parse a scene file
    ///
    /// Asset file names in the scene resolve relative to the file's location
    /// unless the configuration sets an asset root.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<ParseResult> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| SceneError::malformed_with(format!("could not read {}", path.display()), e))?;
        let scene = self.parse_str(&text, path)?;
        log::info!("Finished reading {}", path.display());
        Ok(scene)
    }

    /// Parse a scene held in memory; `scene_path` is only used to resolve
    /// asset file names
    pub fn parse_str(&self, text: &str, scene_path: impl AsRef<Path>) -> Result<ParseResult> {
        let document: Value = serde_json::from_str(text)
            .map_err(|e| SceneError::malformed_with("scene document is not valid JSON", e))?;
        self.parse_value(&document, scene_path)
    }

    /// Parse an already decoded document
    pub fn parse_value(&self, document: &Value, scene_path: impl AsRef<Path>) -> Result<ParseResult> {
        let root = document.as_object().ok_or_else(|| {
            SceneError::malformed(format!(
                "scene document root must be an object, found {}",
                values::describe(document)
            ))
        })?;
        let fields = ROOT.validate(root, DOCUMENT)?;

        let name = fields.text("name")?.map(str::to_string);
        let global_data = entities::parse_global_data(fields.require("globalData")?, "globalData")?;
        let camera_data = entities::parse_camera_data(fields.require("cameraData")?, "cameraData")?;

        let assets = match &self.config.asset_root {
            Some(root) => AssetPaths::rooted_at(root),
            None => AssetPaths::for_scene(scene_path.as_ref()),
        };
        let mut builder = GraphBuilder::new(assets, self.config.max_depth);

        for section in GROUP_SECTIONS {
            let Some(groups) = fields.get(section) else {
                continue;
            };
            let groups = values::object(groups, section)?;
            log::debug!("Reading {} entries of {}", groups.len(), section);
            for (key, group) in groups {
                builder.add_group(key, group, &field_at(section, key))?;
            }
        }

        let built = builder.finish()?;
        Ok(ParseResult {
            name,
            global_data,
            camera_data,
            lights: built.lights,
            graph: built.graph,
            root: built.root,
        })
    }
}

/// Parse a scene file with the default configuration
pub fn parse_scene_file(path: impl AsRef<Path>) -> Result<ParseResult> {
    SceneParser::new().parse_file(path)
}

/// Parse an in-memory scene with the default configuration
pub fn parse_scene_str(text: &str, scene_path: impl AsRef<Path>) -> Result<ParseResult> {
    SceneParser::new().parse_str(text, scene_path)
}
