//! # Scenefile
//!
//! Parser for JSON scene-description files. A scene document is turned into
//! a strongly typed scene: global shading coefficients, a camera, a list of
//! lights, and a graph of nodes carrying transformations and primitives.
//!
//! Named groups can be reused as children of other groups ("master"
//! references). Shared groups are stored once, so the result is a DAG rather
//! than a tree.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scenefile::prelude::*;
//!
//! fn main() -> Result<(), SceneError> {
//!     let scene = SceneParser::new().parse_file("scenes/demo/scene.json")?;
//!
//!     scene.graph().walk(scene.root(), |visit| {
//!         println!("{:indent$}{} primitives", "", visit.node.primitives.len(), indent = visit.depth * 2);
//!     })?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::cast_possible_truncation)]

pub mod config;
pub mod error;
pub mod foundation;
pub mod parser;
pub mod scene;

pub use config::{Config, ConfigError, ParserConfig};
pub use error::{Result, SceneError};
pub use foundation::collections::NodeHandle;
pub use parser::{parse_scene_file, parse_scene_str, ParseResult, SceneParser};

/// Common imports for scene consumers
pub mod prelude {
    pub use crate::{
        Config, ParserConfig,
        NodeHandle, ParseResult, SceneError, SceneParser,
        foundation::math::{Vec3, Vec4, Mat4},
        scene::{
            CameraData, GlobalData, LightData, LightType, SceneColor,
            Material, FileMap, Primitive, PrimitiveKind, Transformation,
            SceneGraph, SceneNode, Visit,
        },
    };
}
