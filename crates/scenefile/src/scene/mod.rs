//! Scene data model
//!
//! Plain data produced by the parser and consumed by the renderer: global
//! shading coefficients, the camera, lights, and the node graph with its
//! transformations and primitives.

pub mod data;
pub mod lighting;
pub mod primitive;
pub mod transform;
pub mod graph;

pub use data::{CameraData, GlobalData, SceneColor};
pub use lighting::{LightData, LightType};
pub use primitive::{FileMap, Material, Primitive, PrimitiveKind};
pub use transform::Transformation;
pub use graph::{SceneGraph, SceneNode, Visit};
