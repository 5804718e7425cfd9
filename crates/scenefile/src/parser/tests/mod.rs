//! Whole-document scenario tests


use serde_json::{json, Value};

use super::{ParseResult, SceneParser};
use crate::error::Result;

/// Scene path the in-memory documents pretend to live at
pub(super) const SCENE_PATH: &str = "/scenes/demo/scene.json";

/// Minimal valid document with the given `groups` section
pub(super) fn document(groups: Value) -> Value {
    json!({
        "globalData": {"ambientCoeff": 0.5, "diffuseCoeff": 0.5, "specularCoeff": 0.5},
        "cameraData": {"position": [0, 0, 5], "up": [0, 1, 0], "heightAngle": 45, "look": [0, 0, -1]},
        "groups": groups
    })
}

/// Parse a document with the default configuration
pub(super) fn parse(document: &Value) -> Result<ParseResult> {
    SceneParser::new().parse_value(document, SCENE_PATH)
}
