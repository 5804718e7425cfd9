//! Light definitions

use std::fmt;

use serde::{Deserialize, Serialize};

use super::data::SceneColor;
use crate::foundation::math::Vec3;

/// Light types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightType {
    /// Directional light (like sunlight)
    Directional,
    /// Point light (like a lightbulb)
    Point,
    /// Spot light (like a flashlight)
    Spot,
    /// Rectangular area light
    Area,
}

impl LightType {
    /// Names accepted in scene files, in declaration order
    pub const NAMES: [&'static str; 4] = ["directional", "point", "spot", "area"];

    /// Look up a light type by its scene-file name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "directional" => Some(Self::Directional),
            "point" => Some(Self::Point),
            "spot" => Some(Self::Spot),
            "area" => Some(Self::Area),
            _ => None,
        }
    }

    /// Scene-file name of this light type
    pub const fn name(self) -> &'static str {
        match self {
            Self::Directional => "directional",
            Self::Point => "point",
            Self::Spot => "spot",
            Self::Area => "area",
        }
    }

    /// Whether a light of this type has a meaningful position
    pub const fn has_position(self) -> bool {
        !matches!(self, Self::Directional)
    }

    /// Whether a light of this type has a meaningful direction
    pub const fn has_direction(self) -> bool {
        !matches!(self, Self::Point)
    }
}

impl fmt::Display for LightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Light source
///
/// Fields that do not apply to `light_type` keep their defaults; the parser
/// rejects documents that try to set them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightData {
    /// Light identifier
    pub id: i32,
    /// Light type
    pub light_type: LightType,
    /// Light color
    pub color: SceneColor,
    /// Attenuation coefficients (constant, linear, quadratic)
    pub function: Vec3,
    /// Light position (unused by directional lights)
    pub position: Vec3,
    /// Light direction (unused by point lights)
    pub direction: Vec3,
    /// Penumbra angle in radians (spot only)
    pub penumbra: f32,
    /// Cone angle in radians (spot only)
    pub angle: f32,
    /// Width (area only)
    pub width: f32,
    /// Height (area only)
    pub height: f32,
}

impl LightData {
    /// Create a light of the given type with every other field at its default
    pub fn new(id: i32, light_type: LightType) -> Self {
        Self {
            id,
            light_type,
            color: SceneColor::WHITE,
            function: Vec3::new(1.0, 0.0, 0.0),
            position: Vec3::new(3.0, 3.0, 3.0),
            direction: Vec3::zeros(),
            penumbra: 0.0,
            angle: 0.0,
            width: 0.0,
            height: 0.0,
        }
    }
}
