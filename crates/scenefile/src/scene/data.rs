//! Global and camera data

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Vec3, Vec4};

/// RGBA color with `f32` channels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneColor {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
    /// Alpha channel
    pub a: f32,
}

impl SceneColor {
    /// Opaque black
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    /// Opaque white
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    /// Create a color from all four channels
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Channels as a vector, alpha last
    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(self.r, self.g, self.b, self.a)
    }
}

impl Default for SceneColor {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Scene-wide shading coefficients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobalData {
    /// Ambient coefficient (ka)
    pub ambient: f32,
    /// Diffuse coefficient (kd)
    pub diffuse: f32,
    /// Specular coefficient (ks)
    pub specular: f32,
    /// Transparency coefficient (kt)
    pub transparent: f32,
}

impl Default for GlobalData {
    fn default() -> Self {
        Self {
            ambient: 0.5,
            diffuse: 0.5,
            specular: 0.5,
            transparent: 0.0,
        }
    }
}

/// Camera definition
///
/// `look` is always a direction. A scene that names a focus point instead
/// has it converted to `focus - position` during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraData {
    /// Eye position
    pub position: Vec3,
    /// Up vector
    pub up: Vec3,
    /// Look direction
    pub look: Vec3,
    /// Vertical field of view in radians
    pub height_angle: f32,
    /// Lens aperture (0 for a pinhole camera)
    pub aperture: f32,
    /// Focal length (0 when unused)
    pub focal_length: f32,
}

impl Default for CameraData {
    fn default() -> Self {
        Self {
            position: Vec3::new(5.0, 5.0, 5.0),
            up: Vec3::new(0.0, 1.0, 0.0),
            look: Vec3::new(-1.0, -1.0, -1.0),
            height_angle: std::f32::consts::FRAC_PI_4,
            aperture: 0.0,
            focal_length: 0.0,
        }
    }
}
