//! Primitives and their materials

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::data::SceneColor;

/// Texture or bump map attached to a material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMap {
    /// Resolved image path (never opened by the parser)
    pub path: PathBuf,
    /// Horizontal tiling factor
    pub repeat_u: f32,
    /// Vertical tiling factor
    pub repeat_v: f32,
}

impl FileMap {
    /// Create a map that tiles once in each direction
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            repeat_u: 1.0,
            repeat_v: 1.0,
        }
    }
}

/// Surface material of a primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Ambient color
    pub ambient: SceneColor,
    /// Diffuse color
    pub diffuse: SceneColor,
    /// Specular color
    pub specular: SceneColor,
    /// Reflective color
    pub reflective: SceneColor,
    /// Emissive color
    pub emissive: SceneColor,
    /// Transparent color
    pub transparent: SceneColor,
    /// Specular exponent
    pub shininess: f32,
    /// Index of refraction
    pub ior: f32,
    /// Texture blend factor
    pub blend: f32,
    /// Diffuse texture
    pub texture: Option<FileMap>,
    /// Bump map
    pub bump_map: Option<FileMap>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: SceneColor::BLACK,
            diffuse: SceneColor::WHITE,
            specular: SceneColor::BLACK,
            reflective: SceneColor::BLACK,
            emissive: SceneColor::BLACK,
            transparent: SceneColor::BLACK,
            shininess: 0.0,
            ior: 0.0,
            blend: 0.0,
            texture: None,
            bump_map: None,
        }
    }
}

/// Shape of a primitive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimitiveKind {
    /// Unit sphere
    Sphere,
    /// Unit cube
    Cube,
    /// Unit cylinder
    Cylinder,
    /// Unit cone
    Cone,
    /// Torus
    Torus,
    /// Triangle mesh loaded from a file
    Mesh {
        /// Resolved mesh file path (never opened by the parser)
        path: PathBuf,
    },
}

impl PrimitiveKind {
    /// Names accepted in scene files
    pub const NAMES: [&'static str; 6] = ["sphere", "cube", "cylinder", "cone", "torus", "mesh"];

    /// Scene-file name of this shape
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sphere => "sphere",
            Self::Cube => "cube",
            Self::Cylinder => "cylinder",
            Self::Cone => "cone",
            Self::Torus => "torus",
            Self::Mesh { .. } => "mesh",
        }
    }

    /// Look up a built-in shape by name; meshes need a path and are built directly
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "sphere" => Some(Self::Sphere),
            "cube" => Some(Self::Cube),
            "cylinder" => Some(Self::Cylinder),
            "cone" => Some(Self::Cone),
            "torus" => Some(Self::Torus),
            _ => None,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mesh { path } => write!(f, "mesh({})", path.display()),
            other => f.write_str(other.name()),
        }
    }
}

/// A renderable shape with its material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    /// Shape
    pub kind: PrimitiveKind,
    /// Material
    pub material: Material,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_defaults() {
        let material = Material::default();
        assert_eq!(material.diffuse, SceneColor::WHITE);
        assert_eq!(material.ambient, SceneColor::BLACK);
        assert!(material.texture.is_none());
        assert!(material.bump_map.is_none());
    }

    #[test]
    fn test_builtin_lookup_excludes_mesh() {
        assert_eq!(PrimitiveKind::builtin("torus"), Some(PrimitiveKind::Torus));
        assert_eq!(PrimitiveKind::builtin("mesh"), None);
        assert_eq!(PrimitiveKind::builtin("teapot"), None);
    }

    #[test]
    fn test_mesh_display_includes_path() {
        let kind = PrimitiveKind::Mesh { path: PathBuf::from("/assets/bunny.obj") };
        assert_eq!(kind.to_string(), "mesh(/assets/bunny.obj)");
    }
}
