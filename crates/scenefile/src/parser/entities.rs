//! Per-entity parsers: global data, camera, lights, primitives, transforms
//!
//! Each parser validates keys against its schema, applies any cross-field
//! rule, checks value shapes, and only then builds the entity.

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::schema::{self, Fields, CAMERA_DATA, GLOBAL_DATA, LIGHT, PRIMITIVE, TRANSFORM};
use super::values::{self, FUNCTION_ALIASES, ROTATE_ALIASES, XYZ};
use crate::error::{Result, SceneError};
use crate::foundation::math::{utils, Vec3};
use crate::scene::{
    CameraData, GlobalData, LightData, LightType, Material, Primitive, PrimitiveKind, Transformation,
};

/// Base directories that asset file names resolve against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    /// Base for `meshfile` / `filename`
    pub mesh_base: PathBuf,
    /// Base for `texture` / `bumpmap`
    pub texture_base: PathBuf,
}

impl AssetPaths {
    /// Derive asset bases from the scene file location
    ///
    /// Mesh files resolve two directories up from the scene file (the
    /// directory containing the scene's directory), texture maps one
    /// directory up (the scene's own directory). Existing scene files depend
    /// on this asymmetry.
    pub fn for_scene(scene_path: &Path) -> Self {
        let absolute = std::path::absolute(scene_path).unwrap_or_else(|_| scene_path.to_path_buf());
        let scene_dir = absolute.parent().map(Path::to_path_buf).unwrap_or_default();
        let mesh_base = scene_dir.parent().map(Path::to_path_buf).unwrap_or_else(|| scene_dir.clone());
        Self {
            mesh_base: values::normalize(&mesh_base),
            texture_base: values::normalize(&scene_dir),
        }
    }

    /// Resolve every asset against one directory
    pub fn rooted_at(root: &Path) -> Self {
        let root = values::normalize(root);
        Self {
            mesh_base: root.clone(),
            texture_base: root,
        }
    }
}

/// Parse `globalData`
pub fn parse_global_data(value: &Value, at: &str) -> Result<GlobalData> {
    let object = values::object(value, at)?;
    let fields = GLOBAL_DATA.validate(object, at)?;
    fields.check_values()?;

    let mut global = GlobalData {
        ambient: values::scalar(object, "ambientCoeff", at)?,
        diffuse: values::scalar(object, "diffuseCoeff", at)?,
        specular: values::scalar(object, "specularCoeff", at)?,
        ..GlobalData::default()
    };
    if let Some(kt) = fields.float("transparentCoeff")? {
        global.transparent = kt;
    }
    Ok(global)
}

/// Parse `cameraData`
///
/// Exactly one of `look` and `focus` must be given; a focus point becomes the
/// look direction `focus - position`.
pub fn parse_camera_data(value: &Value, at: &str) -> Result<CameraData> {
    let object = values::object(value, at)?;
    let fields = CAMERA_DATA.validate(object, at)?;

    match (fields.has("look"), fields.has("focus")) {
        (true, true) => {
            return Err(SceneError::conflict(at, "cameraData cannot contain both \"look\" and \"focus\""));
        }
        (false, false) => return Err(SceneError::missing_field(at, "look")),
        _ => {}
    }
    fields.check_values()?;

    let position = values::vec3(fields.require("position")?, XYZ, &fields.at("position"))?;
    let up = values::vec3(fields.require("up")?, XYZ, &fields.at("up"))?;
    let height_angle = values::angle(fields.require("heightAngle")?, &fields.at("heightAngle"))?;

    let look = if let Some(look) = fields.get("look") {
        values::vec3(look, XYZ, &fields.at("look"))?
    } else {
        let focus = values::vec3(fields.require("focus")?, XYZ, &fields.at("focus"))?;
        focus - position
    };

    Ok(CameraData {
        position,
        up,
        look,
        height_angle,
        aperture: fields.float("aperture")?.unwrap_or(0.0),
        focal_length: fields.float("focalLength")?.unwrap_or(0.0),
    })
}

/// Parse one light; `ordinal` is its index in the scene's light list and
/// doubles as the default `id`
pub fn parse_light_data(value: &Value, ordinal: usize, at: &str) -> Result<LightData> {
    let object = values::object(value, at)?;
    let fields = LIGHT.validate(object, at)?;

    let type_name = schema::enum_value(fields.require("type")?, &LightType::NAMES, &fields.at("type"))?;
    let light_type = LightType::from_name(type_name)
        .ok_or_else(|| SceneError::invalid_enum(fields.at("type"), type_name, &LightType::NAMES))?;

    if let Some(field) = fields.keys().find(|field| !schema::light_field_applies(field, light_type)) {
        return Err(SceneError::conflict(
            fields.at(field),
            format!("{field} is not applicable to {light_type} lights"),
        ));
    }
    fields.check_values()?;

    let default_id = i32::try_from(ordinal).unwrap_or(i32::MAX);
    let mut light = LightData::new(default_id, light_type);

    if let Some(id) = fields.get("id") {
        light.id = values::integer(id, &fields.at("id"))?;
    }
    if let Some(color) = fields.get("color") {
        light.color = values::color(color, &fields.at("color"))?;
    }
    if let Some(function) = fields.get("function") {
        light.function = values::vec3(function, FUNCTION_ALIASES, &fields.at("function"))?;
    }
    if let Some(position) = fields.get("position") {
        light.position = values::vec3(position, XYZ, &fields.at("position"))?;
    }
    if let Some(direction) = fields.get("direction") {
        light.direction = values::vec3(direction, XYZ, &fields.at("direction"))?;
    }
    if let Some(penumbra) = fields.angle("penumbra")? {
        light.penumbra = penumbra;
    }
    if let Some(angle) = fields.angle("angle")? {
        light.angle = angle;
    }
    if let Some(width) = fields.float("width")? {
        light.width = width;
    }
    if let Some(height) = fields.float("height")? {
        light.height = height;
    }

    Ok(light)
}

/// Parse a primitive and its material
pub fn parse_primitive(value: &Value, assets: &AssetPaths, at: &str) -> Result<Primitive> {
    let object = values::object(value, at)?;
    let fields = PRIMITIVE.validate(object, at)?;

    let name = schema::enum_value(fields.require("name")?, &PrimitiveKind::NAMES, &fields.at("name"))?;
    let is_mesh = name == "mesh";
    match (fields.has("meshfile"), fields.has("filename")) {
        (true, true) => {
            return Err(SceneError::conflict(at, "mesh cannot specify both \"meshfile\" and \"filename\""));
        }
        (false, false) if is_mesh => {
            return Err(SceneError::missing_field(at, "meshfile"));
        }
        (true, _) | (_, true) if !is_mesh => {
            return Err(SceneError::conflict(at, format!("{name} primitives do not take a mesh file")));
        }
        _ => {}
    }
    fields.check_values()?;

    let kind = if is_mesh {
        let file = match fields.text("meshfile")? {
            Some(file) => file,
            None => fields.text("filename")?.unwrap_or_default(),
        };
        PrimitiveKind::Mesh { path: values::resolve_path(&assets.mesh_base, file) }
    } else {
        PrimitiveKind::builtin(name)
            .ok_or_else(|| SceneError::invalid_enum(fields.at("name"), name, &PrimitiveKind::NAMES))?
    };

    Ok(Primitive {
        kind,
        material: parse_material(&fields, &assets.texture_base)?,
    })
}

/// Build a material from the material keys of a primitive
fn parse_material(fields: &Fields<'_>, texture_base: &Path) -> Result<Material> {
    let mut material = Material::default();

    let colors = [
        ("ambient", &mut material.ambient),
        ("diffuse", &mut material.diffuse),
        ("specular", &mut material.specular),
        ("reflective", &mut material.reflective),
        ("emissive", &mut material.emissive),
        ("transparent", &mut material.transparent),
    ];
    for (key, slot) in colors {
        if let Some(value) = fields.get(key) {
            *slot = values::color(value, &fields.at(key))?;
        }
    }

    let scalars = [
        ("shininess", &mut material.shininess),
        ("ior", &mut material.ior),
        ("blend", &mut material.blend),
    ];
    for (key, slot) in scalars {
        if let Some(value) = fields.float(key)? {
            *slot = value;
        }
    }

    if let Some(texture) = fields.get("texture") {
        material.texture = Some(values::file_map(texture, texture_base, &fields.at("texture"))?);
    }
    if let Some(bump) = fields.get("bumpmap") {
        material.bump_map = Some(values::file_map(bump, texture_base, &fields.at("bumpmap"))?);
    }

    Ok(material)
}

/// Parse one entry of a group's `transforms` list
pub fn parse_transformation(value: &Value, at: &str) -> Result<Transformation> {
    let object = values::object(value, at)?;
    let fields = TRANSFORM.validate(object, at)?;

    let mut present = fields.keys();
    let (Some(key), None) = (present.next(), present.next()) else {
        return Err(SceneError::conflict(
            at,
            "a transform must contain exactly one of translate, rotate, scale or matrix",
        ));
    };
    fields.check_values()?;

    let value = fields.require(key)?;
    let at = fields.at(key);
    let transformation = match key {
        "translate" => Transformation::Translate(values::vec3(value, XYZ, &at)?),
        "scale" => Transformation::Scale(values::vec3(value, XYZ, &at)?),
        "rotate" => {
            let [x, y, z, degrees] = values::quadruple(value, ROTATE_ALIASES, &at)?;
            Transformation::Rotate {
                axis: Vec3::new(x as f32, y as f32, z as f32),
                angle: utils::deg_to_rad(degrees),
            }
        }
        "matrix" => Transformation::Matrix(values::matrix(value, &at)?),
        other => return Err(SceneError::unknown_field(fields.location(), other)),
    };
    Ok(transformation)
}
