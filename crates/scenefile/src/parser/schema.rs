//! Declarative object schemas
//!
//! Each scene object kind is described by a table of fields: name, whether
//! it is required, and the shape its value must have. Validation runs in a
//! fixed order: unknown keys (in document order), then missing required keys
//! (in table order), then value shapes (in table order). Entity parsers slot
//! their cross-field rules between the key checks and the shape checks.

use std::path::Path;

use serde_json::Value;

use super::values::{self, field_at, JsonObject, FUNCTION_ALIASES, ROTATE_ALIASES, XYZ};
use crate::error::{Result, SceneError};
use crate::scene::{LightType, PrimitiveKind};

/// Shape a field's value must have
#[derive(Debug, Clone, Copy)]
pub enum FieldShape {
    /// A number (or `{ "v": number }`)
    Scalar,
    /// A number of degrees
    Angle,
    /// A 32-bit integer
    Integer,
    /// Any string
    Text,
    /// One of a fixed set of strings
    Enum(&'static [&'static str]),
    /// Three numbers, array or one of the alias sets
    Triple(&'static [[&'static str; 3]]),
    /// Four numbers, array or one of the alias sets
    Quadruple(&'static [[&'static str; 4]]),
    /// A color
    Color,
    /// Four matrix rows
    Matrix,
    /// A texture or bump map record
    FileMap,
    /// An array (elements are checked by whoever walks it)
    List,
    /// An object (checked by its own schema)
    Object,
}

impl FieldShape {
    /// Check that `value` has this shape
    pub fn check(self, value: &Value, at: &str) -> Result<()> {
        match self {
            Self::Scalar | Self::Angle => values::number(value, at).map(|_| ()),
            Self::Integer => values::integer(value, at).map(|_| ()),
            Self::Text => values::text(value, at).map(|_| ()),
            Self::Enum(allowed) => enum_value(value, allowed, at).map(|_| ()),
            Self::Triple(sets) => values::triple(value, sets, at).map(|_| ()),
            Self::Quadruple(sets) => values::quadruple(value, sets, at).map(|_| ()),
            Self::Color => values::color(value, at).map(|_| ()),
            Self::Matrix => values::matrix(value, at).map(|_| ()),
            Self::FileMap => values::file_map(value, Path::new(""), at).map(|_| ()),
            Self::List => values::array(value, at).map(|_| ()),
            Self::Object => values::object(value, at).map(|_| ()),
        }
    }
}

/// Read a string and require it to be one of `allowed`
pub fn enum_value<'a>(value: &'a Value, allowed: &[&str], at: &str) -> Result<&'a str> {
    let text = values::text(value, at)?;
    if allowed.contains(&text) {
        Ok(text)
    } else {
        Err(SceneError::invalid_enum(at, text, allowed))
    }
}

/// One row of a schema table
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Key in the document
    pub name: &'static str,
    /// Whether the key must be present
    pub required: bool,
    /// Shape of the value
    pub shape: FieldShape,
}

impl FieldSpec {
    /// A required field
    pub const fn required(name: &'static str, shape: FieldShape) -> Self {
        Self { name, required: true, shape }
    }

    /// An optional field
    pub const fn optional(name: &'static str, shape: FieldShape) -> Self {
        Self { name, required: false, shape }
    }
}

/// Schema of one object kind
#[derive(Debug)]
pub struct ObjectSchema {
    /// Object kind, used in messages
    pub kind: &'static str,
    /// Field table
    pub fields: &'static [FieldSpec],
}

impl ObjectSchema {
    /// Check keys of `object` against this schema
    ///
    /// On success the returned [`Fields`] gives access to the values and
    /// runs the shape checks on demand.
    pub fn validate<'a>(&'static self, object: &'a JsonObject, at: &'a str) -> Result<Fields<'a>> {
        let required: Vec<&str> = self.fields.iter().filter(|f| f.required).map(|f| f.name).collect();
        let optional: Vec<&str> = self.fields.iter().filter(|f| !f.required).map(|f| f.name).collect();
        validate(object, &required, &optional, at)?;
        Ok(Fields { schema: self, object, at })
    }

    /// Look up a field spec by name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Enforce "every required key present, nothing outside required ∪ optional"
///
/// Unknown keys are reported first, in document order; then missing keys in
/// the order given by `required`.
pub fn validate(object: &JsonObject, required: &[&str], optional: &[&str], at: &str) -> Result<()> {
    if let Some(unknown) = object
        .keys()
        .find(|key| !required.contains(&key.as_str()) && !optional.contains(&key.as_str()))
    {
        return Err(SceneError::unknown_field(at, unknown.as_str()));
    }

    if let Some(missing) = required.iter().find(|key| !object.contains_key(**key)) {
        return Err(SceneError::missing_field(at, *missing));
    }

    Ok(())
}

/// Key-validated view of an object
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    schema: &'static ObjectSchema,
    object: &'a JsonObject,
    at: &'a str,
}

impl<'a> Fields<'a> {
    /// Run the shape check of every present field, in table order
    pub fn check_values(&self) -> Result<()> {
        for spec in self.schema.fields {
            if let Some(value) = self.object.get(spec.name) {
                spec.shape.check(value, &field_at(self.at, spec.name))?;
            }
        }
        Ok(())
    }

    /// Value of a field, if present
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.object.get(name)
    }

    /// True if the field is present
    pub fn has(&self, name: &str) -> bool {
        self.object.contains_key(name)
    }

    /// Location of a field
    pub fn at(&self, name: &str) -> String {
        field_at(self.at, name)
    }

    /// Location of the object itself
    pub fn location(&self) -> &'a str {
        self.at
    }

    /// Present keys in document order
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.object.keys().map(String::as_str)
    }

    /// Schema this view was validated against
    pub fn schema(&self) -> &'static ObjectSchema {
        self.schema
    }

    /// Value of a field that the schema marks as required
    pub fn require(&self, name: &str) -> Result<&'a Value> {
        self.get(name).ok_or_else(|| SceneError::missing_field(self.at, name))
    }

    /// Optional number, narrowed to `f32`
    pub fn float(&self, name: &str) -> Result<Option<f32>> {
        self.get(name).map(|v| values::float(v, &self.at(name))).transpose()
    }

    /// Optional angle in degrees, returned in radians
    pub fn angle(&self, name: &str) -> Result<Option<f32>> {
        self.get(name).map(|v| values::angle(v, &self.at(name))).transpose()
    }

    /// Optional string
    pub fn text(&self, name: &str) -> Result<Option<&'a str>> {
        self.get(name).map(|v| values::text(v, &self.at(name))).transpose()
    }
}

/// Top-level document
pub static ROOT: ObjectSchema = ObjectSchema {
    kind: "scene",
    fields: &[
        FieldSpec::required("globalData", FieldShape::Object),
        FieldSpec::required("cameraData", FieldShape::Object),
        FieldSpec::optional("name", FieldShape::Text),
        FieldSpec::optional("groups", FieldShape::Object),
        FieldSpec::optional("templateGroups", FieldShape::Object),
    ],
};

/// `globalData`
pub static GLOBAL_DATA: ObjectSchema = ObjectSchema {
    kind: "globalData",
    fields: &[
        FieldSpec::required("ambientCoeff", FieldShape::Scalar),
        FieldSpec::required("diffuseCoeff", FieldShape::Scalar),
        FieldSpec::required("specularCoeff", FieldShape::Scalar),
        FieldSpec::optional("transparentCoeff", FieldShape::Scalar),
    ],
};

/// `cameraData`
pub static CAMERA_DATA: ObjectSchema = ObjectSchema {
    kind: "cameraData",
    fields: &[
        FieldSpec::required("position", FieldShape::Triple(XYZ)),
        FieldSpec::required("up", FieldShape::Triple(XYZ)),
        FieldSpec::required("heightAngle", FieldShape::Angle),
        FieldSpec::optional("aperture", FieldShape::Scalar),
        FieldSpec::optional("focalLength", FieldShape::Scalar),
        FieldSpec::optional("look", FieldShape::Triple(XYZ)),
        FieldSpec::optional("focus", FieldShape::Triple(XYZ)),
    ],
};

/// A light
pub static LIGHT: ObjectSchema = ObjectSchema {
    kind: "light",
    fields: &[
        FieldSpec::required("type", FieldShape::Enum(&LightType::NAMES)),
        FieldSpec::optional("id", FieldShape::Integer),
        FieldSpec::optional("color", FieldShape::Color),
        FieldSpec::optional("function", FieldShape::Triple(FUNCTION_ALIASES)),
        FieldSpec::optional("position", FieldShape::Triple(XYZ)),
        FieldSpec::optional("direction", FieldShape::Triple(XYZ)),
        FieldSpec::optional("penumbra", FieldShape::Angle),
        FieldSpec::optional("angle", FieldShape::Angle),
        FieldSpec::optional("width", FieldShape::Scalar),
        FieldSpec::optional("height", FieldShape::Scalar),
    ],
};

/// Whether a light field may be set on a light of the given type
pub fn light_field_applies(field: &str, light_type: LightType) -> bool {
    match field {
        "position" => light_type.has_position(),
        "direction" => light_type.has_direction(),
        "penumbra" | "angle" => light_type == LightType::Spot,
        "width" | "height" => light_type == LightType::Area,
        _ => true,
    }
}

/// A primitive (inside `primitives`, or a `children` entry of type `primitive`)
pub static PRIMITIVE: ObjectSchema = ObjectSchema {
    kind: "primitive",
    fields: &[
        FieldSpec::optional("type", FieldShape::Enum(&["primitive"])),
        FieldSpec::required("name", FieldShape::Enum(&PrimitiveKind::NAMES)),
        FieldSpec::optional("meshfile", FieldShape::Text),
        FieldSpec::optional("filename", FieldShape::Text),
        FieldSpec::optional("ambient", FieldShape::Color),
        FieldSpec::optional("diffuse", FieldShape::Color),
        FieldSpec::optional("specular", FieldShape::Color),
        FieldSpec::optional("reflective", FieldShape::Color),
        FieldSpec::optional("emissive", FieldShape::Color),
        FieldSpec::optional("transparent", FieldShape::Color),
        FieldSpec::optional("shininess", FieldShape::Scalar),
        FieldSpec::optional("ior", FieldShape::Scalar),
        FieldSpec::optional("blend", FieldShape::Scalar),
        FieldSpec::optional("texture", FieldShape::FileMap),
        FieldSpec::optional("bumpmap", FieldShape::FileMap),
    ],
};

/// A group (top-level, template, or a `children` entry of type `tree`)
pub static GROUP: ObjectSchema = ObjectSchema {
    kind: "group",
    fields: &[
        FieldSpec::optional("type", FieldShape::Enum(&["tree"])),
        FieldSpec::optional("name", FieldShape::Text),
        FieldSpec::optional("transforms", FieldShape::List),
        FieldSpec::optional("lights", FieldShape::List),
        FieldSpec::optional("primitives", FieldShape::List),
        FieldSpec::optional("children", FieldShape::List),
    ],
};

/// A `children` entry of type `master`
pub static MASTER: ObjectSchema = ObjectSchema {
    kind: "master reference",
    fields: &[
        FieldSpec::required("type", FieldShape::Enum(&["master"])),
        FieldSpec::required("name", FieldShape::Text),
    ],
};

/// One entry of a group's `transforms` list; exactly one key must be present
pub static TRANSFORM: ObjectSchema = ObjectSchema {
    kind: "transform",
    fields: &[
        FieldSpec::optional("translate", FieldShape::Triple(XYZ)),
        FieldSpec::optional("rotate", FieldShape::Quadruple(ROTATE_ALIASES)),
        FieldSpec::optional("scale", FieldShape::Triple(XYZ)),
        FieldSpec::optional("matrix", FieldShape::Matrix),
    ],
};

/// Accepted values of a `children` entry's `type`
pub const OBJECT_TYPES: [&str; 3] = ["tree", "primitive", "master"];
