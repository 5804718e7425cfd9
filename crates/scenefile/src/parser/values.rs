//! Typed value extraction from JSON scene values
//!
//! Every reader takes the location of the value so errors can name it.
//! Vectors accept either a JSON array of the right length or an object keyed
//! by one of a fixed list of alias sets, tried in order.

use std::path::{Component, Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{Result, SceneError};
use crate::foundation::math::{utils, Mat4, Vec3};
use crate::scene::{FileMap, SceneColor};

/// JSON object as produced by `serde_json` (key order preserved)
pub type JsonObject = Map<String, Value>;

/// Positional vectors: translate, scale, camera and light vectors
pub const XYZ: &[[&str; 3]] = &[["x", "y", "z"]];

/// Light attenuation function coefficients
pub const FUNCTION_ALIASES: &[[&str; 3]] = &[["a", "b", "c"], ["x", "y", "z"], ["v1", "v2", "v3"]];

/// Rotation axis plus angle in degrees
pub const ROTATE_ALIASES: &[[&str; 4]] = &[["x", "y", "z", "angle"], ["x", "y", "z", "a"]];

/// One row of a 4x4 matrix
pub const MATRIX_ROW_ALIASES: &[[&str; 4]] = &[["a", "b", "c", "d"], ["v1", "v2", "v3", "v4"]];

const COLOR4_ALIASES: &[[&str; 4]] = &[["r", "g", "b", "a"], ["x", "y", "z", "w"]];
const COLOR3_ALIASES: &[[&str; 3]] = &[["r", "g", "b"], ["x", "y", "z"]];

/// Location of `key` inside the object at `at`
pub fn field_at(at: &str, key: &str) -> String {
    if at.is_empty() {
        key.to_string()
    } else {
        format!("{at}.{key}")
    }
}

/// Location of element `index` of the array at `at`
pub fn index_at(at: &str, index: usize) -> String {
    format!("{at}[{index}]")
}

/// Short description of a JSON value's type for error messages
pub fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "a boolean".to_string(),
        Value::Number(_) => "a number".to_string(),
        Value::String(_) => "a string".to_string(),
        Value::Array(items) => format!("an array of {} elements", items.len()),
        Value::Object(object) => {
            let keys: Vec<&str> = object.keys().map(String::as_str).collect();
            format!("an object with keys {{{}}}", keys.join(", "))
        }
    }
}

fn alias_list<const N: usize>(sets: &[[&str; N]]) -> String {
    sets.iter()
        .map(|set| format!("{{{}}}", set.join(", ")))
        .collect::<Vec<_>>()
        .join(" or ")
}

/// Require an object
pub fn object<'a>(value: &'a Value, at: &str) -> Result<&'a JsonObject> {
    value
        .as_object()
        .ok_or_else(|| SceneError::type_mismatch(at, "an object", describe(value)))
}

/// Require an array
pub fn array<'a>(value: &'a Value, at: &str) -> Result<&'a [Value]> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| SceneError::type_mismatch(at, "an array", describe(value)))
}

/// Require a string
pub fn text<'a>(value: &'a Value, at: &str) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| SceneError::type_mismatch(at, "a string", describe(value)))
}

/// Unwrap the `{ "v": ... }` attribute form used by single-valued elements
fn attribute<'a>(value: &'a Value, at: &str) -> Result<&'a Value> {
    let Some(object) = value.as_object() else {
        return Ok(value);
    };
    if let Some(key) = object.keys().find(|key| key.as_str() != "v") {
        return Err(SceneError::unknown_field(at, key.as_str()));
    }
    object.get("v").ok_or_else(|| SceneError::missing_field(at, "v"))
}

/// Read a number, as written (`f64`)
///
/// Magnitudes beyond `f32::MAX` are rejected since every stored value is
/// narrowed to `f32`.
pub fn number(value: &Value, at: &str) -> Result<f64> {
    let inner = attribute(value, at)?;
    let n = inner
        .as_f64()
        .ok_or_else(|| SceneError::type_mismatch(at, "a number", describe(inner)))?;
    if n.abs() > f64::from(f32::MAX) {
        return Err(SceneError::type_mismatch(at, "a number within f32 range", n.to_string()));
    }
    Ok(n)
}

/// Read a number and narrow it to `f32`
pub fn float(value: &Value, at: &str) -> Result<f32> {
    number(value, at).map(|n| n as f32)
}

/// Read an angle given in degrees, returning radians
pub fn angle(value: &Value, at: &str) -> Result<f32> {
    number(value, at).map(utils::deg_to_rad)
}

/// Read an integer that fits in `i32`
pub fn integer(value: &Value, at: &str) -> Result<i32> {
    let inner = attribute(value, at)?;
    inner
        .as_i64()
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| SceneError::type_mismatch(at, "a 32-bit integer", describe(inner)))
}

/// Read the named numeric attribute of an object; absence is an error
pub fn scalar(object: &JsonObject, key: &str, at: &str) -> Result<f32> {
    let value = object.get(key).ok_or_else(|| SceneError::missing_field(at, key))?;
    float(value, &field_at(at, key))
}

/// Try each alias set in order against an object
///
/// Returns `Ok(None)` if no set is complete. Once a set matches, any key
/// outside it is an unknown field.
fn match_aliases<const N: usize>(object: &JsonObject, sets: &[[&str; N]], at: &str) -> Result<Option<[f64; N]>> {
    let Some(set) = sets.iter().find(|set| set.iter().all(|key| object.contains_key(*key))) else {
        return Ok(None);
    };

    if let Some(extra) = object.keys().find(|key| !set.contains(&key.as_str())) {
        return Err(SceneError::unknown_field(at, extra.as_str()));
    }

    let mut out = [0.0; N];
    for (slot, key) in out.iter_mut().zip(set.iter()) {
        *slot = number(&object[*key], &field_at(at, key))?;
    }
    Ok(Some(out))
}

fn array_tuple<const N: usize>(items: &[Value], at: &str) -> Result<[f64; N]> {
    if items.len() != N {
        return Err(SceneError::type_mismatch(
            at,
            format!("an array of {N} numbers"),
            format!("an array of {} elements", items.len()),
        ));
    }
    let mut out = [0.0; N];
    for (i, (slot, item)) in out.iter_mut().zip(items).enumerate() {
        *slot = number(item, &index_at(at, i))?;
    }
    Ok(out)
}

fn tuple<const N: usize>(value: &Value, sets: &[[&str; N]], at: &str) -> Result<[f64; N]> {
    match value {
        Value::Array(items) => array_tuple(items, at),
        Value::Object(object) => match_aliases(object, sets, at)?.ok_or_else(|| {
            SceneError::type_mismatch(at, format!("an object with keys {}", alias_list(sets)), describe(value))
        }),
        other => Err(SceneError::type_mismatch(
            at,
            format!("an array of {N} numbers or an object with keys {}", alias_list(sets)),
            describe(other),
        )),
    }
}

/// Read three numbers
pub fn triple(value: &Value, sets: &[[&str; 3]], at: &str) -> Result<[f64; 3]> {
    tuple(value, sets, at)
}

/// Read four numbers
pub fn quadruple(value: &Value, sets: &[[&str; 4]], at: &str) -> Result<[f64; 4]> {
    tuple(value, sets, at)
}

/// Read a 3-vector
pub fn vec3(value: &Value, sets: &[[&str; 3]], at: &str) -> Result<Vec3> {
    let [x, y, z] = triple(value, sets, at)?;
    Ok(Vec3::new(x as f32, y as f32, z as f32))
}

/// Read a color
///
/// Objects are matched against `{r,g,b,a}`, `{x,y,z,w}`, `{r,g,b}` and
/// `{x,y,z}` in that order; arrays may hold 3 or 4 channels. Alpha defaults
/// to 1.
pub fn color(value: &Value, at: &str) -> Result<SceneColor> {
    let channels = match value {
        Value::Array(items) if items.len() == 3 => {
            let [r, g, b] = array_tuple(items, at)?;
            [r, g, b, 1.0]
        }
        Value::Array(items) => array_tuple::<4>(items, at)?,
        Value::Object(object) => {
            if let Some(rgba) = match_aliases(object, COLOR4_ALIASES, at)? {
                rgba
            } else if let Some([r, g, b]) = match_aliases(object, COLOR3_ALIASES, at)? {
                [r, g, b, 1.0]
            } else {
                return Err(SceneError::type_mismatch(
                    at,
                    format!("a color with keys {} or {}", alias_list(COLOR4_ALIASES), alias_list(COLOR3_ALIASES)),
                    describe(value),
                ));
            }
        }
        other => return Err(SceneError::type_mismatch(at, "a color", describe(other))),
    };
    let [r, g, b, a] = channels;
    Ok(SceneColor::rgba(r as f32, g as f32, b as f32, a as f32))
}

/// Read a 4x4 matrix written as four rows
///
/// Rows are given in reading order (row-major text); the result is
/// nalgebra's column-major matrix with the same entries, so `m[(i, j)]` is
/// element `j` of written row `i`.
pub fn matrix(value: &Value, at: &str) -> Result<Mat4> {
    let rows = array(value, at)?;
    if rows.len() != 4 {
        return Err(SceneError::type_mismatch(
            at,
            "an array of 4 rows",
            format!("an array of {} rows", rows.len()),
        ));
    }

    let mut flat = [0.0_f32; 16];
    for (i, row) in rows.iter().enumerate() {
        let values = quadruple(row, MATRIX_ROW_ALIASES, &index_at(at, i))?;
        for (j, v) in values.into_iter().enumerate() {
            flat[i * 4 + j] = v as f32;
        }
    }
    Ok(Mat4::from_row_slice(&flat))
}

/// Read a texture/bump map record and resolve its file against `base`
///
/// Accepts `{ "file": ..., "u": ..., "v": ... }` or a bare file string.
pub fn file_map(value: &Value, base: &Path, at: &str) -> Result<FileMap> {
    let object = match value {
        Value::String(file) => return Ok(FileMap::new(resolve_path(base, file))),
        Value::Object(object) => object,
        other => {
            return Err(SceneError::type_mismatch(at, "a file map object or a file name", describe(other)));
        }
    };

    if let Some(key) = object.keys().find(|key| !matches!(key.as_str(), "file" | "u" | "v")) {
        return Err(SceneError::unknown_field(at, key.as_str()));
    }
    let file = object.get("file").ok_or_else(|| SceneError::missing_field(at, "file"))?;
    let file = text(file, &field_at(at, "file"))?;

    let mut map = FileMap::new(resolve_path(base, file));
    if object.contains_key("u") {
        map.repeat_u = scalar(object, "u", at)?;
    }
    if object.contains_key("v") {
        map.repeat_v = scalar(object, "v", at)?;
    }
    Ok(map)
}

/// Join `relative` onto `base` and normalize the result lexically
///
/// The filesystem is never touched. An absolute `relative` replaces `base`.
pub fn resolve_path(base: &Path, relative: &str) -> PathBuf {
    normalize(&base.join(relative))
}

/// Remove `.` components and fold `..` into the preceding component
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    #[test]
    fn test_scalar_accepts_number_and_attribute_form() {
        assert_eq!(float(&json!(2.5), "v").unwrap(), 2.5);
        assert_eq!(float(&json!({"v": 4}), "v").unwrap(), 4.0);
        assert!(matches!(float(&json!("2"), "v"), Err(SceneError::TypeMismatch { .. })));
        assert!(matches!(float(&json!({"w": 1}), "v"), Err(SceneError::UnknownField { .. })));
    }

    #[test]
    fn test_scalar_missing_attribute() {
        let object = json!({"u": 1.0});
        let err = scalar(object.as_object().unwrap(), "v", "texture").unwrap_err();
        match err {
            SceneError::MissingField { at, field } => {
                assert_eq!(at, "texture");
                assert_eq!(field, "v");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_integer_rejects_fractions() {
        assert_eq!(integer(&json!(3), "id").unwrap(), 3);
        assert!(matches!(integer(&json!(3.5), "id"), Err(SceneError::TypeMismatch { .. })));
        assert!(matches!(integer(&json!(1_u64 << 40), "id"), Err(SceneError::TypeMismatch { .. })));
    }

    #[test]
    fn test_number_outside_f32_range() {
        assert_relative_eq!(float(&json!(f32::MAX), "ambientCoeff").unwrap(), f32::MAX);
        match float(&json!({"v": -1e300}), "ambientCoeff") {
            Err(SceneError::TypeMismatch { at, .. }) => assert_eq!(at, "ambientCoeff"),
            other => panic!("unexpected result: {other:?}"),
        }
        match triple(&json!([0, 1e39, 0]), XYZ, "position") {
            Err(SceneError::TypeMismatch { at, .. }) => assert_eq!(at, "position[1]"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_triple_alias_priority() {
        let v = triple(&json!({"v1": 1, "v2": 2, "v3": 3}), FUNCTION_ALIASES, "function").unwrap();
        assert_eq!(v, [1.0, 2.0, 3.0]);
        let v = triple(&json!({"a": 0.5, "b": 0, "c": 0.1}), FUNCTION_ALIASES, "function").unwrap();
        assert_eq!(v, [0.5, 0.0, 0.1]);
        let v = triple(&json!([4, 5, 6]), XYZ, "translate").unwrap();
        assert_eq!(v, [4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_triple_incomplete_alias_set_fails() {
        let err = triple(&json!({"x": 1, "y": 2}), XYZ, "position").unwrap_err();
        assert!(matches!(err, SceneError::TypeMismatch { .. }));
        let err = triple(&json!([1, 2]), XYZ, "position").unwrap_err();
        assert!(matches!(err, SceneError::TypeMismatch { .. }));
    }

    #[test]
    fn test_triple_extra_key_is_unknown() {
        let err = triple(&json!({"x": 1, "y": 2, "z": 3, "q": 4}), XYZ, "position").unwrap_err();
        match err {
            SceneError::UnknownField { field, .. } => assert_eq!(field, "q"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_color_rgb_defaults_alpha() {
        let c = color(&json!({"r": 0.1, "g": 0.2, "b": 0.3}), "diffuse").unwrap();
        assert_relative_eq!(c.a, 1.0);
        assert_relative_eq!(c.g, 0.2);
    }

    #[test]
    fn test_color_rgba_keeps_alpha() {
        let c = color(&json!({"r": 1, "g": 1, "b": 1, "a": 0.3}), "diffuse").unwrap();
        assert_relative_eq!(c.a, 0.3);
    }

    #[test]
    fn test_color_xyzw_and_xyz() {
        let c = color(&json!({"x": 0.1, "y": 0.2, "z": 0.3, "w": 0.4}), "color").unwrap();
        assert_eq!(c, SceneColor::rgba(0.1, 0.2, 0.3, 0.4));
        let c = color(&json!({"x": 0.1, "y": 0.2, "z": 0.3}), "color").unwrap();
        assert_eq!(c, SceneColor::rgb(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_color_arrays() {
        assert_eq!(color(&json!([1, 0, 0]), "c").unwrap(), SceneColor::rgb(1.0, 0.0, 0.0));
        assert_eq!(color(&json!([1, 0, 0, 0.5]), "c").unwrap(), SceneColor::rgba(1.0, 0.0, 0.0, 0.5));
        assert!(color(&json!([1, 0]), "c").is_err());
    }

    #[test]
    fn test_color_without_aliases_fails() {
        let err = color(&json!({"red": 1, "green": 0, "blue": 0}), "diffuse").unwrap_err();
        assert!(matches!(err, SceneError::TypeMismatch { .. }));
    }

    #[test]
    fn test_matrix_identity() {
        let m = matrix(
            &json!([[1, 0, 0, 0], [0, 1, 0, 0], [0, 0, 1, 0], [0, 0, 0, 1]]),
            "matrix",
        )
        .unwrap();
        assert_eq!(m, Mat4::identity());
    }

    #[test]
    fn test_matrix_rows_keep_reading_order() {
        let m = matrix(
            &json!([
                {"a": 1, "b": 0, "c": 0, "d": 5},
                {"v1": 0, "v2": 1, "v3": 0, "v4": 6},
                [0, 0, 1, 7],
                [0, 0, 0, 1]
            ]),
            "matrix",
        )
        .unwrap();
        assert_eq!(m[(0, 3)], 5.0);
        assert_eq!(m[(1, 3)], 6.0);
        assert_eq!(m[(2, 3)], 7.0);
        // column-major storage: the translation sits in the last storage column
        assert_eq!(&m.as_slice()[12..15], &[5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_matrix_requires_four_rows() {
        let err = matrix(&json!([[1, 0, 0, 0], [0, 1, 0, 0], [0, 0, 1, 0]]), "matrix").unwrap_err();
        assert!(matches!(err, SceneError::TypeMismatch { .. }));
        let err = matrix(&json!([[1, 0, 0, 0], [0, 1, 0], [0, 0, 1, 0], [0, 0, 0, 1]]), "matrix").unwrap_err();
        match err {
            SceneError::TypeMismatch { at, .. } => assert_eq!(at, "matrix[1]"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_file_map_defaults_and_resolution() {
        let map = file_map(&json!({"file": "textures/wood.png"}), Path::new("/scenes/demo"), "texture").unwrap();
        assert_eq!(map.path, PathBuf::from("/scenes/demo/textures/wood.png"));
        assert_eq!((map.repeat_u, map.repeat_v), (1.0, 1.0));

        let map = file_map(&json!({"file": "../wood.png", "u": 2, "v": 3}), Path::new("/scenes/demo"), "texture").unwrap();
        assert_eq!(map.path, PathBuf::from("/scenes/wood.png"));
        assert_eq!((map.repeat_u, map.repeat_v), (2.0, 3.0));
    }

    #[test]
    fn test_file_map_requires_file() {
        let err = file_map(&json!({"u": 2}), Path::new("/"), "bumpmap").unwrap_err();
        assert!(matches!(err, SceneError::MissingField { ref field, .. } if field == "file"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize(Path::new("a/../../b")), PathBuf::from("../b"));
    }

    #[test]
    fn test_angle_converts_degrees() {
        assert_relative_eq!(angle(&json!(90), "angle").unwrap(), std::f32::consts::FRAC_PI_2);
    }
}
