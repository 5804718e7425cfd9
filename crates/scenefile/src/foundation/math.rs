//! Math utilities and types
//!
//! Scene values are stored as `f32`; document numbers arrive as `f64` and are
//! narrowed once, when they are extracted.

pub use nalgebra::{Matrix4, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type (column-major storage)
pub type Mat4 = Matrix4<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f64 = std::f64::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f64 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert an angle in degrees, as written in a scene file, to radians.
    ///
    /// The product is formed in `f64` as `degrees * PI / 180` and narrowed
    /// afterwards.
    pub fn deg_to_rad(degrees: f64) -> f32 {
        (degrees * constants::PI / 180.0) as f32
    }

    /// Convert radians back to degrees (display only)
    pub fn rad_to_deg(radians: f32) -> f64 {
        f64::from(radians) / constants::DEG_TO_RAD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_deg_to_rad() {
        assert_relative_eq!(utils::deg_to_rad(180.0), std::f32::consts::PI);
        assert_relative_eq!(utils::deg_to_rad(45.0), std::f32::consts::FRAC_PI_4);
        assert_relative_eq!(utils::deg_to_rad(0.0), 0.0);
    }

    #[test]
    fn test_rad_to_deg_round_trip() {
        let radians = utils::deg_to_rad(30.0);
        assert_relative_eq!(utils::rad_to_deg(radians), 30.0, epsilon = 1e-4);
    }
}
