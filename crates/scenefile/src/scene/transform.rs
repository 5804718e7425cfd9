//! Node-local transformations

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Mat4, Vec3};

/// One local geometric operation attached to a node
///
/// A node applies its transformations in storage order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Transformation {
    /// Translation by an offset
    Translate(Vec3),
    /// Rotation about an axis
    Rotate {
        /// Rotation axis (as written, not normalized)
        axis: Vec3,
        /// Angle in radians
        angle: f32,
    },
    /// Non-uniform scale
    Scale(Vec3),
    /// Explicit matrix
    Matrix(Mat4),
}

impl Transformation {
    /// Matrix of this single transformation
    ///
    /// A zero rotation axis yields the identity.
    pub fn to_matrix(&self) -> Mat4 {
        match self {
            Self::Translate(offset) => Mat4::new_translation(offset),
            Self::Rotate { axis, angle } => match nalgebra::Unit::try_new(*axis, f32::EPSILON) {
                Some(axis) => Mat4::from_axis_angle(&axis, *angle),
                None => Mat4::identity(),
            },
            Self::Scale(factors) => Mat4::new_nonuniform_scaling(factors),
            Self::Matrix(matrix) => *matrix,
        }
    }

    /// Short name used in logs and dumps
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Translate(_) => "translate",
            Self::Rotate { .. } => "rotate",
            Self::Scale(_) => "scale",
            Self::Matrix(_) => "matrix",
        }
    }
}
