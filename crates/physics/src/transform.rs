//! Transform matrix utilities for oriented boxes
//!
//! This module compiles pose parameters (position, scale, axis-angle
//! rotation) into the 4x4 matrix shared by the collision code and the
//! renderer, and composes axis-angle rotations by way of their matrices.

use crate::types::{AxisAngle, Mat4, Vec3};

/// Axes shorter than this produce the identity rotation.
const MIN_AXIS_LENGTH: f32 = 1e-3;
/// Replacement for acos inputs that fall outside (-1, 1).
const ACOS_LIMIT: f32 = 0.999;
/// Antisymmetric norms below this are treated as 1.
const MIN_ANTISYMMETRIC_NORM: f32 = 0.001;

/// Rotation matrix for `degrees` about `axis`. The axis need not be unit length.
#[must_use]
pub fn rotation_matrix(axis: Vec3, degrees: f32) -> Mat4 {
    if axis.length() < MIN_AXIS_LENGTH {
        return Mat4::IDENTITY;
    }
    Mat4::from_axis_angle(axis.normalize(), degrees.to_radians())
}

/// Build `Rotate(degrees, axis) * Scale(scale)` with `position` written into
/// the translation column.
#[must_use]
pub fn build_transform(position: Vec3, scale: Vec3, axis: Vec3, degrees: f32) -> Mat4 {
    let mut transform = rotation_matrix(axis, degrees) * Mat4::from_scale(scale);
    transform.w_axis = position.extend(1.0);
    transform
}

/// Column-major array form of a transform, as consumed by the renderer.
#[must_use]
pub fn to_transform_matrix(transform: &Mat4) -> [[f32; 4]; 4] {
    transform.to_cols_array_2d()
}

/// Compose two axis-angle rotations as `R(first) * R(second)`, so `second`
/// is applied first.
///
/// The combined rotation is read back from the product matrix: the angle
/// from its trace and the axis from its antisymmetric part.
#[must_use]
pub fn compose_axis_angle(first: AxisAngle, second: AxisAngle) -> AxisAngle {
    let m = rotation_matrix(first.axis, first.degrees) * rotation_matrix(second.axis, second.degrees);

    let mut cos_angle = (m.x_axis.x + m.y_axis.y + m.z_axis.z - 1.0) / 2.0;
    if cos_angle <= -1.0 {
        cos_angle = -ACOS_LIMIT;
    } else if cos_angle >= 1.0 {
        cos_angle = ACOS_LIMIT;
    }
    let radians = cos_angle.acos();

    // m_rc lives at column c, row r.
    let antisymmetric = Vec3::new(
        m.y_axis.z - m.z_axis.y,
        m.z_axis.x - m.x_axis.z,
        m.x_axis.y - m.y_axis.x,
    );
    let mut norm = antisymmetric.length();
    if norm.abs() < MIN_ANTISYMMETRIC_NORM {
        norm = 1.0;
    }
    let axis = antisymmetric / norm;

    if axis.length() < MIN_AXIS_LENGTH {
        // The antisymmetric part vanishes at 0 and at a half turn.
        if cos_angle < 0.0 {
            if let Some(axis) = half_turn_axis(&m) {
                return AxisAngle::new(axis, 180.0);
            }
        }
        let axis = second.axis.try_normalize().unwrap_or(AxisAngle::IDENTITY.axis);
        return AxisAngle::new(axis, 0.0);
    }

    let mut degrees = radians.to_degrees();
    if degrees >= 360.0 || degrees <= -360.0 {
        degrees = 0.0;
    }

    AxisAngle::new(axis, degrees)
}

/// Axis of a half-turn matrix, read from its symmetric part `(R + I) / 2 = a aᵀ`.
///
/// The largest diagonal term picks the component to take the root of; the
/// others follow from the off-diagonal products.
fn half_turn_axis(m: &Mat4) -> Option<Vec3> {
    let squares = (Vec3::new(m.x_axis.x, m.y_axis.y, m.z_axis.z) + Vec3::ONE) * 0.5;
    let xy = (m.x_axis.y + m.y_axis.x) * 0.25;
    let xz = (m.x_axis.z + m.z_axis.x) * 0.25;
    let yz = (m.y_axis.z + m.z_axis.y) * 0.25;

    let axis = if squares.x >= squares.y && squares.x >= squares.z {
        let root = squares.x.max(0.0).sqrt();
        Vec3::new(root, xy / root, xz / root)
    } else if squares.y >= squares.z {
        let root = squares.y.max(0.0).sqrt();
        Vec3::new(xy / root, root, yz / root)
    } else {
        let root = squares.z.max(0.0).sqrt();
        Vec3::new(xz / root, yz / root, root)
    };
    axis.try_normalize()
}
