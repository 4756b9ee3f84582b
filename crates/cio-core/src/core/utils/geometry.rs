use nalgebra::{Rotation3, Unit, UnitQuaternion, Vector3};
use std::f64::consts::PI;

pub fn rotation_to_align(from: &Vector3<f64>, to: &Vector3<f64>) -> Option<Rotation3<f64>> {
    Rotation3::rotation_between(from, to)
}

/// Exponential-map (scaled axis) encoding of a rotation: the rotation axis scaled by the
/// rotation angle in radians.
pub fn exponential_map(rotation: &UnitQuaternion<f64>) -> Vector3<f64> {
    rotation.scaled_axis()
}

pub fn rotation_from_exponential_map(exp_map: &Vector3<f64>) -> Rotation3<f64> {
    Rotation3::from_scaled_axis(*exp_map)
}

/// Orientation of a support surface with the given normal, as the exponential map of the
/// minimal rotation carrying world +z onto the normal.
///
/// A normal pointing straight down has no unique minimal rotation; a half turn about +x is
/// used in that case.
pub fn surface_orientation(normal: &Vector3<f64>) -> Vector3<f64> {
    let rotation = rotation_to_align(&Vector3::z(), normal)
        .unwrap_or_else(|| Rotation3::from_axis_angle(&Unit::new_normalize(Vector3::x()), PI));
    rotation.scaled_axis()
}

/// Surface normal encoded by an exponential-map orientation: the local z column of the
/// corresponding rotation.
pub fn surface_normal(orientation: &Vector3<f64>) -> Vector3<f64> {
    rotation_from_exponential_map(orientation)
        .matrix()
        .column(2)
        .into_owned()
}
