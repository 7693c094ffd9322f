use glam::{Quat, Vec3};
use super::*;

#[test]
fn test_default_is_identity() {
    let t = Transform::default();
    assert_eq!(t.position, Vec3::ZERO);
    assert_eq!(t.rotation, Quat::IDENTITY);
    assert_eq!(t.forward(), Vec3::NEG_Z);
}

#[test]
fn test_look_at_points_forward_at_target() {
    let mut t = Transform::from_position(Vec3::new(3.0, 2.0, 5.0));
    t.look_at(Vec3::ZERO, Vec3::Y);

    let expected = (Vec3::ZERO - t.position).normalize();
    assert!((t.forward() - expected).length() < 1e-5);
    // Right vector stays horizontal with a Y up hint
    assert!(t.right().y.abs() < 1e-5);
}

#[test]
fn test_look_at_straight_down_keeps_valid_rotation() {
    let mut t = Transform::from_position(Vec3::new(0.0, 5.0, 0.0));
    t.look_at(Vec3::ZERO, Vec3::Y);

    assert!((t.forward() - Vec3::NEG_Y).length() < 1e-5);
    assert!(t.rotation.is_normalized());
}

#[test]
fn test_look_at_own_position_is_ignored() {
    let mut t = Transform::from_position(Vec3::ONE);
    let before = t.rotation;
    t.look_at(Vec3::ONE, Vec3::Y);
    assert_eq!(t.rotation, before);
}

#[test]
fn test_matrix_places_origin_at_position() {
    let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(t.matrix().transform_point3(Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0));
}
