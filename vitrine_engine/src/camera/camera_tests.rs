use glam::{Mat4, Vec3};
use super::*;

fn create_test_camera() -> Camera {
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
    let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, 16.0 / 9.0, 0.1, 100.0);
    Camera::new(view, proj, Frustum::from_view_projection(&(proj * view)), Viewport::new(1920, 1080))
}

// ============================================================================
// Viewport
// ============================================================================

#[test]
fn test_viewport_aspect_ratio() {
    let viewport = Viewport::new(1920, 1080);
    assert!((viewport.aspect_ratio() - 16.0 / 9.0).abs() < 1e-6);
}

#[test]
fn test_viewport_zero_height_aspect_is_one() {
    let viewport = Viewport::new(800, 0);
    assert_eq!(viewport.aspect_ratio(), 1.0);
    assert!(viewport.is_empty());
}

#[test]
fn test_viewport_from_physical_size() {
    let viewport: Viewport = winit::dpi::PhysicalSize::new(640u32, 480u32).into();
    assert_eq!(viewport, Viewport::new(640, 480));
}

// ============================================================================
// Camera
// ============================================================================

#[test]
fn test_camera_view_projection_is_product() {
    let camera = create_test_camera();
    let expected = *camera.projection_matrix() * *camera.view_matrix();
    assert_eq!(camera.view_projection_matrix(), expected);
}

#[test]
fn test_camera_setters_store_values() {
    let mut camera = create_test_camera();

    camera.set_view(Mat4::IDENTITY);
    camera.set_projection(Mat4::IDENTITY);
    camera.set_viewport(Viewport::new(10, 20));
    camera.set_frustum(Frustum::from_view_projection(&Mat4::IDENTITY));

    assert_eq!(*camera.view_matrix(), Mat4::IDENTITY);
    assert_eq!(*camera.projection_matrix(), Mat4::IDENTITY);
    assert_eq!(camera.viewport().height, 20);
    assert!(camera.frustum().contains_point(Vec3::new(0.0, 0.0, 0.5)));
}
