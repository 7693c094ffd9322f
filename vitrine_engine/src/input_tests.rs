use winit::dpi::PhysicalPosition;
use winit::event::DeviceId;
use super::*;

fn device() -> DeviceId {
    // SAFETY: only compared against, never handed to winit
    unsafe { DeviceId::dummy() }
}

// ============================================================================
// Drag deltas
// ============================================================================

#[test]
fn test_move_requires_held_button() {
    let mut router = InputRouter::new();
    assert_eq!(router.cursor_moved(10.0, 10.0), None);
    assert_eq!(router.cursor_moved(20.0, 30.0), None);
    assert_eq!(router.cursor(), Some(Vec2::new(20.0, 30.0)));
}

#[test]
fn test_drag_is_scaled_by_sensitivity() {
    let mut router = InputRouter::new();
    router.cursor_moved(100.0, 100.0);
    router.mouse_button(MouseButton::Right, ElementState::Pressed);

    assert_eq!(router.cursor_moved(110.0, 96.0), Some(InputEvent::Move { dx: 5.0, dy: -2.0 }));

    router.set_sensitivity(1.0);
    assert_eq!(router.cursor_moved(111.0, 96.0), Some(InputEvent::Move { dx: 1.0, dy: 0.0 }));

    router.mouse_button(MouseButton::Right, ElementState::Released);
    assert_eq!(router.cursor_moved(150.0, 150.0), None);
}

#[test]
fn test_first_move_after_leaving_does_not_jump() {
    let mut router = InputRouter::new();
    router.cursor_moved(0.0, 0.0);
    router.mouse_button(MouseButton::Left, ElementState::Pressed);
    router.cursor_left();

    assert_eq!(router.cursor_moved(300.0, 300.0), None);
    assert!(router.cursor_moved(302.0, 300.0).is_some());
}

#[test]
fn test_invalid_sensitivity_ignored() {
    let mut router = InputRouter::new();
    router.set_sensitivity(0.0);
    router.set_sensitivity(f32::NAN);
    assert_eq!(router.sensitivity(), DEFAULT_SENSITIVITY);
}

// ============================================================================
// Clicks
// ============================================================================

#[test]
fn test_left_press_clicks_at_cursor() {
    let mut router = InputRouter::new();
    assert_eq!(router.mouse_button(MouseButton::Left, ElementState::Pressed), None);
    router.mouse_button(MouseButton::Left, ElementState::Released);

    router.cursor_moved(42.0, 7.0);
    assert_eq!(
        router.mouse_button(MouseButton::Left, ElementState::Pressed),
        Some(InputEvent::Click { x: 42.0, y: 7.0 })
    );
    assert_eq!(router.mouse_button(MouseButton::Left, ElementState::Released), None);
    assert_eq!(router.mouse_button(MouseButton::Middle, ElementState::Pressed), None);
}

// ============================================================================
// Window events
// ============================================================================

#[test]
fn test_window_events() {
    let mut router = InputRouter::new();
    let moved = |x: f64, y: f64| WindowEvent::CursorMoved {
        device_id: device(),
        position: PhysicalPosition::new(x, y),
    };

    assert_eq!(router.handle_window_event(&moved(10.0, 20.0)), None);
    let press = WindowEvent::MouseInput {
        device_id: device(),
        state: ElementState::Pressed,
        button: MouseButton::Left,
    };
    assert_eq!(router.handle_window_event(&press), Some(InputEvent::Click { x: 10.0, y: 20.0 }));
    assert_eq!(router.handle_window_event(&moved(14.0, 20.0)), Some(InputEvent::Move { dx: 2.0, dy: 0.0 }));

    router.handle_window_event(&WindowEvent::Focused(false));
    assert!(!router.is_dragging());
    assert_eq!(router.handle_window_event(&moved(20.0, 20.0)), None);
}
