use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use glam::Vec3;
use super::*;

fn at(position: Vec3) -> Transform {
    Transform::from_position(position)
}

fn approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-4
}

// ============================================================================
// Manual rotation
// ============================================================================

#[test]
fn test_rotate_zero_degrees_keeps_position() {
    let control = OrbitControl::new(Vec3::ZERO);
    let mut transform = at(Vec3::new(0.0, 1.0, 5.0));
    assert!(control.rotate(&mut transform, Vec3::Y, 0.0));
    assert!(approx(transform.position, Vec3::new(0.0, 1.0, 5.0)));
}

#[test]
fn test_rotate_full_turn_returns_to_start() {
    let control = OrbitControl::new(Vec3::new(1.0, 0.0, 0.0));
    let start = Vec3::new(1.0, 2.0, 4.0);
    let mut transform = at(start);
    control.rotate(&mut transform, Vec3::Y, 360.0);
    assert!(approx(transform.position, start));
}

#[test]
fn test_rotate_quarter_turn_about_y() {
    let control = OrbitControl::new(Vec3::ZERO);
    let mut transform = at(Vec3::new(0.0, 0.0, 5.0));
    control.rotate(&mut transform, Vec3::Y, 90.0);
    assert!(approx(transform.position, Vec3::new(5.0, 0.0, 0.0)));
}

#[test]
fn test_rotate_preserves_distance_and_faces_pivot() {
    let pivot = Vec3::new(0.0, 0.5, 0.0);
    let control = OrbitControl::new(pivot);
    let mut transform = at(Vec3::new(2.0, 1.0, 3.0));
    let distance = transform.position.distance(pivot);

    control.rotate(&mut transform, Vec3::new(1.0, 1.0, 0.0), 37.0);

    assert!((transform.position.distance(pivot) - distance).abs() < 1e-4);
    let expected = (pivot - transform.position).normalize();
    assert!(approx(transform.forward(), expected));
}

#[test]
fn test_rotate_zero_axis_is_noop() {
    let control = OrbitControl::new(Vec3::ZERO);
    let mut transform = at(Vec3::new(0.0, 0.0, 5.0));
    assert!(!control.rotate(&mut transform, Vec3::ZERO, 45.0));
    assert_eq!(transform.position, Vec3::new(0.0, 0.0, 5.0));
}

// ============================================================================
// Restrictions
// ============================================================================

#[test]
fn test_rejecting_restriction_cancels_move() {
    let mut control = OrbitControl::new(Vec3::ZERO);
    control.add_restriction(|proposed, current| (false, current + proposed));
    let before = at(Vec3::new(0.0, 0.0, 5.0));
    let mut transform = before;

    assert!(!control.rotate(&mut transform, Vec3::Y, 30.0));
    assert_eq!(transform, before);
}

#[test]
fn test_last_clamp_wins() {
    let mut control = OrbitControl::new(Vec3::ZERO);
    control.add_restriction(|_, _| (true, Vec3::new(1.0, 0.0, 0.0)));
    control.add_restriction(|_, _| (true, Vec3::new(0.0, 0.0, 2.0)));
    let mut transform = at(Vec3::new(0.0, 0.0, 5.0));

    assert!(control.rotate(&mut transform, Vec3::Y, 30.0));
    assert_eq!(transform.position, Vec3::new(0.0, 0.0, 2.0));
}

#[test]
fn test_restrictions_see_original_proposal() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut control = OrbitControl::new(Vec3::ZERO);
    control.add_restriction(|_, _| (true, Vec3::new(9.0, 9.0, 9.0)));
    let record = seen.clone();
    control.add_restriction(move |proposed, current| {
        record.borrow_mut().push((proposed, current));
        (true, proposed)
    });

    let mut transform = at(Vec3::new(0.0, 0.0, 5.0));
    control.rotate(&mut transform, Vec3::Y, 90.0);

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert!(approx(seen[0].0, Vec3::new(5.0, 0.0, 0.0)));
    assert_eq!(seen[0].1, Vec3::new(0.0, 0.0, 5.0));
}

#[test]
fn test_rejection_stops_later_restrictions() {
    let calls = Rc::new(RefCell::new(0));
    let mut control = OrbitControl::new(Vec3::ZERO);
    control.add_restriction(|_, current| (false, current));
    let counter = calls.clone();
    control.add_restriction(move |proposed, _| {
        *counter.borrow_mut() += 1;
        (true, proposed)
    });

    let mut transform = at(Vec3::new(0.0, 0.0, 5.0));
    control.rotate(&mut transform, Vec3::Y, 10.0);
    assert_eq!(*calls.borrow(), 0);
    assert_eq!(control.restriction_count(), 2);
}

#[test]
fn test_pitch_band_restriction() {
    let mut control = OrbitControl::new(Vec3::ZERO);
    control.add_restriction(|proposed, current| {
        if (0.0..=2.0).contains(&proposed.y) { (true, proposed) } else { (false, current) }
    });
    let mut transform = at(Vec3::new(0.0, 1.0, 3.0));
    let right = transform.right();

    // Large pitch pushes the camera above the band
    assert!(!control.rotate(&mut transform, right, -60.0));
    assert_eq!(transform.position, Vec3::new(0.0, 1.0, 3.0));
}

// ============================================================================
// Continuous motion
// ============================================================================

#[test]
fn test_continuous_steps_follow_speed() {
    let mut control = OrbitControl::new(Vec3::ZERO);
    let mut transform = at(Vec3::new(0.0, 0.0, 5.0));

    // 10 deg/s: one 1-degree step every 100 ms, first one immediately
    assert!(control.start_continuous(Vec3::Y, 10.0, Duration::ZERO));
    assert_eq!(control.advance(&mut transform, Duration::ZERO), 1);
    assert_eq!(control.advance(&mut transform, Duration::from_millis(50)), 0);
    for step in 1..=10 {
        assert_eq!(control.advance(&mut transform, Duration::from_millis(step * 100)), 1);
    }

    let mut expected = at(Vec3::new(0.0, 0.0, 5.0));
    OrbitControl::new(Vec3::ZERO).rotate(&mut expected, Vec3::Y, 11.0);
    assert!(approx(transform.position, expected.position));
}

#[test]
fn test_second_start_is_ignored() {
    let mut control = OrbitControl::new(Vec3::ZERO);
    assert!(control.start_continuous(Vec3::Y, 60.0, Duration::ZERO));
    assert!(!control.start_continuous(Vec3::X, 120.0, Duration::ZERO));
    assert!(control.is_running());
}

#[test]
fn test_invalid_speed_is_rejected() {
    let mut control = OrbitControl::new(Vec3::ZERO);
    assert!(!control.start_continuous(Vec3::Y, 0.0, Duration::ZERO));
    assert!(!control.start_continuous(Vec3::Y, f32::NAN, Duration::ZERO));
    assert!(!control.is_running());
}

#[test]
fn test_speed_too_slow_for_duration_is_rejected() {
    let mut control = OrbitControl::new(Vec3::ZERO);
    assert_eq!(step_interval(1e-20), None);
    assert!(!control.start_continuous(Vec3::Y, 1e-20, Duration::ZERO));
    assert!(!control.is_running());

    assert_eq!(step_interval(20.0), Some(Duration::from_millis(50)));
}

#[test]
fn test_stall_yields_single_late_step() {
    let mut control = OrbitControl::new(Vec3::ZERO);
    let mut transform = at(Vec3::new(0.0, 0.0, 5.0));
    control.start_continuous(Vec3::Y, 60.0, Duration::ZERO);
    assert_eq!(control.advance(&mut transform, Duration::ZERO), 1);

    assert_eq!(control.advance(&mut transform, Duration::from_secs(2)), 1);

    let mut expected = at(Vec3::new(0.0, 0.0, 5.0));
    OrbitControl::new(Vec3::ZERO).rotate(&mut expected, Vec3::Y, 2.0);
    assert!(approx(transform.position, expected.position));
}

#[test]
fn test_manual_rotate_ignored_while_running() {
    let mut control = OrbitControl::new(Vec3::ZERO);
    let mut transform = at(Vec3::new(0.0, 0.0, 5.0));
    control.start_continuous(Vec3::Y, 10.0, Duration::ZERO);

    assert!(!control.rotate(&mut transform, Vec3::Y, 45.0));
    assert_eq!(transform.position, Vec3::new(0.0, 0.0, 5.0));
}

#[test]
fn test_stop_drops_pending_steps() {
    let mut control = OrbitControl::new(Vec3::ZERO);
    let mut transform = at(Vec3::new(0.0, 0.0, 5.0));
    control.start_continuous(Vec3::Y, 10.0, Duration::ZERO);
    control.stop();

    assert!(!control.is_running());
    assert_eq!(control.advance(&mut transform, Duration::from_secs(5)), 0);
    assert_eq!(transform.position, Vec3::new(0.0, 0.0, 5.0));

    // Manual rotation works again
    assert!(control.rotate(&mut transform, Vec3::Y, 10.0));
}

#[test]
fn test_restart_after_stop() {
    let mut control = OrbitControl::new(Vec3::ZERO);
    let mut transform = at(Vec3::new(0.0, 0.0, 5.0));
    control.start_continuous(Vec3::Y, 10.0, Duration::ZERO);
    control.stop();

    assert!(control.start_continuous(Vec3::Y, 10.0, Duration::from_secs(2)));
    assert_eq!(control.advance(&mut transform, Duration::from_secs(2)), 1);
}

#[test]
fn test_rejected_steps_do_not_move() {
    let mut control = OrbitControl::new(Vec3::ZERO);
    control.add_restriction(|_, current| (false, current));
    let mut transform = at(Vec3::new(0.0, 0.0, 5.0));
    control.start_continuous(Vec3::Y, 10.0, Duration::ZERO);

    assert_eq!(control.advance(&mut transform, Duration::from_millis(500)), 0);
    assert_eq!(transform.position, Vec3::new(0.0, 0.0, 5.0));
}
