//! Smoothing and damping helpers for per-tick integration
//!
//! Everything here is stateless: callers own the velocity state and pass it
//! back in each tick, so the same helpers work for any number of springs.

use glam::{Quat, Vec3};

/// Move a vector towards a target by a maximum delta
pub fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let diff = target - current;
    let distance = diff.length();

    if distance <= max_delta || distance == 0.0 {
        target
    } else {
        current + diff / distance * max_delta
    }
}

/// Rotate a direction vector towards a target direction, clamped to
/// `max_radians` of angular change. The input's magnitude is preserved.
pub fn rotate_towards(current: Vec3, target: Vec3, max_radians: f32) -> Vec3 {
    let angle = current.angle_between(target);
    if !angle.is_finite() || angle < 1e-6 {
        return target;
    }

    let step = (max_radians / angle).min(1.0);
    let axis = current.cross(target);
    // Antiparallel vectors have no unique rotation plane; pick the Y axis
    let axis = if axis.length_squared() < 1e-12 {
        Vec3::Y
    } else {
        axis.normalize()
    };

    Quat::from_axis_angle(axis, angle * step) * current
}

/// Critically-damped spring towards a target value (a "smooth damp").
///
/// Moves `current` towards `target` over roughly `smooth_time` seconds
/// without overshooting, clamped to `max_speed`. The caller keeps the
/// spring's velocity in `velocity` between ticks.
pub fn smooth_damp(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    max_speed: f32,
    dt: f32,
) -> f32 {
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;

    // Stable Padé approximation of exp(-omega * dt)
    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let mut change = current - target;
    let original_target = target;

    let max_change = max_speed * smooth_time;
    change = change.clamp(-max_change, max_change);
    let target = current - change;

    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * exp;
    let mut output = target + (change + temp) * exp;

    // Clamp to the target if the spring would carry us past it
    if (original_target - current > 0.0) == (output > original_target) {
        output = original_target;
        *velocity = (output - original_target) / dt;
    }

    output
}

/// [`smooth_damp`] for angles in radians, damping along the shortest arc.
pub fn smooth_damp_angle(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    max_speed: f32,
    dt: f32,
) -> f32 {
    let target = current + delta_angle(current, target);
    smooth_damp(current, target, velocity, smooth_time, max_speed, dt)
}

/// Shortest signed difference between two angles in radians
pub fn delta_angle(current: f32, target: f32) -> f32 {
    let tau = std::f32::consts::TAU;
    let mut delta = (target - current).rem_euclid(tau);
    if delta > std::f32::consts::PI {
        delta -= tau;
    }
    delta
}

/// Yaw-only rotation facing `direction` on the horizontal plane.
///
/// Follows the engine convention that forward is -Z: the returned rotation
/// maps -Z onto the (flattened, normalized) direction.
pub fn look_rotation_y(direction: Vec3) -> Quat {
    Quat::from_rotation_y((-direction.x).atan2(-direction.z))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_towards() {
        let result = move_towards(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 5.0);
        assert!((result.x - 5.0).abs() < 0.001);

        // Within max delta we land exactly on the target
        let result = move_towards(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), 5.0);
        assert_eq!(result, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_rotate_towards_clamps_angle() {
        let current = Vec3::new(0.0, 0.0, -1.0);
        let target = Vec3::new(1.0, 0.0, 0.0);

        let step = rotate_towards(current, target, 0.1);
        assert!((step.angle_between(current) - 0.1).abs() < 1e-3);
        assert!((step.length() - 1.0).abs() < 1e-5);

        // A large enough step reaches the target in one call
        let full = rotate_towards(current, target, 10.0);
        assert!(full.angle_between(target) < 1e-4);
    }

    #[test]
    fn test_smooth_damp_converges_without_overshoot() {
        let mut value = 0.0;
        let mut velocity = 0.0;
        for _ in 0..240 {
            value = smooth_damp(value, 10.0, &mut velocity, 0.2, f32::INFINITY, 1.0 / 60.0);
            assert!(value <= 10.0 + 1e-4);
        }
        assert!((value - 10.0).abs() < 0.01);
    }

    #[test]
    fn test_smooth_damp_respects_max_speed() {
        let mut value = 0.0;
        let mut velocity = 0.0;
        let dt = 1.0 / 60.0;
        for _ in 0..10 {
            let next = smooth_damp(value, 1000.0, &mut velocity, 0.2, 5.0, dt);
            assert!(next - value <= 5.0 * dt + 1e-4);
            value = next;
        }
    }

    #[test]
    fn test_smooth_damp_angle_wraps() {
        // 350 degrees to 10 degrees should travel through 0, not through 180
        let mut velocity = 0.0;
        let current = 350.0_f32.to_radians();
        let target = 10.0_f32.to_radians();
        let next = smooth_damp_angle(current, target, &mut velocity, 0.3, f32::INFINITY, 1.0 / 60.0);
        assert!(next > current || next < 0.5);
    }

    #[test]
    fn test_delta_angle() {
        let d = delta_angle(350.0_f32.to_radians(), 10.0_f32.to_radians());
        assert!((d - 20.0_f32.to_radians()).abs() < 1e-4);

        let d = delta_angle(10.0_f32.to_radians(), 350.0_f32.to_radians());
        assert!((d + 20.0_f32.to_radians()).abs() < 1e-4);
    }

    #[test]
    fn test_look_rotation_y() {
        let rot = look_rotation_y(Vec3::new(1.0, 0.0, 0.0));
        let forward = rot * -Vec3::Z;
        assert!((forward - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);

        let rot = look_rotation_y(Vec3::new(0.0, 0.0, -1.0));
        let forward = rot * -Vec3::Z;
        assert!((forward - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }
}
