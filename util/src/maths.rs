//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::UnitQuaternion;
use num_traits::Float;

/// Return the squared euclidian distance between two planar points.
///
/// The square root is not taken, so this is only suitable for comparing
/// distances against each other.
pub fn planar_dist_sq<T>(point_0: (T, T), point_1: (T, T)) -> T
where
    T: Float
{
    let dx = point_0.0 - point_1.0;
    let dy = point_0.1 - point_1.1;

    dx * dx + dy * dy
}

/// Convert a heading (rotation about the vertical axis) in radians into an
/// attitude quaternion with zero roll and pitch.
pub fn yaw_to_attitude_q(yaw_rad: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_euler_angles(0.0, 0.0, yaw_rad)
}

/// Wrap an angle in radians into the range [-pi, pi].
pub fn wrap_pi<T>(value: T) -> T
where
    T: Float
{
    let pi_t: T = T::from(std::f64::consts::PI).unwrap();
    let tau_t: T = T::from(std::f64::consts::TAU).unwrap();

    let mut r = (value + pi_t) % tau_t;
    if r < T::zero() {
        r = r + tau_t;
    }

    r - pi_t
}
