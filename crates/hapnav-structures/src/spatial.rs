// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Poses and rotation helpers.
//!
//! The drone moves in the world XY plane with `+z` as its up axis. Euler
//! angles use the intrinsic XYZ convention (`R = Rx * Ry * Rz`), which is the
//! convention session logs are recorded in.

use nalgebra::{Unit, UnitQuaternion, Vector3};

pub type Vec3 = Vector3<f64>;

/// Axis sensor cones are swept around, in the agent's local frame.
pub fn up_axis() -> Unit<Vec3> {
    Vector3::z_axis()
}

/// Direction the drone faces in its local frame.
pub fn forward() -> Vec3 {
    Vector3::new(0.0, 1.0, 0.0)
}

/// World position and orientation of an agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: UnitQuaternion<f64>,
}

impl Pose {
    pub fn new(position: Vec3, orientation: UnitQuaternion<f64>) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Pose rotated by `yaw` radians around the up axis.
    pub fn from_yaw(position: Vec3, yaw: f64) -> Self {
        Self::new(position, UnitQuaternion::from_axis_angle(&up_axis(), yaw))
    }

    pub fn local_to_world_direction(&self, local: &Vec3) -> Vec3 {
        self.orientation * local
    }

    pub fn local_to_world_point(&self, local: &Vec3) -> Vec3 {
        self.position + self.orientation * local
    }

    pub fn world_to_local_point(&self, world: &Vec3) -> Vec3 {
        self.orientation.inverse() * (world - self.position)
    }

    /// Euler angles (XYZ order) of the orientation.
    pub fn euler_angles(&self) -> Vec3 {
        euler_xyz_from_quaternion(&self.orientation)
    }

    /// Heading in world space: the local forward vector rotated into the world.
    pub fn heading(&self) -> Vec3 {
        self.orientation * forward()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(Vec3::zeros(), UnitQuaternion::identity())
    }
}

/// Decomposes a rotation into XYZ Euler angles.
///
/// Near gimbal lock (`|m13| ≈ 1`) the Z angle is folded into X.
pub fn euler_xyz_from_quaternion(q: &UnitQuaternion<f64>) -> Vec3 {
    let rotation = q.to_rotation_matrix();
    let m = rotation.matrix();
    let m13 = m[(0, 2)].clamp(-1.0, 1.0);
    let y = m13.asin();
    let (x, z) = if m13.abs() < 0.999_999_9 {
        ((-m[(1, 2)]).atan2(m[(2, 2)]), (-m[(0, 1)]).atan2(m[(0, 0)]))
    } else {
        (m[(2, 1)].atan2(m[(1, 1)]), 0.0)
    };
    Vec3::new(x, y, z)
}

/// Builds a rotation from XYZ Euler angles.
pub fn quaternion_from_euler_xyz(euler: &Vec3) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::x_axis(), euler.x)
        * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), euler.y)
        * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), euler.z)
}

/// Heading implied by XYZ Euler angles (forward vector rotated by them).
pub fn heading_from_euler(euler: &Vec3) -> Vec3 {
    quaternion_from_euler_xyz(euler) * forward()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn assert_vec_close(a: &Vec3, b: &Vec3) {
        assert!((a - b).norm() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn test_yaw_only_euler_round_trip() {
        let pose = Pose::from_yaw(Vec3::zeros(), 0.7);
        let euler = pose.euler_angles();
        assert!(euler.x.abs() < 1e-12);
        assert!(euler.y.abs() < 1e-12);
        assert!((euler.z - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_general_euler_round_trip() {
        let euler = Vec3::new(0.3, -0.4, 1.1);
        let q = quaternion_from_euler_xyz(&euler);
        assert_vec_close(&euler_xyz_from_quaternion(&q), &euler);
    }

    #[test]
    fn test_heading_rotates_with_yaw() {
        let pose = Pose::from_yaw(Vec3::zeros(), FRAC_PI_2);
        assert_vec_close(&pose.heading(), &Vec3::new(-1.0, 0.0, 0.0));
        assert_vec_close(&heading_from_euler(&pose.euler_angles()), &pose.heading());
    }

    #[test]
    fn test_world_local_point_inverse() {
        let pose = Pose::from_yaw(Vec3::new(1.0, 2.0, 0.0), 1.2);
        let local = Vec3::new(0.5, -0.25, 0.0);
        let world = pose.local_to_world_point(&local);
        assert_vec_close(&pose.world_to_local_point(&world), &local);
    }
}
