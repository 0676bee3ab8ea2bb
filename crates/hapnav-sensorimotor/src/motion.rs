// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Stick input to drone velocity, and a kinematic integrator.

use hapnav_structures::nalgebra::UnitQuaternion;
use hapnav_structures::spatial::up_axis;
use hapnav_structures::{Pose, Vec3};

pub fn apply_deadzone(value: f64, deadzone: f64) -> f64 {
    if value.abs() < deadzone {
        0.0
    } else {
        value
    }
}

/// Normalised stick axes in `[-1, 1]`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StickInput {
    pub x: f64,
    pub y: f64,
    pub yaw: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionCommand {
    /// World frame
    pub linear_velocity: Vec3,
    /// Radians per second around the up axis
    pub yaw_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionModel {
    pub speed_gain: f64,
    pub angular_speed_gain: f64,
    pub deadzone: f64,
}

impl MotionModel {
    pub fn new(speed_gain: f64, angular_speed_gain: f64, deadzone: f64) -> Self {
        Self {
            speed_gain,
            angular_speed_gain,
            deadzone,
        }
    }

    /// Stick `y` is screen-down positive, so forward motion is `-y`.
    pub fn command(&self, input: &StickInput, pose: &Pose) -> MotionCommand {
        let x = apply_deadzone(input.x, self.deadzone);
        let y = apply_deadzone(input.y, self.deadzone);
        let yaw = apply_deadzone(input.yaw, self.deadzone);
        let local = Vec3::new(x, -y, 0.0) * self.speed_gain;
        MotionCommand {
            linear_velocity: pose.local_to_world_direction(&local),
            yaw_rate: -yaw * self.angular_speed_gain,
        }
    }
}

impl Default for MotionModel {
    fn default() -> Self {
        Self::new(0.3, 0.5, 0.15)
    }
}

/// Advances `pose` by `dt` seconds.
pub fn integrate(pose: &Pose, command: &MotionCommand, dt: f64) -> Pose {
    let spin = UnitQuaternion::from_axis_angle(&up_axis(), command.yaw_rate * dt);
    Pose::new(
        pose.position + command.linear_velocity * dt,
        spin * pose.orientation,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_deadzone() {
        assert_eq!(apply_deadzone(0.1, 0.15), 0.0);
        assert_eq!(apply_deadzone(-0.1, 0.15), 0.0);
        assert_eq!(apply_deadzone(0.2, 0.15), 0.2);
    }

    #[test]
    fn test_forward_stick_moves_along_heading() {
        let model = MotionModel::default();
        let pose = Pose::from_yaw(Vec3::zeros(), FRAC_PI_2);
        let command = model.command(&StickInput { x: 0.0, y: -1.0, yaw: 0.05 }, &pose);
        // Facing +y rotated a quarter turn is -x
        assert!((command.linear_velocity - Vec3::new(-0.3, 0.0, 0.0)).norm() < 1e-9);
        assert_eq!(command.yaw_rate, 0.0);
    }

    #[test]
    fn test_integrate() {
        let command = MotionCommand {
            linear_velocity: Vec3::new(1.0, 0.0, 0.0),
            yaw_rate: -0.5,
        };
        let next = integrate(&Pose::default(), &command, 2.0);
        assert!((next.position - Vec3::new(2.0, 0.0, 0.0)).norm() < 1e-9);
        assert!((next.euler_angles().z + 1.0).abs() < 1e-9);
    }
}
