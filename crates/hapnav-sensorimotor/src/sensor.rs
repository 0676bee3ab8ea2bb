// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Cone proximity sensor.
//!
//! A sensor samples its cone with several sub-rays swept around the agent's
//! up axis and reports the single nearest hit across all of them.

use hapnav_structures::nalgebra::UnitQuaternion;
use hapnav_structures::spatial::up_axis;
use hapnav_structures::{
    define_index, define_nonzero_count, CollisionQuery, NavDataError, ObstacleLayer, Pose, RayHit,
    Vec3,
};

define_index!(SensorId, u32, "Index of a sensor on the drone's ring");

define_nonzero_count!(SubRayCount, u32, "Number of rays sampling a sensor cone (must be > 0)");

/// Immutable description of one sensor.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorSpec {
    id: SensorId,
    base_direction: Vec3,
    angle_range: f64,
    sub_ray_count: SubRayCount,
}

impl SensorSpec {
    /// `base_direction` is in the agent's local frame and gets normalized.
    pub fn new(
        id: SensorId,
        base_direction: Vec3,
        angle_range: f64,
        sub_ray_count: SubRayCount,
    ) -> Result<Self, NavDataError> {
        let norm = base_direction.norm();
        if !norm.is_finite() || norm <= f64::EPSILON {
            return Err(NavDataError::BadParameters(format!(
                "Sensor {} needs a non-zero base direction",
                id
            )));
        }
        if !angle_range.is_finite() || angle_range < 0.0 {
            return Err(NavDataError::BadParameters(format!(
                "Sensor {} angle range must be finite and non-negative, got {}",
                id, angle_range
            )));
        }
        Ok(Self {
            id,
            base_direction: base_direction / norm,
            angle_range,
            sub_ray_count,
        })
    }

    pub fn id(&self) -> SensorId {
        self.id
    }

    pub fn base_direction(&self) -> &Vec3 {
        &self.base_direction
    }

    pub fn angle_range(&self) -> f64 {
        self.angle_range
    }

    pub fn sub_ray_count(&self) -> SubRayCount {
        self.sub_ray_count
    }

    /// Sub-ray directions in the local frame, evenly spread over
    /// `[-angle_range / 2, angle_range / 2]`. One ray points straight along
    /// the base direction.
    pub fn sub_directions(&self) -> Vec<Vec3> {
        let count = *self.sub_ray_count;
        if count == 1 {
            return vec![self.base_direction];
        }
        let half = self.angle_range / 2.0;
        let step = self.angle_range / f64::from(count - 1);
        (0..count)
            .map(|k| {
                let angle = -half + step * f64::from(k);
                UnitQuaternion::from_axis_angle(&up_axis(), angle) * self.base_direction
            })
            .collect()
    }
}

/// One sensor's reading for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub sensor_id: SensorId,
    /// Never negative; infinite when nothing was hit
    pub hit_distance: f64,
    /// Unit vector towards the hit in the agent frame, zero when nothing was hit
    pub hit_direction: Vec3,
}

impl SensorReading {
    pub fn no_hit(sensor_id: SensorId) -> Self {
        Self {
            sensor_id,
            hit_distance: f64::INFINITY,
            hit_direction: Vec3::zeros(),
        }
    }

    pub fn is_hit(&self) -> bool {
        self.hit_distance.is_finite()
    }
}

#[derive(Debug, Clone)]
pub struct DistanceSensor {
    spec: SensorSpec,
    sub_directions: Vec<Vec3>,
    layer: ObstacleLayer,
}

impl DistanceSensor {
    pub fn new(spec: SensorSpec, layer: ObstacleLayer) -> Self {
        let sub_directions = spec.sub_directions();
        Self {
            spec,
            sub_directions,
            layer,
        }
    }

    pub fn spec(&self) -> &SensorSpec {
        &self.spec
    }

    pub fn id(&self) -> SensorId {
        self.spec.id
    }

    pub fn layer(&self) -> ObstacleLayer {
        self.layer
    }

    /// Casts every sub-ray from the agent position and keeps the nearest hit
    /// of the whole fan.
    pub fn sense<Q: CollisionQuery + ?Sized>(&self, pose: &Pose, query: &Q) -> SensorReading {
        let nearest = self
            .sub_directions
            .iter()
            .filter_map(|local| {
                let world = pose.local_to_world_direction(local);
                query.cast_ray(&pose.position, &world, self.layer)
            })
            .filter(|hit| hit.distance.is_finite() && hit.distance >= 0.0)
            .min_by(|a, b| a.distance.total_cmp(&b.distance));

        match nearest {
            Some(hit) => self.reading_from_hit(pose, &hit),
            None => SensorReading::no_hit(self.spec.id),
        }
    }

    fn reading_from_hit(&self, pose: &Pose, hit: &RayHit) -> SensorReading {
        let local = pose.world_to_local_point(&hit.point);
        let distance = local.norm();
        let direction = if distance > f64::EPSILON {
            local / distance
        } else {
            Vec3::zeros()
        };
        SensorReading {
            sensor_id: self.spec.id,
            hit_distance: distance,
            hit_direction: direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hapnav_structures::EmptyScene;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    fn spec(rays: u32, range: f64) -> SensorSpec {
        SensorSpec::new(
            SensorId::from(0),
            Vec3::new(1.0, 0.0, 0.0),
            range,
            SubRayCount::new(rays).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_sub_directions_span_cone() {
        let dirs = spec(3, FRAC_PI_2).sub_directions();
        assert_eq!(dirs.len(), 3);
        assert!((dirs[0] - Vec3::new(FRAC_PI_4.cos(), -FRAC_PI_4.sin(), 0.0)).norm() < 1e-9);
        assert!((dirs[1] - Vec3::new(1.0, 0.0, 0.0)).norm() < 1e-9);
        assert!((dirs[2] - Vec3::new(FRAC_PI_4.cos(), FRAC_PI_4.sin(), 0.0)).norm() < 1e-9);
    }

    #[test]
    fn test_single_ray_uses_base_direction() {
        let dirs = spec(1, FRAC_PI_2).sub_directions();
        assert_eq!(dirs, vec![Vec3::new(1.0, 0.0, 0.0)]);
    }

    #[test]
    fn test_invalid_specs() {
        let rays = SubRayCount::new(1).unwrap();
        assert!(SensorSpec::new(SensorId::from(0), Vec3::zeros(), 0.1, rays).is_err());
        assert!(SensorSpec::new(SensorId::from(0), Vec3::x(), -0.1, rays).is_err());
        assert!(SensorSpec::new(SensorId::from(0), Vec3::x(), f64::NAN, rays).is_err());
        assert!(SubRayCount::new(0).is_err());
    }

    #[test]
    fn test_empty_scene_reads_infinity() {
        let sensor = DistanceSensor::new(spec(5, FRAC_PI_4), ObstacleLayer::WALLS);
        let reading = sensor.sense(&Pose::default(), &EmptyScene);
        assert!(!reading.is_hit());
        assert_eq!(reading.hit_distance, f64::INFINITY);
        assert_eq!(reading.hit_direction, Vec3::zeros());
    }
}
