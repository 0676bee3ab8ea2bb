// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The seam between sensing and whatever owns world geometry.

use crate::define_index;
use crate::spatial::Vec3;

define_index!(
    ObstacleLayer,
    u8,
    "Collision layer a ray query is restricted to. Geometry on other layers is ignored."
);

impl ObstacleLayer {
    pub const WALLS: ObstacleLayer = ObstacleLayer::from(1);
    pub const TARGETS: ObstacleLayer = ObstacleLayer::from(2);
}

/// Nearest intersection of a ray with the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin along the (unit) direction.
    pub distance: f64,
    /// World-space intersection point.
    pub point: Vec3,
}

/// World-collision query supplied by the physics/scene collaborator.
pub trait CollisionQuery {
    /// Casts a ray from `origin` along the unit vector `direction` and returns
    /// the nearest hit on `layer`, if any.
    fn cast_ray(&self, origin: &Vec3, direction: &Vec3, layer: ObstacleLayer) -> Option<RayHit>;
}

impl<F> CollisionQuery for F
where
    F: Fn(&Vec3, &Vec3, ObstacleLayer) -> Option<RayHit>,
{
    fn cast_ray(&self, origin: &Vec3, direction: &Vec3, layer: ObstacleLayer) -> Option<RayHit> {
        self(origin, direction, layer)
    }
}

/// A world with nothing in it.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyScene;

impl CollisionQuery for EmptyScene {
    fn cast_ray(&self, _origin: &Vec3, _direction: &Vec3, _layer: ObstacleLayer) -> Option<RayHit> {
        None
    }
}
