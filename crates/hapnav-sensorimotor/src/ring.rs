// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The ring of sensors around the drone and their interval polling.

use std::f64::consts::{FRAC_PI_2, TAU};

use hapnav_structures::{
    CollisionQuery, NavDataError, NavSignal, NavSignalIndex, ObstacleLayer, Pose, Vec3,
};
use tracing::{debug, trace};

use crate::sensor::{DistanceSensor, SensorId, SensorReading, SensorSpec, SubRayCount};

/// Local direction of sensor `index` on a ring of `num_probes`.
///
/// Sensor 0 points along `-y` and indices advance counter-clockwise.
pub fn ring_direction(index: u32, num_probes: u32) -> Vec3 {
    let angle = f64::from(index) * (TAU / f64::from(num_probes.max(1))) - FRAC_PI_2;
    Vec3::new(angle.cos(), angle.sin(), 0.0)
}

pub struct SensorRing {
    sensors: Vec<DistanceSensor>,
    sensor_distance: f64,
    active: Option<SensorId>,
    latest: Vec<SensorReading>,
    poll_interval_ms: i64,
    last_poll_ms: Option<i64>,
    on_reading: NavSignal<SensorReading>,
}

impl SensorRing {
    /// Builds `num_probes` equally spaced sensors whose cones together cover
    /// the full circle.
    pub fn new(
        num_probes: u32,
        sensor_distance: f64,
        sub_rays: SubRayCount,
        layer: ObstacleLayer,
        poll_interval_ms: u64,
    ) -> Result<Self, NavDataError> {
        if num_probes == 0 {
            return Err(NavDataError::BadParameters(
                "A sensor ring needs at least one probe".into(),
            ));
        }
        let poll_interval_ms = i64::try_from(poll_interval_ms).map_err(|_| {
            NavDataError::BadParameters(format!("Poll interval {} ms is too large", poll_interval_ms))
        })?;
        let angle_range = TAU / f64::from(num_probes);
        let sensors = (0..num_probes)
            .map(|i| {
                let spec = SensorSpec::new(
                    SensorId::from(i),
                    ring_direction(i, num_probes) * sensor_distance.abs().max(f64::EPSILON),
                    angle_range,
                    sub_rays,
                )?;
                Ok(DistanceSensor::new(spec, layer))
            })
            .collect::<Result<Vec<_>, NavDataError>>()?;

        debug!(num_probes, sub_rays = *sub_rays, angle_range, "sensor ring created");
        Ok(Self {
            sensors,
            sensor_distance,
            active: None,
            latest: Vec::new(),
            poll_interval_ms,
            last_poll_ms: None,
            on_reading: NavSignal::new(),
        })
    }

    /// Index of the forward-facing sensor
    pub fn front_sensor(&self) -> SensorId {
        SensorId::from(self.sensors.len() as u32 / 2)
    }

    /// Restricts sensing to the forward-facing sensor.
    pub fn front_only(mut self) -> Self {
        self.active = Some(self.front_sensor());
        self
    }

    /// Restricts sensing to one sensor, or re-enables all with `None`.
    pub fn set_active(&mut self, sensor: Option<SensorId>) -> Result<(), NavDataError> {
        if let Some(id) = sensor {
            if id.as_index() >= self.sensors.len() {
                return Err(NavDataError::BadParameters(format!(
                    "Sensor {} does not exist on a ring of {}",
                    id,
                    self.sensors.len()
                )));
            }
        }
        self.active = sensor;
        self.latest.clear();
        Ok(())
    }

    pub fn sensors(&self) -> &[DistanceSensor] {
        &self.sensors
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    /// Where a sensor's probe sits in the agent frame
    pub fn probe_offset(&self, id: SensorId) -> Option<Vec3> {
        self.sensors
            .get(id.as_index())
            .map(|s| s.spec().base_direction() * self.sensor_distance)
    }

    /// Readings from the last [`SensorRing::sense`] call
    pub fn latest(&self) -> &[SensorReading] {
        &self.latest
    }

    /// Runs every active sensor once.
    pub fn sense<Q: CollisionQuery + ?Sized>(&mut self, pose: &Pose, query: &Q) -> &[SensorReading] {
        let active = self.active;
        self.latest = self
            .sensors
            .iter()
            .filter(|s| active.map_or(true, |id| s.id() == id))
            .map(|s| s.sense(pose, query))
            .collect();
        &self.latest
    }

    /// Emits the latest readings to subscribers if the poll interval has
    /// elapsed since the last emission. Returns whether anything was emitted.
    pub fn poll(&mut self, now_ms: i64) -> bool {
        let due = self
            .last_poll_ms
            .map_or(true, |last| now_ms.saturating_sub(last) >= self.poll_interval_ms);
        if !due || self.latest.is_empty() {
            return false;
        }
        self.last_poll_ms = Some(now_ms);
        trace!(now_ms, readings = self.latest.len(), "sensor poll");
        for reading in &self.latest {
            self.on_reading.emit(reading);
        }
        true
    }

    /// Senses, then polls.
    pub fn tick<Q: CollisionQuery + ?Sized>(&mut self, pose: &Pose, query: &Q, now_ms: i64) -> bool {
        self.sense(pose, query);
        self.poll(now_ms)
    }

    pub fn subscribe<F>(&mut self, f: F) -> NavSignalIndex
    where
        F: FnMut(&SensorReading) + Send + 'static,
    {
        self.on_reading.connect(f)
    }

    pub fn unsubscribe(&mut self, handle: NavSignalIndex) -> Result<(), NavDataError> {
        self.on_reading.disconnect(handle)
    }
}

impl std::fmt::Debug for SensorRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SensorRing")
            .field("sensors", &self.sensors.len())
            .field("active", &self.active)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("subscribers", &self.on_reading.listener_count())
            .finish()
    }
}
