// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Tick-driven wiring of the maze, the sensor ring, haptic output and
//! session logging.
//!
//! One [`NavigationLoop::tick`] moves the drone from stick input, samples
//! the contact flags, runs the sensor ring, records a log entry and lets the
//! dispatcher drain the packet queue when its interval is due. Sensor
//! readings reach the haptic queue through the ring's subscription signal,
//! so sensing and sending keep their own cadences.

use std::f64::consts::FRAC_PI_2;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use hapnav_config::{validate_config, HapnavConfig, MapConfig};
use hapnav_maze::{GridWorld, MazeGenerator, MazeOutcome, PhysicalGrid, SharedGrid};
use hapnav_sensorimotor::{
    create_haptic_queue, integrate, ActuatorCount, HapticDispatcher, HapticEncoder, HapticError,
    HapticProducer, HapticTransport, MotionCommand, MotionModel, SensorReading, SensorRing,
    StickInput, SubRayCount,
};
use hapnav_session::{ContactFlags, FinishedSession, LogEntry, SessionRecorder};
use hapnav_structures::{ObstacleLayer, Pose, Vec3};

use crate::error::NavResult;

/// Yaw that turns the local forward axis (`+y`) towards world `+x`, i.e.
/// from the entrance into the maze.
const ENTRY_YAW: f64 = -FRAC_PI_2;

/// Counters updated from the sensor callback
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub readings_encoded: u64,
    pub packets_dropped: u64,
}

/// Summary of the last maze generation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationReport {
    pub width: usize,
    pub height: usize,
    pub attempts: u32,
    pub path_area_ratio: f64,
    pub satisfied: bool,
}

impl GenerationReport {
    fn from_outcome(outcome: &MazeOutcome) -> Self {
        Self {
            width: outcome.grid.width(),
            height: outcome.grid.height(),
            attempts: outcome.attempts,
            path_area_ratio: outcome.path_area_ratio,
            satisfied: outcome.satisfied,
        }
    }
}

/// What one tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub pose: Pose,
    pub command: MotionCommand,
    pub flags: ContactFlags,
    /// Sensor readings were handed to the haptic encoder
    pub polled: bool,
    /// Packets written to the transport during this tick
    pub packets_sent: usize,
    /// A log entry was appended
    pub logged: bool,
}

pub struct NavigationLoop<T: HapticTransport> {
    config: HapnavConfig,
    generator: MazeGenerator,
    grid: SharedGrid,
    world: GridWorld,
    ring: SensorRing,
    dispatcher: HapticDispatcher<T>,
    motion: MotionModel,
    pose: Pose,
    last_command: MotionCommand,
    recorder: SessionRecorder,
    last_generation: GenerationReport,
    stats: Arc<Mutex<PipelineStats>>,
}

impl<T: HapticTransport> NavigationLoop<T> {
    /// Validates `config`, generates the first maze and places the drone at
    /// the entrance facing into it.
    ///
    /// # Errors
    /// Invalid configuration, or a maze that cannot be generated.
    pub fn new(config: HapnavConfig, transport: T) -> NavResult<Self> {
        validate_config(&config)?;

        let mut generator = match config.map.seed {
            Some(seed) => MazeGenerator::with_seed(seed),
            None => MazeGenerator::new(),
        }
        .with_max_attempts(config.map.max_generation_attempts);
        let outcome = generate(&mut generator, &config.map)?;
        let last_generation = GenerationReport::from_outcome(&outcome);

        let grid = SharedGrid::new(outcome.grid);
        let world = GridWorld::new(grid.snapshot(), config.map.cell_size);

        let drone = &config.drone;
        let mut ring = SensorRing::new(
            drone.num_probes,
            drone.sensor_distance,
            SubRayCount::new(drone.num_sub_rays)?,
            ObstacleLayer::WALLS,
            drone.sensor_poll_interval_ms,
        )?;
        let encoder = HapticEncoder::new(
            config.haptic.max_sensor_distance,
            config.haptic.max_haptic_intensity,
            ActuatorCount::new(config.haptic.num_actuators)?,
        )?;

        let (producer, consumer) = create_haptic_queue(config.haptic.queue_capacity);
        let stats = Arc::new(Mutex::new(PipelineStats::default()));
        ring.subscribe(haptic_sink(encoder, producer, Arc::clone(&stats)));
        let dispatcher = HapticDispatcher::new(consumer, transport, config.serial.poll_interval_ms);

        let motion = MotionModel::new(
            drone.speed_gain,
            drone.angular_speed_gain,
            drone.thumbstick_deadzone,
        );
        let pose = entry_pose(&world);

        info!(
            width = last_generation.width,
            height = last_generation.height,
            probes = ring.len(),
            actuators = config.haptic.num_actuators,
            "navigation loop ready"
        );

        Ok(Self {
            config,
            generator,
            grid,
            world,
            ring,
            dispatcher,
            motion,
            pose,
            last_command: MotionCommand::default(),
            recorder: SessionRecorder::new(),
            last_generation,
            stats,
        })
    }

    /// Advances the simulation by `dt` seconds at wall-clock `now_ms`.
    ///
    /// A transport that is not ready leaves packets queued and is not an
    /// error; a failing write is.
    pub fn tick(&mut self, now_ms: i64, input: &StickInput, dt: f64) -> NavResult<TickReport> {
        let command = self.motion.command(input, &self.pose);
        self.pose = integrate(&self.pose, &command, dt.max(0.0));
        self.last_command = command;

        let flags = self.contact_flags(&self.pose.position);
        let polled = self.ring.tick(&self.pose, &self.world, now_ms);

        let entry = LogEntry::from_pose(
            &self.pose,
            command.linear_velocity,
            command.yaw_rate,
            flags,
            now_ms,
        );
        let logged = self.recorder.record(entry);

        let packets_sent = match self.dispatcher.poll(now_ms) {
            Ok(sent) => sent.unwrap_or(0),
            Err(HapticError::TransportNotReady(status)) => {
                debug!(%status, pending = self.dispatcher.pending(), "haptic packets held back");
                0
            }
            Err(err) => return Err(err.into()),
        };

        Ok(TickReport {
            pose: self.pose,
            command,
            flags,
            polled,
            packets_sent,
            logged,
        })
    }

    /// Zone and contact flags for a drone centred at `position`.
    pub fn contact_flags(&self, position: &Vec3) -> ContactFlags {
        let radius = self.config.drone.size;
        ContactFlags {
            cell_collide: self.world.collides_with_wall(position, radius),
            target_collide: self.world.reached_target(position, radius),
            in_map: self.world.contains(position),
        }
    }

    /// Generates a fresh maze, swaps it in and returns the drone to the
    /// entrance.
    pub fn regenerate(&mut self) -> NavResult<GenerationReport> {
        let outcome = generate(&mut self.generator, &self.config.map)?;
        let report = GenerationReport::from_outcome(&outcome);
        if !report.satisfied {
            warn!(
                ratio = report.path_area_ratio,
                required = self.config.map.min_path_area_ratio,
                "installing a maze below the requested path density"
            );
        }
        self.install(outcome.grid);
        self.last_generation = report;
        Ok(report)
    }

    /// Installs an externally supplied grid, e.g. one imported from JSON or CSV.
    pub fn load_grid(&mut self, grid: PhysicalGrid) {
        info!(width = grid.width(), height = grid.height(), "loading external grid");
        self.install(grid);
    }

    fn install(&mut self, grid: PhysicalGrid) {
        self.grid.replace(grid);
        self.world = GridWorld::new(self.grid.snapshot(), self.config.map.cell_size);
        self.pose = entry_pose(&self.world);
        self.last_command = MotionCommand::default();
    }

    pub fn start_logging(&mut self, now_ms: i64) {
        self.recorder.enable(now_ms);
    }

    /// Stops logging and hands back the serialized session, if one was running.
    pub fn stop_logging(&mut self) -> NavResult<Option<FinishedSession>> {
        Ok(self.recorder.disable()?)
    }

    /// Stops logging and writes the session under the configured session
    /// directory. Returns the file path, or `None` when nothing was running.
    pub fn save_session(&mut self) -> NavResult<Option<PathBuf>> {
        let Some(session) = self.stop_logging()? else {
            return Ok(None);
        };
        let path = session.write_to_dir(&self.config.logging.session_dir)?;
        Ok(Some(path))
    }

    pub fn config(&self) -> &HapnavConfig {
        &self.config
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    /// Velocity command applied during the last tick
    pub fn last_command(&self) -> &MotionCommand {
        &self.last_command
    }

    pub fn world(&self) -> &GridWorld {
        &self.world
    }

    /// Slot holding the current grid; replaced wholesale on regeneration
    pub fn shared_grid(&self) -> &SharedGrid {
        &self.grid
    }

    pub fn ring(&self) -> &SensorRing {
        &self.ring
    }

    pub fn ring_mut(&mut self) -> &mut SensorRing {
        &mut self.ring
    }

    pub fn dispatcher(&self) -> &HapticDispatcher<T> {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut HapticDispatcher<T> {
        &mut self.dispatcher
    }

    pub fn recorder(&self) -> &SessionRecorder {
        &self.recorder
    }

    pub fn last_generation(&self) -> &GenerationReport {
        &self.last_generation
    }

    pub fn stats(&self) -> PipelineStats {
        *self.stats.lock()
    }
}

impl<T: HapticTransport> std::fmt::Debug for NavigationLoop<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationLoop")
            .field("pose", &self.pose)
            .field("ring", &self.ring)
            .field("grid_version", &self.grid.version())
            .field("logging", &self.recorder.is_enabled())
            .field("stats", &self.stats())
            .finish()
    }
}

fn generate(generator: &mut MazeGenerator, map: &MapConfig) -> NavResult<MazeOutcome> {
    Ok(generator.generate(
        map.map_width,
        map.map_height,
        map.single_path,
        map.min_path_area_ratio,
    )?)
}

fn entry_pose(world: &GridWorld) -> Pose {
    Pose::from_yaw(world.entrance_position(), ENTRY_YAW)
}

/// Sensor callback: encode each reading and queue the packet.
fn haptic_sink(
    encoder: HapticEncoder,
    producer: HapticProducer,
    stats: Arc<Mutex<PipelineStats>>,
) -> impl FnMut(&SensorReading) + Send + 'static {
    move |reading| {
        let pushed = producer.try_push(encoder.encode(reading));
        let mut stats = stats.lock();
        stats.readings_encoded += 1;
        if pushed.is_err() {
            stats.packets_dropped += 1;
        }
    }
}
