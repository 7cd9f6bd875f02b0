//! Frame driver.
//!
//! Each tick advances the tick counter and the elapsed time, then runs every
//! registered system once in registration order. The core systems are
//! registered by [`TickLoop::new`] in this order:
//!
//! 1. `controller`: hover, button edges and locomotion.
//! 2. `mouse`: fallback hover for teleport points.
//! 3. `button`, `teleport-default`, `teleport-point`, `keyboard`, `carousel`:
//!    capability effects, each consuming its own terminal state.
//!
//! Draggable systems are appended on demand by feature setup.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use xr_component::{Entity, World};
use xr_math::Vec2;

use crate::config::ConfigError;
use crate::interactable::InteractableRegistry;
use crate::system::{Host, System, SystemContext, SystemRegistry};
use crate::systems::{
    self, ButtonSystem, CarouselSystem, ControllerSystem, KeyboardSystem, MouseSystem,
    TeleportDefaultSystem, TeleportPointSystem,
};

/// Configuration for the frame driver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Maximum number of ticks to run (0 = unlimited).
    pub max_ticks: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: 0,
        }
    }
}

impl TickConfig {
    /// Duration of one tick at the configured rate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTickRate`] unless the rate is positive
    /// and yields a representable, non-zero duration.
    pub fn tick_duration(&self) -> Result<Duration, ConfigError> {
        if !(self.tick_rate.is_finite() && self.tick_rate > 0.0) {
            return Err(ConfigError::InvalidTickRate(self.tick_rate));
        }
        Duration::try_from_secs_f64(1.0 / self.tick_rate)
            .ok()
            .filter(|duration| !duration.is_zero())
            .ok_or(ConfigError::InvalidTickRate(self.tick_rate))
    }
}

#[derive(Debug)]
pub struct TickLoop {
    tick_id: u64,
    /// Seconds elapsed over all ticks so far.
    time: f64,
    config: TickConfig,
    pub(crate) world: World,
    pub(crate) host: Host,
    pub(crate) systems: SystemRegistry,
}

impl TickLoop {
    /// Create a loop over `host` with the built-in capabilities and core
    /// systems registered.
    #[must_use]
    pub fn new(config: TickConfig, mut host: Host) -> Self {
        let mut world = World::new();
        host.interactables = InteractableRegistry::with_builtin(&mut world);

        let mut systems = SystemRegistry::new();
        let core: [Box<dyn System>; 7] = [
            Box::new(ControllerSystem::new()),
            Box::new(MouseSystem::new()),
            Box::new(ButtonSystem::new()),
            Box::new(TeleportDefaultSystem::new()),
            Box::new(TeleportPointSystem::new()),
            Box::new(KeyboardSystem::new()),
            Box::new(CarouselSystem::new()),
        ];
        for system in core {
            systems.register(system, &mut world);
        }

        Self {
            tick_id: 0,
            time: 0.0,
            config,
            world,
            host,
            systems,
        }
    }

    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    /// Seconds elapsed over all ticks so far.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    #[must_use]
    pub fn config(&self) -> &TickConfig {
        &self.config
    }

    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[must_use]
    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut Host {
        &mut self.host
    }

    #[must_use]
    pub fn systems(&self) -> &SystemRegistry {
        &self.systems
    }

    /// Append `system` to the execution order. Returns `false` if a system
    /// with the same name is already registered.
    pub fn register_system(&mut self, system: Box<dyn System>) -> bool {
        self.systems.register(system, &mut self.world)
    }

    /// Run every system once with a frame delta of `dt` seconds.
    pub fn tick(&mut self, dt: f64) {
        self.tick_id += 1;
        self.time += dt;

        debug!(
            tick_id = self.tick_id,
            dt,
            systems = self.systems.system_count(),
            "tick start"
        );

        for system in self.systems.iter_mut() {
            let mut ctx = SystemContext {
                tick_id: self.tick_id,
                delta: dt,
                time: self.time,
                world: &mut self.world,
                host: &mut self.host,
            };
            system.execute(&mut ctx);
        }
    }

    /// Run the loop for the configured number of ticks, or indefinitely,
    /// sleeping out the remainder of each tick's budget.
    ///
    /// # Errors
    ///
    /// Fails before the first tick if the tick rate is invalid.
    pub fn run(&mut self) -> Result<(), ConfigError> {
        let tick_duration = self.config.tick_duration()?;
        let mut tick_count = 0u64;

        info!(
            tick_rate = self.config.tick_rate,
            max_ticks = self.config.max_ticks,
            "starting tick loop"
        );

        loop {
            let start = Instant::now();

            self.tick(tick_duration.as_secs_f64());

            tick_count += 1;
            if self.config.max_ticks > 0 && tick_count >= self.config.max_ticks {
                info!(ticks = tick_count, "tick loop complete");
                return Ok(());
            }

            let elapsed = start.elapsed();
            if elapsed < tick_duration {
                std::thread::sleep(tick_duration - elapsed);
            } else {
                warn!(
                    tick_id = self.tick_id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = tick_duration.as_millis() as u64,
                    "tick exceeded time budget"
                );
            }
        }
    }

    /// Deliver a mouse move in client pixels. Returns `false` without a
    /// cursor entity.
    pub fn pointer_move(&mut self, client: Vec2) -> bool {
        systems::mouse::pointer_move(&mut self.world, client)
    }

    /// Deliver a mouse click. Returns the teleport point it selected.
    pub fn click(&mut self) -> Option<Entity> {
        systems::mouse::click(&mut self.world, &self.host.scene)
    }
}
