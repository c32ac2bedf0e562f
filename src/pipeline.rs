//! Simulation pipeline.
//!
//! One generation is five stages:
//!
//! ```text
//! Idle -> CompleteUpdate -> CompleteCount -> CopyBuffer -> ScheduleUpdate -> ScheduleCount -> Idle
//! ```
//!
//! The count of generation N is scheduled over the snapshot fixed by
//! `CopyBuffer` and runs alongside the update of generation N+1; that is the
//! only overlap. In [`UpdateMode::Deferred`] each external tick advances one
//! stage; in [`UpdateMode::Immediate`] a tick runs the whole cycle once the
//! tick interval has elapsed.
//!
//! Because the count is only collected at the start of the next cycle,
//! `alive_cells_count()` trails `states()` by one cycle, except between
//! `CompleteCount` and `CopyBuffer` where both describe the same snapshot.

use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::ThreadPool;
use tracing::{debug, info, warn};

use crate::automaton::{Dimensions, GridBuffers, NeighborRule, UpdateKernel};
use crate::bounds::Bounds;
use crate::config::{SimulationConfig, TuningConfig, UpdateMode};
use crate::counter::{AliveCounter, CounterKind};
use crate::error::ConfigError;
use crate::jobs::build_pool;

/// Pipeline stage. Each non-idle stage is the work the next step performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Idle,
    CompleteUpdate,
    CompleteCount,
    CopyBuffer,
    ScheduleUpdate,
    ScheduleCount,
}

impl Stage {
    /// The stage that follows this one.
    pub fn next(self) -> Stage {
        match self {
            Stage::Idle => Stage::CompleteUpdate,
            Stage::CompleteUpdate => Stage::CompleteCount,
            Stage::CompleteCount => Stage::CopyBuffer,
            Stage::CopyBuffer => Stage::ScheduleUpdate,
            Stage::ScheduleUpdate => Stage::ScheduleCount,
            Stage::ScheduleCount => Stage::Idle,
        }
    }

    /// Stable numeric code, `Idle = 0` through `ScheduleCount = 5`.
    pub fn code(self) -> u8 {
        match self {
            Stage::Idle => 0,
            Stage::CompleteUpdate => 1,
            Stage::CompleteCount => 2,
            Stage::CopyBuffer => 3,
            Stage::ScheduleUpdate => 4,
            Stage::ScheduleCount => 5,
        }
    }
}

/// Figures shown by a stats overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub cell_count: usize,
    pub generation: u64,
    pub alive_cells: usize,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Max Count: {}, Generation: {}, Alive Cells: {}",
            self.cell_count, self.generation, self.alive_cells
        )
    }
}

pub struct Simulation {
    dims: Dimensions,
    chunk: usize,
    mode: UpdateMode,
    tuning: TuningConfig,
    buffers: GridBuffers,
    kernel: UpdateKernel,
    counter: Box<dyn AliveCounter>,
    stage: Stage,
    elapsed: Duration,
    generation: u64,
    alive_cells: usize,
    view_dirty: bool,
    bounds: Bounds,
}

impl Simulation {
    /// Build a simulation whose cells are seeded from `config.seed`; each
    /// cell starts alive with probability `1 / config.spawn_probability`.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        let (dims, chunk) = config.validate()?;
        let cells = seeded_cells(&dims, config.seed, config.spawn_probability);
        Self::build(config, dims, chunk, cells)
    }

    /// Build a simulation from an explicit initial state. `cells` must hold
    /// exactly `width * height * depth` entries; non-zero means alive.
    pub fn from_cells(config: SimulationConfig, cells: Vec<u8>) -> Result<Self, ConfigError> {
        let (dims, chunk) = config.validate()?;
        Self::build(config, dims, chunk, cells)
    }

    fn build(
        config: SimulationConfig,
        dims: Dimensions,
        chunk: usize,
        cells: Vec<u8>,
    ) -> Result<Self, ConfigError> {
        let buffers = GridBuffers::new(dims, cells)?;
        let pool: Arc<ThreadPool> = build_pool(config.threads)?;
        let kernel = UpdateKernel::new(Arc::clone(&pool));
        let mut counter = config.counter.build(dims.cell_count(), chunk, pool);
        let alive_cells = counter.count(buffers.snapshot());

        info!(
            width = dims.width(),
            height = dims.height(),
            depth = dims.depth(),
            chunk,
            counter = %config.counter,
            mode = ?config.mode,
            alive_cells,
            "simulation created"
        );

        let tuning = config.tuning;
        Ok(Simulation {
            bounds: Bounds::new(&dims, tuning.cell_size, tuning.spacing),
            dims,
            chunk,
            mode: config.mode,
            tuning,
            buffers,
            kernel,
            counter,
            stage: Stage::Idle,
            elapsed: Duration::ZERO,
            generation: 0,
            alive_cells,
            view_dirty: false,
        })
    }

    /// Advance by one external tick of length `delta`.
    pub fn tick(&mut self, delta: Duration) {
        self.view_dirty = false;
        self.elapsed += delta;

        match self.mode {
            UpdateMode::Immediate => {
                if self.interval_elapsed() {
                    self.run_cycle();
                }
            }
            UpdateMode::Deferred => {
                if self.stage == Stage::Idle {
                    if self.interval_elapsed() {
                        self.stage = Stage::CompleteUpdate;
                    }
                } else {
                    self.advance();
                }
            }
        }

        self.bounds = Bounds::new(&self.dims, self.tuning.cell_size, self.tuning.spacing);
    }

    /// Run one whole cycle now, ignoring the tick interval. A deferred cycle
    /// already in progress is finished first.
    pub fn step_generation(&mut self) {
        self.drain();
        self.run_cycle();
    }

    pub fn step_generations(&mut self, generations: usize) {
        for _ in 0..generations {
            self.step_generation();
        }
    }

    fn interval_elapsed(&mut self) -> bool {
        if self.elapsed >= self.tuning.tick_interval {
            self.elapsed = Duration::ZERO;
            true
        } else {
            false
        }
    }

    fn run_cycle(&mut self) {
        self.stage = Stage::CompleteUpdate;
        self.drain();
    }

    fn drain(&mut self) {
        while self.stage != Stage::Idle {
            self.advance();
        }
    }

    /// Perform the current stage's work and move to the next stage.
    fn advance(&mut self) {
        match self.stage {
            Stage::Idle => {}
            Stage::CompleteUpdate => {
                self.kernel.complete(&mut self.buffers);
                self.view_dirty = true;
            }
            Stage::CompleteCount => {
                if let Some(alive_cells) = self.counter.complete() {
                    self.alive_cells = alive_cells;
                }
                debug!(
                    generation = self.generation,
                    alive_cells = self.alive_cells,
                    "generation settled"
                );
            }
            Stage::CopyBuffer => self.buffers.copy_to_previous(),
            Stage::ScheduleUpdate => {
                self.kernel.schedule(&mut self.buffers, self.tuning.rule);
                self.generation += 1;
            }
            Stage::ScheduleCount => self.counter.schedule(self.buffers.snapshot()),
        }
        debug!(stage = ?self.stage, "pipeline stage done");
        self.stage = self.stage.next();
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dims
    }

    pub fn width(&self) -> usize {
        self.dims.width()
    }

    pub fn height(&self) -> usize {
        self.dims.height()
    }

    pub fn depth(&self) -> usize {
        self.dims.depth()
    }

    pub fn cell_count(&self) -> usize {
        self.dims.cell_count()
    }

    pub fn chunk(&self) -> usize {
        self.chunk
    }

    pub fn mode(&self) -> UpdateMode {
        self.mode
    }

    pub fn counter_kind(&self) -> CounterKind {
        self.counter.kind()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Number of updates scheduled so far.
    pub fn generation_count(&self) -> u64 {
        self.generation
    }

    /// Alive cells in the most recently counted snapshot.
    pub fn alive_cells_count(&self) -> usize {
        self.alive_cells
    }

    /// The most recently settled cell states, one `0`/`1` per cell.
    pub fn states(&self) -> &[u8] {
        self.buffers.previous()
    }

    /// True if the last tick completed an update.
    pub fn view_dirty(&self) -> bool {
        self.view_dirty
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn can_render(&self) -> bool {
        self.tuning.can_render
    }

    pub fn tuning(&self) -> &TuningConfig {
        &self.tuning
    }

    pub fn rule(&self) -> NeighborRule {
        self.tuning.rule
    }

    /// Replace the runtime tuning. Invalid tuning is rejected and the current
    /// tuning kept. Rule changes apply from the next scheduled update.
    pub fn set_tuning(&mut self, tuning: TuningConfig) -> Result<(), ConfigError> {
        tuning.validate()?;
        if tuning.rule.survival_impossible() {
            warn!(
                min = tuning.rule.min_population_cutoff,
                max = tuning.rule.max_population_threshold,
                "min population above max; no alive cell can survive"
            );
        }
        self.tuning = tuning;
        Ok(())
    }

    pub fn set_rule(&mut self, rule: NeighborRule) -> Result<(), ConfigError> {
        let tuning = TuningConfig {
            rule,
            ..self.tuning.clone()
        };
        self.set_tuning(tuning)
    }

    pub fn set_tick_interval(&mut self, interval: Duration) {
        self.tuning.tick_interval = interval;
    }

    pub fn stats(&self) -> Stats {
        Stats {
            cell_count: self.cell_count(),
            generation: self.generation,
            alive_cells: self.alive_cells,
        }
    }

    /// True while an update or a count is in flight.
    pub fn is_busy(&self) -> bool {
        self.kernel.is_scheduled() || self.counter.is_scheduled()
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        // Jobs own their buffers; nothing to wait for while unwinding.
        if thread::panicking() {
            return;
        }
        self.kernel.complete(&mut self.buffers);
        self.counter.complete();
    }
}

fn seeded_cells(dims: &Dimensions, seed: u64, spawn_probability: u32) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..dims.cell_count())
        .map(|_| u8::from(rng.random_range(0..spawn_probability) == 0))
        .collect()
}
