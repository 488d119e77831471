//! "Falling stars": colored particles that drop under gravity and pile up.
//!
//! A fixed pool of particle slots feeds a settled-cell grid. Each tick a new
//! particle may spawn at the top of a random column; falling particles accelerate
//! downward and settle when they reach the bottom row or land on a settled cell.
//! Settled cells keep their color until the simulator is dropped, so the panel
//! slowly fills up from the bottom.
//!
//! ```rust
//! use led_panel_games::frame::Frame1d;
//! use led_panel_games::panel::PanelConfig;
//! use led_panel_games::particles::{ParticleSimulator, ParticleState};
//! use rand::{SeedableRng, rngs::SmallRng};
//!
//! let mut stars: ParticleSimulator<SmallRng, 4, 4> =
//!     ParticleSimulator::new(PanelConfig::new(4, 4), SmallRng::seed_from_u64(1));
//! let slot = stars.spawn_at(2, led_panel_games::frame::colors::RED).unwrap();
//! for _ in 0..10 {
//!     stars.step();
//! }
//! assert_eq!(stars.particles()[slot].state(), ParticleState::Settled);
//! assert_eq!(stars.owner(2, 3), Some(slot));
//!
//! let mut frame = Frame1d::<16>::new();
//! stars.render(&mut frame);
//! ```

use rand::{Rng, RngCore};

use crate::frame::{Frame1d, RGB8};
use crate::panel::PanelConfig;

/// Downward acceleration added to a falling particle's velocity each step, in
/// cells per step².
pub const GRAVITY: f32 = 0.3;

/// Chance that [`ParticleSimulator::try_spawn`] launches a particle.
pub const SPAWN_PROBABILITY: f64 = 0.3;

/// Default number of particle slots.
pub const DEFAULT_CAPACITY: usize = 12;

/// Palette new particles pick from: red, green, blue, yellow, magenta, cyan.
pub const PARTICLE_COLORS: [RGB8; 6] = [
    RGB8::new(255, 0, 0),
    RGB8::new(0, 255, 0),
    RGB8::new(0, 0, 255),
    RGB8::new(255, 255, 0),
    RGB8::new(255, 0, 255),
    RGB8::new(0, 255, 255),
];

/// Lifecycle of a particle slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParticleState {
    /// Never used, or discarded because its column was full.
    #[default]
    Inactive,
    /// Moving down the panel.
    Falling,
    /// Stopped; its cell is now part of the settled grid. The slot may be reused.
    Settled,
}

/// One slot of the particle pool.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    x: f32,
    y: f32,
    vy: f32,
    color: RGB8,
    state: ParticleState,
}

impl Particle {
    const INACTIVE: Self = Self {
        x: 0.0,
        y: 0.0,
        vy: 0.0,
        color: RGB8::new(0, 0, 0),
        state: ParticleState::Inactive,
    };

    /// Column, as a float.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Row, as a float; grows downward.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Vertical velocity in cells per step.
    #[must_use]
    pub const fn vy(&self) -> f32 {
        self.vy
    }

    /// Color drawn for this particle.
    #[must_use]
    pub const fn color(&self) -> RGB8 {
        self.color
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ParticleState {
        self.state
    }

    /// Whether the particle is still moving.
    #[must_use]
    pub const fn is_falling(&self) -> bool {
        matches!(self.state, ParticleState::Falling)
    }
}

/// A settled cell: the slot that settled there and the color it had at the time.
///
/// The color is copied because the slot can respawn with a different color while
/// the cell stays lit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SettledCell {
    slot: usize,
    color: RGB8,
}

/// Particle pool plus settled grid for a `W` × `H` panel with `C` slots.
///
/// The simulator owns its random source so a seeded generator replays the same
/// animation.
#[derive(Clone, Debug)]
pub struct ParticleSimulator<R, const W: usize, const H: usize, const C: usize = DEFAULT_CAPACITY>
{
    panel: PanelConfig,
    rng: R,
    particles: [Particle; C],
    // settled[x][y]
    settled: [[Option<SettledCell>; H]; W],
    gravity: f32,
    spawn_probability: f64,
}

impl<R: RngCore, const W: usize, const H: usize, const C: usize> ParticleSimulator<R, W, H, C> {
    /// Empty simulator: every slot inactive, no settled cells.
    ///
    /// # Panics
    ///
    /// Panics if `panel` is not `W` × `H`.
    #[must_use]
    pub fn new(panel: PanelConfig, rng: R) -> Self {
        panel.assert_dimensions(W, H);
        info!("particle simulator {}x{} with {} slots", W, H, C);
        Self {
            panel,
            rng,
            particles: [Particle::INACTIVE; C],
            settled: [[None; H]; W],
            gravity: GRAVITY,
            spawn_probability: SPAWN_PROBABILITY,
        }
    }

    /// Same simulator with a different spawn probability, clamped to `0.0..=1.0`
    /// (NaN counts as `0.0`).
    #[must_use]
    pub fn with_spawn_probability(self, spawn_probability: f64) -> Self {
        let spawn_probability = if spawn_probability.is_nan() {
            0.0
        } else {
            spawn_probability.clamp(0.0, 1.0)
        };
        Self {
            spawn_probability,
            ..self
        }
    }

    /// Same simulator with a different gravity.
    ///
    /// # Panics
    ///
    /// Panics unless `gravity` is finite and not negative.
    #[must_use]
    pub fn with_gravity(self, gravity: f32) -> Self {
        assert!(
            gravity.is_finite() && gravity >= 0.0,
            "gravity must be finite and non-negative"
        );
        Self { gravity, ..self }
    }

    /// Panel this simulator renders for.
    #[must_use]
    pub const fn panel(&self) -> &PanelConfig {
        &self.panel
    }

    /// The particle pool, indexed by slot.
    #[must_use]
    pub const fn particles(&self) -> &[Particle; C] {
        &self.particles
    }

    /// Slot that settled at `(x, y)`, or `None` if the cell is empty or off the
    /// panel.
    #[must_use]
    pub fn owner(&self, x: usize, y: usize) -> Option<usize> {
        self.settled_cell(x, y).map(|cell| cell.slot)
    }

    /// Color shown by the settled cell at `(x, y)`, if any.
    #[must_use]
    pub fn settled_color(&self, x: usize, y: usize) -> Option<RGB8> {
        self.settled_cell(x, y).map(|cell| cell.color)
    }

    /// Number of settled cells.
    #[must_use]
    pub fn settled_count(&self) -> usize {
        self.settled.iter().flatten().filter(|cell| cell.is_some()).count()
    }

    /// Number of particles still falling.
    #[must_use]
    pub fn falling_count(&self) -> usize {
        self.particles.iter().filter(|particle| particle.is_falling()).count()
    }

    fn settled_cell(&self, x: usize, y: usize) -> Option<SettledCell> {
        self.settled.get(x)?.get(y).copied().flatten()
    }

    /// One frame of the animation: [`try_spawn`](Self::try_spawn), then
    /// [`step`](Self::step). Returns the slot spawned into, if any.
    pub fn tick(&mut self) -> Option<usize> {
        let spawned = self.try_spawn();
        self.step();
        spawned
    }

    /// With the configured probability, [`spawn`](Self::spawn) a particle.
    pub fn try_spawn(&mut self) -> Option<usize> {
        if self.rng.gen_bool(self.spawn_probability) {
            self.spawn()
        } else {
            None
        }
    }

    /// Launch a particle at the top of a random column with a random palette
    /// color, into the first slot that is not falling.
    ///
    /// Returns the slot, or `None` (consuming no randomness) if every slot is
    /// falling.
    pub fn spawn(&mut self) -> Option<usize> {
        self.free_slot()?;
        let column = self.rng.gen_range(0..W);
        let color = PARTICLE_COLORS[self.rng.gen_range(0..PARTICLE_COLORS.len())];
        self.spawn_at(column, color)
    }

    /// Launch a particle at the top of `column` (clamped onto the panel) with
    /// `color`, into the first slot that is not falling.
    ///
    /// Returns the slot, or `None` if every slot is falling.
    pub fn spawn_at(&mut self, column: usize, color: RGB8) -> Option<usize> {
        let slot = self.free_slot()?;
        let column = column.min(W - 1);
        self.particles[slot] = Particle {
            x: column as f32,
            y: 0.0,
            vy: 0.0,
            color,
            state: ParticleState::Falling,
        };
        trace!("particle {} spawned in column {}", slot, column);
        Some(slot)
    }

    fn free_slot(&self) -> Option<usize> {
        self.particles.iter().position(|particle| !particle.is_falling())
    }

    /// Advance every falling particle by one step.
    ///
    /// Velocity grows by the gravity, then the position by the velocity. A
    /// particle settles in the bottom row once it reaches it, or where it is if
    /// the cell below is settled.
    pub fn step(&mut self) {
        for slot in 0..C {
            let particle = &mut self.particles[slot];
            if !particle.is_falling() {
                continue;
            }
            particle.vy += self.gravity;
            particle.y += particle.vy;

            // x and y are never negative, so the casts floor.
            let column = (particle.x as usize).min(W - 1);
            let row = particle.y as usize;

            if row >= H - 1 {
                self.settle(slot, column, H - 1);
            } else if self.settled[column][row + 1].is_some() {
                self.settle(slot, column, row);
            }
        }
    }

    /// Settle `slot` at `row`, or the nearest free cell above it when a fast
    /// particle has landed inside a stack. A full column discards the particle.
    fn settle(&mut self, slot: usize, column: usize, row: usize) {
        let particle = &mut self.particles[slot];
        let cells = &mut self.settled[column];
        let Some(free_row) = (0..=row).rev().find(|&candidate| cells[candidate].is_none()) else {
            particle.state = ParticleState::Inactive;
            debug!("column {} is full; particle {} discarded", column, slot);
            return;
        };

        cells[free_row] = Some(SettledCell {
            slot,
            color: particle.color,
        });
        particle.x = column as f32;
        particle.y = free_row as f32;
        particle.vy = 0.0;
        particle.state = ParticleState::Settled;
        debug!("particle {} settled at ({}, {})", slot, column, free_row);
    }

    /// Clear `frame`, draw the settled cells, then the falling particles on top.
    ///
    /// # Panics
    ///
    /// Panics if `N` is not `W * H`.
    pub fn render<const N: usize>(&self, frame: &mut Frame1d<N>) {
        self.panel.assert_frame_len(N);
        frame.clear();

        for (x_index, column) in self.settled.iter().enumerate() {
            for (y_index, cell) in column.iter().enumerate() {
                if let Some(cell) = cell {
                    frame[self.panel.xy_to_index(x_index, y_index)] = cell.color;
                }
            }
        }

        for particle in self.particles.iter().filter(|particle| particle.is_falling()) {
            let x_index = particle.x as usize;
            let y_index = particle.y as usize;
            if x_index < W && y_index < H {
                frame[self.panel.xy_to_index(x_index, y_index)] = particle.color;
            }
        }
    }
}
