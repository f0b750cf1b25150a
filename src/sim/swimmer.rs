//! Swimmer: one racer's continuous physics and resource state.
//!
//! The model has two entry points. [`Swimmer::apply_action`] reacts to a
//! single timestamped command; [`Swimmer::advance`] integrates the passage of
//! time. Both are no-ops once the swimmer is finished or drowned.
//!
//! # Stroke rhythm
//!
//! ```text
//! efficiency
//!   1.0 ┤            ╭─╮
//!       │           ╱   ╲
//!       │          ╱     ╲
//!   0.0 ┼──────┬──╯───────╰────────── interval since last stroke (s)
//!       0    0.25      0.47
//!            └ mash threshold: push backwards, open penalty window
//! ```

use super::action::{Side, Symbol};

/// Strokes closer together than this are mashing (seconds).
pub const FAST_CADENCE_THRESHOLD: f64 = 0.25;
/// Velocity removed by a mashed stroke (m/s). May drive velocity negative.
pub const PENALTY_BACKWARD_IMPULSE: f64 = 1.2;
/// Length of the penalty window opened by a mashed stroke (seconds).
pub const PENALTY_DURATION: f64 = 0.6;
/// Global thrust multiplier.
pub const SPEED_MULTIPLIER: f64 = 1.35;
/// Base quadratic drag coefficient.
pub const BASE_DRAG_COEF: f64 = 0.75;
/// Constant velocity bleed (m/s per second).
pub const FRICTION: f64 = 0.30;
/// Forward crawl a swimmer keeps outside penalty windows (m/s).
pub const MIN_GLIDE_SPEED: f64 = 0.22;

/// Stroke interval with peak rhythm efficiency (seconds).
pub const TARGET_STROKE_INTERVAL: f64 = 0.47;
/// Width of the rhythm efficiency curve (seconds).
pub const RHYTHM_TOLERANCE: f64 = 0.08;
/// Efficiency of the very first stroke, which has no rhythm to judge.
pub const FIRST_STROKE_EFFICIENCY: f64 = 0.8;
/// Thrust factor when the arm alternates.
pub const ALTERNATE_BONUS: f64 = 1.0;
/// Thrust factor when the same arm pulls twice in a row.
pub const REPEAT_SIDE_BONUS: f64 = 0.6;

const STROKE_POWER: f64 = 1.9;
const THRUST_TO_VELOCITY: f64 = 0.28;
const STROKE_STAMINA_COST: f64 = 0.04;
const STROKE_OXYGEN_COST: f64 = 0.012;
const STROKE_FATIGUE: f64 = 0.018;
const MASH_FATIGUE: f64 = 0.03;

const KICK_STAMINA_COST: f64 = 0.015;
const KICK_FATIGUE: f64 = 0.01;

/// Oxygen restored by one breath.
pub const BREATH_OXYGEN: f64 = 0.38;
/// Seconds before another breath takes effect.
pub const BREATH_COOLDOWN: f64 = 0.8;
/// Velocity multiplier applied by a breath (flat, regardless of oxygen restored).
pub const BREATH_DRAG_FACTOR: f64 = 0.8;

/// Passive stamina recovery per second.
pub const STAMINA_REGEN_RATE: f64 = 0.075;
/// Passive oxygen drain per second. A resting swimmer runs dry in 17 s.
pub const OXYGEN_DRAIN_RATE: f64 = 0.06;
/// Fatigue recovery per second.
pub const FATIGUE_DECAY_RATE: f64 = 0.05;
/// Oxygen level under which drag worsens.
pub const LOW_OXYGEN: f64 = 0.15;

const EXERTION_REGEN_SPEED: f64 = 0.9;
const EXERTION_REGEN_FACTOR: f64 = 0.7;
const EXERTION_DRAIN_SPEED: f64 = 1.3;
const EXERTION_DRAIN_FACTOR: f64 = 1.15;
const LOW_OXYGEN_DRAG_FACTOR: f64 = 1.5;
/// Drag stays raised while the breath cooldown is above this.
const POST_BREATH_WINDOW: f64 = 0.6;
const POST_BREATH_DRAG_FACTOR: f64 = 1.15;
const RECENT_STROKE_WINDOW: f64 = 0.35;
const GLIDE_RECENT: f64 = 0.9;
const GLIDE_COASTING: f64 = 0.8;

/// Default course length in meters.
pub const DEFAULT_COURSE_LENGTH: f64 = 25.0;

/// A resource level that always lies in `[0, 1]`.
///
/// Every write goes through [`Level::new`], so an out-of-range value cannot
/// be stored. NaN collapses to zero.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Level(f64);

impl Level {
    /// An empty level.
    pub const EMPTY: Self = Self(0.0);
    /// A full level.
    pub const FULL: Self = Self(1.0);

    /// Create a level, clamping into `[0, 1]`.
    #[inline]
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Self::EMPTY
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    /// The level as a fraction.
    #[inline]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Whether the level has reached zero.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 <= 0.0
    }

    #[inline]
    fn raise(&mut self, amount: f64) {
        *self = Self::new(self.0 + amount);
    }

    #[inline]
    fn lower(&mut self, amount: f64) {
        *self = Self::new(self.0 - amount);
    }
}

/// Lifecycle of a swimmer. Both terminal variants are one-way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Status {
    /// Still racing.
    Swimming,
    /// Reached the wall, or was stopped by the race cutoff.
    Finished {
        /// Race time at which the swimmer finished (seconds).
        at: f64,
    },
    /// Ran out of oxygen.
    Drowned {
        /// Race time at which oxygen ran out (seconds).
        at: f64,
    },
}

impl Status {
    /// Whether no further physics can happen.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Swimming)
    }
}

/// The last stroke taken.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LastStroke {
    /// When it was taken (race seconds).
    pub at: f64,
    /// Which arm.
    pub side: Side,
}

/// One racer.
#[derive(Debug, Clone)]
pub struct Swimmer {
    name: String,
    lane: usize,
    keys: super::KeyMap,
    course_length: f64,

    position: f64,
    velocity: f64,

    stamina: Level,
    oxygen: Level,
    fatigue: Level,

    last_stroke: Option<LastStroke>,
    stroke_count: u32,
    breath_cooldown: f64,
    penalty_timer: f64,

    /// Race time seen by this swimmer, advanced by [`Swimmer::advance`].
    clock: f64,
    status: Status,
}

impl Swimmer {
    /// Create a fresh swimmer at the start wall with full resources.
    pub fn new(name: impl Into<String>, lane: usize, keys: super::KeyMap) -> Self {
        Self {
            name: name.into(),
            lane,
            keys,
            course_length: DEFAULT_COURSE_LENGTH,
            position: 0.0,
            velocity: 0.0,
            stamina: Level::FULL,
            oxygen: Level::FULL,
            fatigue: Level::EMPTY,
            last_stroke: None,
            stroke_count: 0,
            breath_cooldown: 0.0,
            penalty_timer: 0.0,
            clock: 0.0,
            status: Status::Swimming,
        }
    }

    /// Set the course length in meters.
    #[must_use]
    pub fn with_course_length(mut self, meters: f64) -> Self {
        self.course_length = meters;
        self
    }

    /// Override the starting resource levels (each clamped into `[0, 1]`).
    #[must_use]
    pub fn with_levels(mut self, stamina: f64, oxygen: f64, fatigue: f64) -> Self {
        self.stamina = Level::new(stamina);
        self.oxygen = Level::new(oxygen);
        self.fatigue = Level::new(fatigue);
        self
    }

    pub(crate) fn set_course_length(&mut self, meters: f64) {
        self.course_length = meters;
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lane index (display and tie-break order).
    pub const fn lane(&self) -> usize {
        self.lane
    }

    /// Key bindings for this swimmer.
    pub const fn keys(&self) -> &super::KeyMap {
        &self.keys
    }

    /// Course length in meters.
    pub const fn course_length(&self) -> f64 {
        self.course_length
    }

    /// Distance from the start wall in meters.
    pub const fn position(&self) -> f64 {
        self.position
    }

    /// Fraction of the course covered.
    pub fn progress(&self) -> f64 {
        if self.course_length > 0.0 {
            (self.position / self.course_length).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Velocity in m/s. Negative only inside a penalty window.
    pub const fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Stamina level.
    pub const fn stamina(&self) -> f64 {
        self.stamina.get()
    }

    /// Oxygen level.
    pub const fn oxygen(&self) -> f64 {
        self.oxygen.get()
    }

    /// Fatigue level.
    pub const fn fatigue(&self) -> f64 {
        self.fatigue.get()
    }

    /// The last stroke taken, if any.
    pub const fn last_stroke(&self) -> Option<LastStroke> {
        self.last_stroke
    }

    /// Total strokes taken, mashed or clean.
    pub const fn stroke_count(&self) -> u32 {
        self.stroke_count
    }

    /// Seconds before a breath takes effect again.
    pub const fn breath_cooldown(&self) -> f64 {
        self.breath_cooldown
    }

    /// Seconds left in the anti-mash penalty window.
    pub const fn penalty_timer(&self) -> f64 {
        self.penalty_timer
    }

    /// Whether the anti-mash penalty is active.
    pub fn is_penalized(&self) -> bool {
        self.penalty_timer > 0.0
    }

    /// Race time seen by this swimmer.
    pub const fn clock(&self) -> f64 {
        self.clock
    }

    /// Current lifecycle status.
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Whether the swimmer actually touched the wall, as opposed to being
    /// stopped at the cutoff.
    pub fn reached_wall(&self) -> bool {
        self.position >= self.course_length
    }

    /// Whether the swimmer has finished.
    pub const fn is_finished(&self) -> bool {
        matches!(self.status, Status::Finished { .. })
    }

    /// Whether the swimmer has drowned.
    pub const fn is_drowned(&self) -> bool {
        matches!(self.status, Status::Drowned { .. })
    }

    /// Whether the swimmer is finished or drowned.
    pub const fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Race time at which the swimmer finished.
    pub const fn finish_time(&self) -> Option<f64> {
        match self.status {
            Status::Finished { at } => Some(at),
            Status::Swimming | Status::Drowned { .. } => None,
        }
    }

    /// Seconds since the last stroke, as seen at `now`.
    pub fn since_last_stroke(&self, now: f64) -> Option<f64> {
        self.last_stroke.map(|stroke| now - stroke.at)
    }

    /// React to one command issued at race time `now`.
    ///
    /// Returns `true` if the command changed the swimmer. Terminal swimmers
    /// and breaths during the cooldown return `false`.
    pub fn apply_action(&mut self, symbol: Symbol, now: f64) -> bool {
        if self.is_terminal() {
            return false;
        }

        match symbol {
            Symbol::Kick => self.kick(),
            Symbol::Breathe => return self.breathe(),
            stroke => {
                if let Some(side) = stroke.side() {
                    self.stroke(side, now);
                }
            }
        }
        true
    }

    fn stroke(&mut self, side: Side, now: f64) {
        let since = self.since_last_stroke(now).unwrap_or(f64::INFINITY);
        let mashing = since < FAST_CADENCE_THRESHOLD;

        if mashing {
            self.velocity -= PENALTY_BACKWARD_IMPULSE;
            self.penalty_timer = self.penalty_timer.max(PENALTY_DURATION);
        } else {
            let efficiency = if since.is_finite() {
                rhythm_efficiency(since)
            } else {
                FIRST_STROKE_EFFICIENCY
            };
            let alternation = match self.last_stroke {
                Some(previous) if previous.side == side => REPEAT_SIDE_BONUS,
                _ => ALTERNATE_BONUS,
            };
            self.velocity += self.stroke_thrust(efficiency, alternation) * THRUST_TO_VELOCITY;
        }

        self.last_stroke = Some(LastStroke { at: now, side });
        self.stroke_count += 1;

        self.stamina.lower(STROKE_STAMINA_COST);
        self.oxygen.lower(STROKE_OXYGEN_COST);
        self.fatigue.raise(if mashing { MASH_FATIGUE } else { STROKE_FATIGUE });
    }

    fn stroke_thrust(&self, efficiency: f64, alternation: f64) -> f64 {
        SPEED_MULTIPLIER
            * STROKE_POWER
            * efficiency
            * alternation
            * 0.4f64.mul_add(self.stamina.get(), 0.6)
            * 0.4f64.mul_add(self.oxygen.get(), 0.6)
            * 0.5f64.mul_add(-self.fatigue.get(), 1.0)
    }

    fn kick(&mut self) {
        self.velocity += SPEED_MULTIPLIER * THRUST_TO_VELOCITY * 0.5f64.mul_add(self.stamina.get(), 0.5);
        self.stamina.lower(KICK_STAMINA_COST);
        self.fatigue.raise(KICK_FATIGUE);
    }

    fn breathe(&mut self) -> bool {
        if self.breath_cooldown > 0.0 {
            return false;
        }
        self.oxygen.raise(BREATH_OXYGEN);
        self.breath_cooldown = BREATH_COOLDOWN;
        self.velocity *= BREATH_DRAG_FACTOR;
        true
    }

    /// Integrate `dt` seconds of swimming.
    ///
    /// Order: resources, drowning check, drag and glide floor, position,
    /// finish check. A swimmer that drowns this step does not move.
    pub fn advance(&mut self, dt: f64) {
        if self.is_terminal() || !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.clock += dt;

        // Resources
        let regen = if self.velocity > EXERTION_REGEN_SPEED { EXERTION_REGEN_FACTOR } else { 1.0 };
        let drain = if self.velocity > EXERTION_DRAIN_SPEED { EXERTION_DRAIN_FACTOR } else { 1.0 };
        self.stamina.raise(dt * STAMINA_REGEN_RATE * regen);
        self.oxygen.lower(dt * OXYGEN_DRAIN_RATE * drain);
        self.fatigue.lower(dt * FATIGUE_DECAY_RATE);
        self.breath_cooldown = (self.breath_cooldown - dt).max(0.0);
        self.penalty_timer = (self.penalty_timer - dt).max(0.0);

        if self.oxygen.is_empty() {
            self.velocity = 0.0;
            self.status = Status::Drowned { at: self.clock };
            return;
        }

        // Drag and friction oppose motion and never reverse it
        let mut drag_coef = BASE_DRAG_COEF;
        if self.oxygen.get() < LOW_OXYGEN {
            drag_coef *= LOW_OXYGEN_DRAG_FACTOR;
        }
        if self.breath_cooldown > POST_BREATH_WINDOW {
            drag_coef *= POST_BREATH_DRAG_FACTOR;
        }
        let glide = match self.since_last_stroke(self.clock) {
            Some(since) if since > RECENT_STROKE_WINDOW => GLIDE_COASTING,
            _ => GLIDE_RECENT,
        };
        let bleed = (drag_coef * self.velocity * self.velocity * glide).mul_add(dt, FRICTION * dt);
        let speed = (self.velocity.abs() - bleed).max(0.0);
        self.velocity = if self.velocity < 0.0 { -speed } else { speed };

        if self.penalty_timer <= 0.0 {
            self.velocity = self.velocity.max(MIN_GLIDE_SPEED);
        }

        self.position = self.velocity.mul_add(dt, self.position).clamp(0.0, self.course_length);

        if self.position >= self.course_length {
            self.status = Status::Finished { at: self.clock };
        }
    }

    /// Align the clock with the race clock at the cutoff.
    ///
    /// A swimmer that finished or drowned in the cutoff tick is never stamped
    /// past `limit`, whatever rounding the shortened tick introduced.
    pub(crate) fn settle_clock(&mut self, limit: f64) {
        self.clock = limit;
        match &mut self.status {
            Status::Finished { at } | Status::Drowned { at } => *at = at.min(limit),
            Status::Swimming => {}
        }
    }

    /// Stop a still-swimming racer at the race cutoff.
    ///
    /// Counts as finishing, not failing. Physics state is left untouched.
    pub(crate) fn force_finish(&mut self, at: f64) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.status = Status::Finished { at };
        true
    }
}

/// Gaussian rhythm efficiency for an inter-stroke interval.
///
/// Peaks at 1.0 for [`TARGET_STROKE_INTERVAL`] and decays symmetrically.
pub fn rhythm_efficiency(interval: f64) -> f64 {
    let offset = interval - TARGET_STROKE_INTERVAL;
    (-(offset * offset) / (2.0 * RHYTHM_TOLERANCE * RHYTHM_TOLERANCE)).exp()
}
