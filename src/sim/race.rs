//! Race controller: owns the swimmers, the race clock, and the result.
//!
//! One [`Race`] lives for one session. Each tick it routes queued actions to
//! swimmers, advances every active swimmer, applies the time-limit cutoff,
//! and settles the winner once someone has finished.

use super::{Action, Status, Swimmer, DEFAULT_COURSE_LENGTH};
use crate::actor::ActionQueue;
use tracing::{debug, info, warn};

/// Race parameters fixed at session start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaceConfig {
    /// Course length in meters.
    pub course_length: f64,
    /// Hard stop in seconds.
    pub time_limit: f64,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            course_length: DEFAULT_COURSE_LENGTH,
            time_limit: 60.0,
        }
    }
}

/// Reasons a race cannot be set up.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SetupError {
    /// A race needs at least one swimmer.
    #[error("a race needs at least one swimmer")]
    NoSwimmers,

    /// Two swimmers were assigned the same lane.
    #[error("lane {0} is assigned to more than one swimmer")]
    DuplicateLane(usize),

    /// Course length must be positive and finite.
    #[error("invalid course length: {0} m")]
    InvalidCourseLength(f64),

    /// Time limit must be positive and finite.
    #[error("invalid time limit: {0} s")]
    InvalidTimeLimit(f64),
}

/// A recoverable problem found while routing actions. The action is dropped.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum RouteWarning {
    /// No swimmer swims in the addressed lane.
    #[error("dropped {symbol} for unknown lane {lane}")]
    UnknownLane {
        /// The lane the action addressed.
        lane: usize,
        /// The dropped symbol.
        symbol: super::Symbol,
    },
}

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Actions that changed a swimmer.
    pub applied: usize,
    /// Actions that were dropped.
    pub warnings: Vec<RouteWarning>,
    /// Lanes that finished this tick (including cutoff finishes).
    pub finished: Vec<usize>,
    /// Lanes that drowned this tick.
    pub drowned: Vec<usize>,
    /// Whether the time limit was reached this tick.
    pub cutoff: bool,
    /// Lane of the winner, if it was decided this tick.
    pub winner: Option<usize>,
}

/// Final or in-progress result line for one swimmer.
#[derive(Debug, Clone, PartialEq)]
pub struct Standing {
    /// Display name.
    pub name: String,
    /// Lane index.
    pub lane: usize,
    /// Lifecycle status.
    pub status: Status,
    /// Strokes taken.
    pub stroke_count: u32,
    /// Distance covered in meters.
    pub position: f64,
    /// Distance divided by finish time, for finishers.
    pub average_speed: Option<f64>,
}

/// One running session.
#[derive(Debug, Clone)]
pub struct Race {
    /// Swimmers in lane order.
    swimmers: Vec<Swimmer>,
    config: RaceConfig,
    elapsed: f64,
    /// Lane of the winner. Set once.
    winner: Option<usize>,
}

impl Race {
    /// Create a race from pre-built swimmers.
    ///
    /// Swimmers are sorted into lane order and given the configured course
    /// length.
    pub fn new(mut swimmers: Vec<Swimmer>, config: RaceConfig) -> Result<Self, SetupError> {
        if !config.course_length.is_finite() || config.course_length <= 0.0 {
            return Err(SetupError::InvalidCourseLength(config.course_length));
        }
        if !config.time_limit.is_finite() || config.time_limit <= 0.0 {
            return Err(SetupError::InvalidTimeLimit(config.time_limit));
        }
        if swimmers.is_empty() {
            return Err(SetupError::NoSwimmers);
        }

        swimmers.sort_by_key(Swimmer::lane);
        if let Some(pair) = swimmers.windows(2).find(|pair| pair[0].lane() == pair[1].lane()) {
            return Err(SetupError::DuplicateLane(pair[0].lane()));
        }
        for swimmer in &mut swimmers {
            swimmer.set_course_length(config.course_length);
        }

        debug!(
            swimmers = swimmers.len(),
            course = config.course_length,
            limit = config.time_limit,
            "race created"
        );

        Ok(Self {
            swimmers,
            config,
            elapsed: 0.0,
            winner: None,
        })
    }

    /// Race parameters.
    pub const fn config(&self) -> &RaceConfig {
        &self.config
    }

    /// Swimmers in lane order.
    pub fn swimmers(&self) -> &[Swimmer] {
        &self.swimmers
    }

    /// The swimmer in `lane`, if any.
    pub fn swimmer(&self, lane: usize) -> Option<&Swimmer> {
        self.index_of(lane).map(|i| &self.swimmers[i])
    }

    /// Seconds elapsed since the start, capped at the time limit.
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// The hard stop in seconds.
    pub const fn time_limit(&self) -> f64 {
        self.config.time_limit
    }

    /// Seconds left before the cutoff.
    pub fn remaining(&self) -> f64 {
        (self.config.time_limit - self.elapsed).max(0.0)
    }

    /// The first swimmer to finish, once decided.
    pub fn winner(&self) -> Option<&Swimmer> {
        self.winner.and_then(|lane| self.swimmer(lane))
    }

    /// Whether the time limit has been reached.
    pub fn time_is_up(&self) -> bool {
        self.elapsed >= self.config.time_limit
    }

    /// True once every swimmer is finished or drowned, or time is up.
    pub fn is_over(&self) -> bool {
        self.time_is_up() || self.swimmers.iter().all(Swimmer::is_terminal)
    }

    /// Drain `queue` and run one tick of `dt` seconds.
    pub fn tick(&mut self, queue: &ActionQueue, dt: f64) -> TickReport {
        self.step(queue.drain_all(), dt)
    }

    /// Run one tick with an explicit batch of actions.
    ///
    /// All actions are applied, in order, before any swimmer is advanced, so
    /// drowning is only ever a consequence of time passing.
    pub fn step(&mut self, actions: impl IntoIterator<Item = Action>, dt: f64) -> TickReport {
        let mut report = TickReport::default();
        if self.is_over() {
            return report;
        }

        for action in actions {
            match self.index_of(action.lane) {
                Some(i) => {
                    if self.swimmers[i].apply_action(action.symbol, action.at) {
                        report.applied += 1;
                    }
                }
                None => {
                    let warning = RouteWarning::UnknownLane {
                        lane: action.lane,
                        symbol: action.symbol,
                    };
                    warn!("{warning}");
                    report.warnings.push(warning);
                }
            }
        }

        let limit = self.config.time_limit;
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        // No swimmer clock may run past the limit.
        let reaches_limit = self.elapsed + dt >= limit;
        let dt = if reaches_limit { limit - self.elapsed } else { dt };
        for swimmer in self.swimmers.iter_mut().filter(|s| !s.is_terminal()) {
            swimmer.advance(dt);
            if reaches_limit {
                swimmer.settle_clock(limit);
            }
            match swimmer.status() {
                Status::Finished { at } => {
                    info!(lane = swimmer.lane(), name = swimmer.name(), time = at, "swimmer finished");
                    report.finished.push(swimmer.lane());
                }
                Status::Drowned { at } => {
                    info!(lane = swimmer.lane(), name = swimmer.name(), time = at, "swimmer drowned");
                    report.drowned.push(swimmer.lane());
                }
                Status::Swimming => {}
            }
        }

        self.elapsed = if reaches_limit { limit } else { self.elapsed + dt };
        if self.time_is_up() {
            report.cutoff = true;
            for swimmer in &mut self.swimmers {
                if swimmer.force_finish(limit) {
                    report.finished.push(swimmer.lane());
                }
            }
            info!(limit, "time limit reached");
        }

        if self.winner.is_none() && !report.finished.is_empty() {
            self.winner = self.first_finisher();
            if let Some(winner) = self.winner() {
                info!(lane = winner.lane(), name = winner.name(), "winner decided");
            }
            report.winner = self.winner;
        }

        report
    }

    /// Result lines in lane order.
    pub fn standings(&self) -> Vec<Standing> {
        self.swimmers
            .iter()
            .map(|s| Standing {
                name: s.name().to_string(),
                lane: s.lane(),
                status: s.status(),
                stroke_count: s.stroke_count(),
                position: s.position(),
                average_speed: s
                    .finish_time()
                    .filter(|&t| t > 0.0)
                    .map(|t| s.position() / t),
            })
            .collect()
    }

    /// Earliest finish time, then a real touch before a cutoff finish, then
    /// lowest lane.
    fn first_finisher(&self) -> Option<usize> {
        self.swimmers
            .iter()
            .filter_map(|s| s.finish_time().map(|t| (t, !s.reached_wall(), s.lane())))
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)))
            .map(|(_, _, lane)| lane)
    }

    fn index_of(&self, lane: usize) -> Option<usize> {
        self.swimmers.binary_search_by_key(&lane, Swimmer::lane).ok()
    }
}
