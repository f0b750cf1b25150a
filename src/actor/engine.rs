//! Engine: Main coordinator that ties actors together.
//!
//! The engine owns the terminal for the length of one race. It spawns the
//! input actor, runs the fixed-rate frame loop and shows the result screen.

use super::input::{InputActor, KeyRouter};
use super::messages::InputEvent;
use super::queue::ActionQueue;
use crate::error::{Error, Result};
use crate::hud::Scene;
use crate::renderer::Renderer;
use crate::sim::{Action, Race, Standing};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Keys pressed this soon after the finish do not dismiss the result screen.
const SUMMARY_GRACE: Duration = Duration::from_millis(500);

/// Configuration for the Engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Target frames per second.
    pub target_fps: u32,
    /// Input poll timeout.
    pub input_poll_timeout: Duration,
    /// Longest simulated step per frame, in seconds.
    pub max_frame_dt: f64,
    /// Smallest display width the scene is laid out for.
    pub min_width: u16,
    /// Smallest display height the scene is laid out for.
    pub min_height: u16,
    /// Whether to use alternate screen buffer.
    pub alternate_screen: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            input_poll_timeout: Duration::from_millis(10),
            max_frame_dt: 0.25,
            min_width: 96,
            min_height: 30,
            alternate_screen: true,
        }
    }
}

impl EngineConfig {
    /// Duration of one frame at the target rate.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.target_fps.max(1)
    }

    /// Display size to lay out for, given the real terminal size.
    pub fn display_size(&self, width: u16, height: u16) -> (u16, u16) {
        (width.max(self.min_width), height.max(self.min_height))
    }

    /// Clamp a measured frame time to a simulation step.
    pub fn frame_dt(&self, measured: Duration) -> f64 {
        measured.as_secs_f64().min(self.max_frame_dt)
    }
}

/// Raw mode, alternate screen and hidden cursor for as long as it lives.
struct TerminalGuard {
    alternate_screen: bool,
}

impl TerminalGuard {
    fn enter(alternate_screen: bool) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        // From here on Drop undoes whatever succeeded.
        let guard = Self { alternate_screen };
        let mut stdout = io::stdout();
        if alternate_screen {
            execute!(stdout, EnterAlternateScreen)?;
        }
        execute!(stdout, cursor::Hide)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, cursor::Show);
        if self.alternate_screen {
            let _ = execute!(stdout, LeaveAlternateScreen);
        }
        let _ = terminal::disable_raw_mode();
    }
}

/// Maps input timestamps onto the race clock.
///
/// The input thread stamps actions with wall time since the race epoch. The
/// race clock advances by capped frame steps, so it falls behind wall time
/// by whatever a stall cut off. Stamps are shifted back by that amount and
/// kept inside the tick that applies them.
#[derive(Debug, Clone, Copy, Default)]
struct RaceClock {
    /// Wall time dropped by capping, in seconds.
    lost: f64,
}

impl RaceClock {
    /// Simulation step for a frame that took `measured` wall time.
    fn frame_dt(&mut self, config: &EngineConfig, measured: Duration) -> f64 {
        let dt = config.frame_dt(measured);
        self.lost += measured.as_secs_f64() - dt;
        dt
    }

    /// `action` restamped on the race clock for a tick from `start` to
    /// `start + dt`.
    fn rebase(&self, action: Action, start: f64, dt: f64) -> Action {
        let at = (action.at - self.lost).clamp(start, start + dt);
        Action::new(action.lane, action.symbol, at)
    }
}

/// How the frame loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopEnd {
    RaceOver,
    Quit,
}

/// The interactive race session.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
    scene: Scene,
}

impl Engine {
    /// Create an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            scene: Scene::default(),
        }
    }

    /// Use a custom scene.
    #[must_use]
    pub const fn with_scene(mut self, scene: Scene) -> Self {
        self.scene = scene;
        self
    }

    /// The engine configuration.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run `race` on the terminal until it is over or the player quits.
    ///
    /// The terminal is restored before this returns, on every path.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be set up or the input thread
    /// cannot be started.
    pub fn run(&self, race: &mut Race) -> Result<Vec<Standing>> {
        let (width, height) = terminal::size()?;
        let (width, height) = self.config.display_size(width, height);
        let mut renderer = Renderer::new(width, height);

        let guard = TerminalGuard::enter(self.config.alternate_screen)?;

        let queue = ActionQueue::new();
        let (event_tx, event_rx) = bounded::<InputEvent>(64);
        let router = KeyRouter::new(race.swimmers().iter().map(|s| (s.lane(), *s.keys())));
        let epoch = Instant::now();
        let input = InputActor::spawn(
            router,
            queue.clone(),
            event_tx,
            epoch,
            self.config.input_poll_timeout,
        )
        .map_err(|e| Error::InputThread(e.to_string()))?;

        info!(swimmers = race.swimmers().len(), width, height, "race started");
        let mut stdout = io::stdout();
        let end = self.race_loop(race, &queue, &event_rx, &mut renderer, &mut stdout);
        if end == LoopEnd::RaceOver {
            self.show_summary(race, &event_rx, &mut renderer, &mut stdout);
        } else {
            info!(elapsed = race.elapsed(), "race abandoned");
        }

        input.join();
        drop(guard);
        Ok(race.standings())
    }

    /// Tick, compose and flush at the target rate until the race ends.
    fn race_loop<W: Write>(
        &self,
        race: &mut Race,
        queue: &ActionQueue,
        events: &Receiver<InputEvent>,
        renderer: &mut Renderer,
        out: &mut W,
    ) -> LoopEnd {
        let frame_duration = self.config.frame_duration();
        let mut clock = RaceClock::default();
        let mut last = Instant::now();

        while !race.is_over() {
            let frame_start = Instant::now();
            let dt = clock.frame_dt(&self.config, frame_start.duration_since(last));
            last = frame_start;

            for event in events.try_iter() {
                match event {
                    InputEvent::Quit => return LoopEnd::Quit,
                    InputEvent::Resize { width, height } => self.resize(renderer, width, height),
                    InputEvent::Error(message) => warn!(%message, "input error"),
                    InputEvent::KeyPressed | InputEvent::Shutdown => {}
                }
            }

            let start = race.elapsed();
            let actions: Vec<Action> = queue
                .drain_all()
                .into_iter()
                .map(|action| clock.rebase(action, start, dt))
                .collect();
            race.step(actions, dt);
            self.scene.compose(race, renderer, race.elapsed());
            Self::present(renderer, out);

            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                thread::sleep(frame_duration - elapsed);
            }
        }
        LoopEnd::RaceOver
    }

    /// Show the result screen and wait for any key.
    fn show_summary<W: Write>(
        &self,
        race: &Race,
        events: &Receiver<InputEvent>,
        renderer: &mut Renderer,
        out: &mut W,
    ) {
        self.scene.compose_summary(race, renderer);
        Self::present(renderer, out);

        thread::sleep(SUMMARY_GRACE);
        for _ in events.try_iter() {}

        loop {
            match events.recv_timeout(Duration::from_millis(100)) {
                Ok(InputEvent::KeyPressed | InputEvent::Quit | InputEvent::Shutdown)
                | Err(RecvTimeoutError::Disconnected) => break,
                Ok(InputEvent::Resize { width, height }) => {
                    self.resize(renderer, width, height);
                    self.scene.compose_summary(race, renderer);
                    Self::present(renderer, out);
                }
                Ok(InputEvent::Error(message)) => warn!(%message, "input error"),
                Err(RecvTimeoutError::Timeout) => {}
            }
        }
    }

    fn resize(&self, renderer: &mut Renderer, width: u16, height: u16) {
        let (width, height) = self.config.display_size(width, height);
        debug!(width, height, "resize");
        renderer.resize(width, height);
    }

    /// Flush one frame. A failed write is retried on the next frame.
    fn present<W: Write>(renderer: &mut Renderer, out: &mut W) {
        if let Err(error) = renderer.flush_to(out) {
            warn!(%error, "frame flush failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{KeyMap, Swimmer, Symbol};

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.target_fps, 60);
        assert_eq!(config.input_poll_timeout, Duration::from_millis(10));
        assert!(config.alternate_screen);
    }

    #[test]
    fn test_frame_duration() {
        let config = EngineConfig::default();
        assert_eq!(config.frame_duration(), Duration::from_secs(1) / 60);
        let zero = EngineConfig { target_fps: 0, ..EngineConfig::default() };
        assert_eq!(zero.frame_duration(), Duration::from_secs(1));
    }

    #[test]
    fn test_frame_dt_is_capped() {
        let config = EngineConfig::default();
        assert!((config.frame_dt(Duration::from_millis(16)) - 0.016).abs() < 1e-9);
        assert!((config.frame_dt(Duration::from_secs(3)) - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stall_is_taken_off_stamps() {
        let config = EngineConfig::default();
        let mut clock = RaceClock::default();
        assert!((clock.frame_dt(&config, Duration::from_millis(100)) - 0.1).abs() < 1e-9);
        assert!(clock.lost.abs() < 1e-9);

        // A 2s stall is simulated as 0.25s.
        assert!((clock.frame_dt(&config, Duration::from_secs(2)) - 0.25).abs() < 1e-9);
        assert!((clock.lost - 1.75).abs() < 1e-9);

        // A key pressed at wall 2.2s lands at race 0.45s, inside the next tick.
        let action = clock.rebase(Action::new(0, Symbol::StrokeLeft, 2.2), 0.35, 0.15);
        assert!((action.at - 0.45).abs() < 1e-9);
        assert_eq!(action.symbol, Symbol::StrokeLeft);
    }

    #[test]
    fn test_stamps_stay_inside_tick() {
        let clock = RaceClock { lost: 0.0 };
        let early = clock.rebase(Action::new(0, Symbol::Kick, 0.1), 1.0, 0.016);
        assert_eq!(early.at, 1.0);
        let late = clock.rebase(Action::new(0, Symbol::Kick, 9.0), 1.0, 0.25);
        assert_eq!(late.at, 1.25);
    }

    #[test]
    fn test_rebased_strokes_keep_glide_window() {
        let mut race = Race::new(
            vec![Swimmer::new("Solo", 0, KeyMap::PLAYER_ONE)],
            crate::sim::RaceConfig::default(),
        )
        .unwrap();
        let config = EngineConfig::default();
        let mut clock = RaceClock::default();
        let dt = clock.frame_dt(&config, Duration::from_secs(5));
        race.step([], dt);

        let dt = clock.frame_dt(&config, Duration::from_millis(100));
        let start = race.elapsed();
        let stroke = clock.rebase(Action::new(0, Symbol::StrokeLeft, 5.05), start, dt);
        race.step([stroke], dt);
        let since = race.swimmers()[0].since_last_stroke(race.elapsed()).unwrap();
        assert!((0.0..=dt).contains(&since));
    }

    #[test]
    fn test_display_size_has_floor() {
        let config = EngineConfig::default();
        assert_eq!(config.display_size(80, 24), (96, 30));
        assert_eq!(config.display_size(200, 50), (200, 50));
    }
}
