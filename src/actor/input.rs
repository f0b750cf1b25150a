//! Input Actor: Dedicated thread for polling terminal events.
//!
//! This actor runs in its own thread and uses crossterm's event polling.
//! Keys bound to a swimmer become timestamped [`Action`]s on the shared
//! [`ActionQueue`]; everything else the main loop cares about is sent as an
//! [`InputEvent`].

use super::messages::InputEvent;
use super::queue::ActionQueue;
use crate::sim::{Action, KeyMap};
use crossbeam_channel::Sender;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// Routes pressed characters to lanes.
#[derive(Debug, Clone, Default)]
pub struct KeyRouter {
    bindings: Vec<(usize, KeyMap)>,
}

impl KeyRouter {
    /// Build a router from `(lane, keys)` pairs.
    pub fn new(bindings: impl IntoIterator<Item = (usize, KeyMap)>) -> Self {
        let bindings: Vec<(usize, KeyMap)> = bindings.into_iter().collect();
        for (i, (lane, keys)) in bindings.iter().enumerate() {
            for (other_lane, other) in &bindings[i + 1..] {
                if keys.overlaps(other) {
                    warn!(lane, other_lane, "lanes share keys; the first lane wins");
                }
            }
        }
        Self { bindings }
    }

    /// Whether any two lanes share a key.
    pub fn has_conflicts(&self) -> bool {
        self.bindings
            .iter()
            .enumerate()
            .any(|(i, (_, keys))| self.bindings[i + 1..].iter().any(|(_, other)| keys.overlaps(other)))
    }

    /// The action for `key` pressed at race time `at`, if any lane binds it.
    ///
    /// Matching is case-insensitive. When two lanes bind the same key, the
    /// first binding wins.
    pub fn route(&self, key: char, at: f64) -> Option<Action> {
        self.bindings.iter().find_map(|(lane, keys)| {
            keys.resolve(key).map(|symbol| Action::new(*lane, symbol, at))
        })
    }
}

/// What a single terminal event turns into.
#[derive(Debug, Clone, PartialEq)]
enum Routed {
    Action(Action),
    Control(InputEvent),
}

/// Input actor that polls terminal events.
pub struct InputActor {
    /// Handle to the input thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl InputActor {
    /// Spawn the input actor thread.
    ///
    /// * `router` - Maps pressed characters to swimmer actions.
    /// * `queue` - Where swimmer actions are pushed.
    /// * `events` - Control events for the main loop.
    /// * `epoch` - Race start; action timestamps are seconds since this.
    /// * `poll_timeout` - How long to wait for events before checking shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to spawn the thread.
    pub fn spawn(
        router: KeyRouter,
        queue: ActionQueue,
        events: Sender<InputEvent>,
        epoch: Instant,
        poll_timeout: Duration,
    ) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("swimrace-input".to_string())
            .spawn(move || {
                Self::run_loop(&router, &queue, &events, epoch, &shutdown_clone, poll_timeout);
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal the input thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Signal shutdown and wait for the input thread to finish.
    pub fn join(mut self) {
        self.stop_and_wait();
    }

    fn stop_and_wait(&mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main input polling loop.
    fn run_loop(
        router: &KeyRouter,
        queue: &ActionQueue,
        events: &Sender<InputEvent>,
        epoch: Instant,
        shutdown: &AtomicBool,
        poll_timeout: Duration,
    ) {
        debug!("input thread started");
        loop {
            if shutdown.load(Ordering::Relaxed) {
                let _ = events.try_send(InputEvent::Shutdown);
                break;
            }

            match event::poll(poll_timeout) {
                Ok(true) => match event::read() {
                    Ok(event) => {
                        let at = epoch.elapsed().as_secs_f64();
                        for routed in Self::convert_event(router, event, at) {
                            match routed {
                                Routed::Action(action) => {
                                    trace!(lane = action.lane, symbol = %action.symbol, at, "key");
                                    queue.push(action);
                                }
                                // A full control channel means the main loop
                                // is behind; dropping a redundant event is fine.
                                Routed::Control(control) => {
                                    let _ = events.try_send(control);
                                }
                            }
                        }
                    }
                    Err(e) => {
                        let _ = events.try_send(InputEvent::Error(e.to_string()));
                    }
                },
                Ok(false) => {}
                Err(e) => {
                    let _ = events.try_send(InputEvent::Error(e.to_string()));
                }
            }
        }
        debug!("input thread stopped");
    }

    /// Convert a crossterm event into actions and control events.
    fn convert_event(router: &KeyRouter, event: Event, at: f64) -> Vec<Routed> {
        match event {
            Event::Key(key_event) => {
                // Only process key press events (not release or repeat)
                if key_event.kind != KeyEventKind::Press {
                    return Vec::new();
                }
                match key_event.code {
                    KeyCode::Esc | KeyCode::Char('q' | 'Q') => {
                        vec![Routed::Control(InputEvent::Quit)]
                    }
                    KeyCode::Char(c) => {
                        let mut routed = vec![Routed::Control(InputEvent::KeyPressed)];
                        if let Some(action) = router.route(c, at) {
                            routed.insert(0, Routed::Action(action));
                        }
                        routed
                    }
                    _ => vec![Routed::Control(InputEvent::KeyPressed)],
                }
            }
            Event::Resize(width, height) => {
                vec![Routed::Control(InputEvent::Resize { width, height })]
            }
            _ => Vec::new(),
        }
    }
}

// Joins, so the thread is out of `event::poll` before the caller can leave
// raw mode, including while unwinding.
impl Drop for InputActor {
    fn drop(&mut self) {
        self.stop_and_wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Symbol;
    use crossterm::event::{KeyEvent, KeyEventState, KeyModifiers};

    fn router() -> KeyRouter {
        KeyRouter::new([(0, KeyMap::PLAYER_ONE), (1, KeyMap::PLAYER_TWO)])
    }

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_router_maps_both_players() {
        let router = router();
        assert_eq!(router.route('a', 1.5), Some(Action::new(0, Symbol::StrokeLeft, 1.5)));
        assert_eq!(router.route('L', 2.0), Some(Action::new(1, Symbol::StrokeRight, 2.0)));
        assert_eq!(router.route('i', 0.0), Some(Action::new(1, Symbol::Breathe, 0.0)));
        assert_eq!(router.route('x', 0.0), None);
    }

    #[test]
    fn test_router_reports_shared_keys() {
        assert!(!router().has_conflicts());
        let clash = KeyRouter::new([(0, KeyMap::PLAYER_ONE), (1, KeyMap::new('x', 'y', 'z', 'W'))]);
        assert!(clash.has_conflicts());
        assert_eq!(clash.route('w', 1.0), Some(Action::new(0, Symbol::Breathe, 1.0)));
    }

    #[test]
    fn test_drop_waits_for_thread() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let actor = InputActor::spawn(
            router(),
            ActionQueue::new(),
            tx,
            Instant::now(),
            Duration::from_millis(5),
        )
        .unwrap();
        drop(actor);

        // The thread owned the only sender; once it has exited, the channel
        // reports disconnection after the backlog.
        let end = loop {
            match rx.try_recv() {
                Ok(_) => {}
                Err(e) => break e,
            }
        };
        assert_eq!(end, crossbeam_channel::TryRecvError::Disconnected);
    }

    #[test]
    fn test_bound_key_becomes_action() {
        let routed = InputActor::convert_event(
            &router(),
            key(KeyCode::Char('s'), KeyEventKind::Press),
            3.0,
        );
        assert_eq!(
            routed,
            vec![
                Routed::Action(Action::new(0, Symbol::Kick, 3.0)),
                Routed::Control(InputEvent::KeyPressed),
            ]
        );
    }

    #[test]
    fn test_quit_keys() {
        for code in [KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')] {
            let routed = InputActor::convert_event(&router(), key(code, KeyEventKind::Press), 0.0);
            assert_eq!(routed, vec![Routed::Control(InputEvent::Quit)]);
        }
    }

    #[test]
    fn test_release_is_ignored() {
        let routed = InputActor::convert_event(
            &router(),
            key(KeyCode::Char('a'), KeyEventKind::Release),
            0.0,
        );
        assert!(routed.is_empty());
    }

    #[test]
    fn test_resize_forwarded() {
        let routed = InputActor::convert_event(&router(), Event::Resize(100, 40), 0.0);
        assert_eq!(
            routed,
            vec![Routed::Control(InputEvent::Resize { width: 100, height: 40 })]
        );
    }
}
