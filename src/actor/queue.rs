//! Action Queue: the only state shared between input capture and simulation.
//!
//! Backed by an unbounded crossbeam channel, so `push` never blocks and
//! `drain_all` never waits on the producer. Both ends live in one handle;
//! clone it to give the capture thread its own copy.

use crate::sim::Action;
use crossbeam_channel::{unbounded, Receiver, Sender};

/// Thread-safe, unbounded FIFO of [`Action`]s.
#[derive(Debug, Clone)]
pub struct ActionQueue {
    tx: Sender<Action>,
    rx: Receiver<Action>,
}

impl ActionQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// Append an action. Never blocks.
    pub fn push(&self, action: Action) {
        // Both ends are owned by every handle, so the channel cannot disconnect.
        let _ = self.tx.send(action);
    }

    /// Remove and return everything queued, in arrival order.
    ///
    /// Returns an empty `Vec` when nothing is queued.
    pub fn drain_all(&self) -> Vec<Action> {
        self.rx.try_iter().collect()
    }

    /// Number of queued actions.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Default for ActionQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Symbol;
    use std::thread;

    #[test]
    fn test_drain_empty() {
        let queue = ActionQueue::new();
        assert!(queue.drain_all().is_empty());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_fifo_order() {
        let queue = ActionQueue::new();
        queue.push(Action::new(0, Symbol::StrokeLeft, 0.1));
        queue.push(Action::new(1, Symbol::Kick, 0.2));
        queue.push(Action::new(0, Symbol::StrokeRight, 0.3));
        assert_eq!(queue.len(), 3);

        let drained = queue.drain_all();
        let symbols: Vec<_> = drained.iter().map(|a| a.symbol).collect();
        assert_eq!(symbols, vec![Symbol::StrokeLeft, Symbol::Kick, Symbol::StrokeRight]);
        assert!(queue.drain_all().is_empty());
    }

    #[test]
    fn test_concurrent_push_loses_nothing() {
        let queue = ActionQueue::new();
        let producer = queue.clone();

        let handle = thread::spawn(move || {
            for i in 0..10_000u32 {
                producer.push(Action::new(0, Symbol::Kick, f64::from(i)));
            }
        });

        let mut seen = Vec::new();
        while seen.len() < 10_000 {
            seen.extend(queue.drain_all());
            thread::yield_now();
        }
        handle.join().unwrap();
        seen.extend(queue.drain_all());

        assert_eq!(seen.len(), 10_000);
        for (i, action) in seen.iter().enumerate() {
            assert_eq!(action.at, i as f64);
        }
    }
}
