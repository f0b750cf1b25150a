//! Coaching: read-only advice derived from a swimmer's state.
//!
//! Nothing here mutates the swimmer, so the HUD can ask as often as it likes.

use crate::sim::{Status, Swimmer, Symbol, FAST_CADENCE_THRESHOLD};
use bitflags::bitflags;

/// Seconds since the last stroke after which the swimmer is told to pull.
pub const STROKE_NOW_AFTER: f64 = 0.9;
/// Oxygen below this triggers the breathe tip.
pub const LOW_OXYGEN_TIP: f64 = 0.35;
/// Stamina below this triggers the recover tip.
pub const LOW_STAMINA_TIP: f64 = 0.35;
/// Fatigue above this triggers the slow-cadence tip.
pub const HIGH_FATIGUE_TIP: f64 = 0.6;

bitflags! {
    /// Every tip that currently applies to a swimmer.
    ///
    /// Bits are ordered by priority: lower bits win in [`advise`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Tips: u8 {
        /// Anti-mash penalty window is open.
        const PENALTY = 0b0000_0001;
        /// Oxygen is low.
        const BREATHE = 0b0000_0010;
        /// Strokes are coming faster than the mash threshold.
        const TOO_FAST = 0b0000_0100;
        /// Stamina is low.
        const RECOVER = 0b0000_1000;
        /// Fatigue is high.
        const SLOW_CADENCE = 0b0001_0000;
        /// No stroke for a while.
        const STROKE_NOW = 0b0010_0000;
    }
}

/// Collect every applicable tip for `swimmer` at race time `now`.
pub fn tips(swimmer: &Swimmer, now: f64) -> Tips {
    let mut tips = Tips::empty();
    if swimmer.is_terminal() {
        return tips;
    }

    if let Some(since) = swimmer.since_last_stroke(now) {
        if since < FAST_CADENCE_THRESHOLD {
            tips |= Tips::TOO_FAST;
        } else if since > STROKE_NOW_AFTER {
            tips |= Tips::STROKE_NOW;
        }
    }
    tips.set(Tips::BREATHE, swimmer.oxygen() < LOW_OXYGEN_TIP);
    tips.set(Tips::RECOVER, swimmer.stamina() < LOW_STAMINA_TIP);
    tips.set(Tips::SLOW_CADENCE, swimmer.fatigue() > HIGH_FATIGUE_TIP);
    tips.set(Tips::PENALTY, swimmer.is_penalized());
    tips
}

/// Human-readable text for a single tip, using the swimmer's own keys.
fn tip_text(tip: Tips, swimmer: &Swimmer) -> String {
    let key = |symbol| swimmer.keys().key_for(symbol).to_ascii_uppercase();
    if tip == Tips::PENALTY {
        "Penalty: stop mashing".to_string()
    } else if tip == Tips::BREATHE {
        format!("Breathe ({})", key(Symbol::Breathe))
    } else if tip == Tips::TOO_FAST {
        "Too fast: pause 0.3-0.5s".to_string()
    } else if tip == Tips::RECOVER {
        "Glide 1s to recover".to_string()
    } else if tip == Tips::SLOW_CADENCE {
        "Slow cadence".to_string()
    } else {
        format!(
            "Stroke now: {}/{} rhythm",
            key(Symbol::StrokeLeft),
            key(Symbol::StrokeRight)
        )
    }
}

fn rhythm_reminder(swimmer: &Swimmer) -> String {
    let keys = swimmer.keys();
    format!(
        "Alternate {}-{}, breathe every 3-5 strokes",
        keys.left.to_ascii_uppercase(),
        keys.right.to_ascii_uppercase()
    )
}

fn outcome_text(swimmer: &Swimmer) -> Option<String> {
    match swimmer.status() {
        Status::Swimming => None,
        Status::Finished { at } => Some(format!("Finished in {at:.2}s")),
        Status::Drowned { .. } => Some("Out of air".to_string()),
    }
}

/// The single most important piece of advice for `swimmer` at `now`.
///
/// Falls back to a rhythm reminder when nothing applies.
pub fn advise(swimmer: &Swimmer, now: f64) -> String {
    if let Some(outcome) = outcome_text(swimmer) {
        return outcome;
    }
    tips(swimmer, now)
        .iter()
        .next()
        .map_or_else(|| rhythm_reminder(swimmer), |tip| tip_text(tip, swimmer))
}

/// Every applicable tip joined with bullets, in priority order.
pub fn coaching_line(swimmer: &Swimmer, now: f64) -> String {
    if let Some(outcome) = outcome_text(swimmer) {
        return outcome;
    }
    let tips = tips(swimmer, now);
    if tips.is_empty() {
        return rhythm_reminder(swimmer);
    }
    tips.iter()
        .map(|tip| tip_text(tip, swimmer))
        .collect::<Vec<_>>()
        .join(" • ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{KeyMap, Symbol};

    fn swimmer() -> Swimmer {
        Swimmer::new("Coach", 0, KeyMap::PLAYER_ONE).with_course_length(40.0)
    }

    #[test]
    fn test_fresh_swimmer_gets_reminder() {
        let s = swimmer();
        assert!(tips(&s, 0.0).is_empty());
        assert_eq!(advise(&s, 0.0), "Alternate A-D, breathe every 3-5 strokes");
    }

    #[test]
    fn test_too_fast_and_stroke_now() {
        let mut s = swimmer();
        s.apply_action(Symbol::StrokeLeft, 1.0);
        assert!(tips(&s, 1.1).contains(Tips::TOO_FAST));
        assert!(tips(&s, 1.5).is_empty());
        assert!(tips(&s, 2.0).contains(Tips::STROKE_NOW));
        assert_eq!(advise(&s, 2.0), "Stroke now: A/D rhythm");
    }

    #[test]
    fn test_penalty_has_top_priority() {
        let mut s = swimmer().with_levels(0.2, 0.2, 0.9);
        s.apply_action(Symbol::StrokeLeft, 1.0);
        s.apply_action(Symbol::StrokeRight, 1.05);
        let all = tips(&s, 1.06);
        assert!(all.contains(Tips::PENALTY | Tips::BREATHE | Tips::TOO_FAST | Tips::RECOVER));
        assert_eq!(advise(&s, 1.06), "Penalty: stop mashing");
    }

    #[test]
    fn test_breathe_uses_swimmers_key() {
        let s = Swimmer::new("P2", 1, KeyMap::PLAYER_TWO).with_levels(1.0, 0.1, 0.0);
        assert_eq!(advise(&s, 0.0), "Breathe (I)");
    }

    #[test]
    fn test_coaching_line_joins_all() {
        let s = swimmer().with_levels(0.1, 0.1, 0.0);
        assert_eq!(coaching_line(&s, 0.0), "Breathe (W) • Glide 1s to recover");
    }

    #[test]
    fn test_terminal_outcome() {
        let mut s = swimmer().with_course_length(0.1);
        s.advance(1.0);
        assert_eq!(advise(&s, 5.0), "Finished in 1.00s");
        assert!(tips(&s, 5.0).is_empty());
    }

    #[test]
    fn test_advise_is_read_only() {
        let mut s = swimmer().with_levels(0.3, 0.3, 0.7);
        s.apply_action(Symbol::StrokeLeft, 1.0);
        let before = format!("{s:?}");
        for i in 0..10 {
            let _ = advise(&s, 1.0 + f64::from(i) * 0.1);
            let _ = coaching_line(&s, 1.0 + f64::from(i) * 0.1);
        }
        assert_eq!(format!("{s:?}"), before);
    }
}
