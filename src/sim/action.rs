//! Actions: the closed set of things a swimmer can be told to do.
//!
//! Raw key presses are resolved into [`Symbol`]s by a per-player [`KeyMap`]
//! on the input thread. The simulation only ever sees [`Action`] values.

use std::fmt;

/// Which arm a stroke was taken with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Left arm.
    Left,
    /// Right arm.
    Right,
}

/// An abstract swimmer command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// Pull with the left arm.
    StrokeLeft,
    /// Pull with the right arm.
    StrokeRight,
    /// Flutter kick.
    Kick,
    /// Take a breath.
    Breathe,
}

impl Symbol {
    /// All symbols, in key-map order.
    pub const ALL: [Self; 4] = [Self::StrokeLeft, Self::StrokeRight, Self::Kick, Self::Breathe];

    /// The arm used, if this symbol is a stroke.
    #[inline]
    pub const fn side(self) -> Option<Side> {
        match self {
            Self::StrokeLeft => Some(Side::Left),
            Self::StrokeRight => Some(Side::Right),
            Self::Kick | Self::Breathe => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::StrokeLeft => "stroke-left",
            Self::StrokeRight => "stroke-right",
            Self::Kick => "kick",
            Self::Breathe => "breathe",
        })
    }
}

/// One timestamped command addressed to the swimmer in `lane`.
///
/// `at` is measured in seconds on the race clock (zero at race start).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Action {
    /// Lane of the target swimmer.
    pub lane: usize,
    /// What to do.
    pub symbol: Symbol,
    /// When the key was pressed, in race seconds.
    pub at: f64,
}

impl Action {
    /// Create a new action.
    #[inline]
    pub const fn new(lane: usize, symbol: Symbol, at: f64) -> Self {
        Self { lane, symbol, at }
    }
}

/// Binds four characters to the four swimmer symbols.
///
/// Matching is case-insensitive; bindings are stored lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyMap {
    /// Key for [`Symbol::StrokeLeft`].
    pub left: char,
    /// Key for [`Symbol::StrokeRight`].
    pub right: char,
    /// Key for [`Symbol::Kick`].
    pub kick: char,
    /// Key for [`Symbol::Breathe`].
    pub breathe: char,
}

impl KeyMap {
    /// Player one: A/D stroke, S kick, W breathe.
    pub const PLAYER_ONE: Self = Self::new('a', 'd', 's', 'w');

    /// Player two: J/L stroke, K kick, I breathe.
    pub const PLAYER_TWO: Self = Self::new('j', 'l', 'k', 'i');

    /// Create a key map. Characters are lowercased.
    pub const fn new(left: char, right: char, kick: char, breathe: char) -> Self {
        Self {
            left: left.to_ascii_lowercase(),
            right: right.to_ascii_lowercase(),
            kick: kick.to_ascii_lowercase(),
            breathe: breathe.to_ascii_lowercase(),
        }
    }

    /// Resolve a pressed character to a symbol.
    pub fn resolve(&self, key: char) -> Option<Symbol> {
        let key = key.to_ascii_lowercase();
        Symbol::ALL.into_iter().find(|&symbol| self.key_for(symbol) == key)
    }

    /// The character bound to `symbol`.
    pub const fn key_for(&self, symbol: Symbol) -> char {
        match symbol {
            Symbol::StrokeLeft => self.left,
            Symbol::StrokeRight => self.right,
            Symbol::Kick => self.kick,
            Symbol::Breathe => self.breathe,
        }
    }

    /// Whether two maps share any key.
    pub fn overlaps(&self, other: &Self) -> bool {
        Symbol::ALL
            .into_iter()
            .any(|symbol| other.resolve(self.key_for(symbol)).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keymap_resolve() {
        let keys = KeyMap::PLAYER_ONE;
        assert_eq!(keys.resolve('a'), Some(Symbol::StrokeLeft));
        assert_eq!(keys.resolve('D'), Some(Symbol::StrokeRight));
        assert_eq!(keys.resolve('s'), Some(Symbol::Kick));
        assert_eq!(keys.resolve('w'), Some(Symbol::Breathe));
        assert_eq!(keys.resolve('j'), None);
    }

    #[test]
    fn test_keymap_lowercases() {
        let keys = KeyMap::new('Q', 'E', 'R', 'T');
        assert_eq!(keys.left, 'q');
        assert_eq!(keys.resolve('t'), Some(Symbol::Breathe));
    }

    #[test]
    fn test_presets_do_not_overlap() {
        assert!(!KeyMap::PLAYER_ONE.overlaps(&KeyMap::PLAYER_TWO));
        assert!(KeyMap::PLAYER_ONE.overlaps(&KeyMap::new('x', 'y', 'z', 'W')));
    }

    #[test]
    fn test_symbol_side() {
        assert_eq!(Symbol::StrokeLeft.side(), Some(Side::Left));
        assert_eq!(Symbol::StrokeRight.side(), Some(Side::Right));
        assert_eq!(Symbol::Kick.side(), None);
        assert_eq!(Symbol::Breathe.to_string(), "breathe");
    }
}
