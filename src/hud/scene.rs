//! Scene: lays a [`Race`] out onto the [`Renderer`] each tick.
//!
//! ```text
//! row 0       header: mode, race clock
//!             ───────────────────────────  separator
//! lane row    ≈≈≈≈≈≈≈🏊≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈  one per swimmer
//!             ───────────────────────────  separator
//! hud rows    name/status, O2, stamina, speed, coaching   (two blocks per row group)
//! last row    controls
//! ```

use super::coach::coaching_line;
use super::gauge::Gauge;
use crate::buffer::fit_width;
use crate::renderer::Renderer;
use crate::sim::{Race, Status, Swimmer};

const WATER: char = '≈';
const LANE_SEPARATOR: char = '─';
const SWIMMER_GLYPH: &str = "🏊";
const FINISHED_GLYPH: &str = "🏁";
const DROWNED_GLYPH: &str = "💀";
/// Display width of the glyphs above.
const GLYPH_WIDTH: usize = 2;
/// Rows in one HUD block.
const HUD_BLOCK_ROWS: u16 = 5;
/// Speed that fills the speed gauge.
const SPEED_GAUGE_MAX: f64 = 4.0;

/// Geometry of the race screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneLayout {
    /// Blank columns left of the pool.
    pub left_margin: usize,
    /// Row of the first lane.
    pub first_lane_row: u16,
    /// Rows between consecutive lanes.
    pub lane_spacing: u16,
    /// Width of HUD gauges.
    pub hud_bar_width: usize,
    /// Minimum column where the right HUD block starts.
    pub min_column_split: usize,
}

impl Default for SceneLayout {
    fn default() -> Self {
        Self {
            left_margin: 2,
            first_lane_row: 6,
            lane_spacing: 6,
            hud_bar_width: 28,
            min_column_split: 50,
        }
    }
}

impl SceneLayout {
    /// Row of the lane at position `index` (in lane order).
    #[allow(clippy::cast_possible_truncation)]
    pub const fn lane_row(&self, index: usize) -> u16 {
        self.first_lane_row + self.lane_spacing * index as u16
    }

    /// First HUD row for a race with `swimmers` racers.
    pub const fn hud_top(&self, swimmers: usize) -> u16 {
        self.lane_row(swimmers.saturating_sub(1)) + 2
    }

    /// First row below the HUD.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn hud_bottom(&self, swimmers: usize) -> u16 {
        let groups = swimmers.div_ceil(2) as u16;
        self.hud_top(swimmers) + groups * (HUD_BLOCK_ROWS + 1)
    }

    /// Column where the right HUD block starts.
    pub fn column_split(&self, width: usize) -> usize {
        (width / 2).max(self.min_column_split).min(width.saturating_sub(2))
    }

    /// Pool width in cells.
    pub fn pool_chars(&self, width: usize) -> usize {
        width.saturating_sub(self.left_margin + 2).max(20)
    }
}

/// Composes race frames and the result screen.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    layout: SceneLayout,
}

impl Scene {
    /// Create a scene with the given geometry.
    pub const fn new(layout: SceneLayout) -> Self {
        Self { layout }
    }

    /// The scene geometry.
    pub const fn layout(&self) -> &SceneLayout {
        &self.layout
    }

    /// Paint one race frame. `now` is race time, used for cadence advice.
    pub fn compose(&self, race: &Race, renderer: &mut Renderer, now: f64) {
        let width = renderer.width() as usize;
        renderer.clear();
        renderer.paint(0, &self.header(race));

        for (index, swimmer) in race.swimmers().iter().enumerate() {
            let row = self.layout.lane_row(index);
            let separator = self.separator(width);
            renderer.paint(row.saturating_sub(1), &separator);
            renderer.paint(row, &self.lane_line(swimmer, width));
            renderer.paint(row + 1, &separator);
        }

        let split = self.layout.column_split(width);
        let top = self.layout.hud_top(race.swimmers().len());
        for (group, pair) in (0u16..).zip(race.swimmers().chunks(2)) {
            let first = top + group * (HUD_BLOCK_ROWS + 1);
            let left = self.hud_block(&pair[0], now);
            let right = pair.get(1).map(|s| self.hud_block(s, now));
            for (offset, line) in (0u16..).zip(&left) {
                let text = match &right {
                    Some(right) => side_by_side(line, &right[offset as usize], split),
                    None => format!(" {line}"),
                };
                renderer.paint(first + offset, &text);
            }
        }

        let last = renderer.height().saturating_sub(1);
        renderer.paint(last, &controls_line(race));
    }

    /// Paint the race frame followed by the result summary.
    pub fn compose_summary(&self, race: &Race, renderer: &mut Renderer) {
        self.compose(race, renderer, race.elapsed());

        let lines = summary_lines(race);
        let last = renderer.height().saturating_sub(1);
        let wanted = self.layout.hud_bottom(race.swimmers().len());
        #[allow(clippy::cast_possible_truncation)]
        let needed = lines.len() as u16;
        let start = wanted.min(last.saturating_sub(needed));
        for (offset, line) in (0u16..).zip(&lines) {
            if start + offset < last {
                renderer.paint(start + offset, line);
            }
        }
    }

    fn header(&self, race: &Race) -> String {
        format!(
            "{SWIMMER_GLYPH} Swimming Race | {}P  Time: {:5.2}/{:.0}s  Course: {:.0}m  (Anti-mash, Glide)",
            race.swimmers().len(),
            race.elapsed(),
            race.time_limit(),
            race.config().course_length,
        )
    }

    fn separator(&self, width: usize) -> String {
        let mut line = " ".repeat(self.layout.left_margin);
        line.extend(std::iter::repeat(LANE_SEPARATOR).take(self.layout.pool_chars(width)));
        line
    }

    /// The water strip with the swimmer glyph at its scaled column.
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_sign_loss)]
    fn lane_line(&self, swimmer: &Swimmer, width: usize) -> String {
        let pool = self.layout.pool_chars(width);
        let travel = pool.saturating_sub(GLYPH_WIDTH);
        let before = ((swimmer.progress() * travel as f64).floor() as usize).min(travel);
        let glyph = match swimmer.status() {
            Status::Swimming => SWIMMER_GLYPH,
            Status::Finished { .. } => FINISHED_GLYPH,
            Status::Drowned { .. } => DROWNED_GLYPH,
        };

        let mut line = " ".repeat(self.layout.left_margin);
        line.extend(std::iter::repeat(WATER).take(before));
        line.push_str(glyph);
        line.extend(std::iter::repeat(WATER).take(travel - before));
        line
    }

    fn hud_block(&self, swimmer: &Swimmer, now: f64) -> [String; HUD_BLOCK_ROWS as usize] {
        let bar = self.layout.hud_bar_width;
        let status = match swimmer.status() {
            Status::Swimming => format!("✓ {:.1}m", swimmer.position()),
            Status::Finished { at } => format!("{FINISHED_GLYPH} {at:.2}s"),
            Status::Drowned { .. } => format!("{DROWNED_GLYPH} drowned"),
        };
        let tip: String = coaching_line(swimmer, now)
            .chars()
            .take((bar * 2 + 10).max(20))
            .collect();

        [
            format!("🧑 {}  {status}", swimmer.name()),
            Gauge::percent("🫁", "O₂", bar).render(swimmer.oxygen()),
            Gauge::percent("💪", "Stamina", bar).render(swimmer.stamina()),
            Gauge::value("🏁", "Speed", bar, SPEED_GAUGE_MAX, "m/s").render(swimmer.velocity()),
            format!("💡 {tip}"),
        ]
    }
}

/// Two HUD columns on one row, the right one starting at column `split`.
fn side_by_side(left: &str, right: &str, split: usize) -> String {
    let mut line = fit_width(&format!(" {left}"), split);
    line.push_str(right);
    line
}

/// Key help for every swimmer, plus quit.
fn controls_line(race: &Race) -> String {
    let players: Vec<String> = race
        .swimmers()
        .iter()
        .map(|s| {
            let keys = s.keys();
            format!(
                "{}[{}/{}]=stroke [{}]=kick [{}]=breathe",
                s.name(),
                keys.left.to_ascii_uppercase(),
                keys.right.to_ascii_uppercase(),
                keys.kick.to_ascii_uppercase(),
                keys.breathe.to_ascii_uppercase(),
            )
        })
        .collect();
    format!("Controls: {} | [Q]=quit  Anti-mash ON", players.join(" | "))
}

/// One line per swimmer, then the winner and an exit prompt.
pub fn summary_lines(race: &Race) -> Vec<String> {
    let mut lines = vec![String::new()];
    for standing in race.standings() {
        let time = match standing.status {
            Status::Finished { at } => format!("{at:0.2}s"),
            Status::Drowned { at } => format!("drowned at {at:0.2}s"),
            Status::Swimming => "-".to_string(),
        };
        let speed = standing
            .average_speed
            .map_or_else(|| "-".to_string(), |v| format!("{v:.2} m/s"));
        lines.push(format!(
            "{}: time={time} strokes={} avg_speed={speed} pos={:.1}m",
            standing.name, standing.stroke_count, standing.position
        ));
    }
    lines.push(match race.winner() {
        Some(winner) => format!("{} wins!", winner.name()),
        None => "Everyone ran out of air. No winner.".to_string(),
    });
    lines.push("Press any key to exit...".to_string());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::display_width;
    use crate::sim::{Action, KeyMap, RaceConfig, Symbol};

    fn two_player_race() -> Race {
        Race::new(
            vec![
                Swimmer::new("Player 1", 0, KeyMap::PLAYER_ONE),
                Swimmer::new("Player 2", 1, KeyMap::PLAYER_TWO),
            ],
            RaceConfig { course_length: 25.0, time_limit: 60.0 },
        )
        .unwrap()
    }

    fn row(renderer: &Renderer, y: u16) -> String {
        renderer.back().row(y).unwrap().to_string()
    }

    #[test]
    fn test_layout_rows() {
        let layout = SceneLayout::default();
        assert_eq!(layout.lane_row(0), 6);
        assert_eq!(layout.lane_row(1), 12);
        assert_eq!(layout.hud_top(2), 14);
        assert_eq!(layout.hud_bottom(2), 20);
        assert_eq!(layout.column_split(120), 60);
        assert_eq!(layout.column_split(96), 50);
    }

    #[test]
    fn test_compose_paints_lanes_and_hud() {
        let race = two_player_race();
        let scene = Scene::default();
        let mut renderer = Renderer::new(120, 30);
        scene.compose(&race, &mut renderer, 0.0);

        assert!(row(&renderer, 0).contains("Time:  0.00/60s"));
        assert!(row(&renderer, 6).contains(SWIMMER_GLYPH));
        assert!(row(&renderer, 5).contains(LANE_SEPARATOR));
        assert!(row(&renderer, 12).contains(SWIMMER_GLYPH));
        assert!(row(&renderer, 14).contains("Player 1"));
        assert!(row(&renderer, 14).contains("Player 2"));
        assert!(row(&renderer, 29).starts_with("Controls: Player 1[A/D]"));
        for y in 0..30 {
            assert_eq!(display_width(&row(&renderer, y)), 120);
        }
    }

    #[test]
    fn test_lane_glyph_moves_with_position() {
        let scene = Scene::default();
        let mut swimmer = Swimmer::new("Solo", 0, KeyMap::PLAYER_ONE);
        let start = scene.lane_line(&swimmer, 100);
        for _ in 0..10 {
            swimmer.advance(1.0);
        }
        let later = scene.lane_line(&swimmer, 100);
        assert!(start.find(SWIMMER_GLYPH).unwrap() < later.find(SWIMMER_GLYPH).unwrap());
        assert_eq!(display_width(&start), display_width(&later));
    }

    #[test]
    fn test_finished_lane_stays_in_pool() {
        let scene = Scene::default();
        let mut swimmer = Swimmer::new("Solo", 0, KeyMap::PLAYER_ONE).with_course_length(0.1);
        swimmer.advance(1.0);
        let line = scene.lane_line(&swimmer, 100);
        assert!(line.contains(FINISHED_GLYPH));
        assert_eq!(display_width(&line), 2 + scene.layout().pool_chars(100));
    }

    #[test]
    fn test_unchanged_race_flushes_nothing() {
        let race = two_player_race();
        let scene = Scene::default();
        let mut renderer = Renderer::new(120, 30);
        scene.compose(&race, &mut renderer, 0.0);
        renderer.flush();
        scene.compose(&race, &mut renderer, 0.0);
        assert!(renderer.flush().is_empty());
    }

    #[test]
    fn test_tick_changes_few_rows() {
        let mut race = two_player_race();
        let scene = Scene::default();
        let mut renderer = Renderer::new(120, 30);
        scene.compose(&race, &mut renderer, 0.0);
        renderer.flush();

        race.step([Action::new(0, Symbol::StrokeLeft, 0.0)], 0.5);
        scene.compose(&race, &mut renderer, 0.5);
        let updates = renderer.flush();
        assert!(!updates.is_empty());
        assert!(updates.len() < 30);
        assert!(updates.iter().any(|u| u.row == 0));
    }

    #[test]
    fn test_summary_lines() {
        let mut race = Race::new(
            vec![Swimmer::new("Solo", 0, KeyMap::PLAYER_ONE)],
            RaceConfig { course_length: 0.4, time_limit: 60.0 },
        )
        .unwrap();
        race.step([], 1.0);
        race.step([], 1.0);
        let lines = summary_lines(&race);
        assert_eq!(lines[1], "Solo: time=2.00s strokes=0 avg_speed=0.20 m/s pos=0.4m");
        assert_eq!(lines[2], "Solo wins!");

        let scene = Scene::default();
        let mut renderer = Renderer::new(96, 30);
        scene.compose_summary(&race, &mut renderer);
        assert!((0..30).any(|y| row(&renderer, y).starts_with("Solo wins!")));
    }
}
