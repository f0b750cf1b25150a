//! Headless race: a scripted two-lane race without a terminal.
//!
//! Player 1 strokes on rhythm and breathes every four strokes; player 2
//! mashes. Prints how many rows each frame would repaint, then the results.
//!
//! Run with: cargo run --example headless_race

use swimrace::hud::{summary_lines, Scene};
use swimrace::{Action, KeyMap, Race, RaceConfig, Renderer, Swimmer, Symbol};

const DT: f64 = 1.0 / 60.0;

fn main() -> swimrace::Result<()> {
    let swimmers = vec![
        Swimmer::new("Rhythm", 0, KeyMap::PLAYER_ONE),
        Swimmer::new("Masher", 1, KeyMap::PLAYER_TWO),
    ];
    let mut race = Race::new(swimmers, RaceConfig::default())?;
    let scene = Scene::default();
    let mut renderer = Renderer::new(120, 30);

    let mut next_stroke = 0.0;
    let mut strokes = 0u32;
    let mut next_mash = 0.0;
    let mut frame = 0u64;
    let mut rows = 0usize;

    while !race.is_over() {
        let now = race.elapsed();
        let mut actions = Vec::new();
        if now >= next_stroke {
            let symbol = if strokes % 2 == 0 { Symbol::StrokeLeft } else { Symbol::StrokeRight };
            actions.push(Action::new(0, symbol, now));
            strokes += 1;
            if strokes % 4 == 0 {
                actions.push(Action::new(0, Symbol::Breathe, now));
            }
            next_stroke = now + 0.47;
        }
        if now >= next_mash {
            actions.push(Action::new(1, Symbol::StrokeLeft, now));
            next_mash = now + 0.1;
        }

        let report = race.step(actions, DT);
        scene.compose(&race, &mut renderer, race.elapsed());
        rows += renderer.flush().len();
        frame += 1;

        for lane in report.finished {
            println!("lane {lane} finished at {:.2}s", race.elapsed());
        }
        for lane in report.drowned {
            println!("lane {lane} ran out of air at {:.2}s", race.elapsed());
        }
    }

    println!();
    println!("{frame} frames, {rows} rows repainted ({:.1} per frame)", rows as f64 / frame as f64);
    for line in summary_lines(&race) {
        println!("{line}");
    }
    Ok(())
}
