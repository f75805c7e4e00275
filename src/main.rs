//! Bomber Quest entry point
//!
//! Runs a headless attract-mode playthrough: the autopilot plays every level
//! of a tier on a fixed 60 Hz clock and the text presenter draws each frame.
//!
//! Usage: `bomber-quest [config.json] [easy|medium|hard]`

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bomber_quest::config::{Difficulty, GameConfig};
use bomber_quest::highscores::HighScore;
use bomber_quest::platform::{ManualClock, Runner};
use bomber_quest::renderer::TextPresenter;
use bomber_quest::sim::{GamePhase, GameState, SeededRandom};

/// Text surface size (classic terminal)
const SURFACE_COLUMNS: usize = 80;
const SURFACE_ROWS: usize = 24;

/// Frames shown between a level ending and the next attempt
const INTERLUDE_FRAMES: u32 = 120;

/// Hard cap on simulated frames (one hour of play)
const MAX_FRAMES: u64 = 60 * 60 * 60;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Bomber Quest (native) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match GameConfig::load(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => GameConfig::default(),
    };
    if let Err(e) = config.validate() {
        log::error!("Invalid config: {}", e);
        return ExitCode::FAILURE;
    }

    let difficulty = match args.next() {
        Some(name) => match name.parse::<Difficulty>() {
            Ok(d) => d,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Difficulty::Easy,
    };

    let mut rng = SeededRandom::from_entropy();
    let state = match GameState::new(&config, difficulty, &mut rng) {
        Ok(state) => state,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let presenter = TextPresenter::new(SURFACE_COLUMNS, SURFACE_ROWS);
    let mut runner = match Runner::new(state, rng, ManualClock::new(), presenter) {
        Ok(runner) => runner.with_high_score(PathBuf::from(HighScore::STORAGE_FILE)),
        Err(e) => {
            log::error!("Cannot start: {}", e);
            return ExitCode::FAILURE;
        }
    };
    runner.input.idle_mode = true;

    let dt = config.tick_duration();
    let mut interlude = 0;
    let mut frames = 0;
    while frames < MAX_FRAMES && !runner.state().is_finished() {
        runner.step();
        runner.clock_mut().advance(dt);
        frames += 1;

        match runner.state().phase {
            GamePhase::LevelComplete | GamePhase::LifeLost(_) => {
                if interlude == 0 {
                    println!("{}\n", runner.presenter().frame());
                }
                interlude += 1;
                if interlude >= INTERLUDE_FRAMES {
                    interlude = 0;
                    runner.advance();
                }
            }
            _ => {}
        }
    }

    println!("{}", runner.presenter().frame());
    match runner.state().phase {
        GamePhase::Victory => log::info!("Victory with score {}", runner.state().score),
        GamePhase::GameOver(reason) => log::info!(
            "Game over ({}) with score {}",
            reason.message(),
            runner.state().score
        ),
        _ => log::warn!("Stopped after {} frames without finishing", frames),
    }
    runner.stop();

    ExitCode::SUCCESS
}
