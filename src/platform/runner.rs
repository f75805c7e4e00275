//! Tick/present loop
//!
//! The runner owns everything the simulation needs from the host. Each
//! `step` samples the clock once, runs one tick with the current input and
//! presents one frame.

use std::path::PathBuf;

use super::clock::Clock;
use super::input::InputState;
use crate::error::SurfaceError;
use crate::highscores::HighScore;
use crate::renderer::Presenter;
use crate::sim::{GameEvent, GameState, SeededRandom, Snapshot, tick};

pub struct Runner<C: Clock, P: Presenter> {
    state: GameState,
    rng: SeededRandom,
    clock: C,
    presenter: P,
    pub input: InputState,
    running: bool,
    ticks: u64,
    high_score: HighScore,
    high_score_path: Option<PathBuf>,
    /// The finished playthrough's score has been recorded
    recorded: bool,
}

impl<C: Clock, P: Presenter> Runner<C, P> {
    /// Attach the presenter and show the first frame
    ///
    /// A surface that cannot be attached is fatal: nothing is simulated.
    pub fn new(
        state: GameState,
        rng: SeededRandom,
        clock: C,
        mut presenter: P,
    ) -> Result<Self, SurfaceError> {
        let columns = state.maze.width().max(0) as usize;
        let rows = state.maze.height().max(0) as usize;
        presenter.attach(columns, rows)?;
        presenter.present(&Snapshot::capture(&state));
        log::info!("Runner started (seed {})", rng.seed());

        Ok(Self {
            state,
            rng,
            clock,
            presenter,
            input: InputState::new(),
            running: true,
            ticks: 0,
            high_score: HighScore::new(),
            high_score_path: None,
            recorded: false,
        })
    }

    /// Load the best score from `path` and save back to it
    pub fn with_high_score(mut self, path: PathBuf) -> Self {
        self.high_score = HighScore::load(&path);
        self.high_score_path = Some(path);
        self
    }

    /// One tick and one frame; does nothing once stopped
    pub fn step(&mut self) -> Vec<GameEvent> {
        if !self.running {
            return Vec::new();
        }

        let input = self.input.take_tick_input();
        let events = tick(&mut self.state, &input, self.clock.now(), &mut self.rng);
        self.ticks += 1;

        for event in &events {
            log::debug!("tick {}: {:?}", self.ticks, event);
        }
        if self.state.is_finished() {
            self.record_score();
        }

        self.presenter.present(&Snapshot::capture(&self.state));
        events
    }

    /// Continue past a completed level or a lost life
    pub fn advance(&mut self) -> bool {
        if !self.running || !self.state.advance(&mut self.rng) {
            return false;
        }
        if self.state.is_finished() {
            self.record_score();
        }
        self.presenter.present(&Snapshot::capture(&self.state));
        true
    }

    /// Halt the loop and release the presenter
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.presenter.detach();
        log::info!(
            "Runner stopped after {} ticks (score {}, best {})",
            self.ticks,
            self.state.score,
            self.high_score.best
        );
    }

    fn record_score(&mut self) {
        if self.recorded {
            return;
        }
        self.recorded = true;
        if !self.high_score.record(self.state.score) {
            return;
        }
        log::info!("New high score: {}", self.high_score.best);
        if let Some(path) = &self.high_score_path {
            if let Err(e) = self.high_score.save(path) {
                log::warn!("{}", e);
            }
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn high_score(&self) -> HighScore {
        self.high_score
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::{Difficulty, GameConfig};
    use crate::platform::clock::ManualClock;
    use crate::platform::input::Key;
    use crate::renderer::TextPresenter;
    use crate::sim::{GamePhase, LossReason};

    fn runner_with(state: GameState) -> Runner<ManualClock, TextPresenter> {
        Runner::new(
            state,
            SeededRandom::seeded(3),
            ManualClock::new(),
            TextPresenter::new(80, 24),
        )
        .unwrap()
    }

    fn new_state(seed: u64) -> GameState {
        let mut rng = SeededRandom::seeded(seed);
        GameState::new(&GameConfig::default(), Difficulty::Easy, &mut rng).unwrap()
    }

    #[test]
    fn test_unavailable_surface_is_fatal() {
        let result = Runner::new(
            new_state(1),
            SeededRandom::seeded(1),
            ManualClock::new(),
            TextPresenter::unavailable(),
        );
        assert!(matches!(result, Err(SurfaceError::Unavailable)));
    }

    #[test]
    fn test_step_ticks_and_presents() {
        let mut runner = runner_with(new_state(1));
        let dt = GameConfig::default().tick_duration();
        for _ in 0..10 {
            runner.step();
            runner.clock_mut().advance(dt);
        }
        assert_eq!(runner.ticks(), 10);
        assert_eq!(runner.state().level_ticks, 10);
        // Initial frame plus one per step
        assert_eq!(runner.presenter().frames_presented(), 11);
    }

    #[test]
    fn test_place_press_is_one_shot() {
        let mut runner = runner_with(new_state(2));
        runner.input.key_down(Key::PlaceExplosive);
        let first = runner.step();
        assert!(first
            .iter()
            .any(|e| matches!(e, GameEvent::ExplosivePlaced { .. })));

        // Still held: no second placement request
        let second = runner.step();
        assert!(!second
            .iter()
            .any(|e| matches!(e, GameEvent::ExplosivePlaced { .. })));
        assert_eq!(runner.state().explosives.armed().len(), 1);
    }

    #[test]
    fn test_stop_is_final() {
        let mut runner = runner_with(new_state(4));
        runner.step();
        runner.stop();
        assert!(!runner.is_running());
        assert!(!runner.presenter().is_attached());

        runner.clock_mut().advance(Duration::from_secs(1));
        assert!(runner.step().is_empty());
        assert!(!runner.advance());
        assert_eq!(runner.ticks(), 1);
        assert_eq!(runner.state().level_ticks, 1);
        assert_eq!(runner.presenter().frames_presented(), 2);
    }

    #[test]
    fn test_game_over_records_best() {
        let path = std::env::temp_dir().join(format!(
            "bomber_quest_runner_{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let mut state = new_state(5);
        state.score = 500;
        state.lives = 1;
        let mut runner = runner_with(state).with_high_score(path.clone());

        runner.step();
        runner.clock_mut().advance(Duration::from_secs(121));
        let events = runner.step();

        assert_eq!(
            runner.state().phase,
            GamePhase::GameOver(LossReason::TimeExpired)
        );
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver { score: 500, .. })));
        assert_eq!(runner.high_score().best, 500);
        assert_eq!(HighScore::load(&path).best, 500);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_advance_after_life_lost() {
        let mut runner = runner_with(new_state(6));
        runner.step();
        runner.clock_mut().advance(Duration::from_secs(121));
        runner.step();
        assert!(matches!(runner.state().phase, GamePhase::LifeLost(_)));

        assert!(runner.advance());
        assert_eq!(runner.state().phase, GamePhase::Playing);
        assert_eq!(runner.state().lives, 2);
        assert_eq!(runner.high_score().best, 0);
    }
}
