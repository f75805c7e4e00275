//! ASCII presenter for headless runs and logs

use glam::IVec2;

use super::Presenter;
use crate::error::SurfaceError;
use crate::sim::{GamePhase, Snapshot, Tile};

/// Renders each frame into a string grid plus a HUD line
#[derive(Debug, Clone)]
pub struct TextPresenter {
    /// Character cells available, if any surface exists
    surface: Option<(usize, usize)>,
    attached: bool,
    frame: String,
    frames: u64,
}

impl TextPresenter {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            surface: Some((width, height)),
            attached: false,
            frame: String::new(),
            frames: 0,
        }
    }

    /// A presenter with no surface behind it; attaching fails
    pub fn unavailable() -> Self {
        Self {
            surface: None,
            attached: false,
            frame: String::new(),
            frames: 0,
        }
    }

    /// Last rendered frame
    pub fn frame(&self) -> &str {
        &self.frame
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    fn glyph(snapshot: &Snapshot, cell: IVec2) -> char {
        if snapshot.agent.cell == cell {
            return if snapshot.agent.alive { 'B' } else { 'x' };
        }
        if snapshot.adversaries.iter().any(|a| a.alive && a.cell == cell) {
            return 'E';
        }
        if snapshot.explosives.iter().any(|e| e.cell == cell) {
            return 'o';
        }
        if snapshot.in_blast(cell) {
            return '*';
        }
        match snapshot.tile(cell) {
            Tile::Empty => '.',
            Tile::Destructible => '+',
            Tile::Indestructible => '#',
            Tile::Goal => '$',
        }
    }
}

fn hud_line(snapshot: &Snapshot) -> String {
    let hud = &snapshot.hud;
    let status = match hud.phase {
        GamePhase::Playing => String::new(),
        GamePhase::Paused => "  PAUSED".to_string(),
        GamePhase::LevelComplete => "  LEVEL COMPLETE".to_string(),
        GamePhase::LifeLost(reason) => format!("  {}", reason.message()),
        GamePhase::GameOver(_) => "  GAME OVER".to_string(),
        GamePhase::Victory => "  VICTORY".to_string(),
    };
    format!(
        "L{} S{} H{} T{} B{}{}",
        hud.level,
        hud.score,
        hud.lives,
        hud.time_remaining.as_secs_f32().ceil() as u64,
        hud.explosives_left,
        status
    )
}

impl Presenter for TextPresenter {
    fn attach(&mut self, columns: usize, rows: usize) -> Result<(), SurfaceError> {
        let (width, height) = self.surface.ok_or(SurfaceError::Unavailable)?;
        // One extra row for the HUD
        if width < columns || height < rows + 1 {
            return Err(SurfaceError::TooSmall {
                width,
                height,
                columns,
                rows,
            });
        }
        self.attached = true;
        log::debug!("Text presenter attached ({}x{})", width, height);
        Ok(())
    }

    fn present(&mut self, snapshot: &Snapshot) {
        if !self.attached {
            return;
        }

        let mut out = String::with_capacity(((snapshot.width + 1) * (snapshot.height + 1)) as usize);
        for y in 0..snapshot.height {
            for x in 0..snapshot.width {
                out.push(Self::glyph(snapshot, IVec2::new(x, y)));
            }
            out.push('\n');
        }
        out.push_str(&hud_line(snapshot));
        self.frame = out;
        self.frames += 1;
    }

    fn detach(&mut self) {
        self.attached = false;
    }
}
