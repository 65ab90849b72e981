// config.rs - Look and feel of the window

use egui::{Color32, Stroke, Vec2};

/// The title of the window.
pub const TITLE: &str = "Conway's Game of Life";

/// Room left around the board for the heading, buttons and status line.
const CHROME: Vec2 = Vec2::new(40.0, 170.0);
/// The window never gets narrower than the row of controls.
const MIN_WINDOW: Vec2 = Vec2::new(420.0, 240.0);

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub cell_size: f32,
    pub spacing: f32,
    pub live_color: Color32,
    pub dead_color: Color32,
    pub border_color: Color32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cell_size: 24.0,
            spacing: 1.0,
            live_color: Color32::WHITE,
            dead_color: Color32::BLACK,
            border_color: Color32::from_gray(60),
        }
    }
}

impl AppConfig {
    /// Distance from one cell to the next.
    pub fn pitch(&self) -> f32 {
        self.cell_size + self.spacing
    }

    /// Outline drawn around every cell.
    pub fn cell_stroke(&self) -> Stroke {
        Stroke::new(0.2, self.border_color)
    }

    /// Size of the painted board for `length` columns and `width` rows.
    pub fn board_size(&self, length: usize, width: usize) -> Vec2 {
        Vec2::new(
            self.pitch() * length as f32 - self.spacing,
            self.pitch() * width as f32 - self.spacing,
        )
    }

    pub fn window_size(&self, length: usize, width: usize) -> Vec2 {
        (self.board_size(length, width) + CHROME).max(MIN_WINDOW)
    }
}
