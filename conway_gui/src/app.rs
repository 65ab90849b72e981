// app.rs - The window: a board of clickable cells and the controls below it

use std::num::NonZeroU32;
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use conway::{Grid, SPEED_MAX, SPEED_MIN};
use egui::{Rect, Vec2};
use log::{info, warn};

use crate::args::Args;
use crate::clock::FrameClock;
use crate::config::{AppConfig, TITLE};

/// Opens the window and runs until it is closed.
pub fn run(grid: Grid, args: &Args) -> Result<()> {
    let config = AppConfig::default();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size(grid.length(), grid.width())),
        ..Default::default()
    };
    let app = GameOfLife::new(grid, config, args.interval());

    eframe::run_native(TITLE, options, Box::new(move |_cc| Box::new(app)))
        .map_err(|err| anyhow!("failed to run the window: {err}"))
}

pub struct GameOfLife {
    grid: Grid,
    clock: FrameClock,
    config: AppConfig,
    interval: Duration,
    speed: u32,
}

impl GameOfLife {
    pub fn new(grid: Grid, config: AppConfig, interval: Duration) -> Self {
        let speed = grid.speed().get();
        Self {
            grid,
            clock: FrameClock::new(),
            config,
            interval,
            speed,
        }
    }

    /// Lets the grid take every timer that has come due.
    fn poll_timers(&mut self) {
        for id in self.clock.due(Instant::now()) {
            self.grid.fire(&mut self.clock, id);
        }
    }

    fn board(&mut self, ui: &mut egui::Ui) {
        let AppConfig {
            cell_size,
            live_color,
            dead_color,
            border_color,
            ..
        } = self.config;
        let pitch = self.config.pitch();
        let cell_stroke = self.config.cell_stroke();
        let total_size = self.config.board_size(self.grid.length(), self.grid.width());

        let (response, painter) = ui.allocate_painter(total_size, egui::Sense::click());
        let start_pos = response.rect.min;

        // Fill background
        painter.rect_filled(response.rect, 0.0, border_color);

        let click = if response.clicked() {
            response.interact_pointer_pos()
        } else {
            None
        };
        let mut clicked_cell = None;

        for (y, row) in self.grid.rows().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                let rect = Rect::from_min_size(
                    start_pos + Vec2::new(x as f32 * pitch, y as f32 * pitch),
                    Vec2::splat(cell_size),
                );
                let cell_color = if cell.is_alive() { live_color } else { dead_color };

                painter.rect_filled(rect, 1.0, cell_color);
                painter.rect_stroke(rect, 1.0, cell_stroke);

                if click.is_some_and(|pos| rect.contains(pos)) {
                    clicked_cell = Some((x, y));
                }
            }
        }

        if let Some((x, y)) = clicked_cell {
            if let Err(err) = self.grid.toggle(x, y) {
                warn!("{err}");
            }
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            if ui.button("Step").clicked() {
                self.grid.step();
            }

            if ui.button("Continue").clicked() {
                self.grid.continue_run(&mut self.clock, self.interval, None);
            }

            if ui.button("Reset").clicked() {
                self.grid.reset(&mut self.clock);
            }

            if ui.button("Exit").clicked() {
                info!("exiting");
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.horizontal(|ui| {
            ui.label("Speed:");
            if ui
                .add(egui::Slider::new(&mut self.speed, SPEED_MIN..=SPEED_MAX))
                .changed()
            {
                if let Some(speed) = NonZeroU32::new(self.speed) {
                    self.grid.set_speed(speed);
                }
            }
        });
    }

    fn status(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(format!("Generation: {}", self.grid.generation()));
            ui.separator();
            ui.label(format!("Live cells: {}", self.grid.population()));
            ui.separator();
            ui.label(if self.grid.is_running() {
                "Running"
            } else {
                "Idle"
            });
        });
    }
}

impl eframe::App for GameOfLife {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_timers();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(TITLE);
            ui.separator();
            self.board(ui);
            ui.separator();
            self.controls(ui, ctx);
            ui.separator();
            self.status(ui);
        });

        // Wake up again in time for the next generation.
        if let Some(wait) = self.clock.until_next(Instant::now()) {
            ctx.request_repaint_after(wait);
        }
    }
}
