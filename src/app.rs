use crate::braille::BrailleSurface;
use crate::config::AppConfig;
use crate::counter::{default_stats, StatCounter};
use crate::driver::{DriverState, HostEvent, Listener, ParticleBackground, QueuedHost};
use crate::ui;
use rand::rngs::StdRng;
use ratatui::layout::Rect;
use std::time::{Duration, Instant};

/// Particles added/removed per +/- keypress
const MAX_PARTICLES_STEP: i32 = 10;

/// Main application state
pub struct App {
    pub background: ParticleBackground<QueuedHost, BrailleSurface>,
    pub config: AppConfig,
    pub preset_name: String,
    pub stats: Vec<StatCounter>,
    pub stats_started: Instant,
    /// Full terminal area as of the last resize
    pub area: Rect,
    pub fullscreen_mode: bool,
    pub show_help: bool,
    pub show_overlay: bool,
    pub help_scroll: u16,
}

impl App {
    pub fn new(config: AppConfig, preset_name: impl Into<String>, area: Rect, rng: StdRng) -> Self {
        let canvas = ui::canvas_rect(area, false);
        let (width, height) = viewport_size(&config, canvas);

        let mut background =
            ParticleBackground::new(config.field.clone(), QueuedHost::new(width, height), rng);
        background.attach(make_surface(&config, canvas));

        Self {
            background,
            show_overlay: config.show_overlay,
            config,
            preset_name: preset_name.into(),
            stats: default_stats(),
            stats_started: Instant::now(),
            area,
            fullscreen_mode: false,
            show_help: false,
            help_scroll: 0,
        }
    }

    /// Fire the pending frame, if the background asked for one
    pub fn tick(&mut self) {
        if let Some(handle) = self.background.host_mut().take_scheduled() {
            self.background.on_frame(handle);
        }
    }

    /// Terminal was resized to `area`
    pub fn resize(&mut self, area: Rect) {
        self.area = area;
        let canvas = ui::canvas_rect(area, self.fullscreen_mode);
        let (width, height) = viewport_size(&self.config, canvas);

        self.background.host_mut().set_viewport(width, height);
        if self.background.state() == DriverState::Unstarted {
            // The terminal may have grown out of a size too small to draw on
            self.background.attach(make_surface(&self.config, canvas));
        } else if self.background.host().is_listening(Listener::Resize) {
            self.background
                .handle_event(HostEvent::Resize { width, height });
        }
    }

    /// Mouse moved to a terminal cell; forwarded in viewport units
    pub fn pointer_moved(&mut self, column: u16, row: u16) {
        if !self.background.host().is_listening(Listener::PointerMove) {
            return;
        }
        let canvas = ui::canvas_rect(self.area, self.fullscreen_mode);
        let x = (column as f32 - canvas.x as f32 + 0.5) * self.config.cell_width_px;
        let y = (row as f32 - canvas.y as f32 + 0.5) * self.config.cell_height_px;
        self.background.handle_event(HostEvent::PointerMove { x, y });
    }

    /// Toggle fullscreen mode; the canvas changes size so the field is rebuilt
    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen_mode = !self.fullscreen_mode;
        self.resize(self.area);
    }

    pub fn toggle_pause(&mut self) {
        self.background.toggle_pause();
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0; // Reset scroll when opening
        }
    }

    pub fn toggle_overlay(&mut self) {
        self.show_overlay = !self.show_overlay;
    }

    /// Scroll help content up
    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    /// Scroll help content down
    pub fn scroll_help_down(&mut self, max_scroll: u16) {
        self.help_scroll = (self.help_scroll + 1).min(max_scroll);
    }

    /// Regenerate the particles in place
    pub fn reseed(&mut self) {
        self.background.reseed();
        self.stats_started = Instant::now();
    }

    /// Raise or lower the particle cap
    pub fn adjust_max_particles(&mut self, up: bool) {
        let delta = if up { MAX_PARTICLES_STEP } else { -MAX_PARTICLES_STEP };
        self.config.field.adjust_max_particles(delta);
        self.background.set_config(self.config.field.clone());
    }

    pub fn stats_elapsed(&self) -> Duration {
        self.stats_started.elapsed()
    }
}

/// A braille surface for the canvas, or None if there is no room to draw
fn make_surface(config: &AppConfig, canvas: Rect) -> Option<BrailleSurface> {
    (canvas.width > 0 && canvas.height > 0).then(|| {
        BrailleSurface::new(config.cell_width_px, config.cell_height_px, config.dot_threshold)
    })
}

/// Viewport size in field units for a canvas measured in terminal cells
fn viewport_size(config: &AppConfig, canvas: Rect) -> (f32, f32) {
    (
        canvas.width as f32 * config.cell_width_px,
        canvas.height as f32 * config.cell_height_px,
    )
}
