mod app;
mod braille;
mod color;
mod config;
mod counter;
mod driver;
mod error;
mod export;
mod field;
mod physics;
mod presets;
mod raster;
mod render;
mod surface;
mod ui;

use app::App;
use clap::Parser;
use config::AppConfig;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use export::ExportOptions;
use presets::{Preset, PresetManager};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "particle-field")]
#[command(about = "Interactive particle-field hero background in the terminal")]
struct Args {
    // === Configuration ===
    /// Load settings from a JSON config file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Start from a named preset (built-in or user)
    #[arg(short = 'p', long)]
    preset: Option<String>,

    /// List available presets and exit
    #[arg(long = "list-presets")]
    list_presets: bool,

    /// Save the resulting field settings as a user preset and exit
    #[arg(long = "save-preset", value_name = "NAME")]
    save_preset: Option<String>,

    /// Delete a user preset and exit
    #[arg(long = "delete-preset", value_name = "NAME")]
    delete_preset: Option<String>,

    /// Write the resulting configuration to a JSON file and exit
    #[arg(long = "export-config", value_name = "PATH")]
    export_config: Option<PathBuf>,

    // === Field Overrides ===
    /// Random seed for a reproducible particle layout
    #[arg(long)]
    seed: Option<u64>,

    /// Particle cap (default 120)
    #[arg(long = "max-particles")]
    max_particles: Option<usize>,

    /// Particles per unit of viewport width (default 0.1)
    #[arg(long)]
    density: Option<f32>,

    /// Start with the hero text overlay hidden
    #[arg(long = "no-overlay")]
    no_overlay: bool,

    // === Headless Export ===
    /// Render without a terminal and save the final frame as PNG
    #[arg(long, value_name = "PNG")]
    snapshot: Option<PathBuf>,

    /// Render without a terminal and record an animated GIF
    #[arg(long, value_name = "GIF")]
    record: Option<PathBuf>,

    /// Frames to simulate for --snapshot/--record
    #[arg(long, default_value = "120")]
    frames: usize,

    /// Export viewport width
    #[arg(long, default_value = "1200")]
    width: u32,

    /// Export viewport height
    #[arg(long, default_value = "800")]
    height: u32,

    // === Diagnostics ===
    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn is_headless(&self) -> bool {
        self.snapshot.is_some()
            || self.record.is_some()
            || self.list_presets
            || self.save_preset.is_some()
            || self.delete_preset.is_some()
            || self.export_config.is_some()
    }
}

/// Route logs to a file, to stderr for headless runs, or nowhere while the TUI owns the screen
fn init_logging(log_file: Option<&Path>, headless: bool) -> io::Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        None if !headless => {
            builder.filter_level(log::LevelFilter::Off);
        }
        None => {}
    }
    builder.init();
    Ok(())
}

/// Resolve config file, preset and CLI overrides into one validated config
fn build_config(args: &Args, presets: &PresetManager) -> Result<(AppConfig, String), error::FieldError> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("loading config from {}", path.display());
            AppConfig::load_from_file(path)?
        }
        None => AppConfig::default(),
    };

    let mut preset_name = String::from("Custom");
    if let Some(name) = &args.preset {
        let preset = presets.find(name)?;
        config.field = preset.field.clone();
        preset_name = preset.name.clone();
    } else if args.config.is_none() {
        preset_name = String::from("Hero");
    }

    if let Some(max) = args.max_particles {
        config.field.max_particles = max;
    }
    if let Some(density) = args.density {
        config.field.density = density;
    }
    if args.no_overlay {
        config.show_overlay = false;
    }

    config.validate()?;
    Ok((config, preset_name))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref(), args.is_headless())?;

    let mut presets = PresetManager::new();
    let (config, preset_name) = build_config(&args, &presets)?;
    let rng = || match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    // === One-shot commands ===
    if args.list_presets {
        for preset in presets.all_presets() {
            println!("{:<16} {}", preset.name, preset.description);
        }
        return Ok(());
    }
    if let Some(name) = &args.save_preset {
        let preset = Preset::new(name.clone(), "Saved from the command line", config.field.clone());
        let path = presets.save_preset(preset)?;
        println!("Saved preset '{}' to {}", name, path.display());
        return Ok(());
    }
    if let Some(name) = &args.delete_preset {
        presets.delete_preset(name)?;
        println!("Deleted preset '{}'", name);
        return Ok(());
    }
    if let Some(path) = &args.export_config {
        config.save_to_file(path)?;
        println!("Wrote config to {}", path.display());
        return Ok(());
    }

    let options = ExportOptions {
        width: args.width,
        height: args.height,
        frames: args.frames,
        pointer: None,
    };
    if let Some(path) = &args.snapshot {
        export::export_png(&config.field, &options, rng(), path)?;
    }
    if let Some(path) = &args.record {
        export::export_gif(&config.field, &options, rng(), path)?;
    }
    if args.snapshot.is_some() || args.record.is_some() {
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let mut app = App::new(
        config,
        preset_name,
        Rect::new(0, 0, size.width, size.height),
        rng(),
    );

    // Run the app
    let res = run_app(&mut terminal, &mut app);

    // Stop the background before the screen goes away
    app.background.teardown();

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("terminal loop failed: {}", err);
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    // Target ~60fps for smooth animation
    const FRAME_DURATION: Duration = Duration::from_millis(16);
    let mut last_frame: Option<Instant> = None;

    loop {
        // Display tick: fire the scheduled frame callback
        if last_frame.map_or(true, |t| t.elapsed() >= FRAME_DURATION) {
            app.tick();
            last_frame = Some(Instant::now());
        }

        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll for events until the next tick is due
        let until_tick = last_frame.map_or(Duration::ZERO, |t| FRAME_DURATION.saturating_sub(t.elapsed()));
        if event::poll(until_tick)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only process Press events
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    // Handle Ctrl+C
                    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        return Ok(());
                    }

                    match key.code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char(' ') => app.toggle_pause(),
                        KeyCode::Char('r') | KeyCode::Char('R') => app.reseed(),
                        KeyCode::Char('v') | KeyCode::Char('V') => app.toggle_fullscreen(),
                        KeyCode::Char('o') | KeyCode::Char('O') => app.toggle_overlay(),
                        KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => app.toggle_help(),
                        KeyCode::Char('+') | KeyCode::Char('=') => app.adjust_max_particles(true),
                        KeyCode::Char('-') | KeyCode::Char('_') => app.adjust_max_particles(false),
                        KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Down => {
                            if app.show_help {
                                app.scroll_help_down(ui::HELP_CONTENT_LINES);
                            }
                        }
                        KeyCode::Char('k') | KeyCode::Char('K') | KeyCode::Up => {
                            if app.show_help {
                                app.scroll_help_up();
                            }
                        }
                        KeyCode::Esc => {
                            if app.show_help {
                                app.toggle_help();
                            }
                        }
                        _ => {}
                    }
                }
                Event::Mouse(mouse) => {
                    if matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
                        app.pointer_moved(mouse.column, mouse.row);
                    }
                }
                Event::Resize(width, height) => {
                    app.resize(Rect::new(0, 0, width, height));
                }
                _ => {}
            }
        }
    }
}
