//! Lockview TUI - wrapped terminal content behind a biometric/PIN lock
//!
//! The terminal has no biometric sensor, so a simulated probe stands in for
//! one. Keys toggle its availability and outcome, and `b` moves the app to
//! the background and back to exercise re-locking.

use std::fs::{self, File};
use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use lockview_core::{LockConfig, LockPolicy};
use ratatui::prelude::*;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod app;
mod probe;
mod ui;

use app::config::{log_file_path, Overrides};
use app::App;
use probe::SimulatedProbe;

#[derive(Parser)]
#[command(name = "lockview-tui")]
#[command(about = "Terminal content behind a biometric/PIN lock overlay", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Unlock policy: biometric, pin, or biometric_then_pin
    #[arg(long)]
    policy: Option<LockPolicy>,

    /// Expected 4-digit PIN
    #[arg(long)]
    pin: Option<String>,

    /// Keep the view unlocked when backgrounded
    #[arg(long)]
    no_lock_on_background: bool,

    /// Wait for a tap instead of prompting for biometrics on start
    #[arg(long)]
    no_auto_prompt: bool,

    /// Start with the lock disabled
    #[arg(long)]
    disabled: bool,

    /// Start with the simulated sensor unavailable
    #[arg(long)]
    biometric_unavailable: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            policy: self.policy,
            pin: self.pin.clone(),
            no_lock_on_background: self.no_lock_on_background,
            no_auto_prompt: self.no_auto_prompt,
            start_disabled: self.disabled,
        }
    }

    fn load_config(&self) -> Result<LockConfig> {
        let path = match &self.config {
            Some(path) => Some(path.clone()),
            None => LockConfig::default_path(),
        };
        let config = match path {
            Some(path) => LockConfig::load_or_default(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => LockConfig::default(),
        };
        Ok(self.overrides().apply(config))
    }
}

/// Application entry point with panic handling for terminal restoration
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up panic hook to restore terminal on crash
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    init_logging()?;

    let result = run_app(&cli);

    if let Err(e) = &result {
        tracing::error!("Application error: {:#}", e);
    }

    result
}

/// Log to a file; stdout belongs to the terminal UI
fn init_logging() -> Result<()> {
    let path = log_file_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::options().create(true).append(true).open(&path)?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_ansi(false).with_writer(Arc::new(file)))
        .with(EnvFilter::from_default_env().add_directive("lockview_tui=info".parse()?))
        .init();

    Ok(())
}

/// Main application runner
fn run_app(cli: &Cli) -> Result<()> {
    let config = cli.load_config()?;
    let runtime = tokio::runtime::Runtime::new()?;
    let probe = Arc::new(SimulatedProbe::new(!cli.biometric_unavailable));

    tracing::info!(
        "Starting with policy {} (lock on background: {})",
        config.policy,
        config.lock_on_background
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and run event loop
    let result = App::new(config, probe, runtime.handle().clone())
        .and_then(|mut app| app.run(&mut terminal));

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
