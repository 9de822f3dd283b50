use std::cell::Cell;
use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{LevelFilter, info};
use ratatui::layout::Rect;
use simplelog::{Config, WriteLogger};
use unlock_snake::config::{
    DEFAULT_GRID_SIDE, DEFAULT_UNLOCK_SCORE, EngineConfig, GridSize, THEME_TERMINAL,
};
use unlock_snake::driver::GameDriver;
use unlock_snake::game::GameEngine;
use unlock_snake::input::{GameInput, InputHandler};
use unlock_snake::renderer::{self, RenderView};
use unlock_snake::scheduler::ClockScheduler;
use unlock_snake::terminal_runtime::{TerminalSession, install_panic_hook};
use unlock_snake::ui::layout::ScreenLayout;
use unlock_snake::unlock::{
    FileUnlockStorage, MemoryUnlockStorage, UnlockNotifier, UnlockStorage,
};

/// Longest wait for input while no tick is due.
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(100);

const LOG_FILE_NAME: &str = "unlock-snake.log";

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Side length of the square play field, in cells.
    #[arg(long, default_value_t = DEFAULT_GRID_SIDE)]
    grid: u16,

    /// Score that wins the game and unlocks the contact section.
    #[arg(long = "unlock-score", default_value_t = DEFAULT_UNLOCK_SCORE)]
    unlock_score: u32,

    /// Seed food placement for a reproducible session.
    #[arg(long)]
    seed: Option<u64>,

    /// Forget a previously earned unlock before starting.
    #[arg(long = "reset-unlock", conflicts_with = "no_persist")]
    reset_unlock: bool,

    /// Keep the unlock flag in memory only.
    #[arg(long = "no-persist")]
    no_persist: bool,

    /// Write logs here instead of the default data directory.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Include debug-level engine logs (food, rejected turns, resets).
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            grid: GridSize::square(self.grid),
            unlock_score: self.unlock_score,
            ..EngineConfig::default()
        }
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let config = cli.engine_config();
    config
        .validate()
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;

    init_logging(&cli);
    install_panic_hook();

    if cli.no_persist {
        return run(&cli, config, UnlockNotifier::new(MemoryUnlockStorage::default()));
    }

    let storage = FileUnlockStorage::at_default_location();
    info!("unlock flag stored at {}", storage.path().display());
    let mut notifier = UnlockNotifier::new(storage);
    if cli.reset_unlock {
        notifier.clear().map_err(io::Error::other)?;
        info!("unlock flag cleared");
    }

    run(&cli, config, notifier)
}

fn run<U: UnlockStorage>(
    cli: &Cli,
    config: EngineConfig,
    mut notifier: UnlockNotifier<U>,
) -> io::Result<()> {
    // The HUD badge and the contact panel each track the flag on their own.
    let badge_unlocked = Rc::new(Cell::new(false));
    let contact_unlocked = Rc::new(Cell::new(false));
    for region in [&badge_unlocked, &contact_unlocked] {
        let region = Rc::clone(region);
        notifier.subscribe(move |_| region.set(true));
    }
    notifier.restore();

    let engine = match cli.seed {
        Some(seed) => GameEngine::new_with_seed(config, seed),
        None => GameEngine::new(config),
    };
    let mut driver = GameDriver::new(engine, ClockScheduler::new(), notifier);
    info!(
        "starting on a {0}x{0} grid, unlock at {1}",
        config.grid.side, config.unlock_score
    );

    let mut session = TerminalSession::enter()?;
    let mut input = InputHandler::new();
    let mut layout = ScreenLayout::compute(Rect::default(), config.grid);

    loop {
        let view = RenderView {
            snapshot: driver.frame(),
            grid: config.grid,
            overlay: driver.overlay().current(),
            score: driver.score(),
            unlock_score: driver.engine().unlock_score(),
            tick_interval: driver.engine().tick_interval(),
            badge_unlocked: badge_unlocked.get(),
            contact_unlocked: contact_unlocked.get(),
            theme: &THEME_TERMINAL,
        };
        session.terminal_mut().draw(|frame| {
            layout = ScreenLayout::compute(frame.area(), config.grid);
            renderer::render(frame, &layout, &view);
        })?;

        let timeout = driver
            .scheduler()
            .time_until_due(Instant::now())
            .unwrap_or(IDLE_POLL_INTERVAL)
            .min(IDLE_POLL_INTERVAL);

        match input.poll_input(timeout, &layout)? {
            Some(GameInput::Quit) => break,
            Some(game_input) => driver.handle_input(game_input),
            None => {}
        }

        if let Some(handle) = driver.scheduler_mut().fire_due(Instant::now()) {
            driver.on_timer(handle);
        }
    }

    info!("quit with score {}", driver.score());
    Ok(())
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let path = cli.log_file.clone().unwrap_or_else(default_log_path);
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }

    let result = File::create(&path)
        .map_err(|error| error.to_string())
        .and_then(|file| {
            WriteLogger::init(level, Config::default(), file).map_err(|error| error.to_string())
        });
    if let Err(error) = result {
        eprintln!("Logging disabled ({}): {error}", path.display());
    }
}

fn default_log_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push("unlock-snake");
    base.push(LOG_FILE_NAME);
    base
}
