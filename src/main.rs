mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use spacial_game::assets::{AssetLibrary, MusicId};
use spacial_game::config::GameConfig;
use spacial_game::events::GameEvent;
use spacial_game::game_loop::{run_session, Frontend, SessionEnd};

use display::screens::{self, TitleChoice};
use display::TerminalFrontend;

/// Side-scrolling arcade shooter for the terminal.
#[derive(Parser, Debug)]
#[command(name = "spacial_game", version, about)]
struct Cli {
    /// JSON file overriding gameplay constants.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible session.
    #[arg(long)]
    seed: Option<u64>,

    /// Frames per second (overrides the config file).
    #[arg(long)]
    fps: Option<u32>,

    /// Log destination; the terminal itself belongs to the game.
    #[arg(long, default_value = "spacial_game.log")]
    log_file: PathBuf,

    /// Ring the terminal bell on explosions.
    #[arg(long)]
    bell: bool,
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("cannot load config {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(fps) = cli.fps {
        if cli.config.is_some() && config.fps != fps {
            tracing::warn!(file = config.fps, cli = fps, "fps overridden from the command line");
        }
        config.fps = fps;
    }
    config.validate()?;
    Ok(config)
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let config = load_config(&cli)?;
    let assets = Arc::new(AssetLibrary::builtin().context("cannot build sprite library")?);
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    tracing::info!(fps = config.fps, seed = ?cli.seed, "starting");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, &config, &assets, &mut rng, cli.bell);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        tracing::error!(error = %e, "fatal error");
    }
    result?;
    tracing::info!("bye");
    Ok(())
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    assets: &Arc<AssetLibrary>,
    rng: &mut StdRng,
    bell: bool,
) -> spacial_game::error::Result<()> {
    loop {
        let mut frontend = TerminalFrontend::new(out, rx, bell)?;
        frontend.dispatch(&GameEvent::MusicStarted(MusicId::Title))?;

        match screens::title(frontend.out(), rx)? {
            TitleChoice::Exit => break,
            TitleChoice::Credits => screens::credits(frontend.out(), rx)?,
            TitleChoice::Play => {
                frontend.dispatch(&GameEvent::MusicStopped)?;
                let end = run_session(&mut frontend, config, Arc::clone(assets), rng)?;
                if end == SessionEnd::Exit {
                    break;
                }
                // Otherwise loop back to the menu
            }
        }
    }
    Ok(())
}
