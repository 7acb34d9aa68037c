//! `sauna` — terminal friends list for the Sauna presence client.
//!
//! # Usage
//!
//! ```
//! sauna --snapshot roster.json --events presence.jsonl
//! sauna --config ~/.config/sauna/config.toml
//! sauna render --snapshot roster.json --hide-offline --json
//! ```

mod app;
mod feed;
mod prefs_store;
mod report;
mod ui;

use std::{
  ffi::OsString,
  fs, io,
  path::{Path, PathBuf},
  sync::Mutex,
  time::Duration,
};

use anyhow::{Context, Result};
use app::App;
use clap::{Args as ClapArgs, Parser, Subcommand};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use prefs_store::PrefsStore;
use ratatui::{Terminal, backend::CrosstermBackend};
use sauna_core::{PresenceEvent, RosterState, ViewPreferences};
use serde::Deserialize;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "sauna", about = "Terminal friends list for the Sauna presence client")]
struct Args {
  /// Path to a TOML config file (snapshot, events, prefs_dir).
  #[arg(short, long, value_name = "FILE", global = true)]
  config: Option<PathBuf>,

  /// Roster snapshot to start from (JSON: friends, friend_groups, personas).
  #[arg(long, env = "SAUNA_SNAPSHOT", global = true)]
  snapshot: Option<PathBuf>,

  /// JSON-lines presence event feed applied after the snapshot.
  #[arg(long, env = "SAUNA_EVENTS", global = true)]
  events: Option<PathBuf>,

  /// Directory holding prefs.json (default: ~/.config/sauna).
  #[arg(long, env = "SAUNA_PREFS_DIR", global = true)]
  prefs_dir: Option<PathBuf>,

  /// Write logs to sauna.log in the preferences directory.
  #[arg(long, global = true)]
  log: bool,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Interactive friends list (the default).
  Tui,
  /// Print the display list once and exit.
  Render(RenderArgs),
}

#[derive(ClapArgs, Debug)]
struct RenderArgs {
  /// Hide offline friends.
  #[arg(long)]
  hide_offline: bool,

  /// Hide busy, away and snoozing friends (in-game friends are always shown).
  #[arg(long)]
  hide_inactive: bool,

  /// Sort by name only instead of status, then name.
  #[arg(long)]
  sort_by_name: bool,

  /// Only show friends whose name contains this text (case-insensitive).
  #[arg(long, default_value = "")]
  search: String,

  /// Emit JSON instead of text.
  #[arg(long)]
  json: bool,
}

impl RenderArgs {
  fn prefs(&self) -> ViewPreferences {
    ViewPreferences {
      show_offline:   !self.hide_offline,
      show_inactive:  !self.hide_inactive,
      sort_by_status: !self.sort_by_name,
      search_text:    self.search.clone(),
    }
  }
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  snapshot:  Option<PathBuf>,
  #[serde(default)]
  events:    Option<PathBuf>,
  #[serde(default)]
  prefs_dir: Option<PathBuf>,
}

/// Resolved settings after merging flags, config file and defaults.
#[derive(Debug, PartialEq)]
struct Settings {
  snapshot:  Option<PathBuf>,
  events:    Option<PathBuf>,
  prefs_dir: PathBuf,
}

impl Settings {
  /// CLI flags override the config file, which overrides defaults.
  fn resolve(args: &Args, file_cfg: ConfigFile) -> Self {
    Self {
      snapshot:  args.snapshot.clone().or(file_cfg.snapshot),
      events:    args.events.clone().or(file_cfg.events),
      prefs_dir: args
        .prefs_dir
        .clone()
        .or(file_cfg.prefs_dir)
        .unwrap_or_else(default_prefs_dir),
    }
  }
}

fn default_prefs_dir() -> PathBuf {
  prefs_dir_under(std::env::var_os("XDG_CONFIG_HOME"), std::env::var_os("HOME"))
}

fn prefs_dir_under(xdg_config_home: Option<OsString>, home: Option<OsString>) -> PathBuf {
  xdg_config_home
    .map(PathBuf::from)
    .or_else(|| home.map(|h| PathBuf::from(h).join(".config")))
    .map(|base| base.join("sauna"))
    .unwrap_or_else(|| PathBuf::from(".sauna"))
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  let settings = Settings::resolve(&args, file_cfg);

  match args.command {
    Some(Command::Render(render_args)) => {
      init_tracing_stderr();
      run_render(&settings, &render_args)
    }
    Some(Command::Tui) | None => {
      if args.log {
        init_tracing_file(&settings.prefs_dir)?;
      }
      run_tui(settings).await
    }
  }
}

fn init_tracing_stderr() {
  tracing_subscriber::fmt()
    .with_env_filter(env_filter())
    .with_writer(io::stderr)
    .init();
}

/// The TUI owns the terminal, so logs go to a file instead.
fn init_tracing_file(dir: &Path) -> Result<()> {
  fs::create_dir_all(dir)
    .with_context(|| format!("creating {}", dir.display()))?;
  let path = dir.join("sauna.log");
  let file = fs::OpenOptions::new()
    .create(true)
    .append(true)
    .open(&path)
    .with_context(|| format!("opening log file {}", path.display()))?;

  tracing_subscriber::fmt()
    .with_env_filter(env_filter())
    .with_ansi(false)
    .with_writer(Mutex::new(file))
    .init();
  Ok(())
}

fn env_filter() -> EnvFilter {
  EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy()
}

fn load_snapshot(path: Option<&Path>) -> Result<RosterState> {
  let Some(path) = path else {
    return Ok(RosterState::new());
  };
  let raw = fs::read_to_string(path)
    .with_context(|| format!("reading roster snapshot {}", path.display()))?;
  let state = RosterState::from_snapshot_json(&raw)
    .with_context(|| format!("parsing roster snapshot {}", path.display()))?;

  tracing::info!(
    friends = state.friends.len(),
    groups = state.friend_groups.len(),
    personas = state.personas.len(),
    "loaded roster snapshot"
  );
  let missing = state.missing_personas();
  if !missing.is_empty() {
    tracing::info!(count = missing.len(), "friends without presence yet");
  }
  Ok(state)
}

// ─── render ───────────────────────────────────────────────────────────────────

fn run_render(settings: &Settings, args: &RenderArgs) -> Result<()> {
  let state = load_snapshot(settings.snapshot.as_deref())?;
  let groups = state.groups();
  let view = state.render(&groups, &args.prefs());

  if args.json {
    let json = serde_json::to_string_pretty(&view).context("serialising view")?;
    println!("{json}");
  } else {
    print!("{}", report::text(&view));
  }
  Ok(())
}

// ─── tui ──────────────────────────────────────────────────────────────────────

async fn run_tui(settings: Settings) -> Result<()> {
  let roster = load_snapshot(settings.snapshot.as_deref())?;
  let (store, prefs) = PrefsStore::open(&settings.prefs_dir)
    .with_context(|| format!("opening preferences in {}", settings.prefs_dir.display()))?;
  tracing::info!(path = %store.path().display(), ?prefs, "loaded view preferences");
  let mut app = App::new(roster, prefs, Some(store));

  let events = settings.events.map(feed::spawn);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Run the event loop; restore terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app, events).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
  mut events: Option<mpsc::Receiver<PresenceEvent>>,
) -> Result<()> {
  loop {
    // Presence deliveries are applied here, on the UI loop, one at a time.
    if let Some(rx) = events.as_mut() {
      if !drain_events(rx, app) {
        events = None;
      }
    }

    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(evt) = maybe_event {
      match evt {
        Event::Key(key) => {
          if !app.handle_key(key) {
            break;
          }
        }
        Event::Resize(_, _) => {
          // Terminal will redraw on next iteration.
        }
        _ => {}
      }
    }
  }

  Ok(())
}

/// Apply everything queued on the feed. Returns `false` once the feed has
/// closed.
fn drain_events(rx: &mut mpsc::Receiver<PresenceEvent>, app: &mut App) -> bool {
  loop {
    match rx.try_recv() {
      Ok(event) => app.apply_event(event),
      Err(TryRecvError::Empty) => return true,
      Err(TryRecvError::Disconnected) => return false,
    }
  }
}
