//! BeatBox - local music player for the terminal
use anyhow::Context;
use beatbox_audio_desktop::DesktopRendererFactory;
use beatbox_cli::{parse_line, BeatboxConfig, Input, TerminalSurface};
use beatbox_core::{SessionStore, TrackCatalog, TrackDescriptor};
use beatbox_library::DirectoryCatalog;
use beatbox_playback::{PlaybackError, Queue, SessionEvent, SessionHandle, SessionService};
use beatbox_storage::{JsonSessionStore, MemorySessionStore};
use clap::{Parser, Subcommand};
use crossbeam_channel::{unbounded, Receiver};
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "beatbox")]
#[command(about = "Play local music from the terminal", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./beatbox.toml when present)
    #[arg(short, long, global = true, env = "BEATBOX_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tracks found in the library directories
    Scan {
        /// Directories to scan instead of the configured ones
        dirs: Vec<PathBuf>,
    },
    /// Show the last played track
    Last,
    /// Play the library and read commands from stdin
    Play {
        /// Directories to scan instead of the configured ones
        dirs: Vec<PathBuf>,
        /// Queue position to start at
        #[arg(short, long, default_value_t = 0)]
        index: usize,
        /// Keep the last played record in memory only
        #[arg(long)]
        no_persist: bool,
    },
}

fn main() -> anyhow::Result<()> {
    // Logs on stderr; stdout belongs to the control surface
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "beatbox=info,beatbox_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = BeatboxConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Scan { dirs } => scan(config.with_directories(dirs)),
        Commands::Last => last(&config),
        Commands::Play {
            dirs,
            index,
            no_persist,
        } => play(config.with_directories(dirs), index, no_persist),
    }
}

fn catalog(config: &BeatboxConfig) -> DirectoryCatalog {
    DirectoryCatalog::new(config.library.directories.clone())
        .min_duration_ms(config.library.min_duration_ms)
        .follow_links(config.library.follow_links)
}

fn scan(config: BeatboxConfig) -> anyhow::Result<()> {
    config.validate()?;
    let tracks = catalog(&config).scan()?;

    if tracks.is_empty() {
        println!("No tracks found");
    }
    for (index, track) in tracks.iter().enumerate() {
        println!("{}", track_line(index, track));
    }
    Ok(())
}

fn last(config: &BeatboxConfig) -> anyhow::Result<()> {
    let store = JsonSessionStore::new(&config.storage.state_file);
    print_last_played(&store)
}

fn play(config: BeatboxConfig, index: usize, no_persist: bool) -> anyhow::Result<()> {
    config.validate()?;

    let tracks = catalog(&config).scan()?;
    tracing::info!("Found {} tracks", tracks.len());
    for (i, track) in tracks.iter().enumerate() {
        println!("{}", track_line(i, track));
    }

    let store: Box<dyn SessionStore> = if no_persist {
        Box::new(MemorySessionStore::new())
    } else {
        Box::new(JsonSessionStore::new(&config.storage.state_file))
    };
    print_last_played(store.as_ref())?;

    let (events_tx, events_rx) = unbounded();
    let handle = SessionService::new(
        Box::new(DesktopRendererFactory::new()),
        Box::new(TerminalSurface::stdout()),
        store,
    )
    .with_config(config.session.clone())
    .with_observer(events_tx)
    .spawn()
    .context("Failed to start playback session")?;

    let notices = thread::Builder::new()
        .name("beatbox-notices".to_string())
        .spawn(move || print_notices(&events_rx))?;

    report(handle.play(Some(Queue::new(tracks)), Some(index)));

    for line in io::stdin().lock().lines() {
        let line = line?;
        match parse_line(&line) {
            Ok(Input::Session(command)) => report(handle.execute(command)),
            Ok(Input::Status) => print_status(&handle)?,
            Ok(Input::Rescan) => {
                if let Err(e) = rescan(&config, &handle) {
                    println!("! {e}");
                }
            }
            Ok(Input::Quit) => break,
            Ok(Input::Nothing) => {}
            Err(message) => println!("! {message}"),
        }
    }

    handle.shutdown()?;
    drop(handle);
    if notices.join().is_err() {
        tracing::error!("Notice printer panicked");
    }
    Ok(())
}

/// Replace the queue with a fresh scan; the bound track keeps playing if it
/// is still in the library
fn rescan(config: &BeatboxConfig, handle: &SessionHandle) -> anyhow::Result<()> {
    let tracks = catalog(config).scan()?;
    tracing::info!("Rescan found {} tracks", tracks.len());
    for (i, track) in tracks.iter().enumerate() {
        println!("{}", track_line(i, track));
    }
    report(handle.play(Some(Queue::new(tracks)), None));
    Ok(())
}

/// Session errors are echoed as notices by the session itself
fn report(result: beatbox_playback::Result<()>) {
    if let Err(PlaybackError::SessionClosed) = result {
        println!("! {}", PlaybackError::SessionClosed);
    }
}

fn print_notices(events: &Receiver<SessionEvent>) {
    for event in events {
        match event {
            SessionEvent::Notice(message) => println!("! {message}"),
            other => tracing::debug!("Session event: {:?}", other),
        }
    }
}

fn print_status(handle: &SessionHandle) -> anyhow::Result<()> {
    let snapshot = handle.snapshot()?;
    match (&snapshot.current_track, snapshot.current_index) {
        (Some(track), Some(index)) => {
            let state = if snapshot.preparing {
                "preparing"
            } else if snapshot.playing {
                "playing"
            } else {
                "paused"
            };
            println!(
                "{} {}/{}: {} - {}",
                state,
                index,
                snapshot.queue_len,
                track.display_name,
                track.artist()
            );
        }
        _ => println!("stopped ({} tracks queued)", snapshot.queue_len),
    }
    Ok(())
}

fn print_last_played(store: &dyn SessionStore) -> anyhow::Result<()> {
    let last = store.get()?;
    match (last.name, last.artist) {
        (Some(name), Some(artist)) => println!("Last played: {name} - {artist}"),
        (Some(name), None) => println!("Last played: {name}"),
        _ => println!("Nothing played yet"),
    }
    Ok(())
}

fn track_line(index: usize, track: &TrackDescriptor) -> String {
    match track.duration() {
        Some(duration) => format!(
            "{}. {} - {} ({})",
            index,
            track.display_name,
            track.artist(),
            format_duration(duration)
        ),
        None => format!("{}. {} - {}", index, track.display_name, track.artist()),
    }
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
