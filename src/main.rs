use altinput::controller::{GilrsBackend, InputBackend, StaticBackend};
use altinput::{ConfigHandle, LoadOutcome, Settings, Snapshot};
use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Loads input device mappings and reloads them on request
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Mapping file, overriding the one named in the settings
    #[arg(value_name = "FILE")]
    config_path: Option<PathBuf>,

    /// Settings file to read instead of the default location
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// TOML device list to use instead of attached hardware
    #[arg(long, value_name = "PATH")]
    devices: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;
    let cli = Cli::parse();

    let mut settings = match &cli.settings {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    if let Some(path) = cli.config_path {
        settings.config_path = path;
    }
    info!("Using mapping file {}", settings.config_path.display());

    let backend: Box<dyn InputBackend> = match &cli.devices {
        Some(path) => {
            info!("Using device list from {}", path.display());
            Box::new(StaticBackend::load(path)?)
        }
        None => Box::new(GilrsBackend::new()?),
    };

    let mut handle = ConfigHandle::new(settings, backend);

    let mut updates = handle.subscribe();
    let _reporter = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            report(&snapshot);
        }
    });

    if let Err(e) = handle.reload() {
        error!("Initial load failed: {}", e);
    }

    let (line_tx, mut line_rx) = mpsc::channel::<String>(16);
    let _stdin = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if line_tx.send(line).await.is_err() {
                break;
            }
        }
    });

    info!("Enter 'r' to reload, 'q' to quit");
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                break;
            }
            line = line_rx.recv() => match line.as_deref().map(str::trim) {
                None | Some("q") | Some("quit") => break,
                Some("r") | Some("reload") => {
                    if let Err(e) = handle.reload() {
                        error!("Reload failed: {}", e);
                    }
                }
                Some("") => {}
                Some(other) => warn!("Unknown command '{}'", other),
            }
        }
    }

    Ok(())
}

fn report(snapshot: &Snapshot) {
    match &snapshot.outcome {
        LoadOutcome::Loaded => {}
        LoadOutcome::Pending => return,
        LoadOutcome::MissingSource => warn!("No mapping file, nothing mapped"),
        LoadOutcome::VersionMismatch { found, expected } => {
            warn!("Mapping file version '{}' is not {}", found, expected)
        }
        LoadOutcome::Failed(reason) => error!("Load failed: {}", reason),
    }

    for line in &snapshot.detected {
        info!("{}", line);
    }
    for device in &snapshot.devices {
        let modes = device.enabled_modes.iter().filter(|m| **m).count();
        info!(
            "'{}' [{}]: {} axes, {} POV(s), {} buttons, {} mode(s)",
            device.name,
            device.section,
            device.available_axes().count(),
            device.povs.len(),
            device.buttons.len(),
            modes
        );
    }
    info!(
        "{} device(s) mapped at {}",
        snapshot.devices.len(),
        snapshot.loaded_at.format("%H:%M:%S")
    );
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    let level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|l| l.parse::<Level>().ok())
        .unwrap_or(Level::INFO);

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
