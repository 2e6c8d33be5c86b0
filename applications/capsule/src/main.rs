/// Peace Capsule - ambient sounds and a relaxation timer
use anyhow::Context;
use capsule_app::{CapsuleConfig, Command, Session, TrackRef};
use capsule_audio_desktop::DesktopBackend;
use capsule_playback::{AudioBackend, SilentBackend};
use clap::Parser;
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "capsule")]
#[command(about = "Ambient sounds, affirmations and a relaxation timer", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./capsule.toml if present)
    #[arg(short, long, env = "CAPSULE_CONFIG")]
    config: Option<PathBuf>,

    /// Run without opening an audio device
    #[arg(long)]
    silent: bool,

    /// Log filter, e.g. `debug` or `capsule_playback=trace` (overrides RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,

    /// Start a countdown of this many minutes right away
    #[arg(short, long, value_name = "MINUTES")]
    timer: Option<u32>,

    /// Sound to start playing, by name or number (repeatable)
    #[arg(short, long = "play", value_name = "SOUND")]
    play: Vec<String>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Session output owns stdout
    let filter = match &cli.log_level {
        Some(level) => tracing_subscriber::EnvFilter::try_new(level)?,
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into()),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config =
        CapsuleConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    if cli.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let mut backend = open_backend(&config, cli.silent);
    let mut session =
        Session::new(&config, backend.as_mut()).context("Failed to start session")?;

    for sound in &cli.play {
        session.queue(Command::Toggle(sound.parse::<TrackRef>()?));
    }
    if let Some(minutes) = cli.timer {
        session.queue(Command::Timer(minutes));
    }

    let stdin = BufReader::new(tokio::io::stdin());
    session.run(stdin, tokio::io::stdout()).await?;

    // Players hold voices of the backend's mixer; drop them first
    drop(session);
    drop(backend);

    Ok(())
}

/// Audio device backend, or a silent one when disabled or unavailable
fn open_backend(config: &CapsuleConfig, silent: bool) -> Box<dyn AudioBackend> {
    if silent || !config.audio.enabled {
        tracing::info!("Audio output disabled");
        return Box::new(SilentBackend::new());
    }

    match DesktopBackend::new() {
        Ok(backend) => {
            tracing::info!("Audio output at {} Hz", backend.sample_rate());
            Box::new(backend)
        }
        Err(e) => {
            tracing::warn!("No audio output ({}), continuing silently", e);
            Box::new(SilentBackend::new())
        }
    }
}
