/// Cadence Player - headless playback host
use anyhow::Context;
use cadence_core::{StaticCatalog, StaticEntitlements, TrackCatalog};
use cadence_player::{dispatch, Command, Outcome, PlayerConfig, SimulatedEngine};
use cadence_playback::{Notice, PlaybackCoordinator, PlaybackEvent, PlaybackHandle};
use clap::Parser;
use std::{path::PathBuf, sync::Arc, time::Duration};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence-player")]
#[command(about = "Cadence headless player driven by line commands", long_about = None)]
struct Cli {
    /// Catalog file (JSON or TOML)
    #[arg(long, env = "CADENCE_CATALOG")]
    catalog: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run the session with the premium entitlement
    #[arg(long)]
    premium: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence_player=info,cadence_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = PlayerConfig::load(cli.config.as_deref()).context("loading configuration")?;

    let catalog_path = cli
        .catalog
        .or_else(|| config.catalog_path.clone())
        .context("no catalog given (use --catalog or catalog_path in the config file)")?;
    let catalog = StaticCatalog::load(&catalog_path)
        .with_context(|| format!("loading catalog {}", catalog_path.display()))?;
    let catalog: Arc<dyn TrackCatalog> = Arc::new(catalog);

    tracing::info!(
        tracks = catalog.len(),
        premium = cli.premium,
        "Starting Cadence player"
    );

    let (engine, clock, mut engine_events) = SimulatedEngine::new(
        catalog.as_ref(),
        Duration::from_secs(config.engine.default_track_secs),
    );

    let coordinator = PlaybackCoordinator::new(
        config.playback.clone(),
        Arc::clone(&catalog),
        Arc::new(StaticEntitlements {
            premium: cli.premium,
        }),
        Box::new(engine),
    )?;
    let handle = PlaybackHandle::new(coordinator);

    let tick = Duration::from_millis(config.engine.tick_ms);
    let mut ticker = tokio::time::interval(tick);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", cadence_player::command::HELP);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }

                match line.parse::<Command>() {
                    Ok(command) => match dispatch(&handle, command).await {
                        Ok(Outcome::Continue) => {}
                        Ok(Outcome::Print(text)) => println!("{text}"),
                        Ok(Outcome::Quit) => break,
                        Err(e) => println!("error: {e}"),
                    },
                    Err(e) => println!("{e}"),
                }
            }
            _ = ticker.tick() => clock.tick(tick),
            Some(event) = engine_events.recv() => handle.engine_event(event),
        }

        for event in handle.drain_events() {
            report(&event, catalog.as_ref(), &handle);
        }
    }

    tracing::info!("Shutting down");
    Ok(())
}

/// Print the events a listener would care about
fn report(event: &PlaybackEvent, catalog: &dyn TrackCatalog, handle: &PlaybackHandle) {
    match event {
        PlaybackEvent::TrackChanged { track_id, .. } => {
            if let Some(track) = catalog.find_by_id(track_id) {
                let duration = handle
                    .display_duration(track_id)
                    .unwrap_or_else(|| "?:??".to_string());
                println!("now: {} by {} ({duration})", track.title, track.artist);
            }
        }
        PlaybackEvent::TrackFinished { track_id } => println!("finished #{track_id}"),
        PlaybackEvent::Notice(Notice::PremiumRequired { track_id }) => {
            println!("premium required to play #{track_id}");
        }
        PlaybackEvent::Notice(Notice::TrackUnavailable { track_id, reason }) => {
            println!("track #{track_id} unavailable: {reason}");
        }
        other => tracing::debug!(event = ?other, "Playback event"),
    }
}
