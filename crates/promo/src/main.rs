//! Promo player - drives the promo video adapter from the terminal.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use promo::{Command, PromoConfig, Session};

/// Promo player - terminal host for the promo video
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Video id to load
    #[arg(default_value = promo::config::DEFAULT_VIDEO_ID)]
    video_id: String,

    /// Position poll interval in milliseconds
    #[arg(long, default_value = "1000")]
    poll_ms: u64,

    /// Initial volume (0-100)
    #[arg(long, default_value = "100")]
    volume: u8,

    /// Volume change per arrow key
    #[arg(long, default_value = "10")]
    volume_step: u8,

    /// Simulated video length in seconds
    #[arg(long, default_value = "212")]
    length: f64,

    /// Simulated widget load delay in milliseconds
    #[arg(long, default_value = "300")]
    load_delay_ms: u64,

    /// Print the embed URL and exit
    #[arg(long)]
    print_embed_url: bool,

    /// Print status as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = PromoConfig::new()
        .with_video_id(&args.video_id)
        .with_poll_interval(Duration::from_millis(args.poll_ms.max(1)))
        .with_initial_volume(args.volume)
        .with_volume_step(args.volume_step)
        .with_video_length(args.length)
        .with_load_delay(Duration::from_millis(args.load_delay_ms));

    if args.print_embed_url {
        let url = promo_media::embed_url(&config.video_id, &config.player_vars)?;
        println!("{}", url);
        return Ok(());
    }

    info!("Promo player v{}", promo::VERSION);

    let session = Session::new(config)?;
    session.load_api();

    let mut updates = session.adapter().subscribe();
    tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = *updates.borrow_and_update();
            tracing::debug!(?state, "State changed");
        }
    });

    info!("Commands: play, pause, space, up, down, m, seek <s>, vol <n>, load <id>, status, quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                warn!("{}", e);
                continue;
            }
        };

        let json_status = args.json && command == Command::Status;
        if json_status {
            println!("{}", session.status_json()?);
            continue;
        }

        match session.execute(command) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => warn!("{}", e),
        }
    }

    session.shutdown();
    info!("Promo player shutdown complete");

    Ok(())
}
