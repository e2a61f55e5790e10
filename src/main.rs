//! radial-typer - type with two analog sticks
//!
//! Reads a gamepad, shows nothing, prints every confirmed symbol to stdout.
//! Logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use radial_typer::config::{AppConfig, ConfigWatcher};
use radial_typer::frame::FrameLoop;
use radial_typer::input::gamepad::GamepadPoller;
use radial_typer::sink::ConsoleSink;
use radial_typer::Hub;

/// Radial typer - pick characters by pointing analog sticks at them
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Print every hub layer with its anchors and exit
    #[arg(long)]
    print_layout: bool,

    /// Disable config hot reload
    #[arg(long)]
    no_watch: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_logging(&args.log_level, args.json_logs)?;

    info!("Starting radial-typer v{}...", env!("CARGO_PKG_VERSION"));
    info!("Configuration file: {}", args.config);

    if args.print_layout {
        let config = AppConfig::load(&args.config).await?;
        print_layout(&config)?;
        return Ok(());
    }

    let (watcher, config) = if args.no_watch {
        (None, AppConfig::load(&args.config).await?)
    } else {
        let (watcher, config) = ConfigWatcher::new(args.config.clone()).await?;
        (Some(watcher), config)
    };
    info!("Configuration loaded");

    let frames = FrameLoop::new(&config)?;
    let mut poller = GamepadPoller::start(config.analog.clone());
    let mut sink = ConsoleSink::stdout();

    frames
        .run(&config, &poller, &mut sink, watcher, shutdown_signal())
        .await?;

    poller.shutdown();
    info!("radial-typer stopped after {} symbol(s)", sink.emitted());
    Ok(())
}

fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // stdout carries the typed symbols
    let registry = tracing_subscriber::registry().with(filter);
    let installed = if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    installed.context("Failed to install tracing subscriber")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C ({}), stopping", e);
        return;
    }
    info!("Shutdown signal received");
}

fn print_layout(config: &AppConfig) -> Result<()> {
    let registry = config.build_registry().context("Failed to build radial layout")?;

    println!("\n{}", "=== Radial Layout ===".bold().cyan());
    println!(
        "  Screen: {}x{} @ {} fps, radius {}",
        config.display.screen_width,
        config.display.screen_height,
        config.display.fps,
        config.layout.radius
    );

    for hub in Hub::ALL {
        for index in registry.layer_indices(hub) {
            let layer = registry.get(hub, index)?;
            let modifier = config
                .modifiers
                .layers
                .iter()
                .find(|m| m.layer == index)
                .map(|m| format!(" (hold {})", m.button))
                .unwrap_or_default();

            println!(
                "\n{} {}{}",
                format!("{} hub", hub).bold(),
                format!("layer {}", index).yellow(),
                modifier.dimmed()
            );

            if layer.is_empty() {
                println!("  {}", "(no options)".red());
            }
            for (label, anchor) in layer.labels().iter().zip(layer.option_anchors()) {
                println!("  {:>8}  {}", label.green(), anchor);
            }
            println!("  {:>8}  {}", "idle".dimmed(), layer.idle_anchor());
        }
    }

    if !config.keys.is_empty() {
        println!("\n{}", "Keys".bold());
        for (button, label) in &config.keys {
            println!("  {:>10} → {}", button.yellow(), label.green());
        }
    }

    println!();
    Ok(())
}
