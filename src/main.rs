//! Gazebridge - Headless Eye-Gaze OSC Bridge
//!
//! Main entry point for the CLI application.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gazebridge::{
    config::Config, output::OscSender, pipeline::FrameConditioner, tracking::GazeReceiver,
    AppState,
};

/// Gazebridge - smoothed avatar eye parameters from a noisy gaze tracker
#[derive(Parser, Debug)]
#[command(name = "gazebridge", version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// OSC target host (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// OSC target port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Disable the interactive console (stop/recalibrate keys)
    #[arg(long)]
    no_console: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .init();

    info!("Starting {} v{}", gazebridge::NAME, gazebridge::VERSION);

    // Load configuration
    let mut config = if let Some(ref path) = args.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };

    // Apply CLI overrides
    if let Some(ref host) = args.host {
        config.osc.host = host.clone();
    }
    if let Some(port) = args.port {
        config.osc.port = port;
    }

    // Validate configuration; the pipeline never runs on partial config
    config.validate()?;

    info!(
        "Gaze source: {}:{}",
        config.tracker.listen_address, config.tracker.port
    );
    info!("OSC target: {}:{}", config.osc.host, config.osc.port);
    info!("Smoothing: {:?}", config.pipeline.smoothing);

    // Create shared application state
    let state = AppState::new(config);

    // Start the conditioning pipeline
    let pipeline_state = Arc::clone(&state);
    tokio::spawn(async move {
        if let Err(e) = run_pipeline(pipeline_state).await {
            error!("Pipeline error: {}", e);
        }
    });

    // Start the console control loop
    if !args.no_console {
        let console_state = Arc::clone(&state);
        tokio::spawn(async move {
            run_console(console_state).await;
        });
    }

    // Wait for Ctrl+C / SIGTERM or a console-initiated stop
    let mut shutdown_rx = state.subscribe_shutdown();
    tokio::select! {
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
            state.shutdown();
        }
        _ = shutdown_rx.recv() => {}
    }

    // Give tasks a moment to clean up
    tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;

    info!("Gazebridge stopped");
    Ok(())
}

/// The single consumer task: owns all mutable pipeline state and runs
/// the conditioner exactly once per inbound frame.
async fn run_pipeline(state: Arc<AppState>) -> anyhow::Result<()> {
    let config = state.config.read().await.clone();

    let mut receiver = GazeReceiver::new(&config.tracker);
    receiver.start()?;

    let sender = OscSender::new(&config.osc)?;
    let mut conditioner = FrameConditioner::new(&config.pipeline, &config.osc.addresses);

    let mut shutdown_rx = state.subscribe_shutdown();

    info!("Pipeline started");

    loop {
        tokio::select! {
            result = receiver.process() => {
                match result {
                    Ok(Some(frame)) if frame.active => {
                        let batch = conditioner.condition(&frame);
                        if let Err(e) = sender.send_batch(&batch) {
                            // Best-effort sink: the next frame supersedes
                            // whatever was lost
                            warn!("OSC send failed: {}", e);
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!("Gaze receive error: {}", e);
                        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                    }
                }
            }
            _ = state.wait_recalibrate() => {
                info!("Recalibrating: resetting pipeline state");
                conditioner.reset();
            }
            _ = shutdown_rx.recv() => {
                info!("Pipeline shutting down");
                break;
            }
        }

        // Small yield to avoid busy-spinning when no data arrives
        tokio::time::sleep(tokio::time::Duration::from_millis(2)).await;
    }

    receiver.stop();
    Ok(())
}

/// Console control loop: `s` stops the bridge, `c` triggers a
/// recalibration of the pipeline state.
async fn run_console(state: Arc<AppState>) {
    use tokio::io::{AsyncBufReadExt, BufReader};

    println!("Press s<Enter> to stop or c<Enter> to recalibrate...");

    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();
    let mut shutdown_rx = state.subscribe_shutdown();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line {
                    Ok(Some(input)) => match input.trim().to_lowercase().as_str() {
                        "s" | "stop" => {
                            info!("Stop requested from console");
                            state.shutdown();
                            break;
                        }
                        "c" | "calibrate" => {
                            state.signal_recalibrate();
                        }
                        "" => {}
                        other => {
                            println!("Unknown command: {} (s = stop, c = recalibrate)", other);
                        }
                    },
                    // stdin closed (e.g. running detached)
                    Ok(None) => break,
                    Err(e) => {
                        error!("Console read error: {}", e);
                        break;
                    }
                }
            }
            _ = shutdown_rx.recv() => break,
        }
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
