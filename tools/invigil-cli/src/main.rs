//! Invigil CLI — demo driver for the proctoring monitor.
//!
//! Usage:
//!   invigil run [OPTIONS]      Run a synthetic proctoring session
//!   invigil check [OPTIONS]    Validate a monitor configuration

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "invigil",
    about = "Client-side webcam proctoring monitor",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a synthetic proctoring session against the scripted stub services
    Run {
        /// Sampling rate in Hz (1-5)
        #[arg(long, default_value = "3")]
        fps: u32,

        /// Gaze sensitivity in percent (5-60)
        #[arg(long, default_value = "25")]
        gaze_sensitivity: u32,

        /// Snapshot encoding (image/jpeg or image/png)
        #[arg(long, default_value = "image/jpeg")]
        encoding: String,

        /// Annotation color (#rrggbb or a common color name)
        #[arg(long, default_value = "#2bedff")]
        color: String,

        /// Queue events and flush them on a timer instead of delivering
        /// immediately
        #[arg(long)]
        queue: bool,

        /// Queue flush period in seconds
        #[arg(long)]
        flush_period: Option<u64>,

        /// Session length in seconds
        #[arg(long, default_value = "10")]
        duration: u64,
    },

    /// Validate a monitor configuration and print the resolved form
    Check {
        /// Sampling rate in Hz (1-5)
        #[arg(long, default_value = "3")]
        fps: u32,

        /// Gaze sensitivity in percent (5-60)
        #[arg(long, default_value = "25")]
        gaze_sensitivity: u32,

        /// Snapshot encoding (image/jpeg or image/png)
        #[arg(long, default_value = "image/jpeg")]
        encoding: String,

        /// Annotation color (#rrggbb or a common color name)
        #[arg(long, default_value = "#2bedff")]
        color: String,

        /// Queue events and flush them on a timer instead of delivering
        /// immediately
        #[arg(long)]
        queue: bool,

        /// Queue flush period in seconds
        #[arg(long)]
        flush_period: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    invigil_common::logging::init_logging(&invigil_common::logging::LoggingOptions {
        level: log_level.to_string(),
        json: false,
    });

    match cli.command {
        Commands::Run {
            fps,
            gaze_sensitivity,
            encoding,
            color,
            queue,
            flush_period,
            duration,
        } => {
            commands::run::run(
                fps,
                gaze_sensitivity,
                &encoding,
                &color,
                queue,
                flush_period,
                duration,
            )
            .await
        }
        Commands::Check {
            fps,
            gaze_sensitivity,
            encoding,
            color,
            queue,
            flush_period,
        } => commands::check::run(fps, gaze_sensitivity, &encoding, &color, queue, flush_period),
    }
}
