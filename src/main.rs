//! Squat challenge replay tool: runs a recorded landmark stream through a challenge session.

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use squat_challenge::{
    app::{ReplayApp, ReplayConfig},
    config::{Config, EXAMPLE_CONFIG},
    device::DeviceKind,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON-lines recording of detector output
    #[arg(short, long)]
    recording: Option<PathBuf>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Device profile (mobile, desktop)
    #[arg(short, long, default_value = "desktop")]
    device: String,

    /// Browser user-agent to pick the device profile from (overrides --device)
    #[arg(long)]
    user_agent: Option<String>,

    /// Write the result as JSON to this file
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Milliseconds to keep the clock running after the last frame
    #[arg(long, default_value = "20000")]
    tail_ms: u64,

    /// Print an example configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug output
    #[arg(short = 'D', long)]
    debug: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    let Some(recording) = args.recording else {
        bail!("--recording is required unless --print-config is given");
    };

    // Load configuration if provided
    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Config::from_file(path).with_context(|| format!("failed to load {}", path.display()))?
        }
        None => Config::default(),
    };

    let device = match &args.user_agent {
        Some(ua) => DeviceKind::from_user_agent(ua),
        None => args.device.parse()?,
    };

    let mut app = ReplayApp::new(ReplayConfig {
        recording,
        config,
        device,
        export: args.export,
        tail_ms: args.tail_ms,
    })?;
    let result = app.run()?;

    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
