//! Drive parasol overlays through scripted scenarios and log every frame.

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser};
use parasol::settings::Settings;
use tracing::Level;

mod log;
mod scenario;

use scenario::{Gym, Scenario};

/// Overlay scenario runner.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Settings file (JSON). Missing fields take their defaults.
    #[clap(short, long)]
    settings: Option<PathBuf>,

    /// More output. Repeat for trace level.
    #[clap(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Scenarios to run, in order. Runs all of them if none are given.
    #[clap(value_enum)]
    scenarios: Vec<Scenario>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let level = match args.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    let settings = match &args.settings {
        Some(p) => Settings::load(p)?,
        None => Settings::default(),
    };
    let scenarios = if args.scenarios.is_empty() {
        vec![
            Scenario::Click,
            Scenario::Hover,
            Scenario::Popconfirm,
            Scenario::Modal,
        ]
    } else {
        args.scenarios
    };

    let mut gym = Gym::new(settings);
    for s in scenarios {
        gym.run(s).await?;
    }
    Ok(())
}
