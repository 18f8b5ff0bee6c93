use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use weatherdash_core::Config;
use weatherdash_ui::{ChartRenderer, Dashboard, DashboardSettings, DashboardView, TextChart};
use weatherdash_weather::HttpWeatherClient;

/// Poll a weather service and show current conditions in the terminal.
#[derive(Parser, Debug)]
#[command(name = "weatherdash", version, about)]
struct Args {
    /// Config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base URL of the weather service
    #[arg(long)]
    base_url: Option<String>,

    /// Auto-refresh interval in seconds
    #[arg(long)]
    interval: Option<u64>,

    /// Start with auto-refresh paused
    #[arg(long)]
    paused: bool,
}

const KEYS: &str = "keys: [p] pause/play  [s] save  [r] recent readings  [q] quit";

fn redraw(heading: &str, state: &weatherdash_ui::DashboardState, chart: &dyn ChartRenderer) {
    let view = DashboardView::build(heading, state);
    // Clear screen and home the cursor.
    print!("\x1b[2J\x1b[H");
    println!("{}", view.render(chart));
    println!("{}", KEYS);
}

#[tokio::main]
async fn main() -> Result<()> {
    weatherdash_core::init()?;
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(base_url) = args.base_url {
        config.service.base_url = base_url;
    }
    if let Some(interval) = args.interval {
        config.dashboard.refresh_seconds = interval;
    }
    if args.paused {
        config.dashboard.start_running = false;
    }
    config.check()?;

    let client = HttpWeatherClient::new(
        &config.service.base_url,
        config.service.request_timeout_secs.map(Duration::from_secs),
    )?;
    tracing::info!("Polling weather service at {}", client.base_url());

    let handle = Dashboard::mount(
        Arc::new(client),
        DashboardSettings::from(&config.dashboard),
    );
    let chart = TextChart::default();
    let heading = config.dashboard.heading.clone();
    let mut updates = handle.subscribe();
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    redraw(&heading, &handle.snapshot(), &chart);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                redraw(&heading, &state, &chart);
            }
            line = input.next_line() => {
                let Some(line) = line? else { break };
                match line.trim() {
                    "p" => { handle.toggle_running(); }
                    "s" => { handle.save_current(); }
                    "r" => { handle.fetch_recent(); }
                    "q" => break,
                    "" => redraw(&heading, &handle.snapshot(), &chart),
                    other => println!("Unknown command '{}'. {}", other, KEYS),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    handle.unmount().await;
    Ok(())
}
