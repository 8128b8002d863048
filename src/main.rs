// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use movie_catalog::{Config, EventLog, USAGE, VERSION};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env().context("invalid command line")?;
    if config.show_help {
        println!("movie-catalog {}\n\n{}", VERSION, USAGE);
        return Ok(());
    }

    info!("using movie list file {}", config.catalog_path.display());
    run_ui_mode(&config)?;

    print_log(&EventLog::instance());
    Ok(())
}

/// Logs go to stderr and default to warnings so they don't paint over the TUI
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}

/// End-of-session report: every event, one block each
fn print_log(log: &EventLog) {
    for event in log {
        println!("{}\n", event);
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config) -> Result<()> {
    let mut app = ui::App::new(config, EventLog::instance());
    ui::run_ui(&mut app).context("terminal UI failed")?;
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    std::process::exit(1);
}
