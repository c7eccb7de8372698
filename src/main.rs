use clap::Parser;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;

use wisp::core::config::{self, CliOverrides, LoadedConfig};
use wisp::core::mode::Mode;

#[derive(Parser)]
#[command(name = "wisp", about = "Terminal control panel for WebSocket devices")]
struct Args {
    /// WebSocket server URL to pre-fill
    #[arg(short, long)]
    url: Option<String>,

    /// Initial framing mode
    #[arg(short, long, value_enum)]
    mode: Option<Mode>,

    /// Connect to the URL immediately on start
    #[arg(short, long)]
    connect: bool,

    /// Diagnostic log file (default: wisp.log)
    #[arg(long)]
    log_file: Option<String>,

    /// Diagnostic log level: off, error, warn, info, debug, trace
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let (loaded, config_error) = match config::load_config() {
        Ok(loaded) => (loaded, None),
        Err(e) => (LoadedConfig::default(), Some(e)),
    };

    let cli = CliOverrides {
        url: args.url,
        mode: args.mode,
        connect: args.connect,
        log_file: args.log_file,
        log_level: args.log_level,
    };
    let resolved = config::resolve(&loaded.config, &cli);

    // Initialize file logger
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    match File::create(&resolved.log_file) {
        Ok(log_file) => {
            let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
        }
        Err(e) => eprintln!(
            "wisp: cannot open log file {}: {e}",
            resolved.log_file.display()
        ),
    }

    // Config loading ran before the logger existed
    loaded.log_notes();
    if let Some(e) = config_error {
        log::warn!("Ignoring config file: {}", e);
    }
    log::info!(
        "Wisp starting up (url={}, mode={}, connect_on_start={})",
        resolved.url,
        resolved.mode.label(),
        resolved.connect_on_start
    );

    wisp::tui::run(resolved)
}
