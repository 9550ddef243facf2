//! printwatch CLI
//!
//! Polls the configured printers and prints or delivers the status report.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use printwatch::{
    delivery::{self, SinkKind},
    error::{AppError, Result},
    models::{Config, Report},
    pipeline,
    services::{SnmpClient, SnmpWalk},
};

/// printwatch - Printer toner and paper tray monitor
#[derive(Parser, Debug)]
#[command(
    name = "printwatch",
    version,
    about = "Polls network printers over SNMP and reports toner and tray status"
)]

struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "printwatch.toml", global = true)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll all printers, print the report and deliver it
    Run {
        /// Deliver only to these sinks (default: every enabled sink)
        #[arg(long = "sink", value_parser = parse_sink)]
        sinks: Vec<SinkKind>,

        /// Output format for the console copy of the report
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Poll and print the report without delivering it
    Poll {
        /// Poll a single printer by name
        #[arg(long)]
        device: Option<String>,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// List the printer inventory
    Devices,

    /// Validate the configuration file
    Validate,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn parse_sink(s: &str) -> std::result::Result<SinkKind, String> {
    s.parse().map_err(|e: AppError| e.to_string())
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_report(report: &Report, format: Format) -> Result<()> {
    match format {
        Format::Text => println!("{}", pipeline::render_text(report)),
        Format::Json => println!("{}", pipeline::render_json(report)?),
    }
    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    log::debug!("Loaded configuration from {}", cli.config.display());

    let client: Arc<dyn SnmpClient> = Arc::new(SnmpWalk::from_config(&config.snmp));

    match cli.command {
        Command::Run { sinks, format } => {
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }

            let sinks = delivery::build_sinks(&config, &sinks);
            let (report, summary) = pipeline::run_pipeline(&config, client, &sinks).await;
            print_report(&report, format)?;

            let worst = report.worst();
            if summary.all_ok() {
                log::info!(
                    "Done! Worst status {} {}, delivered via {} sink(s)",
                    worst.marker(),
                    worst,
                    summary.delivered.len()
                );
            } else {
                log::warn!(
                    "Done! Worst status {} {}, {} sink(s) delivered, {} failed: {}",
                    worst.marker(),
                    worst,
                    summary.delivered.len(),
                    summary.failed.len(),
                    summary
                        .failed
                        .iter()
                        .map(|(name, _)| name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
        }

        Command::Poll { device, format } => {
            let devices = match device {
                Some(name) => match config.device(&name) {
                    Some(d) => vec![d.clone()],
                    None => {
                        return Err(AppError::config(format!("Unknown device: {name}")));
                    }
                },
                None => config.devices.clone(),
            };
            if devices.is_empty() {
                log::warn!("No devices configured in {}", cli.config.display());
            }

            let report = pipeline::run_poll(&config, client, &devices).await;
            print_report(&report, format)?;
        }

        Command::Devices => {
            log::info!("{} devices configured", config.devices.len());
            for device in &config.devices {
                println!(
                    "{:<12} {:<16} {:<6} toner={} tray={}",
                    device.name,
                    device.address,
                    device.tray.as_str(),
                    config.snmp.toner_oid,
                    device.tray_oid(&config.snmp)
                );
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!(
                "✓ Config OK ({} devices, timeout {}s, toner low below {}%)",
                config.devices.len(),
                config.snmp.timeout_secs,
                config.poll.toner_low_percent
            );

            let enabled: Vec<_> = SinkKind::ALL
                .iter()
                .filter(|k| k.enabled_in(&config))
                .map(|k| k.as_str())
                .collect();
            if enabled.is_empty() {
                log::warn!("No delivery sinks enabled");
            } else {
                log::info!("Enabled sinks: {}", enabled.join(", "));
            }
        }
    }

    Ok(())
}
