//! Redirection Console Binary
//!
//! Interactive console (or one-shot command) for the phone redirection service.

use anyhow::Context;
use clap::Parser;
use redirect_console::auth::{authenticate, TerminalCredentials};
use redirect_console::cli::{render_error, run_interactive, run_once, Cli};
use redirect_console::config::{ConfigLoader, ConsoleConfig};
use redirect_console::logging::{init_logging, LoggingConfig};
use redirect_console::service::XmlRpcRedirectionClient;
use redirect_console::session::Session;
use redirect_console::settings::SettingsFile;
use std::io::{self, IsTerminal, Write};
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let logging_config = build_logging_config(&cli, &config);
    if let Err(e) = init_logging(&logging_config) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Redirection console starting");

    match run(&cli, config) {
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("Console failed: {:#}", e);
            eprintln!("{:#}", e);
            process::exit(1);
        }
    }
}

fn run(cli: &Cli, mut config: ConsoleConfig) -> anyhow::Result<i32> {
    if let Some(ref endpoint) = cli.endpoint {
        config.service.endpoint = endpoint.clone();
        config.service.validate().map_err(anyhow::Error::msg)?;
    }

    let settings_file = match cli.settings.clone().or_else(|| config.settings_file.clone()) {
        Some(path) => SettingsFile::new(path),
        None => SettingsFile::in_home_dir()?,
    };
    let (settings, vars) = settings_file
        .load()
        .with_context(|| format!("Failed to read {}", settings_file.path().display()))?;

    let color = !cli.no_color && io::stdout().is_terminal();
    let service_config = config.service.clone();
    let mut prompts = TerminalCredentials;
    let (credentials, service) = authenticate(&settings, &mut prompts, |credentials| {
        XmlRpcRedirectionClient::new(&service_config, credentials.clone())
    })?;
    info!(endpoint = %service.endpoint(), "Session authenticated");

    let mut session =
        Session::authenticated(service, &credentials, settings, vars, settings_file);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.is_one_shot() {
        return match run_once(&mut session, &cli.command) {
            Ok(text) => {
                if !text.is_empty() {
                    writeln!(out, "{}", text)?;
                }
                Ok(0)
            }
            Err(e) => {
                error!(error = %e, "Command failed");
                writeln!(out, "{}", render_error(&e, color))?;
                Ok(1)
            }
        };
    }

    let stdin = io::stdin();
    run_interactive(
        &mut session,
        &credentials.username,
        stdin.lock(),
        &mut out,
        color,
    )?;
    Ok(0)
}

/// Build logging configuration from CLI args and the config file.
/// Logging stays off unless `--verbose` or `--log-level` is given; the
/// `REDIRECT_CONSOLE_LOG` filter wins over both.
fn build_logging_config(cli: &Cli, config: &ConsoleConfig) -> LoggingConfig {
    let mut logging = config.logging.clone();

    if cli.verbose {
        logging.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        logging.level = level.clone();
    }
    if !cli.verbose && cli.log_level.is_none() {
        logging.level = LoggingConfig::off().level;
    }
    if let Some(ref format) = cli.log_format {
        logging.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        logging.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        logging.file = Some(file.clone());
    }
    if cli.no_color {
        logging.color = false;
    }

    logging
}
