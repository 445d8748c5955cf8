//! userlook - Debounced Terminal User Search
//!
//! Type to filter a remote user collection by name; results refresh once typing settles.

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgMatches, Command};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use userlook::config::{load_file_layer, ConfigLayer};
use userlook::render::ui::{ColorTheme, TerminalUI};
use userlook::{AppConfig, Application, HttpUserDirectory, ResponseOrdering};

fn cli() -> Command {
    Command::new("userlook")
        .version(userlook::VERSION)
        .about("Search a remote user directory by name from the terminal")
        .long_about(
            "userlook queries a JSON user collection with a \"name contains\" filter. \
             The filter is debounced so the directory is only hit once typing pauses.",
        )
        .arg(
            Arg::new("endpoint")
                .long("endpoint")
                .value_name("URL")
                .help("User collection endpoint [default: jsonplaceholder /users]"),
        )
        .arg(
            Arg::new("debounce-ms")
                .long("debounce-ms")
                .value_name("MS")
                .value_parser(value_parser!(u64))
                .help("Quiet period before a filter edit is sent [default: 500]"),
        )
        .arg(
            Arg::new("timeout-secs")
                .long("timeout-secs")
                .value_name("SECS")
                .value_parser(value_parser!(u64))
                .help("Per-request timeout [default: 10]"),
        )
        .arg(
            Arg::new("ordering")
                .long("ordering")
                .value_parser(["latest", "arrival"])
                .help("Apply only the latest response, or every response as it arrives"),
        )
        .arg(
            Arg::new("theme")
                .long("theme")
                .value_parser(["default", "monochrome", "high-contrast"])
                .help("Color theme"),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Append logs to PATH (filter with RUST_LOG)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Read settings from a TOML file"),
        )
}

fn cli_layer(matches: &ArgMatches) -> ConfigLayer {
    ConfigLayer {
        endpoint: matches.get_one::<String>("endpoint").cloned(),
        debounce_ms: matches.get_one::<u64>("debounce-ms").copied(),
        request_timeout_secs: matches.get_one::<u64>("timeout-secs").copied(),
        ordering: matches
            .get_one::<String>("ordering")
            .and_then(|name| ResponseOrdering::from_name(name)),
        theme: matches.get_one::<String>("theme").cloned(),
        log_file: matches.get_one::<PathBuf>("log-file").cloned(),
    }
}

/// Route env_logger to a file; the terminal itself is owned by the UI.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(path) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("cannot open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
        if std::env::var_os("RUST_LOG").is_none() {
            builder.filter_module("userlook", log::LevelFilter::Debug);
        }
    }
    builder.init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    let file_layer = load_file_layer(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
    let config = AppConfig::resolve(file_layer.merge(cli_layer(&matches)))?;

    init_logging(config.log_file.as_deref())?;
    log::info!(
        "userlook {} querying {} (debounce {:?}, ordering {})",
        userlook::VERSION,
        config.endpoint,
        config.quiet_period,
        config.ordering.as_str()
    );

    let directory = HttpUserDirectory::new(config.endpoint.clone(), config.request_timeout)?;
    let Some(theme) = ColorTheme::from_name(&config.theme) else {
        anyhow::bail!("Unknown theme: {}", config.theme);
    };
    let ui_renderer = Box::new(TerminalUI::with_theme(theme)?);

    let mut app = Application::new(config, Arc::new(directory), ui_renderer);
    app.run().await?;

    Ok(())
}
