//! navmenu - Entry Point
//!
//! Drives the admin deploy-changes workflow from a terminal.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use navmenu::app::options::AppOptions;
use navmenu::app::run::run_deploy;
use navmenu::deploy::poller::DeployOutcome;
use navmenu::logs::{init_logging, LogLevel};
use navmenu::nav::flags::NavFlags;
use navmenu::nav::flags::NavSnapshot;
use navmenu::services::prompter::ConsolePrompter;
use navmenu::storage::settings::Settings;
use navmenu::utils::version_info;

use tracing::{error, info};

const USAGE: &str = "\
Usage: navmenu --deploy=<environment> [options]

Options:
  --deploy=<env>        Trigger and follow a deployment of <env>
  --settings=<path>     JSON settings file
  --base-url=<url>      Admin base URL, overrides the settings file
  --yes                 Do not ask for confirmation
  --log-level=<level>   trace, debug, info, warn or error
  --json-logs           Emit JSON formatted logs
  --flags               Print the navigation flags for the configuration
  --version             Print version information
  --help                Print this message";

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    // Print version and exit
    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(version) => println!("{}", version),
            Err(e) => eprintln!("Failed to render version: {e}"),
        }
        return;
    }

    if cli_args.contains_key("help") {
        println!("{}", USAGE);
        return;
    }

    // Retrieve the settings file
    let settings = match cli_args.get("settings") {
        Some(path) => match Settings::load(&PathBuf::from(path)).await {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("{} Unable to read settings file {}: {}", "error:".red().bold(), path, e);
                std::process::exit(2);
            }
        },
        None => Settings::default(),
    };

    let mut options = AppOptions::from_settings(&settings);
    if let Some(base_url) = cli_args.get("base-url") {
        options.client.base_url = base_url.clone();
    }
    if let Some(level) = cli_args.get("log-level") {
        match level.parse::<LogLevel>() {
            Ok(level) => options.log.log_level = level,
            Err(e) => {
                eprintln!("{} {}", "error:".red().bold(), e);
                std::process::exit(2);
            }
        }
    }
    if cli_args.contains_key("json-logs") {
        options.log.json_format = true;
    }

    // Initialize logging
    let _log_guard = match init_logging(options.log.clone()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    };

    if cli_args.contains_key("flags") {
        let snapshot = NavSnapshot {
            config: options.nav.clone(),
            ..Default::default()
        };
        match serde_json::to_string_pretty(&NavFlags::from_snapshot(&snapshot)) {
            Ok(flags) => println!("{}", flags),
            Err(e) => eprintln!("Failed to render flags: {e}"),
        }
        return;
    }

    let Some(environment) = cli_args.get("deploy").filter(|env| env.as_str() != "true") else {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    };

    let prompter = Arc::new(ConsolePrompter::new(cli_args.contains_key("yes")));

    info!("Running navmenu deploy with options: {:?}", options);
    match run_deploy(&options, environment, prompter, await_shutdown_signal()).await {
        Ok(DeployOutcome::Completed { .. }) => {}
        Ok(DeployOutcome::Declined) => println!("{}", "Deploy cancelled.".yellow()),
        Ok(DeployOutcome::AlreadyRunning) => println!("{}", "A deploy is already running.".yellow()),
        Ok(DeployOutcome::Cancelled) => {
            println!("{}", "Stopped following the deploy.".yellow());
            std::process::exit(130);
        }
        Err(e) => {
            error!("Failed to run the deploy: {e}");
            std::process::exit(1);
        }
    }
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl+C received, shutting down...");
        }
    }
}
