#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod driver;
mod errors;
mod locator;
mod session;
mod workflow;

use crate::config::{Credentials, EnvironmentProfile, PROFILE_NAMES, RunParameters};
use crate::driver::GLOBAL_DRIVER_MANAGER;
use crate::workflow::WorkflowRunner;

const EXIT_SUCCESS: i32 = 0;
const EXIT_RUN_FAILED: i32 = 1;

#[derive(Parser)]
#[command(name = "awxpilot")]
#[command(about = "Provision AWX inventory sources through the web console", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an inventory source and trigger its first sync
    Provision {
        /// Inventory-source name, also embedded in the source path
        app_name: String,

        /// Environment profile (dev, stage, prod)
        #[arg(short, long)]
        profile: String,

        /// Search term for the source-control project
        #[arg(long)]
        project: String,

        /// Run the browser in visible mode (disables headless)
        #[arg(long = "no-headless")]
        no_headless: bool,

        /// Use an already-running WebDriver instead of starting chromedriver
        #[arg(long)]
        webdriver_url: Option<String>,
    },

    /// Check credentials and console reachability, without changing state
    Verify {
        /// Environment profile (dev, stage, prod)
        #[arg(short, long)]
        profile: String,

        /// Run the browser in visible mode (disables headless)
        #[arg(long = "no-headless")]
        no_headless: bool,

        /// Use an already-running WebDriver instead of starting chromedriver
        #[arg(long)]
        webdriver_url: Option<String>,
    },

    /// List the built-in environment profiles
    Profiles,
}

/// One line of JSON on stdout per completed run.
#[derive(serde::Serialize)]
struct RunReport {
    action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    app_name: Option<String>,
    profile: String,
    success: bool,
    elapsed_ms: u128,
    timestamp: chrono::DateTime<chrono::Utc>,
}

#[tokio::main]
async fn main() {
    let result = run().await;

    // Always clean up chromedriver processes before exiting
    GLOBAL_DRIVER_MANAGER.stop_all();

    match result {
        Ok(true) => std::process::exit(EXIT_SUCCESS),
        Ok(false) => std::process::exit(EXIT_RUN_FAILED),
        Err(err) => {
            // Convert to our error type to get the proper exit code
            let err: errors::AwxpilotError = err.into();

            // JSON error to stdout for programmatic consumption
            let error_json = json!({
                "error": true,
                "message": err.to_string(),
                "exit_code": err.exit_code()
            });
            println!(
                "{}",
                serde_json::to_string(&error_json).unwrap_or_else(|_| "{}".to_string())
            );

            // Also log to stderr for human reading
            eprintln!("Error: {}", err);
            std::process::exit(err.exit_code());
        }
    }
}

async fn run() -> Result<bool> {
    // Logs go to stderr so the JSON report on stdout stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "awxpilot=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Provision {
            app_name,
            profile,
            project,
            no_headless,
            webdriver_url,
        } => {
            let env = EnvironmentProfile::resolve(&profile)?;
            let credentials = Credentials::from_env();
            let runner = WorkflowRunner::new(
                resolve_webdriver_url(webdriver_url).await?,
                config::chrome_args(!no_headless),
            );

            let params = RunParameters {
                app_name: app_name.clone(),
                profile: profile.clone(),
                project,
            };

            let started = Instant::now();
            let success = runner.provision(&params, &env, &credentials).await;
            print_report(RunReport {
                action: "provision",
                app_name: Some(app_name),
                profile,
                success,
                elapsed_ms: started.elapsed().as_millis(),
                timestamp: chrono::Utc::now(),
            });
            Ok(success)
        }

        Commands::Verify {
            profile,
            no_headless,
            webdriver_url,
        } => {
            let env = EnvironmentProfile::resolve(&profile)?;
            let credentials = Credentials::from_env();
            let runner = WorkflowRunner::new(
                resolve_webdriver_url(webdriver_url).await?,
                config::chrome_args(!no_headless),
            );

            let started = Instant::now();
            let success = runner.verify_login(&env, &credentials).await;
            print_report(RunReport {
                action: "verify",
                app_name: None,
                profile,
                success,
                elapsed_ms: started.elapsed().as_millis(),
                timestamp: chrono::Utc::now(),
            });
            Ok(success)
        }

        Commands::Profiles => {
            let mut profiles = serde_json::Map::new();
            for name in PROFILE_NAMES {
                let env = EnvironmentProfile::resolve(name)?;
                profiles.insert(name.to_string(), serde_json::to_value(env)?);
            }
            println!("{}", serde_json::to_string_pretty(&profiles)?);
            Ok(true)
        }
    }
}

async fn resolve_webdriver_url(explicit: Option<String>) -> Result<String> {
    match explicit {
        Some(url) => Ok(url),
        None => GLOBAL_DRIVER_MANAGER.ensure_driver().await,
    }
}

fn print_report(report: RunReport) {
    println!(
        "{}",
        serde_json::to_string(&report).unwrap_or_else(|_| "{}".to_string())
    );
}
