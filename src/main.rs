use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use tealeaf_scan::app::{App, ResultsScreen, SubmitOutcome};
use tealeaf_scan::capture::CaptureView;
use tealeaf_scan::config::Config;
use tealeaf_scan::contact::ContactForm;
use tealeaf_scan::navigation::{Navigator, Route};
use tealeaf_scan::prediction::cancel_pair;
use tealeaf_scan::render;

/// Headless client for tea leaf disease detection
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (defaults to ~/.tealeafscan/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Prediction endpoint URL (overrides config)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Request timeout in milliseconds (overrides config)
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload an image and show the diagnosis
    Analyze {
        /// Path to the tea leaf image
        image: PathBuf,

        /// Print the diagnosis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the page for a route (/, /about, /contact, /results, ...)
    Page {
        #[arg(default_value = "/")]
        path: String,
    },

    /// Send a message through the contact form
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
    },

    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the config file location
    Path,
    /// Write the effective configuration to the config file
    Init,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(),
    };
    if let Some(endpoint) = &args.endpoint {
        config.endpoint_url = endpoint.clone();
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.request_timeout_ms = timeout_ms;
    }

    match args.command {
        Command::Analyze { image, json } => analyze(&config, image, json).await,
        Command::Page { path } => {
            show_page(&path);
            Ok(ExitCode::SUCCESS)
        }
        Command::Contact {
            name,
            email,
            message,
        } => {
            let mut form = ContactForm::new(name, email, message);
            match form.submit() {
                Ok(receipt) => {
                    println!("{}", receipt.acknowledgement);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    eprintln!("{}", e);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Config { action } => {
            let config_path = match &args.config {
                Some(path) => path.clone(),
                None => Config::config_path()?,
            };
            match action {
                ConfigAction::Show => {
                    println!("{}", serde_json::to_string_pretty(&config)?);
                }
                ConfigAction::Path => println!("{}", config_path.display()),
                ConfigAction::Init => {
                    config.save(&config_path)?;
                    println!("Wrote {}", config_path.display());
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn analyze(config: &Config, image: PathBuf, json: bool) -> Result<ExitCode> {
    let mut app = App::new(config).context("Failed to set up prediction client")?;

    app.capture_mut()
        .select_image(Some(&image))
        .context("Failed to select image")?;

    // Ctrl+C cancels the outstanding request
    let (cancel_handle, cancel_token) = cancel_pair();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, cancelling request...");
            cancel_handle.cancel();
        }
    });

    info!("Analyzing {:?} via {}", image, config.endpoint_url);
    match app.submit(&cancel_token).await {
        SubmitOutcome::Navigated => {}
        SubmitOutcome::Skipped => {
            error!("Nothing was submitted");
            return Ok(ExitCode::FAILURE);
        }
        SubmitOutcome::Failed { message } => {
            eprintln!("{}", message);
            return Ok(ExitCode::FAILURE);
        }
    }

    match app.results() {
        ResultsScreen::Diagnosis { view, .. } => {
            // Preview copies are temporary; show the source path
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", render::results_page(&view, Some(image.as_path())));
            }
            Ok(ExitCode::SUCCESS)
        }
        ResultsScreen::Redirected(route) => {
            error!("No result to display, back at {}", route);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn show_page(path: &str) {
    let route = Route::parse(path);
    let capture = CaptureView::new();

    match render::static_page(&route, &capture) {
        Some(page) => print!("{}", page),
        None => {
            // Direct entry to the results view carries no result
            let mut navigator = Navigator::new();
            navigator.navigate(route);
            navigator.enter_results_view();
            if let Some(page) = render::static_page(navigator.current(), &capture) {
                print!("{}", page);
            }
        }
    }
}
