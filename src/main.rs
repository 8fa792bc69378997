//! action-dispatch
//!
//! Route matching and controller metadata for an MVC dispatcher.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────┐
//!                 │                    ACTION DISPATCH                   │
//!                 │                                                      │
//!   manifest ─────┼─▶ config ──▶ metadata registry ──▶ route table       │
//!   (TOML)        │     │              │                    │            │
//!                 │     │ watcher      └───── Application ──┘            │
//!                 │     ▼                        │ (ArcSwap)             │
//!   request ──────┼─▶ http server ──▶ dispatch(method, path)             │
//!                 │                        │                             │
//!   response ◀────┼──── JSON DispatchPlan ◀┘                             │
//!                 │                                                      │
//!                 │   admin API · observability · lifecycle              │
//!                 └──────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use action_dispatch::admin::setup_admin_router;
use action_dispatch::config::{load_application, load_config, AppConfig, ConfigWatcher};
use action_dispatch::dispatch::Application;
use action_dispatch::http::HttpServer;
use action_dispatch::lifecycle::{signals, Shutdown};
use action_dispatch::metadata::HttpMethod;
use action_dispatch::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "action-dispatch")]
#[command(about = "Resolve request paths to controller actions and their interceptor chains", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate a manifest, then print what it declares
    Check {
        config: PathBuf,
    },
    /// Print the dispatch plan for one request
    Resolve {
        config: PathBuf,
        path: String,
        #[arg(short, long, default_value = "GET")]
        method: HttpMethod,
    },
    /// Serve the dispatch surface over HTTP
    Serve {
        config: PathBuf,
        /// Rebuild the application whenever the manifest changes
        #[arg(short, long)]
        watch: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { config } => check(&config),
        Commands::Resolve { config, path, method } => resolve(&config, &path, method),
        Commands::Serve { config, watch } => serve(config, watch),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn check(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    logging::init("warn");
    let (_, app) = load_application(path)?;

    let registry = app.registry();
    println!(
        "OK: {} controllers, {} interceptors, {} routes",
        registry.controllers().len(),
        registry.interceptors().len(),
        app.routes().len()
    );
    if let Some(default) = registry.default_controller() {
        println!("default controller: {}", default.name());
    }
    for controller in registry.init_controllers() {
        println!("init on startup: {}", controller.name());
    }
    for route in app.routes().iter() {
        println!("  {:<14} {:<40} {}", route.class().as_str(), route.spec().to_string(), route.pattern());
    }
    Ok(())
}

fn resolve(path: &Path, request_path: &str, method: HttpMethod) -> Result<(), Box<dyn std::error::Error>> {
    logging::init("warn");
    let (_, app) = load_application(path)?;

    match app.dispatch(method, request_path) {
        Some(plan) => println!("{}", serde_json::to_string_pretty(&plan)?),
        None => println!("no route for {} {}", method, request_path),
    }
    Ok(())
}

#[tokio::main]
async fn serve(path: PathBuf, watch: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config: AppConfig = load_config(&path)?;
    logging::init(&config.observability.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.server.bind_address,
        context_path = %config.server.context_path,
        request_timeout_secs = config.server.request_timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let app = Application::from_config(&config)?;
    for controller in app.registry().init_controllers() {
        tracing::info!(controller = controller.name(), "Init-on-startup controller");
    }

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    // Dropping the watcher stops it; keep it for the life of the server.
    let (_watcher, updates) = if watch {
        let (watcher, updates) = ConfigWatcher::new(&path);
        (Some(watcher.run()?), updates)
    } else {
        let (_tx, updates) = mpsc::unbounded_channel();
        (None, updates)
    };

    let server = HttpServer::new(&config, app);

    if config.admin.enabled {
        let listener = TcpListener::bind(&config.admin.bind_address).await?;
        tracing::info!(address = %listener.local_addr()?, "Admin API listening");
        let admin = setup_admin_router(server.state().clone());
        let stopped = shutdown.wait();
        tokio::spawn(async move {
            let served = axum::serve(listener, admin)
                .with_graceful_shutdown(stopped)
                .await;
            if let Err(e) = served {
                tracing::error!(error = %e, "Admin API failed");
            }
        });
    }

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    server.run(listener, updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
