//! Serve command - run the moderation web service.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use tracing_subscriber::EnvFilter;

use stegward::{DetectorConfig, MemoryStore, ModerationQueue, StegExposeDetector};

use crate::server::{app, auth::AuthConfig, state::AppState};

#[allow(clippy::too_many_arguments)]
pub fn run(
    port: u16,
    store_path: PathBuf,
    detector_tool: PathBuf,
    java: String,
    timeout_secs: u64,
    admin_email: String,
    admin_password: String,
    jwt_secret: String,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let default_filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    // Load or create the artifact store snapshot
    let store = if store_path.exists() {
        if verbose {
            println!("Loading existing store from {}", store_path.display());
        }
        MemoryStore::load(&store_path)?
    } else {
        println!(
            "{} No store snapshot found, starting empty at {}",
            "Note:".yellow(),
            store_path.display()
        );
        MemoryStore::with_snapshot(&store_path)
    };

    let detector = StegExposeDetector::new(DetectorConfig {
        tool_path: detector_tool.clone(),
        java_bin: java,
        timeout: Duration::from_secs(timeout_secs),
    });

    let queue = ModerationQueue::new(Arc::new(store), Arc::new(detector));
    let auth = AuthConfig::new(admin_email, admin_password, &jwt_secret);
    let state = AppState::new(queue, auth);

    // Print server info
    let url = format!("http://localhost:{}", port);
    println!();
    println!(
        "{} {}",
        "Starting moderation server at".cyan().bold(),
        url.white().bold()
    );
    println!();
    println!("  Store:    {}", store_path.display());
    println!("  Detector: {}", detector_tool.display());
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    // Run the server
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        tokio::spawn(async {
            tokio::signal::ctrl_c().await.ok();
            println!();
            println!("{}", "Shutting down...".yellow());
            std::process::exit(0);
        });

        if let Err(e) = app::run_server(state, port).await {
            eprintln!("Server error: {}", e);
        }
    });

    Ok(())
}
