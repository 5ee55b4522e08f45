//! Stegward CLI - steganalysis-gated image moderation.

mod cli;
mod commands;
mod server;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve {
            port,
            store,
            detector_tool,
            java,
            timeout_secs,
            admin_email,
            admin_password,
            jwt_secret,
        } => commands::serve::run(
            port,
            store,
            detector_tool,
            java,
            timeout_secs,
            admin_email,
            admin_password,
            jwt_secret,
            cli.verbose,
        ),

        Commands::Scan {
            file,
            detector_tool,
            java,
            timeout_secs,
        } => commands::scan::run(file, detector_tool, java, timeout_secs, cli.verbose),

        Commands::Status { store, json } => commands::status::run(store, json, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
