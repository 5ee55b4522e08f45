//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Stegward: steganalysis-gated image moderation
#[derive(Parser)]
#[command(name = "stegward")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the moderation web service
    Serve {
        /// Port for the web server
        #[arg(short, long, default_value = "5000")]
        port: u16,

        /// Path to the artifact store snapshot
        #[arg(short, long, default_value = "stegward.store.json")]
        store: PathBuf,

        /// Path to the steganalysis tool (a .jar is run through java)
        #[arg(long, default_value = "StegExpose.jar")]
        detector_tool: PathBuf,

        /// Java binary used for .jar tools
        #[arg(long, default_value = "java")]
        java: String,

        /// Detector timeout in seconds
        #[arg(long, default_value = "60")]
        timeout_secs: u64,

        /// Moderator login email
        #[arg(long, env = "STEGWARD_ADMIN_EMAIL")]
        admin_email: String,

        /// Moderator login password
        #[arg(long, env = "STEGWARD_ADMIN_PASSWORD", hide_env_values = true)]
        admin_password: String,

        /// Secret for signing session tokens
        #[arg(long, env = "STEGWARD_JWT_SECRET", hide_env_values = true)]
        jwt_secret: String,
    },

    /// Scan a single image file and print the verdict
    Scan {
        /// Path to the image file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Path to the steganalysis tool (a .jar is run through java)
        #[arg(long, default_value = "StegExpose.jar")]
        detector_tool: PathBuf,

        /// Java binary used for .jar tools
        #[arg(long, default_value = "java")]
        java: String,

        /// Detector timeout in seconds
        #[arg(long, default_value = "60")]
        timeout_secs: u64,
    },

    /// Show queue counts from a store snapshot
    Status {
        /// Path to the artifact store snapshot
        #[arg(short, long, default_value = "stegward.store.json")]
        store: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
