//! Status command - show queue counts from a store snapshot.

use std::path::PathBuf;

use colored::Colorize;
use stegward::{ArtifactStore, MemoryStore};

pub fn run(
    store_path: PathBuf,
    json_output: bool,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !store_path.exists() {
        return Err(format!(
            "Store snapshot not found: {}\nRun 'stegward serve' to create one.",
            store_path.display()
        )
        .into());
    }

    let store = MemoryStore::load(&store_path)?;
    let counts = store.counts()?;

    if json_output {
        let status = serde_json::json!({
            "store": store_path.display().to_string(),
            "pending": counts.pending,
            "approved": counts.approved,
            "rejected": counts.rejected,
            "total": counts.total(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!(
            "{} {}",
            "Moderation queue in".cyan().bold(),
            store_path.display().to_string().white()
        );
        println!();
        println!("  Pending:  {}", counts.pending.to_string().yellow());
        println!("  Approved: {}", counts.approved.to_string().green());
        println!("  Rejected: {}", counts.rejected.to_string().red());
        println!();
        println!("  Total:    {}", counts.total().to_string().white().bold());
    }

    Ok(())
}
