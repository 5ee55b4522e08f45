//! Scan command - run the steganalysis detector against one file.

use std::path::PathBuf;
use std::time::Duration;

use colored::Colorize;
use stegward::{Detector, DetectorConfig, StegExposeDetector};

pub fn run(
    file: PathBuf,
    detector_tool: PathBuf,
    java: String,
    timeout_secs: u64,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = std::fs::read(&file)
        .map_err(|e| format!("cannot read {}: {}", file.display(), e))?;

    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| format!("not a file path: {}", file.display()))?;

    let detector = StegExposeDetector::new(DetectorConfig {
        tool_path: detector_tool,
        java_bin: java,
        timeout: Duration::from_secs(timeout_secs),
    });

    if verbose {
        println!("Scanning {} ({} bytes)...", file.display(), bytes.len());
    }

    let verdict = detector.scan(&bytes, &name)?;

    if verdict.suspicious {
        println!(
            "{} {}",
            "SUSPICIOUS".red().bold(),
            file.display().to_string().white()
        );
    } else {
        println!(
            "{} {}",
            "CLEAN".green().bold(),
            file.display().to_string().white()
        );
    }
    if !verdict.raw_details.is_empty() {
        println!();
        println!("{}", verdict.raw_details);
    }

    if verdict.suspicious {
        // Distinct exit code so scripts can branch on the verdict.
        std::process::exit(2);
    }
    Ok(())
}
