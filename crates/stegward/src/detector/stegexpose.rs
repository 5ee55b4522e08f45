//! External StegExpose-style detector invoked as a subprocess.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{Result, StegwardError};
use crate::scratch::ScratchDir;

use super::{Detector, Verdict, check_scan_input};

/// Poll interval while waiting for the detector process to exit.
const WAIT_POLL: Duration = Duration::from_millis(25);

/// Configuration for the external detector tool.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Path to the detector: a jar launched through `java -jar`, or any
    /// executable taking a directory argument.
    pub tool_path: PathBuf,

    /// Java binary used for jar tools.
    pub java_bin: String,

    /// Upper bound on detector execution time. Exceeding it kills the
    /// process and fails the scan.
    pub timeout: Duration,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            tool_path: PathBuf::from("StegExpose.jar"),
            java_bin: "java".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Detector backed by an external steganalysis tool.
///
/// Each scan stages the payload into a fresh scratch directory, points the
/// tool at that directory, and captures its stdout report. One process is
/// spawned per scan; processes are never pooled or reused.
pub struct StegExposeDetector {
    config: DetectorConfig,
}

impl StegExposeDetector {
    /// Create a detector with the given configuration.
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    fn command(&self, dir: &Path) -> Command {
        let is_jar = self
            .config
            .tool_path
            .extension()
            .is_some_and(|ext| ext == "jar");

        let mut cmd = if is_jar {
            let mut cmd = Command::new(&self.config.java_bin);
            cmd.arg("-jar").arg(&self.config.tool_path);
            cmd
        } else {
            Command::new(&self.config.tool_path)
        };
        cmd.arg(dir);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd
    }

    /// Run the tool against a staging directory and capture its report.
    fn run_tool(&self, dir: &Path) -> Result<String> {
        let mut child = self.command(dir).spawn().map_err(|e| {
            StegwardError::DetectorFailed(format!("failed to launch detector: {e}"))
        })?;

        // Drain both pipes off-thread so a chatty detector can't fill a
        // pipe buffer and stall behind our wait loop.
        let stdout = drain_pipe(child.stdout.take());
        let stderr = drain_pipe(child.stderr.take());

        let status = self.wait_with_deadline(&mut child)?;
        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();

        if !status.success() {
            let detail = stderr.trim();
            return Err(StegwardError::DetectorFailed(format!(
                "detector exited with {status}: {detail}"
            )));
        }
        Ok(stdout)
    }

    fn wait_with_deadline(&self, child: &mut Child) -> Result<ExitStatus> {
        let deadline = Instant::now() + self.config.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(StegwardError::DetectorFailed(format!(
                            "detector timed out after {:?}",
                            self.config.timeout
                        )));
                    }
                    thread::sleep(WAIT_POLL);
                }
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(StegwardError::DetectorFailed(format!(
                        "failed to wait for detector: {e}"
                    )));
                }
            }
        }
    }
}

impl Detector for StegExposeDetector {
    fn scan(&self, payload: &[u8], name: &str) -> Result<Verdict> {
        check_scan_input(payload, name)?;

        if !self.config.tool_path.exists() {
            return Err(StegwardError::ToolUnavailable(format!(
                "detector tool not found at '{}'",
                self.config.tool_path.display()
            )));
        }

        // Scratch area is released by Drop on every path out of this scope.
        let scratch = ScratchDir::acquire()?;
        scratch.stage(name, payload)?;

        let report = self.run_tool(scratch.path())?;
        let verdict = Verdict::from_report(&report);
        debug!(
            detector = self.name(),
            name,
            suspicious = verdict.suspicious,
            "scan complete"
        );
        Ok(verdict)
    }

    fn name(&self) -> &str {
        "stegexpose"
    }
}

/// Read a child pipe to completion on a dedicated thread.
fn drain_pipe<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = String::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_string(&mut buf);
        }
        buf
    })
}
