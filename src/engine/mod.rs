//! Handle to the external GAMS engine.
//!
//! The engine is an opaque subprocess: the driver hands it a program file
//! and arguments, captures its console output, and never looks inside the
//! optimization itself.

pub mod version;

pub use version::GamsVersion;

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::ModelError;

/// Banner line the engine prints on startup, e.g.
/// `GAMS 24.7.4  Copyright (C) 1987-2016 GAMS Development. All rights reserved`.
static RELEASE_BANNER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^GAMS ([\d.]+)\s*Copyright").expect("valid regex"));

/// Lines of engine log kept in error reports.
const LOG_TAIL_LINES: usize = 15;

#[derive(Debug, Clone)]
pub struct GamsEngine {
    executable: PathBuf,
}

impl Default for GamsEngine {
    fn default() -> Self {
        Self::new("gams")
    }
}

impl GamsEngine {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn from_config(cfg: &EngineConfig) -> Self {
        Self::new(&cfg.executable)
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Release of the installed engine.
    ///
    /// The engine writes its banner to the console rather than stdout unless
    /// `LogOption=3` is set, and it rejects options without a program file to
    /// run. Probing therefore executes a generated program that exits
    /// immediately, in a scratch directory discarded afterwards.
    pub async fn release(&self) -> Result<GamsVersion, ModelError> {
        let scratch = tempfile::tempdir()?;
        tokio::fs::write(scratch.path().join("null.gms"), "$exit;\n").await?;

        let output = self
            .spawn(scratch.path(), |cmd| {
                cmd.arg("null").arg("-LogOption=3");
            })
            .await?;

        let log = console_log(&output);
        if !output.status.success() {
            return Err(engine_error(output.status, &log));
        }
        parse_release_banner(&log)
    }

    /// Run `program` with `args`, using `workdir` as the engine's working
    /// directory.
    pub async fn execute(
        &self,
        program: &Path,
        args: &[String],
        workdir: &Path,
    ) -> Result<(), ModelError> {
        info!(
            engine = %self.executable.display(),
            program = %program.display(),
            workdir = %workdir.display(),
            "launching GAMS"
        );

        let output = self
            .spawn(workdir, |cmd| {
                cmd.arg(program).args(args);
            })
            .await?;

        let log = console_log(&output);
        debug!(lines = log.lines().count(), status = %output.status, "engine finished");
        if !output.status.success() {
            return Err(engine_error(output.status, &log));
        }
        Ok(())
    }

    async fn spawn(
        &self,
        workdir: &Path,
        configure: impl FnOnce(&mut Command),
    ) -> Result<std::process::Output, ModelError> {
        let mut cmd = Command::new(&self.executable);
        cmd.current_dir(workdir);
        configure(&mut cmd);
        cmd.output().await.map_err(|source| ModelError::Launch {
            command: self.executable.display().to_string(),
            source,
        })
    }
}

/// Scrape the release from the engine's startup banner.
pub fn parse_release_banner(log: &str) -> Result<GamsVersion, ModelError> {
    let capture = RELEASE_BANNER
        .captures(log)
        .and_then(|c| c.get(1))
        .ok_or(ModelError::ReleaseScrape)?;
    capture.as_str().parse()
}

fn console_log(output: &std::process::Output) -> String {
    let mut log = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.is_empty() {
        if !log.is_empty() && !log.ends_with('\n') {
            log.push('\n');
        }
        log.push_str(&stderr);
    }
    log
}

fn engine_error(status: std::process::ExitStatus, log: &str) -> ModelError {
    let lines: Vec<&str> = log.lines().collect();
    let start = lines.len().saturating_sub(LOG_TAIL_LINES);
    ModelError::Engine {
        status,
        log_tail: lines[start..].join("\n"),
    }
}
