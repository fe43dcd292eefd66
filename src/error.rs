use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

use crate::engine::GamsVersion;
use crate::platform::PlatformError;

/// Errors raised while configuring or driving the GAMS engine.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to launch {command:?}: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("GAMS terminated with {status}; log tail:\n{log_tail}")]
    Engine { status: ExitStatus, log_tail: String },

    #[error("no release banner in engine output")]
    ReleaseScrape,

    #[error("invalid GAMS version string {0:?}")]
    VersionParse(String),

    #[error("{model} requires GAMS >= {required}; found {found}")]
    EngineTooOld {
        model: &'static str,
        required: GamsVersion,
        found: GamsVersion,
    },

    #[error("no version markers in model source {}", .0.display())]
    SourceVersion(PathBuf),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
