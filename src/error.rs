//=========================================================================
// Errors
//=========================================================================
//
// Crate-wide error type for recoverable failures: loading config, level
// and note files, validating configuration, wiring the player body, and
// running the platform and logic threads.
//
// Gameplay no-ops (a click that hits nothing) are not errors.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::platform_bridge::PlatformError;

//=== NotesError ==========================================================

/// Errors surfaced by the library and binary.
#[derive(Error, Debug)]
pub enum NotesError {
    /// A file could not be read.
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file was read but is not valid TOML for its schema.
    #[error("Parse error in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// In-memory TOML could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A movement controller was given a body the world does not hold.
    #[error("Body handle does not belong to the physics world")]
    UnknownBody,

    /// Window or event loop failure.
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// The logic thread panicked.
    #[error("Core thread panicked: {0}")]
    CoreThread(String),
}

impl NotesError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::Parse { path: path.into(), source }
    }
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, NotesError>;

//=========================================================================
// Unit Tests
//=========================================================================
