//! Error types for the tracking crate.

use thiserror::Error;

/// Errors produced by frame validation, configuration and the built-in backends.
#[derive(Debug, Error)]
pub enum Error {
    /// The pixel buffer does not describe a non-empty `height x width x 3` image.
    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    /// The requested tracker kind has no implementation.
    #[error("tracker kind {0:?} is not implemented")]
    UnsupportedTracker(crate::integration::TrackerKind),

    /// The placeholder detector was asked to run.
    #[error("no detection backend is available")]
    DetectorUnavailable,

    /// A configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
