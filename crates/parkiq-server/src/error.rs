//! Error types for the ParkIQ server binary.
//!
//! [`AppError`] is the top-level error type that wraps every failure
//! that can stop the process. All of them happen during startup; once
//! the server is listening, request-level errors are handled in place.

/// Top-level error for the ParkIQ server binary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: parkiq_core::ConfigError,
    },

    /// The facility could not be opened.
    #[error("facility error: {source}")]
    Facility {
        /// The underlying facility error.
        #[from]
        source: parkiq_core::FacilityError,
    },

    /// The HTTP server failed to bind or serve.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: parkiq_observer::ServerError,
    },
}
