//! Host bridge error types

use thiserror::Error;

use crate::lifecycle::{LifecycleEvent, LifecyclePhase};

/// Host bridge errors
#[derive(Error, Debug)]
pub enum HostError {
    /// The host environment does not provide a required platform service.
    ///
    /// This is a configuration error and cannot be recovered locally.
    #[error("Platform service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The platform service refused to create a multicast lock
    #[error("Failed to create multicast lock: {0}")]
    LockCreation(String),

    /// A multicast lock acquire or release call failed on the platform side
    #[error("Multicast lock error: {0}")]
    Lock(String),

    /// A lifecycle event arrived that is not valid for the current phase
    #[error("Invalid lifecycle transition: {event:?} while {from:?}")]
    InvalidTransition {
        /// Phase the host was in
        from: Option<LifecyclePhase>,
        /// Event that was rejected
        event: LifecycleEvent,
    },

    /// Failed to load or parse bridge configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic platform error (JNI, NDK, etc.)
    #[error("Platform error: {0}")]
    Platform(String),
}

impl HostError {
    /// Whether this error should abort host startup
    pub fn is_fatal(&self) -> bool {
        matches!(self, HostError::ServiceUnavailable(_) | HostError::Config(_))
    }
}

/// Result type for host bridge operations
pub type Result<T> = std::result::Result<T, HostError>;
