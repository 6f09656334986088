//! Error types and failure classification for the macro data crate.
//!
//! This module provides:
//! - [`MacroDataError`]: The main error enum for all fetch and decode operations
//! - [`ErrorClass`]: Classification used by views to decide how a failure is surfaced

mod class;

pub use class::ErrorClass;

use thiserror::Error;

/// Errors that can occur while fetching or decoding provider data.
///
/// Each variant is classified into an [`ErrorClass`] via the [`class`](Self::class)
/// method, which determines whether the failure shows up as a per-source error message,
/// as "no data", or not at all.
#[derive(Error, Debug)]
pub enum MacroDataError {
    /// The upstream answered with a non-2xx status.
    #[error("HTTP {status} from {provider}")]
    HttpStatus {
        /// The provider that answered
        provider: String,
        /// The HTTP status code
        status: u16,
    },

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The request could not be sent or the body could not be read.
    #[error("Transport error: {provider} - {message}")]
    Transport {
        /// The provider being called
        provider: String,
        /// Underlying error message
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("Decode failed: {provider} - {message}")]
    Decode {
        /// The provider whose payload failed to decode
        provider: String,
        /// Description of the decode failure
        message: String,
    },

    /// The fetch was cancelled before it completed.
    #[error("Cancelled")]
    Cancelled,
}

impl MacroDataError {
    /// Returns the failure classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use macrodash_data::errors::{ErrorClass, MacroDataError};
    ///
    /// let error = MacroDataError::HttpStatus { provider: "ECB".to_string(), status: 503 };
    /// assert_eq!(error.class(), ErrorClass::Transport);
    ///
    /// assert_eq!(MacroDataError::Cancelled.class(), ErrorClass::Cancelled);
    /// ```
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::HttpStatus { .. }
            | Self::RateLimited { .. }
            | Self::Timeout { .. }
            | Self::Transport { .. } => ErrorClass::Transport,

            Self::Decode { .. } => ErrorClass::Decode,

            Self::Cancelled => ErrorClass::Cancelled,
        }
    }

    pub(crate) fn decode(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            provider: provider.into(),
            message: message.into(),
        }
    }
}
