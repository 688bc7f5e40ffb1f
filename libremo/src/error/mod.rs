//! Error types for remo
//!
//! This module provides the error taxonomy for every remo operation. All
//! errors implement the standard Error trait, carry an optional underlying
//! source, and propagate to the immediate caller without retry or recovery.

use thiserror::Error;


/// Main error type for remo operations
#[derive(Error, Debug)]
pub enum RemoError {
    /// Registry fetch errors (network, TLS, authentication handshake)
    #[error("Fetch error: {message}")]
    Fetch {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Malformed manifest index bytes
    #[error("Manifest parse error: {message}")]
    ManifestParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Image content materialization failures (content decode)
    #[error("Materialize error: {message}")]
    Materialize {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors (credential list mismatch, bad environment)
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors (invalid reference, invalid digest)
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for remo operations
pub type Result<T> = std::result::Result<T, RemoError>;

impl RemoError {
    /// Creates a new fetch error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libremo::error::RemoError;
    ///
    /// let err = RemoError::fetch("connection refused");
    /// assert!(matches!(err, RemoError::Fetch { .. }));
    /// ```
    pub fn fetch<S: Into<String>>(message: S) -> Self {
        Self::Fetch {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new fetch error with a source error.
    pub fn fetch_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Fetch {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new manifest parse error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libremo::error::RemoError;
    ///
    /// let err = RemoError::manifest_parse("truncated index document");
    /// assert!(matches!(err, RemoError::ManifestParse { .. }));
    /// ```
    pub fn manifest_parse<S: Into<String>>(message: S) -> Self {
        Self::ManifestParse {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new manifest parse error with a source error.
    pub fn manifest_parse_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ManifestParse {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new materialize error.
    pub fn materialize<S: Into<String>>(message: S) -> Self {
        Self::Materialize {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new materialize error with a source error.
    pub fn materialize_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Materialize {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libremo::error::RemoError;
    ///
    /// let err = RemoError::config("username and password counts differ");
    /// assert!(matches!(err, RemoError::Config { .. }));
    /// ```
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new configuration error with a source error.
    pub fn config_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new validation error with a source error.
    pub fn validation_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Validation {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
