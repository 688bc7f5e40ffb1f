//! Content digest validation and display.
//!
//! This module provides a wrapper around the `oci_spec::image::Digest` type
//! to integrate with remo's error handling and provide a consistent API.

use crate::error::{RemoError, Result};
use oci_spec::image::Digest as OciDigest;
use std::fmt;
use std::str::FromStr;


/// Represents a content digest, wrapping the `oci_spec::image::Digest` type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest(OciDigest);

impl Digest {
    /// Returns the algorithm portion of the digest (e.g., "sha256").
    pub fn algorithm(&self) -> String {
        self.0.algorithm().to_string()
    }

    /// Returns the encoded hash portion of the digest, without the
    /// algorithm prefix.
    pub fn encoded(&self) -> &str {
        self.0.digest()
    }
}

impl FromStr for Digest {
    type Err = RemoError;

    fn from_str(s: &str) -> Result<Self> {
        let oci_digest = OciDigest::from_str(s).map_err(|e| RemoError::Validation {
            message: format!("Invalid digest format: {}", e),
            source: Some(Box::new(e)),
        })?;
        Ok(Digest(oci_digest))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
