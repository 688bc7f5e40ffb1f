//! remo - Remote Container Image Resolution Library
//!
//! remo resolves a named container image reference against a remote
//! registry into a normalized, queryable image handle, and aggregates
//! registry credentials from the environment into one options value.
//!
//! # Quick Start
//!
//! ```no_run
//! use libremo::auth::build_registry_options;
//! use libremo::client::RegistryClient;
//! use libremo::reference::ImageReference;
//! use libremo::remote::resolve_remote;
//!
//! async fn resolve(client: &dyn RegistryClient) -> libremo::error::Result<()> {
//!     // Expand the shorthand reference
//!     let reference = ImageReference::parse("ghcr.io/org/app:v1.0")?;
//!
//!     // Collect credentials and flags from REMO_* environment variables
//!     let options = build_registry_options(false, "linux/amd64", false)?;
//!
//!     // Resolve against the registry
//!     let image = resolve_remote(client, "ghcr.io/org/app:v1.0", reference, &options).await?;
//!     println!("{} ({})", image.name(), image.id()?);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - **Credential aggregation**: several username/password pairs supplied
//!   as parallel comma-delimited lists, validated and paired
//! - **Reference normalization**: Docker-style shorthand expanded to fully
//!   qualified references, and rendered back as display names
//! - **Manifest classification**: multi-platform indexes told apart from
//!   single-platform manifests by media type
//! - **Content identity**: image IDs derived from the configuration blob,
//!   independent of names and references
//! - **Injected transport**: all registry I/O behind the
//!   [`RegistryClient`] trait; this crate never opens a connection itself
//!
//! # Main Types
//!
//! - [`RemoteImage`] - A resolved image with stable display names
//! - [`RegistryOptions`] - Aggregated credentials and registry flags
//! - [`ImageReference`] - Image reference parsing and manipulation
//! - [`RegistryClient`] - The registry access capability to implement
//! - [`ManifestKind`] - Media-type classification of fetched manifests
//! - [`Digest`] - Content digest validation and handling

#![warn(clippy::all)]

/// Returns the libremo crate version.
///
/// # Examples
///
/// ```
/// let version = libremo::version();
/// assert!(!version.is_empty());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// Re-export commonly used types for convenience
pub use auth::{Credential, RegistryOptions, build_registry_options};
pub use client::{ImageContent, ManifestDescriptor, RegistryClient};
pub use config::RegistryConfig;
pub use digest::Digest;
pub use error::{RemoError, Result};
pub use oci::ManifestKind;
pub use reference::{ImageReference, ImplicitReference};
pub use remote::{RemoteImage, resolve_remote};

pub mod auth;
pub mod client;
pub mod config;
pub mod digest;
pub mod error;
pub mod oci;
pub mod reference;
pub mod remote;
