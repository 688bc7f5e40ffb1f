//! Registry access capability.
//!
//! Network transport, TLS, the authentication handshake, and platform
//! selection for multi-platform indexes all live behind the
//! [`RegistryClient`] trait. The resolver in [`crate::remote`] drives the
//! trait and owns the classification and naming logic; implementations own
//! the wire.

use async_trait::async_trait;
use sha2::{Digest as Sha2Digest, Sha256};

use crate::auth::RegistryOptions;
use crate::digest::Digest;
use crate::error::{RemoError, Result};
use crate::oci::{ImageConfiguration, ImageManifest, Platform};
use crate::reference::ImageReference;


/// Descriptor for a fetched manifest document.
///
/// Carries the registry's answer to a manifest request: the declared media
/// type, the content digest, the platform when the registry advertises one,
/// and the raw document bytes. Immutable once obtained.
#[derive(Debug, Clone)]
pub struct ManifestDescriptor {
    media_type: String,
    digest: Digest,
    platform: Option<Platform>,
    manifest: Vec<u8>,
}

impl ManifestDescriptor {
    /// Creates a descriptor from a fetched manifest document.
    pub fn new(
        media_type: impl Into<String>,
        digest: Digest,
        platform: Option<Platform>,
        manifest: Vec<u8>,
    ) -> Self {
        Self {
            media_type: media_type.into(),
            digest,
            platform,
            manifest,
        }
    }

    /// Returns the declared media type.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Returns the content digest of the manifest document.
    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    /// Returns the platform advertised for this manifest, if any.
    pub fn platform(&self) -> Option<&Platform> {
        self.platform.as_ref()
    }

    /// Returns the raw manifest document bytes.
    pub fn manifest(&self) -> &[u8] {
        &self.manifest
    }
}

/// Materialized image content: the selected image manifest plus the raw
/// image-configuration blob.
///
/// For a multi-platform fetch the manifest here is the child the client
/// selected, not the index itself.
#[derive(Debug, Clone)]
pub struct ImageContent {
    manifest: ImageManifest,
    config_raw: Vec<u8>,
}

impl ImageContent {
    /// Creates image content from a manifest and its configuration blob.
    pub fn new(manifest: ImageManifest, config_raw: Vec<u8>) -> Self {
        Self {
            manifest,
            config_raw,
        }
    }

    /// Returns the image manifest.
    pub fn manifest(&self) -> &ImageManifest {
        &self.manifest
    }

    /// Returns the raw image-configuration blob bytes.
    pub fn config_raw(&self) -> &[u8] {
        &self.config_raw
    }

    /// Decodes the image configuration.
    pub fn configuration(&self) -> Result<ImageConfiguration> {
        serde_json::from_slice(&self.config_raw).map_err(|e| {
            RemoError::materialize_with_source("Failed to decode image configuration", e)
        })
    }

    /// Returns the image identity: the digest of the configuration blob,
    /// rendered as `sha256:<hex>`.
    ///
    /// Identity depends only on content. Two images with identical
    /// configuration blobs share an identity no matter what names or
    /// references they were resolved through.
    pub fn id(&self) -> Result<String> {
        if self.config_raw.is_empty() {
            return Err(RemoError::materialize("image has no configuration blob"));
        }
        let mut hasher = Sha256::new();
        hasher.update(&self.config_raw);
        Ok(format!("sha256:{:x}", hasher.finalize()))
    }
}

/// Capability for talking to a remote registry.
///
/// Implementations decide transport, TLS posture, credential use, and how
/// an index's child manifest is selected. Both operations are plain
/// futures; dropping a future cancels the operation.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Fetches the manifest descriptor for a reference.
    ///
    /// The options carry credentials and TLS flags; how they are applied
    /// is the implementation's business.
    async fn fetch_descriptor(
        &self,
        reference: &ImageReference,
        options: &RegistryOptions,
    ) -> Result<ManifestDescriptor>;

    /// Materializes the image content behind a fetched descriptor.
    ///
    /// When the descriptor is a multi-platform index, the implementation
    /// selects the child manifest (honoring any platform constraint it was
    /// configured with) before materializing.
    async fn materialize(&self, descriptor: &ManifestDescriptor) -> Result<ImageContent>;
}
