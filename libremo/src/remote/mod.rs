//! Remote image resolution.
//!
//! [`resolve_remote`] turns a parsed reference into a [`RemoteImage`]: it
//! fetches the manifest descriptor through a [`RegistryClient`], surfaces
//! the platforms the registry offers as structured diagnostics,
//! materializes the image content, and wraps everything behind stable
//! display names.

use crate::auth::RegistryOptions;
use crate::client::{ImageContent, ManifestDescriptor, RegistryClient};
use crate::error::Result;
use crate::oci::{self, ManifestKind, Platform};
use crate::reference::{ImageReference, ImplicitReference};

#[cfg(test)]
mod tests;

/// Resolves a reference against a remote registry.
///
/// The flow is fetch, classify, materialize: the descriptor is fetched
/// once, its media type decides whether the document is a multi-platform
/// index or a single image, and the content is then materialized through
/// the same client. Platform metadata is emitted as `tracing` debug events
/// and never influences the result.
///
/// # Errors
///
/// Every failure is returned to the caller as-is, without retry:
/// - `Fetch` when the descriptor cannot be obtained;
/// - `ManifestParse` when an index document does not parse, in which case
///   no materialization is attempted;
/// - `Materialize` when the content cannot be materialized.
pub async fn resolve_remote(
    client: &dyn RegistryClient,
    image_name: &str,
    reference: ImageReference,
    options: &RegistryOptions,
) -> Result<RemoteImage> {
    let descriptor = client.fetch_descriptor(&reference, options).await?;
    tracing::debug!(media_type = %descriptor.media_type(), "Fetched manifest descriptor");

    match ManifestKind::classify(descriptor.media_type()) {
        ManifestKind::Index => {
            let index = oci::parse_index(descriptor.manifest())?;
            for entry in index.manifests() {
                if let Some(platform) = entry.platform() {
                    emit_platform(platform, ManifestKind::Index);
                }
            }
        }
        ManifestKind::Image => {
            if let Some(platform) = descriptor.platform() {
                emit_platform(platform, ManifestKind::Image);
            }
        }
        ManifestKind::Legacy => {
            // Older formats are handed to the client untouched.
        }
    }

    let content = client.materialize(&descriptor).await?;

    Ok(RemoteImage {
        name: image_name.to_string(),
        reference: ImplicitReference::new(reference),
        descriptor,
        content,
    })
}

fn emit_platform(platform: &Platform, kind: ManifestKind) {
    tracing::debug!(
        architecture = %platform.architecture(),
        os = %platform.os(),
        variant = %platform.variant().as_deref().unwrap_or_default(),
        kind = kind.as_str(),
        "Discovered platform"
    );
}

/// A resolved remote image.
///
/// Pure projections over state captured at resolution time; no method
/// performs I/O.
#[derive(Debug, Clone)]
pub struct RemoteImage {
    name: String,
    reference: ImplicitReference,
    descriptor: ManifestDescriptor,
    content: ImageContent,
}

impl RemoteImage {
    /// Returns the image name exactly as the caller supplied it.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the content-derived image identity.
    pub fn id(&self) -> Result<String> {
        self.content.id()
    }

    /// Returns the repository tags for this image.
    ///
    /// Digest-typed references have no tag and yield an empty list;
    /// tag-typed references yield exactly one `repository:tag` entry.
    pub fn repo_tags(&self) -> Vec<String> {
        match self.reference.tag_name() {
            Some(tag) => vec![format!("{}:{}", self.reference.repository_name(), tag)],
            None => Vec::new(),
        }
    }

    /// Returns the repository digests for this image: exactly one
    /// `repository@digest` entry, using the fetched manifest digest.
    pub fn repo_digests(&self) -> Vec<String> {
        vec![format!(
            "{}@{}",
            self.reference.repository_name(),
            self.descriptor.digest()
        )]
    }

    /// Returns the materialized image content.
    pub fn content(&self) -> &ImageContent {
        &self.content
    }

    /// Returns the fetched manifest descriptor.
    pub fn descriptor(&self) -> &ManifestDescriptor {
        &self.descriptor
    }

    /// Returns the normalized reference this image was resolved from.
    pub fn reference(&self) -> &ImplicitReference {
        &self.reference
    }
}
