//! OCI manifest data model and media-type classification.
//!
//! This module re-exports the manifest data structures from the `oci-spec`
//! crate as the single source for OCI types within `libremo`, and adds the
//! media-type classification that decides how a fetched manifest is handled.

pub use oci_spec::image::{Descriptor, ImageConfiguration, ImageIndex, ImageManifest, Platform};

use crate::error::{RemoError, Result};


// Well-known manifest media types.
pub const MEDIA_TYPE_MANIFEST_V2: &str = "application/vnd.docker.distribution.manifest.v2+json";
pub const MEDIA_TYPE_MANIFEST_LIST: &str =
    "application/vnd.docker.distribution.manifest.list.v2+json";
pub const MEDIA_TYPE_OCI_MANIFEST: &str = "application/vnd.oci.image.manifest.v1+json";
pub const MEDIA_TYPE_OCI_INDEX: &str = "application/vnd.oci.image.index.v1+json";

/// How a fetched manifest is handled, decided by its media type.
///
/// A registry answers a manifest request with one of several document
/// shapes: a multi-platform index (OCI image index or Docker manifest
/// list), a single-platform image manifest (OCI or Docker v2), or an older
/// format. Only the first two are inspected; everything else passes
/// through opaquely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    /// Multi-platform manifest index
    Index,
    /// Single-platform image manifest
    Image,
    /// Older or unrecognized format, treated as opaque
    Legacy,
}

impl ManifestKind {
    /// Classifies a manifest media type.
    ///
    /// # Examples
    ///
    /// ```
    /// use libremo::oci::{MEDIA_TYPE_OCI_INDEX, ManifestKind};
    ///
    /// assert_eq!(ManifestKind::classify(MEDIA_TYPE_OCI_INDEX), ManifestKind::Index);
    /// assert_eq!(ManifestKind::classify("application/octet-stream"), ManifestKind::Legacy);
    /// ```
    pub fn classify(media_type: &str) -> Self {
        match media_type {
            MEDIA_TYPE_OCI_INDEX | MEDIA_TYPE_MANIFEST_LIST => ManifestKind::Index,
            MEDIA_TYPE_OCI_MANIFEST | MEDIA_TYPE_MANIFEST_V2 => ManifestKind::Image,
            _ => ManifestKind::Legacy,
        }
    }

    /// Short name used in diagnostic fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            ManifestKind::Index => "index",
            ManifestKind::Image => "image",
            ManifestKind::Legacy => "legacy",
        }
    }
}

/// Parses raw bytes into a multi-platform image index.
pub fn parse_index(bytes: &[u8]) -> Result<ImageIndex> {
    serde_json::from_slice(bytes)
        .map_err(|e| RemoError::manifest_parse_with_source("Failed to parse image index", e))
}

/// Parses raw bytes into a single-platform image manifest.
pub fn parse_manifest(bytes: &[u8]) -> Result<ImageManifest> {
    serde_json::from_slice(bytes)
        .map_err(|e| RemoError::manifest_parse_with_source("Failed to parse image manifest", e))
}
