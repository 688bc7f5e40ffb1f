//! Image reference parsing and display-name normalization.
//!
//! This module wraps the `oci_spec::distribution::Reference` parser to
//! integrate with remo's error handling. The wrapped parser validates the
//! distribution reference grammar and expands Docker-style shorthand:
//! `nginx` means `docker.io/library/nginx:latest`, `myuser/app:v1` means
//! `docker.io/myuser/app:v1`, and `ghcr.io/org/app@sha256:...` is already
//! fully qualified. [`ImplicitReference`] renders the parsed components
//! back into the short display names users expect.

use crate::digest::Digest;
use crate::error::{RemoError, Result};
use oci_spec::distribution::Reference as OciReference;
use std::fmt;
use std::str::FromStr;


/// Default registry when none is specified.
///
/// The wrapped parser folds the legacy `index.docker.io` spelling into
/// this canonical host before any component is stored, so comparisons
/// against this constant cover both spellings.
pub const DEFAULT_REGISTRY: &str = "docker.io";

/// Default tag when neither a tag nor a digest is specified.
const DEFAULT_TAG: &str = "latest";

/// Tag or digest identifier for an image.
///
/// A tag is a mutable pointer the registry may re-point at any time; a
/// digest is an immutable content address. A reference carrying both is
/// digest-typed, since content addressing is what a resolver acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    /// Named tag (e.g., `latest`, `v1.0`).
    Tag(String),
    /// Content-addressable digest (e.g., `sha256:abc123...`).
    Digest(Digest),
}

/// Parsed image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    registry: String,
    repository: String,
    identifier: Identifier,
}

impl ImageReference {
    /// Parses and validates an image reference string.
    ///
    /// Parsing is delegated to `oci_spec::distribution::Reference`, which
    /// enforces the distribution reference grammar (lowercase repository
    /// names, well-formed digests) and expands the usual shorthand:
    ///
    /// - `nginx` → `docker.io/library/nginx:latest`
    /// - `nginx:1.25` → `docker.io/library/nginx:1.25`
    /// - `myuser/myimage` → `docker.io/myuser/myimage:latest`
    /// - `index.docker.io/nginx` → `docker.io/library/nginx:latest`
    /// - `ghcr.io/org/image@sha256:...` → digest-typed reference
    ///
    /// # Examples
    ///
    /// ```
    /// use libremo::reference::ImageReference;
    ///
    /// let reference = ImageReference::parse("nginx:1.25")?;
    /// assert_eq!(reference.registry(), "docker.io");
    /// assert_eq!(reference.repository(), "library/nginx");
    /// assert_eq!(reference.tag(), Some("1.25"));
    /// # Ok::<(), libremo::error::RemoError>(())
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(RemoError::validation("image reference is empty"));
        }

        let reference = OciReference::from_str(input).map_err(|e| RemoError::Validation {
            message: format!("Invalid image reference: {}", e),
            source: Some(Box::new(e)),
        })?;

        // A reference carrying both a tag and a digest is digest-typed;
        // content addressing supersedes the tag.
        let identifier = match reference.digest() {
            Some(digest) => Identifier::Digest(Digest::from_str(digest)?),
            None => Identifier::Tag(reference.tag().unwrap_or(DEFAULT_TAG).to_string()),
        };

        Ok(ImageReference {
            registry: reference.registry().to_string(),
            repository: reference.repository().to_string(),
            identifier,
        })
    }

    /// Returns the registry part of the reference.
    pub fn registry(&self) -> &str {
        &self.registry
    }

    /// Returns the repository part of the reference.
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Returns the tag identifier, or `None` for digest-typed references.
    pub fn tag(&self) -> Option<&str> {
        match &self.identifier {
            Identifier::Tag(tag) => Some(tag),
            Identifier::Digest(_) => None,
        }
    }

    /// Returns the digest identifier, or `None` for tag-typed references.
    pub fn digest(&self) -> Option<&Digest> {
        match &self.identifier {
            Identifier::Tag(_) => None,
            Identifier::Digest(digest) => Some(digest),
        }
    }

    /// Returns the identifier (tag or digest).
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }
}

impl FromStr for ImageReference {
    type Err = RemoError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.registry, self.repository)?;
        match &self.identifier {
            Identifier::Tag(tag) => write!(f, ":{}", tag),
            Identifier::Digest(digest) => write!(f, "@{}", digest),
        }
    }
}

/// Display-name view of a parsed reference.
///
/// Parsing expands shorthand into fully qualified components; this wrapper
/// undoes the expansion for presentation. Repositories on the default
/// registry drop the implied "library/" namespace and the registry itself,
/// so `docker.io/library/nginx` reads as `nginx` again, while any other
/// registry stays spelled out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplicitReference {
    reference: ImageReference,
}

impl ImplicitReference {
    /// Wraps a parsed reference.
    pub fn new(reference: ImageReference) -> Self {
        ImplicitReference { reference }
    }

    /// Returns the tag, or `None` for digest-typed references.
    pub fn tag_name(&self) -> Option<&str> {
        self.reference.tag()
    }

    /// Returns the display repository name.
    ///
    /// For the default registry the repository is returned with one leading
    /// "library/" segment stripped; repositories without the prefix pass
    /// through unchanged. For any other registry the result is
    /// `<registry>/<repository>`, including a "library/" segment if the
    /// repository genuinely has one there.
    pub fn repository_name(&self) -> String {
        let repository = self.reference.repository();
        if self.reference.registry() != DEFAULT_REGISTRY {
            return format!("{}/{}", self.reference.registry(), repository);
        }
        match repository.strip_prefix("library/") {
            Some(stripped) => stripped.to_string(),
            None => repository.to_string(),
        }
    }

    /// Returns the underlying parsed reference.
    pub fn reference(&self) -> &ImageReference {
        &self.reference
    }
}
