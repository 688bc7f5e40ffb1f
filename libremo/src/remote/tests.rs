use super::*;
use crate::digest::Digest;
use crate::error::RemoError;
use crate::oci::{MEDIA_TYPE_MANIFEST_V2, MEDIA_TYPE_OCI_INDEX, MEDIA_TYPE_OCI_MANIFEST};
use async_trait::async_trait;
use std::fmt::Write as _;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{Event, Metadata, Subscriber, span};

const MANIFEST_DIGEST: &str =
    "sha256:e692418e4cbaf90ca69d05a66403747baa33ee08806650b51fab815ad7fc331f";
const INDEX_DIGEST: &str =
    "sha256:7e8b3b4a2f9f4f6b8e2d1c0a9b8c7d6e5f4a3b2c1d0e9f8a7b6c5d4e3f2a1b0c";

const TEST_MANIFEST: &str = r#"{
    "schemaVersion": 2,
    "mediaType": "application/vnd.oci.image.manifest.v1+json",
    "config": {
        "mediaType": "application/vnd.oci.image.config.v1+json",
        "size": 7023,
        "digest": "sha256:b5b2b2c507a0944348e0303114d8d93aaaa081732b86451d9bce1f432a537bc7"
    },
    "layers": [
        {
            "mediaType": "application/vnd.oci.image.layer.v1.tar+gzip",
            "size": 32654,
            "digest": "sha256:9834876dcfb05cb167a5c24953eba58c4ac89b1adf57f28f2f9d09af107ee8f0"
        }
    ]
}"#;

const TEST_INDEX: &str = r#"{
    "schemaVersion": 2,
    "mediaType": "application/vnd.oci.image.index.v1+json",
    "manifests": [
        {
            "mediaType": "application/vnd.oci.image.manifest.v1+json",
            "size": 7143,
            "digest": "sha256:e692418e4cbaf90ca69d05a66403747baa33ee08806650b51fab815ad7fc331f",
            "platform": {
                "architecture": "amd64",
                "os": "linux"
            }
        },
        {
            "mediaType": "application/vnd.oci.image.manifest.v1+json",
            "size": 7682,
            "digest": "sha256:5b0bcabd1ed22e9fb1310cf6c2dec7cdef19f0ad69efa1f392e94a4333501270",
            "platform": {
                "architecture": "arm64",
                "os": "linux",
                "variant": "v8"
            }
        }
    ]
}"#;

const TEST_CONFIG: &str = r#"{
    "architecture": "amd64",
    "os": "linux",
    "rootfs": {
        "type": "layers",
        "diff_ids": [
            "sha256:9834876dcfb05cb167a5c24953eba58c4ac89b1adf57f28f2f9d09af107ee8f0"
        ]
    }
}"#;

fn image_descriptor() -> ManifestDescriptor {
    ManifestDescriptor::new(
        MEDIA_TYPE_OCI_MANIFEST,
        Digest::from_str(MANIFEST_DIGEST).unwrap(),
        None,
        TEST_MANIFEST.as_bytes().to_vec(),
    )
}

fn index_descriptor() -> ManifestDescriptor {
    ManifestDescriptor::new(
        MEDIA_TYPE_OCI_INDEX,
        Digest::from_str(INDEX_DIGEST).unwrap(),
        None,
        TEST_INDEX.as_bytes().to_vec(),
    )
}

fn materialized_content() -> ImageContent {
    ImageContent::new(
        crate::oci::parse_manifest(TEST_MANIFEST.as_bytes()).unwrap(),
        TEST_CONFIG.as_bytes().to_vec(),
    )
}

struct MockClient {
    fetch: std::result::Result<ManifestDescriptor, String>,
    materialize: std::result::Result<ImageContent, String>,
    materialize_calls: AtomicUsize,
}

impl MockClient {
    fn new(descriptor: ManifestDescriptor, content: ImageContent) -> Self {
        Self {
            fetch: Ok(descriptor),
            materialize: Ok(content),
            materialize_calls: AtomicUsize::new(0),
        }
    }

    fn failing_fetch(message: &str) -> Self {
        Self {
            fetch: Err(message.to_string()),
            materialize: Err(message.to_string()),
            materialize_calls: AtomicUsize::new(0),
        }
    }

    fn failing_materialize(descriptor: ManifestDescriptor, message: &str) -> Self {
        Self {
            fetch: Ok(descriptor),
            materialize: Err(message.to_string()),
            materialize_calls: AtomicUsize::new(0),
        }
    }

    fn materialize_calls(&self) -> usize {
        self.materialize_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RegistryClient for MockClient {
    async fn fetch_descriptor(
        &self,
        _reference: &ImageReference,
        _options: &RegistryOptions,
    ) -> Result<ManifestDescriptor> {
        match &self.fetch {
            Ok(descriptor) => Ok(descriptor.clone()),
            Err(message) => Err(RemoError::fetch(message.clone())),
        }
    }

    async fn materialize(&self, _descriptor: &ManifestDescriptor) -> Result<ImageContent> {
        self.materialize_calls.fetch_add(1, Ordering::SeqCst);
        match &self.materialize {
            Ok(content) => Ok(content.clone()),
            Err(message) => Err(RemoError::materialize(message.clone())),
        }
    }
}

/// Records every emitted event as a `field=value` line, so tests can
/// assert on the diagnostics resolution produces.
struct RecordingSubscriber {
    events: Arc<Mutex<Vec<String>>>,
}

impl RecordingSubscriber {
    fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                events: Arc::clone(&events),
            },
            events,
        )
    }
}

struct EventLine(String);

impl Visit for EventLine {
    fn record_str(&mut self, field: &Field, value: &str) {
        let _ = write!(self.0, "{}={} ", field.name(), value);
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let _ = write!(self.0, "{}={:?} ", field.name(), value);
    }
}

impl Subscriber for RecordingSubscriber {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _span: &span::Attributes<'_>) -> span::Id {
        span::Id::from_u64(1)
    }

    fn record(&self, _span: &span::Id, _values: &span::Record<'_>) {}

    fn record_follows_from(&self, _span: &span::Id, _follows: &span::Id) {}

    fn event(&self, event: &Event<'_>) {
        let mut line = EventLine(String::new());
        event.record(&mut line);
        self.events.lock().unwrap().push(line.0);
    }

    fn enter(&self, _span: &span::Id) {}

    fn exit(&self, _span: &span::Id) {}
}

#[tokio::test]
async fn test_resolve_tag_reference() {
    let client = MockClient::new(image_descriptor(), materialized_content());
    let reference = ImageReference::parse("nginx:1.25").unwrap();

    let image = resolve_remote(&client, "nginx:1.25", reference, &RegistryOptions::default())
        .await
        .unwrap();

    assert_eq!(image.name(), "nginx:1.25");
    assert_eq!(image.repo_tags(), vec!["nginx:1.25".to_string()]);
    assert_eq!(
        image.repo_digests(),
        vec![format!("nginx@{}", MANIFEST_DIGEST)]
    );
    assert_eq!(client.materialize_calls(), 1);
}

#[tokio::test]
async fn test_resolve_digest_reference_has_no_repo_tags() {
    let client = MockClient::new(image_descriptor(), materialized_content());
    let input = format!("ghcr.io/org/app@{}", MANIFEST_DIGEST);
    let reference = ImageReference::parse(&input).unwrap();

    let image = resolve_remote(&client, &input, reference, &RegistryOptions::default())
        .await
        .unwrap();

    assert!(image.repo_tags().is_empty());
    assert_eq!(
        image.repo_digests(),
        vec![format!("ghcr.io/org/app@{}", MANIFEST_DIGEST)]
    );
}

#[tokio::test]
async fn test_resolve_multi_platform_index() {
    let client = MockClient::new(index_descriptor(), materialized_content());
    let reference = ImageReference::parse("nginx:latest").unwrap();

    let image = resolve_remote(&client, "nginx:latest", reference, &RegistryOptions::default())
        .await
        .unwrap();

    // The index lists two platforms, but resolution still yields exactly
    // one image from exactly one materialization.
    assert_eq!(client.materialize_calls(), 1);
    assert_eq!(image.descriptor().media_type(), MEDIA_TYPE_OCI_INDEX);
    assert_eq!(
        image.repo_digests(),
        vec![format!("nginx@{}", INDEX_DIGEST)]
    );
}

#[tokio::test]
async fn test_fetch_error_propagates() {
    let client = MockClient::failing_fetch("registry unreachable");
    let reference = ImageReference::parse("nginx").unwrap();

    let result = resolve_remote(&client, "nginx", reference, &RegistryOptions::default()).await;

    assert!(matches!(result.unwrap_err(), RemoError::Fetch { .. }));
    assert_eq!(client.materialize_calls(), 0);
}

#[tokio::test]
async fn test_malformed_index_aborts_before_materialize() {
    let descriptor = ManifestDescriptor::new(
        MEDIA_TYPE_OCI_INDEX,
        Digest::from_str(INDEX_DIGEST).unwrap(),
        None,
        b"{ this is not an index".to_vec(),
    );
    let client = MockClient::new(descriptor, materialized_content());
    let reference = ImageReference::parse("nginx").unwrap();

    let result = resolve_remote(&client, "nginx", reference, &RegistryOptions::default()).await;

    assert!(matches!(
        result.unwrap_err(),
        RemoError::ManifestParse { .. }
    ));
    assert_eq!(client.materialize_calls(), 0);
}

#[tokio::test]
async fn test_materialize_error_propagates() {
    let client = MockClient::failing_materialize(image_descriptor(), "missing config blob");
    let reference = ImageReference::parse("nginx").unwrap();

    let result = resolve_remote(&client, "nginx", reference, &RegistryOptions::default()).await;

    assert!(matches!(
        result.unwrap_err(),
        RemoError::Materialize { .. }
    ));
    assert_eq!(client.materialize_calls(), 1);
}

#[tokio::test]
async fn test_legacy_media_type_is_opaque() {
    // Nothing inspects a legacy document, so even unparseable bytes pass
    // straight through to materialization.
    let descriptor = ManifestDescriptor::new(
        "application/vnd.docker.distribution.manifest.v1+prettyjws",
        Digest::from_str(MANIFEST_DIGEST).unwrap(),
        None,
        b"\x00not a manifest".to_vec(),
    );
    let client = MockClient::new(descriptor, materialized_content());
    let reference = ImageReference::parse("nginx:1.25").unwrap();

    let image = resolve_remote(&client, "nginx:1.25", reference, &RegistryOptions::default())
        .await
        .unwrap();

    assert_eq!(image.repo_tags(), vec!["nginx:1.25".to_string()]);
    assert_eq!(client.materialize_calls(), 1);
}

#[tokio::test]
async fn test_image_descriptor_with_platform() {
    let index = crate::oci::parse_index(TEST_INDEX.as_bytes()).unwrap();
    let platform = index.manifests()[0].platform().clone();
    let descriptor = ManifestDescriptor::new(
        MEDIA_TYPE_MANIFEST_V2,
        Digest::from_str(MANIFEST_DIGEST).unwrap(),
        platform,
        TEST_MANIFEST.as_bytes().to_vec(),
    );
    let client = MockClient::new(descriptor, materialized_content());
    let reference = ImageReference::parse("nginx").unwrap();

    let image = resolve_remote(&client, "nginx", reference, &RegistryOptions::default())
        .await
        .unwrap();

    assert_eq!(
        image.descriptor().platform().unwrap().architecture().to_string(),
        "amd64"
    );
}

#[tokio::test]
async fn test_name_is_stored_verbatim() {
    let client = MockClient::new(image_descriptor(), materialized_content());
    let reference = ImageReference::parse("docker.io/library/nginx:1.25").unwrap();

    let image = resolve_remote(
        &client,
        "docker.io/library/nginx:1.25",
        reference,
        &RegistryOptions::default(),
    )
    .await
    .unwrap();

    // The name is never rewritten, even though display names are.
    assert_eq!(image.name(), "docker.io/library/nginx:1.25");
    assert_eq!(image.repo_tags(), vec!["nginx:1.25".to_string()]);
}

#[tokio::test]
async fn test_id_is_config_blob_digest() {
    let client = MockClient::new(image_descriptor(), materialized_content());
    let reference = ImageReference::parse("nginx").unwrap();

    let image = resolve_remote(&client, "nginx", reference, &RegistryOptions::default())
        .await
        .unwrap();

    use sha2::{Digest as Sha2Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(TEST_CONFIG.as_bytes());
    let expected = format!("sha256:{:x}", hasher.finalize());

    assert_eq!(image.id().unwrap(), expected);
}

// The diagnostics tests install a thread-local subscriber, so they drive
// the future with `tokio_test::block_on` on the current thread instead of
// `#[tokio::test]`.

#[test]
fn test_index_resolution_reports_each_platform() {
    let (subscriber, events) = RecordingSubscriber::new();

    tracing::subscriber::with_default(subscriber, || {
        tokio_test::block_on(async {
            let client = MockClient::new(index_descriptor(), materialized_content());
            let reference = ImageReference::parse("nginx:latest").unwrap();
            resolve_remote(&client, "nginx:latest", reference, &RegistryOptions::default())
                .await
                .unwrap();
        });
    });

    let events = events.lock().unwrap();
    let platforms: Vec<&String> = events
        .iter()
        .filter(|line| line.contains("Discovered platform"))
        .collect();

    assert_eq!(platforms.len(), 2);
    assert!(platforms[0].contains("architecture=amd64"));
    assert!(platforms[0].contains("os=linux"));
    assert!(platforms[0].contains("kind=index"));
    assert!(platforms[1].contains("architecture=arm64"));
    assert!(platforms[1].contains("os=linux"));
    assert!(platforms[1].contains("variant=v8"));
}

#[test]
fn test_image_resolution_reports_descriptor_platform() {
    let (subscriber, events) = RecordingSubscriber::new();

    tracing::subscriber::with_default(subscriber, || {
        tokio_test::block_on(async {
            let index = crate::oci::parse_index(TEST_INDEX.as_bytes()).unwrap();
            let platform = index.manifests()[0].platform().clone();
            let descriptor = ManifestDescriptor::new(
                MEDIA_TYPE_MANIFEST_V2,
                Digest::from_str(MANIFEST_DIGEST).unwrap(),
                platform,
                TEST_MANIFEST.as_bytes().to_vec(),
            );
            let client = MockClient::new(descriptor, materialized_content());
            let reference = ImageReference::parse("nginx").unwrap();
            resolve_remote(&client, "nginx", reference, &RegistryOptions::default())
                .await
                .unwrap();
        });
    });

    let events = events.lock().unwrap();
    let platforms: Vec<&String> = events
        .iter()
        .filter(|line| line.contains("Discovered platform"))
        .collect();

    assert_eq!(platforms.len(), 1);
    assert!(platforms[0].contains("architecture=amd64"));
    assert!(platforms[0].contains("kind=image"));
}
