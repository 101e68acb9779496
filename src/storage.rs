use async_trait::async_trait;
use aws_sdk_s3 as s3;
use s3::primitives::ByteStream;
use std::sync::Arc;

/// StorageService
///
/// Abstract contract for the object storage layer holding content images.
/// The concrete implementation is the real S3 client (S3StorageClient) in
/// production and the in-memory mock (MockStorageService) in tests, so
/// upload handlers never depend on a network connection.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Ensures the configured bucket exists. Used in the `Env::Local`
    /// setup to provision the bucket in MinIO. No-op in production.
    async fn ensure_bucket_exists(&self);

    /// Stores an uploaded image under `key` and returns its public URL.
    ///
    /// # Arguments
    /// * `key`: the object key (path + filename) in the bucket.
    /// * `bytes`: the raw file content from the multipart field.
    /// * `content_type`: the MIME type reported by the client.
    async fn upload_image(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, String>;
}

/// S3StorageClient
///
/// The concrete implementation using the AWS SDK for S3. S3 compatibility
/// lets this client transparently handle a Dockerized MinIO instance
/// locally and any S3-compatible provider in production.
///
/// `force_path_style(true)` is required for MinIO-style gateways.
#[derive(Clone)]
pub struct S3StorageClient {
    client: s3::Client,
    endpoint: String,
    bucket_name: String,
}

impl S3StorageClient {
    /// Constructs the S3 client using credentials from AppConfig.
    pub async fn new(
        endpoint: &str,
        region: &str,
        access_key: &str,
        secret_key: &str,
        bucket: &str,
    ) -> Self {
        let credentials =
            s3::config::Credentials::new(access_key, secret_key, None, None, "static");

        let config = s3::Config::builder()
            .credentials_provider(credentials)
            .endpoint_url(endpoint)
            .region(s3::config::Region::new(region.to_string()))
            .behavior_version_latest()
            .force_path_style(true)
            .build();

        Self {
            client: s3::Client::from_conf(config),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket_name: bucket.to_string(),
        }
    }
}

#[async_trait]
impl StorageService for S3StorageClient {
    /// Calls the S3 CreateBucket API. Idempotent: only creates the bucket
    /// if it does not already exist, safe to call at startup.
    async fn ensure_bucket_exists(&self) {
        let _ = self
            .client
            .create_bucket()
            .bucket(&self.bucket_name)
            .send()
            .await;
    }

    async fn upload_image(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, String> {
        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| e.to_string())?;

        // Path-style public URL, matching force_path_style above.
        Ok(format!("{}/{}/{}", self.endpoint, self.bucket_name, key))
    }
}

/// sanitize_key
///
/// Removes directory navigation components (`..`, `.`) from a
/// user-influenced key segment.
pub fn sanitize_key(key: &str) -> String {
    key.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".." && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// MockStorageService
///
/// Mock implementation of `StorageService` used by unit and integration
/// tests, isolating the upload handlers from the network.
#[derive(Clone)]
pub struct MockStorageService {
    /// When true, all operations return a simulated failure.
    pub should_fail: bool,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self { should_fail: false }
    }

    pub fn new_failing() -> Self {
        Self { should_fail: true }
    }
}

impl Default for MockStorageService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn ensure_bucket_exists(&self) {
        // No-op in mock environment.
    }

    async fn upload_image(
        &self,
        key: &str,
        _bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, String> {
        if self.should_fail {
            return Err("Mock Storage Error: Simulation requested".to_string());
        }

        let sanitized_key = sanitize_key(key);
        Ok(format!(
            "http://localhost:9000/mock-bucket/{}",
            sanitized_key
        ))
    }
}

/// StorageState
///
/// The concrete type used to share the storage service across the
/// application state.
pub type StorageState = Arc<dyn StorageService>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_traversal_segments() {
        assert_eq!(sanitize_key("uploads/../etc/passwd"), "uploads/etc/passwd");
        assert_eq!(sanitize_key("./uploads//img.jpg"), "uploads/img.jpg");
        assert_eq!(sanitize_key("uploads/img.jpg"), "uploads/img.jpg");
    }

    #[tokio::test]
    async fn mock_upload_returns_deterministic_url() {
        let storage = MockStorageService::new();
        let url = storage
            .upload_image("uploads/a.jpg", vec![1, 2, 3], "image/jpeg")
            .await
            .unwrap();
        assert_eq!(url, "http://localhost:9000/mock-bucket/uploads/a.jpg");
    }

    #[tokio::test]
    async fn failing_mock_surfaces_error() {
        let storage = MockStorageService::new_failing();
        let result = storage
            .upload_image("uploads/a.jpg", vec![], "image/jpeg")
            .await;
        assert!(result.is_err());
    }
}
