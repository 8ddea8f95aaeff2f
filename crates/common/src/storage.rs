//! Object storage abstraction for listing media uploads.
//!
//! Supports both local filesystem and S3-compatible object storage, plus
//! HMAC-signed upload URLs so clients can PUT media without holding a
//! bearer token for the storage host.

use std::path::PathBuf;

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

/// Uploaded file metadata.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Storage key (path or object key).
    pub key: String,
    /// Public URL to access the file.
    pub url: String,
    /// File size in bytes.
    pub size: u64,
    /// MIME content type.
    pub content_type: String,
    /// MD5 hash of the file.
    pub md5: String,
}

/// Storage backend trait.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Upload a file.
    async fn upload(&self, key: &str, data: &[u8], content_type: &str) -> AppResult<UploadedFile>;

    /// Get the public URL for a key.
    fn public_url(&self, key: &str) -> String;
}

/// Local filesystem storage backend.
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new local storage backend.
    #[must_use]
    pub const fn new(base_path: PathBuf, base_url: String) -> Self {
        Self {
            base_path,
            base_url,
        }
    }
}

#[async_trait::async_trait]
impl StorageBackend for LocalStorage {
    async fn upload(&self, key: &str, data: &[u8], content_type: &str) -> AppResult<UploadedFile> {
        let path = self.base_path.join(key);

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to create directory: {e}")))?;
        }

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write file: {e}")))?;

        let md5 = format!("{:x}", md5::compute(data));

        Ok(UploadedFile {
            key: key.to_string(),
            url: self.public_url(key),
            size: data.len() as u64,
            content_type: content_type.to_string(),
            md5,
        })
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

/// S3-compatible object storage backend.
#[cfg(feature = "s3")]
pub struct S3Storage {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_url: Option<String>,
    prefix: Option<String>,
}

#[cfg(feature = "s3")]
impl S3Storage {
    /// Create a new S3 storage backend.
    pub async fn new(
        endpoint: &str,
        bucket: String,
        region: &str,
        access_key_id: &str,
        secret_access_key: &str,
        public_url: Option<String>,
        prefix: Option<String>,
    ) -> AppResult<Self> {
        use aws_config::Region;
        use aws_sdk_s3::config::Credentials;

        let credentials = Credentials::new(access_key_id, secret_access_key, None, None, "casaflow");

        let config = aws_sdk_s3::Config::builder()
            .endpoint_url(endpoint)
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        let client = aws_sdk_s3::Client::from_conf(config);

        Ok(Self {
            client,
            bucket,
            public_url,
            prefix,
        })
    }

    fn full_key(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}/{}", prefix.trim_end_matches('/'), key),
            None => key.to_string(),
        }
    }
}

#[cfg(feature = "s3")]
#[async_trait::async_trait]
impl StorageBackend for S3Storage {
    async fn upload(&self, key: &str, data: &[u8], content_type: &str) -> AppResult<UploadedFile> {
        use aws_sdk_s3::primitives::ByteStream;

        let full_key = self.full_key(key);
        let md5 = format!("{:x}", md5::compute(data));

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&full_key)
            .body(ByteStream::from(data.to_vec()))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

        Ok(UploadedFile {
            key: key.to_string(),
            url: self.public_url(key),
            size: data.len() as u64,
            content_type: content_type.to_string(),
            md5,
        })
    }

    fn public_url(&self, key: &str) -> String {
        let full_key = self.full_key(key);
        match &self.public_url {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), full_key),
            None => format!("https://{}.s3.amazonaws.com/{}", self.bucket, full_key),
        }
    }
}

/// A signed upload grant handed to the client.
#[derive(Debug, Clone)]
pub struct SignedUpload {
    /// Storage key the client must upload to.
    pub key: String,
    /// URL the client PUTs the file to.
    pub upload_url: String,
    /// Public URL the file will be served from.
    pub public_url: String,
    /// Unix timestamp after which the grant is invalid.
    pub expires_at: i64,
}

/// Signs and verifies upload URLs for the local backend.
///
/// The signature covers `{key}\n{expires_at}` with HMAC-SHA256, so a grant
/// cannot be replayed for another key or extended past its expiry.
#[derive(Clone)]
pub struct UploadUrlSigner {
    secret: Vec<u8>,
    base_url: String,
}

impl UploadUrlSigner {
    /// Create a new signer.
    ///
    /// `base_url` is the public URL of the server, e.g. `https://api.example.com`.
    #[must_use]
    pub fn new(secret: &str, base_url: &str) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn signature(&self, key: &str, expires_at: i64) -> AppResult<String> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| AppError::Internal(format!("HMAC init failed: {e}")))?;
        mac.update(key.as_bytes());
        mac.update(b"\n");
        mac.update(expires_at.to_string().as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Sign an upload grant for `key`, valid for `ttl_minutes`.
    pub fn sign(&self, key: &str, public_url: String, ttl_minutes: i64) -> AppResult<SignedUpload> {
        let expires_at = Utc::now().timestamp() + ttl_minutes * 60;
        let sig = self.signature(key, expires_at)?;

        Ok(SignedUpload {
            key: key.to_string(),
            upload_url: format!(
                "{}/api/upload/{key}?expires={expires_at}&signature={sig}",
                self.base_url
            ),
            public_url,
            expires_at,
        })
    }

    /// Verify a signature presented at upload time.
    pub fn verify(&self, key: &str, expires_at: i64, signature: &str) -> AppResult<()> {
        if expires_at < Utc::now().timestamp() {
            return Err(AppError::BadRequest("Upload URL has expired".to_string()));
        }

        // Constant-time comparison via the Mac verify API
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| AppError::Internal(format!("HMAC init failed: {e}")))?;
        mac.update(key.as_bytes());
        mac.update(b"\n");
        mac.update(expires_at.to_string().as_bytes());

        let decoded = hex::decode(signature)
            .map_err(|_| AppError::BadRequest("Malformed upload signature".to_string()))?;
        mac.verify_slice(&decoded)
            .map_err(|_| AppError::BadRequest("Invalid upload signature".to_string()))
    }
}

/// Generate a unique storage key for a file.
#[must_use]
pub fn generate_storage_key(agency_id: &str, original_name: &str) -> String {
    let now = Utc::now();
    let date_path = now.format("%Y/%m/%d").to_string();
    let timestamp = now.timestamp_millis();

    // Extract extension from original name
    let extension = original_name
        .rfind('.')
        .filter(|&pos| pos > 0 && pos < original_name.len() - 1)
        .map(|pos| &original_name[pos + 1..])
        .filter(|ext| ext.len() <= 10 && !ext.is_empty())
        .unwrap_or("bin");

    format!(
        "{}/{}/{}_{}.{}",
        date_path,
        agency_id,
        timestamp,
        uuid::Uuid::new_v4(),
        extension
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_storage_key() {
        let key = generate_storage_key("agency123", "photo.jpg");
        assert!(key.contains("agency123"));
        assert!(key.ends_with(".jpg"));
        assert!(key.contains('/'));
    }

    #[test]
    fn test_generate_storage_key_no_extension() {
        let key = generate_storage_key("agency123", "file");
        assert!(key.ends_with(".bin"));
    }

    #[test]
    fn test_sign_and_verify() {
        let signer = UploadUrlSigner::new("secret", "https://api.example.com/");
        let grant = signer
            .sign("2024/06/01/a/photo.jpg", "/files/x.jpg".into(), 15)
            .unwrap();

        assert!(grant.upload_url.starts_with("https://api.example.com/api/upload/"));
        assert!(grant.expires_at > Utc::now().timestamp());

        // Extract the signature back out of the URL
        let sig = grant
            .upload_url
            .rsplit("signature=")
            .next()
            .unwrap()
            .to_string();
        signer
            .verify("2024/06/01/a/photo.jpg", grant.expires_at, &sig)
            .unwrap();
    }

    #[test]
    fn test_verify_rejects_wrong_key() {
        let signer = UploadUrlSigner::new("secret", "https://api.example.com");
        let grant = signer.sign("a.jpg", "/files/a.jpg".into(), 15).unwrap();
        let sig = grant.upload_url.rsplit("signature=").next().unwrap();

        assert!(signer.verify("b.jpg", grant.expires_at, sig).is_err());
    }

    #[test]
    fn test_verify_rejects_expired() {
        let signer = UploadUrlSigner::new("secret", "https://api.example.com");
        let expired = Utc::now().timestamp() - 60;
        let sig = signer.signature("a.jpg", expired).unwrap();

        assert!(signer.verify("a.jpg", expired, &sig).is_err());
    }
}
