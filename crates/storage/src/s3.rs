//! S3-compatible blob store.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_credential_types::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use crate::{Blob, BlobStore, StorageError, DEFAULT_BUCKET};

/// Connection settings for an S3-compatible endpoint.
#[derive(Debug, Clone)]
pub struct S3Settings {
    pub bucket: String,
    /// Custom endpoint (hosted S3-compatible providers). `None` uses AWS.
    pub endpoint: Option<String>,
    pub region: String,
    /// Static keys. When absent the default AWS credential chain is used.
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl Default for S3Settings {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            endpoint: None,
            region: "us-east-1".to_string(),
            access_key_id: None,
            secret_access_key: None,
        }
    }
}

#[derive(Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
}

impl S3BlobStore {
    pub async fn connect(settings: &S3Settings) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()));
        if let (Some(key), Some(secret)) = (&settings.access_key_id, &settings.secret_access_key) {
            loader = loader.credentials_provider(Credentials::new(
                key.clone(),
                secret.clone(),
                None,
                None,
                "doctrack-static",
            ));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &settings.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        tracing::info!(bucket = %settings.bucket, endpoint = ?settings.endpoint, "Blob store configured");
        Self {
            client: Client::from_conf(builder.build()),
            bucket: settings.bucket.clone(),
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn exists(&self, name: &str) -> Result<bool, StorageError> {
        match self.client.head_object().bucket(&self.bucket).key(name).send().await {
            Ok(_) => Ok(true),
            Err(err) if err.as_service_error().is_some_and(|e| e.is_not_found()) => Ok(false),
            Err(err) => Err(StorageError::Backend(DisplayErrorContext(&err).to_string())),
        }
    }

    async fn upload(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(name)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|err| StorageError::Backend(DisplayErrorContext(&err).to_string()))?;
        tracing::debug!(name, size, "Object uploaded");
        Ok(())
    }

    async fn download(&self, name: &str) -> Result<Blob, StorageError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(name)
            .send()
            .await
            .map_err(|err| {
                if err.as_service_error().is_some_and(|e| e.is_no_such_key()) {
                    StorageError::NotFound(name.to_string())
                } else {
                    StorageError::Backend(DisplayErrorContext(&err).to_string())
                }
            })?;

        let content_type = output.content_type().map(str::to_string);
        let data = output
            .body
            .collect()
            .await
            .map_err(|err| StorageError::Backend(err.to_string()))?;
        Ok(Blob {
            bytes: data.into_bytes().to_vec(),
            content_type,
        })
    }
}
