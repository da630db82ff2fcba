use crate::config::{Config, UPLOAD_CONTENT_TYPE};
use crate::error::ServiceError;
use async_trait::async_trait;
use aws_sdk_s3 as s3;
use s3::error::DisplayErrorContext;
use s3::presigning::PresigningConfig;
use s3::primitives::ByteStream;
use std::time::Duration;

/// Parameters handed to the signer for a single PUT of one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUrlRequest {
    pub bucket: String,
    pub key: String,
    pub content_type: String,
    pub expires_in: Duration,
}

impl SignedUrlRequest {
    pub fn upload(cfg: &Config, key: String) -> Self {
        SignedUrlRequest {
            bucket: cfg.raw_bucket.clone(),
            key,
            content_type: UPLOAD_CONTENT_TYPE.to_string(),
            expires_in: cfg.upload_expiry(),
        }
    }
}

#[async_trait]
pub trait UploadSigner: Send + Sync {
    /// Computes a signed PUT url. Never touches the stored objects.
    async fn presign_put(&self, req: &SignedUrlRequest) -> Result<String, ServiceError>;
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ServiceError>;

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ServiceError>;
}

fn storage_err<E: std::error::Error>(err: E) -> ServiceError {
    ServiceError::Storage(DisplayErrorContext(err).to_string())
}

#[async_trait]
impl UploadSigner for s3::Client {
    async fn presign_put(&self, req: &SignedUrlRequest) -> Result<String, ServiceError> {
        let presigning = PresigningConfig::expires_in(req.expires_in).map_err(storage_err)?;
        let presigned_url = self
            .put_object()
            .bucket(&req.bucket)
            .key(&req.key)
            .content_type(&req.content_type)
            .presigned(presigning)
            .await
            .map_err(storage_err)?;

        Ok(presigned_url.uri().to_string())
    }
}

#[async_trait]
impl ObjectStorage for s3::Client {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ServiceError> {
        let cmd_output = self
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(storage_err)?;
        let data = cmd_output.body.collect().await.map_err(storage_err)?;

        Ok(data.into_bytes().to_vec())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ServiceError> {
        self.put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(storage_err)?;

        Ok(())
    }
}
