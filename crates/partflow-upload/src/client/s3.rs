//! AWS S3 object store client (requires the `s3` feature).

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::types::{
    CompletedMultipartUpload, CompletedPart as S3CompletedPart, ObjectCannedAcl, RequestPayer,
    ServerSideEncryption,
};
use bytes::Bytes;

use partflow_core::config::store::S3StoreConfig;
use partflow_core::error::{AppError, ErrorKind};
use partflow_core::result::AppResult;
use partflow_core::traits::ObjectStoreClient;
use partflow_core::types::{CompletedPart, FinalizeOutcome, UploadRequestConfig, UploadTarget};

/// [`ObjectStoreClient`] backed by the AWS S3 SDK.
///
/// Works against AWS as well as S3-compatible stores (MinIO, etc.) via
/// the endpoint override in [`S3StoreConfig`].
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    /// Wrap an already-configured SDK client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from PartFlow configuration.
    ///
    /// Empty credential fields fall through to the SDK's ambient
    /// credential chain (environment, profile, instance metadata).
    pub async fn from_config(config: &S3StoreConfig) -> Self {
        tracing::info!(
            endpoint = %config.endpoint,
            region = %config.region,
            "Initializing S3 object store client"
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));
        if !config.endpoint.is_empty() {
            loader = loader.endpoint_url(&config.endpoint);
        }
        if !config.access_key.is_empty() {
            loader = loader.credentials_provider(Credentials::new(
                config.access_key.clone(),
                config.secret_key.clone(),
                None,
                None,
                "partflow-config",
            ));
        }

        let sdk_config = loader.load().await;
        Self::new(Client::new(&sdk_config))
    }
}

#[async_trait]
impl ObjectStoreClient for S3ObjectStore {
    async fn initiate_upload(
        &self,
        target: &UploadTarget,
        request: &UploadRequestConfig,
    ) -> AppResult<String> {
        let mut call = self
            .client
            .create_multipart_upload()
            .bucket(&target.bucket)
            .key(&target.key);
        if let Some(content_type) = &request.content_type {
            call = call.content_type(content_type);
        }
        if let Some(acl) = &request.acl {
            call = call.acl(ObjectCannedAcl::from(acl.as_str()));
        }
        if let Some(sse) = &request.server_side_encryption {
            call = call.server_side_encryption(ServerSideEncryption::from(sse.as_str()));
        }
        if let Some(key_id) = &request.sse_kms_key_id {
            call = call.ssekms_key_id(key_id);
        }
        if let Some(payer) = &request.request_payer {
            call = call.request_payer(RequestPayer::from(payer.as_str()));
        }

        let output = call.send().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("S3 CreateMultipartUpload failed for {target}"),
                e,
            )
        })?;

        output
            .upload_id()
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::external_service(format!("S3 returned no upload ID for {target}"))
            })
    }

    async fn upload_part(
        &self,
        target: &UploadTarget,
        upload_id: &str,
        part_number: i32,
        body: Bytes,
        request: &UploadRequestConfig,
    ) -> AppResult<String> {
        let content_length = body.len() as i64;
        let mut call = self
            .client
            .upload_part()
            .bucket(&target.bucket)
            .key(&target.key)
            .upload_id(upload_id)
            .part_number(part_number)
            .content_length(content_length)
            .body(aws_sdk_s3::primitives::ByteStream::from(body));
        if let Some(payer) = &request.request_payer {
            call = call.request_payer(RequestPayer::from(payer.as_str()));
        }

        let output = call.send().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("S3 UploadPart failed for part {part_number} of {target}"),
                e,
            )
        })?;

        output
            .e_tag()
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::external_service(format!(
                    "S3 returned no entity tag for part {part_number} of {target}"
                ))
            })
    }

    async fn complete_upload(
        &self,
        target: &UploadTarget,
        upload_id: &str,
        parts: &[CompletedPart],
    ) -> AppResult<FinalizeOutcome> {
        let completed = parts
            .iter()
            .map(|part| {
                S3CompletedPart::builder()
                    .part_number(part.part_number)
                    .e_tag(&part.entity_tag)
                    .build()
            })
            .collect::<Vec<_>>();

        let output = self
            .client
            .complete_multipart_upload()
            .bucket(&target.bucket)
            .key(&target.key)
            .upload_id(upload_id)
            .multipart_upload(
                CompletedMultipartUpload::builder()
                    .set_parts(Some(completed))
                    .build(),
            )
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("S3 CompleteMultipartUpload failed for {target}"),
                    e,
                )
            })?;

        Ok(FinalizeOutcome {
            bucket: target.bucket.clone(),
            key: target.key.clone(),
            location: output.location().map(str::to_string),
            entity_tag: output.e_tag().map(str::to_string),
        })
    }
}
