//! The admission pipeline: validate, resolve, name, place.

use crate::AssetStore;
use std::sync::Arc;
use stowage_core::{AdmissionFilter, AssetName, NameGenerator, Namespace, Upload};
use stowage_error::{
    AdmissionError, AdmissionErrorKind, StorageError, StorageErrorKind, StowageErrorKind,
    StowageResult,
};
use tokio::io::AsyncRead;

/// Stage an upload has reached in the pipeline.
///
/// Stages only move forward; `Rejected` is terminal and reachable from any
/// stage before `Placed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum AdmissionStage {
    /// Request received, nothing checked yet
    #[display("received")]
    Received,
    /// Type and size rules passed
    #[display("validated")]
    Validated,
    /// Namespace resolved and a name assigned
    #[display("named")]
    Named,
    /// Bytes durably written under the final name
    #[display("placed")]
    Placed,
    /// Refused by policy or failed in storage
    #[display("rejected")]
    Rejected,
}

/// Proof of a successful admission.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct AdmissionReceipt {
    /// Namespace the asset was placed in
    namespace: Namespace,
    /// Generated name
    name: AssetName,
    /// Backend-specific location of the stored asset
    storage_path: String,
    /// Bytes written
    size_bytes: u64,
}

impl AdmissionReceipt {
    /// File name of the stored asset.
    pub fn file_name(&self) -> String {
        self.name.to_string()
    }
}

/// Admits uploads into a single namespace.
///
/// The pipeline is cheap to clone and safe to share; concurrent admissions
/// never coordinate with each other.
#[derive(Clone)]
pub struct UploadPipeline {
    store: Arc<dyn AssetStore>,
    namespace: Namespace,
    names: NameGenerator,
    filter: AdmissionFilter,
}

impl std::fmt::Debug for UploadPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadPipeline")
            .field("backend", &self.store.backend())
            .field("namespace", &self.namespace)
            .field("names", &self.names)
            .field("filter", &self.filter)
            .finish()
    }
}

impl UploadPipeline {
    /// Create a pipeline writing to `namespace` in `store`.
    pub fn new(
        store: Arc<dyn AssetStore>,
        namespace: Namespace,
        names: NameGenerator,
        filter: AdmissionFilter,
    ) -> Self {
        Self {
            store,
            namespace,
            names,
            filter,
        }
    }

    /// Namespace this pipeline admits into.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Filter applied to every upload.
    pub fn filter(&self) -> &AdmissionFilter {
        &self.filter
    }

    /// Admit a fully buffered upload.
    ///
    /// Both the declared size and the actual payload length are checked against
    /// the ceiling. Nothing is created in storage unless validation passes.
    ///
    /// # Errors
    ///
    /// Admission errors for policy rejections; storage errors when the
    /// namespace cannot be created or the bytes cannot be written.
    #[tracing::instrument(
        skip(self, upload, data),
        fields(namespace = %self.namespace, owner = %upload.owner(), mime = %upload.mime_type())
    )]
    pub async fn admit(&self, upload: &Upload, data: &[u8]) -> StowageResult<AdmissionReceipt> {
        let result = self.admit_buffered(upload, data).await;
        self.log_outcome(&result);
        result
    }

    /// Admit a streamed upload.
    ///
    /// The declared size is checked up front and the ceiling is enforced again
    /// while copying, so a client understating its size is cut off after
    /// `max_bytes + 1` bytes and nothing is kept.
    ///
    /// # Errors
    ///
    /// Same as [`UploadPipeline::admit`].
    #[tracing::instrument(
        skip(self, upload, reader),
        fields(namespace = %self.namespace, owner = %upload.owner(), mime = %upload.mime_type())
    )]
    pub async fn admit_stream<R>(
        &self,
        upload: &Upload,
        mut reader: R,
    ) -> StowageResult<AdmissionReceipt>
    where
        R: AsyncRead + Unpin + Send,
    {
        let result = self.admit_streamed(upload, &mut reader).await;
        self.log_outcome(&result);
        result
    }

    async fn admit_buffered(
        &self,
        upload: &Upload,
        data: &[u8],
    ) -> StowageResult<AdmissionReceipt> {
        self.validate(upload)?;
        self.filter.check_size(data.len() as u64)?;
        tracing::debug!(stage = %AdmissionStage::Validated);

        let name = self.assign_name(upload).await?;
        let stored = self
            .store
            .put(&self.namespace, &name.to_string(), data)
            .await?;

        Ok(AdmissionReceipt {
            namespace: self.namespace.clone(),
            name,
            storage_path: stored.storage_path().clone(),
            size_bytes: *stored.size_bytes(),
        })
    }

    async fn admit_streamed(
        &self,
        upload: &Upload,
        reader: &mut (dyn AsyncRead + Unpin + Send),
    ) -> StowageResult<AdmissionReceipt> {
        self.validate(upload)?;
        tracing::debug!(stage = %AdmissionStage::Validated);

        let name = self.assign_name(upload).await?;
        let limit = self.filter.max_bytes();
        let stored = self
            .store
            .put_stream(&self.namespace, &name.to_string(), reader, limit)
            .await
            .map_err(|err| match err.kind() {
                StowageErrorKind::Storage(StorageError {
                    kind: StorageErrorKind::LimitExceeded { limit },
                    ..
                }) => AdmissionError::new(AdmissionErrorKind::SizeExceeded {
                    size: (*upload.byte_size()).max(limit.saturating_add(1)),
                    limit: *limit,
                })
                .into(),
                _ => err,
            })?;

        Ok(AdmissionReceipt {
            namespace: self.namespace.clone(),
            name,
            storage_path: stored.storage_path().clone(),
            size_bytes: *stored.size_bytes(),
        })
    }

    fn validate(&self, upload: &Upload) -> Result<(), AdmissionError> {
        tracing::debug!(stage = %AdmissionStage::Received, size = *upload.byte_size());
        self.filter.check(upload.mime_type(), *upload.byte_size())
    }

    async fn assign_name(&self, upload: &Upload) -> StowageResult<AssetName> {
        self.store.ensure_namespace(&self.namespace).await?;
        let name = self.names.generate(upload.owner(), upload.extension());

        if *self.filter.policy().verify_unique_names() {
            let file_name = name.to_string();
            if self.store.contains(&self.namespace, &file_name).await? {
                return Err(StorageError::new(StorageErrorKind::NameCollision(file_name)).into());
            }
        }

        tracing::debug!(stage = %AdmissionStage::Named, asset = %name);
        Ok(name)
    }

    fn log_outcome(&self, result: &StowageResult<AdmissionReceipt>) {
        match result {
            Ok(receipt) => tracing::info!(
                stage = %AdmissionStage::Placed,
                asset = %receipt.name,
                size = receipt.size_bytes,
                "Upload admitted"
            ),
            Err(err) if err.is_rejection() => tracing::info!(
                stage = %AdmissionStage::Rejected,
                reason = %err.rejection_reason(),
                error = %err,
                "Upload rejected"
            ),
            Err(err) => tracing::error!(
                stage = %AdmissionStage::Rejected,
                reason = %err.rejection_reason(),
                error = %err,
                "Upload failed"
            ),
        }
    }
}
