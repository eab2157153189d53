// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan service — submission, gallery listing, and record deletion.
//
// The pipeline is CPU-bound and runs on tokio's blocking pool so the caller
// sees a single await. The two uploads are independent and run concurrently.

use std::sync::Arc;

use chrono::Utc;
use flatscan_core::error::{Result, ScanError};
use flatscan_core::human_errors::{DetectionNotice, detection_notice};
use flatscan_core::types::{
    FallbackReason, GalleryFilter, MediaType, RecordId, ScanRecord, ScanStatus,
};
use flatscan_document::DocumentScanner;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::integrity::hash_bytes;
use crate::store::{BlobStore, MetadataStore};

/// Upload policy for the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Media types accepted by [`ScanService::submit`].
    pub accepted_media: Vec<MediaType>,
    /// Blob-store folder for the untouched uploads.
    pub original_folder: String,
    /// Blob-store folder for pipeline outputs.
    pub processed_folder: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            accepted_media: vec![MediaType::Png, MediaType::Jpeg, MediaType::Pdf],
            original_folder: "originals".into(),
            processed_folder: "processed".into(),
        }
    }
}

impl ServiceConfig {
    /// Resolve a MIME type to an accepted media type.
    pub fn accept(&self, mime: &str) -> Result<MediaType> {
        MediaType::from_mime(mime)
            .filter(|media| self.accepted_media.contains(media))
            .ok_or_else(|| {
                ScanError::UnsupportedMedia(format!(
                    "{mime}; please upload a PNG, JPEG, or PDF file"
                ))
            })
    }
}

/// What a successful submission hands back.
#[derive(Debug, Clone)]
pub struct ScanReceipt {
    pub record: ScanRecord,
    pub notice: DetectionNotice,
    /// Why the original was kept, when no document was rectified.
    pub fallback: Option<FallbackReason>,
}

/// Submission and gallery operations over a blob store and a metadata store.
pub struct ScanService<B, M> {
    scanner: DocumentScanner,
    blobs: Arc<B>,
    metadata: Arc<M>,
    config: ServiceConfig,
}

impl<B, M> Clone for ScanService<B, M> {
    fn clone(&self) -> Self {
        Self {
            scanner: self.scanner.clone(),
            blobs: Arc::clone(&self.blobs),
            metadata: Arc::clone(&self.metadata),
            config: self.config.clone(),
        }
    }
}

impl<B: BlobStore, M: MetadataStore> ScanService<B, M> {
    pub fn new(scanner: DocumentScanner, blobs: Arc<B>, metadata: Arc<M>) -> Self {
        Self {
            scanner,
            blobs,
            metadata,
            config: ServiceConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn scanner(&self) -> &DocumentScanner {
        &self.scanner
    }

    // -- Submission -----------------------------------------------------------

    /// Scan an uploaded file and store both versions plus a gallery record.
    ///
    /// Unsupported media and an unready backend are refused before any work
    /// is done. A scan that finds no document still succeeds; the receipt's
    /// record then has status [`ScanStatus::Original`].
    #[instrument(skip(self, data), fields(data_len = data.len()))]
    pub async fn submit(
        &self,
        owner_id: &str,
        filename: &str,
        media_mime: &str,
        data: Vec<u8>,
    ) -> Result<ScanReceipt> {
        let media = self.config.accept(media_mime)?;
        self.scanner.backend().ensure_ready()?;

        let content_hash = hash_bytes(&data);
        let data = Arc::new(data);

        let scanner = self.scanner.clone();
        let input = Arc::clone(&data);
        let result = tokio::task::spawn_blocking(move || scanner.scan(&input, media))
            .await
            .map_err(|err| ScanError::Worker(err.to_string()))??;

        let (original, processed) = tokio::try_join!(
            self.blobs
                .put(&data, media.mime_type(), &self.config.original_folder),
            self.blobs.put(
                &result.image.bytes,
                result.image.encoding.mime_type(),
                &self.config.processed_folder,
            ),
        )?;

        let record = ScanRecord {
            id: RecordId::new(),
            owner_id: owner_id.to_string(),
            filename: filename.to_string(),
            original_url: original.url,
            processed_url: processed.url,
            status: ScanStatus::from_detection(result.did_detect),
            did_detect: result.did_detect,
            content_hash,
            created_at: Utc::now(),
        };
        self.metadata.insert(record.clone()).await?;

        if result.did_detect {
            info!(id = %record.id, "Scan stored");
        } else {
            warn!(id = %record.id, reason = ?result.fallback, "Scan stored without detection");
        }

        Ok(ScanReceipt {
            record,
            notice: detection_notice(result.did_detect),
            fallback: result.fallback,
        })
    }

    // -- Gallery --------------------------------------------------------------

    /// An owner's records matching `filter`, newest first.
    pub async fn gallery(&self, owner_id: &str, filter: GalleryFilter) -> Result<Vec<ScanRecord>> {
        let mut records = self.metadata.list_for_owner(owner_id).await?;
        records.retain(|r| filter.matches(r));
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    /// Delete one of an owner's records. Returns `false` when the owner has
    /// no record with that id. Stored blobs are left in place.
    #[instrument(skip(self))]
    pub async fn delete(&self, owner_id: &str, id: RecordId) -> Result<bool> {
        let owned = self
            .metadata
            .list_for_owner(owner_id)
            .await?
            .iter()
            .any(|r| r.id == id);
        if !owned {
            return Ok(false);
        }
        self.metadata.remove(id).await
    }
}
