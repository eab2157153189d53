// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Collaborator contracts — where uploaded images and scan records live.

use std::future::Future;

use flatscan_core::error::Result;
use flatscan_core::types::{RecordId, ScanRecord};
use serde::{Deserialize, Serialize};

/// Location of an uploaded blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBlob {
    pub url: String,
}

/// Accepts image bytes and hands back a retrieval URL.
///
/// Failures are reported as [`flatscan_core::ScanError::Upload`].
pub trait BlobStore: Send + Sync {
    fn put(
        &self,
        data: &[u8],
        content_type: &str,
        folder: &str,
    ) -> impl Future<Output = Result<StoredBlob>> + Send;
}

/// Stores and lists scan records keyed by owner.
///
/// Failures are reported as [`flatscan_core::ScanError::Metadata`].
pub trait MetadataStore: Send + Sync {
    fn insert(&self, record: ScanRecord) -> impl Future<Output = Result<()>> + Send;

    /// All records belonging to `owner_id`, in any order.
    fn list_for_owner(&self, owner_id: &str) -> impl Future<Output = Result<Vec<ScanRecord>>> + Send;

    /// Delete one record. Returns whether it existed.
    fn remove(&self, id: RecordId) -> impl Future<Output = Result<bool>> + Send;
}
