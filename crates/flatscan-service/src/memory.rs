// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory stores for tests and embedding without external services.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use flatscan_core::error::Result;
use flatscan_core::types::{RecordId, ScanRecord};
use tracing::debug;
use uuid::Uuid;

use crate::store::{BlobStore, MetadataStore, StoredBlob};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A blob held by [`InMemoryBlobStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryBlob {
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Blob store backed by a map from `memory://<folder>/<id>` URLs to bytes.
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    blobs: Mutex<HashMap<String, MemoryBlob>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<MemoryBlob> {
        lock(&self.blobs).get(url).cloned()
    }

    pub fn len(&self) -> usize {
        lock(&self.blobs).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BlobStore for InMemoryBlobStore {
    async fn put(&self, data: &[u8], content_type: &str, folder: &str) -> Result<StoredBlob> {
        let url = format!("memory://{folder}/{}", Uuid::new_v4());
        lock(&self.blobs).insert(
            url.clone(),
            MemoryBlob {
                content_type: content_type.to_string(),
                data: data.to_vec(),
            },
        );
        debug!(%url, bytes = data.len(), "Blob stored in memory");
        Ok(StoredBlob { url })
    }
}

/// Metadata store backed by a vector of records.
#[derive(Debug, Default)]
pub struct InMemoryMetadataStore {
    records: Mutex<Vec<ScanRecord>>,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        lock(&self.records).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MetadataStore for InMemoryMetadataStore {
    async fn insert(&self, record: ScanRecord) -> Result<()> {
        lock(&self.records).push(record);
        Ok(())
    }

    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<ScanRecord>> {
        Ok(lock(&self.records)
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn remove(&self, id: RecordId) -> Result<bool> {
        let mut records = lock(&self.records);
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use flatscan_core::types::ScanStatus;

    fn record(owner: &str) -> ScanRecord {
        ScanRecord {
            id: RecordId::new(),
            owner_id: owner.into(),
            filename: "page.png".into(),
            original_url: "memory://originals/a".into(),
            processed_url: "memory://processed/b".into(),
            status: ScanStatus::Processed,
            did_detect: true,
            content_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn blobs_round_trip_by_url() {
        let store = InMemoryBlobStore::new();
        let stored = store.put(b"abc", "image/png", "originals").await.expect("put");
        assert!(stored.url.starts_with("memory://originals/"));

        let blob = store.get(&stored.url).expect("present");
        assert_eq!(blob.data, b"abc");
        assert_eq!(blob.content_type, "image/png");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn records_are_listed_per_owner_and_removable() {
        let store = InMemoryMetadataStore::new();
        let mine = record("alice");
        let id = mine.id;
        store.insert(mine).await.expect("insert");
        store.insert(record("bob")).await.expect("insert");

        let listed = store.list_for_owner("alice").await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);

        assert!(store.remove(id).await.expect("remove"));
        assert!(!store.remove(id).await.expect("remove again"));
        assert_eq!(store.len(), 1);
    }
}
