// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Directory-backed blob store — one file per upload under a root directory.

use std::path::{Path, PathBuf};

use flatscan_core::error::{Result, ScanError};
use flatscan_core::types::{ImageEncoding, MediaType};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::store::{BlobStore, StoredBlob};

/// Writes blobs to `<root>/<folder>/<uuid>.<ext>` and returns `file://` URLs.
#[derive(Debug, Clone)]
pub struct DirectoryBlobStore {
    root: PathBuf,
}

impl DirectoryBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// File extension for a stored content type.
fn extension_for(content_type: &str) -> &'static str {
    match MediaType::from_mime(content_type) {
        Some(MediaType::Png) => ImageEncoding::Png.extension(),
        Some(MediaType::Jpeg) => ImageEncoding::Jpeg.extension(),
        Some(MediaType::Pdf) => "pdf",
        None => "bin",
    }
}

/// Folder names become a single path component.
fn valid_folder(folder: &str) -> bool {
    !folder.is_empty()
        && folder != "."
        && folder != ".."
        && !folder.contains(['/', '\\'])
}

impl BlobStore for DirectoryBlobStore {
    #[instrument(skip(self, data), fields(bytes = data.len()))]
    async fn put(&self, data: &[u8], content_type: &str, folder: &str) -> Result<StoredBlob> {
        if !valid_folder(folder) {
            return Err(ScanError::Upload(format!("invalid folder name {folder:?}")));
        }

        let dir = self.root.join(folder);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|err| ScanError::Upload(format!("cannot create {}: {err}", dir.display())))?;

        let path = dir.join(format!("{}.{}", Uuid::new_v4(), extension_for(content_type)));
        tokio::fs::write(&path, data)
            .await
            .map_err(|err| ScanError::Upload(format!("cannot write {}: {err}", path.display())))?;

        let absolute = tokio::fs::canonicalize(&path).await.unwrap_or(path);
        info!(path = %absolute.display(), "Blob written");
        Ok(StoredBlob {
            url: format!("file://{}", absolute.display()),
        })
    }
}
