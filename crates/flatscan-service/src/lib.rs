// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// flatscan-service — Submission flow around the scanner.
//
// Runs a scan off the async executor, uploads the original and processed
// images to a blob store, and records the result in a metadata store. The
// stores are traits so hosted services, local directories, and in-memory
// fakes are interchangeable.

pub mod directory;
pub mod integrity;
pub mod memory;
pub mod service;
pub mod store;

pub use directory::DirectoryBlobStore;
pub use memory::{InMemoryBlobStore, InMemoryMetadataStore};
pub use service::{ScanReceipt, ScanService, ServiceConfig};
pub use store::{BlobStore, MetadataStore, StoredBlob};
