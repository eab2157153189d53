// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Imaging backend handle — readiness state and the buffer ledger.
//
// The scanner is handed an `ImagingBackend` instead of reading a global
// "is the vision library loaded" flag. Every transient raster the pipeline
// allocates is registered with the backend's ledger through a `Scoped` guard
// and deregistered when the guard drops, on every exit path.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use flatscan_core::error::{Result, ScanError};
use tracing::{debug, info, warn};

/// Lifecycle of the imaging backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendState {
    /// Still loading; scans must be refused.
    Initialising,
    /// Ready to process images.
    Ready,
    /// Loading failed permanently.
    Failed(String),
}

/// Capability object injected into the scanner.
///
/// Shared behind an `Arc`; all methods take `&self`.
#[derive(Debug)]
pub struct ImagingBackend {
    state: RwLock<BackendState>,
    live: Arc<AtomicUsize>,
    total_scoped: AtomicU64,
}

impl ImagingBackend {
    /// A backend that is ready immediately (the pure-Rust imaging stack
    /// needs no asynchronous loading).
    pub fn ready() -> Self {
        Self::with_state(BackendState::Ready)
    }

    /// A backend that refuses work until [`ImagingBackend::mark_ready`] is called.
    pub fn initialising() -> Self {
        Self::with_state(BackendState::Initialising)
    }

    fn with_state(state: BackendState) -> Self {
        Self {
            state: RwLock::new(state),
            live: Arc::new(AtomicUsize::new(0)),
            total_scoped: AtomicU64::new(0),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> BackendState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn mark_ready(&self) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = BackendState::Ready;
        info!("Imaging backend ready");
    }

    pub fn mark_failed(&self, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(%reason, "Imaging backend failed to initialise");
        *self.state.write().unwrap_or_else(PoisonError::into_inner) =
            BackendState::Failed(reason);
    }

    /// Fail with `BackendUnavailable` unless the backend is ready.
    pub fn ensure_ready(&self) -> Result<()> {
        match self.state() {
            BackendState::Ready => Ok(()),
            BackendState::Initialising => Err(ScanError::BackendUnavailable(
                "imaging backend is still initialising".to_string(),
            )),
            BackendState::Failed(reason) => Err(ScanError::BackendUnavailable(format!(
                "imaging backend failed to load: {reason}"
            ))),
        }
    }

    /// Register a transient buffer with the ledger.
    pub fn scoped<T>(&self, value: T) -> Scoped<T> {
        self.live.fetch_add(1, Ordering::AcqRel);
        self.total_scoped.fetch_add(1, Ordering::Relaxed);
        Scoped {
            value,
            live: Arc::clone(&self.live),
        }
    }

    /// Number of scoped buffers currently alive.
    pub fn live_buffers(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }

    /// Number of buffers ever registered (diagnostics).
    pub fn total_scoped(&self) -> u64 {
        self.total_scoped.load(Ordering::Relaxed)
    }
}

impl Default for ImagingBackend {
    fn default() -> Self {
        Self::ready()
    }
}

/// A transient buffer that deregisters itself from the ledger on drop.
#[derive(Debug)]
pub struct Scoped<T> {
    value: T,
    live: Arc<AtomicUsize>,
}

impl<T> Deref for Scoped<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> DerefMut for Scoped<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T> Drop for Scoped<T> {
    fn drop(&mut self) {
        let remaining = self.live.fetch_sub(1, Ordering::AcqRel).saturating_sub(1);
        debug!(remaining, "Scoped buffer released");
    }
}
