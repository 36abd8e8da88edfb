// ============================================================
// Layer 6 — Artifact Cache
// ============================================================
// Loads the model artifact on first use and shares it for the
// rest of the process.
//
//   fast path : OnceLock::get — no locking once loaded
//   slow path : take the init mutex, check again, then read
//               from the store exactly once
//
// Concurrent first requests all queue on the mutex; the first
// one reads the store, the rest find the slot filled. A failed
// load stores nothing, so the next request tries again.

use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::domain::error::ChurnError;
use crate::infra::artifact_store::ArtifactStore;
use crate::ml::artifact::ModelArtifact;

pub struct ArtifactCache<S> {
    store: S,
    slot:  OnceLock<Arc<ModelArtifact>>,
    init:  Mutex<()>,
}

impl<S: ArtifactStore> ArtifactCache<S> {
    /// An empty cache; nothing is read until [`ArtifactCache::get`].
    pub fn new(store: S) -> Self {
        Self {
            store,
            slot: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    /// The shared artifact, loading it on the first call.
    pub fn get(&self) -> Result<Arc<ModelArtifact>, ChurnError> {
        if let Some(artifact) = self.slot.get() {
            return Ok(Arc::clone(artifact));
        }

        // the guard protects no data, so a poisoned lock is still usable
        let _guard = self.init.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(artifact) = self.slot.get() {
            return Ok(Arc::clone(artifact));
        }

        let artifact = Arc::new(self.store.load()?);
        tracing::info!(
            "Model artifact loaded from '{}' ({} features)",
            self.store.location(),
            artifact.encoder().width()
        );
        let cached = self.slot.get_or_init(|| artifact);
        Ok(Arc::clone(cached))
    }

    pub fn is_loaded(&self) -> bool {
        self.slot.get().is_some()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
