// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Storage and process-wide state around the core:
//
//   artifact_store.rs — ArtifactStore trait and the JSON file
//                       implementation (save / load / validate)
//
//   cache.rs          — load-once, share-forever artifact cache
//                       used by the inference service
//
//   metrics.rs        — per-run training metrics CSV
//
// Reference: Rust Book §9 (Error Handling), §16 (Shared-State Concurrency)

/// Artifact persistence
pub mod artifact_store;

/// Lazily populated artifact cache
pub mod cache;

/// Training metrics CSV logger
pub mod metrics;

pub use artifact_store::{ArtifactStore, FileArtifactStore};
pub use cache::ArtifactCache;
