// ============================================================
// Layer 6 — Artifact Store
// ============================================================
// Persists the ModelArtifact as a single JSON document:
//
//   models/
//     churn_pipeline.json   ← { format_version, encoder, classifier }
//
// Encoder state and classifier parameters live in the same file,
// so they can never be loaded out of step with each other.
//
// save() writes to a temporary sibling and renames it into place;
// a reader sees either the old artifact or the new one, never a
// partial write.
//
// load() failures:
//   file absent              → ArtifactNotFound (run `train` first)
//   unreadable               → ArtifactIo
//   not JSON / bad layout    → ArtifactCorrupt
//   encoder/classifier width → DimensionMismatch

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::domain::error::ChurnError;
use crate::ml::artifact::{ArtifactDefect, ModelArtifact};

// ─── ArtifactStore ────────────────────────────────────────────────────────────
/// Anywhere a model artifact can be kept.
pub trait ArtifactStore: Send + Sync {
    fn load(&self) -> Result<ModelArtifact, ChurnError>;

    fn save(&self, artifact: &ModelArtifact) -> Result<(), ChurnError>;

    /// Human-readable location, for logs.
    fn location(&self) -> String;
}

// ─── FileArtifactStore ────────────────────────────────────────────────────────
/// Keeps the artifact in one JSON file.
#[derive(Debug, Clone)]
pub struct FileArtifactStore {
    path: PathBuf,
}

impl FileArtifactStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn io_error(&self, source: std::io::Error) -> ChurnError {
        ChurnError::ArtifactIo { path: self.path.clone(), source }
    }

    fn corrupt(&self, reason: impl Into<String>) -> ChurnError {
        ChurnError::ArtifactCorrupt { path: self.path.clone(), reason: reason.into() }
    }
}

impl ArtifactStore for FileArtifactStore {
    fn load(&self) -> Result<ModelArtifact, ChurnError> {
        let json = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ChurnError::ArtifactNotFound { path: self.path.clone() },
            _ => self.io_error(e),
        })?;

        let artifact: ModelArtifact =
            serde_json::from_str(&json).map_err(|e| self.corrupt(e.to_string()))?;

        artifact.validate().map_err(|defect| match defect {
            ArtifactDefect::Width { features, weights } => {
                ChurnError::DimensionMismatch { features, weights }
            }
            ArtifactDefect::Version(v) => self.corrupt(format!("unsupported format version {v}")),
            ArtifactDefect::Layout(reason) => self.corrupt(reason),
        })?;

        tracing::debug!("Read model artifact from '{}'", self.path.display());
        Ok(artifact)
    }

    fn save(&self, artifact: &ModelArtifact) -> Result<(), ChurnError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_string_pretty(artifact)
            .map_err(|e| self.corrupt(format!("cannot serialise artifact: {e}")))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(self.io_error(e));
        }

        tracing::info!("Saved model artifact to '{}'", self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
