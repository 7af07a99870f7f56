use anyhow::{Context, Result};
use cutplan_core::OptimizationInput;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Stores submitted optimization requests as JSON files keyed by a random id.
#[derive(Debug, Clone)]
pub struct JobStorage {
    dir: PathBuf,
}

impl JobStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    pub async fn store(&self, input: &OptimizationInput) -> Result<Uuid> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("creating data directory {}", self.dir.display()))?;

        let id = Uuid::new_v4();
        let body = serde_json::to_vec(input)?;
        let path = self.path_for(id);
        tokio::fs::write(&path, body)
            .await
            .with_context(|| format!("writing {}", path.display()))?;

        Ok(id)
    }

    /// Returns `None` when nothing was stored under `id`.
    pub async fn load(&self, id: Uuid) -> Result<Option<OptimizationInput>> {
        let path = self.path_for(id);
        let body = match tokio::fs::read(&path).await {
            Ok(body) => body,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err).with_context(|| format!("reading {}", path.display())),
        };

        let input = serde_json::from_slice(&body)
            .with_context(|| format!("parsing stored job {}", id))?;
        Ok(Some(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutplan_core::{OptimizationOptions, PartRequest};

    fn sample() -> OptimizationInput {
        OptimizationInput {
            parts: vec![PartRequest {
                id: "1".into(),
                length: 2500.0,
                width: 150.0,
                color: "9003".into(),
                thickness: 0.45,
                quantity: 4,
                can_rotate: true,
                label: String::new(),
                description: "Ridge".into(),
            }],
            available_materials: None,
            options: OptimizationOptions::default(),
        }
    }

    #[tokio::test]
    async fn test_store_and_load_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = JobStorage::new(tmp.path().join("jobs"));

        let id = storage.store(&sample()).await.unwrap();
        assert!(storage.dir().join(format!("{}.json", id)).exists());

        let loaded = storage.load(id).await.unwrap();
        assert_eq!(loaded, Some(sample()));
    }

    #[tokio::test]
    async fn test_missing_job_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = JobStorage::new(tmp.path());

        assert_eq!(storage.load(Uuid::new_v4()).await.unwrap(), None);
    }
}
