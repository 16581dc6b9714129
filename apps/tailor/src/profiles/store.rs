//! Profile Store: the upstream source of applicant profiles.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::models::ApplicantProfile;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile {0} not found")]
    NotFound(Uuid),

    #[error("profile I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("profile is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Loads and persists applicant profiles. Loaded profiles are already normalised.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn load_profile(&self, user_id: Uuid) -> Result<ApplicantProfile, ProfileError>;

    async fn save_profile(
        &self,
        user_id: Uuid,
        profile: &ApplicantProfile,
    ) -> Result<(), ProfileError>;
}

/// Stores each profile as `<dir>/<user_id>.json`.
#[derive(Debug, Clone)]
pub struct FileProfileStore {
    dir: PathBuf,
}

impl FileProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, user_id: Uuid) -> PathBuf {
        self.dir.join(format!("{user_id}.json"))
    }
}

#[async_trait]
impl ProfileStore for FileProfileStore {
    async fn load_profile(&self, user_id: Uuid) -> Result<ApplicantProfile, ProfileError> {
        let bytes = match tokio::fs::read(self.path_for(user_id)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ProfileError::NotFound(user_id))
            }
            Err(e) => return Err(e.into()),
        };
        let profile: ApplicantProfile = serde_json::from_slice(&bytes)?;
        Ok(profile.normalized())
    }

    /// Writes to a temporary sibling first, then renames over the target.
    async fn save_profile(
        &self,
        user_id: Uuid,
        profile: &ApplicantProfile,
    ) -> Result<(), ProfileError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(user_id);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(profile)?).await?;
        tokio::fs::rename(&tmp, &path).await?;
        info!("Saved profile for user {user_id} to {}", path.display());
        Ok(())
    }
}
