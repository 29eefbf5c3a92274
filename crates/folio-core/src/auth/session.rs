use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::store::TokenStore;

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

/// On-disk shape of the persisted token slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedToken {
    pub access_token: String,
    pub saved_at: DateTime<Utc>,
}

/// Token slot persisted as JSON in the cache directory.
pub struct FileTokenStore {
    cache_dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Read the full persisted record, including when it was written
    pub fn load_record(&self) -> Result<Option<PersistedToken>> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path).context("Failed to read session file")?;
        let record: PersistedToken =
            serde_json::from_str(&contents).context("Failed to parse session file")?;
        if record.access_token.is_empty() {
            return Ok(None);
        }
        Ok(Some(record))
    }

    pub fn path(&self) -> PathBuf {
        self.session_path()
    }

    fn session_path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }

    fn ensure_parent(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create cache directory")?;
        }
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.load_record()?.map(|r| r.access_token))
    }

    fn save(&self, token: &str) -> Result<()> {
        let path = self.session_path();
        Self::ensure_parent(&path)?;
        let record = PersistedToken {
            access_token: token.to_string(),
            saved_at: Utc::now(),
        };
        let contents = serde_json::to_string_pretty(&record)?;
        std::fs::write(&path, contents).context("Failed to write session file")?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path).context("Failed to remove session file")?;
        }
        Ok(())
    }
}
