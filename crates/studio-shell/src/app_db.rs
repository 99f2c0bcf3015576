//! Local app database holding persisted user settings.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::{errors::AppDbError, platform_info::PlatformInfo, user_settings::UserSetting};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbLogLevel {
    Query,
    Error,
}

/// What the connection reports to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLogging {
    All,
    Levels(Vec<DbLogLevel>),
}

impl DbLogging {
    pub fn for_platform(platform: &PlatformInfo) -> Self {
        if platform.is_development() {
            DbLogging::All
        } else {
            DbLogging::Levels(vec![DbLogLevel::Error])
        }
    }

    pub fn logs(&self, level: DbLogLevel) -> bool {
        match self {
            DbLogging::All => true,
            DbLogging::Levels(levels) => levels.contains(&level),
        }
    }
}

#[async_trait]
pub trait AppDb: Send + Sync + 'static {
    fn open(path: PathBuf, logging: DbLogging) -> Self
    where
        Self: Sized;

    async fn connect(&self) -> Result<(), AppDbError>;

    async fn load_settings(&self) -> Result<Vec<UserSetting>, AppDbError>;

    /// Inserts or replaces settings by key.
    async fn save_settings(&self, settings: &[UserSetting]) -> Result<(), AppDbError> {
        self.log_query("upsert user_settings");
        // Held across the write so saves reach the file in lock order.
        let mut guard = self.document.lock().await;
        let mut updated = guard.as_ref().ok_or(AppDbError::NotConnected)?.clone();

        for setting in settings {
            match updated
                .user_settings
                .iter_mut()
                .find(|existing| existing.key == setting.key)
            {
                Some(existing) => *existing = setting.clone(),
                None => updated.user_settings.push(setting.clone()),
            }
        }

        self.write_document(&updated)
            .await
            .inspect_err(|error| self.log_error(error))?;
        *guard = Some(updated);
        Ok(())
    }
}

fn replace_file(path: &Path, contents: &[u8]) -> Result<(), AppDbError> {
    let write_error = |source: std::io::Error| AppDbError::Write {
        path: path.to_path_buf(),
        source,
    };
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut staged = tempfile::NamedTempFile::new_in(parent).map_err(write_error)?;
    staged.write_all(contents).map_err(write_error)?;
    staged.as_file().sync_all().map_err(write_error)?;
    staged
        .persist(path)
        .map_err(|error| write_error(error.error))?;
    Ok(())
}
