use std::path::{Path, PathBuf};

use crate::platform_info::PlatformInfo;

pub const APP_DIR_NAME: &str = "studio";
pub const APP_DB_FILE: &str = "app_db.json";
pub const DESKTOP_LOG_FILE: &str = "studio-desktop.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePaths {
    root_dir: PathBuf,
}

impl RuntimePaths {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// `STUDIO_ROOT`, then the platform data directory, then `~/.studio`.
    pub fn resolve(platform: &PlatformInfo) -> Self {
        if let Some(root) = &platform.root_override {
            return Self::new(root.clone());
        }
        if let Some(data_dir) = dirs::data_dir() {
            return Self::new(data_dir.join(APP_DIR_NAME));
        }
        let home_root = home::home_dir()
            .map(|home| home.join(format!(".{APP_DIR_NAME}")))
            .unwrap_or_else(|| PathBuf::from(format!(".{APP_DIR_NAME}")));
        Self::new(home_root)
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn app_db_path(&self) -> PathBuf {
        self.root_dir.join(APP_DB_FILE)
    }

    pub fn desktop_log_path(&self) -> PathBuf {
        self.root_dir.join("logs").join(DESKTOP_LOG_FILE)
    }
}
