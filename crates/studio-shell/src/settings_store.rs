use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, RwLock,
};

use serde_json::Value;
use tracing::{debug, info};

use crate::{
    app_db::AppDb,
    errors::SettingsError,
    platform_info::OsFamily,
    user_settings::{default_settings, GroupedUserSettings, UserSetting},
};

pub const INITIALIZE_SETTINGS_ACTION: &str = "settings/initializeSettings";
pub const SAVE_SETTING_ACTION: &str = "settings/saveSetting";

#[derive(Debug, Clone, PartialEq)]
pub enum StoreAction {
    InitializeSettings,
    SaveSetting(UserSetting),
}

impl StoreAction {
    pub fn path(&self) -> &'static str {
        match self {
            StoreAction::InitializeSettings => INITIALIZE_SETTINGS_ACTION,
            StoreAction::SaveSetting(_) => SAVE_SETTING_ACTION,
        }
    }

    /// Decodes an action dispatched by name from the page.
    pub fn from_path(path: &str, payload: Option<Value>) -> Result<Self, SettingsError> {
        match path {
            INITIALIZE_SETTINGS_ACTION => Ok(StoreAction::InitializeSettings),
            SAVE_SETTING_ACTION => payload
                .and_then(|payload| serde_json::from_value::<UserSetting>(payload).ok())
                .map(StoreAction::SaveSetting)
                .ok_or_else(|| SettingsError::UnknownAction(format!("{path} (invalid payload)"))),
            other => Err(SettingsError::UnknownAction(other.to_string())),
        }
    }
}

/// Global state store the root UI shell is bound to.
pub struct SettingsStore {
    db: Arc<dyn AppDb>,
    os: OsFamily,
    settings: RwLock<GroupedUserSettings>,
    initialized: AtomicBool,
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("os", &self.os)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

impl SettingsStore {
    pub fn new(db: Arc<dyn AppDb>, os: OsFamily) -> Self {
        Self {
            db,
            os,
            settings: RwLock::new(GroupedUserSettings::new()),
            initialized: AtomicBool::new(false),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    pub fn settings(&self) -> GroupedUserSettings {
        self.settings
            .read()
            .map(|settings| settings.clone())
            .unwrap_or_default()
    }

    pub async fn dispatch(&self, action: StoreAction) -> Result<(), SettingsError> {
        debug!(event = "shell.store.dispatch", action = action.path());
        match action {
            StoreAction::InitializeSettings => self.initialize_settings().await,
            StoreAction::SaveSetting(setting) => self.save_setting(setting).await,
        }
    }

    /// Applies a change made elsewhere (another window) without persisting it.
    pub fn apply_external(&self, setting: UserSetting) {
        if let Ok(mut settings) = self.settings.write() {
            settings.insert(setting);
        }
    }

    async fn initialize_settings(&self) -> Result<(), SettingsError> {
        let mut grouped = GroupedUserSettings::from_iter(self.db.load_settings().await?);

        let seeds: Vec<UserSetting> = default_settings(self.os)
            .into_iter()
            .filter(|setting| !grouped.contains(&setting.key))
            .collect();
        if !seeds.is_empty() {
            self.db.save_settings(&seeds).await?;
            for seed in seeds {
                grouped.insert(seed);
            }
        }

        info!(event = "shell.store.settings_initialized", count = grouped.len());
        if let Ok(mut settings) = self.settings.write() {
            *settings = grouped;
        }
        self.initialized.store(true, Ordering::Release);
        Ok(())
    }

    async fn save_setting(&self, setting: UserSetting) -> Result<(), SettingsError> {
        if !self.is_initialized() {
            return Err(SettingsError::NotInitialized);
        }
        self.db.save_settings(std::slice::from_ref(&setting)).await?;
        self.apply_external(setting);
        Ok(())
    }
}
