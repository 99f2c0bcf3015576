use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppDbError {
    #[error("Failed to create app database directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read app database {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write app database {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("App database {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("App database is not connected")]
    NotConnected,

    #[error("Failed to serialize app database: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl AppDbError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppDbError::CreateDir { .. } => "app_db.create_dir_failed",
            AppDbError::Read { .. } => "app_db.read_failed",
            AppDbError::Write { .. } => "app_db.write_failed",
            AppDbError::Malformed { .. } => "app_db.malformed",
            AppDbError::NotConnected => "app_db.not_connected",
            AppDbError::Serialize(_) => "app_db.serialize_failed",
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings store has not been initialized")]
    NotInitialized,

    #[error("Unknown store action '{0}'")]
    UnknownAction(String),

    #[error(transparent)]
    AppDb(#[from] AppDbError),
}

impl SettingsError {
    pub fn error_code(&self) -> &'static str {
        match self {
            SettingsError::NotInitialized => "settings.not_initialized",
            SettingsError::UnknownAction(_) => "settings.unknown_action",
            SettingsError::AppDb(error) => error.error_code(),
        }
    }
}

#[derive(Debug, Error)]
pub enum WindowError {
    #[error("Failed to create window: {message}")]
    Create { message: String },

    #[error("Window operation '{operation}' failed: {message}")]
    Operation {
        operation: &'static str,
        message: String,
    },

    #[error("Invalid application URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to open external URL '{url}': {message}")]
    OpenExternal { url: String, message: String },
}

impl WindowError {
    pub fn error_code(&self) -> &'static str {
        match self {
            WindowError::Create { .. } => "window.create_failed",
            WindowError::Operation { .. } => "window.operation_failed",
            WindowError::InvalidUrl { .. } => "window.invalid_url",
            WindowError::OpenExternal { .. } => "window.open_external_failed",
        }
    }

    pub fn operation(operation: &'static str, error: impl std::fmt::Display) -> Self {
        WindowError::Operation {
            operation,
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to initialize logging: {message}")]
    Logging { message: String },

    #[error("Failed to connect app database: {0}")]
    AppDb(#[from] AppDbError),

    #[error("Failed to initialize settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("Failed to attach inbound message handler: {message}")]
    InboundHandler { message: String },

    #[error("Failed to mount application shell: {0}")]
    Mount(#[from] WindowError),
}

impl StartupError {
    pub fn error_code(&self) -> &'static str {
        match self {
            StartupError::Logging { .. } => "startup.logging_failed",
            StartupError::AppDb(_) => "startup.app_db_failed",
            StartupError::Settings(_) => "startup.settings_failed",
            StartupError::InboundHandler { .. } => "startup.inbound_handler_failed",
            StartupError::Mount(_) => "startup.mount_failed",
        }
    }
}
