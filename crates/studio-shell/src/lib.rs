//! Desktop shell core for Studio: window creation, navigation policy,
//! settings persistence, and the startup sequence.
//!
//! Nothing here depends on a GUI toolkit. The desktop binary supplies a
//! [`window_host::WindowHost`] and a [`bootstrap::StartupHost`].

pub mod app_db;
pub mod app_events;
pub mod bootstrap;
pub mod errors;
pub mod logging;
pub mod platform_info;
pub mod relative_time;
pub mod remote_bridge;
pub mod runtime_paths;
pub mod settings_store;
pub mod tls_policy;
pub mod ui_plugins;
pub mod user_settings;
pub mod value_utils;
pub mod window_builder;
pub mod window_config;
pub mod window_guards;
pub mod window_host;
pub mod window_registry;

#[cfg(test)]
mod testing;

pub use bootstrap::{AppBootstrapper, AppShell, StartupHost};
pub use errors::{AppDbError, SettingsError, StartupError, WindowError};
pub use platform_info::PlatformInfo;
pub use runtime_paths::RuntimePaths;
pub use window_builder::WindowFactory;
