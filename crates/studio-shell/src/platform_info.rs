//! Process environment snapshot used by window construction and startup.

use std::{env, path::PathBuf};

use serde::Serialize;

pub const DEV_SERVER_URL_ENV: &str = "STUDIO_DEV_SERVER_URL";
pub const NODE_INTEGRATION_ENV: &str = "STUDIO_NODE_INTEGRATION";
pub const APP_ENV_ENV: &str = "STUDIO_ENV";
pub const DEBUG_ENV: &str = "STUDIO_DEBUG";
pub const ROOT_ENV: &str = "STUDIO_ROOT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Windows,
    Macos,
    Linux,
}

impl OsFamily {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            OsFamily::Windows
        } else if cfg!(target_os = "macos") {
            OsFamily::Macos
        } else {
            OsFamily::Linux
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AppMode {
    Development,
    Test,
    Production,
}

impl AppMode {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("development") => AppMode::Development,
            Some("test") => AppMode::Test,
            _ => AppMode::Production,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformInfo {
    pub os: OsFamily,
    pub is_wayland: bool,
    pub mode: AppMode,
    pub debug_enabled: bool,
    pub dev_server_url: Option<String>,
    pub node_integration: bool,
    pub root_override: Option<PathBuf>,
}

/// Non-empty means set, matching how the web frontend reads the same flags.
fn flag(value: Option<String>) -> bool {
    value.is_some_and(|value| !value.is_empty())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl PlatformInfo {
    pub fn from_env() -> Self {
        Self::from_lookup(OsFamily::current(), |key| env::var(key).ok())
    }

    pub fn from_lookup<F>(os: OsFamily, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_wayland = os == OsFamily::Linux
            && (lookup("XDG_SESSION_TYPE")
                .is_some_and(|value| value.trim().eq_ignore_ascii_case("wayland"))
                || flag(lookup("WAYLAND_DISPLAY")));

        Self {
            os,
            is_wayland,
            mode: AppMode::parse(lookup(APP_ENV_ENV).as_deref()),
            debug_enabled: flag(lookup(DEBUG_ENV)),
            dev_server_url: non_empty(lookup(DEV_SERVER_URL_ENV)),
            node_integration: flag(lookup(NODE_INTEGRATION_ENV)),
            root_override: non_empty(lookup(ROOT_ENV)).map(PathBuf::from),
        }
    }

    pub fn is_windows(&self) -> bool {
        self.os == OsFamily::Windows
    }

    pub fn is_mac(&self) -> bool {
        self.os == OsFamily::Macos
    }

    pub fn is_development(&self) -> bool {
        self.mode == AppMode::Development
    }

    pub fn is_test(&self) -> bool {
        self.mode == AppMode::Test
    }

    pub fn running_dev_server(&self) -> bool {
        self.dev_server_url.is_some()
    }

    pub fn verbose_logging(&self) -> bool {
        self.is_development() || self.debug_enabled
    }

    pub fn should_open_devtools(&self) -> bool {
        (self.is_development() && !self.is_test()) || self.debug_enabled
    }
}

#[cfg(test)]
pub(crate) fn platform_with(os: OsFamily, vars: &[(&str, &str)]) -> PlatformInfo {
    let vars: Vec<(String, String)> = vars
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    PlatformInfo::from_lookup(os, move |key| {
        vars.iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value.clone())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wayland_is_detected_from_session_type_or_display() {
        assert!(platform_with(OsFamily::Linux, &[("XDG_SESSION_TYPE", "Wayland")]).is_wayland);
        assert!(platform_with(OsFamily::Linux, &[("WAYLAND_DISPLAY", "wayland-0")]).is_wayland);
        assert!(!platform_with(OsFamily::Linux, &[("XDG_SESSION_TYPE", "x11")]).is_wayland);
        assert!(!platform_with(OsFamily::Macos, &[("WAYLAND_DISPLAY", "wayland-0")]).is_wayland);
    }

    #[test]
    fn empty_values_do_not_count_as_flags() {
        let info = platform_with(
            OsFamily::Linux,
            &[(DEBUG_ENV, ""), (DEV_SERVER_URL_ENV, "  "), (NODE_INTEGRATION_ENV, "1")],
        );
        assert!(!info.debug_enabled);
        assert_eq!(info.dev_server_url, None);
        assert!(info.node_integration);
    }

    #[test]
    fn devtools_open_in_development_unless_testing_or_debugging() {
        let dev = platform_with(OsFamily::Linux, &[(APP_ENV_ENV, "development")]);
        assert!(dev.should_open_devtools());

        let test = platform_with(OsFamily::Linux, &[(APP_ENV_ENV, "test")]);
        assert!(!test.should_open_devtools());

        let debug_prod = platform_with(OsFamily::Linux, &[(DEBUG_ENV, "1")]);
        assert!(debug_prod.should_open_devtools());

        let prod = platform_with(OsFamily::Linux, &[]);
        assert!(!prod.should_open_devtools());
        assert!(!prod.verbose_logging());
    }
}
