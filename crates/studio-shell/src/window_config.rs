//! Pure window configuration: settings + environment in, [`WindowConfig`] out.
//!
//! Nothing here touches a real window, so every branch of the chrome, URL
//! and devtools rules can be checked without a display.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::{form_urlencoded, Url};

use crate::{
    errors::WindowError,
    platform_info::{OsFamily, PlatformInfo},
    user_settings::GroupedUserSettings,
};

pub const DEFAULT_WIDTH: f64 = 1200.0;
pub const DEFAULT_HEIGHT: f64 = 800.0;
pub const MIN_WIDTH: f64 = 800.0;
pub const MIN_HEIGHT: f64 = 600.0;

pub const DARK_BACKGROUND: Rgb = Rgb(0x25, 0x25, 0x25);
pub const LIGHT_BACKGROUND: Rgb = Rgb(0xff, 0xff, 0xff);

/// Packaged frontend entry served by the webview's custom protocol.
pub const PACKAGED_APP_URL: &str = "tauri://localhost/index.html";
pub const PACKAGED_APP_URL_WINDOWS: &str = "http://tauri.localhost/index.html";

pub const RUNNING_WAYLAND_PARAM: &str = "runningWayland";

/// Chromium zoom levels scale by 20% per step.
const ZOOM_STEP: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleBarStyle {
    Default,
    Hidden,
}

/// Parameters supplied when requesting a new window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl OpenOptions {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub width: f64,
    pub height: f64,
    pub min_width: f64,
    pub min_height: f64,
    pub dark: bool,
    pub background_color: Rgb,
    pub frame: bool,
    pub title_bar_style: TitleBarStyle,
    pub expose_bridge_globals: bool,
    pub zoom_level: f64,
    pub load_url: Url,
    pub open_devtools: bool,
    pub maximize: bool,
    pub reload_after_first_load: bool,
}

impl WindowConfig {
    pub fn zoom_factor(&self) -> f64 {
        ZOOM_STEP.powf(self.zoom_level)
    }
}

pub fn is_dark(settings: &GroupedUserSettings, os_prefers_dark: bool) -> bool {
    os_prefers_dark
        || settings
            .theme()
            .is_some_and(|theme| theme.contains("dark"))
}

/// Frame visibility and title-bar style; Wayland always gets a bare window.
pub fn resolve_chrome(settings: &GroupedUserSettings, platform: &PlatformInfo) -> (bool, TitleBarStyle) {
    if platform.is_wayland {
        return (false, TitleBarStyle::Hidden);
    }

    let native = settings.uses_native_menu();
    let title_bar_style = if platform.os == OsFamily::Windows && native {
        TitleBarStyle::Default
    } else {
        TitleBarStyle::Hidden
    };
    (native, title_bar_style)
}

pub fn base_app_url(platform: &PlatformInfo) -> &str {
    if let Some(dev_server_url) = platform.dev_server_url.as_deref() {
        return dev_server_url;
    }
    if platform.is_windows() {
        PACKAGED_APP_URL_WINDOWS
    } else {
        PACKAGED_APP_URL
    }
}

/// Query string for the page: open options plus environment markers,
/// keys in sorted order.
pub fn build_query(options: &OpenOptions, platform: &PlatformInfo) -> String {
    let mut params: BTreeMap<&str, String> = BTreeMap::new();
    if let Some(url) = options.url.as_deref() {
        params.insert("url", url.to_string());
    }
    if platform.is_wayland {
        params.insert(RUNNING_WAYLAND_PARAM, "true".to_string());
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in &params {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

pub fn build_app_url(options: &OpenOptions, platform: &PlatformInfo) -> Result<Url, WindowError> {
    let base = base_app_url(platform);
    let query = build_query(options, platform);
    let raw = if query.is_empty() {
        base.to_string()
    } else {
        format!("{base}?{query}")
    };
    Url::parse(&raw).map_err(|source| WindowError::InvalidUrl { url: raw, source })
}

pub fn resolve_window_config(
    settings: &GroupedUserSettings,
    platform: &PlatformInfo,
    options: &OpenOptions,
    os_prefers_dark: bool,
) -> Result<WindowConfig, WindowError> {
    let dark = is_dark(settings, os_prefers_dark);
    let (frame, title_bar_style) = resolve_chrome(settings, platform);

    Ok(WindowConfig {
        width: DEFAULT_WIDTH,
        height: DEFAULT_HEIGHT,
        min_width: MIN_WIDTH,
        min_height: MIN_HEIGHT,
        dark,
        background_color: if dark { DARK_BACKGROUND } else { LIGHT_BACKGROUND },
        frame,
        title_bar_style,
        expose_bridge_globals: platform.node_integration,
        zoom_level: settings.zoom_level(),
        load_url: build_app_url(options, platform)?,
        open_devtools: platform.should_open_devtools(),
        maximize: true,
        reload_after_first_load: platform.running_dev_server() && platform.is_windows(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        platform_info::{platform_with, APP_ENV_ENV, DEV_SERVER_URL_ENV},
        user_settings::{UserSetting, ValueType, MENU_STYLE_KEY, THEME_KEY, ZOOM_LEVEL_KEY},
    };

    fn settings(theme: &str, menu_style: &str) -> GroupedUserSettings {
        GroupedUserSettings::from_iter([
            UserSetting::new(THEME_KEY, json!(theme), ValueType::String),
            UserSetting::new(MENU_STYLE_KEY, json!(menu_style), ValueType::String),
        ])
    }

    fn linux() -> PlatformInfo {
        platform_with(OsFamily::Linux, &[])
    }

    fn wayland() -> PlatformInfo {
        platform_with(OsFamily::Linux, &[("XDG_SESSION_TYPE", "wayland")])
    }

    #[test]
    fn dark_theme_setting_or_os_signal_selects_dark_background() {
        for theme in ["dark", "solarized-dark", "dark-blue"] {
            let config =
                resolve_window_config(&settings(theme, "native"), &linux(), &OpenOptions::default(), false)
                    .expect("resolve config");
            assert!(config.dark, "theme {theme}");
            assert_eq!(config.background_color, DARK_BACKGROUND);
        }

        let os_dark =
            resolve_window_config(&settings("light", "native"), &linux(), &OpenOptions::default(), true)
                .expect("resolve config");
        assert_eq!(os_dark.background_color.to_hex(), "#252525");

        let light =
            resolve_window_config(&settings("light", "native"), &linux(), &OpenOptions::default(), false)
                .expect("resolve config");
        assert!(!light.dark);
        assert_eq!(light.background_color.to_hex(), "#ffffff");
    }

    #[test]
    fn missing_theme_is_treated_as_light() {
        let config = resolve_window_config(
            &GroupedUserSettings::new(),
            &linux(),
            &OpenOptions::default(),
            false,
        )
        .expect("resolve config");
        assert!(!config.dark);
    }

    #[test]
    fn non_native_menu_style_is_borderless_with_hidden_title_bar() {
        for style in ["client", "", "Native"] {
            for os in [OsFamily::Windows, OsFamily::Macos, OsFamily::Linux] {
                let (frame, title_bar) =
                    resolve_chrome(&settings("light", style), &platform_with(os, &[]));
                assert!(!frame, "style {style:?} on {os:?}");
                assert_eq!(title_bar, TitleBarStyle::Hidden);
            }
        }
    }

    #[test]
    fn native_menu_style_shows_frame_and_default_title_bar_only_on_windows() {
        let native = settings("light", "native");
        assert_eq!(
            resolve_chrome(&native, &platform_with(OsFamily::Windows, &[])),
            (true, TitleBarStyle::Default)
        );
        assert_eq!(
            resolve_chrome(&native, &platform_with(OsFamily::Macos, &[])),
            (true, TitleBarStyle::Hidden)
        );
        assert_eq!(resolve_chrome(&native, &linux()), (true, TitleBarStyle::Hidden));
    }

    #[test]
    fn wayland_forces_borderless_even_with_native_menu() {
        assert_eq!(
            resolve_chrome(&settings("light", "native"), &wayland()),
            (false, TitleBarStyle::Hidden)
        );
    }

    #[test]
    fn url_option_is_forwarded_without_wayland_marker() {
        let url = build_app_url(&OpenOptions::with_url("foo"), &linux()).expect("build url");
        let query = url.query().expect("query present");
        assert!(query.contains("url=foo"));
        assert!(!query.contains(RUNNING_WAYLAND_PARAM));
        assert_eq!(url.as_str(), "tauri://localhost/index.html?url=foo");
    }

    #[test]
    fn wayland_marker_is_added_and_keys_are_sorted() {
        let url = build_app_url(&OpenOptions::with_url("postgres://db/app"), &wayland())
            .expect("build url");
        assert_eq!(
            url.query(),
            Some("runningWayland=true&url=postgres%3A%2F%2Fdb%2Fapp")
        );
    }

    #[test]
    fn empty_query_leaves_url_without_question_mark() {
        let url = build_app_url(&OpenOptions::default(), &platform_with(OsFamily::Windows, &[]))
            .expect("build url");
        assert_eq!(url.as_str(), PACKAGED_APP_URL_WINDOWS);
        assert_eq!(url.query(), None);
    }

    #[test]
    fn dev_server_url_replaces_packaged_url_and_enables_windows_reload() {
        let platform = platform_with(
            OsFamily::Windows,
            &[(DEV_SERVER_URL_ENV, "http://localhost:8080/"), (APP_ENV_ENV, "development")],
        );
        let config =
            resolve_window_config(&settings("light", "native"), &platform, &OpenOptions::default(), false)
                .expect("resolve config");
        assert_eq!(config.load_url.as_str(), "http://localhost:8080/");
        assert!(config.open_devtools);
        assert!(config.reload_after_first_load);
    }

    #[test]
    fn invalid_dev_server_url_is_reported() {
        let platform = platform_with(OsFamily::Linux, &[(DEV_SERVER_URL_ENV, "not a url")]);
        let error = build_app_url(&OpenOptions::default(), &platform).expect_err("invalid url");
        assert_eq!(error.error_code(), "window.invalid_url");
    }

    #[test]
    fn zoom_level_maps_to_chromium_scale() {
        let mut grouped = settings("light", "native");
        grouped.insert(UserSetting::new(ZOOM_LEVEL_KEY, json!("1"), ValueType::Float));
        let config = resolve_window_config(&grouped, &linux(), &OpenOptions::default(), false)
            .expect("resolve config");
        assert_eq!(config.zoom_level, 1.0);
        assert!((config.zoom_factor() - 1.2).abs() < f64::EPSILON);

        let unset = resolve_window_config(&settings("light", "native"), &linux(), &OpenOptions::default(), false)
            .expect("resolve config");
        assert_eq!(unset.zoom_factor(), 1.0);
    }
}
