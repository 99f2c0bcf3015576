//! UI plugin and mixin registration, and the boot configuration the page
//! reads before rendering.

use std::sync::Mutex;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::{platform_info::PlatformInfo, tls_policy::TlsVersion};

pub const BOOT_CONFIG_GLOBAL: &str = "__STUDIO_BOOT__";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiPlugin {
    pub name: &'static str,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub options: Value,
}

impl UiPlugin {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            options: Value::Null,
        }
    }

    pub fn with_options(name: &'static str, options: Value) -> Self {
        Self { name, options }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "name", rename_all = "camelCase")]
pub enum UiMixin {
    AppEvent,
    Shortcuts(ShortcutKeys),
}

/// Keyboard-shortcut helpers: `meta`/`Cmd` on macOS, `ctrl`/`Ctrl` elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutKeys {
    pub hotkey_modifier: &'static str,
    pub editor_modifier: &'static str,
}

impl ShortcutKeys {
    pub fn for_platform(platform: &PlatformInfo) -> Self {
        if platform.is_mac() {
            Self {
                hotkey_modifier: "meta",
                editor_modifier: "Cmd",
            }
        } else {
            Self {
                hotkey_modifier: "ctrl",
                editor_modifier: "Ctrl",
            }
        }
    }

    pub fn ctrl_or_cmd(&self, key: &str) -> String {
        format!("{}+{key}", self.hotkey_modifier)
    }

    pub fn cm_ctrl_or_cmd(&self, key: &str) -> String {
        format!("{}-{key}", self.editor_modifier)
    }

    pub fn ctrl_or_cmd_shift(&self, key: &str) -> String {
        format!("{}+shift+{key}", self.hotkey_modifier)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDefaults {
    pub layout: &'static str,
    pub menu_container: &'static str,
    pub header_sort_click_element: &'static str,
    pub resize_columns_mode: &'static str,
    pub resize_columns_handles: &'static str,
    pub modules: Vec<&'static str>,
}

impl Default for TableDefaults {
    fn default() -> Self {
        Self {
            layout: "fitDataFill",
            menu_container: ".studio-wrapper",
            header_sort_click_element: "icon",
            resize_columns_mode: "guide",
            resize_columns_handles: "header-only",
            modules: Vec::new(),
        }
    }
}

impl TableDefaults {
    pub fn register_module(&mut self, module: &'static str) {
        if !self.modules.contains(&module) {
            self.modules.push(module);
        }
    }
}

pub fn notification_options() -> Value {
    json!({
        "timeout": 2300,
        "progressBar": true,
        "layout": "bottomRight",
        "theme": "mint",
        "closeWith": ["button", "click"],
    })
}

/// The fixed plugin set, in install order.
pub fn default_plugins() -> Vec<UiPlugin> {
    vec![
        UiPlugin::with_options("appDb", json!({ "binding": "orm" })),
        UiPlugin::new("hotkey"),
        UiPlugin::with_options("tooltip", json!({ "defaultHtml": false })),
        UiPlugin::new("modal"),
        UiPlugin::new("clipboard"),
        UiPlugin::new("config"),
        UiPlugin::new("studio"),
        UiPlugin::new("settings"),
        UiPlugin::new("nativeBridge"),
        UiPlugin::new("portal"),
        UiPlugin::with_options("notifications", notification_options()),
    ]
}

#[derive(Debug, Default)]
struct RegistryState {
    utilities: Vec<&'static str>,
    plugins: Vec<UiPlugin>,
    mixins: Vec<UiMixin>,
}

/// Installing a plugin twice is a no-op.
#[derive(Debug, Default)]
pub struct UiPluginRegistry {
    state: Mutex<RegistryState>,
}

impl UiPluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&self, plugin: UiPlugin) -> bool {
        let Ok(mut state) = self.state.lock() else {
            return false;
        };
        if state.plugins.iter().any(|installed| installed.name == plugin.name) {
            debug!(event = "shell.plugins.already_installed", plugin = plugin.name);
            return false;
        }
        debug!(event = "shell.plugins.installed", plugin = plugin.name);
        state.plugins.push(plugin);
        true
    }

    /// Registers a global page helper by name; repeats are ignored.
    pub fn utility(&self, name: &'static str) -> bool {
        let Ok(mut state) = self.state.lock() else {
            return false;
        };
        if state.utilities.contains(&name) {
            return false;
        }
        debug!(event = "shell.plugins.utility_registered", utility = name);
        state.utilities.push(name);
        true
    }

    pub fn utilities(&self) -> Vec<&'static str> {
        self.state
            .lock()
            .map(|state| state.utilities.clone())
            .unwrap_or_default()
    }

    pub fn mixin(&self, mixin: UiMixin) {
        if let Ok(mut state) = self.state.lock() {
            state.mixins.push(mixin);
        }
    }

    pub fn plugins(&self) -> Vec<UiPlugin> {
        self.state
            .lock()
            .map(|state| state.plugins.clone())
            .unwrap_or_default()
    }

    pub fn mixins(&self) -> Vec<UiMixin> {
        self.state
            .lock()
            .map(|state| state.mixins.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontendBootConfig {
    pub platform: PlatformInfo,
    pub devtools: bool,
    pub production_tip: bool,
    pub min_tls_version: TlsVersion,
    pub relative_time_locales: Vec<&'static str>,
    pub utilities: Vec<&'static str>,
    pub table_defaults: TableDefaults,
    pub plugins: Vec<UiPlugin>,
    pub mixins: Vec<UiMixin>,
}

impl FrontendBootConfig {
    /// Script assigning the config to a page global before any page script runs.
    pub fn initialization_script(&self) -> Result<String, serde_json::Error> {
        let encoded = serde_json::to_string(self)?;
        Ok(format!(
            "Object.defineProperty(window, {}, {{ value: Object.freeze({encoded}), configurable: false }});",
            serde_json::to_string(BOOT_CONFIG_GLOBAL)?
        ))
    }
}
