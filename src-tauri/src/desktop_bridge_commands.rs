use chrono::{DateTime, Utc};
use serde_json::Value;
use studio_shell::{
    app_events::SETTINGS_CHANGED,
    settings_store::StoreAction,
    user_settings::{GroupedUserSettings, UserSetting},
    window_config::OpenOptions,
    window_guards::SET_WINDOW_TITLE_CHANNEL,
    window_host::WindowEvent,
    AppShell,
};
use tauri::{AppHandle, Manager, State, WebviewWindow};
use tracing::{info, warn};

use crate::{
    app_types::{BridgeResult, ShellState},
    external_url::{open_url_with_system_browser, parse_openable_url},
    DEFAULT_RELATIVE_TIME_LOCALE,
};

const BRIDGE_DISABLED: &str = "Desktop bridge is not enabled for this window.";
const SHELL_NOT_READY: &str = "Application shell is not mounted yet.";

fn mounted_shell(state: &ShellState, window: &WebviewWindow) -> Result<std::sync::Arc<AppShell>, String> {
    if !state.bridge_enabled(window.label()) {
        warn!(event = "desktop.bridge.denied", label = %window.label());
        return Err(BRIDGE_DISABLED.to_string());
    }
    state.shell().ok_or_else(|| SHELL_NOT_READY.to_string())
}

pub(crate) fn relative_time_target(timestamp_ms: i64) -> Result<DateTime<Utc>, String> {
    DateTime::from_timestamp_millis(timestamp_ms)
        .ok_or_else(|| format!("Timestamp {timestamp_ms} is out of range."))
}

#[tauri::command]
pub(crate) fn desktop_bridge_is_desktop_runtime() -> bool {
    true
}

#[tauri::command]
pub(crate) fn desktop_bridge_set_window_title(
    window: WebviewWindow,
    state: State<'_, ShellState>,
    title: String,
) -> BridgeResult {
    if !state.bridge_enabled(window.label()) {
        return BridgeResult::failure(BRIDGE_DISABLED);
    }
    let Some(host_window) = state
        .factory
        .registry()
        .find_active(window.label())
        .and_then(|record| record.window())
    else {
        return BridgeResult::failure("Window is not registered.");
    };

    host_window.dispatch(&WindowEvent::IpcMessage {
        channel: SET_WINDOW_TITLE_CHANNEL.to_string(),
        args: vec![Value::String(title)],
    });
    BridgeResult::success()
}

#[tauri::command]
pub(crate) fn desktop_bridge_open_external_url(
    window: WebviewWindow,
    state: State<'_, ShellState>,
    url: String,
) -> BridgeResult {
    if !state.bridge_enabled(window.label()) {
        return BridgeResult::failure(BRIDGE_DISABLED);
    }
    let parsed = match parse_openable_url(&url) {
        Ok(parsed) => parsed,
        Err(error) => return BridgeResult::failure(error),
    };

    info!(event = "desktop.bridge.open_external", url = %parsed);
    open_url_with_system_browser(parsed.as_str()).into()
}

#[tauri::command]
pub(crate) fn desktop_bridge_get_settings(
    window: WebviewWindow,
    state: State<'_, ShellState>,
) -> Result<GroupedUserSettings, String> {
    Ok(mounted_shell(&state, &window)?.settings())
}

#[tauri::command]
pub(crate) async fn desktop_bridge_save_setting(
    app_handle: AppHandle,
    window: WebviewWindow,
    setting: UserSetting,
) -> BridgeResult {
    let (shell, registry) = {
        let state = app_handle.state::<ShellState>();
        match mounted_shell(&state, &window) {
            Ok(shell) => (shell, std::sync::Arc::clone(state.factory.registry())),
            Err(reason) => return BridgeResult::failure(reason),
        }
    };

    if let Err(error) = shell
        .store()
        .dispatch(StoreAction::SaveSetting(setting.clone()))
        .await
    {
        warn!(
            event = "desktop.bridge.save_setting_failed",
            code = error.error_code(),
            error = %error
        );
        return BridgeResult::failure(error.to_string());
    }

    match serde_json::to_value(&setting) {
        Ok(payload) => {
            registry.broadcast(SETTINGS_CHANGED, &payload);
            BridgeResult::success()
        }
        Err(error) => BridgeResult::failure(error.to_string()),
    }
}

/// Async so window creation never runs on the main thread of a sync
/// command, which deadlocks on Windows.
#[tauri::command]
pub(crate) async fn desktop_bridge_open_window(
    app_handle: AppHandle,
    window: WebviewWindow,
    options: Option<OpenOptions>,
) -> BridgeResult {
    let state = app_handle.state::<ShellState>();
    let shell = match mounted_shell(&state, &window) {
        Ok(shell) => shell,
        Err(reason) => return BridgeResult::failure(reason),
    };
    state
        .factory
        .build_window(&shell.settings(), options.as_ref())
        .into()
}

#[tauri::command]
pub(crate) fn desktop_bridge_format_relative_time(
    window: WebviewWindow,
    state: State<'_, ShellState>,
    timestamp: i64,
    locale: Option<String>,
) -> Result<String, String> {
    let shell = mounted_shell(&state, &window)?;
    let then = relative_time_target(timestamp)?;
    let locale = locale.as_deref().unwrap_or(DEFAULT_RELATIVE_TIME_LOCALE);
    shell
        .relative_time()
        .format(Utc::now(), then, locale)
        .ok_or_else(|| format!("Relative time locale '{locale}' is not registered."))
}
