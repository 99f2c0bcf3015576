//! Page-side globals exposed to windows that run with bridge access.

pub(crate) const DESKTOP_BRIDGE_GLOBAL: &str = "studioDesktop";

pub(crate) const BRIDGE_COMMANDS: [&str; 7] = [
    "desktop_bridge_is_desktop_runtime",
    "desktop_bridge_set_window_title",
    "desktop_bridge_open_external_url",
    "desktop_bridge_get_settings",
    "desktop_bridge_save_setting",
    "desktop_bridge_open_window",
    "desktop_bridge_format_relative_time",
];

const BRIDGE_SCRIPT_TEMPLATE: &str = r#"(() => {
  if (window.__GLOBAL__) return;
  const internals = window.__TAURI_INTERNALS__;
  if (!internals) return;
  const invoke = (command, args) => internals.invoke(command, args || {});
  Object.defineProperty(window, "__GLOBAL__", {
    configurable: false,
    value: Object.freeze({
      isDesktopRuntime: () => invoke("desktop_bridge_is_desktop_runtime"),
      setWindowTitle: (title) => invoke("desktop_bridge_set_window_title", { title }),
      openExternal: (url) => invoke("desktop_bridge_open_external_url", { url }),
      getSettings: () => invoke("desktop_bridge_get_settings"),
      saveSetting: (setting) => invoke("desktop_bridge_save_setting", { setting }),
      openWindow: (options) => invoke("desktop_bridge_open_window", { options: options || {} }),
      formatRelativeTime: (timestamp, locale) =>
        invoke("desktop_bridge_format_relative_time", { timestamp, locale }),
    }),
  });
})();"#;

pub(crate) fn bridge_script() -> String {
    BRIDGE_SCRIPT_TEMPLATE.replace("__GLOBAL__", DESKTOP_BRIDGE_GLOBAL)
}
