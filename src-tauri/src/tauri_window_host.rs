use std::sync::{
    atomic::{AtomicUsize, Ordering},
    RwLock,
};

use serde_json::Value;
use studio_shell::{
    window_config::WindowConfig,
    window_host::{
        EventResponse, HostWindow, WindowEvent, WindowEventHandler, WindowEventHub, WindowHost,
    },
    WindowError,
};
use tauri::{
    webview::{NewWindowResponse, PageLoadEvent},
    window::Color,
    AppHandle, Emitter, EventTarget, Manager, Theme, WebviewUrl, WebviewWindow,
    WebviewWindowBuilder,
};
use tracing::{debug, warn};
use url::Url;

use crate::{desktop_bridge, external_url, BLANK_PAGE_URL, WINDOW_LABEL_PREFIX, WINDOW_TITLE};

/// A Tauri webview window plus the subscribers of its events.
#[derive(Clone)]
pub(crate) struct TauriWindow {
    window: WebviewWindow,
    hub: WindowEventHub,
}

impl TauriWindow {
    /// Feeds an event raised outside the webview callbacks, such as a
    /// bridge command, to this window's subscribers.
    pub(crate) fn dispatch(&self, event: &WindowEvent) -> EventResponse {
        self.hub.dispatch(event)
    }

    pub(crate) fn focus(&self) -> Result<(), WindowError> {
        self.window
            .set_focus()
            .map_err(|error| WindowError::operation("focus", error))
    }
}

impl HostWindow for TauriWindow {
    fn label(&self) -> String {
        self.window.label().to_string()
    }

    fn maximize(&self) -> Result<(), WindowError> {
        self.window
            .maximize()
            .map_err(|error| WindowError::operation("maximize", error))
    }

    fn show(&self) -> Result<(), WindowError> {
        self.window
            .show()
            .map_err(|error| WindowError::operation("show", error))
    }

    fn set_zoom_factor(&self, factor: f64) -> Result<(), WindowError> {
        self.window
            .set_zoom(factor)
            .map_err(|error| WindowError::operation("set_zoom", error))
    }

    fn load_url(&self, url: &Url) -> Result<(), WindowError> {
        self.window
            .navigate(url.clone())
            .map_err(|error| WindowError::operation("navigate", error))
    }

    fn reload(&self) -> Result<(), WindowError> {
        self.window
            .eval("window.location.reload()")
            .map_err(|error| WindowError::operation("reload", error))
    }

    fn open_devtools(&self) {
        self.window.open_devtools();
    }

    fn set_title(&self, title: &str) -> Result<(), WindowError> {
        self.window
            .set_title(title)
            .map_err(|error| WindowError::operation("set_title", error))
    }

    fn emit(&self, channel: &str, payload: Value) -> Result<(), WindowError> {
        self.window
            .emit_to(
                EventTarget::webview_window(self.window.label()),
                channel,
                payload,
            )
            .map_err(|error| WindowError::operation("emit", error))
    }

    fn close(&self) -> Result<(), WindowError> {
        self.window
            .destroy()
            .map_err(|error| WindowError::operation("destroy", error))
    }

    fn subscribe(&self, handler: WindowEventHandler) {
        self.hub.subscribe(handler);
    }
}

pub(crate) fn is_blank_page(url: &Url) -> bool {
    url.scheme() == "about"
}

pub(crate) fn window_label(index: usize) -> String {
    format!("{WINDOW_LABEL_PREFIX}{index}")
}

/// An open window's theme wins; otherwise ask the OS.
pub(crate) fn prefers_dark(
    window_theme: Option<Theme>,
    system_dark: impl FnOnce() -> bool,
) -> bool {
    match window_theme {
        Some(theme) => theme == Theme::Dark,
        None => system_dark(),
    }
}

fn system_prefers_dark() -> bool {
    match dark_light::detect() {
        Ok(mode) => mode == dark_light::Mode::Dark,
        Err(error) => {
            warn!(event = "desktop.theme.detect_failed", error = %error);
            false
        }
    }
}

pub(crate) fn title_bar_color(config: &WindowConfig) -> Color {
    let rgb = config.background_color;
    Color(rgb.0, rgb.1, rgb.2, 255)
}

pub(crate) struct TauriWindowHost {
    app: AppHandle,
    created: AtomicUsize,
    boot_script: RwLock<Option<String>>,
}

impl TauriWindowHost {
    pub(crate) fn new(app: AppHandle) -> Self {
        Self {
            app,
            created: AtomicUsize::new(0),
            boot_script: RwLock::new(None),
        }
    }

    /// Script every later window runs before its page scripts.
    pub(crate) fn set_boot_script(&self, script: String) {
        if let Ok(mut boot_script) = self.boot_script.write() {
            *boot_script = Some(script);
        }
    }

    fn initialization_scripts(&self, config: &WindowConfig) -> Vec<String> {
        let mut scripts = Vec::new();
        if let Ok(boot_script) = self.boot_script.read() {
            scripts.extend(boot_script.clone());
        }
        if config.expose_bridge_globals {
            scripts.push(desktop_bridge::bridge_script());
        }
        scripts
    }
}

impl WindowHost for TauriWindowHost {
    type Window = TauriWindow;

    fn create_window(&self, config: &WindowConfig) -> Result<TauriWindow, WindowError> {
        let label = window_label(self.created.fetch_add(1, Ordering::SeqCst) + 1);
        let blank = Url::parse(BLANK_PAGE_URL).map_err(|source| WindowError::InvalidUrl {
            url: BLANK_PAGE_URL.to_string(),
            source,
        })?;
        let hub = WindowEventHub::new();

        let navigation_hub = hub.clone();
        let new_window_hub = hub.clone();
        let page_load_hub = hub.clone();
        let mut builder = WebviewWindowBuilder::new(&self.app, &label, WebviewUrl::External(blank))
            .title(WINDOW_TITLE)
            .inner_size(config.width, config.height)
            .min_inner_size(config.min_width, config.min_height)
            .visible(false)
            .decorations(config.frame)
            .background_color(title_bar_color(config))
            .on_navigation(move |url| {
                if is_blank_page(url) {
                    return true;
                }
                navigation_hub.dispatch(&WindowEvent::WillNavigate { url: url.clone() })
                    == EventResponse::Proceed
            })
            .on_new_window(move |url, _features| {
                match new_window_hub.dispatch(&WindowEvent::NewWindowRequested { url }) {
                    EventResponse::Proceed => NewWindowResponse::Allow,
                    EventResponse::Prevent => NewWindowResponse::Deny,
                }
            })
            .on_page_load(move |_webview, payload| {
                if matches!(payload.event(), PageLoadEvent::Finished)
                    && !is_blank_page(payload.url())
                {
                    page_load_hub.dispatch(&WindowEvent::PageLoadFinished {
                        url: payload.url().clone(),
                    });
                }
            });

        if config.dark {
            builder = builder.theme(Some(Theme::Dark));
        }

        #[cfg(target_os = "macos")]
        if config.title_bar_style == studio_shell::window_config::TitleBarStyle::Hidden {
            builder = builder
                .title_bar_style(tauri::TitleBarStyle::Overlay)
                .hidden_title(true);
        }

        for script in self.initialization_scripts(config) {
            builder = builder.initialization_script(script.as_str());
        }

        let window = builder.build().map_err(|error| WindowError::Create {
            message: error.to_string(),
        })?;

        let close_hub = hub.clone();
        window.on_window_event(move |event| {
            if let tauri::WindowEvent::Destroyed = event {
                close_hub.dispatch(&WindowEvent::Closed);
            }
        });

        debug!(event = "desktop.window.created", label = %label);
        Ok(TauriWindow { window, hub })
    }

    fn os_prefers_dark(&self) -> bool {
        let window_theme = self
            .app
            .webview_windows()
            .values()
            .find_map(|window| window.theme().ok());
        prefers_dark(window_theme, system_prefers_dark)
    }

    fn open_external(&self, url: &Url) -> Result<(), WindowError> {
        external_url::open_url_with_system_browser(url.as_str()).map_err(|message| {
            WindowError::OpenExternal {
                url: url.to_string(),
                message,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use studio_shell::{
        platform_info::{OsFamily, PlatformInfo},
        user_settings::GroupedUserSettings,
        window_config::{resolve_window_config, OpenOptions},
    };

    use super::*;

    fn config(dark: bool) -> WindowConfig {
        let platform = PlatformInfo::from_lookup(OsFamily::Linux, |_| None);
        resolve_window_config(
            &GroupedUserSettings::default(),
            &platform,
            &OpenOptions::default(),
            dark,
        )
        .expect("config")
    }

    #[test]
    fn labels_are_numbered_from_one() {
        assert_eq!(window_label(1), "window-1");
        assert_eq!(window_label(12), "window-12");
    }

    #[test]
    fn blank_page_is_not_a_navigation() {
        assert!(is_blank_page(&Url::parse(BLANK_PAGE_URL).expect("blank")));
        assert!(!is_blank_page(
            &Url::parse("tauri://localhost/index.html").expect("app url")
        ));
    }

    #[test]
    fn system_theme_is_asked_only_without_an_open_window() {
        assert!(prefers_dark(None, || true));
        assert!(!prefers_dark(None, || false));
        assert!(prefers_dark(Some(Theme::Dark), || panic!("window theme wins")));
        assert!(!prefers_dark(Some(Theme::Light), || panic!("window theme wins")));
    }

    #[test]
    fn background_color_follows_theme() {
        assert_eq!(title_bar_color(&config(true)), Color(0x25, 0x25, 0x25, 255));
        assert_eq!(title_bar_color(&config(false)), Color(0xff, 0xff, 0xff, 255));
    }
}
