//! In-process stand-ins for a GUI runtime, used by unit tests.

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};

use serde_json::Value;
use url::Url;

use crate::{
    errors::WindowError,
    window_config::WindowConfig,
    window_host::{EventResponse, HostWindow, WindowEvent, WindowEventHandler, WindowEventHub, WindowHost},
};

#[derive(Debug, Default)]
struct FakeWindowState {
    maximized: bool,
    shown: bool,
    devtools_open: bool,
    zoom_factor: Option<f64>,
    title: Option<String>,
    loaded: Vec<Url>,
    emitted: Vec<(String, Value)>,
    closed: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct FakeWindow {
    label: String,
    hub: WindowEventHub,
    reloads: Arc<AtomicUsize>,
    fail_load: Arc<AtomicBool>,
    state: Arc<Mutex<FakeWindowState>>,
}

impl FakeWindow {
    pub(crate) fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            hub: WindowEventHub::new(),
            reloads: Arc::new(AtomicUsize::new(0)),
            fail_load: Arc::new(AtomicBool::new(false)),
            state: Arc::new(Mutex::new(FakeWindowState::default())),
        }
    }

    /// Simulates the runtime raising `event` on this window.
    pub(crate) fn fire(&self, event: WindowEvent) -> EventResponse {
        self.hub.dispatch(&event)
    }

    pub(crate) fn reload_count(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }

    pub(crate) fn emitted(&self) -> Vec<(String, Value)> {
        self.state.lock().expect("fake window state").emitted.clone()
    }

    pub(crate) fn title(&self) -> Option<String> {
        self.state.lock().expect("fake window state").title.clone()
    }

    pub(crate) fn loaded(&self) -> Vec<Url> {
        self.state.lock().expect("fake window state").loaded.clone()
    }

    pub(crate) fn zoom_factor(&self) -> Option<f64> {
        self.state.lock().expect("fake window state").zoom_factor
    }

    pub(crate) fn devtools_open(&self) -> bool {
        self.state.lock().expect("fake window state").devtools_open
    }

    pub(crate) fn closed(&self) -> bool {
        self.state.lock().expect("fake window state").closed
    }

    pub(crate) fn maximized_and_shown(&self) -> (bool, bool) {
        let state = self.state.lock().expect("fake window state");
        (state.maximized, state.shown)
    }
}

impl HostWindow for FakeWindow {
    fn label(&self) -> String {
        self.label.clone()
    }

    fn maximize(&self) -> Result<(), WindowError> {
        self.state.lock().expect("fake window state").maximized = true;
        Ok(())
    }

    fn show(&self) -> Result<(), WindowError> {
        self.state.lock().expect("fake window state").shown = true;
        Ok(())
    }

    fn set_zoom_factor(&self, factor: f64) -> Result<(), WindowError> {
        self.state.lock().expect("fake window state").zoom_factor = Some(factor);
        Ok(())
    }

    fn load_url(&self, url: &Url) -> Result<(), WindowError> {
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(WindowError::operation("navigate", "webview crashed"));
        }
        self.state
            .lock()
            .expect("fake window state")
            .loaded
            .push(url.clone());
        Ok(())
    }

    fn reload(&self) -> Result<(), WindowError> {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn open_devtools(&self) {
        self.state.lock().expect("fake window state").devtools_open = true;
    }

    fn set_title(&self, title: &str) -> Result<(), WindowError> {
        self.state.lock().expect("fake window state").title = Some(title.to_string());
        Ok(())
    }

    fn emit(&self, channel: &str, payload: Value) -> Result<(), WindowError> {
        self.state
            .lock()
            .expect("fake window state")
            .emitted
            .push((channel.to_string(), payload));
        Ok(())
    }

    fn close(&self) -> Result<(), WindowError> {
        self.state.lock().expect("fake window state").closed = true;
        self.hub.dispatch(&WindowEvent::Closed);
        Ok(())
    }

    fn subscribe(&self, handler: WindowEventHandler) {
        self.hub.subscribe(handler);
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeHost {
    pub(crate) prefers_dark: bool,
    pub(crate) fail_create: AtomicBool,
    pub(crate) fail_load: AtomicBool,
    created: Mutex<Vec<(FakeWindow, WindowConfig)>>,
    opened_external: Mutex<Vec<Url>>,
}

impl FakeHost {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn dark() -> Self {
        Self {
            prefers_dark: true,
            ..Self::default()
        }
    }

    pub(crate) fn created(&self) -> Vec<(FakeWindow, WindowConfig)> {
        self.created.lock().expect("fake host state").clone()
    }

    pub(crate) fn last_window(&self) -> FakeWindow {
        self.created()
            .last()
            .map(|(window, _)| window.clone())
            .expect("a window was created")
    }

    pub(crate) fn opened_external(&self) -> Vec<Url> {
        self.opened_external.lock().expect("fake host state").clone()
    }
}

impl WindowHost for FakeHost {
    type Window = FakeWindow;

    fn create_window(&self, config: &WindowConfig) -> Result<FakeWindow, WindowError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(WindowError::Create {
                message: "display unavailable".to_string(),
            });
        }
        let mut created = self.created.lock().expect("fake host state");
        let window = FakeWindow::new(&format!("window-{}", created.len() + 1));
        window
            .fail_load
            .store(self.fail_load.load(Ordering::SeqCst), Ordering::SeqCst);
        created.push((window.clone(), config.clone()));
        Ok(window)
    }

    fn os_prefers_dark(&self) -> bool {
        self.prefers_dark
    }

    fn open_external(&self, url: &Url) -> Result<(), WindowError> {
        self.opened_external
            .lock()
            .expect("fake host state")
            .push(url.clone());
        Ok(())
    }
}
