//! Runtime-neutral seam between the window factory and a GUI runtime.

use std::sync::{Arc, Mutex};

use serde_json::Value;
use url::Url;

use crate::{errors::WindowError, window_config::WindowConfig};

/// Events a host window reports to its subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowEvent {
    /// The page is about to navigate the top-level frame.
    WillNavigate { url: Url },
    /// The page asked for a new native window (`window.open`, target=_blank).
    NewWindowRequested { url: Url },
    /// A message the page sent on a named channel.
    IpcMessage { channel: String, args: Vec<Value> },
    PageLoadFinished { url: Url },
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    /// Let the runtime apply its default handling.
    Proceed,
    /// Suppress default handling (block navigation, deny window, swallow message).
    Prevent,
}

pub type WindowEventHandler = Arc<dyn Fn(&WindowEvent) -> EventResponse + Send + Sync>;

/// Subscriber list shared by host window implementations.
#[derive(Clone, Default)]
pub struct WindowEventHub {
    handlers: Arc<Mutex<Vec<WindowEventHandler>>>,
}

impl WindowEventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, handler: WindowEventHandler) {
        if let Ok(mut handlers) = self.handlers.lock() {
            handlers.push(handler);
        }
    }

    /// Runs every subscriber; any `Prevent` wins.
    pub fn dispatch(&self, event: &WindowEvent) -> EventResponse {
        // Snapshot so a handler may subscribe or dispatch without deadlocking.
        let handlers = match self.handlers.lock() {
            Ok(handlers) => handlers.clone(),
            Err(_) => return EventResponse::Proceed,
        };

        let mut response = EventResponse::Proceed;
        for handler in handlers {
            if handler(event) == EventResponse::Prevent {
                response = EventResponse::Prevent;
            }
        }
        response
    }

    pub fn clear(&self) {
        if let Ok(mut handlers) = self.handlers.lock() {
            handlers.clear();
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.lock().map(|handlers| handlers.len()).unwrap_or(0)
    }
}

impl std::fmt::Debug for WindowEventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowEventHub")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// A native window owned by the host runtime.
pub trait HostWindow: Clone + Send + Sync + 'static {
    fn label(&self) -> String;
    fn maximize(&self) -> Result<(), WindowError>;
    fn show(&self) -> Result<(), WindowError>;
    fn set_zoom_factor(&self, factor: f64) -> Result<(), WindowError>;
    fn load_url(&self, url: &Url) -> Result<(), WindowError>;
    fn reload(&self) -> Result<(), WindowError>;
    fn open_devtools(&self);
    fn set_title(&self, title: &str) -> Result<(), WindowError>;
    fn emit(&self, channel: &str, payload: Value) -> Result<(), WindowError>;
    /// Destroys the native window; subscribers then see `Closed`.
    fn close(&self) -> Result<(), WindowError>;
    fn subscribe(&self, handler: WindowEventHandler);
}

/// Window creation and OS integration offered by the host runtime.
pub trait WindowHost: Send + Sync + 'static {
    type Window: HostWindow;

    /// Creates a hidden window; the factory shows it and loads the page.
    fn create_window(&self, config: &WindowConfig) -> Result<Self::Window, WindowError>;

    fn os_prefers_dark(&self) -> bool;

    fn open_external(&self, url: &Url) -> Result<(), WindowError>;
}
