use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use serde_json::Value;
use tracing::{debug, warn};

use crate::{errors::WindowError, window_host::HostWindow};

/// Bookkeeping for one window: the native handle while it lives, plus the
/// one-shot reload flag.
#[derive(Debug)]
pub struct WindowRecord<W: HostWindow> {
    label: String,
    window: Mutex<Option<W>>,
    reloaded: AtomicBool,
}

impl<W: HostWindow> WindowRecord<W> {
    pub fn new(window: W) -> Self {
        Self {
            label: window.label(),
            window: Mutex::new(Some(window)),
            reloaded: AtomicBool::new(false),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_active(&self) -> bool {
        self.window
            .lock()
            .map(|window| window.is_some())
            .unwrap_or(false)
    }

    pub fn window(&self) -> Option<W> {
        self.window.lock().ok().and_then(|window| window.clone())
    }

    /// Called from the close event; the record stays in the registry as inactive.
    pub fn mark_closed(&self) {
        if let Ok(mut window) = self.window.lock() {
            window.take();
        }
        debug!(event = "shell.window.closed", label = %self.label);
    }

    pub fn was_reloaded(&self) -> bool {
        self.reloaded.load(Ordering::Acquire)
    }

    /// Reloads the page the first time it finishes loading; later loads are ignored.
    pub fn finish_load(&self) -> Result<bool, WindowError> {
        if self
            .reloaded
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(false);
        }
        match self.window() {
            Some(window) => {
                window.reload()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// No-op once the window has closed.
    pub fn send(&self, channel: &str, payload: Value) -> Result<(), WindowError> {
        match self.window() {
            Some(window) => window.emit(channel, payload),
            None => Ok(()),
        }
    }
}

/// Append-only list of every window opened during the process lifetime.
#[derive(Debug)]
pub struct WindowRegistry<W: HostWindow> {
    records: Mutex<Vec<Arc<WindowRecord<W>>>>,
}

impl<W: HostWindow> Default for WindowRegistry<W> {
    fn default() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }
}

impl<W: HostWindow> WindowRegistry<W> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, record: Arc<WindowRecord<W>>) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record);
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live windows in creation order.
    pub fn active_windows(&self) -> Vec<Arc<WindowRecord<W>>> {
        self.records
            .lock()
            .map(|records| {
                records
                    .iter()
                    .filter(|record| record.is_active())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn find_active(&self, label: &str) -> Option<Arc<WindowRecord<W>>> {
        self.active_windows()
            .into_iter()
            .find(|record| record.label() == label)
    }

    pub fn broadcast(&self, channel: &str, payload: &Value) {
        for record in self.active_windows() {
            if let Err(error) = record.send(channel, payload.clone()) {
                warn!(
                    event = "shell.window.broadcast_failed",
                    label = %record.label(),
                    channel,
                    error = %error
                );
            }
        }
    }
}
