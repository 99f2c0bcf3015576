use std::{collections::BTreeSet, sync::Mutex};

use tracing::debug;

/// Windows whose pages may call privileged bridge commands.
#[derive(Debug, Default)]
pub struct RemoteBridge {
    enabled: Mutex<BTreeSet<String>>,
}

impl RemoteBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(&self, label: &str) {
        if let Ok(mut enabled) = self.enabled.lock() {
            if enabled.insert(label.to_string()) {
                debug!(event = "shell.bridge.enabled", label);
            }
        }
    }

    pub fn disable(&self, label: &str) {
        if let Ok(mut enabled) = self.enabled.lock() {
            enabled.remove(label);
        }
    }

    pub fn is_enabled(&self, label: &str) -> bool {
        self.enabled
            .lock()
            .map(|enabled| enabled.contains(label))
            .unwrap_or(false)
    }
}
