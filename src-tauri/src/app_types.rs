use std::sync::{Arc, OnceLock};

use studio_shell::{
    remote_bridge::RemoteBridge, window_registry::WindowRegistry, AppShell, PlatformInfo,
    WindowFactory,
};

use crate::tauri_window_host::TauriWindowHost;

/// Managed by the Tauri app for the lifetime of the process.
pub(crate) struct ShellState {
    pub(crate) host: Arc<TauriWindowHost>,
    pub(crate) factory: WindowFactory<TauriWindowHost>,
    shell: OnceLock<Arc<AppShell>>,
}

impl ShellState {
    pub(crate) fn new(host: TauriWindowHost, platform: PlatformInfo) -> Self {
        let host = Arc::new(host);
        let factory = WindowFactory::new(
            Arc::clone(&host),
            platform,
            Arc::new(WindowRegistry::new()),
            Arc::new(RemoteBridge::new()),
        );
        Self {
            host,
            factory,
            shell: OnceLock::new(),
        }
    }

    /// `None` until startup has mounted the shell.
    pub(crate) fn shell(&self) -> Option<Arc<AppShell>> {
        self.shell.get().cloned()
    }

    pub(crate) fn set_shell(&self, shell: Arc<AppShell>) {
        if self.shell.set(shell).is_err() {
            tracing::warn!(event = "desktop.shell.already_mounted");
        }
    }

    pub(crate) fn bridge_enabled(&self, label: &str) -> bool {
        self.factory.bridge().is_enabled(label)
    }
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct BridgeResult {
    pub(crate) ok: bool,
    pub(crate) reason: Option<String>,
}

impl BridgeResult {
    pub(crate) fn success() -> Self {
        Self {
            ok: true,
            reason: None,
        }
    }

    pub(crate) fn failure(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            reason: Some(reason.into()),
        }
    }
}

impl<E: std::fmt::Display> From<Result<(), E>> for BridgeResult {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::success(),
            Err(error) => Self::failure(error.to_string()),
        }
    }
}
