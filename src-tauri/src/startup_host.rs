use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use studio_shell::{
    app_events::{AppEventHandler, APP_EVENT_CHANNEL},
    window_registry::WindowRegistry,
    AppShell, StartupError, StartupHost, WindowError,
};
use tauri::{AppHandle, Listener, Manager};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::{app_types::ShellState, tauri_window_host::TauriWindow};

/// Event payloads arrive as JSON text; anything unparsable is `null`.
pub(crate) fn parse_event_payload(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or(Value::Null)
}

pub(crate) struct TauriStartupHost {
    app: AppHandle,
}

impl TauriStartupHost {
    pub(crate) fn new(app: AppHandle) -> Self {
        Self { app }
    }

    fn state(&self) -> Result<tauri::State<'_, ShellState>, StartupError> {
        self.app
            .try_state::<ShellState>()
            .ok_or_else(|| StartupError::InboundHandler {
                message: "shell state is not managed".to_string(),
            })
    }
}

fn forward_app_events(shell: &AppShell, registry: Arc<WindowRegistry<TauriWindow>>) {
    let mut receiver = shell.events().subscribe();
    tauri::async_runtime::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => match serde_json::to_value(&event) {
                    Ok(payload) => registry.broadcast(APP_EVENT_CHANNEL, &payload),
                    Err(error) => warn!(
                        event = "desktop.app_events.encode_failed",
                        error = %error
                    ),
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!(event = "desktop.app_events.lagged", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

#[async_trait]
impl StartupHost for TauriStartupHost {
    fn attach_inbound(&self, handler: Arc<AppEventHandler>) -> Result<(), StartupError> {
        for channel in handler.channels() {
            let channel: &'static str = *channel;
            let handler = Arc::clone(&handler);
            self.app.listen_any(channel, move |event| {
                handler.handle(channel, parse_event_payload(event.payload()));
            });
            debug!(event = "desktop.app_events.listening", channel);
        }
        Ok(())
    }

    async fn mount(&self, shell: Arc<AppShell>) -> Result<(), StartupError> {
        let state = self.state()?;
        let boot_script = shell.boot_config().initialization_script().map_err(|error| {
            StartupError::Mount(WindowError::Create {
                message: format!("failed to encode boot config: {error}"),
            })
        })?;

        state.host.set_boot_script(boot_script);
        state.set_shell(Arc::clone(&shell));
        state.factory.build_window(&shell.settings(), None)?;
        forward_app_events(&shell, Arc::clone(state.factory.registry()));

        info!(
            event = "desktop.shell.mounted",
            windows = state.factory.active_windows().len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::parse_event_payload;

    #[test]
    fn event_payloads_parse_as_json_or_null() {
        assert_eq!(
            parse_event_payload(r#"{"key":"theme","value":"dark","valueType":"string"}"#)["value"],
            json!("dark")
        );
        assert_eq!(parse_event_payload("\"native\""), json!("native"));
        assert_eq!(parse_event_payload(""), serde_json::Value::Null);
        assert_eq!(parse_event_payload("{broken"), serde_json::Value::Null);
    }
}
