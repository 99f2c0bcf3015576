//! Host-to-UI messages: inbound channel names, the typed events they map
//! to, and the bus the UI listens on.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::{
    settings_store::SettingsStore,
    user_settings::UserSetting,
    value_utils::{deep_map_keys, snake_to_camel},
};

pub const SETTINGS_CHANGED: &str = "settingsChanged";
pub const MENU_STYLE_CHANGED: &str = "menuStyleChanged";
pub const DISCONNECT: &str = "disconnect";
pub const NEW_TAB: &str = "newTab";
pub const CLOSE_TAB: &str = "closeTab";
pub const TOGGLE_SIDEBAR: &str = "toggleSidebar";
pub const QUICK_SEARCH: &str = "quickSearch";

pub const INBOUND_CHANNELS: [&str; 7] = [
    SETTINGS_CHANGED,
    MENU_STYLE_CHANGED,
    DISCONNECT,
    NEW_TAB,
    CLOSE_TAB,
    TOGGLE_SIDEBAR,
    QUICK_SEARCH,
];

/// Channel the bus is forwarded to on every page.
pub const APP_EVENT_CHANNEL: &str = "app-event";

const BUS_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum AppEvent {
    SettingsChanged(UserSetting),
    MenuStyleChanged(String),
    Disconnect,
    NewTab,
    CloseTab,
    ToggleSidebar,
    QuickSearch,
}

impl AppEvent {
    pub fn from_message(channel: &str, payload: Value) -> Option<Self> {
        match channel {
            SETTINGS_CHANGED => {
                serde_json::from_value(deep_map_keys(&payload, |_, key| snake_to_camel(key)))
                    .ok()
                    .map(AppEvent::SettingsChanged)
            }
            MENU_STYLE_CHANGED => payload
                .as_str()
                .map(|style| AppEvent::MenuStyleChanged(style.to_string())),
            DISCONNECT => Some(AppEvent::Disconnect),
            NEW_TAB => Some(AppEvent::NewTab),
            CLOSE_TAB => Some(AppEvent::CloseTab),
            TOGGLE_SIDEBAR => Some(AppEvent::ToggleSidebar),
            QUICK_SEARCH => Some(AppEvent::QuickSearch),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppEventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl Default for AppEventBus {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(BUS_CAPACITY);
        Self { sender }
    }
}

impl AppEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// Returns how many listeners received the event.
    pub fn publish(&self, event: AppEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

/// Turns inbound host messages into [`AppEvent`]s on the bus.
#[derive(Debug)]
pub struct AppEventHandler {
    bus: AppEventBus,
    store: Arc<SettingsStore>,
}

impl AppEventHandler {
    pub fn new(bus: AppEventBus, store: Arc<SettingsStore>) -> Self {
        Self { bus, store }
    }

    pub fn channels(&self) -> &'static [&'static str] {
        &INBOUND_CHANNELS
    }

    /// Returns `false` for unknown channels or undecodable payloads.
    pub fn handle(&self, channel: &str, payload: Value) -> bool {
        let Some(event) = AppEvent::from_message(channel, payload) else {
            warn!(event = "shell.app_events.unhandled_message", channel);
            return false;
        };

        if let AppEvent::SettingsChanged(setting) = &event {
            self.store.apply_external(setting.clone());
        }
        let delivered = self.bus.publish(event);
        debug!(event = "shell.app_events.published", channel, delivered);
        true
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        app_db::{AppDb, AppDbConnection, DbLogging},
        platform_info::OsFamily,
    };

    fn handler() -> (AppEventHandler, AppEventBus, Arc<SettingsStore>) {
        let db = Arc::new(AppDbConnection::open("unused.json".into(), DbLogging::All));
        let store = Arc::new(SettingsStore::new(db, OsFamily::Linux));
        let bus = AppEventBus::new();
        (AppEventHandler::new(bus.clone(), Arc::clone(&store)), bus, store)
    }

    #[test]
    fn known_channels_are_published_to_the_bus() {
        let (handler, bus, _) = handler();
        let mut receiver = bus.subscribe();

        assert!(handler.handle(TOGGLE_SIDEBAR, Value::Null));
        assert!(handler.handle(MENU_STYLE_CHANGED, json!("native")));

        assert_eq!(receiver.try_recv().expect("first"), AppEvent::ToggleSidebar);
        assert_eq!(
            receiver.try_recv().expect("second"),
            AppEvent::MenuStyleChanged("native".to_string())
        );
    }

    #[test]
    fn settings_changed_updates_store_in_memory() {
        let (handler, _, store) = handler();
        assert!(handler.handle(
            SETTINGS_CHANGED,
            json!({"key": "theme", "value": "dark", "valueType": "string"})
        ));
        assert_eq!(store.settings().theme().as_deref(), Some("dark"));
    }

    #[test]
    fn settings_changed_accepts_snake_case_payload_keys() {
        let (handler, _, store) = handler();
        assert!(handler.handle(
            SETTINGS_CHANGED,
            json!({"key": "zoomLevel", "value": 1, "value_type": "int"})
        ));
        assert_eq!(store.settings().zoom_level(), 1.0);
    }

    #[test]
    fn unknown_channels_and_bad_payloads_are_rejected() {
        let (handler, _, _) = handler();
        assert!(!handler.handle("beginExport", Value::Null));
        assert!(!handler.handle(MENU_STYLE_CHANGED, json!(42)));
        assert_eq!(handler.channels().len(), 7);
    }

    #[test]
    fn events_serialize_with_type_and_payload() {
        assert_eq!(
            serde_json::to_value(AppEvent::MenuStyleChanged("client".into())).expect("serialize"),
            json!({"type": "menuStyleChanged", "payload": "client"})
        );
        assert_eq!(
            serde_json::to_value(AppEvent::NewTab).expect("serialize"),
            json!({"type": "newTab"})
        );
    }
}
