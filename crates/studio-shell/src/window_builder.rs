use std::sync::{Arc, Weak};

use tracing::{debug, info, warn};

use crate::{
    errors::WindowError,
    platform_info::PlatformInfo,
    remote_bridge::RemoteBridge,
    user_settings::GroupedUserSettings,
    window_config::{resolve_window_config, OpenOptions, WindowConfig},
    window_guards::{IpcRequest, NavigationDecision, NavigationGuard},
    window_host::{EventResponse, HostWindow, WindowEvent, WindowHost},
    window_registry::{WindowRecord, WindowRegistry},
};

/// Builds application windows and records them in the shared registry.
pub struct WindowFactory<H: WindowHost> {
    host: Arc<H>,
    platform: PlatformInfo,
    registry: Arc<WindowRegistry<H::Window>>,
    bridge: Arc<RemoteBridge>,
}

impl<H: WindowHost> Clone for WindowFactory<H> {
    fn clone(&self) -> Self {
        Self {
            host: Arc::clone(&self.host),
            platform: self.platform.clone(),
            registry: Arc::clone(&self.registry),
            bridge: Arc::clone(&self.bridge),
        }
    }
}

impl<H: WindowHost> WindowFactory<H> {
    pub fn new(
        host: Arc<H>,
        platform: PlatformInfo,
        registry: Arc<WindowRegistry<H::Window>>,
        bridge: Arc<RemoteBridge>,
    ) -> Self {
        Self {
            host,
            platform,
            registry,
            bridge,
        }
    }

    pub fn registry(&self) -> &Arc<WindowRegistry<H::Window>> {
        &self.registry
    }

    pub fn bridge(&self) -> &Arc<RemoteBridge> {
        &self.bridge
    }

    pub fn platform(&self) -> &PlatformInfo {
        &self.platform
    }

    pub fn active_windows(&self) -> Vec<Arc<WindowRecord<H::Window>>> {
        self.registry.active_windows()
    }

    /// Opens one window and appends it to the registry. Nothing is recorded
    /// when the runtime fails part-way; a half-built window is closed.
    pub fn build_window(
        &self,
        settings: &GroupedUserSettings,
        options: Option<&OpenOptions>,
    ) -> Result<(), WindowError> {
        let default_options = OpenOptions::default();
        let options = options.unwrap_or(&default_options);
        let config = resolve_window_config(
            settings,
            &self.platform,
            options,
            self.host.os_prefers_dark(),
        )?;

        info!(
            event = "shell.window.constructing",
            dark = config.dark,
            frame = config.frame,
            url = %config.load_url
        );
        let window = self.host.create_window(&config)?;
        let record = Arc::new(WindowRecord::new(window.clone()));
        if let Err(error) = self.prepare_window(&window, &record, &config) {
            self.roll_back(&window, &record, &error);
            return Err(error);
        }

        self.registry.push(record);
        debug!(
            event = "shell.window.registered",
            label = %window.label(),
            total = self.registry.len()
        );
        Ok(())
    }

    fn prepare_window(
        &self,
        window: &H::Window,
        record: &Arc<WindowRecord<H::Window>>,
        config: &WindowConfig,
    ) -> Result<(), WindowError> {
        if config.maximize {
            window.maximize()?;
        }
        window.show()?;

        self.bridge.enable(&window.label());
        window.set_zoom_factor(config.zoom_factor())?;

        self.install_callbacks(
            window,
            Arc::downgrade(record),
            NavigationGuard::new(config.load_url.clone()),
            config.reload_after_first_load,
        );

        window.load_url(&config.load_url)?;
        if config.open_devtools {
            window.open_devtools();
        }
        Ok(())
    }

    /// Undoes a half-built window: no bridge access, no native window left.
    fn roll_back(
        &self,
        window: &H::Window,
        record: &WindowRecord<H::Window>,
        error: &WindowError,
    ) {
        let label = window.label();
        warn!(
            event = "shell.window.build_rolled_back",
            label = %label,
            code = error.error_code(),
            error = %error
        );
        self.bridge.disable(&label);
        record.mark_closed();
        if let Err(close_error) = window.close() {
            warn!(
                event = "shell.window.close_failed",
                label = %label,
                error = %close_error
            );
        }
    }

    fn install_callbacks(
        &self,
        window: &H::Window,
        record: Weak<WindowRecord<H::Window>>,
        guard: NavigationGuard,
        reload_after_first_load: bool,
    ) {
        let host = Arc::clone(&self.host);
        let bridge = Arc::clone(&self.bridge);

        window.subscribe(Arc::new(move |event: &WindowEvent| {
            let Some(record) = record.upgrade() else {
                return EventResponse::Proceed;
            };

            match event {
                WindowEvent::Closed => {
                    record.mark_closed();
                    bridge.disable(record.label());
                    EventResponse::Proceed
                }
                WindowEvent::PageLoadFinished { url } => {
                    if reload_after_first_load {
                        match record.finish_load() {
                            Ok(true) => debug!(event = "shell.window.reloaded", url = %url),
                            Ok(false) => {}
                            Err(error) => warn!(
                                event = "shell.window.reload_failed",
                                error = %error
                            ),
                        }
                    }
                    EventResponse::Proceed
                }
                WindowEvent::WillNavigate { url } => match guard.decide_navigation(url) {
                    NavigationDecision::Allow => EventResponse::Proceed,
                    NavigationDecision::OpenExternally(external) => {
                        info!(event = "shell.window.navigate_external", url = %url);
                        if let Err(error) = host.open_external(&external) {
                            warn!(
                                event = "shell.window.open_external_failed",
                                url = %external,
                                error = %error
                            );
                        }
                        EventResponse::Prevent
                    }
                    NavigationDecision::Deny => {
                        warn!(event = "shell.window.navigate_denied", url = %url);
                        EventResponse::Prevent
                    }
                },
                WindowEvent::NewWindowRequested { url } => {
                    let response = guard.decide_new_window(url);
                    if response == EventResponse::Prevent {
                        debug!(event = "shell.window.new_window_denied", url = %url);
                    }
                    response
                }
                WindowEvent::IpcMessage { channel, args } => {
                    match IpcRequest::parse(channel, args) {
                        Some(IpcRequest::SetWindowTitle(title)) => {
                            if let Some(window) = record.window() {
                                if let Err(error) = window.set_title(&title) {
                                    warn!(
                                        event = "shell.window.set_title_failed",
                                        error = %error
                                    );
                                }
                            }
                            EventResponse::Prevent
                        }
                        None => EventResponse::Proceed,
                    }
                }
            }
        }));
    }
}
