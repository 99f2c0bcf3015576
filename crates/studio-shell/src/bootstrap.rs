//! One-shot process startup.
//!
//! Each step is a precondition for the next. A failure anywhere is logged
//! and returned; no UI is mounted after a failed step.

use std::{marker::PhantomData, sync::Arc};

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::{
    app_db::{AppDb, DbLogging},
    app_events::{AppEventBus, AppEventHandler},
    errors::StartupError,
    logging::{init_logging, LogConfig},
    platform_info::PlatformInfo,
    relative_time::{english, RelativeTimeLocales},
    runtime_paths::RuntimePaths,
    settings_store::{SettingsStore, StoreAction},
    tls_policy::{min_tls_version, set_min_tls_version, TlsVersion},
    ui_plugins::{
        default_plugins, FrontendBootConfig, ShortcutKeys, TableDefaults, UiMixin,
        UiPluginRegistry,
    },
    user_settings::GroupedUserSettings,
    value_utils::DEEP_MAP_KEYS,
};

pub const HEADER_SORT_MODULE: &str = "headerSort";

/// Root UI shell: the settings store plus everything the page needs to boot.
#[derive(Debug)]
pub struct AppShell {
    platform: PlatformInfo,
    store: Arc<SettingsStore>,
    events: AppEventBus,
    plugins: Arc<UiPluginRegistry>,
    table_defaults: TableDefaults,
    relative_time: Arc<RelativeTimeLocales>,
}

impl AppShell {
    pub fn store(&self) -> &Arc<SettingsStore> {
        &self.store
    }

    pub fn events(&self) -> &AppEventBus {
        &self.events
    }

    pub fn relative_time(&self) -> &Arc<RelativeTimeLocales> {
        &self.relative_time
    }

    pub fn settings(&self) -> GroupedUserSettings {
        self.store.settings()
    }

    pub fn boot_config(&self) -> FrontendBootConfig {
        FrontendBootConfig {
            platform: self.platform.clone(),
            devtools: self.platform.is_development(),
            production_tip: false,
            min_tls_version: min_tls_version(),
            relative_time_locales: self.relative_time.registered(),
            utilities: self.plugins.utilities(),
            table_defaults: self.table_defaults.clone(),
            plugins: self.plugins.plugins(),
            mixins: self.plugins.mixins(),
        }
    }
}

/// The host process side of startup: inbound messages and mounting.
#[async_trait]
pub trait StartupHost: Send + Sync {
    fn attach_inbound(&self, handler: Arc<AppEventHandler>) -> Result<(), StartupError>;

    async fn mount(&self, shell: Arc<AppShell>) -> Result<(), StartupError>;
}

pub struct AppBootstrapper<D: AppDb> {
    platform: PlatformInfo,
    paths: RuntimePaths,
    _db: PhantomData<fn() -> D>,
}

impl<D: AppDb> AppBootstrapper<D> {
    pub fn new(platform: PlatformInfo, paths: RuntimePaths) -> Self {
        Self {
            platform,
            paths,
            _db: PhantomData,
        }
    }

    pub async fn run<H: StartupHost>(&self, host: &H) -> Result<Arc<AppShell>, StartupError> {
        match self.start(host).await {
            Ok(shell) => Ok(shell),
            Err(startup_error) => {
                error!(
                    event = "shell.startup.failed",
                    code = startup_error.error_code(),
                    error = %startup_error,
                    "error initializing app"
                );
                Err(startup_error)
            }
        }
    }

    async fn start<H: StartupHost>(&self, host: &H) -> Result<Arc<AppShell>, StartupError> {
        init_logging(&LogConfig::for_platform(
            &self.platform,
            self.paths.desktop_log_path(),
        ))?;
        info!(event = "shell.startup.logging_ready");
        debug!(event = "shell.startup.platform", platform = ?self.platform);

        let plugins = Arc::new(UiPluginRegistry::new());
        plugins.utility(DEEP_MAP_KEYS);

        set_min_tls_version(TlsVersion::Tls1_0);

        let relative_time = Arc::new(RelativeTimeLocales::new());
        relative_time.add_locale(english());

        let mut table_defaults = TableDefaults::default();
        table_defaults.register_module(HEADER_SORT_MODULE);

        let db = D::open(
            self.paths.app_db_path(),
            DbLogging::for_platform(&self.platform),
        );
        db.connect().await?;
        let db: Arc<dyn AppDb> = Arc::new(db);
        info!(event = "shell.startup.app_db_connected", path = %self.paths.app_db_path().display());

        for plugin in default_plugins() {
            plugins.install(plugin);
        }
        plugins.mixin(UiMixin::AppEvent);
        plugins.mixin(UiMixin::Shortcuts(ShortcutKeys::for_platform(&self.platform)));

        let store = Arc::new(SettingsStore::new(db, self.platform.os));
        let shell = Arc::new(AppShell {
            platform: self.platform.clone(),
            store: Arc::clone(&store),
            events: AppEventBus::new(),
            plugins,
            table_defaults,
            relative_time,
        });

        store.dispatch(StoreAction::InitializeSettings).await?;

        let handler = Arc::new(AppEventHandler::new(shell.events.clone(), store));
        host.attach_inbound(handler)?;

        host.mount(Arc::clone(&shell)).await?;
        info!(event = "shell.startup.mounted");
        Ok(shell)
    }
}
