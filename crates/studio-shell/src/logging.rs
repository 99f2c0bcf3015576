use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{errors::StartupError, platform_info::PlatformInfo};

const VERBOSE_DIRECTIVES: [&str; 2] = ["studio_shell=trace", "studio_desktop_tauri=trace"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub verbose: bool,
    pub file_path: PathBuf,
}

impl LogConfig {
    pub fn for_platform(platform: &PlatformInfo, file_path: PathBuf) -> Self {
        Self {
            verbose: platform.verbose_logging(),
            file_path,
        }
    }

    pub fn default_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::WARN
        }
    }

    pub fn filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::builder()
            .with_default_directive(self.default_level().into())
            .from_env_lossy();
        if self.verbose {
            for directive in VERBOSE_DIRECTIVES {
                if let Ok(directive) = directive.parse() {
                    filter = filter.add_directive(directive);
                }
            }
        }
        filter
    }
}

fn open_log_file(path: &Path) -> Result<fs::File, StartupError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|error| StartupError::Logging {
            message: format!("failed to create log directory {}: {error}", parent.display()),
        })?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|error| StartupError::Logging {
            message: format!("failed to open log file {}: {error}", path.display()),
        })
}

/// Installs a console sink and a file sink sharing one level filter.
///
/// A subscriber installed earlier in the process (tests, embedding hosts)
/// is left in place.
pub fn init_logging(config: &LogConfig) -> Result<(), StartupError> {
    let file = open_log_file(&config.file_path)?;

    let result = tracing_subscriber::registry()
        .with(config.filter())
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init();

    if let Err(error) = result {
        tracing::debug!(event = "shell.logging.already_initialized", error = %error);
    }
    Ok(())
}
