use studio_shell::{window_config::OpenOptions, window_host::HostWindow};
use tauri::{AppHandle, Manager};
use tracing::{info, warn};

use crate::{app_types::ShellState, URL_ARG};

/// Connection URL passed on a relaunch: `--url=<v>`, `--url <v>`, or a bare
/// argument with a scheme. The program path is skipped.
pub(crate) fn url_from_args(args: &[String]) -> Option<String> {
    let mut args = args.iter().skip(1);
    while let Some(arg) = args.next() {
        if let Some(value) = arg
            .strip_prefix(URL_ARG)
            .and_then(|rest| rest.strip_prefix('='))
        {
            if !value.is_empty() {
                return Some(value.to_string());
            }
        } else if arg == URL_ARG {
            return args.next().filter(|value| !value.is_empty()).cloned();
        } else if !arg.starts_with('-') && arg.contains("://") {
            return Some(arg.clone());
        }
    }
    None
}

pub(crate) fn handle_second_instance(app_handle: &AppHandle, args: Vec<String>, _cwd: String) {
    let Some(state) = app_handle.try_state::<ShellState>() else {
        return;
    };
    let Some(shell) = state.shell() else {
        warn!(event = "desktop.second_instance.before_mount");
        return;
    };

    match url_from_args(&args) {
        Some(url) => {
            info!(event = "desktop.second_instance.open_url", url = %url);
            if let Err(error) = state
                .factory
                .build_window(&shell.settings(), Some(&OpenOptions::with_url(url)))
            {
                warn!(
                    event = "desktop.second_instance.open_failed",
                    code = error.error_code(),
                    error = %error
                );
            }
        }
        None => {
            let Some(window) = state
                .factory
                .active_windows()
                .first()
                .and_then(|record| record.window())
            else {
                return;
            };
            if let Err(error) = window.show().and_then(|()| window.focus()) {
                warn!(event = "desktop.second_instance.focus_failed", error = %error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::url_from_args;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn url_flag_forms_are_recognized() {
        assert_eq!(
            url_from_args(&args(&["studio", "--url=postgres://db/app"])).as_deref(),
            Some("postgres://db/app")
        );
        assert_eq!(
            url_from_args(&args(&["studio", "--url", "mysql://localhost"])).as_deref(),
            Some("mysql://localhost")
        );
    }

    #[test]
    fn bare_url_argument_is_used() {
        assert_eq!(
            url_from_args(&args(&["studio", "--verbose", "sqlite:///tmp/app.db"])).as_deref(),
            Some("sqlite:///tmp/app.db")
        );
    }

    #[test]
    fn program_path_and_plain_flags_are_ignored() {
        assert_eq!(url_from_args(&args(&["https://not-an-arg/studio"])), None);
        assert_eq!(url_from_args(&args(&["studio", "--url="])), None);
        assert_eq!(url_from_args(&args(&["studio", "--url"])), None);
        assert_eq!(url_from_args(&args(&["studio", "--disable-gpu"])), None);
    }
}
