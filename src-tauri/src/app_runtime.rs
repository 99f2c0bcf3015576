use studio_shell::{app_db::AppDbConnection, AppBootstrapper, PlatformInfo, RuntimePaths};
use tauri::Manager;

use crate::{
    app_types::ShellState, second_instance, startup_host::TauriStartupHost,
    tauri_window_host::TauriWindowHost,
};

pub(crate) fn run() {
    let platform = PlatformInfo::from_env();
    let paths = RuntimePaths::resolve(&platform);

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(
            second_instance::handle_second_instance,
        ))
        .plugin(tauri_plugin_process::init())
        .invoke_handler(tauri::generate_handler![
            crate::desktop_bridge_commands::desktop_bridge_is_desktop_runtime,
            crate::desktop_bridge_commands::desktop_bridge_set_window_title,
            crate::desktop_bridge_commands::desktop_bridge_open_external_url,
            crate::desktop_bridge_commands::desktop_bridge_get_settings,
            crate::desktop_bridge_commands::desktop_bridge_save_setting,
            crate::desktop_bridge_commands::desktop_bridge_open_window,
            crate::desktop_bridge_commands::desktop_bridge_format_relative_time,
        ])
        .setup(move |app| {
            let app_handle = app.handle().clone();
            app.manage(ShellState::new(
                TauriWindowHost::new(app_handle.clone()),
                platform.clone(),
            ));

            tauri::async_runtime::spawn(async move {
                let bootstrapper = AppBootstrapper::<AppDbConnection>::new(platform, paths);
                let startup_host = TauriStartupHost::new(app_handle.clone());
                if bootstrapper.run(&startup_host).await.is_err() {
                    app_handle.exit(1);
                }
            });
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|_app_handle, _event| {});
}
