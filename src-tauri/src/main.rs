#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_runtime;
mod app_types;
mod desktop_bridge;
mod desktop_bridge_commands;
mod external_url;
mod second_instance;
mod startup_host;
mod tauri_window_host;

pub(crate) use app_constants::*;

fn main() {
    app_runtime::run();
}
