#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod ui;

use anyhow::Context;
use pole_to_win::{is_admin, AppConfig, SettingCatalog};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = AppConfig::load(&AppConfig::default_path())?;
    // Fail before any window is shown if the definition table is broken
    let catalog = SettingCatalog::builtin().context("invalid built-in setting definitions")?;

    if !is_admin() {
        tracing::warn!("Started without administrator rights; applying settings is disabled");
    }

    iced::application(
        move || app::init(config.clone(), catalog.clone()),
        app::update,
        app::view,
    )
    .title("Pole To Win No11")
    .window_size((900.0, 700.0))
    .run()?;

    Ok(())
}
