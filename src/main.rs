#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let config = match coolbox::PaletteConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::error!("No usable palette: {err}");
            std::process::exit(1);
        }
    };
    let icons = coolbox::IconDirectory::new(coolbox::config::icon_dir_from_env());
    log::info!("Loading icons from {}", icons.root().display());

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 720.0])
            .with_min_inner_size([240.0, 320.0]),
        ..Default::default()
    };

    eframe::run_native(
        "CoolBox",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(coolbox::PaletteApp::new(
                cc,
                config,
                Box::new(icons),
            )))
        }),
    )
}

#[cfg(target_arch = "wasm32")]
fn main() {}
