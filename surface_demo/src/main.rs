//! Surface window demo shell
//!
//! Plays the part of the application hosting a graphics output module: creates
//! the output surface from an optional config file, presents it, exercises the
//! title and frame controls, and tears it down again.
//!
//! Usage: `surface_demo [config.toml|config.ron]`

use surface_window::prelude::*;

fn run<P: WindowPlatform + 'static>(
    platform: P,
    config: &SurfaceConfig,
) -> Result<(), RecoverableError> {
    let mut surface = SurfaceWindow::new(platform);
    surface.create_from_config(config)?;

    let client = surface.client_rect();
    log::info!("Client area: {}x{}", client.width(), client.height());

    if surface.set_title(&format!("{} ({}x{})", config.title, client.width(), client.height())) {
        log::info!("Title updated in visible frame");
    } else {
        log::info!("Title updated, but no frame is visible to show it");
    }

    match surface.raw_window_handle() {
        Some(_) => log::info!("Render handle available for {:?}", surface.handle()),
        None => log::info!("No native render handle on this platform"),
    }

    surface.hide();
    surface.show();
    surface.detach();
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => match SurfaceConfig::load_from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => SurfaceConfig::default(),
    };

    if let Err(e) = run(NativePlatform::default(), &config) {
        log::error!("Surface setup failed: {}", e);
        std::process::exit(1);
    }

    log::info!("Surface demo complete");
}
