//! Main application entry point (native).

#[cfg(feature = "native")]
fn main() -> eframe::Result {
    env_logger::init();
    log::info!("Starting Teeprint");

    let config = teeprint_app::AppConfig::from_env();
    log::info!("Template: {:?}, users API: {}", config.template_path, config.api_url);
    teeprint_app::TeeprintApp::run(config)
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
