//! Main application entry point.

use deskgrid_app::{App, AppConfig, AppError};

fn main() {
    env_logger::init();
    log::info!("Starting DeskGrid");

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;
    let app = pollster::block_on(App::start(config))?;
    app.run_stdio()
}
