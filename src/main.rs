use dotenv::dotenv;
use tracing::{error, info, warn};

use travel_agency_backend::app::app::App;
use travel_agency_backend::util::logger::Logger;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file before the logger reads LOG_DIR
    let dotenv_result = dotenv();

    let _logger = match Logger::new() {
        Ok(logger) => Some(logger),
        Err(e) => {
            Logger::console_only();
            warn!("File logging disabled: {}", e);
            None
        }
    };

    info!("🚀 Starting Travel Agency Backend");
    match dotenv_result {
        Ok(_) => info!("✅ Successfully loaded .env file"),
        Err(e) => warn!("⚠️ Failed to load .env file: {} (using system env vars)", e),
    }

    let app = match App::new().await {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialise application: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = app.start().await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
