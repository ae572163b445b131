use tracing::{error, info, warn};

use filehub::{Config, WebServer};

#[tokio::main]
async fn main() {
    // Load configuration
    let mut config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    // Initialize logging first so override warnings are recorded
    if let Err(e) = filehub::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        filehub::logging::init_console_only(&config.logging.level);
        warn!(
            level = %config.logging.level,
            "File logging unavailable, logging to console only"
        );
    }

    config.apply_env_overrides();

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    info!("File Hub");
    info!(
        "Server configured on {}:{}",
        config.server.host, config.server.port
    );

    let server = match WebServer::new(&config) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to create web server: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        error!("Web server error: {e}");
        std::process::exit(1);
    }
}
