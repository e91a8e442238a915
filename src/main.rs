use log::*;
use service::config::Config;
use service::logging::Logger;
use web::AppState;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config);

    info!("Starting meeting relay in {} mode", config.runtime_env());

    // Relays are built once from static configuration; missing provider
    // credentials abort startup instead of failing per-request.
    let app_state = match AppState::from_config(config) {
        Ok(app_state) => app_state,
        Err(e) => {
            error!("Provider configuration error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = web::init_server(app_state).await {
        error!("Server error: {e}");
        std::process::exit(1);
    }
}
