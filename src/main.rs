use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use bytezinho::config::Settings;
use bytezinho::routes::configure_routes;
use bytezinho::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Must run before the subscriber reads RUST_LOG
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bytezinho=info,warp=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = dotenv {
        debug!("No .env file loaded: {}", e);
    }

    let settings = Settings::from_env()?;

    info!("Starting chatbot...");
    let state = AppState::initialize(&settings).await?;
    if state.chat.is_ready() {
        info!("Chatbot initialized");
    } else {
        warn!("Chatbot could not be initialized; /chat will answer with errors until restart");
    }

    let routes = configure_routes(Arc::new(state), settings.static_dir.clone());

    let addr = settings.bind_addr();
    info!("Starting server on http://{}", addr);
    warp::serve(routes).run(addr).await;

    Ok(())
}
