mod config;
mod error;
mod routes;
mod services;
mod state;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::ServerConfig::from_env()?;

    // Training-plan proxy is optional: the site works without a backend.
    let training = match config.api_base_url.as_deref() {
        Some(base) => match services::training::TrainingPlanClient::new(base) {
            Ok(client) => {
                tracing::info!(endpoint = client.endpoint(), "training plan proxy enabled");
                Some(client)
            }
            Err(e) => {
                tracing::warn!(error = %e, "training plan proxy disabled");
                None
            }
        },
        None => {
            tracing::warn!("STUDIO_API_URL not set; training plan proxy disabled");
            None
        }
    };

    let port = config.port;
    tracing::info!(website_dir = %config.website_dir.display(), "serving marketing site");
    let state = state::AppState::new(config, training);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;

    tracing::info!(%port, "studio site listening");
    axum::serve(listener, app).await?;
    Ok(())
}
