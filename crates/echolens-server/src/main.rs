mod api;
mod middleware;

use std::sync::Arc;

use echolens_news::{HfSentimentClient, NewsApiClient, SpeechClient};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, ApiSettings, AppState},
    middleware::{LookupThrottle, SpeechAccess},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(echolens_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let state = AppState {
        source: Arc::new(NewsApiClient::from_app_config(&config)?),
        scorer: Arc::new(HfSentimentClient::from_app_config(&config)?),
        speech: Arc::new(SpeechClient::from_app_config(&config)?),
        settings: ApiSettings::from_app_config(&config),
    };

    let speech_access = SpeechAccess::from_app_config(&config);
    let lookups = LookupThrottle::per_minute(config.company_lookups_per_minute);
    let app = build_app(state, speech_access, lookups);

    tracing::info!(
        bind_addr = %config.bind_addr,
        env = %config.env,
        scoring_mode = %config.scoring_mode,
        company_lookups_per_minute = config.company_lookups_per_minute,
        "echolens server listening"
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
