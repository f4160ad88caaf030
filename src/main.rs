use std::process::ExitCode;

use fitdistance::build_app;
use fitdistance::config::ServerConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fitdistance=debug,tower_http=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    let app = build_app(&config);
    let listener = match tokio::net::TcpListener::bind(config.addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind {}: {err}", config.addr);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("listening on {}", config.addr);

    if let Err(err) = axum::serve(listener, app.into_make_service()).await {
        tracing::error!("server crashed: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
