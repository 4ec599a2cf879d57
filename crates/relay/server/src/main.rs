//! FCM Relay - forwards push notification requests to Firebase Cloud Messaging.

mod config;

use std::net::SocketAddr;

use color_eyre::eyre::WrapErr as _;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use config::Config;

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("fcm-relay starting");

    let config = Config::load().wrap_err("failed to load config")?;

    // Credentials are loaded once; tokens are fetched per request.
    let auth = config
        .credential_provider()
        .wrap_err("failed to load service account credentials")?;
    let project_id = config.resolve_project_id(auth.project_id())?;

    tracing::info!(
        project_id = %project_id,
        client_email = %auth.client_email(),
        fanout_limit = config.fanout_limit,
        "loaded credentials"
    );

    let pusher = relay_push::FcmPusher::with_base_url(&config.fcm_base_url, &project_id);
    let push = relay_push::PushService::new(auth, pusher).with_fanout_limit(config.fanout_limit);
    let store = relay_storage::MemoryStorage::new();

    let app = relay_http::relay_router(push, store)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .wrap_err("failed to bind")?;

    axum::serve(listener, app).await.wrap_err("server error")?;

    Ok(())
}
