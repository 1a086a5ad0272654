use std::sync::Arc;

use anyhow::Context;
use testcheck_bot::{
    config::Config,
    create_router,
    services::{
        dispatcher::UpdateDispatcher,
        telegram_client::TelegramClient,
        tunnel_service::{self, Tunnel},
        AppState, UPDATE_QUEUE_CAPACITY,
    },
    telemetry,
    utils::retry::{retry_async_with_config, RetryConfig},
};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let provider = telemetry::init_tracing();

    tracing::info!("Starting test-checking bot");

    let config = Config::load().context("Failed to load configuration")?;
    tracing::info!(
        "Configuration loaded for environment: {:?}",
        std::env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string())
    );

    let (updates_tx, updates_rx) = mpsc::channel(UPDATE_QUEUE_CAPACITY);
    let app_state = Arc::new(AppState::new(config.clone(), updates_tx)?);

    let telegram = Arc::new(TelegramClient::new(
        config.telegram_api_url.clone(),
        config.bot_token.clone(),
    ));
    let dispatcher = UpdateDispatcher::new(app_state.bot_service(), telegram.clone());
    tokio::spawn(dispatcher.run(updates_rx));

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    // Held for the lifetime of the server so the tunnel child stays alive
    let _tunnel = expose_and_register(&config, &telegram).await;

    let app = create_router(app_state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    telemetry::shutdown(provider);
    Ok(())
}

/// Finds the public URL (configured or tunnelled) and registers the webhook.
/// Failures are logged; the server keeps running without a webhook.
async fn expose_and_register(config: &Config, telegram: &TelegramClient) -> Option<Tunnel> {
    let mut tunnel = None;
    let public_url = match &config.public_url {
        Some(url) => Some(url.clone()),
        None if config.tunnel.enabled => match tunnel_service::start(&config.tunnel).await {
            Ok(Some(started)) => {
                let url = started.public_url.clone();
                tunnel = Some(started);
                Some(url)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::error!("Failed to start tunnel: {:#}", e);
                None
            }
        },
        None => None,
    };

    let Some(public_url) = public_url else {
        tracing::warn!("No public URL available, webhook is not registered");
        return tunnel;
    };

    let webhook_url = match tunnel_service::webhook_url(&public_url, &config.webhook_path) {
        Ok(url) => url,
        Err(e) => {
            tracing::error!("{:#}", e);
            return tunnel;
        }
    };

    match retry_async_with_config(RetryConfig::webhook_registration(), "setWebhook", || {
        telegram.set_webhook(&webhook_url)
    })
    .await
    {
        Ok(()) => tracing::info!("Webhook registered: {}", webhook_url),
        Err(e) => tracing::error!("Failed to register webhook {}: {}", webhook_url, e),
    }

    tunnel
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
