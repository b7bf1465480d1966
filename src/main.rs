use relaybox::api;
use relaybox::logger::*;
use relaybox::server::*;
use relaybox::settings::*;
use std::sync::Arc;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    info!(?project_settings);
    let logger_config = LogConfig {
        filter: project_settings.log.filter.clone(),
    };
    logger.reload_from_config(&logger_config)?;

    let server = Arc::new(Server::try_new(&project_settings).await?);

    match project_settings.webhook.base_url.as_deref() {
        Some(base_url) => {
            let callback = format!("{}/webhook", base_url.trim_end_matches('/'));
            server.chat.set_webhook(&callback).await?;
            info!("webhook registered at {}", callback);

            let address: std::net::SocketAddr = project_settings.http.address.parse()?;
            warp::serve(api::webhook::routes(server.clone()))
                .bind_with_graceful_shutdown(address, async {
                    signal::ctrl_c().await.expect("Could not register SIGINT");
                })
                .1
                .await;
        }
        None => {
            // No reachable callback address: fall back to long polling.
            server.chat.delete_webhook().await?;
            server.start_polling();
            info!("polling for updates");
            signal::ctrl_c().await?;
        }
    }

    let shutdown_timeout = std::time::Duration::from_secs(10);
    match tokio::time::timeout(shutdown_timeout, server.shutdown()).await {
        Ok(_) => tracing::info!("relay shutdown successfully"),
        Err(_) => tracing::error!("relay shutdown timed out"),
    }

    Ok(())
}
