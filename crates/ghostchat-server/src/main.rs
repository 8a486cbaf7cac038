#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use ghostchat_server::{ServerConfig, start_server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing logger
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ghostchat_server=debug".into()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .init();

    let config = ServerConfig::load()?;
    let mut handle = start_server(config).await?;

    let port = handle.addr.port();
    tracing::info!("Dev API server running on http://localhost:{}", port);
    tracing::info!("Chat endpoint: http://localhost:{}/chat", port);

    tokio::signal::ctrl_c().await?;
    handle.stop().await;

    Ok(())
}
