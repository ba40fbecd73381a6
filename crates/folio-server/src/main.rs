use std::env;

use tracing_subscriber::EnvFilter;

use folio_server::config::ServerConfig;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = ServerConfig::from_env()?;
    let state = folio_server::build_state(&config).await?;
    let app = folio_server::app(state);

    if env::var_os("AWS_LAMBDA_RUNTIME_API").is_some() {
        tracing::info!("running under the lambda runtime");
        return lambda_http::run(app).await.map_err(|e| eyre::eyre!(e));
    }

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!(addr = %config.bind, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
