use std::net::{Ipv4Addr, SocketAddr};

use anyhow::Context;
use api::{load_config, serve};
use repository::Repository;
use tokio::net::TcpListener;
use toml::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let secrets = util::load_env()?;
    let conn_string = secrets
        .get("DATABASE_URL")
        .and_then(Value::as_str)
        .context("DATABASE_URL was not found")?;
    let repository = Repository::new(conn_string).await?;

    let gemini_api_key = secrets
        .get("GEMINI_API_KEY")
        .and_then(Value::as_str)
        .map(str::to_string);

    let suffix = secrets
        .get("CONFIG")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let config = load_config(&format!("Config{}.toml", suffix))?;

    let router = serve(repository, gemini_api_key, &config).await?;

    let address = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.server.port));
    let listener = TcpListener::bind(&address).await?;
    info!(task = "listen", address = %address);

    Ok(axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?)
}
