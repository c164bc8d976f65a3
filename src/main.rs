use repository::Repository;
use shuttle_runtime::{Error, SecretStore, Secrets};

#[shuttle_runtime::main]
async fn main(
    #[Secrets] secret_store: SecretStore,
    #[shuttle_shared_db::Postgres(local_uri = "{secrets.DATABASE_URL}")]
    conn_string: String,
) -> shuttle_axum::ShuttleAxum {
    if secret_store.get("ENV").as_deref() != Some("local") {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .init();
    }

    let repository = Repository::new(&conn_string)
        .await
        .map_err(|e| Error::BuildPanic(e.to_string()))?;

    let gemini_api_key = secret_store.get("GEMINI_API_KEY");

    let suffix = secret_store.get("CONFIG").unwrap_or_default();
    let config = api::load_config(&format!("Config{}.toml", suffix))
        .map_err(|e| Error::BuildPanic(e.to_string()))?;

    let router = api::serve(repository, gemini_api_key, &config)
        .await
        .map_err(|e| Error::BuildPanic(e.to_string()))?;

    Ok(router.into())
}
