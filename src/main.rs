use shuttle_runtime::{Error, SecretStore, Secrets};

const DEFAULT_CONFIG: &str = "Config.toml";

#[shuttle_runtime::main]
async fn main(
    #[Secrets] secret_store: SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let gateway_api_key = present(secret_store.get("GATEWAY_API_KEY"));
    let accept_api_key = present(secret_store.get("ACCEPTABLE_API_KEY"));
    let config_name = present(secret_store.get("CONFIG"))
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());

    if gateway_api_key.is_none() {
        tracing::warn!(task = "GATEWAY_API_KEY was not found");
    }

    let router = api::serve(&config_name, gateway_api_key, accept_api_key)
        .map_err(|e| Error::BuildPanic(format!("{:#}", e)))?;

    Ok(router.into())
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
