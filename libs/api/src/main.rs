use std::net::{Ipv4Addr, SocketAddr};

use api::serve;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use util::{load_env, secret};

const SECRETS: &str = "Secrets.dev.toml";
const DEFAULT_CONFIG: &str = "Config.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let secrets = load_env(SECRETS)?;
    let gateway_api_key = secret(&secrets, "GATEWAY_API_KEY");
    let accept_api_key = secret(&secrets, "ACCEPTABLE_API_KEY");
    let config_name = secret(&secrets, "CONFIG")
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());

    let router = serve(&config_name, gateway_api_key, accept_api_key)?;

    let address = SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8000));
    let listener = TcpListener::bind(&address).await?;
    tracing::info!(task = "listening", address = %address);

    Ok(axum::serve(listener, router).await?)
}
