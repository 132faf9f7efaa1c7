// crates/medivault-server/src/cli/serve.rs
// Proxy server startup

use anyhow::Result;
use medivault::config::{EnvConfig, MediVaultConfig};
use medivault::http::create_shared_client;
use medivault::proxy::{self, ProxyService};
use tracing::warn;

pub async fn run(host: Option<String>, port: Option<u16>) -> Result<()> {
    let file = MediVaultConfig::load();
    let env = EnvConfig::load();

    let validation = env.validate();
    for warning in &validation.warnings {
        warn!("{}", warning);
    }
    if !validation.is_valid() {
        anyhow::bail!("Invalid configuration:\n{}", validation.report());
    }

    let service = ProxyService::from_config(&env, &file, create_shared_client());
    let host = host.unwrap_or_else(|| file.server.host.clone());
    let port = port.unwrap_or(file.server.port);

    println!("MediVault proxy running on http://{}:{}/api/query", host, port);
    proxy::run(service, &host, port).await
}
