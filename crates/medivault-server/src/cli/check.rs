// crates/medivault-server/src/cli/check.rs
// Read-only configuration report

use anyhow::Result;
use medivault::config::{EnvConfig, MediVaultConfig};
use medivault::state::SettingsStore;

pub fn run() -> Result<()> {
    let env = EnvConfig::load();
    let file = MediVaultConfig::load();

    println!("MediVault configuration");
    println!("  Config file:   {}", MediVaultConfig::config_path().display());
    println!("  Settings file: {}", SettingsStore::default_path().display());
    println!("  Services:      {}", env.api_keys.summary());
    println!("  Search URL:    {}", env.endpoints.search_base_url);
    println!("  Gateway URL:   {}", env.endpoints.gateway_url);
    println!("  Gateway model: {}", env.endpoints.gateway_model);
    println!("  Listen:        {}:{}", file.server.host, file.server.port);
    println!(
        "  Index:         {} (top {})",
        file.search.index_name, file.search.top_k
    );
    println!();

    let validation = env.validate();
    println!("{}", validation.report());
    if !validation.is_valid() {
        anyhow::bail!("configuration has errors");
    }
    Ok(())
}
