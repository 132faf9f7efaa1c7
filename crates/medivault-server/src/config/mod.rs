// crates/medivault-server/src/config/mod.rs
// Configuration: environment (secrets, endpoints) and ~/.medivault/config.toml

pub mod env;
pub mod file;

pub use env::{ApiKeys, ConfigValidation, EnvConfig, Endpoints};
pub use file::MediVaultConfig;

use std::path::PathBuf;

/// Base directory for MediVault state (`~/.medivault`)
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".medivault")
}
