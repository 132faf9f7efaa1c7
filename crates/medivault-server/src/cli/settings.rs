// crates/medivault-server/src/cli/settings.rs
// `medivault settings`: show, set and reset persisted preferences

use anyhow::{Context, Result};
use medivault::state::{SettingsStore, StaticPermission};
use medivault_types::SettingsPatch;
use serde_json::{Map, Value};
use std::sync::Arc;

use super::SettingsAction;

pub fn run(action: Option<SettingsAction>) -> Result<()> {
    // a terminal has no permission prompt to refuse
    let store = SettingsStore::load(SettingsStore::default_path(), Arc::new(StaticPermission(true)));

    match action.unwrap_or(SettingsAction::Show) {
        SettingsAction::Show => {
            println!("{}", serde_json::to_string_pretty(&store.get())?);
        }
        SettingsAction::Set { key, value } => {
            let patch = parse_patch(&key, &value)?;
            let settings = store.update(&patch)?;
            println!("Saved {} to {}", key, store.path().display());
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        SettingsAction::Reset => {
            store.reset()?;
            println!("Settings reset to defaults");
        }
    }
    Ok(())
}

/// One `key value` pair as a patch. Values are read as JSON when they
/// parse (`true`, `false`), otherwise as plain strings (`clinical`).
pub fn parse_patch(key: &str, value: &str) -> Result<SettingsPatch> {
    let value = serde_json::from_str::<Value>(value).unwrap_or_else(|_| Value::String(value.to_string()));
    let mut object = Map::new();
    object.insert(key.to_string(), value);
    serde_json::from_value(Value::Object(object))
        .with_context(|| format!("invalid setting '{}'", key))
}
