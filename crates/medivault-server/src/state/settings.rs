// crates/medivault-server/src/state/settings.rs
// User preferences persisted as one JSON object, merged over defaults on load

use medivault_types::{AppSettings, SettingsPatch};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use crate::error::{MediVaultError, Result};

pub const SETTINGS_FILE: &str = "settings.json";

/// Decides whether notifications may be enabled (the host's permission prompt)
pub trait NotificationGate: Send + Sync {
    fn request_permission(&self) -> bool;
}

/// Gate with a fixed answer
#[derive(Debug, Clone, Copy)]
pub struct StaticPermission(pub bool);

impl NotificationGate for StaticPermission {
    fn request_permission(&self) -> bool {
        self.0
    }
}

#[derive(Clone)]
pub struct SettingsStore {
    path: PathBuf,
    current: Arc<Mutex<AppSettings>>,
    gate: Arc<dyn NotificationGate>,
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("path", &self.path)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl SettingsStore {
    /// Default location (`~/.medivault/settings.json`)
    pub fn default_path() -> PathBuf {
        crate::config::data_dir().join(SETTINGS_FILE)
    }

    /// Load once at startup. Missing or unreadable files yield defaults.
    pub fn load(path: impl Into<PathBuf>, gate: Arc<dyn NotificationGate>) -> Self {
        let path = path.into();
        let settings = read_settings(&path);
        Self {
            path,
            current: Arc::new(Mutex::new(settings)),
            gate,
        }
    }

    pub fn get(&self) -> AppSettings {
        self.current
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply a patch and persist it.
    ///
    /// Turning notifications on asks the gate first; a refusal rejects the
    /// whole update and leaves memory and disk untouched.
    pub fn update(&self, patch: &SettingsPatch) -> Result<AppSettings> {
        let mut current = self
            .current
            .lock()
            .map_err(|_| MediVaultError::Other("settings lock poisoned".to_string()))?;

        if patch.notifications == Some(true)
            && !current.notifications
            && !self.gate.request_permission()
        {
            warn!("Notification permission denied, settings update rejected");
            return Err(MediVaultError::PermissionDenied(
                "notifications are blocked by the host".to_string(),
            ));
        }

        let mut next = current.clone();
        next.apply(patch);
        write_settings(&self.path, &next)?;
        *current = next.clone();

        debug!(path = %self.path.display(), "Settings saved");
        Ok(next)
    }

    /// Restore defaults and persist them
    pub fn reset(&self) -> Result<AppSettings> {
        let defaults = AppSettings::default();
        write_settings(&self.path, &defaults)?;
        if let Ok(mut current) = self.current.lock() {
            *current = defaults.clone();
        }
        info!("Settings reset to defaults");
        Ok(defaults)
    }
}

fn read_settings(path: &Path) -> AppSettings {
    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(settings) => {
                debug!(path = %path.display(), "Loaded settings");
                settings
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to parse settings, using defaults");
                AppSettings::default()
            }
        },
        Err(_) => {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            AppSettings::default()
        }
    }
}

fn write_settings(path: &Path, settings: &AppSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use medivault_types::ResponseStyle;

    fn store_in(dir: &tempfile::TempDir, allowed: bool) -> SettingsStore {
        SettingsStore::load(
            dir.path().join(SETTINGS_FILE),
            Arc::new(StaticPermission(allowed)),
        )
    }

    #[test]
    fn test_missing_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir, true);
        assert_eq!(store.get(), AppSettings::default());
    }

    #[test]
    fn test_partial_file_merged_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, r#"{"dark_mode": true, "response_style": "clinical"}"#).unwrap();

        let store = SettingsStore::load(&path, Arc::new(StaticPermission(true)));
        let settings = store.get();
        assert!(settings.dark_mode);
        assert_eq!(settings.response_style, ResponseStyle::Clinical);
        assert!(settings.auto_scroll);
    }

    #[test]
    fn test_corrupt_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "{not json").unwrap();
        let store = SettingsStore::load(&path, Arc::new(StaticPermission(true)));
        assert_eq!(store.get(), AppSettings::default());
    }

    #[test]
    fn test_update_persists_every_change() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir, true);
        store
            .update(&SettingsPatch {
                compact_mode: Some(true),
                ..Default::default()
            })
            .unwrap();

        let reloaded = store_in(&dir, true);
        assert!(reloaded.get().compact_mode);
    }

    #[test]
    fn test_notifications_granted() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir, true);
        let settings = store
            .update(&SettingsPatch {
                notifications: Some(true),
                ..Default::default()
            })
            .unwrap();
        assert!(settings.notifications);
    }

    #[test]
    fn test_notifications_denied_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir, false);

        let result = store.update(&SettingsPatch {
            notifications: Some(true),
            ..Default::default()
        });

        assert!(matches!(result, Err(MediVaultError::PermissionDenied(_))));
        assert!(!store.get().notifications);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_disabling_notifications_skips_gate() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir, false);
        let settings = store
            .update(&SettingsPatch {
                notifications: Some(false),
                ..Default::default()
            })
            .unwrap();
        assert!(!settings.notifications);
    }

    #[test]
    fn test_reset() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir, true);
        store
            .update(&SettingsPatch {
                dark_mode: Some(true),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(store.reset().unwrap(), AppSettings::default());
        assert_eq!(store_in(&dir, true).get(), AppSettings::default());
    }
}
