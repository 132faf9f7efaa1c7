// crates/medivault-server/src/state/mod.rs
// Client-side state holders: conversations, signed-in user, preferences

pub mod auth;
pub mod chat;
pub mod settings;

pub use auth::{AuthStore, demo_users};
pub use chat::{ChatStore, derive_title};
pub use settings::{NotificationGate, SettingsStore, StaticPermission};
