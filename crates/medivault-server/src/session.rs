// crates/medivault-server/src/session.rs
// One user session: every store plus the dispatcher wired over them

use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::audit::AuditLog;
use crate::dispatch::{DispatchStores, DispatchTimings, QueryBackend, QueryDispatcher};
use crate::metrics::MetricsLog;
use crate::state::{AuthStore, ChatStore, NotificationGate, SettingsStore};

/// Construction options for [`Session::new`]
pub struct SessionOptions {
    pub backend: Arc<dyn QueryBackend>,
    pub settings_path: PathBuf,
    pub notifications: Arc<dyn NotificationGate>,
    pub timings: DispatchTimings,
}

/// Bundles the stores a client keeps for one signed-in user
#[derive(Debug, Clone)]
pub struct Session {
    pub audit: AuditLog,
    pub metrics: MetricsLog,
    pub chat: ChatStore,
    pub auth: AuthStore,
    pub settings: SettingsStore,
    pub dispatcher: QueryDispatcher,
}

impl Session {
    pub fn new(options: SessionOptions) -> Self {
        let audit = AuditLog::new();
        let metrics = MetricsLog::new();
        let chat = ChatStore::new();
        let auth = AuthStore::new(audit.clone());
        let settings = SettingsStore::load(options.settings_path, options.notifications);

        let dispatcher = QueryDispatcher::new(
            options.backend,
            DispatchStores {
                chat: chat.clone(),
                auth: auth.clone(),
                settings: settings.clone(),
                metrics: metrics.clone(),
                audit: audit.clone(),
            },
            options.timings,
        );
        info!(backend = dispatcher.backend_name(), "Session started");

        Self {
            audit,
            metrics,
            chat,
            auth,
            settings,
            dispatcher,
        }
    }

    /// Sign out (audited) and report what the session accumulated
    pub async fn shutdown(self) {
        self.auth.logout().await;
        info!(
            conversations = self.chat.list().await.len(),
            audit_entries = self.audit.len(),
            metrics = self.metrics.len(),
            "Session closed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::MockBackend;
    use crate::state::StaticPermission;
    use medivault_types::{AuditAction, Role};

    fn options(dir: &tempfile::TempDir) -> SessionOptions {
        SessionOptions {
            backend: Arc::new(MockBackend),
            settings_path: dir.path().join("settings.json"),
            notifications: Arc::new(StaticPermission(true)),
            timings: DispatchTimings::instant(),
        }
    }

    #[tokio::test]
    async fn test_stores_are_shared_with_dispatcher() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(options(&dir));
        session.auth.login_as(Role::Clinician).await;
        session.chat.new_conversation().await;

        let outcome = session.dispatcher.submit("blood pressure").await.unwrap();
        assert!(outcome.is_answered());
        assert_eq!(session.metrics.len(), 1);
        assert_eq!(session.audit.entries()[0].user_role, Role::Clinician);
    }

    #[tokio::test]
    async fn test_shutdown_logs_out() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(options(&dir));
        session.auth.login_as(Role::Admin).await;
        let audit = session.audit.clone();

        session.shutdown().await;
        assert_eq!(audit.entries()[0].action, AuditAction::Logout);
    }
}
