// crates/medivault-server/src/state/auth.rs
// Signed-in user (selected from the demo roster) with login/logout auditing

use medivault_types::{AuditAction, AuditStatus, Role, User};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::audit::{Actor, AuditLog};
use crate::error::{MediVaultError, Result};

/// Label written into login/logout audit entries
const SESSION_ENCRYPTION: &str = "TLS 1.3";

/// Fixed demo roster, one user per role
pub fn demo_users() -> Vec<User> {
    vec![
        User {
            id: "user-doctor-001".to_string(),
            name: "Dr. Sarah Chen".to_string(),
            role: Role::Doctor,
            avatar: "SC".to_string(),
            department: "Internal Medicine".to_string(),
        },
        User {
            id: "user-clinician-002".to_string(),
            name: "James Okafor, RN".to_string(),
            role: Role::Clinician,
            avatar: "JO".to_string(),
            department: "Ward 4B".to_string(),
        },
        User {
            id: "user-admin-003".to_string(),
            name: "Maria Lopez".to_string(),
            role: Role::Admin,
            avatar: "ML".to_string(),
            department: "Health Information Management".to_string(),
        },
        User {
            id: "user-researcher-004".to_string(),
            name: "Dr. Priya Natarajan".to_string(),
            role: Role::Researcher,
            avatar: "PN".to_string(),
            department: "Clinical Research".to_string(),
        },
    ]
}

#[derive(Debug, Clone)]
pub struct AuthStore {
    user: Arc<RwLock<Option<User>>>,
    audit: AuditLog,
}

impl AuthStore {
    pub fn new(audit: AuditLog) -> Self {
        Self {
            user: Arc::new(RwLock::new(None)),
            audit,
        }
    }

    /// Sign in as the roster user for `role`
    pub async fn login_as(&self, role: Role) -> User {
        // the roster has exactly one user per role
        let user = demo_users()
            .into_iter()
            .find(|u| u.role == role)
            .unwrap_or_else(|| demo_users().remove(0));
        self.set_user(user.clone()).await;
        user
    }

    /// Sign in as a roster user by id
    pub async fn login(&self, user_id: &str) -> Result<User> {
        let user = demo_users()
            .into_iter()
            .find(|u| u.id == user_id)
            .ok_or_else(|| MediVaultError::InvalidInput(format!("unknown user '{}'", user_id)))?;
        self.set_user(user.clone()).await;
        Ok(user)
    }

    async fn set_user(&self, user: User) {
        info!(user = %user.id, role = %user.role, "User signed in");
        self.audit.record(
            &actor_for(&user),
            AuditAction::Login,
            format!("{} signed in ({})", user.name, user.department),
            SESSION_ENCRYPTION,
            AuditStatus::Success,
        );
        *self.user.write().await = Some(user);
    }

    /// Sign out; no-op when nobody is signed in
    pub async fn logout(&self) -> Option<User> {
        let user = self.user.write().await.take()?;
        info!(user = %user.id, "User signed out");
        self.audit.record(
            &actor_for(&user),
            AuditAction::Logout,
            format!("{} signed out", user.name),
            SESSION_ENCRYPTION,
            AuditStatus::Success,
        );
        Some(user)
    }

    pub async fn current(&self) -> Option<User> {
        self.user.read().await.clone()
    }

    /// Role of the signed-in user, or the default role
    pub async fn role(&self) -> Role {
        self.user
            .read()
            .await
            .as_ref()
            .map(|u| u.role)
            .unwrap_or_default()
    }

    pub async fn actor(&self) -> Actor {
        self.user
            .read()
            .await
            .as_ref()
            .map(actor_for)
            .unwrap_or_else(Actor::anonymous)
    }
}

fn actor_for(user: &User) -> Actor {
    Actor {
        user_id: user.id.clone(),
        role: user.role,
    }
}
