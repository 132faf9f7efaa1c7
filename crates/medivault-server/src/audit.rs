// crates/medivault-server/src/audit.rs
// In-memory audit trail (bounded, newest first) with CSV export

use chrono::Utc;
use medivault_types::{AuditAction, AuditLogEntry, AuditStatus, Role};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};
use uuid::Uuid;

/// Most recent audit entries retained
pub const AUDIT_CAPACITY: usize = 100;

/// Fixed CSV column order
pub const CSV_HEADER: &str =
    "id,timestamp,user_id,user_role,action,description,encryption_method,status";

/// Who performed an audited action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub role: Role,
}

impl Actor {
    /// Actor used when nobody is signed in
    pub fn anonymous() -> Self {
        Self {
            user_id: "anonymous".to_string(),
            role: Role::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    entries: Arc<Mutex<VecDeque<AuditLogEntry>>>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry at the head, evicting the oldest beyond capacity
    pub fn record(
        &self,
        actor: &Actor,
        action: AuditAction,
        description: impl Into<String>,
        encryption_method: &str,
        status: AuditStatus,
    ) -> AuditLogEntry {
        let entry = AuditLogEntry {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            user_id: actor.user_id.clone(),
            user_role: actor.role,
            action,
            description: description.into(),
            encryption_method: encryption_method.to_string(),
            status,
        };

        debug!(
            user = %entry.user_id,
            action = entry.action.as_str(),
            status = entry.status.as_str(),
            "Audit entry recorded"
        );

        match self.entries.lock() {
            Ok(mut entries) => {
                entries.push_front(entry.clone());
                entries.truncate(AUDIT_CAPACITY);
            }
            Err(_) => warn!(id = %entry.id, "Audit lock poisoned, entry not stored"),
        }
        entry
    }

    /// Snapshot, newest first
    pub fn entries(&self) -> Vec<AuditLogEntry> {
        self.entries
            .lock()
            .map(|e| e.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Export the log as CSV, newest first
    pub fn to_csv(&self) -> String {
        let mut lines = vec![CSV_HEADER.to_string()];
        for entry in self.entries() {
            let fields = [
                entry.id,
                entry.timestamp.to_rfc3339(),
                entry.user_id,
                entry.user_role.to_string(),
                entry.action.as_str().to_string(),
                entry.description,
                entry.encryption_method,
                entry.status.as_str().to_string(),
            ];
            let row: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
            lines.push(row.join(","));
        }
        lines.join("\n")
    }
}

/// Quote a field when it contains a delimiter, quote or line break
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
