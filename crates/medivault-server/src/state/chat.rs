// crates/medivault-server/src/state/chat.rs
// Conversation list and active-conversation selection

use chrono::{DateTime, Utc};
use medivault_types::{Conversation, Message, MessageRole};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{MediVaultError, Result};

pub const DEFAULT_TITLE: &str = "New Conversation";

/// Characters of the first user message kept in the title
pub const TITLE_MAX_CHARS: usize = 40;

#[derive(Debug, Default)]
struct ChatState {
    conversations: Vec<Conversation>,
    active_id: Option<String>,
}

/// Shared handle over the conversation list. Clones see the same state.
#[derive(Debug, Clone, Default)]
pub struct ChatStore {
    inner: Arc<RwLock<ChatState>>,
}

impl ChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty conversation and make it active
    pub async fn new_conversation(&self) -> Conversation {
        let now = Utc::now();
        let conversation = Conversation {
            id: Uuid::new_v4().to_string(),
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let mut state = self.inner.write().await;
        state.active_id = Some(conversation.id.clone());
        state.conversations.push(conversation.clone());
        conversation
    }

    /// Make an existing conversation active
    pub async fn select(&self, id: &str) -> Result<()> {
        let mut state = self.inner.write().await;
        if !state.conversations.iter().any(|c| c.id == id) {
            return Err(MediVaultError::ConversationNotFound(id.to_string()));
        }
        state.active_id = Some(id.to_string());
        Ok(())
    }

    pub async fn active_id(&self) -> Option<String> {
        self.inner.read().await.active_id.clone()
    }

    pub async fn active(&self) -> Option<Conversation> {
        let state = self.inner.read().await;
        let id = state.active_id.as_deref()?;
        state.conversations.iter().find(|c| c.id == id).cloned()
    }

    pub async fn get(&self, id: &str) -> Option<Conversation> {
        self.inner
            .read()
            .await
            .conversations
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    /// All conversations, most recently updated first
    pub async fn list(&self) -> Vec<Conversation> {
        let mut conversations = self.inner.read().await.conversations.clone();
        conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        conversations
    }

    /// Append a message. The first user message also fixes the title.
    pub async fn add_message(
        &self,
        conversation_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<Message> {
        let message = new_message(role, content);

        let mut state = self.inner.write().await;
        let conversation = state
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
            .ok_or_else(|| MediVaultError::ConversationNotFound(conversation_id.to_string()))?;

        let first_user_message = role == MessageRole::User
            && !conversation
                .messages
                .iter()
                .any(|m| m.role == MessageRole::User);
        if first_user_message {
            conversation.title = derive_title(content);
        }

        conversation.messages.push(message.clone());
        conversation.updated_at = message.timestamp;
        Ok(message)
    }
}

/// Title from the first user message as written: 40 characters, ellipsis when cut
pub fn derive_title(text: &str) -> String {
    if text.chars().count() > TITLE_MAX_CHARS {
        let head: String = text.chars().take(TITLE_MAX_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

fn new_message(role: MessageRole, content: &str) -> Message {
    let id = Uuid::new_v4().to_string();
    let timestamp = Utc::now();
    let encrypted_hash = display_hash(&id, &timestamp, content);
    Message {
        id,
        role,
        content: content.to_string(),
        timestamp,
        encrypted_hash,
        is_encrypted: true,
    }
}

/// Decorative digest shown with each message. Not a security property.
fn display_hash(id: &str, timestamp: &DateTime<Utc>, content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(id.as_bytes());
    hasher.update(timestamp.to_rfc3339().as_bytes());
    hasher.update(content.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}
