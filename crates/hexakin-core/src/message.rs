//! Chat messages and the session-wide message log.
//!
//! The log is an explicit, clonable handle: components that publish analyses
//! or chat replies and components that render them all receive the same
//! `MessageLog` instead of reaching for ambient global state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast};

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// A single entry of the message log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    /// Timestamp when the message was appended (ISO 8601 format).
    pub timestamp: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

const CHANNEL_CAPACITY: usize = 64;

/// Append-only, oldest-first message log shared by handle.
#[derive(Clone)]
pub struct MessageLog {
    messages: Arc<RwLock<Vec<ChatMessage>>>,
    sender: broadcast::Sender<ChatMessage>,
}

impl MessageLog {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            messages: Arc::new(RwLock::new(Vec::new())),
            sender,
        }
    }

    /// Appends a message and notifies subscribers.
    pub async fn append(&self, message: ChatMessage) {
        self.messages.write().await.push(message.clone());
        // No subscribers is fine.
        let _ = self.sender.send(message);
    }

    /// Snapshot of every message, oldest first.
    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.messages.read().await.clone()
    }

    pub async fn get(&self, index: usize) -> Option<ChatMessage> {
        self.messages.read().await.get(index).cloned()
    }

    pub async fn len(&self) -> usize {
        self.messages.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.messages.read().await.is_empty()
    }

    /// Most recent assistant message, if any.
    pub async fn last_assistant(&self) -> Option<ChatMessage> {
        self.messages
            .read()
            .await
            .iter()
            .rev()
            .find(|message| message.role == MessageRole::Assistant)
            .cloned()
    }

    /// Receives every message appended after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ChatMessage> {
        self.sender.subscribe()
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}
