//! Chat sessions and the identity library
//!
//! Sessions are created on demand, one current session at a time, and
//! persisted as a single JSON blob through the storage port alongside the
//! last-active session id and the saved-agent list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::{AgentConfig, SavedAgent};
use crate::messages::{Message, Role};
use crate::storage::{keys, Storage};
use crate::Result;

const DEFAULT_TITLE: &str = "New Session";
const EMPTY_PREVIEW: &str = "Empty";
const TITLE_LEN: usize = 30;
const PREVIEW_LEN: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: Uuid,
    pub title: String,
    pub messages: Vec<Message>,
    pub last_modified: DateTime<Utc>,
    pub preview: String,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
            last_modified: Utc::now(),
            preview: EMPTY_PREVIEW.to_string(),
        }
    }

    /// Append a message, refreshing title, preview, and modification time.
    ///
    /// The title is derived from the first user message once and then kept,
    /// even if that message later scrolls out of the truncation window.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.last_modified = Utc::now();

        if self.title == DEFAULT_TITLE {
            if let Some(first_user) = self.messages.iter().find(|m| m.role == Role::User) {
                self.title = truncate_with_ellipsis(&first_user.content, TITLE_LEN);
            }
        }
        if let Some(last) = self.messages.last() {
            self.preview = last.content.chars().take(PREVIEW_LEN).collect();
        }
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    let truncated: String = text.chars().take(max).collect();
    if text.chars().count() > max {
        format!("{truncated}...")
    } else if truncated.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        truncated
    }
}

/// Session list, current-session tracking, and the saved-agent library,
/// all persisted through the storage port.
pub struct SessionStore {
    storage: Arc<dyn Storage>,
    sessions: Vec<ChatSession>,
    current: Option<Uuid>,
}

impl SessionStore {
    /// Load persisted sessions and restore the last-active one.
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        let sessions: Vec<ChatSession> = match storage.get(keys::SESSIONS) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!("Stored sessions are corrupt, starting fresh: {}", e);
                Vec::new()
            }),
            _ => Vec::new(),
        };

        let current = storage
            .get(keys::LAST_SESSION)
            .ok()
            .flatten()
            .and_then(|id| Uuid::parse_str(id.trim_matches('"')).ok())
            .filter(|id| sessions.iter().any(|s| s.id == *id));

        Self {
            storage,
            sessions,
            current,
        }
    }

    /// Start a fresh session and make it current.
    pub fn create(&mut self) -> Uuid {
        let session = ChatSession::new();
        let id = session.id;
        self.sessions.push(session);
        self.current = Some(id);
        debug!("New session initialized: {}", id);
        self.persist();
        id
    }

    /// The current session, creating one on demand.
    pub fn current(&mut self) -> &ChatSession {
        let idx = self.current_index();
        &self.sessions[idx]
    }

    fn current_index(&mut self) -> usize {
        if let Some(id) = self.current {
            if let Some(idx) = self.sessions.iter().position(|s| s.id == id) {
                return idx;
            }
        }
        self.create();
        self.sessions.len() - 1
    }

    /// Append a message to the current session.
    pub fn append(&mut self, message: Message) {
        let idx = self.current_index();
        self.sessions[idx].push(message);
        self.persist();
    }

    /// Switch to an existing session. Returns false for unknown ids.
    pub fn switch_to(&mut self, id: Uuid) -> bool {
        if self.sessions.iter().any(|s| s.id == id) {
            self.current = Some(id);
            self.persist();
            true
        } else {
            false
        }
    }

    /// Delete a session; deleting the current one starts a fresh session.
    pub fn delete(&mut self, id: Uuid) {
        self.sessions.retain(|s| s.id != id);
        if self.current == Some(id) {
            self.current = None;
            self.create();
        } else {
            self.persist();
        }
    }

    /// Sessions ordered most-recently-modified first.
    pub fn list(&self) -> Vec<&ChatSession> {
        let mut sessions: Vec<&ChatSession> = self.sessions.iter().collect();
        sessions.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        sessions
    }

    fn persist(&self) {
        match serde_json::to_string(&self.sessions) {
            Ok(json) => {
                if let Err(e) = self.storage.set(keys::SESSIONS, &json) {
                    warn!("Failed to persist sessions: {}", e);
                }
            }
            Err(e) => warn!("Failed to serialize sessions: {}", e),
        }
        if let Some(id) = self.current {
            if let Err(e) = self.storage.set(keys::LAST_SESSION, &id.to_string()) {
                warn!("Failed to persist last session id: {}", e);
            }
        }
    }

    // === Identity library ===

    pub fn saved_agents(&self) -> Vec<SavedAgent> {
        match self.storage.get(keys::SAVED_AGENTS) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    pub fn save_agent(&self, name: impl Into<String>, config: AgentConfig) -> Result<SavedAgent> {
        let agent = SavedAgent::new(name, config);
        let mut agents = self.saved_agents();
        agents.push(agent.clone());
        self.storage
            .set(keys::SAVED_AGENTS, &serde_json::to_string(&agents)?)?;
        Ok(agent)
    }

    pub fn delete_agent(&self, id: Uuid) -> Result<()> {
        let mut agents = self.saved_agents();
        agents.retain(|a| a.id != id);
        self.storage
            .set(keys::SAVED_AGENTS, &serde_json::to_string(&agents)?)
    }
}
