//! Learned user profile
//!
//! Flat record of facts the model learns about the user, persisted as one
//! JSON blob through the storage port and injected into the system prompt
//! as a serialized dossier block.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::storage::{keys, Storage};
use crate::Result;

/// Profile mutation verb requested by the memory tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProfileAction {
    Add,
    Remove,
    Set,
}

impl ProfileAction {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "ADD" => Some(ProfileAction::Add),
            "REMOVE" => Some(ProfileAction::Remove),
            "SET" => Some(ProfileAction::Set),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileAction::Add => "ADD",
            ProfileAction::Remove => "REMOVE",
            ProfileAction::Set => "SET",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub name: Option<String>,
    pub technical_skills: Vec<String>,
    pub communication_style: String,
    pub personal_facts: Vec<String>,
    pub project_contexts: Vec<String>,
    pub preferences: Vec<String>,
}

impl UserProfile {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.technical_skills.is_empty()
            && self.personal_facts.is_empty()
            && self.preferences.is_empty()
    }

    fn list_mut(&mut self, category: &str) -> Option<&mut Vec<String>> {
        match category {
            "technicalSkills" => Some(&mut self.technical_skills),
            "personalFacts" => Some(&mut self.personal_facts),
            "projectContexts" => Some(&mut self.project_contexts),
            "preferences" => Some(&mut self.preferences),
            _ => None,
        }
    }

    /// Apply a mutation to one category.
    ///
    /// Scalar categories (`name`, `communicationStyle`) are overwritten
    /// regardless of the action. List categories append-if-absent on ADD
    /// and SET, and remove-by-value on REMOVE; matching is exact, so ADD
    /// is idempotent.
    pub fn apply(&mut self, category: &str, item: &str, action: ProfileAction) -> bool {
        match category {
            "name" => {
                self.name = Some(item.to_string());
                true
            }
            "communicationStyle" => {
                self.communication_style = item.to_string();
                true
            }
            _ => match self.list_mut(category) {
                Some(list) => {
                    match action {
                        ProfileAction::Add | ProfileAction::Set => {
                            if !list.iter().any(|v| v == item) {
                                list.push(item.to_string());
                            }
                        }
                        ProfileAction::Remove => {
                            list.retain(|v| v != item);
                        }
                    }
                    true
                }
                None => false,
            },
        }
    }

    /// Render the dossier block injected into the system prompt.
    ///
    /// Returns an empty string when nothing has been learned yet so no
    /// block is injected at all.
    pub fn dossier(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let join = |list: &[String]| -> String {
            if list.is_empty() {
                "None recorded".to_string()
            } else {
                list.join(", ")
            }
        };

        let style = if self.communication_style.is_empty() {
            "Neutral"
        } else {
            &self.communication_style
        };

        format!(
            "\n\n=== 🧠 USER DOSSIER (LONG TERM MEMORY) ===\n\
             NAME: {}\n\
             COMMUNICATION PREFERENCE: {}\n\
             KNOWN SKILLS: {}\n\
             PREFERENCES: {}\n\
             CURRENT PROJECTS: {}\n\
             PERSONAL FACTS: {}\n\
             ==========================================\n\
             *Instruction: Use the data above to personalize your response. \
             Do not explicitly mention \"I read your dossier\" unless relevant.*\n",
            self.name.as_deref().unwrap_or("Unknown"),
            style,
            join(&self.technical_skills),
            join(&self.preferences),
            join(&self.project_contexts),
            join(&self.personal_facts),
        )
    }
}

/// Read-modify-write profile store over the storage port.
#[derive(Clone)]
pub struct ProfileStore {
    storage: Arc<dyn Storage>,
}

impl ProfileStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Load the stored profile, falling back to a default on missing or
    /// corrupt data.
    pub fn load(&self) -> UserProfile {
        match self.storage.get(keys::USER_PROFILE) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!("Stored profile is corrupt, starting fresh: {}", e);
                UserProfile::default()
            }),
            Ok(None) => UserProfile::default(),
            Err(e) => {
                warn!("Failed to read profile: {}", e);
                UserProfile::default()
            }
        }
    }

    pub fn save(&self, profile: &UserProfile) -> Result<()> {
        let json = serde_json::to_string(profile)?;
        self.storage.set(keys::USER_PROFILE, &json)
    }

    /// Apply one memory-tool mutation and persist the result.
    ///
    /// Returns the textual result fed back to the model. Unknown
    /// categories produce an error string, never a failure.
    pub fn update(&self, category: &str, item: &str, action: ProfileAction) -> String {
        let mut profile = self.load();
        if !profile.apply(category, item, action) {
            return format!("Error: unknown profile category \"{category}\"");
        }
        if let Err(e) = self.save(&profile) {
            warn!("Failed to persist profile update: {}", e);
            return format!("Error: could not persist profile update: {}", e.user_message());
        }
        format!("Profile updated: [{category}] {} \"{item}\"", action.as_str())
    }

    /// Render the dossier for prompt injection.
    pub fn dossier(&self) -> String {
        self.load().dossier()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn store() -> ProfileStore {
        ProfileStore::new(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn test_add_is_idempotent() {
        let store = store();
        store.update("technicalSkills", "Rust", ProfileAction::Add);
        store.update("technicalSkills", "Rust", ProfileAction::Add);
        let profile = store.load();
        assert_eq!(profile.technical_skills, vec!["Rust"]);
    }

    #[test]
    fn test_remove_by_value() {
        let store = store();
        store.update("preferences", "short answers", ProfileAction::Add);
        store.update("preferences", "dark mode", ProfileAction::Add);
        store.update("preferences", "short answers", ProfileAction::Remove);
        assert_eq!(store.load().preferences, vec!["dark mode"]);
    }

    #[test]
    fn test_scalar_categories_overwrite() {
        let store = store();
        store.update("name", "Ada", ProfileAction::Add);
        store.update("name", "Grace", ProfileAction::Set);
        let profile = store.load();
        assert_eq!(profile.name.as_deref(), Some("Grace"));

        store.update("communicationStyle", "Terse", ProfileAction::Set);
        assert_eq!(store.load().communication_style, "Terse");
    }

    #[test]
    fn test_set_on_list_appends_if_absent() {
        let store = store();
        store.update("projectContexts", "neural-link", ProfileAction::Set);
        store.update("projectContexts", "neural-link", ProfileAction::Set);
        assert_eq!(store.load().project_contexts, vec!["neural-link"]);
    }

    #[test]
    fn test_unknown_category_is_error_string() {
        let store = store();
        let result = store.update("shoeSize", "42", ProfileAction::Add);
        assert!(result.starts_with("Error:"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_empty_profile_renders_no_dossier() {
        assert_eq!(UserProfile::default().dossier(), "");
    }

    #[test]
    fn test_dossier_contains_learned_facts() {
        let mut profile = UserProfile::default();
        profile.apply("name", "Ada", ProfileAction::Set);
        profile.apply("technicalSkills", "Rust", ProfileAction::Add);
        let dossier = profile.dossier();
        assert!(dossier.contains("NAME: Ada"));
        assert!(dossier.contains("KNOWN SKILLS: Rust"));
        assert!(dossier.contains("PERSONAL FACTS: None recorded"));
    }

    #[test]
    fn test_corrupt_blob_falls_back_to_default() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(keys::USER_PROFILE, "not json").unwrap();
        let store = ProfileStore::new(storage);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_action_parse() {
        assert_eq!(ProfileAction::parse("add"), Some(ProfileAction::Add));
        assert_eq!(ProfileAction::parse(" REMOVE "), Some(ProfileAction::Remove));
        assert_eq!(ProfileAction::parse("merge"), None);
    }
}
