use super::KeyValueStore;
use crate::error::StorageError;
use crate::identity::UserIdentity;
use crate::session::{Answer, AnswerStore, PathEntry};
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Snapshot of an unsubmitted attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    #[serde(alias = "_id")]
    pub questionnaire_id: String,
    #[serde(default)]
    pub questionnaire_name: String,
    #[serde(flatten)]
    pub user: UserIdentity,
    #[serde(default)]
    pub answers: AHashMap<String, Answer>,
    #[serde(default, alias = "currentPath")]
    pub path: Vec<PathEntry>,
    #[serde(default, alias = "currentQuestionIndex")]
    pub current_index: usize,
    #[serde(default = "first_attempt")]
    pub attempt_number: u32,
    pub saved_at: DateTime<Utc>,
}

fn first_attempt() -> u32 {
    1
}

impl Draft {
    pub fn answer_store(&self) -> AnswerStore {
        AnswerStore::from_parts(self.answers.clone(), self.path.clone())
    }
}

/// Storage key of the draft for one respondent and questionnaire.
pub fn draft_key(questionnaire_id: &str, user: &UserIdentity) -> String {
    format!("draft_{}_{}", questionnaire_id, user.storage_key())
}

/// Reads and writes drafts through a `KeyValueStore`. Last write wins.
#[derive(Debug)]
pub struct DraftStore<S> {
    store: S,
}

impl<S: KeyValueStore> DraftStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn save(&mut self, draft: &Draft) -> Result<(), StorageError> {
        let key = draft_key(&draft.questionnaire_id, &draft.user);
        let json = serde_json::to_string(draft).map_err(|e| StorageError::Serialization {
            key: key.clone(),
            message: e.to_string(),
        })?;
        self.store.put(&key, &json)?;
        info!(key = %key, answers = draft.answers.len(), "draft saved");
        Ok(())
    }

    /// Returns the last saved draft. Unreadable or corrupt drafts are logged
    /// and reported as absent.
    pub fn load(&self, questionnaire_id: &str, user: &UserIdentity) -> Option<Draft> {
        let key = draft_key(questionnaire_id, user);
        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = %key, error = %e, "could not read draft");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(draft) => Some(draft),
            Err(e) => {
                warn!(key = %key, error = %e, "ignoring corrupt draft");
                None
            }
        }
    }

    pub fn clear(&mut self, questionnaire_id: &str, user: &UserIdentity) -> Result<(), StorageError> {
        self.store.delete(&draft_key(questionnaire_id, user))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}
