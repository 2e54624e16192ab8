use super::KeyValueStore;
use crate::error::{LibraryError, StorageError, ValidationError};
use crate::questionnaire::{Questionnaire, QuestionnaireStatus};
use ahash::AHashSet;
use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use tracing::{info, warn};

pub const TEMPLATE_DRAFTS_KEY: &str = "templateDrafts";
pub const SAVED_TEMPLATES_KEY: &str = "SavedTemplates";
pub const COMPLETED_TEMPLATES_KEY: &str = "completedTemplates";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateStatusFilter {
    #[default]
    All,
    Only(QuestionnaireStatus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateSort {
    #[default]
    MostRecent,
    Oldest,
    Name,
}

/// Questionnaire templates kept on the admin's machine.
///
/// Each list key holds a JSON array of whole questionnaire aggregates. A
/// list that cannot be parsed is logged and read as empty.
#[derive(Debug)]
pub struct TemplateLibrary<S> {
    store: S,
}

impl<S: KeyValueStore> TemplateLibrary<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Upserts an in-progress template. Re-saving keeps the first `created_at`.
    pub fn save_draft(
        &mut self,
        questionnaire: &Questionnaire,
        now: DateTime<Utc>,
    ) -> Result<Questionnaire, LibraryError> {
        let stored = self.upsert(questionnaire, QuestionnaireStatus::Draft, now)?;
        info!(id = %stored.id, name = %stored.name, "template saved as draft");
        Ok(stored)
    }

    /// Marks a template completed and appends a copy to the saved list.
    pub fn save_completed(
        &mut self,
        questionnaire: &Questionnaire,
        now: DateTime<Utc>,
    ) -> Result<Questionnaire, LibraryError> {
        let stored = self.upsert(questionnaire, QuestionnaireStatus::Completed, now)?;
        let mut saved = self.read_list(SAVED_TEMPLATES_KEY);
        saved.push(stored.clone());
        self.write_list(SAVED_TEMPLATES_KEY, &saved)?;
        info!(id = %stored.id, name = %stored.name, "template completed");
        Ok(stored)
    }

    /// Templates from the draft and completed lists, first occurrence of an id wins.
    pub fn list(&self, filter: TemplateStatusFilter, sort: TemplateSort) -> Vec<Questionnaire> {
        let mut seen = AHashSet::new();
        let mut templates: Vec<Questionnaire> = self
            .read_list(TEMPLATE_DRAFTS_KEY)
            .into_iter()
            .chain(self.read_list(COMPLETED_TEMPLATES_KEY))
            .filter(|t| seen.insert(t.id.clone()))
            .filter(|t| match filter {
                TemplateStatusFilter::All => true,
                TemplateStatusFilter::Only(status) => t.status == status,
            })
            .collect();

        match sort {
            TemplateSort::MostRecent => templates.sort_by_key(|t| Reverse(t.updated_at)),
            TemplateSort::Oldest => templates.sort_by_key(|t| t.updated_at),
            TemplateSort::Name => templates.sort_by_key(|t| t.name.to_lowercase()),
        }
        templates
    }

    pub fn get(&self, id: &str) -> Option<Questionnaire> {
        self.read_list(TEMPLATE_DRAFTS_KEY)
            .into_iter()
            .chain(self.read_list(COMPLETED_TEMPLATES_KEY))
            .find(|t| t.id == id)
    }

    /// Removes every copy of the template. Returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> Result<bool, StorageError> {
        let mut removed = false;
        for key in [TEMPLATE_DRAFTS_KEY, SAVED_TEMPLATES_KEY, COMPLETED_TEMPLATES_KEY] {
            let mut list = self.read_list(key);
            let before = list.len();
            list.retain(|t| t.id != id);
            if list.len() != before {
                self.write_list(key, &list)?;
                removed = true;
            }
        }
        Ok(removed)
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn upsert(
        &mut self,
        questionnaire: &Questionnaire,
        status: QuestionnaireStatus,
        now: DateTime<Utc>,
    ) -> Result<Questionnaire, LibraryError> {
        if questionnaire.nodes.is_empty() {
            return Err(ValidationError::EmptyQuestionnaire.into());
        }
        if questionnaire.name.trim().is_empty() {
            return Err(ValidationError::MissingName.into());
        }

        let mut stored = questionnaire.clone();
        stored.name = stored.name.trim().to_string();
        stored.description = stored.description.trim().to_string();
        stored.status = status;
        stored.updated_at = now;

        let mut drafts = self.read_list(TEMPLATE_DRAFTS_KEY);
        match drafts.iter_mut().find(|t| t.id == stored.id) {
            Some(existing) => {
                stored.created_at = existing.created_at;
                *existing = stored.clone();
            }
            None => drafts.push(stored.clone()),
        }
        self.write_list(TEMPLATE_DRAFTS_KEY, &drafts)?;
        Ok(stored)
    }

    fn read_list(&self, key: &str) -> Vec<Questionnaire> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key, error = %e, "could not read template list");
                return Vec::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(key, error = %e, "ignoring corrupt template list");
            Vec::new()
        })
    }

    fn write_list(&mut self, key: &str, list: &[Questionnaire]) -> Result<(), StorageError> {
        let json = serde_json::to_string(list).map_err(|e| StorageError::Serialization {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.store.put(key, &json)
    }
}
