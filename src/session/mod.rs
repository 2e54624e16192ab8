//! The respondent side: answering a questionnaire one visible question at a time.

mod answers;
mod autosave;

pub use answers::{Answer, AnswerStore, PathEntry};
pub use autosave::AutosaveTimer;

use crate::config::EngineConfig;
use crate::error::{StorageError, SubmissionError, TransportError, ValidationError};
use crate::identity::UserIdentity;
use crate::questionnaire::{QuestionNode, Questionnaire};
use crate::resolver::{Visibility, VisibilityResolver};
use crate::storage::{Draft, DraftStore, KeyValueStore};
use crate::submission::{Submission, build_submission};
use crate::transport::{Receipt, SubmissionTransport};
use chrono::{DateTime, Utc};
use std::time::Instant;
use tracing::{info, warn};

/// What to do with a draft found when a respondent returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftChoice {
    Continue,
    StartNew,
}

/// One respondent working through one questionnaire attempt.
///
/// Every answer re-resolves visibility and drops answers that are no longer
/// reachable. Drafts are written on demand or when `tick` finds the autosave
/// timer due; a failed write is returned to the caller and never undoes an
/// answer.
#[derive(Debug)]
pub struct AssessmentSession<S> {
    questionnaire: Questionnaire,
    root: String,
    answers: AnswerStore,
    drafts: DraftStore<S>,
    user: UserIdentity,
    attempt: u32,
    current_index: usize,
    autosave: AutosaveTimer,
    submission: Option<Submission>,
}

impl<S: KeyValueStore> AssessmentSession<S> {
    /// Opens a fresh first attempt. Existing drafts are left alone until
    /// `resume` is called.
    pub fn start(
        questionnaire: Questionnaire,
        user: UserIdentity,
        store: S,
        config: &EngineConfig,
    ) -> Result<Self, ValidationError> {
        if user.name.trim().is_empty() {
            return Err(ValidationError::MissingUserName);
        }
        Ok(Self {
            questionnaire,
            root: config.root_node_id.clone(),
            answers: AnswerStore::new(),
            drafts: DraftStore::new(store),
            user,
            attempt: 1,
            current_index: 0,
            autosave: AutosaveTimer::new(config.autosave_interval(), config.autosave_debounce()),
            submission: None,
        })
    }

    /// The stored draft for this respondent, if any.
    pub fn pending_draft(&self) -> Option<Draft> {
        self.drafts.load(&self.questionnaire.id, &self.user)
    }

    /// Applies the respondent's choice about a stored draft. Returns whether a
    /// draft was restored.
    pub fn resume(&mut self, choice: DraftChoice) -> bool {
        match choice {
            DraftChoice::Continue => {
                let Some(draft) = self.pending_draft() else {
                    return false;
                };
                self.answers = draft.answer_store();
                // the questionnaire may have changed since the draft was saved
                let visibility = self.visible();
                let dropped = self.answers.prune_to(&visibility);
                if !dropped.is_empty() {
                    warn!(?dropped, "draft answers no longer reachable were dropped");
                }
                self.current_index = draft.current_index.min(visibility.len().saturating_sub(1));
                self.attempt = draft.attempt_number.max(1);
                info!(
                    questionnaire = %self.questionnaire.id,
                    answers = self.answers.len(),
                    "draft restored"
                );
                true
            }
            DraftChoice::StartNew => {
                self.discard_stored_draft();
                false
            }
        }
    }

    /// Starts over as attempt `previous_completions + 1`.
    pub fn start_new_attempt(&mut self, previous_completions: u32) {
        self.discard_stored_draft();
        self.answers.clear();
        self.current_index = 0;
        self.submission = None;
        self.attempt = previous_completions + 1;
        info!(attempt = self.attempt, "new attempt started");
    }

    /// Records an answer and returns the ids of answers it invalidated.
    pub fn answer(
        &mut self,
        node_id: &str,
        answer: Answer,
        now: Instant,
    ) -> Result<Vec<String>, ValidationError> {
        self.ensure_open(node_id)?;
        self.answers.record(node_id, answer);
        Ok(self.after_change(now))
    }

    /// Selects or deselects one checkbox option.
    pub fn toggle_option(
        &mut self,
        node_id: &str,
        option: &str,
        selected: bool,
        now: Instant,
    ) -> Result<Vec<String>, ValidationError> {
        self.ensure_open(node_id)?;
        self.answers.toggle_option(node_id, option, selected);
        Ok(self.after_change(now))
    }

    pub fn visible(&self) -> Visibility {
        VisibilityResolver::with_root(&self.questionnaire, &self.root).resolve(&self.answers)
    }

    /// The question at the paging position, clamped to the visible list.
    pub fn current(&self) -> Option<&QuestionNode> {
        let visibility = self.visible();
        let last = visibility.len().checked_sub(1)?;
        let id = &visibility.ordered()[self.current_index.min(last)];
        self.questionnaire.node(id)
    }

    pub fn next(&mut self) -> Option<&QuestionNode> {
        let len = self.visible().len();
        if self.current_index + 1 < len {
            self.current_index += 1;
        }
        self.current()
    }

    pub fn previous(&mut self) -> Option<&QuestionNode> {
        self.current_index = self.current_index.saturating_sub(1);
        self.current()
    }

    /// `(position, total)` for a "Question x of y" display, 1-based.
    pub fn progress(&self) -> (usize, usize) {
        let total = self.visible().len();
        ((self.current_index + 1).min(total), total)
    }

    pub fn save_draft(&mut self, saved_at: DateTime<Utc>) -> Result<(), StorageError> {
        let draft = self.snapshot(saved_at);
        self.drafts.save(&draft).inspect_err(|e| {
            warn!(questionnaire = %draft.questionnaire_id, error = %e, "draft save failed");
        })?;
        self.autosave.mark_clean();
        Ok(())
    }

    /// Saves when the autosave timer is due. Returns whether a save happened.
    ///
    /// A failed save leaves the timer due so the next tick retries.
    pub fn tick(&mut self, now: Instant, saved_at: DateTime<Utc>) -> Result<bool, StorageError> {
        if self.submission.is_some() || !self.autosave.due(now) {
            return Ok(false);
        }
        self.save_draft(saved_at)?;
        self.autosave.mark_saved(now);
        Ok(true)
    }

    /// Mirrors the current draft through the transport.
    pub fn sync_draft(
        &self,
        transport: &mut impl SubmissionTransport,
        saved_at: DateTime<Utc>,
    ) -> Result<(), TransportError> {
        transport.push_draft(&self.snapshot(saved_at))
    }

    /// Clears every answer and the stored draft.
    pub fn reset(&mut self) -> Result<(), StorageError> {
        self.answers.clear();
        self.current_index = 0;
        self.drafts.clear(&self.questionnaire.id, &self.user)
    }

    /// Validates, builds and sends the submission.
    ///
    /// On a transport failure the draft is written again so nothing is lost.
    /// On success the draft is removed and the session no longer accepts
    /// answers.
    pub fn submit(
        &mut self,
        transport: &mut impl SubmissionTransport,
        submitted_at: DateTime<Utc>,
    ) -> Result<Receipt, SubmissionError> {
        if self.submission.is_some() {
            return Err(ValidationError::AlreadySubmitted.into());
        }
        let visibility = self.visible();
        let submission = build_submission(
            &self.questionnaire,
            &self.answers,
            &visibility,
            &self.user,
            self.attempt,
            submitted_at,
        )?;

        match transport.submit(&submission) {
            Ok(receipt) => {
                self.discard_stored_draft();
                info!(
                    questionnaire = %submission.questionnaire_id(),
                    attempt = submission.attempt_number(),
                    answered = submission.total_questions_answered(),
                    "assessment submitted"
                );
                self.submission = Some(submission);
                Ok(receipt)
            }
            Err(e) => {
                warn!(error = %e, "submission failed, keeping draft");
                // the transport error is what the caller needs to see
                let _ = self.save_draft(submitted_at);
                Err(e.into())
            }
        }
    }

    pub fn questionnaire(&self) -> &Questionnaire {
        &self.questionnaire
    }

    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    pub fn user(&self) -> &UserIdentity {
        &self.user
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The record sent by a successful `submit`.
    pub fn submission(&self) -> Option<&Submission> {
        self.submission.as_ref()
    }

    pub fn is_submitted(&self) -> bool {
        self.submission.is_some()
    }

    pub fn store(&self) -> &S {
        self.drafts.store()
    }

    pub fn store_mut(&mut self) -> &mut S {
        self.drafts.store_mut()
    }

    pub fn into_store(self) -> S {
        self.drafts.into_inner()
    }

    fn ensure_open(&self, node_id: &str) -> Result<(), ValidationError> {
        if self.submission.is_some() {
            return Err(ValidationError::AlreadySubmitted);
        }
        if self.questionnaire.node(node_id).is_none() {
            return Err(ValidationError::UnknownQuestion(node_id.to_string()));
        }
        Ok(())
    }

    fn after_change(&mut self, now: Instant) -> Vec<String> {
        let visibility = self.visible();
        let dropped = self.answers.prune_to(&visibility);
        self.current_index = self.current_index.min(visibility.len().saturating_sub(1));
        self.autosave.notify_answer(now);
        dropped
    }

    fn snapshot(&self, saved_at: DateTime<Utc>) -> Draft {
        Draft {
            questionnaire_id: self.questionnaire.id.clone(),
            questionnaire_name: self.questionnaire.name.clone(),
            user: self.user.clone(),
            answers: self.answers.answers().clone(),
            path: self.answers.path().to_vec(),
            current_index: self.current_index,
            attempt_number: self.attempt,
            saved_at,
        }
    }

    fn discard_stored_draft(&mut self) {
        if let Err(e) = self.drafts.clear(&self.questionnaire.id, &self.user) {
            warn!(questionnaire = %self.questionnaire.id, error = %e, "could not remove draft");
        }
    }
}
