use crate::error::SubmissionError;
use crate::identity::UserIdentity;
use crate::questionnaire::Questionnaire;
use crate::resolver::Visibility;
use crate::session::{Answer, AnswerStore};
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One answered question in the order the respondent went through them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowStep {
    pub question_id: String,
    pub question: String,
    pub question_type: String,
    pub answer: Option<Answer>,
}

/// The finalized record of a completed attempt. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    questionnaire_id: String,
    questionnaire_name: String,
    #[serde(flatten)]
    user: UserIdentity,
    answers: AHashMap<String, Answer>,
    flow_path: Vec<FlowStep>,
    total_questions_answered: usize,
    attempt_number: u32,
    submitted_at: DateTime<Utc>,
}

impl Submission {
    pub fn questionnaire_id(&self) -> &str {
        &self.questionnaire_id
    }

    pub fn questionnaire_name(&self) -> &str {
        &self.questionnaire_name
    }

    pub fn user(&self) -> &UserIdentity {
        &self.user
    }

    pub fn answers(&self) -> &AHashMap<String, Answer> {
        &self.answers
    }

    pub fn flow_path(&self) -> &[FlowStep] {
        &self.flow_path
    }

    pub fn total_questions_answered(&self) -> usize {
        self.total_questions_answered
    }

    pub fn attempt_number(&self) -> u32 {
        self.attempt_number
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}

/// Ids of visible required questions without a usable answer, in visible order.
pub fn validate_required(
    questionnaire: &Questionnaire,
    visibility: &Visibility,
    answers: &AnswerStore,
) -> Vec<String> {
    visibility
        .ordered()
        .iter()
        .filter_map(|id| questionnaire.node(id))
        .filter(|node| node.required && !answers.is_answered(&node.id, &node.kind))
        .map(|node| node.id.clone())
        .collect()
}

/// Validates the attempt and produces its immutable submission record.
///
/// Nothing is sent here; callers hand the record to a transport.
pub fn build_submission(
    questionnaire: &Questionnaire,
    answers: &AnswerStore,
    visibility: &Visibility,
    user: &UserIdentity,
    attempt_number: u32,
    now: DateTime<Utc>,
) -> Result<Submission, SubmissionError> {
    let unanswered = validate_required(questionnaire, visibility, answers);
    if !unanswered.is_empty() {
        return Err(SubmissionError::Incomplete { unanswered });
    }

    let flow_path = answers
        .path()
        .iter()
        .filter(|entry| visibility.contains(&entry.node_id))
        .filter_map(|entry| {
            questionnaire.node(&entry.node_id).map(|node| FlowStep {
                question_id: node.id.clone(),
                question: node.question.clone(),
                question_type: node.kind.type_name().to_string(),
                answer: Some(entry.answer.clone()),
            })
        })
        .collect();

    let visible_answers: AHashMap<String, Answer> = answers
        .answers()
        .iter()
        .filter(|(id, _)| visibility.contains(id))
        .map(|(id, answer)| (id.clone(), answer.clone()))
        .collect();

    Ok(Submission {
        questionnaire_id: questionnaire.id.clone(),
        questionnaire_name: questionnaire.name.clone(),
        user: user.clone(),
        total_questions_answered: visible_answers.len(),
        answers: visible_answers,
        flow_path,
        attempt_number,
        submitted_at: now,
    })
}
