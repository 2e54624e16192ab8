use crate::questionnaire::QuestionKind;
use crate::resolver::Visibility;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A recorded answer: a single string, or the selected labels of a checkbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Text(String),
    Choices(Vec<String>),
}

impl Answer {
    pub fn text(value: impl Into<String>) -> Self {
        Answer::Text(value.into())
    }

    pub fn choices<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Answer::Choices(values.into_iter().map(Into::into).collect())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Answer::Text(value) => Some(value),
            Answer::Choices(_) => None,
        }
    }

    pub fn as_choices(&self) -> Option<&[String]> {
        match self {
            Answer::Choices(values) => Some(values),
            Answer::Text(_) => None,
        }
    }

    /// Whether this answer counts as answering a question of `kind`.
    pub fn satisfies(&self, kind: &QuestionKind) -> bool {
        match (kind, self) {
            (QuestionKind::TextInput, Answer::Text(value)) => !value.trim().is_empty(),
            (QuestionKind::Checkbox { .. }, Answer::Choices(values)) => !values.is_empty(),
            (QuestionKind::Checkbox { .. } | QuestionKind::TextInput, _) => false,
            (_, Answer::Text(value)) => !value.is_empty(),
            (_, Answer::Choices(values)) => !values.is_empty(),
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Text(value) => write!(f, "{}", value),
            Answer::Choices(values) => write!(f, "{}", values.join(", ")),
        }
    }
}

/// One step of the route a respondent took.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathEntry {
    pub node_id: String,
    pub answer: Answer,
}

/// Answers keyed by question id, plus the ordered path in which they were given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerStore {
    answers: AHashMap<String, Answer>,
    #[serde(default)]
    path: Vec<PathEntry>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from persisted parts.
    pub fn from_parts(answers: AHashMap<String, Answer>, path: Vec<PathEntry>) -> Self {
        Self { answers, path }
    }

    /// Inserts or replaces the answer for `node_id`.
    ///
    /// Re-answering a question already on the path cuts the path right after
    /// it: whatever followed was decided under the old answer.
    pub fn record(&mut self, node_id: &str, answer: Answer) {
        match self.path.iter().position(|entry| entry.node_id == node_id) {
            Some(idx) => {
                self.path.truncate(idx + 1);
                self.path[idx].answer = answer.clone();
            }
            None => self.path.push(PathEntry {
                node_id: node_id.to_string(),
                answer: answer.clone(),
            }),
        }
        self.answers.insert(node_id.to_string(), answer);
    }

    /// Adds or removes one checkbox label, keeping the other selections in order.
    pub fn toggle_option(&mut self, node_id: &str, option: &str, selected: bool) {
        let mut current: Vec<String> = self
            .answers
            .get(node_id)
            .and_then(Answer::as_choices)
            .map(<[String]>::to_vec)
            .unwrap_or_default();

        let present = current.iter().any(|o| o == option);
        match (selected, present) {
            (true, false) => current.push(option.to_string()),
            (false, true) => current.retain(|o| o != option),
            _ => {}
        }
        self.record(node_id, Answer::Choices(current));
    }

    /// Drops answers and path entries for questions that are no longer visible.
    /// Returns the ids that were dropped.
    pub fn prune_to(&mut self, visibility: &Visibility) -> Vec<String> {
        let mut dropped: Vec<String> = self
            .answers
            .keys()
            .filter(|id| !visibility.contains(id))
            .cloned()
            .collect();
        dropped.sort();
        for id in &dropped {
            self.answers.remove(id);
        }
        self.path.retain(|entry| visibility.contains(&entry.node_id));
        dropped
    }

    pub fn get(&self, node_id: &str) -> Option<&Answer> {
        self.answers.get(node_id)
    }

    pub fn answers(&self) -> &AHashMap<String, Answer> {
        &self.answers
    }

    pub fn path(&self) -> &[PathEntry] {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Whether `node_id` holds an answer that counts for a question of `kind`.
    pub fn is_answered(&self, node_id: &str, kind: &QuestionKind) -> bool {
        self.answers
            .get(node_id)
            .is_some_and(|answer| answer.satisfies(kind))
    }

    pub fn clear(&mut self) {
        self.answers.clear();
        self.path.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_truncates_path_on_reanswer() {
        let mut store = AnswerStore::new();
        store.record("1", Answer::text("Yes"));
        store.record("2", Answer::text("Daily"));
        store.record("3", Answer::text("Two packs"));
        store.record("1", Answer::text("No"));

        let ids: Vec<_> = store.path().iter().map(|e| e.node_id.as_str()).collect();
        assert_eq!(ids, vec!["1"]);
        assert_eq!(store.path()[0].answer, Answer::text("No"));
        // Answers are kept until the session prunes them against visibility.
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_toggle_option_preserves_other_selections() {
        let mut store = AnswerStore::new();
        store.toggle_option("4", "A", true);
        store.toggle_option("4", "B", true);
        store.toggle_option("4", "C", true);
        store.toggle_option("4", "B", false);
        store.toggle_option("4", "A", true);
        assert_eq!(store.get("4"), Some(&Answer::choices(["A", "C"])));
    }

    #[test]
    fn test_answer_json_shape() {
        let text: Answer = serde_json::from_str("\"hello\"").unwrap();
        let list: Answer = serde_json::from_str("[\"A\",\"B\"]").unwrap();
        assert_eq!(text, Answer::text("hello"));
        assert_eq!(list, Answer::choices(["A", "B"]));
    }

    #[test]
    fn test_satisfies_per_kind() {
        assert!(!Answer::text("   ").satisfies(&QuestionKind::TextInput));
        assert!(Answer::text(" x ").satisfies(&QuestionKind::TextInput));
        let checkbox = QuestionKind::Checkbox {
            options: vec!["A".into()],
        };
        assert!(!Answer::choices(Vec::<String>::new()).satisfies(&checkbox));
        assert!(!Answer::text("A").satisfies(&checkbox));
        assert!(Answer::text("Yes").satisfies(&QuestionKind::YesNo));
        assert!(!Answer::text("").satisfies(&QuestionKind::YesNo));
    }
}
