//! Common test utilities for building questionnaires and answer sets.
use chrono::{DateTime, TimeZone, Utc};
use shitsumon::prelude::*;

/// A fixed timestamp so saved records compare equal across runs.
#[allow(dead_code)]
pub fn ts(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, minute, 0).unwrap()
}

#[allow(dead_code)]
pub fn options(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|l| l.to_string()).collect()
}

/// The smoking intake form.
///
/// ```text
/// [1] Do you smoke? (yes-no)
///   Yes -> [2] How many per day? (text, required) -- Any Text -> [4] Other habits? (checkbox)
///   No  -> [3] Have you ever smoked? (radio: Never, Former)
///                Former -> [5] When did you quit? (text, required)
/// ```
#[allow(dead_code)]
pub fn smoking_questionnaire() -> Questionnaire {
    Questionnaire::new("smoking", "Smoking intake", ts(0)).with_graph(
        vec![
            QuestionNode::new("1", "Do you smoke?", QuestionKind::YesNo).required(),
            QuestionNode::new("2", "How many per day?", QuestionKind::TextInput).required(),
            QuestionNode::new(
                "3",
                "Have you ever smoked?",
                QuestionKind::Radio {
                    options: options(&["Never", "Former"]),
                },
            ),
            QuestionNode::new(
                "4",
                "Other habits?",
                QuestionKind::Checkbox {
                    options: options(&["Alcohol", "Vaping"]),
                },
            ),
            QuestionNode::new("5", "When did you quit?", QuestionKind::TextInput).required(),
        ],
        vec![
            Edge::new("e1", "1", "2", Condition::Choice("Yes".into())).with_handle("yes"),
            Edge::new("e2", "1", "3", Condition::Choice("No".into())).with_handle("no"),
            Edge::new("e3", "2", "4", Condition::AnyText).with_handle("text-output"),
            Edge::new("e4", "3", "5", Condition::Choice("Former".into())).with_handle("option-1"),
        ],
    )
}

/// A checkbox root with one edge per kind of checkbox condition.
///
/// `A -> 2`, `Any 2+ Selected -> 3`, `All Selected -> 4`.
#[allow(dead_code)]
pub fn checkbox_questionnaire() -> Questionnaire {
    Questionnaire::new("symptoms", "Symptoms", ts(0)).with_graph(
        vec![
            QuestionNode::new(
                "1",
                "Which apply?",
                QuestionKind::Checkbox {
                    options: options(&["A", "B", "C"]),
                },
            ),
            QuestionNode::new("2", "Tell us about A", QuestionKind::TextInput),
            QuestionNode::new("3", "Several selected", QuestionKind::TextInput),
            QuestionNode::new("4", "Everything selected", QuestionKind::TextInput),
        ],
        vec![
            Edge::new("c1", "1", "2", Condition::Choice("A".into())).with_handle("option-0"),
            Edge::new("c2", "1", "3", Condition::AnyTwoOrMore).with_handle("multi-2plus"),
            Edge::new("c3", "1", "4", Condition::AllSelected).with_handle("multi-all"),
        ],
    )
}

/// `1 -Yes-> 2 -Yes-> 1` plus `2 -No-> 3`.
#[allow(dead_code)]
pub fn cyclic_questionnaire() -> Questionnaire {
    Questionnaire::new("loop", "Loop", ts(0)).with_graph(
        vec![
            QuestionNode::new("1", "First", QuestionKind::YesNo),
            QuestionNode::new("2", "Second", QuestionKind::YesNo),
            QuestionNode::new("3", "Third", QuestionKind::TextInput),
        ],
        vec![
            Edge::new("l1", "1", "2", Condition::Choice("Yes".into())),
            Edge::new("l2", "2", "1", Condition::Choice("Yes".into())),
            Edge::new("l3", "2", "3", Condition::Choice("No".into())),
        ],
    )
}

#[allow(dead_code)]
pub fn answers(pairs: &[(&str, Answer)]) -> AnswerStore {
    let mut store = AnswerStore::new();
    for (id, answer) in pairs {
        store.record(id, answer.clone());
    }
    store
}

#[allow(dead_code)]
pub fn resolve(questionnaire: &Questionnaire, store: &AnswerStore) -> Vec<String> {
    VisibilityResolver::new(questionnaire)
        .resolve(store)
        .ordered()
        .to_vec()
}

#[allow(dead_code)]
pub fn ana() -> UserIdentity {
    UserIdentity::new("Ana Souza").unwrap()
}

/// The editor export format as written by the visual builder.
#[allow(dead_code)]
pub const EDITOR_EXPORT_JSON: &str = r#"
{
  "nodes": [
    {
      "id": "1",
      "type": "questionNode",
      "position": { "x": 250, "y": 100 },
      "data": { "question": "Do you exercise?", "questionType": "yes-no", "options": [], "isRequired": true }
    },
    {
      "id": "2",
      "type": "questionNode",
      "position": { "x": 100, "y": 250 },
      "data": { "question": "How often?", "questionType": "multiple-choice", "options": ["Daily", "Weekly"] }
    },
    {
      "id": "section-1",
      "type": "sectionNode",
      "position": { "x": 0, "y": 0 },
      "data": { "question": "Lifestyle" }
    },
    {
      "id": "3",
      "type": "questionNode",
      "position": { "x": 400, "y": 250 },
      "data": { "question": "Rate your mood", "questionType": "slider", "options": [] }
    }
  ],
  "edges": [
    { "id": "e1-2", "source": "1", "target": "2", "sourceHandle": "yes", "label": "Yes" },
    { "id": "e1-3", "source": "1", "target": "3", "sourceHandle": "no", "data": { "optionText": "No" } },
    { "id": "e2-3", "source": "2", "target": "3", "sourceHandle": "option-1" }
  ]
}
"#;
