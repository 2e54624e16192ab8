//! Required-question validation and the submission record.
mod common;
use common::*;
use shitsumon::prelude::*;

#[test]
fn test_hidden_required_questions_do_not_block() {
    let q = smoking_questionnaire();
    let store = answers(&[("1", Answer::text("No")), ("3", Answer::text("Never"))]);
    let visibility = VisibilityResolver::new(&q).resolve(&store);
    // 2 and 5 are required but not on this route
    assert!(validate_required(&q, &visibility, &store).is_empty());
}

#[test]
fn test_required_in_visible_order() {
    let q = smoking_questionnaire();
    let store = answers(&[("3", Answer::text("Former"))]);
    let visibility = VisibilityResolver::with_root(&q, "3").resolve(&store);
    assert_eq!(validate_required(&q, &visibility, &store), ["5"]);

    let empty = AnswerStore::new();
    let visibility = VisibilityResolver::new(&q).resolve(&empty);
    assert_eq!(validate_required(&q, &visibility, &empty), ["1"]);
}

#[test]
fn test_empty_checkbox_does_not_count_as_answered() {
    let mut q = checkbox_questionnaire();
    q.nodes[0].required = true;
    let store = answers(&[("1", Answer::choices(Vec::<String>::new()))]);
    let visibility = VisibilityResolver::new(&q).resolve(&store);
    assert_eq!(validate_required(&q, &visibility, &store), ["1"]);
}

#[test]
fn test_record_contains_only_the_visible_route() {
    let q = smoking_questionnaire();
    // a stale answer to 2 from an abandoned branch, never pruned
    let mut store = answers(&[("1", Answer::text("Yes")), ("2", Answer::text("10"))]);
    store.record("1", Answer::text("No"));
    store.record("3", Answer::text("Never"));
    let visibility = VisibilityResolver::new(&q).resolve(&store);

    let user = ana().with_email("ana@example.org");
    let submission = build_submission(&q, &store, &visibility, &user, 3, ts(30)).unwrap();
    assert_eq!(submission.questionnaire_name(), "Smoking intake");
    assert_eq!(submission.attempt_number(), 3);
    assert_eq!(submission.total_questions_answered(), 2);
    assert!(!submission.answers().contains_key("2"));

    let steps: Vec<(&str, &str)> = submission
        .flow_path()
        .iter()
        .map(|s| (s.question_id.as_str(), s.question_type.as_str()))
        .collect();
    assert_eq!(steps, [("1", "yes-no"), ("3", "radio")]);

    let json = serde_json::to_value(&submission).unwrap();
    assert_eq!(json["userName"], "Ana Souza");
    assert_eq!(json["userEmail"], "ana@example.org");
    assert_eq!(json["totalQuestionsAnswered"], 2);
    assert_eq!(json["flowPath"][1]["answer"], "Never");
}

#[test]
fn test_incomplete_lists_every_missing_question() {
    let mut q = smoking_questionnaire();
    q.nodes[3].required = true;
    let store = answers(&[("1", Answer::text("Yes")), ("2", Answer::text("3"))]);
    let visibility = VisibilityResolver::new(&q).resolve(&store);
    let err = build_submission(&q, &store, &visibility, &ana(), 1, ts(0)).unwrap_err();
    match err {
        SubmissionError::Incomplete { ref unanswered } => assert_eq!(unanswered, &["4"]),
        ref other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(
        err.to_string(),
        "Please answer all required questions. 1 required questions remaining."
    );
}
