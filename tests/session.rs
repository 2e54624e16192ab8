//! Respondent sessions: answering, branch invalidation, drafts and submission.
mod common;
use common::*;
use shitsumon::prelude::*;
use shitsumon::storage::{Draft, draft_key};
use std::time::{Duration, Instant};

fn session(store: MemoryStore) -> AssessmentSession<MemoryStore> {
    AssessmentSession::start(smoking_questionnaire(), ana(), store, &EngineConfig::default())
        .unwrap()
}

#[test]
fn test_blank_user_cannot_start() {
    let mut user = ana();
    user.name = "  ".into();
    let result = AssessmentSession::start(
        smoking_questionnaire(),
        user,
        MemoryStore::new(),
        &EngineConfig::default(),
    );
    assert!(matches!(result, Err(ValidationError::MissingUserName)));
}

#[test]
fn test_changing_branch_drops_unreachable_answers() {
    let mut s = session(MemoryStore::new());
    let now = Instant::now();
    s.answer("1", Answer::text("Yes"), now).unwrap();
    s.answer("2", Answer::text("10"), now).unwrap();
    s.answer("4", Answer::choices(["Alcohol"]), now).unwrap();
    assert_eq!(s.visible().ordered(), ["1", "2", "4"]);

    let dropped = s.answer("1", Answer::text("No"), now).unwrap();
    assert_eq!(dropped, ["2", "4"]);
    assert_eq!(s.visible().ordered(), ["1", "3"]);
    assert_eq!(s.answers().len(), 1);
    assert_eq!(s.answers().path().len(), 1);
    assert_eq!(s.answers().get("1"), Some(&Answer::text("No")));
}

#[test]
fn test_unknown_question_is_rejected() {
    let mut s = session(MemoryStore::new());
    assert_eq!(
        s.answer("77", Answer::text("x"), Instant::now()),
        Err(ValidationError::UnknownQuestion("77".into()))
    );
}

#[test]
fn test_toggle_option_keeps_other_selections() {
    let q = checkbox_questionnaire();
    let mut s =
        AssessmentSession::start(q, ana(), MemoryStore::new(), &EngineConfig::default()).unwrap();
    let now = Instant::now();
    s.toggle_option("1", "A", true, now).unwrap();
    s.toggle_option("1", "C", true, now).unwrap();
    assert_eq!(s.visible().ordered(), ["1", "2", "3"]);

    s.toggle_option("1", "A", false, now).unwrap();
    assert_eq!(s.answers().get("1"), Some(&Answer::choices(["C"])));
    assert_eq!(s.visible().ordered(), ["1"]);
}

#[test]
fn test_linear_paging_is_clamped() {
    let mut s = session(MemoryStore::new());
    let now = Instant::now();
    assert_eq!(s.current().map(|n| n.id.as_str()), Some("1"));
    assert_eq!(s.previous().map(|n| n.id.as_str()), Some("1"));
    assert_eq!(s.next().map(|n| n.id.as_str()), Some("1"));

    s.answer("1", Answer::text("Yes"), now).unwrap();
    assert_eq!(s.next().map(|n| n.id.as_str()), Some("2"));
    assert_eq!(s.progress(), (2, 2));

    // switching to No shrinks the list under the cursor
    s.answer("1", Answer::text("No"), now).unwrap();
    assert_eq!(s.current().map(|n| n.id.as_str()), Some("3"));
    assert_eq!(s.previous().map(|n| n.id.as_str()), Some("1"));
}

#[test]
fn test_cursor_follows_a_shrinking_branch() {
    let mut s = session(MemoryStore::new());
    let now = Instant::now();
    s.answer("1", Answer::text("Yes"), now).unwrap();
    s.answer("2", Answer::text("10"), now).unwrap();
    s.next();
    s.next();
    assert_eq!(s.current_index(), 2);

    s.answer("1", Answer::text("No"), now).unwrap();
    assert_eq!(s.visible().ordered(), ["1", "3"]);
    assert_eq!(s.current_index(), 1);
    assert_eq!(s.previous().map(|n| n.id.as_str()), Some("1"));
}

#[test]
fn test_resume_clamps_a_stale_cursor() {
    let mut store = MemoryStore::new();
    let json = r#"{
        "_id": "smoking",
        "userName": "Ana Souza",
        "answers": { "1": "No", "3": "Former" },
        "currentQuestionIndex": 9,
        "savedAt": "2025-03-14T09:10:00Z"
    }"#;
    store.put(&draft_key("smoking", &ana()), json).unwrap();

    let mut s = session(store);
    assert!(s.resume(DraftChoice::Continue));
    assert_eq!(s.visible().ordered(), ["1", "3", "5"]);
    assert_eq!(s.current_index(), 2);
    assert_eq!(s.previous().map(|n| n.id.as_str()), Some("3"));
}

#[test]
fn test_draft_round_trip_and_resume() {
    let mut s = session(MemoryStore::new());
    let now = Instant::now();
    s.answer("1", Answer::text("Yes"), now).unwrap();
    s.answer("2", Answer::text("20"), now).unwrap();
    s.next();
    s.save_draft(ts(5)).unwrap();

    let store = s.into_store();
    let key = draft_key("smoking", &ana());
    assert_eq!(key, "draft_smoking_ana souza");
    assert!(store.get(&key).unwrap().is_some());

    let mut resumed = session(store);
    let draft = resumed.pending_draft().unwrap();
    assert_eq!(draft.saved_at, ts(5));
    assert_eq!(draft.current_index, 1);

    assert!(resumed.resume(DraftChoice::Continue));
    assert_eq!(resumed.answers().get("2"), Some(&Answer::text("20")));
    assert_eq!(resumed.visible().ordered(), ["1", "2", "4"]);
    assert_eq!(resumed.current().map(|n| n.id.as_str()), Some("2"));
}

#[test]
fn test_start_new_discards_draft() {
    let mut s = session(MemoryStore::new());
    s.answer("1", Answer::text("Yes"), Instant::now()).unwrap();
    s.save_draft(ts(1)).unwrap();

    let mut fresh = session(s.into_store());
    assert!(!fresh.resume(DraftChoice::StartNew));
    assert!(fresh.pending_draft().is_none());
    assert!(fresh.answers().is_empty());
}

#[test]
fn test_drafts_are_per_user() {
    let mut s = session(MemoryStore::new());
    s.answer("1", Answer::text("Yes"), Instant::now()).unwrap();
    s.save_draft(ts(1)).unwrap();

    let other = UserIdentity::new("Ben").unwrap();
    let s2 = AssessmentSession::start(
        smoking_questionnaire(),
        other,
        s.into_store(),
        &EngineConfig::default(),
    )
    .unwrap();
    assert!(s2.pending_draft().is_none());
}

#[test]
fn test_corrupt_draft_reads_as_missing() {
    let mut store = MemoryStore::new();
    store
        .put(&draft_key("smoking", &ana()), "{ not json")
        .unwrap();
    let mut s = session(store);
    assert!(s.pending_draft().is_none());
    assert!(!s.resume(DraftChoice::Continue));
}

#[test]
fn test_legacy_draft_field_names_are_accepted() {
    let json = r#"{
        "_id": "smoking",
        "userName": "Ana Souza",
        "answers": { "1": "No", "3": "Former" },
        "currentQuestionIndex": 2,
        "savedAt": "2025-03-14T09:10:00Z"
    }"#;
    let draft: Draft = serde_json::from_str(json).unwrap();
    assert_eq!(draft.questionnaire_id, "smoking");
    assert_eq!(draft.attempt_number, 1);
    assert_eq!(draft.current_index, 2);
    assert_eq!(draft.answer_store().get("3"), Some(&Answer::text("Former")));
}

#[test]
fn test_autosave_tick() {
    let mut s = session(MemoryStore::new());
    let start = Instant::now();
    assert!(!s.tick(start, ts(0)).unwrap());

    s.answer("1", Answer::text("Yes"), start).unwrap();
    assert!(!s.tick(start + Duration::from_millis(200), ts(0)).unwrap());
    assert!(s.tick(start + Duration::from_secs(2), ts(1)).unwrap());
    assert!(s.pending_draft().is_some());
    // nothing changed since the last save
    assert!(!s.tick(start + Duration::from_secs(60), ts(2)).unwrap());
}

#[test]
fn test_autosave_when_ticking_right_after_each_answer() {
    let mut s = session(MemoryStore::new());
    let start = Instant::now();
    s.answer("1", Answer::text("Yes"), start).unwrap();
    assert!(!s.tick(start, ts(0)).unwrap());

    // the interval counts from the first unsaved answer
    let later = start + Duration::from_secs(40);
    s.answer("2", Answer::text("10"), later).unwrap();
    assert!(s.tick(later, ts(1)).unwrap());
    assert_eq!(s.pending_draft().unwrap().answers.len(), 2);
}

#[test]
fn test_manual_save_settles_the_autosave_timer() {
    let mut s = session(MemoryStore::new());
    let start = Instant::now();
    s.answer("1", Answer::text("Yes"), start).unwrap();
    s.save_draft(ts(1)).unwrap();
    assert!(!s.tick(start + Duration::from_secs(60), ts(2)).unwrap());
}

#[test]
fn test_failed_save_never_blocks_answering() {
    let mut store = MemoryStore::new();
    store.fail_writes(true);
    let mut s = session(store);
    let start = Instant::now();
    s.answer("1", Answer::text("Yes"), start).unwrap();
    assert!(s.tick(start + Duration::from_secs(2), ts(1)).is_err());

    s.answer("2", Answer::text("4"), start).unwrap();
    assert_eq!(s.answers().len(), 2);

    // the timer stays due, so the next tick retries once storage recovers
    s.store_mut().fail_writes(false);
    assert!(s.tick(start + Duration::from_secs(3), ts(2)).unwrap());
}

#[test]
fn test_reset_clears_answers_and_draft() {
    let mut s = session(MemoryStore::new());
    s.answer("1", Answer::text("Yes"), Instant::now()).unwrap();
    s.save_draft(ts(1)).unwrap();
    s.reset().unwrap();
    assert!(s.answers().is_empty());
    assert!(s.pending_draft().is_none());
    assert_eq!(s.visible().ordered(), ["1"]);
}

#[test]
fn test_incomplete_submission_is_rejected() {
    let mut s = session(MemoryStore::new());
    let mut transport = RecordingTransport::new();
    s.answer("1", Answer::text("Yes"), Instant::now()).unwrap();
    s.answer("2", Answer::text("   "), Instant::now()).unwrap();

    match s.submit(&mut transport, ts(9)) {
        Err(SubmissionError::Incomplete { unanswered }) => assert_eq!(unanswered, ["2"]),
        other => panic!("expected incomplete, got {:?}", other),
    }
    assert!(transport.submissions().is_empty());
    assert!(!s.is_submitted());
}

#[test]
fn test_successful_submission_clears_draft() {
    let mut s = session(MemoryStore::new());
    let mut transport = RecordingTransport::new();
    s.answer("1", Answer::text("Yes"), Instant::now()).unwrap();
    s.answer("2", Answer::text("10"), Instant::now()).unwrap();
    s.save_draft(ts(3)).unwrap();

    let receipt = s.submit(&mut transport, ts(9)).unwrap();
    assert_eq!(receipt.id.as_deref(), Some("submission-1"));
    assert!(s.pending_draft().is_none());
    assert!(s.is_submitted());

    let sent = &transport.submissions()[0];
    assert_eq!(sent.questionnaire_id(), "smoking");
    assert_eq!(sent.attempt_number(), 1);
    assert_eq!(sent.total_questions_answered(), 2);
    assert_eq!(sent.submitted_at(), ts(9));
    let steps: Vec<&str> = sent.flow_path().iter().map(|s| s.question_id.as_str()).collect();
    assert_eq!(steps, ["1", "2"]);

    assert_eq!(
        s.answer("1", Answer::text("No"), Instant::now()),
        Err(ValidationError::AlreadySubmitted)
    );
    assert!(matches!(
        s.submit(&mut transport, ts(10)),
        Err(SubmissionError::Rejected(ValidationError::AlreadySubmitted))
    ));
}

#[test]
fn test_transport_failure_keeps_draft() {
    let mut s = session(MemoryStore::new());
    let mut transport = RecordingTransport::new();
    transport.fail_with(TransportError::Status {
        status: 503,
        body: "maintenance".into(),
    });
    s.answer("1", Answer::text("No"), Instant::now()).unwrap();

    let err = s.submit(&mut transport, ts(9)).unwrap_err();
    assert!(matches!(err, SubmissionError::Transport(TransportError::Status { status: 503, .. })));
    let draft = s.pending_draft().unwrap();
    assert_eq!(draft.answers.len(), 1);
    assert_eq!(draft.saved_at, ts(9));

    transport.recover();
    s.submit(&mut transport, ts(10)).unwrap();
    assert!(s.pending_draft().is_none());
}

#[test]
fn test_new_attempt_numbering() {
    let mut s = session(MemoryStore::new());
    let mut transport = RecordingTransport::new();
    s.answer("1", Answer::text("No"), Instant::now()).unwrap();
    s.submit(&mut transport, ts(1)).unwrap();

    s.start_new_attempt(1);
    assert_eq!(s.attempt(), 2);
    assert!(!s.is_submitted());
    s.answer("1", Answer::text("No"), Instant::now()).unwrap();
    s.submit(&mut transport, ts(2)).unwrap();
    assert_eq!(transport.submissions()[1].attempt_number(), 2);
}

#[test]
fn test_sync_draft_pushes_snapshot() {
    let mut s = session(MemoryStore::new());
    let mut transport = RecordingTransport::new();
    s.answer("1", Answer::text("Yes"), Instant::now()).unwrap();
    s.sync_draft(&mut transport, ts(4)).unwrap();
    assert_eq!(transport.drafts().len(), 1);
    assert_eq!(transport.drafts()[0].user.name, "Ana Souza");
}
