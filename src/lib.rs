//! # Shitsumon - Branching Questionnaire Flow Engine
//!
//! **Shitsumon** runs conditional questionnaires: a directed graph of question
//! nodes whose edges carry answer conditions. Given the answers so far, the
//! engine decides which questions a respondent sees, drops answers that a
//! changed choice made unreachable, keeps drafts and builds the final
//! submission record.
//!
//! ## Core Workflow
//!
//! 1.  **Build or Import a Graph**: Edit one with the `QuestionnaireEditor`, or import the
//!     visual editor's `{ nodes, edges }` JSON. Custom formats implement `IntoQuestionGraph`.
//! 2.  **Start a Session**: An `AssessmentSession` ties a questionnaire, a respondent and a
//!     `KeyValueStore` for drafts together.
//! 3.  **Answer**: Every answer re-resolves visibility from the root question `"1"`.
//! 4.  **Submit**: Required visible questions are validated and the immutable `Submission`
//!     is handed to a `SubmissionTransport`.
//!
//! ## Quick Start
//!
//! ```rust
//! use shitsumon::prelude::*;
//! use chrono::Utc;
//! use std::time::Instant;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut editor = QuestionnaireEditor::new();
//!     editor.apply(EditorCommand::AddQuestion(QuestionDraft::new(
//!         "Do you smoke?",
//!         QuestionKind::YesNo,
//!     )))?;
//!     editor.apply(EditorCommand::AddQuestion(
//!         QuestionDraft::new("How many per day?", QuestionKind::TextInput).required(),
//!     ))?;
//!     editor.apply(EditorCommand::Connect {
//!         source: "1".into(),
//!         target: "2".into(),
//!         source_handle: Some("yes".into()),
//!     })?;
//!
//!     let questionnaire = Questionnaire::new("q-1", "Lifestyle", Utc::now())
//!         .with_graph(editor.graph().nodes.clone(), editor.graph().edges.clone());
//!
//!     let user = UserIdentity::new("Ana")?;
//!     let config = EngineConfig::default();
//!     let mut session = AssessmentSession::start(questionnaire, user, MemoryStore::new(), &config)?;
//!
//!     session.answer("1", Answer::text("Yes"), Instant::now())?;
//!     assert_eq!(session.visible().ordered(), ["1", "2"]);
//!
//!     // question 2 is required and still empty
//!     let mut transport = RecordingTransport::new();
//!     assert!(session.submit(&mut transport, Utc::now()).is_err());
//!
//!     session.answer("2", Answer::text("5"), Instant::now())?;
//!     session.submit(&mut transport, Utc::now())?;
//!     assert_eq!(transport.submissions()[0].total_questions_answered(), 2);
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod graph;
pub mod identity;
pub mod prelude;
pub mod questionnaire;
pub mod resolver;
pub mod session;
pub mod storage;
pub mod submission;
pub mod trace;
pub mod transport;
pub mod ui;
