//! Prelude module for convenient imports
//!
//! Re-exports the types most programs need to build, run and submit a
//! questionnaire.
//!
//! # Example
//!
//! ```rust,no_run
//! use shitsumon::prelude::*;
//!
//! # fn run_example() -> Result<(), Box<dyn std::error::Error>> {
//! let graph = load_from_file("path/to/flow.json")?;
//! let questionnaire = Questionnaire::new("intake", "Intake", chrono::Utc::now())
//!     .with_graph(graph.nodes, graph.edges);
//!
//! let mut answers = AnswerStore::new();
//! answers.record("1", Answer::text("Yes"));
//!
//! let visibility = VisibilityResolver::new(&questionnaire).resolve(&answers);
//! println!("{}", TraceFormatter::format_route(&visibility, &questionnaire));
//! # Ok(())
//! # }
//! ```

// Questionnaire model and import/export
pub use crate::questionnaire::{
    Condition, Edge, IntoQuestionGraph, QuestionGraph, QuestionKind, QuestionNode, Questionnaire,
    QuestionnaireStatus, ROOT_NODE_ID, export_json, import_json, load_from_file, save_to_file,
};
pub use crate::ui::UiFlow;

// Editing
pub use crate::builder::{EditorCommand, EditorEvent, QuestionDraft, QuestionnaireEditor};

// Runtime
pub use crate::resolver::{Visibility, VisibilityResolver};
pub use crate::session::{Answer, AnswerStore, AssessmentSession, DraftChoice};
pub use crate::submission::{Submission, build_submission, validate_required};
pub use crate::trace::TraceFormatter;

// Storage and delivery
pub use crate::identity::UserIdentity;
pub use crate::storage::{DraftStore, FileStore, KeyValueStore, MemoryStore, TemplateLibrary};
pub use crate::transport::{RecordingTransport, SubmissionTransport};

pub use crate::config::EngineConfig;

// Error types
pub use crate::error::{
    BuilderError, ImportError, StorageError, SubmissionError, TransportError, ValidationError,
};
