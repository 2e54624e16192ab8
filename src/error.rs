use thiserror::Error;

/// Errors that can occur while importing an exported `{ nodes, edges }` document.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Failed to parse questionnaire JSON: {0}")]
    JsonParseError(String),

    #[error("Invalid questionnaire document: expected both 'nodes' and 'edges' properties")]
    MissingGraph,

    #[error("Could not access file '{path}': {message}")]
    Io { path: String, message: String },
}

/// Errors raised by editor commands against a questionnaire graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuilderError {
    #[error("Question '{0}' not found in the questionnaire")]
    NodeNotFound(String),

    #[error("Connection '{0}' not found in the questionnaire")]
    EdgeNotFound(String),

    #[error("Handle '{handle}' does not name an option of question '{node_id}'")]
    UnknownHandle { node_id: String, handle: String },

    #[error("Handle '{handle}' cannot be used on a '{question_type}' question ('{node_id}')")]
    HandleNotAllowed {
        node_id: String,
        handle: String,
        question_type: String,
    },
}

/// Errors from the key/value persistence layer.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failed for key '{key}': {message}")]
    Io { key: String, message: String },

    #[error("Could not serialize value for key '{key}': {message}")]
    Serialization { key: String, message: String },
}

/// Input that was rejected before any state changed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Questionnaire name is required")]
    MissingName,

    #[error("Add at least one question before saving")]
    EmptyQuestionnaire,

    #[error("A respondent name is required")]
    MissingUserName,

    #[error("The questionnaire has already been submitted")]
    AlreadySubmitted,

    #[error("Question '{0}' is not part of this questionnaire")]
    UnknownQuestion(String),
}

/// Failures of the transport that delivers submissions and drafts.
#[derive(Error, Debug, Clone)]
pub enum TransportError {
    #[error("Unable to connect to server: {0}")]
    Connection(String),

    #[error("Server error: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Could not decode server response: {0}")]
    Decode(String),
}

/// Errors returned when finalizing an assessment.
#[derive(Error, Debug, Clone)]
pub enum SubmissionError {
    #[error("Please answer all required questions. {} required questions remaining.", unanswered.len())]
    Incomplete { unanswered: Vec<String> },

    #[error(transparent)]
    Rejected(#[from] ValidationError),

    #[error("Submission failed, progress was kept as a draft: {0}")]
    Transport(#[from] TransportError),
}

/// Errors loading engine configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Invalid configuration: {0}")]
    Parse(String),
}

/// Errors from the local template library.
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
