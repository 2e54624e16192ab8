//! Delivery of submissions and drafts to the assessment backend.

use crate::error::TransportError;
use crate::storage::Draft;
use crate::submission::Submission;
use serde::{Deserialize, Serialize};

pub mod api;
#[cfg(feature = "http")]
mod http;

pub use api::{Endpoint, Method};
#[cfg(feature = "http")]
pub use http::{ApiClient, ApiClientConfig, AssessmentStatus, RegisteredUser};

/// What the backend returns for an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Receipt {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// The seam between the flow engine and whatever carries records off the device.
pub trait SubmissionTransport {
    fn submit(&mut self, submission: &Submission) -> Result<Receipt, TransportError>;

    /// Mirrors a draft remotely. Local drafts are authoritative, so the
    /// default does nothing.
    fn push_draft(&mut self, _draft: &Draft) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Keeps everything it is given in memory. Can be switched to fail.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    submissions: Vec<Submission>,
    drafts: Vec<Draft>,
    failure: Option<TransportError>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every following call fails with `error` until `recover` is called.
    pub fn fail_with(&mut self, error: TransportError) {
        self.failure = Some(error);
    }

    pub fn recover(&mut self) {
        self.failure = None;
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn drafts(&self) -> &[Draft] {
        &self.drafts
    }
}

impl SubmissionTransport for RecordingTransport {
    fn submit(&mut self, submission: &Submission) -> Result<Receipt, TransportError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        self.submissions.push(submission.clone());
        Ok(Receipt {
            id: Some(format!("submission-{}", self.submissions.len())),
            message: Some("Submission received".to_string()),
        })
    }

    fn push_draft(&mut self, draft: &Draft) -> Result<(), TransportError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        self.drafts.push(draft.clone());
        Ok(())
    }
}
