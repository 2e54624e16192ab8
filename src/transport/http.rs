use super::api::{Endpoint, Method};
use super::{Receipt, SubmissionTransport};
use crate::config::EngineConfig;
use crate::error::TransportError;
use crate::identity::UserIdentity;
use crate::questionnaire::Questionnaire;
use crate::storage::Draft;
use crate::submission::Submission;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 30,
        }
    }
}

impl From<&EngineConfig> for ApiClientConfig {
    fn from(config: &EngineConfig) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            timeout_secs: config.request_timeout_secs,
        }
    }
}

/// A respondent as the backend stores them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    #[serde(alias = "_id")]
    pub id: String,
    pub user_name: String,
    #[serde(default)]
    pub user_email: Option<String>,
}

impl RegisteredUser {
    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            id: Some(self.id.clone()),
            name: self.user_name.clone(),
            email: self.user_email.clone().filter(|e| !e.trim().is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RegisteredUserEnvelope {
    user: RegisteredUser,
}

/// Whether a user has a draft or earlier completions of a questionnaire.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssessmentStatus {
    pub has_draft: bool,
    pub has_completed: bool,
    pub completion_count: u32,
    pub draft: Option<Draft>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewUserRequest<'a> {
    user_name: &'a str,
    user_email: &'a str,
}

/// Blocking JSON client for the assessment backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ApiClientConfig,
    client: Client,
}

impl ApiClient {
    pub fn new(config: ApiClientConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TransportError::Connection(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    pub fn with_url_and_timeout(
        base_url: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, TransportError> {
        Self::new(ApiClientConfig {
            base_url: base_url.into(),
            timeout_secs,
        })
    }

    pub fn list_questionnaires(&self) -> Result<Vec<Questionnaire>, TransportError> {
        self.call(Endpoint::ListQuestionnaires, None::<&()>)
    }

    /// Returns `None` when the backend does not know the id.
    pub fn get_questionnaire(&self, id: &str) -> Result<Option<Questionnaire>, TransportError> {
        match self.call(Endpoint::GetQuestionnaire(id.to_string()), None::<&()>) {
            Ok(questionnaire) => Ok(Some(questionnaire)),
            Err(TransportError::Status { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn create_questionnaire(
        &self,
        questionnaire: &Questionnaire,
    ) -> Result<Questionnaire, TransportError> {
        self.call(Endpoint::CreateQuestionnaire, Some(questionnaire))
    }

    pub fn update_questionnaire(
        &self,
        questionnaire: &Questionnaire,
    ) -> Result<Questionnaire, TransportError> {
        self.call(
            Endpoint::UpdateQuestionnaire(questionnaire.id.clone()),
            Some(questionnaire),
        )
    }

    pub fn delete_questionnaire(&self, id: &str) -> Result<(), TransportError> {
        self.send(Endpoint::DeleteQuestionnaire(id.to_string()), None::<&()>)
            .map(|_| ())
    }

    pub fn list_submissions(&self, questionnaire_id: &str) -> Result<Vec<Submission>, TransportError> {
        self.call(
            Endpoint::ListSubmissions {
                questionnaire_id: questionnaire_id.to_string(),
            },
            None::<&()>,
        )
    }

    pub fn list_users(&self) -> Result<Vec<RegisteredUser>, TransportError> {
        self.call(Endpoint::ListUsers, None::<&()>)
    }

    pub fn register_user(&self, user: &UserIdentity) -> Result<RegisteredUser, TransportError> {
        let request = NewUserRequest {
            user_name: &user.name,
            user_email: user.email.as_deref().unwrap_or(""),
        };
        let envelope: RegisteredUserEnvelope = self.call(Endpoint::CreateUser, Some(&request))?;
        Ok(envelope.user)
    }

    pub fn assessment_status(
        &self,
        user_id: &str,
        questionnaire_id: &str,
    ) -> Result<AssessmentStatus, TransportError> {
        self.call(
            Endpoint::AssessmentStatus {
                user_id: user_id.to_string(),
                questionnaire_id: questionnaire_id.to_string(),
            },
            None::<&()>,
        )
    }

    pub fn list_drafts(&self) -> Result<Vec<Draft>, TransportError> {
        self.call(Endpoint::ListDrafts, None::<&()>)
    }

    pub fn questionnaire_drafts(&self, questionnaire_id: &str) -> Result<Vec<Draft>, TransportError> {
        self.call(
            Endpoint::QuestionnaireDrafts {
                questionnaire_id: questionnaire_id.to_string(),
            },
            None::<&()>,
        )
    }

    fn call<B, T>(&self, endpoint: Endpoint, body: Option<&B>) -> Result<T, TransportError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(endpoint, body)?;
        response
            .json()
            .map_err(|e| TransportError::Decode(format!("Failed to parse response: {}", e)))
    }

    #[instrument(skip_all, fields(endpoint = %endpoint))]
    fn send<B>(&self, endpoint: Endpoint, body: Option<&B>) -> Result<Response, TransportError>
    where
        B: Serialize + ?Sized,
    {
        let url = endpoint.url(&self.config.base_url);
        let mut request: RequestBuilder = match endpoint.method() {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().map_err(map_http_error)?;
        let status = response.status();
        debug!(%status, "backend responded");
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .unwrap_or_else(|_| format!("HTTP error: {}", status));
        Err(TransportError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

impl SubmissionTransport for ApiClient {
    fn submit(&mut self, submission: &Submission) -> Result<Receipt, TransportError> {
        let response = self.send(Endpoint::CreateSubmission, Some(submission))?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Receipt::default());
        }
        // older backends answer with an empty 200
        let text = response
            .text()
            .map_err(|e| TransportError::Decode(e.to_string()))?;
        if text.trim().is_empty() {
            return Ok(Receipt::default());
        }
        serde_json::from_str(&text).map_err(|e| TransportError::Decode(e.to_string()))
    }

    fn push_draft(&mut self, draft: &Draft) -> Result<(), TransportError> {
        self.send(Endpoint::SaveDraft, Some(draft)).map(|_| ())
    }
}

fn map_http_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Connection(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        TransportError::Connection(format!("Connection error: {}", error))
    } else {
        TransportError::Connection(format!("HTTP error: {}", error))
    }
}
