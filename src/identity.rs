use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// The respondent an assessment belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    /// Backend identifier, once the user is registered.
    #[serde(default, rename = "userId", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "userName")]
    pub name: String,
    #[serde(default, rename = "userEmail", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserIdentity {
    /// Creates an identity, trimming the name and rejecting blank ones.
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingUserName);
        }
        Ok(Self {
            id: None,
            name: name.to_string(),
            email: None,
        })
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_email(mut self, email: &str) -> Self {
        let email = email.trim();
        self.email = (!email.is_empty()).then(|| email.to_string());
        self
    }

    /// Stable key used to separate one respondent's drafts from another's:
    /// the backend id when known, otherwise the lower-cased name.
    pub fn storage_key(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => self.name.trim().to_lowercase(),
        }
    }
}
