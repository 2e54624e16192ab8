use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        write!(f, "{}", name)
    }
}

/// Every REST route the assessment backend exposes to the portals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    ListQuestionnaires,
    CreateQuestionnaire,
    GetQuestionnaire(String),
    UpdateQuestionnaire(String),
    DeleteQuestionnaire(String),
    CreateSubmission,
    ListSubmissions { questionnaire_id: String },
    ListUsers,
    CreateUser,
    AssessmentStatus { user_id: String, questionnaire_id: String },
    ListDrafts,
    SaveDraft,
    QuestionnaireDrafts { questionnaire_id: String },
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::ListQuestionnaires
            | Endpoint::GetQuestionnaire(_)
            | Endpoint::ListSubmissions { .. }
            | Endpoint::ListUsers
            | Endpoint::AssessmentStatus { .. }
            | Endpoint::ListDrafts
            | Endpoint::QuestionnaireDrafts { .. } => Method::Get,
            Endpoint::CreateQuestionnaire
            | Endpoint::CreateSubmission
            | Endpoint::CreateUser
            | Endpoint::SaveDraft => Method::Post,
            Endpoint::UpdateQuestionnaire(_) => Method::Put,
            Endpoint::DeleteQuestionnaire(_) => Method::Delete,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Endpoint::ListQuestionnaires | Endpoint::CreateQuestionnaire => {
                "/api/questionnaires".to_string()
            }
            Endpoint::GetQuestionnaire(id)
            | Endpoint::UpdateQuestionnaire(id)
            | Endpoint::DeleteQuestionnaire(id) => format!("/api/questionnaires/{}", id),
            Endpoint::CreateSubmission => "/api/submissions".to_string(),
            Endpoint::ListSubmissions { questionnaire_id } => {
                format!("/api/submissions/{}", questionnaire_id)
            }
            Endpoint::ListUsers | Endpoint::CreateUser => "/api/users".to_string(),
            Endpoint::AssessmentStatus {
                user_id,
                questionnaire_id,
            } => format!("/api/users/{}/assessments/{}", user_id, questionnaire_id),
            Endpoint::ListDrafts | Endpoint::SaveDraft => "/api/drafts".to_string(),
            Endpoint::QuestionnaireDrafts { questionnaire_id } => {
                format!("/api/drafts/{}", questionnaire_id)
            }
        }
    }

    /// Joins the path onto `base`, tolerating a trailing slash on the base.
    pub fn url(&self, base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), self.path())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}
