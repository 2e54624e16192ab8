use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the node every respondent sees first.
pub const ROOT_NODE_ID: &str = "1";

pub const ANY_TEXT_LABEL: &str = "Any Text";
pub const ANY_TWO_OR_MORE_LABEL: &str = "Any 2+ Selected";
pub const ALL_SELECTED_LABEL: &str = "All Selected";
pub const YES_LABEL: &str = "Yes";
pub const NO_LABEL: &str = "No";

/// Editor layout coordinates. Carried only so exports stay lossless.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// The shape of a question. Only choice kinds carry options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "questionType", rename_all = "kebab-case")]
pub enum QuestionKind {
    MultipleChoice { options: Vec<String> },
    Radio { options: Vec<String> },
    Checkbox { options: Vec<String> },
    YesNo,
    TextInput,
}

impl QuestionKind {
    /// The option labels a respondent can pick from. Empty for text input.
    pub fn options(&self) -> Vec<String> {
        match self {
            QuestionKind::MultipleChoice { options }
            | QuestionKind::Radio { options }
            | QuestionKind::Checkbox { options } => options.clone(),
            QuestionKind::YesNo => vec![YES_LABEL.to_string(), NO_LABEL.to_string()],
            QuestionKind::TextInput => Vec::new(),
        }
    }

    pub fn option_count(&self) -> usize {
        match self {
            QuestionKind::MultipleChoice { options }
            | QuestionKind::Radio { options }
            | QuestionKind::Checkbox { options } => options.len(),
            QuestionKind::YesNo => 2,
            QuestionKind::TextInput => 0,
        }
    }

    /// The wire name used by the editor (`questionType`).
    pub fn type_name(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice { .. } => "multiple-choice",
            QuestionKind::Radio { .. } => "radio",
            QuestionKind::Checkbox { .. } => "checkbox",
            QuestionKind::YesNo => "yes-no",
            QuestionKind::TextInput => "text-input",
        }
    }

    /// Builds a kind from its wire name. Returns `None` for unknown names.
    pub fn from_type_name(name: &str, options: Vec<String>) -> Option<Self> {
        match name {
            "multiple-choice" => Some(QuestionKind::MultipleChoice { options }),
            "radio" => Some(QuestionKind::Radio { options }),
            "checkbox" => Some(QuestionKind::Checkbox { options }),
            "yes-no" => Some(QuestionKind::YesNo),
            "text-input" => Some(QuestionKind::TextInput),
            _ => None,
        }
    }

    /// True for the kinds answered with a single selected label.
    pub fn is_single_choice(&self) -> bool {
        matches!(
            self,
            QuestionKind::MultipleChoice { .. } | QuestionKind::Radio { .. } | QuestionKind::YesNo
        )
    }
}

/// A single question in the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionNode {
    pub id: String,
    pub question: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
    #[serde(default, alias = "isRequired")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl QuestionNode {
    pub fn new(id: impl Into<String>, question: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            kind,
            required: false,
            position: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// The label under which an edge fires.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Condition {
    /// An option text (including `Yes` / `No`) that must be the answer.
    Choice(String),
    /// Any non-blank text answer.
    AnyText,
    /// Two or more checkbox options selected.
    AnyTwoOrMore,
    /// Every checkbox option selected.
    AllSelected,
}

impl Condition {
    pub fn label(&self) -> &str {
        match self {
            Condition::Choice(label) => label,
            Condition::AnyText => ANY_TEXT_LABEL,
            Condition::AnyTwoOrMore => ANY_TWO_OR_MORE_LABEL,
            Condition::AllSelected => ALL_SELECTED_LABEL,
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label {
            ANY_TEXT_LABEL => Condition::AnyText,
            ANY_TWO_OR_MORE_LABEL => Condition::AnyTwoOrMore,
            ALL_SELECTED_LABEL => Condition::AllSelected,
            other => Condition::Choice(other.to_string()),
        }
    }
}

impl From<String> for Condition {
    fn from(label: String) -> Self {
        Condition::from_label(&label)
    }
}

impl From<Condition> for String {
    fn from(condition: Condition) -> Self {
        condition.label().to_string()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A directed conditional transition between two questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    pub condition: Condition,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        condition: Condition,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            condition,
        }
    }

    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.source_handle = Some(handle.into());
        self
    }
}

/// Lifecycle of a questionnaire template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QuestionnaireStatus {
    #[default]
    #[serde(rename = "In Progress")]
    Draft,
    #[serde(rename = "Completed")]
    Completed,
}

impl fmt::Display for QuestionnaireStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionnaireStatus::Draft => write!(f, "In Progress"),
            QuestionnaireStatus::Completed => write!(f, "Completed"),
        }
    }
}

/// The aggregate: a named set of questions and the edges between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Questionnaire {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub nodes: Vec<QuestionNode>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub status: QuestionnaireStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Questionnaire {
    pub fn new(id: impl Into<String>, name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            status: QuestionnaireStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_graph(mut self, nodes: Vec<QuestionNode>, edges: Vec<Edge>) -> Self {
        self.nodes = nodes;
        self.edges = edges;
        self
    }

    pub fn node(&self, id: &str) -> Option<&QuestionNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn outgoing<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.source == id)
    }
}
