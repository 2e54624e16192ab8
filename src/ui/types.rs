use crate::questionnaire::Position;
use serde::{Deserialize, Serialize};

pub const QUESTION_NODE_TYPE: &str = "questionNode";

/// Question payload stored under a node's `data` key by the visual editor.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct UiNodeData {
    #[serde(default)]
    pub question: String,
    #[serde(default, rename = "questionType", skip_serializing_if = "Option::is_none")]
    pub question_type: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, rename = "isRequired")]
    pub is_required: bool,
}

/// Editor node with ID, render type and data.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UiNode {
    pub id: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default)]
    pub data: UiNodeData,
}

/// Condition payload stored under an edge's `data` key.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct UiEdgeData {
    #[serde(default, rename = "optionText", skip_serializing_if = "Option::is_none")]
    pub option_text: Option<String>,
    #[serde(default, rename = "sourceHandle", skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    /// Question type of the source at the time the edge was drawn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

/// Editor edge connecting two nodes.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UiEdge {
    #[serde(default)]
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, rename = "sourceHandle", skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub data: UiEdgeData,
}

/// The exported file: `{ "nodes": [...], "edges": [...] }`.
///
/// Both keys are optional here so a missing key can be reported as
/// `ImportError::MissingGraph` instead of a generic parse failure.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct UiFlow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<UiNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<UiEdge>>,
}
