use super::definition::{Condition, Edge, QuestionKind, QuestionNode};
use crate::builder::handles::{SourceHandle, resolve_condition};
use crate::error::ImportError;
use crate::ui::{QUESTION_NODE_TYPE, UiEdge, UiEdgeData, UiFlow, UiNode, UiNodeData};
use ahash::AHashMap;
use tracing::warn;

/// The `{ nodes, edges }` pair shared by export files and questionnaire aggregates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuestionGraph {
    pub nodes: Vec<QuestionNode>,
    pub edges: Vec<Edge>,
}

/// A trait for custom data models that can be converted into a `QuestionGraph`.
///
/// This is the extension point for reading questionnaires authored in other
/// tools. The visual editor's own format (`UiFlow`) implements it.
///
/// # Example
///
/// ```rust
/// use shitsumon::prelude::*;
/// use shitsumon::error::ImportError;
///
/// struct Checklist { items: Vec<String> }
///
/// impl IntoQuestionGraph for Checklist {
///     fn into_graph(self) -> Result<QuestionGraph, ImportError> {
///         let nodes = self
///             .items
///             .into_iter()
///             .enumerate()
///             .map(|(i, text)| QuestionNode::new((i + 1).to_string(), text, QuestionKind::YesNo))
///             .collect();
///         Ok(QuestionGraph { nodes, edges: vec![] })
///     }
/// }
/// ```
pub trait IntoQuestionGraph {
    /// Consumes the object and converts it into a question graph.
    fn into_graph(self) -> Result<QuestionGraph, ImportError>;
}

impl IntoQuestionGraph for UiFlow {
    fn into_graph(self) -> Result<QuestionGraph, ImportError> {
        let (Some(ui_nodes), Some(ui_edges)) = (self.nodes, self.edges) else {
            return Err(ImportError::MissingGraph);
        };

        let nodes: Vec<QuestionNode> = ui_nodes.into_iter().filter_map(convert_node).collect();
        let by_id: AHashMap<&str, &QuestionNode> =
            nodes.iter().map(|n| (n.id.as_str(), n)).collect();

        let edges = ui_edges
            .into_iter()
            .map(|raw| convert_edge(raw, &by_id))
            .collect();

        Ok(QuestionGraph { nodes, edges })
    }
}

fn convert_node(raw: UiNode) -> Option<QuestionNode> {
    if let Some(node_type) = raw.node_type.as_deref() {
        if node_type != QUESTION_NODE_TYPE {
            // Section headers and other decorations are not questions.
            return None;
        }
    }
    let type_name = raw.data.question_type.as_deref().unwrap_or("text-input");
    let kind = QuestionKind::from_type_name(type_name, raw.data.options).unwrap_or_else(|| {
        warn!(
            node_id = %raw.id,
            question_type = type_name,
            "unknown question type, treating as text input"
        );
        QuestionKind::TextInput
    });
    Some(QuestionNode {
        id: raw.id,
        question: raw.data.question,
        kind,
        required: raw.data.is_required,
        position: raw.position,
    })
}

fn convert_edge(raw: UiEdge, nodes: &AHashMap<&str, &QuestionNode>) -> Edge {
    let handle = raw.source_handle.or(raw.data.source_handle);
    let source = nodes.get(raw.source.as_str());

    let label = raw
        .data
        .option_text
        .or(raw.label)
        .filter(|label| !label.trim().is_empty());
    let option_handle = matches!(
        handle.as_deref().and_then(SourceHandle::parse),
        Some(SourceHandle::Option(_))
    );
    let condition = match (label, source) {
        // an option's text is literal even when it reads like an aggregate label
        (Some(label), _) if option_handle => Condition::Choice(label),
        (Some(label), _) => Condition::from_label(&label),
        (None, Some(node)) => resolve_condition(node, handle.as_deref())
            .unwrap_or_else(|_| Condition::Choice("Default".to_string())),
        (None, None) => match handle.as_deref().and_then(SourceHandle::parse) {
            Some(SourceHandle::Yes) => Condition::Choice("Yes".to_string()),
            Some(SourceHandle::No) => Condition::Choice("No".to_string()),
            _ => Condition::Choice("Default".to_string()),
        },
    };

    let id = if raw.id.is_empty() {
        format!(
            "{}-{}-{}",
            raw.source,
            raw.target,
            handle.as_deref().unwrap_or("default")
        )
    } else {
        raw.id
    };

    Edge {
        id,
        source: raw.source,
        target: raw.target,
        source_handle: handle,
        condition,
    }
}

impl From<&QuestionGraph> for UiFlow {
    fn from(graph: &QuestionGraph) -> Self {
        let kinds: AHashMap<&str, &'static str> = graph
            .nodes
            .iter()
            .map(|n| (n.id.as_str(), n.kind.type_name()))
            .collect();

        let nodes = graph
            .nodes
            .iter()
            .map(|node| UiNode {
                id: node.id.clone(),
                node_type: Some(QUESTION_NODE_TYPE.to_string()),
                position: node.position,
                data: UiNodeData {
                    question: node.question.clone(),
                    question_type: Some(node.kind.type_name().to_string()),
                    options: match node.kind {
                        QuestionKind::YesNo | QuestionKind::TextInput => Vec::new(),
                        _ => node.kind.options(),
                    },
                    is_required: node.required,
                },
            })
            .collect();

        let edges = graph
            .edges
            .iter()
            .map(|edge| UiEdge {
                id: edge.id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
                source_handle: edge.source_handle.clone(),
                label: Some(edge.condition.label().to_string()),
                data: UiEdgeData {
                    option_text: Some(edge.condition.label().to_string()),
                    source_handle: edge.source_handle.clone(),
                    condition: kinds.get(edge.source.as_str()).map(|k| k.to_string()),
                },
            })
            .collect();

        UiFlow {
            nodes: Some(nodes),
            edges: Some(edges),
        }
    }
}
