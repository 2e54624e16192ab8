//! Admin-side editing of a questionnaire graph.
//!
//! The editor takes one `EditorCommand` at a time and answers with the
//! `EditorEvent` describing what changed, so a front end can mirror the graph
//! without sharing mutable state with it.

pub mod handles;

pub use handles::{SourceHandle, relabel_option_edge, resolve_condition};

use crate::error::BuilderError;
use crate::questionnaire::{Condition, Edge, Position, QuestionGraph, QuestionKind, QuestionNode};
use tracing::debug;

/// The content of a question before it has an id.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionDraft {
    pub question: String,
    pub kind: QuestionKind,
    pub required: bool,
    pub position: Option<Position>,
}

impl QuestionDraft {
    pub fn new(question: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
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

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Position { x, y });
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    AddQuestion(QuestionDraft),
    UpdateQuestion {
        id: String,
        question: String,
        kind: QuestionKind,
        required: bool,
    },
    DeleteQuestion(String),
    Connect {
        source: String,
        target: String,
        source_handle: Option<String>,
    },
    Reconnect {
        edge_id: String,
        source: String,
        target: String,
        source_handle: Option<String>,
    },
    Disconnect(String),
    Clear,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    QuestionAdded(String),
    QuestionUpdated { id: String, relabelled_edges: usize },
    QuestionDeleted { id: String, removed_edges: Vec<String> },
    Connected(Edge),
    Reconnected(Edge),
    Disconnected(String),
    Cleared,
}

/// Applies editor commands to a graph, keeping ids unique.
#[derive(Debug, Clone)]
pub struct QuestionnaireEditor {
    graph: QuestionGraph,
    next_node_id: u64,
    next_edge_seq: u64,
}

impl QuestionnaireEditor {
    pub fn new() -> Self {
        Self::from_graph(QuestionGraph::default())
    }

    /// Continues editing an imported graph. New questions are numbered after
    /// the highest numeric id already present.
    pub fn from_graph(graph: QuestionGraph) -> Self {
        let highest = graph
            .nodes
            .iter()
            .filter_map(|n| n.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        let next_edge_seq = graph.edges.len() as u64 + 1;
        Self {
            graph,
            next_node_id: highest + 1,
            next_edge_seq,
        }
    }

    pub fn graph(&self) -> &QuestionGraph {
        &self.graph
    }

    pub fn into_graph(self) -> QuestionGraph {
        self.graph
    }

    pub fn apply(&mut self, command: EditorCommand) -> Result<EditorEvent, BuilderError> {
        debug!(?command, "applying editor command");
        match command {
            EditorCommand::AddQuestion(draft) => Ok(self.add_question(draft)),
            EditorCommand::UpdateQuestion {
                id,
                question,
                kind,
                required,
            } => self.update_question(id, question, kind, required),
            EditorCommand::DeleteQuestion(id) => self.delete_question(id),
            EditorCommand::Connect {
                source,
                target,
                source_handle,
            } => self.connect(source, target, source_handle),
            EditorCommand::Reconnect {
                edge_id,
                source,
                target,
                source_handle,
            } => self.reconnect(edge_id, source, target, source_handle),
            EditorCommand::Disconnect(edge_id) => {
                let before = self.graph.edges.len();
                self.graph.edges.retain(|e| e.id != edge_id);
                if self.graph.edges.len() == before {
                    return Err(BuilderError::EdgeNotFound(edge_id));
                }
                Ok(EditorEvent::Disconnected(edge_id))
            }
            EditorCommand::Clear => {
                self.graph = QuestionGraph::default();
                self.next_node_id = 1;
                self.next_edge_seq = 1;
                Ok(EditorEvent::Cleared)
            }
        }
    }

    fn add_question(&mut self, draft: QuestionDraft) -> EditorEvent {
        let id = self.next_node_id.to_string();
        self.next_node_id += 1;
        // new questions cascade down the canvas unless placed explicitly
        let offset = self.graph.nodes.len() as f64;
        let position = draft.position.unwrap_or(Position {
            x: 250.0,
            y: 100.0 + offset * 150.0,
        });
        self.graph.nodes.push(QuestionNode {
            id: id.clone(),
            question: draft.question,
            kind: draft.kind,
            required: draft.required,
            position: Some(position),
        });
        EditorEvent::QuestionAdded(id)
    }

    fn update_question(
        &mut self,
        id: String,
        question: String,
        kind: QuestionKind,
        required: bool,
    ) -> Result<EditorEvent, BuilderError> {
        let node = self
            .graph
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| BuilderError::NodeNotFound(id.clone()))?;

        let options_changed = node.kind.options() != kind.options();
        node.question = question;
        node.kind = kind;
        node.required = required;

        let mut relabelled_edges = 0;
        if options_changed {
            let options = node.kind.options();
            for edge in self.graph.edges.iter_mut().filter(|e| e.source == id) {
                let Some(condition) = relabel_option_edge(edge.source_handle.as_deref(), &options)
                else {
                    continue;
                };
                if condition != edge.condition {
                    edge.condition = condition;
                    relabelled_edges += 1;
                }
            }
        }
        Ok(EditorEvent::QuestionUpdated {
            id,
            relabelled_edges,
        })
    }

    fn delete_question(&mut self, id: String) -> Result<EditorEvent, BuilderError> {
        let before = self.graph.nodes.len();
        self.graph.nodes.retain(|n| n.id != id);
        if self.graph.nodes.len() == before {
            return Err(BuilderError::NodeNotFound(id));
        }
        let (removed, kept): (Vec<Edge>, Vec<Edge>) = std::mem::take(&mut self.graph.edges)
            .into_iter()
            .partition(|e| e.source == id || e.target == id);
        self.graph.edges = kept;
        Ok(EditorEvent::QuestionDeleted {
            id,
            removed_edges: removed.into_iter().map(|e| e.id).collect(),
        })
    }

    fn connect(
        &mut self,
        source: String,
        target: String,
        source_handle: Option<String>,
    ) -> Result<EditorEvent, BuilderError> {
        let condition = self.condition_for(&source, &target, source_handle.as_deref())?;
        let id = self.edge_id(&source, &target, source_handle.as_deref());
        let mut edge = Edge::new(id, source, target, condition);
        edge.source_handle = source_handle;
        self.graph.edges.push(edge.clone());
        Ok(EditorEvent::Connected(edge))
    }

    fn reconnect(
        &mut self,
        edge_id: String,
        source: String,
        target: String,
        source_handle: Option<String>,
    ) -> Result<EditorEvent, BuilderError> {
        let condition = self.condition_for(&source, &target, source_handle.as_deref())?;
        let edge = self
            .graph
            .edges
            .iter_mut()
            .find(|e| e.id == edge_id)
            .ok_or_else(|| BuilderError::EdgeNotFound(edge_id.clone()))?;
        edge.source = source;
        edge.target = target;
        edge.source_handle = source_handle;
        edge.condition = condition;
        Ok(EditorEvent::Reconnected(edge.clone()))
    }

    fn condition_for(
        &self,
        source: &str,
        target: &str,
        handle: Option<&str>,
    ) -> Result<Condition, BuilderError> {
        let source_node = self
            .node(source)
            .ok_or_else(|| BuilderError::NodeNotFound(source.to_string()))?;
        if self.node(target).is_none() {
            return Err(BuilderError::NodeNotFound(target.to_string()));
        }
        resolve_condition(source_node, handle)
    }

    fn edge_id(&mut self, source: &str, target: &str, handle: Option<&str>) -> String {
        loop {
            let id = format!(
                "{}-{}-{}-{}",
                source,
                target,
                handle.unwrap_or("default"),
                self.next_edge_seq
            );
            self.next_edge_seq += 1;
            if !self.graph.edges.iter().any(|e| e.id == id) {
                return id;
            }
        }
    }

    fn node(&self, id: &str) -> Option<&QuestionNode> {
        self.graph.nodes.iter().find(|n| n.id == id)
    }
}

impl Default for QuestionnaireEditor {
    fn default() -> Self {
        Self::new()
    }
}
