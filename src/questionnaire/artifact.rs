use super::conversion::{IntoQuestionGraph, QuestionGraph};
use super::definition::Questionnaire;
use crate::error::ImportError;
use crate::ui::UiFlow;
use std::fs;
use std::path::Path;

impl Questionnaire {
    /// The question graph of this questionnaire, detached from its metadata.
    pub fn graph(&self) -> QuestionGraph {
        QuestionGraph {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Replaces nodes and edges with an imported graph.
    pub fn replace_graph(&mut self, graph: QuestionGraph) {
        self.nodes = graph.nodes;
        self.edges = graph.edges;
    }
}

/// Serializes a graph into the editor's pretty-printed `{ nodes, edges }` document.
pub fn export_json(graph: &QuestionGraph) -> Result<String, ImportError> {
    serde_json::to_string_pretty(&UiFlow::from(graph))
        .map_err(|e| ImportError::JsonParseError(e.to_string()))
}

/// Parses an editor `{ nodes, edges }` document.
pub fn import_json(json: &str) -> Result<QuestionGraph, ImportError> {
    let flow: UiFlow =
        serde_json::from_str(json).map_err(|e| ImportError::JsonParseError(e.to_string()))?;
    flow.into_graph()
}

/// Writes an export document to `path`.
pub fn save_to_file(graph: &QuestionGraph, path: impl AsRef<Path>) -> Result<(), ImportError> {
    let path = path.as_ref();
    let json = export_json(graph)?;
    fs::write(path, json).map_err(|e| ImportError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Reads an export document from `path`.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<QuestionGraph, ImportError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|e| ImportError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    import_json(&json)
}
