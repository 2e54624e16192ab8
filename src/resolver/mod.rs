use crate::graph::FlowGraph;
use crate::questionnaire::{Edge, NO_LABEL, Questionnaire, ROOT_NODE_ID, YES_LABEL};
use crate::session::{Answer, AnswerStore};
use ahash::{AHashMap, AHashSet};
use serde::Serialize;
use tracing::debug;

mod predicate;

pub use predicate::edge_fires;

/// An edge that fired during resolution, with the answer that fired it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FiredEdge {
    pub edge_id: String,
    pub source: String,
    pub target: String,
    pub condition: String,
    pub answer: Answer,
}

/// The questions a respondent should currently see.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Visibility {
    /// Visible ids in depth-first pre-order from the root. Used for paging.
    ordered: Vec<String>,
    #[serde(skip)]
    members: AHashSet<String>,
    fired: Vec<FiredEdge>,
}

impl Visibility {
    pub fn ordered(&self) -> &[String] {
        &self.ordered
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.members.contains(node_id)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn fired(&self) -> &[FiredEdge] {
        &self.fired
    }

    /// Edges whose endpoints are both visible, with the label to draw.
    ///
    /// Yes/no edges saved without a label take it from their handle.
    pub fn visible_edges<'q>(&self, questionnaire: &'q Questionnaire) -> Vec<(&'q Edge, String)> {
        questionnaire
            .edges
            .iter()
            .filter(|e| self.contains(&e.source) && self.contains(&e.target))
            .map(|edge| {
                let label = match (edge.source_handle.as_deref(), edge.condition.label()) {
                    (Some("yes"), "" | "Default") => YES_LABEL,
                    (Some("no"), "" | "Default") => NO_LABEL,
                    (_, label) => label,
                };
                (edge, label.to_string())
            })
            .collect()
    }

    fn insert(&mut self, node_id: &str) -> bool {
        if self.members.insert(node_id.to_string()) {
            self.ordered.push(node_id.to_string());
            true
        } else {
            false
        }
    }
}

/// Computes which questions are reachable from the root through satisfied edges.
///
/// A resolver borrows its questionnaire and can be reused for every answer
/// event. It never mutates its inputs, so resolving the same answers twice
/// yields the same `Visibility`.
pub struct VisibilityResolver<'a> {
    graph: FlowGraph<'a>,
}

impl<'a> VisibilityResolver<'a> {
    /// Creates a resolver rooted at the default root question (`"1"`).
    pub fn new(questionnaire: &'a Questionnaire) -> Self {
        Self::with_root(questionnaire, ROOT_NODE_ID)
    }

    pub fn with_root(questionnaire: &'a Questionnaire, root: &str) -> Self {
        Self {
            graph: FlowGraph::new(questionnaire, root),
        }
    }

    pub fn resolve(&self, store: &AnswerStore) -> Visibility {
        self.resolve_answers(store.answers())
    }

    /// Walks the graph from the root. Only answered questions are expanded;
    /// every satisfied edge makes its target visible. Cycles terminate because
    /// a question is expanded at most once.
    pub fn resolve_answers(&self, answers: &AHashMap<String, Answer>) -> Visibility {
        let mut visibility = Visibility::default();
        if self.graph.node(self.graph.root()).is_none() {
            debug!(root = self.graph.root(), "root question missing, nothing is visible");
            return visibility;
        }

        let mut stack = vec![self.graph.root().to_string()];
        while let Some(node_id) = stack.pop() {
            if !visibility.insert(&node_id) {
                continue;
            }
            let Some(node) = self.graph.node(&node_id) else {
                continue;
            };
            let Some(answer) = answers.get(&node_id) else {
                continue;
            };

            let mut targets = Vec::new();
            for edge in self.graph.outgoing(&node_id) {
                if self.graph.node(&edge.target).is_none() {
                    debug!(edge = %edge.id, target = %edge.target, "skipping edge to unknown question");
                    continue;
                }
                if edge_fires(&node.kind, answer, &edge.condition) {
                    visibility.fired.push(FiredEdge {
                        edge_id: edge.id.clone(),
                        source: edge.source.clone(),
                        target: edge.target.clone(),
                        condition: edge.condition.label().to_string(),
                        answer: answer.clone(),
                    });
                    targets.push(edge.target.clone());
                }
            }
            // Reversed so the first declared edge is walked first.
            stack.extend(targets.into_iter().rev());
        }

        debug!(visible = ?visibility.ordered, "resolved visible questions");
        visibility
    }
}
