use crate::questionnaire::{Edge, QuestionNode, Questionnaire};
use ahash::AHashMap;
use itertools::Itertools;

/// Adjacency index over a questionnaire, built once and queried per answer event.
///
/// Nodes are indexed by id; outgoing edges keep their declaration order so
/// traversal order is stable.
pub struct FlowGraph<'a> {
    root: String,
    nodes: AHashMap<&'a str, &'a QuestionNode>,
    outgoing: AHashMap<&'a str, Vec<&'a Edge>>,
}

impl<'a> FlowGraph<'a> {
    pub fn new(questionnaire: &'a Questionnaire, root: impl Into<String>) -> Self {
        let mut nodes = AHashMap::with_capacity(questionnaire.nodes.len());
        for node in &questionnaire.nodes {
            // First definition wins on duplicate ids.
            nodes.entry(node.id.as_str()).or_insert(node);
        }

        let mut outgoing: AHashMap<&'a str, Vec<&'a Edge>> = AHashMap::new();
        for edge in &questionnaire.edges {
            outgoing.entry(edge.source.as_str()).or_default().push(edge);
        }

        Self {
            root: root.into(),
            nodes,
            outgoing,
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn node(&self, id: &str) -> Option<&'a QuestionNode> {
        self.nodes.get(id).copied()
    }

    pub fn outgoing(&self, id: &str) -> &[&'a Edge] {
        self.outgoing.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// One source question and where each of its conditions leads.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionSummary {
    pub source_id: String,
    pub question: String,
    /// `(condition label, [(target id, target question)])`, in first-seen order.
    pub branches: Vec<(String, Vec<(String, String)>)>,
}

/// Groups edges by source question and condition label, the way the editor's
/// connection panel lists them. Edges from unknown sources are left out and
/// unknown targets are shown as `Unknown`.
pub fn connection_summary(questionnaire: &Questionnaire) -> Vec<ConnectionSummary> {
    let grouped = questionnaire
        .edges
        .iter()
        .filter_map(|edge| questionnaire.node(&edge.source).map(|source| (source, edge)))
        .into_group_map_by(|(source, _)| source.id.clone());

    questionnaire
        .nodes
        .iter()
        .filter_map(|node| grouped.get(&node.id).map(|edges| (node, edges)))
        .map(|(node, edges)| {
            let mut branches: Vec<(String, Vec<(String, String)>)> = Vec::new();
            for (_, edge) in edges {
                let label = edge.condition.label().to_string();
                let target = (
                    edge.target.clone(),
                    questionnaire
                        .node(&edge.target)
                        .map(|t| t.question.clone())
                        .unwrap_or_else(|| "Unknown".to_string()),
                );
                match branches.iter_mut().find(|(l, _)| *l == label) {
                    Some((_, targets)) => targets.push(target),
                    None => branches.push((label, vec![target])),
                }
            }
            ConnectionSummary {
                source_id: node.id.clone(),
                question: node.question.clone(),
                branches,
            }
        })
        .collect()
}
