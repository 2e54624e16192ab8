use super::definition::{Condition, QuestionKind, Questionnaire};
use ahash::AHashSet;
use std::fmt;

/// A structural problem in a questionnaire graph.
///
/// None of these stop a respondent from answering; the resolver skips whatever
/// it cannot follow. They are reported so an editor can surface them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralIssue {
    DuplicateNodeId(String),
    MissingRoot(String),
    DanglingSource { edge_id: String, node_id: String },
    DanglingTarget { edge_id: String, node_id: String },
    /// The edge label names no option of its source question.
    UnknownOption { edge_id: String, label: String },
    /// The edge condition cannot be produced by its source question kind.
    ConditionMismatch {
        edge_id: String,
        condition: String,
        question_type: String,
    },
}

impl fmt::Display for StructuralIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuralIssue::DuplicateNodeId(id) => write!(f, "question id '{}' is used twice", id),
            StructuralIssue::MissingRoot(id) => write!(f, "root question '{}' is missing", id),
            StructuralIssue::DanglingSource { edge_id, node_id } => {
                write!(f, "edge '{}' starts at unknown question '{}'", edge_id, node_id)
            }
            StructuralIssue::DanglingTarget { edge_id, node_id } => {
                write!(f, "edge '{}' points to unknown question '{}'", edge_id, node_id)
            }
            StructuralIssue::UnknownOption { edge_id, label } => {
                write!(f, "edge '{}' is labelled '{}', which is not an option", edge_id, label)
            }
            StructuralIssue::ConditionMismatch {
                edge_id,
                condition,
                question_type,
            } => write!(
                f,
                "edge '{}' uses '{}' on a {} question",
                edge_id, condition, question_type
            ),
        }
    }
}

impl Questionnaire {
    /// Lists structural issues, rooted at `root_id`.
    pub fn check(&self, root_id: &str) -> Vec<StructuralIssue> {
        let mut issues = Vec::new();
        let mut seen = AHashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                issues.push(StructuralIssue::DuplicateNodeId(node.id.clone()));
            }
        }
        if !self.nodes.is_empty() && !seen.contains(root_id) {
            issues.push(StructuralIssue::MissingRoot(root_id.to_string()));
        }

        for edge in &self.edges {
            if !seen.contains(edge.target.as_str()) {
                issues.push(StructuralIssue::DanglingTarget {
                    edge_id: edge.id.clone(),
                    node_id: edge.target.clone(),
                });
            }
            let Some(source) = self.node(&edge.source) else {
                issues.push(StructuralIssue::DanglingSource {
                    edge_id: edge.id.clone(),
                    node_id: edge.source.clone(),
                });
                continue;
            };

            let fits = match (&source.kind, &edge.condition) {
                (QuestionKind::TextInput, Condition::AnyText) => true,
                (QuestionKind::Checkbox { .. }, Condition::AnyTwoOrMore | Condition::AllSelected) => {
                    true
                }
                (QuestionKind::TextInput, _) => false,
                (_, Condition::Choice(label)) => {
                    if !source.kind.options().iter().any(|o| o == label) {
                        issues.push(StructuralIssue::UnknownOption {
                            edge_id: edge.id.clone(),
                            label: label.clone(),
                        });
                    }
                    true
                }
                _ => false,
            };
            if !fits {
                issues.push(StructuralIssue::ConditionMismatch {
                    edge_id: edge.id.clone(),
                    condition: edge.condition.label().to_string(),
                    question_type: source.kind.type_name().to_string(),
                });
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::{Edge, QuestionNode};
    use chrono::Utc;

    #[test]
    fn test_reports_dangling_and_unknown_labels() {
        let q = Questionnaire::new("q", "Check", Utc::now()).with_graph(
            vec![
                QuestionNode::new("1", "Smoker?", QuestionKind::YesNo),
                QuestionNode::new("2", "Notes", QuestionKind::TextInput),
            ],
            vec![
                Edge::new("e1", "1", "2", Condition::Choice("Maybe".into())),
                Edge::new("e2", "2", "9", Condition::AnyText),
                Edge::new("e3", "2", "1", Condition::AllSelected),
            ],
        );
        let issues = q.check("1");
        assert!(issues.contains(&StructuralIssue::UnknownOption {
            edge_id: "e1".into(),
            label: "Maybe".into()
        }));
        assert!(issues.contains(&StructuralIssue::DanglingTarget {
            edge_id: "e2".into(),
            node_id: "9".into()
        }));
        assert!(issues.iter().any(|i| matches!(i, StructuralIssue::ConditionMismatch { edge_id, .. } if edge_id == "e3")));
    }

    #[test]
    fn test_clean_graph_has_no_issues() {
        let q = Questionnaire::new("q", "Check", Utc::now()).with_graph(
            vec![
                QuestionNode::new("1", "Smoker?", QuestionKind::YesNo),
                QuestionNode::new("2", "How many?", QuestionKind::TextInput),
            ],
            vec![Edge::new("e1", "1", "2", Condition::Choice("Yes".into()))],
        );
        assert!(q.check("1").is_empty());
    }
}
