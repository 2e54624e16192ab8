use crate::questionnaire::Questionnaire;
use crate::resolver::{FiredEdge, Visibility};
use crate::session::Answer;

/// Formats resolver decisions into human-readable explanations.
pub struct TraceFormatter;

impl TraceFormatter {
    /// One line per fired edge, in walk order:
    /// `[1] Do you smoke? = "Yes"  --(Yes)-->  [2] How many per day?`
    pub fn format_route(visibility: &Visibility, questionnaire: &Questionnaire) -> String {
        if visibility.fired().is_empty() {
            return match visibility.ordered().first() {
                Some(root) => format!("Only {} is visible", Self::describe(root, questionnaire)),
                None => "No question is visible".to_string(),
            };
        }
        visibility
            .fired()
            .iter()
            .map(|fired| Self::format_edge(fired, questionnaire))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_edge(fired: &FiredEdge, questionnaire: &Questionnaire) -> String {
        format!(
            "{} = {}  --({})-->  {}",
            Self::describe(&fired.source, questionnaire),
            Self::format_answer(&fired.answer),
            fired.condition,
            Self::describe(&fired.target, questionnaire)
        )
    }

    fn describe(node_id: &str, questionnaire: &Questionnaire) -> String {
        match questionnaire.node(node_id) {
            Some(node) => format!("[{}] {}", node.id, Self::shorten(&node.question, 40)),
            None => format!("[{}]", node_id),
        }
    }

    fn format_answer(answer: &Answer) -> String {
        match answer {
            Answer::Text(text) => format!("\"{}\"", Self::shorten(text.trim(), 30)),
            Answer::Choices(values) => format!("[{}]", values.join(", ")),
        }
    }

    /// Truncates on a character boundary, appending an ellipsis.
    fn shorten(text: &str, max_chars: usize) -> String {
        if text.chars().count() <= max_chars {
            text.to_string()
        } else {
            let cut: String = text.chars().take(max_chars).collect();
            format!("{}...", cut)
        }
    }
}
