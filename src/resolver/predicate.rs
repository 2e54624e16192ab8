use crate::questionnaire::{Condition, QuestionKind};
use crate::session::Answer;

/// Decides whether an edge labelled `condition` fires for `answer` given to a
/// question of `kind`. Answers of the wrong shape never fire.
pub fn edge_fires(kind: &QuestionKind, answer: &Answer, condition: &Condition) -> bool {
    match (kind, answer) {
        // Any label fires once there is text; editors only draw "Any Text" here.
        (QuestionKind::TextInput, Answer::Text(text)) => !text.trim().is_empty(),

        (QuestionKind::Checkbox { options }, Answer::Choices(selected)) => {
            if selected.is_empty() {
                return false;
            }
            match condition {
                Condition::Choice(label) => selected.iter().any(|s| s == label),
                Condition::AnyTwoOrMore => selected.len() >= 2,
                Condition::AllSelected => selected.len() == options.len(),
                Condition::AnyText => false,
            }
        }

        (
            QuestionKind::MultipleChoice { .. } | QuestionKind::Radio { .. } | QuestionKind::YesNo,
            Answer::Text(choice),
        ) => matches!(condition, Condition::Choice(label) if label == choice),

        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> QuestionKind {
        QuestionKind::Checkbox {
            options: vec!["A".into(), "B".into(), "C".into()],
        }
    }

    #[test]
    fn test_checkbox_aggregates() {
        let two = Answer::choices(["A", "B"]);
        assert!(edge_fires(&abc(), &two, &Condition::AnyTwoOrMore));
        assert!(!edge_fires(&abc(), &two, &Condition::AllSelected));

        let all = Answer::choices(["C", "A", "B"]);
        assert!(edge_fires(&abc(), &all, &Condition::AllSelected));

        let none = Answer::choices(Vec::<String>::new());
        assert!(!edge_fires(&abc(), &none, &Condition::AnyTwoOrMore));
        assert!(!edge_fires(&abc(), &none, &Condition::AllSelected));
    }

    #[test]
    fn test_checkbox_per_option() {
        let picked = Answer::choices(["B"]);
        assert!(edge_fires(&abc(), &picked, &Condition::Choice("B".into())));
        assert!(!edge_fires(&abc(), &picked, &Condition::Choice("A".into())));
    }

    #[test]
    fn test_single_choice_exact_match() {
        let kind = QuestionKind::Radio {
            options: vec!["Low".into(), "High".into()],
        };
        assert!(edge_fires(&kind, &Answer::text("High"), &Condition::Choice("High".into())));
        assert!(!edge_fires(&kind, &Answer::text("high"), &Condition::Choice("High".into())));
        assert!(!edge_fires(&kind, &Answer::choices(["High"]), &Condition::Choice("High".into())));
    }

    #[test]
    fn test_text_requires_non_blank() {
        let kind = QuestionKind::TextInput;
        assert!(edge_fires(&kind, &Answer::text("pain"), &Condition::AnyText));
        assert!(!edge_fires(&kind, &Answer::text("   "), &Condition::AnyText));
    }
}
