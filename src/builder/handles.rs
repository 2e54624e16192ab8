use crate::error::BuilderError;
use crate::questionnaire::{Condition, QuestionKind, QuestionNode};

/// A named connection point on a question node in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceHandle {
    /// `option-<n>`: the n-th option of a choice question.
    Option(usize),
    /// `multi-2plus`
    AnyTwoOrMore,
    /// `multi-all`
    AllSelected,
    /// `yes`
    Yes,
    /// `no`
    No,
    /// `text-output`
    TextOutput,
}

impl SourceHandle {
    pub fn parse(handle: &str) -> Option<Self> {
        match handle {
            "multi-2plus" => Some(SourceHandle::AnyTwoOrMore),
            "multi-all" => Some(SourceHandle::AllSelected),
            "yes" => Some(SourceHandle::Yes),
            "no" => Some(SourceHandle::No),
            "text-output" => Some(SourceHandle::TextOutput),
            other => other
                .strip_prefix("option-")
                .and_then(|idx| idx.parse().ok())
                .map(SourceHandle::Option),
        }
    }

    pub fn name(&self) -> String {
        match self {
            SourceHandle::Option(idx) => format!("option-{}", idx),
            SourceHandle::AnyTwoOrMore => "multi-2plus".to_string(),
            SourceHandle::AllSelected => "multi-all".to_string(),
            SourceHandle::Yes => "yes".to_string(),
            SourceHandle::No => "no".to_string(),
            SourceHandle::TextOutput => "text-output".to_string(),
        }
    }
}

/// Resolves the condition an edge drawn from `handle` on `node` should carry.
///
/// Text questions accept a missing handle (their single output fires on any text).
pub fn resolve_condition(node: &QuestionNode, handle: Option<&str>) -> Result<Condition, BuilderError> {
    let unknown = || BuilderError::UnknownHandle {
        node_id: node.id.clone(),
        handle: handle.unwrap_or("default").to_string(),
    };
    let not_allowed = || BuilderError::HandleNotAllowed {
        node_id: node.id.clone(),
        handle: handle.unwrap_or("default").to_string(),
        question_type: node.kind.type_name().to_string(),
    };

    let parsed = match handle {
        None if matches!(node.kind, QuestionKind::TextInput) => return Ok(Condition::AnyText),
        None => return Err(unknown()),
        Some(raw) => SourceHandle::parse(raw).ok_or_else(unknown)?,
    };

    match (parsed, &node.kind) {
        (SourceHandle::TextOutput, QuestionKind::TextInput) => Ok(Condition::AnyText),
        (SourceHandle::AnyTwoOrMore, QuestionKind::Checkbox { .. }) => Ok(Condition::AnyTwoOrMore),
        (SourceHandle::AllSelected, QuestionKind::Checkbox { .. }) => Ok(Condition::AllSelected),
        (SourceHandle::Yes, QuestionKind::YesNo) => Ok(Condition::Choice("Yes".to_string())),
        (SourceHandle::No, QuestionKind::YesNo) => Ok(Condition::Choice("No".to_string())),
        (SourceHandle::Option(_), QuestionKind::TextInput) => Err(not_allowed()),
        (SourceHandle::Option(idx), kind) => kind
            .options()
            .into_iter()
            .nth(idx)
            .map(Condition::Choice)
            .ok_or_else(unknown),
        _ => Err(not_allowed()),
    }
}

/// Returns the label an `option-<n>` edge should show after the source's
/// options were replaced, or `None` when the edge is not an option edge or the
/// index no longer exists.
pub fn relabel_option_edge(handle: Option<&str>, new_options: &[String]) -> Option<Condition> {
    match handle.and_then(SourceHandle::parse) {
        Some(SourceHandle::Option(idx)) => new_options
            .get(idx)
            .filter(|label| !label.is_empty())
            .map(|label| Condition::Choice(label.clone())),
        _ => None,
    }
}
