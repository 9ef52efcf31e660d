use crate::template::template_model::FieldType;

/// One question found on the live page.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionCandidate<N> {
    pub title: String,
    pub field_type: FieldType,
    pub container: N,
}

impl<N> QuestionCandidate<N> {
    /// Titled and of a known type, i.e. eligible for matching.
    pub fn is_supported(&self) -> bool {
        !self.title.is_empty() && self.field_type.is_known()
    }
}

/// A selectable choice (radio, checkbox or listbox option) with its label.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceOption<N> {
    pub node: N,
    pub label: String,
    pub checked: bool,
}

/// How a dropdown question is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownControl<N> {
    /// A native `<select>`; options are chosen by value.
    Native(N),
    /// A trigger that opens a `role="listbox"` popup when activated.
    Popup(N),
}

/// Which tier of the container search produced the questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerTier {
    ListItem,
    FormGroup,
    ControlParent,
}
