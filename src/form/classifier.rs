use crate::form::form_model::{ChoiceOption, DropdownControl, QuestionCandidate};
use crate::form::locate::locate_question_containers;
use crate::page::document::FormDocument;
use crate::template::template_model::FieldType;

/// Longest text accepted as a fallback question title, in characters.
pub const DEFAULT_TITLE_MAX_CHARS: usize = 300;

const TEXT_INPUT_TYPES: [&str; 5] = ["text", "email", "tel", "url", "password"];
const TITLE_TAGS: [&str; 4] = ["div", "span", "label", "legend"];
const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

// ============================================================================
// Control predicates
// ============================================================================

pub fn is_text_input<D: FormDocument>(doc: &D, node: D::Node) -> bool {
    doc.input_type(node)
        .is_some_and(|t| TEXT_INPUT_TYPES.contains(&t.as_str()))
}

pub fn is_textarea<D: FormDocument>(doc: &D, node: D::Node) -> bool {
    doc.tag(node) == "textarea"
}

pub fn is_radio<D: FormDocument>(doc: &D, node: D::Node) -> bool {
    doc.has_role(node, "radio") || doc.input_type(node).as_deref() == Some("radio")
}

pub fn is_checkbox<D: FormDocument>(doc: &D, node: D::Node) -> bool {
    doc.has_role(node, "checkbox") || doc.input_type(node).as_deref() == Some("checkbox")
}

pub fn is_dropdown_like<D: FormDocument>(doc: &D, node: D::Node) -> bool {
    doc.attribute(node, "aria-haspopup").as_deref() == Some("listbox")
        || doc.has_role(node, "combobox")
        || doc.has_role(node, "listbox")
        || doc.tag(node) == "select"
}

/// Anything a question container is expected to hold.
pub fn is_input_like<D: FormDocument>(doc: &D, node: D::Node) -> bool {
    matches!(doc.tag(node).as_str(), "input" | "textarea" | "select")
        || doc.has_role(node, "radio")
        || doc.has_role(node, "checkbox")
}

fn is_heading<D: FormDocument>(doc: &D, node: D::Node) -> bool {
    doc.has_role(node, "heading") || HEADING_TAGS.contains(&doc.tag(node).as_str())
}

fn is_choice_role<D: FormDocument>(doc: &D, node: D::Node) -> bool {
    doc.has_role(node, "radio") || doc.has_role(node, "checkbox") || doc.has_role(node, "option")
}

// ============================================================================
// Title and type
// ============================================================================

/// Human-readable question title of a container.
///
/// A heading wins. Otherwise the first div/span/label/legend with non-empty
/// text shorter than `max_chars` that does not sit inside a choice option.
pub fn extract_title<D: FormDocument>(doc: &D, container: D::Node, max_chars: usize) -> String {
    for node in doc.descendants(container) {
        if is_heading(doc, node) {
            let text = doc.text_content(node).trim().to_string();
            if !text.is_empty() {
                return text;
            }
        }
    }

    for node in doc.descendants(container) {
        if !TITLE_TAGS.contains(&doc.tag(node).as_str()) {
            continue;
        }

        let text = doc.text_content(node).trim().to_string();
        if text.is_empty() || text.chars().count() >= max_chars {
            continue;
        }

        if doc.closest(node, is_choice_role::<D>).is_none() {
            return text;
        }
    }

    String::new()
}

/// Semantic type of the question in a container.
///
/// Checked in order: a multi-line control is authoritative over a
/// single-line one in the same container.
pub fn classify_type<D: FormDocument>(doc: &D, container: D::Node) -> FieldType {
    let has = |pred: fn(&D, D::Node) -> bool| doc.query_first(container, pred).is_some();

    if has(is_textarea::<D>) {
        FieldType::Paragraph
    } else if has(is_text_input::<D>) {
        FieldType::Text
    } else if has(|d, n| d.has_role(n, "radiogroup") || is_radio(d, n)) {
        FieldType::Radio
    } else if has(is_checkbox::<D>) {
        FieldType::Checkbox
    } else if has(is_dropdown_like::<D>) {
        FieldType::Dropdown
    } else {
        FieldType::Unknown
    }
}

pub fn classify_question<D: FormDocument>(
    doc: &D,
    container: D::Node,
    title_max_chars: usize,
) -> QuestionCandidate<D::Node> {
    QuestionCandidate {
        title: extract_title(doc, container, title_max_chars),
        field_type: classify_type(doc, container),
        container,
    }
}

/// All question candidates of the document, in document order.
pub fn discover_questions<D: FormDocument>(doc: &D, title_max_chars: usize) -> Vec<QuestionCandidate<D::Node>> {
    locate_question_containers(doc)
        .into_iter()
        .map(|container| classify_question(doc, container, title_max_chars))
        .collect()
}

// ============================================================================
// Controls and options
// ============================================================================

/// The control that receives a typed answer. Paragraph questions prefer the
/// textarea, text questions the single-line input.
pub fn text_control<D: FormDocument>(doc: &D, container: D::Node, field_type: FieldType) -> Option<D::Node> {
    let input = || doc.query_first(container, is_text_input::<D>);
    let area = || doc.query_first(container, is_textarea::<D>);

    match field_type {
        FieldType::Paragraph => area().or_else(input),
        _ => input().or_else(area),
    }
}

/// Radio or checkbox options with their labels and checked state.
///
/// ARIA role options take precedence; native inputs are used when the
/// container has none.
pub fn choice_options<D: FormDocument>(
    doc: &D,
    container: D::Node,
    field_type: FieldType,
) -> Vec<ChoiceOption<D::Node>> {
    let (role, native) = match field_type {
        FieldType::Radio => ("radio", "radio"),
        FieldType::Checkbox => ("checkbox", "checkbox"),
        _ => return Vec::new(),
    };

    let mut nodes = doc.query_all(container, |d, n| d.has_role(n, role));
    if nodes.is_empty() {
        nodes = doc.query_all(container, |d, n| d.input_type(n).as_deref() == Some(native));
    }

    nodes
        .into_iter()
        .map(|node| ChoiceOption {
            node,
            label: doc.accessible_label(node),
            checked: doc.is_checked(node),
        })
        .collect()
}

pub fn dropdown_control<D: FormDocument>(doc: &D, container: D::Node) -> Option<DropdownControl<D::Node>> {
    if let Some(select) = doc.query_first(container, |d, n| d.tag(n) == "select") {
        return Some(DropdownControl::Native(select));
    }

    doc.query_first(container, |d, n| {
        (d.has_role(n, "button") && d.attribute(n, "aria-haspopup").as_deref() == Some("listbox"))
            || d.has_role(n, "combobox")
    })
    .map(DropdownControl::Popup)
}

/// Options of a native `<select>`; the selected one is marked checked.
pub fn native_select_options<D: FormDocument>(doc: &D, select: D::Node) -> Vec<ChoiceOption<D::Node>> {
    doc.query_all(select, |d, n| d.tag(n) == "option")
        .into_iter()
        .map(|node| ChoiceOption {
            node,
            label: doc.text_content(node).trim().to_string(),
            checked: doc.attribute(node, "selected").is_some(),
        })
        .filter(|o| !o.label.is_empty())
        .collect()
}

/// Attributes through which a trigger names the popup it opens.
const POPUP_REFERENCE_ATTRS: [&str; 2] = ["aria-controls", "aria-owns"];

/// Listboxes currently shown anywhere on the page.
pub fn visible_listboxes<D: FormDocument>(doc: &D) -> Vec<D::Node> {
    doc.query_all(doc.root(), |d, n| d.has_role(n, "listbox") && d.is_visible(n))
}

/// The listbox a trigger references through `aria-controls` or `aria-owns`.
pub fn referenced_listbox<D: FormDocument>(doc: &D, trigger: D::Node) -> Option<D::Node> {
    POPUP_REFERENCE_ATTRS
        .iter()
        .filter_map(|attr| doc.attribute(trigger, attr))
        .flat_map(|ids| ids.split_whitespace().map(str::to_string).collect::<Vec<_>>())
        .find_map(|id| {
            doc.query_first(doc.root(), |d, n| {
                d.attribute(n, "id").as_deref() == Some(id.as_str()) && d.has_role(n, "listbox")
            })
        })
}

/// Options of the popup opened by `trigger`, once it shows at least one.
///
/// A listbox the trigger references is the only one considered. Without a
/// reference, the first visible listbox that was not already in
/// `open_before` (the listboxes visible before the trigger was clicked).
pub fn popup_options<D: FormDocument>(
    doc: &D,
    trigger: D::Node,
    open_before: &[D::Node],
) -> Option<Vec<ChoiceOption<D::Node>>> {
    let listboxes = match referenced_listbox(doc, trigger) {
        Some(listbox) => vec![listbox],
        None => visible_listboxes(doc)
            .into_iter()
            .filter(|l| !open_before.contains(l))
            .collect(),
    };

    listboxes
        .into_iter()
        .filter(|l| doc.is_visible(*l))
        .map(|listbox| listbox_options(doc, listbox))
        .find(|options| !options.is_empty())
}

fn listbox_options<D: FormDocument>(doc: &D, listbox: D::Node) -> Vec<ChoiceOption<D::Node>> {
    doc.query_all(listbox, |d, n| d.has_role(n, "option") && d.is_visible(n))
        .into_iter()
        .map(|node| ChoiceOption {
            node,
            label: doc.accessible_label(node),
            checked: doc.attribute(node, "aria-selected").as_deref() == Some("true"),
        })
        .collect()
}

/// The answer a dropdown currently shows.
pub fn dropdown_current_value<D: FormDocument>(doc: &D, control: DropdownControl<D::Node>) -> Option<String> {
    let value = match control {
        DropdownControl::Native(select) => native_select_options(doc, select)
            .into_iter()
            .find(|o| o.checked)
            .map(|o| o.label),
        DropdownControl::Popup(trigger) => Some(doc.accessible_label(trigger)),
    };

    value.filter(|v| !v.is_empty())
}
