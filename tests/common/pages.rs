use form_pilot::page::dom::{DomNode, DomTree};

// ============================================================================
// Question builders (list-item markup)
// ============================================================================

pub fn heading(text: &str) -> DomNode {
    DomNode::new("div").attr("role", "heading").text(text)
}

fn question(title: &str) -> DomNode {
    DomNode::new("div").attr("role", "listitem").child(heading(title))
}

/// A single-line question whose input carries `id`.
pub fn text_question(id: &str, title: &str, input_type: &str) -> DomNode {
    question(title).child(DomNode::new("input").attr("type", input_type).attr("id", id))
}

pub fn paragraph_question(id: &str, title: &str) -> DomNode {
    question(title).child(DomNode::new("textarea").attr("id", id))
}

/// ARIA radio group; each option's id is its label.
pub fn radio_question(title: &str, options: &[(&str, bool)]) -> DomNode {
    let group = DomNode::new("div")
        .attr("role", "radiogroup")
        .children(options.iter().map(|(label, checked)| aria_choice("radio", label, *checked)));
    question(title).child(group)
}

/// ARIA checkbox list; each option's id is its label.
pub fn checkbox_question(title: &str, options: &[(&str, bool)]) -> DomNode {
    let list = DomNode::new("div")
        .children(options.iter().map(|(label, checked)| aria_choice("checkbox", label, *checked)));
    question(title).child(list)
}

fn aria_choice(role: &str, label: &str, checked: bool) -> DomNode {
    DomNode::new("div")
        .attr("role", role)
        .attr("id", label)
        .attr("aria-label", label)
        .attr("aria-checked", if checked { "true" } else { "false" })
}

/// A popup dropdown whose trigger has id `trigger_id` and controls
/// `listbox_id`.
pub fn popup_question(trigger_id: &str, title: &str, listbox_id: &str) -> DomNode {
    question(title).child(
        DomNode::new("div")
            .attr("role", "button")
            .attr("aria-haspopup", "listbox")
            .attr("aria-expanded", "false")
            .attr("aria-controls", listbox_id)
            .attr("id", trigger_id)
            .child(DomNode::new("span").text("Choose")),
    )
}

/// A hidden listbox, optionally revealed only after `delay_ms` of page time.
pub fn listbox(id: &str, options: &[&str], delay_ms: Option<u64>) -> DomNode {
    let mut node = DomNode::new("div")
        .attr("role", "listbox")
        .attr("id", id)
        .attr("hidden", "")
        .children(options.iter().map(|o| {
            DomNode::new("div")
                .attr("role", "option")
                .attr("data-value", o)
                .child(DomNode::new("span").text(o))
        }));

    if let Some(delay) = delay_ms {
        node = node.attr("data-open-delay-ms", &delay.to_string());
    }
    node
}

pub fn native_select_question(id: &str, title: &str, options: &[(&str, &str)]) -> DomNode {
    let select = DomNode::new("select").attr("id", id).children(
        options
            .iter()
            .map(|(value, label)| DomNode::new("option").attr("value", value).text(label)),
    );
    question(title).child(select)
}

// ============================================================================
// Buttons
// ============================================================================

pub fn button(id: &str, text: &str) -> DomNode {
    DomNode::new("button").attr("type", "button").attr("id", id).text(text)
}

// ============================================================================
// Pages
// ============================================================================

/// A page whose form holds a `role="list"` of question items, followed by
/// `extra` elements at body level (popups, buttons).
pub fn form_page(title: &str, questions: Vec<DomNode>, extra: Vec<DomNode>) -> DomTree {
    let form = DomNode::new("form").child(DomNode::new("div").attr("role", "list").children(questions));
    let body = std::iter::once(form).chain(extra);
    DomTree::with_body(title, body).unwrap()
}
