use tracing::debug;

use crate::form::classifier::is_input_like;
use crate::form::form_model::ContainerTier;
use crate::page::document::FormDocument;

/// Class names that commonly wrap a single question on generic form markup.
pub const FORM_GROUP_CLASSES: [&str; 4] = ["form-group", "form-field", "question", "field"];

const CONTAINER_TAGS: [&str; 3] = ["div", "section", "article"];

/// Ordered question containers of the document.
///
/// `role="listitem"` elements first; failing that, fieldsets and form-group
/// classes; failing that, any div/section/article holding an input-like
/// control as a child (or through a child `<label>`).
pub fn locate_question_containers<D: FormDocument>(doc: &D) -> Vec<D::Node> {
    locate_with_tier(doc)
        .map(|(_, containers)| containers)
        .unwrap_or_default()
}

pub fn locate_with_tier<D: FormDocument>(doc: &D) -> Option<(ContainerTier, Vec<D::Node>)> {
    let root = doc.root();

    let list_items = doc.query_all(root, |d, n| d.has_role(n, "listitem"));
    if !list_items.is_empty() {
        debug!(count = list_items.len(), "question containers from list items");
        return Some((ContainerTier::ListItem, list_items));
    }

    let groups = doc.query_all(root, is_form_group::<D>);
    if !groups.is_empty() {
        debug!(count = groups.len(), "question containers from form groups");
        return Some((ContainerTier::FormGroup, groups));
    }

    let parents = doc.query_all(root, holds_control_directly::<D>);
    if !parents.is_empty() {
        debug!(count = parents.len(), "question containers from control parents");
        return Some((ContainerTier::ControlParent, parents));
    }

    None
}

fn is_form_group<D: FormDocument>(doc: &D, node: D::Node) -> bool {
    doc.tag(node) == "fieldset" || FORM_GROUP_CLASSES.iter().any(|c| doc.has_class(node, c))
}

fn holds_control_directly<D: FormDocument>(doc: &D, node: D::Node) -> bool {
    if !CONTAINER_TAGS.contains(&doc.tag(node).as_str()) {
        return false;
    }

    doc.children(node).into_iter().any(|child| {
        is_input_like(doc, child)
            || (doc.tag(child) == "label"
                && doc.children(child).into_iter().any(|c| is_input_like(doc, c)))
    })
}
