use std::fmt::Debug;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::WidgetError;

/// Notifications a host page expects after a programmatic value change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomEvent {
    Input,
    Change,
    Click,
}

/// The minimal capabilities the engine needs from a live document.
///
/// Nodes are opaque copyable handles. Everything the classifier and filler do
/// is expressed through these methods, so any host (a real browser bridge or
/// the in-memory `DomTree`) can drive the engine.
pub trait FormDocument {
    type Node: Copy + Eq + Debug;

    fn title(&self) -> String;

    fn url(&self) -> String {
        String::new()
    }

    fn root(&self) -> Self::Node;

    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Lower-case tag name.
    fn tag(&self, node: Self::Node) -> String;

    fn attribute(&self, node: Self::Node, name: &str) -> Option<String>;

    /// Concatenated text of the node and its descendants.
    fn text_content(&self, node: Self::Node) -> String;

    /// Current value of a form control.
    fn value(&self, node: Self::Node) -> Option<String>;

    fn is_visible(&self, node: Self::Node) -> bool;

    fn focus(&mut self, node: Self::Node) -> Result<(), WidgetError>;

    fn set_value(&mut self, node: Self::Node, value: &str) -> Result<(), WidgetError>;

    fn dispatch_event(&mut self, node: Self::Node, event: DomEvent) -> Result<(), WidgetError>;

    /// Activate the node the way a user click would.
    fn click(&mut self, node: Self::Node) -> Result<(), WidgetError>;

    /// Click somewhere neutral so open popups close.
    fn dismiss(&mut self) -> Result<(), WidgetError>;

    fn pause(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }

    // ------------------------------------------------------------------------
    // Provided traversal helpers
    // ------------------------------------------------------------------------

    /// All descendants in document order, excluding `node` itself.
    fn descendants(&self, node: Self::Node) -> Vec<Self::Node> {
        let mut out = Vec::new();
        let mut stack: Vec<Self::Node> = self.children(node).into_iter().rev().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).into_iter().rev());
        }
        out
    }

    fn query_all<F>(&self, scope: Self::Node, pred: F) -> Vec<Self::Node>
    where
        F: Fn(&Self, Self::Node) -> bool,
    {
        self.descendants(scope)
            .into_iter()
            .filter(|n| pred(self, *n))
            .collect()
    }

    fn query_first<F>(&self, scope: Self::Node, pred: F) -> Option<Self::Node>
    where
        F: Fn(&Self, Self::Node) -> bool,
    {
        self.descendants(scope).into_iter().find(|n| pred(self, *n))
    }

    /// Nearest ancestor-or-self satisfying `pred`.
    fn closest<F>(&self, node: Self::Node, pred: F) -> Option<Self::Node>
    where
        F: Fn(&Self, Self::Node) -> bool,
    {
        let mut current = Some(node);
        while let Some(n) = current {
            if pred(self, n) {
                return Some(n);
            }
            current = self.parent(n);
        }
        None
    }

    // ------------------------------------------------------------------------
    // Provided attribute helpers
    // ------------------------------------------------------------------------

    fn has_role(&self, node: Self::Node, role: &str) -> bool {
        self.attribute(node, "role")
            .is_some_and(|r| r.split_whitespace().any(|r| r.eq_ignore_ascii_case(role)))
    }

    fn has_class(&self, node: Self::Node, class: &str) -> bool {
        self.attribute(node, "class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class))
    }

    /// Effective `type` of an `<input>`; a missing attribute means "text".
    fn input_type(&self, node: Self::Node) -> Option<String> {
        if self.tag(node) != "input" {
            return None;
        }
        Some(
            self.attribute(node, "type")
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "text".to_string()),
        )
    }

    fn is_checked(&self, node: Self::Node) -> bool {
        if self.attribute(node, "aria-checked").as_deref() == Some("true") {
            return true;
        }
        self.tag(node) == "input" && self.attribute(node, "checked").is_some()
    }

    fn is_disabled(&self, node: Self::Node) -> bool {
        self.attribute(node, "disabled").is_some()
            || self.attribute(node, "aria-disabled").as_deref() == Some("true")
    }

    /// Human-readable name of a control or option.
    ///
    /// `aria-label`, then text content, then an enclosing or `for=` linked
    /// `<label>`, then the `value` attribute.
    fn accessible_label(&self, node: Self::Node) -> String {
        if let Some(label) = self.attribute(node, "aria-label").map(|l| l.trim().to_string()) {
            if !label.is_empty() {
                return label;
            }
        }

        let text = self.text_content(node).trim().to_string();
        if !text.is_empty() {
            return text;
        }

        if let Some(parent) = self.parent(node).filter(|p| self.tag(*p) == "label") {
            let text = self.text_content(parent).trim().to_string();
            if !text.is_empty() {
                return text;
            }
        }

        if let Some(id) = self.attribute(node, "id").filter(|id| !id.is_empty()) {
            let linked = self.query_first(self.root(), |d, n| {
                d.tag(n) == "label" && d.attribute(n, "for").as_deref() == Some(id.as_str())
            });
            if let Some(label) = linked {
                let text = self.text_content(label).trim().to_string();
                if !text.is_empty() {
                    return text;
                }
            }
        }

        self.attribute(node, "value")
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }
}
