use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PilotError, WidgetError};
use crate::page::document::{DomEvent, FormDocument};

// ============================================================================
// Snapshot wire format
// ============================================================================

/// A serialized element, as found in page snapshot JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomNode {
    pub tag: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DomNode>,
}

impl DomNode {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: BTreeMap::new(),
            text: None,
            value: None,
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    pub fn child(mut self, child: DomNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = DomNode>) -> Self {
        self.children.extend(children);
        self
    }
}

/// A whole page: title, address and element tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    pub root: DomNode,
}

// ============================================================================
// Arena-backed document
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct NodeData {
    tag: String,
    attrs: BTreeMap<String, String>,
    text: Option<String>,
    value: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// One event observed on a node, in dispatch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRecord {
    pub node: NodeId,
    pub event: DomEvent,
}

/// In-memory document with simulated widget behaviour.
///
/// Clicks toggle checkboxes, select radios and options, and open listbox
/// popups referenced through `aria-controls` or `aria-owns`. A listbox carrying
/// `data-open-delay-ms` becomes visible only after that much virtual time has
/// passed through `pause`, which never sleeps.
#[derive(Debug, Clone)]
pub struct DomTree {
    title: String,
    url: String,
    nodes: Vec<NodeData>,
    events: Vec<EventRecord>,
    focused: Option<NodeId>,
    clock_ms: u64,
    pending_popups: Vec<(u64, NodeId)>,
}

impl DomTree {
    pub fn from_snapshot(snapshot: PageSnapshot) -> Result<Self, PilotError> {
        if snapshot.root.tag.trim().is_empty() {
            return Err(PilotError::InvalidPage("root element has no tag".into()));
        }

        let mut tree = DomTree {
            title: snapshot.title,
            url: snapshot.url,
            nodes: Vec::new(),
            events: Vec::new(),
            focused: None,
            clock_ms: 0,
            pending_popups: Vec::new(),
        };
        tree.push_node(snapshot.root, None)?;
        Ok(tree)
    }

    pub fn from_json(json: &str) -> Result<Self, PilotError> {
        let snapshot: PageSnapshot =
            serde_json::from_str(json).map_err(|e| PilotError::json("page snapshot", e))?;
        Self::from_snapshot(snapshot)
    }

    pub fn load(path: &Path) -> Result<Self, PilotError> {
        let content = std::fs::read_to_string(path).map_err(|e| PilotError::io(path, e))?;
        Self::from_json(&content)
    }

    /// Build a page whose body holds the given elements.
    pub fn with_body(title: &str, body: impl IntoIterator<Item = DomNode>) -> Result<Self, PilotError> {
        Self::from_snapshot(PageSnapshot {
            title: title.to_string(),
            url: String::new(),
            root: DomNode::new("body").children(body),
        })
    }

    fn push_node(&mut self, node: DomNode, parent: Option<NodeId>) -> Result<NodeId, PilotError> {
        if node.tag.trim().is_empty() {
            return Err(PilotError::InvalidPage("element without a tag".into()));
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            tag: node.tag.trim().to_lowercase(),
            attrs: node.attrs,
            text: node.text,
            value: node.value,
            parent,
            children: Vec::new(),
        });

        for child in node.children {
            let child_id = self.push_node(child, Some(id))?;
            self.nodes[id.0].children.push(child_id);
        }

        Ok(id)
    }

    pub fn to_snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            title: self.title.clone(),
            url: self.url.clone(),
            root: self.export(NodeId(0)),
        }
    }

    fn export(&self, id: NodeId) -> DomNode {
        let data = &self.nodes[id.0];
        DomNode {
            tag: data.tag.clone(),
            attrs: data.attrs.clone(),
            text: data.text.clone(),
            value: data.value.clone(),
            children: data.children.iter().map(|c| self.export(*c)).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, PilotError> {
        serde_json::to_string_pretty(&self.to_snapshot())
            .map_err(|e| PilotError::json("serialize page snapshot", e))
    }

    /// First element whose `id` attribute equals `id`.
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.attrs.get("id").map(String::as_str) == Some(id))
            .map(NodeId)
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn events_for(&self, node: NodeId) -> Vec<DomEvent> {
        self.events
            .iter()
            .filter(|r| r.node == node)
            .map(|r| r.event)
            .collect()
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    fn data(&self, node: NodeId) -> &NodeData {
        &self.nodes[node.0]
    }

    fn data_mut(&mut self, node: NodeId) -> &mut NodeData {
        &mut self.nodes[node.0]
    }

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        self.data_mut(node).attrs.insert(name.to_string(), value.to_string());
    }

    fn remove_attr(&mut self, node: NodeId, name: &str) {
        self.data_mut(node).attrs.remove(name);
    }

    fn all_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    // ------------------------------------------------------------------------
    // Simulated activation behaviour
    // ------------------------------------------------------------------------

    fn select_aria_radio(&mut self, node: NodeId) {
        let group = self
            .closest(node, |d, n| d.has_role(n, "radiogroup"))
            .or_else(|| self.parent(node));

        if let Some(group) = group {
            for other in self.query_all(group, |d, n| d.has_role(n, "radio")) {
                self.set_attr(other, "aria-checked", "false");
            }
        }
        self.set_attr(node, "aria-checked", "true");
    }

    fn select_native_radio(&mut self, node: NodeId) {
        let name = self.attribute(node, "name");
        let peers: Vec<NodeId> = match &name {
            Some(name) => self
                .all_nodes()
                .filter(|n| {
                    self.input_type(*n).as_deref() == Some("radio")
                        && self.attribute(*n, "name").as_deref() == Some(name.as_str())
                })
                .collect(),
            None => self
                .parent(node)
                .map(|p| {
                    self.query_all(p, |d, n| d.input_type(n).as_deref() == Some("radio"))
                })
                .unwrap_or_default(),
        };

        for peer in peers {
            self.remove_attr(peer, "checked");
        }
        self.set_attr(node, "checked", "");
    }

    fn toggle_aria_checkbox(&mut self, node: NodeId) {
        let next = if self.is_checked(node) { "false" } else { "true" };
        self.set_attr(node, "aria-checked", next);
    }

    fn toggle_native_checkbox(&mut self, node: NodeId) {
        if self.attribute(node, "checked").is_some() {
            self.remove_attr(node, "checked");
        } else {
            self.set_attr(node, "checked", "");
        }
    }

    /// Ids named by a trigger's `aria-controls` / `aria-owns`.
    fn popup_refs(&self, trigger: NodeId) -> Vec<String> {
        ["aria-controls", "aria-owns"]
            .iter()
            .filter_map(|attr| self.attribute(trigger, attr))
            .flat_map(|ids| ids.split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .collect()
    }

    fn controlled_listbox(&self, trigger: NodeId) -> Option<NodeId> {
        self.popup_refs(trigger)
            .iter()
            .find_map(|id| self.find_by_id(id))
    }

    fn trigger_for(&self, listbox: NodeId) -> Option<NodeId> {
        let id = self.attribute(listbox, "id")?;
        self.all_nodes()
            .find(|n| self.popup_refs(*n).contains(&id))
    }

    fn open_popup(&mut self, trigger: NodeId) {
        self.set_attr(trigger, "aria-expanded", "true");

        let Some(listbox) = self.controlled_listbox(trigger) else {
            return;
        };

        let delay = self
            .attribute(listbox, "data-open-delay-ms")
            .and_then(|d| d.trim().parse::<u64>().ok())
            .unwrap_or(0);

        if delay == 0 {
            self.remove_attr(listbox, "hidden");
        } else {
            self.pending_popups.push((self.clock_ms + delay, listbox));
        }
    }

    fn choose_option(&mut self, option: NodeId) {
        let listbox = self.closest(option, |d, n| d.has_role(n, "listbox"));
        let label = self.accessible_label(option);

        if let Some(listbox) = listbox {
            for other in self.query_all(listbox, |d, n| d.has_role(n, "option")) {
                self.set_attr(other, "aria-selected", "false");
            }
            self.set_attr(listbox, "hidden", "");

            if let Some(trigger) = self.trigger_for(listbox) {
                self.display_selection(trigger, &label);
                self.set_attr(trigger, "data-value", &label);
                self.set_attr(trigger, "aria-expanded", "false");
            }
        }
        self.set_attr(option, "aria-selected", "true");
    }

    /// Show `label` on the trigger in place of its current text. The trigger
    /// keeps its subtree; only the first text outside any listbox changes.
    fn display_selection(&mut self, trigger: NodeId, label: &str) {
        let holder = std::iter::once(trigger)
            .chain(self.descendants(trigger))
            .find(|n| {
                self.data(*n).text.as_deref().is_some_and(|t| !t.trim().is_empty())
                    && self.closest(*n, |d, m| d.has_role(m, "listbox")).is_none()
            })
            .unwrap_or(trigger);

        self.data_mut(holder).text = Some(label.to_string());
    }
}

impl FormDocument for DomTree {
    type Node = NodeId;

    fn title(&self) -> String {
        self.title.clone()
    }

    fn url(&self) -> String {
        self.url.clone()
    }

    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.data(node).children.clone()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.data(node).parent
    }

    fn tag(&self, node: NodeId) -> String {
        self.data(node).tag.clone()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.data(node).attrs.get(name).cloned()
    }

    fn text_content(&self, node: NodeId) -> String {
        let data = self.data(node);
        let mut text = data.text.clone().unwrap_or_default();
        for child in &data.children {
            text.push_str(&self.text_content(*child));
        }
        text
    }

    fn value(&self, node: NodeId) -> Option<String> {
        let data = self.data(node);
        if let Some(value) = &data.value {
            return Some(value.clone());
        }

        if data.tag == "select" {
            let selected = self
                .query_first(node, |d, n| d.tag(n) == "option" && d.attribute(n, "selected").is_some())?;
            return self
                .attribute(selected, "value")
                .or_else(|| Some(self.text_content(selected).trim().to_string()));
        }

        data.attrs.get("value").cloned()
    }

    fn is_visible(&self, node: NodeId) -> bool {
        self.closest(node, |d, n| d.attribute(n, "hidden").is_some())
            .is_none()
    }

    fn focus(&mut self, node: NodeId) -> Result<(), WidgetError> {
        self.focused = Some(node);
        Ok(())
    }

    fn set_value(&mut self, node: NodeId, value: &str) -> Result<(), WidgetError> {
        let tag = self.tag(node);
        match tag.as_str() {
            "input" | "textarea" => {
                self.data_mut(node).value = Some(value.to_string());
                Ok(())
            }
            "select" => {
                let options = self.query_all(node, |d, n| d.tag(n) == "option");
                let chosen = options.iter().copied().find(|o| {
                    self.attribute(*o, "value").as_deref() == Some(value)
                        || self.text_content(*o).trim() == value
                });
                let Some(chosen) = chosen else {
                    return Err(WidgetError::NoMatchingOption(value.to_string()));
                };
                for option in options {
                    self.remove_attr(option, "selected");
                }
                self.set_attr(chosen, "selected", "");
                self.data_mut(node).value = Some(value.to_string());
                Ok(())
            }
            other => Err(WidgetError::Interaction(format!(
                "<{}> does not hold a value",
                other
            ))),
        }
    }

    fn dispatch_event(&mut self, node: NodeId, event: DomEvent) -> Result<(), WidgetError> {
        self.events.push(EventRecord { node, event });
        Ok(())
    }

    fn click(&mut self, node: NodeId) -> Result<(), WidgetError> {
        if self.is_disabled(node) {
            return Err(WidgetError::Interaction("element is disabled".into()));
        }
        if !self.is_visible(node) {
            return Err(WidgetError::Interaction("element is not visible".into()));
        }

        self.events.push(EventRecord {
            node,
            event: DomEvent::Click,
        });

        let input_type = self.input_type(node);
        if self.has_role(node, "radio") {
            self.select_aria_radio(node);
        } else if input_type.as_deref() == Some("radio") {
            self.select_native_radio(node);
        } else if self.has_role(node, "checkbox") {
            self.toggle_aria_checkbox(node);
        } else if input_type.as_deref() == Some("checkbox") {
            self.toggle_native_checkbox(node);
        } else if self.has_role(node, "option") {
            self.choose_option(node);
        } else if self.attribute(node, "aria-haspopup").as_deref() == Some("listbox")
            || self.has_role(node, "combobox")
        {
            self.open_popup(node);
        }

        Ok(())
    }

    fn dismiss(&mut self) -> Result<(), WidgetError> {
        self.pending_popups.clear();

        let triggers: Vec<NodeId> = self
            .all_nodes()
            .filter(|n| self.attribute(*n, "aria-expanded").as_deref() == Some("true"))
            .collect();

        for trigger in triggers {
            self.set_attr(trigger, "aria-expanded", "false");
            if let Some(listbox) = self.controlled_listbox(trigger) {
                self.set_attr(listbox, "hidden", "");
            }
        }
        Ok(())
    }

    fn pause(&mut self, duration: Duration) {
        self.clock_ms += duration.as_millis() as u64;

        let now = self.clock_ms;
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.pending_popups.drain(..).partition(|(at, _)| *at <= now);
        self.pending_popups = waiting;

        for (_, listbox) in due {
            self.remove_attr(listbox, "hidden");
        }
    }
}
