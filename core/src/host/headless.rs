//! Headless in-memory host
//!
//! A small arena document with a virtual clock. It backs the manager outside
//! the browser (tests, server-side previews) and records the same structural
//! changes a `MutationObserver` on the body would report.

use std::collections::BTreeMap;
use std::time::Duration;

use hashbrown::HashMap;

use super::{Document, Interaction, Scheduler, StructureWatch};
use crate::entry::{EntryKey, ToastId};
use crate::error::HostError;
use crate::event::{Mutation, TimerEvent, ToastEvent};
use crate::manager::NotificationManager;

/// Index of a node in the headless document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct NodeData {
    tag: String,
    classes: Vec<String>,
    attributes: HashMap<String, String>,
    text: Option<String>,
    style: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl NodeData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            classes: Vec::new(),
            attributes: HashMap::new(),
            text: None,
            style: String::new(),
            parent: None,
            children: Vec::new(),
        }
    }
}

/// Listener registration on a toast node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub key: EntryKey,
    pub hover: bool,
}

/// Pending timer, ordered by due time then scheduling order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimerId {
    due: Duration,
    seq: u64,
}

#[derive(Debug)]
pub struct HeadlessHost {
    nodes: Vec<NodeData>,
    body: NodeId,
    now: Duration,
    timers: BTreeMap<TimerId, TimerEvent>,
    timer_seq: u64,
    observed: Option<NodeId>,
    mutations: Vec<Mutation<NodeId>>,
    bindings: HashMap<NodeId, Binding>,
    refuse_bindings: bool,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData::new("body")],
            body: NodeId(0),
            now: Duration::ZERO,
            timers: BTreeMap::new(),
            timer_seq: 0,
            observed: None,
            mutations: Vec::new(),
            bindings: HashMap::new(),
            refuse_bindings: false,
        }
    }

    fn node(&self, id: NodeId) -> Result<&NodeData, HostError> {
        self.nodes.get(id.0).ok_or(HostError::UnknownNode(id.0))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeData, HostError> {
        self.nodes.get_mut(id.0).ok_or(HostError::UnknownNode(id.0))
    }

    fn record(&mut self, parent: NodeId, mutation: Mutation<NodeId>) {
        if self.observed == Some(parent) {
            self.mutations.push(mutation);
        }
    }

    fn unlink(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get_mut(node.0).and_then(|data| data.parent.take()) else {
            return;
        };
        self.nodes[parent.0].children.retain(|child| *child != node);
        self.record(parent, Mutation::Removed(node));
    }

    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id.0).and_then(|data| data.parent);
        }
        false
    }

    fn descendants(&self, from: NodeId, out: &mut Vec<NodeId>) {
        if let Some(data) = self.nodes.get(from.0) {
            for child in &data.children {
                out.push(*child);
                self.descendants(*child, out);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Document manipulation from outside the manager
    // ─────────────────────────────────────────────────────────────────────────

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<(), HostError> {
        self.node_mut(node)?.attributes.remove(name);
        Ok(())
    }

    /// Make `bind` fail, as a host rejecting listener registration would
    pub fn refuse_bindings(&mut self, refuse: bool) {
        self.refuse_bindings = refuse;
    }

    /// Append an open `<dialog>` to the body
    pub fn show_modal(&mut self) -> NodeId {
        let dialog = NodeId(self.nodes.len());
        let mut data = NodeData::new("dialog");
        data.attributes.insert("open".to_string(), String::new());
        self.nodes.push(data);
        self.link(self.body, dialog);
        dialog
    }

    /// Remove a dialog (or any node) from the document
    pub fn close_modal(&mut self, dialog: NodeId) {
        self.unlink(dialog);
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        self.unlink(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        self.record(parent, Mutation::Added(child));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inspection
    // ─────────────────────────────────────────────────────────────────────────

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0).map(|data| data.tag.as_str())
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes
            .get(node.0)
            .is_some_and(|data| data.classes.iter().any(|c| c == class))
    }

    pub fn classes(&self, node: NodeId) -> &[String] {
        self.nodes
            .get(node.0)
            .map(|data| data.classes.as_slice())
            .unwrap_or_default()
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0).and_then(|data| data.text.as_deref())
    }

    pub fn style(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0).map(|data| data.style.as_str())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|data| data.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|data| data.children.as_slice())
            .unwrap_or_default()
    }

    /// Whether the node is connected to the body
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.is_ancestor(self.body, node)
    }

    /// Attached nodes carrying `class`, in document order
    pub fn query_class(&self, class: &str) -> Vec<NodeId> {
        let mut all = Vec::new();
        self.descendants(self.body, &mut all);
        all.into_iter()
            .filter(|node| self.has_class(*node, class))
            .collect()
    }

    pub fn binding(&self, node: NodeId) -> Option<Binding> {
        self.bindings.get(&node).copied()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Due time of the earliest pending timer
    pub fn next_due(&self) -> Option<Duration> {
        self.timers.keys().next().map(|timer| timer.due)
    }

    pub fn is_observing(&self) -> bool {
        self.observed.is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Driver internals
    // ─────────────────────────────────────────────────────────────────────────

    /// Pop the earliest timer due by `deadline`, moving the clock to it
    fn pop_due(&mut self, deadline: Duration) -> Option<TimerEvent> {
        let (&timer, _) = self.timers.iter().next()?;
        if timer.due > deadline {
            return None;
        }
        self.now = timer.due;
        self.timers.remove(&timer)
    }

    fn take_mutations(&mut self) -> Vec<Mutation<NodeId>> {
        std::mem::take(&mut self.mutations)
    }
}

impl Document for HeadlessHost {
    type Node = NodeId;

    fn root(&self) -> Result<NodeId, HostError> {
        Ok(self.body)
    }

    fn active_dialog(&self) -> Result<Option<NodeId>, HostError> {
        let mut all = Vec::new();
        self.descendants(self.body, &mut all);
        Ok(all
            .into_iter()
            .filter(|node| self.is_dialog(node) && self.is_open(node))
            .last())
    }

    fn is_dialog(&self, node: &NodeId) -> bool {
        self.tag(*node) == Some("dialog")
    }

    fn is_open(&self, node: &NodeId) -> bool {
        self.nodes
            .get(node.0)
            .is_some_and(|data| data.attributes.contains_key("open"))
    }

    fn create_element(&mut self, tag: &str) -> Result<NodeId, HostError> {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData::new(tag));
        Ok(id)
    }

    fn add_class(&mut self, node: &NodeId, class: &str) -> Result<(), HostError> {
        let data = self.node_mut(*node)?;
        if !data.classes.iter().any(|c| c == class) {
            data.classes.push(class.to_string());
        }
        Ok(())
    }

    fn set_text(&mut self, node: &NodeId, text: &str) -> Result<(), HostError> {
        self.node_mut(*node)?.text = Some(text.to_string());
        Ok(())
    }

    fn set_style(&mut self, node: &NodeId, css: &str) -> Result<(), HostError> {
        self.node_mut(*node)?.style = css.to_string();
        Ok(())
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), HostError> {
        self.node(*parent)?;
        self.node(*child)?;
        if self.is_ancestor(*child, *parent) {
            return Err(HostError::HierarchyRequest);
        }
        self.link(*parent, *child);
        Ok(())
    }

    fn append_content(&mut self, parent: &NodeId, content: &NodeId) -> Result<(), HostError> {
        if self.tag(*content) != Some("template") {
            return self.append_child(parent, content);
        }
        let children = self.node(*content)?.children.clone();
        for child in children {
            self.append_child(parent, &child)?;
        }
        Ok(())
    }

    fn detach(&mut self, node: &NodeId) {
        self.unlink(*node);
    }
}

impl Scheduler for HeadlessHost {
    type Timer = TimerId;

    fn schedule(&mut self, delay: Duration, event: TimerEvent) -> TimerId {
        let timer = TimerId {
            due: self.now + delay,
            seq: self.timer_seq,
        };
        self.timer_seq += 1;
        self.timers.insert(timer, event);
        timer
    }

    fn cancel(&mut self, timer: TimerId) {
        self.timers.remove(&timer);
    }
}

impl StructureWatch for HeadlessHost {
    fn observe(&mut self, root: &NodeId) -> Result<(), HostError> {
        self.node(*root)?;
        self.observed = Some(*root);
        Ok(())
    }

    fn disconnect(&mut self) {
        self.observed = None;
        self.mutations.clear();
    }
}

impl Interaction for HeadlessHost {
    fn bind(&mut self, node: &NodeId, key: EntryKey, hover: bool) -> Result<(), HostError> {
        self.node(*node)?;
        if self.refuse_bindings {
            return Err(HostError::Dom {
                op: "bind",
                message: "listener registration refused".to_string(),
            });
        }
        self.bindings.insert(*node, Binding { key, hover });
        Ok(())
    }

    fn unbind(&mut self, node: &NodeId, key: EntryKey) {
        if self.bindings.get(node).is_some_and(|binding| binding.key == key) {
            self.bindings.remove(node);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Driving a headless manager
// ─────────────────────────────────────────────────────────────────────────────

impl NotificationManager<HeadlessHost> {
    /// Move the virtual clock forward, firing due timers in order
    pub fn advance(&mut self, by: Duration) {
        let deadline = self.host().now() + by;
        while let Some(event) = self.host_mut().pop_due(deadline) {
            self.handle(ToastEvent::Timer(event));
            self.settle();
        }
        self.host_mut().now = deadline;
        self.settle();
    }

    /// Deliver recorded structural changes, like a microtask checkpoint
    pub fn settle(&mut self) {
        let mutations = self.host_mut().take_mutations();
        if !mutations.is_empty() {
            self.handle(ToastEvent::Mutations(mutations));
        }
    }

    /// Click a toast. Returns false when nothing listens on it.
    pub fn click(&mut self, id: ToastId, trusted: bool) -> bool {
        let Some(binding) = self.listener(id) else {
            return false;
        };
        self.handle(ToastEvent::Click {
            key: binding.key,
            trusted,
        });
        self.settle();
        true
    }

    /// Move the pointer onto a toast. Returns false when hover is not tracked.
    pub fn pointer_enter(&mut self, id: ToastId) -> bool {
        match self.listener(id).filter(|binding| binding.hover) {
            Some(binding) => {
                self.handle(ToastEvent::PointerEnter(binding.key));
                true
            }
            None => false,
        }
    }

    /// Move the pointer off a toast. Returns false when hover is not tracked.
    pub fn pointer_leave(&mut self, id: ToastId) -> bool {
        match self.listener(id).filter(|binding| binding.hover) {
            Some(binding) => {
                self.handle(ToastEvent::PointerLeave(binding.key));
                true
            }
            None => false,
        }
    }

    fn listener(&self, id: ToastId) -> Option<Binding> {
        let node = *self.get(id)?.node();
        self.host().binding(node)
    }
}
