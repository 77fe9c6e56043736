//! The document: element arena, head styles and listener table

use indexmap::IndexMap;
use slotmap::SlotMap;
use twinkle_core::events::{deliver, event_types, Event, EventDispatcher, EventType};

use crate::builder::ElementBuilder;
use crate::css::StyleFragment;
use crate::error::DomError;
use crate::node::{ElementData, Node, NodeId, NodeKind};

/// Outcome of [`Document::ensure_style`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleRegistration {
    /// The fragment was parsed and added to the head
    Inserted,
    /// A fragment with this id was already present; nothing changed
    AlreadyRegistered,
}

/// An in-memory document with a `<head>` style registry and a `<body>` tree.
///
/// Nodes are created detached and become part of the page once appended
/// under [`Document::body`]. Mutation methods on nodes that no longer exist
/// are no-ops, mirroring how a stale element handle behaves in a browser.
pub struct Document {
    nodes: SlotMap<NodeId, Node>,
    body: NodeId,
    styles: IndexMap<String, StyleFragment>,
    listeners: EventDispatcher<Document>,
    clock: u64,
}

impl Document {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let body = nodes.insert(Node::element(ElementData::new("body")));
        Self {
            nodes,
            body,
            styles: IndexMap::new(),
            listeners: EventDispatcher::new(),
            clock: 0,
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    // ========== Tree ==========

    /// Create a detached element
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.nodes.insert(Node::element(ElementData::new(tag)))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.nodes.insert(Node::text(text))
    }

    /// Materialise a builder as a detached subtree and return its root
    pub fn insert(&mut self, builder: ElementBuilder) -> NodeId {
        let (data, text, children) = builder.into_parts();
        let id = self.nodes.insert(Node::element(data));
        if let Some(text) = text {
            let text_node = self.create_text(text);
            self.link(id, text_node);
        }
        for child in children {
            let child_id = self.insert(child);
            self.link(id, child_id);
        }
        id
    }

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let parent_node = self.nodes.get(parent).ok_or(DomError::UnknownNode(parent))?;
        if parent_node.as_element().is_none() {
            return Err(DomError::NotAnElement(parent));
        }
        if !self.nodes.contains_key(child) {
            return Err(DomError::UnknownNode(child));
        }
        if child == self.body || self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        self.detach(child);
        self.link(parent, child);
        Ok(())
    }

    /// Unlink a node from its parent, keeping the subtree alive
    pub fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get(node).and_then(|n| n.parent) else {
            return;
        };
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.retain(|c| *c != node);
        }
        if let Some(n) = self.nodes.get_mut(node) {
            n.parent = None;
        }
    }

    /// Detach and free a subtree together with its listeners
    pub fn remove(&mut self, node: NodeId) {
        if node == self.body || !self.nodes.contains_key(node) {
            return;
        }
        self.detach(node);

        let mut stack = vec![node];
        let mut freed = 0usize;
        while let Some(id) = stack.pop() {
            if let Some(n) = self.nodes.remove(id) {
                stack.extend(n.children);
                self.listeners.remove_target(id.to_raw());
                freed += 1;
            }
        }
        tracing::debug!(freed, "removed subtree");
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    /// Whether the node is reachable from the body
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.is_inclusive_ancestor(self.body, node)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node)?.parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Pre-order descendants of `root`, excluding `root` itself
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    // ========== Elements ==========

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.tag.as_str())
    }

    pub fn is_text(&self, node: NodeId) -> bool {
        matches!(self.nodes.get(node).map(|n| &n.kind), Some(NodeKind::Text(_)))
    }

    pub fn id_of(&self, node: NodeId) -> Option<&str> {
        self.element(node)?.id.as_deref()
    }

    pub fn set_id(&mut self, node: NodeId, id: impl Into<String>) {
        if let Some(element) = self.element_mut(node) {
            element.id = Some(id.into());
        }
    }

    /// First connected element carrying `id`, in document order
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .find(|n| self.id_of(*n) == Some(id))
    }

    /// Elements under `root` carrying `class`, in document order
    pub fn query_class(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|n| self.has_class(*n, class))
            .collect()
    }

    pub fn classes(&self, node: NodeId) -> &[String] {
        self.element(node)
            .map(|e| e.classes.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node).is_some_and(|e| e.has_class(class))
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element_mut(node) {
            if !element.has_class(class) {
                element.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element_mut(node) {
            element.classes.retain(|c| c != class);
        }
    }

    /// Toggle a class, or force it on/off when `force` is given.
    ///
    /// Returns whether the class is present afterwards.
    pub fn toggle_class(&mut self, node: NodeId, class: &str, force: Option<bool>) -> bool {
        let present = self.has_class(node, class);
        let wanted = force.unwrap_or(!present);
        if wanted {
            self.add_class(node, class);
        } else {
            self.remove_class(node, class);
        }
        self.has_class(node, class)
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?.attributes.get(name).map(String::as_str)
    }

    pub fn set_attribute(&mut self, node: NodeId, name: impl Into<String>, value: impl Into<String>) {
        if let Some(element) = self.element_mut(node) {
            element.attributes.insert(name.into(), value.into());
        }
    }

    /// Concatenated text of the node and its descendants
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        if let Some(NodeKind::Text(text)) = self.nodes.get(node).map(|n| &n.kind) {
            out.push_str(text);
        }
        for id in self.descendants(node) {
            if let Some(NodeKind::Text(text)) = self.nodes.get(id).map(|n| &n.kind) {
                out.push_str(text);
            }
        }
        out
    }

    // ========== Head styles ==========

    /// Register a style fragment under a unique id.
    ///
    /// The first registration for an id wins; later calls leave the head
    /// untouched and do not parse their source.
    pub fn ensure_style(
        &mut self,
        id: &str,
        css: impl Into<String>,
    ) -> Result<StyleRegistration, DomError> {
        if self.styles.contains_key(id) {
            tracing::trace!(id, "style fragment already registered");
            return Ok(StyleRegistration::AlreadyRegistered);
        }

        let fragment = StyleFragment::parse(id, css).map_err(|source| DomError::Css {
            id: id.to_string(),
            source,
        })?;
        tracing::debug!(id, rules = fragment.rules().len(), "registered style fragment");
        self.styles.insert(id.to_string(), fragment);
        Ok(StyleRegistration::Inserted)
    }

    pub fn style(&self, id: &str) -> Option<&StyleFragment> {
        self.styles.get(id)
    }

    /// Head style elements carrying `id`; 0 or 1
    pub fn style_count_with_id(&self, id: &str) -> usize {
        self.styles().filter(|fragment| fragment.id() == id).count()
    }

    /// Head style fragments in registration order
    pub fn styles(&self) -> impl Iterator<Item = &StyleFragment> {
        self.styles.values()
    }

    // ========== Events ==========

    /// Register a listener on a node for one event type
    pub fn add_listener<F>(&mut self, node: NodeId, event_type: EventType, listener: F)
    where
        F: Fn(&mut Document, &mut Event) + Send + Sync + 'static,
    {
        self.listeners.register(node.to_raw(), event_type, listener);
    }

    /// Number of listeners registered across all nodes
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Deliver an event to its target and, for bubbling types, each ancestor.
    ///
    /// Returns the event as the last listener left it.
    pub fn dispatch(&mut self, mut event: Event) -> Event {
        self.clock += 1;
        event.timestamp = self.clock;

        let target = NodeId::from_raw(event.target);
        let mut path = vec![target];
        if event.bubbles() {
            let mut cursor = self.parent(target);
            while let Some(node) = cursor {
                path.push(node);
                cursor = self.parent(node);
            }
        }

        tracing::trace!(event_type = event.event_type, hops = path.len(), "dispatching event");
        for node in path {
            if event.propagation_stopped {
                break;
            }
            event.current_target = node.to_raw();
            let handlers = self.listeners.handlers(node.to_raw(), event.event_type);
            deliver(handlers, self, &mut event);
        }
        event
    }

    pub fn click(&mut self, node: NodeId) -> Event {
        self.dispatch(Event::new(event_types::CLICK, node.to_raw()))
    }

    pub fn pointer_enter(&mut self, node: NodeId) -> Event {
        self.dispatch(Event::new(event_types::POINTER_ENTER, node.to_raw()))
    }

    pub fn pointer_leave(&mut self, node: NodeId) -> Event {
        self.dispatch(Event::new(event_types::POINTER_LEAVE, node.to_raw()))
    }

    // ========== Internals ==========

    pub(crate) fn node_kind(&self, node: NodeId) -> Option<&NodeKind> {
        self.nodes.get(node).map(|n| &n.kind)
    }

    fn element(&self, node: NodeId) -> Option<&ElementData> {
        self.nodes.get(node)?.as_element()
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        self.nodes.get_mut(node)?.as_element_mut()
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    /// Whether `ancestor` is `node` or one of its ancestors
    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
