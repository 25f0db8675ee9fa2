// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Inf and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;

use super::connection::{Connection, Group};
use super::document::{calculate_safe_next_id, DiagramDocument};
use super::ids::{ConnectionId, Id, NodeId, MAX_ID};
use super::node::Node;

pub const DEFAULT_CANVAS_WIDTH: f64 = 2000.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 2000.0;
pub const DEFAULT_ZOOM: f64 = 1.0;

/// Canvas size and zoom applied when a document does not carry its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasDefaults {
    pub width: f64,
    pub height: f64,
    pub zoom: f64,
}

impl Default for CanvasDefaults {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
            zoom: DEFAULT_ZOOM,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditError {
    DuplicateNodeId(NodeId),
    MissingNode(NodeId),
    IdOutOfRange(u64),
    IdsExhausted,
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateNodeId(id) => write!(f, "node {id} already exists"),
            Self::MissingNode(id) => write!(f, "node {id} does not exist"),
            Self::IdOutOfRange(id) => write!(f, "id {id} is above the largest usable id {MAX_ID}"),
            Self::IdsExhausted => f.write_str("no unused ids left"),
        }
    }
}

impl std::error::Error for EditError {}

/// The diagram currently on the canvas.
///
/// `nodes` is the source of truth; `node_map` is derived from it and rebuilt whenever the node
/// sequence changes shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    version: Option<String>,
    nodes: Vec<Node>,
    connections: Vec<Connection>,
    groups: Vec<Group>,
    next_id: u64,
    canvas_width: f64,
    canvas_height: f64,
    zoom: f64,
    node_map: BTreeMap<NodeId, usize>,
}

impl Default for Diagram {
    fn default() -> Self {
        Self::empty(CanvasDefaults::default())
    }
}

impl Diagram {
    pub fn empty(defaults: CanvasDefaults) -> Self {
        Self {
            version: None,
            nodes: Vec::new(),
            connections: Vec::new(),
            groups: Vec::new(),
            next_id: 1,
            canvas_width: defaults.width,
            canvas_height: defaults.height,
            zoom: defaults.zoom,
            node_map: BTreeMap::new(),
        }
    }

    /// Builds live state from a validated document.
    ///
    /// A stored `nextId` is kept unless it would reuse an id already present in the document.
    pub fn from_document(document: DiagramDocument, defaults: CanvasDefaults) -> Self {
        let safe_next_id = calculate_safe_next_id(&document);
        let next_id = match document.next_id {
            Some(stored) if stored >= safe_next_id => stored,
            Some(stored) => {
                tracing::warn!(
                    stored,
                    safe_next_id,
                    "stored nextId collides with existing ids; using safe value"
                );
                safe_next_id
            }
            None => safe_next_id,
        };

        let mut diagram = Self {
            version: document.version,
            nodes: document.nodes,
            connections: document.connections,
            groups: document.groups,
            next_id,
            canvas_width: document.canvas_width.unwrap_or(defaults.width),
            canvas_height: document.canvas_height.unwrap_or(defaults.height),
            zoom: document.zoom.unwrap_or(defaults.zoom),
            node_map: BTreeMap::new(),
        };
        diagram.rebuild_node_map();
        diagram
    }

    pub fn to_document(&self) -> DiagramDocument {
        DiagramDocument {
            version: self.version.clone(),
            nodes: self.nodes.clone(),
            connections: self.connections.clone(),
            groups: self.groups.clone(),
            next_id: Some(self.next_id),
            canvas_width: Some(self.canvas_width),
            canvas_height: Some(self.canvas_height),
            zoom: Some(self.zoom),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn canvas_size(&self) -> (f64, f64) {
        (self.canvas_width, self.canvas_height)
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    /// Node id to index into [`Diagram::nodes`].
    pub fn node_map(&self) -> &BTreeMap<NodeId, usize> {
        &self.node_map
    }

    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.node_map.get(&node_id).map(|&index| &self.nodes[index])
    }

    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        let index = *self.node_map.get(&node_id)?;
        self.nodes.get_mut(index)
    }

    pub fn connection(&self, connection_id: ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id() == connection_id)
    }

    /// Hands out the next unused id.
    pub fn allocate_id<T>(&mut self) -> Result<Id<T>, EditError> {
        if self.next_id > MAX_ID {
            return Err(EditError::IdsExhausted);
        }
        let id = Id::new(self.next_id);
        self.next_id += 1;
        Ok(id)
    }

    /// Raises the id counter to at least `floor`. Nested diagrams share one id space with their
    /// parent, so entering or leaving a subgraph carries the counter across.
    pub fn reserve_ids_below(&mut self, floor: u64) {
        self.next_id = self.next_id.max(floor);
    }

    pub fn add_node(&mut self, node: Node) -> Result<(), EditError> {
        let node_id = node.id();
        check_in_range(node_id.get())?;
        if self.node_map.contains_key(&node_id) {
            return Err(EditError::DuplicateNodeId(node_id));
        }
        self.bump_next_id_past(node_id.get());
        self.node_map.insert(node_id, self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    pub fn add_connection(&mut self, connection: Connection) -> Result<(), EditError> {
        check_in_range(connection.id().get())?;
        for endpoint in [connection.from_id(), connection.to_id()] {
            if !self.node_map.contains_key(&endpoint) {
                return Err(EditError::MissingNode(endpoint));
            }
        }
        self.bump_next_id_past(connection.id().get());
        self.connections.push(connection);
        Ok(())
    }

    pub fn add_group(&mut self, group: Group) -> Result<(), EditError> {
        check_in_range(group.id().get())?;
        if let Some(missing) = group
            .node_ids()
            .iter()
            .find(|id| !self.node_map.contains_key(id))
        {
            return Err(EditError::MissingNode(*missing));
        }
        self.bump_next_id_past(group.id().get());
        self.groups.push(group);
        Ok(())
    }

    /// Removes a node together with its connections and group memberships.
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        let index = self.node_map.get(&node_id).copied()?;
        let node = self.nodes.remove(index);
        self.connections.retain(|connection| !connection.touches(node_id));
        for group in &mut self.groups {
            group.remove_node(node_id);
        }
        self.groups.retain(|group| !group.node_ids().is_empty());
        self.rebuild_node_map();
        Some(node)
    }

    /// `used` has passed [`check_in_range`], so `used + 1` cannot overflow.
    fn bump_next_id_past(&mut self, used: u64) {
        if used >= self.next_id {
            self.next_id = used + 1;
        }
    }

    fn rebuild_node_map(&mut self) {
        self.node_map = self
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id(), index))
            .collect();
    }
}

fn check_in_range(id: u64) -> Result<(), EditError> {
    if id > MAX_ID {
        return Err(EditError::IdOutOfRange(id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{CanvasDefaults, Diagram, EditError};
    use crate::model::{
        fixtures, Connection, ConnectionId, DiagramDocument, Group, GroupId, Node, NodeId, MAX_ID,
    };

    #[test]
    fn from_document_keeps_stored_next_id_and_canvas() {
        let diagram = Diagram::from_document(fixtures::three_node_chain(), CanvasDefaults::default());

        assert_eq!(diagram.next_id(), 7);
        assert_eq!(diagram.canvas_size(), (1200.0, 800.0));
        assert_eq!(diagram.zoom(), 1.5);
        assert_eq!(diagram.node_map().len(), 3);
        for (id, &index) in diagram.node_map() {
            assert_eq!(diagram.nodes()[index].id(), *id);
        }
    }

    #[test]
    fn from_document_derives_next_id_when_missing() {
        let mut document = fixtures::three_node_chain();
        document.next_id = None;
        document.canvas_width = None;
        document.canvas_height = None;
        document.zoom = None;

        let defaults = CanvasDefaults {
            width: 640.0,
            height: 480.0,
            zoom: 0.5,
        };
        let diagram = Diagram::from_document(document, defaults);

        assert_eq!(diagram.next_id(), 7);
        assert_eq!(diagram.canvas_size(), (640.0, 480.0));
        assert_eq!(diagram.zoom(), 0.5);
    }

    #[test]
    fn from_document_raises_a_stale_next_id() {
        let mut document = fixtures::three_node_chain();
        document.next_id = Some(2);

        let diagram = Diagram::from_document(document, CanvasDefaults::default());
        assert_eq!(diagram.next_id(), 7);
    }

    #[test]
    fn allocate_id_is_monotonic() {
        let mut diagram = Diagram::default();
        let a: NodeId = diagram.allocate_id().expect("id");
        let b: ConnectionId = diagram.allocate_id().expect("id");
        assert_eq!(a.get(), 1);
        assert_eq!(b.get(), 2);
        assert_eq!(diagram.next_id(), 3);
    }

    #[test]
    fn allocate_id_stops_instead_of_repeating_the_last_id() {
        let mut diagram = Diagram::default();
        diagram.reserve_ids_below(MAX_ID);

        let last: NodeId = diagram.allocate_id().expect("MAX_ID is still free");
        assert_eq!(last.get(), MAX_ID);
        assert!(diagram.next_id() > last.get());
        let exhausted: Result<NodeId, EditError> = diagram.allocate_id();
        assert_eq!(exhausted, Err(EditError::IdsExhausted));
        assert_eq!(diagram.next_id(), MAX_ID + 1);
    }

    #[test]
    fn add_rejects_ids_the_counter_cannot_pass() {
        let mut diagram = Diagram::default();
        assert_eq!(
            diagram.add_node(Node::rectangle(NodeId::new(u64::MAX), 0.0, 0.0, 10.0, 10.0)),
            Err(EditError::IdOutOfRange(u64::MAX))
        );
        assert!(diagram.nodes().is_empty());

        diagram
            .add_node(Node::rectangle(NodeId::new(MAX_ID), 0.0, 0.0, 10.0, 10.0))
            .expect("largest usable id");
        assert_eq!(diagram.next_id(), u64::MAX);
        assert_eq!(
            diagram.add_group(Group::new(GroupId::new(u64::MAX), "g", vec![NodeId::new(MAX_ID)])),
            Err(EditError::IdOutOfRange(u64::MAX))
        );
    }

    #[test]
    fn add_node_rejects_duplicates_and_keeps_next_id_ahead() {
        let mut diagram = Diagram::default();
        diagram
            .add_node(Node::rectangle(NodeId::new(10), 0.0, 0.0, 10.0, 10.0))
            .expect("add node");

        assert_eq!(diagram.next_id(), 11);
        assert_eq!(
            diagram.add_node(Node::circle(NodeId::new(10), 0.0, 0.0, 5.0)),
            Err(EditError::DuplicateNodeId(NodeId::new(10)))
        );
    }

    #[test]
    fn add_connection_requires_both_endpoints() {
        let mut diagram = Diagram::default();
        diagram
            .add_node(Node::rectangle(NodeId::new(1), 0.0, 0.0, 10.0, 10.0))
            .expect("add node");

        let result = diagram.add_connection(Connection::new(
            ConnectionId::new(2),
            NodeId::new(1),
            NodeId::new(9),
        ));
        assert_eq!(result, Err(EditError::MissingNode(NodeId::new(9))));
        assert!(diagram.connections().is_empty());
    }

    #[test]
    fn remove_node_cascades_and_rebuilds_node_map() {
        let mut diagram = Diagram::from_document(fixtures::three_node_chain(), CanvasDefaults::default());

        let removed = diagram.remove_node(NodeId::new(2)).expect("node 2 exists");
        assert_eq!(removed.text(), "Server");
        assert!(diagram.connections().is_empty());
        assert_eq!(diagram.groups()[0].node_ids(), &[NodeId::new(1)]);
        assert_eq!(diagram.node_map().len(), 2);
        assert_eq!(diagram.node(NodeId::new(3)).map(Node::text), Some("DB"));
        assert!(diagram.node(NodeId::new(2)).is_none());
    }

    #[test]
    fn to_document_round_trips_live_state() {
        let diagram = Diagram::from_document(fixtures::three_node_chain(), CanvasDefaults::default());
        let document: DiagramDocument = diagram.to_document();
        assert_eq!(document, fixtures::three_node_chain());
    }
}
