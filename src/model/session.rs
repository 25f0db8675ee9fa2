// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Inf and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Transient interaction state. Nothing here is persisted; all of it is dropped on load.

use std::collections::BTreeSet;

use super::diagram::Diagram;
use super::ids::{ConnectionId, NodeId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected_node_ids: BTreeSet<NodeId>,
    selected_connection: Option<ConnectionId>,
    editing_node: Option<NodeId>,
}

impl Selection {
    pub fn selected_node_ids(&self) -> &BTreeSet<NodeId> {
        &self.selected_node_ids
    }

    pub fn selected_node_ids_mut(&mut self) -> &mut BTreeSet<NodeId> {
        &mut self.selected_node_ids
    }

    pub fn selected_connection(&self) -> Option<ConnectionId> {
        self.selected_connection
    }

    /// Selecting a connection drops the node selection.
    pub fn select_connection(&mut self, connection_id: Option<ConnectionId>) {
        if connection_id.is_some() {
            self.selected_node_ids.clear();
        }
        self.selected_connection = connection_id;
    }

    pub fn editing_node(&self) -> Option<NodeId> {
        self.editing_node
    }

    pub fn set_editing_node(&mut self, node_id: Option<NodeId>) {
        self.editing_node = node_id;
    }

    pub fn is_empty(&self) -> bool {
        self.selected_node_ids.is_empty()
            && self.selected_connection.is_none()
            && self.editing_node.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A parent diagram parked while the user works inside one of its node's subgraphs.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationFrame {
    parent: Diagram,
    node_id: NodeId,
}

impl NavigationFrame {
    pub fn new(parent: Diagram, node_id: NodeId) -> Self {
        Self { parent, node_id }
    }

    pub fn parent(&self) -> &Diagram {
        &self.parent
    }

    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    pub fn into_parts(self) -> (Diagram, NodeId) {
        (self.parent, self.node_id)
    }
}

/// Subgraph drill-down state: one frame and one path segment per level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Navigation {
    stack: Vec<NavigationFrame>,
    current_path: Vec<String>,
}

impl Navigation {
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_root(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn current_path(&self) -> &[String] {
        &self.current_path
    }

    pub fn push(&mut self, frame: NavigationFrame, label: impl Into<String>) {
        self.stack.push(frame);
        self.current_path.push(label.into());
    }

    pub fn pop(&mut self) -> Option<NavigationFrame> {
        let frame = self.stack.pop()?;
        self.current_path.pop();
        Some(frame)
    }

    pub fn clear(&mut self) {
        self.stack.clear();
        self.current_path.clear();
    }
}
