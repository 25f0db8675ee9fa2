// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Inf and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::ids::{ConnectionId, GroupId, NodeId};

fn default_directed() -> bool {
    true
}

/// A directed edge drawn from one node's outline to another's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    id: ConnectionId,
    from_id: NodeId,
    to_id: NodeId,
    #[serde(default = "default_directed")]
    directed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

impl Connection {
    pub fn new(id: ConnectionId, from_id: NodeId, to_id: NodeId) -> Self {
        Self {
            id,
            from_id,
            to_id,
            directed: true,
            label: None,
        }
    }

    pub fn undirected(mut self) -> Self {
        self.directed = false;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn from_id(&self) -> NodeId {
        self.from_id
    }

    pub fn to_id(&self) -> NodeId {
        self.to_id
    }

    pub fn directed(&self) -> bool {
        self.directed
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn touches(&self, node_id: NodeId) -> bool {
        self.from_id == node_id || self.to_id == node_id
    }
}

/// A named set of nodes drawn with a shared frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    id: GroupId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    node_ids: Vec<NodeId>,
}

impl Group {
    pub fn new(id: GroupId, name: impl Into<String>, node_ids: Vec<NodeId>) -> Self {
        Self {
            id,
            name: name.into(),
            node_ids,
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_ids
    }

    pub fn remove_node(&mut self, node_id: NodeId) {
        self.node_ids.retain(|id| *id != node_id);
    }
}
