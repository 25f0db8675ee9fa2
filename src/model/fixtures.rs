// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Inf and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::connection::{Connection, Group};
use super::document::DiagramDocument;
use super::ids::{ConnectionId, GroupId, NodeId};
use super::node::{Node, Subgraph};

fn nid(value: u64) -> NodeId {
    NodeId::new(value)
}

/// Three nodes in a row (`1 -> 2 -> 3`) with a group around the first two.
pub(crate) fn three_node_chain() -> DiagramDocument {
    DiagramDocument {
        version: Some("2.5".to_owned()),
        nodes: vec![
            Node::rectangle(nid(1), 0.0, 0.0, 100.0, 50.0).with_text("Client"),
            Node::rectangle(nid(2), 300.0, 0.0, 100.0, 50.0).with_text("Server"),
            Node::circle(nid(3), 650.0, 25.0, 25.0).with_text("DB"),
        ],
        connections: vec![
            Connection::new(ConnectionId::new(4), nid(1), nid(2)),
            Connection::new(ConnectionId::new(5), nid(2), nid(3)),
        ],
        groups: vec![Group::new(GroupId::new(6), "Frontend", vec![nid(1), nid(2)])],
        next_id: Some(7),
        canvas_width: Some(1200.0),
        canvas_height: Some(800.0),
        zoom: Some(1.5),
    }
}

pub(crate) fn three_node_chain_json() -> String {
    serde_json::to_string_pretty(&three_node_chain()).expect("serialize fixture")
}

/// A parent diagram whose second node embeds a child diagram using ids up to 41.
pub(crate) fn document_with_embedded_subgraph() -> DiagramDocument {
    let child = DiagramDocument {
        nodes: vec![
            Node::rectangle(nid(40), 0.0, 0.0, 80.0, 40.0).with_text("Inner A"),
            Node::rectangle(nid(41), 200.0, 0.0, 80.0, 40.0).with_text("Inner B"),
        ],
        connections: vec![Connection::new(ConnectionId::new(30), nid(40), nid(41))],
        ..DiagramDocument::default()
    };

    DiagramDocument {
        nodes: vec![
            Node::rectangle(nid(1), 0.0, 0.0, 100.0, 50.0).with_text("Outer"),
            Node::rectangle(nid(2), 300.0, 0.0, 100.0, 50.0)
                .with_text("Details")
                .with_subgraph(Subgraph::Embedded(Box::new(child))),
            Node::rectangle(nid(5), 600.0, 0.0, 100.0, 50.0)
                .with_text("Linked")
                .with_subgraph(Subgraph::File("linked.json".to_owned())),
        ],
        connections: vec![Connection::new(ConnectionId::new(3), nid(1), nid(2))],
        ..DiagramDocument::default()
    }
}
