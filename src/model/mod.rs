// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Inf and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A diagram is a sequence of nodes, connections between them and groups of nodes. The persisted
//! [`DiagramDocument`] is validated as a whole before it becomes a live [`Diagram`].

pub mod connection;
pub mod diagram;
pub mod document;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod geometry;
pub mod ids;
pub mod node;
pub mod session;

pub use connection::{Connection, Group};
pub use diagram::{CanvasDefaults, Diagram, EditError};
pub use document::{
    calculate_safe_next_id, parse_diagram_document, validate_diagram_data, DiagramDocument,
    DocumentError, ValidationError, DOCUMENT_VERSION,
};
pub use geometry::{Outline, Point};
pub use ids::{ConnectionId, GroupId, Id, IdError, NodeId, MAX_ID};
pub use node::{Node, NodeKind, Subgraph};
pub use session::{Navigation, NavigationFrame, Selection};
