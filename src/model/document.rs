// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Inf and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The persisted diagram document and its validation.
//!
//! Loading is two-staged: the text is parsed into a `serde_json::Value`, checked structurally by
//! [`validate_diagram_data`], and only then decoded into a typed [`DiagramDocument`]. Nothing is
//! applied to live state until the whole document passed.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::connection::{Connection, Group};
use super::ids::MAX_ID;
use super::node::{Node, Subgraph};

pub const DOCUMENT_VERSION: &str = "2.5";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
}

impl DiagramDocument {
    /// Highest id used anywhere in the document, nested subgraphs included.
    pub fn max_id(&self) -> Option<u64> {
        let node_ids = self.nodes.iter().map(|node| node.id().get());
        let connection_ids = self.connections.iter().flat_map(|connection| {
            [
                connection.id().get(),
                connection.from_id().get(),
                connection.to_id().get(),
            ]
        });
        let group_ids = self.groups.iter().flat_map(|group| {
            std::iter::once(group.id().get()).chain(group.node_ids().iter().map(|id| id.get()))
        });
        let nested = self.nodes.iter().filter_map(|node| match node.subgraph() {
            Some(Subgraph::Embedded(child)) => child.max_id(),
            _ => None,
        });

        node_ids
            .chain(connection_ids)
            .chain(group_ids)
            .chain(nested)
            .max()
    }
}

/// Returns an id strictly greater than every id used in `document`.
///
/// Validated documents never use ids above [`MAX_ID`], so the result always fits.
pub fn calculate_safe_next_id(document: &DiagramDocument) -> u64 {
    document
        .max_id()
        .map_or(1, |max| max.saturating_add(1))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    NotAnObject,
    MissingField {
        field: &'static str,
    },
    FieldNotArray {
        field: &'static str,
    },
    InvalidEntry {
        field: &'static str,
        index: usize,
        reason: &'static str,
    },
    InvalidNumber {
        field: &'static str,
    },
    DuplicateNodeId {
        id: u64,
    },
    IdOutOfRange {
        field: &'static str,
        index: usize,
    },
    /// An embedded subgraph of `nodes[index]` failed the same checks as a top-level document.
    InvalidSubgraph {
        index: usize,
        source: Box<ValidationError>,
    },
    Malformed {
        message: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => f.write_str("diagram data must be a JSON object"),
            Self::MissingField { field } => write!(f, "missing required field `{field}`"),
            Self::FieldNotArray { field } => write!(f, "field `{field}` must be an array"),
            Self::InvalidEntry {
                field,
                index,
                reason,
            } => write!(f, "invalid entry {field}[{index}]: {reason}"),
            Self::InvalidNumber { field } => {
                write!(f, "field `{field}` must be a positive finite number")
            }
            Self::DuplicateNodeId { id } => write!(f, "duplicate node id {id}"),
            Self::IdOutOfRange { field, index } => {
                write!(f, "invalid entry {field}[{index}]: id out of range (max {MAX_ID})")
            }
            Self::InvalidSubgraph { index, source } => {
                write!(f, "invalid subgraph in nodes[{index}]: {source}")
            }
            Self::Malformed { message } => write!(f, "malformed diagram data: {message}"),
        }
    }
}

impl std::error::Error for ValidationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidSubgraph { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum DocumentError {
    Json(serde_json::Error),
    Invalid(ValidationError),
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(source) => write!(f, "invalid JSON: {source}"),
            Self::Invalid(source) => write!(f, "invalid diagram: {source}"),
        }
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(source) => Some(source),
            Self::Invalid(source) => Some(source),
        }
    }
}

impl From<ValidationError> for DocumentError {
    fn from(source: ValidationError) -> Self {
        Self::Invalid(source)
    }
}

/// Parses and validates diagram document text.
pub fn parse_diagram_document(text: &str) -> Result<DiagramDocument, DocumentError> {
    let value: Value = serde_json::from_str(text).map_err(DocumentError::Json)?;
    Ok(validate_diagram_data(&value)?)
}

/// Checks the shape of raw diagram data and decodes it.
///
/// Embedded subgraphs are checked recursively with the same rules.
pub fn validate_diagram_data(value: &Value) -> Result<DiagramDocument, ValidationError> {
    let Some(root) = value.as_object() else {
        return Err(ValidationError::NotAnObject);
    };

    let nodes = required_array(root, "nodes")?;
    let connections = required_array(root, "connections")?;
    let groups = match root.get("groups") {
        None | Some(Value::Null) => &[][..],
        Some(Value::Array(groups)) => groups.as_slice(),
        Some(_) => return Err(ValidationError::FieldNotArray { field: "groups" }),
    };

    check_entries_have_ids("nodes", nodes)?;
    check_entries_have_ids("connections", connections)?;
    check_entries_have_ids("groups", groups)?;

    for (index, entry) in connections.iter().enumerate() {
        for key in ["fromId", "toId"] {
            check_id(
                "connections",
                index,
                entry.get(key),
                "fromId and toId must be non-negative integers",
            )?;
        }
    }
    for (index, entry) in groups.iter().enumerate() {
        if let Some(Value::Array(members)) = entry.get("nodeIds") {
            if members.iter().any(|m| m.as_u64().is_some_and(|id| id > MAX_ID)) {
                return Err(ValidationError::IdOutOfRange {
                    field: "groups",
                    index,
                });
            }
        }
    }

    // `nextId` may sit one past MAX_ID: the counter is then exhausted but still ahead of every id.
    if root.get("nextId").is_some_and(|v| !v.is_null() && v.as_u64().is_none()) {
        return Err(ValidationError::InvalidNumber { field: "nextId" });
    }
    for field in ["canvasWidth", "canvasHeight", "zoom"] {
        if let Some(v) = root.get(field).filter(|v| !v.is_null()) {
            if !v.as_f64().is_some_and(|n| n.is_finite() && n > 0.0) {
                return Err(ValidationError::InvalidNumber { field });
            }
        }
    }

    for (index, entry) in nodes.iter().enumerate() {
        if let Some(child @ Value::Object(_)) = entry.get("subgraph") {
            validate_diagram_data(child).map_err(|source| ValidationError::InvalidSubgraph {
                index,
                source: Box::new(source),
            })?;
        }
    }

    let document: DiagramDocument =
        serde_json::from_value(value.clone()).map_err(|err| ValidationError::Malformed {
            message: err.to_string(),
        })?;
    check_unique_node_ids(&document)?;
    Ok(document)
}

/// Node ids must be unique within one diagram level; nested levels are checked on their own.
fn check_unique_node_ids(document: &DiagramDocument) -> Result<(), ValidationError> {
    let mut seen = BTreeSet::new();
    for node in &document.nodes {
        if !seen.insert(node.id()) {
            return Err(ValidationError::DuplicateNodeId { id: node.id().get() });
        }
    }
    Ok(())
}

fn required_array<'a>(
    root: &'a serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<&'a [Value], ValidationError> {
    match root.get(field) {
        None => Err(ValidationError::MissingField { field }),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(ValidationError::FieldNotArray { field }),
    }
}

fn check_entries_have_ids(field: &'static str, entries: &[Value]) -> Result<(), ValidationError> {
    for (index, entry) in entries.iter().enumerate() {
        if !entry.is_object() {
            return Err(ValidationError::InvalidEntry {
                field,
                index,
                reason: "entry must be an object",
            });
        }
        check_id(field, index, entry.get("id"), "id must be a non-negative integer")?;
    }
    Ok(())
}

fn check_id(
    field: &'static str,
    index: usize,
    value: Option<&Value>,
    reason: &'static str,
) -> Result<(), ValidationError> {
    match value.and_then(Value::as_u64) {
        None => Err(ValidationError::InvalidEntry {
            field,
            index,
            reason,
        }),
        Some(id) if id > MAX_ID => Err(ValidationError::IdOutOfRange { field, index }),
        Some(_) => Ok(()),
    }
}
