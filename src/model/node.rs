// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Inf and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::document::DiagramDocument;
use super::geometry::{Outline, Point};
use super::ids::NodeId;

pub const DEFAULT_RECT_WIDTH: f64 = 120.0;
pub const DEFAULT_RECT_HEIGHT: f64 = 80.0;
pub const DEFAULT_TEXT_WIDTH: f64 = 150.0;
pub const DEFAULT_TEXT_HEIGHT: f64 = 60.0;
pub const DEFAULT_CODE_WIDTH: f64 = 200.0;
pub const DEFAULT_CODE_HEIGHT: f64 = 100.0;
pub const DEFAULT_CIRCLE_RADIUS: f64 = 50.0;
pub const DEFAULT_DIAMOND_SIZE: f64 = 100.0;
pub const TABLE_CELL_WIDTH: f64 = 100.0;
pub const TABLE_CELL_HEIGHT: f64 = 40.0;

/// Node shape as stored in the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    #[default]
    Rectangle,
    Text,
    Code,
    Circle,
    Diamond,
    Table,
    /// Shapes this build does not know; drawn and hit-tested as rectangles.
    #[serde(other)]
    Other,
}

impl NodeKind {
    /// The kind persisted as `name`, or `None` for shapes this build does not know.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "rectangle" => Some(Self::Rectangle),
            "text" => Some(Self::Text),
            "code" => Some(Self::Code),
            "circle" => Some(Self::Circle),
            "diamond" => Some(Self::Diamond),
            "table" => Some(Self::Table),
            _ => None,
        }
    }
}

/// Where a node's nested diagram lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Subgraph {
    /// A diagram file relative to the parent diagram's directory.
    File(String),
    Embedded(Box<DiagramDocument>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    id: NodeId,
    #[serde(rename = "type", default)]
    kind: NodeKind,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    radius: Option<f64>,
    #[serde(default)]
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text_align: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    col_widths: Vec<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    row_heights: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cells: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subgraph: Option<Subgraph>,
}

impl Node {
    fn with_kind(id: NodeId, kind: NodeKind, x: f64, y: f64) -> Self {
        Self {
            id,
            kind,
            x,
            y,
            width: None,
            height: None,
            radius: None,
            text: String::new(),
            text_align: None,
            col_widths: Vec::new(),
            row_heights: Vec::new(),
            cells: None,
            subgraph: None,
        }
    }

    /// A node at the origin with the default size of its kind, waiting for a layout pass.
    pub fn unplaced(id: NodeId, kind: NodeKind) -> Self {
        Self::with_kind(id, kind, 0.0, 0.0)
    }

    /// A rectangle with its top-left corner at `(x, y)`.
    pub fn rectangle(id: NodeId, x: f64, y: f64, width: f64, height: f64) -> Self {
        let mut node = Self::with_kind(id, NodeKind::Rectangle, x, y);
        node.width = Some(width);
        node.height = Some(height);
        node
    }

    /// A circle centered on `(cx, cy)`.
    pub fn circle(id: NodeId, cx: f64, cy: f64, radius: f64) -> Self {
        let mut node = Self::with_kind(id, NodeKind::Circle, cx, cy);
        node.radius = Some(radius);
        node
    }

    /// A diamond whose bounding box has its top-left corner at `(x, y)`.
    pub fn diamond(id: NodeId, x: f64, y: f64, width: f64, height: f64) -> Self {
        let mut node = Self::with_kind(id, NodeKind::Diamond, x, y);
        node.width = Some(width);
        node.height = Some(height);
        node
    }

    pub fn table(id: NodeId, x: f64, y: f64, col_widths: Vec<f64>, row_heights: Vec<f64>) -> Self {
        let mut node = Self::with_kind(id, NodeKind::Table, x, y);
        node.col_widths = col_widths;
        node.row_heights = row_heights;
        node
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_subgraph(mut self, subgraph: Subgraph) -> Self {
        self.subgraph = Some(subgraph);
        self
    }

    pub fn with_text_align(mut self, align: impl Into<String>) -> Self {
        self.text_align = Some(align.into());
        self
    }

    /// Table cells as rows of `{"text", "textAlign"}` objects.
    pub fn with_cells(mut self, cells: serde_json::Value) -> Self {
        self.cells = Some(cells);
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_position(&mut self, position: Point) {
        self.x = position.x;
        self.y = position.y;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn text_align(&self) -> Option<&str> {
        self.text_align.as_deref()
    }

    pub fn col_widths(&self) -> &[f64] {
        &self.col_widths
    }

    pub fn row_heights(&self) -> &[f64] {
        &self.row_heights
    }

    pub fn cells(&self) -> Option<&serde_json::Value> {
        self.cells.as_ref()
    }

    pub fn subgraph(&self) -> Option<&Subgraph> {
        self.subgraph.as_ref()
    }

    pub fn set_subgraph(&mut self, subgraph: Option<Subgraph>) {
        self.subgraph = subgraph;
    }

    /// Width and height of the node's bounding box.
    pub fn size(&self) -> (f64, f64) {
        match self.kind {
            NodeKind::Circle => {
                let diameter = self.radius.unwrap_or(DEFAULT_CIRCLE_RADIUS) * 2.0;
                (diameter, diameter)
            }
            NodeKind::Table => {
                let width = if self.col_widths.is_empty() {
                    TABLE_CELL_WIDTH * 3.0
                } else {
                    self.col_widths.iter().sum()
                };
                let height = if self.row_heights.is_empty() {
                    TABLE_CELL_HEIGHT * 3.0
                } else {
                    self.row_heights.iter().sum()
                };
                (width, height)
            }
            NodeKind::Text => (
                self.width.unwrap_or(DEFAULT_TEXT_WIDTH),
                self.height.unwrap_or(DEFAULT_TEXT_HEIGHT),
            ),
            NodeKind::Code => (
                self.width.unwrap_or(DEFAULT_CODE_WIDTH),
                self.height.unwrap_or(DEFAULT_CODE_HEIGHT),
            ),
            NodeKind::Diamond => (
                self.width.unwrap_or(DEFAULT_DIAMOND_SIZE),
                self.height.unwrap_or(DEFAULT_DIAMOND_SIZE),
            ),
            NodeKind::Rectangle | NodeKind::Other => (
                self.width.unwrap_or(DEFAULT_RECT_WIDTH),
                self.height.unwrap_or(DEFAULT_RECT_HEIGHT),
            ),
        }
    }

    pub fn outline(&self) -> Outline {
        if self.kind == NodeKind::Circle {
            return Outline::Circle {
                center: self.position(),
                radius: self.radius.unwrap_or(DEFAULT_CIRCLE_RADIUS),
            };
        }

        let (width, height) = self.size();
        let center = Point::new(self.x + width / 2.0, self.y + height / 2.0);
        let half_width = width / 2.0;
        let half_height = height / 2.0;
        if self.kind == NodeKind::Diamond {
            Outline::Diamond {
                center,
                half_width,
                half_height,
            }
        } else {
            Outline::Rect {
                center,
                half_width,
                half_height,
            }
        }
    }

    pub fn center(&self) -> Point {
        self.outline().center()
    }

    /// The point where a line aimed at `toward` crosses this node's outline.
    pub fn edge_point(&self, toward: Point) -> Point {
        self.outline().boundary_point(toward)
    }
}
