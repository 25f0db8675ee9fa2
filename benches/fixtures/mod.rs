// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Inf and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use inf::model::{
    Connection, ConnectionId, DiagramDocument, Group, GroupId, Node, NodeId, Point,
    DOCUMENT_VERSION,
};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn new(prefix: &str) -> Self {
        let pid = std::process::id();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);

        let mut path = std::env::temp_dir();
        path.push(format!("inf_bench_{prefix}_{pid}_{nanos}_{counter}"));
        std::fs::create_dir_all(&path).expect("create temp dir");

        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

pub fn checksum_document(document: &DiagramDocument) -> u64 {
    let mut acc = 0u64;
    for node in &document.nodes {
        acc = acc.wrapping_mul(131).wrapping_add(node.id().get());
        acc = acc.wrapping_mul(131).wrapping_add(node.text().len() as u64);
    }
    for connection in &document.connections {
        acc = acc.wrapping_mul(131).wrapping_add(connection.from_id().get());
        acc = acc.wrapping_mul(131).wrapping_add(connection.to_id().get());
    }
    acc
}

pub mod grid {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Params {
        pub columns: usize,
        pub rows: usize,
        pub fanout: usize,
        pub label_len: usize,
    }

    impl Params {
        pub const fn new(columns: usize, rows: usize, fanout: usize, label_len: usize) -> Self {
            Self {
                columns,
                rows,
                fanout,
                label_len,
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Case {
        Small,
        MediumDense,
        Large,
    }

    impl Case {
        pub const fn id(self) -> &'static str {
            match self {
                Self::Small => "small",
                Self::MediumDense => "medium_dense",
                Self::Large => "large",
            }
        }

        pub const fn params(self) -> Params {
            match self {
                Self::Small => Params::new(6, 5, 1, 12),
                Self::MediumDense => Params::new(20, 15, 3, 16),
                Self::Large => Params::new(40, 40, 2, 32),
            }
        }
    }

    const CELL: f64 = 240.0;

    fn label(column: usize, row: usize, len: usize) -> String {
        let mut text = format!("Node_c{column:03}_r{row:03}");
        while text.len() < len {
            text.push('x');
        }
        text.truncate(len.max(1));
        text
    }

    /// Nodes on a grid, each connected to `fanout` nodes of the next column.
    ///
    /// Shapes rotate rectangle / circle / diamond so every boundary path is exercised.
    pub fn diagram(params: Params) -> DiagramDocument {
        assert!(params.columns >= 2, "columns must be >= 2");
        assert!(params.rows >= 1, "rows must be >= 1");

        let node_id = |column: usize, row: usize| NodeId::new((column * params.rows + row + 1) as u64);

        let mut nodes = Vec::with_capacity(params.columns * params.rows);
        for column in 0..params.columns {
            for row in 0..params.rows {
                let id = node_id(column, row);
                let x = column as f64 * CELL;
                let y = row as f64 * CELL;
                let node = match (column + row) % 3 {
                    0 => Node::rectangle(id, x, y, 120.0, 80.0),
                    1 => Node::circle(id, x + 60.0, y + 40.0, 50.0),
                    _ => Node::diamond(id, x, y, 100.0, 100.0),
                };
                nodes.push(node.with_text(label(column, row, params.label_len)));
            }
        }

        let mut next_id = (params.columns * params.rows + 1) as u64;
        let mut connections = Vec::new();
        let fanout = params.fanout.min(params.rows);
        for column in 0..params.columns - 1 {
            for row in 0..params.rows {
                for k in 0..fanout {
                    let to_row = (row + k) % params.rows;
                    connections.push(Connection::new(
                        ConnectionId::new(next_id),
                        node_id(column, row),
                        node_id(column + 1, to_row),
                    ));
                    next_id += 1;
                }
            }
        }

        let groups = vec![Group::new(
            GroupId::new(next_id),
            "first column",
            (0..params.rows).map(|row| node_id(0, row)).collect(),
        )];
        next_id += 1;

        DiagramDocument {
            version: Some(DOCUMENT_VERSION.to_owned()),
            nodes,
            connections,
            groups,
            next_id: Some(next_id),
            canvas_width: Some(params.columns as f64 * CELL),
            canvas_height: Some(params.rows as f64 * CELL),
            zoom: Some(1.0),
        }
    }

    pub fn fixture(case: Case) -> DiagramDocument {
        diagram(case.params())
    }

    /// Query points: half land between adjacent columns (likely hits), half in empty space.
    pub fn query_points(params: Params, count: usize) -> Vec<Point> {
        (0..count)
            .map(|i| {
                let column = i % (params.columns - 1);
                let row = (i / 2) % params.rows;
                let x = column as f64 * CELL + 180.0;
                let y = row as f64 * CELL + if i % 2 == 0 { 40.0 } else { 200.0 };
                Point::new(x, y)
            })
            .collect()
    }
}
