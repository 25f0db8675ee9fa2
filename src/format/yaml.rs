// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Inf and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! YAML diagram descriptions.
//!
//! A YAML file lists nodes by their text. Connections and groups name nodes either by 0-based
//! position in `nodes` or by exact text. Ids are handed out in file order: nodes first, then
//! connections, then groups. Nodes come out unplaced with their kind's default size; positioning
//! them is a separate layout step.
//!
//! ```yaml
//! nodes:
//!   - text: Client
//!   - text: Store
//!     type: circle
//!     subgraph: storage.yaml
//! connections:
//!   - from: Client
//!     to: 1
//! groups:
//!   - name: Backend
//!     nodes: [Store]
//! ```

use std::collections::{BTreeMap, HashMap};
use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;
use serde_json::{json, Value};

use crate::model::node::{TABLE_CELL_HEIGHT, TABLE_CELL_WIDTH};
use crate::model::{
    Connection, ConnectionId, DiagramDocument, Group, GroupId, Node, NodeId, NodeKind, Subgraph,
    DOCUMENT_VERSION,
};

pub const YAML_EXTENSION: &str = "yaml";
pub const DEFAULT_TABLE_ROWS: usize = 3;
pub const DEFAULT_TABLE_COLS: usize = 3;
const DEFAULT_GROUP_NAME: &str = "Group";
const DEFAULT_TEXT_ALIGN: &str = "center";
const TEXT_ALIGNMENTS: [&str; 3] = ["left", "center", "right"];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct YamlDiagram {
    nodes: Vec<YamlNode>,
    connections: Vec<YamlConnection>,
    groups: Vec<YamlGroup>,
}

#[derive(Debug, Deserialize)]
struct YamlNode {
    #[serde(default)]
    text: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    align: Option<String>,
    #[serde(default)]
    table: Option<YamlTable>,
    #[serde(default)]
    subgraph: Option<serde_yaml::Value>,
}

/// Either a markdown table or an explicit grid with `"[row, col]"` keyed cells.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum YamlTable {
    Markdown(String),
    Grid(TableGrid),
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct TableGrid {
    rows: usize,
    cols: usize,
    cells: BTreeMap<String, serde_yaml::Value>,
}

impl Default for TableGrid {
    fn default() -> Self {
        Self {
            rows: DEFAULT_TABLE_ROWS,
            cols: DEFAULT_TABLE_COLS,
            cells: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct YamlConnection {
    from: NodeRef,
    to: NodeRef,
    #[serde(default = "default_directed")]
    directed: bool,
}

#[derive(Debug, Deserialize)]
struct YamlGroup {
    #[serde(default = "default_group_name")]
    name: String,
    #[serde(default)]
    nodes: Vec<NodeRef>,
}

fn default_directed() -> bool {
    true
}

fn default_group_name() -> String {
    DEFAULT_GROUP_NAME.to_owned()
}

/// How a connection or group names a node.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum NodeRef {
    /// 0-based position in `nodes`.
    Index(i64),
    Text(String),
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "#{index}"),
            Self::Text(text) => write!(f, "'{text}'"),
        }
    }
}

/// Parts of the description that were dropped. Conversion still succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportWarning {
    UnsupportedSubgraph { node: usize },
    MissingSubgraphFile { node: usize, hint: String },
    UnresolvedConnection { connection: usize, reference: NodeRef },
    UnresolvedGroupMember { group: String, reference: NodeRef },
    EmptyGroup { group: String },
}

impl fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedSubgraph { node } => write!(
                f,
                "node {node}: only file subgraphs are supported, use `subgraph: \"file.yaml\"`"
            ),
            Self::MissingSubgraphFile { node, hint } => {
                write!(f, "node {node}: subgraph file for '{hint}' not found")
            }
            Self::UnresolvedConnection {
                connection,
                reference,
            } => write!(
                f,
                "connection {connection}: node {reference} not found, connection skipped"
            ),
            Self::UnresolvedGroupMember { group, reference } => {
                write!(f, "group '{group}': node {reference} not found")
            }
            Self::EmptyGroup { group } => {
                write!(f, "group '{group}' has no valid nodes, group skipped")
            }
        }
    }
}

#[derive(Debug)]
pub enum ImportError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    NotYaml {
        path: PathBuf,
    },
    Yaml(serde_yaml::Error),
    NotAMapping,
    NoNodes,
    UnknownNodeType {
        node: usize,
        name: String,
    },
    InvalidAlign {
        node: usize,
        value: String,
    },
    InvalidTable {
        node: usize,
        reason: &'static str,
    },
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to read {}: {source}", path.display()),
            Self::NotYaml { path } => write!(f, "not a .yaml file: {}", path.display()),
            Self::Yaml(source) => write!(f, "invalid YAML: {source}"),
            Self::NotAMapping => f.write_str("YAML root must be a mapping"),
            Self::NoNodes => f.write_str("no nodes defined"),
            Self::UnknownNodeType { node, name } => write!(
                f,
                "node {node}: unknown type '{name}' (expected rectangle, text, code, circle, diamond or table)"
            ),
            Self::InvalidAlign { node, value } => {
                write!(f, "node {node}: invalid align '{value}' (expected left, center or right)")
            }
            Self::InvalidTable { node, reason } => write!(f, "node {node}: invalid table: {reason}"),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Yaml(source) => Some(source),
            _ => None,
        }
    }
}

/// A converted description and whatever had to be dropped on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct YamlImport {
    pub document: DiagramDocument,
    pub warnings: Vec<ImportWarning>,
}

/// Reads and converts one `.yaml` file. Subgraph files are resolved next to it.
pub fn import_yaml_file(path: &Path) -> Result<YamlImport, ImportError> {
    if path.extension().and_then(OsStr::to_str) != Some(YAML_EXTENSION) {
        return Err(ImportError::NotYaml {
            path: path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let base_dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    tracing::debug!(path = %path.display(), "converting yaml");
    convert_yaml_str(&text, base_dir)
}

/// Converts YAML text; `base_dir` anchors relative subgraph hints.
pub fn convert_yaml_str(text: &str, base_dir: &Path) -> Result<YamlImport, ImportError> {
    if text.trim().is_empty() {
        return Err(ImportError::NoNodes);
    }
    let raw: serde_yaml::Value = serde_yaml::from_str(text).map_err(ImportError::Yaml)?;
    if !raw.is_mapping() {
        return Err(ImportError::NotAMapping);
    }
    let diagram: YamlDiagram = serde_yaml::from_value(raw).map_err(ImportError::Yaml)?;
    if diagram.nodes.is_empty() {
        return Err(ImportError::NoNodes);
    }

    let import = Conversion::new(base_dir).run(diagram)?;
    tracing::info!(
        nodes = import.document.nodes.len(),
        connections = import.document.connections.len(),
        groups = import.document.groups.len(),
        warnings = import.warnings.len(),
        "converted yaml"
    );
    Ok(import)
}

/// Finds the YAML file a subgraph hint points at.
///
/// `name.yaml` is taken relative to `base_dir`. A bare `name` is looked up as
/// `name/name.yaml` first, then as `name.yaml`.
pub fn resolve_subgraph_path(base_dir: &Path, hint: &str) -> Option<PathBuf> {
    let candidates = if Path::new(hint).extension() == Some(OsStr::new(YAML_EXTENSION)) {
        vec![base_dir.join(hint)]
    } else {
        vec![
            base_dir.join(hint).join(format!("{hint}.{YAML_EXTENSION}")),
            base_dir.join(format!("{hint}.{YAML_EXTENSION}")),
        ]
    };
    candidates.into_iter().find(|candidate| candidate.is_file())
}

/// The document a converted YAML file is written to: same place, `.json` extension.
pub fn json_path_for(yaml_path: &Path) -> PathBuf {
    yaml_path.with_extension("json")
}

/// Every `.yaml` file below `dir`, sorted.
pub fn find_yaml_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension() == Some(OsStr::new(YAML_EXTENSION)) {
                found.push(path);
            }
        }
    }
    found.sort();
    Ok(found)
}

struct Conversion<'a> {
    base_dir: &'a Path,
    next_id: u64,
    warnings: Vec<ImportWarning>,
}

impl<'a> Conversion<'a> {
    fn new(base_dir: &'a Path) -> Self {
        Self {
            base_dir,
            next_id: 1,
            warnings: Vec::new(),
        }
    }

    fn run(mut self, diagram: YamlDiagram) -> Result<YamlImport, ImportError> {
        let mut nodes = Vec::with_capacity(diagram.nodes.len());
        // Later nodes win on duplicate text, so references resolve to the last one.
        let mut ids_by_text: HashMap<&str, NodeId> = HashMap::new();
        for (index, yaml) in diagram.nodes.iter().enumerate() {
            let node_id = NodeId::new(self.take_id());
            nodes.push(self.node(node_id, index, yaml)?);
            ids_by_text.insert(yaml.text.as_str(), node_id);
        }
        let resolve = |reference: &NodeRef| -> Option<NodeId> {
            let text = match reference {
                NodeRef::Index(index) => usize::try_from(*index)
                    .ok()
                    .and_then(|index| diagram.nodes.get(index))
                    .map(|node| node.text.as_str())?,
                NodeRef::Text(text) => text.as_str(),
            };
            ids_by_text.get(text).copied()
        };

        let mut connections = Vec::new();
        for (index, yaml) in diagram.connections.iter().enumerate() {
            let (from_id, to_id) = match (resolve(&yaml.from), resolve(&yaml.to)) {
                (Some(from_id), Some(to_id)) => (from_id, to_id),
                (from_id, _) => {
                    let reference = if from_id.is_none() { &yaml.from } else { &yaml.to };
                    self.warn(ImportWarning::UnresolvedConnection {
                        connection: index,
                        reference: reference.clone(),
                    });
                    continue;
                }
            };
            let connection = Connection::new(ConnectionId::new(self.take_id()), from_id, to_id);
            connections.push(if yaml.directed {
                connection
            } else {
                connection.undirected()
            });
        }

        let mut groups = Vec::new();
        for yaml in &diagram.groups {
            let mut members = Vec::with_capacity(yaml.nodes.len());
            for reference in &yaml.nodes {
                match resolve(reference) {
                    Some(node_id) => members.push(node_id),
                    None => self.warn(ImportWarning::UnresolvedGroupMember {
                        group: yaml.name.clone(),
                        reference: reference.clone(),
                    }),
                }
            }
            if members.is_empty() {
                self.warn(ImportWarning::EmptyGroup {
                    group: yaml.name.clone(),
                });
                continue;
            }
            groups.push(Group::new(
                GroupId::new(self.take_id()),
                yaml.name.clone(),
                members,
            ));
        }

        Ok(YamlImport {
            document: DiagramDocument {
                version: Some(DOCUMENT_VERSION.to_owned()),
                nodes,
                connections,
                groups,
                next_id: Some(self.next_id),
                ..DiagramDocument::default()
            },
            warnings: self.warnings,
        })
    }

    fn node(&mut self, node_id: NodeId, index: usize, yaml: &YamlNode) -> Result<Node, ImportError> {
        let kind = match yaml.kind.as_deref() {
            None => NodeKind::Rectangle,
            Some(name) => NodeKind::from_name(name).ok_or_else(|| ImportError::UnknownNodeType {
                node: index,
                name: name.to_owned(),
            })?,
        };
        let align = yaml.align.as_deref().unwrap_or(DEFAULT_TEXT_ALIGN);
        if !TEXT_ALIGNMENTS.contains(&align) {
            return Err(ImportError::InvalidAlign {
                node: index,
                value: align.to_owned(),
            });
        }

        let shaped = if kind == NodeKind::Table {
            let cells = match &yaml.table {
                Some(YamlTable::Markdown(markdown)) => markdown_cells(index, markdown)?,
                Some(YamlTable::Grid(grid)) => grid_cells(grid),
                None => grid_cells(&TableGrid::default()),
            };
            let rows = cells.len();
            let cols = cells.first().map_or(0, Vec::len);
            Node::table(
                node_id,
                0.0,
                0.0,
                vec![TABLE_CELL_WIDTH; cols],
                vec![TABLE_CELL_HEIGHT; rows],
            )
            .with_cells(Value::Array(cells.into_iter().map(Value::Array).collect()))
        } else {
            Node::unplaced(node_id, kind)
        };
        let node = shaped.with_text(yaml.text.clone()).with_text_align(align);

        Ok(match self.subgraph(index, yaml.subgraph.as_ref()) {
            Some(reference) => node.with_subgraph(Subgraph::File(reference)),
            None => node,
        })
    }

    /// The `.json` reference for a node's subgraph hint, relative to the base directory.
    fn subgraph(&mut self, index: usize, hint: Option<&serde_yaml::Value>) -> Option<String> {
        let hint = match hint? {
            serde_yaml::Value::String(hint) => hint,
            _ => {
                self.warn(ImportWarning::UnsupportedSubgraph { node: index });
                return None;
            }
        };
        let Some(found) = resolve_subgraph_path(self.base_dir, hint) else {
            self.warn(ImportWarning::MissingSubgraphFile {
                node: index,
                hint: hint.clone(),
            });
            return None;
        };
        let relative = found
            .strip_prefix(self.base_dir)
            .unwrap_or(&found)
            .with_extension("json");
        let parts: Vec<String> = relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                Component::ParentDir => Some("..".to_owned()),
                _ => None,
            })
            .collect();
        Some(parts.join("/"))
    }

    fn take_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn warn(&mut self, warning: ImportWarning) {
        tracing::warn!(%warning, "yaml import");
        self.warnings.push(warning);
    }
}

fn cell(text: String, align: &str) -> Value {
    json!({ "text": text, "textAlign": align })
}

fn grid_cells(grid: &TableGrid) -> Vec<Vec<Value>> {
    (0..grid.rows.max(1))
        .map(|row| {
            (0..grid.cols.max(1))
                .map(|col| {
                    let text = grid
                        .cells
                        .get(&format!("[{row}, {col}]"))
                        .map(scalar_text)
                        .unwrap_or_default();
                    cell(text, DEFAULT_TEXT_ALIGN)
                })
                .collect()
        })
        .collect()
}

fn scalar_text(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(text) => text.clone(),
        serde_yaml::Value::Number(number) => number.to_string(),
        serde_yaml::Value::Bool(flag) => flag.to_string(),
        _ => String::new(),
    }
}

/// Cells of a markdown table. Column alignment comes from the `|:---|---:|` separator line.
fn markdown_cells(node: usize, markdown: &str) -> Result<Vec<Vec<Value>>, ImportError> {
    let lines: Vec<&str> = markdown
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let Some(separator) = lines.iter().find(|line| is_separator(line)) else {
        return Err(ImportError::InvalidTable {
            node,
            reason: "missing separator line like |---|---|",
        });
    };
    let alignments: Vec<&str> = split_row(separator).into_iter().map(column_align).collect();
    let rows: Vec<Vec<&str>> = lines
        .iter()
        .filter(|line| !is_separator(line))
        .map(|line| split_row(line))
        .collect();
    if rows.is_empty() {
        return Err(ImportError::InvalidTable {
            node,
            reason: "no rows besides the separator",
        });
    }

    let cols = rows.iter().map(Vec::len).max().unwrap_or(0).max(1);
    Ok(rows
        .iter()
        .map(|row| {
            (0..cols)
                .map(|col| {
                    let text = row.get(col).copied().unwrap_or_default();
                    let align = alignments.get(col).copied().unwrap_or("left");
                    cell(text.to_owned(), align)
                })
                .collect()
        })
        .collect())
}

fn is_separator(line: &str) -> bool {
    line.contains("---") && line.contains('|')
}

fn split_row(line: &str) -> Vec<&str> {
    let mut cells: Vec<&str> = line.split('|').map(str::trim).collect();
    if cells.first().is_some_and(|cell| cell.is_empty()) {
        cells.remove(0);
    }
    if cells.last().is_some_and(|cell| cell.is_empty()) {
        cells.pop();
    }
    cells
}

fn column_align(separator_cell: &str) -> &'static str {
    match (separator_cell.starts_with(':'), separator_cell.ends_with(':')) {
        (true, true) => "center",
        (false, true) => "right",
        _ => "left",
    }
}
