// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Inf and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use inf::config::{load_config, EditorConfig};
use inf::editor::{Editor, EditorView, FontOption, Status};
use inf::model::{ConnectionId, Diagram, NodeId, NodeKind, Point, Selection};
use inf::store::FsWorkspaceProvider;

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = std::env::temp_dir();
        path.push(format!("inf-it-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        fs::create_dir_all(&path).expect("create temp dir");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn read_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("workspace_restore")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|err| panic!("failed to read {path:?}: {err}"))
}

#[derive(Debug, Default)]
struct StatusLog {
    statuses: Vec<String>,
    canvas: Option<(f64, f64, f64)>,
}

impl EditorView for StatusLog {
    fn set_status(&mut self, status: &Status) {
        self.statuses.push(status.to_string());
    }

    fn populate_fonts(&mut self, _options: &[FontOption]) {}

    fn resize_canvas(&mut self, width: f64, height: f64, zoom: f64) {
        self.canvas = Some((width, height, zoom));
    }

    fn update_breadcrumb(&mut self, _path: &[String]) {}

    fn update_file_path(&mut self, _workspace: Option<&str>, _file_name: Option<&str>) {}

    fn render(&mut self, _diagram: &Diagram, _selection: &Selection) {}
}

/// A temp workspace called `project` with an optional `root.json`, remembered by a provider.
struct Workspace {
    _tmp: TempDir,
    provider: FsWorkspaceProvider,
}

fn workspace(prefix: &str, root_json: Option<&str>) -> Workspace {
    let tmp = TempDir::new(prefix);
    let dir = tmp.path().join("project");
    fs::create_dir_all(&dir).expect("create workspace");
    if let Some(fixture) = root_json {
        fs::write(dir.join("root.json"), read_fixture(fixture)).expect("write root.json");
    }
    let provider = FsWorkspaceProvider::new(tmp.path().join("state"));
    provider.remember(&dir).expect("remember workspace");
    Workspace {
        _tmp: tmp,
        provider,
    }
}

fn restore(config: EditorConfig, provider: &FsWorkspaceProvider) -> Editor<StatusLog> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime");
    let mut editor = Editor::new(config, StatusLog::default());
    runtime.block_on(async {
        editor.init();
        editor.restore_workspace(provider).await;
    });
    editor
}

#[test]
fn remembered_workspace_loads_and_answers_hit_queries() {
    let ws = workspace("load", Some("flow.json"));
    let editor = restore(EditorConfig::default(), &ws.provider);

    assert_eq!(
        editor.view().statuses,
        vec!["Loading...", "Loaded root.json (5 nodes, 3 connections)"]
    );
    assert_eq!(editor.workspace_name(), Some("project"));
    assert_eq!(editor.view().canvas, Some((1600.0, 1200.0, 1.0)));

    let diagram = editor.diagram();
    assert_eq!(diagram.next_id(), 10);
    assert_eq!(diagram.node_map().len(), 5);
    assert_eq!(
        diagram.node(NodeId::new(5)).map(|n| n.kind()),
        Some(NodeKind::Table)
    );
    assert_eq!(diagram.groups()[0].node_ids(), &[NodeId::new(1), NodeId::new(2)]);

    // Rectangle edge (220, 140) to the diamond's left vertex (400, 140).
    assert_eq!(
        editor.find_connection_at_point(Point::new(310.0, 145.0)).map(|c| c.id()),
        Some(ConnectionId::new(6))
    );
    // Diamond's right vertex (500, 140) to the circle's left edge (700, 140).
    assert_eq!(
        editor.find_connection_at_point(Point::new(600.0, 138.0)).map(|c| c.id()),
        Some(ConnectionId::new(7))
    );
    assert!(editor.find_connection_at_point(Point::new(310.0, 170.0)).is_none());
}

#[test]
fn configured_tolerance_narrows_hits() {
    let ws = workspace("tolerance", Some("flow.json"));
    let config_path = ws._tmp.path().join("inf.json");
    fs::write(&config_path, r#"{"hitTolerance": 2}"#).expect("write config");
    let config = load_config(Some(&config_path)).expect("config");

    let editor = restore(config, &ws.provider);
    assert!(editor.find_connection_at_point(Point::new(310.0, 145.0)).is_none());
    assert_eq!(
        editor.find_connection_at_point(Point::new(310.0, 141.0)).map(|c| c.id()),
        Some(ConnectionId::new(6))
    );
}

#[test]
fn workspace_without_root_json_starts_empty() {
    let ws = workspace("empty", None);
    let editor = restore(EditorConfig::default(), &ws.provider);

    assert_eq!(
        editor.status().to_string(),
        "Workspace: project (no root.json yet, start drawing)"
    );
    assert!(editor.diagram().nodes().is_empty());
    assert_eq!(editor.diagram().next_id(), 1);
}

#[test]
fn invalid_root_json_warns_and_keeps_an_empty_canvas() {
    let ws = workspace("invalid", Some("connections_not_array.json"));
    let editor = restore(EditorConfig::default(), &ws.provider);

    assert!(editor.status().is_warning());
    assert!(editor.status().to_string().contains("connections"));
    assert!(editor.diagram().nodes().is_empty());
    assert!(editor.active_file().is_none());
}

#[test]
fn first_run_has_no_workspace() {
    let tmp = TempDir::new("first-run");
    let provider = FsWorkspaceProvider::new(tmp.path().join("state"));
    let editor = restore(EditorConfig::default(), &provider);

    assert_eq!(editor.status(), &Status::NoWorkspace);
    assert!(editor.workspace_name().is_none());
}
