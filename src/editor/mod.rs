// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Inf and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The editor controller.
//!
//! [`Editor`] owns the live diagram, selection, navigation stack and timers, and reports to an
//! [`EditorView`]. Startup is [`Editor::init`] followed by [`Editor::restore_workspace`].

pub mod fonts;
pub mod timers;

use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::EditorConfig;
use crate::model::{
    parse_diagram_document, Connection, ConnectionId, Diagram, DiagramDocument, DocumentError,
    Navigation, NavigationFrame, NodeId, Point, Selection, Subgraph,
};
use crate::query;
use crate::store::{FileHandle, StoreError, WorkspaceDir, WorkspaceProvider};

pub use fonts::{font_options, FontOption, AVAILABLE_FONTS};
pub use timers::{SessionTimers, TimerError, TimerKind};

/// Status line contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Loading,
    NoWorkspace,
    WorkspaceEmpty {
        workspace: String,
        file_name: String,
    },
    Loaded {
        file_name: String,
        nodes: usize,
        connections: usize,
    },
    LoadFailed {
        file_name: String,
        reason: String,
    },
}

impl Status {
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::LoadFailed { .. })
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => f.write_str("Loading..."),
            Self::NoWorkspace => f.write_str("No workspace open. Choose a folder to get started."),
            Self::WorkspaceEmpty {
                workspace,
                file_name,
            } => write!(f, "Workspace: {workspace} (no {file_name} yet, start drawing)"),
            Self::Loaded {
                file_name,
                nodes,
                connections,
            } => write!(
                f,
                "Loaded {file_name} ({nodes} nodes, {connections} connections)"
            ),
            Self::LoadFailed { file_name, reason } => {
                write!(f, "Warning: could not load {file_name}: {reason}")
            }
        }
    }
}

/// Everything the editor asks of the surface it is displayed on.
pub trait EditorView {
    fn set_status(&mut self, status: &Status);

    fn populate_fonts(&mut self, options: &[FontOption]);

    fn resize_canvas(&mut self, width: f64, height: f64, zoom: f64);

    fn update_breadcrumb(&mut self, path: &[String]);

    fn update_file_path(&mut self, workspace: Option<&str>, file_name: Option<&str>);

    fn render(&mut self, diagram: &Diagram, selection: &Selection);
}

/// The file the live diagram came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFile {
    pub name: String,
    pub path: PathBuf,
}

impl ActiveFile {
    pub fn from_handle(handle: &impl FileHandle) -> Self {
        Self {
            name: handle.name().to_owned(),
            path: handle.path().to_path_buf(),
        }
    }
}

#[derive(Debug)]
pub enum LoadError {
    Store(StoreError),
    Document(DocumentError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Document(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Document(err) => Some(err),
        }
    }
}

impl From<StoreError> for LoadError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<DocumentError> for LoadError {
    fn from(value: DocumentError) -> Self {
        Self::Document(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    MissingNode(NodeId),
    NoSubgraph(NodeId),
    AtRoot,
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingNode(id) => write!(f, "node {id} does not exist"),
            Self::NoSubgraph(id) => write!(f, "node {id} has no subgraph"),
            Self::AtRoot => f.write_str("already at the root diagram"),
        }
    }
}

impl std::error::Error for NavigationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditingError {
    MissingNode(NodeId),
    Timer(TimerError),
}

impl fmt::Display for EditingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingNode(id) => write!(f, "node {id} does not exist"),
            Self::Timer(source) => write!(f, "cannot start the cursor blink: {source}"),
        }
    }
}

impl std::error::Error for EditingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Timer(source) => Some(source),
            Self::MissingNode(_) => None,
        }
    }
}

impl From<TimerError> for EditingError {
    fn from(value: TimerError) -> Self {
        Self::Timer(value)
    }
}

/// Where [`Editor::enter_subgraph`] went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubgraphTarget {
    /// The embedded diagram is now live.
    Embedded,
    /// The subgraph lives in another workspace file; the caller decides whether to open it.
    File(String),
}

pub struct Editor<V> {
    config: EditorConfig,
    view: V,
    diagram: Diagram,
    selection: Selection,
    navigation: Navigation,
    timers: SessionTimers,
    fonts: Vec<FontOption>,
    workspace_name: Option<String>,
    active_file: Option<ActiveFile>,
    status: Status,
    cursor_visible: Arc<AtomicBool>,
}

impl<V: EditorView> Editor<V> {
    pub fn new(config: EditorConfig, view: V) -> Self {
        let diagram = Diagram::empty(config.canvas);
        let fonts = font_options(&config.font_family);
        Self {
            config,
            view,
            diagram,
            selection: Selection::default(),
            navigation: Navigation::default(),
            timers: SessionTimers::default(),
            fonts,
            workspace_name: None,
            active_file: None,
            status: Status::Loading,
            cursor_visible: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Synchronous part of startup: cancels leftover timers, fills the font selector, sizes the
    /// canvas and shows the loading status.
    pub fn init(&mut self) {
        self.timers.reset();
        self.fonts = font_options(&self.config.font_family);
        self.view.populate_fonts(&self.fonts);
        self.relayout();
        self.set_status(Status::Loading);
    }

    /// Reopens the last workspace and loads its default document.
    ///
    /// Never fails: every outcome ends in a status message. Provider failures are logged and
    /// leave the editor without a workspace.
    pub async fn restore_workspace<P: WorkspaceProvider>(&mut self, provider: &P) {
        if let Err(err) = self.try_restore_workspace(provider).await {
            tracing::warn!(error = %err, "workspace restore failed");
            self.workspace_name = None;
            self.refresh_file_path();
            self.set_status(Status::NoWorkspace);
        }
    }

    async fn try_restore_workspace<P: WorkspaceProvider>(
        &mut self,
        provider: &P,
    ) -> Result<(), StoreError> {
        let Some(dir) = provider.request_directory().await? else {
            tracing::debug!("no workspace to restore");
            self.set_status(Status::NoWorkspace);
            return Ok(());
        };

        self.workspace_name = Some(dir.name().to_owned());
        self.refresh_file_path();

        let file_name = self.config.default_file_name.clone();
        let handle = match dir.open_file(&file_name).await {
            Ok(handle) => handle,
            Err(err) if err.is_not_found() => {
                tracing::info!(workspace = dir.name(), file = %file_name, "workspace has no default document");
                self.set_status(Status::WorkspaceEmpty {
                    workspace: dir.name().to_owned(),
                    file_name,
                });
                return Ok(());
            }
            Err(err) => {
                self.report_load_failure(&file_name, &LoadError::Store(err));
                return Ok(());
            }
        };

        // Load failures are already reported on the status line.
        let _ = self.open_document(&handle).await;
        Ok(())
    }

    /// Reads, parses and validates `handle`, then makes it the live diagram.
    ///
    /// On failure the current diagram is left exactly as it was and a warning status is shown.
    pub async fn open_document<F: FileHandle>(&mut self, handle: &F) -> Result<(), LoadError> {
        let result = match handle.read_to_string().await {
            Ok(text) => self.load_document_text(&text, ActiveFile::from_handle(handle)),
            Err(err) => Err(LoadError::Store(err)),
        };
        if let Err(err) = &result {
            self.report_load_failure(handle.name(), err);
        }
        result
    }

    /// Parses and validates `text` as a whole before anything live is touched.
    pub fn load_document_text(&mut self, text: &str, file: ActiveFile) -> Result<(), LoadError> {
        let document = parse_diagram_document(text)?;
        self.apply_document(document, file);
        Ok(())
    }

    fn apply_document(&mut self, document: DiagramDocument, file: ActiveFile) {
        self.diagram = Diagram::from_document(document, self.config.canvas);
        self.selection.clear();
        self.navigation.clear();
        self.timers.cancel(TimerKind::CursorBlink);
        self.cursor_visible.store(true, Ordering::Relaxed);

        let status = Status::Loaded {
            file_name: file.name.clone(),
            nodes: self.diagram.nodes().len(),
            connections: self.diagram.connections().len(),
        };
        tracing::info!(
            file = %file.name,
            nodes = self.diagram.nodes().len(),
            connections = self.diagram.connections().len(),
            next_id = self.diagram.next_id(),
            "diagram loaded"
        );
        self.active_file = Some(file);
        self.refresh_file_path();
        self.view.update_breadcrumb(self.navigation.current_path());
        self.relayout();
        self.set_status(status);
    }

    fn report_load_failure(&mut self, file_name: &str, err: &LoadError) {
        tracing::warn!(file = file_name, error = %err, "could not load diagram");
        self.set_status(Status::LoadFailed {
            file_name: file_name.to_owned(),
            reason: err.to_string(),
        });
    }

    /// Topmost connection within the configured hit tolerance of `point`.
    pub fn find_connection_at_point(&self, point: Point) -> Option<&Connection> {
        query::find_connection_at_point(
            self.diagram.connections(),
            &self.diagram,
            point,
            self.config.hit_tolerance,
        )
    }

    /// Selects whatever connection is under `point`, or clears the connection selection.
    pub fn select_connection_at(&mut self, point: Point) -> Option<ConnectionId> {
        let hit = self.find_connection_at_point(point).map(Connection::id);
        self.selection.select_connection(hit);
        self.view.render(&self.diagram, &self.selection);
        hit
    }

    /// Starts editing the text of `node_id` and its cursor blink. Nothing changes when the blink
    /// cannot be started.
    pub fn begin_editing(&mut self, node_id: NodeId) -> Result<(), EditingError> {
        if self.diagram.node(node_id).is_none() {
            return Err(EditingError::MissingNode(node_id));
        }
        let visible = Arc::clone(&self.cursor_visible);
        self.timers
            .start_cursor_blink(self.config.cursor_blink, move || {
                visible.fetch_xor(true, Ordering::Relaxed);
            })?;

        self.selection.set_editing_node(Some(node_id));
        self.cursor_visible.store(true, Ordering::Relaxed);
        self.view.render(&self.diagram, &self.selection);
        Ok(())
    }

    pub fn end_editing(&mut self) {
        self.timers.cancel(TimerKind::CursorBlink);
        self.cursor_visible.store(true, Ordering::Relaxed);
        if self.selection.editing_node().is_some() {
            self.selection.set_editing_node(None);
            self.view.render(&self.diagram, &self.selection);
        }
    }

    /// Drills into the subgraph of `node_id`. Embedded subgraphs were validated with the document
    /// that carries them.
    pub fn enter_subgraph(&mut self, node_id: NodeId) -> Result<SubgraphTarget, NavigationError> {
        let node = self
            .diagram
            .node(node_id)
            .ok_or(NavigationError::MissingNode(node_id))?;
        let child = match node.subgraph() {
            None => return Err(NavigationError::NoSubgraph(node_id)),
            Some(Subgraph::File(path)) => return Ok(SubgraphTarget::File(path.clone())),
            Some(Subgraph::Embedded(document)) => document.as_ref().clone(),
        };
        let label = node.text().to_owned();

        self.end_editing();
        let mut child = Diagram::from_document(child, self.config.canvas);
        child.reserve_ids_below(self.diagram.next_id());
        let parent = std::mem::replace(&mut self.diagram, child);
        self.navigation
            .push(NavigationFrame::new(parent, node_id), label);
        self.selection.clear();

        tracing::debug!(node = %node_id, depth = self.navigation.depth(), "entered subgraph");
        self.view.update_breadcrumb(self.navigation.current_path());
        self.relayout();
        Ok(SubgraphTarget::Embedded)
    }

    /// Writes the live diagram back into its parent node and makes the parent live again.
    pub fn exit_subgraph(&mut self) -> Result<(), NavigationError> {
        let frame = self.navigation.pop().ok_or(NavigationError::AtRoot)?;
        let (mut parent, node_id) = frame.into_parts();

        self.end_editing();
        parent.reserve_ids_below(self.diagram.next_id());
        let child = self.diagram.to_document();
        match parent.node_mut(node_id) {
            Some(node) => node.set_subgraph(Some(Subgraph::Embedded(Box::new(child)))),
            None => tracing::warn!(node = %node_id, "subgraph owner vanished; dropping child edits"),
        }
        self.diagram = parent;
        self.selection.clear();

        tracing::debug!(node = %node_id, depth = self.navigation.depth(), "left subgraph");
        self.view.update_breadcrumb(self.navigation.current_path());
        self.relayout();
        Ok(())
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn diagram_mut(&mut self) -> &mut Diagram {
        &mut self.diagram
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    pub fn timers(&self) -> &SessionTimers {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut SessionTimers {
        &mut self.timers
    }

    pub fn fonts(&self) -> &[FontOption] {
        &self.fonts
    }

    pub fn workspace_name(&self) -> Option<&str> {
        self.workspace_name.as_deref()
    }

    pub fn active_file(&self) -> Option<&ActiveFile> {
        self.active_file.as_ref()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible.load(Ordering::Relaxed)
    }

    fn set_status(&mut self, status: Status) {
        self.view.set_status(&status);
        self.status = status;
    }

    fn refresh_file_path(&mut self) {
        let file_name = self.active_file.as_ref().map(|file| file.name.as_str());
        self.view
            .update_file_path(self.workspace_name.as_deref(), file_name);
    }

    fn relayout(&mut self) {
        let (width, height) = self.diagram.canvas_size();
        self.view.resize_canvas(width, height, self.diagram.zoom());
        self.view.render(&self.diagram, &self.selection);
    }
}
