// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Inf and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Inf CLI entrypoint.
//!
//! Boots the editor against a terminal view: restores (or remembers) a workspace, loads its
//! default document and prints the resulting status. `--hit x,y` reports the connection under a
//! canvas point. `inf import` converts YAML descriptions into diagram documents.

use std::error::Error;
use std::path::{Path, PathBuf};

use inf::editor::{Editor, EditorView, FontOption, Status};
use inf::format::yaml::{find_yaml_files, import_yaml_file, json_path_for};
use inf::model::{Diagram, Point, Selection};
use inf::store::FsWorkspaceProvider;
use tracing_subscriber::EnvFilter;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<workspace-dir>] [--config <file>] [--state-dir <dir>] [--hit <x>,<y>]\n  {program} import <file.yaml|folder> [--output <file.json>] [--check]\n\nWith <workspace-dir> the folder is remembered and opened; without it the last remembered\nworkspace is restored.\n--config reads editor settings from a JSON file.\n--state-dir selects where the last workspace is remembered (default: $XDG_STATE_HOME/inf).\n--hit prints the connection under the given canvas point after loading.\n\nimport converts a YAML description (or every .yaml file below a folder) into a diagram\ndocument written next to it with a .json extension. Nodes are left unplaced.\n--output writes a single converted file elsewhere.\n--check only validates and prints counts.\n\nSet RUST_LOG (e.g. RUST_LOG=inf=debug) for diagnostics."
    );
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Open(CliOptions),
    Import(ImportOptions),
}

#[derive(Debug, Default, Clone, PartialEq)]
struct ImportOptions {
    input: String,
    output: Option<String>,
    check: bool,
}

#[derive(Debug, Default, Clone, PartialEq)]
struct CliOptions {
    workspace_dir: Option<String>,
    config: Option<String>,
    state_dir: Option<String>,
    hit: Option<Point>,
}

fn parse_point(raw: &str) -> Option<Point> {
    let (x, y) = raw.split_once(',')?;
    let x: f64 = x.trim().parse().ok()?;
    let y: f64 = y.trim().parse().ok()?;
    (x.is_finite() && y.is_finite()).then(|| Point::new(x, y))
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                if options.config.is_some() {
                    return Err(());
                }
                options.config = Some(args.next().ok_or(())?);
            }
            "--state-dir" => {
                if options.state_dir.is_some() {
                    return Err(());
                }
                options.state_dir = Some(args.next().ok_or(())?);
            }
            "--hit" => {
                if options.hit.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                options.hit = Some(parse_point(&raw).ok_or(())?);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.workspace_dir.is_some() {
                    return Err(());
                }
                options.workspace_dir = Some(arg);
            }
        }
    }

    Ok(options)
}

fn parse_command(args: impl Iterator<Item = String>) -> Result<Command, ()> {
    let mut args = args.peekable();
    if args.peek().map(String::as_str) == Some("import") {
        args.next();
        return parse_import_options(args).map(Command::Import);
    }
    parse_options(args).map(Command::Open)
}

fn parse_import_options(mut args: impl Iterator<Item = String>) -> Result<ImportOptions, ()> {
    let mut input = None;
    let mut output = None;
    let mut check = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--output" | "-o" => {
                if output.is_some() {
                    return Err(());
                }
                output = Some(args.next().ok_or(())?);
            }
            "--check" => check = true,
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if input.is_some() {
                    return Err(());
                }
                input = Some(arg);
            }
        }
    }

    if check && output.is_some() {
        return Err(());
    }
    Ok(ImportOptions {
        input: input.ok_or(())?,
        output,
        check,
    })
}

fn default_state_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("XDG_STATE_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(dir).join("inf");
    }
    match std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        Some(home) => PathBuf::from(home).join(".local").join("state").join("inf"),
        None => PathBuf::from(".inf"),
    }
}

/// Logs what a graphical surface would draw; the final status goes to stdout.
#[derive(Debug, Default)]
struct TerminalView {
    status: Option<Status>,
}

impl EditorView for TerminalView {
    fn set_status(&mut self, status: &Status) {
        if status.is_warning() {
            tracing::warn!(%status, "status");
        } else {
            tracing::info!(%status, "status");
        }
        self.status = Some(status.clone());
    }

    fn populate_fonts(&mut self, options: &[FontOption]) {
        let selected = options.iter().find(|o| o.selected).map(|o| o.name);
        tracing::debug!(count = options.len(), ?selected, "fonts");
    }

    fn resize_canvas(&mut self, width: f64, height: f64, zoom: f64) {
        tracing::debug!(width, height, zoom, "canvas");
    }

    fn update_breadcrumb(&mut self, path: &[String]) {
        tracing::debug!(path = %path.join(" / "), "breadcrumb");
    }

    fn update_file_path(&mut self, workspace: Option<&str>, file_name: Option<&str>) {
        tracing::debug!(?workspace, ?file_name, "file path");
    }

    fn render(&mut self, diagram: &Diagram, selection: &Selection) {
        tracing::trace!(
            nodes = diagram.nodes().len(),
            connections = diagram.connections().len(),
            selected = ?selection.selected_connection(),
            "render"
        );
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_editor(options: CliOptions) -> Result<(), Box<dyn Error>> {
    let config = inf::config::load_config(options.config.as_deref().map(Path::new))?;
    let state_dir = options
        .state_dir
        .map(PathBuf::from)
        .unwrap_or_else(default_state_dir);
    let provider = FsWorkspaceProvider::new(state_dir);
    if let Some(dir) = &options.workspace_dir {
        provider.remember(Path::new(dir))?;
    }

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

    let mut editor = Editor::new(config, TerminalView::default());
    runtime.block_on(async {
        editor.init();
        editor.restore_workspace(&provider).await;
    });

    println!("{}", editor.status());

    if let Some(point) = options.hit {
        match editor.find_connection_at_point(point) {
            Some(connection) => println!(
                "hit: connection {} ({} -> {})",
                connection.id(),
                connection.from_id(),
                connection.to_id()
            ),
            None => println!("hit: none"),
        }
    }

    Ok(())
}

fn run_import(options: ImportOptions) -> Result<(), Box<dyn Error>> {
    let input = Path::new(&options.input);
    let files = if input.is_dir() {
        if options.output.is_some() {
            return Err("--output needs a single input file".into());
        }
        find_yaml_files(input)?
    } else {
        vec![input.to_path_buf()]
    };
    if files.is_empty() {
        return Err(format!("no .yaml files under {}", input.display()).into());
    }

    let mut failed = 0usize;
    for file in &files {
        let _span = tracing::info_span!("import", path = %file.display()).entered();
        let import = match import_yaml_file(file) {
            Ok(import) => import,
            Err(err) => {
                eprintln!("inf: {}: {err}", file.display());
                failed += 1;
                continue;
            }
        };

        let document = &import.document;
        let counts = format!(
            "{} nodes, {} connections, {} groups",
            document.nodes.len(),
            document.connections.len(),
            document.groups.len()
        );
        if options.check {
            println!("{}: ok ({counts})", file.display());
            continue;
        }

        let target = options
            .output
            .as_deref()
            .map_or_else(|| json_path_for(file), PathBuf::from);
        let mut json = serde_json::to_string_pretty(document)?;
        json.push('\n');
        std::fs::write(&target, json)?;
        println!("{} -> {} ({counts})", file.display(), target.display());
    }

    if failed > 0 {
        return Err(format!("{failed} of {} file(s) failed", files.len()).into());
    }
    Ok(())
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "inf".to_owned());

        let command = match parse_command(args) {
            Ok(command) => command,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_tracing();

        match command {
            Command::Open(options) => run_editor(options),
            Command::Import(options) => run_import(options),
        }
    })();

    if let Err(err) = result {
        eprintln!("inf: {err}");
        std::process::exit(1);
    }
}
