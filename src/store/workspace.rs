// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Inf and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::fs;
use std::io;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// File the workspace provider keeps the last chosen directory in.
const LAST_WORKSPACE_FILENAME: &str = "last-workspace.json";

/// Diagram loaded from a workspace on start-up.
pub const DEFAULT_DOCUMENT_FILENAME: &str = "root.json";

/// Coarse classification callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    NotFound,
    PermissionDenied,
    Other,
}

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    NotADirectory {
        path: PathBuf,
    },
    NotAFile {
        path: PathBuf,
    },
    InvalidRelativePath {
        field: &'static str,
        value: PathBuf,
    },
}

impl StoreError {
    pub fn kind(&self) -> StorageErrorKind {
        match self {
            Self::Io { source, .. } => match source.kind() {
                io::ErrorKind::NotFound => StorageErrorKind::NotFound,
                io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
                _ => StorageErrorKind::Other,
            },
            Self::NotADirectory { .. }
            | Self::NotAFile { .. }
            | Self::Json { .. }
            | Self::InvalidRelativePath { .. } => StorageErrorKind::Other,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == StorageErrorKind::NotFound
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::NotADirectory { path } => write!(f, "not a directory: {path:?}"),
            Self::NotAFile { path } => write!(f, "not a file: {path:?}"),
            Self::InvalidRelativePath { field, value } => {
                write!(f, "invalid relative path for {field}: {value:?}")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::NotADirectory { .. } => None,
            Self::NotAFile { .. } => None,
            Self::InvalidRelativePath { .. } => None,
        }
    }
}

/// Hands out the workspace directory the user granted earlier, if it is still usable.
#[allow(async_fn_in_trait)]
pub trait WorkspaceProvider {
    type Dir: WorkspaceDir;

    /// `Ok(None)` when no workspace was ever chosen or access to it is gone.
    async fn request_directory(&self) -> Result<Option<Self::Dir>, StoreError>;
}

/// A granted workspace directory.
#[allow(async_fn_in_trait)]
pub trait WorkspaceDir {
    type File: FileHandle;

    fn name(&self) -> &str;

    /// Opens an existing file. A missing file is reported with [`StorageErrorKind::NotFound`].
    async fn open_file(&self, relative: &str) -> Result<Self::File, StoreError>;
}

#[allow(async_fn_in_trait)]
pub trait FileHandle {
    fn name(&self) -> &str;

    fn path(&self) -> &Path;

    async fn read_to_string(&self) -> Result<String, StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct LastWorkspaceJson {
    path: PathBuf,
}

/// Filesystem-backed provider that remembers the last workspace in a small JSON record.
#[derive(Debug, Clone)]
pub struct FsWorkspaceProvider {
    state_dir: PathBuf,
}

impl FsWorkspaceProvider {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
        }
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    pub fn record_path(&self) -> PathBuf {
        self.state_dir.join(LAST_WORKSPACE_FILENAME)
    }

    /// Records `dir` as the workspace to restore on the next start.
    pub fn remember(&self, dir: &Path) -> Result<(), StoreError> {
        let md = fs::metadata(dir).map_err(|source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        if !md.is_dir() {
            return Err(StoreError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }

        let absolute = dir.canonicalize().map_err(|source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let record_path = self.record_path();
        let json = serde_json::to_string_pretty(&LastWorkspaceJson { path: absolute })
            .map_err(|source| StoreError::Json {
                path: record_path.clone(),
                source,
            })?;
        write_atomic(&self.state_dir, &record_path, json.as_bytes())
    }

    pub fn forget(&self) -> Result<(), StoreError> {
        let record_path = self.record_path();
        match fs::remove_file(&record_path) {
            Ok(()) => Ok(()),
            Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                path: record_path,
                source,
            }),
        }
    }
}

impl WorkspaceProvider for FsWorkspaceProvider {
    type Dir = FsWorkspaceDir;

    async fn request_directory(&self) -> Result<Option<FsWorkspaceDir>, StoreError> {
        let record_path = self.record_path();
        let record = match tokio::fs::read_to_string(&record_path).await {
            Ok(record) => record,
            Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: record_path,
                    source,
                })
            }
        };
        let record: LastWorkspaceJson =
            serde_json::from_str(&record).map_err(|source| StoreError::Json {
                path: record_path.clone(),
                source,
            })?;

        match tokio::fs::metadata(&record.path).await {
            Ok(md) if md.is_dir() => Ok(Some(FsWorkspaceDir::new(record.path))),
            Ok(_) => {
                tracing::debug!(path = ?record.path, "remembered workspace is no longer a directory");
                Ok(None)
            }
            Err(source)
                if matches!(
                    source.kind(),
                    io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
                ) =>
            {
                tracing::debug!(path = ?record.path, error = %source, "remembered workspace is gone");
                Ok(None)
            }
            Err(source) => Err(StoreError::Io {
                path: record.path,
                source,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsWorkspaceDir {
    name: String,
    root: PathBuf,
}

impl FsWorkspaceDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = root
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("workspace")
            .to_owned();
        Self { name, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl WorkspaceDir for FsWorkspaceDir {
    type File = FsFileHandle;

    fn name(&self) -> &str {
        &self.name
    }

    async fn open_file(&self, relative: &str) -> Result<FsFileHandle, StoreError> {
        let relative_path = Path::new(relative);
        check_workspace_path("file", relative_path)?;
        let path = self.root.join(relative_path);

        let md = tokio::fs::metadata(&path)
            .await
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
        if !md.is_file() {
            return Err(StoreError::NotAFile { path });
        }

        let name = relative_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(relative)
            .to_owned();
        Ok(FsFileHandle { name, path })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsFileHandle {
    name: String,
    path: PathBuf,
}

impl FileHandle for FsFileHandle {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &Path {
        &self.path
    }

    async fn read_to_string(&self) -> Result<String, StoreError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

// Path validation and atomic writes.
include!("workspace/helpers.rs");
