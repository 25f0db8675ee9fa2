// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Inf and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Workspace access.
//!
//! The editor talks to storage through the [`WorkspaceProvider`] / [`WorkspaceDir`] /
//! [`FileHandle`] traits; [`FsWorkspaceProvider`] backs them with the local filesystem.

pub mod workspace;

pub use workspace::{
    FileHandle, FsFileHandle, FsWorkspaceDir, FsWorkspaceProvider, StorageErrorKind, StoreError,
    WorkspaceDir, WorkspaceProvider, DEFAULT_DOCUMENT_FILENAME,
};
