// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Inf and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Inf: node-link diagram editor core.
//!
//! Holds the diagram model and its JSON document format, connection hit-testing, workspace
//! access and the editor controller that bootstraps a session and restores the last workspace.
//! YAML descriptions convert into diagram documents through [`format::yaml`].

pub mod config;
pub mod editor;
pub mod format;
pub mod model;
pub mod query;
pub mod store;
