// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Inf and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only queries over the live diagram.
//!
//! Queries are pure: they never mutate the diagram and tolerate dangling references.

pub mod hit;

pub use hit::{
    connection_segment, distance_to_point, find_connection_at_point, NodeLookup,
    DEFAULT_HIT_TOLERANCE,
};
