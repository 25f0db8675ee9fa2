// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Inf and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

pub const AVAILABLE_FONTS: &[&str] = &[
    "Arial",
    "Helvetica",
    "Verdana",
    "Trebuchet MS",
    "Georgia",
    "Times New Roman",
    "Courier New",
    "Monaco",
    "Comic Sans MS",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontOption {
    pub name: &'static str,
    pub selected: bool,
}

/// Options for the font selector with `current` marked. An unknown font leaves nothing selected.
pub fn font_options(current: &str) -> Vec<FontOption> {
    let options: Vec<FontOption> = AVAILABLE_FONTS
        .iter()
        .map(|&name| FontOption {
            name,
            selected: name == current,
        })
        .collect();

    if !options.iter().any(|option| option.selected) {
        tracing::debug!(font = current, "configured font is not in the font list");
    }
    options
}
