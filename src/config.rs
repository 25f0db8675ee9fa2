// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Inf and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Editor configuration.
//!
//! An optional JSON file overrides individual keys; everything omitted keeps its default.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::model::diagram::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_ZOOM};
use crate::model::CanvasDefaults;
use crate::query::DEFAULT_HIT_TOLERANCE;
use crate::store::DEFAULT_DOCUMENT_FILENAME;

pub const DEFAULT_FONT_FAMILY: &str = "Arial";

#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    pub font_family: String,
    pub default_file_name: String,
    pub canvas: CanvasDefaults,
    pub hit_tolerance: f64,
    pub auto_save_delay: Duration,
    pub auto_save_status: Duration,
    pub cursor_blink: Duration,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.to_owned(),
            default_file_name: DEFAULT_DOCUMENT_FILENAME.to_owned(),
            canvas: CanvasDefaults {
                width: DEFAULT_CANVAS_WIDTH,
                height: DEFAULT_CANVAS_HEIGHT,
                zoom: DEFAULT_ZOOM,
            },
            hit_tolerance: DEFAULT_HIT_TOLERANCE,
            auto_save_delay: Duration::from_millis(2000),
            auto_save_status: Duration::from_millis(3000),
            cursor_blink: Duration::from_millis(530),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ConfigFile {
    font_family: Option<String>,
    default_file_name: Option<String>,
    canvas_width: Option<f64>,
    canvas_height: Option<f64>,
    zoom: Option<f64>,
    hit_tolerance: Option<f64>,
    auto_save_delay_ms: Option<u64>,
    auto_save_status_ms: Option<u64>,
    cursor_blink_ms: Option<u64>,
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    InvalidValue {
        key: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read config {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "invalid config {path:?}: {source}"),
            Self::InvalidValue { key } => write!(f, "config key `{key}` must be positive"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::InvalidValue { .. } => None,
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<EditorConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(EditorConfig::default());
    };

    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&contents).map_err(|err| match err {
        ParseConfigError::Json(source) => ConfigError::Json {
            path: path.to_path_buf(),
            source,
        },
        ParseConfigError::InvalidValue(key) => ConfigError::InvalidValue { key },
    })
}

enum ParseConfigError {
    Json(serde_json::Error),
    InvalidValue(&'static str),
}

fn parse_config(contents: &str) -> Result<EditorConfig, ParseConfigError> {
    let parsed: ConfigFile = serde_json::from_str(contents).map_err(ParseConfigError::Json)?;
    let mut config = EditorConfig::default();

    if let Some(v) = parsed.font_family {
        config.font_family = v;
    }
    if let Some(v) = parsed.default_file_name {
        config.default_file_name = v;
    }
    if let Some(v) = parsed.canvas_width {
        config.canvas.width = positive("canvasWidth", v)?;
    }
    if let Some(v) = parsed.canvas_height {
        config.canvas.height = positive("canvasHeight", v)?;
    }
    if let Some(v) = parsed.zoom {
        config.canvas.zoom = positive("zoom", v)?;
    }
    if let Some(v) = parsed.hit_tolerance {
        config.hit_tolerance = positive("hitTolerance", v)?;
    }
    if let Some(v) = parsed.auto_save_delay_ms {
        config.auto_save_delay = Duration::from_millis(v);
    }
    if let Some(v) = parsed.auto_save_status_ms {
        config.auto_save_status = Duration::from_millis(v);
    }
    if let Some(v) = parsed.cursor_blink_ms {
        if v == 0 {
            return Err(ParseConfigError::InvalidValue("cursorBlinkMs"));
        }
        config.cursor_blink = Duration::from_millis(v);
    }

    Ok(config)
}

fn positive(key: &'static str, value: f64) -> Result<f64, ParseConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ParseConfigError::InvalidValue(key))
    }
}
