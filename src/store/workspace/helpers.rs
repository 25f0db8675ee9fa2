// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Inf and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Workspace files are addressed by plain relative paths: no root, no drive prefix, no `..`.
fn check_workspace_path(field: &'static str, path: &Path) -> Result<(), StoreError> {
    let mut components = path.components().peekable();
    let plain = components.peek().is_some()
        && components.all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if plain {
        Ok(())
    } else {
        Err(StoreError::InvalidRelativePath {
            field,
            value: path.to_path_buf(),
        })
    }
}

/// Writes `contents` to a sibling temp file and renames it over `path`, so readers only ever
/// see the old or the new record.
fn write_atomic(dir: &Path, path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    let io_err = |at: &Path| {
        let at = at.to_path_buf();
        move |source| StoreError::Io { path: at, source }
    };

    fs::create_dir_all(dir).map_err(io_err(dir))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| io_err(path)(io::Error::other("path has no file name")))?;

    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    let tmp_path = dir.join(format!(".inf.tmp.{}.{stamp}", file_name.to_string_lossy()));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(io_err(&tmp_path))?;
    let written = file.write_all(contents);
    drop(file);
    if let Err(source) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_err(&tmp_path)(source));
    }

    // `fs::rename` replaces an existing target on every supported platform.
    fs::rename(&tmp_path, path).map_err(|source| {
        let _ = fs::remove_file(&tmp_path);
        io_err(path)(source)
    })
}
