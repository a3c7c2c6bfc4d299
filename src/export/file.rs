use std::path::{Path, PathBuf};

use crate::foundation::error::{WishlyError, WishlyResult};
use crate::render::frame::FrameRGBA;

/// `{recipient}_wish.png`, with `card` for an empty name and whitespace runs collapsed to `_`.
pub fn export_file_name(recipient: &str) -> String {
    let base = if recipient.is_empty() { "card" } else { recipient };
    let mut out = String::with_capacity(base.len() + 9);
    let mut in_space = false;
    for ch in base.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out.push_str("_wish.png");
    out
}

/// Write `frame` as a PNG into `dir` under the canonical export name.
#[tracing::instrument(skip(frame), fields(w = frame.width, h = frame.height))]
pub fn export_png(frame: &FrameRGBA, recipient: &str, dir: &Path) -> WishlyResult<PathBuf> {
    let png = frame.encode_png()?;
    let path = dir.join(export_file_name(recipient));
    std::fs::write(&path, &png)
        .map_err(|e| WishlyError::storage(format!("write '{}': {e}", path.display())))?;
    tracing::info!(path = %path.display(), bytes = png.len(), "card exported");
    Ok(path)
}

#[cfg(test)]
#[path = "../../tests/unit/export/file.rs"]
mod tests;
