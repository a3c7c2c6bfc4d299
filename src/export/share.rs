use std::path::{Path, PathBuf};

use crate::foundation::error::{WishlyError, WishlyResult};
use crate::render::frame::FrameRGBA;

use super::file::export_png;

pub const SHARE_TITLE: &str = "A small wish";
pub const SHARE_FALLBACK_TEXT: &str = "Hey!";
pub const SHARE_FILE_NAME: &str = "wishly.png";

/// What gets handed to a share target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SharePayload {
    pub file_name: String,
    pub png: Vec<u8>,
    pub title: String,
    pub text: String,
}

impl SharePayload {
    pub fn for_card(frame: &FrameRGBA, message: &str) -> WishlyResult<Self> {
        let text = if message.is_empty() {
            SHARE_FALLBACK_TEXT
        } else {
            message
        };
        Ok(Self {
            file_name: SHARE_FILE_NAME.to_string(),
            png: frame.encode_png()?,
            title: SHARE_TITLE.to_string(),
            text: text.to_string(),
        })
    }
}

/// Native share collaborator (share sheet, messaging bridge, ...).
pub trait ShareTarget {
    /// Whether sharing files is supported at all.
    fn can_share(&self) -> bool;
    fn share(&mut self, payload: &SharePayload) -> WishlyResult<()>;
}

/// Share target for environments without one.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoShareTarget;

impl ShareTarget for NoShareTarget {
    fn can_share(&self) -> bool {
        false
    }

    fn share(&mut self, _payload: &SharePayload) -> WishlyResult<()> {
        Err(WishlyError::share_unavailable("no share target"))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    /// The target was unavailable; the card was exported here instead.
    Exported(PathBuf),
}

/// Share the card, falling back to a PNG export when the target cannot share.
///
/// A target that accepts the request but then fails is reported as `ShareUnavailable`, as is a
/// failed fallback export.
pub fn share_or_export(
    target: &mut dyn ShareTarget,
    frame: &FrameRGBA,
    recipient: &str,
    message: &str,
    export_dir: &Path,
) -> WishlyResult<ShareOutcome> {
    if target.can_share() {
        let payload = SharePayload::for_card(frame, message)?;
        return match target.share(&payload) {
            Ok(()) => Ok(ShareOutcome::Shared),
            Err(e) => {
                tracing::warn!(error = %e, "share failed");
                Err(WishlyError::share_unavailable(format!("share failed: {e}")))
            }
        };
    }

    tracing::info!("share not supported; exporting instead");
    export_png(frame, recipient, export_dir)
        .map(ShareOutcome::Exported)
        .map_err(|e| WishlyError::share_unavailable(format!("export fallback failed: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/export/share.rs"]
mod tests;
