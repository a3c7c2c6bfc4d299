use super::*;

#[derive(Default)]
struct Recorder {
    available: bool,
    fail: bool,
    got: Vec<SharePayload>,
}

impl ShareTarget for Recorder {
    fn can_share(&self) -> bool {
        self.available
    }

    fn share(&mut self, payload: &SharePayload) -> WishlyResult<()> {
        if self.fail {
            return Err(WishlyError::share_unavailable("user cancelled"));
        }
        self.got.push(payload.clone());
        Ok(())
    }
}

fn frame() -> FrameRGBA {
    FrameRGBA {
        width: 1,
        height: 1,
        data: vec![10, 20, 30, 255],
        premultiplied: true,
    }
}

#[test]
fn shares_with_title_and_message_text() {
    let dir = tempfile::tempdir().unwrap();
    let mut t = Recorder {
        available: true,
        ..Recorder::default()
    };
    let out = share_or_export(&mut t, &frame(), "Ada", "", dir.path()).unwrap();
    assert_eq!(out, ShareOutcome::Shared);
    assert_eq!(t.got.len(), 1);
    assert_eq!(t.got[0].title, SHARE_TITLE);
    assert_eq!(t.got[0].text, SHARE_FALLBACK_TEXT);
    assert_eq!(t.got[0].file_name, SHARE_FILE_NAME);
    assert!(t.got[0].png.starts_with(&[0x89, b'P', b'N', b'G']));
}

#[test]
fn unavailable_target_falls_back_to_export() {
    let dir = tempfile::tempdir().unwrap();
    let out = share_or_export(&mut NoShareTarget, &frame(), "Ada", "Hi", dir.path()).unwrap();
    assert_eq!(out, ShareOutcome::Exported(dir.path().join("Ada_wish.png")));
}

#[test]
fn failed_fallback_is_share_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing");
    let err = share_or_export(&mut NoShareTarget, &frame(), "", "", &missing).unwrap_err();
    assert!(matches!(err, WishlyError::ShareUnavailable(_)));
}

#[test]
fn failing_target_is_share_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let mut t = Recorder {
        available: true,
        fail: true,
        ..Recorder::default()
    };
    let err = share_or_export(&mut t, &frame(), "", "", dir.path()).unwrap_err();
    assert!(matches!(err, WishlyError::ShareUnavailable(_)));
    assert!(!dir.path().join("card_wish.png").exists());
}
