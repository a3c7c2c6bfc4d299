use crate::design::model::Occasion;
use crate::foundation::color::Rgba8;

/// Colors used by the frame, text layers and decorations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub border: Rgba8,
    pub text: Rgba8,
    pub accent: Rgba8,
    pub sub: Rgba8,
    pub decor: Rgba8,
}

impl Palette {
    /// Fixed lookup; unknown keys use the default entry.
    pub fn for_key(key: &str) -> Self {
        match key {
            "birthday" => Self {
                border: Rgba8::rgb(0xff, 0xdf, 0xe8),
                text: Rgba8::rgb(0x22, 0x22, 0x22),
                accent: Rgba8::rgb(0xff, 0x6f, 0xa3),
                sub: Rgba8::rgb(0x6c, 0x6c, 0x6c),
                decor: Rgba8::with_alpha_f(255, 111, 163, 0.06),
            },
            "anniversary" => Self {
                border: Rgba8::rgb(0xff, 0xf0, 0xf6),
                text: Rgba8::rgb(0x22, 0x22, 0x22),
                accent: Rgba8::rgb(0xff, 0x7f, 0xa9),
                sub: Rgba8::rgb(0x6c, 0x6c, 0x6c),
                decor: Rgba8::with_alpha_f(255, 127, 169, 0.05),
            },
            "invitation" => Self {
                border: Rgba8::rgb(0xdf, 0xef, 0xff),
                text: Rgba8::rgb(0x16, 0x16, 0x17),
                accent: Rgba8::rgb(0x6f, 0xd1, 0xff),
                sub: Rgba8::rgb(0x6c, 0x6c, 0x6c),
                decor: Rgba8::with_alpha_f(109, 211, 255, 0.04),
            },
            "charcoal" => Self {
                border: Rgba8::rgb(0x0b, 0x0b, 0x0b),
                text: Rgba8::rgb(0xff, 0xff, 0xff),
                accent: Rgba8::rgb(0xcf, 0xef, 0xff),
                sub: Rgba8::with_alpha_f(255, 255, 255, 0.9),
                decor: Rgba8::with_alpha_f(255, 255, 255, 0.03),
            },
            _ => Self {
                border: Rgba8::rgb(0xcd, 0xe7, 0xff),
                text: Rgba8::rgb(0x16, 0x16, 0x17),
                accent: Rgba8::rgb(0x6f, 0xd1, 0xff),
                sub: Rgba8::rgb(0x6c, 0x6c, 0x6c),
                decor: Rgba8::with_alpha_f(109, 211, 255, 0.04),
            },
        }
    }

    pub fn for_occasion(occasion: Occasion) -> Self {
        Self::for_key(occasion.as_str())
    }
}
