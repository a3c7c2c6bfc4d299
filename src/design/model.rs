use chrono::NaiveDate;

use crate::foundation::color::{Rgba8, parse_hex};
use crate::foundation::error::{WishlyError, WishlyResult};

/// Default title color offered by the editor.
pub const DEFAULT_TITLE_COLOR: Rgba8 = Rgba8::rgb(0xff, 0x6f, 0xa3);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
/// What the card is for. Drives the palette and message suggestions.
pub enum Occasion {
    #[default]
    Birthday,
    Anniversary,
    Invitation,
    /// Anything else; unknown persisted values land here too.
    Custom,
}

impl Occasion {
    pub const ALL: [Occasion; 4] = [
        Occasion::Birthday,
        Occasion::Anniversary,
        Occasion::Invitation,
        Occasion::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Occasion::Birthday => "birthday",
            Occasion::Anniversary => "anniversary",
            Occasion::Invitation => "invitation",
            Occasion::Custom => "custom",
        }
    }

    pub fn from_key(key: &str) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "birthday" => Occasion::Birthday,
            "anniversary" => Occasion::Anniversary,
            "invitation" => Occasion::Invitation,
            _ => Occasion::Custom,
        }
    }
}

impl From<String> for Occasion {
    fn from(s: String) -> Self {
        Self::from_key(&s)
    }
}

impl From<Occasion> for String {
    fn from(o: Occasion) -> Self {
        o.as_str().to_owned()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
/// Named two-stop background gradients.
pub enum BgPreset {
    #[default]
    Blush,
    Sky,
    Mint,
    Lilac,
    /// Also the fallback for unknown preset names.
    Cream,
    Charcoal,
}

impl BgPreset {
    pub const ALL: [BgPreset; 6] = [
        BgPreset::Blush,
        BgPreset::Sky,
        BgPreset::Mint,
        BgPreset::Lilac,
        BgPreset::Cream,
        BgPreset::Charcoal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BgPreset::Blush => "blush",
            BgPreset::Sky => "sky",
            BgPreset::Mint => "mint",
            BgPreset::Lilac => "lilac",
            BgPreset::Cream => "cream",
            BgPreset::Charcoal => "charcoal",
        }
    }

    pub fn from_key(key: &str) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "blush" => BgPreset::Blush,
            "sky" => BgPreset::Sky,
            "mint" => BgPreset::Mint,
            "lilac" => BgPreset::Lilac,
            "charcoal" => BgPreset::Charcoal,
            _ => BgPreset::Cream,
        }
    }

    /// Gradient stops `(start, end)` painted from the top-left to the bottom-right corner.
    pub fn stops(self) -> (Rgba8, Rgba8) {
        match self {
            BgPreset::Blush => (Rgba8::rgb(0xff, 0xf5, 0xf8), Rgba8::rgb(0xff, 0xf0, 0xf3)),
            BgPreset::Sky => (Rgba8::rgb(0xf0, 0xfb, 0xff), Rgba8::rgb(0xe6, 0xf7, 0xff)),
            BgPreset::Mint => (Rgba8::rgb(0xf5, 0xff, 0xf8), Rgba8::rgb(0xec, 0xff, 0xf3)),
            BgPreset::Lilac => (Rgba8::rgb(0xfb, 0xf5, 0xff), Rgba8::rgb(0xf6, 0xef, 0xff)),
            BgPreset::Cream => (Rgba8::rgb(0xff, 0xfd, 0xf6), Rgba8::rgb(0xff, 0xf8, 0xec)),
            BgPreset::Charcoal => (Rgba8::rgb(0x0b, 0x0f, 0x12), Rgba8::rgb(0x0b, 0x0f, 0x15)),
        }
    }
}

impl From<String> for BgPreset {
    fn from(s: String) -> Self {
        Self::from_key(&s)
    }
}

impl From<BgPreset> for String {
    fn from(p: BgPreset) -> Self {
        p.as_str().to_owned()
    }
}

/// Every user-chosen field of a card, minus the uploaded image.
///
/// The uploaded image and its placement are held next to this record by
/// [`crate::Session`]; rendering takes both.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DesignState {
    pub recipient: String,
    pub occasion: Occasion,
    /// Card aspect ratio, height / width.
    pub card_ratio: f64,
    pub title: String,
    /// Explicit title color; `None` uses the palette accent.
    pub title_color: Option<Rgba8>,
    pub message: String,
    pub bg_preset: BgPreset,
    /// Overrides `bg_preset` whenever present.
    pub bg_color: Option<Rgba8>,
    pub event_date: Option<NaiveDate>,
}

impl Default for DesignState {
    fn default() -> Self {
        Self {
            recipient: String::new(),
            occasion: Occasion::Birthday,
            card_ratio: 1.0,
            title: String::new(),
            title_color: Some(DEFAULT_TITLE_COLOR),
            message: String::new(),
            bg_preset: BgPreset::Blush,
            bg_color: None,
            event_date: None,
        }
    }
}

/// Resolved background for rendering: exactly one source is authoritative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Background {
    /// Custom color, painted from itself to a lightened variant.
    Color(Rgba8),
    Preset(BgPreset),
}

impl DesignState {
    pub fn background(&self) -> Background {
        match self.bg_color {
            Some(c) => Background::Color(c),
            None => Background::Preset(self.bg_preset),
        }
    }

    /// Reducer-style transition: return the state with `edit` applied.
    pub fn apply_edit(mut self, edit: Edit) -> WishlyResult<Self> {
        match edit {
            Edit::Recipient(v) => self.recipient = v,
            Edit::Occasion(v) => self.occasion = v,
            Edit::CardRatio(v) => {
                if !v.is_finite() || v <= 0.0 {
                    return Err(WishlyError::validation("card ratio must be finite and > 0"));
                }
                self.card_ratio = v;
            }
            Edit::Title(v) => self.title = v,
            Edit::TitleColor(v) => self.title_color = v,
            Edit::Message(v) => self.message = v,
            Edit::BgPreset(v) => self.bg_preset = v,
            Edit::BgColor(v) => self.bg_color = v,
            Edit::EventDate(v) => self.event_date = v,
        }
        Ok(self)
    }
}

/// A single field change coming from the input layer.
#[derive(Clone, Debug, PartialEq)]
pub enum Edit {
    Recipient(String),
    Occasion(Occasion),
    CardRatio(f64),
    Title(String),
    TitleColor(Option<Rgba8>),
    Message(String),
    BgPreset(BgPreset),
    BgColor(Option<Rgba8>),
    EventDate(Option<NaiveDate>),
}

impl Edit {
    /// Parse a raw `field = value` pair as delivered by form inputs.
    ///
    /// Empty values clear optional fields (`titleColor`, `bgColor`, `eventDate`).
    pub fn from_field(field: &str, value: &str) -> WishlyResult<Self> {
        fn opt_color(value: &str) -> WishlyResult<Option<Rgba8>> {
            let v = value.trim();
            if v.is_empty() {
                Ok(None)
            } else {
                parse_hex(v).map(Some)
            }
        }

        match field {
            "toName" | "recipient" => Ok(Edit::Recipient(value.to_owned())),
            "occasion" => Ok(Edit::Occasion(Occasion::from_key(value))),
            "cardSize" | "cardRatio" => {
                let v: f64 = value.trim().parse().map_err(|_| {
                    WishlyError::validation(format!("invalid card size \"{value}\""))
                })?;
                Ok(Edit::CardRatio(v))
            }
            "title" => Ok(Edit::Title(value.to_owned())),
            "titleColor" => Ok(Edit::TitleColor(opt_color(value)?)),
            "message" => Ok(Edit::Message(value.to_owned())),
            "bgPreset" => Ok(Edit::BgPreset(BgPreset::from_key(value))),
            "bgColor" => Ok(Edit::BgColor(opt_color(value)?)),
            "eventDate" => {
                let v = value.trim();
                if v.is_empty() {
                    return Ok(Edit::EventDate(None));
                }
                let d = NaiveDate::parse_from_str(v, "%Y-%m-%d").map_err(|e| {
                    WishlyError::validation(format!("invalid event date \"{v}\": {e}"))
                })?;
                Ok(Edit::EventDate(Some(d)))
            }
            other => Err(WishlyError::validation(format!("unknown field \"{other}\""))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/design/model.rs"]
mod tests;
