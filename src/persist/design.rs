use chrono::NaiveDate;

use crate::design::model::{BgPreset, DEFAULT_TITLE_COLOR, DesignState, Occasion};
use crate::foundation::color::parse_hex;
use crate::foundation::error::WishlyResult;
use crate::persist::store::KeyValueStore;
use crate::persist::snapshot::{decode_data_uri, flatten_image};
use crate::placement::model::{DEFAULT_ORIGIN, ImagePlacement, PlacedImage};

/// Single slot holding the last edited design.
pub const DESIGN_KEY: &str = "wishly_last_design_v3";

/// Persisted shape of a design: flat, string-valued form fields plus the image snapshot.
///
/// Every field is optional on read; missing ones take the editor defaults.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignDoc {
    pub to_name: String,
    pub occasion: Occasion,
    #[serde(deserialize_with = "de_card_size")]
    pub card_size: f64,
    pub title: String,
    /// Absent means the default title color; present and empty means the palette accent.
    pub title_color: Option<String>,
    pub message: String,
    pub bg_preset: BgPreset,
    pub bg_color: String,
    pub event_date: String,
    pub image: Option<String>,
    pub img_w: Option<f64>,
    pub img_h: Option<f64>,
    pub img_x: f64,
    pub img_y: f64,
    pub img_scale: f64,
    /// Milliseconds since the Unix epoch.
    pub saved_at: i64,
}

impl Default for DesignDoc {
    fn default() -> Self {
        Self {
            to_name: String::new(),
            occasion: Occasion::Birthday,
            card_size: 1.0,
            title: String::new(),
            title_color: Some(DEFAULT_TITLE_COLOR.to_hex()),
            message: String::new(),
            bg_preset: BgPreset::Blush,
            bg_color: String::new(),
            event_date: String::new(),
            image: None,
            img_w: None,
            img_h: None,
            img_x: DEFAULT_ORIGIN.x,
            img_y: DEFAULT_ORIGIN.y,
            img_scale: 1.0,
            saved_at: 0,
        }
    }
}

/// `cardSize` is a select value; older documents store it as a string.
fn de_card_size<'de, D>(de: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
    }
    let v = match <Option<Raw> as serde::Deserialize>::deserialize(de)? {
        Some(Raw::Num(n)) => n,
        Some(Raw::Text(s)) => s.trim().parse().unwrap_or(1.0),
        None => 1.0,
    };
    Ok(if v.is_finite() && v > 0.0 { v } else { 1.0 })
}

/// A design read back from storage.
#[derive(Clone, Debug)]
pub struct RestoredDesign {
    pub design: DesignState,
    pub image: Option<PlacedImage>,
    pub saved_at: i64,
}

impl DesignDoc {
    /// Snapshot `design` and its image. The image is flattened at its effective size.
    pub fn capture(
        design: &DesignState,
        image: Option<&PlacedImage>,
        saved_at: i64,
    ) -> WishlyResult<Self> {
        let snapshot = image.map(flatten_image).transpose()?;
        let placement = image.map(|i| i.placement);
        Ok(Self {
            to_name: design.recipient.clone(),
            occasion: design.occasion,
            card_size: design.card_ratio,
            title: design.title.clone(),
            title_color: Some(
                design
                    .title_color
                    .map(|c| c.to_hex())
                    .unwrap_or_default(),
            ),
            message: design.message.clone(),
            bg_preset: design.bg_preset,
            bg_color: design.bg_color.map(|c| c.to_hex()).unwrap_or_default(),
            event_date: design
                .event_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            image: snapshot,
            img_w: placement.map(|p| p.base_w),
            img_h: placement.map(|p| p.base_h),
            img_x: placement.map_or(DEFAULT_ORIGIN.x, |p| p.x),
            img_y: placement.map_or(DEFAULT_ORIGIN.y, |p| p.y),
            img_scale: placement.map_or(1.0, |p| p.scale),
            saved_at,
        })
    }

    /// Rebuild the design. Unparseable colors or dates fall back like missing fields; an
    /// undecodable image snapshot drops the image.
    pub fn restore(self) -> RestoredDesign {
        let title_color = match self.title_color.as_deref().map(str::trim) {
            Some("") => None,
            Some(hex) => Some(parse_hex(hex).unwrap_or(DEFAULT_TITLE_COLOR)),
            None => Some(DEFAULT_TITLE_COLOR),
        };
        let design = DesignState {
            recipient: self.to_name,
            occasion: self.occasion,
            card_ratio: self.card_size,
            title: self.title,
            title_color,
            message: self.message,
            bg_preset: self.bg_preset,
            bg_color: parse_hex(&self.bg_color).ok(),
            event_date: NaiveDate::parse_from_str(self.event_date.trim(), "%Y-%m-%d").ok(),
        };

        let image = self.image.as_deref().and_then(|uri| match decode_data_uri(uri) {
            Ok(source) => Some(source),
            Err(e) => {
                tracing::warn!(error = %e, "stored image snapshot could not be decoded");
                None
            }
        });
        let image = image.map(|source| {
            let base_w = self
                .img_w
                .filter(|w| w.is_finite() && *w >= 1.0)
                .unwrap_or_else(|| f64::from(source.width()));
            let base_h = self
                .img_h
                .filter(|h| h.is_finite() && *h >= 1.0)
                .unwrap_or_else(|| f64::from(source.height()) * base_w / f64::from(source.width()));
            let scale = if self.img_scale.is_finite() && self.img_scale > 0.0 {
                self.img_scale
            } else {
                1.0
            };
            PlacedImage {
                source,
                placement: ImagePlacement {
                    x: self.img_x,
                    y: self.img_y,
                    base_w,
                    base_h: base_h.max(1.0),
                    scale,
                },
            }
        });

        RestoredDesign {
            design,
            image,
            saved_at: self.saved_at,
        }
    }
}

/// Write the design snapshot to [`DESIGN_KEY`]. Failures are logged and swallowed.
#[tracing::instrument(skip_all)]
pub fn save_design(
    store: &mut dyn KeyValueStore,
    design: &DesignState,
    image: Option<&PlacedImage>,
    saved_at: i64,
) {
    let result = DesignDoc::capture(design, image, saved_at).and_then(|doc| {
        let json = serde_json::to_string(&doc)?;
        store.set(DESIGN_KEY, &json)
    });
    if let Err(e) = result {
        tracing::warn!(error = %e, "saving design failed");
    }
}

/// Read the last saved design. Absent or malformed documents yield `None`.
pub fn load_design(store: &dyn KeyValueStore) -> Option<RestoredDesign> {
    let raw = match store.get(DESIGN_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(error = %e, "reading saved design failed");
            return None;
        }
    };
    match serde_json::from_str::<DesignDoc>(&raw) {
        Ok(doc) => Some(doc.restore()),
        Err(e) => {
            tracing::warn!(error = %e, "saved design is malformed; ignoring");
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/persist/design.rs"]
mod tests;
