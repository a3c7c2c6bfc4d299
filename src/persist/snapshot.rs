use std::io::Cursor;

use anyhow::Context;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::assets::decode::{SourceImage, decode_image};
use crate::foundation::error::{WishlyError, WishlyResult};
use crate::placement::model::PlacedImage;

pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Flatten the placed image at its effective size into a PNG data URI.
pub fn flatten_image(img: &PlacedImage) -> WishlyResult<String> {
    let (w, h) = img.placement.effective_size();
    let w = w.round().clamp(1.0, f64::from(u16::MAX)) as u32;
    let h = h.round().clamp(1.0, f64::from(u16::MAX)) as u32;
    let scaled = image::imageops::resize(
        img.source.pixels(),
        w,
        h,
        image::imageops::FilterType::Triangle,
    );

    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(scaled)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .context("encode image snapshot as png")?;

    let mut out = String::with_capacity(PNG_DATA_URI_PREFIX.len() + png.len() * 4 / 3 + 4);
    out.push_str(PNG_DATA_URI_PREFIX);
    STANDARD.encode_string(&png, &mut out);
    Ok(out)
}

/// Decode a `data:<mime>;base64,<payload>` URI into an image.
pub fn decode_data_uri(uri: &str) -> WishlyResult<SourceImage> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| WishlyError::decode("image snapshot is not a data uri"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| WishlyError::decode("data uri has no payload"))?;
    if !meta.ends_with(";base64") {
        return Err(WishlyError::decode("data uri payload is not base64"));
    }
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| WishlyError::decode(format!("data uri base64: {e}")))?;
    decode_image(&bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/persist/snapshot.rs"]
mod tests;
