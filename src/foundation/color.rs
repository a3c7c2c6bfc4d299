use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{WishlyError, WishlyResult};

/// Straight-alpha RGBA8 color.
///
/// Serialized as a hex string (`#rrggbb`, or `#rrggbbaa` when not opaque) so persisted designs
/// keep the same shape as color-picker values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build a color from an alpha fraction in `0..=1`, like CSS `rgba()`.
    pub fn with_alpha_f(r: u8, g: u8, b: u8, alpha: f64) -> Self {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { r, g, b, a }
    }

    pub fn to_premul(self) -> Rgba8Premul {
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, self.a)
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r, self.g, self.b, self.a
            )
        }
    }

    pub fn to_cpu(self) -> vello_cpu::peniko::Color {
        vello_cpu::peniko::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

impl std::str::FromStr for Rgba8 {
    type Err = WishlyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex(s)
    }
}

impl TryFrom<String> for Rgba8 {
    type Error = WishlyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_hex(&value)
    }
}

impl From<Rgba8> for String {
    fn from(c: Rgba8) -> Self {
        c.to_hex()
    }
}

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (the `#` is optional, case-insensitive).
pub fn parse_hex(s: &str) -> WishlyResult<Rgba8> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> WishlyResult<u8> {
        u8::from_str_radix(pair, 16)
            .map_err(|_| WishlyError::validation(format!("invalid hex byte \"{pair}\"")))
    }

    if !s.is_ascii() {
        return Err(WishlyError::validation("hex color must be ascii"));
    }

    match s.len() {
        3 => {
            let nib = |i: usize| hex_byte(&s[i..i + 1]).map(|v| v * 17);
            Ok(Rgba8::rgb(nib(0)?, nib(1)?, nib(2)?))
        }
        6 => Ok(Rgba8::rgb(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        )),
        8 => Ok(Rgba8::rgba(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        )),
        _ => Err(WishlyError::validation(
            "hex color must be #RGB, #RRGGBB or #RRGGBBAA",
        )),
    }
}

/// Blend each RGB channel `pct` of the way toward white. Alpha is preserved.
pub fn lighten(c: Rgba8, pct: f64) -> Rgba8 {
    let pct = pct.clamp(0.0, 1.0);
    let ch = |v: u8| -> u8 {
        let v = f64::from(v);
        (v + (255.0 - v) * pct).round().min(255.0) as u8
    };
    Rgba8::rgba(ch(c.r), ch(c.g), ch(c.b), c.a)
}

/// Deserialize an optional hex color, treating empty or unparseable strings as absent.
///
/// Persisted documents store color-picker values verbatim, so a blank field means "unset".
pub(crate) fn de_opt_hex_lenient<'de, D>(de: D) -> Result<Option<Rgba8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = serde::Deserialize::deserialize(de)?;
    Ok(raw.and_then(|s| parse_hex(&s).ok()))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
