//! Tagged color strings and their RGBA form.
//!
//! Colors travel through the engine as the strings the scene uses
//! (`#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`, `rgba(r, g, b, a)` or a
//! CSS color name). They are only decoded to [`Rgba`] while interpolating.

use std::fmt;
use std::str::FromStr;

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValueError};
use crate::interpolate::Interpolate;

/// A color in one of the supported string encodings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode to sRGB channels.
    pub fn to_rgba(&self) -> Result<Rgba> {
        self.0.parse()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Color {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Color {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<Rgba> for Color {
    fn from(rgba: Rgba) -> Self {
        Self(rgba.to_string())
    }
}

/// sRGB channels with a straight (non-premultiplied) alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    fn from_srgb(rgb: Srgb<u8>, a: f64) -> Self {
        Self::new(rgb.red, rgb.green, rgb.blue, a)
    }
}

/// Encodes as `#rrggbb` when opaque, `rgba(r, g, b, a)` otherwise.
impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a >= 1.0 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for Rgba {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let invalid = || ValueError::InvalidColor(s.to_string());

        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(invalid);
        }

        let lower = trimmed.to_ascii_lowercase();
        if let Some(inner) = lower.strip_prefix("rgba(").and_then(|r| r.strip_suffix(')')) {
            return parse_functional(inner, true).ok_or_else(invalid);
        }
        if let Some(inner) = lower.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
            return parse_functional(inner, false).ok_or_else(invalid);
        }

        palette::named::from_str(&lower)
            .map(|rgb| Rgba::from_srgb(rgb, 1.0))
            .ok_or_else(invalid)
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 | 6 => Srgb::<u8>::from_str(hex)
            .ok()
            .map(|rgb| Rgba::from_srgb(rgb, 1.0)),
        8 => {
            let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            let alpha = byte(6)?;
            Some(Rgba::new(byte(0)?, byte(2)?, byte(4)?, f64::from(alpha) / 255.0))
        }
        _ => None,
    }
}

fn parse_functional(inner: &str, with_alpha: bool) -> Option<Rgba> {
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    let expected = if with_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return None;
    }
    let channel = |s: &str| -> Option<u8> {
        let v = s.parse::<f64>().ok()?;
        v.is_finite().then(|| v.round().clamp(0.0, 255.0) as u8)
    };
    let a = if with_alpha {
        let a = parts[3].parse::<f64>().ok()?;
        if !a.is_finite() {
            return None;
        }
        a.clamp(0.0, 1.0)
    } else {
        1.0
    };
    Some(Rgba::new(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        a,
    ))
}

fn lerp_channel(from: u8, to: u8, t: f64) -> u8 {
    let v = f64::from(from) + (f64::from(to) - f64::from(from)) * t;
    v.round().clamp(0.0, 255.0) as u8
}

impl Interpolate for Rgba {
    /// Channels are rounded; alpha is kept as a plain float.
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        Self {
            r: lerp_channel(self.r, to.r, t),
            g: lerp_channel(self.g, to.g, t),
            b: lerp_channel(self.b, to.b, t),
            a: self.a.interpolate(&to.a, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!("#ff8000".parse::<Rgba>(), Ok(Rgba::opaque(255, 128, 0)));
        assert_eq!("#FFF".parse::<Rgba>(), Ok(Rgba::opaque(255, 255, 255)));
        assert_eq!("#00000080".parse::<Rgba>(), Ok(Rgba::new(0, 0, 0, 128.0 / 255.0)));
        assert!("#12345".parse::<Rgba>().is_err());
        assert!("#gg0000".parse::<Rgba>().is_err());
    }

    #[test]
    fn test_parse_functional() {
        assert_eq!("rgb(10, 20, 30)".parse::<Rgba>(), Ok(Rgba::opaque(10, 20, 30)));
        assert_eq!(
            "rgba(10, 20, 30, 0.5)".parse::<Rgba>(),
            Ok(Rgba::new(10, 20, 30, 0.5))
        );
        assert_eq!("RGB(300, -4, 7.6)".parse::<Rgba>(), Ok(Rgba::opaque(255, 0, 8)));
        assert!("rgb(1, 2)".parse::<Rgba>().is_err());
        assert!("rgba(1, 2, 3)".parse::<Rgba>().is_err());
    }

    #[test]
    fn test_parse_named() {
        assert_eq!("red".parse::<Rgba>(), Ok(Rgba::opaque(255, 0, 0)));
        assert_eq!("CornflowerBlue".parse::<Rgba>(), Ok(Rgba::opaque(100, 149, 237)));
        assert_eq!(
            Color::new("no-such-color").to_rgba(),
            Err(ValueError::InvalidColor("no-such-color".to_string()))
        );
    }

    #[test]
    fn test_encode() {
        assert_eq!(Rgba::opaque(255, 128, 0).to_string(), "#ff8000");
        assert_eq!(Rgba::new(1, 2, 3, 0.25).to_string(), "rgba(1, 2, 3, 0.25)");
        assert_eq!(Color::from(Rgba::opaque(0, 0, 0)).as_str(), "#000000");
    }

    #[test]
    fn test_interpolate() {
        let from = Rgba::opaque(0, 0, 0);
        let to = Rgba::new(255, 100, 10, 0.0);
        let mid = from.interpolate(&to, 0.5);
        assert_eq!(mid, Rgba::new(128, 50, 5, 0.5));
    }
}
