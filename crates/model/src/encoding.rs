//! Snapshot configuration primitives: image encodings and annotation
//! colors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Image formats the snapshot capturer can encode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageEncoding {
    #[default]
    Jpeg,
    Png,
}

impl ImageEncoding {
    /// MIME name, as accepted by configuration and embedded in data URLs.
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

impl fmt::Display for ImageEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// Rejected image-encoding name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported image encoding: {0}")]
pub struct UnsupportedEncoding(pub String);

impl FromStr for ImageEncoding {
    type Err = UnsupportedEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image/jpeg" => Ok(Self::Jpeg),
            "image/png" => Ok(Self::Png),
            other => Err(UnsupportedEncoding(other.to_string())),
        }
    }
}

/// RGB stroke color for snapshot annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationColor(pub [u8; 3]);

impl AnnotationColor {
    pub fn rgb(&self) -> [u8; 3] {
        self.0
    }
}

impl Default for AnnotationColor {
    fn default() -> Self {
        // The monitor's signature cyan.
        Self([0x2b, 0xed, 0xff])
    }
}

/// Rejected annotation-color value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid annotation color: {0}")]
pub struct InvalidColor(pub String);

impl FromStr for AnnotationColor {
    type Err = InvalidColor;

    /// Accepts `#rrggbb` hex and a small set of common color names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() == 6 {
                let parsed = u32::from_str_radix(hex, 16)
                    .map_err(|_| InvalidColor(s.to_string()))?;
                return Ok(Self([
                    (parsed >> 16) as u8,
                    (parsed >> 8) as u8,
                    parsed as u8,
                ]));
            }
            return Err(InvalidColor(s.to_string()));
        }

        match s.to_ascii_lowercase().as_str() {
            "red" => Ok(Self([0xff, 0x00, 0x00])),
            "green" => Ok(Self([0x00, 0xff, 0x00])),
            "blue" => Ok(Self([0x00, 0x00, 0xff])),
            "yellow" => Ok(Self([0xff, 0xff, 0x00])),
            "cyan" => Ok(Self([0x00, 0xff, 0xff])),
            "magenta" => Ok(Self([0xff, 0x00, 0xff])),
            "white" => Ok(Self([0xff, 0xff, 0xff])),
            "black" => Ok(Self([0x00, 0x00, 0x00])),
            _ => Err(InvalidColor(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_accepts_exact_mime_names() {
        assert_eq!("image/jpeg".parse::<ImageEncoding>(), Ok(ImageEncoding::Jpeg));
        assert_eq!("image/png".parse::<ImageEncoding>(), Ok(ImageEncoding::Png));
    }

    #[test]
    fn test_encoding_rejects_everything_else() {
        for name in ["image/webp", "jpeg", "png", "image/JPEG", ""] {
            assert_eq!(
                name.parse::<ImageEncoding>(),
                Err(UnsupportedEncoding(name.to_string()))
            );
        }
    }

    #[test]
    fn test_color_parses_hex() {
        let color: AnnotationColor = "#2bedff".parse().unwrap();
        assert_eq!(color.rgb(), [0x2b, 0xed, 0xff]);
        assert_eq!(color, AnnotationColor::default());
    }

    #[test]
    fn test_color_parses_names() {
        let color: AnnotationColor = "red".parse().unwrap();
        assert_eq!(color.rgb(), [0xff, 0x00, 0x00]);
        let color: AnnotationColor = "White".parse().unwrap();
        assert_eq!(color.rgb(), [0xff, 0xff, 0xff]);
    }

    #[test]
    fn test_color_rejects_garbage() {
        for value in ["#2bed", "#2bedfff", "#zzzzzz", "chartreuse-ish", ""] {
            assert!(value.parse::<AnnotationColor>().is_err());
        }
    }
}
