// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use macroquad::color::Color;
use serde::Deserialize;
use serde_json::from_str;
use tracing::warn;

use crate::error::ConfigError;
use crate::graphics::surface::Rgba;
use crate::tile::TileEncoding;

pub const DEFAULT_SILHOUETTE_COLOR: &str = "rgba(0, 0, 0, 0.5)";

/// Flat color every silhouette pixel is painted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SilhouetteColor(pub Rgba);

impl Default for SilhouetteColor {
    fn default() -> Self {
        SilhouetteColor([0, 0, 0, 128])
    }
}

impl SilhouetteColor {
    /// Parses `rgba(r, g, b, a)`, `rgb(r, g, b)`, `#rrggbb` or `#rrggbbaa`.
    /// Channels are `0..=255`; the alpha of the functional form is `0..=1`.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let lower = compact.to_ascii_lowercase();

        if let Some(hex) = lower.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ConfigError::InvalidColor(text.to_string()));
        }

        let (args, has_alpha) = if let Some(rest) = lower.strip_prefix("rgba(") {
            (rest, true)
        } else if let Some(rest) = lower.strip_prefix("rgb(") {
            (rest, false)
        } else {
            return Err(ConfigError::InvalidColor(text.to_string()));
        };

        let args = args
            .strip_suffix(')')
            .ok_or_else(|| ConfigError::InvalidColor(text.to_string()))?;
        let parts: Vec<&str> = args.split(',').collect();
        if parts.len() != if has_alpha { 4 } else { 3 } {
            return Err(ConfigError::InvalidColor(text.to_string()));
        }

        let channel = |value: &str, component: &'static str| -> Result<u8, ConfigError> {
            let v: f32 = value
                .parse()
                .map_err(|_| ConfigError::InvalidColor(text.to_string()))?;
            if !(0.0..=255.0).contains(&v) {
                return Err(ConfigError::ComponentOutOfRange { component, color: text.to_string() });
            }
            Ok(v.round() as u8)
        };

        let r = channel(parts[0], "red")?;
        let g = channel(parts[1], "green")?;
        let b = channel(parts[2], "blue")?;
        let a = if has_alpha {
            let v: f32 = parts[3]
                .parse()
                .map_err(|_| ConfigError::InvalidColor(text.to_string()))?;
            if !(0.0..=1.0).contains(&v) {
                return Err(ConfigError::ComponentOutOfRange { component: "alpha", color: text.to_string() });
            }
            (v * 255.0).round() as u8
        } else {
            255
        };

        Ok(SilhouetteColor([r, g, b, a]))
    }

    pub fn rgba(&self) -> Rgba {
        self.0
    }

    pub fn to_color(&self) -> Color {
        Color::from_rgba(self.0[0], self.0[1], self.0[2], self.0[3])
    }
}

fn parse_hex(hex: &str) -> Option<SilhouetteColor> {
    if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let alpha = if hex.len() == 8 { byte(6)? } else { 255 };
    Some(SilhouetteColor([byte(0)?, byte(2)?, byte(4)?, alpha]))
}

fn default_silhouette_color() -> String {
    DEFAULT_SILHOUETTE_COLOR.to_string()
}

/// Encoding overrides as they appear in the configuration file.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileEncodingConfig {
    #[serde(default = "TileEncodingConfig::default_reserved_sets")]
    pub reserved_sets: usize,
    #[serde(default = "TileEncodingConfig::default_ids_per_set")]
    pub ids_per_set: u32,
    #[serde(default = "TileEncodingConfig::default_block_columns")]
    pub block_columns: u32,
    #[serde(default = "TileEncodingConfig::default_block_rows")]
    pub block_rows: u32,
}

impl TileEncodingConfig {
    fn default_reserved_sets() -> usize {
        TileEncoding::default().reserved_sets()
    }
    fn default_ids_per_set() -> u32 {
        TileEncoding::default().ids_per_set()
    }
    fn default_block_columns() -> u32 {
        TileEncoding::default().block_columns()
    }
    fn default_block_rows() -> u32 {
        TileEncoding::default().block_rows()
    }
}

impl TryFrom<TileEncodingConfig> for TileEncoding {
    type Error = ConfigError;

    fn try_from(config: TileEncodingConfig) -> Result<Self, Self::Error> {
        TileEncoding::new(config.reserved_sets, config.ids_per_set, config.block_columns, config.block_rows)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SilhouetteConfig {
    #[serde(default = "default_silhouette_color")]
    pub silhouette_color: String,
    #[serde(default)]
    pub tile_encoding: Option<TileEncodingConfig>,
}

impl Default for SilhouetteConfig {
    fn default() -> Self {
        Self {
            silhouette_color: default_silhouette_color(),
            tile_encoding: None,
        }
    }
}

impl SilhouetteConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: SilhouetteConfig = from_str(text)?;
        config.tile_encoding()?;
        Ok(config)
    }

    pub fn color(&self) -> Result<SilhouetteColor, ConfigError> {
        SilhouetteColor::parse(&self.silhouette_color)
    }

    /// The configured color, or the default one when it does not parse.
    pub fn color_or_default(&self) -> SilhouetteColor {
        self.color().unwrap_or_else(|e| {
            warn!(error = %e, "falling back to default silhouette color");
            SilhouetteColor::default()
        })
    }

    pub fn tile_encoding(&self) -> Result<TileEncoding, ConfigError> {
        match self.tile_encoding.clone() {
            Some(encoding) => TileEncoding::try_from(encoding),
            None => Ok(TileEncoding::default()),
        }
    }

    /// The configured tile encoding, or the default one when it is invalid.
    pub fn tile_encoding_or_default(&self) -> TileEncoding {
        self.tile_encoding().unwrap_or_else(|e| {
            warn!(error = %e, "falling back to default tile encoding");
            TileEncoding::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_color() {
        assert_eq!(SilhouetteColor::parse(DEFAULT_SILHOUETTE_COLOR).unwrap(), SilhouetteColor([0, 0, 0, 128]));
        assert_eq!(SilhouetteConfig::default().color().unwrap(), SilhouetteColor::default());
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!(SilhouetteColor::parse("rgba(255,16,0,1)").unwrap().rgba(), [255, 16, 0, 255]);
        assert_eq!(SilhouetteColor::parse(" RGB( 10, 20, 30 ) ").unwrap().rgba(), [10, 20, 30, 255]);
        assert_eq!(SilhouetteColor::parse("#ff8000").unwrap().rgba(), [255, 128, 0, 255]);
        assert_eq!(SilhouetteColor::parse("#00000080").unwrap().rgba(), [0, 0, 0, 128]);
        assert_eq!(SilhouetteColor::parse("rgba(0, 0, 0, 0)").unwrap().rgba(), [0, 0, 0, 0]);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for text in ["", "black", "rgba(0,0,0)", "rgb(0,0,0,1)", "rgba(0,0,0,0.5", "#12345", "#gg0000", "rgba(a,0,0,1)"] {
            assert!(
                matches!(SilhouetteColor::parse(text), Err(ConfigError::InvalidColor(_))),
                "{text:?} should not parse"
            );
        }
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(matches!(
            SilhouetteColor::parse("rgba(256, 0, 0, 0.5)"),
            Err(ConfigError::ComponentOutOfRange { component: "red", .. })
        ));
        assert!(matches!(
            SilhouetteColor::parse("rgba(0, 0, 0, 1.5)"),
            Err(ConfigError::ComponentOutOfRange { component: "alpha", .. })
        ));
    }

    #[test]
    fn test_config_from_json() {
        let config = SilhouetteConfig::from_json(r#"{ "silhouetteColor": "rgba(40, 0, 80, 0.75)" }"#).unwrap();
        assert_eq!(config.color().unwrap().rgba(), [40, 0, 80, 191]);
        assert_eq!(config.tile_encoding().unwrap(), TileEncoding::default());

        let empty = SilhouetteConfig::from_json("{}").unwrap();
        assert_eq!(empty.silhouette_color, DEFAULT_SILHOUETTE_COLOR);
    }

    #[test]
    fn test_config_tile_encoding_overrides() {
        let config = SilhouetteConfig::from_json(r#"{ "tileEncoding": { "reservedSets": 2 } }"#).unwrap();
        let encoding = config.tile_encoding().unwrap();
        assert_eq!(encoding.reserved_sets(), 2);
        assert_eq!(encoding.ids_per_set(), 256);

        assert!(matches!(
            SilhouetteConfig::from_json(r#"{ "tileEncoding": { "blockRows": 0 } }"#),
            Err(ConfigError::InvalidEncoding)
        ));
        assert!(matches!(SilhouetteConfig::from_json("not json"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_invalid_encoding_built_in_code_falls_back() {
        let config = SilhouetteConfig {
            silhouette_color: DEFAULT_SILHOUETTE_COLOR.to_string(),
            tile_encoding: Some(TileEncodingConfig {
                reserved_sets: 5,
                ids_per_set: 0,
                block_columns: 8,
                block_rows: 16,
            }),
        };
        assert!(matches!(config.tile_encoding(), Err(ConfigError::InvalidEncoding)));
        assert_eq!(config.tile_encoding_or_default(), TileEncoding::default());
    }

    #[test]
    fn test_color_converts_for_drawing() {
        let color = SilhouetteColor::parse("rgb(255, 0, 0)").unwrap().to_color();
        assert_eq!((color.r, color.g, color.b, color.a), (1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_bad_color_falls_back() {
        let config = SilhouetteConfig {
            silhouette_color: "purple-ish".to_string(),
            tile_encoding: None,
        };
        assert!(config.color().is_err());
        assert_eq!(config.color_or_default(), SilhouetteColor::default());
    }
}
