use anyhow::{anyhow, Context, Result};
use image::Rgba;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Optional render settings. Every field has a default, so an empty file is
/// a valid configuration.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RenderConfig {
    pub background: String, // Hex code
    /// Shape attribute holding the municipality key.
    pub join_attribute: String,
    pub style_name: String,
    pub layer_name: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: "#d3d3d3".to_string(), // lightgrey
            join_attribute: "AGS".to_string(),
            style_name: "Municipalities".to_string(),
            layer_name: "Country".to_string(),
        }
    }
}

impl RenderConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: RenderConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;
        Ok(config)
    }

    pub fn background_color(&self) -> Result<Rgba<u8>> {
        hex_to_rgba(&self.background)
    }
}

pub fn hex_to_rgba(hex: &str) -> Result<Rgba<u8>> {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(anyhow!("Invalid hex color: {:?}", hex));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .with_context(|| format!("Invalid hex color: {:?}", hex))
    };
    Ok(Rgba([channel(0..2)?, channel(2..4)?, channel(4..6)?, 255]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: RenderConfig = toml::from_str("").unwrap();
        assert_eq!(config.join_attribute, "AGS");
        assert_eq!(config.background_color().unwrap(), Rgba([211, 211, 211, 255]));
    }

    #[test]
    fn partial_config_overrides_fields() {
        let config: RenderConfig = toml::from_str(
            r##"
            background = "#ffffff"
            join_attribute = "RS"
            "##,
        )
        .unwrap();
        assert_eq!(config.join_attribute, "RS");
        assert_eq!(config.style_name, "Municipalities");
        assert_eq!(config.background_color().unwrap(), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(hex_to_rgba("#12345").is_err());
        assert!(hex_to_rgba("#zz0000").is_err());
        assert_eq!(hex_to_rgba("ff8000").unwrap(), Rgba([255, 128, 0, 255]));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.toml");
        fs::write(&path, "layer_name = \"Germany\"\n").unwrap();

        let config = RenderConfig::load_from_file(&path).unwrap();
        assert_eq!(config.layer_name, "Germany");
        assert_eq!(config.background, "#d3d3d3");
    }
}
