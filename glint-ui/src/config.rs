//! Toolkit configuration.

use std::path::{Path, PathBuf};

use glint_render::buffer::DEFAULT_CAPACITY_FLOATS;
use glint_render::ShaderLoader;
use glint_text::{Font, DEFAULT_GLYPH_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Toolkit settings.  Every field has a default, so a config file only
/// needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Directory holding `fonts/`, `images/` and `shaders/`.
    pub asset_root: PathBuf,
    /// Side length of glyph atlas pages.
    pub glyph_page_size: u32,
    /// Side length of image atlas pages.
    pub pixmap_page_size: u32,
    /// Capacity of the streaming vertex buffer, in floats.
    pub vertex_buffer_floats: usize,
    pub default_font: String,
    pub default_font_size: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            glyph_page_size: DEFAULT_GLYPH_PAGE_SIZE,
            pixmap_page_size: 1024,
            vertex_buffer_floats: DEFAULT_CAPACITY_FLOATS,
            default_font: "DejaVuSans".to_string(),
            default_font_size: 24,
        }
    }
}

impl UiConfig {
    /// Read a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn fonts_dir(&self) -> PathBuf {
        self.asset_root.join("fonts")
    }

    pub fn images_dir(&self) -> PathBuf {
        self.asset_root.join("images")
    }

    pub fn shaders_dir(&self) -> PathBuf {
        self.asset_root.join("shaders")
    }

    /// Read shaders from `shaders_dir()` when it exists, otherwise use
    /// the built-in copies.
    pub fn shader_loader(&self) -> ShaderLoader {
        let dir = self.shaders_dir();
        if dir.is_dir() {
            ShaderLoader::Directory(dir)
        } else {
            ShaderLoader::Embedded
        }
    }

    pub fn default_font(&self) -> Font {
        Font::new(self.default_font.clone(), self.default_font_size)
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = UiConfig::default();
        assert_eq!(config.glyph_page_size, 512);
        assert_eq!(config.pixmap_page_size, 1024);
        assert_eq!(config.fonts_dir(), PathBuf::from("assets/fonts"));
        assert_eq!(config.images_dir(), PathBuf::from("assets/images"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = UiConfig::from_json(r#"{ "asset_root": "/opt/app", "glyph_page_size": 256 }"#).unwrap();
        assert_eq!(config.glyph_page_size, 256);
        assert_eq!(config.pixmap_page_size, 1024);
        assert_eq!(config.shaders_dir(), PathBuf::from("/opt/app/shaders"));
    }

    #[test]
    fn test_missing_file() {
        let err = UiConfig::load("/nonexistent/glint.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_bad_json() {
        assert!(UiConfig::from_json("{ \"glyph_page_size\": \"big\" }").is_err());
    }

    #[test]
    fn test_missing_shader_dir_falls_back_to_embedded() {
        let config = UiConfig {
            asset_root: PathBuf::from("/nonexistent/glint"),
            ..UiConfig::default()
        };
        assert!(matches!(config.shader_loader(), ShaderLoader::Embedded));
        assert_eq!(config.default_font(), Font::new("DejaVuSans", 24));
    }
}
