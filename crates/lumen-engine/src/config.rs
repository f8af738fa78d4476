//! Tunables for the UI pipeline.
//!
//! Defaults suit a desktop window. Any field can be overridden from the
//! environment with [`UiConfig::from_env`]:
//!
//! | variable                   | field                |
//! |----------------------------|----------------------|
//! | `LUMEN_ATLAS_SIZE`         | `atlas_size`         |
//! | `LUMEN_FONT_PX`            | `font_px`            |
//! | `LUMEN_MIN_BUFFER_BYTES`   | `min_buffer_bytes`   |
//! | `LUMEN_MAX_DROPPED_FRAMES` | `max_dropped_frames` |

use std::str::FromStr;

use thiserror::Error;

use crate::atlas::{AtlasBuilder, DEFAULT_GLYPH_PADDING, DEFAULT_WHITE_BLOCK};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var}={value:?} is not a valid {expected}")]
    Invalid { var: &'static str, value: String, expected: &'static str },
}

#[derive(Debug, Clone, PartialEq)]
pub struct UiConfig {
    /// Side length of the square glyph atlas, in texels.
    pub atlas_size: u32,
    pub glyph_padding: u32,
    pub white_block: u32,
    /// Pixel size glyphs are rasterized at.
    pub font_px: f32,
    /// Smallest device buffer allocated for vertices or indices.
    pub min_buffer_bytes: u64,
    /// Consecutive dropped frames tolerated before rendering fails.
    pub max_dropped_frames: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            atlas_size: 1024,
            glyph_padding: DEFAULT_GLYPH_PADDING,
            white_block: DEFAULT_WHITE_BLOCK,
            font_px: 18.0,
            min_buffer_bytes: 4096,
            max_dropped_frames: 8,
        }
    }
}

impl UiConfig {
    /// Defaults overridden by `LUMEN_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(v) = parse(&lookup, "LUMEN_ATLAS_SIZE", "non-zero texel count", |n: &u32| *n > 0)? {
            config.atlas_size = v;
        }
        if let Some(v) = parse(&lookup, "LUMEN_FONT_PX", "positive pixel size", |px: &f32| {
            px.is_finite() && *px > 0.0
        })? {
            config.font_px = v;
        }
        if let Some(v) = parse(&lookup, "LUMEN_MIN_BUFFER_BYTES", "byte count", |_: &u64| true)? {
            config.min_buffer_bytes = v;
        }
        if let Some(v) = parse(&lookup, "LUMEN_MAX_DROPPED_FRAMES", "frame count", |_: &u32| true)? {
            config.max_dropped_frames = v;
        }
        log::debug!("ui config: {config:?}");
        Ok(config)
    }

    /// An empty atlas builder with this configuration's size and spacing.
    pub fn atlas_builder(&self) -> AtlasBuilder {
        AtlasBuilder::new(self.atlas_size, self.atlas_size)
            .padding(self.glyph_padding)
            .white_block(self.white_block)
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    expected: &'static str,
    valid: impl Fn(&T) -> bool,
) -> Result<Option<T>, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    match raw.trim().parse::<T>() {
        Ok(v) if valid(&v) => Ok(Some(v)),
        _ => Err(ConfigError::Invalid { var, value: raw, expected }),
    }
}
