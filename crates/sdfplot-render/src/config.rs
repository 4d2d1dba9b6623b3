use std::path::PathBuf;

use crate::Color;

/// Where the font atlas gets its TrueType data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FontSource {
    /// No font: text draws are skipped and measurement uses a fixed advance.
    #[default]
    None,
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl FontSource {
    /// First existing file among common system locations of a sans-serif font.
    pub fn system() -> Self {
        const CANDIDATES: &[&str] = &[
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "/Library/Fonts/Arial.ttf",
            "C:\\Windows\\Fonts\\arial.ttf",
        ];
        CANDIDATES
            .iter()
            .map(PathBuf::from)
            .find(|p| p.is_file())
            .map_or(Self::None, Self::Path)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Settings for [`PrimitiveRenderer`](crate::PrimitiveRenderer).
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Instance slots allocated up front.
    pub initial_capacity: usize,
    /// Extra slots added whenever the instance buffer has to grow.
    pub headroom: usize,
    /// Pixel height glyphs are rasterized at.
    pub bake_size: f32,
    pub font: FontSource,
    /// Number of image textures kept alive between frames.
    pub image_cache_capacity: usize,
    pub clear_color: Color,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
            headroom: 256,
            bake_size: 32.0,
            font: FontSource::None,
            image_cache_capacity: 16,
            clear_color: Color::WHITE,
        }
    }
}

impl RendererConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font(mut self, font: FontSource) -> Self {
        self.font = font;
        self
    }

    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_headroom(mut self, headroom: usize) -> Self {
        self.headroom = headroom;
        self
    }

    pub fn with_bake_size(mut self, bake_size: f32) -> Self {
        self.bake_size = bake_size;
        self
    }

    pub fn with_image_cache_capacity(mut self, capacity: usize) -> Self {
        self.image_cache_capacity = capacity;
        self
    }

    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RendererConfig::default();
        assert_eq!(config.initial_capacity, 1024);
        assert_eq!(config.headroom, 256);
        assert_eq!(config.bake_size, 32.0);
        assert!(config.font.is_none());
        assert_eq!(config.image_cache_capacity, 16);
    }

    #[test]
    fn builder_overrides() {
        let config = RendererConfig::new()
            .with_headroom(8)
            .with_font(FontSource::Bytes(vec![1, 2, 3]));
        assert_eq!(config.headroom, 8);
        assert_eq!(config.font, FontSource::Bytes(vec![1, 2, 3]));
    }
}
