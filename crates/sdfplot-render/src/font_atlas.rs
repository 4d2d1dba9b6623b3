//! Baked ASCII glyph atlas.
//!
//! Printable ASCII (32..=126) is rasterized once at a fixed pixel size into a 512x512
//! single-channel bitmap using shelf packing. Text is then drawn as textured quads scaled
//! from the bake size, with plain advance widths and no kerning.

use std::path::Path;

use glam::Vec2;
use rusttype::{Font, Scale, point};
use sdfplot_core::profiling::profile_function;

use crate::Color;
use crate::config::FontSource;
use crate::instance::Instance;

/// Errors raised while baking the atlas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontError {
    /// The font file could not be read.
    Io(String),
    /// The bytes are not a TrueType/OpenType font.
    InvalidFontData,
    /// The glyphs do not fit in the atlas at the requested bake size.
    AtlasFull {
        requested_width: u32,
        requested_height: u32,
        atlas_width: u32,
        atlas_height: u32,
    },
}

impl std::fmt::Display for FontError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontError::Io(msg) => write!(f, "Failed to read font: {}", msg),
            FontError::InvalidFontData => write!(f, "Invalid font data"),
            FontError::AtlasFull {
                requested_width,
                requested_height,
                atlas_width,
                atlas_height,
            } => write!(
                f,
                "Font atlas is full: glyph {}x{} does not fit in {}x{}",
                requested_width, requested_height, atlas_width, atlas_height
            ),
        }
    }
}

impl std::error::Error for FontError {}

/// Placement of one baked glyph.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlyphInfo {
    /// Atlas pixel rectangle, `x1`/`y1` exclusive.
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
    /// Offset from the pen position on the baseline to the top-left of the bitmap.
    pub xoff: f32,
    pub yoff: f32,
    pub xadvance: f32,
}

impl GlyphInfo {
    pub fn is_blank(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }
}

pub struct FontAtlas {
    bake_size: f32,
    bitmap: Vec<u8>,
    glyphs: Vec<GlyphInfo>,
}

impl std::fmt::Debug for FontAtlas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontAtlas")
            .field("bake_size", &self.bake_size)
            .field("glyphs", &self.glyphs.len())
            .finish()
    }
}

impl FontAtlas {
    pub const SIZE: u32 = 512;
    pub const FIRST_CHAR: u32 = 32;
    pub const LAST_CHAR: u32 = 126;
    pub const GLYPH_COUNT: usize = (Self::LAST_CHAR - Self::FIRST_CHAR + 1) as usize;
    const PADDING: u32 = 1;

    /// Bake from the configured source. `FontSource::None` yields `Ok(None)`.
    pub fn from_source(source: &FontSource, bake_size: f32) -> Result<Option<Self>, FontError> {
        match source {
            FontSource::None => Ok(None),
            FontSource::Path(path) => Self::from_path(path, bake_size).map(Some),
            FontSource::Bytes(bytes) => Self::from_bytes(bytes.clone(), bake_size).map(Some),
        }
    }

    pub fn from_path(path: impl AsRef<Path>, bake_size: f32) -> Result<Self, FontError> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).map_err(|e| FontError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_bytes(bytes, bake_size)
    }

    pub fn from_bytes(bytes: Vec<u8>, bake_size: f32) -> Result<Self, FontError> {
        profile_function!();

        let font = Font::try_from_vec(bytes).ok_or(FontError::InvalidFontData)?;
        let scale = Scale::uniform(bake_size);
        let ascent = font.v_metrics(scale).ascent;

        let mut bitmap = vec![0u8; (Self::SIZE * Self::SIZE) as usize];
        let mut glyphs = Vec::with_capacity(Self::GLYPH_COUNT);
        let mut packer = ShelfPacker::new(Self::SIZE, Self::SIZE, Self::PADDING);

        for code in Self::FIRST_CHAR..=Self::LAST_CHAR {
            let Some(ch) = char::from_u32(code) else {
                glyphs.push(GlyphInfo::default());
                continue;
            };
            let scaled = font.glyph(ch).scaled(scale);
            let xadvance = scaled.h_metrics().advance_width;
            let positioned = scaled.positioned(point(0.0, ascent));

            let Some(bb) = positioned.pixel_bounding_box() else {
                glyphs.push(GlyphInfo {
                    xadvance,
                    ..Default::default()
                });
                continue;
            };

            let (w, h) = (bb.width() as u32, bb.height() as u32);
            let (x0, y0) = packer.allocate(w, h)?;
            positioned.draw(|gx, gy, coverage| {
                let index = ((y0 + gy) * Self::SIZE + x0 + gx) as usize;
                if let Some(px) = bitmap.get_mut(index) {
                    *px = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
                }
            });

            glyphs.push(GlyphInfo {
                x0: x0 as u16,
                y0: y0 as u16,
                x1: (x0 + w) as u16,
                y1: (y0 + h) as u16,
                xoff: bb.min.x as f32,
                yoff: bb.min.y as f32 - ascent,
                xadvance,
            });
        }

        tracing::info!(
            "Baked font atlas: {} glyphs at {}px, {} rows used",
            glyphs.len(),
            bake_size,
            packer.rows
        );

        Ok(Self {
            bake_size,
            bitmap,
            glyphs,
        })
    }

    /// Atlas with only advance metrics and an empty bitmap.
    #[cfg(test)]
    pub(crate) fn from_metrics(bake_size: f32, glyphs: Vec<GlyphInfo>) -> Self {
        Self {
            bake_size,
            bitmap: vec![0u8; (Self::SIZE * Self::SIZE) as usize],
            glyphs,
        }
    }

    pub fn bake_size(&self) -> f32 {
        self.bake_size
    }

    /// Single-channel coverage, `SIZE * SIZE` bytes, row-major.
    pub fn bitmap(&self) -> &[u8] {
        &self.bitmap
    }

    /// Metrics for `ch`, or `None` outside printable ASCII.
    pub fn glyph(&self, ch: char) -> Option<&GlyphInfo> {
        let code = ch as u32;
        if !(Self::FIRST_CHAR..=Self::LAST_CHAR).contains(&code) {
            return None;
        }
        self.glyphs.get((code - Self::FIRST_CHAR) as usize)
    }

    /// Sum of advances at `size` pixels; characters outside the baked range are skipped.
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        let scale = size / self.bake_size;
        text.chars()
            .filter_map(|ch| self.glyph(ch))
            .map(|g| g.xadvance * scale)
            .sum()
    }

    /// Glyph quads for `text` with its baseline starting at `origin`.
    pub fn layout(
        &self,
        text: &str,
        origin: Vec2,
        size: f32,
        color: Color,
        rotation: f32,
    ) -> Vec<Instance> {
        let scale = size / self.bake_size;
        let atlas = Self::SIZE as f32;
        let mut pen_x = origin.x;
        let mut quads = Vec::with_capacity(text.len());

        for glyph in text.chars().filter_map(|ch| self.glyph(ch)) {
            if !glyph.is_blank() {
                let pos = Vec2::new(pen_x + glyph.xoff * scale, origin.y + glyph.yoff * scale);
                let extent = Vec2::new(
                    f32::from(glyph.x1 - glyph.x0),
                    f32::from(glyph.y1 - glyph.y0),
                ) * scale;
                let uv = [
                    f32::from(glyph.x0) / atlas,
                    f32::from(glyph.y0) / atlas,
                    f32::from(glyph.x1) / atlas,
                    f32::from(glyph.y1) / atlas,
                ];
                quads.push(Instance::glyph(pos, extent, uv, color, rotation, origin));
            }
            pen_x += glyph.xadvance * scale;
        }
        quads
    }
}

/// Row-by-row packer: glyphs fill a shelf left to right, then a new shelf starts below.
struct ShelfPacker {
    width: u32,
    height: u32,
    padding: u32,
    x: u32,
    y: u32,
    row_height: u32,
    rows: u32,
}

impl ShelfPacker {
    fn new(width: u32, height: u32, padding: u32) -> Self {
        Self {
            width,
            height,
            padding,
            x: padding,
            y: padding,
            row_height: 0,
            rows: 1,
        }
    }

    fn allocate(&mut self, w: u32, h: u32) -> Result<(u32, u32), FontError> {
        let full = FontError::AtlasFull {
            requested_width: w,
            requested_height: h,
            atlas_width: self.width,
            atlas_height: self.height,
        };
        if w + 2 * self.padding > self.width {
            return Err(full);
        }
        if self.x + w + self.padding > self.width {
            self.x = self.padding;
            self.y += self.row_height + self.padding;
            self.row_height = 0;
            self.rows += 1;
        }
        if self.y + h + self.padding > self.height {
            return Err(full);
        }
        let origin = (self.x, self.y);
        self.x += w + self.padding;
        self.row_height = self.row_height.max(h);
        Ok(origin)
    }
}

/// Width of `text` when no font is loaded: half an em per printable ASCII character.
pub fn fallback_measure(text: &str, size: f32) -> f32 {
    let code_range = FontAtlas::FIRST_CHAR..=FontAtlas::LAST_CHAR;
    let count = text
        .chars()
        .filter(|ch| code_range.contains(&(*ch as u32)))
        .count();
    count as f32 * size * 0.5
}
