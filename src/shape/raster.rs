//! Glyph rasterization behind a single-method seam
//!
//! The target builder only needs one capability from the outside world:
//! render a payload of text lines into a coverage grid. That capability is
//! the [`GlyphRaster`] trait; everything downstream of the mask (ink scan,
//! wraparound, depth policy) stays pure and testable.
//!
//! Two backends:
//! - [`SwashRaster`]: real text rendering. fontdb discovers a bold face with
//!   CJK coverage, rustybuzz shapes each line (multi-codepoint symbols map
//!   to single glyphs, never split), swash renders alpha masks which are
//!   composited onto the canvas.
//! - [`StaticRaster`]: returns a fixed mask; used in tests, benchmarks, and
//!   as the degraded backend when no font can be found.

use rustybuzz::{Face, UnicodeBuffer};
use swash::scale::{Render, ScaleContext, Source, StrikeWith};
use swash::zeno::Format;
use thiserror::Error;

use crate::shape::mode::GlyphLine;
use crate::simulation::engine::Engine;

/// Canvas edge length in pixels
pub const CANVAS_SIZE: usize = 1024;

#[derive(Error, Debug)]
pub enum RasterError {
    #[error("no usable font: {0}")]
    FontUnavailable(String),

    #[error("failed to parse font data")]
    FontParse,
}

/// 8-bit coverage grid produced by a rasterization backend
#[derive(Debug, Clone)]
pub struct AlphaMask {
    pub width: usize,
    pub height: usize,
    data: Vec<u8>,
}

impl AlphaMask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    pub fn coverage(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    /// Composite a sample with max, so overlapping glyphs never erase ink
    pub fn blend_max(&mut self, x: usize, y: usize, alpha: u8) {
        let px = &mut self.data[y * self.width + x];
        *px = (*px).max(alpha);
    }
}

/// One-shot rasterization capability: payload in, coverage grid out.
pub trait GlyphRaster {
    fn rasterize_to_alpha_mask(&mut self, payload: &[GlyphLine]) -> Result<AlphaMask, RasterError>;
}

/// Fixed-mask backend. Serves as the test/bench stand-in and as the
/// degraded backend when font discovery fails (a blank mask has zero ink,
/// which the target builder turns into the ambient fallback).
#[derive(Debug, Clone)]
pub struct StaticRaster {
    pub mask: AlphaMask,
}

impl StaticRaster {
    pub fn new(mask: AlphaMask) -> Self {
        Self { mask }
    }

    pub fn blank() -> Self {
        Self::new(AlphaMask::new(CANVAS_SIZE, CANVAS_SIZE))
    }
}

impl GlyphRaster for StaticRaster {
    fn rasterize_to_alpha_mask(&mut self, _payload: &[GlyphLine]) -> Result<AlphaMask, RasterError> {
        Ok(self.mask.clone())
    }
}

/// A shaped glyph positioned in canvas pixels relative to the line's pen
/// origin (x rightward, y upward from the baseline).
#[derive(Debug, Clone, Copy)]
pub struct PlacedGlyph {
    pub glyph_id: u32, // full shaping id; narrowed only at the render call
    pub x: f32,
    pub y: f32,
}

/// Real text backend: fontdb discovery + rustybuzz shaping + swash rendering.
pub struct SwashRaster {
    font_data: Vec<u8>,
    face_index: u32,
    scale: ScaleContext,
}

impl SwashRaster {
    /// Load an explicit font file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, RasterError> {
        let font_data = std::fs::read(path)
            .map_err(|e| RasterError::FontUnavailable(format!("{}: {e}", path.display())))?;
        Self::from_data(font_data, 0)
    }

    /// Discover a bold face through fontdb, preferring `family` and then the
    /// CJK-capable Noto Sans families before falling back to any sans-serif.
    /// Partial glyph coverage of the chosen face is fine; it just produces a
    /// sparser shape.
    pub fn discover(family: Option<&str>) -> Result<Self, RasterError> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();

        let mut families = Vec::new();
        if let Some(name) = family {
            families.push(fontdb::Family::Name(name));
        }
        families.push(fontdb::Family::Name("Noto Sans CJK SC"));
        families.push(fontdb::Family::Name("Noto Sans SC"));
        families.push(fontdb::Family::SansSerif);

        let query = fontdb::Query {
            families: &families,
            weight: fontdb::Weight::BOLD,
            ..fontdb::Query::default()
        };

        let id = db
            .query(&query)
            .ok_or_else(|| RasterError::FontUnavailable("no matching system font".into()))?;
        let (font_data, face_index) = db
            .with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or_else(|| RasterError::FontUnavailable("font source unreadable".into()))?;

        Self::from_data(font_data, face_index)
    }

    /// Backend for an engine config: explicit file wins over discovery.
    pub fn for_engine(engine: &Engine) -> Result<Self, RasterError> {
        match &engine.font_path {
            Some(path) => Self::from_file(path),
            None => Self::discover(engine.font_family.as_deref()),
        }
    }

    fn from_data(font_data: Vec<u8>, face_index: u32) -> Result<Self, RasterError> {
        // Validate up front so rasterize never has to surface parse errors
        Face::from_slice(&font_data, face_index).ok_or(RasterError::FontParse)?;
        Ok(Self {
            font_data,
            face_index,
            scale: ScaleContext::new(),
        })
    }

    /// Shape one line at `px` and return the placed glyphs plus total
    /// advance width in pixels. Shaping runs the font's cmap/GSUB tables, so
    /// an emoji sequence comes back as one glyph rather than split parts.
    pub fn shape_line(&self, text: &str, px: f32) -> Result<(Vec<PlacedGlyph>, f32), RasterError> {
        let face =
            Face::from_slice(&self.font_data, self.face_index).ok_or(RasterError::FontParse)?;
        let units_per_em = face.units_per_em() as f32;
        let scale = px / units_per_em;

        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(text);
        let output = rustybuzz::shape(&face, &[], buffer);

        let mut glyphs = Vec::with_capacity(output.len());
        let mut pen_x = 0.0f32;
        for (info, pos) in output.glyph_infos().iter().zip(output.glyph_positions()) {
            glyphs.push(PlacedGlyph {
                glyph_id: info.glyph_id,
                x: pen_x + pos.x_offset as f32 * scale,
                y: pos.y_offset as f32 * scale,
            });
            pen_x += pos.x_advance as f32 * scale;
        }

        Ok((glyphs, pen_x))
    }

    /// Render one line centered horizontally, with the text's vertical
    /// middle anchored at `line.y_center`, compositing coverage onto `mask`.
    fn draw_line(&mut self, mask: &mut AlphaMask, line: &GlyphLine) -> Result<(), RasterError> {
        let (glyphs, width) = self.shape_line(line.text, line.px)?;
        let origin_x = CANVAS_SIZE as f32 / 2.0 - width / 2.0;

        let font =
            swash::FontRef::from_index(&self.font_data, self.face_index as usize)
                .ok_or(RasterError::FontParse)?;

        // The payload names where the middle of the text sits; glyph
        // rendering wants the baseline the glyphs rest on.
        let metrics = font.metrics(&[]);
        let em_scale = line.px / metrics.units_per_em as f32;
        let baseline = middle_to_baseline(line.y_center, metrics.ascent, metrics.descent, em_scale);

        let mut scaler = self.scale.builder(font).size(line.px).build();

        for glyph in &glyphs {
            // Anything outside the 16-bit glyph space cannot be rendered
            let Ok(glyph_id) = u16::try_from(glyph.glyph_id) else {
                continue;
            };

            let mut render = Render::new(&[
                Source::ColorOutline(0),
                Source::ColorBitmap(StrikeWith::BestFit),
                Source::Outline,
            ]);
            render.format(Format::Alpha);
            let image = render.render(&mut scaler, glyph_id);

            // Missing glyphs render as nothing; a partially supported payload
            // just produces a sparser shape, which is not an error
            let Some(image) = image else { continue };

            let left = origin_x + glyph.x + image.placement.left as f32;
            let top = baseline - glyph.y - image.placement.top as f32;
            composite(mask, &image.data, image.placement.width as usize, left, top);
        }

        Ok(())
    }
}

impl GlyphRaster for SwashRaster {
    fn rasterize_to_alpha_mask(&mut self, payload: &[GlyphLine]) -> Result<AlphaMask, RasterError> {
        let mut mask = AlphaMask::new(CANVAS_SIZE, CANVAS_SIZE);
        for line in payload {
            self.draw_line(&mut mask, line)?;
        }
        Ok(mask)
    }
}

/// Baseline for a line whose vertical middle should land on `y_center`.
///
/// With ascent above and descent below the baseline (both positive, in font
/// units scaled by `scale`), the text box spans [baseline - ascent,
/// baseline + descent]; placing its midpoint at `y_center` gives this offset.
fn middle_to_baseline(y_center: f32, ascent: f32, descent: f32, scale: f32) -> f32 {
    y_center + (ascent - descent) * scale / 2.0
}

/// Max-composite a glyph bitmap onto the mask at a (possibly off-canvas)
/// pixel origin, clipping to the canvas.
fn composite(mask: &mut AlphaMask, bitmap: &[u8], bitmap_width: usize, left: f32, top: f32) {
    if bitmap_width == 0 {
        return;
    }
    let rows = bitmap.len() / bitmap_width;
    let x0 = left.round() as i64;
    let y0 = top.round() as i64;

    for row in 0..rows {
        let dst_y = y0 + row as i64;
        if dst_y < 0 || dst_y >= mask.height as i64 {
            continue;
        }
        for col in 0..bitmap_width {
            let dst_x = x0 + col as i64;
            if dst_x < 0 || dst_x >= mask.width as i64 {
                continue;
            }
            let alpha = bitmap[row * bitmap_width + col];
            if alpha > 0 {
                mask.blend_max(dst_x as usize, dst_y as usize, alpha);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_blend_keeps_max() {
        let mut mask = AlphaMask::new(8, 8);
        mask.blend_max(3, 4, 120);
        mask.blend_max(3, 4, 80);
        assert_eq!(mask.coverage(3, 4), 120);
        assert_eq!(mask.coverage(0, 0), 0);
    }

    #[test]
    fn composite_clips_to_canvas() {
        let mut mask = AlphaMask::new(16, 16);
        // 2x2 bitmap straddling the top-left corner
        composite(&mut mask, &[255, 255, 255, 255], 2, -1.0, -1.0);
        assert_eq!(mask.coverage(0, 0), 255);
        assert_eq!(mask.coverage(1, 0), 0);
        assert_eq!(mask.coverage(0, 1), 0);
    }

    #[test]
    fn middle_anchor_centers_the_text_box() {
        // ascent 1900, descent 500, upem 2048, 480px line
        let scale = 480.0 / 2048.0;
        let baseline = middle_to_baseline(512.0, 1900.0, 500.0, scale);
        let top = baseline - 1900.0 * scale;
        let bottom = baseline + 500.0 * scale;
        assert!(((top + bottom) / 2.0 - 512.0).abs() < 1e-4);
        // a square font (descent == ascent) needs no offset at all
        assert_eq!(middle_to_baseline(512.0, 1000.0, 1000.0, scale), 512.0);
    }

    #[test]
    fn placed_glyph_carries_full_shaping_id() {
        let glyph = PlacedGlyph {
            glyph_id: 70_000, // beyond the 16-bit render space
            x: 0.0,
            y: 0.0,
        };
        assert_eq!(glyph.glyph_id, 70_000);
    }

    #[test]
    fn static_backend_returns_its_mask() {
        let mut mask = AlphaMask::new(4, 4);
        mask.blend_max(1, 2, 200);
        let mut raster = StaticRaster::new(mask);
        let out = raster.rasterize_to_alpha_mask(&[]).unwrap();
        assert_eq!(out.coverage(1, 2), 200);
    }
}
