//! Line layout and glyph coverage for figure annotations, using an embedded
//! copy of DejaVu Sans (see `assets/LICENSE-DejaVu`).

use ab_glyph::{ point, Font, FontRef, Glyph, GlyphId, PxScale, ScaleFont };
use crate::error::RenderError;

static DEJAVU_SANS: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// A parsed font face.
#[derive(Clone, Debug)]
pub struct Typeface {
    font: FontRef<'static>,
}

impl Typeface {
    /// Parse the embedded face.
    pub fn load() -> Result<Self, RenderError> {
        let font = FontRef::try_from_slice(DEJAVU_SANS)?;
        Ok(Self { font })
    }

    // position glyphs along a single line whose top edge sits at y = 0;
    // returns the glyphs and the total advance
    fn layout(&self, text: &str, size: f32) -> (Vec<Glyph>, f32) {
        let scaled = self.font.as_scaled(PxScale::from(size));
        let baseline = scaled.ascent();
        let mut caret: f32 = 0.0;
        let mut prev: Option<GlyphId> = None;
        let mut glyphs: Vec<Glyph> = Vec::with_capacity(text.len());
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(p) = prev { caret += scaled.kern(p, id); }
            glyphs.push(id.with_scale_and_position(size, point(caret, baseline)));
            caret += scaled.h_advance(id);
            prev = Some(id);
        }
        (glyphs, caret)
    }

    /// Advance width of a line of text, in pixels.
    pub fn width(&self, text: &str, size: f32) -> f32 { self.layout(text, size).1 }

    /// Height of a line box (ascent to descent), in pixels.
    pub fn line_height(&self, size: f32) -> f32 {
        self.font.as_scaled(PxScale::from(size)).height()
    }

    /// Rasterize a line of text, returning `(x, y, coverage)` for every pixel
    /// touched, relative to the top-left corner of the line box.
    ///
    /// Coverage lies in `[0, 1]`.
    pub fn coverage(&self, text: &str, size: f32) -> Vec<(i64, i64, f32)> {
        let (glyphs, _) = self.layout(text, size);
        let mut pixels: Vec<(i64, i64, f32)> = Vec::new();
        for glyph in glyphs {
            let Some(outlined) = self.font.outline_glyph(glyph) else { continue; };
            let bounds = outlined.px_bounds();
            let bx = bounds.min.x.floor() as i64;
            let by = bounds.min.y.floor() as i64;
            outlined.draw(|gx, gy, c| {
                if c > 0.0 {
                    pixels.push((bx + gx as i64, by + gy as i64, c.min(1.0)));
                }
            });
        }
        pixels
    }
}
