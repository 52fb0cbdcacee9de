//! Shaped glyph rendering for card text.
//!
//! Parley shapes each line (bidi, Arabic joining, ligatures) from the
//! configured font file; `vello_cpu` fills the resulting glyph runs.

use std::borrow::Cow;
use std::cell::RefCell;

use crate::layout::wrap::FontMeasure;
use crate::render::plan::{PlacedLine, Rgba8};
use crate::render::RenderError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush carried through Parley layouts.
pub struct TextBrush {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Rgba8> for TextBrush {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

struct ShapingContexts {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
}

/// Shapes and fills single lines of text with one registered font.
///
/// Not `Sync`: one instance lives inside a single compose call.
pub struct GlyphRasterizer {
    contexts: RefCell<ShapingContexts>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl GlyphRasterizer {
    pub fn new(font_bytes: &[u8]) -> Result<Self, RenderError> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| RenderError::Font("no font families in font file".to_string()))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| RenderError::Font("registered font family has no name".to_string()))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font_bytes.to_vec()),
            0,
        );

        Ok(Self {
            contexts: RefCell::new(ShapingContexts {
                font_ctx,
                layout_ctx: parley::LayoutContext::new(),
            }),
            family_name,
            font,
        })
    }

    fn shape_line(&self, text: &str, size_px: f32, brush: TextBrush) -> parley::Layout<TextBrush> {
        let mut contexts = self.contexts.borrow_mut();
        let ShapingContexts {
            font_ctx,
            layout_ctx,
        } = &mut *contexts;

        let mut builder = layout_ctx.ranged_builder(font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }

    /// Fills one placed line into `ctx`, centred on `line.center_x`.
    pub fn draw_line(&self, ctx: &mut vello_cpu::RenderContext, line: &PlacedLine) {
        if line.text.is_empty() {
            return;
        }
        let layout = self.shape_line(&line.text, line.size_px, line.color.into());
        let Some(first) = layout.lines().next() else {
            return;
        };

        let left = line.center_x - layout.width() / 2.0;
        let top = line.baseline_y - first.metrics().baseline;
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            f64::from(left),
            f64::from(top),
        )));

        for shaped in layout.lines() {
            for item in shaped.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                // Positioned glyphs carry the run offset, advance and baseline.
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }
}

impl FontMeasure for GlyphRasterizer {
    fn width_at(&self, text: &str, size_px: f32) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        self.shape_line(text, size_px, TextBrush::default()).width()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::plan::{TextRole, WHITE};
    use crate::render::DEFAULT_CARD_FONT;

    const W: u16 = 600;
    const H: u16 = 120;

    /// Draws `text` centred at x=300 and returns (shaped width, inked columns).
    fn ink_columns(text: &str) -> (f32, Vec<u16>) {
        let glyphs = GlyphRasterizer::new(DEFAULT_CARD_FONT).unwrap();
        let mut ctx = vello_cpu::RenderContext::new(W, H);
        glyphs.draw_line(
            &mut ctx,
            &PlacedLine {
                role: TextRole::Title,
                text: text.to_string(),
                size_px: 48.0,
                color: WHITE,
                center_x: 300.0,
                baseline_y: 80.0,
            },
        );
        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(W, H);
        ctx.render_to_pixmap(&mut pixmap);

        let data = pixmap.data_as_u8_slice();
        let alpha = |x: u16, y: u16| data[(usize::from(y) * usize::from(W) + usize::from(x)) * 4 + 3];
        let columns = (0..W).filter(|&x| (0..H).any(|y| alpha(x, y) > 0)).collect();
        (glyphs.width_at(text, 48.0), columns)
    }

    fn assert_spread_and_centred(text: &str) {
        let (width, columns) = ink_columns(text);
        assert!(width > 100.0, "shaped width too small: {width}");
        let (min, max) = (f32::from(columns[0]), f32::from(*columns.last().unwrap()));

        assert!(max - min >= width * 0.8, "{text:?}: ink {min}..{max} for width {width}");
        let centre = (min + max) / 2.0;
        assert!((centre - 300.0).abs() < width * 0.1, "{text:?}: ink centred at {centre}");
    }

    #[test]
    fn test_latin_line_spreads_across_its_width() {
        assert_spread_and_centred("Breaking news today");
    }

    #[test]
    fn test_arabic_line_spreads_across_its_width() {
        assert_spread_and_centred("سيارة ذاتية القيادة");
    }

    #[test]
    fn test_empty_line_draws_nothing() {
        let (width, columns) = ink_columns("");
        assert_eq!(width, 0.0);
        assert!(columns.is_empty());
    }

    #[test]
    fn test_rejects_non_font_bytes() {
        assert!(GlyphRasterizer::new(b"not a font").is_err());
    }
}
