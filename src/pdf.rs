//! PDF output via `printpdf`, painting a [`Layout`] with the built-in fonts.

use crate::config::PdfConfig;
use crate::error::{ExportError, Result};
use crate::ir::Block;
use crate::layout::{render_layout, DrawOp, Layout};
use crate::metrics::StandardFont;
use printpdf::*;
use std::io::BufWriter;
use tracing::debug;

fn mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    mono: IndirectFontRef,
}

impl Fonts {
    fn load(doc: &PdfDocumentReference) -> Result<Self> {
        let font = |f: BuiltinFont| {
            doc.add_builtin_font(f)
                .map_err(|e| ExportError::Pdf(format!("font error: {e}")))
        };
        Ok(Fonts {
            regular: font(BuiltinFont::Helvetica)?,
            bold: font(BuiltinFont::HelveticaBold)?,
            mono: font(BuiltinFont::Courier)?,
        })
    }

    fn get(&self, font: StandardFont) -> &IndirectFontRef {
        match font {
            StandardFont::Helvetica => &self.regular,
            StandardFont::HelveticaBold => &self.bold,
            StandardFont::Courier => &self.mono,
        }
    }
}

fn fill(layer: &PdfLayerReference, gray: f32) {
    layer.set_fill_color(Color::Greyscale(Greyscale::new(gray, None)));
}

fn paint(layer: &PdfLayerReference, ops: &[DrawOp], fonts: &Fonts) {
    for op in ops {
        match op {
            DrawOp::Text {
                x,
                y,
                size,
                font,
                text,
            } => {
                fill(layer, 0.0);
                layer.use_text(text.as_str(), *size, mm(*x), mm(*y), fonts.get(*font));
            }
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                gray,
            } => {
                fill(layer, *gray);
                layer.add_rect(Rect::new(mm(*x), mm(*y), mm(x + width), mm(y + height)));
            }
            // Rules are painted as hairline rectangles.
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                thickness,
            } => {
                let half = thickness / 2.0;
                fill(layer, 0.6);
                layer.add_rect(Rect::new(
                    mm(x1.min(*x2) - half),
                    mm(y1.min(*y2) - half),
                    mm(x1.max(*x2) + half),
                    mm(y1.max(*y2) + half),
                ));
            }
        }
    }
}

/// Paints an already computed layout into PDF bytes.
pub fn write_pdf(layout: &Layout, title: &str) -> Result<Vec<u8>> {
    let (w, h) = (mm(layout.width), mm(layout.height));
    let (doc, first_page, first_layer) = PdfDocument::new(title, w, h, "Layer 1");
    let fonts = Fonts::load(&doc)?;

    for (i, page) in layout.pages.iter().enumerate() {
        let layer = if i == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (p, l) = doc.add_page(w, h, "Layer 1");
            doc.get_page(p).get_layer(l)
        };
        paint(&layer, &page.ops, &fonts);
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ExportError::Pdf(format!("save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ExportError::Pdf(format!("buffer error: {e}")))
}

/// Lays out and writes `blocks` as a PDF document.
pub fn render_pdf(blocks: &[Block], config: &PdfConfig, title: &str) -> Result<Vec<u8>> {
    let layout = render_layout(blocks, config);
    let bytes = write_pdf(&layout, title)?;
    debug!(pages = layout.pages.len(), bytes = bytes.len(), "rendered pdf");
    Ok(bytes)
}
