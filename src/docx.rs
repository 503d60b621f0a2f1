//! DOCX output built on the `docx-rs` object model.

use crate::config::DocxConfig;
use crate::error::{ExportError, Result};
use crate::ir::Block;
use docx_rs::*;
use std::io::Cursor;
use tracing::debug;

const BULLET_NUMBERING: usize = 1;
const DEEPEST_HEADING: u8 = 4;
/// Half-points per heading tier, `Heading1` first.
const HEADING_SIZES: [usize; 4] = [32, 28, 24, 22];
const CODE_SIZE: usize = 18;

/// Paragraph style id for a heading level; 5 and 6 share the deepest style.
pub fn heading_style_id(level: u8) -> String {
    format!("Heading{}", level.clamp(1, DEEPEST_HEADING))
}

fn heading_styles(docx: Docx) -> Docx {
    HEADING_SIZES
        .iter()
        .enumerate()
        .fold(docx, |docx, (i, size)| {
            let level = i as u8 + 1;
            docx.add_style(
                Style::new(heading_style_id(level), StyleType::Paragraph)
                    .name(format!("Heading {}", level))
                    .size(*size)
                    .bold(),
            )
        })
}

fn bullet_numbering(docx: Docx, bullet: &str) -> Docx {
    docx.add_abstract_numbering(
        AbstractNumbering::new(BULLET_NUMBERING).add_level(
            Level::new(
                0,
                Start::new(1),
                NumberFormat::new("bullet"),
                LevelText::new(bullet),
                LevelJc::new("left"),
            )
            .indent(Some(720), Some(SpecialIndentType::Hanging(360)), None, None),
        ),
    )
    .add_numbering(Numbering::new(BULLET_NUMBERING, BULLET_NUMBERING))
}

fn text_paragraph(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text))
}

fn table_cell(text: &str, header: bool, config: &DocxConfig) -> TableCell {
    let run = Run::new().add_text(text);
    let run = if header { run.bold() } else { run };
    let cell = TableCell::new().add_paragraph(Paragraph::new().add_run(run));
    if header {
        cell.shading(
            Shading::new()
                .shd_type(ShdType::Clear)
                .color("auto")
                .fill(config.header_fill.as_str()),
        )
    } else {
        cell
    }
}

fn table(headers: &[String], rows: &[Vec<String>], config: &DocxConfig) -> Table {
    let mut table_rows = Vec::with_capacity(rows.len() + 1);
    if !headers.is_empty() {
        table_rows.push(TableRow::new(
            headers.iter().map(|h| table_cell(h, true, config)).collect(),
        ));
    }
    for row in rows {
        table_rows.push(TableRow::new(
            row.iter().map(|c| table_cell(c, false, config)).collect(),
        ));
    }
    let m = config.cell_margin;
    Table::new(table_rows).margins(TableCellMargins::new().margin(m, m, m, m))
}

fn code_paragraph(line: &str, config: &DocxConfig) -> Paragraph {
    // An empty run collapses the line, so blank lines carry a space.
    let text = if line.trim().is_empty() { " " } else { line };
    Paragraph::new().add_run(
        Run::new()
            .add_text(text)
            .fonts(
                RunFonts::new()
                    .ascii(config.code_font.as_str())
                    .hi_ansi(config.code_font.as_str())
                    .cs(config.code_font.as_str()),
            )
            .size(CODE_SIZE)
            .highlight(config.code_highlight.as_str()),
    )
}

/// Builds the document tree for `blocks`. Never fails.
pub fn render_docx(blocks: &[Block], config: &DocxConfig) -> Docx {
    let docx = bullet_numbering(heading_styles(Docx::new()), &config.bullet);

    let docx = blocks.iter().fold(docx, |docx, block| match block {
        Block::Heading { level, text } => {
            docx.add_paragraph(text_paragraph(text).style(&heading_style_id(*level)))
        }
        Block::Paragraph { text } => docx.add_paragraph(text_paragraph(text)),
        Block::List {
            items,
            ordered: false,
        } => items.iter().fold(docx, |docx, item| {
            docx.add_paragraph(
                text_paragraph(item)
                    .numbering(NumberingId::new(BULLET_NUMBERING), IndentLevel::new(0)),
            )
        }),
        Block::List {
            items,
            ordered: true,
        } => items.iter().enumerate().fold(docx, |docx, (i, item)| {
            docx.add_paragraph(
                text_paragraph(&format!("{}. {}", i + 1, item)).indent(
                    Some(720),
                    Some(SpecialIndentType::Hanging(360)),
                    None,
                    None,
                ),
            )
        }),
        Block::Code { text } => text
            .split('\n')
            .fold(docx, |docx, line| docx.add_paragraph(code_paragraph(line, config))),
        Block::Table { headers, rows } => {
            if headers.is_empty() && rows.is_empty() {
                docx
            } else {
                docx.add_table(table(headers, rows, config))
            }
        }
    });

    debug!(blocks = blocks.len(), "built docx tree");
    docx
}

/// Packs a document tree into `.docx` bytes.
pub fn docx_bytes(docx: Docx) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .map_err(|e| ExportError::Docx(e.to_string()))?;
    Ok(cursor.into_inner())
}
