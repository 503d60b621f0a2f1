//! Page layout for PDF output: word wrap, page breaking, and placement of
//! text and simple graphics for each block.
//!
//! Produces positioned primitives only; [`crate::pdf`] paints them.

use crate::config::PdfConfig;
use crate::ir::Block;
use crate::metrics::{StandardFont, TextMeasure};
use crate::sanitize::sanitize_for_pdf;
use tracing::{debug, warn};

const LIST_INDENT: f32 = 10.0;
const LIST_ITEM_SPACING: f32 = 2.0;
const HEADING_SPACING_AFTER: f32 = 4.0;
const RULE_THICKNESS: f32 = 0.5;
const HEADER_GRAY: f32 = 0.88;
const CODE_GRAY: f32 = 0.95;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// `y` is the text baseline.
    Text {
        x: f32,
        y: f32,
        size: f32,
        font: StandardFont,
        text: String,
    },
    /// Filled rectangle, `(x, y)` is the lower-left corner.
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        gray: f32,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        thickness: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    pub pages: Vec<Page>,
}

impl Layout {
    /// Every drawn string, in paint order.
    pub fn text_content(&self) -> Vec<&str> {
        self.pages
            .iter()
            .flat_map(|p| p.ops.iter())
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Greedy word wrap measured on the candidate line.
///
/// A word wider than `max_width` on its own is placed alone, never split.
pub fn wrap_text<M: TextMeasure + ?Sized>(
    text: &str,
    measure: &M,
    size: f32,
    max_width: f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", current, word);
        if measure.text_width(&candidate, size) > max_width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Heading size and spacing-before, in points. Three tiers only.
pub fn heading_style(level: u8) -> (f32, f32) {
    match level {
        1 => (18.0, 16.0),
        2 => (14.0, 12.0),
        _ => (12.0, 8.0),
    }
}

fn clean(text: &str) -> String {
    let cleaned = sanitize_for_pdf(text);
    if cleaned.len() != text.len() {
        debug!(
            before = text.chars().count(),
            after = cleaned.chars().count(),
            "sanitized text for standard fonts"
        );
    }
    cleaned
}

struct Cursor<'a> {
    config: &'a PdfConfig,
    done: Vec<Page>,
    current: Page,
    y: f32,
}

impl<'a> Cursor<'a> {
    fn new(config: &'a PdfConfig) -> Self {
        Cursor {
            config,
            done: Vec::new(),
            current: Page::default(),
            y: config.page_height - config.margin,
        }
    }

    fn top(&self) -> f32 {
        self.config.page_height - self.config.margin
    }

    fn new_page(&mut self) {
        self.done.push(std::mem::take(&mut self.current));
        self.y = self.top();
    }

    fn ensure_space(&mut self, required: f32) {
        if self.y - required < self.config.margin && self.y < self.top() {
            self.new_page();
        }
    }

    fn skip(&mut self, amount: f32) {
        self.y -= amount;
    }

    fn push(&mut self, op: DrawOp) {
        self.current.ops.push(op);
    }

    fn text(&mut self, x: f32, baseline: f32, size: f32, font: StandardFont, text: &str) {
        if text.is_empty() {
            return;
        }
        self.push(DrawOp::Text {
            x,
            y: baseline,
            size,
            font,
            text: text.to_string(),
        });
    }

    fn line_height(&self, size: f32) -> f32 {
        size * self.config.line_height
    }

    fn text_line(&mut self, x: f32, text: &str, size: f32, font: StandardFont) {
        let lh = self.line_height(size);
        self.ensure_space(lh);
        let baseline = self.y - size;
        self.text(x, baseline, size, font, text);
        self.y -= lh;
    }

    fn finish(mut self) -> Layout {
        self.done.push(self.current);
        Layout {
            width: self.config.page_width,
            height: self.config.page_height,
            pages: self.done,
        }
    }

    fn heading(&mut self, level: u8, text: &str) {
        let (size, before) = heading_style(level);
        let font = StandardFont::HelveticaBold;
        let lines = wrap_text(&clean(text), &font, size, self.config.content_width());
        if self.y < self.top() {
            self.skip(before);
        }
        // Keep a heading's lines on one page.
        self.ensure_space(lines.len() as f32 * self.line_height(size));
        for line in &lines {
            self.text_line(self.config.margin, line, size, font);
        }
        self.skip(HEADING_SPACING_AFTER);
    }

    fn paragraph(&mut self, text: &str) {
        let size = self.config.font_size;
        let font = StandardFont::Helvetica;
        for line in wrap_text(&clean(text), &font, size, self.config.content_width()) {
            self.text_line(self.config.margin, &line, size, font);
        }
        self.skip(self.config.paragraph_spacing);
    }

    fn list(&mut self, items: &[String], ordered: bool) {
        let size = self.config.font_size;
        let font = StandardFont::Helvetica;
        let lh = self.line_height(size);
        let x = self.config.margin + LIST_INDENT;

        for (i, item) in items.iter().enumerate() {
            let prefix = if ordered {
                format!("{}. ", i + 1)
            } else {
                "\u{2022} ".to_string()
            };
            let prefix_width = font.text_width(&prefix, size);
            let text_x = x + prefix_width;
            let max_width = self.config.content_width() - LIST_INDENT - prefix_width;
            let lines = wrap_text(&clean(item), &font, size, max_width);

            self.ensure_space(lh);
            let baseline = self.y - size;
            self.text(x, baseline, size, font, &prefix);
            match lines.split_first() {
                Some((first, rest)) => {
                    self.text(text_x, baseline, size, font, first);
                    self.y -= lh;
                    for line in rest {
                        self.text_line(text_x, line, size, font);
                    }
                }
                None => self.y -= lh,
            }
            self.skip(LIST_ITEM_SPACING);
        }
        self.skip(self.config.paragraph_spacing);
    }

    fn code(&mut self, text: &str) {
        let size = self.config.code_font_size;
        let lh = self.line_height(size);
        let pad = self.config.cell_padding;
        let width = self.config.content_width();
        let max_chars = (((width - 2.0 * pad) / StandardFont::monospace_advance(size)) as usize).max(1);

        for source_line in text.split('\n') {
            let chars: Vec<char> = clean(source_line).chars().collect();
            let chunks: Vec<String> = if chars.is_empty() {
                vec![String::new()]
            } else {
                chars.chunks(max_chars).map(|c| c.iter().collect()).collect()
            };
            for chunk in chunks {
                self.ensure_space(lh);
                self.push(DrawOp::Rect {
                    x: self.config.margin,
                    y: self.y - lh,
                    width,
                    height: lh,
                    gray: CODE_GRAY,
                });
                let baseline = self.y - size;
                self.text(self.config.margin + pad, baseline, size, StandardFont::Courier, &chunk);
                self.y -= lh;
            }
        }
        self.skip(self.config.paragraph_spacing);
    }

    fn table(&mut self, headers: &[String], rows: &[Vec<String>]) {
        let columns = if headers.is_empty() {
            rows.iter().map(Vec::len).max().unwrap_or(0)
        } else {
            headers.len()
        };
        if columns == 0 {
            warn!("skipping table without cells");
            return;
        }
        let col_width = self.config.content_width() / columns as f32;

        self.ensure_space(self.line_height(self.config.table_font_size));
        let (x1, x2, y) = (self.config.margin, self.config.margin + self.config.content_width(), self.y);
        self.push(DrawOp::Line { x1, y1: y, x2, y2: y, thickness: RULE_THICKNESS });

        if !headers.is_empty() {
            self.table_row(headers, columns, col_width, true);
        }
        for row in rows {
            self.table_row(row, columns, col_width, false);
        }
        self.skip(self.config.paragraph_spacing);
    }

    fn table_row(&mut self, cells: &[String], columns: usize, col_width: f32, header: bool) {
        let size = self.config.table_font_size;
        let lh = self.line_height(size);
        let pad = self.config.cell_padding;
        let font = if header {
            StandardFont::HelveticaBold
        } else {
            StandardFont::Helvetica
        };

        let wrapped: Vec<Vec<String>> = cells
            .iter()
            .map(|c| wrap_text(&clean(c), &font, size, col_width - 2.0 * pad))
            .collect();
        let line_count = wrapped.iter().map(Vec::len).max().unwrap_or(0).max(1);

        // A row taller than a page continues on the next one.
        let usable = self.config.page_height - 2.0 * self.config.margin - 2.0 * pad;
        let per_page = ((usable / lh).floor() as usize).max(1);
        if line_count > per_page {
            debug!(lines = line_count, per_page, "splitting table row across pages");
        }
        let mut start = 0;
        while start < line_count {
            let end = start + per_page;
            let segment: Vec<&[String]> = wrapped
                .iter()
                .map(|lines| &lines[start.min(lines.len())..end.min(lines.len())])
                .collect();
            self.row_segment(&segment, columns, col_width, font, header);
            start = end;
        }
    }

    fn row_segment(
        &mut self,
        cells: &[&[String]],
        columns: usize,
        col_width: f32,
        font: StandardFont,
        header: bool,
    ) {
        let size = self.config.table_font_size;
        let lh = self.line_height(size);
        let pad = self.config.cell_padding;
        let margin = self.config.margin;
        let width = self.config.content_width();

        let line_count = cells.iter().map(|c| c.len()).max().unwrap_or(0).max(1);
        let height = line_count as f32 * lh + 2.0 * pad;

        self.ensure_space(height);
        let top = self.y;
        let bottom = top - height;

        if header {
            self.push(DrawOp::Rect {
                x: margin,
                y: bottom,
                width,
                height,
                gray: HEADER_GRAY,
            });
        }
        for (ci, lines) in cells.iter().enumerate() {
            let x = margin + ci as f32 * col_width + pad;
            for (li, line) in lines.iter().enumerate() {
                let baseline = top - pad - li as f32 * lh - size;
                self.text(x, baseline, size, font, line);
            }
        }
        for ci in 1..columns {
            let x = margin + ci as f32 * col_width;
            self.push(DrawOp::Line {
                x1: x,
                y1: top,
                x2: x,
                y2: bottom,
                thickness: RULE_THICKNESS,
            });
        }
        self.push(DrawOp::Line {
            x1: margin,
            y1: bottom,
            x2: margin + width,
            y2: bottom,
            thickness: RULE_THICKNESS,
        });
        self.y = bottom;
    }
}

/// Lays out blocks onto pages. Always returns at least one page.
pub fn render_layout(blocks: &[Block], config: &PdfConfig) -> Layout {
    let mut cursor = Cursor::new(config);
    for block in blocks {
        match block {
            Block::Heading { level, text } => cursor.heading(*level, text),
            Block::Paragraph { text } => cursor.paragraph(text),
            Block::List { items, ordered } => cursor.list(items, *ordered),
            Block::Code { text } => cursor.code(text),
            Block::Table { headers, rows } => cursor.table(headers, rows),
        }
    }
    let layout = cursor.finish();
    debug!(blocks = blocks.len(), pages = layout.pages.len(), "laid out pdf");
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_to_blocks;
    use proptest::prelude::*;

    /// One point per character.
    struct CharCount;

    impl TextMeasure for CharCount {
        fn text_width(&self, text: &str, _size: f32) -> f32 {
            text.chars().count() as f32
        }
    }

    fn texts(layout: &Layout) -> Vec<String> {
        layout.text_content().iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_wrap_breaks_before_overflowing_word() {
        let lines = wrap_text("aaa bbb ccc", &CharCount, 10.0, 7.0);
        assert_eq!(lines, vec!["aaa bbb", "ccc"]);
    }

    #[test]
    fn test_wrap_exact_fit() {
        let lines = wrap_text("ab cd", &CharCount, 10.0, 5.0);
        assert_eq!(lines, vec!["ab cd"]);
    }

    #[test]
    fn test_wrap_long_word_alone() {
        let lines = wrap_text("a verylongword b", &CharCount, 10.0, 5.0);
        assert_eq!(lines, vec!["a", "verylongword", "b"]);
    }

    #[test]
    fn test_wrap_empty() {
        assert!(wrap_text("", &CharCount, 10.0, 5.0).is_empty());
        assert!(wrap_text("   ", &CharCount, 10.0, 5.0).is_empty());
    }

    #[test]
    fn test_wrap_collapses_whitespace() {
        assert_eq!(wrap_text("a   b", &CharCount, 10.0, 50.0), vec!["a b"]);
    }

    #[test]
    fn test_heading_tiers() {
        assert_eq!(heading_style(1), (18.0, 16.0));
        assert_eq!(heading_style(2), (14.0, 12.0));
        for level in 3..=6 {
            assert_eq!(heading_style(level), (12.0, 8.0));
        }
    }

    #[test]
    fn test_empty_blocks_single_page() {
        let layout = render_layout(&[], &PdfConfig::default());
        assert_eq!(layout.pages.len(), 1);
        assert!(layout.pages[0].ops.is_empty());
    }

    #[test]
    fn test_heading_is_bold_at_tier_size() {
        let layout = render_layout(&parse_to_blocks("## Agenda"), &PdfConfig::default());
        match &layout.pages[0].ops[0] {
            DrawOp::Text { size, font, text, .. } => {
                assert_eq!(*size, 14.0);
                assert_eq!(*font, StandardFont::HelveticaBold);
                assert_eq!(text, "Agenda");
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_first_heading_starts_at_top() {
        let config = PdfConfig::default();
        let layout = render_layout(&parse_to_blocks("# Title"), &config);
        match &layout.pages[0].ops[0] {
            DrawOp::Text { y, .. } => {
                assert!((y - (config.page_height - config.margin - 18.0)).abs() < 1e-3)
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_list_prefixes() {
        let layout = render_layout(&parse_to_blocks("- a\n- b"), &PdfConfig::default());
        assert_eq!(texts(&layout), vec!["\u{2022} ", "a", "\u{2022} ", "b"]);

        let layout = render_layout(&parse_to_blocks("1. a\n2. b"), &PdfConfig::default());
        assert_eq!(texts(&layout), vec!["1. ", "a", "2. ", "b"]);
    }

    #[test]
    fn test_list_continuation_aligned_under_text() {
        let item = "word ".repeat(60);
        let md = format!("- {}", item);
        let layout = render_layout(&parse_to_blocks(&md), &PdfConfig::default());
        let xs: Vec<f32> = layout.pages[0]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { x, text, .. } if text.starts_with("word") => Some(*x),
                _ => None,
            })
            .collect();
        assert!(xs.len() > 1);
        assert!(xs.iter().all(|x| (x - xs[0]).abs() < 1e-3));
    }

    #[test]
    fn test_code_lines_kept_with_background() {
        let layout = render_layout(&parse_to_blocks("```\n  indented\n\nlast\n```"), &PdfConfig::default());
        let rects = layout.pages[0]
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Rect { .. }))
            .count();
        assert_eq!(rects, 3);
        assert_eq!(texts(&layout), vec!["  indented", "last"]);
        assert!(layout.pages[0].ops.iter().any(|op| matches!(
            op,
            DrawOp::Text { font: StandardFont::Courier, .. }
        )));
    }

    #[test]
    fn test_long_code_line_split() {
        let md = format!("```\n{}\n```", "x".repeat(300));
        let layout = render_layout(&parse_to_blocks(&md), &PdfConfig::default());
        let joined: String = layout.text_content().concat();
        assert_eq!(joined, "x".repeat(300));
        assert!(layout.text_content().len() > 1);
    }

    #[test]
    fn test_table_cells_and_rules() {
        let layout = render_layout(
            &parse_to_blocks("| A | B | C |\n|---|---|---|\n| 1 | 2 | 3 |"),
            &PdfConfig::default(),
        );
        assert_eq!(texts(&layout), vec!["A", "B", "C", "1", "2", "3"]);
        let ops = &layout.pages[0].ops;
        let shaded = ops.iter().filter(|op| matches!(op, DrawOp::Rect { .. })).count();
        assert_eq!(shaded, 1);
        // top rule, then per row: two column dividers and one separator
        let lines = ops.iter().filter(|op| matches!(op, DrawOp::Line { .. })).count();
        assert_eq!(lines, 1 + 2 * 3);
    }

    #[test]
    fn test_table_columns_equal_width() {
        let config = PdfConfig::default();
        let layout = render_layout(&parse_to_blocks("| A | B |\n|---|---|\n| 1 | 2 |"), &config);
        let xs: Vec<f32> = layout.pages[0]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { x, text, .. } if text == "1" || text == "2" => Some(*x),
                _ => None,
            })
            .collect();
        let expected = config.content_width() / 2.0;
        assert!((xs[1] - xs[0] - expected).abs() < 1e-3);
    }

    #[test]
    fn test_table_row_height_from_tallest_cell() {
        let config = PdfConfig::default();
        let long = "word ".repeat(80);
        let md = format!("| A | B |\n|---|---|\n| {} | x |", long);
        let layout = render_layout(&parse_to_blocks(&md), &config);
        let separators: Vec<f32> = layout.pages[0]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Line { y1, y2, .. } if (y1 - y2).abs() < 1e-6 => Some(*y1),
                _ => None,
            })
            .collect();
        // top rule, header separator, data separator
        assert_eq!(separators.len(), 3);
        let header_height = separators[0] - separators[1];
        let data_height = separators[1] - separators[2];
        assert!(data_height > header_height * 2.0);
    }

    #[test]
    fn test_tall_table_row_continues_on_next_page() {
        let config = PdfConfig::default();
        let words = 4000;
        let md = format!("| Notes |\n|---|\n| {} |", "word ".repeat(words));
        let layout = render_layout(&parse_to_blocks(&md), &config);
        assert!(layout.pages.len() > 2);
        for page in &layout.pages {
            for op in &page.ops {
                if let DrawOp::Text { y, .. } = op {
                    assert!(*y >= config.margin - 1e-3, "text below margin at {}", y);
                }
                if let DrawOp::Line { y1, y2, .. } = op {
                    assert!(y1.min(*y2) >= config.margin - 1e-3);
                }
            }
        }
        let drawn: usize = layout
            .text_content()
            .iter()
            .filter(|t| t.starts_with("word"))
            .map(|t| t.split_whitespace().count())
            .sum();
        assert_eq!(drawn, words);
    }

    #[test]
    fn test_wide_glyphs_wrap_by_real_width() {
        let dashes = "\u{2014}".repeat(40);
        let text = format!("{} {}", dashes, dashes);
        let font = StandardFont::Helvetica;
        let lines = wrap_text(&text, &font, 11.0, 495.28);
        assert_eq!(lines.len(), 2);
        assert!((font.text_width(&lines[0], 11.0) - 440.0).abs() < 1e-3);
    }

    #[test]
    fn test_empty_table_skipped() {
        let blocks = vec![Block::Table {
            headers: vec![],
            rows: vec![],
        }];
        let layout = render_layout(&blocks, &PdfConfig::default());
        assert!(layout.pages[0].ops.is_empty());
    }

    #[test]
    fn test_headerless_table_uses_row_width() {
        let blocks = vec![Block::Table {
            headers: vec![],
            rows: vec![vec!["1".to_string(), "2".to_string()]],
        }];
        let layout = render_layout(&blocks, &PdfConfig::default());
        assert_eq!(texts(&layout), vec!["1", "2"]);
    }

    #[test]
    fn test_sanitized_before_drawing() {
        let layout = render_layout(&parse_to_blocks("Done \u{2705} today"), &PdfConfig::default());
        assert_eq!(texts(&layout), vec!["Done today"]);
    }

    #[test]
    fn test_page_breaks() {
        let config = PdfConfig::default();
        let md = (0..200).map(|i| format!("Paragraph number {}\n", i)).collect::<Vec<_>>().join("\n");
        let layout = render_layout(&parse_to_blocks(&md), &config);
        assert!(layout.pages.len() > 1);
        for page in &layout.pages {
            for op in &page.ops {
                if let DrawOp::Text { y, .. } = op {
                    assert!(*y >= config.margin - 1e-3);
                    assert!(*y <= config.page_height - config.margin);
                }
            }
        }
        assert_eq!(layout.text_content().len(), 200);
    }

    proptest! {
        #[test]
        fn prop_wrap_respects_max_width(
            words in prop::collection::vec("[a-zA-Z]{1,15}", 0..40),
            max_width in 20.0f32..300.0,
        ) {
            let text = words.join(" ");
            let font = StandardFont::Helvetica;
            let lines = wrap_text(&text, &font, 11.0, max_width);
            for line in &lines {
                let fits = font.text_width(line, 11.0) <= max_width;
                prop_assert!(fits || !line.contains(' '), "line {:?} overflows", line);
            }
            prop_assert_eq!(lines.join(" "), text);
        }
    }
}
