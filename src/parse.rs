use crate::inline::strip_inline;
use crate::ir::Block;
use crate::normalize;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static RE_HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").unwrap());
static RE_UL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*+]\s+(.*)$").unwrap());
static RE_OL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s+(.*)$").unwrap());
static RE_TABLE_ROW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\|(.+)\|$").unwrap());
static RE_TABLE_DELIM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\|[-:\s|]+\|$").unwrap());

const FENCE: &str = "```";

fn parse_table_row(row: &str) -> Vec<String> {
    let inner = row
        .strip_prefix('|')
        .and_then(|r| r.strip_suffix('|'))
        .unwrap_or(row);
    inner.split('|').map(|c| strip_inline(c.trim())).collect()
}

#[derive(Default)]
struct Builder {
    blocks: Vec<Block>,
    paragraph: Vec<String>,
    list: Vec<String>,
    ordered: bool,
    code: Vec<String>,
    in_code: bool,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    in_table: bool,
}

impl Builder {
    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let text = strip_inline(&self.paragraph.join(" "));
        self.paragraph.clear();
        if !text.is_empty() {
            self.blocks.push(Block::Paragraph { text });
        }
    }

    fn flush_list(&mut self) {
        if self.list.is_empty() {
            return;
        }
        self.blocks.push(Block::List {
            items: std::mem::take(&mut self.list),
            ordered: self.ordered,
        });
        self.ordered = false;
    }

    fn flush_code(&mut self) {
        if !self.in_code {
            return;
        }
        self.blocks.push(Block::Code {
            text: self.code.join("\n"),
        });
        self.code.clear();
        self.in_code = false;
    }

    fn flush_table(&mut self) {
        if !self.in_table {
            return;
        }
        self.blocks.push(Block::Table {
            headers: std::mem::take(&mut self.headers),
            rows: std::mem::take(&mut self.rows),
        });
        self.in_table = false;
    }

    fn flush_open(&mut self) {
        self.flush_paragraph();
        self.flush_list();
        self.flush_table();
    }

    fn push_list_item(&mut self, item: &str, ordered: bool) {
        self.flush_paragraph();
        self.flush_table();
        if self.list.is_empty() {
            self.ordered = ordered;
        }
        self.list.push(strip_inline(item));
    }
}

/// Tokenizes markdown into a flat block sequence in one forward pass.
///
/// Total: anything unrecognized falls through to a paragraph line.
pub fn parse_to_blocks(markdown: &str) -> Vec<Block> {
    let lines = normalize::lines(markdown);
    let n = lines.len();
    let mut b = Builder::default();
    let mut i = 0;

    while i < n {
        let raw = lines[i];
        let t = raw.trim();
        i += 1;

        if t.starts_with(FENCE) {
            if b.in_code {
                b.flush_code();
            } else {
                b.flush_open();
                b.in_code = true;
            }
            continue;
        }

        if b.in_code {
            b.code.push(raw.to_string());
            continue;
        }

        if b.in_table {
            if !t.is_empty() && RE_TABLE_ROW.is_match(t) {
                b.rows.push(parse_table_row(t));
                continue;
            }
            b.flush_table();
        }

        if t.is_empty() {
            b.flush_open();
            continue;
        }

        if RE_TABLE_ROW.is_match(t) && i < n && RE_TABLE_DELIM.is_match(lines[i].trim()) {
            b.flush_paragraph();
            b.flush_list();
            b.headers = parse_table_row(t);
            b.in_table = true;
            i += 1; // separator
            continue;
        }

        if let Some(caps) = RE_HEADING.captures(t) {
            b.flush_open();
            b.blocks.push(Block::Heading {
                level: caps[1].len() as u8,
                text: strip_inline(&caps[2]),
            });
            continue;
        }

        if let Some(caps) = RE_UL.captures(t) {
            b.push_list_item(&caps[1], false);
            continue;
        }

        if let Some(caps) = RE_OL.captures(t) {
            b.push_list_item(&caps[1], true);
            continue;
        }

        b.flush_list();
        b.paragraph.push(t.to_string());
    }

    b.flush_paragraph();
    b.flush_list();
    b.flush_code();
    b.flush_table();

    debug!(lines = n, blocks = b.blocks.len(), "parsed markdown");
    b.blocks
}
