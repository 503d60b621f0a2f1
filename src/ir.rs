use serde::Serialize;

/// One structurally classified unit of a Markdown document.
///
/// The parser produces a flat sequence of these in source order; no variant
/// ever contains another block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    List { items: Vec<String>, ordered: bool },
    /// Raw fenced content, lines joined with `\n`, never inline-stripped.
    Code { text: String },
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

impl Block {
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Heading { .. } => "heading",
            Block::Paragraph { .. } => "paragraph",
            Block::List { .. } => "list",
            Block::Code { .. } => "code",
            Block::Table { .. } => "table",
        }
    }
}
