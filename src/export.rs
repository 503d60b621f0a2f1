use crate::config::Config;
use crate::docx::{docx_bytes, render_docx};
use crate::error::{ExportError, Result};
use crate::parse::parse_to_blocks;
use crate::pdf::render_pdf;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use tracing::info;

const DEFAULT_STEM: &str = "document";
const KNOWN_EXTENSIONS: &[&str] = &["docx", "pdf", "md", "markdown"];

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Docx,
    Pdf,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Pdf => "application/pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Docx => "docx",
            ExportFormat::Pdf => "pdf",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "docx" => Ok(ExportFormat::Docx),
            "pdf" => Ok(ExportFormat::Pdf),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A rendered document ready to be written or served as an attachment.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub filename: String,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl ExportedFile {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// Filename stem with path parts, quotes, control characters and known
/// extensions removed.
pub fn file_stem(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned: String = base
        .chars()
        .filter(|c| !c.is_control() && !matches!(c, '"' | '\'' | ';'))
        .collect();
    let mut stem = cleaned.trim();
    if let Some((head, ext)) = stem.rsplit_once('.') {
        if KNOWN_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
            stem = head.trim();
        }
    }
    let stem = stem.trim_matches('.');
    if stem.is_empty() {
        DEFAULT_STEM.to_string()
    } else {
        stem.to_string()
    }
}

/// Attachment filename for `name` in `format`.
pub fn sanitize_filename(name: &str, format: ExportFormat) -> String {
    format!("{}.{}", file_stem(name), format.extension())
}

/// Parses `markdown` once and renders it with the renderer for `format`.
pub fn export(
    markdown: &str,
    filename: &str,
    format: ExportFormat,
    config: &Config,
) -> Result<ExportedFile> {
    let blocks = parse_to_blocks(markdown);
    let bytes = match format {
        ExportFormat::Docx => docx_bytes(render_docx(&blocks, &config.docx))?,
        ExportFormat::Pdf => render_pdf(&blocks, &config.pdf, &file_stem(filename))?,
    };
    let file = ExportedFile {
        filename: sanitize_filename(filename, format),
        format,
        bytes,
    };
    info!(
        filename = %file.filename,
        format = %format,
        blocks = blocks.len(),
        bytes = file.bytes.len(),
        "exported document"
    );
    Ok(file)
}
