use crate::export::ExportFormat;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PdfConfig {
    #[serde(default = "default_page_width")]
    pub page_width: f32,

    #[serde(default = "default_page_height")]
    pub page_height: f32,

    #[serde(default = "default_margin")]
    pub margin: f32,

    #[serde(default = "default_font_size")]
    pub font_size: f32,

    /// Multiplied by the font size to get the baseline-to-baseline distance.
    #[serde(default = "default_line_height")]
    pub line_height: f32,

    #[serde(default = "default_code_font_size")]
    pub code_font_size: f32,

    #[serde(default = "default_table_font_size")]
    pub table_font_size: f32,

    #[serde(default = "default_cell_padding")]
    pub cell_padding: f32,

    #[serde(default = "default_paragraph_spacing")]
    pub paragraph_spacing: f32,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DocxConfig {
    #[serde(default = "default_code_font")]
    pub code_font: String,

    #[serde(default = "default_header_fill")]
    pub header_fill: String,

    #[serde(default = "default_code_highlight")]
    pub code_highlight: String,

    /// Table cell margin in twips, applied on all four sides.
    #[serde(default = "default_cell_margin")]
    pub cell_margin: usize,

    #[serde(default = "default_bullet")]
    pub bullet: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub format: ExportFormat,

    #[serde(default)]
    pub pdf: PdfConfig,

    #[serde(default)]
    pub docx: DocxConfig,
}

fn default_page_width() -> f32 {
    595.28
}
fn default_page_height() -> f32 {
    841.89
}
fn default_margin() -> f32 {
    50.0
}
fn default_font_size() -> f32 {
    11.0
}
fn default_line_height() -> f32 {
    1.4
}
fn default_code_font_size() -> f32 {
    9.0
}
fn default_table_font_size() -> f32 {
    10.0
}
fn default_cell_padding() -> f32 {
    4.0
}
fn default_paragraph_spacing() -> f32 {
    6.0
}
fn default_code_font() -> String {
    "Courier New".to_string()
}
fn default_header_fill() -> String {
    "D9D9D9".to_string()
}
fn default_code_highlight() -> String {
    "lightGray".to_string()
}
fn default_cell_margin() -> usize {
    100
}
fn default_bullet() -> String {
    "\u{2022}".to_string()
}

impl Default for PdfConfig {
    fn default() -> Self {
        PdfConfig {
            page_width: default_page_width(),
            page_height: default_page_height(),
            margin: default_margin(),
            font_size: default_font_size(),
            line_height: default_line_height(),
            code_font_size: default_code_font_size(),
            table_font_size: default_table_font_size(),
            cell_padding: default_cell_padding(),
            paragraph_spacing: default_paragraph_spacing(),
        }
    }
}

impl PdfConfig {
    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }
}

impl Default for DocxConfig {
    fn default() -> Self {
        DocxConfig {
            code_font: default_code_font(),
            header_fill: default_header_fill(),
            code_highlight: default_code_highlight(),
            cell_margin: default_cell_margin(),
            bullet: default_bullet(),
        }
    }
}
