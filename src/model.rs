use serde::{Deserialize, Serialize};

/// One reconstructed table. Invariants: `headers.len() >= 2`, every row has
/// exactly `headers.len()` cells, and `rows` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRecord {
    pub page: u32,
    pub table_index: usize,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableRecord {
    pub fn sheet_name(&self) -> String {
        format!("Page{}_Table{}", self.page, self.table_index + 1)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    pub sheet_name: String,
    pub page: u32,
    pub table_index: usize,
    pub column_count: usize,
    pub row_count: usize,
}

impl From<&TableRecord> for TableSummary {
    fn from(table: &TableRecord) -> Self {
        Self {
            sheet_name: table.sheet_name(),
            page: table.page,
            table_index: table.table_index,
            column_count: table.headers.len(),
            row_count: table.rows.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolVersions {
    pub pdftotext: Option<String>,
    pub pdftoppm: Option<String>,
    pub pdfinfo: Option<String>,
    pub tesseract: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceInfo {
    pub pdf_path: String,
    pub pdf_sha256: String,
    pub page_count: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractCounts {
    pub line_count: usize,
    pub candidate_block_count: usize,
    pub text_layer_table_count: usize,
    pub ocr_page_count: usize,
    pub ocr_table_count: usize,
    pub table_count: usize,
    pub fallback_used: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub command: String,
    pub tool_versions: ToolVersions,
    pub source: SourceInfo,
    pub counts: ExtractCounts,
    pub tables: Vec<TableSummary>,
    pub output_path: Option<String>,
    pub warnings: Vec<String>,
}
