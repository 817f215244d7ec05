use anyhow::{Result, bail};
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::{ExtractArgs, OcrMode};
use crate::model::{
    ExtractCounts, ExtractRunManifest, SourceInfo, TableRecord, TableSummary,
};
use crate::pdftext;
use crate::tables::{self, ExtractOptions};
use crate::util::{manifest_timestamp, run_id, sha256_file, write_json_file};
use crate::workbook;

pub fn run(args: ExtractArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = manifest_timestamp(started_ts);
    let run_id = run_id(started_ts);

    if !args.pdf_path.exists() {
        bail!("PDF file not found: {}", args.pdf_path.display());
    }

    let options = ExtractOptions {
        min_row_chars: args.min_row_chars,
        max_cell_chars: args.max_cell_chars,
        ..ExtractOptions::default()
    };

    let pdf_sha256 = sha256_file(&args.pdf_path)?;

    info!(
        pdf = %args.pdf_path.display(),
        run_id = %run_id,
        ocr_mode = args.ocr_mode.as_str(),
        "starting table extraction"
    );

    let mut warnings: Vec<String> = Vec::new();
    let mut counts = ExtractCounts::default();
    let mut tables: Vec<TableRecord> = Vec::new();

    let page_count = if args.ocr_mode == OcrMode::Force {
        // Force mode never touches the text layer, so the per-page OCR loop
        // takes its page count from pdfinfo instead.
        let total = pdftext::page_count(&args.pdf_path)?;
        let capped = args.max_pages.map_or(total, |max_pages| total.min(max_pages));
        info!(page_count = capped, "skipping text layer, OCR forced");
        capped
    } else {
        let text_layer = pdftext::extract_text_layer(&args.pdf_path, args.max_pages)?;
        let page_count = text_layer.page_count();
        info!(page_count, "extracted text layer");

        let outcome =
            tables::extract_tables_with_stats(&text_layer.merged(), page_count, &options)?;
        counts.line_count = outcome.line_count;
        counts.candidate_block_count = outcome.candidate_block_count;
        counts.fallback_used = outcome.used_fallback;
        counts.text_layer_table_count = outcome.tables.len();
        tables = outcome.tables;

        if tables.is_empty() {
            info!("text layer produced no tables");
        } else {
            info!(table_count = tables.len(), "found tables in text layer");
        }

        page_count
    };

    if tables.is_empty() && args.ocr_mode != OcrMode::Off {
        run_ocr_pass(
            &args,
            page_count,
            &options,
            &mut tables,
            &mut counts,
            &mut warnings,
        )?;
    }

    counts.table_count = tables.len();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tables)?);
    }

    let output_path = args
        .output_path
        .clone()
        .unwrap_or_else(|| args.pdf_path.with_extension("xlsx"));

    let mut written_output = None;
    if tables.is_empty() {
        // Not an error: the document simply has no recognizable tabular text.
        info!("no recognizable tables found; skipping workbook output");
    } else {
        workbook::write_workbook(&tables, &output_path)?;
        info!(
            path = %output_path.display(),
            table_count = tables.len(),
            "wrote workbook"
        );
        written_output = Some(output_path.display().to_string());
    }

    let manifest_path = args
        .manifest_path
        .clone()
        .unwrap_or_else(|| output_path.with_extension("extract.json"));

    let manifest = ExtractRunManifest {
        manifest_version: 1,
        run_id,
        status: "completed".to_string(),
        started_at,
        updated_at: manifest_timestamp(Utc::now()),
        command: render_extract_command(&args),
        tool_versions: pdftext::collect_tool_versions(),
        source: SourceInfo {
            pdf_path: args.pdf_path.display().to_string(),
            pdf_sha256,
            page_count,
        },
        counts,
        tables: tables.iter().map(TableSummary::from).collect(),
        output_path: written_output,
        warnings,
    };

    write_json_file(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote run manifest");

    Ok(())
}

/// OCRs every page and extracts tables from each page's recognized text.
/// Recovered tables are stamped with their source page and a run-wide index.
fn run_ocr_pass(
    args: &ExtractArgs,
    page_count: usize,
    options: &ExtractOptions,
    tables: &mut Vec<TableRecord>,
    counts: &mut ExtractCounts,
    warnings: &mut Vec<String>,
) -> Result<()> {
    if !pdftext::command_available("pdftoppm") || !pdftext::command_available("tesseract") {
        let message = format!(
            "OCR mode '{}' requested but pdftoppm/tesseract are unavailable",
            args.ocr_mode.as_str()
        );
        if args.ocr_mode == OcrMode::Force {
            bail!(message);
        }
        warn!(message = %message, "skipping OCR pass");
        warnings.push(message);
        return Ok(());
    }

    info!(page_count, ocr_lang = %args.ocr_lang, "starting OCR pass");

    for page_number in 1..=page_count {
        match pdftext::ocr_page(&args.pdf_path, page_number, &args.ocr_lang) {
            Ok(text) if !text.trim().is_empty() => {
                counts.ocr_page_count += 1;
                let outcome = tables::extract_tables_with_stats(&text, 1, options)?;
                counts.fallback_used |= outcome.used_fallback;

                for mut table in outcome.tables {
                    table.page = page_number as u32;
                    table.table_index = tables.len();
                    counts.ocr_table_count += 1;
                    tables.push(table);
                }
            }
            Ok(_) => {
                warnings.push(format!("OCR produced no text for page {page_number}"));
            }
            Err(error) => {
                warn!(page = page_number, error = %error, "OCR failed for page");
                warnings.push(format!("OCR failed for page {page_number}: {error}"));
            }
        }
    }

    info!(
        ocr_pages = counts.ocr_page_count,
        ocr_tables = counts.ocr_table_count,
        "OCR pass finished"
    );

    Ok(())
}

fn render_extract_command(args: &ExtractArgs) -> String {
    let mut command = vec![
        "pdftab".to_string(),
        "extract".to_string(),
        "--pdf-path".to_string(),
        args.pdf_path.display().to_string(),
    ];

    if let Some(path) = &args.output_path {
        command.push("--output-path".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.manifest_path {
        command.push("--manifest-path".to_string());
        command.push(path.display().to_string());
    }
    if let Some(max_pages) = args.max_pages {
        command.push("--max-pages".to_string());
        command.push(max_pages.to_string());
    }
    if args.ocr_mode != OcrMode::Auto {
        command.push("--ocr-mode".to_string());
        command.push(args.ocr_mode.as_str().to_string());
    }
    if args.ocr_lang != "eng+chi_sim" {
        command.push("--ocr-lang".to_string());
        command.push(args.ocr_lang.clone());
    }
    if args.min_row_chars != 5 {
        command.push("--min-row-chars".to_string());
        command.push(args.min_row_chars.to_string());
    }
    if args.max_cell_chars != 200 {
        command.push("--max-cell-chars".to_string());
        command.push(args.max_cell_chars.to_string());
    }
    if args.json {
        command.push("--json".to_string());
    }

    command.join(" ")
}
