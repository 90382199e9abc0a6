use std::path::Path;

use async_trait::async_trait;
use calamine::{Reader, open_workbook_auto};

use crate::application::ports::{DocumentProcessor, ProcessorError};
use crate::domain::{ProcessorResult, WorkingFile};

use super::markdown_table::render_table;
use super::working_file_reader::{ensure_non_empty, join_error};

#[derive(Default)]
pub struct ExcelProcessor;

struct Sheet {
    name: String,
    rows: Vec<Vec<String>>,
}

impl ExcelProcessor {
    pub fn new() -> Self {
        Self
    }

    fn read_sheets(path: &Path) -> Result<Vec<Sheet>, ProcessorError> {
        let mut workbook = open_workbook_auto(path).map_err(|e| {
            ProcessorError::ExtractionFailed(format!("failed to open workbook: {e}"))
        })?;

        let names = workbook.sheet_names().to_vec();
        let mut sheets = Vec::with_capacity(names.len());

        for name in names {
            let range = workbook.worksheet_range(&name).map_err(|e| {
                ProcessorError::ExtractionFailed(format!("failed to read sheet {name}: {e}"))
            })?;

            let rows = range
                .rows()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect();

            sheets.push(Sheet { name, rows });
        }

        Ok(sheets)
    }
}

#[async_trait]
impl DocumentProcessor for ExcelProcessor {
    #[tracing::instrument(skip(self, file), fields(filename = %file.original_filename))]
    async fn process(&self, file: &WorkingFile) -> Result<ProcessorResult, ProcessorError> {
        ensure_non_empty(file).await?;

        let path = file.path.clone();
        let sheets = tokio::task::spawn_blocking(move || Self::read_sheets(&path))
            .await
            .map_err(join_error)??;

        if sheets.is_empty() {
            return Err(ProcessorError::NoContent(file.original_filename.clone()));
        }

        let mut sections = vec![format!("# {}", file.display_stem())];
        for sheet in &sheets {
            sections.push(format!("## {}", sheet.name));
            sections.push(render_table(&sheet.rows));
        }

        let sheet_names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
        tracing::info!(sheet_count = sheets.len(), "Workbook converted");

        Ok(ProcessorResult::success(sections.join("\n\n"))
            .with_metadata("sheet_count", sheets.len())
            .with_metadata("sheet_names", sheet_names)
            .with_metadata("file_extension", file.extension().unwrap_or_default()))
    }
}
