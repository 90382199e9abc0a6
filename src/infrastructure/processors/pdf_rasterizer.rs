use std::io::Cursor;

use image::ImageFormat;
use pdfium_render::prelude::*;

use crate::application::ports::ProcessorError;

pub const MAX_RASTERIZED_PAGES: usize = 50;
pub const RENDER_DPI: f32 = 150.0;
const POINTS_PER_INCH: f32 = 72.0;

#[derive(Debug, Clone, Copy)]
pub(super) struct RasterOptions {
    pub dpi: f32,
    pub max_pages: usize,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            dpi: RENDER_DPI,
            max_pages: MAX_RASTERIZED_PAGES,
        }
    }
}

/// One rendered page; `number` is 1-based.
pub(super) struct PageImage {
    pub number: usize,
    pub png: Vec<u8>,
}

fn render_error(stage: &str, e: impl std::fmt::Display) -> ProcessorError {
    ProcessorError::ExtractionFailed(format!("pdfium {stage} failed: {e}"))
}

pub(super) fn rasterize(
    data: &[u8],
    options: RasterOptions,
) -> Result<Vec<PageImage>, ProcessorError> {
    let bindings = Pdfium::bind_to_system_library().map_err(|e| render_error("bind", e))?;
    let pdfium = Pdfium::new(bindings);
    let document = pdfium
        .load_pdf_from_byte_slice(data, None)
        .map_err(|e| render_error("open", e))?;

    let total = document.pages().len() as usize;
    let limit = total.min(options.max_pages);
    if total > limit {
        tracing::warn!(total, rendered = limit, "Scanned PDF truncated for OCR");
    }

    let scale = options.dpi / POINTS_PER_INCH;
    (0..limit)
        .map(|index| {
            let page = document
                .pages()
                .get(index as u16)
                .map_err(|e| render_error("page access", e))?;

            let config = PdfRenderConfig::new()
                .set_target_width((page.width().value * scale) as i32)
                .set_target_height((page.height().value * scale) as i32);
            let bitmap = page
                .render_with_config(&config)
                .map_err(|e| render_error("render", e))?;

            let mut png = Vec::new();
            bitmap
                .as_image()
                .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
                .map_err(|e| render_error("png encode", e))?;

            Ok(PageImage {
                number: index + 1,
                png,
            })
        })
        .collect()
}
