mod excel_processor;
mod html_processor;
mod image_processor;
mod markdown_table;
mod mock_processor;
mod pdf_processor;
mod pdf_rasterizer;
mod processor_factory;
mod text_sanitizer;
mod working_file_reader;

pub use excel_processor::ExcelProcessor;
pub use html_processor::{
    HtmlMetadata, HtmlProcessor, decode_entities, extract_metadata, html_to_markdown,
};
pub use image_processor::{ImageProcessor, mime_type_for};
pub use markdown_table::{EMPTY_SHEET_MARKER, render_table};
pub use mock_processor::{MockBehavior, MockDocumentProcessor};
pub use pdf_processor::{PdfProcessor, is_scanned};
pub use pdf_rasterizer::{MAX_RASTERIZED_PAGES, RENDER_DPI};
pub use processor_factory::{ProcessorFactory, ProcessorFactoryError};
pub use text_sanitizer::{collapse_blank_lines, sanitize_extracted_text};
