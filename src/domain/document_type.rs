use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Pdf,
    Image,
    Excel,
    Html,
    Unsupported,
}

const PDF_EXTENSIONS: &[&str] = &[".pdf"];
const IMAGE_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp", ".tiff", ".tif",
];
const EXCEL_EXTENSIONS: &[&str] = &[".xls", ".xlsx"];
const HTML_EXTENSIONS: &[&str] = &[".html", ".htm"];

impl DocumentType {
    /// Every type a processor can be registered for, in display order.
    pub const PROCESSABLE: [DocumentType; 4] = [Self::Pdf, Self::Excel, Self::Image, Self::Html];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Image => "image",
            Self::Excel => "excel",
            Self::Html => "html",
            Self::Unsupported => "unsupported",
        }
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Pdf => PDF_EXTENSIONS,
            Self::Image => IMAGE_EXTENSIONS,
            Self::Excel => EXCEL_EXTENSIONS,
            Self::Html => HTML_EXTENSIONS,
            Self::Unsupported => &[],
        }
    }

    pub fn from_extension(extension: &str) -> Self {
        let normalized = extension.to_ascii_lowercase();
        let dotted = if normalized.starts_with('.') {
            normalized
        } else {
            format!(".{normalized}")
        };

        Self::PROCESSABLE
            .into_iter()
            .find(|t| t.extensions().contains(&dotted.as_str()))
            .unwrap_or(Self::Unsupported)
    }

    pub fn from_mime(mime: &str) -> Self {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "application/pdf" => Self::Pdf,
            "image/jpeg" | "image/jpg" | "image/png" | "image/gif" | "image/webp"
            | "image/bmp" | "image/tiff" => Self::Image,
            "application/vnd.ms-excel"
            | "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => Self::Excel,
            "text/html" | "application/xhtml+xml" => Self::Html,
            _ => Self::Unsupported,
        }
    }

    /// Magic-number detection for uploads that arrive without an extension.
    pub fn from_magic(bytes: &[u8]) -> Self {
        if bytes.starts_with(b"%PDF-") {
            return Self::Pdf;
        }

        let is_image = bytes.starts_with(b"\x89PNG\r\n\x1a\n")
            || bytes.starts_with(&[0xFF, 0xD8, 0xFF])
            || bytes.starts_with(b"GIF87a")
            || bytes.starts_with(b"GIF89a")
            || (bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP")
            || is_bmp(bytes)
            || bytes.starts_with(b"II*\0")
            || bytes.starts_with(b"MM\0*");
        if is_image {
            return Self::Image;
        }

        let head_len = bytes.len().min(512);
        let head = String::from_utf8_lossy(&bytes[..head_len]);
        let head = head.trim_start().to_ascii_lowercase();
        if head.starts_with("<!doctype html") || head.starts_with("<html") {
            return Self::Html;
        }

        Self::Unsupported
    }
}

/// "BM" followed by a recognised DIB header size at offset 14.
fn is_bmp(bytes: &[u8]) -> bool {
    if bytes.len() < 18 || !bytes.starts_with(b"BM") {
        return false;
    }
    let dib_header_size = u32::from_le_bytes([bytes[14], bytes[15], bytes[16], bytes[17]]);
    matches!(dib_header_size, 12 | 40 | 52 | 56 | 64 | 108 | 124)
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower-cased extension of the final path component, including the dot.
pub fn extension_of(filename: &str) -> Option<String> {
    let name = filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename);
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(format!(".{}", ext.to_ascii_lowercase()))
}

pub fn classify(filename: &str) -> DocumentType {
    extension_of(filename)
        .map(|ext| DocumentType::from_extension(&ext))
        .unwrap_or(DocumentType::Unsupported)
}

/// Extension lookup first; the declared MIME type and sniffed bytes are only
/// consulted when the filename carries no extension at all.
pub fn classify_with_hints(
    filename: &str,
    declared_mime: Option<&str>,
    sniffed: Option<&[u8]>,
) -> DocumentType {
    if extension_of(filename).is_some() {
        return classify(filename);
    }

    let from_mime = declared_mime
        .map(DocumentType::from_mime)
        .unwrap_or(DocumentType::Unsupported);
    if from_mime != DocumentType::Unsupported {
        return from_mime;
    }

    sniffed
        .map(DocumentType::from_magic)
        .unwrap_or(DocumentType::Unsupported)
}

pub fn supported_extensions() -> Vec<&'static str> {
    DocumentType::PROCESSABLE
        .iter()
        .flat_map(|t| t.extensions().iter().copied())
        .collect()
}
