use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::document_type::extension_of;

const FALLBACK_STEM: &str = "upload";

/// Transient on-disk copy of an upload plus a directory for anything derived
/// from it while processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingFile {
    pub id: Uuid,
    pub original_filename: String,
    pub path: PathBuf,
    pub artifact_dir: PathBuf,
}

impl WorkingFile {
    pub fn new(
        id: Uuid,
        original_filename: &str,
        upload_dir: &Path,
        processed_dir: &Path,
    ) -> Self {
        let stored_name = format!(
            "{}_{}{}",
            id.simple(),
            safe_stem(original_filename),
            extension_of(original_filename).unwrap_or_default()
        );

        Self {
            id,
            original_filename: original_filename.to_string(),
            path: upload_dir.join(stored_name),
            artifact_dir: processed_dir.join(id.simple().to_string()),
        }
    }

    /// Stem of the name the client uploaded, for headings and logs.
    pub fn display_stem(&self) -> &str {
        let name = file_name(&self.original_filename);
        match name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => name,
        }
    }

    pub fn extension(&self) -> Option<String> {
        extension_of(&self.original_filename)
    }
}

fn file_name(filename: &str) -> &str {
    filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename)
}

/// Reduces a client-supplied name to characters safe for a path component.
pub fn safe_stem(filename: &str) -> String {
    let name = file_name(filename);
    let stem = match name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() => stem,
        _ => name,
    };

    let cleaned: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches(|c: char| c == '.' || c == '_');

    if cleaned.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        cleaned.to_string()
    }
}
