use crate::application::ports::ProcessorError;
use crate::domain::WorkingFile;

pub(super) async fn ensure_non_empty(file: &WorkingFile) -> Result<u64, ProcessorError> {
    let size = tokio::fs::metadata(&file.path).await?.len();
    if size == 0 {
        return Err(ProcessorError::EmptyFile(file.original_filename.clone()));
    }
    Ok(size)
}

pub(super) async fn read_non_empty(file: &WorkingFile) -> Result<Vec<u8>, ProcessorError> {
    let data = tokio::fs::read(&file.path).await?;
    if data.is_empty() {
        return Err(ProcessorError::EmptyFile(file.original_filename.clone()));
    }
    Ok(data)
}

pub(super) fn join_error(e: tokio::task::JoinError) -> ProcessorError {
    ProcessorError::ExtractionFailed(format!("task join error: {e}"))
}
