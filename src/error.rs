use thiserror::Error;

/// Failures that stop a request. Everything below the transcription step
/// is recovered per entry and never shows up here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("could not parse transcription: {source} (preview: {preview:?})")]
    TranscriptionParse {
        preview: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("vision model request failed: {0}")]
    Model(String),
    #[error("could not download image: {0}")]
    Download(String),
}

impl PipelineError {
    pub fn is_transcription_parse(&self) -> bool {
        matches!(self, PipelineError::TranscriptionParse { .. })
    }
}
