pub mod normalizer;
pub mod openai_service;
pub mod pipeline;
pub mod prompt;
pub mod synthesizer;
pub mod transcription;
