use std::fs;
use std::path::Path;

use log::{error, info};

pub const DEFAULT_PROMPT_FILE: &str = "prompt.txt";
pub const DEFAULT_PROMPT: &str = include_str!("../../prompt.txt");

/// Reads the transcription prompt once at startup. A missing or empty file
/// falls back to the prompt compiled into the binary.
pub fn load_prompt(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(content) if !content.trim().is_empty() => {
            info!("Loaded prompt from {}", path.display());
            content.trim().to_string()
        }
        Ok(_) => {
            error!("Prompt file {} is empty, using built-in prompt", path.display());
            DEFAULT_PROMPT.trim().to_string()
        }
        Err(err) => {
            error!(
                "Prompt file {} could not be read ({}), using built-in prompt",
                path.display(),
                err
            );
            DEFAULT_PROMPT.trim().to_string()
        }
    }
}
