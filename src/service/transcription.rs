use serde_json::Value;

use crate::error::PipelineError;

const FENCE: &str = "```";
pub const PREVIEW_CHARS: usize = 200;

/// Removes the markdown code fence models like to wrap JSON in.
///
/// A block opened with a language tag (```` ```json ````) and closed later
/// wins; otherwise a text wrapped in plain ```` ``` ```` loses its three
/// leading and trailing backticks. Anything else is returned trimmed.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if let Some(inner) = tagged_block(trimmed) {
        return inner.trim();
    }
    if trimmed.len() >= 2 * FENCE.len() && trimmed.starts_with(FENCE) && trimmed.ends_with(FENCE) {
        return trimmed[FENCE.len()..trimmed.len() - FENCE.len()].trim();
    }
    trimmed
}

fn tagged_block(text: &str) -> Option<&str> {
    let mut search_from = 0;
    while let Some(offset) = text[search_from..].find(FENCE) {
        let open = search_from + offset + FENCE.len();
        let after = &text[open..];
        let tag_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+')))
            .unwrap_or(after.len());
        if tag_len > 0 {
            let body = &after[tag_len..];
            return body.find(FENCE).map(|close| &body[..close]);
        }
        search_from = open;
    }
    None
}

pub fn parse_transcription(text: &str) -> Result<Value, PipelineError> {
    let body = strip_code_fence(text);
    serde_json::from_str(body).map_err(|source| PipelineError::TranscriptionParse {
        preview: preview(body),
        source,
    })
}

pub fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let mut head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        head.push('…');
    }
    head
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_tagged_block_from_surrounding_prose() {
        let text = "Hier ist der Plan:\n```json\n{\"entries\": []}\n```\nViel Spaß!";
        assert_eq!(strip_code_fence(text), "{\"entries\": []}");
    }

    #[test]
    fn strips_plain_fence() {
        assert_eq!(strip_code_fence("```\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fence("  ```[1]```  "), "[1]");
    }

    #[test]
    fn unfenced_text_is_only_trimmed() {
        assert_eq!(strip_code_fence("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn unclosed_tagged_fence_is_left_alone() {
        let text = "```json\n{\"a\": 1}";
        assert_eq!(strip_code_fence(text), text);
        assert!(parse_transcription(text).is_err());
    }

    #[test]
    fn parses_fenced_json() {
        let value = parse_transcription("```json\n[{\"date\": \"2024-03-04\"}]\n```").unwrap();
        assert_eq!(value, json!([{"date": "2024-03-04"}]));
    }

    #[test]
    fn malformed_json_carries_truncated_preview() {
        let text = format!("Ich kann das Bild leider nicht lesen. {}", "x".repeat(300));
        let err = parse_transcription(&text).unwrap_err();
        assert!(err.is_transcription_parse());
        match err {
            PipelineError::TranscriptionParse { preview, .. } => {
                assert!(preview.starts_with("Ich kann das Bild"));
                assert_eq!(preview.chars().count(), PREVIEW_CHARS + 1);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
