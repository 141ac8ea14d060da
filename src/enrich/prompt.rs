//! Prompt construction and response parsing.

use std::sync::LazyLock;

use regex::Regex;

use super::InsightPayload;
use crate::config::AI_CONTENT_PREVIEW_CHARS;
use crate::parse::{ImageInventory, LinkInventory, Metadata};
use crate::utils::{char_len, truncate_chars};

/// System message sent with every analysis request.
pub const SYSTEM_PROMPT: &str =
    "You are a web content analyst. Provide detailed, structured analysis of web pages.";

static JSON_OBJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{.*\}").unwrap_or_else(|e| {
        panic!("Failed to compile JSON_OBJECT_RE: {e}. This is a programming error.")
    })
});

/// Builds the user prompt for a page.
///
/// Only the first `AI_CONTENT_PREVIEW_CHARS` characters of `content` are
/// included, followed by `...` when cut.
pub fn build_analysis_prompt(
    content: &str,
    metadata: Option<&Metadata>,
    links: Option<&LinkInventory>,
    images: Option<&ImageInventory>,
) -> String {
    let preview = if char_len(content) > AI_CONTENT_PREVIEW_CHARS {
        format!("{}...", truncate_chars(content, AI_CONTENT_PREVIEW_CHARS))
    } else {
        content.to_string()
    };

    let title = metadata
        .map(|m| m.title.as_str())
        .filter(|t| !t.is_empty())
        .unwrap_or("Unknown");
    let language = metadata
        .map(|m| m.language.as_str())
        .filter(|l| !l.is_empty())
        .unwrap_or("Unknown");
    let links = links.cloned().unwrap_or_default();
    let images = images.cloned().unwrap_or_default();

    format!(
        r#"Analyze this webpage content and provide a structured analysis:

PAGE INFO:
- Title: {title}
- Language: {language}
- Links: {} total ({} internal, {} external)
- Images: {} total ({} with alt text)

CONTENT PREVIEW:
{preview}

Please provide analysis in the following JSON format:
{{
    "summary": "Brief 2-3 sentence summary of the page content and purpose",
    "topics": ["main", "topics", "identified"],
    "sentiment": "positive|negative|neutral",
    "readability_score": 1-10,
    "key_insights": ["insight1", "insight2", "insight3"],
    "seo_suggestions": ["suggestion1", "suggestion2"],
    "content_quality": "high|medium|low",
    "target_audience": "description of likely target audience"
}}

Focus on actionable insights and be specific."#,
        links.total,
        links.total_internal,
        links.total_external,
        images.total,
        images.with_alt,
    )
}

/// Extracts the outermost `{...}` span of a model reply and parses it.
pub fn parse_model_response(response: &str) -> InsightPayload {
    let Some(span) = JSON_OBJECT_RE.find(response) else {
        return InsightPayload {
            success: false,
            analysis: None,
            error: Some("Could not parse AI response as JSON".to_string()),
            raw_response: response.to_string(),
        };
    };

    match serde_json::from_str(span.as_str()) {
        Ok(analysis) => InsightPayload {
            success: true,
            analysis: Some(analysis),
            error: None,
            raw_response: response.to_string(),
        },
        Err(e) => {
            log::debug!("Model response contained invalid JSON: {e}");
            InsightPayload {
                success: false,
                analysis: None,
                error: Some("Invalid JSON in AI response".to_string()),
                raw_response: response.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prompt_includes_page_info() {
        let metadata = Metadata {
            title: "Widgets".to_string(),
            language: "de".to_string(),
            ..Default::default()
        };
        let links = LinkInventory {
            total: 7,
            total_internal: 4,
            total_external: 3,
            ..Default::default()
        };
        let images = ImageInventory {
            total: 2,
            with_alt: 1,
            without_alt: 1,
            ..Default::default()
        };
        let prompt = build_analysis_prompt("Body text", Some(&metadata), Some(&links), Some(&images));

        assert!(prompt.contains("- Title: Widgets"));
        assert!(prompt.contains("- Language: de"));
        assert!(prompt.contains("- Links: 7 total (4 internal, 3 external)"));
        assert!(prompt.contains("- Images: 2 total (1 with alt text)"));
        assert!(prompt.contains("CONTENT PREVIEW:\nBody text\n"));
        assert!(prompt.contains("\"readability_score\": 1-10"));
    }

    #[test]
    fn test_prompt_defaults_when_signals_absent() {
        let prompt = build_analysis_prompt("", None, None, None);
        assert!(prompt.contains("- Title: Unknown"));
        assert!(prompt.contains("- Links: 0 total (0 internal, 0 external)"));
    }

    #[test]
    fn test_prompt_truncates_preview() {
        let content = "a".repeat(AI_CONTENT_PREVIEW_CHARS + 10);
        let prompt = build_analysis_prompt(&content, None, None, None);
        let expected = format!("{}...", "a".repeat(AI_CONTENT_PREVIEW_CHARS));
        assert!(prompt.contains(&expected));
        assert!(!prompt.contains(&"a".repeat(AI_CONTENT_PREVIEW_CHARS + 1)));
    }

    #[test]
    fn test_parse_response_with_surrounding_prose() {
        let reply = "Here you go:\n{\"summary\": \"A shop\", \"topics\": [\"widgets\"]}\nThanks!";
        let payload = parse_model_response(reply);
        assert!(payload.success);
        assert_eq!(
            payload.analysis,
            Some(json!({"summary": "A shop", "topics": ["widgets"]}))
        );
        assert_eq!(payload.raw_response, reply);
        assert!(payload.error.is_none());
    }

    #[test]
    fn test_parse_response_without_json() {
        let payload = parse_model_response("I cannot help with that.");
        assert!(!payload.success);
        assert_eq!(
            payload.error.as_deref(),
            Some("Could not parse AI response as JSON")
        );
    }

    #[test]
    fn test_parse_response_with_invalid_json() {
        let payload = parse_model_response("{summary: unquoted}");
        assert!(!payload.success);
        assert_eq!(payload.error.as_deref(), Some("Invalid JSON in AI response"));
        assert_eq!(payload.raw_response, "{summary: unquoted}");
    }
}
