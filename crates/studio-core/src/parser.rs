//! Parsers for raw model output.
//!
//! The companion endpoint asks the model to finish its reply with a line
//! prefixed by [`SUMMARY_MARKER`]; the image endpoint asks for a numbered list
//! of prompts. Both reject output that carries the provider's key error text.

use crate::error::ParseError;
use crate::models::ParsedResponse;

pub const SUMMARY_MARKER: &str = "SUMMARY:";

const PROVIDER_KEY_ERRORS: [&str; 2] = ["API key not valid", "Please pass a valid API key"];

const POLLINATIONS_BASE: &str = "https://image.pollinations.ai/prompt/";

pub fn contains_provider_key_error(text: &str) -> bool {
    PROVIDER_KEY_ERRORS
        .iter()
        .any(|marker| text.contains(marker))
}

/// Splits a companion reply into the answer and its summary line.
///
/// Every line whose trimmed form starts with `SUMMARY:` is treated as a
/// summary line and the last one wins. All remaining lines, blank ones
/// included, form the answer.
pub fn parse_companion_response(raw: &str) -> Result<ParsedResponse, ParseError> {
    if contains_provider_key_error(raw) {
        return Err(ParseError::InvalidApiKey);
    }

    let mut answer_lines = Vec::new();
    let mut summary = String::new();

    for line in raw.lines() {
        match line.trim().strip_prefix(SUMMARY_MARKER) {
            Some(rest) => summary = rest.trim().to_string(),
            None => answer_lines.push(line),
        }
    }

    let answer = answer_lines.join("\n").trim().to_string();

    if answer.is_empty() {
        return Err(ParseError::MissingAnswer);
    }
    if summary.is_empty() {
        return Err(ParseError::MissingSummary);
    }

    Ok(ParsedResponse { answer, summary })
}

/// Extracts up to `limit` image prompts from a numbered or bulleted list.
pub fn parse_image_prompts(raw: &str, limit: usize) -> Result<Vec<String>, ParseError> {
    if contains_provider_key_error(raw) {
        return Err(ParseError::InvalidApiKey);
    }

    let prompts: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(list_item_text)
        .take(limit)
        .collect();

    let looks_like_error = prompts
        .iter()
        .any(|prompt| prompt.to_lowercase().starts_with("error"));

    if prompts.is_empty() || looks_like_error {
        return Err(ParseError::NoImagePrompts);
    }

    Ok(prompts)
}

fn list_item_text(line: &str) -> Option<String> {
    let is_list_item = line.starts_with('-') || line.starts_with(|c: char| c.is_ascii_digit());
    if !is_list_item {
        return Some(line.to_string());
    }

    let text = match line.split_once('.') {
        Some((_, rest)) => rest.trim(),
        None => line.trim_start_matches('-').trim(),
    };

    (!text.is_empty()).then(|| text.to_string())
}

/// Builds the Pollinations URL that renders `prompt`.
pub fn image_url_for(prompt: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(prompt.as_bytes())
        .collect::<String>()
        .replace('+', "%20");
    format!("{}{}?nologo=true", POLLINATIONS_BASE, encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_answer_and_summary() {
        let raw = "Paris is the capital.\nSUMMARY: User asked about France's capital; answered Paris.";
        let parsed = parse_companion_response(raw).unwrap();
        assert_eq!(parsed.answer, "Paris is the capital.");
        assert_eq!(
            parsed.summary,
            "User asked about France's capital; answered Paris."
        );
    }

    #[test]
    fn keeps_multi_line_answers_and_drops_outer_whitespace() {
        let raw = "\n  First line.\n\nSecond line.\n   SUMMARY:   short recap  \n\n";
        let parsed = parse_companion_response(raw).unwrap();
        assert_eq!(parsed.answer, "First line.\n\nSecond line.");
        assert_eq!(parsed.summary, "short recap");
    }

    #[test]
    fn last_summary_line_wins() {
        let raw = "SUMMARY: first\nAnswer body\nSUMMARY: second";
        let parsed = parse_companion_response(raw).unwrap();
        assert_eq!(parsed.answer, "Answer body");
        assert_eq!(parsed.summary, "second");
    }

    #[test]
    fn missing_summary_is_an_error() {
        let err = parse_companion_response("Only an answer here.").unwrap_err();
        assert_eq!(err, ParseError::MissingSummary);
    }

    #[test]
    fn empty_summary_text_is_an_error() {
        let err = parse_companion_response("Answer\nSUMMARY:   ").unwrap_err();
        assert_eq!(err, ParseError::MissingSummary);
    }

    #[test]
    fn summary_without_answer_is_an_error() {
        let err = parse_companion_response("   \nSUMMARY: recap").unwrap_err();
        assert_eq!(err, ParseError::MissingAnswer);
    }

    #[test]
    fn provider_key_errors_are_detected_first() {
        let raw = "API key not valid. Please pass a valid API key.\nSUMMARY: nope";
        assert_eq!(
            parse_companion_response(raw).unwrap_err(),
            ParseError::InvalidApiKey
        );
        assert_eq!(
            parse_image_prompts("Please pass a valid API key", 2).unwrap_err(),
            ParseError::InvalidApiKey
        );
    }

    #[test]
    fn any_summary_with_other_text_parses() {
        let samples = [
            ("a", "b"),
            ("multi\nline answer", "x"),
            ("  padded  ", "  also padded  "),
            ("SUMMARY-like but not: text", "ok"),
        ];
        for (body, summary) in samples {
            let raw = format!("{}\nSUMMARY: {}", body, summary);
            let parsed = parse_companion_response(&raw).unwrap();
            assert!(!parsed.answer.is_empty());
            assert!(!parsed.summary.is_empty());
        }
    }

    #[test]
    fn image_prompts_from_numbered_list() {
        let raw = "Here you go:\n1. A cat on a roof at dusk\n2. A watercolor cat\n3. A cat astronaut";
        let prompts = parse_image_prompts(raw, 3).unwrap();
        assert_eq!(
            prompts,
            vec![
                "Here you go:".to_string(),
                "A cat on a roof at dusk".to_string(),
                "A watercolor cat".to_string(),
            ]
        );
    }

    #[test]
    fn image_prompts_from_bullets_and_limit() {
        let raw = "- misty forest\n-   desert dunes\n- ocean cliffs";
        let prompts = parse_image_prompts(raw, 2).unwrap();
        assert_eq!(prompts, vec!["misty forest", "desert dunes"]);
    }

    #[test]
    fn bullet_with_period_keeps_text_after_first_period() {
        let prompts = parse_image_prompts("- Mt. Fuji at dawn", 1).unwrap();
        assert_eq!(prompts, vec!["Fuji at dawn"]);
    }

    #[test]
    fn bare_numbers_are_skipped() {
        let prompts = parse_image_prompts("1.\n2. a lighthouse", 2).unwrap();
        assert_eq!(prompts, vec!["a lighthouse"]);
    }

    #[test]
    fn error_like_prompts_are_rejected() {
        assert_eq!(
            parse_image_prompts("Error: quota exceeded", 2).unwrap_err(),
            ParseError::NoImagePrompts
        );
        assert_eq!(
            parse_image_prompts("\n  \n", 2).unwrap_err(),
            ParseError::NoImagePrompts
        );
    }

    #[test]
    fn image_url_is_percent_encoded() {
        assert_eq!(
            image_url_for("a cat & a dog"),
            "https://image.pollinations.ai/prompt/a%20cat%20%26%20a%20dog?nologo=true"
        );
    }
}
