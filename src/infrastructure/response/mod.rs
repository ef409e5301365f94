use once_cell::sync::Lazy;
use regex::Regex;

static THINK_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<think>[\s\S]*?</think>|<think\s*/>").unwrap());

static REASONING_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<reasoning>[\s\S]*?</reasoning>").unwrap());

static CODE_FENCE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"```[a-zA-Z]*").unwrap());

static EMPHASIS_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*{1,3}|_{2,3}").unwrap());

static LINE_MARKER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*(?:#{1,6}|[-*•])[ \t]+").unwrap());

static MULTIPLE_NEWLINES_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Turns a narration reply into plain text suitable for a speech bubble
pub fn clean_llm_response(response: &str) -> String {
    let mut cleaned = response.replace("\r\n", "\n");

    cleaned = THINK_TAG_PATTERN.replace_all(&cleaned, "").to_string();
    cleaned = REASONING_TAG_PATTERN.replace_all(&cleaned, "").to_string();
    cleaned = CODE_FENCE_PATTERN.replace_all(&cleaned, "").to_string();

    // Headings and bullets first so a leading "* " is not read as emphasis
    cleaned = LINE_MARKER_PATTERN.replace_all(&cleaned, "").to_string();
    cleaned = EMPHASIS_PATTERN.replace_all(&cleaned, "").to_string();

    cleaned = cleaned.trim().to_string();

    MULTIPLE_NEWLINES_PATTERN
        .replace_all(&cleaned, "\n\n")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_think_tags() {
        let input = "<think>Some reasoning here</think>Your model is stable.";
        assert_eq!(clean_llm_response(input), "Your model is stable.");
    }

    #[test]
    fn test_clean_self_closing_think() {
        let input = "<think />Your model is stable.";
        assert_eq!(clean_llm_response(input), "Your model is stable.");
    }

    #[test]
    fn test_strip_markdown_bullets_and_emphasis() {
        let input = "## Summary\n- Noise: **good**\n* Missing data: *fair*\n";
        assert_eq!(
            clean_llm_response(input),
            "Summary\nNoise: good\nMissing data: fair"
        );
    }

    #[test]
    fn test_keeps_negative_numbers_and_hyphenated_words() {
        let input = "Bias shifted by -3 points on well-known data.";
        assert_eq!(clean_llm_response(input), input);
    }

    #[test]
    fn test_clean_multiple_newlines() {
        let input = "Line 1\r\n\r\n\r\n\r\nLine 2";
        assert_eq!(clean_llm_response(input), "Line 1\n\nLine 2");
    }

    #[test]
    fn test_code_fences_removed() {
        let input = "```text\nAll good\n```";
        assert_eq!(clean_llm_response(input), "All good");
    }
}
