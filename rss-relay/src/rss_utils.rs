/// Pattern-based HTML helpers for feed descriptions.
///
/// These are plain regular-expression passes, not an HTML parser: entities are
/// left as-is and nesting is not tracked.
pub mod html {
    use regex::Regex;
    use std::sync::LazyLock;

    static LINE_BREAK_PATTERN: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"<br\s*/?>").unwrap());

    // Shortest run up to the next '>'; does not cross newlines.
    static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<.*?>").unwrap());

    static IMAGE_SRC_PATTERN: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"src="(https?://[^"]+)""#).unwrap());

    /// Turns `<br>`/`<br/>` into newlines, drops every other tag and trims the result.
    pub fn clean_html(html: &str) -> String {
        let text = LINE_BREAK_PATTERN.replace_all(html, "\n");
        let text = TAG_PATTERN.replace_all(&text, "");
        text.trim().to_string()
    }

    /// Every `src="http(s)://..."` URL in document order.
    pub fn extract_images(html: &str) -> Vec<String> {
        IMAGE_SRC_PATTERN
            .captures_iter(html)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Text utilities for outgoing messages
pub mod text {
    /// Cuts `text` to at most `max_chars` characters, ending with `…` when shortened.
    pub fn truncate_chars(text: &str, max_chars: usize) -> String {
        if text.chars().count() <= max_chars {
            return text.to_string();
        }
        if max_chars == 0 {
            return String::new();
        }

        let mut truncated: String = text.chars().take(max_chars - 1).collect();
        truncated.push('…');
        truncated
    }
}
