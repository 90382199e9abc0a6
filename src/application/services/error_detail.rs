use std::path::PathBuf;

const MAX_VISIBLE_LENGTH: usize = 300;
const STORAGE_PLACEHOLDER: &str = "<storage>";

/// Scrubs a processor failure before it is shown to a client: storage roots
/// are replaced, credentials redacted, and overly long causes truncated.
pub fn sanitize_error_detail(detail: &str, roots: &[PathBuf]) -> String {
    let trimmed = detail.trim();

    if trimmed.is_empty() {
        return String::from("unknown error");
    }

    let mut result = trimmed.to_string();
    for root in roots {
        let root = root.to_string_lossy();
        if !root.is_empty() {
            result = result.replace(root.as_ref(), STORAGE_PLACEHOLDER);
        }
    }

    let redacted = redact_sensitive_patterns(&result);

    if redacted.chars().count() > MAX_VISIBLE_LENGTH {
        let visible: String = redacted.chars().take(MAX_VISIBLE_LENGTH).collect();
        format!("{visible}...")
    } else {
        redacted
    }
}

fn redact_sensitive_patterns(text: &str) -> String {
    let patterns = [
        ("Bearer ", "Bearer [REDACTED]"),
        ("api_key=", "api_key=[REDACTED]"),
        ("key=", "key=[REDACTED]"),
        ("password=", "password=[REDACTED]"),
        ("secret=", "secret=[REDACTED]"),
        ("token=", "token=[REDACTED]"),
    ];

    let mut result = text.to_string();
    for (pattern, replacement) in patterns {
        let mut search_from = 0;
        while let Some(offset) = result[search_from..].find(pattern) {
            let idx = search_from + offset;
            let value_start = idx + pattern.len();
            let end = result[value_start..]
                .find(|c: char| c.is_whitespace() || c == '&' || c == '"' || c == '\'')
                .map(|i| value_start + i)
                .unwrap_or(result.len());
            if result[value_start..end].starts_with("[REDACTED]") {
                search_from = end;
                continue;
            }
            result = format!("{}{}{}", &result[..idx], replacement, &result[end..]);
            search_from = idx + replacement.len();
        }
    }

    result
}
