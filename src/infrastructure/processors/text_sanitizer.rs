use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static HYPHEN_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<prefix>\w)-[ \t]*\r?\n[ \t]*(?P<suffix>\w)").unwrap());

static INNER_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t\u{a0}]+").unwrap());

/// Normalizes text pulled out of a PDF page: NFKC, words re-joined across
/// hyphenated line breaks, runs of spaces collapsed, paragraph breaks kept.
pub fn sanitize_extracted_text(raw: &str) -> String {
    let normalized: String = raw.nfkc().collect();
    let joined = HYPHEN_NEWLINE.replace_all(&normalized, "$prefix$suffix");

    collapse_blank_lines(
        joined
            .lines()
            .map(|line| INNER_WHITESPACE.replace_all(line, " ").into_owned()),
    )
}

/// Trims every line and folds consecutive blank lines into one.
pub fn collapse_blank_lines<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    let mut pending_blank = false;

    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            pending_blank = !out.is_empty();
            continue;
        }

        if !out.is_empty() {
            out.push_str(if pending_blank { "\n\n" } else { "\n" });
        }
        out.push_str(line);
        pending_blank = false;
    }

    out
}
