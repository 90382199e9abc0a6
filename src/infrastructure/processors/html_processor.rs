use std::collections::BTreeMap;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::{Captures, Regex};

use crate::application::ports::{DocumentProcessor, ProcessorError};
use crate::domain::{ProcessorResult, WorkingFile};

use super::text_sanitizer::collapse_blank_lines;
use super::working_file_reader::read_non_empty;

const DROPPED_ELEMENTS: [&str; 8] = [
    "script", "style", "noscript", "head", "nav", "header", "footer", "aside",
];

static DROPPED_BLOCKS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    DROPPED_ELEMENTS
        .iter()
        .map(|tag| Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>")).unwrap())
        .collect()
});

static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h([1-6])\b[^>]*>(.*?)</h[1-6]\s*>").unwrap());
static IMAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<img\b([^>]*)>").unwrap());
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a\b([^>]*)>(.*?)</a\s*>").unwrap());
static STRONG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(?:strong|b)\b[^>]*>(.*?)</(?:strong|b)\s*>").unwrap());
static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(?:em|i)\b[^>]*>(.*?)</(?:em|i)\s*>").unwrap());
static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<li\b[^>]*>").unwrap());
static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static BLOCK_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)</?(?:p|div|section|article|main|body|html|ul|ol|table|thead|tbody|tr|blockquote|pre|figure|form)\b[^>]*>",
    )
    .unwrap()
});
static CELL_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?(?:td|th)\b[^>]*>").unwrap());
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static NUMERIC_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(?:[xX]([0-9a-fA-F]{1,6})|([0-9]{1,7}));").unwrap());
static INNER_SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title\b[^>]*>(.*?)</title\s*>").unwrap());
static META_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<meta\b([^>]*)>").unwrap());
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<html\b([^>]*)>").unwrap());
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)([a-z_:][-a-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#).unwrap()
});

/// Page-level facts read from the document before it is converted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HtmlMetadata {
    pub title: Option<String>,
    pub language: Option<String>,
    pub meta: BTreeMap<String, String>,
}

#[derive(Default)]
pub struct HtmlProcessor;

impl HtmlProcessor {
    pub fn new() -> Self {
        Self
    }
}

fn attribute(attrs: &str, name: &str) -> Option<String> {
    ATTRIBUTE
        .captures_iter(attrs)
        .find(|c| c[1].eq_ignore_ascii_case(name))
        .and_then(|c| c.get(2).or_else(|| c.get(3)).or_else(|| c.get(4)))
        .map(|m| decode_entities(m.as_str().trim()))
}

pub fn extract_metadata(html: &str) -> HtmlMetadata {
    let title = TITLE
        .captures(html)
        .map(|c| decode_entities(WHITESPACE_RUN.replace_all(&c[1], " ").trim()))
        .filter(|t| !t.is_empty());

    let language = HTML_TAG
        .captures(html)
        .and_then(|c| attribute(&c[1], "lang"))
        .filter(|l| !l.is_empty());

    let meta = META_TAG
        .captures_iter(html)
        .filter_map(|c| {
            let attrs = &c[1];
            let name = attribute(attrs, "name").or_else(|| attribute(attrs, "property"))?;
            let content = attribute(attrs, "content")?;
            (!name.is_empty() && !content.is_empty()).then_some((name, content))
        })
        .collect();

    HtmlMetadata {
        title,
        language,
        meta,
    }
}

/// Converts an HTML document to Markdown. Page chrome, scripts and
/// comments are dropped.
pub fn html_to_markdown(html: &str) -> String {
    let mut text = COMMENT.replace_all(html, "").into_owned();
    for block in DROPPED_BLOCKS.iter() {
        text = block.replace_all(&text, "").into_owned();
    }
    text = WHITESPACE_RUN.replace_all(&text, " ").into_owned();

    text = IMAGE
        .replace_all(&text, |c: &Captures| {
            let alt = attribute(&c[1], "alt").unwrap_or_default();
            match attribute(&c[1], "src") {
                Some(src) => format!("![{alt}]({src})"),
                None => alt,
            }
        })
        .into_owned();
    text = LINK
        .replace_all(&text, |c: &Captures| {
            let label = c[2].trim();
            match attribute(&c[1], "href") {
                Some(href) if !href.is_empty() && !label.is_empty() => {
                    format!("[{label}]({href})")
                }
                _ => label.to_string(),
            }
        })
        .into_owned();
    text = STRONG
        .replace_all(&text, |c: &Captures| wrap_inline(&c[1], "**"))
        .into_owned();
    text = EMPHASIS
        .replace_all(&text, |c: &Captures| wrap_inline(&c[1], "*"))
        .into_owned();
    text = HEADING
        .replace_all(&text, |c: &Captures| {
            let level: usize = c[1].parse().unwrap_or(1);
            let title = ANY_TAG.replace_all(&c[2], "");
            format!("\n\n{} {}\n\n", "#".repeat(level), title.trim())
        })
        .into_owned();

    text = LIST_ITEM.replace_all(&text, "\n- ").into_owned();
    text = LINE_BREAK.replace_all(&text, "\n").into_owned();
    text = BLOCK_BOUNDARY.replace_all(&text, "\n\n").into_owned();
    text = CELL_BOUNDARY.replace_all(&text, " ").into_owned();
    text = ANY_TAG.replace_all(&text, "").into_owned();

    let decoded = decode_entities(&text);
    collapse_blank_lines(
        decoded
            .lines()
            .map(|line| INNER_SPACES.replace_all(line, " ").into_owned())
            .filter(|line| line.trim() != "-"),
    )
}

fn wrap_inline(inner: &str, marker: &str) -> String {
    let inner = inner.trim();
    if inner.is_empty() {
        String::new()
    } else {
        format!("{marker}{inner}{marker}")
    }
}

pub fn decode_entities(text: &str) -> String {
    let numeric = NUMERIC_ENTITY.replace_all(text, |c: &Captures| {
        let code = match (c.get(1), c.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (_, Some(dec)) => dec.as_str().parse().ok(),
            _ => None,
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| c[0].to_string())
    });

    numeric
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[async_trait]
impl DocumentProcessor for HtmlProcessor {
    #[tracing::instrument(skip(self, file), fields(filename = %file.original_filename))]
    async fn process(&self, file: &WorkingFile) -> Result<ProcessorResult, ProcessorError> {
        let data = read_non_empty(file).await?;
        let html_bytes = data.len();

        let (html, encoding) = match String::from_utf8(data) {
            Ok(html) => (html, "utf-8"),
            Err(e) => {
                tracing::warn!(error = %e, "HTML is not valid UTF-8, decoding lossily");
                (
                    String::from_utf8_lossy(e.as_bytes()).into_owned(),
                    "utf-8-lossy",
                )
            }
        };

        if html.trim().is_empty() {
            return Err(ProcessorError::EmptyFile(file.original_filename.clone()));
        }

        let page = extract_metadata(&html);
        let content = html_to_markdown(&html);
        if content.is_empty() {
            return Err(ProcessorError::NoContent(file.original_filename.clone()));
        }

        tracing::info!(chars = content.len(), "HTML converted");

        let mut result = ProcessorResult::success(content)
            .with_metadata("html_bytes", html_bytes)
            .with_metadata("encoding", encoding);
        if let Some(title) = page.title {
            result = result.with_metadata("title", title);
        }
        if let Some(language) = page.language {
            result = result.with_metadata("language", language);
        }
        if !page.meta.is_empty() {
            let meta: serde_json::Map<String, serde_json::Value> = page
                .meta
                .into_iter()
                .map(|(k, v)| (k, serde_json::Value::String(v)))
                .collect();
            result = result.with_metadata("meta", meta);
        }

        Ok(result)
    }
}
