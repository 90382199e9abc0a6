use docdispatch::application::ports::{DocumentProcessor, ProcessorError};
use docdispatch::infrastructure::processors::{
    HtmlProcessor, decode_entities, extract_metadata, html_to_markdown,
};

use super::stage;

const SAMPLE_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <title>Quarterly &amp; Annual Report</title>
  <meta name="description" content="Company results">
  <meta property="og:title" content="Report">
  <style>body { color: red; }</style>
</head>
<body>
  <nav><a href="/home">Home</a></nav>
  <h1>Results</h1>
  <p>Revenue grew <strong>12%</strong> this <em>quarter</em>.</p>
  <!-- internal note -->
  <ul>
    <li>North</li>
    <li>South</li>
  </ul>
  <p>See <a href="https://example.com/details">details</a><br>for more.</p>
  <script>alert("x")</script>
  <footer>Copyright</footer>
</body>
</html>"#;

#[test]
fn given_headings_when_converting_then_markdown_headings() {
    let markdown = html_to_markdown("<h2>Overview</h2><p>Body text</p>");

    assert_eq!(markdown, "## Overview\n\nBody text");
}

#[test]
fn given_link_when_converting_then_markdown_link() {
    let markdown = html_to_markdown(r#"<p>Go <a href="https://example.com">here</a></p>"#);

    assert_eq!(markdown, "Go [here](https://example.com)");
}

#[test]
fn given_image_when_converting_then_markdown_image() {
    let markdown = html_to_markdown(r#"<img src="chart.png" alt="Chart">"#);

    assert_eq!(markdown, "![Chart](chart.png)");
}

#[test]
fn given_page_chrome_and_scripts_when_converting_then_they_are_dropped() {
    let markdown = html_to_markdown(SAMPLE_PAGE);

    assert!(!markdown.contains("alert"));
    assert!(!markdown.contains("color: red"));
    assert!(!markdown.contains("Home"));
    assert!(!markdown.contains("Copyright"));
    assert!(!markdown.contains("internal note"));
    assert!(!markdown.contains("Quarterly"));
}

#[test]
fn given_sample_page_when_converting_then_structure_is_preserved() {
    let markdown = html_to_markdown(SAMPLE_PAGE);

    assert!(markdown.starts_with("# Results"));
    assert!(markdown.contains("Revenue grew **12%** this *quarter*."));
    assert!(markdown.contains("- North\n- South"));
    assert!(markdown.contains("See [details](https://example.com/details)\nfor more."));
}

#[test]
fn given_entities_when_decoding_then_characters_restored() {
    assert_eq!(
        decode_entities("a &lt;b&gt; &amp;amp; &#169; &#x4E2D; &quot;q&quot;"),
        "a <b> &amp; © 中 \"q\""
    );
}

#[test]
fn given_head_metadata_when_extracting_then_title_lang_and_meta_found() {
    let metadata = extract_metadata(SAMPLE_PAGE);

    assert_eq!(metadata.title.as_deref(), Some("Quarterly & Annual Report"));
    assert_eq!(metadata.language.as_deref(), Some("en"));
    assert_eq!(metadata.meta["description"], "Company results");
    assert_eq!(metadata.meta["og:title"], "Report");
}

#[tokio::test]
async fn given_html_file_when_processing_then_markdown_and_metadata_returned() {
    let (_dir, file) = stage("page.html", SAMPLE_PAGE.as_bytes()).await;

    let result = HtmlProcessor::new().process(&file).await.unwrap();

    assert!(result.success);
    assert!(result.content.starts_with("# Results"));
    assert_eq!(result.metadata["title"], "Quarterly & Annual Report");
    assert_eq!(result.metadata["language"], "en");
    assert_eq!(result.metadata["encoding"], "utf-8");
    assert_eq!(result.metadata["html_bytes"], SAMPLE_PAGE.len());
    assert_eq!(result.metadata["meta"]["description"], "Company results");
}

#[tokio::test]
async fn given_invalid_utf8_when_processing_then_decoded_lossily() {
    let (_dir, file) = stage("legacy.htm", b"<p>caf\xe9 menu</p>").await;

    let result = HtmlProcessor::new().process(&file).await.unwrap();

    assert_eq!(result.metadata["encoding"], "utf-8-lossy");
    assert!(result.content.contains("menu"));
}

#[tokio::test]
async fn given_empty_file_when_processing_then_empty_file_error() {
    let (_dir, file) = stage("empty.html", b"").await;

    let result = HtmlProcessor::new().process(&file).await;

    assert!(matches!(result, Err(ProcessorError::EmptyFile(_))));
}

#[tokio::test]
async fn given_markup_without_text_when_processing_then_no_content_error() {
    let (_dir, file) = stage("blank.html", b"<html><body><script>x()</script></body></html>").await;

    let result = HtmlProcessor::new().process(&file).await;

    assert!(matches!(result, Err(ProcessorError::NoContent(_))));
}
