//! HTML parser for extracting anchor elements
//!
//! Every `<a href>` on a page is handed to the page handler together with its
//! text, which on a route page is the stop name.

use scraper::{Html, Selector};

/// One `<a href>` element found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkElement {
    /// The raw `href` attribute value
    pub href: String,

    /// The element's text content, whitespace-collapsed
    pub text: String,
}

/// Parses HTML content and extracts anchor elements
///
/// # Link Extraction Rules
///
/// **Include:** `<a href="...">` anywhere in the document, in document order.
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - empty hrefs and fragment-only hrefs (same page anchors)
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
///
/// Relative hrefs are returned as-is; the classifier resolves them against
/// the page URL.
///
/// # Example
///
/// ```
/// use transit_mapper::crawler::extract_anchors;
///
/// let html = r#"<ul><li><a href="/m/?q=308323">Main St &amp;
///     1st Ave</a></li></ul>"#;
/// let anchors = extract_anchors(html);
/// assert_eq!(anchors.len(), 1);
/// assert_eq!(anchors[0].href, "/m/?q=308323");
/// assert_eq!(anchors[0].text, "Main St & 1st Ave");
/// ```
pub fn extract_anchors(html: &str) -> Vec<LinkElement> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter(|element| element.value().attr("download").is_none())
        .filter_map(|element| {
            let href = element.value().attr("href")?.trim();
            if !is_candidate_href(href) {
                return None;
            }

            Some(LinkElement {
                href: href.to_string(),
                text: collapse_whitespace(element.text()),
            })
        })
        .collect()
}

/// Returns false for hrefs that can never name a page to classify
fn is_candidate_href(href: &str) -> bool {
    if href.is_empty() || href.starts_with('#') {
        return false;
    }

    let lower = href.to_ascii_lowercase();
    !(lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:"))
}

/// Joins text fragments and squeezes runs of whitespace to single spaces
fn collapse_whitespace<'a>(fragments: impl Iterator<Item = &'a str>) -> String {
    fragments
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_relative_link() {
        let html = r#"<html><body><a href="/m/?q=BX1">BX1 Grand Concourse</a></body></html>"#;
        let anchors = extract_anchors(html);
        assert_eq!(
            anchors,
            vec![LinkElement {
                href: "/m/?q=BX1".to_string(),
                text: "BX1 Grand Concourse".to_string(),
            }]
        );
    }

    #[test]
    fn test_nested_text_is_collapsed() {
        let html = r#"<a href="?q=308323">
                <strong>Main St</strong>
                &amp; 1st Ave
            </a>"#;
        let anchors = extract_anchors(html);
        assert_eq!(anchors[0].text, "Main St & 1st Ave");
    }

    #[test]
    fn test_empty_text() {
        let html = r#"<a href="?q=308323"><img src="stop.png"></a>"#;
        let anchors = extract_anchors(html);
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].text, "");
    }

    #[test]
    fn test_skip_special_schemes() {
        let html = r#"<html><body>
            <a href="javascript:void(0)">JS</a>
            <a href="MAILTO:test@example.com">Email</a>
            <a href="tel:+1234567890">Call</a>
            <a href="data:text/html,<h1>Test</h1>">Data</a>
        </body></html>"#;
        assert!(extract_anchors(html).is_empty());
    }

    #[test]
    fn test_skip_download_fragment_and_empty() {
        let html = r##"<html><body>
            <a href="/routes.pdf" download>Download</a>
            <a href="#top">Top</a>
            <a href="  ">Blank</a>
            <a name="anchor">No href</a>
        </body></html>"##;
        assert!(extract_anchors(html).is_empty());
    }

    #[test]
    fn test_document_order() {
        let html = r#"<html><body>
            <a href="/m/?q=B1">B1</a>
            <a href="/m/?q=B2">B2</a>
            <a href="/m/?q=B3">B3</a>
        </body></html>"#;
        let hrefs: Vec<String> = extract_anchors(html).into_iter().map(|a| a.href).collect();
        assert_eq!(hrefs, vec!["/m/?q=B1", "/m/?q=B2", "/m/?q=B3"]);
    }
}
