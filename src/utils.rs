// src/utils.rs
use scraper::{Html, Node, Selector};

/// Elements whose text never reaches the reader
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Prefix of `text` holding at most `max_chars` characters.
///
/// Cuts on a char boundary, never in the middle of a multi-byte sequence.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Owned short prefix for log lines and diagnostics
pub fn snippet(text: &str, max_chars: usize) -> String {
    truncate_chars(text, max_chars).to_string()
}

/// Collapse all runs of whitespace into single spaces
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case-insensitive, whitespace-trimmed comparison key
pub fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Visible text of an HTML document, scripts and styles removed.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let root = match Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next())
    {
        Some(body) => body,
        None => document.root_element(),
    };

    let mut parts = Vec::new();
    for node in root.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|element| HIDDEN_ELEMENTS.contains(&element.name()))
                .unwrap_or(false)
        });
        if hidden {
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    clean_text(&parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  Senior \n\n Engineer\t "), "Senior Engineer");
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("  Acme Corp "), "acme corp");
    }

    #[test]
    fn test_visible_text_skips_scripts() {
        let html = r#"<html><head><style>.a{}</style></head>
            <body><h1>Data Scientist</h1><script>var x = 1;</script>
            <p>Acme   Corp</p></body></html>"#;
        assert_eq!(visible_text(html), "Data Scientist Acme Corp");
    }
}
