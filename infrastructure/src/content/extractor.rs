//! HTTP content fetcher for research sources.
//!
//! Downloads a search hit and reduces it to readable text. Research treats
//! sources as optional: any failure here (transport, HTTP status, empty
//! extraction) yields `None` and the caller moves on to the next source.

use async_trait::async_trait;
use colloquy_application::ports::content::ContentFetcher;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::debug;

/// Cap on extracted text per source, in characters.
const MAX_TEXT_CHARS: usize = 50_000;

/// Tags whose entire subtree is ignored during extraction.
const SKIP_TAGS: [&str; 4] = ["script", "style", "noscript", "svg"];

pub struct HttpContentFetcher {
    client: reqwest::Client,
}

impl HttpContentFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpContentFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentFetcher for HttpContentFetcher {
    async fn fetch(&self, url: &str) -> Option<String> {
        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!(url, error = %e, "Source fetch failed");
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(url, status = %response.status(), "Source returned error status");
            return None;
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response.text().await.ok()?;

        let text = if content_type.contains("text/html") || content_type.contains("xhtml") {
            html_to_text(&body)
        } else {
            // Plain text, JSON and friends pass through untouched.
            body
        };

        let text = truncate_chars(&text, MAX_TEXT_CHARS);
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Extract readable text from HTML, skipping scripts, styles and svg.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);

    // Selector literal is static; parse cannot fail.
    let parts = match Selector::parse("body").ok() {
        Some(body_selector) => match document.select(&body_selector).next() {
            Some(body) => collect_text(body),
            None => collect_text(document.root_element()),
        },
        None => Vec::new(),
    };

    collapse_whitespace(&parts.join(" "))
}

fn collect_text(element: ElementRef) -> Vec<String> {
    if SKIP_TAGS.contains(&element.value().name()) {
        return Vec::new();
    }

    let mut parts = Vec::new();
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let t = text.trim();
                if !t.is_empty() {
                    parts.push(t.to_string());
                }
            }
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    parts.extend(collect_text(child_el));
                }
            }
            _ => {}
        }
    }
    parts
}

fn collapse_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev_was_space = true;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                result.push(' ');
            }
            prev_was_space = true;
        } else {
            result.push(ch);
            prev_was_space = false;
        }
    }
    result.trim_end().to_string()
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}
