//! DuckDuckGo Lite search adapter.
//!
//! Scrapes the `lite.duckduckgo.com` HTML endpoint: no API key, no JSON.
//! Each query POSTs the search form and follows the "next page" form for
//! up to [`MAX_PAGES`] pages, deduplicating hrefs across pages. Requests
//! are throttled so bursts within a 20-second window pause briefly
//! between pages.

use async_trait::async_trait;
use colloquy_application::ports::search::{SearchError, SearchProvider, SearchQuery};
use colloquy_domain::SearchResult;
use percent_encoding::percent_decode_str;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

const SEARCH_URL: &str = "https://lite.duckduckgo.com/lite/";
const MAX_PAGES: usize = 5;

/// Pause between paginated requests inside the burst window.
const PAGE_DELAY: Duration = Duration::from_millis(750);
/// Requests further apart than this skip the pause entirely.
const BURST_WINDOW: Duration = Duration::from_secs(20);

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Search provider backed by the DuckDuckGo Lite HTML frontend.
pub struct DuckDuckGoSearch {
    client: reqwest::Client,
    last_request: Mutex<Option<Instant>>,
}

/// One page of parsed results plus the pagination cursor, if any.
struct ParsedPage {
    results: Vec<SearchResult>,
    /// Result rows present on the page, before deduplication.
    rows: usize,
    next_offset: Option<u64>,
}

impl DuckDuckGoSearch {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            last_request: Mutex::new(None),
        }
    }

    /// Sleep between requests that land inside the burst window.
    async fn throttle(&self) {
        let delay = {
            let mut last = self.last_request.lock().await;
            let delay = match *last {
                Some(at) if at.elapsed() < BURST_WINDOW => Some(PAGE_DELAY),
                _ => None,
            };
            *last = Some(Instant::now());
            delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    async fn fetch_page(&self, query: &SearchQuery, offset: u64) -> Result<String, SearchError> {
        self.throttle().await;

        let form = [
            ("q", query.keywords.as_str()),
            ("kl", query.region.as_str()),
            ("df", query.timelimit.as_deref().unwrap_or("")),
            ("s", &offset.to_string()),
        ];

        let response = self
            .client
            .post(SEARCH_URL)
            .header("User-Agent", USER_AGENT)
            .header("Referer", "https://lite.duckduckgo.com/")
            .form(&form)
            .send()
            .await
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::RequestFailed(format!(
                "search returned {}",
                status
            )));
        }

        response
            .text()
            .await
            .map_err(|e| SearchError::RequestFailed(e.to_string()))
    }
}

impl Default for DuckDuckGoSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    async fn text(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, SearchError> {
        if query.keywords.trim().is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let mut seen: HashSet<String> = HashSet::new();
        let mut results: Vec<SearchResult> = Vec::new();
        let mut offset: u64 = 0;

        for page in 0..MAX_PAGES {
            let html = match self.fetch_page(query, offset).await {
                Ok(html) => html,
                Err(e) => {
                    // A failed page is partial success when earlier pages
                    // already produced results.
                    if results.is_empty() {
                        return Err(e);
                    }
                    warn!(page, error = %e, "Search page failed, returning partial results");
                    break;
                }
            };

            if html.contains("No more results.") {
                break;
            }

            let parsed = parse_results_page(&html, &mut seen);
            debug!(
                page,
                rows = parsed.rows,
                new_results = parsed.results.len(),
                "Parsed search page"
            );
            if parsed.rows == 0 {
                break;
            }
            results.extend(parsed.results);

            if let Some(max) = query.max_results {
                if results.len() >= max {
                    results.truncate(max);
                    return Ok(results);
                }
            }

            match parsed.next_offset {
                Some(next) => offset = next,
                None => break,
            }
        }

        Ok(results)
    }
}

/// Parse one Lite results page: result rows plus the next-page offset.
///
/// Hrefs already in `seen` are skipped, so callers can thread the set
/// through a whole pagination run.
fn parse_results_page(html: &str, seen: &mut HashSet<String>) -> ParsedPage {
    // Static selectors; parse failures are impossible.
    let row_selector = Selector::parse("table:last-of-type tr").ok();
    let link_selector = Selector::parse("a.result-link").ok();
    let snippet_selector = Selector::parse(".result-snippet").ok();
    let next_input_selector = Selector::parse("form.next_form input[name=\"s\"]").ok();

    let (Some(row_selector), Some(link_selector), Some(snippet_selector), Some(next_selector)) =
        (row_selector, link_selector, snippet_selector, next_input_selector)
    else {
        return ParsedPage {
            results: Vec::new(),
            rows: 0,
            next_offset: None,
        };
    };

    let document = Html::parse_document(html);
    let mut results = Vec::new();
    let mut rows = 0;

    for row in document.select(&row_selector) {
        let Some(link) = row.select(&link_selector).next() else {
            continue;
        };
        rows += 1;
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if !seen.insert(href.to_string()) {
            continue;
        }

        // The snippet lives in the row after the link's row.
        let body = next_element_sibling(row)
            .and_then(|sibling| sibling.select(&snippet_selector).next())
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .unwrap_or_default();

        results.push(SearchResult {
            title: collapse_whitespace(&link.text().collect::<String>()),
            href: normalize_url(href),
            body,
        });
    }

    let next_offset = document
        .select(&next_selector)
        .next()
        .and_then(|input| input.value().attr("value"))
        .and_then(|value| value.trim().parse::<u64>().ok());

    ParsedPage {
        results,
        rows,
        next_offset,
    }
}

fn next_element_sibling(element: ElementRef) -> Option<ElementRef> {
    element.next_siblings().find_map(ElementRef::wrap)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Percent-decode a scraped href, keeping spaces query-safe.
fn normalize_url(url: &str) -> String {
    percent_decode_str(url)
        .decode_utf8_lossy()
        .replace(' ', "+")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
    <html><body>
      <table><tr><td>header chrome</td></tr></table>
      <table>
        <tr>
          <td><a class="result-link" href="https://example.com/one">First
            result</a></td>
        </tr>
        <tr>
          <td class="result-snippet">Snippet   for
            the first result.</td>
        </tr>
        <tr>
          <td><a class="result-link" href="https://example.com/two%20page">Second result</a></td>
        </tr>
        <tr>
          <td class="result-snippet">Second snippet.</td>
        </tr>
      </table>
      <form class="next_form" action="/lite/" method="post">
        <input type="hidden" name="s" value="23">
      </form>
    </body></html>
    "#;

    #[test]
    fn test_parse_rows_and_snippets() {
        let mut seen = HashSet::new();
        let page = parse_results_page(PAGE, &mut seen);

        assert_eq!(page.rows, 2);
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].title, "First result");
        assert_eq!(page.results[0].href, "https://example.com/one");
        assert_eq!(page.results[0].body, "Snippet for the first result.");
        assert_eq!(page.results[1].href, "https://example.com/two+page");
        assert_eq!(page.next_offset, Some(23));
    }

    #[test]
    fn test_seen_hrefs_are_skipped() {
        let mut seen = HashSet::new();
        seen.insert("https://example.com/one".to_string());

        let page = parse_results_page(PAGE, &mut seen);
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].href, "https://example.com/two+page");
    }

    #[test]
    fn test_page_without_next_form_stops_pagination() {
        let html = r#"
        <html><body><table>
          <tr><td><a class="result-link" href="https://a.example">A</a></td></tr>
        </table></body></html>
        "#;
        let mut seen = HashSet::new();
        let page = parse_results_page(html, &mut seen);
        assert_eq!(page.results.len(), 1);
        assert!(page.results[0].body.is_empty());
        assert_eq!(page.next_offset, None);
    }

    #[test]
    fn test_normalize_url_decodes_and_plus_encodes_spaces() {
        assert_eq!(
            normalize_url("https://e.example/q%3Fa%20b"),
            "https://e.example/q?a+b"
        );
        assert_eq!(normalize_url(""), "");
    }

    #[tokio::test]
    async fn test_empty_keywords_rejected() {
        let search = DuckDuckGoSearch::new();
        let query = SearchQuery::new("   ");
        assert!(matches!(
            search.text(&query).await,
            Err(SearchError::EmptyQuery)
        ));
    }
}
