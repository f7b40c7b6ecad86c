//! theqoo square listing scraper.
//!
//! Scrapes post titles and links from the paginated listing at
//! `https://theqoo.net/square?page={n}`. The listing is a plain HTML table;
//! pinned announcements are `<tr class="notice">` rows and each title cell
//! also carries a category-label anchor (`a.category`) that must be skipped.
//!
//! # URL Pattern
//!
//! Post links in the listing are relative and are resolved against the
//! forum domain, e.g. `/square/123456` becomes
//! `https://theqoo.net/square/123456`.

use crate::models::Article;
use once_cell::sync::Lazy;
use reqwest::header;
use scraper::{Html, Selector};
use std::error::Error;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

/// Forum domain; also the base for resolving relative post links.
pub const BASE_URL: &str = "https://theqoo.net";

/// The listing rejects requests without a browser-looking UA.
const FIXED_USER_AGENT: &str = "Mozilla/5.0";

/// Pause between listing pages to avoid hammering the source.
const PAGE_DELAY: Duration = Duration::from_millis(300);

static ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static TITLE_LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("td.title a").unwrap());

/// Fetch up to `target_count` posts from the first `page_limit` listing pages.
///
/// Pages are requested one at a time with a fixed delay in between. Paging
/// stops early once enough posts are collected, and the result is truncated
/// so it never exceeds `target_count`.
///
/// # Errors
///
/// Any request, HTTP status, or parse failure propagates immediately; the
/// caller treats it as fatal. There is no retry.
#[instrument(level = "info", skip_all, fields(page_limit, target_count))]
pub async fn fetch_articles(
    http: &reqwest::Client,
    base_url: &str,
    page_limit: u32,
    target_count: usize,
) -> Result<Vec<Article>, Box<dyn Error>> {
    let mut articles = Vec::new();

    for page in 1..=page_limit {
        let page_url = format!("{base_url}/square?page={page}");
        info!(page, "Reading listing page");

        let html = http
            .get(&page_url)
            .header(header::USER_AGENT, FIXED_USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let mut page_articles = parse_listing(&html, base_url)?;
        debug!(page, count = page_articles.len(), "Parsed listing page");
        articles.append(&mut page_articles);
        info!(page, collected = articles.len(), "Listing page done");

        if articles.len() >= target_count {
            break;
        }
        if page < page_limit {
            tokio::time::sleep(PAGE_DELAY).await;
        }
    }

    articles.truncate(target_count);
    info!(count = articles.len(), "Collected square posts");
    Ok(articles)
}

/// Extract `(title, absolute link)` pairs from one listing page.
///
/// Rows with the `notice` class and anchors with the `category` class are
/// excluded; remaining `td.title` anchors yield articles with their hrefs
/// resolved against `base_url`.
fn parse_listing(html: &str, base_url: &str) -> Result<Vec<Article>, Box<dyn Error>> {
    let base = Url::parse(base_url)?;
    let document = Html::parse_document(html);

    let mut articles = Vec::new();
    for row in document.select(&ROW_SELECTOR) {
        if has_class(row.value(), "notice") {
            continue;
        }
        for anchor in row.select(&TITLE_LINK_SELECTOR) {
            if has_class(anchor.value(), "category") {
                continue;
            }
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let title = anchor.text().collect::<Vec<_>>().join(" ").trim().to_string();
            if title.is_empty() {
                continue;
            }
            let link = base.join(href)?.to_string();
            articles.push(Article { title, link });
        }
    }

    Ok(articles)
}

fn has_class(element: &scraper::node::Element, class: &str) -> bool {
    element
        .attr("class")
        .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn listing_page(rows: &[(&str, &str)]) -> String {
        let body: String = rows
            .iter()
            .map(|(title, href)| {
                format!(
                    "<tr><td class=\"title\">\
                     <a class=\"category\" href=\"/square?category=1\">chat</a>\
                     <a href=\"{href}\">{title}</a>\
                     </td></tr>"
                )
            })
            .collect();
        format!(
            "<html><body><table>\
             <tr class=\"notice\"><td class=\"title\">\
             <a href=\"/square/1\">Pinned announcement</a></td></tr>\
             {body}\
             </table></body></html>"
        )
    }

    #[test]
    fn test_parse_listing_excludes_notice_rows_and_category_anchors() {
        let html = listing_page(&[("First post", "/square/100"), ("Second post", "/square/101")]);
        let articles = parse_listing(&html, "https://theqoo.net").unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "First post");
        assert_eq!(articles[0].link, "https://theqoo.net/square/100");
        assert!(articles.iter().all(|a| a.title != "Pinned announcement"));
        assert!(articles.iter().all(|a| a.title != "chat"));
    }

    #[test]
    fn test_parse_listing_trims_title_whitespace() {
        let html = "<table><tr><td class=\"title\">\
                    <a href=\"/square/5\">  spaced  title \n</a></td></tr></table>";
        let articles = parse_listing(html, "https://theqoo.net").unwrap();
        assert_eq!(articles[0].title, "spaced  title");
    }

    #[test]
    fn test_parse_listing_empty_page() {
        let articles = parse_listing("<html><body></body></html>", "https://theqoo.net").unwrap();
        assert!(articles.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_articles_truncates_to_target_count() {
        let server = MockServer::start_async().await;
        let rows: Vec<(String, String)> = (0..6)
            .map(|i| (format!("post {i}"), format!("/square/{i}")))
            .collect();
        let row_refs: Vec<(&str, &str)> = rows
            .iter()
            .map(|(t, h)| (t.as_str(), h.as_str()))
            .collect();
        let page = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/square")
                    .query_param("page", "1")
                    .header("user-agent", "Mozilla/5.0");
                then.status(200).body(listing_page(&row_refs));
            })
            .await;

        let http = reqwest::Client::new();
        let articles = fetch_articles(&http, &server.base_url(), 3, 4).await.unwrap();

        // One page already overshoots the target, so paging stops there.
        page.assert_async().await;
        assert_eq!(articles.len(), 4);
        assert_eq!(articles[0].title, "post 0");
    }

    #[tokio::test]
    async fn test_fetch_articles_walks_all_pages_when_short() {
        let server = MockServer::start_async().await;
        for n in 1..=2 {
            server
                .mock_async(move |when, then| {
                    when.method(GET)
                        .path("/square")
                        .query_param("page", n.to_string());
                    then.status(200)
                        .body(listing_page(&[("only post", "/square/9")]));
                })
                .await;
        }

        let http = reqwest::Client::new();
        let articles = fetch_articles(&http, &server.base_url(), 2, 100).await.unwrap();
        assert_eq!(articles.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_articles_http_error_is_fatal() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/square");
                then.status(503);
            })
            .await;

        let http = reqwest::Client::new();
        let result = fetch_articles(&http, &server.base_url(), 4, 100).await;
        assert!(result.is_err());
    }
}
