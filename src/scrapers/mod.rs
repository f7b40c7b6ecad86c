//! Forum listing scrapers.
//!
//! One source is supported today: the theqoo "square" board, scraped from
//! its paginated HTML listing. A scraper module exposes a single
//! `fetch_articles` operation that walks the listing pages sequentially and
//! returns `(title, absolute link)` pairs.
//!
//! Scrapers in this crate:
//! - Fetch pages one at a time with a fixed delay between requests
//! - Exclude pinned/notice rows and category-label anchors
//! - Treat any request or parse failure as fatal to the run

pub mod square;
