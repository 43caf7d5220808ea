//! Crawler module for fetching and processing the catalog
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `Fetcher` trait
//! - Sequential pagination over the listing pages
//! - Bounded concurrent processing of product pages
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod pagination;


pub use coordinator::{
    crawl_with_fetcher, run_crawl, visit_product, Coordinator, CrawlOutcome, ProductVisit,
};
pub use fetcher::{build_http_client, fetch_url, FetchResult, FetchedResource, Fetcher, HttpFetcher};
pub use pagination::{discover_detail_urls, listing_page_url, Discovery};
