//! Listing page parsing

use super::{resolve_link, select_all, select_first};
use scraper::Html;
use url::Url;

/// What a single listing page tells the pagination walker
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingPage {
    /// Number of product rows on the page, linked or not
    pub product_rows: usize,

    /// Detail page links found in the product rows (absolute URLs)
    pub product_links: Vec<String>,

    /// Whether the page offers a "next page" control
    pub has_next_page: bool,
}

/// Parses a listing page
///
/// Product rows are `tr.product`; each row links to its detail page through
/// `td.loop-product-title a`. Rows without a usable link still count towards
/// `product_rows`.
///
/// # Example
///
/// ```
/// use larodan_scraper::extract::parse_listing;
/// use url::Url;
///
/// let html = r#"<table><tr class="product"><td class="loop-product-title">
///     <a href="/products/oleic-acid/">Oleic acid</a></td></tr></table>"#;
/// let page = parse_listing(html, &Url::parse("https://example.com/shop/").unwrap());
/// assert_eq!(page.product_links, vec!["https://example.com/products/oleic-acid/"]);
/// assert!(!page.has_next_page);
/// ```
pub fn parse_listing(html: &str, page_url: &Url) -> ListingPage {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let rows = select_all(root, "tr.product");
    let product_links = rows
        .iter()
        .filter_map(|row| select_first(*row, "td.loop-product-title a"))
        .filter_map(|link| link.value().attr("href"))
        .filter_map(|href| resolve_link(href, Some(page_url)))
        .collect();

    ListingPage {
        product_rows: rows.len(),
        product_links,
        has_next_page: select_first(root, "a.next.page-numbers").is_some(),
    }
}
