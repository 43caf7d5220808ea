//! HTML extraction for listing and product pages
//!
//! Everything in here is pure: a page body goes in, owned values come out.
//! Parsed documents never leave this module, which keeps the (non-`Send`)
//! DOM out of the async crawl tasks.

mod listing;
mod packaging;
mod product;

pub use listing::{parse_listing, ListingPage};
pub use packaging::{extract_packaging, parse_price, parse_size_label};
pub use product::{extract_product, parse_synonyms};

use scraper::{ElementRef, Selector};
use url::Url;

/// Selects every descendant of `scope` matching `css`
fn select_all<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => scope.select(&selector).collect(),
        Err(e) => {
            tracing::error!("Invalid selector {}: {:?}", css, e);
            Vec::new()
        }
    }
}

/// Selects the first descendant of `scope` matching `css`
fn select_first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    select_all(scope, css).into_iter().next()
}

/// Concatenated raw text of an element and its descendants
fn full_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Text of an element with every text node trimmed and empty nodes dropped
///
/// Nodes are joined without a separator, so `<span>CAS number:</span> 112-80-1`
/// reads as `CAS number:112-80-1`.
fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Resolves an href against the page it was found on
///
/// Returns None for links that cannot point at a fetchable resource:
/// - empty hrefs and same-page fragments
/// - `javascript:`, `mailto:`, `tel:` and `data:` schemes
///
/// When the page URL itself could not be parsed the href is kept verbatim.
fn resolve_link(href: &str, base_url: Option<&Url>) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url {
        Some(base) => match base.join(href) {
            Ok(absolute) => Some(absolute.to_string()),
            Err(_) => Some(href.to_string()),
        },
        None => Some(href.to_string()),
    }
}
