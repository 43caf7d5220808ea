//! Sequential listing walk
//!
//! Listing pages are requested one after another: whether page N+1 exists is
//! only known once page N has been read.

use crate::crawler::Fetcher;
use crate::extract::parse_listing;
use std::collections::HashSet;
use url::Url;

/// Outcome of a pagination walk
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Unique detail page URLs, in no particular order
    pub urls: Vec<String>,

    /// Listing pages that were fetched and parsed
    pub pages_walked: u32,
}

/// URL of listing page `page` (1-based) under `base_url`
///
/// Page 1 is the base URL itself; later pages live at `{base}page/{n}/`.
pub fn listing_page_url(base_url: &str, page: u32) -> String {
    if page <= 1 {
        return base_url.to_string();
    }
    if base_url.ends_with('/') {
        format!("{}page/{}/", base_url, page)
    } else {
        format!("{}/page/{}/", base_url, page)
    }
}

/// Walks the listing from page 1 and collects every detail page link
///
/// The walk stops at the first page that:
/// - cannot be fetched (transport error or non-success status)
/// - has no product rows
/// - has no "next page" control
///
/// A failed page ends the walk without discarding what earlier pages
/// yielded. Links listed on several pages are returned once.
pub async fn discover_detail_urls(fetcher: &dyn Fetcher, base_url: &str) -> Discovery {
    let mut urls = HashSet::new();
    let mut page = 1;
    let mut pages_walked = 0;

    loop {
        let page_url = listing_page_url(base_url, page);
        tracing::info!("Processing listing page {}", page_url);

        let resource = match fetcher.fetch(&page_url).await.into_result(&page_url) {
            Ok(resource) => resource,
            Err(e) => {
                tracing::warn!("Stopping pagination: {}", e);
                break;
            }
        };

        let parse_base = Url::parse(&resource.final_url)
            .or_else(|_| Url::parse(&page_url));
        let listing = match parse_base {
            Ok(base) => parse_listing(&resource.text(), &base),
            Err(e) => {
                tracing::warn!("Stopping pagination: invalid listing URL {}: {}", page_url, e);
                break;
            }
        };
        pages_walked += 1;

        if listing.product_rows == 0 {
            tracing::debug!("No products on {}, end of listing", page_url);
            break;
        }

        for link in listing.product_links {
            tracing::debug!("Found product: {}", link);
            urls.insert(link);
        }

        if !listing.has_next_page {
            break;
        }
        page += 1;
    }

    tracing::info!(
        "Pagination finished after {} page(s): {} unique products",
        pages_walked,
        urls.len()
    );

    Discovery {
        urls: urls.into_iter().collect(),
        pages_walked,
    }
}
