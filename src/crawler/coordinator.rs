//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the product fan-out that coordinates all aspects of
//! a run, including:
//! - Walking the listing to discover detail pages
//! - Admitting at most `concurrency` product visits at a time
//! - Driving each visit through fetch, extraction and asset resolution
//! - Collecting the records and deciding what to do with every failure
//! - Writing the final products document

use crate::assets::{AssetResolver, ResolvedAssets};
use crate::config::Config;
use crate::crawler::pagination::discover_detail_urls;
use crate::crawler::{build_http_client, Fetcher, HttpFetcher};
use crate::extract::extract_product;
use crate::model::{ProductAttributes, ProductRecord};
use crate::output::{prepare_directories, write_products, CrawlStatistics};
use crate::ScraperError;
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Everything a finished product visit produced
#[derive(Debug)]
pub struct ProductVisit {
    pub attributes: ProductAttributes,
    pub assets: ResolvedAssets,
}

/// Records collected by a coordinator run, plus what was discarded on the way
#[derive(Debug, Default)]
pub struct CrawlOutcome {
    /// Successfully processed products, in completion order
    pub records: Vec<ProductRecord>,

    /// Product visits that failed and were left out
    pub dropped: usize,

    /// Image or safety sheet steps that failed on kept products
    pub asset_failures: usize,

    /// Products whose diagram was stored locally
    pub images_saved: usize,

    /// Products with a UN number
    pub un_numbers_found: usize,
}

impl CrawlOutcome {
    /// Folds a finished visit into the collected records
    ///
    /// Asset failures are logged here and degrade to an empty image path or
    /// a missing UN number; the product itself is kept.
    fn accept(&mut self, url: &str, visit: ProductVisit) {
        let ProductVisit { attributes, assets } = visit;

        let image_path = match assets.image {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("Image for {} discarded: {}", url, e);
                self.asset_failures += 1;
                None
            }
        };

        let un_number = match assets.un_number {
            Ok(number) => number,
            Err(e) => {
                tracing::warn!("UN number for {} unavailable: {}", url, e);
                self.asset_failures += 1;
                None
            }
        };

        if image_path.is_some() {
            self.images_saved += 1;
        }
        if un_number.is_some() {
            self.un_numbers_found += 1;
        }

        let record = attributes.into_record(image_path.as_deref(), un_number);
        tracing::info!("Product processed successfully: {}", record.id);
        self.records.push(record);
    }

    fn drop_product(&mut self, url: &str, error: &ScraperError) {
        tracing::warn!("Dropping product {}: {}", url, error);
        self.dropped += 1;
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    fetcher: Arc<dyn Fetcher>,
    resolver: Arc<AssetResolver>,
    concurrency: usize,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Transport shared by every visit
    /// * `resolver` - Asset steps run after extraction
    /// * `concurrency` - Maximum number of product visits in flight (at least 1)
    pub fn new(fetcher: Arc<dyn Fetcher>, resolver: Arc<AssetResolver>, concurrency: usize) -> Self {
        Self {
            fetcher,
            resolver,
            concurrency: concurrency.max(1),
        }
    }

    /// Visits every detail page and collects the resulting records
    ///
    /// All URLs are scheduled up front; a semaphore admits at most
    /// `concurrency` of them at a time. A failing visit is logged and left
    /// out, it never stops the others. Returns once every visit finished.
    pub async fn run(&self, urls: Vec<String>) -> CrawlOutcome {
        tracing::info!(
            "Starting crawl of {} products with {} workers",
            urls.len(),
            self.concurrency
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for url in urls {
            let semaphore = semaphore.clone();
            let fetcher = self.fetcher.clone();
            let resolver = self.resolver.clone();

            tasks.spawn(async move {
                let visit = admit_and_visit(semaphore, fetcher.as_ref(), &resolver, &url).await;
                (url, visit)
            });
        }

        let mut outcome = CrawlOutcome::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((url, Ok(visit))) => outcome.accept(&url, visit),
                Ok((url, Err(e))) => outcome.drop_product(&url, &e),
                Err(e) => {
                    tracing::error!("Product task aborted: {}", e);
                    outcome.dropped += 1;
                }
            }
        }

        outcome
    }
}

/// Waits for a permit, then visits the product while holding it
///
/// A closed semaphore fails the visit instead of running it unbounded.
async fn admit_and_visit(
    semaphore: Arc<Semaphore>,
    fetcher: &dyn Fetcher,
    resolver: &AssetResolver,
    url: &str,
) -> Result<ProductVisit, ScraperError> {
    let _permit = semaphore.acquire_owned().await.map_err(|_| ScraperError::Transport {
        url: url.to_string(),
        reason: "crawl gate closed before the visit started".to_string(),
    })?;
    visit_product(fetcher, resolver, url).await
}

/// Fetches, extracts and resolves the assets of a single product
///
/// Steps run strictly in sequence. Only a failure to obtain the detail page
/// fails the visit; asset problems are carried in the returned value.
pub async fn visit_product(
    fetcher: &dyn Fetcher,
    resolver: &AssetResolver,
    url: &str,
) -> Result<ProductVisit, ScraperError> {
    tracing::info!("Processing product: {}", url);

    let page = fetcher.fetch(url).await.into_result(url)?;
    if page.body.is_empty() {
        return Err(ScraperError::Parse {
            url: url.to_string(),
            message: "empty detail page".to_string(),
        });
    }

    // Relative asset links follow redirects; the record keeps the listed URL
    let mut attributes = extract_product(&page.text(), &page.final_url);
    attributes.url = url.to_string();
    let assets = resolver.resolve(&attributes).await;

    Ok(ProductVisit { attributes, assets })
}

/// Runs the complete harvest against the live site
///
/// This function orchestrates the entire process:
///
/// 1. Create the image, scratch and output directories
/// 2. Build the HTTP client
/// 3. Walk the listing pages
/// 4. Visit all discovered products concurrently
/// 5. Write the products document
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - The document was written
/// * `Err(ScraperError)` - Setup or the final write failed
///
/// # Example
///
/// ```no_run
/// use larodan_scraper::config::Config;
/// use larodan_scraper::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let stats = run_crawl(Config::default()).await?;
/// println!("{} products written", stats.products_written);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlStatistics, ScraperError> {
    let client = build_http_client(&config.crawler, &config.user_agent)?;
    crawl_with_fetcher(&config, Arc::new(HttpFetcher::new(client))).await
}

/// Runs the complete harvest over an arbitrary transport
pub async fn crawl_with_fetcher(
    config: &Config,
    fetcher: Arc<dyn Fetcher>,
) -> Result<CrawlStatistics, ScraperError> {
    let started_at = Utc::now();
    prepare_directories(&config.output)?;

    let discovery = discover_detail_urls(fetcher.as_ref(), &config.crawler.base_url).await;
    let products_discovered = discovery.urls.len();

    let resolver = Arc::new(AssetResolver::from_config(fetcher.clone(), &config.output));
    let coordinator = Coordinator::new(fetcher, resolver, config.crawler.concurrency as usize);
    let outcome = coordinator.run(discovery.urls).await;

    let output_path = Path::new(&config.output.products_file);
    tracing::info!("Saving {} products...", outcome.records.len());
    write_products(&outcome.records, output_path)?;
    tracing::info!("Results saved in {}", output_path.display());

    Ok(CrawlStatistics {
        started_at,
        finished_at: Utc::now(),
        listing_pages: discovery.pages_walked,
        products_discovered,
        products_written: outcome.records.len(),
        products_dropped: outcome.dropped,
        asset_failures: outcome.asset_failures,
        images_saved: outcome.images_saved,
        un_numbers_found: outcome.un_numbers_found,
        output_path: config.output.products_file.clone(),
    })
}
