//! Run statistics
//!
//! Counters gathered while a harvest runs, printed once it finishes.

use chrono::{DateTime, Utc};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Listing pages fetched and parsed
    pub listing_pages: u32,

    /// Unique detail pages found on the listing
    pub products_discovered: usize,

    /// Records in the products document
    pub products_written: usize,

    /// Detail pages that could not be processed
    pub products_dropped: usize,

    /// Failed image or safety sheet steps on written products
    pub asset_failures: usize,

    pub images_saved: usize,
    pub un_numbers_found: usize,

    /// Where the products document was written
    pub output_path: String,
}

impl CrawlStatistics {
    /// Wall-clock duration of the run in seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Percentage of discovered products that made it into the document
    pub fn success_rate(&self) -> f64 {
        if self.products_discovered == 0 {
            return 0.0;
        }
        (self.products_written as f64 / self.products_discovered as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Started: {}", stats.started_at.to_rfc3339());
    println!("  Duration: {} seconds", stats.duration_seconds());
    println!("  Listing pages walked: {}", stats.listing_pages);
    println!("  Products discovered: {}", stats.products_discovered);
    println!();

    println!("Products:");
    println!("  Written: {}", stats.products_written);
    println!("  Dropped: {}", stats.products_dropped);
    println!("  Images saved: {}", stats.images_saved);
    println!("  UN numbers found: {}", stats.un_numbers_found);
    if stats.asset_failures > 0 {
        println!("  Asset failures: {}", stats.asset_failures);
    }
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} products written to {})",
        stats.success_rate(),
        stats.products_written,
        stats.products_discovered,
        stats.output_path
    );
}
