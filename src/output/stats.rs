//! Statistics for a finished crawl
//!
//! Computed from the record sequence and shown in the completion banner.

use crate::crawler::PageRecord;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Number of records produced
    pub total_records: u64,

    /// Count of records per depth
    pub depth_breakdown: BTreeMap<u32, u64>,

    /// Mean rank across all records (0 when there are none)
    pub mean_rank: f64,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

impl CrawlStatistics {
    /// Builds statistics from the records of a run
    pub fn from_records(records: &[PageRecord], elapsed: Duration) -> Self {
        let mut depth_breakdown = BTreeMap::new();
        for record in records {
            *depth_breakdown.entry(record.depth).or_insert(0) += 1;
        }

        let mean_rank = if records.is_empty() {
            0.0
        } else {
            records.iter().map(|r| r.rank).sum::<f64>() / records.len() as f64
        };

        Self {
            total_records: records.len() as u64,
            depth_breakdown,
            mean_rank,
            elapsed,
        }
    }
}

/// Prints the completion banner to stdout
///
/// # Arguments
///
/// * `stats` - The statistics to display
/// * `output_path` - Where the records were written
pub fn print_statistics(stats: &CrawlStatistics, output_path: &Path) {
    println!(
        "Crawling completed in {:.2} seconds. Output saved to {}",
        stats.elapsed.as_secs_f64(),
        output_path.display()
    );
    println!("Total URLs crawled: {}", stats.total_records);

    if !stats.depth_breakdown.is_empty() {
        let breakdown = stats
            .depth_breakdown
            .iter()
            .map(|(depth, count)| format!("depth {}: {}", depth, count))
            .collect::<Vec<_>>()
            .join(", ");
        println!("Pages by depth: {}", breakdown);
        println!("Mean rank: {:.3}", stats.mean_rank);
    }
}
