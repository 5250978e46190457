//! Statistics reporting.

use console::style;

use crate::pipeline::CrawlStats;

/// Print statistics for one crawl target.
pub fn print_target_stats(target: &str, stats: &CrawlStats) {
    println!();
    println!("{}", style(format!("Statistics for {}:", target)).bold());
    println!("  Photos:          {}", stats.photos);
    println!("  Videos:          {}", stats.videos);
    println!("  Profile images:  {}", stats.profile_images);
    if stats.text_posts > 0 {
        println!("  Text posts:      {}", stats.text_posts);
    }
    println!("  Skipped:         {} (already on disk)", stats.skipped);
    println!("  Total:           {} downloaded", stats.total_downloaded());
}

/// Print global statistics across all targets.
pub fn print_global_stats(stats: &CrawlStats, targets_processed: u64, targets_failed: u64) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Global Statistics:").bold());
    println!("  Targets processed: {}", targets_processed);
    if targets_failed > 0 {
        println!("  Targets failed:    {}", style(targets_failed).red());
    }
    println!("  Photos:          {}", stats.photos);
    println!("  Videos:          {}", stats.videos);
    println!("  Profile images:  {}", stats.profile_images);
    println!("  Skipped:         {}", stats.skipped);
    println!("  Total:           {} downloaded", stats.total_downloaded());
    println!("{}", style("═".repeat(50)).dim());
}
