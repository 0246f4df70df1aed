//! Statistics for a single traversal run
//!
//! Counters are collected by the traversal engine and reported on stderr
//! once the run completes or is interrupted, keeping stdout for the link
//! hierarchy.

use std::time::Duration;

/// Traversal statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceStatistics {
    /// Pages fetched and parsed
    pub pages_fetched: u64,

    /// Pages that could not be retrieved (network or HTTP error)
    pub fetch_failures: u64,

    /// Pages retrieved whose body could not be decoded
    pub parse_failures: u64,

    /// Pages not fetched because they sit at the depth limit
    pub depth_limited: u64,

    /// New links written to the output
    pub links_discovered: u64,

    /// Size of the visited set at the end of the run
    pub visited_total: u64,

    /// Frontier entries left unexpanded (non-zero only when interrupted)
    pub pending: u64,

    /// Wall-clock time of the run
    pub elapsed: Duration,
}

impl TraceStatistics {
    /// Pages attempted, successful or not
    pub fn pages_attempted(&self) -> u64 {
        self.pages_fetched + self.fetch_failures + self.parse_failures
    }
}

/// Prints statistics to stderr in a formatted manner
pub fn print_statistics(stats: &TraceStatistics) {
    eprintln!("=== Trace Statistics ===\n");

    eprintln!("Overview:");
    eprintln!("  Links discovered: {}", stats.links_discovered);
    eprintln!("  Visited URLs: {}", stats.visited_total);
    eprintln!("  Pages fetched: {}", stats.pages_fetched);
    eprintln!("  Depth-limited pages: {}", stats.depth_limited);
    eprintln!();

    if stats.fetch_failures > 0 || stats.parse_failures > 0 {
        eprintln!("Failures:");
        eprintln!("  Fetch failures: {}", stats.fetch_failures);
        eprintln!("  Parse failures: {}", stats.parse_failures);
        eprintln!();
    }

    if stats.pending > 0 {
        eprintln!("Pending (resume with --continue): {}", stats.pending);
        eprintln!();
    }

    let attempted = stats.pages_attempted();
    let success_rate = if attempted > 0 {
        (stats.pages_fetched as f64 / attempted as f64) * 100.0
    } else {
        0.0
    };

    eprintln!(
        "Success Rate: {:.1}% ({} / {} pages fetched) in {:.2}s",
        success_rate,
        stats.pages_fetched,
        attempted,
        stats.elapsed.as_secs_f64()
    );
}
