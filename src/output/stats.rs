//! Statistics generation from the item store

use crate::storage::{ItemStore, RunMode, RunRecord, RunTotals};
use crate::HarvestError;

/// Number of past runs shown by `--stats`
const RECENT_RUN_LIMIT: usize = 10;

/// Store statistics summary
#[derive(Debug, Clone)]
pub struct StoreStatistics {
    /// Total number of stored items
    pub total_items: u64,

    /// Most recent runs, newest first
    pub recent_runs: Vec<RunRecord>,
}

/// Loads statistics from the store
pub fn load_statistics(store: &dyn ItemStore) -> Result<StoreStatistics, HarvestError> {
    let total_items = store.count_items()?;
    let recent_runs = store.recent_runs(RECENT_RUN_LIMIT)?;

    Ok(StoreStatistics {
        total_items,
        recent_runs,
    })
}

/// One-line description of a run's counts
pub fn describe_totals(mode: RunMode, totals: &RunTotals) -> String {
    match mode {
        RunMode::Crawl => format!(
            "{} processed, {} saved, {} skipped, {} failed",
            totals.processed, totals.saved, totals.skipped, totals.failed
        ),
        RunMode::Refresh => format!(
            "{} processed, {} updated, {} deleted, {} failed",
            totals.processed, totals.updated, totals.deleted, totals.failed
        ),
    }
}

/// Prints the final summary of a run to stdout
pub fn print_run_summary(mode: RunMode, totals: &RunTotals) {
    println!("🏁 Finished {} | {}", mode.to_db_string(), describe_totals(mode, totals));
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Store Statistics ===\n");

    println!("Items stored: {}", stats.total_items);
    println!();

    if stats.recent_runs.is_empty() {
        println!("No runs recorded yet");
        return;
    }

    println!("Recent Runs:");
    for run in &stats.recent_runs {
        let finished = run.finished_at.as_deref().unwrap_or("unfinished");
        println!(
            "  #{} {} started {} ({}): {}",
            run.id,
            run.mode.to_db_string(),
            run.started_at,
            finished,
            describe_totals(run.mode, &run.totals)
        );
    }
}
