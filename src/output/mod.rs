//! Output module for run summaries and store statistics
//!
//! This module handles:
//! - Printing the final summary of a crawl or refresh run
//! - Loading and printing store statistics

pub mod stats;

pub use stats::{load_statistics, print_run_summary, print_statistics, StoreStatistics};
