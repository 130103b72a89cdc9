//! Output formatting for CLI

use crate::error::LoaderError;
use crate::loader::LoadStats;

/// Summary line printed after a successful run
pub fn format_summary(stats: &LoadStats) -> String {
    format!(
        "Data successfully loaded into DB. Processed: {}, Skipped duplicates: {}",
        stats.processed_count, stats.skipped_duplicates
    )
}

/// Line printed after a failed run
pub fn format_error(error: &LoaderError) -> String {
    format!("Error: {}", error.user_message())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_summary() {
        let stats = LoadStats {
            total_records: 3,
            processed_count: 2,
            skipped_duplicates: 1,
            ..Default::default()
        };
        assert_eq!(
            format_summary(&stats),
            "Data successfully loaded into DB. Processed: 2, Skipped duplicates: 1"
        );
    }

    #[test]
    fn test_format_error() {
        let err = LoaderError::NotFound(PathBuf::from("ozon_orders.json"));
        let line = format_error(&err);
        assert!(line.starts_with("Error: File not found: ozon_orders.json"));
    }
}
