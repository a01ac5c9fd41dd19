//! Cross-document comparison for documentary-credit presentations.
//!
//! [`compare_document_set`] extracts the logical fields of every document,
//! compares each pair and classifies the mismatches under UCP 600.

pub mod classifier;
pub mod comparator;
pub mod config;
pub mod extract;
pub mod values;

use lc_model::{DiscrepancyReport, DocumentSet};
use tracing::{info, warn};

pub use classifier::{RuleTable, classify};
pub use comparator::compare;
pub use config::ComparisonConfig;
pub use extract::extract;

/// Compare a document set and classify what disagrees.
///
/// Mismatches whose category has no rule in `table` are carried in
/// `classification_gaps` rather than dropped.
pub fn compare_document_set(
    set: &DocumentSet,
    config: &ComparisonConfig,
    table: &RuleTable,
) -> DiscrepancyReport {
    let mut report = DiscrepancyReport {
        document_set_id: set.id.clone(),
        ..Default::default()
    };

    for mismatch in compare(set, config) {
        match classify(&set.id, &mismatch, table) {
            Ok(discrepancy) => report.discrepancies.push(discrepancy),
            Err(gap) => {
                warn!(document_set = %set.id, "{gap}");
                report.classification_gaps.push(gap);
            }
        }
    }

    info!(
        document_set = %set.id,
        discrepancies = report.discrepancies.len(),
        gaps = report.classification_gaps.len(),
        "document set compared"
    );
    report
}
