/// Data layer: core types, loading, normalization, filtering, aggregation.
///
/// Architecture:
/// ```text
///  heart_failure.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  header lookup, typed numeric cells → Vec<RawRecord>
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  0/1 codes → labels, age → Age (bucketable) → Dataset
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection (AND across, OR within) → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  group-by + reduce → Summary / AggregateResult
///   └───────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;

use aggregate::{Summary, Thresholds};
use filter::{filtered_indices, FilterSelection};
use model::{Dataset, Record};

/// One end-to-end pipeline run over an already loaded dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    /// Indices into `Dataset::records` of the selected records, in order.
    pub indices: Vec<usize>,
    pub summary: Summary,
}

/// Filter `dataset` with `selection` and aggregate the result from scratch.
pub fn evaluate(dataset: &Dataset, selection: &FilterSelection, thresholds: Thresholds) -> Evaluation {
    let indices = filtered_indices(dataset, selection);
    let records: Vec<&Record> = indices.iter().map(|&i| &dataset.records[i]).collect();
    let summary = Summary::compute_with(&records, thresholds);
    log::debug!(
        "Selection keeps {} of {} records ({} deaths)",
        summary.total_cases,
        dataset.len(),
        summary.total_deaths
    );
    Evaluation { indices, summary }
}
