/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + coerce rows → ExamDataset (bands classified)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  exam × band selection → surviving records
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  (exam, minute) buckets → mean per metric → Series
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  scale    │  series extents → nice, non-degenerate plot bounds
///   └──────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod scale;
