use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::filter::{filter_records, FilterState};
use super::model::Record;

// ---------------------------------------------------------------------------
// Metric – which physiological channel a chart shows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Temperature,
    Eda,
    HeartRate,
}

impl Metric {
    /// Charts in display order.
    pub const ALL: [Metric; 3] = [Metric::Temperature, Metric::Eda, Metric::HeartRate];

    pub fn value(self, record: &Record) -> f64 {
        match self {
            Metric::Temperature => record.temperature,
            Metric::Eda => record.eda,
            Metric::HeartRate => record.heart_rate,
        }
    }

    /// Y-axis label.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Temperature => "Skin Temp (°C)",
            Metric::Eda => "Skin Conductance (EDA)",
            Metric::HeartRate => "Heart Rate (BPM)",
        }
    }

    pub fn title(self) -> String {
        format!("{} Over Time by Exam", self.label())
    }

    /// Stable identifier of the chart region.
    pub fn chart_id(self) -> &'static str {
        match self {
            Metric::Temperature => "chart-temp",
            Metric::Eda => "chart-eda",
            Metric::HeartRate => "chart-hr",
        }
    }
}

// ---------------------------------------------------------------------------
// Series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub timestamp: f64,
    pub value: f64,
}

/// One exam's averaged values, ascending by timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub exam: String,
    pub values: Vec<SeriesPoint>,
}

/// Aggregation result for one chart.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    /// No record survived the filters.
    NoData,
    /// At least one series, ordered by exam name.
    Series(Vec<Series>),
}

impl ChartData {
    pub fn series(&self) -> &[Series] {
        match self {
            ChartData::NoData => &[],
            ChartData::Series(series) => series,
        }
    }
}

/// Timestamp as a map key, ordered with `total_cmp`.
#[derive(Debug, Clone, Copy)]
struct Minute(f64);

impl PartialEq for Minute {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Minute {}

impl PartialOrd for Minute {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Minute {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Running sum and count of one (exam, timestamp) bucket.
#[derive(Debug, Default, Clone, Copy)]
struct Bucket {
    sum: f64,
    count: usize,
}

impl Bucket {
    fn mean(self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Group records by exam then timestamp and average `metric` per bucket.
///
/// Returns [`ChartData::NoData`] when `records` is empty.
pub fn aggregate<'a>(records: impl IntoIterator<Item = &'a Record>, metric: Metric) -> ChartData {
    let mut grouped: BTreeMap<&str, BTreeMap<Minute, Bucket>> = BTreeMap::new();
    for record in records {
        let bucket = grouped
            .entry(record.exam.as_str())
            .or_default()
            .entry(Minute(record.timestamp))
            .or_default();
        bucket.sum += metric.value(record);
        bucket.count += 1;
    }

    if grouped.is_empty() {
        return ChartData::NoData;
    }

    let series = grouped
        .into_iter()
        .map(|(exam, buckets)| Series {
            exam: exam.to_string(),
            values: buckets
                .into_iter()
                .map(|(minute, bucket)| SeriesPoint {
                    timestamp: minute.0,
                    value: bucket.mean(),
                })
                .collect(),
        })
        .collect();
    ChartData::Series(series)
}

/// Filter the full record set and aggregate one metric.
pub fn build_chart(records: &[Record], filters: &FilterState, metric: Metric) -> ChartData {
    aggregate(filter_records(records, filters), metric)
}
