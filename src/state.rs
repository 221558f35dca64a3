use std::collections::BTreeSet;
use std::path::Path;

use crate::color::ColorMap;
use crate::data::aggregate::{build_chart, ChartData, Metric};
use crate::data::filter::{filter_records, FilterState, Selection};
use crate::data::loader;
use crate::data::model::{Band, ExamDataset};
use crate::data::scale::ChartBounds;

// ---------------------------------------------------------------------------
// Per-chart view state
// ---------------------------------------------------------------------------

/// One rendered chart: the aggregated series for a metric plus the legend
/// toggles local to this chart.
#[derive(Debug, Clone)]
pub struct ChartView {
    pub metric: Metric,
    pub data: ChartData,
    /// Plot bounds over all series, hidden ones included.
    pub bounds: Option<ChartBounds>,
    hidden: BTreeSet<String>,
}

impl ChartView {
    pub fn build(dataset: &ExamDataset, filters: &FilterState, metric: Metric) -> Self {
        let data = build_chart(&dataset.records, filters, metric);
        let bounds = ChartBounds::from_series(data.series());
        ChartView {
            metric,
            data,
            bounds,
            hidden: BTreeSet::new(),
        }
    }

    pub fn is_visible(&self, exam: &str) -> bool {
        !self.hidden.contains(exam)
    }

    /// Flip visibility of one exam's line and points.
    pub fn toggle_series(&mut self, exam: &str) {
        if !self.hidden.remove(exam) {
            self.hidden.insert(exam.to_string());
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// The dataset is set once per loaded file and only read afterwards; every
/// filter change rebuilds `charts` from it.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<ExamDataset>,

    /// Active exam and band selections.
    pub filters: FilterState,

    /// One view per metric, in display order.
    pub charts: Vec<ChartView>,

    /// Number of records passing the current filters.
    pub matching_records: usize,

    /// Per-exam colours for the loaded dataset.
    pub color_map: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Selections applied when a dataset is loaded.
    pub default_exam: Option<String>,
    pub default_band: Option<Band>,
}

impl AppState {
    pub fn with_defaults(default_exam: Option<String>, default_band: Option<Band>) -> Self {
        Self {
            default_exam,
            default_band,
            ..Self::default()
        }
    }

    /// Load a file and ingest it, or record the error for display.
    pub fn load_path(&mut self, path: &Path) {
        match loader::load_file(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset, initialise filters and colours.
    pub fn set_dataset(&mut self, dataset: ExamDataset) {
        self.filters =
            FilterState::resolve(self.default_exam.as_deref(), self.default_band, &dataset);
        self.color_map = ColorMap::new(&dataset.exams);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.on_filter_change();
    }

    pub fn set_exam_filter(&mut self, exam: Selection<String>) {
        if self.filters.exam != exam {
            self.filters.exam = exam;
            self.on_filter_change();
        }
    }

    pub fn set_band_filter(&mut self, band: Selection<Band>) {
        if self.filters.band != band {
            self.filters.band = band;
            self.on_filter_change();
        }
    }

    /// Rebuild all three charts for the current filters.  Legend toggles
    /// start fresh.
    pub fn on_filter_change(&mut self) {
        let Some(ds) = &self.dataset else {
            self.charts.clear();
            self.matching_records = 0;
            return;
        };
        self.matching_records = filter_records(&ds.records, &self.filters).len();
        self.charts = Metric::ALL
            .iter()
            .map(|&metric| ChartView::build(ds, &self.filters, metric))
            .collect();
        log::debug!(
            "Filters exam={} band={}: {} matching records",
            self.filters.exam,
            self.filters.band,
            self.matching_records
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;

    fn dataset() -> ExamDataset {
        ExamDataset::from_records(vec![
            Record::new(0.0, 70.0, 0.3, 33.0, "midterm 1", 90.0),
            Record::new(1.0, 72.0, 0.3, 33.1, "midterm 1", 90.0),
            Record::new(0.0, 80.0, 0.5, 33.4, "final", 60.0),
            Record::new(1.0, 84.0, 0.6, 33.6, "final", 60.0),
        ])
    }

    #[test]
    fn loading_builds_three_charts() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        assert_eq!(state.filters, FilterState::default());
        assert_eq!(state.matching_records, 4);
        let metrics: Vec<Metric> = state.charts.iter().map(|c| c.metric).collect();
        assert_eq!(metrics, Metric::ALL.to_vec());
        for chart in &state.charts {
            assert_eq!(chart.data.series().len(), 2);
            assert!(chart.bounds.is_some());
        }
    }

    #[test]
    fn defaults_are_applied_on_load() {
        let mut state = AppState::with_defaults(Some("Final".into()), Some(Band::Bad));
        state.set_dataset(dataset());
        assert_eq!(state.filters.exam, Selection::Only("final".to_string()));
        assert_eq!(state.filters.band, Selection::Only(Band::Bad));
        assert_eq!(state.matching_records, 2);
    }

    #[test]
    fn empty_selection_gives_no_data_charts() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.set_exam_filter(Selection::Only("midterm 1".into()));
        state.set_band_filter(Selection::Only(Band::Bad));
        assert_eq!(state.matching_records, 0);
        assert_eq!(state.charts.len(), 3);
        for chart in &state.charts {
            assert_eq!(chart.data, ChartData::NoData);
            assert!(chart.bounds.is_none());
        }
    }

    #[test]
    fn legend_toggle_is_per_chart_and_reset_on_filter_change() {
        let mut state = AppState::default();
        state.set_dataset(dataset());

        state.charts[0].toggle_series("final");
        assert!(!state.charts[0].is_visible("final"));
        assert!(state.charts[0].is_visible("midterm 1"));
        assert!(state.charts[1].is_visible("final"));

        let before = state.charts[0].data.clone();
        state.charts[0].toggle_series("final");
        assert!(state.charts[0].is_visible("final"));
        assert_eq!(state.charts[0].data, before);

        state.charts[2].toggle_series("midterm 1");
        state.set_band_filter(Selection::Only(Band::Good));
        assert!(state.charts[2].is_visible("midterm 1"));
    }

    #[test]
    fn load_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::default();
        state.load_path(&dir.path().join("missing.csv"));
        assert!(state.dataset.is_none());
        assert!(state.charts.is_empty());
        assert!(state
            .status_message
            .as_deref()
            .is_some_and(|m| m.starts_with("Error:")));
    }
}
