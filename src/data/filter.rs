use std::fmt;

use super::model::{Band, ExamDataset, Record};

// ---------------------------------------------------------------------------
// Single-choice selector value
// ---------------------------------------------------------------------------

/// The active option of a single-choice selector: everything, or one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: PartialEq> Selection<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(selected) => selected == value,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("all"),
            Selection::Only(v) => write!(f, "{v}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter state: exam and performance band
// ---------------------------------------------------------------------------

/// The two active selector values.  Defaults to `all`/`all`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub exam: Selection<String>,
    pub band: Selection<Band>,
}

impl FilterState {
    /// Build a filter state from requested defaults, forcing `all` for an exam
    /// the dataset does not contain.
    pub fn resolve(exam: Option<&str>, band: Option<Band>, dataset: &ExamDataset) -> Self {
        let exam = match exam.map(|e| e.trim().to_lowercase()) {
            None => Selection::All,
            Some(e) if e == "all" => Selection::All,
            Some(e) if dataset.has_exam(&e) => Selection::Only(e),
            Some(e) => {
                log::warn!("Exam '{e}' not present in dataset, defaulting to all");
                Selection::All
            }
        };
        let band = band.map(Selection::Only).unwrap_or_default();
        FilterState { exam, band }
    }

    /// Whether a record passes both selectors.
    pub fn accepts(&self, record: &Record) -> bool {
        self.exam.matches(&record.exam) && self.band.matches(&record.group)
    }
}

/// Return the records passing the active filters, in input order.
pub fn filter_records<'a>(records: &'a [Record], filters: &FilterState) -> Vec<&'a Record> {
    records.iter().filter(|r| filters.accepts(r)).collect()
}
