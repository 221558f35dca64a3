use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Band – performance classification derived from the exam score
// ---------------------------------------------------------------------------

/// Score at or above which a record is classified as [`Band::Good`].
pub const GOOD_THRESHOLD: f64 = 85.0;
/// Score at or above which a record is classified as [`Band::Average`].
pub const AVERAGE_THRESHOLD: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Good,
    Average,
    Bad,
}

impl Band {
    /// All bands in selector order.
    pub const ALL: [Band; 3] = [Band::Good, Band::Average, Band::Bad];

    /// Classify a score: `>= 85` good, `>= 70` average, otherwise bad.
    pub fn classify(score: f64) -> Self {
        if score >= GOOD_THRESHOLD {
            Band::Good
        } else if score >= AVERAGE_THRESHOLD {
            Band::Average
        } else {
            Band::Bad
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Band::Good => "good",
            Band::Average => "average",
            Band::Bad => "bad",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Band {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "good" => Ok(Band::Good),
            "average" => Ok(Band::Average),
            "bad" => Ok(Band::Bad),
            other => Err(format!("unknown performance band '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one observation row
// ---------------------------------------------------------------------------

/// A single physiological observation taken during an exam session.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Minutes from the start of the exam.
    pub timestamp: f64,
    /// Heart rate (BPM).
    pub heart_rate: f64,
    /// Electrodermal activity (skin conductance).
    pub eda: f64,
    /// Skin temperature (°C).
    pub temperature: f64,
    /// Lowercased exam name.
    pub exam: String,
    pub score: f64,
    /// Classified once from `score`.
    pub group: Band,
}

impl Record {
    /// Build a record, normalising the exam name and classifying the score.
    pub fn new(
        timestamp: f64,
        heart_rate: f64,
        eda: f64,
        temperature: f64,
        exam: &str,
        score: f64,
    ) -> Self {
        Record {
            // -0.0 and 0.0 must land in the same bucket.
            timestamp: if timestamp == 0.0 { 0.0 } else { timestamp },
            heart_rate,
            eda,
            temperature,
            exam: exam.trim().to_lowercase(),
            score,
            group: Band::classify(score),
        }
    }
}

/// Capitalise the first character of an exam name for labels and legends.
pub fn display_name(exam: &str) -> String {
    let mut chars = exam.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// ExamDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with the distinct exam names pre-computed.
#[derive(Debug, Clone)]
pub struct ExamDataset {
    pub records: Vec<Record>,
    /// Sorted set of distinct exam names (the exam selector domain).
    pub exams: BTreeSet<String>,
}

impl ExamDataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        let exams = records.iter().map(|r| r.exam.clone()).collect();
        ExamDataset { records, exams }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_exam(&self, exam: &str) -> bool {
        self.exams.contains(exam)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_boundaries() {
        assert_eq!(Band::classify(100.0), Band::Good);
        assert_eq!(Band::classify(85.0), Band::Good);
        assert_eq!(Band::classify(84.999), Band::Average);
        assert_eq!(Band::classify(70.0), Band::Average);
        assert_eq!(Band::classify(69.999), Band::Bad);
        assert_eq!(Band::classify(0.0), Band::Bad);
        assert_eq!(Band::classify(-5.0), Band::Bad);
    }

    #[test]
    fn record_normalises_exam_and_classifies() {
        let r = Record::new(3.0, 80.0, 0.4, 33.1, "  Midterm 1 ", 72.5);
        assert_eq!(r.exam, "midterm 1");
        assert_eq!(r.group, Band::Average);
    }

    #[test]
    fn negative_zero_timestamp_is_normalised() {
        let r = Record::new(-0.0, 80.0, 0.4, 33.1, "final", 90.0);
        assert!(r.timestamp.is_sign_positive());
    }

    #[test]
    fn band_parses_case_insensitively() {
        assert_eq!("Good".parse::<Band>(), Ok(Band::Good));
        assert_eq!(" average".parse::<Band>(), Ok(Band::Average));
        assert!("excellent".parse::<Band>().is_err());
    }

    #[test]
    fn display_name_capitalises_first_letter() {
        assert_eq!(display_name("final"), "Final");
        assert_eq!(display_name("midterm 2"), "Midterm 2");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn dataset_collects_sorted_exams() {
        let ds = ExamDataset::from_records(vec![
            Record::new(0.0, 70.0, 0.1, 33.0, "midterm 2", 90.0),
            Record::new(0.0, 70.0, 0.1, 33.0, "Final", 60.0),
            Record::new(1.0, 72.0, 0.2, 33.2, "midterm 2", 90.0),
        ]);
        assert_eq!(ds.len(), 3);
        let exams: Vec<&str> = ds.exams.iter().map(String::as_str).collect();
        assert_eq!(exams, vec!["final", "midterm 2"]);
        assert!(ds.has_exam("final"));
        assert!(!ds.has_exam("Final"));
    }
}
