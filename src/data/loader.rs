use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::error::RecordError;
use super::model::{ExamDataset, Record};

// ---------------------------------------------------------------------------
// Input schema
// ---------------------------------------------------------------------------

pub const TIMESTAMP_COL: &str = "minutes_from_start";
pub const HR_COL: &str = "HR";
pub const EDA_COL: &str = "EDA";
pub const TEMP_COL: &str = "TEMP";
pub const EXAM_COL: &str = "exam";
pub const SCORE_COL: &str = "score";

/// Every column a source must provide, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 6] =
    [TIMESTAMP_COL, HR_COL, EDA_COL, TEMP_COL, EXAM_COL, SCORE_COL];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an exam dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the six input columns (recommended)
/// * `.json`    – `[{ "minutes_from_start": 0, "HR": 72.0, ... }, ...]`
/// * `.parquet` – flat columns with the same names, numeric or string typed
pub fn load_file(path: &Path) -> Result<ExamDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening CSV {}", path.display()))?;
            load_csv(file)
        }
        "json" => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading JSON {}", path.display()))?;
            load_json(&text)
        }
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    log::info!(
        "Loaded {} records across {} exams from {}",
        dataset.len(),
        dataset.exams.len(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Cell coercion shared by all formats
// ---------------------------------------------------------------------------

/// A raw cell before coercion, as it came out of the source format.
#[derive(Debug, Clone)]
enum RawCell {
    Text(String),
    Number(f64),
    Null,
}

fn coerce_number(row: usize, column: &'static str, cell: &RawCell) -> Result<f64, RecordError> {
    let value = match cell {
        RawCell::Number(v) => *v,
        RawCell::Text(s) if s.trim().is_empty() => {
            return Err(RecordError::MissingValue { row, column })
        }
        RawCell::Text(s) => s.trim().parse::<f64>().map_err(|_| RecordError::NotANumber {
            row,
            column,
            value: s.clone(),
        })?,
        RawCell::Null => return Err(RecordError::MissingValue { row, column }),
    };
    if !value.is_finite() {
        return Err(RecordError::NotFinite { row, column, value });
    }
    Ok(value)
}

fn coerce_text(row: usize, column: &'static str, cell: &RawCell) -> Result<String, RecordError> {
    match cell {
        RawCell::Text(s) if !s.trim().is_empty() => Ok(s.clone()),
        RawCell::Number(v) => Ok(v.to_string()),
        _ => Err(RecordError::MissingValue { row, column }),
    }
}

/// Coerce the six cells of a row (in [`REQUIRED_COLUMNS`] order) into a record.
fn record_from_cells(row: usize, cells: &[RawCell; 6]) -> Result<Record, RecordError> {
    let [ts, hr, eda, temp, exam, score] = cells;
    Ok(Record::new(
        coerce_number(row, TIMESTAMP_COL, ts)?,
        coerce_number(row, HR_COL, hr)?,
        coerce_number(row, EDA_COL, eda)?,
        coerce_number(row, TEMP_COL, temp)?,
        &coerce_text(row, EXAM_COL, exam)?,
        coerce_number(row, SCORE_COL, score)?,
    ))
}

fn ensure_columns(available: &[&str]) -> Result<(), RecordError> {
    for required in REQUIRED_COLUMNS {
        if !available.contains(&required) {
            return Err(RecordError::MissingColumn(required.to_string()));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "minutes_from_start")]
    timestamp: String,
    #[serde(rename = "HR")]
    heart_rate: String,
    #[serde(rename = "EDA")]
    eda: String,
    #[serde(rename = "TEMP")]
    temperature: String,
    exam: String,
    score: String,
}

impl CsvRow {
    fn into_cells(self) -> [RawCell; 6] {
        [
            RawCell::Text(self.timestamp),
            RawCell::Text(self.heart_rate),
            RawCell::Text(self.eda),
            RawCell::Text(self.temperature),
            RawCell::Text(self.exam),
            RawCell::Text(self.score),
        ]
    }
}

/// CSV layout: header row naming at least the six input columns, one
/// observation per row.  Extra columns are ignored.
pub fn load_csv<R: Read>(source: R) -> Result<ExamDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers().context("reading CSV headers")?;
    ensure_columns(&headers.iter().collect::<Vec<_>>())?;

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(record_from_cells(row_no, &row.into_cells())?);
    }

    Ok(ExamDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "minutes_from_start": 0, "HR": 72.5, "EDA": 0.31,
///     "TEMP": 33.2, "exam": "Midterm 1", "score": 88 },
///   ...
/// ]
/// ```
///
/// Numeric fields may also be given as strings.
pub fn load_json(text: &str) -> Result<ExamDataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());
    for (row_no, value) in rows.iter().enumerate() {
        let obj = value
            .as_object()
            .with_context(|| format!("Row {row_no} is not a JSON object"))?;
        ensure_columns(&obj.keys().map(String::as_str).collect::<Vec<_>>())?;

        let mut cells: [RawCell; 6] = std::array::from_fn(|_| RawCell::Null);
        for (cell, column) in cells.iter_mut().zip(REQUIRED_COLUMNS) {
            *cell = json_to_cell(row_no, column, &obj[column])?;
        }
        records.push(record_from_cells(row_no, &cells)?);
    }

    Ok(ExamDataset::from_records(records))
}

fn json_to_cell(row: usize, column: &'static str, val: &JsonValue) -> Result<RawCell, RecordError> {
    match val {
        JsonValue::String(s) => Ok(RawCell::Text(s.clone())),
        JsonValue::Number(n) => Ok(n.as_f64().map(RawCell::Number).unwrap_or(RawCell::Null)),
        JsonValue::Null => Ok(RawCell::Null),
        JsonValue::Bool(_) => Err(RecordError::UnsupportedType {
            row,
            column,
            kind: "bool".to_string(),
        }),
        JsonValue::Array(_) | JsonValue::Object(_) => Err(RecordError::UnsupportedType {
            row,
            column,
            kind: "nested".to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per input field.
///
/// Numeric columns may be Int32/Int64/Float32/Float64; any column may also be
/// Utf8/LargeUtf8 and is then coerced like CSV text.  Works with files
/// written by both **Pandas** and **Polars**.
fn load_parquet(path: &Path) -> Result<ExamDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    let mut row_offset = 0;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        ensure_columns(&names)?;

        let columns: Vec<&Arc<dyn Array>> = REQUIRED_COLUMNS
            .iter()
            .map(|name| schema.index_of(name).map(|idx| batch.column(idx)))
            .collect::<Result<_, _>>()
            .context("locating parquet columns")?;

        for row in 0..batch.num_rows() {
            let row_no = row_offset + row;
            let mut cells: [RawCell; 6] = std::array::from_fn(|_| RawCell::Null);
            for ((cell, col), name) in cells.iter_mut().zip(&columns).zip(REQUIRED_COLUMNS) {
                *cell = arrow_to_cell(row_no, name, col, row)?;
            }
            records.push(record_from_cells(row_no, &cells)?);
        }
        row_offset += batch.num_rows();
    }

    Ok(ExamDataset::from_records(records))
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_to_cell(
    row_no: usize,
    column: &'static str,
    col: &Arc<dyn Array>,
    row: usize,
) -> Result<RawCell, RecordError> {
    if col.is_null(row) {
        return Ok(RawCell::Null);
    }
    let unsupported = || RecordError::UnsupportedType {
        row: row_no,
        column,
        kind: format!("{:?}", col.data_type()),
    };
    let cell = match col.data_type() {
        DataType::Utf8 => {
            let arr = col.as_any().downcast_ref::<StringArray>().ok_or_else(unsupported)?;
            RawCell::Text(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => RawCell::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().ok_or_else(unsupported)?;
            RawCell::Number(arr.value(row) as f64)
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().ok_or_else(unsupported)?;
            RawCell::Number(arr.value(row) as f64)
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>().ok_or_else(unsupported)?;
            RawCell::Number(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().ok_or_else(unsupported)?;
            RawCell::Number(arr.value(row))
        }
        _ => return Err(unsupported()),
    };
    Ok(cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Band;
    use std::io::Write;

    const SAMPLE_CSV: &str = "\
minutes_from_start,HR,EDA,TEMP,exam,score
0,72.5,0.31,33.2,Midterm 1,88
0,80,0.45,33.0,Midterm 1,65
1, 74.0 ,0.33,33.3,Final,70
";

    #[test]
    fn csv_rows_are_coerced_and_classified() {
        let ds = load_csv(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        let first = &ds.records[0];
        assert_eq!(first.timestamp, 0.0);
        assert_eq!(first.heart_rate, 72.5);
        assert_eq!(first.exam, "midterm 1");
        assert_eq!(first.group, Band::Good);
        assert_eq!(ds.records[1].group, Band::Bad);
        assert_eq!(ds.records[2].heart_rate, 74.0);
        assert_eq!(ds.records[2].group, Band::Average);
        assert_eq!(ds.exams.len(), 2);
    }

    #[test]
    fn csv_missing_column_is_reported() {
        let csv = "minutes_from_start,HR,EDA,exam,score\n0,70,0.3,final,90\n";
        let err = load_csv(csv.as_bytes()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<RecordError>(),
            Some(&RecordError::MissingColumn("TEMP".to_string()))
        );
    }

    #[test]
    fn csv_non_numeric_score_names_row_and_column() {
        let csv = "minutes_from_start,HR,EDA,TEMP,exam,score\n0,70,0.3,33,final,n/a\n";
        let err = load_csv(csv.as_bytes()).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("row 0"), "{msg}");
        assert!(msg.contains("'score'"), "{msg}");
    }

    #[test]
    fn csv_empty_value_is_rejected() {
        let csv = "minutes_from_start,HR,EDA,TEMP,exam,score\n0,,0.3,33,final,90\n";
        let err = load_csv(csv.as_bytes()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<RecordError>(),
            Some(&RecordError::MissingValue { row: 0, column: HR_COL })
        );
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let csv = "minutes_from_start,HR,EDA,TEMP,exam,score\n0,inf,0.3,33,final,90\n";
        let err = load_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RecordError>(),
            Some(RecordError::NotFinite { column: "HR", .. })
        ));
    }

    #[test]
    fn json_matches_csv_content() {
        let json = r#"[
            {"minutes_from_start": 0, "HR": 72.5, "EDA": 0.31, "TEMP": 33.2, "exam": "Midterm 1", "score": 88},
            {"minutes_from_start": "0", "HR": 80, "EDA": 0.45, "TEMP": 33.0, "exam": "Midterm 1", "score": 65},
            {"minutes_from_start": 1, "HR": "74.0", "EDA": 0.33, "TEMP": 33.3, "exam": "Final", "score": 70}
        ]"#;
        let from_json = load_json(json).unwrap();
        let from_csv = load_csv(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(from_json.records, from_csv.records);
    }

    #[test]
    fn json_bool_is_unsupported() {
        let json = r#"[{"minutes_from_start": 0, "HR": true, "EDA": 0.3, "TEMP": 33, "exam": "x", "score": 1}]"#;
        let err = load_json(json).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RecordError>(),
            Some(RecordError::UnsupportedType { column: "HR", .. })
        ));
    }

    #[test]
    fn load_file_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exam_data.csv");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(SAMPLE_CSV.as_bytes())
            .unwrap();
        assert_eq!(load_file(&path).unwrap().len(), 3);

        let bad = dir.path().join("exam_data.xlsx");
        std::fs::write(&bad, b"").unwrap();
        assert!(load_file(&bad).is_err());
    }

    #[test]
    fn parquet_with_mixed_column_types() {
        use arrow::array::{Int64Array, StringArray};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("minutes_from_start", DataType::Int64, false),
            Field::new("HR", DataType::Float64, false),
            Field::new("EDA", DataType::Float64, false),
            Field::new("TEMP", DataType::Utf8, false),
            Field::new("exam", DataType::Utf8, false),
            Field::new("score", DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![0, 1])),
                Arc::new(Float64Array::from(vec![70.0, 75.5])),
                Arc::new(Float64Array::from(vec![0.3, 0.4])),
                Arc::new(StringArray::from(vec!["33.1", "33.4"])),
                Arc::new(StringArray::from(vec!["Final", "Final"])),
                Arc::new(Int64Array::from(vec![85, 69])),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exam_data.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[1].heart_rate, 75.5);
        assert_eq!(ds.records[1].temperature, 33.4);
        assert_eq!(ds.records[0].group, Band::Good);
        assert_eq!(ds.records[1].group, Band::Bad);
        assert_eq!(ds.records[0].exam, "final");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_file(&dir.path().join("absent.csv")).is_err());
    }
}
