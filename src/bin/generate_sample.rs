use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One output row, in the viewer's input schema.
#[derive(Debug, Serialize)]
struct SampleRow {
    minutes_from_start: f64,
    #[serde(rename = "HR")]
    hr: f64,
    #[serde(rename = "EDA")]
    eda: f64,
    #[serde(rename = "TEMP")]
    temp: f64,
    exam: String,
    score: f64,
}

/// Stress response of one student over an exam: baseline plus a rise that
/// peaks mid-exam, scaled by how poorly the student did.
fn session(
    rng: &mut SimpleRng,
    exam: &str,
    duration_min: u32,
    score: f64,
    rows: &mut Vec<SampleRow>,
) {
    let stress = ((100.0 - score) / 50.0).clamp(0.2, 1.2);
    let hr_base = rng.gauss(72.0, 6.0);
    let eda_base = rng.gauss(0.4, 0.1).max(0.05);
    let temp_base = rng.gauss(33.0, 0.4);

    for minute in 0..=duration_min {
        let phase = minute as f64 / duration_min as f64;
        let arousal = (std::f64::consts::PI * phase).sin() * stress;
        rows.push(SampleRow {
            minutes_from_start: minute as f64,
            hr: round2(hr_base + 15.0 * arousal + rng.gauss(0.0, 2.0)),
            eda: round2((eda_base + 0.6 * arousal + rng.gauss(0.0, 0.05)).max(0.0)),
            temp: round2(temp_base - 0.5 * arousal + rng.gauss(0.0, 0.05)),
            exam: exam.to_string(),
            score,
        });
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn write_csv(path: &str, rows: &[SampleRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn float_column(rows: &[SampleRow], f: fn(&SampleRow) -> f64) -> Float64Array {
    Float64Array::from(rows.iter().map(f).collect::<Vec<_>>())
}

fn write_parquet(path: &str, rows: &[SampleRow]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("minutes_from_start", DataType::Float64, false),
        Field::new("HR", DataType::Float64, false),
        Field::new("EDA", DataType::Float64, false),
        Field::new("TEMP", DataType::Float64, false),
        Field::new("exam", DataType::Utf8, false),
        Field::new("score", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(float_column(rows, |r| r.minutes_from_start)),
            Arc::new(float_column(rows, |r| r.hr)),
            Arc::new(float_column(rows, |r| r.eda)),
            Arc::new(float_column(rows, |r| r.temp)),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.exam.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(float_column(rows, |r| r.score)),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    // (exam, duration in minutes)
    let exams = [("Midterm 1", 60), ("Midterm 2", 60), ("Final", 90)];
    let students = 12;

    let mut rows = Vec::new();
    for (exam, duration) in exams {
        for _ in 0..students {
            let score = rng.gauss(76.0, 12.0).clamp(30.0, 100.0).round();
            session(&mut rng, exam, duration, score, &mut rows);
        }
    }

    write_csv("sample_exam_data.csv", &rows)?;
    write_parquet("sample_exam_data.parquet", &rows)?;

    println!(
        "Wrote {} observations ({} exams × {students} students) to sample_exam_data.csv and sample_exam_data.parquet",
        rows.len(),
        exams.len()
    );
    Ok(())
}
