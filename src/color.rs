use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: exam name → Color32
// ---------------------------------------------------------------------------

/// Assigns every exam in the dataset its own colour.  Built from the full
/// exam set so colours stay put while filters change.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    pub fn new(exams: &BTreeSet<String>) -> Self {
        let palette = generate_palette(exams.len());
        let mapping = exams.iter().cloned().zip(palette).collect();
        ColorMap { mapping }
    }

    /// Look up the colour for an exam, grey if unknown.
    pub fn color_for(&self, exam: &str) -> Color32 {
        self.mapping.get(exam).copied().unwrap_or(Color32::GRAY)
    }
}
