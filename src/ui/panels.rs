use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::Selection;
use crate::data::model::{display_name, Band};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selector buttons
// ---------------------------------------------------------------------------

/// Render the left filter panel: one exclusive button group per selector.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };
    let exams: Vec<String> = dataset.exams.iter().cloned().collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Exam selector ----
            ui.strong("Exam");
            let mut exam_choice = None;
            ui.horizontal_wrapped(|ui: &mut Ui| {
                if ui
                    .selectable_label(state.filters.exam == Selection::All, "All")
                    .clicked()
                {
                    exam_choice = Some(Selection::All);
                }
                for exam in &exams {
                    let option = Selection::Only(exam.clone());
                    let text =
                        RichText::new(display_name(exam)).color(state.color_map.color_for(exam));
                    if ui
                        .selectable_label(state.filters.exam == option, text)
                        .clicked()
                    {
                        exam_choice = Some(option);
                    }
                }
            });
            if let Some(choice) = exam_choice {
                state.set_exam_filter(choice);
            }
            ui.separator();

            // ---- Performance band selector ----
            ui.strong("Performance");
            let mut band_choice = None;
            ui.horizontal_wrapped(|ui: &mut Ui| {
                if ui
                    .selectable_label(state.filters.band == Selection::All, "All")
                    .clicked()
                {
                    band_choice = Some(Selection::All);
                }
                for band in Band::ALL {
                    let option = Selection::Only(band);
                    if ui
                        .selectable_label(state.filters.band == option, display_name(band.as_str()))
                        .clicked()
                    {
                        band_choice = Some(option);
                    }
                }
            });
            if let Some(choice) = band_choice {
                state.set_band_filter(choice);
            }
            ui.separator();

            ui.label(RichText::new("Good ≥ 85 · Average 70–85 · Bad < 70").small().weak());
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} matching",
                ds.len(),
                state.matching_records
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open exam session data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
