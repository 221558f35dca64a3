use eframe::egui;

use crate::config::ViewerConfig;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ExamVitalsApp {
    pub state: AppState,
}

impl ExamVitalsApp {
    /// Build the app and load the configured data file, if any.
    pub fn new(config: &ViewerConfig) -> Self {
        let mut state = AppState::with_defaults(config.default_exam.clone(), config.default_band);
        if let Some(path) = &config.data_path {
            state.load_path(path);
        }
        Self { state }
    }
}

impl eframe::App for ExamVitalsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: selectors ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::chart_panel(ui, &mut self.state);
        });
    }
}
