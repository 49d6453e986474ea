//! Chart Viewer Widget
//! Central panel showing the range heading and the selected chart.

use egui::{RichText, ScrollArea};

use crate::charts::{ChartPlotter, Figure};

/// Scrollable chart display area. Holds the figures for the current selection
/// until the next interaction invalidates them.
#[derive(Default)]
pub struct ChartViewer {
    heading: String,
    subheading: String,
    figures: Vec<Figure>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the displayed view.
    pub fn set_view(&mut self, heading: String, subheading: String, figures: Vec<Figure>) {
        self.heading = heading;
        self.subheading = subheading;
        self.figures = figures;
    }

    pub fn clear(&mut self) {
        self.heading.clear();
        self.subheading.clear();
        self.figures.clear();
    }

    pub fn figures(&self) -> &[Figure] {
        &self.figures
    }

    /// Draw the headings and every figure of the current view.
    pub fn show(&self, ui: &mut egui::Ui) {
        if self.figures.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        }

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.add_space(5.0);
                ui.label(RichText::new(&self.heading).size(20.0).strong());
                ui.add_space(3.0);
                ui.label(RichText::new(&self.subheading).size(16.0).strong());
                ui.add_space(10.0);

                for (idx, figure) in self.figures.iter().enumerate() {
                    ChartPlotter::draw(ui, figure, idx);
                    ui.add_space(15.0);
                }
            });
    }
}
