//! Control Panel Widget
//! Left side panel with the date-range sliders and the chart selector.

use egui::{Color32, ComboBox, RichText, Slider};
use serde::{Deserialize, Serialize};

use crate::charts::ChartKind;
use crate::data::{format_ts, WINDOW_END_TS, WINDOW_START_TS};

/// User selection, persisted across sessions via eframe storage.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    pub start_ts: i64,
    pub end_ts: i64,
    pub chart: ChartKind,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            start_ts: WINDOW_START_TS,
            end_ts: WINDOW_END_TS,
            chart: ChartKind::default(),
        }
    }
}

impl UserSettings {
    /// Restored settings may predate the current window bounds.
    pub fn clamp_to_window(&mut self) {
        self.start_ts = self.start_ts.clamp(WINDOW_START_TS, WINDOW_END_TS);
        self.end_ts = self.end_ts.clamp(self.start_ts, WINDOW_END_TS);
    }
}

/// Left side control panel with range selection and export controls.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub status: String,
    pub loading: bool,
    pub dataset_rows: Option<usize>,
}

impl ControlPanel {
    pub fn new(settings: UserSettings) -> Self {
        Self {
            settings,
            status: "Ready".to_string(),
            loading: false,
            dataset_rows: None,
        }
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel.
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Tipboard")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Restaurant Tips Dashboard")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Date Range Section =====
        ui.label(RichText::new("📅 Date Range").size(14.0).strong());
        ui.add_space(5.0);

        ui.label("Start date:");
        let start = ui.add(
            Slider::new(&mut self.settings.start_ts, WINDOW_START_TS..=WINDOW_END_TS)
                .show_value(false)
                .custom_formatter(|v, _| format_ts(v as i64, "%d/%m/%Y")),
        );
        ui.label(RichText::new(format_ts(self.settings.start_ts, "%d/%m/%Y %H:%M:%S")).size(11.0));
        if start.changed() {
            action = ControlPanelAction::SelectionChanged;
        }

        ui.add_space(5.0);

        if self.settings.start_ts == WINDOW_END_TS {
            // Range collapses to a single instant at the window end.
            ui.label(
                RichText::new("Move start date to an earlier date to choose a range")
                    .size(11.0)
                    .color(Color32::from_rgb(243, 156, 18)),
            );
            if self.settings.end_ts != self.settings.start_ts {
                self.settings.end_ts = self.settings.start_ts;
                action = ControlPanelAction::SelectionChanged;
            }
        } else {
            if self.settings.end_ts < self.settings.start_ts {
                self.settings.end_ts = self.settings.start_ts;
                action = ControlPanelAction::SelectionChanged;
            }
            ui.label("End date:");
            let end = ui.add(
                Slider::new(
                    &mut self.settings.end_ts,
                    self.settings.start_ts..=WINDOW_END_TS,
                )
                .show_value(false)
                .custom_formatter(|v, _| format_ts(v as i64, "%d/%m/%Y")),
            );
            ui.label(
                RichText::new(format_ts(self.settings.end_ts, "%d/%m/%Y %H:%M:%S")).size(11.0),
            );
            if end.changed() {
                action = ControlPanelAction::SelectionChanged;
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Chart Section =====
        ui.label(RichText::new("📈 Show graph").size(14.0).strong());
        ui.add_space(5.0);

        ComboBox::from_id_salt("chart_kind")
            .width(250.0)
            .selected_text(self.settings.chart.label())
            .show_ui(ui, |ui| {
                for kind in ChartKind::ALL {
                    if ui
                        .selectable_label(self.settings.chart == kind, kind.label())
                        .clicked()
                        && self.settings.chart != kind
                    {
                        self.settings.chart = kind;
                        action = ControlPanelAction::SelectionChanged;
                    }
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.dataset_rows.is_some(), |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export PNG").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportPng;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        ui.horizontal(|ui| {
            if self.loading {
                ui.spinner();
            }
            let status_color = if self.status.contains("Error") {
                Color32::from_rgb(220, 53, 69)
            } else if self.dataset_rows.is_some() {
                Color32::from_rgb(40, 167, 69)
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(&self.status).size(11.0).color(status_color));
        });

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlPanelAction {
    None,
    SelectionChanged,
    ExportPng,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_span_the_window() {
        let s = UserSettings::default();
        assert_eq!(s.start_ts, WINDOW_START_TS);
        assert_eq!(s.end_ts, WINDOW_END_TS);
    }

    #[test]
    fn new_panel_starts_idle() {
        let panel = ControlPanel::new(UserSettings::default());
        assert!(!panel.loading);
        assert_eq!(panel.dataset_rows, None);
    }

    #[test]
    fn clamp_repairs_out_of_window_settings() {
        let mut s = UserSettings {
            start_ts: 0,
            end_ts: i64::MAX,
            chart: ChartKind::Tips,
        };
        s.clamp_to_window();
        assert_eq!(s.start_ts, WINDOW_START_TS);
        assert_eq!(s.end_ts, WINDOW_END_TS);

        let mut inverted = UserSettings {
            start_ts: WINDOW_END_TS,
            end_ts: WINDOW_START_TS,
            chart: ChartKind::Tips,
        };
        inverted.clamp_to_window();
        assert_eq!(inverted.end_ts, WINDOW_END_TS);
    }
}
