//! Tipboard Main Application
//! Main window wiring the control panel, the dataset session cache, and the
//! chart viewer together.

use egui::SidePanel;
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

use crate::charts::{build_figures, ChartError, StaticChartRenderer};
use crate::data::{
    filter_range, format_ts, with_time_order, DataLoader, LoaderError, TIME_ORDER_COL,
    TIPS_CSV_URL,
};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, UserSettings};

const EXPORT_WIDTH: u32 = 1000;
const EXPORT_HEIGHT_PER_FIGURE: u32 = 600;

/// Dataset load result from the background thread.
enum LoadResult {
    Complete { df: DataFrame },
    Error(String),
}

/// Main application window.
pub struct TipboardApp {
    loader: DataLoader,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async dataset loading (once per session)
    load_rx: Option<Receiver<LoadResult>>,

    // Set whenever the selection changes; the view is rebuilt on the next frame.
    view_stale: bool,
}

impl TipboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut settings: UserSettings = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        settings.clamp_to_window();

        let mut app = Self {
            loader: DataLoader::new(),
            control_panel: ControlPanel::new(settings),
            chart_viewer: ChartViewer::new(),
            load_rx: None,
            view_stale: true,
        };
        app.start_load();
        app
    }

    /// Fetch and prepare the dataset in a background thread. Runs once; a
    /// failure is fatal for the session and only surfaced in the status area.
    fn start_load(&mut self) {
        self.control_panel.loading = true;
        self.control_panel.set_status("Loading tips dataset...");

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            let result = DataLoader::fetch_csv(TIPS_CSV_URL).and_then(|df| {
                let mut rng = order_time_rng();
                with_time_order(df, &mut rng).map_err(LoaderError::from)
            });

            match result {
                Ok(df) => {
                    let _ = tx.send(LoadResult::Complete { df });
                }
                Err(e) => {
                    log::error!("dataset load failed: {e}");
                    let _ = tx.send(LoadResult::Error(e.to_string()));
                }
            }
        });
    }

    /// Check for dataset loading results.
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Complete { df } => {
                        self.loader.set_dataframe(df);
                        let rows = self.loader.row_count();
                        self.control_panel.dataset_rows = Some(rows);
                        self.control_panel
                            .set_status(&format!("Loaded {rows} rows"));
                        self.control_panel.loading = false;
                        self.view_stale = true;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(error) => {
                        self.control_panel.set_status(&format!("Error: {error}"));
                        self.control_panel.loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    /// Filter the cached dataset to the selected range and rebuild the figures
    /// for the selected chart. The dataset itself is never re-fetched.
    fn refresh_view(&mut self) {
        self.view_stale = false;

        let Some(df) = self.loader.dataframe() else {
            return;
        };
        let settings = self.control_panel.settings.clone();

        let figures = filter_range(df, TIME_ORDER_COL, settings.start_ts, settings.end_ts)
            .map_err(ChartError::from)
            .and_then(|filtered| {
                log::debug!(
                    "{} of {} rows in range [{}, {}]",
                    filtered.height(),
                    df.height(),
                    settings.start_ts,
                    settings.end_ts
                );
                build_figures(&filtered, settings.chart)
            });

        match figures {
            Ok(figures) => {
                let heading = format!(
                    "Total bill distribution from {} to {}",
                    format_ts(settings.start_ts, "%d/%m/%Y"),
                    format_ts(settings.end_ts, "%d/%m/%Y")
                );
                self.chart_viewer
                    .set_view(heading, settings.chart.label().to_string(), figures);
            }
            Err(e) => {
                log::error!("chart build failed: {e}");
                self.chart_viewer.clear();
                self.control_panel.set_status(&format!("Error: {e}"));
            }
        }
    }

    /// Render the current figures with the static backend and save as PNG.
    fn handle_export_png(&mut self) {
        let figures = self.chart_viewer.figures();
        if figures.is_empty() {
            self.control_panel.set_status("No chart to export");
            return;
        }

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("tipboard_chart.png")
            .save_file()
        else {
            return; // User cancelled
        };

        let result = StaticChartRenderer::render_figures_to_png(
            figures,
            EXPORT_WIDTH,
            EXPORT_HEIGHT_PER_FIGURE,
        )
        .and_then(|bytes| std::fs::write(&path, bytes).map_err(Into::into));

        match result {
            Ok(()) => {
                log::info!("chart exported to {}", path.display());
                self.control_panel
                    .set_status(&format!("Exported {}", path.display()));
            }
            Err(e) => {
                log::error!("export failed: {e}");
                self.control_panel.set_status(&format!("Error: {e}"));
            }
        }
    }
}

impl eframe::App for TipboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.control_panel.loading {
            ctx.request_repaint();
        }

        // Left panel - controls
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::SelectionChanged => {
                            self.view_stale = true;
                        }
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        if self.view_stale && !self.control_panel.loading {
            self.refresh_view();
        }

        // Central panel - chart display
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.control_panel.settings);
    }
}

/// RNG used for the one-time timestamp synthesis. Seedable through the
/// TIPBOARD_SEED environment variable for reproducible sessions.
fn order_time_rng() -> StdRng {
    match std::env::var("TIPBOARD_SEED")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
    {
        Some(seed) => {
            log::info!("seeding time_order synthesis with {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    }
}
