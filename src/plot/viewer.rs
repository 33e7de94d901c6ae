//! Interactive plot window

use eframe::egui;
use egui_plot::{Legend, Line, Plot};
use tracing::{debug, info};

use super::PlotBackend;
use crate::config::PlotMode;
use crate::types::SegmentSeries;
use crate::{Result, ScopeError};

/// Renders segments in a native window and blocks until it is closed.
pub struct WindowBackend {
    title: String,
    mode: PlotMode,
}

impl WindowBackend {
    pub fn new(title: impl Into<String>, mode: PlotMode) -> Self {
        Self { title: title.into(), mode }
    }
}

impl PlotBackend for WindowBackend {
    fn render(&mut self, series: &SegmentSeries) -> Result<()> {
        info!("Opening plot window '{}' ({} segments, {:?})", self.title, series.len(), self.mode);

        let app = LinesApp::new(series, self.mode);
        let options = eframe::NativeOptions::default();

        eframe::run_native(&self.title, options, Box::new(move |_cc| Ok(Box::new(app))))
            .map_err(|e| ScopeError::Render { reason: e.to_string() })?;

        debug!("Plot window closed");
        Ok(())
    }
}

/// Point lists are built once; egui redraws every frame.
struct LinesApp {
    mode: PlotMode,
    starts: Vec<[f64; 2]>,
    ends: Vec<[f64; 2]>,
    bounds: Option<([f64; 2], [f64; 2])>,
}

impl LinesApp {
    fn new(series: &SegmentSeries, mode: PlotMode) -> Self {
        Self {
            mode,
            starts: series.start_points(),
            ends: series.end_points(),
            bounds: series.bounds(),
        }
    }
}

impl eframe::App for LinesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let mut plot = Plot::new("lines").legend(Legend::default()).data_aspect(1.0);
            // Initial view covers every endpoint
            if let Some((min, max)) = self.bounds {
                plot = plot.include_x(min[0]).include_x(max[0]).include_y(min[1]).include_y(max[1]);
            }

            plot.show(ui, |plot_ui| {
                match self.mode {
                    PlotMode::Series => {
                        plot_ui.line(Line::new("p1", self.starts.clone()));
                        plot_ui.line(Line::new("p2", self.ends.clone()));
                    }
                    PlotMode::Segments => {
                        for (start, end) in self.starts.iter().zip(&self.ends) {
                            plot_ui.line(Line::new("segments", vec![*start, *end]));
                        }
                    }
                }
            });
        });
    }
}
