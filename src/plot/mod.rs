//! Line plotter for drawing-robot lines files.
//!
//! Loading and rendering are separate: [`load_series`] turns a lines file into
//! a [`SegmentSeries`], and a [`PlotBackend`] displays it. The window backend
//! lives behind the `viewer` feature.
//!
//! ```rust,no_run
//! use armscope::plot;
//!
//! # fn main() -> armscope::Result<()> {
//! let series = plot::load_series("sample_lines.json", "contour")?;
//! println!("Loaded {} lines", series.len());
//! # Ok(())
//! # }
//! ```

mod lines;
#[cfg(feature = "viewer")]
mod viewer;

pub use lines::{load_segments, load_series, parse_segments};
#[cfg(feature = "viewer")]
pub use viewer::WindowBackend;

use tracing::info;

use crate::Result;
use crate::config::PlotConfig;
use crate::types::SegmentSeries;

/// Something that can display a set of segments.
pub trait PlotBackend {
    fn render(&mut self, series: &SegmentSeries) -> Result<()>;
}

/// Load the lines file named by `config` and hand it to `backend`.
///
/// Returns the series that was rendered.
pub fn plot_lines<B: PlotBackend>(config: &PlotConfig, backend: &mut B) -> Result<SegmentSeries> {
    let series = load_series(&config.path, &config.key)?;
    info!("Rendering {} segments in {:?} mode", series.len(), config.mode);
    backend.render(&series)?;
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{RecordingBackend, write_lines_file};

    #[test]
    fn plot_lines_hands_sequences_to_backend() {
        let file = write_lines_file(r#"{"contour": [{"p1":[0,0],"p2":[1,1]}]}"#);
        let config = PlotConfig { path: file.path().to_path_buf(), ..PlotConfig::default() };

        let mut backend = RecordingBackend::default();
        plot_lines(&config, &mut backend).unwrap();

        assert_eq!(backend.rendered.len(), 1);
        let series = &backend.rendered[0];
        assert_eq!(series.x1, vec![0.0]);
        assert_eq!(series.y1, vec![0.0]);
        assert_eq!(series.x2, vec![1.0]);
        assert_eq!(series.y2, vec![1.0]);
    }

    #[test]
    fn plot_lines_does_not_render_on_missing_key() {
        let file = write_lines_file(r#"{"lines": [{"p1":[0,0],"p2":[1,1]}]}"#);
        let config = PlotConfig { path: file.path().to_path_buf(), ..PlotConfig::default() };

        let mut backend = RecordingBackend::default();
        assert!(plot_lines(&config, &mut backend).is_err());
        assert!(backend.rendered.is_empty());
    }
}
