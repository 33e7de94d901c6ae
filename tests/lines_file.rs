//! End-to-end tests for loading lines files through the public API

use std::io::Write;

use armscope::plot::{self, PlotBackend};
use armscope::{Armscope, PlotConfig, PlotMode, ScopeError, SegmentSeries};
use tempfile::NamedTempFile;

#[derive(Default)]
struct CountingBackend {
    calls: usize,
    last: Option<SegmentSeries>,
}

impl PlotBackend for CountingBackend {
    fn render(&mut self, series: &SegmentSeries) -> armscope::Result<()> {
        self.calls += 1;
        self.last = Some(series.clone());
        Ok(())
    }
}

fn lines_file(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(json.as_bytes()).expect("write lines file");
    file
}

#[test]
fn single_segment_reaches_the_backend() {
    let file = lines_file(r#"{"contour": [{"p1": [0, 0], "p2": [1, 1]}]}"#);
    let config = PlotConfig { path: file.path().to_path_buf(), ..PlotConfig::default() };

    let mut backend = CountingBackend::default();
    let series = plot::plot_lines(&config, &mut backend).unwrap();

    assert_eq!(series.len(), 1);
    assert_eq!(backend.calls, 1);

    let rendered = backend.last.unwrap();
    assert_eq!(rendered.x1, vec![0.0]);
    assert_eq!(rendered.y1, vec![0.0]);
    assert_eq!(rendered.x2, vec![1.0]);
    assert_eq!(rendered.y2, vec![1.0]);
}

#[test]
fn sequences_keep_file_order() {
    let file = lines_file(
        r#"{
            "contour": [
                {"p1": [0.0, 0.5], "p2": [1.0, 1.5]},
                {"p1": [2.0, 2.5], "p2": [3.0, 3.5]},
                {"p1": [-1.0, -0.5], "p2": [4.25, 0.0]}
            ],
            "holes": []
        }"#,
    );
    let config = PlotConfig { path: file.path().to_path_buf(), ..PlotConfig::default() };

    let series = Armscope::load_lines(&config).unwrap();

    assert_eq!(series.x1, vec![0.0, 2.0, -1.0]);
    assert_eq!(series.y1, vec![0.5, 2.5, -0.5]);
    assert_eq!(series.x2, vec![1.0, 3.0, 4.25]);
    assert_eq!(series.y2, vec![1.5, 3.5, 0.0]);
}

#[test]
fn other_keys_can_be_selected() {
    let file = lines_file(
        r#"{"contour": [], "infill": [{"p1": [5, 6], "p2": [7, 8]}]}"#,
    );
    let config = PlotConfig {
        path: file.path().to_path_buf(),
        key: "infill".to_string(),
        mode: PlotMode::Segments,
        ..PlotConfig::default()
    };

    let series = Armscope::load_lines(&config).unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series.start_points(), vec![[5.0, 6.0]]);
    assert_eq!(series.end_points(), vec![[7.0, 8.0]]);
}

#[test]
fn empty_contour_loads_zero_lines() {
    let file = lines_file(r#"{"contour": []}"#);
    let config = PlotConfig { path: file.path().to_path_buf(), ..PlotConfig::default() };

    let series = Armscope::load_lines(&config).unwrap();
    assert!(series.is_empty());
}

#[test]
fn missing_key_is_reported_and_nothing_renders() {
    let file = lines_file(r#"{"lines": [{"p1": [0, 0], "p2": [1, 1]}]}"#);
    let config = PlotConfig { path: file.path().to_path_buf(), ..PlotConfig::default() };

    let mut backend = CountingBackend::default();
    let err = plot::plot_lines(&config, &mut backend).unwrap_err();

    assert!(matches!(err, ScopeError::FieldNotFound { .. }), "got {:?}", err);
    assert_eq!(backend.calls, 0);
}

#[test]
fn missing_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample_lines.json");
    let config = PlotConfig { path: path.clone(), ..PlotConfig::default() };

    let err = Armscope::load_lines(&config).unwrap_err();
    match &err {
        ScopeError::File { path: reported, .. } => assert_eq!(reported, &path),
        other => panic!("expected file error, got {:?}", other),
    }
    assert!(!err.is_retryable());
}

#[test]
fn invalid_json_is_a_parse_error() {
    let file = lines_file(r#"{"contour": [{"p1": [0, 0], "p2": [1, 1]}"#);
    let config = PlotConfig { path: file.path().to_path_buf(), ..PlotConfig::default() };

    let err = Armscope::load_lines(&config).unwrap_err();
    assert!(matches!(err, ScopeError::Parse { .. }), "got {:?}", err);
}
