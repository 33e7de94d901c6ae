//! Line segments as stored in drawing-robot lines files

use serde::{Deserialize, Serialize};

/// A straight line between two points, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub p1: [f64; 2],
    pub p2: [f64; 2],
}

impl Segment {
    pub fn new(p1: [f64; 2], p2: [f64; 2]) -> Self {
        Self { p1, p2 }
    }
}

/// Four parallel coordinate sequences built from a list of segments.
///
/// Index `i` of every sequence belongs to segment `i` of the input, so all
/// four always have the same length.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SegmentSeries {
    pub x1: Vec<f64>,
    pub y1: Vec<f64>,
    pub x2: Vec<f64>,
    pub y2: Vec<f64>,
}

impl SegmentSeries {
    /// Split segments into start/end coordinate sequences, preserving order.
    pub fn from_segments(segments: &[Segment]) -> Self {
        let mut series = Self {
            x1: Vec::with_capacity(segments.len()),
            y1: Vec::with_capacity(segments.len()),
            x2: Vec::with_capacity(segments.len()),
            y2: Vec::with_capacity(segments.len()),
        };

        for segment in segments {
            series.x1.push(segment.p1[0]);
            series.y1.push(segment.p1[1]);
            series.x2.push(segment.p2[0]);
            series.y2.push(segment.p2[1]);
        }

        series
    }

    pub fn len(&self) -> usize {
        self.x1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x1.is_empty()
    }

    /// Start points as `[x, y]` pairs
    pub fn start_points(&self) -> Vec<[f64; 2]> {
        self.x1.iter().zip(&self.y1).map(|(&x, &y)| [x, y]).collect()
    }

    /// End points as `[x, y]` pairs
    pub fn end_points(&self) -> Vec<[f64; 2]> {
        self.x2.iter().zip(&self.y2).map(|(&x, &y)| [x, y]).collect()
    }

    /// Iterate the series back as segments
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        (0..self.len())
            .map(|i| Segment::new([self.x1[i], self.y1[i]], [self.x2[i], self.y2[i]]))
    }

    /// Bounding box `(min, max)` over all endpoints, `None` when empty
    pub fn bounds(&self) -> Option<([f64; 2], [f64; 2])> {
        if self.is_empty() {
            return None;
        }

        let xs = self.x1.iter().chain(&self.x2);
        let ys = self.y1.iter().chain(&self.y2);

        let (min_x, max_x) = xs.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
        let (min_y, max_y) = ys.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

        Some(([min_x, min_y], [max_x, max_y]))
    }
}
