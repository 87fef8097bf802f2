//! Smoothed area chart of a day's hourly levels with a "now" indicator.

use crate::color::Color;
use crate::geometry::{Drawing, Path, Point, Shape};

pub const CHART_WIDTH: f64 = 420.0;
pub const CHART_HEIGHT: f64 = 160.0;

/// Gap kept under the curve so a zero level still shows as a baseline.
const BASELINE_GAP: f64 = 2.0;

#[derive(Debug, Clone, Copy)]
pub struct ChartStyle {
    pub width: f64,
    pub height: f64,
    /// Lowest value the top of the chart may represent.
    pub ceiling: f64,
    pub fill: Color,
    pub indicator: Color,
    pub indicator_width: f64,
}

impl ChartStyle {
    /// Nominal pollen chart: 420x160, ceiling 5, translucent grey fill.
    pub fn pollen(indicator: Color) -> Self {
        Self {
            width: CHART_WIDTH,
            height: CHART_HEIGHT,
            ceiling: 5.0,
            fill: Color::hex("888888").with_alpha(0.5),
            indicator,
            indicator_width: 2.0,
        }
    }
}

/// Repeat each hourly value three times so the smoothed line steps at each
/// hour instead of sloping across it.
pub fn stepped(levels: &[u8]) -> Vec<f64> {
    levels
        .iter()
        .flat_map(|&l| std::iter::repeat(f64::from(l)).take(3))
        .collect()
}

/// Map samples onto the chart area.
///
/// A zero range (every sample equal to the ceiling) draws a flat line at
/// mid-height. A single sample is stretched across the full width.
pub fn chart_points(samples: &[f64], style: &ChartStyle) -> Vec<Point> {
    let (w, h) = (style.width, style.height);
    let Some(min_value) = samples.iter().copied().reduce(f64::min) else {
        return Vec::new();
    };
    let max_value = samples.iter().copied().fold(style.ceiling, f64::max);
    let range = max_value - min_value;

    let y_for = |value: f64| {
        let y = if range.abs() < f64::EPSILON {
            h / 2.0
        } else {
            h - (value - min_value) / range * h
        };
        y.min(h - BASELINE_GAP)
    };

    if samples.len() == 1 {
        let y = y_for(samples[0]);
        return vec![Point::new(0.0, y), Point::new(w, y)];
    }

    let step = w / (samples.len() - 1) as f64;
    samples
        .iter()
        .enumerate()
        .map(|(i, &v)| Point::new(step * i as f64, y_for(v)))
        .collect()
}

/// Closed area under a curve through `points`, smoothed by inserting the
/// midpoint of each pair and two quadratic segments whose control points sit
/// halfway to the midpoint at each end's height.
pub fn smooth_area(points: &[Point], width: f64, height: f64) -> Path {
    let mut path = Path::new();
    let Some(first) = points.first() else {
        return path;
    };

    path.move_to(Point::new(0.0, height)).line_to(*first);

    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let x_avg = (a.x + b.x) / 2.0;
        let avg = Point::new(x_avg, (a.y + b.y) / 2.0);
        let cp1 = Point::new((x_avg + a.x) / 2.0, a.y);
        let cp2 = Point::new((x_avg + b.x) / 2.0, b.y);
        path.quad_to(cp1, avg).quad_to(cp2, b);
    }

    path.line_to(Point::new(width, height)).close();
    path
}

/// x position of the time indicator, truncated to a whole pixel.
pub fn indicator_x(width: f64, hours_past_midnight: f64) -> f64 {
    (width * hours_past_midnight.clamp(0.0, 24.0) / 24.0).floor()
}

/// Full chart: filled area plus the vertical "now" line.
pub fn line_chart(samples: &[f64], style: &ChartStyle, hours_past_midnight: f64) -> Drawing {
    let mut drawing = Drawing::new(style.width, style.height);

    let points = chart_points(samples, style);
    if !points.is_empty() {
        drawing.push(Shape::FillPath {
            path: smooth_area(&points, style.width, style.height),
            color: style.fill,
        });
    }

    let x = indicator_x(style.width, hours_past_midnight);
    let mut indicator = Path::new();
    indicator
        .move_to(Point::new(x, 0.0))
        .line_to(Point::new(x, style.height));
    drawing.push(Shape::StrokePath {
        path: indicator,
        color: style.indicator,
        width: style.indicator_width,
    });

    drawing
}
