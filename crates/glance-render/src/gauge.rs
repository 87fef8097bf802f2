//! Circular percentage gauge built from one dot per degree.

use crate::color::Color;
use crate::geometry::{Drawing, FontWeight, Point, Rect, Shape};

#[derive(Debug, Clone, Copy)]
pub struct GaugeStyle {
    pub size: f64,
    pub radius: f64,
    pub ring_width: f64,
    pub text_size: f64,
    /// Vertical centre of the percentage label.
    pub text_center_y: f64,
    pub track: Color,
    pub fill: Color,
    pub text: Color,
}

impl GaugeStyle {
    /// 260x260 canvas, radius 100, 30px ring, 50px label.
    pub fn standard(track: Color, fill: Color, text: Color) -> Self {
        Self {
            size: 260.0,
            radius: 100.0,
            ring_width: 30.0,
            text_size: 50.0,
            text_center_y: 124.0,
            track,
            fill,
            text,
        }
    }
}

/// Number of one-degree dots drawn for `percentage` (clamped to 0..=100).
pub fn sweep_degrees(percentage: f64) -> u32 {
    (percentage.clamp(0.0, 100.0) * 36.0 / 10.0).floor() as u32
}

/// Centre of the dot at `degrees` clockwise from twelve o'clock.
pub fn dot_center(center: Point, radius: f64, degrees: u32) -> Point {
    let theta = f64::from(degrees).to_radians();
    Point::new(center.x + radius * theta.sin(), center.y - radius * theta.cos())
}

/// Background ring, one filled dot per degree of the sweep, centred label.
///
/// Out-of-range percentages are clamped to 0..=100, the label included.
pub fn gauge(percentage: f64, style: &GaugeStyle) -> Drawing {
    let percentage = percentage.clamp(0.0, 100.0);
    let mut drawing = Drawing::new(style.size, style.size);
    let center = Point::new(style.size / 2.0, style.size / 2.0);

    drawing.push(Shape::StrokeCircle {
        center,
        radius: style.radius,
        color: style.track,
        width: style.ring_width,
    });

    for degrees in 0..sweep_degrees(percentage) {
        drawing.push(Shape::FillCircle {
            center: dot_center(center, style.radius, degrees),
            radius: style.ring_width / 2.0,
            color: style.fill,
        });
    }

    drawing.push(Shape::Text {
        text: format!("{}%", percentage.round() as i64),
        rect: Rect::new(
            0.0,
            style.text_center_y - style.text_size / 2.0,
            style.size,
            style.text_size,
        ),
        size: style.text_size,
        weight: FontWeight::Heavy,
        color: style.text,
    });

    drawing
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> GaugeStyle {
        GaugeStyle::standard(Color::BLACK, Color::WHITE, Color::RED)
    }

    #[test]
    fn test_zero_percent_draws_only_ring() {
        let drawing = gauge(0.0, &style());
        assert_eq!(drawing.filled_circles().count(), 0);
        assert!(matches!(drawing.shapes[0], Shape::StrokeCircle { .. }));
        assert_eq!(drawing.texts().collect::<Vec<_>>(), vec!["0%"]);
    }

    #[test]
    fn test_full_gauge_draws_every_degree() {
        let drawing = gauge(100.0, &style());
        assert_eq!(drawing.filled_circles().count(), 360);
    }

    #[test]
    fn test_partial_sweep() {
        assert_eq!(sweep_degrees(42.0), 151);
        let drawing = gauge(42.0, &style());
        assert_eq!(drawing.filled_circles().count(), 151);
        assert_eq!(drawing.texts().collect::<Vec<_>>(), vec!["42%"]);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(gauge(150.0, &style()).filled_circles().count(), 360);
        assert_eq!(gauge(-20.0, &style()).filled_circles().count(), 0);
        assert_eq!(gauge(150.0, &style()).texts().next(), Some("100%"));
    }

    #[test]
    fn test_dots_start_at_twelve_and_run_clockwise() {
        let c = Point::new(130.0, 130.0);
        let top = dot_center(c, 100.0, 0);
        assert!((top.x - 130.0).abs() < 1e-9);
        assert!((top.y - 30.0).abs() < 1e-9);

        let right = dot_center(c, 100.0, 90);
        assert!((right.x - 230.0).abs() < 1e-9);
        assert!((right.y - 130.0).abs() < 1e-9);
    }

    #[test]
    fn test_dots_sit_on_the_ring() {
        let drawing = gauge(73.0, &style());
        for (p, r) in drawing.filled_circles() {
            let d = ((p.x - 130.0).powi(2) + (p.y - 130.0).powi(2)).sqrt();
            assert!((d - 100.0).abs() < 1e-9);
            assert_eq!(r, 15.0);
        }
    }
}
