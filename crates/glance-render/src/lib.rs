//! Drawing for the Glance widgets.
//!
//! Geometry (chart, gauge) is computed as plain [`Drawing`] values, composed
//! into a [`WidgetView`], serialised to SVG and optionally rasterised to PNG.

pub mod chart;
pub mod color;
pub mod gauge;
pub mod geometry;
pub mod raster;
pub mod svg;
pub mod widget;

pub use chart::{line_chart, stepped, ChartStyle};
pub use color::{Color, DynamicColor};
pub use gauge::{gauge, GaugeStyle};
pub use geometry::{Drawing, FontWeight, Path, PathCommand, Point, Rect, Shape};
pub use raster::{rasterize, RasterError};
pub use svg::{drawing_svg, widget_svg};
pub use widget::{
    Background, Icon, IconView, Symbol, TextLine, WidgetBody, WidgetContent, WidgetView,
};

/// Output encodings for a finished widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    /// Pick the format from a file extension, defaulting to PNG.
    pub fn from_path(path: &std::path::Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => OutputFormat::Svg,
            _ => OutputFormat::Png,
        }
    }
}

/// Encode a widget view in the requested format.
pub fn encode(view: &WidgetView, format: OutputFormat, scale: f32) -> Result<Vec<u8>, RasterError> {
    let svg = widget_svg(view);
    match format {
        OutputFormat::Svg => Ok(svg.into_bytes()),
        OutputFormat::Png => rasterize(&svg, scale),
    }
}
