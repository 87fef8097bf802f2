//! PNG output: rasterise widget SVG with resvg.

use glance_core::WidgetError;
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("Failed to parse SVG: {0}")]
    Parse(#[from] resvg::usvg::Error),

    #[error("Invalid output size {0}x{1}")]
    Size(u32, u32),

    #[error("Failed to encode PNG: {0}")]
    Encode(String),
}

impl From<RasterError> for WidgetError {
    fn from(e: RasterError) -> Self {
        WidgetError::Render(e.to_string())
    }
}

/// Render an SVG document to PNG bytes at `scale` (2.0 for a retina-style
/// widget). System fonts are loaded for text; with no fonts installed the text
/// is simply not drawn.
pub fn rasterize(svg: &str, scale: f32) -> Result<Vec<u8>, RasterError> {
    let mut options = Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = Tree::from_str(svg, &options)?;

    let size = tree.size();
    let width = (size.width() * scale).ceil() as u32;
    let height = (size.height() * scale).ceil() as u32;
    let mut pixmap = Pixmap::new(width, height).ok_or(RasterError::Size(width, height))?;

    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());
    tracing::debug!("Rasterized widget at {}x{}", width, height);

    pixmap
        .encode_png()
        .map_err(|e| RasterError::Encode(e.to_string()))
}
