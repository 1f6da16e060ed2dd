mod compositor;
mod font;
mod overlays;
mod raster;

pub use compositor::{Compositor, RenderError};
pub use font::{BuiltinFont, FontError, FontFace, FontSource, GLYPH_HEIGHT, GLYPH_WIDTH};
