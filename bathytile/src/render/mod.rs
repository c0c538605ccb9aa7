//! Feature rendering and tile compositing.
//!
//! [`render_feature`] turns one feature, its classified color and the tile's
//! projection into a styled [`PathFragment`]; [`TileDocument`] assembles the
//! fragments, in paint order, into the vector document the rasterizer
//! consumes.

mod document;
mod path;

pub use document::TileDocument;
pub use path::{render_feature, PathElement, PathFragment, PathStyle, POINT_RADIUS, STROKE_WIDTH};
