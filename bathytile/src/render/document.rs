//! Tile document compositing.
//!
//! A [`TileDocument`] is the vector markup document handed to the
//! rasterizer: an ordered sequence of path fragments plus the canvas
//! viewport. Document order equals input order, so later fragments paint
//! over earlier ones (painter's algorithm). The optional corner-padding
//! fragment is forced to an invisible style here, whatever styling it
//! arrived with.

use super::path::{PathElement, PathFragment, PathStyle};
use crate::config::RenderSpec;
use std::fmt::Write;

/// An assembled per-tile vector document sized to the canvas.
#[derive(Debug, Clone)]
pub struct TileDocument {
    width: u32,
    height: u32,
    fragments: Vec<PathFragment>,
}

impl TileDocument {
    /// Creates an empty document with the canvas viewport.
    pub fn new(spec: &RenderSpec) -> Self {
        Self {
            width: spec.canvas_width,
            height: spec.canvas_height,
            fragments: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn fragments(&self) -> &[PathFragment] {
        &self.fragments
    }

    /// Appends a fragment; paint order follows append order.
    pub fn push(&mut self, fragment: PathFragment) {
        self.fragments.push(fragment);
    }

    /// Appends the corner-padding fragment with its style forced invisible.
    ///
    /// The padding geometry participates in the document (and thus in any
    /// consumer that derives bounds from it) but must never contribute
    /// pixels.
    pub fn push_padding(&mut self, mut fragment: PathFragment) {
        fragment.style = PathStyle::INVISIBLE;
        self.fragments.push(fragment);
    }

    /// Serializes the document as SVG markup.
    ///
    /// Styling mirrors the rasterizer's behavior: per-fragment fill and
    /// stroke, one-pixel stroke width, `crispEdges` shape rendering.
    pub fn to_svg(&self) -> String {
        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\">",
            self.width, self.height
        );
        for fragment in &self.fragments {
            let _ = write!(
                svg,
                "<path style=\"fill:{};stroke:{};stroke-width:{}px;shape-rendering:crispEdges\" d=\"{}\"/>",
                fragment.style.fill.to_css(),
                fragment.style.stroke.to_css(),
                fragment.style.stroke_width,
                path_data(&fragment.elements)
            );
        }
        svg.push_str("</svg>");
        svg
    }
}

/// SVG path data for a fragment's elements.
///
/// Rings close with `Z`; circles are drawn as two half-circle arcs.
fn path_data(elements: &[PathElement]) -> String {
    let mut d = String::new();
    for element in elements {
        match element {
            PathElement::Ring(points) => {
                for (i, (x, y)) in points.iter().enumerate() {
                    let command = if i == 0 { 'M' } else { 'L' };
                    let _ = write!(d, "{}{},{}", command, x, y);
                }
                if !points.is_empty() {
                    d.push('Z');
                }
            }
            PathElement::Circle { cx, cy, r } => {
                let _ = write!(
                    d,
                    "M{},{}A{},{} 0 1,1 {},{}A{},{} 0 1,1 {},{}Z",
                    cx + r,
                    cy,
                    r,
                    r,
                    cx - r,
                    cy,
                    r,
                    r,
                    cx + r,
                    cy
                );
            }
        }
    }
    d
}
