use crate::fit::TextFitter;
use crate::surface::DrawingSurface;
use narwhal_core::geom::{Point, point};
use narwhal_core::{GraphModel, VertexHandle};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LabelStyle {
    pub font_family: String,
    pub fill: String,
    /// Caption for vertices without a usable `name` property.
    pub fallback_name: String,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            fill: "rgba(255,255,255,0.5)".to_string(),
            fallback_name: "Unknown".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedLabel {
    #[serde(skip)]
    pub vertex: VertexHandle,
    pub text: String,
    /// Baseline start of the text.
    pub origin: Point,
    pub font_size: f64,
    pub width: f64,
}

/// Draws every vertex caption, sized to fill the vertex's outline bounds.
///
/// The caption is centered horizontally; its baseline sits half a font size below the box
/// center. Vertices without an outline get no caption.
pub fn draw_labels<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    model: &GraphModel,
    fitter: &TextFitter,
    style: &LabelStyle,
) -> Vec<PlacedLabel> {
    let mut placed = Vec::with_capacity(model.vertex_count());
    for (handle, vertex) in model.vertices() {
        let Some(bounds) = vertex.bounds() else {
            continue;
        };
        let text = vertex.display_name(&style.fallback_name);
        let box_size = bounds.size();

        let fitted = fitter.fit(
            |font_size, t| {
                surface.set_font(font_size, &style.font_family);
                surface.measure_text(t)
            },
            box_size,
            &text,
        );

        surface.set_font(fitted.height, &style.font_family);
        let origin = point(
            bounds.min.x + box_size.width / 2.0 - fitted.width / 2.0,
            bounds.min.y + fitted.height / 2.0 + box_size.height / 2.0,
        );
        surface.fill_text(&text, origin, &style.fill);

        placed.push(PlacedLabel {
            vertex: handle,
            text,
            origin,
            font_size: fitted.height,
            width: fitted.width,
        });
    }
    placed
}
