//! Static SVG backend for [`DrawingSurface`].
//!
//! Every filled or stroked path becomes a `<path>`, every `fill_text` a `<text>`. Coordinates are
//! written with at most three fractional digits.

use crate::surface::DrawingSurface;
use crate::text::{DeterministicTextMeasurer, TextMeasurer, TextStyle};
use narwhal_core::geom::{Bounds, Point};
use std::fmt::Write as _;

pub struct SvgSurface {
    view_box: Bounds,
    background: Option<String>,
    body: String,
    path: String,
    font_size: f64,
    font_family: String,
    measurer: Box<dyn TextMeasurer>,
}

impl std::fmt::Debug for SvgSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvgSurface")
            .field("view_box", &self.view_box)
            .field("background", &self.background)
            .field("body_len", &self.body.len())
            .finish()
    }
}

impl SvgSurface {
    pub fn new(view_box: Bounds) -> Self {
        Self::with_measurer(view_box, Box::new(DeterministicTextMeasurer::default()))
    }

    pub fn with_measurer(view_box: Bounds, measurer: Box<dyn TextMeasurer>) -> Self {
        Self {
            view_box,
            background: None,
            body: String::new(),
            path: String::new(),
            font_size: 10.0,
            font_family: "sans-serif".to_string(),
            measurer,
        }
    }

    pub fn with_background(mut self, paint: impl Into<String>) -> Self {
        self.background = Some(paint.into());
        self
    }

    pub fn view_box(&self) -> Bounds {
        self.view_box
    }

    /// Discards everything drawn so far; the next frame starts from the background.
    pub fn clear(&mut self) {
        self.body.clear();
        self.path.clear();
    }

    /// Closes the document.
    pub fn finish(&self) -> String {
        let vb = &self.view_box;
        let width = vb.max.x - vb.min.x;
        let height = vb.max.y - vb.min.y;

        let mut out = String::with_capacity(self.body.len() + 256);
        out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox=""#);
        fmt_path_into(&mut out, vb.min.x);
        out.push(' ');
        fmt_path_into(&mut out, vb.min.y);
        out.push(' ');
        fmt_path_into(&mut out, width);
        out.push(' ');
        fmt_path_into(&mut out, height);
        out.push_str(r#"" width=""#);
        fmt_path_into(&mut out, width);
        out.push_str(r#"" height=""#);
        fmt_path_into(&mut out, height);
        out.push_str("\">");
        if let Some(bg) = &self.background {
            out.push_str(r#"<rect x=""#);
            fmt_path_into(&mut out, vb.min.x);
            out.push_str(r#"" y=""#);
            fmt_path_into(&mut out, vb.min.y);
            out.push_str(r#"" width=""#);
            fmt_path_into(&mut out, width);
            out.push_str(r#"" height=""#);
            fmt_path_into(&mut out, height);
            out.push_str(r#"" fill=""#);
            escape_xml_into(&mut out, bg);
            out.push_str("\"/>");
        }
        out.push_str(&self.body);
        out.push_str("</svg>\n");
        out
    }

    fn push_point(&mut self, cmd: char, p: Point) {
        if !self.path.is_empty() {
            self.path.push(' ');
        }
        self.path.push(cmd);
        fmt_path_into(&mut self.path, p.x);
        self.path.push(',');
        fmt_path_into(&mut self.path, p.y);
    }
}

impl DrawingSurface for SvgSurface {
    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, p: Point) {
        self.push_point('M', p);
    }

    fn line_to(&mut self, p: Point) {
        self.push_point('L', p);
    }

    fn quadratic_curve_to(&mut self, control: Point, end: Point) {
        self.push_point('Q', control);
        self.path.push(' ');
        fmt_path_into(&mut self.path, end.x);
        self.path.push(',');
        fmt_path_into(&mut self.path, end.y);
    }

    fn close_path(&mut self) {
        if !self.path.is_empty() {
            self.path.push_str(" Z");
        }
    }

    fn fill(&mut self, paint: &str) {
        if self.path.is_empty() {
            return;
        }
        let _ = write!(&mut self.body, r#"<path d="{}" fill=""#, self.path);
        escape_xml_into(&mut self.body, paint);
        self.body.push_str(r#"" stroke="none"/>"#);
    }

    fn stroke(&mut self, paint: &str, line_width: f64) {
        if self.path.is_empty() {
            return;
        }
        let _ = write!(&mut self.body, r#"<path d="{}" fill="none" stroke=""#, self.path);
        escape_xml_into(&mut self.body, paint);
        self.body.push_str(r#"" stroke-width=""#);
        fmt_path_into(&mut self.body, line_width);
        self.body.push_str("\"/>");
    }

    fn set_font(&mut self, size: f64, family: &str) {
        self.font_size = size;
        self.font_family = family.to_string();
    }

    fn measure_text(&mut self, text: &str) -> f64 {
        let style = TextStyle {
            font_family: Some(self.font_family.clone()),
            font_size: self.font_size,
        };
        self.measurer.measure(text, &style).width
    }

    fn fill_text(&mut self, text: &str, at: Point, paint: &str) {
        self.body.push_str(r#"<text x=""#);
        fmt_path_into(&mut self.body, at.x);
        self.body.push_str(r#"" y=""#);
        fmt_path_into(&mut self.body, at.y);
        self.body.push_str(r#"" font-family=""#);
        escape_xml_into(&mut self.body, &self.font_family);
        self.body.push_str(r#"" font-size=""#);
        fmt_path_into(&mut self.body, self.font_size);
        self.body.push_str(r#"" fill=""#);
        escape_xml_into(&mut self.body, paint);
        self.body.push_str("\">");
        escape_xml_into(&mut self.body, text);
        self.body.push_str("</text>");
    }
}

/// Three fractional digits, trailing zeros trimmed, no `-0`.
pub(crate) fn fmt_path_into(out: &mut String, v: f64) {
    if !v.is_finite() || v.abs() < 0.0005 {
        out.push('0');
        return;
    }

    let k = (v * 1000.0).round() as i64;
    if k == 0 {
        out.push('0');
        return;
    }

    if k < 0 {
        out.push('-');
    }
    let abs = k.unsigned_abs();
    let _ = write!(out, "{}", abs / 1000);
    let frac = abs % 1000;
    if frac == 0 {
        return;
    }
    let mut digits = format!("{frac:03}");
    while digits.ends_with('0') {
        digits.pop();
    }
    out.push('.');
    out.push_str(&digits);
}

pub(crate) fn escape_xml_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}
