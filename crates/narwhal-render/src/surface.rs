use narwhal_core::geom::Point;

/// Canvas-like 2D drawing target.
///
/// Paths are built with `begin_path` .. `close_path` and painted with `fill` / `stroke`. Paint is
/// any CSS color string. Text is positioned by its alphabetic baseline start.
pub trait DrawingSurface {
    fn begin_path(&mut self);
    fn move_to(&mut self, p: Point);
    fn line_to(&mut self, p: Point);
    fn quadratic_curve_to(&mut self, control: Point, end: Point);
    fn close_path(&mut self);
    fn fill(&mut self, paint: &str);
    fn stroke(&mut self, paint: &str, line_width: f64);

    fn set_font(&mut self, size: f64, family: &str);
    /// Width of `text` in the current font.
    fn measure_text(&mut self, text: &str) -> f64;
    fn fill_text(&mut self, text: &str, at: Point, paint: &str);
}

/// Records every call; handy for asserting what a drawing pass did.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
    font_size: f64,
    /// Width per char per font-size unit used by `measure_text`.
    pub char_width_factor: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    BeginPath,
    MoveTo(Point),
    LineTo(Point),
    QuadraticCurveTo(Point, Point),
    ClosePath,
    Fill(String),
    Stroke(String, f64),
    SetFont(f64, String),
    FillText(String, Point, String),
}

impl RecordingSurface {
    pub fn new(char_width_factor: f64) -> Self {
        Self {
            char_width_factor,
            ..Self::default()
        }
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }
}

impl DrawingSurface for RecordingSurface {
    fn begin_path(&mut self) {
        self.ops.push(DrawOp::BeginPath);
    }

    fn move_to(&mut self, p: Point) {
        self.ops.push(DrawOp::MoveTo(p));
    }

    fn line_to(&mut self, p: Point) {
        self.ops.push(DrawOp::LineTo(p));
    }

    fn quadratic_curve_to(&mut self, control: Point, end: Point) {
        self.ops.push(DrawOp::QuadraticCurveTo(control, end));
    }

    fn close_path(&mut self) {
        self.ops.push(DrawOp::ClosePath);
    }

    fn fill(&mut self, paint: &str) {
        self.ops.push(DrawOp::Fill(paint.to_string()));
    }

    fn stroke(&mut self, paint: &str, line_width: f64) {
        self.ops.push(DrawOp::Stroke(paint.to_string(), line_width));
    }

    fn set_font(&mut self, size: f64, family: &str) {
        self.font_size = size;
        self.ops.push(DrawOp::SetFont(size, family.to_string()));
    }

    fn measure_text(&mut self, text: &str) -> f64 {
        text.chars().count() as f64 * self.font_size * self.char_width_factor
    }

    fn fill_text(&mut self, text: &str, at: Point, paint: &str) {
        self.ops
            .push(DrawOp::FillText(text.to_string(), at, paint.to_string()));
    }
}
