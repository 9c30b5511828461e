//! The 2D drawing surface the chart paints onto.

/// A CSS color string such as `#dc3545`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub &'static str);

impl Color {
    /// The color string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.0
    }
}

/// A point in CSS pixels, origin at the top left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position, growing downwards.
    pub y: f64,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One step of a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    /// Lift the pen and start a new segment.
    MoveTo(Point),
    /// Draw a straight line from the previous point.
    LineTo(Point),
}

/// Line style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Line color.
    pub color: Color,
    /// Line width in CSS pixels.
    pub width: f64,
    /// Dash and gap lengths, `None` for a solid line.
    pub dash: Option<(f64, f64)>,
}

/// Horizontal anchoring of text relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Text starts at the position.
    Left,
    /// Text is centered on the position.
    Center,
    /// Text ends at the position.
    Right,
}

/// Text style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Fill color.
    pub color: Color,
    /// Font size in CSS pixels.
    pub size: f64,
    /// Horizontal anchoring.
    pub align: Align,
}

/// A canvas-like drawing target.
///
/// Coordinates are CSS pixels. Implementations scale by the pixel ratio given
/// to [`reset`](Surface::reset) so strokes stay crisp on dense displays.
pub trait Surface {
    /// Size the surface to `width` x `height` CSS pixels at `pixel_ratio`
    /// device pixels per CSS pixel, discarding everything drawn so far.
    fn reset(&mut self, width: f64, height: f64, pixel_ratio: f64);

    /// Stroke a path made of one or more segments.
    fn stroke_path(&mut self, path: &[PathOp], stroke: &Stroke);

    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, origin: Point, width: f64, height: f64, color: Color);

    /// Fill a circle.
    fn fill_circle(&mut self, center: Point, radius: f64, color: Color);

    /// Draw a line of text with its baseline at `at.y`.
    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle);
}
