//! SVG output for charts.

use std::fmt::Write as _;

use super::surface::{Align, Color, PathOp, Point, Stroke, Surface, TextStyle};

/// Font family used for all chart text.
const FONT_FAMILY: &str = "sans-serif";

/// A [`Surface`] that accumulates SVG elements.
///
/// The document is sized in device pixels and uses a `viewBox` in CSS pixels,
/// which is how the pixel ratio is applied.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    pixel_ratio: f64,
    body: String,
}

impl Default for SvgSurface {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            pixel_ratio: 1.0,
            body: String::new(),
        }
    }
}

impl SvgSurface {
    /// Create an empty surface. Call [`Surface::reset`] before drawing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the complete SVG document.
    #[must_use]
    pub fn to_svg(&self) -> String {
        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
                "\n",
                r##"<rect x="0" y="0" width="{}" height="{}" fill="#ffffff"/>"##,
                "\n{}</svg>\n"
            ),
            num(self.width * self.pixel_ratio),
            num(self.height * self.pixel_ratio),
            num(self.width),
            num(self.height),
            num(self.width),
            num(self.height),
            self.body,
        )
    }
}

impl Surface for SvgSurface {
    fn reset(&mut self, width: f64, height: f64, pixel_ratio: f64) {
        self.width = width;
        self.height = height;
        self.pixel_ratio = pixel_ratio;
        self.body.clear();
    }

    fn stroke_path(&mut self, path: &[PathOp], stroke: &Stroke) {
        if path.is_empty() {
            return;
        }

        let mut d = String::new();
        for op in path {
            let (cmd, p) = match op {
                PathOp::MoveTo(p) => ('M', p),
                PathOp::LineTo(p) => ('L', p),
            };
            if !d.is_empty() {
                d.push(' ');
            }
            let _ = write!(d, "{cmd}{} {}", num(p.x), num(p.y));
        }

        let dash = stroke
            .dash
            .map(|(on, off)| format!(r#" stroke-dasharray="{} {}""#, num(on), num(off)))
            .unwrap_or_default();

        let _ = writeln!(
            self.body,
            r#"<path d="{d}" fill="none" stroke="{}" stroke-width="{}"{dash}/>"#,
            stroke.color.as_str(),
            num(stroke.width),
        );
    }

    fn fill_rect(&mut self, origin: Point, width: f64, height: f64, color: Color) {
        let _ = writeln!(
            self.body,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
            num(origin.x),
            num(origin.y),
            num(width),
            num(height),
            color.as_str(),
        );
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        let _ = writeln!(
            self.body,
            r#"<circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
            num(center.x),
            num(center.y),
            num(radius),
            color.as_str(),
        );
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) {
        let anchor = match style.align {
            Align::Left => "start",
            Align::Center => "middle",
            Align::Right => "end",
        };
        let _ = writeln!(
            self.body,
            r#"<text x="{}" y="{}" font-family="{FONT_FAMILY}" font-size="{}" text-anchor="{anchor}" fill="{}">{}</text>"#,
            num(at.x),
            num(at.y),
            num(style.size),
            style.color.as_str(),
            escape(text),
        );
    }
}

/// Format a coordinate with at most two decimals and no trailing zeros.
fn num(value: f64) -> String {
    let s = format!("{value:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color("#dc3545");

    #[test]
    fn test_num_trims() {
        assert_eq!(num(50.0), "50");
        assert_eq!(num(12.5), "12.5");
        assert_eq!(num(1.0 / 3.0), "0.33");
        assert_eq!(num(-0.001), "0");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b & 'c'"), "a&lt;b &amp; &apos;c&apos;");
    }

    #[test]
    fn test_document_uses_pixel_ratio() {
        let mut svg = SvgSurface::new();
        svg.reset(400.0, 300.0, 2.0);
        let doc = svg.to_svg();
        assert!(doc.contains(r#"width="800" height="600" viewBox="0 0 400 300""#));
    }

    #[test]
    fn test_reset_clears_body() {
        let mut svg = SvgSurface::new();
        svg.reset(100.0, 100.0, 1.0);
        svg.fill_circle(Point::new(1.0, 2.0), 4.0, RED);
        svg.reset(100.0, 100.0, 1.0);
        assert!(!svg.to_svg().contains("<circle"));
    }

    #[test]
    fn test_dashed_path() {
        let mut svg = SvgSurface::new();
        svg.reset(100.0, 100.0, 1.0);
        svg.stroke_path(
            &[
                PathOp::MoveTo(Point::new(0.0, 0.0)),
                PathOp::LineTo(Point::new(10.0, 5.5)),
                PathOp::MoveTo(Point::new(20.0, 5.0)),
            ],
            &Stroke {
                color: RED,
                width: 2.0,
                dash: Some((5.0, 5.0)),
            },
        );
        let doc = svg.to_svg();
        assert!(doc.contains(r#"d="M0 0 L10 5.5 M20 5""#));
        assert!(doc.contains(r#"stroke-dasharray="5 5""#));
    }

    #[test]
    fn test_empty_path_is_skipped() {
        let mut svg = SvgSurface::new();
        svg.reset(100.0, 100.0, 1.0);
        svg.stroke_path(
            &[],
            &Stroke {
                color: RED,
                width: 2.0,
                dash: None,
            },
        );
        assert!(!svg.to_svg().contains("<path"));
    }

    #[test]
    fn test_text_anchor_and_escape() {
        let mut svg = SvgSurface::new();
        svg.reset(100.0, 100.0, 1.0);
        svg.fill_text(
            "3/14",
            Point::new(50.0, 70.0),
            &TextStyle {
                color: Color("#666"),
                size: 11.0,
                align: Align::Center,
            },
        );
        let doc = svg.to_svg();
        assert!(doc.contains(r#"text-anchor="middle""#));
        assert!(doc.contains(">3/14</text>"));
    }
}
