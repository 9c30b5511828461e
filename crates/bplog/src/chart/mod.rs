//! Time-series chart of systolic, diastolic and pulse values.
//!
//! [`render`] repaints a [`Surface`] with a gridded, labeled line chart of the
//! given readings, oldest on the left. Values that are absent or not positive
//! are not plotted and break the line of their series.

mod surface;
mod svg;

pub use surface::{Align, Color, PathOp, Point, Stroke, Surface, TextStyle};
pub use svg::SvgSurface;

use chrono::Datelike;

use crate::locale::Locale;
use crate::reading::Reading;

/// Margin around the plot area, in CSS pixels.
pub const DEFAULT_PADDING: f64 = 50.0;
/// Default surface width, in CSS pixels.
pub const DEFAULT_WIDTH: f64 = 800.0;
/// Default surface height, in CSS pixels.
pub const DEFAULT_HEIGHT: f64 = 400.0;

/// Headroom added above and below the data range.
const VALUE_MARGIN: f64 = 10.0;
/// Number of intervals between horizontal gridlines (six lines in total).
const GRID_STEPS: u32 = 5;
const MARKER_RADIUS: f64 = 4.0;
const SERIES_WIDTH: f64 = 2.0;
const PULSE_DASH: (f64, f64) = (5.0, 5.0);

const LEGEND_TOP: f64 = 20.0;
const LEGEND_SWATCH: f64 = 15.0;
const LEGEND_SPACING: f64 = 120.0;

const GRID_COLOR: Color = Color("#e0e0e0");
const AXIS_COLOR: Color = Color("#333");
const LABEL_COLOR: Color = Color("#666");
const LEGEND_TEXT_COLOR: Color = Color("#333");

/// Systolic series color.
pub const SYSTOLIC_COLOR: Color = Color("#dc3545");
/// Diastolic series color.
pub const DIASTOLIC_COLOR: Color = Color("#4a90e2");
/// Pulse series color.
pub const PULSE_COLOR: Color = Color("#28a745");

/// Surface size and appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartOptions {
    /// Width in CSS pixels.
    pub width: f64,
    /// Height in CSS pixels.
    pub height: f64,
    /// Margin around the plot area.
    pub padding: f64,
    /// Device pixels per CSS pixel.
    pub pixel_ratio: f64,
    /// Language of the legend.
    pub locale: Locale,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            padding: DEFAULT_PADDING,
            pixel_ratio: 1.0,
            locale: Locale::default(),
        }
    }
}

/// Vertical value range of the chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartScale {
    /// Value at the bottom of the plot area.
    pub min: f64,
    /// Value at the top of the plot area.
    pub max: f64,
}

impl ChartScale {
    /// Scale covering `values` with a margin of 10 on both sides, never
    /// dipping below zero. Falls back to `0..10` when there are no values.
    #[must_use]
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let (lo, hi) = values
            .into_iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });

        if lo > hi {
            return Self {
                min: 0.0,
                max: VALUE_MARGIN,
            };
        }

        Self {
            min: (lo - VALUE_MARGIN).max(0.0),
            max: hi + VALUE_MARGIN,
        }
    }

    /// Distance between top and bottom values.
    #[must_use]
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// Maps data indices and values to surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    width: f64,
    height: f64,
    padding: f64,
    count: usize,
    scale: ChartScale,
}

impl ChartLayout {
    /// Layout for `count` points on a surface described by `options`.
    #[must_use]
    pub fn new(options: &ChartOptions, count: usize, scale: ChartScale) -> Self {
        Self {
            width: options.width,
            height: options.height,
            padding: options.padding,
            count,
            scale,
        }
    }

    /// Width of the plot area.
    #[must_use]
    pub fn plot_width(&self) -> f64 {
        self.width - 2.0 * self.padding
    }

    /// Height of the plot area.
    #[must_use]
    pub fn plot_height(&self) -> f64 {
        self.height - 2.0 * self.padding
    }

    /// Vertical position of the bottom axis.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.height - self.padding
    }

    /// Horizontal position of the point at `index`.
    ///
    /// Points are spread evenly from the left to the right edge of the plot
    /// area. A lone point sits in the middle.
    #[must_use]
    pub fn x(&self, index: usize) -> f64 {
        if self.count <= 1 {
            return self.padding + self.plot_width() / 2.0;
        }
        self.padding + (as_f64(index) / as_f64(self.count - 1)) * self.plot_width()
    }

    /// Vertical position of `value`; larger values plot higher.
    #[must_use]
    pub fn y(&self, value: f64) -> f64 {
        self.bottom() - ((value - self.scale.min) / self.scale.range()) * self.plot_height()
    }
}

/// What [`render`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChartOutcome {
    /// There were no readings; nothing was drawn and the caller should show
    /// a placeholder.
    NoData,
    /// The chart was drawn.
    Drawn {
        /// Value range used for the vertical axis.
        scale: ChartScale,
        /// Number of readings along the horizontal axis.
        points: usize,
    },
}

/// One plotted line.
#[derive(Debug, Clone, PartialEq)]
struct Series {
    label: &'static str,
    color: Color,
    dashed: bool,
    values: Vec<Option<f64>>,
}

impl Series {
    fn stroke(&self) -> Stroke {
        Stroke {
            color: self.color,
            width: SERIES_WIDTH,
            dash: self.dashed.then_some(PULSE_DASH),
        }
    }

    /// Path through every plotted value. A gap before a value starts a new
    /// segment instead of bridging it.
    fn path(&self, layout: &ChartLayout) -> Vec<PathOp> {
        let mut ops = Vec::new();
        for (index, value) in self.values.iter().enumerate() {
            let Some(value) = *value else { continue };
            let point = Point::new(layout.x(index), layout.y(value));
            let after_gap = index == 0 || self.values[index - 1].is_none();
            ops.push(if after_gap {
                PathOp::MoveTo(point)
            } else {
                PathOp::LineTo(point)
            });
        }
        ops
    }

    fn points<'a>(&'a self, layout: &'a ChartLayout) -> impl Iterator<Item = Point> + 'a {
        self.values
            .iter()
            .enumerate()
            .filter_map(move |(index, value)| value.map(|v| Point::new(layout.x(index), layout.y(v))))
    }
}

/// Repaint `surface` with a chart of `readings`.
///
/// Readings are plotted oldest first regardless of input order. With no
/// readings the surface is left untouched and [`ChartOutcome::NoData`] is
/// returned.
pub fn render<S: Surface + ?Sized>(
    readings: &[&Reading],
    surface: &mut S,
    options: &ChartOptions,
) -> ChartOutcome {
    if readings.is_empty() {
        return ChartOutcome::NoData;
    }

    let mut sorted = readings.to_vec();
    sorted.sort_by_key(|r| r.datetime);

    let series = build_series(&sorted, options.locale);
    let scale = ChartScale::from_values(series.iter().flat_map(|s| s.values.iter().flatten().copied()));
    let layout = ChartLayout::new(options, sorted.len(), scale);

    surface.reset(options.width, options.height, options.pixel_ratio);
    draw_grid(surface, &layout, options);
    draw_axes(surface, &layout, options);
    draw_legend(surface, &series, options);
    for s in &series {
        draw_series(surface, s, &layout);
    }
    draw_dates(surface, &sorted, &layout);

    ChartOutcome::Drawn {
        scale,
        points: sorted.len(),
    }
}

fn plotted(value: u16) -> Option<f64> {
    (value > 0).then(|| f64::from(value))
}

fn build_series(readings: &[&Reading], locale: Locale) -> [Series; 3] {
    [
        Series {
            label: locale.systolic(),
            color: SYSTOLIC_COLOR,
            dashed: false,
            values: readings.iter().map(|r| plotted(r.systolic)).collect(),
        },
        Series {
            label: locale.diastolic(),
            color: DIASTOLIC_COLOR,
            dashed: false,
            values: readings.iter().map(|r| plotted(r.diastolic)).collect(),
        },
        Series {
            label: locale.pulse(),
            color: PULSE_COLOR,
            dashed: true,
            values: readings
                .iter()
                .map(|r| r.pulse.and_then(plotted))
                .collect(),
        },
    ]
}

fn draw_grid<S: Surface + ?Sized>(surface: &mut S, layout: &ChartLayout, options: &ChartOptions) {
    let stroke = Stroke {
        color: GRID_COLOR,
        width: 1.0,
        dash: None,
    };
    let label_style = TextStyle {
        color: LABEL_COLOR,
        size: 12.0,
        align: Align::Right,
    };
    let range = layout.scale.range();

    for step in 0..=GRID_STEPS {
        let fraction = f64::from(step) / f64::from(GRID_STEPS);
        let y = options.padding + fraction * layout.plot_height();
        surface.stroke_path(
            &[
                PathOp::MoveTo(Point::new(options.padding, y)),
                PathOp::LineTo(Point::new(options.width - options.padding, y)),
            ],
            &stroke,
        );

        let value = (layout.scale.max - fraction * range).round();
        surface.fill_text(
            &format!("{value:.0}"),
            Point::new(options.padding - 10.0, y + 4.0),
            &label_style,
        );
    }
}

fn draw_axes<S: Surface + ?Sized>(surface: &mut S, layout: &ChartLayout, options: &ChartOptions) {
    surface.stroke_path(
        &[
            PathOp::MoveTo(Point::new(options.padding, options.padding)),
            PathOp::LineTo(Point::new(options.padding, layout.bottom())),
            PathOp::LineTo(Point::new(options.width - options.padding, layout.bottom())),
        ],
        &Stroke {
            color: AXIS_COLOR,
            width: 2.0,
            dash: None,
        },
    );
}

fn draw_legend<S: Surface + ?Sized>(surface: &mut S, series: &[Series], options: &ChartOptions) {
    let text_style = TextStyle {
        color: LEGEND_TEXT_COLOR,
        size: 14.0,
        align: Align::Left,
    };

    let mut x = options.padding + 10.0;
    for s in series {
        surface.fill_rect(Point::new(x, LEGEND_TOP), LEGEND_SWATCH, LEGEND_SWATCH, s.color);
        surface.fill_text(s.label, Point::new(x + 20.0, LEGEND_TOP + 12.0), &text_style);
        x += LEGEND_SPACING;
    }
}

fn draw_series<S: Surface + ?Sized>(surface: &mut S, series: &Series, layout: &ChartLayout) {
    let path = series.path(layout);
    if !path.is_empty() {
        surface.stroke_path(&path, &series.stroke());
    }
    for point in series.points(layout) {
        surface.fill_circle(point, MARKER_RADIUS, series.color);
    }
}

fn draw_dates<S: Surface + ?Sized>(surface: &mut S, readings: &[&Reading], layout: &ChartLayout) {
    let style = TextStyle {
        color: LABEL_COLOR,
        size: 11.0,
        align: Align::Center,
    };
    for (index, reading) in readings.iter().enumerate() {
        let label = format!("{}/{}", reading.datetime.month(), reading.datetime.day());
        surface.fill_text(&label, Point::new(layout.x(index), layout.bottom() + 20.0), &style);
    }
}

#[allow(clippy::cast_precision_loss)]
fn as_f64(n: usize) -> f64 {
    n as f64
}
