//! Headless rendering of an [`Evaluation`] as a 2×2 panel figure, and
//! encoding of the result as PNG/base64.
//!
//! Panels are laid out in reading order:
//! 1. real and imaginary parts of the order parameter (blue and red)
//! 2. density profile with filled area under the curve (green)
//! 3. excitation spectrum with dashed `E = 0` and `k = 0` reference lines
//!    (purple)
//! 4. phase of the order parameter (orange)
//!
//! Each panel carries its title (see [`PANEL_TITLES`]), axis labels (see
//! [`PANEL_AXES`]), and numeric tick labels; panels 1 and 3 also carry a
//! legend. Text is set in the embedded [`Typeface`].

use std::io::Cursor;
use base64::{ Engine as _, engine::general_purpose::STANDARD as BASE64 };
use image::{ ImageFormat, Rgb, RgbImage };
use ndarray as nd;
use tracing::debug;
use crate::{
    error::{ LengthError, RenderError },
    model::Evaluation,
    text::Typeface,
};

pub type RResult<T> = Result<T, RenderError>;

/// Panel titles, in reading order.
pub const PANEL_TITLES: [&str; 4] = [
    "BEC Wave Function",
    "BEC Density Profile",
    "Bogoliubov Excitation Spectrum",
    "Wave Function Phase",
];

/// Panel `(x, y)` axis labels, in reading order.
pub const PANEL_AXES: [(&str, &str); 4] = [
    ("Position (x)", "Wavefunction ψ(x)"),
    ("Position (x)", "Density |ψ(x)|²"),
    ("Momentum (k)", "Energy E(k)"),
    ("Position (x)", "Phase (radians)"),
];

/// Smallest accepted canvas dimension, in pixels.
pub const MIN_CANVAS: u32 = 200;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const GRAY: Rgb<u8> = Rgb([128, 128, 128]);
const BLUE: Rgb<u8> = Rgb([0, 0, 255]);
const RED: Rgb<u8> = Rgb([255, 0, 0]);
const GREEN: Rgb<u8> = Rgb([0, 128, 0]);
const PURPLE: Rgb<u8> = Rgb([128, 0, 128]);
const ORANGE: Rgb<u8> = Rgb([255, 165, 0]);

const LINE_WIDTH: i64 = 2;
const GRID_ALPHA: f32 = 0.3;
const FILL_ALPHA: f32 = 0.3;
const REF_ALPHA: f32 = 0.5;
// (on, off) lengths in pixels
const DASH: (f64, f64) = (8.0, 5.0);
const LEGEND_ALPHA: f32 = 0.8;
// fraction of the data range added to either side of each axis
const PAD: f64 = 0.05;

/// Canvas configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
}

impl Default for RenderConfig {
    // 12 × 10 in at 100 dpi
    fn default() -> Self { Self { width: 1200, height: 1000 } }
}

impl RenderConfig {
    fn check(&self) -> RResult<()> {
        (self.width >= MIN_CANVAS && self.height >= MIN_CANVAS)
            .then_some(())
            .ok_or(RenderError::BadCanvas {
                width: self.width,
                height: self.height,
                min: MIN_CANVAS,
            })
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Stroke {
    Solid,
    Dashed,
}

// placement of a line of text along its direction, relative to its anchor
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Align {
    Start,
    Center,
    End,
}

// vertical text runs bottom to top
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Orient {
    Horizontal,
    Vertical,
}

#[derive(Copy, Clone, Debug)]
struct Label<'a> {
    text: &'a str,
    size: f32,
    align: Align,
    orient: Orient,
}

impl<'a> Label<'a> {
    fn new(text: &'a str, size: f32, align: Align) -> Self {
        Self { text, size, align, orient: Orient::Horizontal }
    }

    fn vertical(mut self) -> Self { self.orient = Orient::Vertical; self }
}

// text sizes and spacing, scaled to the panel size
#[derive(Copy, Clone, Debug, PartialEq)]
struct Sizes {
    title: f32,
    label: f32,
    tick: f32,
    pad: f64,
}

impl Sizes {
    fn new(config: RenderConfig) -> Self {
        let cell = config.width.min(config.height) as f32 / 2.0;
        let base = (0.04 * cell).clamp(8.0, 20.0);
        Self {
            title: base,
            label: 0.9 * base,
            tick: 0.8 * base,
            pad: (0.25 * base) as f64,
        }
    }
}

// legend corner within the plot area
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Corner {
    UpperRight,
    LowerRight,
}

/// A single curve to be drawn in a panel.
#[derive(Clone, Debug)]
struct Series<'a> {
    label: &'static str,
    x: nd::ArrayView1<'a, f64>,
    y: nd::ArrayView1<'a, f64>,
    color: Rgb<u8>,
    fill: bool,
    legend: bool,
}

impl<'a> Series<'a> {
    fn new(
        label: &'static str,
        x: &'a nd::Array1<f64>,
        y: &'a nd::Array1<f64>,
        color: Rgb<u8>,
    ) -> Self
    {
        Self { label, x: x.view(), y: y.view(), color, fill: false, legend: false }
    }

    fn filled(mut self) -> Self { self.fill = true; self }

    fn legend(mut self) -> Self { self.legend = true; self }

    fn check(&self) -> RResult<()> {
        LengthError::check(&self.x, &self.y)?;
        self.x.iter().chain(self.y.iter())
            .all(|v| v.is_finite())
            .then_some(())
            .ok_or_else(|| RenderError::NonFinite(self.label.to_string()))
    }
}

/// A set of curves sharing a pair of axes, plus annotations and optional
/// dashed reference lines.
#[derive(Clone, Debug, Default)]
struct Panel<'a> {
    title: &'static str,
    xlabel: &'static str,
    ylabel: &'static str,
    series: Vec<Series<'a>>,
    hline: Option<f64>,
    vline: Option<f64>,
    legend: Option<Corner>,
}

impl<'a> Panel<'a> {
    fn xlim(&self) -> (f64, f64) {
        let refs = self.vline.iter();
        limits(self.series.iter().flat_map(|s| s.x.iter()).chain(refs))
    }

    fn ylim(&self) -> (f64, f64) {
        let refs = self.hline.iter();
        let fill = self.series.iter().any(|s| s.fill).then_some(&0.0);
        limits(
            self.series.iter().flat_map(|s| s.y.iter())
                .chain(refs)
                .chain(fill)
        )
    }
}

// compute padded axis limits; empty or flat data gets a unit span
fn limits<'a, I>(vals: I) -> (f64, f64)
where I: IntoIterator<Item = &'a f64>
{
    let (lo, hi)
        = vals.into_iter()
        .fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), v| (lo.min(*v), hi.max(*v)),
        );
    if lo > hi {
        (-0.5, 0.5)
    } else if hi - lo <= f64::EPSILON * lo.abs().max(hi.abs()) {
        (lo - 0.5, hi + 0.5)
    } else {
        let pad = PAD * (hi - lo);
        (lo - pad, hi + pad)
    }
}

// choose a grid spacing of 1, 2, or 5 times a power of ten giving roughly five
// divisions over `span`
fn tick_step(span: f64) -> f64 {
    let raw = span / 5.0;
    let mag = 10.0_f64.powf(raw.log10().floor());
    let r = raw / mag;
    let m = if r < 1.5 { 1.0 } else if r < 3.5 { 2.0 } else if r < 7.5 { 5.0 } else { 10.0 };
    m * mag
}

fn ticks(lim: (f64, f64)) -> impl Iterator<Item = f64> {
    let step = tick_step(lim.1 - lim.0);
    let first = (lim.0 / step).ceil() as i64;
    let last = (lim.1 / step).floor() as i64;
    (first..=last).map(move |i| i as f64 * step)
}

// format a tick value with just enough decimals to resolve the tick spacing
fn tick_label(val: f64, lim: (f64, f64)) -> String {
    let step = tick_step(lim.1 - lim.0);
    let decimals = (-step.log10().floor()).max(0.0) as usize;
    let val = if val.abs() < 1e-9 * step { 0.0 } else { val };
    format!("{:.*}", decimals, val)
}

#[derive(Copy, Clone, Debug)]
struct Rect {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

impl Rect {
    fn contains(&self, px: i64, py: i64) -> bool {
        (self.x0 as i64..=self.x1 as i64).contains(&px)
            && (self.y0 as i64..=self.y1 as i64).contains(&py)
    }
}

// maps data coordinates to pixel coordinates within a plot area
#[derive(Copy, Clone, Debug)]
struct Axes {
    rect: Rect,
    xlim: (f64, f64),
    ylim: (f64, f64),
}

impl Axes {
    fn px(&self, x: f64) -> f64 {
        self.rect.x0
            + (x - self.xlim.0) / (self.xlim.1 - self.xlim.0)
            * (self.rect.x1 - self.rect.x0)
    }

    fn py(&self, y: f64) -> f64 {
        self.rect.y1
            - (y - self.ylim.0) / (self.ylim.1 - self.ylim.0)
            * (self.rect.y1 - self.rect.y0)
    }

    fn data_x(&self, px: f64) -> f64 {
        self.xlim.0
            + (px - self.rect.x0) / (self.rect.x1 - self.rect.x0)
            * (self.xlim.1 - self.xlim.0)
    }
}

struct Canvas {
    img: RgbImage,
    clip: Rect,
    face: Typeface,
    sizes: Sizes,
}

impl Canvas {
    fn new(config: RenderConfig, face: Typeface) -> Self {
        let img = RgbImage::from_pixel(config.width, config.height, WHITE);
        let clip = Rect {
            x0: 0.0,
            y0: 0.0,
            x1: (config.width - 1) as f64,
            y1: (config.height - 1) as f64,
        };
        Self { img, clip, face, sizes: Sizes::new(config) }
    }

    fn blend(&mut self, px: i64, py: i64, color: Rgb<u8>, alpha: f32) {
        if !self.clip.contains(px, py) { return; }
        let (Ok(ux), Ok(uy)) = (u32::try_from(px), u32::try_from(py))
            else { return; };
        let Some(pixel) = self.img.get_pixel_mut_checked(ux, uy)
            else { return; };
        pixel.0.iter_mut().zip(color.0)
            .for_each(|(c, new)| {
                let mixed = alpha * new as f32 + (1.0 - alpha) * *c as f32;
                *c = mixed.round().clamp(0.0, 255.0) as u8;
            });
    }

    fn stamp(&mut self, px: f64, py: f64, color: Rgb<u8>, alpha: f32) {
        let x0 = px.round() as i64 - LINE_WIDTH / 2;
        let y0 = py.round() as i64 - LINE_WIDTH / 2;
        for dy in 0..LINE_WIDTH {
            for dx in 0..LINE_WIDTH {
                self.blend(x0 + dx, y0 + dy, color, alpha);
            }
        }
    }

    // draw a polyline through pixel coordinates
    fn polyline<I>(&mut self, points: I, color: Rgb<u8>, alpha: f32, stroke: Stroke)
    where I: IntoIterator<Item = (f64, f64)>
    {
        let mut travelled: f64 = 0.0;
        let mut prev: Option<(f64, f64)> = None;
        for p in points {
            let Some(q) = prev.replace(p) else {
                self.stamp(p.0, p.1, color, alpha);
                continue;
            };
            let (dx, dy) = (p.0 - q.0, p.1 - q.1);
            let len = dx.hypot(dy);
            let steps = len.ceil().max(1.0) as usize;
            for i in 1..=steps {
                let t = i as f64 / steps as f64;
                let on = match stroke {
                    Stroke::Solid => true,
                    Stroke::Dashed => {
                        (travelled + t * len) % (DASH.0 + DASH.1) < DASH.0
                    },
                };
                if on { self.stamp(q.0 + t * dx, q.1 + t * dy, color, alpha); }
            }
            travelled += len;
        }
    }

    // draw a line of text; for horizontal text `anchor.1` is the top of the
    // line box, for vertical text `anchor.0` is its left edge
    fn text(&mut self, label: Label, anchor: (f64, f64)) {
        let width = self.face.width(label.text, label.size) as f64;
        let shift = match label.align {
            Align::Start => 0,
            Align::Center => (width / 2.0).round() as i64,
            Align::End => width.round() as i64,
        };
        let (ax, ay) = (anchor.0.round() as i64, anchor.1.round() as i64);
        for (lx, ly, c) in self.face.coverage(label.text, label.size) {
            let (px, py) = match label.orient {
                Orient::Horizontal => (ax - shift + lx, ay + ly),
                Orient::Vertical => (ax + ly, ay + shift - lx),
            };
            self.blend(px, py, BLACK, c);
        }
    }

    fn legend(&mut self, rect: Rect, corner: Corner, series: &[Series]) {
        let entries: Vec<&Series>
            = series.iter().filter(|s| s.legend).collect();
        if entries.is_empty() { return; }
        let Sizes { label: size, pad, .. } = self.sizes;
        let row = self.face.line_height(size) as f64;
        let swatch = 2.0 * size as f64;
        let text_w
            = entries.iter()
            .map(|s| self.face.width(s.label, size) as f64)
            .fold(0.0, f64::max);
        let w = 3.0 * pad + swatch + text_w + pad;
        let h = row * entries.len() as f64 + 2.0 * pad;
        let x0 = rect.x1 - 2.0 * pad - w;
        let y0 = match corner {
            Corner::UpperRight => rect.y0 + 2.0 * pad,
            Corner::LowerRight => rect.y1 - 2.0 * pad - h,
        };
        let bx = Rect { x0, y0, x1: x0 + w, y1: y0 + h };
        (bx.y0.round() as i64..=bx.y1.round() as i64)
            .for_each(|py| self.hspan(py as f64, bx.x0, bx.x1, WHITE, LEGEND_ALPHA));
        self.frame_colored(bx, GRAY);
        for (i, s) in entries.into_iter().enumerate() {
            let top = y0 + pad + i as f64 * row;
            let mid = top + row / 2.0;
            self.polyline(
                [(x0 + pad, mid), (x0 + pad + swatch, mid)],
                s.color,
                1.0,
                Stroke::Solid,
            );
            self.text(Label::new(s.label, size, Align::Start), (x0 + 2.0 * pad + swatch, top));
        }
    }

    fn hspan(&mut self, py: f64, x0: f64, x1: f64, color: Rgb<u8>, alpha: f32) {
        let py = py.round() as i64;
        (x0.round() as i64..=x1.round() as i64)
            .for_each(|px| self.blend(px, py, color, alpha));
    }

    fn vspan(&mut self, px: f64, y0: f64, y1: f64, color: Rgb<u8>, alpha: f32) {
        let px = px.round() as i64;
        let (lo, hi) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        (lo.round() as i64..=hi.round() as i64)
            .for_each(|py| self.blend(px, py, color, alpha));
    }

    fn frame_colored(&mut self, rect: Rect, color: Rgb<u8>) {
        self.hspan(rect.y0, rect.x0, rect.x1, color, 1.0);
        self.hspan(rect.y1, rect.x0, rect.x1, color, 1.0);
        self.vspan(rect.x0, rect.y0, rect.y1, color, 1.0);
        self.vspan(rect.x1, rect.y0, rect.y1, color, 1.0);
    }

    fn frame(&mut self, rect: Rect) { self.frame_colored(rect, BLACK); }

    // draw grid lines, tick marks, and tick labels; returns the width of the
    // widest y tick label
    fn grid(&mut self, axes: &Axes) -> f64 {
        let r = axes.rect;
        const TICK: f64 = 6.0;
        let Sizes { tick: size, pad, .. } = self.sizes;
        for x in ticks(axes.xlim) {
            let px = axes.px(x);
            self.vspan(px, r.y0, r.y1, GRAY, GRID_ALPHA);
            self.vspan(px, r.y1, r.y1 - TICK, BLACK, 1.0);
            let text = tick_label(x, axes.xlim);
            self.text(Label::new(&text, size, Align::Center), (px, r.y1 + pad));
        }
        let half = self.face.line_height(size) as f64 / 2.0;
        let mut widest: f64 = 0.0;
        for y in ticks(axes.ylim) {
            let py = axes.py(y);
            self.hspan(py, r.x0, r.x1, GRAY, GRID_ALPHA);
            self.hspan(py, r.x0, r.x0 + TICK, BLACK, 1.0);
            let text = tick_label(y, axes.ylim);
            widest = widest.max(self.face.width(&text, size) as f64);
            self.text(Label::new(&text, size, Align::End), (r.x0 - pad, py - half));
        }
        widest
    }

    fn annotate(&mut self, axes: &Axes, panel: &Panel, tick_width: f64) {
        let r = axes.rect;
        let Sizes { title, label, tick, pad } = self.sizes;
        let cx = (r.x0 + r.x1) / 2.0;
        let cy = (r.y0 + r.y1) / 2.0;
        let title_h = self.face.line_height(title) as f64;
        self.text(Label::new(panel.title, title, Align::Center), (cx, r.y0 - pad - title_h));
        let tick_h = self.face.line_height(tick) as f64;
        self.text(
            Label::new(panel.xlabel, label, Align::Center),
            (cx, r.y1 + 2.0 * pad + tick_h),
        );
        let label_h = self.face.line_height(label) as f64;
        let left = (r.x0 - 3.0 * pad - tick_width - label_h).max(0.0);
        self.text(Label::new(panel.ylabel, label, Align::Center).vertical(), (left, cy));
    }

    // shade between a series and y = 0, one pixel column at a time so that no
    // pixel is blended twice
    fn fill(&mut self, axes: &Axes, series: &Series, alpha: f32) {
        let n = series.x.len();
        if n < 2 { return; }
        let (xmin, xmax) = (series.x[0], series.x[n - 1]);
        let zero = axes.py(0.0);
        let c0 = axes.px(xmin).ceil() as i64;
        let c1 = axes.px(xmax).floor() as i64;
        for col in c0..=c1 {
            let x = axes.data_x(col as f64);
            let i = series.x.iter()
                .position(|xk| *xk >= x)
                .unwrap_or(n - 1)
                .max(1);
            let (xa, xb) = (series.x[i - 1], series.x[i]);
            let (ya, yb) = (series.y[i - 1], series.y[i]);
            let t = if xb > xa { ((x - xa) / (xb - xa)).clamp(0.0, 1.0) } else { 0.0 };
            let y = ya + t * (yb - ya);
            self.vspan(col as f64, axes.py(y), zero, series.color, alpha);
        }
    }

    fn panel(&mut self, rect: Rect, panel: &Panel) {
        let axes = Axes { rect, xlim: panel.xlim(), ylim: panel.ylim() };
        let tick_width = self.grid(&axes);
        self.annotate(&axes, panel, tick_width);
        self.clip = rect;
        if let Some(y) = panel.hline {
            let py = axes.py(y);
            self.polyline(
                [(rect.x0, py), (rect.x1, py)], GRAY, REF_ALPHA, Stroke::Dashed);
        }
        if let Some(x) = panel.vline {
            let px = axes.px(x);
            self.polyline(
                [(px, rect.y1), (px, rect.y0)], GRAY, REF_ALPHA, Stroke::Dashed);
        }
        for series in panel.series.iter() {
            if series.fill { self.fill(&axes, series, FILL_ALPHA); }
            let points
                = series.x.iter().zip(series.y.iter())
                .map(|(x, y)| (axes.px(*x), axes.py(*y)));
            self.polyline(points, series.color, 1.0, Stroke::Solid);
        }
        if let Some(corner) = panel.legend {
            self.legend(rect, corner, &panel.series);
        }
        self.clip = Rect {
            x0: 0.0,
            y0: 0.0,
            x1: (self.img.width() - 1) as f64,
            y1: (self.img.height() - 1) as f64,
        };
        self.frame(rect);
    }
}

// plot area of the panel in row `row` and column `col` of a 2×2 layout
fn cell(config: RenderConfig, row: u32, col: u32) -> Rect {
    let w = config.width as f64 / 2.0;
    let h = config.height as f64 / 2.0;
    let x = col as f64 * w;
    let y = row as f64 * h;
    Rect {
        x0: (x + 0.14 * w).round(),
        y0: (y + 0.10 * h).round(),
        x1: (x + 0.96 * w).round(),
        y1: (y + 0.85 * h).round(),
    }
}

/// Rasterize the four diagnostic panels for an evaluation.
pub fn figure(ev: &Evaluation, config: RenderConfig) -> RResult<RgbImage> {
    config.check()?;
    let re = ev.psi_real();
    let im = ev.psi_imag();
    let density = ev.density();
    let phase = ev.phase();

    let series: [Vec<Series>; 4] = [
        vec![
            Series::new("Real(ψ)", ev.x(), &re, BLUE).legend(),
            Series::new("Imag(ψ)", ev.x(), &im, RED).legend(),
        ],
        vec![Series::new("|ψ|²", ev.x(), &density, GREEN).filled()],
        vec![Series::new("E(k)", ev.k(), ev.E(), PURPLE).legend()],
        vec![Series::new("arg ψ", ev.x(), &phase, ORANGE)],
    ];
    let mut panels: Vec<Panel>
        = series.into_iter()
        .zip(PANEL_TITLES.into_iter().zip(PANEL_AXES))
        .map(|(series, (title, (xlabel, ylabel)))| {
            Panel { title, xlabel, ylabel, series, ..Default::default() }
        })
        .collect();
    panels[0].legend = Some(Corner::UpperRight);
    panels[2].hline = Some(0.0);
    panels[2].vline = Some(0.0);
    panels[2].legend = Some(Corner::LowerRight);
    panels.iter()
        .flat_map(|p| p.series.iter())
        .try_for_each(|s| s.check())?;

    let mut canvas = Canvas::new(config, Typeface::load()?);
    for (i, panel) in panels.iter().enumerate() {
        let (row, col) = (i as u32 / 2, i as u32 % 2);
        canvas.panel(cell(config, row, col), panel);
    }
    debug!(width = config.width, height = config.height, "render::figure: done");
    Ok(canvas.img)
}

/// Encode an image as PNG.
pub fn encode_png(img: &RgbImage) -> RResult<Vec<u8>> {
    let mut buf: Vec<u8> = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

/// Encode bytes as standard (padded) base64.
pub fn to_base64(bytes: &[u8]) -> String { BASE64.encode(bytes) }

/// Rasterize and encode an evaluation as PNG in one go.
pub fn render_png(ev: &Evaluation, config: RenderConfig) -> RResult<Vec<u8>> {
    figure(ev, config).and_then(|img| encode_png(&img))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use crate::model;

    const PNG_SIG: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    fn small() -> RenderConfig { RenderConfig { width: 400, height: 300 } }

    #[test]
    fn figure_has_requested_size() {
        let ev = model::simulate(0.05, 0.5, 1.0).unwrap();
        let img = figure(&ev, small()).unwrap();
        assert_eq!(img.dimensions(), (400, 300));
        // something other than background got drawn in each quadrant
        for (row, col) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            let r = cell(small(), row, col);
            let inked = (r.x0 as u32..=r.x1 as u32)
                .flat_map(|x| (r.y0 as u32..=r.y1 as u32).map(move |y| (x, y)))
                .any(|(x, y)| *img.get_pixel(x, y) != WHITE);
            assert!(inked, "panel ({row}, {col}) is blank");
        }
    }

    #[test]
    fn png_round_trip_signature() {
        let ev = model::simulate(0.2, 1.0, 2.0).unwrap();
        let png = render_png(&ev, small()).unwrap();
        assert_eq!(png[..8], PNG_SIG);
        let decoded = BASE64.decode(to_base64(&png)).unwrap();
        assert_eq!(decoded, png);
    }

    #[test]
    fn canvas_too_small() {
        let ev = model::simulate(0.05, 0.5, 1.0).unwrap();
        let res = figure(&ev, RenderConfig { width: 100, height: 1000 });
        assert!(matches!(res, Err(RenderError::BadCanvas { width: 100, .. })));
    }

    #[test]
    fn series_checks() {
        let x = nd::array![0.0, 1.0, 2.0];
        let y = nd::array![0.0, 1.0];
        let s = Series::new("bad", &x, &y, BLUE);
        assert!(matches!(s.check(), Err(RenderError::Length(_))));
        let y = nd::array![0.0, f64::NAN, 1.0];
        let s = Series::new("nan", &x, &y, BLUE);
        assert!(matches!(s.check(), Err(RenderError::NonFinite(l)) if l == "nan"));
    }

    #[test]
    fn axis_limits() {
        assert_eq!(limits(&[0.0, 0.0, 0.0]), (-0.5, 0.5));
        assert_eq!(limits(std::iter::empty()), (-0.5, 0.5));
        let (lo, hi) = limits(&[0.0, 10.0]);
        assert!((lo + 0.5).abs() < 1e-12 && (hi - 10.5).abs() < 1e-12);
    }

    #[test]
    fn tick_spacing() {
        assert!((tick_step(10.0) - 2.0).abs() < 1e-12);
        assert!((tick_step(1.0) - 0.2).abs() < 1e-12);
        assert!((tick_step(21.0) - 5.0).abs() < 1e-12);
        let t: Vec<f64> = ticks((-1.05, 1.05)).collect();
        assert_eq!(t.len(), 5);
    }

    #[test]
    fn panels_carry_titles() {
        let ev = model::simulate(0.05, 0.5, 1.0).unwrap();
        let img = figure(&ev, RenderConfig::default()).unwrap();
        let h = img.height() / 2;
        for (row, col) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            // band between the top of the cell and the top of the plot area
            let r = cell(RenderConfig::default(), row, col);
            let top = row * h;
            let inked = (r.x0 as u32..=r.x1 as u32)
                .flat_map(|x| (top..r.y0 as u32).map(move |y| (x, y)))
                .filter(|(x, y)| img.get_pixel(*x, *y).0.iter().all(|c| *c < 128))
                .count();
            assert!(inked > 20, "panel ({row}, {col}) has no title");
        }
    }

    #[test]
    fn tick_labels_match_spacing() {
        assert_eq!(tick_label(2.0, (-0.5, 10.5)), "2");
        assert_eq!(tick_label(0.4, (-1.05, 1.05)), "0.4");
        assert_eq!(tick_label(-1e-17, (-0.5, 0.5)), "0.0");
        assert_eq!(tick_label(0.05, (0.0, 0.25)), "0.05");
    }

    #[test]
    fn text_lands_at_anchor() {
        let mut canvas = Canvas::new(small(), Typeface::load().unwrap());
        let inked = |img: &RgbImage| -> Vec<(u32, u32)> {
            img.enumerate_pixels()
                .filter(|(_, _, p)| **p != WHITE)
                .map(|(x, y, _)| (x, y))
                .collect()
        };
        canvas.text(Label::new("Energy E(k)", 16.0, Align::Start), (50.0, 40.0));
        let px = inked(&canvas.img);
        assert!(!px.is_empty());
        assert!(px.iter().all(|(x, y)| *x >= 48 && (38..60).contains(y)));

        // vertical text grows upward from its anchor
        let mut canvas = Canvas::new(small(), Typeface::load().unwrap());
        canvas.text(Label::new("Energy E(k)", 16.0, Align::Start).vertical(), (20.0, 200.0));
        let px = inked(&canvas.img);
        assert!(!px.is_empty());
        assert!(px.iter().all(|(x, y)| (18..40).contains(x) && *y <= 202));
    }

    #[test]
    fn legend_only_when_requested() {
        let x = nd::array![0.0, 1.0];
        let y = nd::array![0.0, 1.0];
        let rect = Rect { x0: 20.0, y0: 20.0, x1: 380.0, y1: 280.0 };
        let mut canvas = Canvas::new(small(), Typeface::load().unwrap());
        canvas.legend(rect, Corner::UpperRight, &[Series::new("E(k)", &x, &y, PURPLE)]);
        assert!(canvas.img.pixels().all(|p| *p == WHITE));
        canvas.legend(
            rect, Corner::UpperRight, &[Series::new("E(k)", &x, &y, PURPLE).legend()]);
        assert!(canvas.img.pixels().any(|p| *p == PURPLE));
        // box sits in the upper half of the plot area
        let lowest = canvas.img.enumerate_pixels()
            .filter(|(_, _, p)| **p != WHITE)
            .map(|(_, y, _)| y)
            .max()
            .unwrap();
        assert!(lowest < 150);
    }

    #[test]
    fn blend_mixes_toward_color() {
        let mut canvas = Canvas::new(small(), Typeface::load().unwrap());
        canvas.blend(10, 10, BLACK, 0.5);
        assert_eq!(*canvas.img.get_pixel(10, 10), Rgb([128, 128, 128]));
        canvas.blend(-1, 10, BLACK, 1.0);
        canvas.blend(10, 10_000, BLACK, 1.0);
    }
}
