//! Standalone SVG serialization of a [`Figure`].

use crate::chart::{Figure, Trace};
use chrono::NaiveDate;
use std::f64::consts::PI;

const WIDTH: f64 = 720.0;
const HEIGHT: f64 = 360.0;
const PADDING: f64 = 56.0;
const LINE_COLOR: &str = "#348dc1";
const AREA_FILL: &str = "#348dc1";
const BAR_COLOR: &str = "#5b8ff9";
const UP_COLOR: &str = "#26a69a";
const DOWN_COLOR: &str = "#ef5350";
const PIE_COLORS: [&str; 4] = ["#636efa", "#ef553b", "#00cc96", "#ab63fa"];
const X_TICKS: usize = 6;

/// Escapes text for use inside SVG/HTML element content and attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn svg_header() -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH} {HEIGHT}" width="{WIDTH}" height="{HEIGHT}"><style>text{{font-family:Arial,sans-serif;font-size:11px;fill:#444}}.title{{font-size:15px;font-weight:bold;fill:#222}}</style><rect width="100%" height="100%" fill="#fff" />"##
    )
}

fn svg_footer() -> &'static str {
    "</svg>"
}

/// Value range of the plot area, widened to include zero when a baseline is drawn.
struct Extent {
    min: f64,
    max: f64,
}

impl Extent {
    fn of(values: impl Iterator<Item = f64>, include_zero: bool) -> Option<Self> {
        let (mut min, mut max) = if include_zero {
            (0.0, 0.0)
        } else {
            (f64::INFINITY, f64::NEG_INFINITY)
        };
        for v in values.filter(|v| v.is_finite()) {
            min = min.min(v);
            max = max.max(v);
        }
        if !min.is_finite() || !max.is_finite() {
            return None;
        }
        if min == max {
            min -= 1.0;
            max += 1.0;
        }
        Some(Self { min, max })
    }

    fn y(&self, value: f64) -> f64 {
        let norm = (value - self.min) / (self.max - self.min);
        HEIGHT - PADDING - norm * (HEIGHT - 2.0 * PADDING)
    }
}

fn x_positions(len: usize) -> Vec<f64> {
    if len == 0 {
        return Vec::new();
    }
    if len == 1 {
        return vec![WIDTH / 2.0];
    }
    let inner_width = WIDTH - 2.0 * PADDING;
    (0..len)
        .map(|i| PADDING + inner_width * (i as f64 / (len - 1) as f64))
        .collect()
}

fn slot_width(len: usize) -> f64 {
    ((WIDTH - 2.0 * PADDING) / len.max(1) as f64 * 0.7).max(0.5)
}

fn draw_title(svg: &mut String, title: &str) {
    svg.push_str(&format!(
        r#"<text class="title" x="{x:.2}" y="24" text-anchor="middle">{title}</text>"#,
        x = WIDTH / 2.0,
        title = escape(title)
    ));
}

fn draw_axes(svg: &mut String, figure: &Figure) {
    let bottom = HEIGHT - PADDING;
    svg.push_str(&format!(
        r##"<line x1="{PADDING}" y1="{bottom}" x2="{right}" y2="{bottom}" stroke="#000" stroke-width="1" /><line x1="{PADDING}" y1="{PADDING}" x2="{PADDING}" y2="{bottom}" stroke="#000" stroke-width="1" />"##,
        right = WIDTH - PADDING
    ));
    if let Some(label) = &figure.x_label {
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle">{label}</text>"#,
            x = WIDTH / 2.0,
            y = HEIGHT - 12.0,
            label = escape(label)
        ));
    }
    if let Some(label) = &figure.y_label {
        svg.push_str(&format!(
            r#"<text x="16" y="{y:.2}" text-anchor="middle" transform="rotate(-90 16 {y:.2})">{label}</text>"#,
            y = HEIGHT / 2.0,
            label = escape(label)
        ));
    }
}

fn draw_value_ticks(svg: &mut String, extent: &Extent) {
    for value in [extent.min, (extent.min + extent.max) / 2.0, extent.max] {
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="end">{value:.2}</text>"#,
            x = PADDING - 6.0,
            y = extent.y(value) + 4.0
        ));
    }
}

fn draw_date_ticks(svg: &mut String, dates: &[NaiveDate], xs: &[f64]) {
    if dates.is_empty() {
        return;
    }
    let step = (dates.len() / X_TICKS).max(1);
    let axis_y = HEIGHT - PADDING;
    for (date, x) in dates.iter().zip(xs).step_by(step) {
        svg.push_str(&format!(
            r##"<line x1="{x:.2}" y1="{axis_y}" x2="{x:.2}" y2="{y2}" stroke="#ccc" stroke-width="1" /><text x="{x:.2}" y="{ty}" text-anchor="middle">{label}</text>"##,
            y2 = axis_y + 4.0,
            ty = axis_y + 16.0,
            label = date.format("%Y-%m-%d")
        ));
    }
}

fn points_attr(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{x:.2},{y:.2}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn draw_line(svg: &mut String, x: &[NaiveDate], y: &[f64], fill_to_zero: bool) {
    let Some(extent) = Extent::of(y.iter().copied(), fill_to_zero) else {
        return;
    };
    let xs = x_positions(y.len());
    let points: Vec<(f64, f64)> = xs
        .iter()
        .zip(y)
        .map(|(px, v)| (*px, extent.y(*v)))
        .collect();

    if fill_to_zero {
        let baseline = extent.y(0.0);
        let mut area = Vec::with_capacity(points.len() + 2);
        area.push((xs[0], baseline));
        area.extend(points.iter().copied());
        area.push((xs[xs.len() - 1], baseline));
        svg.push_str(&format!(
            r#"<polygon fill="{AREA_FILL}" fill-opacity="0.35" stroke="none" points="{}" />"#,
            points_attr(&area)
        ));
    }
    svg.push_str(&format!(
        r#"<polyline fill="none" stroke="{LINE_COLOR}" stroke-width="1.5" points="{}" />"#,
        points_attr(&points)
    ));
    draw_value_ticks(svg, &extent);
    draw_date_ticks(svg, x, &xs);
}

fn draw_bars(svg: &mut String, x: &[NaiveDate], y: &[f64]) {
    let Some(extent) = Extent::of(y.iter().copied(), true) else {
        return;
    };
    let xs = x_positions(y.len());
    let width = slot_width(y.len());
    let zero = extent.y(0.0);
    for (px, v) in xs.iter().zip(y) {
        let top = extent.y(*v);
        let (y0, y1) = if top < zero { (top, zero) } else { (zero, top) };
        svg.push_str(&format!(
            r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="{BAR_COLOR}" />"#,
            x = px - width / 2.0,
            y = y0,
            w = width,
            h = y1 - y0
        ));
    }
    draw_value_ticks(svg, &extent);
    draw_date_ticks(svg, x, &xs);
}

fn draw_candles(
    svg: &mut String,
    x: &[NaiveDate],
    open: &[f64],
    high: &[f64],
    low: &[f64],
    close: &[f64],
) {
    let Some(extent) = Extent::of(low.iter().chain(high).copied(), false) else {
        return;
    };
    let xs = x_positions(x.len());
    let width = slot_width(x.len());
    for (i, px) in xs.iter().enumerate() {
        let color = if close[i] >= open[i] {
            UP_COLOR
        } else {
            DOWN_COLOR
        };
        let body_top = extent.y(open[i].max(close[i]));
        let body_bottom = extent.y(open[i].min(close[i]));
        svg.push_str(&format!(
            r#"<line x1="{px:.2}" y1="{hy:.2}" x2="{px:.2}" y2="{ly:.2}" stroke="{color}" stroke-width="1" /><rect x="{bx:.2}" y="{body_top:.2}" width="{width:.2}" height="{bh:.2}" fill="{color}" />"#,
            hy = extent.y(high[i]),
            ly = extent.y(low[i]),
            bx = px - width / 2.0,
            bh = (body_bottom - body_top).max(0.5)
        ));
    }
    draw_value_ticks(svg, &extent);
    draw_date_ticks(svg, x, &xs);
}

fn polar(cx: f64, cy: f64, r: f64, angle: f64) -> (f64, f64) {
    (cx + r * angle.cos(), cy + r * angle.sin())
}

/// Draws the positive slices only; zero and negative values take no space.
fn draw_pie(svg: &mut String, labels: &[String], values: &[f64], hole: f64) {
    let cx = WIDTH / 2.0 - 80.0;
    let cy = HEIGHT / 2.0 + 10.0;
    let r = HEIGHT / 2.0 - PADDING + 10.0;
    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();

    if total > 0.0 {
        let mut angle = -PI / 2.0;
        for (i, value) in values.iter().enumerate() {
            if *value <= 0.0 {
                continue;
            }
            let color = PIE_COLORS[i % PIE_COLORS.len()];
            let share = value / total;
            if share >= 1.0 {
                svg.push_str(&format!(
                    r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}" fill="{color}" />"#
                ));
                continue;
            }
            let sweep = share * 2.0 * PI;
            let (x1, y1) = polar(cx, cy, r, angle);
            let (x2, y2) = polar(cx, cy, r, angle + sweep);
            let large_arc = if sweep > PI { 1 } else { 0 };
            svg.push_str(&format!(
                r#"<path d="M {cx:.2} {cy:.2} L {x1:.2} {y1:.2} A {r:.2} {r:.2} 0 {large_arc} 1 {x2:.2} {y2:.2} Z" fill="{color}" />"#
            ));
            angle += sweep;
        }
        if hole > 0.0 {
            svg.push_str(&format!(
                r##"<circle cx="{cx:.2}" cy="{cy:.2}" r="{hr:.2}" fill="#fff" />"##,
                hr = r * hole
            ));
        }
    }

    let legend_x = cx + r + 40.0;
    for (i, (label, value)) in labels.iter().zip(values).enumerate() {
        let y = cy - 20.0 + i as f64 * 22.0;
        let share = if total > 0.0 { value / total * 100.0 } else { 0.0 };
        svg.push_str(&format!(
            r#"<rect x="{legend_x:.2}" y="{ry:.2}" width="12" height="12" fill="{color}" /><text x="{tx:.2}" y="{y:.2}">{label} ({share:.1}%)</text>"#,
            ry = y - 10.0,
            color = PIE_COLORS[i % PIE_COLORS.len()],
            tx = legend_x + 18.0,
            label = escape(label)
        ));
    }
}

impl Figure {
    pub fn to_svg(&self) -> String {
        let mut svg = svg_header();
        draw_title(&mut svg, &self.title);

        let cartesian = self
            .traces
            .iter()
            .any(|t| !matches!(t, Trace::Pie { .. }));
        if cartesian || self.x_label.is_some() || self.y_label.is_some() {
            draw_axes(&mut svg, self);
        }

        for trace in &self.traces {
            if trace.mark_count() == 0 {
                continue;
            }
            match trace {
                Trace::Line { x, y, fill_to_zero } => draw_line(&mut svg, x, y, *fill_to_zero),
                Trace::Bar { x, y } => draw_bars(&mut svg, x, y),
                Trace::Candlestick {
                    x,
                    open,
                    high,
                    low,
                    close,
                } => draw_candles(&mut svg, x, open, high, low, close),
                Trace::Pie {
                    labels,
                    values,
                    hole,
                } => draw_pie(&mut svg, labels, values, *hole),
            }
        }

        svg.push_str(svg_footer());
        svg
    }
}
