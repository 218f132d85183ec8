//! Renderable figure model and the renderers that build figures.

pub mod holdings;
pub mod price;
pub mod svg;

use crate::core::error::ViewerError;
use chrono::NaiveDate;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartStyle {
    Line,
    Candlestick,
    Bar,
    Area,
}

impl ChartStyle {
    pub const ALL: [ChartStyle; 4] = [
        ChartStyle::Line,
        ChartStyle::Candlestick,
        ChartStyle::Bar,
        ChartStyle::Area,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ChartStyle::Line => "Line Chart",
            ChartStyle::Candlestick => "Candlestick Chart",
            ChartStyle::Bar => "Bar Chart",
            ChartStyle::Area => "Area Chart",
        }
    }
}

impl Display for ChartStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ChartStyle {
    type Err = ViewerError;

    /// Accepts `line` as well as the full label `Line Chart`, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        let short = wanted.strip_suffix(" chart").unwrap_or(&wanted);
        match short {
            "line" => Ok(ChartStyle::Line),
            "candlestick" | "candle" => Ok(ChartStyle::Candlestick),
            "bar" => Ok(ChartStyle::Bar),
            "area" => Ok(ChartStyle::Area),
            _ => Err(ViewerError::UnknownChartStyle(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Trace {
    /// Connected line; `fill_to_zero` shades the area down to the zero baseline.
    Line {
        x: Vec<NaiveDate>,
        y: Vec<f64>,
        fill_to_zero: bool,
    },
    Candlestick {
        x: Vec<NaiveDate>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
    },
    Bar {
        x: Vec<NaiveDate>,
        y: Vec<f64>,
    },
    /// Proportion chart; `hole` is the inner radius as a fraction of the outer one.
    Pie {
        labels: Vec<String>,
        values: Vec<f64>,
        hole: f64,
    },
}

impl Trace {
    pub fn mark_count(&self) -> usize {
        match self {
            Trace::Line { y, .. } | Trace::Bar { y, .. } => y.len(),
            Trace::Candlestick { x, .. } => x.len(),
            Trace::Pie { values, .. } => values.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub traces: Vec<Trace>,
}

impl Figure {
    pub fn mark_count(&self) -> usize {
        self.traces.iter().map(Trace::mark_count).sum()
    }
}
