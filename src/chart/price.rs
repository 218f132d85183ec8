use crate::chart::{ChartStyle, Figure, Trace};
use crate::core::market::PriceHistory;

/// Builds the price figure for `history` in the requested style.
///
/// The figure always carries the "Date"/"Price" axis labels; an empty
/// history yields a trace with no points.
pub fn render(history: &PriceHistory, style: ChartStyle, title: &str) -> Figure {
    let x = history.dates();
    let trace = match style {
        ChartStyle::Line => Trace::Line {
            x,
            y: history.closes(),
            fill_to_zero: false,
        },
        ChartStyle::Area => Trace::Line {
            x,
            y: history.closes(),
            fill_to_zero: true,
        },
        ChartStyle::Bar => Trace::Bar {
            x,
            y: history.closes(),
        },
        ChartStyle::Candlestick => {
            let bars = history.bars();
            Trace::Candlestick {
                x,
                open: bars.iter().map(|b| b.open).collect(),
                high: bars.iter().map(|b| b.high).collect(),
                low: bars.iter().map(|b| b.low).collect(),
                close: bars.iter().map(|b| b.close).collect(),
            }
        }
    };

    Figure {
        title: title.to_string(),
        x_label: Some("Date".to_string()),
        y_label: Some("Price".to_string()),
        traces: vec![trace],
    }
}
