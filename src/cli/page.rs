//! Ordered display directives for one render, independent of the output sink.

use super::dashboard::Render;
use crate::chart::Figure;

pub const PAGE_TITLE: &str = "Stock Viewer";

#[derive(Debug, Clone, PartialEq)]
pub struct TableData {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Sinks with limited room may show only the most recent rows.
    pub tail: bool,
}

impl TableData {
    fn new(header: &[&str], rows: Vec<Vec<String>>) -> Self {
        Self {
            header: header.iter().map(|h| h.to_string()).collect(),
            rows,
            tail: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Title(String),
    Text(String),
    Heading(String),
    Table(TableData),
    Figure(Figure),
}

fn price_table(render: &Render) -> TableData {
    let rows = render
        .history
        .bars()
        .iter()
        .map(|b| {
            vec![
                b.date.format("%Y-%m-%d").to_string(),
                format!("{:.2}", b.open),
                format!("{:.2}", b.high),
                format!("{:.2}", b.low),
                format!("{:.2}", b.close),
                b.volume.to_string(),
            ]
        })
        .collect();
    TableData {
        tail: true,
        ..TableData::new(&["Date", "Open", "High", "Low", "Close", "Volume"], rows)
    }
}

fn fundamentals_table(render: &Render) -> TableData {
    let rows = render
        .fundamentals
        .iter()
        .map(|(field, value)| vec![field.label().to_string(), value.to_string()])
        .collect();
    TableData::new(&["Field", "Value"], rows)
}

fn pros_cons_table(render: &Render) -> TableData {
    let rows = render
        .pros_cons
        .rows()
        .into_iter()
        .map(|(kind, text)| vec![kind.to_string(), text.to_string()])
        .collect();
    TableData::new(&["Type", "Description"], rows)
}

/// Lays out a render in its fixed order: price data and chart, fundamentals,
/// holding pattern, then pros and cons.
pub fn build(render: &Render) -> Vec<Directive> {
    let symbol = &render.selection.symbol;
    vec![
        Directive::Title(PAGE_TITLE.to_string()),
        Directive::Text(format!("Displaying data for {symbol}")),
        Directive::Table(price_table(render)),
        Directive::Heading(format!("Price Chart for {symbol}")),
        Directive::Figure(render.price_chart.clone()),
        Directive::Heading(format!("Fundamental Details for {symbol}")),
        Directive::Table(fundamentals_table(render)),
        Directive::Heading("Stock Holding Pattern".to_string()),
        Directive::Figure(render.holdings_chart.clone()),
        Directive::Heading(format!("Pros and Cons for {symbol}")),
        Directive::Table(pros_cons_table(render)),
    ]
}
