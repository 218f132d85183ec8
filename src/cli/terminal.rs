//! Renders a page of directives as styled terminal text.

use super::page::{Directive, TableData};
use super::ui::{StyleType, header_cell, new_styled_table, style_text, value_cell};
use crate::chart::{Figure, Trace};
use std::fmt::Write;

/// One-line description of a figure, since the terminal cannot draw it.
pub fn figure_summary(figure: &Figure) -> String {
    let Some(trace) = figure.traces.first() else {
        return format!("{}: no data", figure.title);
    };
    match trace {
        Trace::Pie { labels, values, .. } => labels
            .iter()
            .zip(values)
            .map(|(label, value)| format!("{label}: {:.2}%", value * 100.0))
            .collect::<Vec<_>>()
            .join(" | "),
        Trace::Line { x, y, fill_to_zero } => {
            let kind = if *fill_to_zero { "Area" } else { "Line" };
            series_summary(kind, x, y)
        }
        Trace::Bar { x, y } => series_summary("Bar", x, y),
        Trace::Candlestick { x, close, .. } => series_summary("Candlestick", x, close),
    }
}

fn series_summary(kind: &str, x: &[chrono::NaiveDate], y: &[f64]) -> String {
    match (x.first(), x.last(), y.first(), y.last()) {
        (Some(from), Some(to), Some(first), Some(last)) => format!(
            "{kind} chart of {} points from {from} to {to}, close {first:.2} to {last:.2}",
            x.len()
        ),
        _ => format!("{kind} chart: no data"),
    }
}

fn table(data: &TableData, max_rows: usize) -> String {
    let mut table = new_styled_table();
    table.set_header(data.header.iter().map(|h| header_cell(h)));

    let skip = if data.tail {
        data.rows.len().saturating_sub(max_rows)
    } else {
        0
    };
    for row in &data.rows[skip..] {
        table.add_row(row.iter().map(|v| value_cell(v)));
    }

    let mut out = table.to_string();
    if skip > 0 {
        let note = format!("Showing last {} of {} rows", max_rows, data.rows.len());
        out.push('\n');
        out.push_str(&style_text(&note, StyleType::Subtle));
    }
    out
}

/// Tail tables longer than `max_rows` show only their most recent rows; all
/// other tables are shown whole.
pub fn render(page: &[Directive], max_rows: usize) -> String {
    let mut out = String::new();
    for directive in page {
        let _ = match directive {
            Directive::Title(text) => writeln!(out, "{}\n", style_text(text, StyleType::Title)),
            Directive::Text(text) => writeln!(out, "{text}"),
            Directive::Heading(text) => {
                writeln!(out, "\n{}", style_text(text, StyleType::Heading))
            }
            Directive::Table(data) => writeln!(out, "{}", table(data, max_rows)),
            Directive::Figure(figure) => writeln!(
                out,
                "{}",
                style_text(&figure_summary(figure), StyleType::Subtle)
            ),
        };
    }
    out
}
