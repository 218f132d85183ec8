//! Renders a page of directives as a standalone HTML document with inline SVG figures.

use super::page::{Directive, PAGE_TITLE, TableData};
use crate::chart::svg::escape;
use anyhow::{Context, Result};
use std::fmt::Write;
use std::path::Path;

const STYLE: &str = "body{font-family:sans-serif;margin:2em;color:#222}\
table{border-collapse:collapse;margin:0.5em 0}\
th,td{border:1px solid #ccc;padding:4px 8px;text-align:left}\
th{background:#eef4fb}\
.scroll{max-height:24em;overflow-y:auto;display:inline-block}\
.figure{margin:1em 0}";

fn table(data: &TableData) -> String {
    let mut out = String::from("<div class=\"scroll\"><table><thead><tr>");
    for h in &data.header {
        let _ = write!(out, "<th>{}</th>", escape(h));
    }
    out.push_str("</tr></thead><tbody>");
    for row in &data.rows {
        out.push_str("<tr>");
        for value in row {
            let _ = write!(out, "<td>{}</td>", escape(value));
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table></div>");
    out
}

pub fn render(page: &[Directive]) -> String {
    let mut body = String::new();
    for directive in page {
        let _ = match directive {
            Directive::Title(text) => writeln!(body, "<h1>{}</h1>", escape(text)),
            Directive::Text(text) => writeln!(body, "<p>{}</p>", escape(text)),
            Directive::Heading(text) => writeln!(body, "<h2>{}</h2>", escape(text)),
            Directive::Table(data) => writeln!(body, "{}", table(data)),
            Directive::Figure(figure) => {
                writeln!(body, "<div class=\"figure\">{}</div>", figure.to_svg())
            }
        };
    }
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{PAGE_TITLE}</title>\n\
         <style>{STYLE}</style>\n</head>\n<body>\n{body}</body>\n</html>\n"
    )
}

pub fn write_report<P: AsRef<Path>>(page: &[Directive], path: P) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, render(page))
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    tracing::info!("Wrote report to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Figure, Trace};
    use tempfile::TempDir;

    fn sample_page() -> Vec<Directive> {
        vec![
            Directive::Title("Stock Viewer".to_string()),
            Directive::Text("Displaying data for M&M.NS".to_string()),
            Directive::Table(TableData {
                header: vec!["Field".to_string(), "Value".to_string()],
                rows: vec![vec!["Company Name".to_string(), "<Acme>".to_string()]],
                tail: false,
            }),
            Directive::Heading("Stock Holding Pattern".to_string()),
            Directive::Figure(Figure {
                title: "Stock Holding Pattern".to_string(),
                x_label: None,
                y_label: None,
                traces: vec![Trace::Pie {
                    labels: vec!["Institutional Holdings".to_string()],
                    values: vec![1.0],
                    hole: 0.3,
                }],
            }),
        ]
    }

    #[test]
    fn test_render_escapes_and_embeds_figures() {
        let html = render(&sample_page());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>Stock Viewer</h1>"));
        assert!(html.contains("<p>Displaying data for M&amp;M.NS</p>"));
        assert!(html.contains("<td>&lt;Acme&gt;</td>"));
        assert!(html.contains("<h2>Stock Holding Pattern</h2>"));
        assert!(html.contains("<svg"));
    }

    #[test]
    fn test_directive_order_is_preserved() {
        let html = render(&sample_page());
        let title = html.find("<h1>").unwrap();
        let table = html.find("<table>").unwrap();
        let figure = html.find("<svg").unwrap();
        assert!(title < table && table < figure);
    }

    #[test]
    fn test_write_report() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("report.html");

        write_report(&sample_page(), &path)?;

        let content = std::fs::read_to_string(&path)?;
        assert!(content.contains("</html>"));
        Ok(())
    }
}
