//! Interactive session: pick an index, a stock and a chart style, then keep
//! changing any of them. Every change re-runs the whole pipeline.

use super::dashboard::{Dashboard, Selection};
use super::{page, terminal, ui};
use crate::chart::ChartStyle;
use crate::core::config::AppConfig;
use crate::core::{InstrumentCatalog, MarketDataProvider};
use anyhow::Result;
use std::io::{self, BufRead, Write};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ChangeIndex,
    ChangeStock,
    ChangeChart,
    Quit,
}

/// Resolves a 1-based number or an exact option name to an option position.
pub fn parse_choice<S: AsRef<str>>(input: &str, options: &[S]) -> Option<usize> {
    let input = input.trim();
    if let Ok(n) = input.parse::<usize>() {
        return (1..=options.len()).contains(&n).then(|| n - 1);
    }
    options.iter().position(|o| o.as_ref() == input)
}

/// Empty input quits, so a closed stdin ends the session.
pub fn parse_action(input: &str) -> Option<Action> {
    match input.trim().to_lowercase().as_str() {
        "i" | "index" => Some(Action::ChangeIndex),
        "s" | "stock" => Some(Action::ChangeStock),
        "c" | "chart" => Some(Action::ChangeChart),
        "q" | "quit" | "" => Some(Action::Quit),
        _ => None,
    }
}

/// Line-oriented prompts over any input and output pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Reads one line. End of input reads as an empty line.
    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line)
    }

    /// Prompts until a valid choice is entered. `None` means the user quit.
    fn choice<S: AsRef<str>>(&mut self, label: &str, options: &[S]) -> Result<Option<usize>> {
        writeln!(self.output, "{}", ui::style_text(label, ui::StyleType::Heading))?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "  {:>2}. {}", i + 1, option.as_ref())?;
        }
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;
            let input = self.read_line()?;
            if input.trim().is_empty() {
                return Ok(None);
            }
            match parse_choice(&input, options) {
                Some(choice) => return Ok(Some(choice)),
                None => writeln!(
                    self.output,
                    "{}",
                    ui::style_text(
                        &format!("Invalid choice: {}", input.trim()),
                        ui::StyleType::Error
                    )
                )?,
            }
        }
    }

    fn action(&mut self) -> Result<Action> {
        loop {
            write!(self.output, "[i]ndex  [s]tock  [c]hart  [q]uit > ")?;
            self.output.flush()?;
            let input = self.read_line()?;
            if let Some(action) = parse_action(&input) {
                return Ok(action);
            }
        }
    }

    fn index(&mut self, catalog: &InstrumentCatalog) -> Result<Option<String>> {
        let names = catalog.index_names();
        Ok(self
            .choice("Select an Index", &names)?
            .map(|i| names[i].to_string()))
    }

    fn stock(&mut self, catalog: &InstrumentCatalog, index: &str) -> Result<Option<String>> {
        let symbols = catalog.instruments(index)?;
        Ok(self
            .choice("Select a Stock", symbols)?
            .map(|i| symbols[i].clone()))
    }

    fn style(&mut self) -> Result<Option<ChartStyle>> {
        let labels = ChartStyle::ALL.map(|s| s.label());
        Ok(self
            .choice("Select Chart Type", &labels)?
            .map(|i| ChartStyle::ALL[i]))
    }

    /// Renders `selection`, or the dashboard's error when the pipeline fails.
    async fn show(
        &mut self,
        dashboard: &mut Dashboard<'_>,
        selection: Selection,
        history_rows: usize,
    ) -> Result<()> {
        let spinner = ui::new_spinner(format!("Fetching data for {}", selection.symbol));
        let page = dashboard.select(selection).await.map(page::build);
        spinner.finish_and_clear();

        writeln!(self.output, "\n{}", ui::separator())?;
        match page {
            Ok(page) => writeln!(self.output, "{}", terminal::render(&page, history_rows))?,
            Err(e) => {
                let message = dashboard
                    .last_error()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{e:#}"));
                writeln!(
                    self.output,
                    "{}",
                    ui::style_text(&format!("Error: {message}"), ui::StyleType::Error)
                )?
            }
        }
        Ok(())
    }

    /// Runs the session until the user quits or the input ends.
    pub async fn session(
        &mut self,
        catalog: &InstrumentCatalog,
        dashboard: &mut Dashboard<'_>,
        history_rows: usize,
    ) -> Result<()> {
        let Some(mut index) = self.index(catalog)? else {
            return Ok(());
        };
        let Some(mut symbol) = self.stock(catalog, &index)? else {
            return Ok(());
        };
        let Some(mut style) = self.style()? else {
            return Ok(());
        };

        loop {
            let selection = Selection {
                index: index.clone(),
                symbol: symbol.clone(),
                style,
            };
            self.show(dashboard, selection, history_rows).await?;

            let action = self.action()?;
            debug!(?action, "Browse action");
            match action {
                Action::ChangeIndex => {
                    let Some(new_index) = self.index(catalog)? else {
                        break;
                    };
                    let Some(new_symbol) = self.stock(catalog, &new_index)? else {
                        break;
                    };
                    index = new_index;
                    symbol = new_symbol;
                }
                Action::ChangeStock => match self.stock(catalog, &index)? {
                    Some(new_symbol) => symbol = new_symbol,
                    None => break,
                },
                Action::ChangeChart => match self.style()? {
                    Some(new_style) => style = new_style,
                    None => break,
                },
                Action::Quit => break,
            }
        }
        Ok(())
    }
}

pub async fn run(
    catalog: &InstrumentCatalog,
    provider: &dyn MarketDataProvider,
    config: &AppConfig,
) -> Result<()> {
    let mut dashboard = Dashboard::new(catalog, provider, config.period);
    let mut prompter = Prompter::new(io::stdin().lock(), io::stdout());
    prompter
        .session(catalog, &mut dashboard, config.history_rows)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::dashboard::tests::{MockProvider, catalog, provider};
    use crate::core::LookbackPeriod;
    use crate::core::config::IndexConfig;

    /// Feeds `script` to a session and returns the calls made and the plain-text output.
    async fn browse(
        catalog: &InstrumentCatalog,
        provider: &MockProvider,
        script: &str,
    ) -> (Vec<String>, String) {
        let mut dashboard = Dashboard::new(catalog, provider, LookbackPeriod::FiveYears);
        let mut out = Vec::new();
        Prompter::new(script.as_bytes(), &mut out)
            .session(catalog, &mut dashboard, 10)
            .await
            .unwrap();
        let out = console::strip_ansi_codes(&String::from_utf8(out).unwrap()).to_string();
        (provider.calls.lock().unwrap().clone(), out)
    }

    #[test]
    fn test_parse_choice_by_number_and_name() {
        let options = ["NIFTY 50", "NIFTY NEXT 50"];
        assert_eq!(parse_choice("1", &options), Some(0));
        assert_eq!(parse_choice(" 2 \n", &options), Some(1));
        assert_eq!(parse_choice("NIFTY NEXT 50", &options), Some(1));
        assert_eq!(parse_choice("0", &options), None);
        assert_eq!(parse_choice("3", &options), None);
        assert_eq!(parse_choice("nifty 50", &options), None);
    }

    #[test]
    fn test_parse_choice_with_owned_options() {
        let options = vec!["RELIANCE.NS".to_string(), "TCS.NS".to_string()];
        assert_eq!(parse_choice("TCS.NS", &options), Some(1));
    }

    #[test]
    fn test_parse_action() {
        assert_eq!(parse_action("i"), Some(Action::ChangeIndex));
        assert_eq!(parse_action("Stock"), Some(Action::ChangeStock));
        assert_eq!(parse_action("c\n"), Some(Action::ChangeChart));
        assert_eq!(parse_action(""), Some(Action::Quit));
        assert_eq!(parse_action("x"), None);
    }

    #[tokio::test]
    async fn test_session_switches_stock() {
        let catalog = catalog();
        let provider = provider();

        let (calls, out) = browse(&catalog, &provider, "1\n1\n1\ns\n2\nq\n").await;

        assert_eq!(
            calls,
            vec![
                "history:AAA:5y",
                "fundamentals:AAA",
                "history:BBB:5y",
                "fundamentals:BBB"
            ]
        );
        let alpha = out.find("Displaying data for AAA").unwrap();
        let beta = out.find("Displaying data for BBB").unwrap();
        assert!(alpha < beta);
        assert!(out.contains("Alpha Corp"));
        assert!(out.contains("Beta Corp"));
        assert_eq!(out.matches("Select a Stock").count(), 2);
    }

    #[tokio::test]
    async fn test_session_recovers_after_error_and_reprompts_stock_on_index_change() {
        let catalog = InstrumentCatalog::from_config(&[
            IndexConfig {
                name: "Test 3".to_string(),
                symbols: vec!["AAA".to_string(), "BBB".to_string(), "BAD".to_string()],
            },
            IndexConfig {
                name: "Other".to_string(),
                symbols: vec!["GONE".to_string(), "BBB".to_string()],
            },
        ]);
        let provider = provider();

        // Input ends after the chart change, which quits.
        let (calls, out) = browse(&catalog, &provider, "1\n3\n1\ni\n2\n2\nc\n2\n").await;

        assert_eq!(
            calls,
            vec![
                "history:BAD:5y",
                "fundamentals:BAD",
                "history:BBB:5y",
                "fundamentals:BBB",
                "history:BBB:5y",
                "fundamentals:BBB"
            ]
        );
        let error = out
            .find("Error: Beta holds a non-numeric value: volatile")
            .unwrap();
        let recovered = out.find("Displaying data for BBB").unwrap();
        assert!(error < recovered);
        assert_eq!(out.matches("Select an Index").count(), 2);
        assert_eq!(out.matches("Select a Stock").count(), 2);
        assert!(out.contains("Line chart of 3 points"));
        assert!(out.contains("Candlestick chart of 3 points"));
    }

    #[tokio::test]
    async fn test_session_ends_on_empty_input() {
        let catalog = catalog();
        let provider = provider();

        let (calls, out) = browse(&catalog, &provider, "").await;
        assert!(calls.is_empty());
        assert!(out.contains("Select an Index"));
        assert!(!out.contains("Select a Stock"));

        let (calls, out) = browse(&catalog, &provider, "9\nTest 3\n\n").await;
        assert!(calls.is_empty());
        assert!(out.contains("Invalid choice: 9"));
        assert!(out.contains("Select a Stock"));
        assert!(!out.contains("Select Chart Type"));
    }
}
