use super::ui;
use crate::core::InstrumentCatalog;
use anyhow::Result;
use comfy_table::{Cell, CellAlignment};

/// Table of every index with its instrument count.
pub fn indices_table(catalog: &InstrumentCatalog) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Index"), ui::header_cell("Stocks")]);
    for listing in catalog.listings() {
        table.add_row(vec![
            Cell::new(&listing.name),
            Cell::new(listing.symbols.len()).set_alignment(CellAlignment::Right),
        ]);
    }
    table.to_string()
}

/// Numbered table of the instruments in `index`, in catalog order.
pub fn stocks_table(catalog: &InstrumentCatalog, index: &str) -> Result<String> {
    let symbols = catalog.instruments(index)?;

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("#"), ui::header_cell("Symbol")]);
    for (i, symbol) in symbols.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1).set_alignment(CellAlignment::Right),
            Cell::new(symbol),
        ]);
    }

    Ok(format!(
        "{}\n\n{}",
        ui::style_text(index, ui::StyleType::Title),
        table
    ))
}
