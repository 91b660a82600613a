//! Table output for trajectory and pose listings

use prettytable::{Cell, Row, Table};

/// Table with bold column titles and no separators between rows
pub fn create_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_format(*prettytable::format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    let titles: Vec<Cell> = headers
        .iter()
        .map(|h| Cell::new(h).style_spec("b"))
        .collect();
    table.set_titles(Row::new(titles));
    table
}

/// Append a row; numeric cells (optionally followed by a unit) are right-aligned
pub fn add_table_row(table: &mut Table, cells: Vec<String>) {
    let row: Vec<Cell> = cells
        .iter()
        .map(|text| {
            let cell = Cell::new(text);
            if is_numeric(text) {
                cell.style_spec("r")
            } else {
                cell
            }
        })
        .collect();
    table.add_row(Row::new(row));
}

/// `12.5`, `-3.00 m/s` and `90.0°` count as numbers; ids and flags do not
fn is_numeric(text: &str) -> bool {
    text.split_whitespace()
        .next()
        .is_some_and(|value| value.trim_end_matches('°').parse::<f64>().is_ok())
}
