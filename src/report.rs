use comfy_table::presets::ASCII_FULL;
use comfy_table::CellAlignment;
use comfy_table::Row;
use comfy_table::Table;

/// Builds a full-grid table with the given header. Columns listed in `right_aligned` are aligned to the right.
pub fn grid<H, R>(header: H, rows: R, right_aligned: &[usize]) -> Table
where
    H: Into<Row>,
    R: IntoIterator,
    R::Item: Into<Row>,
{
    let mut table = Table::new();
    table.load_preset(ASCII_FULL).set_header(header);

    for row in rows {
        table.add_row(row);
    }

    for col in right_aligned {
        if let Some(column) = table.column_mut(*col) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }

    table
}

pub fn money(amount: f64) -> String {
    format!("{amount:.2}")
}
