pub const EMPTY_SHEET_MARKER: &str = "*empty sheet*";

/// Renders spreadsheet rows as a pipe table. The first row is the header;
/// a sheet with no data rows renders as [`EMPTY_SHEET_MARKER`].
pub fn render_table(rows: &[Vec<String>]) -> String {
    let Some((header, body)) = rows.split_first() else {
        return EMPTY_SHEET_MARKER.to_string();
    };
    if body.is_empty() {
        return EMPTY_SHEET_MARKER.to_string();
    }

    let width = rows.iter().map(Vec::len).max().unwrap_or(0).max(1);

    let header_cells: Vec<String> = (0..width)
        .map(|i| match header.get(i).map(|c| c.trim()) {
            Some(cell) if !cell.is_empty() => escape_cell(cell),
            _ => format!("Column_{i}"),
        })
        .collect();

    let mut lines = Vec::with_capacity(body.len() + 2);
    lines.push(format!("| {} |", header_cells.join(" | ")));
    lines.push(format!("|{}|", vec!["---"; width].join("|")));

    for row in body {
        let cells: Vec<String> = (0..width)
            .map(|i| row.get(i).map(|c| escape_cell(c.trim())).unwrap_or_default())
            .collect();
        lines.push(format!("| {} |", cells.join(" | ")));
    }

    lines.join("\n")
}

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|").replace(|c: char| c == '\r' || c == '\n', " ")
}
