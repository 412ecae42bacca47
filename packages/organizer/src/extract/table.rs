//! Markdown rendering of table grids.

/// Markdown emitted for a table without any cells.
pub const EMPTY_TABLE: &str = "| Tabla vacía |\n| --- |\n";

/// Render a grid of cell texts as a Markdown pipe table.
///
/// Row 0 is the header. A header without any text is replaced by
/// "Columna 1..N" (N = widest row) and every row is kept as data. Data rows
/// are padded with empty cells or truncated to the header width.
///
/// # Examples
/// ```
/// use normas_organizer::extract::render_table;
///
/// let grid = vec![
///     vec!["Meta".to_string(), "Valor".to_string()],
///     vec!["Cobertura".to_string(), "95%".to_string()],
/// ];
/// assert_eq!(
///     render_table(&grid),
///     "| Meta | Valor |\n| --- | --- |\n| Cobertura | 95% |\n"
/// );
/// ```
#[must_use]
pub fn render_table(grid: &[Vec<String>]) -> String {
    let rows: Vec<Vec<String>> = grid
        .iter()
        .map(|row| row.iter().map(|cell| clean_cell(cell)).collect())
        .collect();

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    if width == 0 {
        return EMPTY_TABLE.to_string();
    }

    let header_is_blank = rows[0].iter().all(String::is_empty);
    let (header, data): (Vec<String>, &[Vec<String>]) = if header_is_blank {
        let synthetic = (1..=width).map(|j| format!("Columna {j}")).collect();
        (synthetic, &rows[..])
    } else {
        (rows[0].clone(), &rows[1..])
    };

    let columns = header.len();
    let mut out = String::new();
    push_row(&mut out, &header);
    push_row(&mut out, &vec!["---".to_string(); columns]);
    for row in data {
        let mut cells: Vec<String> = row.iter().take(columns).cloned().collect();
        cells.resize(columns, String::new());
        push_row(&mut out, &cells);
    }
    out
}

fn clean_cell(cell: &str) -> String {
    cell.trim().replace('|', "\\|").replace('\n', " <br> ")
}

fn push_row(out: &mut String, cells: &[String]) {
    out.push('|');
    for cell in cells {
        out.push(' ');
        out.push_str(cell);
        out.push_str(" |");
    }
    out.push('\n');
}
