//! Sync report table.

use crate::models::media::SyncRow;

const HEADERS: [&str; 3] = ["EPISODE", "NAME", "FILENAME"];

/// Render rows as a bordered table.
pub fn render_table(rows: &[SyncRow]) -> String {
    let cells: Vec<[&str; 3]> = rows
        .iter()
        .map(|r| [r.label.as_str(), r.title.as_str(), r.filename.as_str()])
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = format!(
        "+{}+",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );
    let line = |row: &[&str; 3]| {
        let padded: Vec<String> = row
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!(" {:<width$} ", cell, width = *width))
            .collect();
        format!("|{}|", padded.join("|"))
    };

    let mut out = String::new();
    out.push_str(&border);
    out.push('\n');
    out.push_str(&line(&HEADERS));
    out.push('\n');
    out.push_str(&border);
    out.push('\n');
    for row in &cells {
        out.push_str(&line(row));
        out.push('\n');
    }
    out.push_str(&border);
    out.push('\n');
    out
}

/// Print rows as a table on stdout.
pub fn print_table(rows: &[SyncRow]) {
    print!("{}", render_table(rows));
}
