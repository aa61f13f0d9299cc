use crate::error::Result;
use crate::model::{AuthorRow, Format};
use std::io::Write;

const HEADERS: [&str; 4] = ["Name", "Lines", "Commits", "Files"];

pub fn render(rows: &[AuthorRow], format: Format) -> Result<String> {
    match format {
        Format::Tabular => Ok(render_table(rows)),
        Format::Csv => Ok(render_csv(rows)),
        Format::Json => render_json(rows),
        Format::JsonLines => render_json_lines(rows),
    }
}

pub fn write_report<W: Write>(out: &mut W, rows: &[AuthorRow], format: Format) -> Result<()> {
    out.write_all(render(rows, format)?.as_bytes())?;
    out.flush()?;
    Ok(())
}

fn cells(row: &AuthorRow) -> [String; 4] {
    [
        row.name.clone(),
        row.lines.to_string(),
        row.commits.to_string(),
        row.files.to_string(),
    ]
}

/// Left-aligned columns separated by one space; the last column is not padded.
fn render_table(rows: &[AuthorRow]) -> String {
    let body: Vec<[String; 4]> = rows.iter().map(cells).collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for line in &body {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_table_line(&mut out, &HEADERS.map(String::from), &widths);
    for line in &body {
        push_table_line(&mut out, line, &widths);
    }
    out
}

fn push_table_line(out: &mut String, line: &[String; 4], widths: &[usize; 4]) {
    let last = line.len() - 1;
    for (i, (cell, &width)) in line.iter().zip(widths).enumerate() {
        if i == last {
            out.push_str(cell);
        } else {
            out.push_str(&format!("{cell:<width$} "));
        }
    }
    out.push('\n');
}

fn render_csv(rows: &[AuthorRow]) -> String {
    let mut out = String::new();
    push_csv_record(&mut out, &HEADERS.map(String::from));
    for row in rows {
        push_csv_record(&mut out, &cells(row));
    }
    out
}

fn push_csv_record(out: &mut String, fields: &[String]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if needs_quotes(field) {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(field);
        }
    }
    out.push('\n');
}

/// Same rule as Go's `encoding/csv`: separators, quotes and line breaks,
/// leading whitespace, and the lone `\.` end-of-data marker.
fn needs_quotes(field: &str) -> bool {
    field == r"\."
        || field.contains([',', '"', '\n', '\r'])
        || field.starts_with(char::is_whitespace)
}

fn render_json(rows: &[AuthorRow]) -> Result<String> {
    let mut out = serde_json::to_string_pretty(rows)?;
    out.push('\n');
    Ok(out)
}

fn render_json_lines(rows: &[AuthorRow]) -> Result<String> {
    let mut out = String::new();
    for row in rows {
        out.push_str(&serde_json::to_string(row)?);
        out.push('\n');
    }
    Ok(out)
}
