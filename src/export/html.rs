//! HTML rendering of report tables.

use crate::model::Table;
use std::fmt::Write;

/// Inline style block placed in front of every rendered table.
pub const STYLE: &str = r#"
<style>
    table {
        border-collapse: collapse;
        width: 80%;
        margin: 50px auto;
        font-family: Arial, sans-serif;
    }
    th, td {
        border: 1px solid #ddd;
        padding: 15px;
        text-align: left;
    }
    th {
        background-color: #f2f2f2;
    }
    tr:hover {
        background-color: #f5f5f5;
    }
</style>
"#;

/// Style block followed by the table markup.
pub fn page(table_html: &str) -> String {
    format!("{STYLE}{table_html}")
}

/// Render a structured table. Every cell is escaped.
pub fn render_table<const N: usize>(table: &Table<N>) -> String {
    let mut out = String::new();
    write_table(
        &mut out,
        table.columns().iter().copied(),
        table
            .rows()
            .iter()
            .map(|row| row.iter().map(String::as_str).collect::<Vec<_>>()),
    );
    out
}

/// Render CSV text as a table by splitting lines on `\n` and cells on `,`.
///
/// Naive renderer for plain CSV text; served reports go through [`render_table`].
///
/// The first line is the header. Quoting is not understood: a field that
/// contains a comma is split into two cells and shifts the rest of its row.
pub fn csv_to_html_table(csv: &str) -> String {
    let mut lines = csv.split('\n');
    let header = lines.next().unwrap_or_default();
    let mut out = String::new();
    write_table(
        &mut out,
        header.split(','),
        lines.map(|line| line.split(',').collect::<Vec<_>>()),
    );
    out
}

fn write_table<'h, 'r, H, R>(out: &mut String, header: H, rows: R)
where
    H: Iterator<Item = &'h str>,
    R: Iterator<Item = Vec<&'r str>>,
{
    out.push_str("<table border='1'><thead><tr>");
    for cell in header {
        let _ = write!(out, "<th>{}</th>", html_escape(cell));
    }
    out.push_str("</tr></thead><tbody>");
    for row in rows {
        out.push_str("<tr>");
        for cell in row {
            let _ = write!(out, "<td>{}</td>", html_escape(cell));
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn csv_header_and_rows() {
        assert_eq!(
            csv_to_html_table("a,b\n1,2\n3,4"),
            "<table border='1'><thead><tr><th>a</th><th>b</th></tr></thead>\
             <tbody><tr><td>1</td><td>2</td></tr><tr><td>3</td><td>4</td></tr></tbody></table>"
        );
    }

    #[test]
    fn header_only_csv_has_empty_body() {
        assert_eq!(
            csv_to_html_table("a,b"),
            "<table border='1'><thead><tr><th>a</th><th>b</th></tr></thead><tbody></tbody></table>"
        );
    }

    #[test]
    fn comma_in_filename_shifts_columns() {
        let csv = "filename,lines of code,number of commits,date of first commit,date of last commit\n\
                   a,b.go,12,3,Jan 1 2024,Mar 8 2024";
        let html = csv_to_html_table(csv);
        assert!(html.contains(
            "<tr><td>a</td><td>b.go</td><td>12</td><td>3</td>\
             <td>Jan 1 2024</td><td>Mar 8 2024</td></tr>"
        ));
        assert_eq!(html.matches("<th>").count(), 5);
        assert_eq!(html.matches("<td>").count(), 6);
    }

    #[test]
    fn structured_table_keeps_commas_and_escapes_markup() {
        let mut table = Table::new(["filename", "note"]);
        table.push(["a,b.go".into(), "<script>&".into()]);
        assert_eq!(
            render_table(&table),
            "<table border='1'><thead><tr><th>filename</th><th>note</th></tr></thead>\
             <tbody><tr><td>a,b.go</td><td>&lt;script&gt;&amp;</td></tr></tbody></table>"
        );
    }

    #[test]
    fn page_prefixes_style() {
        let html = page("<table></table>");
        assert!(html.starts_with("\n<style>"));
        assert!(html.ends_with("</style>\n<table></table>"));
    }
}
