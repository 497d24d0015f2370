pub mod csv;
pub mod html;

pub use self::csv::{encode as encode_csv, write_atomic};
pub use self::html::{csv_to_html_table, page, render_table};
