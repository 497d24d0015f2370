use crate::error::{RepoTableError, Result};
use crate::model::Table;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Encode a table as CSV: header line, then one line per row.
///
/// Fields are quoted only when they contain a separator, a quote or a line break.
pub fn encode<const N: usize>(table: &Table<N>) -> Result<String> {
    let mut writer = ::csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(Vec::new());
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| RepoTableError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| RepoTableError::Parse(format!("CSV is not UTF-8: {e}")))
}

/// Replace `path` with `contents` via a temporary sibling file and a rename.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn encodes_header_and_rows() {
        let mut table = Table::new(["a", "b"]);
        table.push(["1".into(), "2".into()]);
        table.push(["3".into(), "4".into()]);
        assert_eq!(encode(&table).unwrap(), "a,b\n1,2\n3,4\n");
    }

    #[test]
    fn header_only_table() {
        let table = Table::new(["filename", "lines of code"]);
        assert_eq!(encode(&table).unwrap(), "filename,lines of code\n");
    }

    #[test]
    fn quotes_fields_with_separators() {
        let mut table = Table::new(["name", "note"]);
        table.push(["a,b.go".into(), "say \"hi\"".into()]);
        table.push(["two\nlines".into(), "plain".into()]);
        assert_eq!(
            encode(&table).unwrap(),
            "name,note\n\"a,b.go\",\"say \"\"hi\"\"\"\n\"two\nlines\",plain\n"
        );
    }

    #[test]
    fn empty_dates_stay_unquoted() {
        let mut table = Table::new(["filename", "first", "last"]);
        table.push(["new.go".into(), String::new(), String::new()]);
        assert_eq!(encode(&table).unwrap(), "filename,first,last\nnew.go,,\n");
    }

    #[test]
    fn write_atomic_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.csv");
        std::fs::write(&path, "old contents that are longer\n").unwrap();
        write_atomic(&path, "a,b\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a,b\n");
    }

    #[test]
    fn write_atomic_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("output.csv");
        assert!(write_atomic(&path, "a\n").is_err());
    }
}
