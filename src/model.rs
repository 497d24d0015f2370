use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// Column names of the per-file report, in output order.
pub const REPORT_COLUMNS: [&str; 5] = [
    "filename",
    "lines of code",
    "number of commits",
    "date of first commit",
    "date of last commit",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    pub lines_of_code: u64,
    pub commit_count: usize,
    pub first_commit: String,
    pub last_commit: String,
}

impl FileRecord {
    pub fn to_row(&self) -> [String; 5] {
        [
            self.path.clone(),
            self.lines_of_code.to_string(),
            self.commit_count.to_string(),
            self.first_commit.clone(),
            self.last_commit.clone(),
        ]
    }
}

/// A table with `N` named columns where every row has exactly `N` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table<const N: usize> {
    columns: [&'static str; N],
    rows: Vec<[String; N]>,
}

impl<const N: usize> Table<N> {
    pub fn new(columns: [&'static str; N]) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: [String; N]) {
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[&'static str; N] {
        &self.columns
    }

    pub fn rows(&self) -> &[[String; N]] {
        &self.rows
    }
}

/// The per-file report: one row per [`FileRecord`] under [`REPORT_COLUMNS`].
pub type ReportTable = Table<5>;

impl ReportTable {
    pub fn from_records(records: &[FileRecord]) -> Self {
        let mut table = Self::new(REPORT_COLUMNS);
        for record in records {
            table.push(record.to_row());
        }
        table
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository: String,
    pub extensions: Vec<String>,
    pub files: Vec<FileRecord>,
}

impl ReportOutput {
    pub fn new(repository: &str, extensions: &[String], files: Vec<FileRecord>) -> Self {
        Self {
            version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            repository: repository.to_string(),
            extensions: extensions.to_vec(),
            files,
        }
    }
}
