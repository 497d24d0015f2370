/// Marker of the author date line in default `git log` output.
pub const DATE_MARKER: &str = "Date:";

/// Turn a `git log` date line into `"<month> <day> <year>"`.
///
/// `Date:   Tue Mar 5 14:02:11 2024 +0100` becomes `Mar 5 2024`. Lines with
/// fewer than six whitespace-separated tokens give an empty string.
pub fn parse_date(date_line: &str) -> String {
    let parts: Vec<&str> = date_line.split_whitespace().collect();
    if parts.len() >= 6 {
        format!("{} {} {}", parts[2], parts[3], parts[5])
    } else {
        String::new()
    }
}

/// Date lines of one file's history, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitHistory {
    lines: Vec<String>,
}

impl CommitHistory {
    /// Build from already-filtered history text, one date line per commit.
    ///
    /// Splitting is on `\n` with no filtering, so empty text still yields one
    /// (empty) line.
    pub fn from_history(history: &str) -> Self {
        Self {
            lines: history.split('\n').map(str::to_string).collect(),
        }
    }

    /// Build from raw `git log` output, keeping only the date lines.
    pub fn from_log_output(log: &str) -> Self {
        let filtered = log
            .lines()
            .filter(|line| line.contains(DATE_MARKER))
            .map(str::trim)
            .collect::<Vec<_>>()
            .join("\n");
        Self::from_history(&filtered)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn commit_count(&self) -> usize {
        self.lines.len()
    }

    /// Date of the oldest commit.
    pub fn first_commit(&self) -> String {
        self.lines.last().map(|l| parse_date(l)).unwrap_or_default()
    }

    /// Date of the newest commit.
    pub fn last_commit(&self) -> String {
        self.lines.first().map(|l| parse_date(l)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LOG: &str = "commit 3f1c2a\n\
Author: Ada <ada@example.com>\n\
Date:   Fri Mar 8 09:15:00 2024 +0000\n\
\n    tweak\n\
\n\
commit 9be0d1\n\
Author: Ada <ada@example.com>\n\
Date:   Mon Jan 1 12:00:00 2024 +0000\n\
\n    initial\n";

    #[test]
    fn parse_date_uses_month_day_year_tokens() {
        assert_eq!(parse_date("Date:   Mon Jan 1 12:00:00 2024 +0000"), "Jan 1 2024");
        assert_eq!(parse_date("Date: Tue Mar 5 14:02:11 2024"), "Mar 5 2024");
    }

    #[test]
    fn parse_date_short_line_is_empty() {
        assert_eq!(parse_date("Date: Mon Jan 1 2024"), "");
        assert_eq!(parse_date(""), "");
    }

    #[test]
    fn log_output_keeps_date_lines_newest_first() {
        let history = CommitHistory::from_log_output(LOG);
        assert_eq!(history.commit_count(), 2);
        assert_eq!(history.last_commit(), "Mar 8 2024");
        assert_eq!(history.first_commit(), "Jan 1 2024");
    }

    #[test]
    fn empty_history_counts_one_commit_with_empty_dates() {
        let history = CommitHistory::from_history("");
        assert_eq!(history.commit_count(), 1);
        assert_eq!(history.first_commit(), "");
        assert_eq!(history.last_commit(), "");

        let history = CommitHistory::from_log_output("");
        assert_eq!(history.commit_count(), 1);
    }

    #[test]
    fn single_commit_has_same_first_and_last() {
        let history = CommitHistory::from_history("Date:   Wed Jul 3 08:00:00 2019 -0700");
        assert_eq!(history.commit_count(), 1);
        assert_eq!(history.first_commit(), "Jul 3 2019");
        assert_eq!(history.last_commit(), "Jul 3 2019");
    }
}
