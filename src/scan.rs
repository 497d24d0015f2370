use crate::error::Result;
use crate::git::{CommandRunner, GitRepo};
use crate::model::FileRecord;
use tracing::debug;

/// Records for every file in the clone matching `extension`, in `find` order.
#[tracing::instrument(level = "debug", skip(repo))]
pub fn scan_extension<R: CommandRunner + ?Sized>(
    repo: &GitRepo<'_, R>,
    extension: &str,
) -> Result<Vec<FileRecord>> {
    let files = repo.find_by_extension(extension)?;
    debug!(count = files.len(), "Matched files");

    let mut records = Vec::with_capacity(files.len());
    for file in &files {
        records.push(repo.file_record(file)?);
    }
    Ok(records)
}

/// Scan each extension in turn and concatenate the results.
pub fn scan_extensions<R: CommandRunner + ?Sized>(
    repo: &GitRepo<'_, R>,
    extensions: &[String],
) -> Result<Vec<FileRecord>> {
    let mut records = Vec::new();
    for ext in extensions {
        records.extend(scan_extension(repo, ext)?);
    }
    Ok(records)
}
