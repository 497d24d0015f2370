use crate::error::{RepoTableError, Result};
use crate::git::history::CommitHistory;
use crate::git::runner::CommandRunner;
use crate::model::FileRecord;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};

/// Name of the clone directory inside a workspace.
const CLONE_DIR: &str = "repo";

/// Per-request scratch directory. Removed when dropped or closed.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a fresh directory under `parent`, or under the system temp dir.
    pub fn create(parent: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("repotable-");
        let dir = match parent {
            Some(parent) => {
                std::fs::create_dir_all(parent)?;
                builder.tempdir_in(parent)?
            }
            None => builder.tempdir()?,
        };
        debug!(path = %dir.path().display(), "Created workspace");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn clone_dir(&self) -> PathBuf {
        self.dir.path().join(CLONE_DIR)
    }

    /// Remove the directory now, reporting failures instead of ignoring them.
    pub fn close(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close()?;
        debug!(path = %path.display(), "Removed workspace");
        Ok(())
    }
}

/// A local clone inspected through external `git`, `find` and `wc`.
pub struct GitRepo<'r, R: CommandRunner + ?Sized> {
    runner: &'r R,
    path: PathBuf,
}

impl<'r, R: CommandRunner + ?Sized> GitRepo<'r, R> {
    /// Wrap an existing working copy.
    pub fn open<P: AsRef<Path>>(runner: &'r R, path: P) -> Self {
        Self {
            runner,
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Clone `url` into `dest`. Fails when `git clone` fails.
    #[tracing::instrument(level = "info", skip(runner, dest), fields(dest_dir = %dest.as_ref().display()))]
    pub fn clone_into<P: AsRef<Path>>(runner: &'r R, url: &str, dest: P) -> Result<Self> {
        let dest = dest.as_ref();
        let dest_str = path_str(dest)?;
        runner.run("git", &["clone", "--", url, dest_str])?;
        info!("Repository cloned");
        Ok(Self::open(runner, dest))
    }

    /// Files under the clone whose name ends in `.<extension>`, case-insensitively.
    ///
    /// Paths are returned as printed by `find`, i.e. prefixed with the clone root.
    /// Names that are not valid UTF-8 are skipped.
    pub fn find_by_extension(&self, extension: &str) -> Result<Vec<String>> {
        let root = path_str(&self.path)?;
        let git_dir = self.path.join(".git");
        let git_dir = path_str(&git_dir)?;
        let pattern = format!("*.{extension}");
        let listing = self.runner.run(
            "find",
            &[
                root, "-path", git_dir, "-prune", "-o", "-type", "f", "-iname", pattern.as_str(),
                "-print0",
            ],
        )?;
        Ok(listing
            .split('\0')
            .filter(|name| !name.is_empty())
            .filter(|name| {
                let valid = !name.contains(char::REPLACEMENT_CHARACTER);
                if !valid {
                    warn!(file = %name, "Skipping file with a non UTF-8 name");
                }
                valid
            })
            .map(str::to_string)
            .collect())
    }

    /// `path` with the clone root removed, using `/` separators.
    pub fn relative_path(&self, path: &str) -> String {
        match Path::new(path).strip_prefix(&self.path) {
            Ok(rel) => rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
            Err(_) => path.to_string(),
        }
    }

    /// Date lines of `git log` for a path relative to the clone root.
    ///
    /// The path is matched literally, never as pathspec magic.
    pub fn history(&self, relative: &str) -> Result<CommitHistory> {
        let root = path_str(&self.path)?;
        let log = self
            .runner
            .run(
                "git",
                &["-C", root, "--literal-pathspecs", "log", "--date=default", "--", relative],
            )?;
        Ok(CommitHistory::from_log_output(&log))
    }

    /// First token of `wc -l` for the file.
    pub fn lines_of_code(&self, file: &str) -> Result<u64> {
        let out = self.runner.run("wc", &["-l", file])?;
        let token = out
            .split_whitespace()
            .next()
            .ok_or_else(|| RepoTableError::Parse(format!("Empty line count output for {file}")))?;
        token
            .parse()
            .map_err(|e| RepoTableError::Parse(format!("Invalid line count '{token}' for {file}: {e}")))
    }

    /// Metadata for one file as printed by [`Self::find_by_extension`].
    pub fn file_record(&self, file: &str) -> Result<FileRecord> {
        let relative = self.relative_path(file);
        let lines_of_code = self.lines_of_code(file)?;
        let history = self.history(&relative)?;
        if history.commit_count() == 1 && history.lines()[0].is_empty() {
            warn!(file = %relative, "No commit history found");
        }
        Ok(FileRecord {
            path: relative,
            lines_of_code,
            commit_count: history.commit_count(),
            first_commit: history.first_commit(),
            last_commit: history.last_commit(),
        })
    }
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| RepoTableError::Parse(format!("Non UTF-8 path: {}", path.display())))
}
