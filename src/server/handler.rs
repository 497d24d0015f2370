use super::http::{HttpRequest, HttpResponse};
use crate::error::{RepoTableError, Result};
use crate::export::{encode_csv, page, render_table, write_atomic};
use crate::git::{CommandRunner, GitRepo, Workspace};
use crate::model::{FileRecord, ReportOutput, ReportTable};
use crate::scan::scan_extensions;
use serde::Serialize;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{error, info, warn};
use url::Url;

pub const MISSING_PARAMS: &str = "Please provide a repository URL and at least one extension.";
pub const WORKSPACE_FAILED: &str = "Failed to create working directory.";
pub const CLONE_FAILED: &str = "Failed to clone repository.";
pub const SCAN_FAILED: &str = "Failed to collect file metadata.";
pub const SAVE_FAILED: &str = "Failed to save CSV data to file.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Html,
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = RepoTableError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(RepoTableError::InvalidRequest(format!(
                "Unsupported format '{other}'. Use html, csv or json."
            ))),
        }
    }
}

/// Parameters of one report request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportQuery {
    pub repo: String,
    pub extensions: Vec<String>,
    pub format: OutputFormat,
}

impl ReportQuery {
    /// `repo` takes the first value, `ext` every non-empty value in order.
    pub fn from_url(url: &Url) -> Result<Self> {
        let mut repo = None;
        let mut extensions = Vec::new();
        let mut format = OutputFormat::default();

        for (key, value) in url.query_pairs() {
            match &*key {
                "repo" if repo.is_none() => repo = Some(value.into_owned()),
                "ext" if !value.is_empty() => extensions.push(value.into_owned()),
                "format" => format = value.parse()?,
                _ => {}
            }
        }

        match repo {
            Some(repo) if !repo.is_empty() && !extensions.is_empty() => Ok(Self {
                repo,
                extensions,
                format,
            }),
            _ => Err(RepoTableError::InvalidRequest(MISSING_PARAMS.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Parent of per-request workspaces; the system temp dir when `None`.
    pub work_dir: Option<PathBuf>,
    /// Where the CSV of the latest successful report is written.
    pub output: PathBuf,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

struct Report {
    records: Vec<FileRecord>,
    table: ReportTable,
    csv: String,
}

/// Turns requests into clone/scan/render runs.
pub struct ReportService<R> {
    runner: R,
    settings: ServiceSettings,
}

impl<R: CommandRunner> ReportService<R> {
    pub fn new(runner: R, settings: ServiceSettings) -> Self {
        Self { runner, settings }
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    pub fn handle(&self, request: &HttpRequest) -> HttpResponse {
        if request.method != "GET" {
            return HttpResponse::text(405, "Only GET is supported.").with_header("Allow", "GET");
        }

        let url = match parse_target(&request.target) {
            Ok(url) => url,
            Err(e) => return bad_request(e),
        };

        match url.path() {
            "/health" => health(),
            _ => match ReportQuery::from_url(&url) {
                Ok(query) => self.report(&query),
                Err(e) => bad_request(e),
            },
        }
    }

    #[tracing::instrument(level = "info", skip_all, fields(repo = %query.repo, ext = ?query.extensions))]
    pub fn report(&self, query: &ReportQuery) -> HttpResponse {
        let workspace = match Workspace::create(self.settings.work_dir.as_deref()) {
            Ok(ws) => ws,
            Err(e) => return internal_error(e, WORKSPACE_FAILED),
        };

        let report = self.build(query, &workspace);

        let workspace_path = workspace.path().to_path_buf();
        if let Err(e) = workspace.close() {
            warn!(error = %e, path = %workspace_path.display(), "Failed to remove workspace");
        }

        let report = match report {
            Ok(report) => report,
            Err(response) => return response,
        };
        info!(files = report.records.len(), "Report ready");

        match query.format {
            OutputFormat::Html => HttpResponse::html(page(&render_table(&report.table))),
            OutputFormat::Csv => HttpResponse::csv(report.csv),
            OutputFormat::Json => {
                let output = ReportOutput::new(&query.repo, &query.extensions, report.records);
                HttpResponse::json(200, &output)
                    .unwrap_or_else(|e| internal_error(e, "Failed to serialize report."))
            }
        }
    }

    fn build(
        &self,
        query: &ReportQuery,
        workspace: &Workspace,
    ) -> std::result::Result<Report, HttpResponse> {
        let repo = GitRepo::clone_into(&self.runner, &query.repo, workspace.clone_dir())
            .map_err(|e| internal_error(e, CLONE_FAILED))?;

        let records = scan_extensions(&repo, &query.extensions)
            .map_err(|e| internal_error(e, SCAN_FAILED))?;

        let table = ReportTable::from_records(&records);
        let csv = encode_csv(&table).map_err(|e| internal_error(e, SAVE_FAILED))?;
        write_atomic(&self.settings.output, &csv).map_err(|e| internal_error(e, SAVE_FAILED))?;

        Ok(Report {
            records,
            table,
            csv,
        })
    }
}

fn parse_target(target: &str) -> Result<Url> {
    let base = Url::parse("http://localhost/")
        .map_err(|e| RepoTableError::InvalidRequest(e.to_string()))?;
    base.join(target)
        .map_err(|e| RepoTableError::InvalidRequest(format!("Invalid request target: {e}")))
}

fn health() -> HttpResponse {
    let body = HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    };
    HttpResponse::json(200, &body).unwrap_or_else(|e| internal_error(e, "Failed to serialize health."))
}

fn bad_request(err: RepoTableError) -> HttpResponse {
    match err {
        RepoTableError::InvalidRequest(message) => HttpResponse::text(400, &message),
        other => HttpResponse::text(400, &other.to_string()),
    }
}

fn internal_error(err: RepoTableError, message: &'static str) -> HttpResponse {
    error!(error = %err, "{message}");
    HttpResponse::text(500, message)
}
