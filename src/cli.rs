use anyhow::Result;
use clap::{Args, Parser};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "repotable")]
#[command(about = "Serve per-file line and commit statistics of git repositories as HTML and CSV")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub serve: ServeArgs,
}

#[derive(Args, Clone, Debug)]
pub struct ServeArgs {
    #[arg(long, env = "REPOTABLE_BIND", default_value = "0.0.0.0:8080", help = "Address to listen on")]
    pub bind: String,

    #[arg(long, env = "REPOTABLE_OUTPUT", default_value = "output.csv", help = "File the latest CSV report is written to")]
    pub output: PathBuf,

    #[arg(long, env = "REPOTABLE_WORK_DIR", help = "Directory for per-request clones (defaults to the system temp dir)")]
    pub work_dir: Option<PathBuf>,

    #[arg(
        long,
        env = "REPOTABLE_COMMAND_TIMEOUT",
        default_value = "10m",
        value_parser = humantime::parse_duration,
        help = "Kill external commands running longer than this (e.g. 90s, 10m; 0s disables)"
    )]
    pub command_timeout: Duration,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        crate::server::exec(self.serve)
    }
}
