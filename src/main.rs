use anyhow::{Context, Result};
use repotable::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    repotable::logging::setup_logger().context("Failed to initialize logger")?;
    cli.execute()
}
