pub mod cli;
pub mod error;
pub mod export;
pub mod git;
pub mod logging;
pub mod model;
pub mod scan;
pub mod server;

pub use error::{RepoTableError, Result};
