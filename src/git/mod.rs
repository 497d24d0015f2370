pub mod history;
pub mod repo;
pub mod runner;

pub use history::{parse_date, CommitHistory};
pub use repo::{GitRepo, Workspace};
pub use runner::{CommandRunner, SystemRunner};
