pub mod command;
pub mod repo;

pub use command::{AttributionSource, GitCli};
pub use repo::GitRepo;
