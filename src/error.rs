use thiserror::Error;

pub type Result<T> = std::result::Result<T, FameError>;

#[derive(Error, Debug)]
pub enum FameError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Git repository error: {0}")]
    GitRepo(String),
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
    #[error("`{command}` failed ({status}): {stderr}")]
    GitCommand {
        command: String,
        status: String,
        stderr: String,
    },
    #[error("Malformed blame output at line {line}: {message}")]
    MalformedBlame { line: usize, message: String },
    #[error("Malformed change summary: {0}")]
    MalformedLog(String),
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] ignore::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Worker pool error: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    #[error("{failed} of {total} files could not be attributed")]
    FilesFailed { failed: usize, total: usize },
}

impl From<gix::discover::Error> for FameError {
    fn from(err: gix::discover::Error) -> Self {
        FameError::GitDiscover(Box::new(err))
    }
}

impl FameError {
    pub(crate) fn malformed_blame(line: usize, message: impl Into<String>) -> Self {
        FameError::MalformedBlame {
            line,
            message: message.into(),
        }
    }
}
