use crate::error::{FameError, Result};
use gix::traverse::tree::Recorder;
use gix::{discover, Repository};
use std::path::{Path, PathBuf};

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = match path {
            Some(p) => p.as_ref().to_path_buf(),
            None => std::env::current_dir()?,
        };

        let repo = discover(&repo_path)?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full hex id of the commit `revision` names.
    pub fn resolve_commit(&self, revision: &str) -> Result<String> {
        let id = self
            .repo
            .rev_parse_single(revision)
            .map_err(|e| FameError::GitRepo(format!("Invalid revision '{revision}': {e}")))?;

        let commit = id
            .object()
            .map_err(|e| FameError::GitRepo(format!("Cannot read '{revision}': {e}")))?
            .try_into_commit()
            .map_err(|_| FameError::GitRepo(format!("Not a commit: {revision}")))?;

        Ok(commit.id.to_string())
    }

    /// Every file path in the tree of `revision`, breadth-first and then
    /// sorted. Symlinks are included, submodules are not. Paths keep their
    /// raw bytes so names that are not UTF-8 still reach `git`.
    pub fn list_files(&self, revision: &str) -> Result<Vec<PathBuf>> {
        let tree = self
            .repo
            .rev_parse_single(revision)
            .map_err(|e| FameError::GitRepo(format!("Invalid revision '{revision}': {e}")))?
            .object()
            .map_err(|e| FameError::GitRepo(format!("Cannot read '{revision}': {e}")))?
            .peel_to_tree()
            .map_err(|e| FameError::GitRepo(format!("No tree for '{revision}': {e}")))?;

        let mut recorder = Recorder::default();
        tree.traverse()
            .breadthfirst(&mut recorder)
            .map_err(|e| FameError::GitRepo(format!("Failed to walk tree of '{revision}': {e}")))?;

        let mut files = recorder
            .records
            .into_iter()
            .filter(|entry| !entry.mode.is_tree() && !entry.mode.is_commit())
            .map(|entry| {
                gix::path::try_from_bstring(entry.filepath)
                    .map_err(|e| FameError::GitRepo(format!("Unrepresentable path in '{revision}': {e}")))
            })
            .collect::<Result<Vec<PathBuf>>>()?;
        files.sort();
        Ok(files)
    }
}
