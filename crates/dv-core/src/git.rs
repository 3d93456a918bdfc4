//! Diff sources: git working tree and piped stdin

use crate::section::{default_sections, DiffSection};
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository")]
    NotARepo,
    #[error("Git command failed: {0}")]
    CommandFailed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Supplies raw diff text per section
pub trait DiffProvider {
    fn load_diff(&self, section: DiffSection) -> Result<String, GitError>;

    fn repo_root(&self) -> Result<PathBuf, GitError>;

    fn current_branch(&self) -> Result<String, GitError>;

    /// Ordered sections this provider serves
    fn sections(&self) -> Vec<DiffSection> {
        default_sections()
    }

    /// When false, a manual refresh is a no-op
    fn manual_refresh_enabled(&self) -> bool {
        true
    }
}

/// Reads unstaged/staged diffs from a git working tree
#[derive(Debug, Clone)]
pub struct GitDiffProvider {
    pub work_dir: PathBuf,
}

impl GitDiffProvider {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }
}

impl DiffProvider for GitDiffProvider {
    fn load_diff(&self, section: DiffSection) -> Result<String, GitError> {
        get_diff(&self.work_dir, section == DiffSection::Staged)
    }

    fn repo_root(&self) -> Result<PathBuf, GitError> {
        get_repo_root(&self.work_dir)
    }

    fn current_branch(&self) -> Result<String, GitError> {
        get_current_branch(&self.work_dir)
    }
}

/// Serves a single diff payload captured from stdin
#[derive(Debug, Clone)]
pub struct StdinDiffProvider {
    pub work_dir: PathBuf,
    pub diff: String,
}

impl DiffProvider for StdinDiffProvider {
    fn load_diff(&self, section: DiffSection) -> Result<String, GitError> {
        match section {
            DiffSection::Staged => Ok(String::new()),
            DiffSection::Unstaged | DiffSection::Files => Ok(self.diff.clone()),
        }
    }

    fn repo_root(&self) -> Result<PathBuf, GitError> {
        get_repo_root(&self.work_dir)
    }

    fn current_branch(&self) -> Result<String, GitError> {
        get_current_branch(&self.work_dir)
    }

    fn sections(&self) -> Vec<DiffSection> {
        vec![DiffSection::Files]
    }

    fn manual_refresh_enabled(&self) -> bool {
        false
    }
}

/// Get the current git branch name
pub fn get_current_branch(path: &Path) -> Result<String, GitError> {
    let output = Command::new("git")
        .arg("-C")
        .arg(path)
        .arg("rev-parse")
        .arg("--abbrev-ref")
        .arg("HEAD")
        .output()?;

    if !output.status.success() {
        return Err(GitError::NotARepo);
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Get the root of the git repository
pub fn get_repo_root(path: &Path) -> Result<PathBuf, GitError> {
    let output = Command::new("git")
        .arg("-C")
        .arg(path)
        .arg("rev-parse")
        .arg("--show-toplevel")
        .output()?;

    if !output.status.success() {
        return Err(GitError::NotARepo);
    }

    let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(PathBuf::from(root))
}

/// Raw unified diff of the working tree (or the index when `staged`)
pub fn get_diff(path: &Path, staged: bool) -> Result<String, GitError> {
    let mut cmd = Command::new("git");
    cmd.arg("-C")
        .arg(path)
        .arg("diff")
        .arg("--no-color")
        .arg("--no-ext-diff");
    if staged {
        cmd.arg("--cached");
    }
    let output = cmd.output()?;
    debug!(path = %path.display(), staged, status = %output.status, "git diff");

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if stderr.is_empty() {
            return Err(GitError::NotARepo);
        }
        return Err(GitError::CommandFailed(stderr));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
