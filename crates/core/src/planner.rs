use crate::composer::{propose_name, InsertionSpec};
use crate::filename::ParseError;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub files: Vec<PathBuf>,
    pub spec: InsertionSpec,
    pub rename_symlink_sources: bool,
}

impl PlanOptions {
    pub fn new(files: Vec<PathBuf>, spec: InsertionSpec) -> Self {
        Self {
            files,
            spec,
            rename_symlink_sources: true,
        }
    }
}

/// Rename of the file a symlink points to, when both share the same name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkSourceRename {
    pub original_path: PathBuf,
    pub target_path: PathBuf,
    /// What the symlink must point to afterwards, relative if it was before.
    pub link_value: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameCandidate {
    pub original_path: PathBuf,
    pub target_path: PathBuf,
    pub link_source: Option<LinkSourceRename>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueKind {
    #[error("is a directory")]
    IsADirectory,
    #[error("is not an existing file")]
    NotAFile,
    #[error("is a broken symbolic link")]
    BrokenLink,
    #[error("file name is not valid UTF-8")]
    InvalidName,
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("failed to read symbolic link: {0}")]
    Link(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanIssue {
    pub path: PathBuf,
    pub kind: IssueKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RenameStats {
    pub requested: usize,
    pub planned: usize,
    pub linked_sources: usize,
    pub skipped_directories: usize,
    pub skipped_not_file: usize,
    pub skipped_broken_links: usize,
    pub failed: usize,
}

impl RenameStats {
    pub fn issues(&self) -> usize {
        self.skipped_directories + self.skipped_not_file + self.skipped_broken_links + self.failed
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenamePlan {
    pub spec: InsertionSpec,
    pub candidates: Vec<RenameCandidate>,
    pub issues: Vec<PlanIssue>,
    pub stats: RenameStats,
}

/// Work out the new name of every input path.
///
/// Problems with single paths end up in `issues`; the rest of the batch is
/// still planned.
pub fn generate_plan(options: &PlanOptions) -> RenamePlan {
    let outcomes: Vec<Result<RenameCandidate, PlanIssue>> = options
        .files
        .par_iter()
        .map(|path| plan_file(path, options))
        .collect();

    let mut stats = RenameStats {
        requested: options.files.len(),
        ..RenameStats::default()
    };
    let mut candidates = Vec::with_capacity(outcomes.len());
    let mut issues = Vec::new();

    for outcome in outcomes {
        match outcome {
            Ok(candidate) => {
                stats.planned += 1;
                if candidate.link_source.is_some() {
                    stats.linked_sources += 1;
                }
                candidates.push(candidate);
            }
            Err(issue) => {
                match issue.kind {
                    IssueKind::IsADirectory => {
                        log::warn!("Skipping '{}', because it is a directory.", issue.path.display());
                        stats.skipped_directories += 1;
                    }
                    IssueKind::NotAFile => {
                        log::error!("Skipping '{}', because it isn't a file.", issue.path.display());
                        stats.skipped_not_file += 1;
                    }
                    IssueKind::BrokenLink => {
                        log::error!(
                            "File '{}' is a broken symbolic link. Skipping this one.",
                            issue.path.display()
                        );
                        stats.skipped_broken_links += 1;
                    }
                    _ => {
                        log::error!("Skipping '{}': {}", issue.path.display(), issue.kind);
                        stats.failed += 1;
                    }
                }
                issues.push(issue);
            }
        }
    }

    RenamePlan {
        spec: options.spec.clone(),
        candidates,
        issues,
        stats,
    }
}

fn plan_file(path: &Path, options: &PlanOptions) -> Result<RenameCandidate, PlanIssue> {
    let issue = |kind: IssueKind| PlanIssue {
        path: path.to_path_buf(),
        kind,
    };

    if is_broken_link(path) {
        return Err(issue(IssueKind::BrokenLink));
    }
    if path.is_dir() {
        return Err(issue(IssueKind::IsADirectory));
    }
    if !path.is_file() {
        return Err(issue(IssueKind::NotAFile));
    }

    let link_source = if options.rename_symlink_sources {
        plan_link_source(path, &options.spec).map_err(issue)?
    } else {
        None
    };

    let target_path = propose_path(path, &options.spec).map_err(issue)?;
    log::debug!("planned '{}' -> '{}'", path.display(), target_path.display());

    Ok(RenameCandidate {
        original_path: path.to_path_buf(),
        target_path,
        link_source,
    })
}

fn propose_path(path: &Path, spec: &InsertionSpec) -> Result<PathBuf, IssueKind> {
    let name = file_name_str(path)?;
    let new_name = propose_name(name, spec)?;
    Ok(path.with_file_name(new_name))
}

fn file_name_str(path: &Path) -> Result<&str, IssueKind> {
    path.file_name()
        .ok_or(IssueKind::NotAFile)?
        .to_str()
        .ok_or(IssueKind::InvalidName)
}

fn plan_link_source(
    link: &Path,
    spec: &InsertionSpec,
) -> Result<Option<LinkSourceRename>, IssueKind> {
    let is_symlink = fs::symlink_metadata(link)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false);
    if !is_symlink {
        return Ok(None);
    }

    let link_value = fs::read_link(link).map_err(|err| IssueKind::Link(err.to_string()))?;
    if link_value.file_name() != link.file_name() {
        log::debug!(
            "'{}' is a symlink to '{}' but they have different names, ignoring the original file",
            link.display(),
            link_value.display()
        );
        return Ok(None);
    }

    let original_path = if link_value.is_absolute() {
        link_value.clone()
    } else {
        link.parent()
            .unwrap_or_else(|| Path::new(""))
            .join(&link_value)
    };

    let new_name = propose_name(file_name_str(&original_path)?, spec)?;
    log::info!(
        "Renaming the symlink destination of '{}' ('{}') as well",
        link.display(),
        original_path.display()
    );

    Ok(Some(LinkSourceRename {
        target_path: original_path.with_file_name(&new_name),
        link_value: link_value.with_file_name(&new_name),
        original_path,
    }))
}

fn is_broken_link(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false)
        && !path.exists()
}
