use crate::planner::{LinkSourceRename, RenameCandidate, RenamePlan};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApplyFailure {
    pub path: PathBuf,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApplyResult {
    pub applied: usize,
    pub relinked: usize,
    pub failures: Vec<ApplyFailure>,
}

/// Rename every candidate of the plan.
///
/// A failing file is recorded and the remaining files are still renamed.
pub fn apply_plan(plan: &RenamePlan) -> ApplyResult {
    let mut result = ApplyResult::default();

    for candidate in &plan.candidates {
        match apply_candidate(candidate) {
            Ok(relinked) => {
                result.applied += 1;
                if relinked {
                    result.relinked += 1;
                }
            }
            Err(err) => {
                log::error!("{err:#}");
                result.failures.push(ApplyFailure {
                    path: candidate.original_path.clone(),
                    message: format!("{err:#}"),
                });
            }
        }
    }

    result
}

fn apply_candidate(candidate: &RenameCandidate) -> Result<bool> {
    let mut relinked = false;
    if let Some(source) = &candidate.link_source {
        rename_source_and_relink(&candidate.original_path, source)?;
        relinked = true;
    }

    log::debug!(
        " renaming \"{}\"\n      ⤷   \"{}\"",
        candidate.original_path.display(),
        candidate.target_path.display()
    );
    rename_file(&candidate.original_path, &candidate.target_path)?;
    Ok(relinked)
}

/// Rename the symlink source, then point the link at its new name.
///
/// The source gets its old name back if the link cannot be updated.
fn rename_source_and_relink(link: &Path, source: &LinkSourceRename) -> Result<()> {
    rename_file(&source.original_path, &source.target_path)?;

    log::debug!(
        "re-linking symlink \"{}\" from \"{}\" to \"{}\"",
        link.display(),
        source.original_path.display(),
        source.link_value.display()
    );
    if let Err(err) = replace_symlink(link, &source.link_value) {
        if let Err(undo) = fs::rename(&source.target_path, &source.original_path) {
            log::error!(
                "Failed to restore {} from {}: {undo}",
                source.original_path.display(),
                source.target_path.display()
            );
        }
        return Err(err);
    }
    Ok(())
}

/// Swap `link` for a new symlink to `value` without ever removing it first.
fn replace_symlink(link: &Path, value: &Path) -> Result<()> {
    let staged = staged_link_path(link);
    create_symlink(value, &staged).with_context(|| {
        format!(
            "Failed to re-link {} to {}",
            link.display(),
            value.display()
        )
    })?;

    if let Err(err) = fs::rename(&staged, link) {
        if let Err(cleanup) = fs::remove_file(&staged) {
            log::warn!("Failed to remove {}: {cleanup}", staged.display());
        }
        return Err(err)
            .with_context(|| format!("Failed to replace symlink: {}", link.display()));
    }
    Ok(())
}

fn staged_link_path(link: &Path) -> PathBuf {
    let name = link
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    link.with_file_name(format!(".{name}.relink"))
}

fn rename_file(from: &Path, to: &Path) -> Result<()> {
    if fs::symlink_metadata(to).is_ok() {
        bail!(
            "Not renaming {} because {} already exists",
            from.display(),
            to.display()
        );
    }
    fs::rename(from, to)
        .with_context(|| format!("Failed to rename {} -> {}", from.display(), to.display()))
}

#[cfg(unix)]
fn create_symlink(value: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(value, link)
}

#[cfg(windows)]
fn create_symlink(value: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(value, link)
}
