// 🚀 Publisher - push the roster and photos to the website repository
//
// clone → branch → stage files → commit → push → clean up
//
// Staging is plain file copying and lives apart from the git calls so it can
// be exercised without a remote.

use crate::config::PublishConfig;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Photo directory inside the website repository
pub const REPO_IMAGES_DIR: &str = "src/images/team_profiles";
/// Roster location inside the website repository
pub const REPO_ROSTER_PATH: &str = "src/content/team_details.json";

const COMMIT_MESSAGE: &str = "Updated team details";

pub struct Publisher {
    config: PublishConfig,
}

impl Publisher {
    pub fn new(config: PublishConfig) -> Self {
        Publisher { config }
    }

    /// Full sync. The working clone is removed afterwards, even on failure.
    pub fn publish(&self, roster_path: &Path, images_dir: &Path) -> Result<()> {
        let workdir = &self.config.workdir;
        if workdir.exists() {
            bail!("working directory {} already exists", workdir.display());
        }

        let result = self.sync(roster_path, images_dir);

        if workdir.exists() {
            fs::remove_dir_all(workdir)
                .with_context(|| format!("Failed to remove {}", workdir.display()))?;
        }
        result
    }

    fn sync(&self, roster_path: &Path, images_dir: &Path) -> Result<()> {
        let workdir = &self.config.workdir;
        let workdir_arg = workdir.to_string_lossy();

        git(None, &["clone", self.config.repository.as_str(), workdir_arg.as_ref()])?;
        tracing::info!(repository = %self.config.repository, "cloned repository");

        git(Some(workdir), &["checkout", "-b", self.config.branch.as_str()])?;
        git(Some(workdir), &["push", "--set-upstream", "origin", self.config.branch.as_str()])?;

        let copied = stage_files(workdir, roster_path, images_dir)?;
        tracing::info!(images = copied, "staged roster files");

        git(Some(workdir), &["add", "."])?;
        git(Some(workdir), &["commit", "-m", COMMIT_MESSAGE])?;
        git(Some(workdir), &["push"])?;

        tracing::info!(branch = %self.config.branch, "pushed roster update");
        Ok(())
    }
}

/// Copy photos and roster into a checkout. Returns the number of photos copied.
pub fn stage_files(repo: &Path, roster_path: &Path, images_dir: &Path) -> Result<usize> {
    let target_images = repo.join(REPO_IMAGES_DIR);
    fs::create_dir_all(&target_images)
        .with_context(|| format!("Failed to create {}", target_images.display()))?;
    let copied = copy_dir(images_dir, &target_images)?;

    let target_roster = repo.join(REPO_ROSTER_PATH);
    if let Some(parent) = target_roster.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::copy(roster_path, &target_roster).with_context(|| {
        format!(
            "Failed to copy {} to {}",
            roster_path.display(),
            target_roster.display()
        )
    })?;

    Ok(copied)
}

/// Recursive copy, overwriting existing files
fn copy_dir(from: &Path, to: &Path) -> Result<usize> {
    let mut copied = 0;

    let entries = fs::read_dir(from).with_context(|| format!("Failed to read {}", from.display()))?;
    for entry in entries {
        let entry = entry?;
        let source = entry.path();
        let target: PathBuf = to.join(entry.file_name());

        if entry.file_type()?.is_dir() {
            fs::create_dir_all(&target)?;
            copied += copy_dir(&source, &target)?;
        } else {
            fs::copy(&source, &target)
                .with_context(|| format!("Failed to copy {}", source.display()))?;
            copied += 1;
        }
    }

    Ok(copied)
}

fn git(dir: Option<&Path>, args: &[&str]) -> Result<()> {
    let mut cmd = Command::new("git");
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }

    let status = cmd
        .args(args)
        .status()
        .with_context(|| format!("Failed to run git {}", args.join(" ")))?;

    if !status.success() {
        bail!("git {} exited with {}", args.join(" "), status);
    }
    Ok(())
}
