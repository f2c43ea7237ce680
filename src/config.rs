// ⚙️ Run Configuration - where the sheet, photos and roster live

use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::images::MAX_DIMENSION;
use crate::sheet::is_supported_sheet;

pub const DEFAULT_IMAGES_DIR: &str = "./images";
pub const DEFAULT_OUTPUT: &str = "./team_details.json";
pub const DEFAULT_BRANCH: &str = "update-team-details";
pub const DEFAULT_WORKDIR: &str = "./repository";

const REPOSITORY_PREFIX: &str = "https://github.com/";

#[derive(Debug, Clone, PartialEq)]
pub struct RosterConfig {
    /// Roster spreadsheet: a CSV export or the workbook itself
    pub sheet_path: PathBuf,

    /// Profile photos, normalized in place
    pub images_dir: PathBuf,

    /// Where the new roster is written
    pub output_path: PathBuf,

    /// Previously published roster (usually the same file as output)
    pub previous_path: PathBuf,

    pub max_image_dimension: u32,

    /// Set when the result should be pushed to the website repository
    pub publish: Option<PublishConfig>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishConfig {
    pub repository: String,
    pub branch: String,
    pub workdir: PathBuf,
}

impl RosterConfig {
    pub fn new(sheet_path: impl Into<PathBuf>) -> Self {
        RosterConfig {
            sheet_path: sheet_path.into(),
            images_dir: PathBuf::from(DEFAULT_IMAGES_DIR),
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            previous_path: PathBuf::from(DEFAULT_OUTPUT),
            max_image_dimension: MAX_DIMENSION,
            publish: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !is_supported_sheet(&self.sheet_path) {
            bail!(
                "roster sheet must be .csv, .xlsx, .xlsm, .xls or .ods, got {}",
                self.sheet_path.display()
            );
        }

        if self.max_image_dimension == 0 {
            bail!("max image dimension must be positive");
        }

        if let Some(publish) = &self.publish {
            publish.validate()?;
        }

        Ok(())
    }
}

impl PublishConfig {
    pub fn new(repository: impl Into<String>) -> Self {
        PublishConfig {
            repository: repository.into(),
            branch: DEFAULT_BRANCH.to_string(),
            workdir: PathBuf::from(DEFAULT_WORKDIR),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.repository.starts_with(REPOSITORY_PREFIX) {
            bail!(
                "repository must be an {} URL, got {}",
                REPOSITORY_PREFIX,
                self.repository
            );
        }
        if self.branch.trim().is_empty() {
            bail!("branch name must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RosterConfig::new("WebsiteContent.csv");

        assert_eq!(config.images_dir, PathBuf::from("./images"));
        assert_eq!(config.output_path, config.previous_path);
        assert_eq!(config.max_image_dimension, 720);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_accepts_workbook_sheet() {
        assert!(RosterConfig::new("WebsiteContent.xlsx").validate().is_ok());
        assert!(RosterConfig::new("WebsiteContent.ODS").validate().is_ok());
    }

    #[test]
    fn test_rejects_unsupported_sheet() {
        let config = RosterConfig::new("WebsiteContent.txt");
        let err = config.validate().unwrap_err();

        assert!(err.to_string().contains("WebsiteContent.txt"));
        assert!(RosterConfig::new("WebsiteContent").validate().is_err());
    }

    #[test]
    fn test_rejects_zero_dimension() {
        let mut config = RosterConfig::new("roster.CSV");
        config.max_image_dimension = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_publish_repository_must_be_github() {
        let mut config = RosterConfig::new("roster.csv");
        config.publish = Some(PublishConfig::new("git@github.com:org/site.git"));
        assert!(config.validate().is_err());

        config.publish = Some(PublishConfig::new("https://github.com/org/site.git"));
        assert!(config.validate().is_ok());
    }
}
