// ⚠️ Roster Errors - every failure aborts the whole run
// A partial roster is never published, so nothing here is recoverable per-row.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    /// Record has no email, so it cannot be deduplicated
    #[error("member record {record} has no email")]
    MissingIdentity { record: String },

    /// Declared team without a role title
    #[error("role for {team} is empty for {member}")]
    MissingRole { member: String, team: String },

    /// Neither the canonical nor the original image exists
    #[error("image {file} does not exist for {member}")]
    ImageNotFound { file: String, member: String },

    /// Email whose local part cannot name a file in the image directory
    #[error("email {email:?} of {member} cannot name an image file")]
    InvalidImageName { email: String, member: String },

    /// Team outside the fixed bucket set
    #[error("unknown team {team:?} for {member}")]
    UnknownTeam { member: String, team: String },

    /// Two rows of the same sheet share an email
    #[error("email {email} appears in more than one row")]
    DuplicateMember { email: String },

    #[error("required column {column:?} is missing from the sheet")]
    MissingColumn { column: String },

    #[error("invalid {column} {value:?} for {member}")]
    InvalidDate {
        member: String,
        column: String,
        value: String,
    },

    #[error("failed to process image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read workbook {}: {source}", path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("workbook {} has no worksheet", path.display())]
    EmptyWorkbook { path: PathBuf },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RosterError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RosterError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
