// 🧑 Member Entity - one person on the roster
//
// Identity: email (never changes across runs)
// Values: everything else, rebuilt from the sheet on every run
//
// Records read back from a published roster may carry fields this version
// does not know about (e.g. startDate/endDate). They are kept in `extra` so a
// historical member is written back exactly as it was read.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::team::Team;

// ============================================================================
// ROLE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    /// Free-text title, e.g. "Head of Software"
    #[serde(default)]
    pub role: String,

    /// Team name as written in the record; resolved against `Team` on output
    #[serde(default)]
    pub team: String,

    #[serde(default)]
    pub lead: bool,
}

impl Role {
    pub fn new(role: impl Into<String>, team: Team, lead: bool) -> Self {
        Role {
            role: role.into(),
            team: team.as_str().to_string(),
            lead,
        }
    }
}

// ============================================================================
// MEMBER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    #[serde(default)]
    pub name: String,

    /// Identity key
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub course: String,

    #[serde(default)]
    pub link: String,

    #[serde(default)]
    pub description: String,

    /// Canonical image filename; empty means no photo
    #[serde(default)]
    pub image: String,

    #[serde(rename = "startYear", default, skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,

    #[serde(rename = "endYear", default, skip_serializing_if = "Option::is_none")]
    pub end_year: Option<i32>,

    /// Explicit "Legacy" marker from the sheet
    #[serde(default)]
    pub legacy: bool,

    /// Leave date is in the past
    #[serde(rename = "isLegacy", default)]
    pub is_legacy: bool,

    #[serde(default)]
    pub roles: Vec<Role>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Member {
    pub fn has_identity(&self) -> bool {
        !self.email.is_empty()
    }

    /// Human-readable label for error messages
    pub fn label(&self) -> String {
        match (self.name.is_empty(), self.email.is_empty()) {
            (false, false) => format!("{} <{}>", self.name, self.email),
            (false, true) => self.name.clone(),
            (true, false) => self.email.clone(),
            (true, true) => "<unnamed>".to_string(),
        }
    }

    pub fn team_names(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(|r| r.team.as_str())
    }
}
