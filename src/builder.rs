// 🧱 Member Builder - sheet row → canonical Member
//
// Pure: no filesystem access. The image filename comes in already normalized
// (see images.rs) and the processing time is fixed for the whole run.

use crate::entities::{Member, Role, Team};
use crate::error::{Result, RosterError};
use crate::roles::is_lead;
use crate::sheet::{SheetRow, JOIN_DATE, LEAVE_DATE};
use crate::temporal::{parse_sheet_date, Tenure};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Map;

const TEAM_DELIMITER: char = ';';
const LEGACY_MARKER: &str = "Yes";

pub struct MemberBuilder {
    now: DateTime<Utc>,
}

impl MemberBuilder {
    pub fn new(now: DateTime<Utc>) -> Self {
        MemberBuilder { now }
    }

    /// Email of `row`, or MissingIdentity when it is blank
    pub fn identity<'r>(&self, row: &'r SheetRow) -> Result<&'r str> {
        let email = row.email.trim();
        if email.is_empty() {
            return Err(RosterError::MissingIdentity {
                record: row_label(row),
            });
        }
        Ok(email)
    }

    /// Build the member for `row`. `image` is the canonical filename
    /// returned by the image normalizer ("" for no photo).
    pub fn build(&self, row: &SheetRow, image: String) -> Result<Member> {
        let email = self.identity(row)?;
        let roles = self.roles(row)?;

        let joined = self.required_date(row, JOIN_DATE, &row.join_date)?;
        let left = self.optional_date(row, LEAVE_DATE, &row.leave_date)?;
        let tenure = Tenure::new(joined, left, self.now);

        Ok(Member {
            name: row.name.clone(),
            email: email.to_string(),
            course: row.course.clone(),
            link: row.link.clone(),
            description: row.description.clone(),
            image,
            start_year: Some(tenure.start_year),
            end_year: Some(tenure.end_year),
            legacy: row.legacy.trim() == LEGACY_MARKER,
            is_legacy: tenure.is_legacy,
            roles,
            extra: Map::new(),
        })
    }

    fn roles(&self, row: &SheetRow) -> Result<Vec<Role>> {
        let mut roles = Vec::new();

        for team in split_teams(&row.teams) {
            let team = Team::parse(team).ok_or_else(|| RosterError::UnknownTeam {
                member: row_label(row),
                team: team.to_string(),
            })?;

            let title = row.role_for(team.as_str()).unwrap_or("");
            if title.trim().is_empty() {
                return Err(RosterError::MissingRole {
                    member: row_label(row),
                    team: team.to_string(),
                });
            }

            roles.push(Role::new(title, team, is_lead(title, team)));
        }

        Ok(roles)
    }

    fn required_date(&self, row: &SheetRow, column: &str, raw: &str) -> Result<NaiveDate> {
        parse_sheet_date(raw).ok_or_else(|| invalid_date(row, column, raw))
    }

    fn optional_date(&self, row: &SheetRow, column: &str, raw: &str) -> Result<Option<NaiveDate>> {
        if raw.trim().is_empty() {
            return Ok(None);
        }
        self.required_date(row, column, raw).map(Some)
    }
}

/// "Hardware;Software;" → ["Hardware", "Software"], first occurrence kept
pub fn split_teams(raw: &str) -> Vec<&str> {
    let mut teams: Vec<&str> = Vec::new();
    for team in raw.split(TEAM_DELIMITER).map(str::trim) {
        if !team.is_empty() && !teams.contains(&team) {
            teams.push(team);
        }
    }
    teams
}

fn row_label(row: &SheetRow) -> String {
    if row.name.trim().is_empty() {
        format!("row {}", row.line)
    } else {
        row.name.clone()
    }
}

fn invalid_date(row: &SheetRow, column: &str, raw: &str) -> RosterError {
    RosterError::InvalidDate {
        member: row_label(row),
        column: column.to_string(),
        value: raw.to_string(),
    }
}
