// 👥 Team - the closed set of roster buckets
//
// Declaration order is the bucket order of the published JSON.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    Management,
    Hardware,
    Sensors,
    Software,
    Finance,
    Outreach,
    Social,
}

impl Team {
    /// All teams in bucket order
    pub const ALL: [Team; 7] = [
        Team::Management,
        Team::Hardware,
        Team::Sensors,
        Team::Software,
        Team::Finance,
        Team::Outreach,
        Team::Social,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Team::Management => "Management",
            Team::Hardware => "Hardware",
            Team::Sensors => "Sensors",
            Team::Software => "Software",
            Team::Finance => "Finance",
            Team::Outreach => "Outreach",
            Team::Social => "Social",
        }
    }

    /// Exact, case-sensitive lookup by name
    pub fn parse(name: &str) -> Option<Team> {
        Team::ALL.into_iter().find(|team| team.as_str() == name)
    }

    /// Sheet column holding this team's role title, e.g. "Hardware Role"
    pub fn role_column(&self) -> String {
        format!("{} Role", self.as_str())
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_teams() {
        for team in Team::ALL {
            assert_eq!(Team::parse(team.as_str()), Some(team));
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!(Team::parse("hardware"), None);
        assert_eq!(Team::parse("Marketing"), None);
    }

    #[test]
    fn test_role_column() {
        assert_eq!(Team::Software.role_column(), "Software Role");
    }

    #[test]
    fn test_index_matches_bucket_order() {
        for (i, team) in Team::ALL.iter().enumerate() {
            assert_eq!(team.index(), i);
        }
    }
}
