// 📋 Roster Formatter - reconciled members → per-team buckets
//
// A member in k teams is copied into k buckets. Ids come from one counter
// threaded through the whole traversal (members outer, roles inner), so the
// same member gets a different id in each bucket.

use crate::entities::{Member, Team};
use crate::error::{Result, RosterError};
use serde::{Deserialize, Serialize};

// ============================================================================
// ROSTER ENTRY
// ============================================================================

/// One appearance of a member in one bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Sequential across the whole roster; not a member identifier
    #[serde(default)]
    pub id: usize,

    #[serde(flatten)]
    pub member: Member,
}

// ============================================================================
// ROSTER
// ============================================================================

/// Published JSON shape: one array per team, keys in fixed team order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Roster {
    #[serde(rename = "Management", default)]
    pub management: Vec<RosterEntry>,

    #[serde(rename = "Hardware", default)]
    pub hardware: Vec<RosterEntry>,

    #[serde(rename = "Sensors", default)]
    pub sensors: Vec<RosterEntry>,

    #[serde(rename = "Software", default)]
    pub software: Vec<RosterEntry>,

    #[serde(rename = "Finance", default)]
    pub finance: Vec<RosterEntry>,

    #[serde(rename = "Outreach", default)]
    pub outreach: Vec<RosterEntry>,

    #[serde(rename = "Social", default)]
    pub social: Vec<RosterEntry>,
}

impl Roster {
    pub fn bucket(&self, team: Team) -> &[RosterEntry] {
        match team {
            Team::Management => &self.management,
            Team::Hardware => &self.hardware,
            Team::Sensors => &self.sensors,
            Team::Software => &self.software,
            Team::Finance => &self.finance,
            Team::Outreach => &self.outreach,
            Team::Social => &self.social,
        }
    }

    pub fn bucket_mut(&mut self, team: Team) -> &mut Vec<RosterEntry> {
        match team {
            Team::Management => &mut self.management,
            Team::Hardware => &mut self.hardware,
            Team::Sensors => &mut self.sensors,
            Team::Software => &mut self.software,
            Team::Finance => &mut self.finance,
            Team::Outreach => &mut self.outreach,
            Team::Social => &mut self.social,
        }
    }

    /// Every entry, bucket by bucket in team order
    pub fn entries(&self) -> impl Iterator<Item = (Team, &RosterEntry)> {
        Team::ALL
            .into_iter()
            .flat_map(move |team| self.bucket(team).iter().map(move |entry| (team, entry)))
    }

    pub fn len(&self) -> usize {
        Team::ALL.iter().map(|team| self.bucket(*team).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// (team, entry count) for every bucket
    pub fn bucket_sizes(&self) -> Vec<(Team, usize)> {
        Team::ALL
            .into_iter()
            .map(|team| (team, self.bucket(team).len()))
            .collect()
    }
}

// ============================================================================
// FORMATTER
// ============================================================================

/// Flatten `members` into buckets. A role naming a team outside the fixed
/// set fails the whole roster.
pub fn format_roster(members: &[Member]) -> Result<Roster> {
    let (roster, next_id) = members.iter().try_fold((Roster::default(), 0usize), |acc, member| {
        member.team_names().try_fold(acc, |(mut roster, id), name| {
            let team = Team::parse(name).ok_or_else(|| RosterError::UnknownTeam {
                member: member.label(),
                team: name.to_string(),
            })?;

            roster.bucket_mut(team).push(RosterEntry {
                id,
                member: member.clone(),
            });
            Ok::<_, RosterError>((roster, id + 1))
        })
    })?;

    tracing::info!(entries = next_id, members = members.len(), "formatted roster");
    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Role;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn create_test_member(email: &str, roles: &[(&str, Team)]) -> Member {
        let mut member: Member = serde_json::from_value(json!({
            "name": email.split('@').next().unwrap(),
            "email": email,
        }))
        .unwrap();
        member.roles = roles
            .iter()
            .map(|(title, team)| Role::new(*title, *team, false))
            .collect();
        member
    }

    #[test]
    fn test_fan_out_with_global_counter() {
        let members = vec![
            create_test_member("a@x.com", &[("Lead", Team::Hardware), ("Engineer", Team::Software)]),
            create_test_member("b@x.com", &[("Treasurer", Team::Finance)]),
            create_test_member("c@x.com", &[("Engineer", Team::Software)]),
        ];

        let roster = format_roster(&members).unwrap();

        assert_eq!(roster.len(), 4);
        assert_eq!(roster.hardware.len(), 1);
        assert_eq!(roster.hardware[0].id, 0);
        assert_eq!(roster.finance[0].id, 2);

        let software: Vec<(usize, &str)> = roster
            .software
            .iter()
            .map(|e| (e.id, e.member.email.as_str()))
            .collect();
        assert_eq!(software, vec![(1, "a@x.com"), (3, "c@x.com")]);
    }

    #[test]
    fn test_member_without_roles_is_not_published() {
        let members = vec![create_test_member("a@x.com", &[])];

        let roster = format_roster(&members).unwrap();

        assert!(roster.is_empty());
    }

    #[test]
    fn test_entries_carry_full_member() {
        let member = create_test_member("a@x.com", &[("Events", Team::Social)]);

        let roster = format_roster(std::slice::from_ref(&member)).unwrap();

        assert_eq!(roster.social[0].member, member);
    }

    #[test]
    fn test_unknown_team_fails() {
        let mut member = create_test_member("a@x.com", &[]);
        member.roles.push(Role {
            role: "Designer".to_string(),
            team: "Marketing".to_string(),
            lead: false,
        });

        match format_roster(&[member]).unwrap_err() {
            RosterError::UnknownTeam { member, team } => {
                assert_eq!(member, "a <a@x.com>");
                assert_eq!(team, "Marketing");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_json_shape() {
        let members = vec![create_test_member("a@x.com", &[("Head of Outreach", Team::Outreach)])];

        let value = serde_json::to_value(format_roster(&members).unwrap()).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();

        assert_eq!(keys.len(), 7);
        assert_eq!(
            value["Outreach"][0],
            json!({
                "id": 0,
                "name": "a",
                "email": "a@x.com",
                "course": "",
                "link": "",
                "description": "",
                "image": "",
                "legacy": false,
                "isLegacy": false,
                "roles": [{"role": "Head of Outreach", "team": "Outreach", "lead": false}]
            })
        );
        assert_eq!(value["Management"], json!([]));
    }

    #[test]
    fn test_published_roster_reads_back() {
        let raw = json!({
            "Software": [{
                "id": 12,
                "name": "Old",
                "email": "old@x.com",
                "startYear": 2019,
                "endYear": 2021,
                "roles": [{"role": "Engineer", "team": "Software", "lead": false}]
            }]
        });

        let roster: Roster = serde_json::from_value(raw).unwrap();

        assert_eq!(roster.len(), 1);
        let entry = &roster.software[0];
        assert_eq!(entry.id, 12);
        assert_eq!(entry.member.email, "old@x.com");
        assert_eq!(entry.member.start_year, Some(2019));
        assert!(entry.member.extra.is_empty());
    }

    #[test]
    fn test_unknown_bucket_does_not_parse() {
        let raw = json!({
            "Software": [],
            "Marketing": [{"id": 0, "name": "Mo", "email": "mo@x.com", "roles": []}]
        });

        assert!(serde_json::from_value::<Roster>(raw).is_err());
    }

    #[test]
    fn test_entries_iterate_in_team_order() {
        let members = vec![
            create_test_member("a@x.com", &[("Events", Team::Social)]),
            create_test_member("b@x.com", &[("President", Team::Management)]),
        ];

        let roster = format_roster(&members).unwrap();
        let teams: Vec<Team> = roster.entries().map(|(team, _)| team).collect();

        assert_eq!(teams, vec![Team::Management, Team::Social]);
    }
}
