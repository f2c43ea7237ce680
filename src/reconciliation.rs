// ⚖️ Roster Reconciler - merge this run's members with the published roster
//
// Identity is the email and nothing else:
//   new record present       → new record wins, old one is discarded whole
//   only the old record      → carried over verbatim (departed members)
// No field-level merging ever happens.

use crate::entities::Member;
use crate::error::{Result, RosterError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============================================================================
// RECONCILIATION REPORT
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// Members built from the sheet this run
    pub built: usize,

    /// Published members not in the sheet, kept as they were
    pub carried_over: usize,

    /// Published members replaced by a fresh record
    pub superseded: Vec<String>,
}

impl ReconciliationReport {
    pub fn total(&self) -> usize {
        self.built + self.carried_over
    }

    pub fn summary(&self) -> String {
        format!(
            "{} members from sheet, {} carried over, {} superseded",
            self.built,
            self.carried_over,
            self.superseded.len()
        )
    }
}

// ============================================================================
// RECONCILER
// ============================================================================

/// Newly built members plus the set of their emails
pub struct RosterReconciler {
    members: Vec<Member>,
    emails: HashSet<String>,
}

impl RosterReconciler {
    /// Fails on a member without an email or on two members sharing one
    pub fn new(members: Vec<Member>) -> Result<Self> {
        let mut emails = HashSet::with_capacity(members.len());

        for member in &members {
            require_identity(member)?;
            if !emails.insert(member.email.clone()) {
                return Err(RosterError::DuplicateMember {
                    email: member.email.clone(),
                });
            }
        }

        Ok(RosterReconciler { members, emails })
    }

    pub fn contains(&self, email: &str) -> bool {
        self.emails.contains(email)
    }

    /// Append every previously published member whose email is not already
    /// present, in their published order.
    pub fn merge(self, previous: Option<Vec<Member>>) -> Result<(Vec<Member>, ReconciliationReport)> {
        let RosterReconciler {
            mut members,
            mut emails,
        } = self;

        let mut report = ReconciliationReport {
            built: members.len(),
            ..Default::default()
        };

        for old in previous.into_iter().flatten() {
            require_identity(&old)?;

            if emails.contains(&old.email) {
                tracing::debug!(email = %old.email, "published record superseded");
                report.superseded.push(old.email);
                continue;
            }

            emails.insert(old.email.clone());
            members.push(old);
            report.carried_over += 1;
        }

        tracing::info!(
            built = report.built,
            carried_over = report.carried_over,
            superseded = report.superseded.len(),
            "reconciled roster"
        );
        Ok((members, report))
    }
}

/// New members merged with the published ones, new data first
pub fn reconcile(members: Vec<Member>, previous: Option<Vec<Member>>) -> Result<Vec<Member>> {
    RosterReconciler::new(members)?
        .merge(previous)
        .map(|(merged, _)| merged)
}

fn require_identity(member: &Member) -> Result<()> {
    if member.has_identity() {
        Ok(())
    } else {
        Err(RosterError::MissingIdentity {
            record: member.label(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Role, Team};
    use serde_json::json;

    fn create_test_member(email: &str, name: &str) -> Member {
        serde_json::from_value(json!({
            "name": name,
            "email": email,
            "startYear": 2021,
            "endYear": 2024,
            "roles": [{"role": "Engineer", "team": "Software", "lead": false}]
        }))
        .unwrap()
    }

    #[test]
    fn test_new_record_replaces_old() {
        let new = vec![create_test_member("old@x.com", "New Name")];
        let mut stale = create_test_member("old@x.com", "Old Name");
        stale.roles.push(Role::new("Treasurer", Team::Finance, false));

        let (merged, report) = RosterReconciler::new(new.clone())
            .unwrap()
            .merge(Some(vec![stale]))
            .unwrap();

        assert_eq!(merged, new);
        assert_eq!(report.superseded, vec!["old@x.com".to_string()]);
        assert_eq!(report.carried_over, 0);
    }

    #[test]
    fn test_departed_member_preserved_verbatim() {
        let new = vec![create_test_member("a@x.com", "Ada")];
        let mut old = create_test_member("old@x.com", "Old Timer");
        old.extra.insert("startDate".to_string(), json!("2018-09-01"));

        let merged = reconcile(new, Some(vec![old.clone()])).unwrap();

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].email, "a@x.com");
        assert_eq!(merged[1], old);
    }

    #[test]
    fn test_each_email_appears_once() {
        let new = vec![
            create_test_member("a@x.com", "Ada"),
            create_test_member("b@x.com", "Bo"),
        ];
        let previous = vec![
            create_test_member("b@x.com", "Bo (2022)"),
            create_test_member("c@x.com", "Cy"),
            create_test_member("c@x.com", "Cy again"),
        ];

        let merged = reconcile(new, Some(previous)).unwrap();
        let emails: Vec<&str> = merged.iter().map(|m| m.email.as_str()).collect();

        assert_eq!(emails, vec!["a@x.com", "b@x.com", "c@x.com"]);
        assert_eq!(merged[1].name, "Bo");
        assert_eq!(merged[2].name, "Cy");
    }

    #[test]
    fn test_no_previous_roster() {
        let new = vec![create_test_member("a@x.com", "Ada")];

        let (merged, report) = RosterReconciler::new(new.clone()).unwrap().merge(None).unwrap();

        assert_eq!(merged, new);
        assert_eq!(report.total(), 1);
    }

    #[test]
    fn test_previous_member_without_email_fails() {
        let new = vec![create_test_member("a@x.com", "Ada")];
        let nameless = create_test_member("", "Ghost");

        match reconcile(new, Some(vec![nameless])).unwrap_err() {
            RosterError::MissingIdentity { record } => assert_eq!(record, "Ghost"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_new_member_without_email_fails() {
        let result = RosterReconciler::new(vec![create_test_member("", "Ghost")]);
        assert!(matches!(result, Err(RosterError::MissingIdentity { .. })));
    }

    #[test]
    fn test_duplicate_new_email_fails() {
        let result = RosterReconciler::new(vec![
            create_test_member("a@x.com", "Ada"),
            create_test_member("a@x.com", "Ada Again"),
        ]);

        match result {
            Err(RosterError::DuplicateMember { email }) => assert_eq!(email, "a@x.com"),
            _ => panic!("expected DuplicateMember"),
        }
    }

    #[test]
    fn test_contains() {
        let reconciler = RosterReconciler::new(vec![create_test_member("a@x.com", "Ada")]).unwrap();
        assert!(reconciler.contains("a@x.com"));
        assert!(!reconciler.contains("b@x.com"));
    }
}
