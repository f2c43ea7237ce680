// 🏷️ Role Classification - lead detection
//
// Heuristic, not a title list: a role is a lead role when its text contains
// "Head of" or "Director", or contains "Lead" outside the Management team.
// Matching is case-sensitive substring containment.

use crate::entities::Team;

const ALWAYS_LEAD: [&str; 2] = ["Head of", "Director"];
const TEAM_LEAD: &str = "Lead";

/// Whether `role` denotes a lead position within `team`
pub fn is_lead(role: &str, team: Team) -> bool {
    if ALWAYS_LEAD.iter().any(|marker| role.contains(marker)) {
        return true;
    }

    // Management roles are all leadership; "Lead" there is not a team lead
    role.contains(TEAM_LEAD) && team != Team::Management
}
