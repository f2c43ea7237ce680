// Entity Models
// Identity is the email; every other field is a value rebuilt each run.

pub mod member;
pub mod team;

pub use member::{Member, Role};
pub use team::Team;
