// Team Roster - Core Library
// Spreadsheet roster → reconciled, per-team website JSON

pub mod error;
pub mod entities;
pub mod temporal;
pub mod sheet;
pub mod roles;
pub mod images;
pub mod builder;
pub mod reconciliation;
pub mod roster;
pub mod store;
pub mod config;
pub mod pipeline;
pub mod publish;

// Re-export commonly used types
pub use error::{Result, RosterError};
pub use entities::{Member, Role, Team};
pub use sheet::{read_sheet, read_sheet_from, read_workbook, SheetRow};
pub use roles::is_lead;
pub use images::{canonical_filename, ImageNormalizer, MAX_DIMENSION};
pub use builder::MemberBuilder;
pub use reconciliation::{reconcile, ReconciliationReport, RosterReconciler};
pub use roster::{format_roster, Roster, RosterEntry};
pub use store::{load_previous, write_roster};
pub use config::{PublishConfig, RosterConfig};
pub use pipeline::{assemble, build_members, run, RunSummary};
pub use publish::Publisher;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
