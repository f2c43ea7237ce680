// 🔄 Roster Pipeline - sheet rows → published roster
//
// rows → (image normalize, build) per row → reconcile with published → format
//
// Any error aborts the run before the roster file is touched. Image files
// already normalized by earlier rows stay normalized; re-runs reuse them.

use crate::builder::MemberBuilder;
use crate::config::RosterConfig;
use crate::entities::{Member, Team};
use crate::error::Result;
use crate::images::ImageNormalizer;
use crate::reconciliation::{ReconciliationReport, RosterReconciler};
use crate::roster::{format_roster, Roster};
use crate::sheet::{read_sheet, SheetRow};
use crate::store::{load_previous, write_roster};
use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// RUN SUMMARY
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub rows: usize,
    pub photos: usize,
    pub reconciliation: ReconciliationReport,
    pub buckets: Vec<(Team, usize)>,
}

impl RunSummary {
    pub fn entries(&self) -> usize {
        self.buckets.iter().map(|(_, n)| n).sum()
    }
}

// ============================================================================
// STAGES
// ============================================================================

/// Normalize each row's photo and build its member, in sheet order
pub fn build_members(
    rows: &[SheetRow],
    builder: &MemberBuilder,
    images: &ImageNormalizer,
) -> Result<Vec<Member>> {
    let mut members = Vec::with_capacity(rows.len());

    for row in rows {
        let email = builder.identity(row)?;
        let label = if row.name.is_empty() { email } else { row.name.as_str() };

        let image = images.normalize(&row.image, email, label)?;
        let member = builder.build(row, image)?;

        tracing::debug!(email = %member.email, teams = member.roles.len(), "built member");
        members.push(member);
    }

    Ok(members)
}

/// Everything between the sheet and the output file
pub fn assemble(
    rows: &[SheetRow],
    previous: Option<Vec<Member>>,
    builder: &MemberBuilder,
    images: &ImageNormalizer,
) -> Result<(Roster, RunSummary)> {
    let members = build_members(rows, builder, images)?;
    let photos = members.iter().filter(|m| !m.image.is_empty()).count();

    let (merged, reconciliation) = RosterReconciler::new(members)?.merge(previous)?;
    let roster = format_roster(&merged)?;

    let summary = RunSummary {
        rows: rows.len(),
        photos,
        reconciliation,
        buckets: roster.bucket_sizes(),
    };
    Ok((roster, summary))
}

/// Full run: read sheet and published roster, assemble, write output
pub fn run(config: &RosterConfig, now: DateTime<Utc>) -> Result<RunSummary> {
    let rows = read_sheet(&config.sheet_path)?;
    tracing::info!(rows = rows.len(), sheet = %config.sheet_path.display(), "read sheet");

    let previous = load_previous(&config.previous_path)?;

    let builder = MemberBuilder::new(now);
    let images = ImageNormalizer::new(&config.images_dir).with_max_dimension(config.max_image_dimension);
    let (roster, summary) = assemble(&rows, previous, &builder, &images)?;

    write_roster(&config.output_path, &roster)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RosterError;
    use crate::sheet::read_sheet_from;
    use chrono::TimeZone;
    use serde_json::json;
    use tempfile::TempDir;

    const SHEET: &str = "\
Name,Email,Course,Link,Description,Image,Join Date,Leave Date,Legacy,Teams,Hardware Role,Software Role,Management Role
Ada,a@x.com,EEE,,,,2023-09-01,,No,Hardware;Software;,Lead,Engineer,
Bo,old@x.com,Maths,,,,2021-09-01,,No,Management;,,,President
";

    fn builder() -> MemberBuilder {
        MemberBuilder::new(Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap())
    }

    fn previous() -> Vec<Member> {
        vec![
            serde_json::from_value(json!({
                "name": "Bo (old)", "email": "old@x.com", "course": "Physics",
                "roles": [{"role": "Treasurer", "team": "Finance", "lead": false}]
            }))
            .unwrap(),
            serde_json::from_value(json!({
                "name": "Cy", "email": "cy@x.com", "isLegacy": true,
                "roles": [{"role": "Events", "team": "Social", "lead": false}]
            }))
            .unwrap(),
        ]
    }

    #[test]
    fn test_assemble_merges_and_formats() {
        let dir = TempDir::new().unwrap();
        let rows = read_sheet_from(SHEET.as_bytes()).unwrap();

        let (roster, summary) =
            assemble(&rows, Some(previous()), &builder(), &ImageNormalizer::new(dir.path())).unwrap();

        assert_eq!(roster.hardware[0].member.email, "a@x.com");
        assert!(roster.hardware[0].member.roles[0].lead);
        assert!(!roster.software[0].member.roles[1].lead);

        // Bo's new row wins; the old Finance role is gone
        assert!(roster.finance.is_empty());
        assert_eq!(roster.management[0].member.name, "Bo");
        assert_eq!(roster.management[0].id, 2);

        assert_eq!(roster.social[0].member, previous()[1]);
        assert_eq!(roster.social[0].id, 3);

        assert_eq!(summary.rows, 2);
        assert_eq!(summary.photos, 0);
        assert_eq!(summary.reconciliation.carried_over, 1);
        assert_eq!(summary.reconciliation.superseded, vec!["old@x.com".to_string()]);
        assert_eq!(summary.entries(), 4);
    }

    #[test]
    fn test_missing_photo_aborts() {
        let dir = TempDir::new().unwrap();
        let sheet = SHEET.replace("EEE,,,,", "EEE,,,/uploads/ada.jpg,");
        let rows = read_sheet_from(sheet.as_bytes()).unwrap();

        let err = assemble(&rows, None, &builder(), &ImageNormalizer::new(dir.path())).unwrap_err();

        match err {
            RosterError::ImageNotFound { file, member } => {
                assert_eq!(file, "ada.jpg");
                assert_eq!(member, "Ada");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
