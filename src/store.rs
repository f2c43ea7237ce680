// 💾 Roster Store - published team_details.json on disk
//
// Reading flattens the buckets back into one member list (first appearance
// per email wins). Writing goes to a sibling temp file and is renamed into
// place, so a failed run never leaves a half-written roster.

use crate::entities::{Member, Team};
use crate::error::{Result, RosterError};
use crate::roster::{Roster, RosterEntry};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const INDENT: &[u8] = b"    ";

/// Previously published members, or None when nothing was published yet
pub fn load_previous(path: &Path) -> Result<Option<Vec<Member>>> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "no published roster found");
        return Ok(None);
    }

    let raw = fs::read_to_string(path).map_err(|e| RosterError::io(path, e))?;
    let buckets: Map<String, Value> = serde_json::from_str(&raw)?;
    let members = published_members(buckets)?;

    tracing::info!(path = %path.display(), members = members.len(), "loaded published roster");
    Ok(Some(members))
}

/// Flatten published buckets into unique members, in file order. A bucket
/// outside the fixed team set fails instead of losing its members.
pub fn published_members(buckets: Map<String, Value>) -> Result<Vec<Member>> {
    let mut seen = HashSet::new();
    let mut members = Vec::new();

    for (bucket, entries) in buckets {
        let entries: Vec<RosterEntry> = serde_json::from_value(entries)?;

        if Team::parse(&bucket).is_none() {
            let member = entries
                .first()
                .map(|entry| entry.member.label())
                .unwrap_or_else(|| format!("bucket {}", bucket));
            return Err(RosterError::UnknownTeam { member, team: bucket });
        }

        for RosterEntry { member, .. } in entries {
            if !member.has_identity() {
                return Err(RosterError::MissingIdentity {
                    record: member.label(),
                });
            }

            if seen.insert(member.email.clone()) {
                members.push(member);
            }
        }
    }

    Ok(members)
}

fn write_pretty<W: Write>(writer: W, roster: &Roster) -> Result<()> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
    roster.serialize(&mut ser)?;
    Ok(())
}

/// Write `roster` to `path` atomically
pub fn write_roster(path: &Path, roster: &Roster) -> Result<()> {
    let tmp = temp_path(path);

    let result = (|| {
        let file = File::create(&tmp).map_err(|e| RosterError::io(&tmp, e))?;
        let mut writer = BufWriter::new(file);
        write_pretty(&mut writer, roster)?;
        writer.flush().map_err(|e| RosterError::io(&tmp, e))?;
        fs::rename(&tmp, path).map_err(|e| RosterError::io(path, e))
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result?;

    tracing::info!(path = %path.display(), entries = roster.len(), "wrote roster");
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
