// 📂 Sheet Reader - roster spreadsheet (CSV export or workbook) → typed rows
//
// Every required column is resolved once from the header row. A missing
// column fails the whole read; a short row is padded with empty cells.
// Workbooks are read from their first worksheet, with each cell rendered to
// the text a CSV export of it would hold.

use crate::error::{Result, RosterError};
use calamine::{open_workbook_auto, Data, Reader};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const NAME: &str = "Name";
pub const EMAIL: &str = "Email";
pub const COURSE: &str = "Course";
pub const LINK: &str = "Link";
pub const DESCRIPTION: &str = "Description";
pub const IMAGE: &str = "Image";
pub const JOIN_DATE: &str = "Join Date";
pub const LEAVE_DATE: &str = "Leave Date";
pub const LEGACY: &str = "Legacy";
pub const TEAMS: &str = "Teams";

const REQUIRED_COLUMNS: [&str; 10] = [
    NAME, EMAIL, COURSE, LINK, DESCRIPTION, IMAGE, JOIN_DATE, LEAVE_DATE, LEGACY, TEAMS,
];

const ROLE_SUFFIX: &str = " Role";

pub const CSV_EXTENSION: &str = "csv";
pub const WORKBOOK_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

// ============================================================================
// SHEET ROW
// ============================================================================

/// One spreadsheet row with every cell as written (missing cells are "")
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetRow {
    /// 1-based data line, header excluded
    pub line: usize,
    pub name: String,
    pub email: String,
    pub course: String,
    pub link: String,
    pub description: String,
    pub image: String,
    pub join_date: String,
    pub leave_date: String,
    pub legacy: String,
    pub teams: String,

    /// "<Team> Role" cells keyed by team name, for every such column present
    pub roles: BTreeMap<String, String>,
}

impl SheetRow {
    /// Role cell for `team`; None when the sheet has no such column
    pub fn role_for(&self, team: &str) -> Option<&str> {
        self.roles.get(team).map(String::as_str)
    }
}

// ============================================================================
// HEADER LAYOUT
// ============================================================================

#[derive(Debug, Clone)]
struct Layout {
    required: HashMap<&'static str, usize>,
    roles: Vec<(String, usize)>,
}

impl Layout {
    fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        let index: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h, i))
            .collect();

        let mut required = HashMap::new();
        for column in REQUIRED_COLUMNS {
            let i = index.get(column).ok_or_else(|| RosterError::MissingColumn {
                column: column.to_string(),
            })?;
            required.insert(column, *i);
        }

        let roles = headers
            .iter()
            .enumerate()
            .filter_map(|(i, h)| {
                h.strip_suffix(ROLE_SUFFIX)
                    .filter(|team| !team.is_empty())
                    .map(|team| (team.to_string(), i))
            })
            .collect();

        Ok(Layout { required, roles })
    }

    fn cell<'r>(&self, record: &'r csv::StringRecord, column: &str) -> &'r str {
        self.required
            .get(column)
            .and_then(|i| record.get(*i))
            .unwrap_or("")
    }

    fn row(&self, line: usize, record: &csv::StringRecord) -> SheetRow {
        SheetRow {
            line,
            name: self.cell(record, NAME).to_string(),
            email: self.cell(record, EMAIL).to_string(),
            course: self.cell(record, COURSE).to_string(),
            link: self.cell(record, LINK).to_string(),
            description: self.cell(record, DESCRIPTION).to_string(),
            image: self.cell(record, IMAGE).to_string(),
            join_date: self.cell(record, JOIN_DATE).to_string(),
            leave_date: self.cell(record, LEAVE_DATE).to_string(),
            legacy: self.cell(record, LEGACY).to_string(),
            teams: self.cell(record, TEAMS).to_string(),
            roles: self
                .roles
                .iter()
                .map(|(team, i)| (team.clone(), record.get(*i).unwrap_or("").to_string()))
                .collect(),
        }
    }
}

// ============================================================================
// READERS
// ============================================================================

/// True when `path` names a format `read_sheet` understands
pub fn is_supported_sheet(path: &Path) -> bool {
    match extension(path) {
        Some(ext) => ext == CSV_EXTENSION || WORKBOOK_EXTENSIONS.contains(&ext.as_str()),
        None => false,
    }
}

/// Read a roster sheet, choosing the reader by file extension.
/// Anything that is not a workbook is read as CSV.
pub fn read_sheet(path: &Path) -> Result<Vec<SheetRow>> {
    let is_workbook = extension(path)
        .map(|ext| WORKBOOK_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false);
    if is_workbook {
        return read_workbook(path);
    }

    let file = File::open(path).map_err(|e| RosterError::io(path, e))?;
    read_sheet_from(file)
}

pub fn read_sheet_from<R: Read>(reader: R) -> Result<Vec<SheetRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let records = rdr.records().map(|result| result.map_err(RosterError::from));
    collect_rows(&headers, records)
}

/// First worksheet of an .xlsx/.xlsm/.xls/.ods workbook
pub fn read_workbook(path: &Path) -> Result<Vec<SheetRow>> {
    let workbook_error = |source| RosterError::Workbook {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(workbook_error)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| RosterError::EmptyWorkbook {
            path: path.to_path_buf(),
        })?
        .map_err(workbook_error)?;

    let mut rows = range.rows();
    let headers: csv::StringRecord = match rows.next() {
        Some(cells) => cells.iter().map(|cell| cell_text(cell).trim().to_string()).collect(),
        None => csv::StringRecord::new(),
    };
    let records = rows.map(|cells| Ok(cells.iter().map(cell_text).collect::<csv::StringRecord>()));

    collect_rows(&headers, records)
}

fn collect_rows<I>(headers: &csv::StringRecord, records: I) -> Result<Vec<SheetRow>>
where
    I: IntoIterator<Item = Result<csv::StringRecord>>,
{
    let layout = Layout::resolve(headers)?;

    let mut rows = Vec::new();
    for (i, result) in records.into_iter().enumerate() {
        let record = result?;

        // Blank spacer rows in the spreadsheet
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        rows.push(layout.row(i + 1, &record));
    }

    tracing::debug!(rows = rows.len(), "read roster sheet");
    Ok(rows)
}

/// Cell as CSV text. Whole numbers lose their ".0"; dates without a time
/// become YYYY-MM-DD.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => (*f as i64).to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(at) if at.time() == chrono::NaiveTime::MIN => at.format("%Y-%m-%d").to_string(),
            Some(at) => at.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.as_f64().to_string(),
        },
        Data::Error(_) | Data::Empty => String::new(),
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}
