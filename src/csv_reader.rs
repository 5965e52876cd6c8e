use crate::structs::{CogError, Cluster, Result, StudentDataset, StudentRecord};
use chrono::{SecondsFormat, Utc};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Columns every upload must provide, in canonical order
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "student_id",
    "name",
    "class",
    "comprehension",
    "attention",
    "focus",
    "retention",
    "assessment_score",
    "engagement_time",
];

const CLUSTER_COLUMN: &str = "cluster";

impl StudentDataset {
    /// Parse a student CSV file
    ///
    /// # Errors
    /// Returns error if the file is not a `.csv`, cannot be read, or fails validation
    pub fn from_file(path: &Path) -> Result<Self> {
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if !is_csv {
            return Err(CogError::Validation("Only CSV files are allowed".into()));
        }

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.csv")
            .to_string();

        let file = std::fs::File::open(path)?;
        Self::from_reader(file, &filename)
    }

    /// Parse student CSV content from any reader
    ///
    /// # Errors
    /// Returns error if required columns are missing or no valid rows remain
    pub fn from_reader<R: Read>(source: R, filename: &str) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(source);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(str::to_lowercase)
            .collect();

        if headers.iter().all(String::is_empty) {
            return Err(no_rows_error());
        }

        let layout = ColumnLayout::resolve(&headers)?;

        let mut students = Vec::new();
        let mut row_count = 0usize;
        for (line, result) in reader.records().enumerate() {
            let record = result?;
            if record.iter().all(str::is_empty) {
                continue;
            }
            row_count += 1;
            match layout.parse_row(&record) {
                Ok(Some(student)) => students.push(student),
                Ok(None) => debug!(row = line + 1, "skipping short row"),
                Err(reason) => warn!(row = line + 1, "skipping row: {reason}"),
            }
        }

        if row_count == 0 {
            return Err(no_rows_error());
        }
        if students.is_empty() {
            return Err(CogError::Validation(
                "No valid student records found in CSV".into(),
            ));
        }

        info!(filename, records = students.len(), "dataset loaded");

        let record_count = students.len();
        Ok(Self {
            students,
            uploaded_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            filename: filename.to_string(),
            record_count,
        })
    }
}

fn no_rows_error() -> CogError {
    CogError::Validation("CSV file must contain at least a header and one data row".into())
}

/// Header positions for the columns we read
struct ColumnLayout {
    required: [usize; 9],
    cluster: Option<usize>,
}

impl ColumnLayout {
    fn resolve(headers: &[String]) -> Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h == name);

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|&c| position(c).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(CogError::Validation(format!(
                "Missing required columns: {}",
                missing.join(", ")
            )));
        }

        let mut required = [0usize; 9];
        for (slot, name) in required.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = position(name).unwrap_or_default();
        }

        Ok(Self {
            required,
            cluster: position(CLUSTER_COLUMN),
        })
    }

    /// `Ok(None)` for rows too short to hold every required column
    fn parse_row(&self, record: &StringRecord) -> std::result::Result<Option<StudentRecord>, String> {
        if record.len() < REQUIRED_COLUMNS.len() {
            return Ok(None);
        }
        let Some(cells) = self
            .required
            .iter()
            .map(|&i| record.get(i))
            .collect::<Option<Vec<&str>>>()
        else {
            return Ok(None);
        };

        let cluster = match self.cluster.and_then(|i| record.get(i)) {
            None | Some("") => None,
            Some(raw) => Some(parse_cluster(raw)?),
        };

        Ok(Some(StudentRecord {
            student_id: cells[0].to_string(),
            name: cells[1].to_string(),
            class: cells[2].to_string(),
            comprehension: parse_number(cells[3]),
            attention: parse_number(cells[4]),
            focus: parse_number(cells[5]),
            retention: parse_number(cells[6]),
            assessment_score: parse_number(cells[7]),
            engagement_time: parse_number(cells[8]),
            cluster,
        }))
    }
}

/// Read the leading number of a cell, so `85%` is 85; cells without one read as zero
fn parse_number(raw: &str) -> f64 {
    leading_number(raw.trim_start())
        .and_then(|n| n.parse::<f64>().ok())
        .filter(|v| !v.is_nan())
        .unwrap_or(0.0)
}

/// Longest prefix of `s` that is a decimal number or a signed `Infinity`
fn leading_number(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let digits = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    if s[end..].starts_with("Infinity") {
        return Some(&s[..end + "Infinity".len()]);
    }

    let int_digits = digits(end);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits(end + 1);
        end += 1 + frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = digits(exp);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    Some(&s[..end])
}

fn parse_cluster(raw: &str) -> std::result::Result<Cluster, String> {
    raw.parse::<u8>()
        .ok()
        .and_then(Cluster::from_id)
        .ok_or_else(|| format!("invalid cluster tag '{raw}', expected 0-3"))
}

/// Write students as CSV with the canonical header
///
/// # Errors
/// Returns error if the file cannot be written
pub fn write_students(path: &Path, students: &[StudentRecord]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
    for student in students {
        writer.serialize(student)?;
    }
    writer.flush()?;
    Ok(())
}
