//! The record collections a dashboard is computed from.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{
    AttendanceRecord, ClinicVisit, Message, Payment, Sponsorship, StaffMember, Student,
};

/// One consistent view of every collection. A collection the source did
/// not provide is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub students: Vec<Student>,
    #[serde(alias = "financialRecords")]
    pub payments: Vec<Payment>,
    pub attendance: Vec<AttendanceRecord>,
    pub sponsorships: Vec<Sponsorship>,
    pub clinic_visits: Vec<ClinicVisit>,
    pub messages: Vec<Message>,
    pub staff: Vec<StaffMember>,
}

impl Snapshot {
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let snapshot: Snapshot = serde_json::from_reader(reader)?;
        tracing::info!(
            path = %path.display(),
            records = snapshot.record_count(),
            "Loaded JSON snapshot"
        );
        Ok(snapshot)
    }

    /// Reads `students.csv`, `payments.csv`, `attendance.csv`,
    /// `sponsorships.csv`, `clinic_visits.csv`, `messages.csv` and
    /// `staff.csv` from `dir`. Absent files load as empty collections.
    pub fn from_csv_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(Error::Config(format!(
                "{} is not a directory",
                dir.display()
            )));
        }

        let snapshot = Snapshot {
            students: read_csv(dir, "students.csv")?,
            payments: read_csv(dir, "payments.csv")?,
            attendance: read_csv(dir, "attendance.csv")?,
            sponsorships: read_csv(dir, "sponsorships.csv")?,
            clinic_visits: read_csv(dir, "clinic_visits.csv")?,
            messages: read_csv(dir, "messages.csv")?,
            staff: read_csv(dir, "staff.csv")?,
        };
        tracing::info!(
            dir = %dir.display(),
            records = snapshot.record_count(),
            "Loaded CSV snapshot"
        );
        Ok(snapshot)
    }

    pub fn record_count(&self) -> usize {
        self.students.len()
            + self.payments.len()
            + self.attendance.len()
            + self.sponsorships.len()
            + self.clinic_visits.len()
            + self.messages.len()
            + self.staff.len()
    }

    /// A copy holding only the records tied to one student.
    ///
    /// Staff and messages are not student-scoped and are carried over as-is.
    pub fn for_student(&self, student_id: &str) -> Snapshot {
        let owned = |id: &Option<String>| id.as_deref() == Some(student_id);
        Snapshot {
            students: self
                .students
                .iter()
                .filter(|s| s.id == student_id)
                .cloned()
                .collect(),
            payments: self
                .payments
                .iter()
                .filter(|p| owned(&p.student_id))
                .cloned()
                .collect(),
            attendance: self
                .attendance
                .iter()
                .filter(|a| owned(&a.student_id))
                .cloned()
                .collect(),
            sponsorships: self
                .sponsorships
                .iter()
                .filter(|s| owned(&s.student_id))
                .cloned()
                .collect(),
            clinic_visits: self
                .clinic_visits
                .iter()
                .filter(|v| owned(&v.student_id))
                .cloned()
                .collect(),
            messages: self.messages.clone(),
            staff: self.staff.clone(),
        }
    }
}

fn read_csv<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<Vec<T>> {
    let path = dir.join(file);
    if !path.exists() {
        tracing::warn!(path = %path.display(), "CSV collection missing, treating as empty");
        return Ok(Vec::new());
    }

    let csv_error = |source: csv::Error| Error::Csv {
        file: file.to_string(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(&path)
        .map_err(csv_error)?;

    let headers = reader.headers().map_err(csv_error)?.clone();
    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_error)?;
        rows.push(serde_json::from_value(row_value(&headers, &record))?);
    }
    Ok(rows)
}

/// Keeps every cell as text so ids like `0042` or names like `Nan` reach
/// the record unchanged. Empty cells are left out and take their default.
fn row_value(headers: &csv::StringRecord, record: &csv::StringRecord) -> serde_json::Value {
    let fields = headers
        .iter()
        .zip(record.iter())
        .filter(|(_, cell)| !cell.is_empty())
        .map(|(header, cell)| (header.to_string(), serde_json::Value::String(cell.to_string())))
        .collect();
    serde_json::Value::Object(fields)
}
