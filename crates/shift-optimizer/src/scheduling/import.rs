use super::domain::{EmployeeRecord, ShiftRecord};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Empty { file: &'static str },
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster file: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::Empty { file } => write!(f, "Empty {}.csv", file),
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::Empty { .. } => None,
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads `employees.csv` / `shifts.csv` exports into request records.
///
/// Employees: `id,name,skills,max_hours,availability_start,availability_end`,
/// where `skills` is a comma separated list inside one field.
/// Shifts: `id,role,start_time,end_time,required_skill`.
pub struct RosterImporter;

impl RosterImporter {
    pub fn employees_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<EmployeeRecord>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::employees_from_reader(file)
    }

    pub fn employees_from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<EmployeeRecord>, RosterImportError> {
        let rows: Vec<EmployeeRow> = read_rows(reader)?;
        if rows.is_empty() {
            return Err(RosterImportError::Empty { file: "employees" });
        }
        Ok(rows.into_iter().map(EmployeeRow::into_record).collect())
    }

    pub fn shifts_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ShiftRecord>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::shifts_from_reader(file)
    }

    pub fn shifts_from_reader<R: Read>(reader: R) -> Result<Vec<ShiftRecord>, RosterImportError> {
        let rows: Vec<ShiftRecord> = read_rows(reader)?;
        if rows.is_empty() {
            return Err(RosterImportError::Empty { file: "shifts" });
        }
        Ok(rows)
    }
}

fn read_rows<R: Read, T: DeserializeOwned>(reader: R) -> Result<Vec<T>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for row in csv_reader.deserialize::<T>() {
        rows.push(row?);
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct EmployeeRow {
    id: String,
    name: String,
    skills: String,
    max_hours: f64,
    availability_start: String,
    availability_end: String,
}

impl EmployeeRow {
    fn into_record(self) -> EmployeeRecord {
        EmployeeRecord {
            id: self.id,
            name: self.name,
            skills: self
                .skills
                .split(',')
                .map(str::trim)
                .filter(|skill| !skill.is_empty())
                .map(str::to_string)
                .collect(),
            max_hours: self.max_hours,
            availability_start: self.availability_start,
            availability_end: self.availability_end,
        }
    }
}
