//! Student export columns selectable by key.

use campuslens_models::SemesterPerformanceReport;

use super::{Cell, Column, Table};
use crate::grading::latest_sgpa;

/// Spreadsheet width applied to every student column.
const STUDENT_COLUMN_WIDTH: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentColumn {
    RegisteredNo,
    Name,
    Branch,
    CurrentSemester,
    Sgpa,
    Cgpa,
    BacklogCount,
    TotalCredits,
    EarnedCredits,
}

impl StudentColumn {
    pub const ALL: [StudentColumn; 9] = [
        StudentColumn::RegisteredNo,
        StudentColumn::Name,
        StudentColumn::Branch,
        StudentColumn::CurrentSemester,
        StudentColumn::Sgpa,
        StudentColumn::Cgpa,
        StudentColumn::BacklogCount,
        StudentColumn::TotalCredits,
        StudentColumn::EarnedCredits,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            StudentColumn::RegisteredNo => "registered_no",
            StudentColumn::Name => "name",
            StudentColumn::Branch => "branch",
            StudentColumn::CurrentSemester => "curr_semester",
            StudentColumn::Sgpa => "sgpa",
            StudentColumn::Cgpa => "cgpa",
            StudentColumn::BacklogCount => "backlog_count",
            StudentColumn::TotalCredits => "total_credits",
            StudentColumn::EarnedCredits => "earned_credits",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StudentColumn::RegisteredNo => "Registration Number",
            StudentColumn::Name => "Name",
            StudentColumn::Branch => "Branch",
            StudentColumn::CurrentSemester => "Current Semester",
            StudentColumn::Sgpa => "SGPA",
            StudentColumn::Cgpa => "CGPA",
            StudentColumn::BacklogCount => "Backlog Count",
            StudentColumn::TotalCredits => "Total Credits",
            StudentColumn::EarnedCredits => "Earned Credits",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    pub fn value(&self, report: &SemesterPerformanceReport) -> Cell {
        let student = &report.student;
        match self {
            StudentColumn::RegisteredNo => Cell::text(student.registration_number.clone()),
            StudentColumn::Name => Cell::text(student.name.clone()),
            StudentColumn::Branch => Cell::text(student.branch.clone()),
            StudentColumn::CurrentSemester => Cell::Integer(student.current_semester.into()),
            StudentColumn::Sgpa => latest_sgpa(&report.semester_grades)
                .map(Cell::Decimal)
                .unwrap_or(Cell::Empty),
            StudentColumn::Cgpa => Cell::Decimal(report.cgpa),
            StudentColumn::BacklogCount => Cell::Integer(report.failed_subjects.len() as i64),
            StudentColumn::TotalCredits => Cell::Integer(report.total_credits.into()),
            StudentColumn::EarnedCredits => Cell::Integer(report.earned_credits.into()),
        }
    }
}

/// How header cells are titled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStyle {
    /// The key upper-cased with underscores as spaces: `CURR SEMESTER`
    Key,
    /// Human readable label: `Current Semester`
    Label,
}

fn header(key: &str, column: Option<StudentColumn>, style: HeaderStyle) -> String {
    match (style, column) {
        (HeaderStyle::Label, Some(column)) => column.label().to_string(),
        _ => key.replace('_', " ").to_uppercase(),
    }
}

/// One row per student over the requested column keys. Unknown keys get a
/// header and blank cells; no keys selects every known column.
pub fn student_table(
    reports: &[SemesterPerformanceReport],
    keys: &[String],
    style: HeaderStyle,
) -> Table {
    let keys: Vec<String> = if keys.is_empty() {
        StudentColumn::ALL.iter().map(|c| c.key().to_string()).collect()
    } else {
        keys.to_vec()
    };
    let resolved: Vec<(&str, Option<StudentColumn>)> = keys
        .iter()
        .map(|k| (k.as_str(), StudentColumn::from_key(k)))
        .collect();

    let columns = resolved
        .iter()
        .map(|(key, column)| Column::new(header(key, *column, style), STUDENT_COLUMN_WIDTH))
        .collect();

    let rows = reports
        .iter()
        .map(|report| {
            resolved
                .iter()
                .map(|(_, column)| column.map(|c| c.value(report)).unwrap_or(Cell::Empty))
                .collect()
        })
        .collect();

    Table {
        sheet_name: "Students".to_string(),
        columns,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{CsvWriter, TableWriter};
    use crate::grading::fixtures::report;

    fn keys(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn excel_headers_are_upper_cased_keys() {
        let table = student_table(
            &[report("21A91A0501", "Asha")],
            &keys(&["registered_no", "curr_semester", "attendance"]),
            HeaderStyle::Key,
        );
        let titles: Vec<&str> = table.columns.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["REGISTERED NO", "CURR SEMESTER", "ATTENDANCE"]);
        assert!(table.columns.iter().all(|c| c.width == 20.0));
        assert_eq!(table.rows[0][2], Cell::Empty);
    }

    #[test]
    fn csv_headers_are_labels() {
        let table = student_table(
            &[report("21A91A0501", "Asha")],
            &keys(&["registered_no", "curr_semester"]),
            HeaderStyle::Label,
        );
        assert_eq!(table.columns[0].title, "Registration Number");
        assert_eq!(table.columns[1].title, "Current Semester");
    }

    #[test]
    fn values_come_from_the_report() {
        let table = student_table(
            &[report("21A91A0501", "Asha")],
            &keys(&["sgpa", "cgpa", "backlog_count", "total_credits", "earned_credits"]),
            HeaderStyle::Key,
        );
        // semester 2: (32 + 6) / 6
        assert_eq!(
            table.rows[0],
            vec![
                Cell::Decimal(6.33),
                Cell::Decimal(7.31),
                Cell::Integer(1),
                Cell::Integer(13),
                Cell::Integer(11),
            ]
        );
    }

    #[test]
    fn no_keys_means_every_column() {
        let table = student_table(&[report("A1", "Asha"), report("B2", "Ben")], &[], HeaderStyle::Label);
        assert_eq!(table.columns.len(), StudentColumn::ALL.len());
        assert_eq!(table.rows.len(), 2);

        let csv = String::from_utf8(CsvWriter.write(&table).unwrap()).unwrap();
        assert!(csv.starts_with("Registration Number,Name,Branch,Current Semester,SGPA,CGPA"));
        assert!(csv.contains("\nB2,Ben,CSE,3,6.33,7.31,1,13,11\n"));
    }
}
