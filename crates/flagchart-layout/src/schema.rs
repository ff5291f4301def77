//! Column validation and cell coercion for the two input sheets
//!
//! Headers are matched case-insensitively against the canonical column
//! names. Unknown headers are ignored; every missing required column is
//! reported in one [`SchemaError`].

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};
use flagchart_core::{Cell, LayoutError, Milestone, SchemaError, Sheet, Task};

pub const TASKS_SHEET: &str = "tasks";
pub const MILESTONES_SHEET: &str = "milestones";

/// Required task columns, in canonical spelling
pub const TASK_COLUMNS: [&str; 3] = ["Task", "Start", "Finish"];

/// Required milestone columns, in canonical spelling
pub const MILESTONE_COLUMNS: [&str; 2] = ["label", "date"];

/// Day zero of spreadsheet serial dates
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Serial number of 9999-12-31, the last date spreadsheets represent
const MAX_SERIAL: f64 = 2_958_465.0;

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d.%m.%Y"];

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Canonical name for a raw header, if it is one we know
pub fn canonical_column(header: &str) -> Option<&'static str> {
    match header.trim().to_lowercase().as_str() {
        "task" => Some("Task"),
        "start" => Some("Start"),
        "finish" => Some("Finish"),
        "label" => Some("label"),
        "date" => Some("date"),
        _ => None,
    }
}

/// Positions of the required columns within a sheet
#[derive(Debug)]
struct Columns<const N: usize> {
    indices: [usize; N],
}

impl<const N: usize> Columns<N> {
    fn resolve(sheet: &Sheet, name: &str, required: [&'static str; N]) -> Result<Self, SchemaError> {
        let mut indices = [0; N];
        let mut missing = Vec::new();

        for (slot, column) in required.iter().enumerate() {
            let found = sheet
                .headers
                .iter()
                .position(|header| canonical_column(header) == Some(*column));
            match found {
                Some(index) => indices[slot] = index,
                None => missing.push((*column).to_string()),
            }
        }

        if missing.is_empty() {
            Ok(Self { indices })
        } else {
            Err(SchemaError {
                sheet: name.to_string(),
                missing,
            })
        }
    }

    fn cell<'a>(&self, row: &'a [Cell], slot: usize) -> &'a Cell {
        static EMPTY: Cell = Cell::Empty;
        row.get(self.indices[slot]).unwrap_or(&EMPTY)
    }
}

/// Check that both sheets carry their required columns
///
/// The task sheet is checked first.
pub fn validate(tasks: &Sheet, milestones: &Sheet) -> Result<(), SchemaError> {
    Columns::resolve(tasks, TASKS_SHEET, TASK_COLUMNS)?;
    Columns::resolve(milestones, MILESTONES_SHEET, MILESTONE_COLUMNS)?;
    Ok(())
}

/// Typed tasks from the task sheet, in row order
///
/// Rows without any content are skipped.
pub fn parse_tasks(sheet: &Sheet) -> Result<Vec<Task>, LayoutError> {
    let columns = Columns::resolve(sheet, TASKS_SHEET, TASK_COLUMNS)?;

    data_rows(sheet)
        .map(|(row, cells)| -> Result<Task, LayoutError> {
            let name = columns.cell(cells, 0).to_text();
            let start = date_cell(columns.cell(cells, 1), TASKS_SHEET, row, "Start")?;
            let finish = date_cell(columns.cell(cells, 2), TASKS_SHEET, row, "Finish")?;
            Ok(Task::new(name, start, finish))
        })
        .collect()
}

/// Typed milestones from the milestone sheet, in row order
pub fn parse_milestones(sheet: &Sheet) -> Result<Vec<Milestone>, LayoutError> {
    let columns = Columns::resolve(sheet, MILESTONES_SHEET, MILESTONE_COLUMNS)?;

    data_rows(sheet)
        .map(|(row, cells)| -> Result<Milestone, LayoutError> {
            let label = columns.cell(cells, 0).to_text();
            let date = date_cell(columns.cell(cells, 1), MILESTONES_SHEET, row, "date")?;
            Ok(Milestone::new(label, date))
        })
        .collect()
}

/// Raw milestone labels, without parsing any dates
pub fn milestone_labels(sheet: &Sheet) -> Result<Vec<String>, SchemaError> {
    let columns = Columns::resolve(sheet, MILESTONES_SHEET, MILESTONE_COLUMNS)?;
    Ok(data_rows(sheet)
        .map(|(_, cells)| columns.cell(cells, 0).to_text())
        .collect())
}

/// Non-blank rows with their 1-based row numbers
fn data_rows(sheet: &Sheet) -> impl Iterator<Item = (usize, &[Cell])> {
    sheet
        .rows
        .iter()
        .enumerate()
        .filter(|(_, cells)| !cells.iter().all(Cell::is_empty))
        .map(|(i, cells)| (i + 1, cells.as_slice()))
}

fn date_cell(cell: &Cell, sheet: &str, row: usize, column: &str) -> Result<NaiveDate, LayoutError> {
    parse_date(cell).ok_or_else(|| LayoutError::DateParse {
        sheet: sheet.to_string(),
        row,
        column: column.to_string(),
        value: cell.to_text(),
    })
}

/// Interpret a cell as a calendar date
///
/// Text may be a plain date in one of the accepted layouts or a date-time,
/// whose time of day is dropped. Numbers are spreadsheet serial dates, with
/// any fraction of a day dropped.
pub fn parse_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Text(text) => parse_date_text(text.trim()),
        Cell::Number(serial) => from_serial(*serial),
        Cell::Empty => None,
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    if text.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

fn from_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial > MAX_SERIAL {
        return None;
    }
    let (year, month, day) = SERIAL_EPOCH;
    NaiveDate::from_ymd_opt(year, month, day)?.checked_add_days(Days::new(serial.floor() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn headers_are_case_insensitive() {
        assert_eq!(canonical_column("TASK"), Some("Task"));
        assert_eq!(canonical_column(" finish "), Some("Finish"));
        assert_eq!(canonical_column("Label"), Some("label"));
        assert_eq!(canonical_column("Owner"), None);
    }

    #[test]
    fn missing_columns_are_listed_together() {
        let sheet = Sheet::new(["task", "owner"]);
        let err = parse_tasks(&sheet).unwrap_err();
        assert_eq!(
            err,
            LayoutError::Schema(SchemaError {
                sheet: "tasks".into(),
                missing: vec!["Start".into(), "Finish".into()],
            })
        );
    }

    #[test]
    fn columns_may_appear_in_any_order() {
        let sheet = Sheet::new(["FINISH", "Notes", "start", "Task"])
            .row(["2024-02-01", "n/a", "2024-01-01", "Design"]);
        let tasks = parse_tasks(&sheet).unwrap();
        assert_eq!(tasks, vec![Task::new("Design", date(2024, 1, 1), date(2024, 2, 1))]);
    }

    #[test]
    fn blank_rows_are_skipped_but_counted() {
        let sheet = Sheet::new(["Label", "Date"])
            .row(vec![Cell::Empty, Cell::Empty])
            .row(["Kickoff", "yesterday"]);
        let err = parse_milestones(&sheet).unwrap_err();
        assert_eq!(
            err,
            LayoutError::DateParse {
                sheet: "milestones".into(),
                row: 2,
                column: "date".into(),
                value: "yesterday".into(),
            }
        );
    }

    #[test]
    fn short_rows_read_as_empty_cells() {
        let sheet = Sheet::new(["Task", "Start", "Finish"]).row(["Design", "2024-01-01"]);
        let err = parse_tasks(&sheet).unwrap_err();
        assert!(matches!(err, LayoutError::DateParse { ref column, .. } if column == "Finish"));
    }

    #[test]
    fn numeric_labels_become_text() {
        let sheet = Sheet::new(["label", "date"]).row(vec![Cell::Number(7.0), Cell::from("2024-05-05")]);
        assert_eq!(milestone_labels(&sheet).unwrap(), vec!["7".to_string()]);
    }

    #[test]
    fn date_layouts() {
        let expected = date(2024, 1, 15);
        for text in [
            "2024-01-15",
            "15/01/2024",
            "2024/01/15",
            "15.01.2024",
            "2024-01-15 00:00:00",
            "2024-01-15T13:45:00",
            "2024-01-15T13:45:00.250",
            "2024-01-15T08:00:00+02:00",
        ] {
            assert_eq!(parse_date(&Cell::from(text)), Some(expected), "{}", text);
        }
        assert_eq!(parse_date(&Cell::from("Jan 15")), None);
        assert_eq!(parse_date(&Cell::Empty), None);
    }

    #[test]
    fn serial_dates() {
        assert_eq!(parse_date(&Cell::Number(45306.0)), Some(date(2024, 1, 15)));
        assert_eq!(parse_date(&Cell::Number(45306.75)), Some(date(2024, 1, 15)));
        assert_eq!(parse_date(&Cell::Number(1.0)), Some(date(1899, 12, 31)));
        assert_eq!(parse_date(&Cell::Number(0.0)), None);
        assert_eq!(parse_date(&Cell::Number(-3.0)), None);
        assert_eq!(parse_date(&Cell::Number(f64::NAN)), None);
    }

    #[test]
    fn validate_reports_task_sheet_first() {
        let tasks = Sheet::new(["Task", "Start"]);
        let milestones = Sheet::new(["date"]);
        let err = validate(&tasks, &milestones).unwrap_err();
        assert_eq!(err.sheet, "tasks");
        assert_eq!(err.missing, vec!["Finish".to_string()]);

        let tasks = Sheet::new(["Task", "Start", "Finish"]);
        let err = validate(&tasks, &milestones).unwrap_err();
        assert_eq!(err.sheet, "milestones");
        assert_eq!(err.missing, vec!["label".to_string()]);
    }
}
