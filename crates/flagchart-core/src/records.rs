//! Loosely-typed spreadsheet records
//!
//! A spreadsheet reader hands over each sheet as a header row plus data rows
//! of untyped cells. Nothing here is validated; the layout engine normalizes
//! headers and coerces cells when it builds a chart.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// A single spreadsheet cell
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(text) => text.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Cell content as display text
    ///
    /// Integral numbers lose their fractional part, so a label typed as `3`
    /// reads "3" rather than "3.0".
    pub fn to_text(&self) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
            Cell::Empty => String::new(),
        }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::Text(text.to_string())
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::Text(text)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

/// One sheet: headers plus rows of cells
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new<H: Into<String>>(headers: impl IntoIterator<Item = H>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a data row
    pub fn row<C: Into<Cell>>(mut self, cells: impl IntoIterator<Item = C>) -> Self {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }
}

/// The two-sheet upload: tasks first, milestones second
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    /// Upload file name, if known
    #[serde(default)]
    pub name: Option<String>,
    pub tasks: Sheet,
    pub milestones: Sheet,
}

impl Workbook {
    pub fn new(tasks: Sheet, milestones: Sheet) -> Self {
        Self {
            name: None,
            tasks,
            milestones,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Chart title: the file name without its extension
    pub fn title(&self) -> Option<String> {
        let name = self.name.as_deref()?;
        let stem = Path::new(name).file_stem()?.to_string_lossy().into_owned();
        (!stem.is_empty()).then_some(stem)
    }
}
