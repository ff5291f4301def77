//! # flagchart-core
//!
//! Core domain model for the flagchart timeline layout engine.
//!
//! This crate provides:
//! - Domain types: `Task`, `Milestone`, `DateRange`, `ColorCategory`
//! - Chart parameters: `ChartConfig`, `FontStyle`, `FlagOverride`
//! - Input records as handed over by a spreadsheet reader: `Sheet`, `Cell`, `Workbook`
//! - The renderer-facing output: `ChartSpec` and its parts
//! - The `ChartRenderer` trait and the error taxonomy
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use flagchart_core::{ChartConfig, FontStyle, Milestone, Task};
//!
//! let design = Task::new(
//!     "Design",
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
//! );
//! let review = Milestone::new("PQ Review", NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
//!
//! let config = ChartConfig::default()
//!     .font_style(FontStyle::CourierNew)
//!     .select_flag("PQ Review", 2.0);
//! assert!(config.validate().is_ok());
//! assert_eq!(design.name, "Design");
//! assert_eq!(review.label, "PQ Review");
//! ```

pub mod chart;
pub mod records;

pub use chart::{
    Annotation, AnnotationY, Axes, ChartSpec, ConnectorLine, FigureSize, FontSpec, Lane,
    MilestoneMarker, TaskRow, XAnchor,
};
pub use records::{Cell, Sheet, Workbook};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Timeline Items
// ============================================================================

/// A task row: a named bar spanning `[start, finish]`
///
/// Names are row labels, not identities; duplicates render as separate rows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub start: NaiveDate,
    pub finish: NaiveDate,
}

impl Task {
    pub fn new(name: impl Into<String>, start: NaiveDate, finish: NaiveDate) -> Self {
        Self {
            name: name.into(),
            start,
            finish,
        }
    }
}

/// A labeled point-in-time event drawn as a flag above the task rows
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub label: String,
    pub date: NaiveDate,
}

impl Milestone {
    pub fn new(label: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            label: label.into(),
            date,
        }
    }
}

/// Date span covered by a set of tasks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// Earliest task start
    pub min_start: NaiveDate,
    /// Latest task finish
    pub max_finish: NaiveDate,
    /// Span in 30-day months, rounded up
    pub span_months: i64,
}

// ============================================================================
// Color Classification
// ============================================================================

/// Visual category of a milestone flag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorCategory {
    /// Labels mentioning "PQ"
    Pq,
    /// Labels mentioning "TP"
    Tp,
    /// Labels mentioning "today" in any case
    Today,
    Default,
}

impl ColorCategory {
    /// Display color understood by the rendering backend
    pub fn color(&self) -> &'static str {
        match self {
            ColorCategory::Pq => "cadetblue",
            ColorCategory::Tp => "coral",
            ColorCategory::Today => "darkblue",
            ColorCategory::Default => "turquoise",
        }
    }
}

impl fmt::Display for ColorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorCategory::Pq => "PQ",
            ColorCategory::Tp => "TP",
            ColorCategory::Today => "Today",
            ColorCategory::Default => "Default",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Chart Configuration
// ============================================================================

/// Font family used for every text element of the chart
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontStyle {
    #[default]
    Arial,
    #[serde(rename = "Courier New", alias = "CourierNew")]
    CourierNew,
    #[serde(rename = "Times New Roman", alias = "TimesNewRoman")]
    TimesNewRoman,
}

impl FontStyle {
    /// Family name as the rendering backend expects it
    pub fn family(&self) -> &'static str {
        match self {
            FontStyle::Arial => "Arial",
            FontStyle::CourierNew => "Courier New",
            FontStyle::TimesNewRoman => "Times New Roman",
        }
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.family())
    }
}

impl FromStr for FontStyle {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        match folded.as_str() {
            "arial" => Ok(FontStyle::Arial),
            "couriernew" => Ok(FontStyle::CourierNew),
            "timesnewroman" => Ok(FontStyle::TimesNewRoman),
            _ => Err(LayoutError::InvalidConfig(format!("unknown font style '{}'", s))),
        }
    }
}

/// A user request to move one flag to a new vertical position
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlagOverride {
    pub label: String,
    pub position: f64,
}

impl FlagOverride {
    pub fn new(label: impl Into<String>, position: f64) -> Self {
        Self {
            label: label.into(),
            position,
        }
    }
}

/// User-tunable chart parameters
///
/// Missing fields in a serialized config fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    /// Figure height in pixels
    pub height: u32,
    /// Figure width in pixels
    pub width: u32,
    /// Calendar days a flag marker is shifted right of its pole
    pub tick_offset_days: i64,
    /// Fraction of the figure height where the milestone lane begins
    pub split_ratio: f64,
    /// Line width of task bars
    pub arrow_width: f64,
    pub font_style: FontStyle,
    pub font_size: u32,
    /// Label of the flag the user is moving, if any
    pub selected_flag_label: Option<String>,
    /// New position for the selected flag
    pub selected_flag_position: Option<f64>,
}

impl ChartConfig {
    /// Position used when a flag is selected without an explicit height
    pub const DEFAULT_FLAG_POSITION: f64 = 0.5;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn tick_offset_days(mut self, days: i64) -> Self {
        self.tick_offset_days = days;
        self
    }

    pub fn split_ratio(mut self, ratio: f64) -> Self {
        self.split_ratio = ratio;
        self
    }

    pub fn arrow_width(mut self, width: f64) -> Self {
        self.arrow_width = width;
        self
    }

    pub fn font_style(mut self, style: FontStyle) -> Self {
        self.font_style = style;
        self
    }

    pub fn font_size(mut self, size: u32) -> Self {
        self.font_size = size;
        self
    }

    /// Select a flag and the position it should move to
    pub fn select_flag(mut self, label: impl Into<String>, position: f64) -> Self {
        self.selected_flag_label = Some(label.into());
        self.selected_flag_position = Some(position);
        self
    }

    /// The override this config requests for the current render, if any
    pub fn flag_override(&self) -> Option<FlagOverride> {
        self.selected_flag_label.as_ref().map(|label| {
            FlagOverride::new(
                label.clone(),
                self.selected_flag_position
                    .unwrap_or(Self::DEFAULT_FLAG_POSITION),
            )
        })
    }

    /// Check every parameter against its allowed range
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.height == 0 {
            return Err(LayoutError::InvalidConfig("height must be positive".into()));
        }
        if self.width == 0 {
            return Err(LayoutError::InvalidConfig("width must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.split_ratio) {
            return Err(LayoutError::InvalidConfig(format!(
                "split ratio {} is outside [0, 1]",
                self.split_ratio
            )));
        }
        if !self.arrow_width.is_finite() || self.arrow_width <= 0.0 {
            return Err(LayoutError::InvalidConfig(format!(
                "arrow width {} must be a positive number",
                self.arrow_width
            )));
        }
        if self.font_size == 0 {
            return Err(LayoutError::InvalidConfig("font size must be positive".into()));
        }
        match (&self.selected_flag_label, self.selected_flag_position) {
            (None, Some(_)) => Err(LayoutError::InvalidConfig(
                "a flag position was given without selecting a flag".into(),
            )),
            (_, Some(pos)) if !pos.is_finite() => Err(LayoutError::InvalidConfig(format!(
                "flag position {} is not a finite number",
                pos
            ))),
            _ => Ok(()),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            height: 900,
            width: 1500,
            tick_offset_days: 2,
            split_ratio: 0.65,
            arrow_width: 30.0,
            font_style: FontStyle::Arial,
            font_size: 18,
            selected_flag_label: None,
            selected_flag_position: None,
        }
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Rendering backend consuming a finished chart specification
pub trait ChartRenderer {
    type Output;

    /// Render the chart without any further layout computation
    fn render(&self, spec: &ChartSpec) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Required columns absent from a sheet after header normalization
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{sheet} sheet is missing column(s): {}", .missing.join(", "))]
pub struct SchemaError {
    /// Which input sheet ("tasks" or "milestones")
    pub sheet: String,
    /// Canonical names of every missing column, in schema order
    pub missing: Vec<String>,
}

/// The requested override label is not among the current milestones
///
/// Non-fatal: carries the unchanged positions so callers can carry on.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("no milestone labeled '{label}' to move")]
pub struct FlagOverrideNotFound {
    pub label: String,
    pub positions: Vec<f64>,
}

/// Layout error
#[derive(Clone, Debug, PartialEq, Error)]
pub enum LayoutError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("cannot parse {column} '{value}' in row {row} of the {sheet} sheet as a date")]
    DateParse {
        sheet: String,
        /// 1-based data row, headers excluded
        row: usize,
        column: String,
        value: String,
    },

    #[error("no {0} to lay out")]
    EmptyInput(String),

    #[error("invalid chart configuration: {0}")]
    InvalidConfig(String),

    #[error("shifting {date} by {days} days leaves the supported calendar")]
    DateOutOfRange { date: NaiveDate, days: i64 },
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),
}

// ============================================================================
// Tests
// ============================================================================
