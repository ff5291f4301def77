//! Chart specification handed to a rendering backend
//!
//! A `ChartSpec` is fully resolved: dates are already shifted, colors already
//! chosen and labels already wrapped. A backend only has to draw it.
//!
//! The figure has two lanes sharing one date axis. The milestone lane sits on
//! top (`Axes::milestone_domain`) and holds flags on poles; the task lane
//! below (`Axes::task_domain`) holds one bar per task, addressed by its
//! category label.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::DateRange;

/// A complete, renderable timeline chart
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    /// Chart title, usually the workbook name
    pub title: Option<String>,
    /// Task bars, topmost row first
    pub task_rows: Vec<TaskRow>,
    /// Flags, in milestone input order
    pub milestone_markers: Vec<MilestoneMarker>,
    /// Poles joining each flag to the date axis
    pub connector_lines: Vec<ConnectorLine>,
    /// Text for task rows, then text for flags
    pub annotations: Vec<Annotation>,
    pub axes: Axes,
    pub figure_size: FigureSize,
    pub font: FontSpec,
    pub date_range: DateRange,
}

impl ChartSpec {
    /// Raw milestone labels in input order, for a selection control
    pub fn milestone_labels(&self) -> Vec<String> {
        self.milestone_markers
            .iter()
            .map(|marker| marker.label.clone())
            .collect()
    }
}

/// One task bar with triangle markers at both ends
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRow {
    pub label: String,
    pub x0: NaiveDate,
    pub x1: NaiveDate,
    pub line_width: f64,
    pub marker_size: f64,
}

/// A flag marker in the milestone lane
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneMarker {
    /// Raw label, as found in the milestone sheet
    pub label: String,
    /// Label with `<br>` line breaks for display
    pub wrapped_label: String,
    /// Displayed marker date (anchor shifted by the tick offset)
    pub x: NaiveDate,
    /// True milestone date, where the pole stands
    pub anchor: NaiveDate,
    pub y: f64,
    pub color: String,
    pub marker_size: f64,
}

/// Vertical pole from the axis up to a flag
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorLine {
    pub x: NaiveDate,
    pub y0: f64,
    pub y1: f64,
    pub color: String,
    pub width: f64,
}

/// Which lane an annotation belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lane {
    Tasks,
    Milestones,
}

/// Horizontal text anchor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XAnchor {
    Left,
    Center,
}

/// Vertical coordinate of an annotation
///
/// Task rows are addressed by category label, the milestone lane numerically.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnotationY {
    Value(f64),
    Category(String),
}

/// Free-standing text placed on the chart
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub lane: Lane,
    pub x: NaiveDate,
    pub y: AnnotationY,
    pub text: String,
    pub font_size: u32,
    /// Pixel shift applied after positioning
    pub x_shift: i32,
    pub x_anchor: XAnchor,
}

/// Geometry of the two stacked lanes
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Axes {
    pub split_ratio: f64,
    /// Paper position of the date axis drawn above the task lane
    pub top_axis_offset: f64,
    /// Vertical paper domain `[low, high]` of the milestone lane
    pub milestone_domain: [f64; 2],
    /// Vertical paper domain `[low, high]` of the task lane
    pub task_domain: [f64; 2],
    pub shared_x: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FigureSize {
    pub height: u32,
    pub width: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub size: u32,
}
