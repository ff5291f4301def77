//! Timeline layout assembly
//!
//! Turns tasks, milestones and a [`ChartConfig`] into a [`ChartSpec`]:
//!
//! 1. Task rows, last input row on top, each with a label to the right of its
//!    start.
//! 2. One flag per milestone: wrapped label, category color, assigned height
//!    from the [`FlagPositioner`], marker shifted by the tick offset, a pole
//!    at the true date and the label just above the flag.
//! 3. Lane geometry, figure size and font straight from the config.
//!
//! Everything fallible runs before the flag state is touched, so a failed
//! build leaves earlier flag moves intact.

use chrono::{Days, NaiveDate};
use flagchart_core::{
    Annotation, AnnotationY, Axes, ChartConfig, ChartSpec, ConnectorLine, FigureSize, FontSpec,
    Lane, LayoutError, Milestone, MilestoneMarker, Task, TaskRow, Workbook, XAnchor,
};
use tracing::{debug, warn};

use crate::color::classify;
use crate::flags::{FlagPositionState, FlagPositioner};
use crate::range::analyze;
use crate::schema;
use crate::wrap::{wrap_with, DEFAULT_LINE_LENGTH};

/// Task markers are this much larger than the bar line width
const TASK_MARKER_PADDING: f64 = 10.0;
/// Pixel gap between a task's start and its label
const TASK_LABEL_SHIFT: i32 = 10;
const FLAG_MARKER_SIZE: f64 = 30.0;
const POLE_WIDTH: f64 = 3.0;
/// Flag text sits this far above the flag
const FLAG_LABEL_LIFT: f64 = 0.2;
/// Paper position of the date axis above the task lane
const TOP_AXIS_OFFSET: f64 = 0.8;
/// Vertical gap between the task lane and the milestone lane
const LANE_GAP: f64 = 0.05;

/// Builds chart specifications for one set of chart parameters
#[derive(Clone, Debug)]
pub struct TimelineLayoutBuilder {
    config: ChartConfig,
    positioner: FlagPositioner,
    wrap_width: usize,
}

impl TimelineLayoutBuilder {
    pub fn new(config: ChartConfig) -> Self {
        Self {
            config,
            positioner: FlagPositioner::default(),
            wrap_width: DEFAULT_LINE_LENGTH,
        }
    }

    /// Use a custom flag positioner
    pub fn positioner(mut self, positioner: FlagPositioner) -> Self {
        self.positioner = positioner;
        self
    }

    /// Wrap flag labels at a different line length
    pub fn wrap_width(mut self, width: usize) -> Self {
        self.wrap_width = width;
        self
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Validate and lay out an uploaded workbook
    ///
    /// Both sheets are checked for their columns before any cell is read.
    pub fn build_workbook(
        &self,
        workbook: &Workbook,
        state: &mut FlagPositionState,
    ) -> Result<ChartSpec, LayoutError> {
        schema::validate(&workbook.tasks, &workbook.milestones)?;
        let tasks = schema::parse_tasks(&workbook.tasks)?;
        let milestones = schema::parse_milestones(&workbook.milestones)?;

        let mut spec = self.build(&tasks, &milestones, state)?;
        spec.title = workbook.title();
        Ok(spec)
    }

    /// Lay out typed tasks and milestones
    pub fn build(
        &self,
        tasks: &[Task],
        milestones: &[Milestone],
        state: &mut FlagPositionState,
    ) -> Result<ChartSpec, LayoutError> {
        let config = &self.config;
        config.validate()?;
        let date_range = analyze(tasks)?;
        debug!(
            tasks = tasks.len(),
            milestones = milestones.len(),
            span_months = date_range.span_months,
            "building timeline layout"
        );

        let mut annotations = Vec::with_capacity(tasks.len() + milestones.len());
        let mut task_rows = Vec::with_capacity(tasks.len());
        for task in tasks.iter().rev() {
            task_rows.push(TaskRow {
                label: task.name.clone(),
                x0: task.start,
                x1: task.finish,
                line_width: config.arrow_width,
                marker_size: config.arrow_width + TASK_MARKER_PADDING,
            });
            annotations.push(Annotation {
                lane: Lane::Tasks,
                x: task.start,
                y: AnnotationY::Category(task.name.clone()),
                text: task.name.clone(),
                font_size: config.font_size,
                x_shift: TASK_LABEL_SHIFT,
                x_anchor: XAnchor::Left,
            });
        }

        let shifted = milestones
            .iter()
            .map(|milestone| shift_days(milestone.date, config.tick_offset_days))
            .collect::<Result<Vec<_>, _>>()?;

        let labels: Vec<&str> = milestones.iter().map(|m| m.label.as_str()).collect();
        let flag_override = config.flag_override();
        let positions = self
            .positioner
            .positions(&labels, state, flag_override.as_ref())
            .unwrap_or_else(|miss| {
                warn!(label = %miss.label, "selected flag is not among the milestones, ignoring");
                miss.positions
            });

        let mut milestone_markers = Vec::with_capacity(milestones.len());
        let mut connector_lines = Vec::with_capacity(milestones.len());
        let mut slot = 0;
        for (milestone, x) in milestones.iter().zip(shifted) {
            // The positioner returns one height per milestone.
            let y = positions
                .get(slot)
                .copied()
                .unwrap_or(ChartConfig::DEFAULT_FLAG_POSITION);
            slot = (slot + 1) % positions.len().max(1);

            let color = classify(&milestone.label).color().to_string();
            let wrapped_label = wrap_with(&milestone.label, self.wrap_width);

            connector_lines.push(ConnectorLine {
                x: milestone.date,
                y0: 0.0,
                y1: y,
                color: color.clone(),
                width: POLE_WIDTH,
            });
            annotations.push(Annotation {
                lane: Lane::Milestones,
                x: milestone.date,
                y: AnnotationY::Value(y + FLAG_LABEL_LIFT),
                text: wrapped_label.clone(),
                font_size: config.font_size,
                x_shift: 0,
                x_anchor: XAnchor::Center,
            });
            milestone_markers.push(MilestoneMarker {
                label: milestone.label.clone(),
                wrapped_label,
                x,
                anchor: milestone.date,
                y,
                color,
                marker_size: FLAG_MARKER_SIZE,
            });
        }

        Ok(ChartSpec {
            title: None,
            task_rows,
            milestone_markers,
            connector_lines,
            annotations,
            axes: axes(config.split_ratio),
            figure_size: FigureSize {
                height: config.height,
                width: config.width,
            },
            font: FontSpec {
                family: config.font_style.family().to_string(),
                size: config.font_size,
            },
            date_range,
        })
    }
}

impl Default for TimelineLayoutBuilder {
    fn default() -> Self {
        Self::new(ChartConfig::default())
    }
}

fn axes(split_ratio: f64) -> Axes {
    Axes {
        split_ratio,
        top_axis_offset: TOP_AXIS_OFFSET,
        milestone_domain: [split_ratio, 1.0],
        task_domain: [0.0, (split_ratio - LANE_GAP).max(0.0)],
        shared_x: true,
    }
}

/// Move a date by a signed number of calendar days
fn shift_days(date: NaiveDate, days: i64) -> Result<NaiveDate, LayoutError> {
    let step = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        date.checked_add_days(step)
    } else {
        date.checked_sub_days(step)
    };
    shifted.ok_or(LayoutError::DateOutOfRange { date, days })
}
