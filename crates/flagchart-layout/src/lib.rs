//! # flagchart-layout
//!
//! Layout engine for milestone timelines.
//!
//! This crate provides:
//! - Label wrapping (`wrap`)
//! - Flag color classification (`classify`)
//! - Flag height assignment with per-flag overrides (`FlagPositioner`)
//! - Date span analysis (`analyze`)
//! - Sheet validation and cell coercion (`schema`)
//! - Chart assembly (`TimelineLayoutBuilder`) and per-session state (`Session`)
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use flagchart_core::{ChartConfig, Milestone, Task};
//! use flagchart_layout::{FlagPositionState, TimelineLayoutBuilder};
//!
//! let day = |m, d| NaiveDate::from_ymd_opt(2024, m, d).unwrap();
//! let tasks = vec![Task::new("Design", day(1, 1), day(2, 1))];
//! let milestones = vec![Milestone::new("PQ Review", day(1, 15))];
//!
//! let mut flags = FlagPositionState::new();
//! let spec = TimelineLayoutBuilder::new(ChartConfig::default())
//!     .build(&tasks, &milestones, &mut flags)
//!     .unwrap();
//!
//! assert_eq!(spec.milestone_markers[0].color, "cadetblue");
//! assert_eq!(spec.milestone_markers[0].y, 0.5);
//! ```

pub mod builder;
pub mod color;
pub mod flags;
pub mod range;
pub mod schema;
pub mod session;
pub mod wrap;

pub use builder::TimelineLayoutBuilder;
pub use color::classify;
pub use flags::{FlagPositionState, FlagPositioner, FlagSlot, DEFAULT_CYCLE};
pub use range::analyze;
pub use session::{RenderOutcome, Session};
pub use wrap::{wrap, wrap_with, LINE_BREAK};
