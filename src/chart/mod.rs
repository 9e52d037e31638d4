//! Chart specifications and series shaping
//!
//! `spec` validates and normalizes user-declared chart configurations against
//! a project's column schema; `series` turns validated specs plus parsed rows
//! into the data a rendering library consumes.

pub mod series;
pub mod spec;

pub use series::{shape_chart_data, ChartSeries};
pub use spec::{validate_chart_spec, ChartKind, ChartSpec, NormalizedChartSpec};
