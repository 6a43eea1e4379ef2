//! Dashboard grid reflow engine.
//!
//! Cells declare per-breakpoint placements in a compact descriptor notation.
//! When one cell gains focus it expands in place and every other cell is
//! re-packed, greedy first-fit, starting from its own base position. All
//! focus scenarios are computed once into an immutable [`ScenarioTable`];
//! switching focus afterwards is a lookup.
//!
//! ```
//! use bento_reflow::{ReflowConfig, ScenarioTable, dashboard};
//!
//! let table = ScenarioTable::from_config(&dashboard::default_config(), &ReflowConfig::default())?;
//! let classes = table.directives(Some("projects"), "invoices")?.class_names();
//! assert!(classes.starts_with("col-span-1 row-span-1 md:col-start-"));
//! # Ok::<(), bento_reflow::ReflowError>(())
//! ```

pub mod config;
pub mod dashboard;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod registry;
pub mod render;

pub use config::{AxisRecord, Breakpoint, CellId, Descriptor, GridConfig, ReflowConfig};
pub use error::{ReflowError, Result};
pub use geometry::{Placement, Span};
pub use layout::{
    Axis, BreakpointPlacement, Directive, PlacementDirectives, PlacementResolver, Resolution,
    ScenarioTable,
};
pub use logging::{
    FileSink, LogEvent, LogLevel, LogSink, Logger, LoggingError, LoggingResult, MemorySink,
};
pub use metrics::{MetricSnapshot, ReflowMetrics};
pub use model::GridModel;
pub use registry::ScenarioRegistry;
pub use render::{PreviewRenderer, PreviewSettings};
