//! Built-in client dashboard grid.
//!
//! Three profiles: a single-column `base` profile that only toggles spans,
//! plus `md` (4 columns) and `lg` (6 columns) which reflow around the
//! focused card.

use crate::config::{Breakpoint, GridConfig, ReflowConfig};
use crate::error::Result;
use crate::layout::ScenarioTable;

pub const OVERVIEW: &str = "overview";
pub const PROJECTS: &str = "projects";
pub const INVOICES: &str = "invoices";
pub const MESSAGES: &str = "messages";
pub const FILES: &str = "files";
pub const CALENDAR: &str = "calendar";
pub const SUPPORT: &str = "support";

pub fn profiles() -> Vec<Breakpoint> {
    vec![
        Breakpoint::fixed("base", 1),
        Breakpoint::reflowing("md", 4),
        Breakpoint::reflowing("lg", 6),
    ]
}

pub fn default_config() -> GridConfig {
    GridConfig::new(profiles())
        .with_cell(
            OVERVIEW,
            "col-span-1 row-span-1 \
             md:col-start-1 md:row-start-1 md:col-span-2 md:row-span-2 \
             lg:col-start-1 lg:row-start-1 lg:col-span-3 lg:row-span-2",
        )
        .with_cell(
            PROJECTS,
            "col-span-1 row-span-1 \
             md:col-start-3 md:row-start-1 md:col-span-2 md:row-span-1 \
             lg:col-start-4 lg:row-start-1 lg:col-span-3 lg:row-span-1",
        )
        .with_cell(
            INVOICES,
            "col-span-1 row-span-1 \
             md:col-start-3 md:row-start-2 md:col-span-1 md:row-span-1 \
             lg:col-start-4 lg:row-start-2 lg:col-span-2 lg:row-span-1",
        )
        .with_cell(
            MESSAGES,
            "col-span-1 row-span-1 \
             md:col-start-4 md:row-start-2 md:col-span-1 md:row-span-2 \
             lg:col-start-6 lg:row-start-2 lg:col-span-1 lg:row-span-2",
        )
        .with_cell(
            FILES,
            "col-span-1 row-span-1 \
             md:col-start-1 md:row-start-3 md:col-span-2 md:row-span-1 \
             lg:col-start-1 lg:row-start-3 lg:col-span-2 lg:row-span-1",
        )
        .with_cell(
            CALENDAR,
            "col-span-1 row-span-1 \
             md:col-start-3 md:row-start-3 md:col-span-1 md:row-span-1 \
             lg:col-start-3 lg:row-start-3 lg:col-span-3 lg:row-span-1",
        )
        .with_cell(
            SUPPORT,
            "col-span-1 row-span-1 \
             md:col-start-1 md:row-start-4 md:col-span-4 md:row-span-1 \
             lg:col-start-1 lg:row-start-4 lg:col-span-6 lg:row-span-1",
        )
        .with_expanded(OVERVIEW, "row-span-2 md:col-span-4 lg:col-span-4")
        .with_expanded(PROJECTS, "row-span-2 md:col-span-4 md:row-span-2 lg:col-span-4 lg:row-span-2")
        .with_expanded(INVOICES, "row-span-2 md:col-span-2 md:row-span-2 lg:col-span-3 lg:row-span-2")
        .with_expanded(MESSAGES, "row-span-2 md:col-span-2 md:row-span-3 lg:col-span-3 lg:row-span-3")
        .with_expanded(FILES, "row-span-2 md:col-span-4 md:row-span-2 lg:col-span-4 lg:row-span-2")
        .with_expanded(CALENDAR, "row-span-2 md:col-span-2 md:row-span-2 lg:col-span-4 lg:row-span-2")
        .with_expanded(SUPPORT, "row-span-2")
        .with_collapsed(OVERVIEW, "md:row-span-1 lg:col-span-2 lg:row-span-1")
        .with_collapsed(PROJECTS, "lg:col-span-2")
        .with_collapsed(CALENDAR, "lg:col-span-2")
        .with_collapsed(SUPPORT, "md:col-span-2 lg:col-span-3")
}

/// Build the scenario table for [`default_config`].
pub fn default_table(config: &ReflowConfig) -> Result<ScenarioTable> {
    ScenarioTable::from_config(&default_config(), config)
}
