//! Static configuration accepted by the reflow engine.
//!
//! A [`GridConfig`] carries the breakpoint profiles plus three descriptor
//! tables (base placement, expanded override, collapsed override). It can be
//! authored in code or loaded from JSON:
//!
//! ```
//! use bento_reflow::config::GridConfig;
//!
//! let config = GridConfig::from_json_str(r#"{
//!     "profiles": [
//!         { "name": "base", "columns": 1, "reflow": false },
//!         { "name": "md", "columns": 4 }
//!     ],
//!     "base": {
//!         "overview": "col-span-1 md:col-start-1 md:row-start-1 md:col-span-2",
//!         "inbox": { "md": { "colStart": 3, "rowStart": 1, "colSpan": 2 } }
//!     },
//!     "expanded": { "inbox": "md:col-span-4 md:row-span-2" }
//! }"#)?;
//! assert_eq!(config.profiles.len(), 2);
//! # Ok::<(), bento_reflow::ReflowError>(())
//! ```
//!
//! Engine knobs that do not come from static configuration (logger, metrics,
//! search cap) live in [`ReflowConfig`].

use std::collections::BTreeMap;
use std::io::Read;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::logging::Logger;
use crate::metrics::ReflowMetrics;

/// Cell identifier.
pub type CellId = String;

/// Descriptor table keyed by cell id.
pub type DescriptorTable = BTreeMap<CellId, Descriptor>;

/// Default bound on candidate positions tried per cell.
pub const DEFAULT_SEARCH_CAP: u32 = 200;

/// A named grid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub name: String,
    pub columns: u16,
    /// Whether cells are repacked around a focused cell at this profile.
    #[serde(default = "reflow_default")]
    pub reflow: bool,
}

fn reflow_default() -> bool {
    true
}

impl Breakpoint {
    pub fn new(name: impl Into<String>, columns: u16, reflow: bool) -> Self {
        Self {
            name: name.into(),
            columns,
            reflow,
        }
    }

    pub fn reflowing(name: impl Into<String>, columns: u16) -> Self {
        Self::new(name, columns, true)
    }

    pub fn fixed(name: impl Into<String>, columns: u16) -> Self {
        Self::new(name, columns, false)
    }
}

/// Optional axis values for one cell at one breakpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AxisRecord {
    pub col_start: Option<u16>,
    pub col_span: Option<u16>,
    pub row_start: Option<u16>,
    pub row_span: Option<u16>,
}

impl AxisRecord {
    pub fn is_empty(&self) -> bool {
        self.col_start.is_none()
            && self.col_span.is_none()
            && self.row_start.is_none()
            && self.row_span.is_none()
    }
}

/// Per-cell placement descriptor as authored.
///
/// `Compact` uses the token notation (`md:col-start-2 row-span-1`);
/// `Structured` maps breakpoint names to explicit records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Descriptor {
    Compact(String),
    Structured(BTreeMap<String, AxisRecord>),
}

impl From<&str> for Descriptor {
    fn from(value: &str) -> Self {
        Self::Compact(value.to_string())
    }
}

impl From<String> for Descriptor {
    fn from(value: String) -> Self {
        Self::Compact(value)
    }
}

/// Breakpoint profiles plus the three descriptor tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    pub profiles: Vec<Breakpoint>,
    pub base: DescriptorTable,
    #[serde(default)]
    pub expanded: DescriptorTable,
    #[serde(default)]
    pub collapsed: DescriptorTable,
}

impl GridConfig {
    pub fn new(profiles: Vec<Breakpoint>) -> Self {
        Self {
            profiles,
            ..Self::default()
        }
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_json_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn with_cell(mut self, id: impl Into<CellId>, base: impl Into<Descriptor>) -> Self {
        self.base.insert(id.into(), base.into());
        self
    }

    pub fn with_expanded(mut self, id: impl Into<CellId>, spans: impl Into<Descriptor>) -> Self {
        self.expanded.insert(id.into(), spans.into());
        self
    }

    pub fn with_collapsed(mut self, id: impl Into<CellId>, spans: impl Into<Descriptor>) -> Self {
        self.collapsed.insert(id.into(), spans.into());
        self
    }
}

/// Engine knobs for building a scenario table.
#[derive(Clone)]
pub struct ReflowConfig {
    /// Candidate positions tried per cell before the search gives up.
    pub search_cap: u32,
    /// Breakpoint whose base placements define the visiting order.
    /// `None` picks the widest reflowing profile.
    pub reference_breakpoint: Option<String>,
    /// Optional structured logger.
    pub logger: Option<Logger>,
    /// Metrics accumulator shared with the caller.
    pub metrics: Option<Arc<Mutex<ReflowMetrics>>>,
}

impl Default for ReflowConfig {
    fn default() -> Self {
        Self {
            search_cap: DEFAULT_SEARCH_CAP,
            reference_breakpoint: None,
            logger: None,
            metrics: None,
        }
    }
}

impl ReflowConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_cap(mut self, cap: u32) -> Self {
        self.search_cap = cap.max(1);
        self
    }

    pub fn with_reference_breakpoint(mut self, name: impl Into<String>) -> Self {
        self.reference_breakpoint = Some(name.into());
        self
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(ReflowMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<ReflowMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflow_defaults_to_true_in_json() {
        let config = GridConfig::from_json_str(
            r#"{ "profiles": [{ "name": "lg", "columns": 6 }], "base": {} }"#,
        )
        .unwrap();
        assert!(config.profiles[0].reflow);
        assert!(config.expanded.is_empty());
    }

    #[test]
    fn descriptors_accept_strings_and_records() {
        let config = GridConfig::from_json_str(
            r#"{
                "profiles": [{ "name": "md", "columns": 4 }],
                "base": {
                    "a": "md:col-start-1",
                    "b": { "md": { "colStart": 2, "rowSpan": 2 } }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.base["a"], Descriptor::from("md:col-start-1"));
        match &config.base["b"] {
            Descriptor::Structured(map) => {
                assert_eq!(map["md"].col_start, Some(2));
                assert_eq!(map["md"].row_span, Some(2));
                assert_eq!(map["md"].col_span, None);
            }
            other => panic!("expected structured descriptor, got {:?}", other),
        }
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = GridConfig::from_json_str("{ profiles: ").unwrap_err();
        assert!(matches!(err, crate::ReflowError::Config(_)));
    }

    #[test]
    fn enable_metrics_is_idempotent() {
        let mut config = ReflowConfig::default();
        assert_eq!(config.search_cap, DEFAULT_SEARCH_CAP);
        config.enable_metrics();
        let first = config.metrics_handle().unwrap();
        config.enable_metrics();
        assert!(Arc::ptr_eq(&first, &config.metrics_handle().unwrap()));
        config.disable_metrics();
        assert!(config.metrics_handle().is_none());
    }
}
