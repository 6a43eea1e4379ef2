//! Scenario table emitter.
//!
//! Precomputes the placement of every cell, at every breakpoint, for the idle
//! scenario and for each cell being focused. Lookups afterwards are plain map
//! reads, so focus changes never trigger a re-solve.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use blake3::Hash;
use serde_json::json;

use crate::config::{Breakpoint, CellId, GridConfig, ReflowConfig};
use crate::error::{ReflowError, Result};
use crate::geometry::Placement;
use crate::logging::{LogLevel, event_with_fields, json_kv};
use crate::model::GridModel;

use super::core::PlacementResolver;
use super::descriptor::Axis;

const LOG_TARGET: &str = "reflow::emitter";

/// One rendered layout instruction, e.g. `md:col-start-2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Directive {
    /// Breakpoint prefix; `None` for the first (unprefixed) profile.
    pub prefix: Option<String>,
    pub axis: Axis,
    pub value: u16,
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}:{}-{}", prefix, self.axis.token(), self.value),
            None => write!(f, "{}-{}", self.axis.token(), self.value),
        }
    }
}

/// Resolved placement of a cell at one breakpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakpointPlacement {
    pub breakpoint: String,
    pub placement: Placement,
    pub reflow: bool,
}

/// Everything the presentation layer needs to style one cell under one
/// focus scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementDirectives {
    cell: CellId,
    entries: Vec<BreakpointPlacement>,
    directives: Vec<Directive>,
    digest: Hash,
}

impl PlacementDirectives {
    fn new(cell: CellId, entries: Vec<BreakpointPlacement>) -> Self {
        let directives = render_directives(&entries);
        let digest = blake3::hash(join_tokens(&directives).as_bytes());
        Self {
            cell,
            entries,
            directives,
            digest,
        }
    }

    pub fn cell(&self) -> &str {
        &self.cell
    }

    pub fn entries(&self) -> &[BreakpointPlacement] {
        &self.entries
    }

    pub fn placement(&self, breakpoint: &str) -> Option<Placement> {
        self.entries
            .iter()
            .find(|entry| entry.breakpoint == breakpoint)
            .map(|entry| entry.placement)
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// Directives joined by single spaces.
    pub fn class_names(&self) -> String {
        join_tokens(&self.directives)
    }

    /// blake3 digest of [`Self::class_names`].
    pub fn digest(&self) -> Hash {
        self.digest
    }
}

fn render_directives(entries: &[BreakpointPlacement]) -> Vec<Directive> {
    let mut directives = Vec::with_capacity(entries.len() * 4);
    for (index, entry) in entries.iter().enumerate() {
        let prefix = (index > 0).then(|| entry.breakpoint.clone());
        let p = entry.placement;
        let values = [
            (Axis::ColStart, p.col_start),
            (Axis::ColSpan, p.col_span),
            (Axis::RowStart, p.row_start),
            (Axis::RowSpan, p.row_span),
        ];
        for (axis, value) in values {
            if !entry.reflow && !axis.is_span() {
                continue;
            }
            directives.push(Directive {
                prefix: prefix.clone(),
                axis,
                value,
            });
        }
    }
    directives
}

fn join_tokens(directives: &[Directive]) -> String {
    directives
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

type Scenario = BTreeMap<CellId, PlacementDirectives>;

/// Immutable lookup table of every focus scenario.
#[derive(Debug, Clone)]
pub struct ScenarioTable {
    profiles: Vec<Breakpoint>,
    order: Vec<CellId>,
    idle: Scenario,
    focused: HashMap<CellId, Scenario>,
}

impl ScenarioTable {
    /// Parse `grid`, then build every scenario.
    pub fn from_config(grid: &GridConfig, config: &ReflowConfig) -> Result<Self> {
        let model = GridModel::with_reference(grid, config.reference_breakpoint.as_deref())?;
        Self::build(&model, config)
    }

    pub fn build(model: &GridModel, config: &ReflowConfig) -> Result<Self> {
        let resolver = PlacementResolver::new(model)
            .with_search_cap(config.search_cap)
            .with_logger(config.logger.as_ref());

        let idle = build_scenario(model, &resolver, config, None)?;
        let mut focused = HashMap::with_capacity(model.order().len());
        for id in model.order() {
            let scenario = build_scenario(model, &resolver, config, Some(id.as_str()))?;
            focused.insert(id.clone(), scenario);
        }

        if let Some(logger) = &config.logger {
            let reference = model
                .profile(model.reference())
                .map(|p| p.name.clone())
                .unwrap_or_default();
            let event = event_with_fields(
                LogLevel::Info,
                LOG_TARGET,
                "reflow.table_built",
                [
                    json_kv("cells", model.order().len()),
                    json_kv("scenarios", focused.len() + 1),
                    json_kv("profiles", model.profiles().len()),
                    json_kv("reference", reference),
                ],
            );
            let _ = logger.log_event(event);
        }

        Ok(Self {
            profiles: model.profiles().to_vec(),
            order: model.order().to_vec(),
            idle,
            focused,
        })
    }

    pub fn profiles(&self) -> &[Breakpoint] {
        &self.profiles
    }

    /// Cells in visiting order.
    pub fn order(&self) -> &[CellId] {
        &self.order
    }

    pub fn contains(&self, cell: &str) -> bool {
        self.idle.contains_key(cell)
    }

    /// Every cell's directives with `focused` expanded (`None` for idle).
    pub fn scenario(&self, focused: Option<&str>) -> Result<&BTreeMap<CellId, PlacementDirectives>> {
        match focused {
            None => Ok(&self.idle),
            Some(id) => self
                .focused
                .get(id)
                .ok_or_else(|| ReflowError::UnknownCell(id.to_string())),
        }
    }

    pub fn directives(&self, focused: Option<&str>, cell: &str) -> Result<&PlacementDirectives> {
        self.scenario(focused)?
            .get(cell)
            .ok_or_else(|| ReflowError::UnknownCell(cell.to_string()))
    }

    /// Placement of every cell at the named breakpoint.
    pub fn placements(
        &self,
        focused: Option<&str>,
        breakpoint: &str,
    ) -> Result<BTreeMap<CellId, Placement>> {
        if !self.profiles.iter().any(|p| p.name == breakpoint) {
            return Err(ReflowError::UnknownBreakpoint(breakpoint.to_string()));
        }
        Ok(self
            .scenario(focused)?
            .iter()
            .filter_map(|(id, directives)| {
                directives
                    .placement(breakpoint)
                    .map(|placement| (id.clone(), placement))
            })
            .collect())
    }
}

fn build_scenario(
    model: &GridModel,
    resolver: &PlacementResolver<'_>,
    config: &ReflowConfig,
    focused: Option<&str>,
) -> Result<Scenario> {
    let mut merged: BTreeMap<CellId, Vec<BreakpointPlacement>> = BTreeMap::new();
    let mut displaced = 0;
    let mut exhausted = 0;

    for (index, profile) in model.profiles().iter().enumerate() {
        let resolution = if profile.reflow {
            resolver.resolve(focused, index)?
        } else {
            resolver.in_place(focused, index)?
        };

        if let Some(metrics) = &config.metrics {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_resolution(&resolution);
            }
        }
        displaced += resolution.displaced;
        exhausted += resolution.exhausted.len();

        for (id, placement) in resolution.placements {
            merged.entry(id).or_default().push(BreakpointPlacement {
                breakpoint: profile.name.clone(),
                placement,
                reflow: profile.reflow,
            });
        }
    }

    if let Some(metrics) = &config.metrics {
        if let Ok(mut guard) = metrics.lock() {
            guard.record_scenario();
        }
    }

    if let Some(logger) = &config.logger {
        let event = event_with_fields(
            LogLevel::Debug,
            LOG_TARGET,
            "reflow.scenario_built",
            [
                json_kv("focused", json!(focused)),
                json_kv("displaced", displaced),
                json_kv("exhausted", exhausted),
            ],
        );
        let _ = logger.log_event(event);
    }

    Ok(merged
        .into_iter()
        .map(|(id, entries)| (id.clone(), PlacementDirectives::new(id, entries)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{Logger, MemorySink};
    use std::iter;

    fn grid() -> GridConfig {
        GridConfig::new(vec![
            Breakpoint::fixed("base", 1),
            Breakpoint::reflowing("md", 4),
        ])
        .with_cell("a", "col-span-1 row-span-1 md:col-start-1 md:row-start-1 md:row-span-2")
        .with_cell("b", "md:col-start-2 md:row-start-1")
        .with_cell("c", "md:col-start-3 md:row-start-1 md:col-span-2")
        .with_cell("d", "md:col-start-1 md:row-start-3")
        .with_expanded("a", "row-span-2 md:col-span-2 md:row-span-2")
    }

    #[test]
    fn directives_render_per_breakpoint() {
        let table = ScenarioTable::from_config(&grid(), &ReflowConfig::default()).unwrap();

        let idle = table.directives(None, "c").unwrap();
        assert_eq!(
            idle.class_names(),
            "col-span-1 row-span-1 md:col-start-3 md:col-span-2 md:row-start-1 md:row-span-1"
        );

        let focused = table.directives(Some("a"), "a").unwrap();
        assert_eq!(
            focused.class_names(),
            "col-span-1 row-span-2 md:col-start-1 md:col-span-2 md:row-start-1 md:row-span-2"
        );
        assert_eq!(
            table.directives(Some("a"), "c").unwrap().placement("md"),
            Some(Placement::new(3, 2, 2, 1))
        );
    }

    #[test]
    fn every_focus_has_a_scenario() {
        let table = ScenarioTable::from_config(&grid(), &ReflowConfig::default()).unwrap();
        assert_eq!(table.order().to_vec(), vec!["a", "b", "c", "d"]);
        for focus in table.order() {
            let scenario = table.scenario(Some(focus)).unwrap();
            assert_eq!(scenario.len(), 4);
        }
        assert!(matches!(
            table.scenario(Some("missing")).unwrap_err(),
            ReflowError::UnknownCell(_)
        ));
        assert!(matches!(
            table.directives(None, "missing").unwrap_err(),
            ReflowError::UnknownCell(_)
        ));
        assert!(matches!(
            table.placements(None, "xl").unwrap_err(),
            ReflowError::UnknownBreakpoint(_)
        ));
    }

    #[test]
    fn digest_tracks_rendered_tokens() {
        let table = ScenarioTable::from_config(&grid(), &ReflowConfig::default()).unwrap();
        let idle_d = table.directives(None, "d").unwrap();
        let focused_d = table.directives(Some("a"), "d").unwrap();
        assert_eq!(idle_d.digest(), focused_d.digest());

        let idle_b = table.directives(None, "b").unwrap();
        let focused_b = table.directives(Some("a"), "b").unwrap();
        assert_ne!(idle_b.digest(), focused_b.digest());
        assert_eq!(idle_b.digest(), blake3::hash(idle_b.class_names().as_bytes()));
    }

    #[test]
    fn build_reports_logs_and_metrics() {
        let sink = MemorySink::new();
        let mut config = ReflowConfig::default().with_logger(Logger::new(sink.clone()));
        config.enable_metrics();
        let metrics = config.metrics_handle().unwrap();

        ScenarioTable::from_config(&grid(), &config).unwrap();

        let events = sink.events();
        let built: Vec<_> = events
            .iter()
            .filter(|e| e.message == "reflow.scenario_built")
            .collect();
        assert_eq!(built.len(), 5);
        let summary = events.last().unwrap();
        assert_eq!(summary.message, "reflow.table_built");
        assert_eq!(summary.fields["scenarios"], json!(5));
        assert_eq!(summary.fields["reference"], json!("md"));

        let snapshot = metrics.lock().unwrap().snapshot();
        assert_eq!(snapshot.scenarios, 5);
        assert_eq!(snapshot.placements, 5 * 2 * 4);
        assert_eq!(snapshot.exhausted, 0);
    }

    #[test]
    fn rebuilding_yields_identical_tables() {
        let first = ScenarioTable::from_config(&grid(), &ReflowConfig::default()).unwrap();
        let second = ScenarioTable::from_config(&grid(), &ReflowConfig::default()).unwrap();
        for focus in iter::once(None).chain(first.order().iter().map(|id| Some(id.as_str()))) {
            assert_eq!(first.scenario(focus).unwrap(), second.scenario(focus).unwrap());
        }
    }
}
