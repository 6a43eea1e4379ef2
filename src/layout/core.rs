use std::collections::{BTreeMap, HashSet};

use serde_json::json;

use crate::config::{CellId, DEFAULT_SEARCH_CAP};
use crate::error::{ReflowError, Result};
use crate::geometry::{Placement, Span};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv, json_str};
use crate::model::GridModel;

const LOG_TARGET: &str = "reflow::resolver";

/// Outcome of resolving one focus scenario at one breakpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub placements: BTreeMap<CellId, Placement>,
    /// Cells whose search hit the iteration cap; their placement is the last
    /// candidate tried and may overlap another cell.
    pub exhausted: Vec<CellId>,
    /// Cells placed somewhere other than their clamped base origin.
    pub displaced: usize,
    /// Candidate positions tested across all cells.
    pub attempts: u64,
}

/// Unit cells claimed so far, keyed `(row, col)`.
#[derive(Debug, Default)]
struct Occupancy {
    units: HashSet<(u16, u16)>,
}

impl Occupancy {
    fn fits(&self, candidate: &Placement, columns: u16) -> bool {
        candidate.col_start >= 1
            && candidate.col_end() <= columns
            && candidate.units().all(|unit| !self.units.contains(&unit))
    }

    fn claim(&mut self, placement: &Placement) {
        self.units.extend(placement.units());
    }
}

/// Greedy first-fit placement over a fixed-column grid.
///
/// The focused cell is pinned at its base position with its expanded span.
/// Every other cell, in visiting order, scans forward from its own base
/// position until its rectangle is free. Cells drift only as far as needed,
/// so the result stays close to the base layout.
pub struct PlacementResolver<'a> {
    model: &'a GridModel,
    search_cap: u32,
    logger: Option<&'a Logger>,
}

impl<'a> PlacementResolver<'a> {
    pub fn new(model: &'a GridModel) -> Self {
        Self {
            model,
            search_cap: DEFAULT_SEARCH_CAP,
            logger: None,
        }
    }

    pub fn with_search_cap(mut self, cap: u32) -> Self {
        self.search_cap = cap.max(1);
        self
    }

    pub fn with_logger(mut self, logger: Option<&'a Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Resolve every cell at `breakpoint` with `focused` expanded, running the
    /// collision search regardless of the profile's reflow flag.
    pub fn resolve(&self, focused: Option<&str>, breakpoint: usize) -> Result<Resolution> {
        let columns = self.columns(breakpoint)?;
        if let Some(id) = focused {
            if !self.model.contains(id) {
                return Err(ReflowError::UnknownCell(id.to_string()));
            }
        }

        let mut occupancy = Occupancy::default();
        let mut resolution = Resolution::default();

        if let Some(id) = focused {
            let base = self.model.base_placement(id, breakpoint)?;
            let span = self.model.expanded_span(id, breakpoint)?.clamp_cols(columns);
            let pinned = anchor(&base, span, columns);
            occupancy.claim(&pinned);
            resolution.placements.insert(id.to_string(), pinned);
        }

        for id in self.model.order() {
            if focused == Some(id.as_str()) {
                continue;
            }

            let base = self.model.base_placement(id, breakpoint)?;
            let span = match focused {
                Some(_) => self.model.collapsed_span(id, breakpoint)?,
                None => Span::new(base.col_span, base.row_span),
            }
            .clamp_cols(columns);
            let start = anchor(&base, span, columns);

            let search = scan(&occupancy, start, columns, self.search_cap);
            resolution.attempts += u64::from(search.attempts);
            if !search.found {
                self.report_exhausted(id, focused, breakpoint, &search);
                resolution.exhausted.push(id.clone());
            }
            if !search.placement.same_origin(&start) {
                resolution.displaced += 1;
            }

            occupancy.claim(&search.placement);
            resolution.placements.insert(id.clone(), search.placement);
        }

        Ok(resolution)
    }

    /// Apply size overrides in place at each cell's base position, with no
    /// collision search. Used for profiles that do not reflow.
    pub fn in_place(&self, focused: Option<&str>, breakpoint: usize) -> Result<Resolution> {
        let columns = self.columns(breakpoint)?;
        let mut resolution = Resolution::default();

        for id in self.model.order() {
            let base = self.model.base_placement(id, breakpoint)?;
            let span = match focused {
                Some(f) if f == id.as_str() => self.model.expanded_span(id, breakpoint)?,
                Some(_) => self.model.collapsed_span(id, breakpoint)?,
                None => Span::new(base.col_span, base.row_span),
            }
            .clamp_cols(columns);
            resolution
                .placements
                .insert(id.clone(), anchor(&base, span, columns));
        }

        if let Some(id) = focused {
            if !resolution.placements.contains_key(id) {
                return Err(ReflowError::UnknownCell(id.to_string()));
            }
        }

        Ok(resolution)
    }

    fn columns(&self, breakpoint: usize) -> Result<u16> {
        self.model
            .profile(breakpoint)
            .map(|profile| profile.columns.max(1))
            .ok_or_else(|| ReflowError::UnknownBreakpoint(format!("#{breakpoint}")))
    }

    fn report_exhausted(
        &self,
        id: &str,
        focused: Option<&str>,
        breakpoint: usize,
        search: &Search,
    ) {
        let Some(logger) = self.logger else {
            return;
        };
        let profile = self
            .model
            .profile(breakpoint)
            .map(|p| p.name.clone())
            .unwrap_or_default();
        let event = event_with_fields(
            LogLevel::Warn,
            LOG_TARGET,
            "reflow.search_exhausted",
            [
                json_str("cell", id),
                json_kv("focused", json!(focused)),
                json_str("breakpoint", profile),
                json_kv("attempts", search.attempts),
                json_kv("col_start", search.placement.col_start),
                json_kv("row_start", search.placement.row_start),
            ],
        );
        let _ = logger.log_event(event);
    }
}

/// Place `span` at the base origin, pulling the column start left so the
/// rectangle ends at or before `columns`.
fn anchor(base: &Placement, span: Span, columns: u16) -> Placement {
    let max_start = columns.saturating_sub(span.cols).saturating_add(1).max(1);
    Placement::new(
        base.col_start.min(max_start).max(1),
        span.cols,
        base.row_start.max(1),
        span.rows,
    )
}

struct Search {
    placement: Placement,
    attempts: u32,
    found: bool,
}

/// Scan left to right, then top to bottom, from `start` until the rectangle
/// is free or `cap` candidates have been tried.
fn scan(occupancy: &Occupancy, start: Placement, columns: u16, cap: u32) -> Search {
    let mut candidate = start;
    let mut attempts = 0;

    loop {
        attempts += 1;
        if occupancy.fits(&candidate, columns) {
            return Search {
                placement: candidate,
                attempts,
                found: true,
            };
        }
        if attempts >= cap {
            return Search {
                placement: candidate,
                attempts,
                found: false,
            };
        }

        candidate.col_start += 1;
        if candidate.col_end() > columns {
            candidate.col_start = 1;
            candidate.row_start = candidate.row_start.saturating_add(1);
        }
    }
}
