//! Validated grid model built from a [`GridConfig`].

use std::collections::{BTreeMap, HashSet};

use crate::config::{Breakpoint, CellId, GridConfig};
use crate::error::{ReflowError, Result};
use crate::geometry::{Placement, Span};
use crate::layout::descriptor::{ParsedCell, ParsedDescriptor, parse_tables};
use crate::layout::order::{reference_breakpoint, visiting_order};

#[derive(Debug, Clone)]
pub struct GridModel {
    profiles: Vec<Breakpoint>,
    cells: BTreeMap<CellId, ParsedCell>,
    order: Vec<CellId>,
    reference: usize,
}

impl GridModel {
    pub fn new(config: &GridConfig) -> Result<Self> {
        Self::with_reference(config, None)
    }

    /// Build the model, ordering cells by the named breakpoint's base
    /// placements instead of the widest reflowing profile.
    pub fn with_reference(config: &GridConfig, reference: Option<&str>) -> Result<Self> {
        validate_profiles(&config.profiles)?;
        if config.base.is_empty() {
            return Err(ReflowError::EmptyGrid);
        }

        let cells = parse_tables(config);
        let reference = reference_breakpoint(&config.profiles, reference)?;
        let order = visiting_order(&cells, reference);

        Ok(Self {
            profiles: config.profiles.clone(),
            cells,
            order,
            reference,
        })
    }

    pub fn profiles(&self) -> &[Breakpoint] {
        &self.profiles
    }

    pub fn profile(&self, breakpoint: usize) -> Option<&Breakpoint> {
        self.profiles.get(breakpoint)
    }

    pub fn profile_index(&self, name: &str) -> Result<usize> {
        self.profiles
            .iter()
            .position(|profile| profile.name == name)
            .ok_or_else(|| ReflowError::UnknownBreakpoint(name.to_string()))
    }

    /// Cells in visiting order.
    pub fn order(&self) -> &[CellId] {
        &self.order
    }

    pub fn reference(&self) -> usize {
        self.reference
    }

    pub fn contains(&self, id: &str) -> bool {
        self.cells.contains_key(id)
    }

    pub fn cell(&self, id: &str) -> Option<&ParsedCell> {
        self.cells.get(id)
    }

    fn expect_cell(&self, id: &str) -> Result<&ParsedCell> {
        self.cells
            .get(id)
            .ok_or_else(|| ReflowError::UnknownCell(id.to_string()))
    }

    /// Base placement in effect at `breakpoint`; undefined axes become 1.
    pub fn base_placement(&self, id: &str, breakpoint: usize) -> Result<Placement> {
        let record = self.expect_cell(id)?.base.cascaded(breakpoint);
        Ok(Placement::new(
            record.col_start.unwrap_or(1),
            record.col_span.unwrap_or(1),
            record.row_start.unwrap_or(1),
            record.row_span.unwrap_or(1),
        ))
    }

    pub fn base_span(&self, id: &str, breakpoint: usize) -> Result<Span> {
        let base = self.base_placement(id, breakpoint)?;
        Ok(Span::new(base.col_span, base.row_span))
    }

    /// Span used when `id` is the focused cell.
    pub fn expanded_span(&self, id: &str, breakpoint: usize) -> Result<Span> {
        let cell = self.expect_cell(id)?;
        self.override_span(cell.expanded.as_ref(), id, breakpoint)
    }

    /// Span used when another cell holds focus.
    pub fn collapsed_span(&self, id: &str, breakpoint: usize) -> Result<Span> {
        let cell = self.expect_cell(id)?;
        self.override_span(cell.collapsed.as_ref(), id, breakpoint)
    }

    fn override_span(
        &self,
        descriptor: Option<&ParsedDescriptor>,
        id: &str,
        breakpoint: usize,
    ) -> Result<Span> {
        let base = self.base_span(id, breakpoint)?;
        let Some(descriptor) = descriptor else {
            return Ok(base);
        };
        let record = descriptor.cascaded(breakpoint);
        Ok(Span::new(
            record.col_span.unwrap_or(base.cols),
            record.row_span.unwrap_or(base.rows),
        ))
    }
}

fn validate_profiles(profiles: &[Breakpoint]) -> Result<()> {
    if profiles.is_empty() {
        return Err(ReflowError::InvalidProfile("no profiles defined".into()));
    }

    let mut seen = HashSet::new();
    for profile in profiles {
        if profile.name.is_empty() {
            return Err(ReflowError::InvalidProfile("profile name is empty".into()));
        }
        if profile.columns == 0 {
            return Err(ReflowError::InvalidProfile(format!(
                "profile `{}` has zero columns",
                profile.name
            )));
        }
        if !seen.insert(profile.name.as_str()) {
            return Err(ReflowError::InvalidProfile(format!(
                "profile `{}` declared more than once",
                profile.name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GridConfig {
        GridConfig::new(vec![
            Breakpoint::fixed("base", 1),
            Breakpoint::reflowing("md", 4),
        ])
        .with_cell("a", "row-span-1 md:col-start-2 md:row-start-1 md:col-span-2")
        .with_cell("b", "md:row-start-2")
        .with_expanded("a", "md:row-span-3")
        .with_collapsed("b", "col-span-1 md:col-span-1")
    }

    #[test]
    fn rejects_bad_profiles() {
        let cases = [
            vec![],
            vec![Breakpoint::reflowing("md", 0)],
            vec![Breakpoint::reflowing("", 2)],
            vec![Breakpoint::reflowing("md", 2), Breakpoint::reflowing("md", 4)],
        ];
        for profiles in cases {
            let config = GridConfig::new(profiles).with_cell("a", "col-span-1");
            let err = GridModel::new(&config).unwrap_err();
            assert!(matches!(err, ReflowError::InvalidProfile(_)), "{err}");
        }
    }

    #[test]
    fn rejects_empty_grid() {
        let config = GridConfig::new(vec![Breakpoint::reflowing("md", 4)]);
        assert!(matches!(
            GridModel::new(&config).unwrap_err(),
            ReflowError::EmptyGrid
        ));
    }

    #[test]
    fn base_placement_fills_missing_axes_with_one() {
        let model = GridModel::new(&config()).unwrap();
        assert_eq!(model.base_placement("a", 1).unwrap(), Placement::new(2, 2, 1, 1));
        assert_eq!(model.base_placement("b", 1).unwrap(), Placement::new(1, 1, 2, 1));
        assert!(matches!(
            model.base_placement("zzz", 1).unwrap_err(),
            ReflowError::UnknownCell(_)
        ));
    }

    #[test]
    fn overrides_fall_back_to_base_axes() {
        let model = GridModel::new(&config()).unwrap();
        assert_eq!(model.expanded_span("a", 1).unwrap(), Span::new(2, 3));
        assert_eq!(model.expanded_span("b", 1).unwrap(), Span::new(1, 1));
        assert_eq!(model.collapsed_span("b", 1).unwrap(), Span::new(1, 1));
        assert_eq!(model.collapsed_span("a", 1).unwrap(), Span::new(2, 1));
    }

    #[test]
    fn order_follows_reference_breakpoint() {
        let model = GridModel::new(&config()).unwrap();
        assert_eq!(model.reference(), 1);
        assert_eq!(model.order().to_vec(), vec!["a", "b"]);
    }

    #[test]
    fn lookups_by_name_and_id() {
        let model = GridModel::new(&config()).unwrap();
        assert_eq!(model.profile_index("md").unwrap(), 1);
        assert!(matches!(
            model.profile_index("xl").unwrap_err(),
            ReflowError::UnknownBreakpoint(_)
        ));
        assert!(model.cell("a").unwrap().expanded.is_some());
        assert!(model.cell("zzz").is_none());
    }
}
