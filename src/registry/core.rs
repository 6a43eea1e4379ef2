use std::collections::HashMap;
use std::sync::Arc;

use blake3::Hash;

use crate::config::CellId;
use crate::error::{ReflowError, Result};
use crate::layout::{PlacementDirectives, ScenarioTable};

/// Tracks the active focus scenario over a shared table and reports which
/// cells need restyling after a focus change.
#[derive(Debug, Clone)]
pub struct ScenarioRegistry {
    table: Arc<ScenarioTable>,
    active: Option<CellId>,
    applied: HashMap<CellId, Hash>,
}

impl ScenarioRegistry {
    pub fn new(table: Arc<ScenarioTable>) -> Self {
        Self {
            table,
            active: None,
            applied: HashMap::new(),
        }
    }

    pub fn table(&self) -> &Arc<ScenarioTable> {
        &self.table
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn focus(&mut self, cell: &str) -> Result<()> {
        if !self.table.contains(cell) {
            return Err(ReflowError::UnknownCell(cell.to_string()));
        }
        self.active = Some(cell.to_string());
        Ok(())
    }

    pub fn clear_focus(&mut self) {
        self.active = None;
    }

    /// Directives for `cell` under the active scenario.
    pub fn directives(&self, cell: &str) -> Result<&PlacementDirectives> {
        self.table.directives(self.active(), cell)
    }

    pub fn has_dirty(&self) -> bool {
        self.table
            .scenario(self.active())
            .map(|scenario| {
                scenario
                    .iter()
                    .any(|(id, directives)| self.applied.get(id) != Some(&directives.digest()))
            })
            .unwrap_or(false)
    }

    /// Cells whose directives differ from what was last drained, in visiting
    /// order. Every cell is dirty on the first call.
    pub fn take_dirty(&mut self) -> Vec<(CellId, PlacementDirectives)> {
        let table = Arc::clone(&self.table);
        let Ok(scenario) = table.scenario(self.active.as_deref()) else {
            return Vec::new();
        };

        let mut dirty = Vec::new();
        for id in table.order() {
            let Some(directives) = scenario.get(id) else {
                continue;
            };
            let digest = directives.digest();
            if self.applied.get(id) != Some(&digest) {
                self.applied.insert(id.clone(), digest);
                dirty.push((id.clone(), directives.clone()));
            }
        }
        dirty
    }
}
