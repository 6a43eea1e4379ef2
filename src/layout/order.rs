use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::config::{Breakpoint, CellId};
use crate::error::{ReflowError, Result};

use super::descriptor::ParsedCell;

/// Pick the breakpoint whose base placements define the visiting order.
///
/// An explicit `preferred` name must exist. Otherwise the reflowing profile
/// with the most columns wins (first on ties), falling back to the first
/// profile when nothing reflows.
pub fn reference_breakpoint(profiles: &[Breakpoint], preferred: Option<&str>) -> Result<usize> {
    if let Some(name) = preferred {
        return profiles
            .iter()
            .position(|profile| profile.name == name)
            .ok_or_else(|| ReflowError::UnknownBreakpoint(name.to_string()));
    }

    let mut best: Option<(usize, u16)> = None;
    for (index, profile) in profiles.iter().enumerate() {
        if !profile.reflow {
            continue;
        }
        if best.map(|(_, cols)| profile.columns > cols).unwrap_or(true) {
            best = Some((index, profile.columns));
        }
    }

    match best {
        Some((index, _)) => Ok(index),
        None if !profiles.is_empty() => Ok(0),
        None => Err(ReflowError::InvalidProfile("no profiles defined".into())),
    }
}

/// Total order over cells: base row start, then base column start, with
/// undefined values last and the cell id as the final tie-break.
pub fn visiting_order(cells: &BTreeMap<CellId, ParsedCell>, reference: usize) -> Vec<CellId> {
    let mut keyed: Vec<(&CellId, Option<u16>, Option<u16>)> = cells
        .iter()
        .map(|(id, cell)| {
            let record = cell.base.cascaded(reference);
            (id, record.row_start, record.col_start)
        })
        .collect();

    keyed.sort_by(|a, b| {
        undefined_last(a.1, b.1)
            .then_with(|| undefined_last(a.2, b.2))
            .then_with(|| a.0.cmp(b.0))
    });

    keyed.into_iter().map(|(id, _, _)| id.clone()).collect()
}

fn undefined_last(a: Option<u16>, b: Option<u16>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
