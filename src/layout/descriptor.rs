//! Placement descriptor parser.
//!
//! Turns the three authored tables into per-breakpoint [`AxisRecord`]s. The
//! parser is permissive: unknown breakpoint prefixes, unknown axes, zero or
//! non-numeric values are skipped without error.

use std::collections::BTreeMap;

use crate::config::{AxisRecord, Breakpoint, CellId, Descriptor, GridConfig};

/// Axis addressed by a descriptor token or layout directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    ColStart,
    ColSpan,
    RowStart,
    RowSpan,
}

impl Axis {
    pub const ALL: [Axis; 4] = [Axis::ColStart, Axis::ColSpan, Axis::RowStart, Axis::RowSpan];

    pub fn token(self) -> &'static str {
        match self {
            Axis::ColStart => "col-start",
            Axis::ColSpan => "col-span",
            Axis::RowStart => "row-start",
            Axis::RowSpan => "row-span",
        }
    }

    pub fn is_span(self) -> bool {
        matches!(self, Axis::ColSpan | Axis::RowSpan)
    }

    fn slot(self, record: &mut AxisRecord) -> &mut Option<u16> {
        match self {
            Axis::ColStart => &mut record.col_start,
            Axis::ColSpan => &mut record.col_span,
            Axis::RowStart => &mut record.row_start,
            Axis::RowSpan => &mut record.row_span,
        }
    }
}

/// Axis records for one cell, indexed like the profile list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDescriptor {
    records: Vec<AxisRecord>,
}

impl ParsedDescriptor {
    fn with_len(len: usize) -> Self {
        Self {
            records: vec![AxisRecord::default(); len],
        }
    }

    /// Values authored for exactly this breakpoint.
    pub fn at(&self, breakpoint: usize) -> AxisRecord {
        self.records.get(breakpoint).copied().unwrap_or_default()
    }

    /// Values in effect at `breakpoint`: each axis takes the value from the
    /// widest profile at or below `breakpoint` that defines it.
    pub fn cascaded(&self, breakpoint: usize) -> AxisRecord {
        let mut merged = AxisRecord::default();
        for record in self.records.iter().take(breakpoint + 1) {
            merged.col_start = record.col_start.or(merged.col_start);
            merged.col_span = record.col_span.or(merged.col_span);
            merged.row_start = record.row_start.or(merged.row_start);
            merged.row_span = record.row_span.or(merged.row_span);
        }
        merged
    }

    pub fn is_empty(&self) -> bool {
        self.records.iter().all(AxisRecord::is_empty)
    }
}

/// Parsed base placement plus optional size overrides for one cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCell {
    pub base: ParsedDescriptor,
    pub expanded: Option<ParsedDescriptor>,
    pub collapsed: Option<ParsedDescriptor>,
}

/// Parse a single descriptor against the profile list.
pub fn parse_descriptor(descriptor: &Descriptor, profiles: &[Breakpoint]) -> ParsedDescriptor {
    match descriptor {
        Descriptor::Compact(source) => parse_compact(source, profiles),
        Descriptor::Structured(map) => parse_structured(map, profiles),
    }
}

/// Parse the compact token notation. Unprefixed tokens address the first
/// profile; `name:` prefixes address the profile with that name.
pub fn parse_compact(source: &str, profiles: &[Breakpoint]) -> ParsedDescriptor {
    let mut parsed = ParsedDescriptor::with_len(profiles.len());

    for token in source.split_whitespace() {
        let (index, body) = match token.split_once(':') {
            Some((prefix, body)) => match profile_index(profiles, prefix) {
                Some(index) => (index, body),
                None => continue,
            },
            None if !profiles.is_empty() => (0, token),
            None => continue,
        };

        if let Some((axis, value)) = parse_token(body) {
            *axis.slot(&mut parsed.records[index]) = Some(value);
        }
    }

    parsed
}

fn parse_structured(map: &BTreeMap<String, AxisRecord>, profiles: &[Breakpoint]) -> ParsedDescriptor {
    let mut parsed = ParsedDescriptor::with_len(profiles.len());
    for (name, record) in map {
        let Some(index) = profile_index(profiles, name) else {
            continue;
        };
        let target = &mut parsed.records[index];
        target.col_start = record.col_start.filter(|v| *v > 0);
        target.col_span = record.col_span.filter(|v| *v > 0);
        target.row_start = record.row_start.filter(|v| *v > 0);
        target.row_span = record.row_span.filter(|v| *v > 0);
    }
    parsed
}

fn parse_token(body: &str) -> Option<(Axis, u16)> {
    Axis::ALL.iter().find_map(|axis| {
        let raw = body.strip_prefix(axis.token())?.strip_prefix('-')?;
        let value: u16 = raw.parse().ok()?;
        (value > 0).then_some((*axis, value))
    })
}

fn profile_index(profiles: &[Breakpoint], name: &str) -> Option<usize> {
    profiles.iter().position(|profile| profile.name == name)
}

/// Parse all three tables. Cells are the keys of the base table; override
/// entries for ids missing from it are ignored.
pub fn parse_tables(config: &GridConfig) -> BTreeMap<CellId, ParsedCell> {
    let profiles = &config.profiles;
    config
        .base
        .iter()
        .map(|(id, descriptor)| {
            let cell = ParsedCell {
                base: parse_descriptor(descriptor, profiles),
                expanded: config
                    .expanded
                    .get(id)
                    .map(|d| parse_descriptor(d, profiles)),
                collapsed: config
                    .collapsed
                    .get(id)
                    .map(|d| parse_descriptor(d, profiles)),
            };
            (id.clone(), cell)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profiles() -> Vec<Breakpoint> {
        vec![
            Breakpoint::fixed("base", 1),
            Breakpoint::reflowing("md", 4),
            Breakpoint::reflowing("lg", 6),
        ]
    }

    #[test]
    fn compact_tokens_land_on_their_breakpoint() {
        let parsed = parse_compact("row-span-2 md:col-start-3 md:col-span-2 lg:row-start-4", &profiles());
        assert_eq!(parsed.at(0).row_span, Some(2));
        assert_eq!(parsed.at(1).col_start, Some(3));
        assert_eq!(parsed.at(1).col_span, Some(2));
        assert_eq!(parsed.at(1).row_start, None);
        assert_eq!(parsed.at(2).row_start, Some(4));
    }

    #[test]
    fn malformed_tokens_are_skipped() {
        let parsed = parse_compact(
            "xl:col-start-2 md:col-start-x md:col-span-0 md:width-3 col-start- md:row-start-2",
            &profiles(),
        );
        assert!(parsed.at(0).is_empty());
        assert_eq!(
            parsed.at(1),
            AxisRecord {
                row_start: Some(2),
                ..AxisRecord::default()
            }
        );
        assert!(parsed.at(2).is_empty());
    }

    #[test]
    fn later_tokens_override_earlier_ones() {
        let parsed = parse_compact("md:col-span-1 md:col-span-3", &profiles());
        assert_eq!(parsed.at(1).col_span, Some(3));
    }

    #[test]
    fn cascade_is_mobile_first() {
        let parsed = parse_compact("col-span-1 row-span-2 md:col-span-2 lg:row-start-3", &profiles());
        let lg = parsed.cascaded(2);
        assert_eq!(lg.col_span, Some(2));
        assert_eq!(lg.row_span, Some(2));
        assert_eq!(lg.row_start, Some(3));
        assert_eq!(lg.col_start, None);
        assert_eq!(parsed.cascaded(0).col_span, Some(1));
    }

    #[test]
    fn structured_records_skip_unknown_breakpoints() {
        let mut map = BTreeMap::new();
        map.insert(
            "md".to_string(),
            AxisRecord {
                col_start: Some(2),
                col_span: Some(0),
                ..AxisRecord::default()
            },
        );
        map.insert(
            "xxl".to_string(),
            AxisRecord {
                col_start: Some(9),
                ..AxisRecord::default()
            },
        );
        let parsed = parse_descriptor(&Descriptor::Structured(map), &profiles());
        assert_eq!(parsed.at(1).col_start, Some(2));
        assert_eq!(parsed.at(1).col_span, None);
        assert!(parsed.at(2).is_empty());
    }

    #[test]
    fn tables_ignore_overrides_for_unknown_cells() {
        let config = GridConfig::new(profiles())
            .with_cell("a", "md:col-start-1")
            .with_expanded("a", "md:col-span-2")
            .with_collapsed("ghost", "md:col-span-1");
        let cells = parse_tables(&config);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells["a"].expanded.as_ref().unwrap().at(1).col_span, Some(2));
        assert!(cells["a"].collapsed.is_none());
    }
}
