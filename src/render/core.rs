use std::collections::BTreeMap;
use std::io::Write;

use unicode_width::UnicodeWidthChar;

use crate::config::CellId;
use crate::error::{ReflowError, Result};
use crate::geometry::Placement;
use crate::layout::ScenarioTable;

/// Preview renderer parameters.
#[derive(Debug, Clone)]
pub struct PreviewSettings {
    /// Display width of one grid unit.
    pub slot_width: u16,
    /// Glyph used for unoccupied units.
    pub empty: char,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            slot_width: 6,
            empty: '.',
        }
    }
}

/// Draws a resolved grid as plain text, one line per grid row.
pub struct PreviewRenderer {
    settings: PreviewSettings,
}

impl PreviewRenderer {
    pub fn new(settings: PreviewSettings) -> Self {
        Self { settings }
    }

    pub fn with_default() -> Self {
        Self::new(PreviewSettings::default())
    }

    pub fn settings_mut(&mut self) -> &mut PreviewSettings {
        &mut self.settings
    }

    pub fn render(
        &self,
        writer: &mut impl Write,
        placements: &BTreeMap<CellId, Placement>,
        columns: u16,
    ) -> Result<()> {
        let rows = placements.values().map(Placement::row_end).max().unwrap_or(0);
        let width = self.settings.slot_width.max(1);

        for row in 1..=rows {
            let mut slots = Vec::with_capacity(columns as usize);
            for col in 1..=columns {
                let owner = placements
                    .iter()
                    .find(|(_, p)| p.units().any(|unit| unit == (row, col)))
                    .map(|(id, _)| id.as_str());
                let slot = match owner {
                    Some(id) => fit_label(id, width),
                    None => fit_label(&self.settings.empty.to_string(), width),
                };
                slots.push(slot);
            }
            writeln!(writer, "{}", slots.join(" ").trim_end())?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Render one scenario of `table` at the named breakpoint.
    pub fn render_scenario(
        &self,
        writer: &mut impl Write,
        table: &ScenarioTable,
        focused: Option<&str>,
        breakpoint: &str,
    ) -> Result<()> {
        let columns = table
            .profiles()
            .iter()
            .find(|profile| profile.name == breakpoint)
            .map(|profile| profile.columns)
            .ok_or_else(|| ReflowError::UnknownBreakpoint(breakpoint.to_string()))?;
        let placements = table.placements(focused, breakpoint)?;
        self.render(writer, &placements, columns)
    }
}

/// Truncate `label` to `width` display columns, then pad with spaces.
fn fit_label(label: &str, width: u16) -> String {
    let width = width as usize;
    let mut out = String::new();
    let mut used = 0;
    for ch in label.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    while used < width {
        out.push(' ');
        used += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_label_respects_display_width() {
        assert_eq!(fit_label("overview", 4), "over");
        assert_eq!(fit_label("ab", 4), "ab  ");
        assert_eq!(fit_label("日本語", 5), "日本 ");
    }

    #[test]
    fn renders_units_row_by_row() {
        let mut placements = BTreeMap::new();
        placements.insert("a".to_string(), Placement::new(1, 2, 1, 2));
        placements.insert("b".to_string(), Placement::new(3, 1, 1, 1));
        placements.insert("c".to_string(), Placement::new(3, 2, 2, 1));
        placements.insert("d".to_string(), Placement::new(1, 1, 3, 1));

        let mut renderer = PreviewRenderer::with_default();
        renderer.settings_mut().slot_width = 1;
        let mut output = Vec::new();
        renderer.render(&mut output, &placements, 4).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert_eq!(text, "a a b .\na a c c\nd . . .\n");
    }

    #[test]
    fn renders_table_scenarios_by_breakpoint_name() {
        use crate::config::{Breakpoint, GridConfig, ReflowConfig};

        let grid = GridConfig::new(vec![Breakpoint::reflowing("md", 3)])
            .with_cell("hero", "col-start-1 row-start-1")
            .with_cell("side", "col-start-2 row-start-1")
            .with_expanded("hero", "col-span-2");
        let table = ScenarioTable::from_config(&grid, &ReflowConfig::default()).unwrap();

        let mut renderer = PreviewRenderer::with_default();
        renderer.settings_mut().slot_width = 4;
        let mut output = Vec::new();
        renderer
            .render_scenario(&mut output, &table, Some("hero"), "md")
            .unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "hero hero side\n");

        let err = renderer
            .render_scenario(&mut Vec::<u8>::new(), &table, None, "lg")
            .unwrap_err();
        assert!(matches!(err, ReflowError::UnknownBreakpoint(_)));
    }
}
