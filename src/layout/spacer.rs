use std::collections::BTreeMap;

use crate::layout::registry::SlotDef;

/// Leftover width (in percent) a fully-sized row must exceed before a spacer
/// is inserted. Absorbs rounding from widths like 33/33/33.
pub const SPACER_THRESHOLD: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellWidth {
    Percent(f64),
    /// Shares whatever width the sized cells leave over
    Fill,
}

/// One rendered cell of a row, in left-to-right order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowCell<'a> {
    Slot { slot: &'a SlotDef, width: CellWidth },
    /// Invisible filler occupying the unclaimed width of a fully-sized row
    Spacer { width: f64 },
}

impl RowCell<'_> {
    pub fn is_spacer(&self) -> bool {
        matches!(self, RowCell::Spacer { .. })
    }
}

/// Arrange one row of slots.
///
/// A spacer is only emitted when every slot in the row has a declared width
/// and the declared widths leave more than [`SPACER_THRESHOLD`] percent
/// unclaimed. It goes at `spacer_position` (clamped to the row length),
/// defaulting to the end of the row.
pub fn layout_row<'a>(
    slots: &'a [SlotDef],
    slot_widths: &BTreeMap<String, f64>,
    spacer_position: Option<usize>,
) -> Vec<RowCell<'a>> {
    let mut cells: Vec<RowCell<'a>> = slots
        .iter()
        .map(|slot| RowCell::Slot {
            slot,
            width: slot_widths
                .get(slot.id)
                .copied()
                .map(CellWidth::Percent)
                .unwrap_or(CellWidth::Fill),
        })
        .collect();

    let custom_width_slot_count = slots
        .iter()
        .filter(|slot| slot_widths.contains_key(slot.id))
        .count();

    if slots.is_empty() || custom_width_slot_count < slots.len() {
        return cells;
    }

    let declared: f64 = slots
        .iter()
        .filter_map(|slot| slot_widths.get(slot.id))
        .sum();
    let spacer_width = 100.0 - declared;

    if spacer_width > SPACER_THRESHOLD {
        let at = spacer_position.unwrap_or(slots.len()).min(slots.len());
        cells.insert(at, RowCell::Spacer { width: spacer_width });
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ROW: &[SlotDef] = &[
        SlotDef { id: "col1", label: "Left Column" },
        SlotDef { id: "col2", label: "Right Column" },
    ];

    fn widths(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn spacers<'a>(cells: &'a [RowCell<'a>]) -> Vec<(usize, f64)> {
        cells
            .iter()
            .enumerate()
            .filter_map(|(i, c)| match c {
                RowCell::Spacer { width } => Some((i, *width)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_unsized_row_never_gets_a_spacer() {
        let cells = layout_row(ROW, &BTreeMap::new(), Some(0));
        assert_eq!(
            cells,
            vec![
                RowCell::Slot { slot: &ROW[0], width: CellWidth::Fill },
                RowCell::Slot { slot: &ROW[1], width: CellWidth::Fill },
            ]
        );
    }

    #[test]
    fn test_partially_sized_row_never_gets_a_spacer() {
        let cells = layout_row(ROW, &widths(&[("col1", 10.0)]), None);
        assert!(spacers(&cells).is_empty());
        assert_eq!(
            cells[0],
            RowCell::Slot { slot: &ROW[0], width: CellWidth::Percent(10.0) }
        );
        assert_eq!(cells[1], RowCell::Slot { slot: &ROW[1], width: CellWidth::Fill });
    }

    #[test]
    fn test_full_row_has_no_spacer() {
        let cells = layout_row(ROW, &widths(&[("col1", 50.0), ("col2", 50.0)]), None);
        assert!(spacers(&cells).is_empty());
    }

    #[test]
    fn test_within_threshold_has_no_spacer() {
        let cells = layout_row(ROW, &widths(&[("col1", 49.0), ("col2", 50.0)]), None);
        assert!(spacers(&cells).is_empty());
    }

    #[test]
    fn test_overfull_row_has_no_spacer() {
        let cells = layout_row(ROW, &widths(&[("col1", 70.0), ("col2", 50.0)]), None);
        assert!(spacers(&cells).is_empty());
    }

    #[test]
    fn test_spacer_defaults_to_end() {
        let cells = layout_row(ROW, &widths(&[("col1", 45.0), ("col2", 50.0)]), None);
        assert_eq!(spacers(&cells), vec![(2, 5.0)]);
    }

    #[test]
    fn test_spacer_between_slots() {
        let cells = layout_row(ROW, &widths(&[("col1", 40.0), ("col2", 40.0)]), Some(1));
        assert_eq!(spacers(&cells), vec![(1, 20.0)]);
        assert!(matches!(cells[0], RowCell::Slot { slot, .. } if slot.id == "col1"));
        assert!(matches!(cells[2], RowCell::Slot { slot, .. } if slot.id == "col2"));
    }

    #[test]
    fn test_spacer_position_is_clamped() {
        let cells = layout_row(ROW, &widths(&[("col1", 40.0), ("col2", 40.0)]), Some(9));
        assert_eq!(spacers(&cells), vec![(2, 20.0)]);
    }

    #[test]
    fn test_widths_of_other_rows_are_ignored() {
        let cells = layout_row(
            &ROW[..1],
            &widths(&[("col1", 60.0), ("col2", 10.0)]),
            None,
        );
        assert_eq!(spacers(&cells), vec![(1, 40.0)]);
    }
}
