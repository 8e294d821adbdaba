use crate::error::{MailframeError, MailframeResult};
use crate::layout::registry::LayoutType;

/// Split a layout's ordered slots into visual rows.
///
/// Generic over the slot type so callers can group [`SlotDef`]s or anything
/// already resolved from them. Fails when the slot count does not match the
/// layout's row partition instead of indexing past the end.
///
/// [`SlotDef`]: crate::layout::SlotDef
pub fn rows_for<T>(layout_type: LayoutType, slots: &[T]) -> MailframeResult<Vec<&[T]>> {
    let Some(partition) = layout_type.row_partition() else {
        if slots.is_empty() {
            return Ok(Vec::new());
        }
        return Ok(vec![slots]);
    };

    let expected: usize = partition.iter().sum();
    if expected != slots.len() {
        return Err(MailframeError::SlotCountMismatch {
            layout_type: layout_type.as_str().to_string(),
            expected,
            actual: slots.len(),
        });
    }

    let mut rows = Vec::with_capacity(partition.len());
    let mut rest = slots;
    for &len in partition {
        let (row, tail) = rest.split_at(len);
        rows.push(row);
        rest = tail;
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::registry::{LayoutDefinition, SlotDef, LAYOUTS};

    fn ids(rows: &[&[SlotDef]]) -> Vec<Vec<&'static str>> {
        rows.iter().map(|r| r.iter().map(|s| s.id).collect()).collect()
    }

    fn def(layout_type: LayoutType) -> &'static LayoutDefinition {
        LAYOUTS.iter().find(|d| d.layout_type == layout_type).unwrap()
    }

    #[test]
    fn test_partitions_cover_every_slot_once() {
        for def in LAYOUTS {
            let rows = rows_for(def.layout_type, def.slots).unwrap();
            let flat: Vec<&SlotDef> = rows.iter().flat_map(|r| r.iter()).collect();
            let expected: Vec<&SlotDef> = def.slots.iter().collect();
            assert_eq!(flat, expected, "layout {}", def.layout_type.as_str());
        }
    }

    #[test]
    fn test_hero_two_column_rows() {
        let d = def(LayoutType::HeroTwoColumn);
        let rows = rows_for(d.layout_type, d.slots).unwrap();
        assert_eq!(ids(&rows), vec![vec!["hero"], vec!["col1", "col2"]]);
    }

    #[test]
    fn test_two_top_stacked_rows() {
        let d = def(LayoutType::TwoTopStacked);
        let rows = rows_for(d.layout_type, d.slots).unwrap();
        assert_eq!(ids(&rows), vec![vec!["top-left", "top-right"], vec!["bottom"]]);
    }

    #[test]
    fn test_hero_three_column_rows() {
        let d = def(LayoutType::HeroThreeColumn);
        let rows = rows_for(d.layout_type, d.slots).unwrap();
        assert_eq!(ids(&rows), vec![vec!["hero"], vec!["col1", "col2", "col3"]]);
    }

    #[test]
    fn test_four_grid_rows() {
        let d = def(LayoutType::FourGrid);
        let rows = rows_for(d.layout_type, d.slots).unwrap();
        assert_eq!(
            ids(&rows),
            vec![vec!["top-left", "top-right"], vec!["bottom-left", "bottom-right"]]
        );
    }

    #[test]
    fn test_three_stacked_rows() {
        let d = def(LayoutType::ThreeStacked);
        let rows = rows_for(d.layout_type, d.slots).unwrap();
        assert_eq!(ids(&rows), vec![vec!["top"], vec!["middle"], vec!["bottom"]]);
    }

    #[test]
    fn test_other_layouts_are_one_row() {
        let d = def(LayoutType::ThreeColumn);
        let rows = rows_for(d.layout_type, d.slots).unwrap();
        assert_eq!(ids(&rows), vec![vec!["col1", "col2", "col3"]]);

        let d = def(LayoutType::TwoStacked);
        let rows = rows_for(d.layout_type, d.slots).unwrap();
        assert_eq!(ids(&rows), vec![vec!["top", "bottom"]]);
    }

    #[test]
    fn test_slot_count_mismatch_is_an_error() {
        let short = &def(LayoutType::TwoColumn).slots[..];
        let err = rows_for(LayoutType::HeroTwoColumn, short).unwrap_err();
        assert_eq!(
            err,
            MailframeError::SlotCountMismatch {
                layout_type: "hero-two-column".to_string(),
                expected: 3,
                actual: 2,
            }
        );
    }

    #[test]
    fn test_works_on_any_slot_type() {
        let labels = ["a", "b", "c", "d"];
        let rows = rows_for(LayoutType::FourGrid, &labels).unwrap();
        assert_eq!(rows, vec![&["a", "b"][..], &["c", "d"][..]]);
    }
}
