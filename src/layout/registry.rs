use std::collections::HashSet;

use crate::error::{MailframeError, MailframeResult};

/// A named position inside a layout that a content block can be assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotDef {
    pub id: &'static str,
    pub label: &'static str,
}

const fn slot(id: &'static str, label: &'static str) -> SlotDef {
    SlotDef { id, label }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutType {
    SingleColumn,
    TwoColumn,
    ThreeColumn,
    TwoStacked,
    ThreeStacked,
    HeroTwoColumn,
    TwoTopStacked,
    HeroThreeColumn,
    FourGrid,
}

impl LayoutType {
    pub fn parse(value: &str) -> Option<Self> {
        LAYOUTS
            .iter()
            .find(|def| def.layout_type.as_str() == value)
            .map(|def| def.layout_type)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutType::SingleColumn => "single-column",
            LayoutType::TwoColumn => "two-column",
            LayoutType::ThreeColumn => "three-column",
            LayoutType::TwoStacked => "two-stacked",
            LayoutType::ThreeStacked => "three-stacked",
            LayoutType::HeroTwoColumn => "hero-two-column",
            LayoutType::TwoTopStacked => "two-top-stacked",
            LayoutType::HeroThreeColumn => "hero-three-column",
            LayoutType::FourGrid => "four-grid",
        }
    }

    /// Number of slots in each row, top to bottom. `None` means one row
    /// holding every slot.
    pub fn row_partition(self) -> Option<&'static [usize]> {
        match self {
            LayoutType::HeroTwoColumn => Some(&[1, 2]),
            LayoutType::TwoTopStacked => Some(&[2, 1]),
            LayoutType::HeroThreeColumn => Some(&[1, 3]),
            LayoutType::FourGrid => Some(&[2, 2]),
            LayoutType::ThreeStacked => Some(&[1, 1, 1]),
            LayoutType::SingleColumn
            | LayoutType::TwoColumn
            | LayoutType::ThreeColumn
            | LayoutType::TwoStacked => None,
        }
    }

    /// Slots in a row are placed one under the other whatever their widths
    pub fn stacks_vertically(self) -> bool {
        matches!(self, LayoutType::TwoStacked | LayoutType::ThreeStacked)
    }
}

/// Catalog entry: a layout type and its ordered slots
#[derive(Debug, PartialEq, Eq)]
pub struct LayoutDefinition {
    pub layout_type: LayoutType,
    pub name: &'static str,
    pub slots: &'static [SlotDef],
}

impl LayoutDefinition {
    pub fn slot(&self, id: &str) -> Option<&'static SlotDef> {
        self.slots.iter().find(|s| s.id == id)
    }
}

pub static LAYOUTS: &[LayoutDefinition] = &[
    LayoutDefinition {
        layout_type: LayoutType::SingleColumn,
        name: "Single Column",
        slots: &[slot("main", "Main Content")],
    },
    LayoutDefinition {
        layout_type: LayoutType::TwoColumn,
        name: "Two Columns",
        slots: &[slot("left", "Left Column"), slot("right", "Right Column")],
    },
    LayoutDefinition {
        layout_type: LayoutType::ThreeColumn,
        name: "Three Columns",
        slots: &[
            slot("col1", "Column 1"),
            slot("col2", "Column 2"),
            slot("col3", "Column 3"),
        ],
    },
    LayoutDefinition {
        layout_type: LayoutType::TwoStacked,
        name: "Two Stacked",
        slots: &[slot("top", "Top"), slot("bottom", "Bottom")],
    },
    LayoutDefinition {
        layout_type: LayoutType::ThreeStacked,
        name: "Three Stacked",
        slots: &[slot("top", "Top"), slot("middle", "Middle"), slot("bottom", "Bottom")],
    },
    LayoutDefinition {
        layout_type: LayoutType::HeroTwoColumn,
        name: "Hero + Two Columns",
        slots: &[
            slot("hero", "Hero"),
            slot("col1", "Left Column"),
            slot("col2", "Right Column"),
        ],
    },
    LayoutDefinition {
        layout_type: LayoutType::TwoTopStacked,
        name: "Two Top + Stacked",
        slots: &[
            slot("top-left", "Top Left"),
            slot("top-right", "Top Right"),
            slot("bottom", "Bottom"),
        ],
    },
    LayoutDefinition {
        layout_type: LayoutType::HeroThreeColumn,
        name: "Hero + Three Columns",
        slots: &[
            slot("hero", "Hero"),
            slot("col1", "Column 1"),
            slot("col2", "Column 2"),
            slot("col3", "Column 3"),
        ],
    },
    LayoutDefinition {
        layout_type: LayoutType::FourGrid,
        name: "Four Grid",
        slots: &[
            slot("top-left", "Top Left"),
            slot("top-right", "Top Right"),
            slot("bottom-left", "Bottom Left"),
            slot("bottom-right", "Bottom Right"),
        ],
    },
];

/// Find a layout by its wire name. Callers treat `None` as "render the
/// blocks in order".
pub fn lookup(layout_type: &str) -> Option<&'static LayoutDefinition> {
    LAYOUTS
        .iter()
        .find(|def| def.layout_type.as_str() == layout_type)
}

/// Verify the catalog against the row grouping table: slot ids are unique
/// per layout and every row partition accounts for exactly the declared slots.
pub fn check_registry() -> MailframeResult<()> {
    for def in LAYOUTS {
        let mut seen = HashSet::new();
        for slot in def.slots {
            if !seen.insert(slot.id) {
                return Err(MailframeError::DuplicateSlotId {
                    layout_type: def.layout_type.as_str().to_string(),
                    slot_id: slot.id.to_string(),
                });
            }
        }

        if let Some(partition) = def.layout_type.row_partition() {
            let expected: usize = partition.iter().sum();
            if expected != def.slots.len() {
                return Err(MailframeError::SlotCountMismatch {
                    layout_type: def.layout_type.as_str().to_string(),
                    expected,
                    actual: def.slots.len(),
                });
            }
        }
    }
    Ok(())
}
