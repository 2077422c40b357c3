//! Per-archetype category → schedule mapping with a parent fallback chain.

use npc_core::{ArchetypeId, ScheduleId};
use rustc_hash::FxHashMap;

use crate::Category;

/// One archetype's schedule overrides.
///
/// A concrete archetype supplies only the categories it customizes;
/// everything else inherits from `parent` (and transitively its ancestors),
/// bottoming out at the registry's built-in defaults.  Constructed once at
/// registration via [`TableBuilder`] and never mutated afterward.
#[derive(Debug, Default)]
pub struct ScheduleTable {
    entries: FxHashMap<Category, ScheduleId>,
    /// Parent archetype to consult for categories absent from `entries`.
    pub parent: Option<ArchetypeId>,
}

impl ScheduleTable {
    /// Start building a table.
    pub fn builder() -> TableBuilder {
        TableBuilder::default()
    }

    /// This table's own entry for `category`, ignoring the parent chain.
    #[inline]
    pub fn lookup(&self, category: Category) -> Option<ScheduleId> {
        self.entries.get(&category).copied()
    }

    /// Number of categories this table overrides itself.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Fluent builder for [`ScheduleTable`].
#[derive(Debug, Default)]
pub struct TableBuilder {
    entries: FxHashMap<Category, ScheduleId>,
    parent: Option<ArchetypeId>,
}

impl TableBuilder {
    /// Inherit unlisted categories from `parent`.
    pub fn parent(mut self, parent: ArchetypeId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Map `category` to `schedule`.  Later entries overwrite earlier ones.
    pub fn entry(mut self, category: Category, schedule: ScheduleId) -> Self {
        self.entries.insert(category, schedule);
        self
    }

    pub fn build(self) -> ScheduleTable {
        ScheduleTable { entries: self.entries, parent: self.parent }
    }
}
