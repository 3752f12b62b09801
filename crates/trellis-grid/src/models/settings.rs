//! Per-feature settings sections of the grid model.
//!
//! Each optional module owns one settings section; the host stores them and
//! publishes `inBoundModelChanged` when a section changes so the owning
//! module can react without the host knowing the feature's semantics.

/// Direction of a sort descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }
}

/// One sorted column.
#[derive(Debug, Clone, PartialEq)]
pub struct SortDescriptor {
    pub field: String,
    pub direction: SortDirection,
}

/// The sort module's settings section.
#[derive(Debug, Clone, Default)]
pub struct SortSettings {
    pub columns: Vec<SortDescriptor>,
}

impl SortSettings {
    /// The direction `field` is currently sorted in, if any.
    pub fn direction_of(&self, field: &str) -> Option<SortDirection> {
        self.columns
            .iter()
            .find(|descriptor| descriptor.field == field)
            .map(|descriptor| descriptor.direction)
    }
}

/// The group module's settings section.
#[derive(Debug, Clone, Default)]
pub struct GroupSettings {
    /// Grouped column fields, outermost first.
    pub columns: Vec<String>,
}

impl GroupSettings {
    pub fn is_grouped(&self, field: &str) -> bool {
        self.columns.iter().any(|grouped| grouped == field)
    }
}

/// The search module's settings section.
#[derive(Debug, Clone, Default)]
pub struct SearchSettings {
    /// The active search key; empty means no search.
    pub key: String,
}

/// How the filter UI presents itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// A filter row under the header. The column menu's Filter item is
    /// disabled in this mode.
    FilterBar,
    /// Per-column filter dialog opened from the column menu.
    #[default]
    Menu,
    /// Excel-style checkbox dialog.
    Excel,
}

/// One active filter predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterDescriptor {
    pub field: String,
    pub value: String,
}

/// The filter module's settings section.
#[derive(Debug, Clone, Default)]
pub struct FilterSettings {
    pub mode: FilterMode,
    pub columns: Vec<FilterDescriptor>,
}
