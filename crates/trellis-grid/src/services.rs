//! Shared singletons registered in the grid's service locator.

use std::collections::HashMap;

/// Localized text lookup for built-in UI strings.
///
/// The table is immutable configuration data passed in at grid
/// construction; there is no global locale state, so two grid instances on
/// one screen can carry different translations.
pub struct Localization {
    table: HashMap<String, String>,
}

impl Localization {
    /// English defaults for the built-in column menu items.
    fn defaults() -> HashMap<String, String> {
        [
            ("autoFitAll", "Autofit all columns"),
            ("autoFit", "Autofit this column"),
            ("Group", "Group by this column"),
            ("Ungroup", "Ungroup by this column"),
            ("SortAscending", "Sort Ascending"),
            ("SortDescending", "Sort Descending"),
            ("Columnchooser", "Columns"),
            ("FilterMenu", "Filter"),
        ]
        .into_iter()
        .map(|(key, text)| (key.to_owned(), text.to_owned()))
        .collect()
    }

    /// Build the table from defaults plus per-instance overrides.
    pub fn new(overrides: HashMap<String, String>) -> Self {
        let mut table = Self::defaults();
        table.extend(overrides);
        Self { table }
    }

    /// Look up a constant; unknown keys fall back to the key itself so a
    /// missing translation is visible instead of fatal.
    pub fn get_constant(&self, key: &str) -> String {
        self.table
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_owned())
    }
}

impl Default for Localization {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

/// Service names registered by the grid at construction.
pub mod names {
    pub const LOCALIZATION: &str = "localization";
    pub const RENDERER_FACTORY: &str = "rendererFactory";
}
