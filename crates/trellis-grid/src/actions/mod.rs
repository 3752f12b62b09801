//! Optional feature modules.
//!
//! Each module satisfies [`trellis_core::ActionModule`]: constructed only
//! when opted into through [`crate::GridConfig::inject`], wired to the bus
//! at construction, fully unsubscribed on destroy. Modules never reference
//! one another; cross-module presence is a capability-registry query.

mod column_menu;
mod freeze;
mod search;

pub use column_menu::{
    ColumnMenu, ColumnMenuEntry, ColumnMenuItem, ColumnMenuItemKind, CustomColumnMenuItem,
    CustomItemHandler, MenuState,
};
pub use freeze::Freeze;
pub use search::Search;
