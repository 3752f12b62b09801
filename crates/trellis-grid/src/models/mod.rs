//! Data model types shared by the grid host and its modules.

mod aggregate;
mod column;
mod settings;

pub use aggregate::{AggregateColumn, AggregateKind, AggregateRow};
pub use column::Column;
pub use settings::{
    FilterDescriptor, FilterMode, FilterSettings, GroupSettings, SearchSettings, SortDescriptor,
    SortDirection, SortSettings,
};
