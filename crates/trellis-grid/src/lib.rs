//! Extensible tabular-display widget built on the `trellis-core`
//! coordination layer.
//!
//! The [`Grid`] host owns a notification bus, a service locator, a
//! renderer factory and a capability registry, and raises the lifecycle
//! events optional feature modules react to. Features are opted in per
//! instance through [`GridConfig::inject`]; a grid built without a module
//! simply never raises or answers that module's events.
//!
//! ```
//! use trellis_core::ModuleKind;
//! use trellis_grid::{Column, GridConfig};
//!
//! let grid = GridConfig::new("orders")
//!     .with_column(Column::new("OrderID"))
//!     .with_column(Column::new("Freight"))
//!     .inject(ModuleKind::Search)
//!     .build()
//!     .unwrap();
//!
//! grid.initial_render().unwrap();
//! grid.data_bound(); // external data collaborator answers the bind
//!
//! grid.search("chai");
//! grid.data_bound();
//! assert_eq!(grid.search_key(), "chai");
//! grid.destroy();
//! ```

pub mod actions;
pub mod grid;
pub mod models;
pub mod render;
pub mod services;

pub use actions::{
    ColumnMenu, ColumnMenuEntry, ColumnMenuItem, ColumnMenuItemKind, CustomColumnMenuItem,
    CustomItemHandler, Freeze, MenuState, Search,
};
pub use grid::{Grid, GridConfig, GridStats, GridWeak, PendingCommand};
pub use models::{
    AggregateColumn, AggregateKind, AggregateRow, Column, FilterDescriptor, FilterMode,
    FilterSettings, GroupSettings, SearchSettings, SortDescriptor, SortDirection, SortSettings,
};
pub use render::{
    ContentRender, FooterRender, FreezeContentRender, FreezeHeaderRender, HeaderRender, Pane,
    RenderContext, RenderOp, Renderer,
};
pub use services::Localization;
