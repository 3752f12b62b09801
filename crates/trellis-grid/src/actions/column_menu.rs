//! The column menu module.
//!
//! Builds the per-column header menu: a closed set of built-in items plus
//! host-supplied custom entries. Item enabled/disabled state is recomputed
//! from live grid state every time the menu opens, never cached across
//! opens. Opening is cancelable through a bus round trip; selection
//! dispatches built-in commands on the grid and hands custom items to the
//! host's callback.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use trellis_core::{
    ActionModule, HandlerId, ModuleKind, ModuleState, NotifyArgs, Result, events,
};

use crate::grid::{Grid, GridWeak};
use crate::models::{Column, FilterMode, SortDirection};
use crate::services::{Localization, names};

const TARGET: &str = "trellis_grid::column_menu";

/// The closed set of built-in column menu commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnMenuItemKind {
    AutoFitAll,
    AutoFit,
    SortAscending,
    SortDescending,
    Group,
    Ungroup,
    ColumnChooser,
    Filter,
}

impl ColumnMenuItemKind {
    /// Default menu composition, in display order.
    pub const DEFAULT_ORDER: [Self; 8] = [
        Self::AutoFitAll,
        Self::AutoFit,
        Self::SortAscending,
        Self::SortDescending,
        Self::Group,
        Self::Ungroup,
        Self::ColumnChooser,
        Self::Filter,
    ];

    /// Key into the localization table.
    pub fn locale_key(&self) -> &'static str {
        match self {
            Self::AutoFitAll => "autoFitAll",
            Self::AutoFit => "autoFit",
            Self::SortAscending => "SortAscending",
            Self::SortDescending => "SortDescending",
            Self::Group => "Group",
            Self::Ungroup => "Ungroup",
            Self::ColumnChooser => "Columnchooser",
            Self::Filter => "FilterMenu",
        }
    }

    /// Stable suffix used in generated item identifiers.
    pub fn id_key(&self) -> &'static str {
        match self {
            Self::AutoFitAll => "AutoFitAll",
            Self::AutoFit => "AutoFit",
            Self::SortAscending => "SortAscending",
            Self::SortDescending => "SortDescending",
            Self::Group => "Group",
            Self::Ungroup => "Ungroup",
            Self::ColumnChooser => "ColumnChooser",
            Self::Filter => "Filter",
        }
    }

    pub fn icon_class(&self) -> &'static str {
        match self {
            Self::AutoFitAll => "tg-icon-autofit-all",
            Self::AutoFit => "tg-icon-autofit",
            Self::SortAscending => "tg-icon-sort-asc",
            Self::SortDescending => "tg-icon-sort-desc",
            Self::Group => "tg-icon-group",
            Self::Ungroup => "tg-icon-ungroup",
            Self::ColumnChooser => "tg-icon-columns",
            Self::Filter => "tg-icon-filter",
        }
    }
}

/// A host-defined menu item, dispatched to the custom item callback.
#[derive(Debug, Clone)]
pub struct CustomColumnMenuItem {
    pub id: String,
    pub text: String,
    pub icon_class: Option<String>,
    pub hidden: bool,
}

impl CustomColumnMenuItem {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            icon_class: None,
            hidden: false,
        }
    }
}

/// One entry of the configured menu composition.
#[derive(Debug, Clone)]
pub enum ColumnMenuEntry {
    BuiltIn(ColumnMenuItemKind),
    Custom(CustomColumnMenuItem),
}

/// One resolved item of an open menu.
#[derive(Debug, Clone)]
pub struct ColumnMenuItem {
    pub id: String,
    pub text: String,
    pub icon_class: Option<String>,
    pub hidden: bool,
    pub disabled: bool,
    /// `None` for custom items.
    pub kind: Option<ColumnMenuItemKind>,
    /// Sub-items; used by the column chooser entry.
    pub items: Vec<ColumnMenuItem>,
}

/// Open/close state of the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuState {
    #[default]
    Closed,
    Opening,
    Open,
    /// Close requested while the filter popup is still up; completes when
    /// [`ColumnMenu::filter_popup_closed`] runs.
    Closing,
}

/// Callback invoked when a custom menu item is selected. Receives the item
/// and the field of the column the menu was opened for.
pub type CustomItemHandler = Arc<dyn Fn(&CustomColumnMenuItem, &str) + Send + Sync>;

struct MenuInner {
    lifecycle: ModuleState,
    subs: Vec<(&'static str, HandlerId)>,
    menu_state: MenuState,
    target_field: Option<String>,
    items: Vec<ColumnMenuItem>,
    rendered: bool,
    header_wired: bool,
    filter_popup_open: bool,
}

/// Optional module implementing the per-column header menu.
pub struct ColumnMenu {
    grid: GridWeak,
    me: Weak<ColumnMenu>,
    state: Mutex<MenuInner>,
    custom_handler: Mutex<Option<CustomItemHandler>>,
}

impl ColumnMenu {
    pub(crate) fn construct(grid: &Grid) -> Arc<Self> {
        let module = Arc::new_cyclic(|me| Self {
            grid: grid.downgrade(),
            me: me.clone(),
            state: Mutex::new(MenuInner {
                lifecycle: ModuleState::Uninitialized,
                subs: Vec::new(),
                menu_state: MenuState::Closed,
                target_field: None,
                items: Vec::new(),
                rendered: false,
                header_wired: false,
                filter_popup_open: false,
            }),
            custom_handler: Mutex::new(None),
        });
        module.add_event_listener();
        module
    }

    /// Install the callback custom items dispatch to.
    pub fn set_custom_item_handler(&self, handler: CustomItemHandler) {
        *self.custom_handler.lock() = Some(handler);
    }

    pub fn menu_state(&self) -> MenuState {
        self.state.lock().menu_state
    }

    /// Whether the header has been (re)built and the menu buttons are in
    /// place.
    pub fn header_wired(&self) -> bool {
        self.state.lock().header_wired
    }

    /// Field the menu is currently open for.
    pub fn target_field(&self) -> Option<String> {
        self.state.lock().target_field.clone()
    }

    /// Items of the currently open menu.
    pub fn items(&self) -> Vec<ColumnMenuItem> {
        self.state.lock().items.clone()
    }

    /// Header-button trigger with toggle semantics: a second trigger on the
    /// open column closes; a trigger on another column switches targets.
    pub fn handle_trigger(&self, field: &str) -> Result<bool> {
        let (open, same_target) = {
            let state = self.state.lock();
            (
                state.menu_state == MenuState::Open,
                state.target_field.as_deref() == Some(field),
            )
        };
        if open {
            self.close();
            if same_target {
                return Ok(false);
            }
        }
        self.open_for(field)
    }

    /// Open the menu for one column.
    ///
    /// Publishes a cancelable `columnMenuOpen` round trip; a listener that
    /// sets `cancel` keeps the menu closed. On success the item list is
    /// rebuilt and every disabled predicate recomputed from current grid
    /// state.
    pub fn open_for(&self, field: &str) -> Result<bool> {
        let Some(grid) = self.grid.upgrade() else {
            return Ok(false);
        };
        if grid.is_destroyed() {
            return Ok(false);
        }
        {
            let state = self.state.lock();
            if !state.rendered {
                tracing::warn!(target: TARGET, field, "menu triggered before initial render");
                return Ok(false);
            }
        }
        let Some(column) = grid.column(field) else {
            tracing::warn!(target: TARGET, field, "unknown column");
            return Ok(false);
        };
        {
            let mut state = self.state.lock();
            state.menu_state = MenuState::Opening;
            state.target_field = Some(field.to_owned());
        }

        let answered = grid.request(
            events::COLUMN_MENU_OPEN,
            NotifyArgs::for_module(ModuleKind::ColumnMenu).with_column_field(field),
        );
        if answered.cancel {
            tracing::debug!(target: TARGET, field, "open canceled by listener");
            let mut state = self.state.lock();
            state.menu_state = MenuState::Closed;
            state.target_field = None;
            return Ok(false);
        }

        let items = self.build_items(&grid, &column)?;
        let mut state = self.state.lock();
        state.items = items;
        state.menu_state = MenuState::Open;
        Ok(true)
    }

    /// Close the menu. Deferred while the filter popup is up.
    pub fn close(&self) {
        let mut state = self.state.lock();
        if state.filter_popup_open {
            state.menu_state = MenuState::Closing;
            return;
        }
        state.menu_state = MenuState::Closed;
        state.target_field = None;
        state.items.clear();
    }

    /// Signal from the filter UI that its popup closed; completes a
    /// deferred close.
    pub fn filter_popup_closed(&self) {
        let mut state = self.state.lock();
        state.filter_popup_open = false;
        if state.menu_state == MenuState::Closing {
            state.menu_state = MenuState::Closed;
            state.target_field = None;
            state.items.clear();
        }
    }

    /// Dispatch a selected item by identifier.
    ///
    /// Built-in items run the matching grid command; chooser sub-items
    /// toggle column visibility and keep the menu open; custom items go to
    /// the installed callback. Ends with a `columnMenuClick` notification.
    pub fn select(&self, item_id: &str) -> Result<()> {
        let Some(grid) = self.grid.upgrade() else {
            return Ok(());
        };
        let (item, field, is_chooser_child) = {
            let state = self.state.lock();
            if state.menu_state != MenuState::Open {
                tracing::warn!(target: TARGET, item_id, "select on a closed menu");
                return Ok(());
            }
            let Some(field) = state.target_field.clone() else {
                return Ok(());
            };
            let Some(item) = find_item(&state.items, item_id).cloned() else {
                tracing::warn!(target: TARGET, item_id, "unknown menu item");
                return Ok(());
            };
            // Chooser children are recognized by membership in the chooser
            // entry's sub-items, not by their id shape, so a custom item
            // with a chooser-like id still reaches the custom handler.
            let is_chooser_child = state
                .items
                .iter()
                .filter(|entry| entry.kind == Some(ColumnMenuItemKind::ColumnChooser))
                .any(|entry| entry.items.iter().any(|child| child.id == item_id));
            (item, field, is_chooser_child)
        };
        if item.disabled {
            tracing::debug!(target: TARGET, item_id, "ignoring disabled item");
            return Ok(());
        }

        let mut keep_open = false;
        match item.kind {
            Some(ColumnMenuItemKind::AutoFitAll) => grid.auto_fit_columns(None)?,
            Some(ColumnMenuItemKind::AutoFit) => grid.auto_fit_columns(Some(&field))?,
            Some(ColumnMenuItemKind::SortAscending) => {
                grid.sort_column(&field, SortDirection::Ascending);
            }
            Some(ColumnMenuItemKind::SortDescending) => {
                grid.sort_column(&field, SortDirection::Descending);
            }
            Some(ColumnMenuItemKind::Group) => grid.group_column(&field),
            Some(ColumnMenuItemKind::Ungroup) => grid.ungroup_column(&field),
            Some(ColumnMenuItemKind::Filter) => {
                {
                    self.state.lock().filter_popup_open = true;
                }
                grid.open_filter_dialog(&field, &item.id);
                keep_open = true;
            }
            // The chooser entry itself is only a container.
            Some(ColumnMenuItemKind::ColumnChooser) => keep_open = true,
            None => {
                if is_chooser_child {
                    if let Some(chooser_field) = chooser_field(grid.id(), &item.id) {
                        self.toggle_chooser_column(&grid, &chooser_field)?;
                    }
                    keep_open = true;
                } else {
                    let handler = self.custom_handler.lock().clone();
                    match handler {
                        Some(handler) => {
                            let custom = CustomColumnMenuItem {
                                id: item.id.clone(),
                                text: item.text.clone(),
                                icon_class: item.icon_class.clone(),
                                hidden: item.hidden,
                            };
                            handler(&custom, &field);
                        }
                        None => {
                            tracing::warn!(target: TARGET, item_id, "no custom item handler installed");
                        }
                    }
                }
            }
        }

        let mut args = NotifyArgs::for_module(ModuleKind::ColumnMenu)
            .with_column_field(field)
            .with_item_id(item.id);
        grid.notify(events::COLUMN_MENU_CLICK, &mut args);

        if !keep_open {
            self.close();
        }
        Ok(())
    }

    fn toggle_chooser_column(&self, grid: &Grid, field: &str) -> Result<()> {
        let Some(column) = grid.column(field) else {
            tracing::warn!(target: TARGET, field, "chooser item for unknown column");
            return Ok(());
        };
        if column.visible {
            grid.hide_columns(&[field])?;
        } else {
            grid.show_columns(&[field])?;
        }
        // Refresh the chooser sub-items so the menu reflects the toggle.
        if let Some(target) = self.target_field()
            && let Some(target_column) = grid.column(&target)
        {
            let items = self.build_items(grid, &target_column)?;
            self.state.lock().items = items;
        }
        Ok(())
    }

    /// Resolve the configured entries into concrete items for `column`.
    fn build_items(&self, grid: &Grid, column: &Column) -> Result<Vec<ColumnMenuItem>> {
        let locale = grid.locator().get::<Localization>(names::LOCALIZATION)?;
        let entries = grid
            .column_menu_entries()
            .unwrap_or_else(|| {
                ColumnMenuItemKind::DEFAULT_ORDER
                    .into_iter()
                    .map(ColumnMenuEntry::BuiltIn)
                    .collect()
            });
        let items = entries
            .into_iter()
            .map(|entry| match entry {
                ColumnMenuEntry::BuiltIn(kind) => {
                    let sub_items = if kind == ColumnMenuItemKind::ColumnChooser {
                        chooser_items(grid)
                    } else {
                        Vec::new()
                    };
                    ColumnMenuItem {
                        id: built_in_id(grid.id(), kind),
                        text: locale.get_constant(kind.locale_key()),
                        icon_class: Some(kind.icon_class().to_owned()),
                        hidden: false,
                        disabled: ensure_disabled_status(grid, kind, column),
                        kind: Some(kind),
                        items: sub_items,
                    }
                }
                ColumnMenuEntry::Custom(custom) => ColumnMenuItem {
                    id: custom.id,
                    text: custom.text,
                    icon_class: custom.icon_class,
                    hidden: custom.hidden,
                    disabled: false,
                    kind: None,
                    items: Vec::new(),
                },
            })
            .collect();
        Ok(items)
    }

    fn mark_active(&self) {
        let mut state = self.state.lock();
        if state.lifecycle == ModuleState::Subscribed {
            state.lifecycle = ModuleState::Active;
        }
    }

    fn on_initial_end(&self) {
        self.mark_active();
        self.state.lock().rendered = true;
    }

    fn on_header_refreshed(&self) {
        self.mark_active();
        self.state.lock().header_wired = true;
    }

    fn on_filter_dialog_created(&self) {
        self.mark_active();
        self.state.lock().filter_popup_open = true;
    }

    fn on_ui_update(&self, args: &mut NotifyArgs) {
        if args.module != Some(ModuleKind::ColumnMenu) {
            return;
        }
        self.mark_active();
        if !args.enable {
            self.close();
            return;
        }
        // Re-resolve the open menu against the updated configuration.
        let Some(grid) = self.grid.upgrade() else {
            return;
        };
        let target = {
            let state = self.state.lock();
            if state.menu_state != MenuState::Open {
                return;
            }
            state.target_field.clone()
        };
        if let Some(field) = target
            && let Some(column) = grid.column(&field)
        {
            match self.build_items(&grid, &column) {
                Ok(items) => self.state.lock().items = items,
                Err(error) => {
                    tracing::error!(target: TARGET, %error, "menu rebuild failed");
                }
            }
        }
    }

    fn subscribe<F>(&self, grid: &Grid, event: &'static str, handler: F)
    where
        F: Fn(&ColumnMenu, &mut NotifyArgs) + Send + Sync + 'static,
    {
        let me = self.me.clone();
        if let Some(id) = grid.on(event, move |args| {
            if let Some(module) = me.upgrade() {
                handler(&module, args);
            }
        }) {
            self.state.lock().subs.push((event, id));
        }
    }
}

fn built_in_id(grid_id: &str, kind: ColumnMenuItemKind) -> String {
    format!("{grid_id}_colmenu_{}", kind.id_key())
}

fn chooser_item_id(grid_id: &str, field: &str) -> String {
    format!("{grid_id}_chooser_{field}")
}

/// Extract the column field from a chooser sub-item identifier.
fn chooser_field(grid_id: &str, item_id: &str) -> Option<String> {
    item_id
        .strip_prefix(grid_id)
        .and_then(|rest| rest.strip_prefix("_chooser_"))
        .map(str::to_owned)
}

fn chooser_items(grid: &Grid) -> Vec<ColumnMenuItem> {
    grid.columns()
        .iter()
        .filter(|column| column.show_in_chooser)
        .map(|column| ColumnMenuItem {
            id: chooser_item_id(grid.id(), &column.field),
            text: column.caption().to_owned(),
            icon_class: None,
            hidden: !column.visible,
            disabled: false,
            kind: None,
            items: Vec::new(),
        })
        .collect()
}

/// Disabled predicate for one built-in item, evaluated against live state
/// at menu-open time.
fn ensure_disabled_status(grid: &Grid, kind: ColumnMenuItemKind, column: &Column) -> bool {
    let caps = grid.capabilities();
    match kind {
        ColumnMenuItemKind::AutoFitAll | ColumnMenuItemKind::AutoFit => {
            !caps.ensure_injected(ModuleKind::Resize)
        }
        ColumnMenuItemKind::SortAscending | ColumnMenuItemKind::SortDescending => {
            if !grid.allow_sorting()
                || !column.allow_sorting
                || !caps.ensure_injected(ModuleKind::Sort)
            {
                return true;
            }
            let wanted = if kind == ColumnMenuItemKind::SortAscending {
                SortDirection::Ascending
            } else {
                SortDirection::Descending
            };
            // Already sorted this way: nothing the item could do.
            grid.sort_settings().direction_of(&column.field) == Some(wanted)
        }
        ColumnMenuItemKind::Group => {
            !grid.allow_grouping()
                || !column.allow_grouping
                || !caps.ensure_injected(ModuleKind::Group)
                || grid.group_settings().is_grouped(&column.field)
        }
        ColumnMenuItemKind::Ungroup => {
            !grid.allow_grouping()
                || !caps.ensure_injected(ModuleKind::Group)
                || !grid.group_settings().is_grouped(&column.field)
        }
        ColumnMenuItemKind::ColumnChooser => !caps.ensure_injected(ModuleKind::ColumnChooser),
        ColumnMenuItemKind::Filter => {
            !(grid.allow_filtering()
                && grid.filter_settings().mode != FilterMode::FilterBar
                && caps.ensure_injected(ModuleKind::Filter))
        }
    }
}

fn find_item<'a>(items: &'a [ColumnMenuItem], item_id: &str) -> Option<&'a ColumnMenuItem> {
    for item in items {
        if item.id == item_id {
            return Some(item);
        }
        if let Some(found) = find_item(&item.items, item_id) {
            return Some(found);
        }
    }
    None
}

impl ActionModule for ColumnMenu {
    fn module_kind(&self) -> ModuleKind {
        ModuleKind::ColumnMenu
    }

    fn add_event_listener(&self) {
        let Some(grid) = self.grid.upgrade() else {
            return;
        };
        if grid.is_destroyed() || self.state.lock().lifecycle != ModuleState::Uninitialized {
            return;
        }
        self.subscribe(&grid, events::INITIAL_END, |module, _| module.on_initial_end());
        self.subscribe(&grid, events::UI_UPDATE, |module, args| {
            module.on_ui_update(args);
        });
        self.subscribe(&grid, events::HEADER_REFRESHED, |module, _| {
            module.on_header_refreshed();
        });
        self.subscribe(&grid, events::FILTER_DIALOG_CREATED, |module, _| {
            module.on_filter_dialog_created();
        });
        self.subscribe(&grid, events::DESTROY, |module, _| module.destroy());
        self.state.lock().lifecycle = ModuleState::Subscribed;
    }

    fn remove_event_listener(&self) {
        let subs: Vec<_> = self.state.lock().subs.drain(..).collect();
        if let Some(grid) = self.grid.upgrade() {
            for (event, id) in subs {
                grid.off(event, id);
            }
        }
    }

    fn destroy(&self) {
        if self.state.lock().lifecycle.is_destroyed() {
            return;
        }
        self.remove_event_listener();
        let mut state = self.state.lock();
        state.lifecycle = ModuleState::Destroyed;
        state.menu_state = MenuState::Closed;
        state.target_field = None;
        state.items.clear();
    }

    fn state(&self) -> ModuleState {
        self.state.lock().lifecycle
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_arc(self: Arc<Self>) -> Arc<dyn std::any::Any + Send + Sync> {
        self
    }
}

static_assertions::assert_impl_all!(ColumnMenu: Send, Sync);
